//! Example: a membership-query cache for active automata learning.
//!
//! A learner asks a (slow) system under learning for the output of input words.
//! The `QueryCache` answers repeated questions from a `MealyDag`, records new
//! answers, and reports when the system contradicts itself.
//!
//! Run with: cargo run --example trace_cache

use mealy_dag::dag::{DagError, MealyDag};

/// The system under learning: a vending machine that outputs 'c' (coffee) after
/// two coins (input 0) and 'n' otherwise; a button press (input 1) resets it.
fn system_under_learning(word: &[usize]) -> Vec<char> {
    let mut coins = 0;
    word.iter()
        .map(|&symbol| match symbol {
            0 => {
                coins += 1;
                if coins >= 2 {
                    coins = 0;
                    'c'
                } else {
                    'n'
                }
            }
            _ => {
                coins = 0;
                'n'
            }
        })
        .collect()
}

/// A convenient wrapper that caches answers of the system under learning.
struct QueryCache {
    dag: MealyDag<char>,
    hits: usize,
    misses: usize,
}

impl QueryCache {
    fn new(arity: usize) -> Self {
        QueryCache {
            dag: MealyDag::new(arity),
            hits: 0,
            misses: 0,
        }
    }

    /// Answers from the cache, falling back to the system under learning.
    fn answer(&mut self, word: &[usize]) -> Result<Vec<char>, DagError<char>> {
        if let Some(output) = self.dag.query(word)? {
            self.hits += 1;
            return Ok(output);
        }
        self.misses += 1;
        let output = system_under_learning(word);
        self.dag.insert(word, output.as_slice())?;
        Ok(output)
    }
}

fn main() {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let mut cache = QueryCache::new(2);
    let queries: [&[usize]; 7] = [
        &[0, 0, 0],
        &[1, 0, 0],
        &[0, 0],
        &[0, 1, 0, 0],
        &[1, 0, 0],
        &[0, 0, 0, 0],
        &[1, 1, 0, 0],
    ];

    println!("Answers:");
    for word in queries {
        let output = cache.answer(word).expect("system is deterministic");
        println!("  {word:?} -> {}", output.iter().collect::<String>());
    }

    println!(
        "\n{} hits, {} misses, {} shared states",
        cache.hits,
        cache.misses,
        cache.dag.state_count()
    );

    // A system that changes its mind is caught by the cache.
    let err = cache.dag.insert([0, 0], "nn").unwrap_err();
    println!("\nContradicting answer rejected: {err}");
}
