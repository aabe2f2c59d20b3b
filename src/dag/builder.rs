use smallvec::SmallVec;

use super::error::DagError;
use super::mealy::MealyDag;
use super::symbol_trait::OutputSymbol;

/// Trait for types that can be used as an input or output word.
///
/// Implemented for common string and sequence types so that
/// [`MealyDag::insert`] and friends accept them directly without manual
/// conversion.
pub trait IntoWord<T> {
    /// Collects this word into a symbol buffer.
    fn collect_word(self) -> SmallVec<[T; 32]>;
}

// String types → char

impl IntoWord<char> for &str {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

impl IntoWord<char> for &String {
    fn collect_word(self) -> SmallVec<[char; 32]> {
        self.chars().collect()
    }
}

// Generic sequence types → T

impl<T: Clone> IntoWord<T> for &[T] {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.iter().cloned().collect()
    }
}

impl<T> IntoWord<T> for Vec<T> {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.into_iter().collect()
    }
}

impl<T: Clone> IntoWord<T> for &Vec<T> {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.iter().cloned().collect()
    }
}

impl<T, const N: usize> IntoWord<T> for [T; N] {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.into_iter().collect()
    }
}

impl<T: Clone, const N: usize> IntoWord<T> for &[T; N] {
    fn collect_word(self) -> SmallVec<[T; 32]> {
        self.iter().cloned().collect()
    }
}

/// Builds a DAG over an alphabet of `arity` input symbols from an iterator of
/// `(input, output)` traces.
///
/// Traces may come in any order. Building stops at the first trace that
/// contradicts an earlier one or is malformed, and that error is returned.
///
/// # Examples
///
/// ```
/// use mealy_dag::dag::builder::build_mealy_dag;
///
/// let dag = build_mealy_dag(2, [([0, 1], "xy"), ([1, 1], "zy")]).unwrap();
/// assert_eq!(dag.query([0, 1]).unwrap(), Some(vec!['x', 'y']));
/// assert_eq!(dag.query([1]).unwrap(), Some(vec!['z']));
/// assert_eq!(dag.query([0, 0]).unwrap(), None);
/// ```
pub fn build_mealy_dag<O, I, W>(
    arity: usize,
    traces: impl IntoIterator<Item = (I, W)>,
) -> Result<MealyDag<O>, DagError<O>>
where
    O: OutputSymbol,
    I: IntoWord<usize>,
    W: IntoWord<O>,
{
    let mut dag = MealyDag::new(arity);
    for (input, output) in traces {
        dag.insert(input, output)?;
    }
    Ok(dag)
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn string_words_collect_chars() {
        assert_eq!("héllo".collect_word().as_slice(), &['h', 'é', 'l', 'l', 'o']);
        assert_eq!(String::from("ab").collect_word().as_slice(), &['a', 'b']);
    }

    #[test]
    fn sequence_words_collect_elements() {
        assert_eq!([0usize, 2, 1].collect_word().as_slice(), &[0, 2, 1]);
        assert_eq!(vec![3usize].collect_word().as_slice(), &[3]);
        let owned = vec!["a".to_string(), "b".to_string()];
        assert_eq!(owned.as_slice().collect_word().len(), 2);
    }

    #[test]
    fn build_stops_at_first_conflict() {
        let res = build_mealy_dag(1, [(vec![0], "a"), (vec![0], "b"), (vec![0, 0], "ac")]);
        assert_eq!(
            res.unwrap_err(),
            DagError::Conflict {
                position: 0,
                recorded: 'a',
                requested: 'b',
            }
        );
    }

    #[test]
    fn build_order_does_not_change_the_result() {
        let traces = [
            (vec![0, 0], "xx"),
            (vec![1, 0], "yx"),
            (vec![0, 1], "xz"),
        ];
        let forward = build_mealy_dag(2, traces.clone()).unwrap();
        let backward = build_mealy_dag(2, traces.into_iter().rev()).unwrap();
        assert_eq!(forward.state_count(), backward.state_count());
        for word in [[0, 0], [1, 0], [0, 1], [1, 1]] {
            assert_eq!(forward.query(word).unwrap(), backward.query(word).unwrap());
        }
    }

    #[test]
    fn build_with_owned_outputs() {
        let ok = || "ok".to_string();
        let dag = build_mealy_dag(
            3,
            [
                (vec![2], vec![ok()]),
                (vec![2, 0], vec![ok(), "err".to_string()]),
            ],
        )
        .unwrap();
        assert_eq!(
            dag.query([2, 0]).unwrap(),
            Some(vec!["ok".to_string(), "err".to_string()])
        );
    }
}
