//! Searching for inputs on which two Mealy machines disagree.

use std::collections::VecDeque;
use std::hash::Hash;

use hashbrown::HashMap;

use super::mealy::MealyDag;
use super::state::StateId;
use super::symbol_trait::OutputSymbol;

/// Read access to a deterministic, possibly partial Mealy machine over input
/// symbols `0..arity`.
///
/// Implement this for a hypothesis or reference machine to compare it against
/// the traces recorded in a [`MealyDag`].
pub trait MealyTransitions<O> {
    /// State handle type.
    type State: Copy + Eq + Hash;

    /// The state every word is read from.
    fn initial_state(&self) -> Self::State;

    /// The successor and output of `state` on `input`, or `None` if undefined.
    fn transition(&self, state: Self::State, input: usize) -> Option<(Self::State, &O)>;
}

impl<O: OutputSymbol> MealyTransitions<O> for MealyDag<O> {
    type State = StateId;

    fn initial_state(&self) -> StateId {
        self.root()
    }

    fn transition(&self, state: StateId, input: usize) -> Option<(StateId, &O)> {
        let transition = self.state(state)?.signature().transition_at(input).ok()??;
        Some((transition.target(), transition.output()))
    }
}

/// Finds a shortest word, defined in `reference`, on which `target` produces a
/// different output.
///
/// Words along which `reference` is undefined are never reported. If `target` is
/// undefined where `reference` is defined, that word counts as separating unless
/// `omit_undefined` is set.
pub fn find_separating_word<O, R, T>(
    reference: &R,
    target: &T,
    arity: usize,
    omit_undefined: bool,
) -> Option<Vec<usize>>
where
    O: OutputSymbol,
    R: MealyTransitions<O>,
    T: MealyTransitions<O>,
{
    let start = (reference.initial_state(), target.initial_state());
    let mut parents: HashMap<(R::State, T::State), ((R::State, T::State), usize)> =
        HashMap::new();
    let mut queue = VecDeque::from([start]);

    while let Some(pair @ (r, t)) = queue.pop_front() {
        for symbol in 0..arity {
            let Some((r_next, r_out)) = reference.transition(r, symbol) else {
                continue;
            };
            let separates = match target.transition(t, symbol) {
                None => !omit_undefined,
                Some((_, t_out)) if t_out != r_out => true,
                Some((t_next, _)) => {
                    let next = (r_next, t_next);
                    if next != start && !parents.contains_key(&next) {
                        parents.insert(next, (pair, symbol));
                        queue.push_back(next);
                    }
                    false
                }
            };
            if separates {
                let mut word = vec![symbol];
                let mut current = pair;
                while let Some(&(parent, symbol)) = parents.get(&current) {
                    word.push(symbol);
                    current = parent;
                }
                word.reverse();
                return Some(word);
            }
        }
    }
    None
}

impl<O: OutputSymbol> MealyDag<O> {
    /// Finds a shortest recorded input word on which `target` disagrees with the
    /// recorded outputs. See [`find_separating_word`].
    ///
    /// # Examples
    ///
    /// ```
    /// use mealy_dag::dag::MealyDag;
    ///
    /// let mut cache = MealyDag::new(2);
    /// cache.insert([0, 1], "ab").unwrap();
    ///
    /// let mut hypothesis = MealyDag::new(2);
    /// hypothesis.insert([0, 1], "ac").unwrap();
    ///
    /// assert_eq!(cache.find_separating_word(&hypothesis, false), Some(vec![0, 1]));
    /// assert_eq!(cache.find_separating_word(&cache, false), None);
    /// ```
    pub fn find_separating_word<T: MealyTransitions<O>>(
        &self,
        target: &T,
        omit_undefined: bool,
    ) -> Option<Vec<usize>> {
        find_separating_word(self, target, self.arity(), omit_undefined)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    /// A complete machine given as a transition table: `table[state][input]`.
    struct TableMachine {
        table: Vec<Vec<(usize, char)>>,
    }

    impl MealyTransitions<char> for TableMachine {
        type State = usize;

        fn initial_state(&self) -> usize {
            0
        }

        fn transition(&self, state: usize, input: usize) -> Option<(usize, &char)> {
            self.table
                .get(state)?
                .get(input)
                .map(|(next, out)| (*next, out))
        }
    }

    /// Toggles between two states, emitting 'e' in the even state and 'o' in the odd one.
    fn parity() -> TableMachine {
        TableMachine {
            table: vec![vec![(0, 'e'), (1, 'e')], vec![(1, 'o'), (0, 'o')]],
        }
    }

    #[test]
    fn consistent_cache_has_no_separating_word() {
        let mut cache = MealyDag::new(2);
        cache.insert([1, 0, 1], "eoo").unwrap();
        cache.insert([0, 0], "ee").unwrap();
        assert_eq!(cache.find_separating_word(&parity(), false), None);
    }

    #[test]
    fn finds_shortest_disagreement() {
        let mut cache = MealyDag::new(2);
        cache.insert([1, 1, 1], "eoz").unwrap();
        cache.insert([1, 0], "ex").unwrap();
        assert_eq!(cache.find_separating_word(&parity(), false), Some(vec![1, 0]));
    }

    #[test]
    fn undefined_target_transitions_can_be_ignored() {
        let partial = TableMachine {
            table: vec![vec![(0, 'e')]],
        };
        let mut cache = MealyDag::new(2);
        cache.insert([0, 1], "ee").unwrap();
        assert_eq!(cache.find_separating_word(&partial, false), Some(vec![0, 1]));
        assert_eq!(cache.find_separating_word(&partial, true), None);
    }

    #[test]
    fn dag_transitions_follow_recorded_edges() {
        let mut dag = MealyDag::new(2);
        dag.insert([1], "q").unwrap();
        let root = dag.initial_state();
        let (next, out) = dag.transition(root, 1).unwrap();
        assert_eq!(*out, 'q');
        assert_eq!(Some(next), dag.successor(root, 1).unwrap());
        assert!(dag.transition(root, 0).is_none());
        assert!(dag.transition(root, 9).is_none());
    }
}
