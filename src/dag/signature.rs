use smallvec::SmallVec;

use super::error::DagError;
use super::state::StateId;
use super::symbol_trait::OutputSymbol;

/// A defined transition: the state reached on a symbol and the output emitted on it.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Transition<O> {
    target: StateId,
    output: O,
}

impl<O> Transition<O> {
    /// The state this transition leads to.
    #[inline]
    pub fn target(&self) -> StateId {
        self.target
    }

    /// The output emitted when this transition is taken.
    #[inline]
    pub fn output(&self) -> &O {
        &self.output
    }
}

/// The shape of a state: one slot per input symbol, each either absent or a
/// [`Transition`].
///
/// A slot holds successor and output together, so a slot's output is defined
/// exactly when its successor is.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Signature<O: OutputSymbol> {
    slots: SmallVec<[Option<Transition<O>>; 4]>,
}

// Equality and hashing are derived, and successors compare by `StateId`. That is
// node identity, not recursive structure: states are canonicalized bottom-up, so
// equal successor subgraphs are already the same id by the time their parent is
// looked up.

impl<O: OutputSymbol> Signature<O> {
    /// Creates a signature with `arity` absent slots.
    pub fn new(arity: usize) -> Self {
        Signature {
            slots: SmallVec::from_elem(None, arity),
        }
    }

    /// Number of input symbols this signature has slots for.
    #[inline]
    pub fn arity(&self) -> usize {
        self.slots.len()
    }

    /// Returns the transition on `index`, or `None` if it is undefined.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::OutOfRange`] if `index >= self.arity()`.
    #[inline]
    pub fn transition_at(&self, index: usize) -> Result<Option<&Transition<O>>, DagError<O>> {
        self.slots
            .get(index)
            .map(Option::as_ref)
            .ok_or(DagError::OutOfRange {
                index,
                arity: self.arity(),
            })
    }

    /// Returns the successor on `index`, or `None` if it is undefined.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::OutOfRange`] if `index >= self.arity()`.
    #[inline]
    pub fn successor_at(&self, index: usize) -> Result<Option<StateId>, DagError<O>> {
        Ok(self.transition_at(index)?.map(Transition::target))
    }

    /// Returns the output on `index`, or `None` if it is undefined.
    ///
    /// # Errors
    ///
    /// Returns [`DagError::OutOfRange`] if `index >= self.arity()`.
    #[inline]
    pub fn output_at(&self, index: usize) -> Result<Option<&O>, DagError<O>> {
        Ok(self.transition_at(index)?.map(Transition::output))
    }

    /// Iterates over the defined transitions as `(symbol, transition)` pairs.
    pub fn transitions(&self) -> impl Iterator<Item = (usize, &Transition<O>)> + '_ {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(index, slot)| slot.as_ref().map(|t| (index, t)))
    }

    /// Iterates over the successor of every defined slot, in symbol order.
    ///
    /// A state reached on two symbols is yielded twice, once per edge.
    pub fn successors(&self) -> impl Iterator<Item = StateId> + '_ {
        self.slots.iter().flatten().map(Transition::target)
    }

    /// Grows the signature to at least `arity` slots. Never shrinks.
    pub(crate) fn ensure_arity(&mut self, arity: usize) {
        if arity > self.slots.len() {
            self.slots.resize(arity, None);
        }
    }

    /// Defines the slot `index`, which must currently be absent.
    pub(crate) fn set(&mut self, index: usize, target: StateId, output: O) {
        let slot = &mut self.slots[index];
        debug_assert!(slot.is_none(), "set: slot {index} already defined");
        *slot = Some(Transition { target, output });
    }

    /// Points the defined slot `index` at `target`, keeping its output.
    ///
    /// Returns the previous successor.
    ///
    /// Panics if the slot is absent.
    pub(crate) fn redirect(&mut self, index: usize, target: StateId) -> StateId {
        let transition = self.slots[index]
            .as_mut()
            .expect("redirect: slot not defined");
        std::mem::replace(&mut transition.target, target)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn id(n: u32) -> StateId {
        StateId::from_raw(n)
    }

    #[test]
    fn new_signature_is_all_absent() {
        let sig = Signature::<char>::new(3);
        assert_eq!(sig.arity(), 3);
        for i in 0..3 {
            assert_eq!(sig.successor_at(i), Ok(None));
            assert_eq!(sig.output_at(i), Ok(None));
        }
        assert_eq!(sig.transitions().count(), 0);
    }

    #[test]
    fn access_past_arity_is_out_of_range() {
        let sig = Signature::<char>::new(2);
        assert_eq!(
            sig.successor_at(2),
            Err(DagError::OutOfRange { index: 2, arity: 2 })
        );
        assert_eq!(
            sig.output_at(7),
            Err(DagError::OutOfRange { index: 7, arity: 2 })
        );
    }

    #[test]
    fn set_defines_successor_and_output_together() {
        let mut sig = Signature::new(2);
        sig.set(1, id(4), 'x');
        assert_eq!(sig.successor_at(1), Ok(Some(id(4))));
        assert_eq!(sig.output_at(1), Ok(Some(&'x')));
        assert_eq!(sig.successor_at(0), Ok(None));
        assert_eq!(sig.successors().collect::<Vec<_>>(), vec![id(4)]);
    }

    #[test]
    fn redirect_keeps_output() {
        let mut sig = Signature::new(1);
        sig.set(0, id(1), 7u8);
        assert_eq!(sig.redirect(0, id(2)), id(1));
        assert_eq!(sig.successor_at(0), Ok(Some(id(2))));
        assert_eq!(sig.output_at(0), Ok(Some(&7)));
    }

    #[test]
    fn ensure_arity_grows_and_never_shrinks() {
        let mut sig = Signature::new(1);
        sig.set(0, id(3), 'a');
        sig.ensure_arity(4);
        assert_eq!(sig.arity(), 4);
        assert_eq!(sig.successor_at(0), Ok(Some(id(3))));
        assert_eq!(sig.successor_at(3), Ok(None));
        sig.ensure_arity(2);
        assert_eq!(sig.arity(), 4);
    }

    #[test]
    fn equality_is_by_successor_identity_and_output() {
        let mut a = Signature::new(2);
        let mut b = Signature::new(2);
        assert_eq!(a, b);

        a.set(0, id(1), 'x');
        b.set(0, id(1), 'x');
        assert_eq!(a, b);

        let mut c = Signature::new(2);
        c.set(0, id(2), 'x');
        assert_ne!(a, c);

        let mut d = Signature::new(2);
        d.set(0, id(1), 'y');
        assert_ne!(a, d);
    }

    #[test]
    fn arity_is_part_of_equality() {
        let a = Signature::<char>::new(2);
        let b = Signature::<char>::new(3);
        assert_ne!(a, b);
    }

    #[test]
    fn equal_signatures_hash_equally() {
        use std::hash::BuildHasher;
        let hasher = hashbrown::DefaultHashBuilder::default();

        let mut a = Signature::new(3);
        a.set(2, id(9), "out".to_string());
        let b = a.clone();
        assert_eq!(hasher.hash_one(&a), hasher.hash_one(&b));
    }
}
