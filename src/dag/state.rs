use super::error::DagError;
use super::signature::Signature;
use super::symbol_trait::OutputSymbol;

/// Handle of a state inside a [`MealyDag`](super::MealyDag).
///
/// Ids compare by identity: two handles are equal exactly when they name the
/// same state. An id stays valid until the state it names is reclaimed, which
/// can happen during any later insertion.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateId(u32);

impl StateId {
    #[inline]
    pub(crate) fn from_raw(raw: u32) -> Self {
        StateId(raw)
    }

    /// The arena slot this id refers to.
    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A state in the DAG: one owned [`Signature`] plus the number of
/// `(parent, symbol)` edges that currently point at it.
#[derive(Clone, Debug)]
pub struct State<O: OutputSymbol> {
    signature: Signature<O>,
    incoming: u32,
}

impl<O: OutputSymbol> State<O> {
    /// Creates an unreferenced state owning `signature`.
    pub(crate) fn new(signature: Signature<O>) -> Self {
        State {
            signature,
            incoming: 0,
        }
    }

    pub(crate) fn increase_incoming(&mut self) {
        self.incoming += 1;
    }

    /// Removes one incoming edge and returns the remaining count.
    ///
    /// # Panics
    ///
    /// Panics if the count is already zero. That means the edge bookkeeping is
    /// broken and the shared structure can no longer be trusted.
    pub(crate) fn decrease_incoming(&mut self) -> u32 {
        self.incoming = self
            .incoming
            .checked_sub(1)
            .expect("incoming edge count would become negative");
        self.incoming
    }

    /// Number of `(parent, symbol)` edges targeting this state.
    #[inline]
    pub fn incoming(&self) -> u32 {
        self.incoming
    }

    /// True if more than one edge targets this state, i.e. it is shared and
    /// must be cloned rather than edited.
    #[inline]
    pub fn is_confluence(&self) -> bool {
        self.incoming > 1
    }

    /// See [`Signature::successor_at`].
    #[inline]
    pub fn successor_at(&self, index: usize) -> Result<Option<StateId>, DagError<O>> {
        self.signature.successor_at(index)
    }

    /// See [`Signature::output_at`].
    #[inline]
    pub fn output_at(&self, index: usize) -> Result<Option<&O>, DagError<O>> {
        self.signature.output_at(index)
    }

    /// The signature that determines this state's canonical identity.
    #[inline]
    pub fn signature(&self) -> &Signature<O> {
        &self.signature
    }

    /// Number of input symbols this state has slots for.
    #[inline]
    pub fn arity(&self) -> usize {
        self.signature.arity()
    }

    /// Mutable access for in-place edits. Callers must take the state out of
    /// the canonicalization table first.
    pub(crate) fn signature_mut(&mut self) -> &mut Signature<O> {
        &mut self.signature
    }

    /// See [`Signature::ensure_arity`].
    pub(crate) fn ensure_arity(&mut self, arity: usize) {
        self.signature.ensure_arity(arity);
    }
}
