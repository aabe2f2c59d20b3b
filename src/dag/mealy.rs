use smallvec::SmallVec;
use tracing::{debug, trace};

use super::builder::IntoWord;
use super::error::DagError;
use super::register::Register;
use super::signature::Signature;
use super::state::{State, StateId};
use super::state_arena::StateArena;
use super::symbol_trait::OutputSymbol;

/// An incrementally built, maximally shared DAG of recorded Mealy machine traces.
///
/// Every trace `(input, output)` inserted with [`insert`](MealyDag::insert) can be
/// replayed with [`query`](MealyDag::query). States with identical future
/// behaviour are always the same state: after each insertion no two live states
/// carry equal signatures, every state's incoming count matches its actual
/// in-edges, and every live state is reachable from the root.
///
/// Input symbols are indices `0..arity()`. Outputs are any [`OutputSymbol`].
///
/// # Examples
///
/// ```
/// use mealy_dag::dag::MealyDag;
///
/// let mut dag = MealyDag::new(2);
/// dag.insert([0, 0], "xx").unwrap();
/// dag.insert([1, 0], "yx").unwrap();
///
/// // Both paths continue with the same future behaviour, so they share a state.
/// let root = dag.root();
/// let after_a = dag.successor(root, 0).unwrap().unwrap();
/// let after_b = dag.successor(root, 1).unwrap().unwrap();
/// assert_eq!(after_a, after_b);
/// assert!(dag.state(after_a).unwrap().is_confluence());
///
/// assert_eq!(dag.query([1, 0]).unwrap(), Some(vec!['y', 'x']));
/// assert!(dag.insert([1, 0], "yz").is_err());
/// ```
pub struct MealyDag<O: OutputSymbol> {
    arena: StateArena<O>,
    register: Register,
    root: StateId,
    arity: usize,
}

impl<O: OutputSymbol> MealyDag<O> {
    /// Creates a DAG over `arity` input symbols with nothing recorded.
    pub fn new(arity: usize) -> Self {
        let mut arena = StateArena::new();
        let mut register = Register::new();
        let root = arena.alloc(State::new(Signature::new(arity)));
        register.find_or_register(&arena, root);
        MealyDag {
            arena,
            register,
            root,
            arity,
        }
    }

    /// Returns the initial state.
    pub fn root(&self) -> StateId {
        self.root
    }

    /// Current number of input symbols.
    pub fn arity(&self) -> usize {
        self.arity
    }

    /// Returns the state behind `id`, or `None` if it has been reclaimed.
    pub fn state(&self, id: StateId) -> Option<&State<O>> {
        self.arena.get(id)
    }

    /// Iterates over all live states. Every one of them is reachable from the root.
    pub fn states(&self) -> impl Iterator<Item = (StateId, &State<O>)> + '_ {
        self.arena.iter()
    }

    /// Returns the number of live states, including the root.
    pub fn state_count(&self) -> usize {
        self.arena.len()
    }

    /// Returns the successor of `id` on `symbol`.
    pub fn successor(&self, id: StateId, symbol: usize) -> Result<Option<StateId>, DagError<O>> {
        self.live(id)?.successor_at(symbol)
    }

    /// Returns the output of `id` on `symbol`.
    pub fn output(&self, id: StateId, symbol: usize) -> Result<Option<&O>, DagError<O>> {
        self.live(id)?.output_at(symbol)
    }

    fn live(&self, id: StateId) -> Result<&State<O>, DagError<O>> {
        self.arena.get(id).ok_or(DagError::UnknownState(id))
    }

    fn check_symbols(&self, word: &[usize]) -> Result<(), DagError<O>> {
        match word.iter().find(|&&symbol| symbol >= self.arity) {
            Some(&index) => Err(DagError::OutOfRange {
                index,
                arity: self.arity,
            }),
            None => Ok(()),
        }
    }

    /// Records that reading `input` from the root produces `output`.
    ///
    /// Returns `Ok(true)` if the DAG changed and `Ok(false)` if the trace (or an
    /// extension of it) was already recorded.
    ///
    /// # Errors
    ///
    /// - [`DagError::Conflict`] if a prefix of `input` is already recorded with a
    ///   different output. Earlier writes win; the DAG is left untouched.
    /// - [`DagError::LengthMismatch`] if the words differ in length.
    /// - [`DagError::OutOfRange`] if a symbol is not below [`arity`](Self::arity).
    ///
    /// # Examples
    ///
    /// ```
    /// use mealy_dag::dag::MealyDag;
    ///
    /// let mut dag = MealyDag::new(2);
    /// assert_eq!(dag.insert([0, 1], "ab"), Ok(true));
    /// assert_eq!(dag.insert([0], "a"), Ok(false)); // already a recorded prefix
    /// assert!(dag.insert([0], "z").is_err());
    /// ```
    pub fn insert(
        &mut self,
        input: impl IntoWord<usize>,
        output: impl IntoWord<O>,
    ) -> Result<bool, DagError<O>> {
        let input = input.collect_word();
        let output = output.collect_word();
        self.insert_word(&input, &output)
    }

    /// Records `input`/`output` starting from the state reached by `access`.
    ///
    /// The start state is named by its access word, which must already be
    /// recorded. Conflict positions are reported relative to `access ++ input`.
    ///
    /// # Errors
    ///
    /// As [`insert`](Self::insert), plus [`DagError::UndefinedAccess`] if `access`
    /// leaves the recorded part of the DAG.
    pub fn insert_suffix(
        &mut self,
        access: impl IntoWord<usize>,
        input: impl IntoWord<usize>,
        output: impl IntoWord<O>,
    ) -> Result<bool, DagError<O>> {
        let mut full_input = access.collect_word();
        self.check_symbols(&full_input)?;
        let (mut full_output, _) = self.walk(self.root, &full_input);
        if full_output.len() < full_input.len() {
            return Err(DagError::UndefinedAccess {
                defined: full_output.len(),
            });
        }
        full_input.extend(input.collect_word());
        full_output.extend(output.collect_word());
        self.insert_word(&full_input, &full_output)
    }

    fn insert_word(&mut self, input: &[usize], output: &[O]) -> Result<bool, DagError<O>> {
        if input.len() != output.len() {
            return Err(DagError::LengthMismatch {
                input: input.len(),
                output: output.len(),
            });
        }
        self.check_symbols(input)?;

        // Phase 1: follow the recorded prefix. Contradictions surface here,
        // before anything is modified. path[i] is the state reached by input[..i].
        let mut path: SmallVec<[StateId; 32]> = SmallVec::new();
        path.push(self.root);
        let mut current = self.root;
        for (position, (&symbol, requested)) in input.iter().zip(output).enumerate() {
            let Some(transition) = self.arena[current].signature().transition_at(symbol)? else {
                break;
            };
            if transition.output() != requested {
                return Err(DagError::Conflict {
                    position,
                    recorded: transition.output().clone(),
                    requested: requested.clone(),
                });
            }
            current = transition.target();
            path.push(current);
        }

        let prefix_len = path.len() - 1;
        if prefix_len == input.len() {
            trace!(len = input.len(), "trace already recorded");
            return Ok(false);
        }

        // From the first shared state down, the path is also reachable through
        // other prefixes and must be cloned. Above it every state has exactly one
        // parent and is edited in place.
        let confluence = path
            .iter()
            .position(|&id| self.arena[id].is_confluence())
            .unwrap_or(path.len());
        trace!(
            prefix_len,
            confluence,
            suffix_len = input.len() - prefix_len,
            "inserting trace"
        );

        // Phase 2: hide the states about to be edited, so the new suffix cannot
        // be folded into one of them.
        for &id in &path[..confluence] {
            let registered = self.register.unregister(&self.arena, id);
            debug_assert!(registered, "path state {id:?} missing from register");
        }

        // Phase 3: build the new suffix bottom-up, sharing whatever already exists.
        let mut child = self.canonicalize(Signature::new(self.arity));
        for i in (prefix_len + 1..input.len()).rev() {
            let mut signature = Signature::new(self.arity);
            signature.set(input[i], child, output[i].clone());
            child = self.canonicalize(signature);
        }

        // Phase 4: hook the suffix in and walk back up to the root. Each level
        // either adds the new edge (at the end of the recorded prefix) or points
        // the existing edge at the re-canonicalized child.
        for level in (0..=prefix_len).rev() {
            let added = (level == prefix_len).then(|| output[level].clone());
            child = if level >= confluence {
                self.clone_with(path[level], input[level], child, added)
            } else {
                self.edit_in_place(path[level], input[level], child, added)
            };
        }
        assert_eq!(child, self.root, "root collided with a reachable state");

        Ok(true)
    }

    /// Returns the canonical state for `signature`, allocating it if no equal
    /// state is registered. A new state takes an edge to each of its successors.
    fn canonicalize(&mut self, signature: Signature<O>) -> StateId {
        if let Some(existing) = self.register.find(&self.arena, &signature) {
            return existing;
        }
        let successors: SmallVec<[StateId; 8]> = signature.successors().collect();
        let id = self.arena.alloc(State::new(signature));
        for successor in successors {
            self.arena[successor].increase_incoming();
        }
        let registered = self.register.find_or_register(&self.arena, id);
        debug_assert_eq!(registered, id);
        id
    }

    /// Copy-on-write for a shared state: canonicalizes a copy of `original` with
    /// the edit applied and leaves `original` untouched for its other parents.
    fn clone_with(
        &mut self,
        original: StateId,
        symbol: usize,
        child: StateId,
        added: Option<O>,
    ) -> StateId {
        let mut signature = self.arena[original].signature().clone();
        match added {
            Some(output) => signature.set(symbol, child, output),
            None => {
                signature.redirect(symbol, child);
            }
        }
        let clone = self.canonicalize(signature);
        debug!(?original, ?clone, "cloned shared state");
        clone
    }

    /// Edits an unshared, unregistered state and registers it again. Returns the
    /// state itself, or the existing state it turned out to be equal to. In the
    /// latter case `id` stays allocated until its parent lets go of it.
    fn edit_in_place(
        &mut self,
        id: StateId,
        symbol: usize,
        child: StateId,
        added: Option<O>,
    ) -> StateId {
        let signature = self.arena[id].signature_mut();
        let previous = match added {
            Some(output) => {
                signature.set(symbol, child, output);
                None
            }
            None => Some(signature.redirect(symbol, child)),
        };
        if previous != Some(child) {
            self.arena[child].increase_incoming();
            if let Some(previous) = previous {
                self.release(previous);
            }
        }

        let canonical = self.register.find_or_register(&self.arena, id);
        if canonical != id {
            debug!(merged = ?id, into = ?canonical, "edited state merged into existing state");
        }
        canonical
    }

    /// Drops one incoming edge of `id`, reclaiming it and releasing its own
    /// successors once nothing points at it any more.
    fn release(&mut self, id: StateId) {
        if self.arena[id].decrease_incoming() > 0 {
            return;
        }
        self.register.unregister(&self.arena, id);
        let state = self.arena.free(id);
        debug!(?id, "reclaimed unreachable state");
        for successor in state.signature().successors() {
            self.release(successor);
        }
    }

    /// Follows `input` from `start` as far as it is recorded. Returns the outputs
    /// collected on the way and the last state reached.
    fn walk(&self, start: StateId, input: &[usize]) -> (SmallVec<[O; 32]>, StateId) {
        let mut outputs = SmallVec::new();
        let mut current = start;
        for &symbol in input {
            match self.arena[current].signature().transition_at(symbol) {
                Ok(Some(transition)) => {
                    outputs.push(transition.output().clone());
                    current = transition.target();
                }
                _ => break,
            }
        }
        (outputs, current)
    }

    /// Replays `input` from the root.
    ///
    /// Returns the recorded output word, or `None` if some prefix of `input` is
    /// not recorded.
    pub fn query(&self, input: impl IntoWord<usize>) -> Result<Option<Vec<O>>, DagError<O>> {
        self.query_from(self.root, input)
    }

    /// Replays `input` from `start`. See [`query`](Self::query).
    ///
    /// # Errors
    ///
    /// [`DagError::UnknownState`] if `start` is not live, [`DagError::OutOfRange`]
    /// for symbols outside the alphabet.
    pub fn query_from(
        &self,
        start: StateId,
        input: impl IntoWord<usize>,
    ) -> Result<Option<Vec<O>>, DagError<O>> {
        let input = input.collect_word();
        self.live(start)?;
        self.check_symbols(&input)?;
        let (outputs, _) = self.walk(start, &input);
        Ok((outputs.len() == input.len()).then(|| outputs.into_vec()))
    }

    /// Returns the outputs along the longest recorded prefix of `input`.
    pub fn lookup(&self, input: impl IntoWord<usize>) -> Result<Vec<O>, DagError<O>> {
        let input = input.collect_word();
        self.check_symbols(&input)?;
        Ok(self.walk(self.root, &input).0.into_vec())
    }

    /// True if the whole of `input` has a recorded output.
    pub fn is_defined(&self, input: impl IntoWord<usize>) -> Result<bool, DagError<O>> {
        let input = input.collect_word();
        self.check_symbols(&input)?;
        Ok(self.walk(self.root, &input).0.len() == input.len())
    }

    /// Widens every state to `new_arity` input symbols. New slots start undefined;
    /// recorded transitions are untouched. Does nothing if `new_arity` is not
    /// larger than the current arity.
    pub fn alphabet_grew(&mut self, new_arity: usize) {
        if new_arity <= self.arity {
            return;
        }
        for state in self.arena.iter_mut() {
            state.ensure_arity(new_arity);
        }
        self.register.rebuild(&self.arena);
        debug!(
            from = self.arity,
            to = new_arity,
            states = self.arena.len(),
            "alphabet grew"
        );
        self.arity = new_arity;
    }
}

impl<O: OutputSymbol> std::fmt::Debug for MealyDag<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MealyDag")
            .field("arity", &self.arity)
            .field("state_count", &self.state_count())
            .finish()
    }
}
