//! A slot arena for DAG states.
//!
//! States are addressed by [`StateId`] rather than by reference, so a state can
//! be edited in place while other states hold its id. Reclaimed slots are kept
//! on a free list and handed out again by later allocations.

use std::ops::{Index, IndexMut};

use super::state::{State, StateId};
use super::symbol_trait::OutputSymbol;

pub(crate) struct StateArena<O: OutputSymbol> {
    slots: Vec<Option<State<O>>>,
    free_list: Vec<StateId>,
}

impl<O: OutputSymbol> StateArena<O> {
    /// Creates an empty arena.
    pub fn new() -> Self {
        StateArena {
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    /// Stores a state, reusing a reclaimed slot if one is available.
    pub fn alloc(&mut self, state: State<O>) -> StateId {
        if let Some(id) = self.free_list.pop() {
            debug_assert!(self.slots[id.index()].is_none());
            self.slots[id.index()] = Some(state);
            id
        } else {
            let raw = u32::try_from(self.slots.len()).expect("state arena exhausted u32 ids");
            self.slots.push(Some(state));
            StateId::from_raw(raw)
        }
    }

    /// Removes a state and puts its slot on the free list.
    ///
    /// Panics if the slot is already free.
    pub fn free(&mut self, id: StateId) -> State<O> {
        let state = self.slots[id.index()]
            .take()
            .expect("freeing a reclaimed state");
        self.free_list.push(id);
        state
    }

    pub fn get(&self, id: StateId) -> Option<&State<O>> {
        self.slots.get(id.index()).and_then(Option::as_ref)
    }

    /// Iterates over live states in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (StateId, &State<O>)> + '_ {
        self.slots.iter().enumerate().filter_map(|(index, slot)| {
            slot.as_ref()
                .map(|state| (StateId::from_raw(index as u32), state))
        })
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut State<O>> + '_ {
        self.slots.iter_mut().flatten()
    }

    /// Number of slots ever handed out, free or not.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live states.
    pub fn len(&self) -> usize {
        self.slots.len() - self.free_list.len()
    }

    /// Number of reclaimed slots waiting for reuse.
    #[cfg(test)]
    pub fn free_len(&self) -> usize {
        self.free_list.len()
    }
}

impl<O: OutputSymbol> Index<StateId> for StateArena<O> {
    type Output = State<O>;

    #[inline]
    fn index(&self, id: StateId) -> &State<O> {
        self.get(id).expect("access to a reclaimed state")
    }
}

impl<O: OutputSymbol> IndexMut<StateId> for StateArena<O> {
    #[inline]
    fn index_mut(&mut self, id: StateId) -> &mut State<O> {
        self.slots
            .get_mut(id.index())
            .and_then(Option::as_mut)
            .expect("access to a reclaimed state")
    }
}

#[cfg(test)]
mod test {
    use super::super::signature::Signature;
    use super::*;

    fn state() -> State<char> {
        State::new(Signature::new(1))
    }

    #[test]
    fn alloc_hands_out_sequential_ids() {
        let mut arena = StateArena::new();
        let a = arena.alloc(state());
        let b = arena.alloc(state());
        assert_eq!(a.index(), 0);
        assert_eq!(b.index(), 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.capacity(), 2);
    }

    #[test]
    fn freed_slots_are_reused() {
        let mut arena = StateArena::new();
        let a = arena.alloc(state());
        let _b = arena.alloc(state());
        arena.free(a);
        assert_eq!(arena.len(), 1);
        assert_eq!(arena.free_len(), 1);
        assert!(arena.get(a).is_none());

        let c = arena.alloc(state());
        assert_eq!(c, a);
        assert_eq!(arena.capacity(), 2);
        assert_eq!(arena.free_len(), 0);
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut arena = StateArena::new();
        let a = arena.alloc(state());
        let b = arena.alloc(state());
        let c = arena.alloc(state());
        arena.free(b);
        let ids: Vec<_> = arena.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![a, c]);
    }

    #[test]
    #[should_panic(expected = "reclaimed")]
    fn indexing_a_freed_slot_panics() {
        let mut arena = StateArena::new();
        let a = arena.alloc(state());
        arena.free(a);
        let _ = &arena[a];
    }
}
