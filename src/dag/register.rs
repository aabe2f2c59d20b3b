//! The canonicalization table: at most one registered state per signature.
//!
//! The table stores only [`StateId`]s. Hashing and equality go through the
//! arena, so a signature lives in exactly one place (its state) and is never
//! duplicated as a map key.

use std::hash::BuildHasher;

use hashbrown::hash_table::{Entry, HashTable};
use hashbrown::DefaultHashBuilder;

use super::signature::Signature;
use super::state::StateId;
use super::state_arena::StateArena;
use super::symbol_trait::OutputSymbol;

pub(crate) struct Register {
    table: HashTable<StateId>,
    hasher: DefaultHashBuilder,
}

impl Register {
    pub fn new() -> Self {
        Register {
            table: HashTable::new(),
            hasher: DefaultHashBuilder::default(),
        }
    }

    /// Returns the registered state carrying `signature`, if any.
    pub fn find<O: OutputSymbol>(
        &self,
        arena: &StateArena<O>,
        signature: &Signature<O>,
    ) -> Option<StateId> {
        let hash = self.hasher.hash_one(signature);
        self.table
            .find(hash, |&other| arena[other].signature() == signature)
            .copied()
    }

    /// Registers `id` under its current signature and returns it, or returns the
    /// state already registered under an equal signature and leaves `id` out.
    pub fn find_or_register<O: OutputSymbol>(
        &mut self,
        arena: &StateArena<O>,
        id: StateId,
    ) -> StateId {
        let signature = arena[id].signature();
        let hasher = &self.hasher;
        let hash = hasher.hash_one(signature);
        match self.table.entry(
            hash,
            |&other| arena[other].signature() == signature,
            |&other| hasher.hash_one(arena[other].signature()),
        ) {
            Entry::Occupied(entry) => *entry.get(),
            Entry::Vacant(entry) => {
                entry.insert(id);
                id
            }
        }
    }

    /// Removes `id` from the table. Must be called while `id` still carries the
    /// signature it was registered under.
    ///
    /// Returns false if `id` was not registered, e.g. because it lost a
    /// [`find_or_register`](Self::find_or_register) to an equal state.
    pub fn unregister<O: OutputSymbol>(&mut self, arena: &StateArena<O>, id: StateId) -> bool {
        let hash = self.hasher.hash_one(arena[id].signature());
        match self.table.find_entry(hash, |&other| other == id) {
            Ok(entry) => {
                entry.remove();
                true
            }
            Err(_) => false,
        }
    }

    /// Re-hashes every live state. Needed after signatures changed wholesale,
    /// e.g. when the alphabet grew.
    pub fn rebuild<O: OutputSymbol>(&mut self, arena: &StateArena<O>) {
        self.table.clear();
        for (id, _) in arena.iter() {
            let canonical = self.find_or_register(arena, id);
            assert_eq!(canonical, id, "two live states share a signature");
        }
    }

    #[cfg(test)]
    pub fn contains(&self, id: StateId) -> bool {
        self.table.iter().any(|&other| other == id)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }
}
