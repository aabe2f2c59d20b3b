use std::fmt::Debug;
use std::hash::Hash;

/// Trait for types that can serve as output labels in a Mealy DAG.
///
/// This trait is automatically implemented for any type satisfying all the
/// required bounds (`char`, `u8`, `u32`, `String`, etc.).
///
/// - `Clone`: signatures are duplicated when a shared state is cloned
/// - `Eq`: recorded outputs are compared against requested ones
/// - `Hash`: state deduplication in the canonicalization table
/// - `Debug`: debug printing of states and conflict reports
pub trait OutputSymbol: Clone + Eq + Hash + Debug {}

impl<T: Clone + Eq + Hash + Debug> OutputSymbol for T {}
