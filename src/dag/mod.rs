/// `IntoWord` conversions and the bulk constructor.
pub mod builder;
/// Errors returned by insertion and replay.
pub mod error;
/// The incrementally maintained DAG and its insertion algorithm.
pub mod mealy;
/// Internal canonicalization table.
pub(crate) mod register;
/// Separating-word search against other Mealy machines.
pub mod separator;
/// State signatures: per-symbol successors and outputs.
pub mod signature;
/// DAG states and their ids.
pub mod state;
/// Internal slot arena for states.
pub(crate) mod state_arena;
/// Trait for types that can serve as outputs.
pub mod symbol_trait;

pub use builder::{build_mealy_dag, IntoWord};
pub use error::DagError;
pub use mealy::MealyDag;
pub use separator::{find_separating_word, MealyTransitions};
pub use signature::{Signature, Transition};
pub use state::{State, StateId};
pub use symbol_trait::OutputSymbol;
