//! Error types for trace insertion and replay.

use thiserror::Error;

use super::state::StateId;
use super::symbol_trait::OutputSymbol;

/// Errors that can occur when inserting into or querying a [`MealyDag`](super::MealyDag).
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DagError<O: OutputSymbol> {
    /// The same input prefix was already recorded with a different output.
    ///
    /// `position` is the index of the first disagreeing symbol.
    #[error("conflicting output at position {position}: recorded {recorded:?}, requested {requested:?}")]
    Conflict {
        /// Index into the input word where the outputs disagree.
        position: usize,
        /// Output already stored in the DAG.
        recorded: O,
        /// Output the rejected trace asked for.
        requested: O,
    },

    /// An input symbol index is not below the current alphabet size.
    #[error("input symbol {index} out of range for alphabet size {arity}")]
    OutOfRange {
        /// The offending symbol index.
        index: usize,
        /// Alphabet size at the time of the access.
        arity: usize,
    },

    /// Input and output words of a trace have different lengths.
    #[error("input word has length {input} but output word has length {output}")]
    LengthMismatch {
        /// Length of the input word.
        input: usize,
        /// Length of the output word.
        output: usize,
    },

    /// The access word of a suffix insertion does not reach a recorded state.
    #[error("access word is only defined up to length {defined}")]
    UndefinedAccess {
        /// Length of the longest defined prefix of the access word.
        defined: usize,
    },

    /// A state id does not refer to a live state of this DAG.
    #[error("unknown state {0:?}")]
    UnknownState(StateId),
}
