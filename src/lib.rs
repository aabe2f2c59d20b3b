//! # mealy-dag
//!
//! An incrementally built, maximally shared representation of the input/output
//! traces of a deterministic Mealy machine.
//!
//! Traces are recorded one at a time into a directed acyclic graph whose states
//! are hash-consed: any two states with the same future behaviour are the same
//! state. Recording is copy-on-write, so states reached through more than one
//! path (confluence states) are cloned instead of edited, and edited states are
//! re-canonicalized bottom-up. This is the kind of cache active automata
//! learning keeps of the membership queries it has already asked.
//!
//! ## Features
//!
//! - **Generic over output type**: any type implementing
//!   [`OutputSymbol`](dag::OutputSymbol)
//! - **Compact**: equal suffixes are stored once
//! - **Online**: traces may arrive in any order; the DAG is canonical after each one
//! - **Safe**: contradicting traces are rejected without touching the DAG
//!
//! ## Quick Start
//!
//! ```
//! use mealy_dag::dag::{DagError, MealyDag};
//!
//! // Input alphabet {0, 1}, char outputs.
//! let mut dag = MealyDag::new(2);
//! dag.insert([0, 1], "ab").unwrap();
//! dag.insert([1, 1], "cb").unwrap();
//!
//! assert_eq!(dag.query([0, 1]).unwrap(), Some(vec!['a', 'b']));
//! assert_eq!(dag.query([0, 0]).unwrap(), None);
//!
//! // The two states after the first symbol behave the same and are shared.
//! let root = dag.root();
//! assert_eq!(dag.successor(root, 0).unwrap(), dag.successor(root, 1).unwrap());
//!
//! // Earlier traces win over contradicting ones.
//! assert_eq!(
//!     dag.insert([0, 1], "ax"),
//!     Err(DagError::Conflict { position: 1, recorded: 'b', requested: 'x' })
//! );
//! ```
//!
//! ## Growing the alphabet
//!
//! ```
//! use mealy_dag::dag::MealyDag;
//!
//! let mut dag = MealyDag::new(1);
//! dag.insert([0], [10u32]).unwrap();
//! assert!(dag.insert([1], [11u32]).is_err());
//!
//! dag.alphabet_grew(2);
//! dag.insert([1], [11u32]).unwrap();
//! assert_eq!(dag.query([1]).unwrap(), Some(vec![11]));
//! ```

#![warn(missing_docs)]

/// Core DAG data structure: states, signatures, canonicalization and insertion.
pub mod dag;

pub use dag::{DagError, IntoWord, MealyDag, OutputSymbol, StateId};
