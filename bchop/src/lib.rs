//! # bchop: Binary-Chop Lookup Code Generator
//!
//! bchop turns a small, fixed vocabulary of string keys into branch-based
//! C++ lookup code: a hand-rolled alternative to a perfect-hash table for
//! fast static string dispatch.
//!
//! - Dispatches first on exact input length
//! - Within a length, repeatedly tests the byte position that splits the
//!   remaining keys most evenly
//! - Ends every path in a short list of exact equality tests, so unknown
//!   inputs are always rejected
//!
//! ## Architecture
//!
//! ```text
//!  keys.json
//!      │
//!      ▼
//!  ┌──────────┐   ┌───────────┐   ┌──────────┐   ┌──────────────┐
//!  │  config  │──▶│ partition │──▶│   tree   │──▶│     emit     │
//!  │ KeyTable │   │ best byte │   │ Decision │   │ CodeWriter   │
//!  └──────────┘   │ position  │   │  nodes   │   │ if / switch  │
//!                 └───────────┘   └──────────┘   └──────────────┘
//!                                                       │
//!                                    ┌──────────────────┘
//!                                    ▼
//!                             ┌─────────────┐
//!                             │  generator  │──▶ header + source
//!                             └─────────────┘
//! ```
//!
//! The core (partition, tree, emit) needs no configuration: hand it a key
//! set and it returns a [`Decision`] tree and renders it through any
//! [`MatchOutcome`].
//!
//! ```
//! use bchop::{build_top, emit, CodeWriter};
//!
//! let tree = build_top(vec!["red".into(), "green".into(), "blue".into()]);
//! assert_eq!(tree.classify("green"), Some("green"));
//! assert_eq!(tree.classify("purple"), None);
//!
//! let mut w = CodeWriter::new();
//! emit(&tree, &mut w, &());
//! assert!(w.as_str().starts_with("switch ( len ) {"));
//! ```

pub mod config;
pub mod emit;
pub mod error;
pub mod generator;
pub mod partition;
pub mod table;
pub mod tree;
pub mod writer;


pub use config::Config;
pub use emit::{emit, MatchOutcome};
pub use error::{ConfigError, GenerateError};
pub use generator::{CodeGenerator, GeneratedFiles};
pub use partition::{choose_best_position, find_split_at, Split, SplitPoint};
pub use table::{KeyTable, Lookup};
pub use tree::{build, build_top, Decision};
pub use writer::CodeWriter;
