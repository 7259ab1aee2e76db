//! Polyver: merges versioned type declarations into one runtime-switchable
//! type.
//!
//! Declarations named `Test__1__`, `Test__2__`, ... are alternate versions
//! of one logical type `Test`. Polyver resolves calls and field accesses
//! that target a single version, then synthesizes one `Test` that holds
//! every version and switches between them at runtime.
//!
//! The work happens in two library crates, re-exported here:
//!
//! - `polyver-ast`: syntax tree nodes, version markers, traversal, rendering
//! - `polyver-core`: symbol table, rewrite passes, synthesis, pipeline
//!
//! This crate adds the command-line front end ([`cli`]) with its error
//! codes ([`error`]) and JSON responses ([`output`]).

// Syntax trees - re-exported from polyver-ast
pub use polyver_ast::codegen;
pub use polyver_ast::nodes;
pub use polyver_ast::version;
pub use polyver_ast::visitor;

// Transformation passes - re-exported from polyver-core
pub use polyver_core::config;
pub use polyver_core::dispatch;
pub use polyver_core::fields;
pub use polyver_core::pipeline;
pub use polyver_core::scope;
pub use polyver_core::symbols;
pub use polyver_core::synth;

pub use polyver_core::{TransformOptions, TransformOutput, Transformer};

// Command-line front end
pub mod cli;
pub mod error;
pub mod output;
