//! Core passes for the versioned-types transformation.
//!
//! A *versioned type* is a logical type with several alternate
//! implementations, declared as `Test__1__`, `Test__2__`, and so on. This
//! crate turns such declarations into one ordinary type per base name that
//! switches between its versions at runtime:
//!
//! - **Symbols** ([`symbols`]): one index of every declared type, method,
//!   field and local variable type, merged across versions.
//! - **Static dispatch** ([`dispatch`]): calls that resolve to exactly one
//!   version are pinned with a variant switch.
//! - **Field rewriting** ([`fields`]): field accesses on versioned receivers
//!   become accessor calls.
//! - **Synthesis** ([`synth`]): each group of versions becomes one unified
//!   declaration built on an internal state pattern.
//! - **Pipeline** ([`pipeline`]): the passes in order, with per-group error
//!   isolation.
//!
//! # Quick Start
//!
//! ```
//! use polyver_core::{TransformOptions, Transformer};
//! use polyver_ast::{CompilationUnit, Modifiers, TypeDecl};
//!
//! let units = vec![
//!     CompilationUnit::with_type(None, TypeDecl::class("Test__1__", Modifiers::public())),
//!     CompilationUnit::with_type(None, TypeDecl::class("Test__2__", Modifiers::public())),
//! ];
//! let transformer = Transformer::new(TransformOptions::default()).unwrap();
//! let output = transformer.transform(units);
//! assert!(output.is_success());
//! assert_eq!(output.units[0].primary_type_name(), Some("Test"));
//! ```

pub mod config;
pub mod dispatch;
pub mod error;
pub mod fields;
pub mod pipeline;
pub mod scope;
pub mod symbols;
pub mod synth;

pub use config::{NamingConfig, TransformOptions};
pub use dispatch::StaticDispatchResolver;
pub use error::{ConfigError, SynthesisError};
pub use fields::FieldAccessRewriter;
pub use pipeline::{ContentHash, RewriteStats, TransformOutput, Transformer};
pub use scope::ScopeStack;
pub use symbols::{ClassInfo, FieldInfo, MethodInfo, SymbolTable, SymbolTableBuilder};
pub use synth::{UnifiedTypeBuilder, VersionGroup, VersionedDecl};
