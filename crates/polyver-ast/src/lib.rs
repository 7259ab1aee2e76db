// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax trees for the versioned-types language extension.
//!
//! This crate holds everything about trees that does not depend on the
//! versioned-types semantics:
//!
//! - **Nodes**: owned, serde-serializable declarations, statements and
//!   expressions of a Java-like language ([`nodes`]).
//! - **Version markers**: the `<base>__<n>__` naming convention ([`version`]).
//! - **Traversal**: read-only [`Visitor`]s and owned [`Transformer`]s
//!   ([`visitor`]).
//! - **Rendering**: source text output via [`Codegen`] ([`codegen`]).
//!
//! # Quick Start
//!
//! ```
//! use polyver_ast::codegen::render;
//! use polyver_ast::{CompilationUnit, Modifiers, TypeDecl};
//!
//! let unit = CompilationUnit::with_type(None, TypeDecl::class("Main", Modifiers::public()));
//! assert_eq!(render(&unit), "public class Main {\n}\n");
//! ```

pub mod codegen;
pub mod nodes;
pub mod version;
pub mod visitor;

pub use codegen::{Codegen, CodegenState};
pub use nodes::*;
pub use version::{Version, VersionPattern, VersionPatternError, VersionedName};
pub use visitor::{Transform, Transformer, VisitResult, Visitor};
