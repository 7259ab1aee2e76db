// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer infrastructure for tree traversal.
//!
//! The design follows a hybrid approach: macro-generated trait method
//! signatures with manual walk implementations.
//!
//! # Visitor Pattern
//!
//! The [`Visitor`] trait provides read-only traversal driven by the
//! `walk_*` functions:
//!
//! - **Depth-first, pre-order** for `visit_*` methods
//! - **Post-order** for `leave_*` methods
//! - Children are visited in source order
//!
//! # Transformer Pattern
//!
//! The [`Transformer`] trait provides owned, post-order rewriting driven by
//! the `rewrite_*` functions:
//!
//! ```
//! use polyver_ast::visitor::{rewrite_expr, Transformer};
//! use polyver_ast::Expr;
//!
//! struct Renamer {
//!     old_name: String,
//!     new_name: String,
//! }
//!
//! impl Transformer for Renamer {
//!     fn transform_expr(&mut self, node: Expr) -> Expr {
//!         match node {
//!             Expr::Name(n) if n == self.old_name => Expr::name(self.new_name.clone()),
//!             other => other,
//!         }
//!     }
//! }
//!
//! let mut renamer = Renamer { old_name: "a".into(), new_name: "b".into() };
//! assert_eq!(rewrite_expr(&mut renamer, Expr::name("a")), Expr::name("b"));
//! ```

mod dispatch;
mod rewrite;
mod traits;

pub use dispatch::*;
pub use rewrite::*;
pub use traits::{Transform, Transformer, VisitResult, Visitor};
