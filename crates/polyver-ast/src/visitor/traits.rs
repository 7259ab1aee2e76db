// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Visitor and transformer trait definitions for tree traversal.

use crate::nodes::{
    Block, CompilationUnit, ConstructorDecl, Expr, FieldAccess, FieldDecl, LocalVar, Member,
    MethodCall, MethodDecl, Param, Stmt, TypeDecl, TypeRef,
};

/// Result of visiting a node - controls traversal behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum VisitResult {
    /// Continue traversal into children.
    ///
    /// After visiting children, `leave_*` will be called for this node.
    #[default]
    Continue,

    /// Skip children, continue with siblings.
    ///
    /// The walker will not descend into this node's children, but `leave_*`
    /// will still be called for this node.
    SkipChildren,

    /// Stop traversal entirely.
    ///
    /// No further `visit_*` or `leave_*` methods will be called.
    Stop,
}

/// Generic transform result for list-like contexts.
///
/// When transforming nodes that appear in lists (members of a type, statements
/// in a block), this enum allows removing nodes or flattening sequences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform<T> {
    /// Keep the transformed node.
    Keep(T),
    /// Remove the node from the list.
    Remove,
    /// Replace the node with multiple nodes.
    Flatten(Vec<T>),
}

impl<T> Transform<T> {
    pub fn is_keep(&self) -> bool {
        matches!(self, Self::Keep(_))
    }

    pub fn is_remove(&self) -> bool {
        matches!(self, Self::Remove)
    }

    pub fn is_flatten(&self) -> bool {
        matches!(self, Self::Flatten(_))
    }

    /// Maps the inner value using the provided function.
    pub fn map<U, F: FnMut(T) -> U>(self, mut f: F) -> Transform<U> {
        match self {
            Transform::Keep(t) => Transform::Keep(f(t)),
            Transform::Remove => Transform::Remove,
            Transform::Flatten(v) => Transform::Flatten(v.into_iter().map(f).collect()),
        }
    }

    /// Append the result to a list.
    pub fn extend_into(self, out: &mut Vec<T>) {
        match self {
            Transform::Keep(t) => out.push(t),
            Transform::Remove => {}
            Transform::Flatten(v) => out.extend(v),
        }
    }
}

impl<T> From<T> for Transform<T> {
    fn from(value: T) -> Self {
        Transform::Keep(value)
    }
}

/// Macro to generate visitor trait method signatures.
///
/// Generates pairs of `visit_*` and `leave_*` methods with default
/// implementations that return `VisitResult::Continue` and do nothing.
macro_rules! visitor_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Visit a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called before descending into children. Return `VisitResult` to control traversal."]
                #[allow(unused_variables)]
                fn [<visit_ $base_name>](&mut self, node: &$node_type) -> VisitResult {
                    VisitResult::Continue
                }

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after all children have been visited. Called even if `SkipChildren` was returned."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Macro to generate transformer methods that rewrite a node in place.
macro_rules! transformer_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Transform a [`", stringify!($node_type), "`] node.")]
                #[doc = ""]
                #[doc = "Called after its children were transformed. Return the modified node."]
                #[allow(unused_variables)]
                fn [<transform_ $base_name>](&mut self, node: $node_type) -> $node_type {
                    node
                }
            )*
        }
    };
}

/// Macro to generate transformer methods that return `Transform<T>` for list contexts.
macro_rules! transformer_list_methods {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Transform a [`", stringify!($node_type), "`] node in a list context.")]
                #[doc = ""]
                #[doc = "Returns `Transform::Keep` by default. Can also return `Remove` or `Flatten`."]
                #[allow(unused_variables)]
                fn [<transform_ $base_name>](&mut self, node: $node_type) -> Transform<$node_type> {
                    Transform::Keep(node)
                }
            )*
        }
    };
}

/// Macro to generate scope hooks for declarations that open a traversal scope.
macro_rules! scope_hooks {
    (
        $(
            $(#[$meta:meta])*
            $base_name:ident : $node_type:ty
        ),* $(,)?
    ) => {
        paste::paste! {
            $(
                $(#[$meta])*
                #[doc = concat!("Enter a [`", stringify!($node_type), "`] before its children are transformed.")]
                #[allow(unused_variables)]
                fn [<enter_ $base_name>](&mut self, node: &$node_type) {}

                $(#[$meta])*
                #[doc = concat!("Leave a [`", stringify!($node_type), "`] after its children were transformed.")]
                #[doc = ""]
                #[doc = "Always paired with the matching `enter_*` call."]
                #[allow(unused_variables)]
                fn [<leave_ $base_name>](&mut self, node: &$node_type) {}
            )*
        }
    };
}

/// Immutable visitor for tree traversal.
///
/// - `visit_*` is called in **pre-order** (before children)
/// - `leave_*` is called in **post-order** (after children)
/// - Children are visited in source order
///
/// # Example
///
/// ```
/// use polyver_ast::visitor::{walk_compilation_unit, VisitResult, Visitor};
/// use polyver_ast::{CompilationUnit, MethodCall};
///
/// struct CallCounter(usize);
///
/// impl Visitor for CallCounter {
///     fn visit_method_call(&mut self, _node: &MethodCall) -> VisitResult {
///         self.0 += 1;
///         VisitResult::Continue
///     }
/// }
///
/// let mut counter = CallCounter(0);
/// walk_compilation_unit(&mut counter, &CompilationUnit::default());
/// assert_eq!(counter.0, 0);
/// ```
pub trait Visitor {
    visitor_methods! {
        compilation_unit: CompilationUnit,
        type_decl: TypeDecl,
        member: Member,
        field_decl: FieldDecl,
        method_decl: MethodDecl,
        constructor_decl: ConstructorDecl,
        param: Param,
        block: Block,
        stmt: Stmt,
        local_var: LocalVar,
        expr: Expr,
        method_call: MethodCall,
        field_access: FieldAccess,
        type_ref: TypeRef,
    }
}

/// Owned-tree transformer.
///
/// Walk functions in [`rewrite`](super::rewrite) move each node through the
/// transformer: children first, then the node's own `transform_*` hook
/// (post-order). Declarations that open a scope also get `enter_*` and
/// `leave_*` hooks around their children, which is where a transformer keeps
/// its own explicit context stack.
///
/// Assignment targets are routed through [`transform_assign_target`] rather
/// than [`transform_expr`] so that a transformer can tell a write from a read.
///
/// [`transform_assign_target`]: Transformer::transform_assign_target
/// [`transform_expr`]: Transformer::transform_expr
pub trait Transformer {
    scope_hooks! {
        type_decl: TypeDecl,
        method_decl: MethodDecl,
        constructor_decl: ConstructorDecl,
    }

    transformer_methods! {
        compilation_unit: CompilationUnit,
        type_decl: TypeDecl,
        expr: Expr,
        type_ref: TypeRef,
    }

    transformer_list_methods! {
        member: Member,
        stmt: Stmt,
    }

    /// Enter the initializer list of a `for` statement.
    ///
    /// Statements returned from [`transform_stmt`](Transformer::transform_stmt)
    /// in this context must be expression statements or a single local
    /// declaration; return [`Transform::Flatten`] rather than a block.
    fn enter_for_init(&mut self) {}

    /// Leave the initializer list of a `for` statement.
    ///
    /// Always paired with [`enter_for_init`](Transformer::enter_for_init).
    fn leave_for_init(&mut self) {}

    /// Transform the target of an assignment.
    ///
    /// The target's children have already been transformed. Defaults to
    /// [`transform_expr`](Transformer::transform_expr).
    fn transform_assign_target(&mut self, node: Expr) -> Expr {
        self.transform_expr(node)
    }
}
