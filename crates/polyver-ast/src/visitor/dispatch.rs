// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Walk functions for read-only traversal.
//!
//! - **Pre-order**: `visit_*` is called before descending into children
//! - **Post-order**: `leave_*` is called after all children have been visited
//! - **Source order**: Children are visited in declaration order
//!
//! # Control Flow
//!
//! - `VisitResult::Continue` - traverse into children
//! - `VisitResult::SkipChildren` - skip children but still call `leave_*`
//! - `VisitResult::Stop` - halt traversal immediately (no `leave_*` called)

use super::traits::{VisitResult, Visitor};
use crate::nodes::{
    Block, CompilationUnit, ConstructorDecl, Expr, FieldAccess, FieldDecl, LocalVar, Member,
    MethodCall, MethodDecl, Param, Stmt, TypeDecl, TypeRef,
};

/// Propagate `Stop` from a child walk.
macro_rules! walk_or_stop {
    ($walk:expr) => {
        if $walk == VisitResult::Stop {
            return VisitResult::Stop;
        }
    };
}

// ============================================================================
// Declarations
// ============================================================================

/// Walk a [`CompilationUnit`] and its top-level types.
pub fn walk_compilation_unit<V: Visitor>(visitor: &mut V, node: &CompilationUnit) -> VisitResult {
    match visitor.visit_compilation_unit(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for ty in &node.types {
                walk_or_stop!(walk_type_decl(visitor, ty));
            }
        }
    }
    visitor.leave_compilation_unit(node);
    VisitResult::Continue
}

/// Walk a [`TypeDecl`].
///
/// Traversal order:
/// 1. `visit_type_decl`
/// 2. `extends`, then each `implements` type
/// 3. Each member (in source order)
/// 4. `leave_type_decl`
pub fn walk_type_decl<V: Visitor>(visitor: &mut V, node: &TypeDecl) -> VisitResult {
    match visitor.visit_type_decl(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if let Some(extends) = &node.extends {
                walk_or_stop!(walk_type_ref(visitor, extends));
            }
            for ty in &node.implements {
                walk_or_stop!(walk_type_ref(visitor, ty));
            }
            for member in &node.members {
                walk_or_stop!(walk_member(visitor, member));
            }
        }
    }
    visitor.leave_type_decl(node);
    VisitResult::Continue
}

/// Walk a [`Member`], dispatching to the specific declaration walk.
pub fn walk_member<V: Visitor>(visitor: &mut V, node: &Member) -> VisitResult {
    match visitor.visit_member(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            let inner = match node {
                Member::Field(f) => walk_field_decl(visitor, f),
                Member::Method(m) => walk_method_decl(visitor, m),
                Member::Constructor(c) => walk_constructor_decl(visitor, c),
                Member::Type(t) => walk_type_decl(visitor, t),
            };
            walk_or_stop!(inner);
        }
    }
    visitor.leave_member(node);
    VisitResult::Continue
}

pub fn walk_field_decl<V: Visitor>(visitor: &mut V, node: &FieldDecl) -> VisitResult {
    match visitor.visit_field_decl(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            walk_or_stop!(walk_type_ref(visitor, &node.ty));
            for var in &node.variables {
                if let Some(init) = &var.init {
                    walk_or_stop!(walk_expr(visitor, init));
                }
            }
        }
    }
    visitor.leave_field_decl(node);
    VisitResult::Continue
}

/// Walk a [`MethodDecl`].
///
/// Traversal order:
/// 1. `visit_method_decl`
/// 2. Return type
/// 3. Each parameter
/// 4. Body (if any)
/// 5. `leave_method_decl`
pub fn walk_method_decl<V: Visitor>(visitor: &mut V, node: &MethodDecl) -> VisitResult {
    match visitor.visit_method_decl(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            walk_or_stop!(walk_type_ref(visitor, &node.return_type));
            for param in &node.params {
                walk_or_stop!(walk_param(visitor, param));
            }
            if let Some(body) = &node.body {
                walk_or_stop!(walk_block(visitor, body));
            }
        }
    }
    visitor.leave_method_decl(node);
    VisitResult::Continue
}

pub fn walk_constructor_decl<V: Visitor>(visitor: &mut V, node: &ConstructorDecl) -> VisitResult {
    match visitor.visit_constructor_decl(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for param in &node.params {
                walk_or_stop!(walk_param(visitor, param));
            }
            walk_or_stop!(walk_block(visitor, &node.body));
        }
    }
    visitor.leave_constructor_decl(node);
    VisitResult::Continue
}

pub fn walk_param<V: Visitor>(visitor: &mut V, node: &Param) -> VisitResult {
    match visitor.visit_param(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            walk_or_stop!(walk_type_ref(visitor, &node.ty));
        }
    }
    visitor.leave_param(node);
    VisitResult::Continue
}

// ============================================================================
// Statements
// ============================================================================

pub fn walk_block<V: Visitor>(visitor: &mut V, node: &Block) -> VisitResult {
    match visitor.visit_block(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for stmt in &node.stmts {
                walk_or_stop!(walk_stmt(visitor, stmt));
            }
        }
    }
    visitor.leave_block(node);
    VisitResult::Continue
}

/// Walk a [`Stmt`] and its nested statements and expressions.
///
/// `for` statements visit init, condition, update, then body.
/// `switch` statements visit the selector, then each case's labels and body.
pub fn walk_stmt<V: Visitor>(visitor: &mut V, node: &Stmt) -> VisitResult {
    match visitor.visit_stmt(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => match node {
            Stmt::Expr(e) | Stmt::Throw(e) | Stmt::Return(Some(e)) => {
                walk_or_stop!(walk_expr(visitor, e));
            }
            Stmt::Local(local) => {
                walk_or_stop!(walk_local_var(visitor, local));
            }
            Stmt::Block(block) => {
                walk_or_stop!(walk_block(visitor, block));
            }
            Stmt::If(s) => {
                walk_or_stop!(walk_expr(visitor, &s.cond));
                walk_or_stop!(walk_stmt(visitor, &s.then_branch));
                if let Some(else_branch) = &s.else_branch {
                    walk_or_stop!(walk_stmt(visitor, else_branch));
                }
            }
            Stmt::While(s) => {
                walk_or_stop!(walk_expr(visitor, &s.cond));
                walk_or_stop!(walk_stmt(visitor, &s.body));
            }
            Stmt::For(s) => {
                for init in &s.init {
                    walk_or_stop!(walk_stmt(visitor, init));
                }
                if let Some(cond) = &s.cond {
                    walk_or_stop!(walk_expr(visitor, cond));
                }
                for update in &s.update {
                    walk_or_stop!(walk_expr(visitor, update));
                }
                walk_or_stop!(walk_stmt(visitor, &s.body));
            }
            Stmt::Switch(s) => {
                walk_or_stop!(walk_expr(visitor, &s.selector));
                for case in &s.cases {
                    for label in &case.labels {
                        walk_or_stop!(walk_expr(visitor, label));
                    }
                    for stmt in &case.body {
                        walk_or_stop!(walk_stmt(visitor, stmt));
                    }
                }
            }
            Stmt::Return(None) | Stmt::Break | Stmt::Continue | Stmt::Empty => {}
        },
    }
    visitor.leave_stmt(node);
    VisitResult::Continue
}

pub fn walk_local_var<V: Visitor>(visitor: &mut V, node: &LocalVar) -> VisitResult {
    match visitor.visit_local_var(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            walk_or_stop!(walk_type_ref(visitor, &node.ty));
            for var in &node.variables {
                if let Some(init) = &var.init {
                    walk_or_stop!(walk_expr(visitor, init));
                }
            }
        }
    }
    visitor.leave_local_var(node);
    VisitResult::Continue
}

// ============================================================================
// Expressions
// ============================================================================

/// Walk an [`Expr`].
///
/// Method calls and field accesses additionally get their dedicated
/// `visit_method_call` / `visit_field_access` callbacks, nested inside the
/// generic `visit_expr` / `leave_expr` pair.
pub fn walk_expr<V: Visitor>(visitor: &mut V, node: &Expr) -> VisitResult {
    match visitor.visit_expr(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => match node {
            Expr::Literal(_) | Expr::Name(_) | Expr::This => {}
            Expr::FieldAccess(f) => {
                walk_or_stop!(walk_field_access(visitor, f));
            }
            Expr::MethodCall(c) => {
                walk_or_stop!(walk_method_call(visitor, c));
            }
            Expr::New(n) => {
                walk_or_stop!(walk_type_ref(visitor, &n.ty));
                for arg in &n.args {
                    walk_or_stop!(walk_expr(visitor, arg));
                }
            }
            Expr::Assign(a) => {
                walk_or_stop!(walk_expr(visitor, &a.target));
                walk_or_stop!(walk_expr(visitor, &a.value));
            }
            Expr::Binary(b) => {
                walk_or_stop!(walk_expr(visitor, &b.lhs));
                walk_or_stop!(walk_expr(visitor, &b.rhs));
            }
            Expr::Unary(u) => {
                walk_or_stop!(walk_expr(visitor, &u.operand));
            }
            Expr::Cast(c) => {
                walk_or_stop!(walk_type_ref(visitor, &c.ty));
                walk_or_stop!(walk_expr(visitor, &c.expr));
            }
        },
    }
    visitor.leave_expr(node);
    VisitResult::Continue
}

pub fn walk_method_call<V: Visitor>(visitor: &mut V, node: &MethodCall) -> VisitResult {
    match visitor.visit_method_call(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            if let Some(receiver) = &node.receiver {
                walk_or_stop!(walk_expr(visitor, receiver));
            }
            for arg in &node.args {
                walk_or_stop!(walk_expr(visitor, arg));
            }
        }
    }
    visitor.leave_method_call(node);
    VisitResult::Continue
}

pub fn walk_field_access<V: Visitor>(visitor: &mut V, node: &FieldAccess) -> VisitResult {
    match visitor.visit_field_access(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            walk_or_stop!(walk_expr(visitor, &node.receiver));
        }
    }
    visitor.leave_field_access(node);
    VisitResult::Continue
}

/// Walk a [`TypeRef`] and its type arguments.
pub fn walk_type_ref<V: Visitor>(visitor: &mut V, node: &TypeRef) -> VisitResult {
    match visitor.visit_type_ref(node) {
        VisitResult::Stop => return VisitResult::Stop,
        VisitResult::SkipChildren => {}
        VisitResult::Continue => {
            for arg in &node.args {
                walk_or_stop!(walk_type_ref(visitor, arg));
            }
        }
    }
    visitor.leave_type_ref(node);
    VisitResult::Continue
}
