// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Rewrite functions for owned, post-order transformation.
//!
//! Each `rewrite_*` function takes a node by value, rewrites its children,
//! then hands the rebuilt node to the matching `transform_*` hook. Scope
//! hooks wrap the children of type, method and constructor declarations:
//!
//! 1. `enter_*` with the original node
//! 2. children rewritten
//! 3. `leave_*` with the rebuilt node
//! 4. `transform_*` (types) or `transform_member` (methods, constructors)
//!
//! Statements in list contexts (block bodies, switch arms, `for`
//! initializers) honor [`Transform::Remove`] and [`Transform::Flatten`].
//! Where a single statement is required (`if` branches, loop bodies), a
//! removed statement becomes [`Stmt::Empty`] and a flattened one becomes a
//! [`Stmt::Block`].

use super::traits::{Transform, Transformer};
use crate::nodes::{
    Assign, Binary, Block, Cast, CompilationUnit, ConstructorDecl, Expr, FieldAccess, FieldDecl,
    ForStmt, IfStmt, LocalVar, Member, MethodCall, MethodDecl, NewObject, Param, Stmt,
    SwitchCase, SwitchStmt, TypeDecl, TypeRef, Unary, UnaryOp, VarDeclarator, WhileStmt,
};

// ============================================================================
// Declarations
// ============================================================================

/// Rewrite every top-level type of a [`CompilationUnit`].
pub fn rewrite_compilation_unit<T: Transformer + ?Sized>(
    t: &mut T,
    node: CompilationUnit,
) -> CompilationUnit {
    let types = node
        .types
        .into_iter()
        .map(|ty| rewrite_type_decl(t, ty))
        .collect();
    t.transform_compilation_unit(CompilationUnit { types, ..node })
}

pub fn rewrite_type_decl<T: Transformer + ?Sized>(t: &mut T, node: TypeDecl) -> TypeDecl {
    t.enter_type_decl(&node);
    let TypeDecl {
        kind,
        modifiers,
        name,
        extends,
        implements,
        members,
    } = node;
    let extends = extends.map(|ty| rewrite_type_ref(t, ty));
    let implements = implements
        .into_iter()
        .map(|ty| rewrite_type_ref(t, ty))
        .collect();
    let mut rewritten = Vec::with_capacity(members.len());
    for member in members {
        rewrite_member(t, member).extend_into(&mut rewritten);
    }
    let node = TypeDecl {
        kind,
        modifiers,
        name,
        extends,
        implements,
        members: rewritten,
    };
    t.leave_type_decl(&node);
    t.transform_type_decl(node)
}

/// Rewrite a [`Member`] in its type body.
pub fn rewrite_member<T: Transformer + ?Sized>(t: &mut T, node: Member) -> Transform<Member> {
    let member = match node {
        Member::Field(f) => Member::Field(rewrite_field_decl(t, f)),
        Member::Method(m) => Member::Method(rewrite_method_decl(t, m)),
        Member::Constructor(c) => Member::Constructor(rewrite_constructor_decl(t, c)),
        Member::Type(ty) => Member::Type(rewrite_type_decl(t, ty)),
    };
    t.transform_member(member)
}

pub fn rewrite_field_decl<T: Transformer + ?Sized>(t: &mut T, node: FieldDecl) -> FieldDecl {
    FieldDecl {
        modifiers: node.modifiers,
        ty: rewrite_type_ref(t, node.ty),
        variables: rewrite_declarators(t, node.variables),
    }
}

pub fn rewrite_method_decl<T: Transformer + ?Sized>(t: &mut T, node: MethodDecl) -> MethodDecl {
    t.enter_method_decl(&node);
    let node = MethodDecl {
        modifiers: node.modifiers,
        return_type: rewrite_type_ref(t, node.return_type),
        name: node.name,
        params: rewrite_params(t, node.params),
        body: node.body.map(|b| rewrite_block(t, b)),
    };
    t.leave_method_decl(&node);
    node
}

pub fn rewrite_constructor_decl<T: Transformer + ?Sized>(
    t: &mut T,
    node: ConstructorDecl,
) -> ConstructorDecl {
    t.enter_constructor_decl(&node);
    let node = ConstructorDecl {
        modifiers: node.modifiers,
        name: node.name,
        params: rewrite_params(t, node.params),
        body: rewrite_block(t, node.body),
    };
    t.leave_constructor_decl(&node);
    node
}

fn rewrite_params<T: Transformer + ?Sized>(t: &mut T, params: Vec<Param>) -> Vec<Param> {
    params
        .into_iter()
        .map(|p| Param {
            ty: rewrite_type_ref(t, p.ty),
            name: p.name,
        })
        .collect()
}

fn rewrite_declarators<T: Transformer + ?Sized>(
    t: &mut T,
    vars: Vec<VarDeclarator>,
) -> Vec<VarDeclarator> {
    vars.into_iter()
        .map(|v| VarDeclarator {
            name: v.name,
            init: v.init.map(|e| rewrite_expr(t, e)),
        })
        .collect()
}

// ============================================================================
// Statements
// ============================================================================

pub fn rewrite_block<T: Transformer + ?Sized>(t: &mut T, node: Block) -> Block {
    Block::new(rewrite_stmt_list(t, node.stmts))
}

/// Rewrite a statement list, applying removals and flattening.
pub fn rewrite_stmt_list<T: Transformer + ?Sized>(t: &mut T, stmts: Vec<Stmt>) -> Vec<Stmt> {
    let mut out = Vec::with_capacity(stmts.len());
    for stmt in stmts {
        rewrite_stmt(t, stmt).extend_into(&mut out);
    }
    out
}

/// Rewrite the initializer list of a `for` statement between the
/// `enter_for_init`/`leave_for_init` hooks.
pub fn rewrite_for_init<T: Transformer + ?Sized>(t: &mut T, init: Vec<Stmt>) -> Vec<Stmt> {
    t.enter_for_init();
    let init = rewrite_stmt_list(t, init);
    t.leave_for_init();
    init
}

/// Rewrite a [`Stmt`] in a list context.
pub fn rewrite_stmt<T: Transformer + ?Sized>(t: &mut T, node: Stmt) -> Transform<Stmt> {
    let stmt = match node {
        Stmt::Expr(e) => Stmt::Expr(rewrite_expr(t, e)),
        Stmt::Local(local) => Stmt::Local(LocalVar {
            ty: rewrite_type_ref(t, local.ty),
            variables: rewrite_declarators(t, local.variables),
        }),
        Stmt::Block(block) => Stmt::Block(rewrite_block(t, block)),
        Stmt::If(s) => Stmt::If(IfStmt {
            cond: rewrite_expr(t, s.cond),
            then_branch: Box::new(rewrite_single_stmt(t, *s.then_branch)),
            else_branch: s
                .else_branch
                .map(|e| Box::new(rewrite_single_stmt(t, *e))),
        }),
        Stmt::While(s) => Stmt::While(WhileStmt {
            cond: rewrite_expr(t, s.cond),
            body: Box::new(rewrite_single_stmt(t, *s.body)),
        }),
        Stmt::For(s) => Stmt::For(ForStmt {
            init: rewrite_for_init(t, s.init),
            cond: s.cond.map(|c| rewrite_expr(t, c)),
            update: s.update.into_iter().map(|u| rewrite_expr(t, u)).collect(),
            body: Box::new(rewrite_single_stmt(t, *s.body)),
        }),
        Stmt::Return(e) => Stmt::Return(e.map(|e| rewrite_expr(t, e))),
        Stmt::Switch(s) => Stmt::Switch(SwitchStmt {
            selector: rewrite_expr(t, s.selector),
            cases: s
                .cases
                .into_iter()
                .map(|case| SwitchCase {
                    labels: case.labels.into_iter().map(|l| rewrite_expr(t, l)).collect(),
                    body: rewrite_stmt_list(t, case.body),
                })
                .collect(),
        }),
        Stmt::Throw(e) => Stmt::Throw(rewrite_expr(t, e)),
        Stmt::Break | Stmt::Continue | Stmt::Empty => node,
    };
    t.transform_stmt(stmt)
}

/// Rewrite a statement where exactly one statement is required.
pub fn rewrite_single_stmt<T: Transformer + ?Sized>(t: &mut T, node: Stmt) -> Stmt {
    match rewrite_stmt(t, node) {
        Transform::Keep(stmt) => stmt,
        Transform::Remove => Stmt::Empty,
        Transform::Flatten(stmts) => Stmt::Block(Block::new(stmts)),
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// Rewrite an [`Expr`]: children first, then `transform_expr`.
pub fn rewrite_expr<T: Transformer + ?Sized>(t: &mut T, node: Expr) -> Expr {
    let expr = rewrite_expr_children(t, node);
    t.transform_expr(expr)
}

/// Rewrite a write position: children first, then `transform_assign_target`.
fn rewrite_target<T: Transformer + ?Sized>(t: &mut T, node: Expr) -> Expr {
    let expr = rewrite_expr_children(t, node);
    t.transform_assign_target(expr)
}

fn rewrite_expr_children<T: Transformer + ?Sized>(t: &mut T, node: Expr) -> Expr {
    match node {
        Expr::Literal(_) | Expr::Name(_) | Expr::This => node,
        Expr::FieldAccess(f) => Expr::FieldAccess(FieldAccess {
            receiver: Box::new(rewrite_expr(t, *f.receiver)),
            name: f.name,
        }),
        Expr::MethodCall(c) => Expr::MethodCall(MethodCall {
            receiver: c.receiver.map(|r| Box::new(rewrite_expr(t, *r))),
            name: c.name,
            args: c.args.into_iter().map(|a| rewrite_expr(t, a)).collect(),
        }),
        Expr::New(n) => Expr::New(NewObject {
            ty: rewrite_type_ref(t, n.ty),
            args: n.args.into_iter().map(|a| rewrite_expr(t, a)).collect(),
        }),
        Expr::Assign(a) => Expr::Assign(Assign {
            target: Box::new(rewrite_target(t, *a.target)),
            op: a.op,
            value: Box::new(rewrite_expr(t, *a.value)),
        }),
        Expr::Binary(b) => Expr::Binary(Binary {
            op: b.op,
            lhs: Box::new(rewrite_expr(t, *b.lhs)),
            rhs: Box::new(rewrite_expr(t, *b.rhs)),
        }),
        Expr::Unary(u) => {
            // Increment and decrement write their operand.
            let operand = match u.op {
                UnaryOp::PreInc | UnaryOp::PreDec | UnaryOp::PostInc | UnaryOp::PostDec => {
                    rewrite_target(t, *u.operand)
                }
                UnaryOp::Neg | UnaryOp::Not => rewrite_expr(t, *u.operand),
            };
            Expr::Unary(Unary {
                op: u.op,
                operand: Box::new(operand),
            })
        }
        Expr::Cast(c) => Expr::Cast(Cast {
            ty: rewrite_type_ref(t, c.ty),
            expr: Box::new(rewrite_expr(t, *c.expr)),
        }),
    }
}

/// Rewrite a [`TypeRef`], including its type arguments.
pub fn rewrite_type_ref<T: Transformer + ?Sized>(t: &mut T, node: TypeRef) -> TypeRef {
    let args = node
        .args
        .into_iter()
        .map(|a| rewrite_type_ref(t, a))
        .collect();
    t.transform_type_ref(TypeRef { args, ..node })
}
