//! Field access rewriting for versioned receivers.
//!
//! Fields of a versioned type live on its per-version implementation
//! instances, so a direct access `recv.f` on a versioned receiver is
//! replaced by the synthesized accessors:
//!
//! | Source             | Rewritten                          |
//! |--------------------|------------------------------------|
//! | `recv.f`           | `recv.__get_f()`                   |
//! | `recv.f = v`       | `recv.__set_f(v)`                  |
//! | `recv.f += v`      | `recv.__set_f(recv.__get_f() + v)` |
//! | `recv.f++`         | `recv.__set_f(recv.__get_f() + 1)` |
//!
//! Only bare-identifier receivers whose declared type is versioned and
//! declares `f` public are rewritten.

use tracing::debug;

use polyver_ast::visitor::{rewrite_compilation_unit, Transformer};
use polyver_ast::{
    Assign, BinaryOp, CompilationUnit, ConstructorDecl, Expr, FieldAccess, MethodDecl, TypeDecl,
    Unary, UnaryOp,
};

use crate::config::NamingConfig;
use crate::scope::ScopeStack;

/// Rewrites versioned field reads and writes into accessor calls.
pub struct FieldAccessRewriter<'t> {
    scope: ScopeStack<'t>,
    naming: &'t NamingConfig,
    rewritten: usize,
}

impl<'t> FieldAccessRewriter<'t> {
    pub fn new(scope: ScopeStack<'t>, naming: &'t NamingConfig) -> Self {
        Self {
            scope,
            naming,
            rewritten: 0,
        }
    }

    /// Rewrite one compilation unit.
    pub fn rewrite(&mut self, unit: CompilationUnit) -> CompilationUnit {
        rewrite_compilation_unit(self, unit)
    }

    /// Number of accesses rewritten so far.
    pub fn rewritten(&self) -> usize {
        self.rewritten
    }

    /// Whether `access` reaches a public field of a versioned receiver.
    fn is_versioned_field(&self, access: &FieldAccess) -> bool {
        access
            .receiver
            .as_name()
            .and_then(|name| self.scope.versioned_type_of(name))
            .is_some_and(|class| class.accessor_owner(&access.name).is_some())
    }

    fn getter_call(&self, access: &FieldAccess) -> Expr {
        Expr::method_call(
            (*access.receiver).clone(),
            self.naming.getter(&access.name),
            vec![],
        )
    }

    fn setter_call(&self, access: &FieldAccess, value: Expr) -> Expr {
        Expr::method_call(
            (*access.receiver).clone(),
            self.naming.setter(&access.name),
            vec![value],
        )
    }

    fn record(&mut self, access: &FieldAccess, kind: &'static str) {
        self.rewritten += 1;
        debug!(
            receiver = ?access.receiver.as_name(),
            field = %access.name,
            kind,
            "rewrote field access"
        );
    }

    fn rewrite_assign(&mut self, assign: Assign) -> Expr {
        let access = match *assign.target {
            Expr::FieldAccess(access) if self.is_versioned_field(&access) => access,
            target => {
                return Expr::Assign(Assign {
                    target: Box::new(target),
                    ..assign
                })
            }
        };
        let value = match assign.op.binary_op() {
            None => *assign.value,
            Some(op) => Expr::binary(op, self.getter_call(&access), *assign.value),
        };
        self.record(&access, "write");
        self.setter_call(&access, value)
    }

    fn rewrite_step(&mut self, unary: Unary) -> Expr {
        let op = match unary.op {
            UnaryOp::PreInc | UnaryOp::PostInc => BinaryOp::Add,
            UnaryOp::PreDec | UnaryOp::PostDec => BinaryOp::Sub,
            UnaryOp::Neg | UnaryOp::Not => return Expr::Unary(unary),
        };
        let access = match *unary.operand {
            Expr::FieldAccess(access) if self.is_versioned_field(&access) => access,
            operand => {
                return Expr::Unary(Unary {
                    op: unary.op,
                    operand: Box::new(operand),
                })
            }
        };
        let value = Expr::binary(op, self.getter_call(&access), Expr::int(1));
        self.record(&access, "step");
        self.setter_call(&access, value)
    }
}

impl Transformer for FieldAccessRewriter<'_> {
    fn enter_type_decl(&mut self, node: &TypeDecl) {
        self.scope.push_type(&node.name);
    }

    fn leave_type_decl(&mut self, _node: &TypeDecl) {
        self.scope.pop();
    }

    fn enter_method_decl(&mut self, node: &MethodDecl) {
        self.scope.push_method_decl(node);
    }

    fn leave_method_decl(&mut self, _node: &MethodDecl) {
        self.scope.pop();
    }

    fn enter_constructor_decl(&mut self, _node: &ConstructorDecl) {
        self.scope.push_constructor();
    }

    fn leave_constructor_decl(&mut self, _node: &ConstructorDecl) {
        self.scope.pop();
    }

    // Write positions are handled by the enclosing assignment or step.
    fn transform_assign_target(&mut self, node: Expr) -> Expr {
        node
    }

    fn transform_expr(&mut self, node: Expr) -> Expr {
        match node {
            Expr::FieldAccess(access) if self.is_versioned_field(&access) => {
                self.record(&access, "read");
                self.getter_call(&access)
            }
            Expr::Assign(assign) => self.rewrite_assign(assign),
            Expr::Unary(unary) => self.rewrite_step(unary),
            other => other,
        }
    }
}
