//! Static dispatch: pin unambiguous calls on versioned receivers.
//!
//! For a statement that consists solely of `recv.m(args)`, where `recv` is a
//! local or parameter of a versioned type, the resolver infers the static
//! type of every argument and looks for the single declaration of `m`
//! (across all versions) whose parameter types match exactly. When there is
//! exactly one, the statement becomes
//!
//! ```text
//! {
//!     recv.__switchToVersion(n);
//!     recv.m(args);
//! }
//! ```
//!
//! Inside a `for` initializer, which cannot hold a block, the switch and the
//! call are spliced into the initializer list instead.
//!
//! Anything the resolver cannot prove stays as written. The same pass also
//! strips version suffixes from every type reference, so that the rewritten
//! trees only mention base names.

use tracing::debug;

use polyver_ast::visitor::{rewrite_compilation_unit, Transform, Transformer};
use polyver_ast::{
    Block, CompilationUnit, ConstructorDecl, Expr, MethodCall, MethodDecl, Stmt, TypeDecl,
    TypeRef,
};

use crate::config::NamingConfig;
use crate::scope::ScopeStack;
use crate::symbols::MethodInfo;

/// Type string used for arguments whose static type cannot be inferred.
///
/// No declared parameter type can equal it, so a call with such an argument
/// never resolves.
pub const UNKNOWN_TYPE: &str = "UNKNOWN";

/// Rewrites uniquely resolvable call statements into pinned blocks.
pub struct StaticDispatchResolver<'t> {
    scope: ScopeStack<'t>,
    naming: &'t NamingConfig,
    pinned: usize,
    for_init_depth: usize,
}

impl<'t> StaticDispatchResolver<'t> {
    pub fn new(scope: ScopeStack<'t>, naming: &'t NamingConfig) -> Self {
        Self {
            scope,
            naming,
            pinned: 0,
            for_init_depth: 0,
        }
    }

    /// Rewrite one compilation unit.
    pub fn resolve(&mut self, unit: CompilationUnit) -> CompilationUnit {
        rewrite_compilation_unit(self, unit)
    }

    /// Number of calls pinned so far.
    pub fn pinned(&self) -> usize {
        self.pinned
    }

    /// Static type of an argument expression, as far as it can be inferred.
    fn infer_arg_type(&self, arg: &Expr) -> String {
        let inferred = match arg {
            Expr::Literal(lit) => lit.static_type(),
            Expr::Name(name) => self.scope.variable_type(name),
            _ => None,
        };
        inferred.unwrap_or(UNKNOWN_TYPE).to_string()
    }

    /// The single candidate `call` resolves to, if there is exactly one.
    fn resolve_call(&self, call: &MethodCall) -> Option<&'t MethodInfo> {
        let receiver = call.receiver_name()?;
        let class = self.scope.versioned_type_of(receiver)?;
        let arg_types: Vec<String> = call.args.iter().map(|a| self.infer_arg_type(a)).collect();

        let mut matches = class
            .methods_named(&call.name)
            .iter()
            .filter(|m| m.parameter_types == arg_types);
        let candidate = matches.next()?;
        if matches.next().is_some() {
            return None;
        }
        Some(candidate)
    }
}

impl Transformer for StaticDispatchResolver<'_> {
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

    fn enter_for_init(&mut self) {
        self.for_init_depth += 1;
    }

    fn leave_for_init(&mut self) {
        self.for_init_depth -= 1;
    }

    fn transform_stmt(&mut self, node: Stmt) -> Transform<Stmt> {
        let Some(call) = node.as_call() else {
            return Transform::Keep(node);
        };
        let (Some(target), Some(receiver)) = (self.resolve_call(call), call.receiver.as_deref())
        else {
            return Transform::Keep(node);
        };
        let Some(ordinal) = target.version.ordinal() else {
            return Transform::Keep(node);
        };

        debug!(
            receiver = ?receiver.as_name(),
            method = %call.name,
            version = ordinal,
            "pinned call"
        );
        self.pinned += 1;
        let switch = Stmt::expr(Expr::method_call(
            receiver.clone(),
            self.naming.switch_method.clone(),
            vec![Expr::int(i64::from(ordinal))],
        ));
        if self.for_init_depth > 0 {
            Transform::Flatten(vec![switch, node])
        } else {
            Transform::Keep(Stmt::Block(Block::new(vec![switch, node])))
        }
    }

    fn transform_type_ref(&mut self, node: TypeRef) -> TypeRef {
        TypeRef {
            name: self.scope.pattern().base_name(&node.name),
            ..node
        }
    }
}
