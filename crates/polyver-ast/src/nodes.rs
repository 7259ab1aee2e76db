// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Syntax tree node types.
//!
//! The tree models the subset of a Java-like language that the versioned-type
//! transformation reads and synthesizes: one [`CompilationUnit`] per input
//! file, holding top-level [`TypeDecl`]s with fields, methods, constructors
//! and nested types.
//!
//! Every node is owned, `Clone` and `PartialEq`. Cloning a subtree yields a
//! structurally independent copy, so a synthesized tree never shares nodes
//! with its inputs. All nodes derive `serde` so that an external parser can
//! hand trees over as JSON.

use std::fmt;

use serde::{Deserialize, Serialize};

// ============================================================================
// Modifiers
// ============================================================================

/// Access level of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    Protected,
    Private,
    /// No access keyword.
    #[default]
    Package,
}

impl Visibility {
    /// The keyword for this access level, if it has one.
    pub fn keyword(self) -> Option<&'static str> {
        match self {
            Visibility::Public => Some("public"),
            Visibility::Protected => Some("protected"),
            Visibility::Private => Some("private"),
            Visibility::Package => None,
        }
    }
}

/// Declaration modifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Modifiers {
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_final: bool,
    pub is_abstract: bool,
}

impl Modifiers {
    /// `public` with no other modifiers.
    pub fn public() -> Self {
        Self {
            visibility: Visibility::Public,
            ..Self::default()
        }
    }

    /// `private` with no other modifiers.
    pub fn private() -> Self {
        Self {
            visibility: Visibility::Private,
            ..Self::default()
        }
    }

    /// Add `static`.
    pub fn with_static(mut self) -> Self {
        self.is_static = true;
        self
    }

    /// Add `final`.
    pub fn with_final(mut self) -> Self {
        self.is_final = true;
        self
    }

    pub fn is_public(&self) -> bool {
        self.visibility == Visibility::Public
    }
}

// ============================================================================
// Types
// ============================================================================

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A reference to a type, as written in an annotation or construction.
///
/// The [`Display`](fmt::Display) rendering (`List<String>[]`) is the canonical
/// type string used for signature comparison.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub args: Vec<TypeRef>,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub array_dims: u32,
}

impl TypeRef {
    /// A plain named type with no type arguments.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            args: Vec::new(),
            array_dims: 0,
        }
    }

    pub fn void() -> Self {
        Self::new("void")
    }

    /// Attach type arguments.
    pub fn with_args(mut self, args: Vec<TypeRef>) -> Self {
        self.args = args;
        self
    }

    /// Wrap in one more array dimension.
    pub fn array_of(mut self) -> Self {
        self.array_dims += 1;
        self
    }

    pub fn is_void(&self) -> bool {
        self.name == "void" && self.args.is_empty() && self.array_dims == 0
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)?;
        if !self.args.is_empty() {
            f.write_str("<")?;
            for (i, arg) in self.args.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{}", arg)?;
            }
            f.write_str(">")?;
        }
        for _ in 0..self.array_dims {
            f.write_str("[]")?;
        }
        Ok(())
    }
}

// ============================================================================
// Expressions
// ============================================================================

/// A literal value.
///
/// Floating-point literals keep their source text so that trees stay `Eq`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Literal {
    Int(i64),
    Long(i64),
    Float(String),
    Double(String),
    Bool(bool),
    Char(char),
    Str(String),
    Null,
}

impl Literal {
    /// The intrinsic type of the literal; `null` has none.
    pub fn static_type(&self) -> Option<&'static str> {
        match self {
            Literal::Int(_) => Some("int"),
            Literal::Long(_) => Some("long"),
            Literal::Float(_) => Some("float"),
            Literal::Double(_) => Some("double"),
            Literal::Bool(_) => Some("boolean"),
            Literal::Char(_) => Some("char"),
            Literal::Str(_) => Some("String"),
            Literal::Null => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Eq,
    Ne,
    Lt,
    Le,
    Gt,
    Ge,
    And,
    Or,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Div => "/",
            BinaryOp::Rem => "%",
            BinaryOp::Eq => "==",
            BinaryOp::Ne => "!=",
            BinaryOp::Lt => "<",
            BinaryOp::Le => "<=",
            BinaryOp::Gt => ">",
            BinaryOp::Ge => ">=",
            BinaryOp::And => "&&",
            BinaryOp::Or => "||",
        }
    }

    /// Binding strength; higher binds tighter.
    pub fn precedence(self) -> u8 {
        match self {
            BinaryOp::Or => 1,
            BinaryOp::And => 2,
            BinaryOp::Eq | BinaryOp::Ne => 3,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => 4,
            BinaryOp::Add | BinaryOp::Sub => 5,
            BinaryOp::Mul | BinaryOp::Div | BinaryOp::Rem => 6,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnaryOp {
    Neg,
    Not,
    PreInc,
    PreDec,
    PostInc,
    PostDec,
}

/// Assignment operator (`=` or a compound form).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssignOp {
    #[default]
    Assign,
    Add,
    Sub,
    Mul,
    Div,
    Rem,
}

impl AssignOp {
    pub fn symbol(self) -> &'static str {
        match self {
            AssignOp::Assign => "=",
            AssignOp::Add => "+=",
            AssignOp::Sub => "-=",
            AssignOp::Mul => "*=",
            AssignOp::Div => "/=",
            AssignOp::Rem => "%=",
        }
    }

    /// The binary operator a compound assignment applies, `None` for `=`.
    pub fn binary_op(self) -> Option<BinaryOp> {
        match self {
            AssignOp::Assign => None,
            AssignOp::Add => Some(BinaryOp::Add),
            AssignOp::Sub => Some(BinaryOp::Sub),
            AssignOp::Mul => Some(BinaryOp::Mul),
            AssignOp::Div => Some(BinaryOp::Div),
            AssignOp::Rem => Some(BinaryOp::Rem),
        }
    }
}

/// `receiver.name`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldAccess {
    pub receiver: Box<Expr>,
    pub name: String,
}

/// `[receiver.]name(args)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodCall {
    #[serde(default)]
    pub receiver: Option<Box<Expr>>,
    pub name: String,
    #[serde(default)]
    pub args: Vec<Expr>,
}

impl MethodCall {
    /// The receiver when it is a bare identifier.
    pub fn receiver_name(&self) -> Option<&str> {
        self.receiver.as_deref().and_then(Expr::as_name)
    }
}

/// `new Type(args)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NewObject {
    pub ty: TypeRef,
    #[serde(default)]
    pub args: Vec<Expr>,
}

/// `target op value`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assign {
    pub target: Box<Expr>,
    #[serde(default)]
    pub op: AssignOp,
    pub value: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Binary {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Unary {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
}

/// `(Type) expr`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cast {
    pub ty: TypeRef,
    pub expr: Box<Expr>,
}

/// An expression.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Expr {
    Literal(Literal),
    Name(String),
    This,
    FieldAccess(FieldAccess),
    MethodCall(MethodCall),
    New(NewObject),
    Assign(Assign),
    Binary(Binary),
    Unary(Unary),
    Cast(Cast),
}

impl Expr {
    pub fn name(name: impl Into<String>) -> Self {
        Expr::Name(name.into())
    }

    pub fn int(value: i64) -> Self {
        Expr::Literal(Literal::Int(value))
    }

    pub fn string(value: impl Into<String>) -> Self {
        Expr::Literal(Literal::Str(value.into()))
    }

    /// `receiver.name`
    pub fn field(receiver: Expr, name: impl Into<String>) -> Self {
        Expr::FieldAccess(FieldAccess {
            receiver: Box::new(receiver),
            name: name.into(),
        })
    }

    /// `this.name`
    pub fn this_field(name: impl Into<String>) -> Self {
        Self::field(Expr::This, name)
    }

    /// `receiver.name(args)`
    pub fn method_call(receiver: Expr, name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall(MethodCall {
            receiver: Some(Box::new(receiver)),
            name: name.into(),
            args,
        })
    }

    /// `name(args)` with no receiver.
    pub fn call(name: impl Into<String>, args: Vec<Expr>) -> Self {
        Expr::MethodCall(MethodCall {
            receiver: None,
            name: name.into(),
            args,
        })
    }

    pub fn new_object(ty: TypeRef, args: Vec<Expr>) -> Self {
        Expr::New(NewObject { ty, args })
    }

    /// `target = value`
    pub fn assign(target: Expr, value: Expr) -> Self {
        Expr::Assign(Assign {
            target: Box::new(target),
            op: AssignOp::Assign,
            value: Box::new(value),
        })
    }

    pub fn binary(op: BinaryOp, lhs: Expr, rhs: Expr) -> Self {
        Expr::Binary(Binary {
            op,
            lhs: Box::new(lhs),
            rhs: Box::new(rhs),
        })
    }

    /// The identifier, if this is a bare name.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Expr::Name(name) => Some(name),
            _ => None,
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// One declared variable: `name [= init]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct VarDeclarator {
    pub name: String,
    #[serde(default)]
    pub init: Option<Expr>,
}

impl VarDeclarator {
    pub fn new(name: impl Into<String>, init: Option<Expr>) -> Self {
        Self {
            name: name.into(),
            init,
        }
    }
}

/// A local variable declaration statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LocalVar {
    pub ty: TypeRef,
    pub variables: Vec<VarDeclarator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct IfStmt {
    pub cond: Expr,
    pub then_branch: Box<Stmt>,
    #[serde(default)]
    pub else_branch: Option<Box<Stmt>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Box<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ForStmt {
    #[serde(default)]
    pub init: Vec<Stmt>,
    #[serde(default)]
    pub cond: Option<Expr>,
    #[serde(default)]
    pub update: Vec<Expr>,
    pub body: Box<Stmt>,
}

/// One arm of a switch; empty `labels` is the `default` arm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchCase {
    #[serde(default)]
    pub labels: Vec<Expr>,
    #[serde(default)]
    pub body: Vec<Stmt>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SwitchStmt {
    pub selector: Expr,
    pub cases: Vec<SwitchCase>,
}

/// `{ stmts }`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Block {
    pub stmts: Vec<Stmt>,
}

impl Block {
    pub fn new(stmts: Vec<Stmt>) -> Self {
        Self { stmts }
    }
}

/// A statement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stmt {
    Expr(Expr),
    Local(LocalVar),
    Block(Block),
    If(IfStmt),
    While(WhileStmt),
    For(ForStmt),
    Return(Option<Expr>),
    Switch(SwitchStmt),
    Break,
    Continue,
    Throw(Expr),
    Empty,
}

impl Stmt {
    pub fn expr(expr: Expr) -> Self {
        Stmt::Expr(expr)
    }

    /// `ty name = init;`
    pub fn local(ty: TypeRef, name: impl Into<String>, init: Option<Expr>) -> Self {
        Stmt::Local(LocalVar {
            ty,
            variables: vec![VarDeclarator::new(name, init)],
        })
    }

    /// The call, if this statement consists solely of a method invocation.
    pub fn as_call(&self) -> Option<&MethodCall> {
        match self {
            Stmt::Expr(Expr::MethodCall(call)) => Some(call),
            _ => None,
        }
    }
}

// ============================================================================
// Declarations
// ============================================================================

/// A field declaration; one declaration may introduce several variables.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FieldDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub ty: TypeRef,
    pub variables: Vec<VarDeclarator>,
}

impl FieldDecl {
    /// A single-variable field without initializer.
    pub fn new(modifiers: Modifiers, ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            modifiers,
            ty,
            variables: vec![VarDeclarator::new(name, None)],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Param {
    pub ty: TypeRef,
    pub name: String,
}

impl Param {
    pub fn new(ty: TypeRef, name: impl Into<String>) -> Self {
        Self {
            ty,
            name: name.into(),
        }
    }
}

/// Canonical type strings of a parameter list.
pub fn param_types(params: &[Param]) -> Vec<String> {
    params.iter().map(|p| p.ty.to_string()).collect()
}

/// A method; `body` is `None` for abstract and interface methods.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MethodDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub return_type: TypeRef,
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub body: Option<Block>,
}

impl MethodDecl {
    pub fn param_types(&self) -> Vec<String> {
        param_types(&self.params)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ConstructorDecl {
    #[serde(default)]
    pub modifiers: Modifiers,
    pub name: String,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub body: Block,
}

impl ConstructorDecl {
    pub fn param_types(&self) -> Vec<String> {
        param_types(&self.params)
    }
}

/// A member of a type body.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Member {
    Field(FieldDecl),
    Method(MethodDecl),
    Constructor(ConstructorDecl),
    Type(TypeDecl),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeKind {
    #[default]
    Class,
    Interface,
}

/// A class or interface declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TypeDecl {
    #[serde(default)]
    pub kind: TypeKind,
    #[serde(default)]
    pub modifiers: Modifiers,
    pub name: String,
    #[serde(default)]
    pub extends: Option<TypeRef>,
    #[serde(default)]
    pub implements: Vec<TypeRef>,
    #[serde(default)]
    pub members: Vec<Member>,
}

impl TypeDecl {
    /// An empty class.
    pub fn class(name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            kind: TypeKind::Class,
            modifiers,
            name: name.into(),
            extends: None,
            implements: Vec::new(),
            members: Vec::new(),
        }
    }

    /// An empty interface.
    pub fn interface(name: impl Into<String>, modifiers: Modifiers) -> Self {
        Self {
            kind: TypeKind::Interface,
            ..Self::class(name, modifiers)
        }
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn methods(&self) -> impl Iterator<Item = &MethodDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn methods_mut(&mut self) -> impl Iterator<Item = &mut MethodDecl> {
        self.members.iter_mut().filter_map(|m| match m {
            Member::Method(method) => Some(method),
            _ => None,
        })
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Field(field) => Some(field),
            _ => None,
        })
    }

    pub fn constructors(&self) -> impl Iterator<Item = &ConstructorDecl> {
        self.members.iter().filter_map(|m| match m {
            Member::Constructor(ctor) => Some(ctor),
            _ => None,
        })
    }

    /// Find a directly nested type by name and kind.
    pub fn nested_type_mut(&mut self, name: &str, kind: TypeKind) -> Option<&mut TypeDecl> {
        self.members.iter_mut().find_map(|m| match m {
            Member::Type(ty) if ty.kind == kind && ty.name == name => Some(ty),
            _ => None,
        })
    }

    pub fn nested_type(&self, name: &str, kind: TypeKind) -> Option<&TypeDecl> {
        self.members.iter().find_map(|m| match m {
            Member::Type(ty) if ty.kind == kind && ty.name == name => Some(ty),
            _ => None,
        })
    }

    /// Whether a method with this name and parameter types is declared.
    pub fn has_method(&self, name: &str, param_types: &[String]) -> bool {
        self.methods()
            .any(|m| m.name == name && m.param_types() == param_types)
    }
}

/// One source file: an optional package, imports, and top-level types.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CompilationUnit {
    #[serde(default)]
    pub package: Option<String>,
    #[serde(default)]
    pub imports: Vec<String>,
    #[serde(default)]
    pub types: Vec<TypeDecl>,
}

impl CompilationUnit {
    /// A unit holding a single top-level type.
    pub fn with_type(package: Option<String>, ty: TypeDecl) -> Self {
        Self {
            package,
            imports: Vec::new(),
            types: vec![ty],
        }
    }

    /// The first public top-level type, falling back to the first type.
    pub fn primary_type(&self) -> Option<&TypeDecl> {
        self.types
            .iter()
            .find(|t| t.modifiers.is_public())
            .or_else(|| self.types.first())
    }

    /// Name of the primary type.
    pub fn primary_type_name(&self) -> Option<&str> {
        self.primary_type().map(|t| t.name.as_str())
    }
}
