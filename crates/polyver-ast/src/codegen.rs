// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Source rendering.
//!
//! Trees render as Java-like text with 4-space indentation, one member per
//! line group and a blank line between members (consecutive fields stay
//! together). Rendering is a pure function of the tree, so it is stable across
//! runs.
//!
//! ```
//! use polyver_ast::{Codegen, CodegenState, Expr};
//!
//! let call = Expr::method_call(Expr::name("t"), "log", vec![Expr::int(123)]);
//! let mut state = CodegenState::default();
//! call.codegen(&mut state);
//! assert_eq!(state.to_string(), "t.log(123)");
//! ```

use std::fmt;

use crate::nodes::{
    Block, CompilationUnit, ConstructorDecl, Expr, FieldDecl, ForStmt, IfStmt, Literal, LocalVar,
    Member, MethodDecl, Modifiers, Param, Stmt, SwitchStmt, TypeDecl, TypeKind, TypeRef, UnaryOp,
    VarDeclarator,
};

/// Accumulates rendered text and the current indentation.
#[derive(Debug)]
pub struct CodegenState {
    pub tokens: String,
    pub indent_tokens: Vec<&'static str>,
    pub default_newline: &'static str,
    pub default_indent: &'static str,
}

impl Default for CodegenState {
    fn default() -> Self {
        Self {
            tokens: String::new(),
            indent_tokens: Vec::new(),
            default_newline: "\n",
            default_indent: "    ",
        }
    }
}

impl CodegenState {
    pub fn indent(&mut self) {
        self.indent_tokens.push(self.default_indent);
    }

    pub fn dedent(&mut self) {
        self.indent_tokens.pop();
    }

    pub fn add_indent(&mut self) {
        for token in &self.indent_tokens {
            self.tokens.push_str(token);
        }
    }

    pub fn add_token(&mut self, token: &str) {
        self.tokens.push_str(token);
    }

    pub fn newline(&mut self) {
        self.tokens.push_str(self.default_newline);
    }
}

impl fmt::Display for CodegenState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.tokens)
    }
}

/// A node that can render itself as source text.
pub trait Codegen {
    fn codegen(&self, state: &mut CodegenState);
}

/// Render a node to a fresh string.
pub fn render<N: Codegen + ?Sized>(node: &N) -> String {
    let mut state = CodegenState::default();
    node.codegen(&mut state);
    state.tokens
}

// ============================================================================
// Declarations
// ============================================================================

impl Codegen for CompilationUnit {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(package) = &self.package {
            state.add_token("package ");
            state.add_token(package);
            state.add_token(";");
            state.newline();
            state.newline();
        }
        if !self.imports.is_empty() {
            for import in &self.imports {
                state.add_token("import ");
                state.add_token(import);
                state.add_token(";");
                state.newline();
            }
            state.newline();
        }
        for (i, ty) in self.types.iter().enumerate() {
            if i > 0 {
                state.newline();
            }
            ty.codegen(state);
        }
    }
}

impl Codegen for Modifiers {
    fn codegen(&self, state: &mut CodegenState) {
        if let Some(keyword) = self.visibility.keyword() {
            state.add_token(keyword);
            state.add_token(" ");
        }
        if self.is_abstract {
            state.add_token("abstract ");
        }
        if self.is_static {
            state.add_token("static ");
        }
        if self.is_final {
            state.add_token("final ");
        }
    }
}

impl Codegen for TypeRef {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token(&self.to_string());
    }
}

impl Codegen for TypeDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_indent();
        self.modifiers.codegen(state);
        state.add_token(match self.kind {
            TypeKind::Class => "class ",
            TypeKind::Interface => "interface ",
        });
        state.add_token(&self.name);
        if let Some(extends) = &self.extends {
            state.add_token(" extends ");
            extends.codegen(state);
        }
        if !self.implements.is_empty() {
            state.add_token(" implements ");
            write_comma_separated(&self.implements, state);
        }
        state.add_token(" {");
        state.newline();

        state.indent();
        let mut prev: Option<&Member> = None;
        for member in &self.members {
            if let Some(prev) = prev {
                let both_fields = matches!(prev, Member::Field(_)) && matches!(member, Member::Field(_));
                if !both_fields {
                    state.newline();
                }
            }
            member.codegen(state);
            prev = Some(member);
        }
        state.dedent();

        state.add_indent();
        state.add_token("}");
        state.newline();
    }
}

impl Codegen for Member {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Member::Field(f) => f.codegen(state),
            Member::Method(m) => m.codegen(state),
            Member::Constructor(c) => c.codegen(state),
            Member::Type(t) => t.codegen(state),
        }
    }
}

impl Codegen for FieldDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_indent();
        self.modifiers.codegen(state);
        self.ty.codegen(state);
        state.add_token(" ");
        write_declarators(&self.variables, state);
        state.add_token(";");
        state.newline();
    }
}

impl Codegen for Param {
    fn codegen(&self, state: &mut CodegenState) {
        self.ty.codegen(state);
        state.add_token(" ");
        state.add_token(&self.name);
    }
}

impl Codegen for MethodDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_indent();
        self.modifiers.codegen(state);
        self.return_type.codegen(state);
        state.add_token(" ");
        state.add_token(&self.name);
        write_params(&self.params, state);
        match &self.body {
            Some(body) => {
                state.add_token(" ");
                body.codegen(state);
            }
            None => state.add_token(";"),
        }
        state.newline();
    }
}

impl Codegen for ConstructorDecl {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_indent();
        self.modifiers.codegen(state);
        state.add_token(&self.name);
        write_params(&self.params, state);
        state.add_token(" ");
        self.body.codegen(state);
        state.newline();
    }
}

fn write_params(params: &[Param], state: &mut CodegenState) {
    state.add_token("(");
    write_comma_separated(params, state);
    state.add_token(")");
}

fn write_comma_separated<N: Codegen>(nodes: &[N], state: &mut CodegenState) {
    for (i, node) in nodes.iter().enumerate() {
        if i > 0 {
            state.add_token(", ");
        }
        node.codegen(state);
    }
}

fn write_declarators(vars: &[VarDeclarator], state: &mut CodegenState) {
    for (i, var) in vars.iter().enumerate() {
        if i > 0 {
            state.add_token(", ");
        }
        state.add_token(&var.name);
        if let Some(init) = &var.init {
            state.add_token(" = ");
            init.codegen(state);
        }
    }
}

// ============================================================================
// Statements
// ============================================================================

/// Renders `{`, the indented statements, and the closing `}` at the current
/// indentation. The caller owns the text before `{` and after `}`.
impl Codegen for Block {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_token("{");
        state.newline();
        state.indent();
        for stmt in &self.stmts {
            stmt.codegen(state);
        }
        state.dedent();
        state.add_indent();
        state.add_token("}");
    }
}

/// A statement renders as one indented line (or line group) ending in a
/// newline.
impl Codegen for Stmt {
    fn codegen(&self, state: &mut CodegenState) {
        state.add_indent();
        write_stmt_inline(self, state);
        state.newline();
    }
}

/// Render a statement starting at the current column, without the trailing
/// newline.
fn write_stmt_inline(stmt: &Stmt, state: &mut CodegenState) {
    match stmt {
        Stmt::Expr(e) => {
            e.codegen(state);
            state.add_token(";");
        }
        Stmt::Local(local) => {
            write_local(local, state);
            state.add_token(";");
        }
        Stmt::Block(block) => block.codegen(state),
        Stmt::If(s) => write_if(s, state),
        Stmt::While(s) => {
            state.add_token("while (");
            s.cond.codegen(state);
            state.add_token(")");
            write_body(&s.body, state);
        }
        Stmt::For(s) => write_for(s, state),
        Stmt::Return(value) => {
            state.add_token("return");
            if let Some(value) = value {
                state.add_token(" ");
                value.codegen(state);
            }
            state.add_token(";");
        }
        Stmt::Switch(s) => write_switch(s, state),
        Stmt::Break => state.add_token("break;"),
        Stmt::Continue => state.add_token("continue;"),
        Stmt::Throw(e) => {
            state.add_token("throw ");
            e.codegen(state);
            state.add_token(";");
        }
        Stmt::Empty => state.add_token(";"),
    }
}

fn write_local(local: &LocalVar, state: &mut CodegenState) {
    local.ty.codegen(state);
    state.add_token(" ");
    write_declarators(&local.variables, state);
}

/// The body of a control statement: a block stays on the header line, any
/// other statement goes on its own indented line.
fn write_body(body: &Stmt, state: &mut CodegenState) {
    if let Stmt::Block(block) = body {
        state.add_token(" ");
        block.codegen(state);
    } else {
        state.newline();
        state.indent();
        state.add_indent();
        write_stmt_inline(body, state);
        state.dedent();
    }
}

fn write_if(s: &IfStmt, state: &mut CodegenState) {
    state.add_token("if (");
    s.cond.codegen(state);
    state.add_token(")");
    write_body(&s.then_branch, state);
    if let Some(else_branch) = &s.else_branch {
        if matches!(*s.then_branch, Stmt::Block(_)) {
            state.add_token(" ");
        } else {
            state.newline();
            state.add_indent();
        }
        state.add_token("else");
        match &**else_branch {
            Stmt::If(nested) => {
                state.add_token(" ");
                write_if(nested, state);
            }
            other => write_body(other, state),
        }
    }
}

/// A for header holds either one local declaration or a list of
/// expressions. Any other initializer is hoisted in front of the loop,
/// inside a block that keeps its scope.
fn write_for(s: &ForStmt, state: &mut CodegenState) {
    let inline = matches!(s.init.as_slice(), [Stmt::Local(_)])
        || s.init.iter().all(|stmt| matches!(stmt, Stmt::Expr(_)));
    if inline {
        write_for_loop(&s.init, s, state);
        return;
    }

    state.add_token("{");
    state.newline();
    state.indent();
    for stmt in &s.init {
        stmt.codegen(state);
    }
    state.add_indent();
    write_for_loop(&[], s, state);
    state.newline();
    state.dedent();
    state.add_indent();
    state.add_token("}");
}

fn write_for_loop(init: &[Stmt], s: &ForStmt, state: &mut CodegenState) {
    state.add_token("for (");
    for (i, stmt) in init.iter().enumerate() {
        match stmt {
            Stmt::Local(local) => write_local(local, state),
            Stmt::Expr(e) => {
                if i > 0 {
                    state.add_token(", ");
                }
                e.codegen(state);
            }
            _ => {}
        }
    }
    state.add_token(";");
    if let Some(cond) = &s.cond {
        state.add_token(" ");
        cond.codegen(state);
    }
    state.add_token(";");
    if !s.update.is_empty() {
        state.add_token(" ");
        write_comma_separated(&s.update, state);
    }
    state.add_token(")");
    write_body(&s.body, state);
}

fn write_switch(s: &SwitchStmt, state: &mut CodegenState) {
    state.add_token("switch (");
    s.selector.codegen(state);
    state.add_token(") {");
    state.newline();
    state.indent();
    for case in &s.cases {
        if case.labels.is_empty() {
            state.add_indent();
            state.add_token("default:");
            state.newline();
        }
        for label in &case.labels {
            state.add_indent();
            state.add_token("case ");
            label.codegen(state);
            state.add_token(":");
            state.newline();
        }
        state.indent();
        for stmt in &case.body {
            stmt.codegen(state);
        }
        state.dedent();
    }
    state.dedent();
    state.add_indent();
    state.add_token("}");
}

// ============================================================================
// Expressions
// ============================================================================

const PREC_ASSIGN: u8 = 0;
const PREC_UNARY: u8 = 7;
const PREC_PRIMARY: u8 = 8;

fn precedence(expr: &Expr) -> u8 {
    match expr {
        Expr::Assign(_) => PREC_ASSIGN,
        Expr::Binary(b) => b.op.precedence(),
        Expr::Unary(_) | Expr::Cast(_) => PREC_UNARY,
        Expr::Literal(_)
        | Expr::Name(_)
        | Expr::This
        | Expr::FieldAccess(_)
        | Expr::MethodCall(_)
        | Expr::New(_) => PREC_PRIMARY,
    }
}

impl Codegen for Expr {
    fn codegen(&self, state: &mut CodegenState) {
        write_expr(self, PREC_ASSIGN, state);
    }
}

/// Render `expr`, parenthesized when it binds looser than `min_prec`.
fn write_expr(expr: &Expr, min_prec: u8, state: &mut CodegenState) {
    let parens = precedence(expr) < min_prec;
    if parens {
        state.add_token("(");
    }
    match expr {
        Expr::Literal(lit) => lit.codegen(state),
        Expr::Name(name) => state.add_token(name),
        Expr::This => state.add_token("this"),
        Expr::FieldAccess(f) => {
            write_expr(&f.receiver, PREC_PRIMARY, state);
            state.add_token(".");
            state.add_token(&f.name);
        }
        Expr::MethodCall(c) => {
            if let Some(receiver) = &c.receiver {
                write_expr(receiver, PREC_PRIMARY, state);
                state.add_token(".");
            }
            state.add_token(&c.name);
            state.add_token("(");
            write_comma_separated(&c.args, state);
            state.add_token(")");
        }
        Expr::New(n) => {
            state.add_token("new ");
            n.ty.codegen(state);
            state.add_token("(");
            write_comma_separated(&n.args, state);
            state.add_token(")");
        }
        Expr::Assign(a) => {
            write_expr(&a.target, PREC_PRIMARY, state);
            state.add_token(" ");
            state.add_token(a.op.symbol());
            state.add_token(" ");
            write_expr(&a.value, PREC_ASSIGN, state);
        }
        Expr::Binary(b) => {
            let prec = b.op.precedence();
            write_expr(&b.lhs, prec, state);
            state.add_token(" ");
            state.add_token(b.op.symbol());
            state.add_token(" ");
            write_expr(&b.rhs, prec + 1, state);
        }
        Expr::Unary(u) => match u.op {
            UnaryOp::PostInc | UnaryOp::PostDec => {
                write_expr(&u.operand, PREC_PRIMARY, state);
                state.add_token(if u.op == UnaryOp::PostInc { "++" } else { "--" });
            }
            UnaryOp::Neg | UnaryOp::Not | UnaryOp::PreInc | UnaryOp::PreDec => {
                state.add_token(match u.op {
                    UnaryOp::Neg => "-",
                    UnaryOp::Not => "!",
                    UnaryOp::PreInc => "++",
                    _ => "--",
                });
                write_expr(&u.operand, PREC_UNARY, state);
            }
        },
        Expr::Cast(c) => {
            state.add_token("(");
            c.ty.codegen(state);
            state.add_token(") ");
            write_expr(&c.expr, PREC_UNARY, state);
        }
    }
    if parens {
        state.add_token(")");
    }
}

impl Codegen for Literal {
    fn codegen(&self, state: &mut CodegenState) {
        match self {
            Literal::Int(n) => state.add_token(&n.to_string()),
            Literal::Long(n) => {
                state.add_token(&n.to_string());
                state.add_token("L");
            }
            // Source text, suffix included.
            Literal::Float(text) | Literal::Double(text) => state.add_token(text),
            Literal::Bool(b) => state.add_token(if *b { "true" } else { "false" }),
            Literal::Char(c) => {
                state.add_token("'");
                state.add_token(&escape(&c.to_string(), '\''));
                state.add_token("'");
            }
            Literal::Str(s) => {
                state.add_token("\"");
                state.add_token(&escape(s, '"'));
                state.add_token("\"");
            }
            Literal::Null => state.add_token("null"),
        }
    }
}

fn escape(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            }
            c => out.push(c),
        }
    }
    out
}
