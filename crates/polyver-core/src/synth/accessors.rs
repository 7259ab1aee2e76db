//! Accessor synthesis for fields of versioned types.
//!
//! Rewritten field accesses call `__get_<f>()` and `__set_<f>(value)` on the
//! outer type. Both switch to the lowest version that declares `f` public
//! before touching the field through that version's instance. Fields no
//! version declares public get no accessors.

use polyver_ast::{Block, Expr, Member, MethodDecl, Modifiers, Param, Stmt, TypeDecl, TypeRef};

use super::VersionedDecl;
use crate::config::NamingConfig;
use crate::symbols::ClassInfo;

pub struct AccessorGenerator<'a> {
    naming: &'a NamingConfig,
}

impl<'a> AccessorGenerator<'a> {
    pub fn new(naming: &'a NamingConfig) -> Self {
        Self { naming }
    }

    /// Append a getter and a setter for every public field name of `class`.
    pub fn generate(&self, outer: &mut TypeDecl, class: &ClassInfo, versions: &[VersionedDecl]) {
        for name in class.fields.keys() {
            let Some((ordinal, info)) = class.accessor_owner(name) else {
                continue;
            };
            let ty = declared_type(versions, ordinal, name)
                .unwrap_or_else(|| TypeRef::new(&info.ty));
            outer
                .members
                .push(Member::Method(self.getter(name, &ty, ordinal)));
            outer
                .members
                .push(Member::Method(self.setter(name, ty, ordinal)));
        }
    }

    fn switch_to(&self, ordinal: u32) -> Stmt {
        Stmt::expr(Expr::method_call(
            Expr::This,
            &self.naming.switch_method,
            vec![Expr::int(i64::from(ordinal))],
        ))
    }

    /// `this.v<n>_instance.<field>`
    fn field_through_instance(&self, field: &str, ordinal: u32) -> Expr {
        Expr::field(Expr::this_field(self.naming.instance_field(ordinal)), field)
    }

    fn getter(&self, field: &str, ty: &TypeRef, ordinal: u32) -> MethodDecl {
        MethodDecl {
            modifiers: Modifiers::public(),
            return_type: ty.clone(),
            name: self.naming.getter(field),
            params: Vec::new(),
            body: Some(Block::new(vec![
                self.switch_to(ordinal),
                Stmt::Return(Some(self.field_through_instance(field, ordinal))),
            ])),
        }
    }

    fn setter(&self, field: &str, ty: TypeRef, ordinal: u32) -> MethodDecl {
        MethodDecl {
            modifiers: Modifiers::public(),
            return_type: TypeRef::void(),
            name: self.naming.setter(field),
            params: vec![Param::new(ty, "value")],
            body: Some(Block::new(vec![
                self.switch_to(ordinal),
                Stmt::expr(Expr::assign(
                    self.field_through_instance(field, ordinal),
                    Expr::name("value"),
                )),
            ])),
        }
    }
}

/// The field's type as written in that version's declaration.
fn declared_type(versions: &[VersionedDecl], ordinal: u32, field: &str) -> Option<TypeRef> {
    versions
        .iter()
        .find(|v| v.ordinal == ordinal)?
        .decl
        .fields()
        .find(|f| f.variables.iter().any(|var| var.name == field))
        .map(|f| f.ty.clone())
}
