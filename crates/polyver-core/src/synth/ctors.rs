//! Outer constructor synthesis.

use indexmap::IndexMap;

use polyver_ast::{
    Block, ConstructorDecl, Expr, Member, Modifiers, Param, Stmt, TypeDecl, TypeRef,
    VersionPattern,
};

use super::VersionedDecl;
use crate::config::NamingConfig;
use crate::symbols::signature_types;

/// A distinct constructor signature and the version that owns it.
#[derive(Debug, Clone, PartialEq)]
pub struct ConstructorSignature {
    pub owner: u32,
    pub params: Vec<Param>,
}

/// Builds one outer constructor per distinct constructor signature.
pub struct ConstructorGenerator<'a> {
    naming: &'a NamingConfig,
    pattern: &'a VersionPattern,
}

impl<'a> ConstructorGenerator<'a> {
    pub fn new(naming: &'a NamingConfig, pattern: &'a VersionPattern) -> Self {
        Self { naming, pattern }
    }

    /// Distinct signatures across all versions; the first version declaring
    /// a signature owns it. Without any declared constructor, the first
    /// version owns a no-argument one.
    pub fn signatures(&self, versions: &[VersionedDecl]) -> Vec<ConstructorSignature> {
        let mut signatures: IndexMap<Vec<String>, ConstructorSignature> = IndexMap::new();
        for version in versions {
            for ctor in version.decl.constructors() {
                signatures
                    .entry(signature_types(&ctor.params, self.pattern))
                    .or_insert_with(|| ConstructorSignature {
                        owner: version.ordinal,
                        params: ctor.params.clone(),
                    });
            }
        }
        if signatures.is_empty() {
            if let Some(first) = versions.first() {
                signatures.insert(
                    Vec::new(),
                    ConstructorSignature {
                        owner: first.ordinal,
                        params: Vec::new(),
                    },
                );
            }
        }
        signatures.into_values().collect()
    }

    pub fn generate(&self, outer: &mut TypeDecl, versions: &[VersionedDecl]) {
        let ordinals: Vec<u32> = versions.iter().map(|v| v.ordinal).collect();
        for signature in self.signatures(versions) {
            let ctor = self.constructor(&outer.name, &ordinals, &signature);
            outer.members.push(Member::Constructor(ctor));
        }
    }

    /// Every instance field is assigned a fresh implementation instance; only
    /// the owner receives the arguments, and becomes the active instance.
    fn constructor(
        &self,
        name: &str,
        ordinals: &[u32],
        signature: &ConstructorSignature,
    ) -> ConstructorDecl {
        let naming = self.naming;
        let args: Vec<Expr> = signature
            .params
            .iter()
            .map(|p| Expr::name(&p.name))
            .collect();

        let mut stmts: Vec<Stmt> = ordinals
            .iter()
            .map(|&n| {
                let args = if n == signature.owner {
                    args.clone()
                } else {
                    Vec::new()
                };
                Stmt::expr(Expr::assign(
                    Expr::this_field(naming.instance_field(n)),
                    Expr::new_object(TypeRef::new(naming.impl_type(n)), args),
                ))
            })
            .collect();
        stmts.push(Stmt::expr(Expr::assign(
            Expr::this_field(&naming.active_field),
            Expr::this_field(naming.instance_field(signature.owner)),
        )));

        ConstructorDecl {
            modifiers: Modifiers::public(),
            name: name.to_string(),
            params: signature.params.clone(),
            body: Block::new(stmts),
        }
    }
}
