//! Stub synthesis: the outer type's forwarding methods.

use indexmap::IndexMap;
use tracing::debug;

use polyver_ast::{
    Block, Expr, Member, MethodDecl, Modifiers, Param, Stmt, TypeDecl, TypeKind, TypeRef,
    VersionPattern, Visibility,
};

use super::{impl_type_mut, VersionedDecl};
use crate::config::NamingConfig;
use crate::error::SynthesisError;
use crate::symbols::signature_types;

/// Methods sharing one `(name, parameter types)` signature, with the
/// ordinal that declares each.
type SignatureGroup<'v> = Vec<(u32, &'v MethodDecl)>;

/// Surfaces every distinct method signature on the outer type exactly once.
///
/// A signature declared by one version is *pinned*: its stub forwards to
/// that version's instance. A signature declared by several versions is
/// *ambiguous*: it joins the behavior contract and its stub forwards through
/// the active instance. Signatures whose declarations are all private get no
/// stub.
pub struct StubMethodGenerator<'a> {
    base_name: &'a str,
    naming: &'a NamingConfig,
    pattern: &'a VersionPattern,
}

impl<'a> StubMethodGenerator<'a> {
    pub fn new(base_name: &'a str, naming: &'a NamingConfig, pattern: &'a VersionPattern) -> Self {
        Self {
            base_name,
            naming,
            pattern,
        }
    }

    /// Group methods by signature in order of first appearance.
    pub fn signature_groups<'v>(
        &self,
        versions: &'v [VersionedDecl],
    ) -> IndexMap<(String, Vec<String>), SignatureGroup<'v>> {
        let mut groups: IndexMap<(String, Vec<String>), SignatureGroup<'v>> = IndexMap::new();
        for version in versions {
            for method in version.decl.methods() {
                let key = (
                    method.name.clone(),
                    signature_types(&method.params, self.pattern),
                );
                groups.entry(key).or_default().push((version.ordinal, method));
            }
        }
        groups
    }

    pub fn generate(
        &self,
        outer: &mut TypeDecl,
        versions: &[VersionedDecl],
    ) -> Result<(), SynthesisError> {
        let mut stubs = Vec::new();
        for ((name, signature), group) in self.signature_groups(versions) {
            if group
                .iter()
                .all(|(_, m)| m.modifiers.visibility == Visibility::Private)
            {
                continue;
            }
            let (first_ordinal, first) = group[0];

            let receiver = if group.len() > 1 {
                self.extend_contract(outer, first)?;
                self.complete_impls(outer, versions, &name, &signature, first)?;
                debug!(method = %name, versions = group.len(), "ambiguous signature");
                Expr::this_field(&self.naming.active_field)
            } else {
                debug!(method = %name, version = first_ordinal, "pinned signature");
                Expr::this_field(self.naming.instance_field(first_ordinal))
            };
            stubs.push(Member::Method(forwarding_stub(first, receiver)));
        }
        outer.members.extend(stubs);
        Ok(())
    }

    /// Add the bare signature to the behavior contract.
    fn extend_contract(
        &self,
        outer: &mut TypeDecl,
        method: &MethodDecl,
    ) -> Result<(), SynthesisError> {
        let contract = outer
            .nested_type_mut(&self.naming.behavior_interface, TypeKind::Interface)
            .ok_or_else(|| SynthesisError::BehaviorContractNotFound {
                base_name: self.base_name.to_string(),
                contract: self.naming.behavior_interface.clone(),
            })?;
        contract.members.push(Member::Method(MethodDecl {
            modifiers: Modifiers::default(),
            return_type: method.return_type.clone(),
            name: method.name.clone(),
            params: numbered_params(&method.params),
            body: None,
        }));
        Ok(())
    }

    /// Make every implementation type satisfy a new contract method.
    ///
    /// Declarations of the signature become public instance methods;
    /// versions without one get a method that throws.
    fn complete_impls(
        &self,
        outer: &mut TypeDecl,
        versions: &[VersionedDecl],
        name: &str,
        signature: &[String],
        template: &MethodDecl,
    ) -> Result<(), SynthesisError> {
        for version in versions {
            let target = impl_type_mut(outer, self.base_name, self.naming, version.ordinal)?;
            let declared = target
                .methods_mut()
                .find(|m| m.name == name && signature_types(&m.params, self.pattern) == signature);
            match declared {
                Some(method) => {
                    method.modifiers.visibility = Visibility::Public;
                    method.modifiers.is_static = false;
                }
                None => target
                    .members
                    .push(Member::Method(unsupported(template, version.ordinal))),
            }
        }
        Ok(())
    }
}

/// Parameters renamed `arg0..argN`, types kept.
fn numbered_params(params: &[Param]) -> Vec<Param> {
    params
        .iter()
        .enumerate()
        .map(|(i, p)| Param::new(p.ty.clone(), format!("arg{}", i)))
        .collect()
}

/// `public R name(T0 arg0, ..) { [return] receiver.name(arg0, ..); }`
fn forwarding_stub(method: &MethodDecl, receiver: Expr) -> MethodDecl {
    let params = numbered_params(&method.params);
    let args = params.iter().map(|p| Expr::name(&p.name)).collect();
    let call = Expr::method_call(receiver, &method.name, args);
    let stmt = if method.return_type.is_void() {
        Stmt::expr(call)
    } else {
        Stmt::Return(Some(call))
    };
    MethodDecl {
        modifiers: Modifiers::public(),
        return_type: method.return_type.clone(),
        name: method.name.clone(),
        params,
        body: Some(Block::new(vec![stmt])),
    }
}

/// A public method that rejects calls for a version lacking the signature.
fn unsupported(template: &MethodDecl, ordinal: u32) -> MethodDecl {
    let message = format!("{} is not supported by version {}", template.name, ordinal);
    MethodDecl {
        modifiers: Modifiers::public(),
        return_type: template.return_type.clone(),
        name: template.name.clone(),
        params: numbered_params(&template.params),
        body: Some(Block::new(vec![Stmt::Throw(Expr::new_object(
            TypeRef::new("UnsupportedOperationException"),
            vec![Expr::string(message)],
        ))])),
    }
}
