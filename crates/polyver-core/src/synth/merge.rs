//! Member merging: each version's body moves into its implementation type.

use polyver_ast::{Block, ConstructorDecl, Member, Modifiers, TypeDecl};

use super::{impl_type_mut, VersionedDecl};
use crate::config::NamingConfig;
use crate::error::SynthesisError;

/// Copies every version's members into `V<n>_Impl`.
pub struct MemberMerger<'a> {
    base_name: &'a str,
    naming: &'a NamingConfig,
}

impl<'a> MemberMerger<'a> {
    pub fn new(base_name: &'a str, naming: &'a NamingConfig) -> Self {
        Self { base_name, naming }
    }

    /// Clone each version's members into its implementation type.
    ///
    /// Constructors take the implementation type's name. A type without a
    /// no-argument constructor gets an empty one, since synthesized outer
    /// constructors build every version that does not own their signature
    /// with no arguments. The version's own supertypes carry over to the
    /// implementation type.
    pub fn merge(
        &self,
        outer: &mut TypeDecl,
        versions: &[VersionedDecl],
    ) -> Result<(), SynthesisError> {
        for version in versions {
            let impl_name = self.naming.impl_type(version.ordinal);
            let target = impl_type_mut(outer, self.base_name, self.naming, version.ordinal)?;

            if let Some(extends) = &version.decl.extends {
                target.extends = Some(extends.clone());
            }
            target
                .implements
                .extend(version.decl.implements.iter().cloned());

            for member in &version.decl.members {
                let member = match member {
                    Member::Constructor(ctor) => Member::Constructor(ConstructorDecl {
                        name: impl_name.clone(),
                        ..ctor.clone()
                    }),
                    other => other.clone(),
                };
                target.members.push(member);
            }

            if !target.constructors().any(|c| c.params.is_empty()) {
                target.members.push(Member::Constructor(ConstructorDecl {
                    modifiers: Modifiers::public(),
                    name: impl_name,
                    params: Vec::new(),
                    body: Block::default(),
                }));
            }
        }
        Ok(())
    }
}
