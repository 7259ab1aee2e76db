//! Unified type synthesis.
//!
//! Every versioned base name is turned into one outer declaration that holds
//! its versions as private implementation types and switches between them
//! at runtime. For a group `Test__1__`, `Test__2__` the result has this
//! shape:
//!
//! ```text
//! public class Test {
//!     private interface IVersionBehavior { ... }        // state
//!     private static class V1_Impl implements ... { }   // state, filled by merge
//!     private static class V2_Impl implements ... { }
//!     private final V1_Impl v1_instance;                // state
//!     private final V2_Impl v2_instance;
//!     private IVersionBehavior currentState;
//!     public void __switchToVersion(int version) { }
//!     public void display() { }                         // stubs
//!     public Test() { }                                 // constructors
//!     public int __get_x() { }                          // accessors
//! }
//! ```
//!
//! The stages run in that order over the same outer declaration:
//!
//! 1. [`StateInfrastructureGenerator`]
//! 2. [`MemberMerger`]
//! 3. [`StubMethodGenerator`]
//! 4. [`ConstructorGenerator`]
//! 5. [`AccessorGenerator`]
//!
//! A stage that cannot find a declaration an earlier stage should have
//! created fails the whole group with a [`SynthesisError`].

mod accessors;
mod ctors;
mod merge;
mod state;
mod stubs;

pub use accessors::AccessorGenerator;
pub use ctors::{ConstructorGenerator, ConstructorSignature};
pub use merge::MemberMerger;
pub use state::StateInfrastructureGenerator;
pub use stubs::StubMethodGenerator;

use indexmap::IndexSet;
use tracing::info_span;

use polyver_ast::{CompilationUnit, TypeDecl, TypeKind, Version, VersionPattern};

use crate::config::NamingConfig;
use crate::error::SynthesisError;
use crate::symbols::SymbolTable;

/// One version of a versioned type.
#[derive(Debug, Clone, PartialEq)]
pub struct VersionedDecl {
    pub ordinal: u32,
    /// The declaration as written, after static rewriting.
    pub decl: TypeDecl,
}

/// All input units whose primary declaration shares one base name.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct VersionGroup {
    pub base_name: String,
    pub units: Vec<CompilationUnit>,
}

impl VersionGroup {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            units: Vec::new(),
        }
    }

    pub fn push(&mut self, unit: CompilationUnit) {
        self.units.push(unit);
    }

    /// The version declarations of this group, sorted by ordinal.
    ///
    /// Fails if a declaration of the base name has no ordinal, if two
    /// declarations share one, or if the group holds no declaration at all.
    pub fn versions(&self, pattern: &VersionPattern) -> Result<Vec<VersionedDecl>, SynthesisError> {
        let mut versions: Vec<VersionedDecl> = Vec::new();
        for ty in self.units.iter().flat_map(|u| &u.types) {
            let parsed = pattern.parse(&ty.name);
            if parsed.base != self.base_name {
                continue;
            }
            let ordinal = match parsed.version {
                Version::Numbered(n) => n,
                Version::Normal => {
                    return Err(SynthesisError::UnnumberedVersion {
                        base_name: self.base_name.clone(),
                        name: ty.name.clone(),
                    })
                }
            };
            if versions.iter().any(|v| v.ordinal == ordinal) {
                return Err(SynthesisError::DuplicateVersion {
                    base_name: self.base_name.clone(),
                    version: ordinal,
                });
            }
            versions.push(VersionedDecl {
                ordinal,
                decl: ty.clone(),
            });
        }
        if versions.is_empty() {
            return Err(SynthesisError::UnnumberedVersion {
                base_name: self.base_name.clone(),
                name: self.base_name.clone(),
            });
        }
        versions.sort_by_key(|v| v.ordinal);
        Ok(versions)
    }
}

/// Runs the synthesis stages for one group at a time.
pub struct UnifiedTypeBuilder<'a> {
    table: &'a SymbolTable,
    naming: &'a NamingConfig,
    pattern: &'a VersionPattern,
    generate_accessors: bool,
}

impl<'a> UnifiedTypeBuilder<'a> {
    pub fn new(
        table: &'a SymbolTable,
        naming: &'a NamingConfig,
        pattern: &'a VersionPattern,
    ) -> Self {
        Self {
            table,
            naming,
            pattern,
            generate_accessors: true,
        }
    }

    pub fn with_accessors(mut self, generate_accessors: bool) -> Self {
        self.generate_accessors = generate_accessors;
        self
    }

    /// Synthesize the unified compilation unit for `group`.
    pub fn build(&self, group: &VersionGroup) -> Result<CompilationUnit, SynthesisError> {
        let base_name = group.base_name.as_str();
        let versions = group.versions(self.pattern)?;
        let ordinals: Vec<u32> = versions.iter().map(|v| v.ordinal).collect();

        let mut outer = TypeDecl::class(base_name, versions[0].decl.modifiers);
        outer.modifiers.is_static = false;

        {
            let span = info_span!("synth.state", base_name);
            let _enter = span.enter();
            StateInfrastructureGenerator::new(self.naming).generate(&mut outer, &ordinals);
        }
        {
            let span = info_span!("synth.merge", base_name);
            let _enter = span.enter();
            MemberMerger::new(base_name, self.naming).merge(&mut outer, &versions)?;
        }
        {
            let span = info_span!("synth.stubs", base_name);
            let _enter = span.enter();
            StubMethodGenerator::new(base_name, self.naming, self.pattern)
                .generate(&mut outer, &versions)?;
        }
        {
            let span = info_span!("synth.constructors", base_name);
            let _enter = span.enter();
            ConstructorGenerator::new(self.naming, self.pattern).generate(&mut outer, &versions);
        }
        if self.generate_accessors {
            if let Some(class) = self.table.get(base_name) {
                let span = info_span!("synth.accessors", base_name);
                let _enter = span.enter();
                AccessorGenerator::new(self.naming).generate(&mut outer, class, &versions);
            }
        }

        Ok(self.compose_unit(group, outer))
    }

    /// Wrap the outer declaration in a unit: the first version's package,
    /// the union of all imports, and any other top-level types of the group
    /// (first occurrence by name).
    fn compose_unit(&self, group: &VersionGroup, outer: TypeDecl) -> CompilationUnit {
        let package = group.units.iter().find_map(|u| u.package.clone());
        let imports: IndexSet<String> = group
            .units
            .iter()
            .flat_map(|u| u.imports.iter().cloned())
            .collect();

        let mut types = vec![outer];
        for ty in group.units.iter().flat_map(|u| &u.types) {
            if self.pattern.base_name(&ty.name) == group.base_name {
                continue;
            }
            if !types.iter().any(|t: &TypeDecl| t.name == ty.name) {
                types.push(ty.clone());
            }
        }

        CompilationUnit {
            package,
            imports: imports.into_iter().collect(),
            types,
        }
    }
}

/// The implementation type for `ordinal`, or the error naming it.
pub(crate) fn impl_type_mut<'d>(
    outer: &'d mut TypeDecl,
    base_name: &str,
    naming: &NamingConfig,
    ordinal: u32,
) -> Result<&'d mut TypeDecl, SynthesisError> {
    let impl_type = naming.impl_type(ordinal);
    outer
        .nested_type_mut(&impl_type, TypeKind::Class)
        .ok_or_else(|| SynthesisError::ImplTypeNotFound {
            base_name: base_name.to_string(),
            impl_type,
        })
}
