//! The symbol table: an index of every top-level declaration, keyed by base
//! name.
//!
//! All per-version declarations of a logical type merge into one
//! [`ClassInfo`]. Method and field entries keep every version's declaration,
//! so a name may map to several entries; that ambiguity is consumed by the
//! dispatch resolver and stub synthesis, never resolved here.
//!
//! The table is built once by [`SymbolTableBuilder`] and only read afterwards.

mod builder;

pub use builder::SymbolTableBuilder;

use std::collections::BTreeMap;

use indexmap::IndexMap;
use serde::Serialize;

use polyver_ast::{CompilationUnit, Param, Version, VersionPattern};

/// Parameter type strings as recorded in the table: canonical renderings
/// with version suffixes stripped.
///
/// Signatures computed this way compare equal before and after the dispatch
/// pass rewrites suffixed type names.
pub fn signature_types(params: &[Param], pattern: &VersionPattern) -> Vec<String> {
    params
        .iter()
        .map(|p| pattern.normalize_type_ref(&p.ty).to_string())
        .collect()
}

/// One method declaration of one version.
///
/// All type strings are normalized with [`signature_types`] rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    pub name: String,
    pub return_type: String,
    pub parameter_types: Vec<String>,
    pub version: Version,
    pub is_static: bool,
    pub is_private: bool,
    /// Declared type of every parameter and every local in the body.
    /// A name declared twice keeps the last-seen type.
    pub local_variable_types: IndexMap<String, String>,
}

impl MethodInfo {
    pub fn variable_type(&self, name: &str) -> Option<&str> {
        self.local_variable_types.get(name).map(String::as_str)
    }

    pub fn is_void(&self) -> bool {
        self.return_type == "void"
    }
}

/// One field declaration of one version.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    pub version: Version,
    pub is_public: bool,
}

/// Everything known about one base name, merged across its versions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClassInfo {
    pub base_name: String,
    pub is_versioned: bool,
    pub methods: IndexMap<String, Vec<MethodInfo>>,
    pub fields: IndexMap<String, Vec<FieldInfo>>,
}

impl ClassInfo {
    pub fn new(base_name: impl Into<String>) -> Self {
        Self {
            base_name: base_name.into(),
            is_versioned: false,
            methods: IndexMap::new(),
            fields: IndexMap::new(),
        }
    }

    /// Every declaration of `name`, across all versions.
    pub fn methods_named(&self, name: &str) -> &[MethodInfo] {
        self.methods.get(name).map(Vec::as_slice).unwrap_or(&[])
    }

    /// The declaration with this exact name, parameter types and version.
    pub fn find_method(
        &self,
        name: &str,
        parameter_types: &[String],
        version: Version,
    ) -> Option<&MethodInfo> {
        self.methods_named(name)
            .iter()
            .find(|m| m.version == version && m.parameter_types == parameter_types)
    }

    /// All methods in declaration order.
    pub fn all_methods(&self) -> impl Iterator<Item = &MethodInfo> {
        self.methods.values().flatten()
    }

    /// The declaration whose version owns a field's accessors: the
    /// lowest-numbered version declaring the field public.
    ///
    /// Fields never declared public have no accessors.
    pub fn accessor_owner(&self, name: &str) -> Option<(u32, &FieldInfo)> {
        self.fields
            .get(name)?
            .iter()
            .filter(|f| f.is_public)
            .filter_map(|f| f.version.ordinal().map(|n| (n, f)))
            .min_by_key(|(n, _)| *n)
    }

    /// The first declaration of a field name.
    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name).and_then(|f| f.first())
    }
}

/// Index of all declared types, keyed by base name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SymbolTable {
    classes: BTreeMap<String, ClassInfo>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every top-level declaration of `units`.
    pub fn build<'u>(
        units: impl IntoIterator<Item = &'u CompilationUnit>,
        pattern: &VersionPattern,
    ) -> Self {
        let mut builder = SymbolTableBuilder::new(pattern);
        for unit in units {
            builder.add_unit(unit);
        }
        builder.build()
    }

    pub fn get(&self, base_name: &str) -> Option<&ClassInfo> {
        self.classes.get(base_name)
    }

    /// The entry for `base_name`, if it is a versioned type.
    pub fn versioned(&self, base_name: &str) -> Option<&ClassInfo> {
        self.get(base_name).filter(|c| c.is_versioned)
    }

    pub fn is_versioned(&self, base_name: &str) -> bool {
        self.versioned(base_name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &ClassInfo> {
        self.classes.values()
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }

    /// Look up or create the entry for `base_name`.
    pub(crate) fn entry(&mut self, base_name: &str) -> &mut ClassInfo {
        self.classes
            .entry(base_name.to_string())
            .or_insert_with(|| ClassInfo::new(base_name))
    }
}
