//! Single-pass population of the [`SymbolTable`].

use tracing::debug;

use polyver_ast::visitor::walk_compilation_unit;
use polyver_ast::{
    CompilationUnit, ConstructorDecl, FieldDecl, LocalVar, MethodDecl, TypeDecl, TypeRef, Version,
    VersionPattern, VisitResult, Visitor,
};

use super::{signature_types, FieldInfo, MethodInfo, SymbolTable};

/// Visitor collecting types, methods, fields and local variable types.
///
/// Only top-level declarations are indexed. Nested types are skipped along
/// with their members, and constructor bodies carry no method entry.
pub struct SymbolTableBuilder<'p> {
    pattern: &'p VersionPattern,
    table: SymbolTable,
    /// Base name and version of the enclosing top-level declaration.
    current: Option<(String, Version)>,
    /// Depth of type declarations; 1 inside a top-level type.
    type_depth: usize,
    current_method: Option<MethodInfo>,
}

impl<'p> SymbolTableBuilder<'p> {
    pub fn new(pattern: &'p VersionPattern) -> Self {
        Self {
            pattern,
            table: SymbolTable::new(),
            current: None,
            type_depth: 0,
            current_method: None,
        }
    }

    /// Index every top-level declaration of one unit.
    pub fn add_unit(&mut self, unit: &CompilationUnit) {
        walk_compilation_unit(self, unit);
    }

    pub fn build(self) -> SymbolTable {
        self.table
    }

    /// Canonical type string with version suffixes stripped.
    fn type_string(&self, ty: &TypeRef) -> String {
        self.pattern.normalize_type_ref(ty).to_string()
    }

    fn at_top_level(&self) -> bool {
        self.type_depth == 1 && self.current.is_some()
    }
}

impl Visitor for SymbolTableBuilder<'_> {
    fn visit_type_decl(&mut self, node: &TypeDecl) -> VisitResult {
        self.type_depth += 1;
        if self.type_depth > 1 {
            return VisitResult::SkipChildren;
        }

        let parsed = self.pattern.parse(&node.name);
        let entry = self.table.entry(&parsed.base);
        // Once versioned, always versioned.
        entry.is_versioned |= parsed.is_versioned();
        self.current = Some((parsed.base, parsed.version));
        VisitResult::Continue
    }

    fn leave_type_decl(&mut self, node: &TypeDecl) {
        self.type_depth -= 1;
        if self.type_depth == 0 {
            if let Some((base, version)) = self.current.take() {
                debug!(
                    declaration = %node.name,
                    base_name = %base,
                    version = %version,
                    "indexed declaration"
                );
            }
        }
    }

    fn visit_field_decl(&mut self, node: &FieldDecl) -> VisitResult {
        if !self.at_top_level() {
            return VisitResult::SkipChildren;
        }
        if let Some((base, version)) = &self.current {
            let version = *version;
            let ty = self.pattern.normalize_type_ref(&node.ty).to_string();
            let is_public = node.modifiers.is_public();
            let entry = self.table.entry(base);
            for var in &node.variables {
                entry
                    .fields
                    .entry(var.name.clone())
                    .or_default()
                    .push(FieldInfo {
                        name: var.name.clone(),
                        ty: ty.clone(),
                        version,
                        is_public,
                    });
            }
        }
        VisitResult::SkipChildren
    }

    fn visit_method_decl(&mut self, node: &MethodDecl) -> VisitResult {
        let version = match &self.current {
            Some((_, version)) if self.type_depth == 1 => *version,
            _ => return VisitResult::SkipChildren,
        };
        let local_variable_types = node
            .params
            .iter()
            .map(|p| (p.name.clone(), self.type_string(&p.ty)))
            .collect();
        self.current_method = Some(MethodInfo {
            name: node.name.clone(),
            return_type: self.type_string(&node.return_type),
            parameter_types: signature_types(&node.params, self.pattern),
            version,
            is_static: node.modifiers.is_static,
            is_private: node.modifiers.visibility == polyver_ast::Visibility::Private,
            local_variable_types,
        });
        VisitResult::Continue
    }

    fn leave_method_decl(&mut self, _node: &MethodDecl) {
        let Some(method) = self.current_method.take() else {
            return;
        };
        if let Some((base, _)) = &self.current {
            self.table
                .entry(base)
                .methods
                .entry(method.name.clone())
                .or_default()
                .push(method);
        }
    }

    fn visit_constructor_decl(&mut self, _node: &ConstructorDecl) -> VisitResult {
        VisitResult::SkipChildren
    }

    fn visit_local_var(&mut self, node: &LocalVar) -> VisitResult {
        let ty = self.type_string(&node.ty);
        if let Some(method) = &mut self.current_method {
            for var in &node.variables {
                method.local_variable_types.insert(var.name.clone(), ty.clone());
            }
        }
        VisitResult::Continue
    }
}
