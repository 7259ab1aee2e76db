//! Traversal context for the rewrite passes.
//!
//! A [`ScopeStack`] holds one [`Frame`] per enclosing type, method or
//! constructor declaration. Frames are pushed from `enter_*` hooks and popped
//! from the matching `leave_*` hooks, so the context always reflects the
//! declaration currently being rewritten and is restored on every exit path.
//!
//! The stack resolves the questions both rewrite passes ask about a receiver
//! identifier: what is its declared type, and is that type versioned?

use polyver_ast::{MethodDecl, Version, VersionPattern};

use crate::symbols::{signature_types, ClassInfo, MethodInfo, SymbolTable};

/// What a frame was opened for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameKind {
    Type,
    Method,
    Constructor,
}

/// One level of declaration context.
#[derive(Debug, Clone)]
pub struct Frame<'t> {
    pub kind: FrameKind,
    /// Entry of the enclosing type, by base name.
    pub class: Option<&'t ClassInfo>,
    /// Version of the enclosing type declaration.
    pub version: Version,
    /// Entry of the enclosing method; constructors have none.
    pub method: Option<&'t MethodInfo>,
}

/// Stack of declaration frames over a shared [`SymbolTable`].
#[derive(Debug)]
pub struct ScopeStack<'t> {
    table: &'t SymbolTable,
    pattern: &'t VersionPattern,
    frames: Vec<Frame<'t>>,
}

impl<'t> ScopeStack<'t> {
    pub fn new(table: &'t SymbolTable, pattern: &'t VersionPattern) -> Self {
        Self {
            table,
            pattern,
            frames: Vec::new(),
        }
    }

    pub fn table(&self) -> &'t SymbolTable {
        self.table
    }

    pub fn pattern(&self) -> &'t VersionPattern {
        self.pattern
    }

    pub fn depth(&self) -> usize {
        self.frames.len()
    }

    pub fn current(&self) -> Option<&Frame<'t>> {
        self.frames.last()
    }

    /// Enter a type declaration named `name` (possibly version-suffixed).
    pub fn push_type(&mut self, name: &str) {
        let parsed = self.pattern.parse(name);
        self.frames.push(Frame {
            kind: FrameKind::Type,
            class: self.table.get(&parsed.base),
            version: parsed.version,
            method: None,
        });
    }

    /// Enter a method declaration of the current type.
    pub fn push_method_decl(&mut self, node: &MethodDecl) {
        let parameter_types = signature_types(&node.params, self.pattern);
        self.push_method(&node.name, &parameter_types);
    }

    /// Enter a method of the current type by normalized signature.
    pub fn push_method(&mut self, name: &str, parameter_types: &[String]) {
        let (class, version) = self.enclosing_type();
        let method = class.and_then(|c| c.find_method(name, parameter_types, version));
        self.frames.push(Frame {
            kind: FrameKind::Method,
            class,
            version,
            method,
        });
    }

    /// Enter a constructor of the current type.
    pub fn push_constructor(&mut self) {
        let (class, version) = self.enclosing_type();
        self.frames.push(Frame {
            kind: FrameKind::Constructor,
            class,
            version,
            method: None,
        });
    }

    pub fn pop(&mut self) -> Option<Frame<'t>> {
        self.frames.pop()
    }

    fn enclosing_type(&self) -> (Option<&'t ClassInfo>, Version) {
        self.frames
            .last()
            .map(|f| (f.class, f.version))
            .unwrap_or((None, Version::Normal))
    }

    /// The method whose body is being rewritten, if it is indexed.
    pub fn current_method(&self) -> Option<&'t MethodInfo> {
        self.frames.last().and_then(|f| f.method)
    }

    /// Declared type of a variable in the current method.
    pub fn variable_type(&self, name: &str) -> Option<&'t str> {
        self.current_method().and_then(|m| m.variable_type(name))
    }

    /// The versioned type of a variable, if it has one.
    ///
    /// A declared type such as `Test__1__` resolves through its base name.
    pub fn versioned_type_of(&self, variable: &str) -> Option<&'t ClassInfo> {
        let declared = self.variable_type(variable)?;
        let base = self.pattern.base_name(declared);
        self.table.versioned(&base)
    }
}
