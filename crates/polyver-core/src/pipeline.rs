//! The end-to-end transformation.
//!
//! [`Transformer::transform`] runs the passes in order over a batch of
//! compilation units:
//!
//! 1. build the [`SymbolTable`] from every input unit
//! 2. rewrite each unit: static dispatch, then field accesses
//! 3. group units whose primary type is versioned by base name
//! 4. synthesize one unit per group
//!
//! The result holds the synthesized units (in order of each base name's
//! first appearance) followed by every other unit in input order. A group
//! that fails to synthesize is reported in [`TransformOutput::failures`]
//! and leaves the remaining groups untouched.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{error, info, info_span};

use polyver_ast::{CompilationUnit, VersionPattern};

use crate::config::TransformOptions;
use crate::dispatch::StaticDispatchResolver;
use crate::error::{ConfigError, SynthesisError};
use crate::fields::FieldAccessRewriter;
use crate::scope::ScopeStack;
use crate::symbols::SymbolTable;
use crate::synth::{UnifiedTypeBuilder, VersionGroup};

/// SHA-256 of some content, stored as hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ContentHash(pub String);

impl ContentHash {
    /// Compute SHA-256 hash of the given bytes, returning hex-encoded string.
    pub fn compute(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        let result = hasher.finalize();
        ContentHash(hex::encode(result))
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Counters collected while rewriting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RewriteStats {
    pub pinned_calls: usize,
    pub rewritten_accesses: usize,
}

/// Result of one transformation run.
#[derive(Debug, Clone, PartialEq)]
pub struct TransformOutput {
    pub units: Vec<CompilationUnit>,
    pub failures: Vec<SynthesisError>,
    pub stats: RewriteStats,
}

impl TransformOutput {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }

    /// Digest of the JSON form of all output units.
    ///
    /// Equal inputs yield equal digests.
    pub fn digest(&self) -> Result<ContentHash, serde_json::Error> {
        let json = serde_json::to_vec(&self.units)?;
        Ok(ContentHash::compute(&json))
    }
}

/// Runs the whole pipeline with one set of options.
#[derive(Debug, Clone, Default)]
pub struct Transformer {
    options: TransformOptions,
    pattern: VersionPattern,
}

impl Transformer {
    /// Validate `options` and prepare the version recognizer.
    pub fn new(options: TransformOptions) -> Result<Self, ConfigError> {
        options.naming.validate()?;
        let pattern = options.naming.version_pattern()?;
        Ok(Self { options, pattern })
    }

    pub fn options(&self) -> &TransformOptions {
        &self.options
    }

    pub fn pattern(&self) -> &VersionPattern {
        &self.pattern
    }

    /// Index every declaration of `units`.
    pub fn symbols(&self, units: &[CompilationUnit]) -> SymbolTable {
        let span = info_span!("pipeline.symbols", units = units.len());
        let _enter = span.enter();
        SymbolTable::build(units, &self.pattern)
    }

    /// Transform a batch of compilation units.
    pub fn transform(&self, units: Vec<CompilationUnit>) -> TransformOutput {
        let table = self.symbols(&units);
        let (rewritten, stats) = self.rewrite(&table, units);
        let (groups, passthrough) = self.group(&table, rewritten);

        let span = info_span!("pipeline.synthesize", groups = groups.len());
        let _enter = span.enter();

        let builder = UnifiedTypeBuilder::new(&table, &self.options.naming, &self.pattern)
            .with_accessors(self.options.generate_accessors);
        let mut units = Vec::with_capacity(groups.len() + passthrough.len());
        let mut failures = Vec::new();
        for group in groups.values() {
            match builder.build(group) {
                Ok(unit) => {
                    info!(
                        base_name = %group.base_name,
                        declarations = group.units.len(),
                        "synthesized unified type"
                    );
                    units.push(unit);
                }
                Err(err) => {
                    error!(base_name = %err.base_name(), error = %err, "synthesis failed");
                    failures.push(err);
                }
            }
        }
        units.extend(passthrough);

        TransformOutput {
            units,
            failures,
            stats,
        }
    }

    /// Static dispatch and field rewriting over every unit.
    fn rewrite(
        &self,
        table: &SymbolTable,
        units: Vec<CompilationUnit>,
    ) -> (Vec<CompilationUnit>, RewriteStats) {
        let span = info_span!("pipeline.rewrite", units = units.len());
        let _enter = span.enter();

        let naming = &self.options.naming;
        let mut stats = RewriteStats::default();
        let rewritten = units
            .into_iter()
            .map(|unit| {
                let mut resolver =
                    StaticDispatchResolver::new(ScopeStack::new(table, &self.pattern), naming);
                let unit = resolver.resolve(unit);
                stats.pinned_calls += resolver.pinned();

                let mut fields =
                    FieldAccessRewriter::new(ScopeStack::new(table, &self.pattern), naming);
                let unit = fields.rewrite(unit);
                stats.rewritten_accesses += fields.rewritten();
                unit
            })
            .collect();
        info!(
            pinned_calls = stats.pinned_calls,
            rewritten_accesses = stats.rewritten_accesses,
            "rewrote units"
        );
        (rewritten, stats)
    }

    /// Split units into versioned groups and pass-through units.
    fn group(
        &self,
        table: &SymbolTable,
        units: Vec<CompilationUnit>,
    ) -> (IndexMap<String, VersionGroup>, Vec<CompilationUnit>) {
        let mut groups: IndexMap<String, VersionGroup> = IndexMap::new();
        let mut passthrough = Vec::new();
        for unit in units {
            let base = unit
                .primary_type_name()
                .map(|name| self.pattern.base_name(name))
                .filter(|base| table.is_versioned(base));
            match base {
                Some(base) => groups
                    .entry(base.clone())
                    .or_insert_with(|| VersionGroup::new(base))
                    .push(unit),
                None => passthrough.push(unit),
            }
        }
        (groups, passthrough)
    }
}
