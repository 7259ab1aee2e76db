//! Error types for the transformation passes.
//!
//! Static-resolution passes never fail: anything they cannot resolve is left
//! unchanged. Only unified-type synthesis has fatal conditions, and those
//! abort a single base-name group. Each [`SynthesisError`] carries the
//! offending base name so the orchestrator can report it without blocking
//! the other groups.

use thiserror::Error;

use polyver_ast::VersionPatternError;

/// A fatal condition while synthesizing one base-name group.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SynthesisError {
    /// The behavior contract was missing from the type under construction.
    #[error("behavior contract '{contract}' not found while synthesizing '{base_name}'")]
    BehaviorContractNotFound { base_name: String, contract: String },

    /// A per-version implementation type was missing from the type under
    /// construction.
    #[error("implementation type '{impl_type}' not found while synthesizing '{base_name}'")]
    ImplTypeNotFound { base_name: String, impl_type: String },

    /// A declaration in a versioned group carries no version ordinal.
    #[error("declaration '{name}' in versioned group '{base_name}' has no version ordinal")]
    UnnumberedVersion { base_name: String, name: String },

    /// Two declarations in one group carry the same ordinal.
    #[error("version {version} of '{base_name}' is declared more than once")]
    DuplicateVersion { base_name: String, version: u32 },
}

impl SynthesisError {
    /// The base name of the group that failed.
    pub fn base_name(&self) -> &str {
        match self {
            SynthesisError::BehaviorContractNotFound { base_name, .. }
            | SynthesisError::ImplTypeNotFound { base_name, .. }
            | SynthesisError::UnnumberedVersion { base_name, .. }
            | SynthesisError::DuplicateVersion { base_name, .. } => base_name,
        }
    }
}

/// Invalid naming configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid version separator: {0}")]
    Pattern(#[from] VersionPatternError),

    /// A reserved name was configured as empty or not an identifier.
    #[error("invalid reserved name for '{key}': '{value}'")]
    InvalidName { key: &'static str, value: String },

    #[error("invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_name_accessor() {
        let err = SynthesisError::ImplTypeNotFound {
            base_name: "Test".to_string(),
            impl_type: "V2_Impl".to_string(),
        };
        assert_eq!(err.base_name(), "Test");
        assert_eq!(
            err.to_string(),
            "implementation type 'V2_Impl' not found while synthesizing 'Test'"
        );
    }

    #[test]
    fn test_config_error_from_pattern() {
        let err: ConfigError = VersionPatternError::EmptySeparator.into();
        assert!(err.to_string().contains("must not be empty"));
    }
}
