//! Transformation options and reserved naming.
//!
//! Every name the synthesized code relies on is configurable through
//! [`NamingConfig`]; the defaults are the reserved names of the versioned
//! types extension (`__switchToVersion`, `__get_<f>`, `IVersionBehavior`,
//! `V<n>_Impl`, `v<n>_instance`, `currentState`).

use serde::{Deserialize, Serialize};

use polyver_ast::version::DEFAULT_SEPARATOR;
use polyver_ast::VersionPattern;

use crate::error::ConfigError;

/// Reserved names used by rewriting and synthesis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    /// Separator around the version ordinal in declaration names.
    pub separator: String,
    /// Name of the variant-switch operation.
    pub switch_method: String,
    pub getter_prefix: String,
    pub setter_prefix: String,
    /// Name of the behavior contract interface.
    pub behavior_interface: String,
    /// Name of the active-instance field.
    pub active_field: String,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            switch_method: "__switchToVersion".to_string(),
            getter_prefix: "__get_".to_string(),
            setter_prefix: "__set_".to_string(),
            behavior_interface: "IVersionBehavior".to_string(),
            active_field: "currentState".to_string(),
        }
    }
}

impl NamingConfig {
    /// Implementation type name for version `n` (`V<n>_Impl`).
    pub fn impl_type(&self, ordinal: u32) -> String {
        format!("V{}_Impl", ordinal)
    }

    /// Instance field name for version `n` (`v<n>_instance`).
    pub fn instance_field(&self, ordinal: u32) -> String {
        format!("v{}_instance", ordinal)
    }

    pub fn getter(&self, field: &str) -> String {
        format!("{}{}", self.getter_prefix, field)
    }

    pub fn setter(&self, field: &str) -> String {
        format!("{}{}", self.setter_prefix, field)
    }

    /// Build the version-marker recognizer for the configured separator.
    pub fn version_pattern(&self) -> Result<VersionPattern, ConfigError> {
        Ok(VersionPattern::new(&self.separator)?)
    }

    /// Check that every reserved name can appear in generated source.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let names: [(&'static str, &str); 5] = [
            ("switch_method", &self.switch_method),
            ("getter_prefix", &self.getter_prefix),
            ("setter_prefix", &self.setter_prefix),
            ("behavior_interface", &self.behavior_interface),
            ("active_field", &self.active_field),
        ];
        for (key, value) in names {
            if !is_identifier(value) {
                return Err(ConfigError::InvalidName {
                    key,
                    value: value.to_string(),
                });
            }
        }
        if self.getter_prefix == self.setter_prefix {
            return Err(ConfigError::InvalidName {
                key: "setter_prefix",
                value: self.setter_prefix.clone(),
            });
        }
        self.version_pattern()?;
        Ok(())
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

/// Options for a whole transformation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    pub naming: NamingConfig,
    /// Synthesize `__get_<f>` / `__set_<f>` for every field of a versioned
    /// type. Rewritten field accesses call these, so turning this off is only
    /// useful when they are supplied by other means.
    pub generate_accessors: bool,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            naming: NamingConfig::default(),
            generate_accessors: true,
        }
    }
}

impl TransformOptions {
    /// Parse and validate options from JSON. Missing keys take defaults.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let options: TransformOptions = serde_json::from_str(text)?;
        options.naming.validate()?;
        Ok(options)
    }
}
