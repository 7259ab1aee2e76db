// Copyright (c) Polyver contributors.
//
// This source code is licensed under the MIT license found in the
// LICENSE file in the root directory of this source tree.

//! Version-marker naming convention.
//!
//! A declaration named `<base><sep><digits><sep>` (for the default separator,
//! `Test__2__`) is version `<digits>` of the logical type `<base>`. Any other
//! name is an ordinary declaration with [`Version::Normal`]. This convention is
//! the only protocol between source text and the transformer's recognition
//! logic.
//!
//! # Example
//!
//! ```
//! use polyver_ast::{Version, VersionPattern};
//!
//! let pattern = VersionPattern::default();
//! let parsed = pattern.parse("Test__2__");
//! assert_eq!(parsed.base, "Test");
//! assert_eq!(parsed.version, Version::Numbered(2));
//!
//! assert_eq!(pattern.parse("Main").version, Version::Normal);
//! ```

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::nodes::TypeRef;

/// Separator used when no other is configured.
pub const DEFAULT_SEPARATOR: &str = "__";

static DEFAULT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&pattern_source(DEFAULT_SEPARATOR)).expect("default version pattern is valid")
});

fn pattern_source(separator: &str) -> String {
    let sep = regex::escape(separator);
    format!(r"^(.+){sep}([0-9]+){sep}$")
}

/// The version tag of a declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum Version {
    /// An ordinary, non-versioned declaration.
    Normal,
    /// Version `n` of a versioned type.
    Numbered(u32),
}

impl Version {
    /// The ordinal of a numbered version.
    pub fn ordinal(self) -> Option<u32> {
        match self {
            Version::Normal => None,
            Version::Numbered(n) => Some(n),
        }
    }

    pub fn is_numbered(self) -> bool {
        matches!(self, Version::Numbered(_))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Version::Normal => f.write_str("normal"),
            Version::Numbered(n) => write!(f, "{}", n),
        }
    }
}

/// Error parsing a version tag.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid version tag '{0}': expected \"normal\" or a decimal ordinal")]
pub struct VersionParseError(pub String);

impl FromStr for Version {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "normal" {
            return Ok(Version::Normal);
        }
        s.parse::<u32>()
            .map(Version::Numbered)
            .map_err(|_| VersionParseError(s.to_string()))
    }
}

impl From<Version> for String {
    fn from(version: Version) -> Self {
        version.to_string()
    }
}

impl TryFrom<String> for Version {
    type Error = VersionParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A declaration name split into base name and version.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionedName {
    pub base: String,
    pub version: Version,
}

impl VersionedName {
    pub fn is_versioned(&self) -> bool {
        self.version.is_numbered()
    }
}

/// Error building a [`VersionPattern`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionPatternError {
    #[error("version separator must not be empty")]
    EmptySeparator,

    #[error("invalid version separator '{separator}': {message}")]
    InvalidSeparator { separator: String, message: String },
}

/// Recognizer for the `<base><sep><digits><sep>` naming convention.
#[derive(Debug, Clone)]
pub struct VersionPattern {
    separator: String,
    regex: Regex,
}

impl VersionPattern {
    /// Build a pattern for a custom separator.
    pub fn new(separator: &str) -> Result<Self, VersionPatternError> {
        if separator.is_empty() {
            return Err(VersionPatternError::EmptySeparator);
        }
        let regex = Regex::new(&pattern_source(separator)).map_err(|e| {
            VersionPatternError::InvalidSeparator {
                separator: separator.to_string(),
                message: e.to_string(),
            }
        })?;
        Ok(Self {
            separator: separator.to_string(),
            regex,
        })
    }

    pub fn separator(&self) -> &str {
        &self.separator
    }

    /// Split a declaration name into base and version.
    ///
    /// Names that do not match yield the whole name with [`Version::Normal`].
    /// An ordinal too large for `u32` is treated as no match.
    pub fn parse(&self, name: &str) -> VersionedName {
        if let Some(caps) = self.regex.captures(name) {
            if let Ok(n) = caps[2].parse::<u32>() {
                return VersionedName {
                    base: caps[1].to_string(),
                    version: Version::Numbered(n),
                };
            }
        }
        VersionedName {
            base: name.to_string(),
            version: Version::Normal,
        }
    }

    pub fn is_versioned(&self, name: &str) -> bool {
        self.parse(name).is_versioned()
    }

    /// The base name: the name itself when unversioned.
    pub fn base_name(&self, name: &str) -> String {
        self.parse(name).base
    }

    /// Compose `<base><sep><n><sep>`.
    pub fn versioned_name(&self, base: &str, ordinal: u32) -> String {
        format!("{}{}{}{}", base, self.separator, ordinal, self.separator)
    }

    /// Replace every version-suffixed name in a type reference, type
    /// arguments included, with its base name.
    pub fn normalize_type_ref(&self, ty: &TypeRef) -> TypeRef {
        TypeRef {
            name: self.base_name(&ty.name),
            args: ty.args.iter().map(|a| self.normalize_type_ref(a)).collect(),
            array_dims: ty.array_dims,
        }
    }
}

impl Default for VersionPattern {
    fn default() -> Self {
        Self {
            separator: DEFAULT_SEPARATOR.to_string(),
            regex: DEFAULT_PATTERN.clone(),
        }
    }
}
