//! Diagnostic codes and error reporting
//!
//! IMPORTANT: Diagnostic codes and message templates are part of the public
//! contract. NEVER rename or remove codes - add new ones instead.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Diagnostic code registry (v1)
///
/// These codes are STABLE and VERSIONED.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiagnosticCode {
    /// Property type and column type are not mutually assignable
    OrmTypeMismatch,

    /// Column type has no registered descriptor
    OrmUnregisteredType,
}

impl DiagnosticCode {
    /// Get the diagnostic code as a stable string identifier
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::OrmTypeMismatch => "ORM_TYPE_MISMATCH",
            Self::OrmUnregisteredType => "ORM_UNREGISTERED_TYPE",
        }
    }
}

impl std::fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message
    Info,

    /// Warning - should be reviewed but not blocking
    Warn,

    /// Error - blocking issue that should fail CI
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source location in a file
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root
    pub file: String,

    /// Optional line number (1-indexed)
    pub line: Option<usize>,
}

impl Location {
    /// Create a location with file and line number
    pub fn with_line(file: impl Into<String>, line: usize) -> Self {
        Self {
            file: file.into(),
            line: Some(line),
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.line {
            Some(line) => write!(f, "{}:{}", self.file, line),
            None => write!(f, "{}", self.file),
        }
    }
}

/// A diagnostic message with structured metadata
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Stable diagnostic code
    pub code: DiagnosticCode,

    /// Severity level
    pub severity: Severity,

    /// Human-readable message
    pub message: String,

    /// Source location of the property declaration
    pub location: Option<Location>,

    /// Class the finding is attributed to (the declaring class)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub class: Option<String>,

    /// Property the finding is attributed to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub property: Option<String>,
}

impl Diagnostic {
    /// Create a new diagnostic with minimal fields
    pub fn new(code: DiagnosticCode, severity: Severity, message: impl Into<String>) -> Self {
        Self {
            code,
            severity,
            message: message.into(),
            location: None,
            class: None,
            property: None,
        }
    }

    /// Set the location
    pub fn with_location(mut self, location: Location) -> Self {
        self.location = Some(location);
        self
    }

    /// Attribute the diagnostic to a class property
    pub fn with_subject(mut self, class: impl Into<String>, property: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self.property = Some(property.into());
        self
    }

    /// Line of the property declaration, if known
    pub fn line(&self) -> Option<usize> {
        self.location.as_ref().and_then(|l| l.line)
    }

    /// Stable fingerprint used for suppression lists.
    ///
    /// Line numbers are left out so that unrelated edits above a property do
    /// not invalidate an ignore entry.
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.code.as_str().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.class.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.property.as_deref().unwrap_or_default().as_bytes());
        hasher.update([0u8]);
        hasher.update(self.message.as_bytes());
        hex::encode(&hasher.finalize()[..8])
    }
}
