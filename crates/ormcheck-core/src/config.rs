//! Configuration schema (ormcheck.toml)

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use crate::diagnostic::{DiagnosticCode, Severity};

/// Severity threshold overrides for specific diagnostic codes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SeverityThreshold {
    /// Map of diagnostic code to severity override
    #[serde(default)]
    pub overrides: HashMap<String, Severity>,
}

impl SeverityThreshold {
    /// Get severity for a diagnostic code, or default
    pub fn get_severity(&self, code: DiagnosticCode, default: Severity) -> Severity {
        self.overrides
            .get(code.as_str())
            .copied()
            .unwrap_or(default)
    }

    /// Set severity override for a code
    pub fn set_override(&mut self, code: DiagnosticCode, severity: Severity) {
        self.overrides.insert(code.as_str().to_string(), severity);
    }
}

/// Allowlist rules for specific classes or namespaces
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AllowlistRules {
    /// Completely skip checks for these classes (glob patterns)
    #[serde(default)]
    pub skip_classes: Vec<String>,
}

impl AllowlistRules {
    /// Check if a class should be skipped
    pub fn is_class_skipped(&self, class: &str) -> bool {
        self.skip_classes.iter().any(|pattern| glob_match(pattern, class))
    }
}

/// A custom column type whose descriptor is derived from its type handler's
/// declared conversion signatures
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomTypeConfig {
    /// Column type name
    pub name: String,

    /// Declared return type of the database-to-property conversion
    pub to_property: String,

    /// Declared value parameter type of the property-to-database conversion
    pub to_database: String,
}

/// An explicitly declared descriptor; overrides built-in and custom types
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DescriptorOverride {
    /// Column type name
    pub name: String,

    /// Type the database produces when reading
    pub read: String,

    /// Type the database accepts when writing
    pub write: String,
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Entity-manager manifest describing the ORM mappings
    #[serde(default)]
    pub entity_manager: Option<PathBuf>,

    /// Source index with the reflected class and property declarations
    #[serde(default)]
    pub source_index: Option<PathBuf>,

    /// Only classes matching this glob are treated as mapped
    #[serde(default)]
    pub class_filter: Option<String>,

    /// Report column types that have no registered descriptor
    #[serde(default = "default_true")]
    pub report_unknown_types: bool,

    /// Accept a nullable property for a non-nullable column on the write side
    #[serde(default)]
    pub allow_nullable_property_for_required_field: bool,

    /// Severity thresholds
    #[serde(default)]
    pub severity: SeverityThreshold,

    /// Allowlist rules
    #[serde(default)]
    pub allowlist: AllowlistRules,

    /// Custom types described by their type handler signatures
    #[serde(default)]
    pub custom_types: Vec<CustomTypeConfig>,

    /// Explicit descriptors, registered last
    #[serde(default)]
    pub descriptor_overrides: Vec<DescriptorOverride>,

    /// Fingerprints of diagnostics to suppress
    #[serde(default)]
    pub ignore: Vec<String>,

    /// Project root path (for resolving relative paths)
    #[serde(skip)]
    pub project_root: PathBuf,
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            entity_manager: None,
            source_index: None,
            class_filter: None,
            report_unknown_types: true,
            allow_nullable_property_for_required_field: false,
            severity: SeverityThreshold::default(),
            allowlist: AllowlistRules::default(),
            custom_types: Vec::new(),
            descriptor_overrides: Vec::new(),
            ignore: Vec::new(),
            project_root: std::env::current_dir().unwrap_or_default(),
        }
    }
}

impl Config {
    /// Load config from TOML file
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        let mut config = Self::from_toml(&contents)?;

        // Set project root to parent of config file
        if let Some(parent) = path.parent() {
            config.project_root = parent.to_path_buf();
        }

        Ok(config)
    }

    /// Load config from TOML string
    pub fn from_toml(toml: &str) -> Result<Self, ConfigError> {
        let mut config: Config = toml::from_str(toml)
            .map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.project_root = std::env::current_dir().unwrap_or_default();
        Ok(config)
    }

    /// Save config to TOML file
    pub fn save_to_file(&self, path: &Path) -> Result<(), ConfigError> {
        let toml = toml::to_string_pretty(self)
            .map_err(|e| ConfigError::SerializeError(e.to_string()))?;

        std::fs::write(path, toml)
            .map_err(|e| ConfigError::IoError(e.to_string()))?;

        Ok(())
    }

    /// Resolve a configured path against the project root
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.project_root.join(path)
        } else {
            path.to_path_buf()
        }
    }

    /// Entity-manager manifest path, resolved
    pub fn entity_manager_path(&self) -> Result<PathBuf, ConfigError> {
        self.entity_manager
            .as_deref()
            .map(|p| self.resolve_path(p))
            .ok_or(ConfigError::MissingKey("entity_manager"))
    }

    /// Source index path, resolved
    pub fn source_index_path(&self) -> Result<PathBuf, ConfigError> {
        self.source_index
            .as_deref()
            .map(|p| self.resolve_path(p))
            .ok_or(ConfigError::MissingKey("source_index"))
    }
}

/// Glob matching over class names; `*` matches any run of characters
pub fn glob_match(pattern: &str, text: &str) -> bool {
    let parts: Vec<&str> = pattern.split('*').collect();
    if parts.len() == 1 {
        return pattern == text;
    }

    let (first, rest) = (parts[0], &parts[1..]);
    let Some(mut remaining) = text.strip_prefix(first) else {
        return false;
    };

    let (last, middle) = match rest.split_last() {
        Some(split) => split,
        None => return true,
    };

    for part in middle {
        match remaining.find(part) {
            Some(pos) => remaining = &remaining[pos + part.len()..],
            None => return false,
        }
    }

    remaining.ends_with(last)
}

/// Config error types
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Serialize error: {0}")]
    SerializeError(String),

    #[error("Missing configuration key: {0}")]
    MissingKey(&'static str),
}
