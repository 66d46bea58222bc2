//! Entity-manager manifest parsing
//!
//! The manifest is the ORM's mapping metadata exported as JSON. Each class
//! lists only the fields it declares itself; inherited fields are found by
//! following `parent`.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Entity-manager manifest (one or more entity managers)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntityManifest {
    /// Configured entity managers
    #[serde(default)]
    pub entity_managers: Vec<EntityManager>,
}

impl EntityManifest {
    /// Load manifest from file
    pub fn from_file(path: &Path) -> Result<Self, ManifestError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| ManifestError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse and validate manifest from JSON string
    pub fn from_str(json: &str) -> Result<Self, ManifestError> {
        let manifest: Self = serde_json::from_str(json)
            .map_err(|e| ManifestError::ParseError(e.to_string()))?;
        manifest.validate()?;
        Ok(manifest)
    }

    /// Find the metadata for a class; the first manager mapping it wins
    pub fn find_class(&self, class: &str) -> Option<&ClassMetadata> {
        let class = class.trim_start_matches('\\');
        self.entity_managers
            .iter()
            .find_map(|manager| manager.classes.get(class))
    }

    /// All mapped class names across managers, sorted and deduplicated
    pub fn class_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self
            .entity_managers
            .iter()
            .flat_map(|manager| manager.classes.keys().map(String::as_str))
            .collect();
        names.sort_unstable();
        names.dedup();
        names
    }

    fn validate(&self) -> Result<(), ManifestError> {
        for manager in &self.entity_managers {
            for (class, metadata) in &manager.classes {
                let mut fields = HashSet::new();
                for field in &metadata.fields {
                    if !fields.insert(field.name.as_str()) {
                        return Err(ManifestError::InvalidMapping(format!(
                            "{}::${} is mapped twice in entity manager '{}'",
                            class, field.name, manager.name
                        )));
                    }
                }
            }
        }
        Ok(())
    }
}

/// One entity manager and the classes it maps
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityManager {
    /// Manager name
    #[serde(default = "default_manager_name")]
    pub name: String,

    /// Class metadata by fully-qualified class name
    #[serde(default)]
    pub classes: BTreeMap<String, ClassMetadata>,
}

fn default_manager_name() -> String {
    "default".to_string()
}

/// How a class participates in the mapping
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MappingKind {
    /// Persisted entity
    Entity,

    /// Contributes mappings to subclasses, never persisted itself
    MappedSuperclass,
}

/// Identifier generation strategy
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GeneratorType {
    /// Natural identifier assigned by the application
    #[default]
    None,
    Auto,
    Sequence,
    Identity,
    Uuid,
    Custom,
}

/// Mapping metadata of one class
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassMetadata {
    /// Entity or mapped superclass
    pub kind: MappingKind,

    /// Parent class, if any
    #[serde(default)]
    pub parent: Option<String>,

    /// Identifier field names
    #[serde(default)]
    pub identifier: Vec<String>,

    /// Identifier generation strategy
    #[serde(default)]
    pub generator: GeneratorType,

    /// Fields declared by this class
    #[serde(default)]
    pub fields: Vec<FieldMapping>,
}

impl ClassMetadata {
    /// The database-assigned identifier field, if there is exactly one
    pub fn generated_identifier(&self) -> Option<&str> {
        match (self.generator, self.identifier.as_slice()) {
            (GeneratorType::None, _) => None,
            (_, [single]) => Some(single.as_str()),
            _ => None,
        }
    }
}

/// Column mapping of one field as declared in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldMapping {
    /// Property name
    pub name: String,

    /// Column type name
    #[serde(rename = "type", default = "default_column_type")]
    pub column_type: String,

    /// Whether the column accepts null
    #[serde(default)]
    pub nullable: bool,
}

fn default_column_type() -> String {
    "string".to_string()
}

/// Manifest parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ManifestError {
    #[error("Failed to read entity manager file {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse entity manager JSON: {0}")]
    ParseError(String),

    #[error("Invalid mapping: {0}")]
    InvalidMapping(String),
}
