//! Source index: the host's reflection dump
//!
//! A JSON document listing classes with their file, parent, interfaces and
//! declared properties:
//!
//! ```json
//! { "classes": { "App\\User": {
//!     "file": "src/User.php",
//!     "parent": "App\\Base",
//!     "interfaces": [],
//!     "properties": { "id": { "type": "int|null", "line": 19 } }
//! } } }
//! ```

use crate::reflection::{ClassReflector, ReflectedProperty};
use ormcheck_core::{BuiltinHierarchy, ClassHierarchy};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;

/// Declared property
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    /// Declared type text (absent for untyped properties)
    #[serde(rename = "type", default)]
    pub declared_type: Option<String>,

    /// Declaration line (1-indexed)
    pub line: usize,
}

/// Declared class
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassDeclaration {
    /// File declaring the class
    pub file: String,

    /// Parent class
    #[serde(default)]
    pub parent: Option<String>,

    /// Implemented interfaces
    #[serde(default)]
    pub interfaces: Vec<String>,

    /// Properties declared on this class
    #[serde(default)]
    pub properties: BTreeMap<String, PropertyDeclaration>,
}

impl ClassDeclaration {
    pub fn new(file: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            parent: None,
            interfaces: Vec::new(),
            properties: BTreeMap::new(),
        }
    }

    pub fn with_parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    pub fn with_interface(mut self, interface: impl Into<String>) -> Self {
        self.interfaces.push(interface.into());
        self
    }

    /// Add a property; `None` declares an untyped property
    pub fn with_property(mut self, name: impl Into<String>, declared_type: Option<&str>, line: usize) -> Self {
        self.properties.insert(
            name.into(),
            PropertyDeclaration {
                declared_type: declared_type.map(str::to_string),
                line,
            },
        );
        self
    }
}

/// Reflection backed by a source index document
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceIndex {
    #[serde(default)]
    classes: BTreeMap<String, ClassDeclaration>,
}

impl SourceIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load source index from file
    pub fn from_file(path: &Path) -> Result<Self, SourceIndexError> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| SourceIndexError::IoError(path.display().to_string(), e.to_string()))?;

        Self::from_str(&contents)
    }

    /// Parse source index from JSON string
    pub fn from_str(json: &str) -> Result<Self, SourceIndexError> {
        serde_json::from_str(json)
            .map_err(|e| SourceIndexError::ParseError(e.to_string()))
    }

    /// Add or replace a class declaration
    pub fn add_class(&mut self, name: impl Into<String>, class: ClassDeclaration) {
        let name = name.into();
        self.classes.insert(name.trim_start_matches('\\').to_string(), class);
    }

    /// Builder form of [`SourceIndex::add_class`]
    pub fn with_class(mut self, name: impl Into<String>, class: ClassDeclaration) -> Self {
        self.add_class(name, class);
        self
    }

    pub fn class(&self, name: &str) -> Option<&ClassDeclaration> {
        self.classes.get(name.trim_start_matches('\\'))
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

impl ClassHierarchy for SourceIndex {
    fn is_subtype(&self, class: &str, ancestor: &str) -> bool {
        let ancestor = ancestor.trim_start_matches('\\');
        let mut pending = vec![class.trim_start_matches('\\').to_string()];
        let mut visited = HashSet::new();

        while let Some(current) = pending.pop() {
            if current.eq_ignore_ascii_case(ancestor) || BuiltinHierarchy.is_subtype(&current, ancestor) {
                return true;
            }

            if !visited.insert(current.to_ascii_lowercase()) {
                continue;
            }

            if let Some(declaration) = self.class(&current) {
                pending.extend(declaration.parent.iter().cloned());
                pending.extend(declaration.interfaces.iter().cloned());
            }
        }

        false
    }
}

impl ClassReflector for SourceIndex {
    fn property(&self, class: &str, property: &str) -> Option<ReflectedProperty> {
        let declaration = self.class(class)?;
        let declared = declaration.properties.get(property)?;

        Some(ReflectedProperty {
            declaring_class: class.trim_start_matches('\\').to_string(),
            name: property.to_string(),
            declared_type: declared.declared_type.clone(),
            file: declaration.file.clone(),
            line: declared.line,
        })
    }

    fn hierarchy(&self) -> &dyn ClassHierarchy {
        self
    }
}

/// Source index errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SourceIndexError {
    #[error("Failed to read source index {0}: {1}")]
    IoError(String, String),

    #[error("Failed to parse source index JSON: {0}")]
    ParseError(String),
}
