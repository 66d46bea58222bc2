//! Object metadata resolver
//!
//! Answers two questions for the rule: is a class mapped, and which column
//! mappings does it carry (including those inherited from mapped parents).

use crate::manifest::{EntityManifest, ManifestError};
use ormcheck_core::glob_match;
use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Column mapping of one property, as seen from an analyzed class
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColumnMapping {
    /// Mapped property
    pub property_name: String,

    /// Column type name, resolved against the descriptor registry
    pub column_type_name: String,

    /// Whether the column accepts null
    pub nullable: bool,

    /// Whether the database assigns the value
    pub is_generated: bool,

    /// Class that declares the mapping
    pub declaring_class: String,
}

/// The metadata source could not be loaded; fatal for the run
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to load ORM metadata: {0}")]
pub struct MetadataLoadError(#[from] pub ManifestError);

/// Source of entity-to-column mapping metadata
pub trait MetadataResolver: Send + Sync {
    /// Whether the class is an entity or mapped superclass
    fn is_mapped(&self, class: &str) -> Result<bool, MetadataLoadError>;

    /// Mappings of the class and its mapped parents, nearest declaration first
    ///
    /// Returns an empty list for classes that are not mapped.
    fn column_mappings(&self, class: &str) -> Result<Vec<ColumnMapping>, MetadataLoadError>;

    /// Every mapped class the resolver knows about, sorted
    fn mapped_classes(&self) -> Result<Vec<String>, MetadataLoadError>;
}

/// Resolver backed by an entity-manager manifest
///
/// The manifest is loaded on first use and cached for the lifetime of the
/// resolver. A load failure is cached too: every later call reports the same
/// error without touching the file again.
#[derive(Debug)]
pub struct ManifestResolver {
    path: Option<PathBuf>,
    class_filter: Option<String>,
    manifest: OnceLock<Result<EntityManifest, MetadataLoadError>>,
}

impl ManifestResolver {
    /// Resolver reading the manifest at `path` lazily
    pub fn new(path: impl Into<PathBuf>, class_filter: Option<String>) -> Self {
        Self {
            path: Some(path.into()),
            class_filter,
            manifest: OnceLock::new(),
        }
    }

    /// Resolver over an already loaded manifest
    pub fn from_manifest(manifest: EntityManifest, class_filter: Option<String>) -> Self {
        Self {
            path: None,
            class_filter,
            manifest: OnceLock::from(Ok(manifest)),
        }
    }

    /// Loaded manifest, loading it on first call
    pub fn manifest(&self) -> Result<&EntityManifest, MetadataLoadError> {
        self.manifest
            .get_or_init(|| self.load())
            .as_ref()
            .map_err(Clone::clone)
    }

    fn load(&self) -> Result<EntityManifest, MetadataLoadError> {
        let Some(path) = &self.path else {
            return Ok(EntityManifest::default());
        };

        tracing::debug!(path = %path.display(), "loading entity manager manifest");
        let manifest = EntityManifest::from_file(path).map_err(|err| {
            tracing::error!(path = %path.display(), %err, "entity manager manifest failed to load");
            MetadataLoadError(err)
        })?;
        tracing::debug!(classes = manifest.class_names().len(), "entity manager manifest loaded");

        Ok(manifest)
    }

    fn passes_filter(&self, class: &str) -> bool {
        self.class_filter
            .as_deref()
            .map_or(true, |pattern| glob_match(pattern, class.trim_start_matches('\\')))
    }
}

impl MetadataResolver for ManifestResolver {
    fn is_mapped(&self, class: &str) -> Result<bool, MetadataLoadError> {
        let manifest = self.manifest()?;
        Ok(self.passes_filter(class) && manifest.find_class(class).is_some())
    }

    fn column_mappings(&self, class: &str) -> Result<Vec<ColumnMapping>, MetadataLoadError> {
        if !self.is_mapped(class)? {
            return Ok(Vec::new());
        }

        let manifest = self.manifest()?;
        let mut mappings = Vec::new();
        let mut seen_properties = HashSet::new();
        let mut visited = HashSet::new();
        let mut current = Some(class.trim_start_matches('\\').to_string());

        while let Some(class_name) = current {
            if !visited.insert(class_name.clone()) {
                tracing::warn!(class = %class_name, "inheritance cycle in entity manager manifest");
                break;
            }

            let Some(metadata) = manifest.find_class(&class_name) else {
                tracing::debug!(class = %class_name, "parent is not mapped, inheritance chain ends");
                break;
            };
            tracing::trace!(class = %class_name, kind = ?metadata.kind, "collecting column mappings");

            let generated = metadata.generated_identifier();
            for field in &metadata.fields {
                if !seen_properties.insert(field.name.clone()) {
                    continue;
                }

                mappings.push(ColumnMapping {
                    property_name: field.name.clone(),
                    column_type_name: field.column_type.clone(),
                    nullable: field.nullable,
                    is_generated: generated == Some(field.name.as_str()),
                    declaring_class: class_name.clone(),
                });
            }

            current = metadata.parent.clone();
        }

        Ok(mappings)
    }

    fn mapped_classes(&self) -> Result<Vec<String>, MetadataLoadError> {
        let manifest = self.manifest()?;
        Ok(manifest
            .class_names()
            .into_iter()
            .filter(|class| self.passes_filter(class))
            .map(str::to_string)
            .collect())
    }
}
