//! ORM metadata and host reflection
//!
//! This crate handles:
//! - Parsing the entity-manager manifest
//! - Resolving column mappings across mapped superclasses
//! - Reflecting declared property types and lines from the source index

pub mod manifest;
pub mod reflection;
pub mod resolver;
pub mod source_index;

pub use manifest::{EntityManifest, EntityManager, ClassMetadata, FieldMapping, MappingKind, GeneratorType, ManifestError};
pub use reflection::{ClassReflector, ReflectedProperty};
pub use resolver::{ColumnMapping, MetadataResolver, ManifestResolver, MetadataLoadError};
pub use source_index::{SourceIndex, ClassDeclaration, PropertyDeclaration, SourceIndexError};
