//! Host reflection interface
//!
//! The rule needs the declared type and declaration line of a property on a
//! specific class, plus the class hierarchy for object assignability.

use ormcheck_core::ClassHierarchy;

/// A property as declared on one class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectedProperty {
    /// Class that declares the property
    pub declaring_class: String,

    /// Property name
    pub name: String,

    /// Declared type text, if the property has one
    pub declared_type: Option<String>,

    /// File declaring the class
    pub file: String,

    /// Line of the property declaration (1-indexed)
    pub line: usize,
}

/// Class and property reflection provided by the host
pub trait ClassReflector: Send + Sync {
    /// The property as declared on `class` itself (parents are not searched)
    fn property(&self, class: &str, property: &str) -> Option<ReflectedProperty>;

    /// Hierarchy used when comparing object types
    fn hierarchy(&self) -> &dyn ClassHierarchy;
}
