//! Descriptor registry keyed by column type name
//!
//! The registry is built once before analysis and shared read-only with the
//! rule. Registration overwrites by name, so the last registration wins.

use crate::builtin;
use crate::descriptor::{StaticDescriptor, TypeDescriptor};
use crate::reflection::{ReflectionDescriptor, TypeHandlerSignature};
use ormcheck_core::{Config, TypeParseError};
use std::collections::HashMap;

/// Lookup failure for a column type without descriptor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Doctrine type \"{0}\" does not have any registered descriptor.")]
pub struct UnregisteredTypeError(pub String);

/// Errors building a registry from configuration
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RegistryError {
    #[error("Invalid descriptor override '{name}': {source}")]
    InvalidOverride {
        name: String,
        #[source]
        source: TypeParseError,
    },
}

/// Registry of type descriptors
#[derive(Debug, Default)]
pub struct DescriptorRegistry {
    descriptors: HashMap<String, Box<dyn TypeDescriptor>>,
}

impl DescriptorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the built-in descriptors
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        for descriptor in builtin::all() {
            registry.register(descriptor);
        }
        registry
    }

    /// Build the registry described by a configuration
    ///
    /// Built-ins first, then custom types derived from their handler
    /// signatures, then explicit overrides.
    pub fn from_config(config: &Config) -> Result<Self, RegistryError> {
        let mut registry = Self::with_builtins();

        for custom in &config.custom_types {
            let signature = TypeHandlerSignature::from(custom);
            registry.register(ReflectionDescriptor::from_signature(&signature));
        }

        for entry in &config.descriptor_overrides {
            let descriptor = StaticDescriptor::parse(entry.name.clone(), &entry.read, &entry.write)
                .map_err(|source| RegistryError::InvalidOverride {
                    name: entry.name.clone(),
                    source,
                })?;
            registry.register(descriptor);
        }

        Ok(registry)
    }

    /// Register a descriptor, replacing any descriptor with the same name
    pub fn register(&mut self, descriptor: impl TypeDescriptor + 'static) {
        self.register_boxed(Box::new(descriptor));
    }

    /// Register an already boxed descriptor
    pub fn register_boxed(&mut self, descriptor: Box<dyn TypeDescriptor>) {
        let name = descriptor.type_name().to_string();
        tracing::debug!(
            type_name = %name,
            read = %descriptor.database_read_type(),
            write = %descriptor.database_write_type(),
            "registering descriptor"
        );

        if self.descriptors.insert(name.clone(), descriptor).is_some() {
            tracing::debug!(type_name = %name, "descriptor replaced");
        }
    }

    /// Look up the descriptor for a column type
    pub fn get(&self, type_name: &str) -> Result<&dyn TypeDescriptor, UnregisteredTypeError> {
        self.descriptors
            .get(type_name)
            .map(|d| d.as_ref())
            .ok_or_else(|| UnregisteredTypeError(type_name.to_string()))
    }

    /// Whether a descriptor is registered for the column type
    pub fn contains(&self, type_name: &str) -> bool {
        self.descriptors.contains_key(type_name)
    }

    /// Registered column type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.descriptors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.descriptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.descriptors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ormcheck_core::{CustomTypeConfig, DescriptorOverride, TypeExpr};

    #[test]
    fn get_after_register() {
        let mut registry = DescriptorRegistry::new();
        registry.register(builtin::string());

        let descriptor = registry.get("string").unwrap();
        assert_eq!(descriptor.type_name(), "string");
        assert!(registry.contains("string"));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn unregistered_type() {
        let registry = DescriptorRegistry::with_builtins();
        let err = registry.get("unknown").unwrap_err();

        assert_eq!(err, UnregisteredTypeError("unknown".to_string()));
        assert_eq!(
            err.to_string(),
            "Doctrine type \"unknown\" does not have any registered descriptor."
        );
    }

    #[test]
    fn reregistration_is_idempotent() {
        let mut registry = DescriptorRegistry::new();
        registry.register(builtin::integer());
        registry.register(builtin::integer());

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.get("integer").unwrap().database_read_type(), &TypeExpr::Int);
    }

    #[test]
    fn last_registration_wins() {
        let mut registry = DescriptorRegistry::with_builtins();
        registry.register(StaticDescriptor::symmetric("string", TypeExpr::Mixed));

        assert_eq!(registry.get("string").unwrap().database_read_type(), &TypeExpr::Mixed);
    }

    #[test]
    fn builtins_are_sorted_by_name() {
        let registry = DescriptorRegistry::with_builtins();
        let names = registry.type_names();

        assert!(!registry.is_empty());
        assert!(names.windows(2).all(|w| w[0] <= w[1]));
        assert!(names.contains(&"datetime_immutable"));
        assert!(names.contains(&"uuid"));
    }

    #[test]
    fn explicit_override_beats_custom_type() {
        let mut config = Config::default();
        config.custom_types.push(CustomTypeConfig {
            name: "custom".to_string(),
            to_property: "DateTimeInterface".to_string(),
            to_database: "array".to_string(),
        });
        config.descriptor_overrides.push(DescriptorOverride {
            name: "custom".to_string(),
            read: "int".to_string(),
            write: "int".to_string(),
        });

        let registry = DescriptorRegistry::from_config(&config).unwrap();
        let descriptor = registry.get("custom").unwrap();
        assert_eq!(descriptor.database_read_type(), &TypeExpr::Int);
        assert_eq!(descriptor.database_write_type(), &TypeExpr::Int);
    }

    #[test]
    fn invalid_override_is_rejected() {
        let mut config = Config::default();
        config.descriptor_overrides.push(DescriptorOverride {
            name: "broken".to_string(),
            read: "array<int>".to_string(),
            write: "string".to_string(),
        });

        let err = DescriptorRegistry::from_config(&config).unwrap_err();
        assert!(matches!(err, RegistryError::InvalidOverride { ref name, .. } if name == "broken"));
    }
}
