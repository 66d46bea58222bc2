//! Descriptors derived from a type handler's declared conversion signatures
//!
//! Custom column types are implemented by a handler with two conversions:
//! database → property and property → database. Instead of hand-writing a
//! descriptor, the contract is read from those signatures: the declared
//! return type of the first becomes the read type, the declared value
//! parameter type of the second becomes the write type.

use crate::descriptor::TypeDescriptor;
use ormcheck_core::{CustomTypeConfig, TypeExpr};

/// Introspected signatures of a custom type handler
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeHandlerSignature {
    /// Column type name the handler is registered under
    pub type_name: String,

    /// Declared return type of the database → property conversion
    pub to_property_return: Option<String>,

    /// Declared value parameter type of the property → database conversion
    pub to_database_param: Option<String>,
}

impl From<&CustomTypeConfig> for TypeHandlerSignature {
    fn from(config: &CustomTypeConfig) -> Self {
        Self {
            type_name: config.name.clone(),
            to_property_return: Some(config.to_property.clone()),
            to_database_param: Some(config.to_database.clone()),
        }
    }
}

/// Descriptor built from a [`TypeHandlerSignature`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReflectionDescriptor {
    type_name: String,
    read: TypeExpr,
    write: TypeExpr,
}

impl ReflectionDescriptor {
    /// Build the descriptor; undeclared or unsupported types become `mixed`
    pub fn from_signature(signature: &TypeHandlerSignature) -> Self {
        Self {
            type_name: signature.type_name.clone(),
            read: declared_or_mixed(&signature.type_name, signature.to_property_return.as_deref()),
            write: declared_or_mixed(&signature.type_name, signature.to_database_param.as_deref()),
        }
    }
}

fn declared_or_mixed(type_name: &str, declared: Option<&str>) -> TypeExpr {
    let Some(declared) = declared else {
        return TypeExpr::Mixed;
    };

    TypeExpr::parse(declared).unwrap_or_else(|err| {
        tracing::debug!(type_name, declared, %err, "handler signature falls back to mixed");
        TypeExpr::Mixed
    })
}

impl TypeDescriptor for ReflectionDescriptor {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn database_read_type(&self) -> &TypeExpr {
        &self.read
    }

    fn database_write_type(&self) -> &TypeExpr {
        &self.write
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn descriptor_from_signature() {
        let descriptor = ReflectionDescriptor::from_signature(&TypeHandlerSignature {
            type_name: "custom".to_string(),
            to_property_return: Some("\\DateTimeInterface".to_string()),
            to_database_param: Some("array".to_string()),
        });

        assert_eq!(descriptor.type_name(), "custom");
        assert_eq!(descriptor.database_read_type().to_string(), "DateTimeInterface");
        assert_eq!(descriptor.database_write_type(), &TypeExpr::Array);
    }

    #[test]
    fn undeclared_signatures_are_mixed() {
        let descriptor = ReflectionDescriptor::from_signature(&TypeHandlerSignature {
            type_name: "loose".to_string(),
            to_property_return: None,
            to_database_param: Some("callable".to_string()),
        });

        assert_eq!(descriptor.database_read_type(), &TypeExpr::Mixed);
        assert_eq!(descriptor.database_write_type(), &TypeExpr::Mixed);
    }

    #[test]
    fn signature_from_config() {
        let config = CustomTypeConfig {
            name: "money".to_string(),
            to_property: "App\\Money".to_string(),
            to_database: "string".to_string(),
        };

        let descriptor = ReflectionDescriptor::from_signature(&(&config).into());
        assert_eq!(descriptor.database_read_type(), &TypeExpr::object("App\\Money"));
    }
}
