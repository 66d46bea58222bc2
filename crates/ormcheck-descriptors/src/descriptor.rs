//! Type descriptor contract

use ormcheck_core::{TypeExpr, TypeParseError};

/// Read/write type contract of one database column type
///
/// The read type is what hydration can put into a property; the write type
/// is what the database layer accepts from a property. The two may differ,
/// e.g. a write type can be a wider union than the read type.
pub trait TypeDescriptor: Send + Sync + std::fmt::Debug {
    /// Column type name this descriptor is registered under
    fn type_name(&self) -> &str;

    /// Type the database produces when reading a value of this column type
    fn database_read_type(&self) -> &TypeExpr;

    /// Type the database accepts when writing a value of this column type
    fn database_write_type(&self) -> &TypeExpr;
}

/// Descriptor with a fixed contract
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StaticDescriptor {
    type_name: String,
    read: TypeExpr,
    write: TypeExpr,
}

impl StaticDescriptor {
    /// Create a descriptor from semantic types
    pub fn new(type_name: impl Into<String>, read: TypeExpr, write: TypeExpr) -> Self {
        Self {
            type_name: type_name.into(),
            read,
            write,
        }
    }

    /// Create a descriptor from declared type strings
    pub fn parse(
        type_name: impl Into<String>,
        read: &str,
        write: &str,
    ) -> Result<Self, TypeParseError> {
        Ok(Self::new(type_name, TypeExpr::parse(read)?, TypeExpr::parse(write)?))
    }

    /// Same contract for reads and writes
    pub fn symmetric(type_name: impl Into<String>, ty: TypeExpr) -> Self {
        Self::new(type_name, ty.clone(), ty)
    }
}

impl TypeDescriptor for StaticDescriptor {
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
