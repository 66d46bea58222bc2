//! Built-in descriptors for the standard column types

use crate::descriptor::StaticDescriptor;
use ormcheck_core::TypeExpr;

/// Class the uuid column types hydrate into
pub const UUID_INTERFACE: &str = "Ramsey\\Uuid\\UuidInterface";

/// Large integers are hydrated as strings but accept ints on write
pub fn bigint() -> StaticDescriptor {
    StaticDescriptor::new(
        "bigint",
        TypeExpr::String,
        TypeExpr::union([TypeExpr::Int, TypeExpr::String]),
    )
}

pub fn string() -> StaticDescriptor {
    StaticDescriptor::symmetric("string", TypeExpr::String)
}

pub fn text() -> StaticDescriptor {
    StaticDescriptor::symmetric("text", TypeExpr::String)
}

pub fn integer() -> StaticDescriptor {
    StaticDescriptor::symmetric("integer", TypeExpr::Int)
}

pub fn smallint() -> StaticDescriptor {
    StaticDescriptor::symmetric("smallint", TypeExpr::Int)
}

pub fn boolean() -> StaticDescriptor {
    StaticDescriptor::symmetric("boolean", TypeExpr::Bool)
}

pub fn float() -> StaticDescriptor {
    StaticDescriptor::symmetric("float", TypeExpr::Float)
}

/// Decimals keep their precision as numeric strings
pub fn decimal() -> StaticDescriptor {
    StaticDescriptor::symmetric("decimal", TypeExpr::String)
}

/// Binary columns hydrate into stream resources
pub fn binary() -> StaticDescriptor {
    StaticDescriptor::new("binary", TypeExpr::Resource, TypeExpr::Mixed)
}

pub fn blob() -> StaticDescriptor {
    StaticDescriptor::new("blob", TypeExpr::Resource, TypeExpr::Mixed)
}

pub fn date() -> StaticDescriptor {
    mutable_date_time("date")
}

pub fn datetime() -> StaticDescriptor {
    mutable_date_time("datetime")
}

pub fn date_immutable() -> StaticDescriptor {
    StaticDescriptor::symmetric("date_immutable", TypeExpr::object("DateTimeImmutable"))
}

pub fn datetime_immutable() -> StaticDescriptor {
    StaticDescriptor::symmetric("datetime_immutable", TypeExpr::object("DateTimeImmutable"))
}

pub fn json() -> StaticDescriptor {
    StaticDescriptor::symmetric("json", TypeExpr::Mixed)
}

/// UUID column types read as value objects and accept raw strings on write
pub fn uuid(type_name: impl Into<String>) -> StaticDescriptor {
    StaticDescriptor::new(
        type_name,
        TypeExpr::object(UUID_INTERFACE),
        TypeExpr::union([TypeExpr::object(UUID_INTERFACE), TypeExpr::String]),
    )
}

// Hydrates DateTime, accepts any DateTimeInterface on write
fn mutable_date_time(type_name: &str) -> StaticDescriptor {
    StaticDescriptor::new(
        type_name,
        TypeExpr::object("DateTime"),
        TypeExpr::object("DateTimeInterface"),
    )
}

/// All built-in descriptors, in registration order
pub fn all() -> Vec<StaticDescriptor> {
    vec![
        bigint(),
        string(),
        text(),
        integer(),
        smallint(),
        boolean(),
        float(),
        decimal(),
        binary(),
        blob(),
        date(),
        datetime(),
        date_immutable(),
        datetime_immutable(),
        json(),
        uuid("uuid"),
        uuid("uuid_binary"),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::TypeDescriptor;
    use std::collections::HashSet;

    #[test]
    fn names_are_unique() {
        let all = all();
        let names: HashSet<_> = all.iter().map(|d| d.type_name().to_string()).collect();
        assert_eq!(names.len(), all.len());
    }

    #[test]
    fn uuid_contract_is_asymmetric() {
        let descriptor = uuid("uuid");
        assert_eq!(descriptor.database_read_type().to_string(), "Ramsey\\Uuid\\UuidInterface");
        assert_eq!(
            descriptor.database_write_type().to_string(),
            "Ramsey\\Uuid\\UuidInterface|string"
        );
    }

    #[test]
    fn datetime_accepts_immutable_on_write() {
        let descriptor = datetime();
        assert!(TypeExpr::object("DateTimeImmutable").is_assignable_to(
            descriptor.database_write_type(),
            &ormcheck_core::BuiltinHierarchy
        ));
        assert_eq!(descriptor.database_read_type().to_string(), "DateTime");
    }

    #[test]
    fn bigint_reads_strings_and_writes_ints() {
        let descriptor = bigint();
        assert_eq!(descriptor.database_read_type(), &TypeExpr::String);
        assert_eq!(descriptor.database_write_type().to_string(), "int|string");
    }
}
