//! Test fixtures for entity column rule integration tests
//!
//! A small mapped domain exercising every interesting corner: broken
//! mappings, a mapped superclass, generated identifiers, a custom type
//! derived from its handler signature and an unknown column type.

#![allow(dead_code)]

use ormcheck_descriptors::{builtin, DescriptorRegistry, ReflectionDescriptor, TypeHandlerSignature};
use ormcheck_metadata::{
    ClassDeclaration, ClassMetadata, EntityManager, EntityManifest, FieldMapping, GeneratorType,
    MappingKind, SourceIndex,
};
use std::collections::BTreeMap;

pub const BROKEN_ENTITY: &str = "App\\Entity\\MyBrokenEntity";
pub const BROKEN_SUPERCLASS: &str = "App\\Entity\\MyBrokenSuperclass";
pub const SUPERCLASS_CHILD: &str = "App\\Entity\\MyEntityExtendingSuperclass";
pub const CUSTOM_TYPE_ENTITY: &str = "App\\Entity\\EntityWithCustomType";
pub const UNKNOWN_TYPE_ENTITY: &str = "App\\Entity\\EntityWithUnknownType";
pub const LOOSE_ENTITY: &str = "App\\Entity\\LooselyTypedEntity";
pub const PLAIN_CLASS: &str = "App\\Service\\Mailer";

pub fn generated_id_entity(n: usize) -> String {
    format!("App\\Entity\\GeneratedIdEntity{}", n)
}

fn field(name: &str, column_type: &str, nullable: bool) -> FieldMapping {
    FieldMapping {
        name: name.to_string(),
        column_type: column_type.to_string(),
        nullable,
    }
}

fn entity(fields: Vec<FieldMapping>) -> ClassMetadata {
    ClassMetadata {
        kind: MappingKind::Entity,
        parent: None,
        identifier: vec!["id".to_string()],
        generator: GeneratorType::Auto,
        fields,
    }
}

/// Entity-manager manifest of the fixture domain
pub fn manifest() -> EntityManifest {
    let mut classes = BTreeMap::new();

    classes.insert(
        BROKEN_ENTITY.to_string(),
        entity(vec![
            field("id", "bigint", false),
            field("one", "string", true),
            field("two", "string", false),
            field("three", "datetime", false),
            field("four", "datetime_immutable", false),
            field("number", "integer", false),
            field("uuid", "uuid", false),
            field("uuidNullable", "uuid", true),
            field("createdAt", "datetime", false),
            field("uuidInvalidType", "uuid", false),
        ]),
    );

    classes.insert(
        BROKEN_SUPERCLASS.to_string(),
        ClassMetadata {
            kind: MappingKind::MappedSuperclass,
            parent: None,
            identifier: Vec::new(),
            generator: GeneratorType::None,
            fields: vec![field("five", "binary", false)],
        },
    );

    classes.insert(
        SUPERCLASS_CHILD.to_string(),
        ClassMetadata {
            parent: Some(BROKEN_SUPERCLASS.to_string()),
            ..entity(vec![field("id", "integer", false)])
        },
    );

    // not nullable / nullable column / nullable property / nullable both
    for (n, nullable_column) in [(1, false), (2, true), (3, false), (4, true)] {
        classes.insert(
            generated_id_entity(n),
            entity(vec![field("id", "string", nullable_column)]),
        );
    }

    classes.insert(
        CUSTOM_TYPE_ENTITY.to_string(),
        entity(vec![field("id", "integer", false), field("foo", "custom", false)]),
    );

    classes.insert(
        UNKNOWN_TYPE_ENTITY.to_string(),
        entity(vec![field("id", "integer", false), field("foo", "unknown", false)]),
    );

    // one untyped property, one mapping with no declared property
    classes.insert(
        LOOSE_ENTITY.to_string(),
        entity(vec![
            field("id", "integer", false),
            field("untyped", "string", true),
            field("undeclared", "string", false),
        ]),
    );

    EntityManifest {
        entity_managers: vec![EntityManager {
            name: "default".to_string(),
            classes,
        }],
    }
}

/// Reflected declarations of the fixture domain
pub fn source_index() -> SourceIndex {
    let mut index = SourceIndex::new()
        .with_class(
            BROKEN_ENTITY,
            ClassDeclaration::new("src/Entity/MyBrokenEntity.php")
                .with_property("id", Some("int|null"), 19)
                .with_property("one", Some("string"), 25)
                .with_property("two", Some("string|null"), 31)
                .with_property("three", Some("\\DateTimeImmutable"), 37)
                .with_property("four", Some("\\DateTime"), 43)
                .with_property("number", Some("int"), 49)
                .with_property("uuid", Some("\\Ramsey\\Uuid\\UuidInterface"), 55)
                .with_property("uuidNullable", Some("?\\Ramsey\\Uuid\\UuidInterface"), 61)
                .with_property("createdAt", Some("\\DateTimeInterface"), 66)
                .with_property("uuidInvalidType", Some("int"), 72),
        )
        .with_class(
            BROKEN_SUPERCLASS,
            ClassDeclaration::new("src/Entity/MyBrokenSuperclass.php")
                .with_property("five", Some("int"), 17),
        )
        .with_class(
            SUPERCLASS_CHILD,
            ClassDeclaration::new("src/Entity/MyEntityExtendingSuperclass.php")
                .with_parent(BROKEN_SUPERCLASS)
                .with_property("id", Some("int"), 12),
        )
        .with_class(
            CUSTOM_TYPE_ENTITY,
            ClassDeclaration::new("src/Entity/EntityWithCustomType.php")
                .with_property("id", Some("int"), 18)
                .with_property("foo", Some("int"), 24),
        )
        .with_class(
            UNKNOWN_TYPE_ENTITY,
            ClassDeclaration::new("src/Entity/EntityWithUnknownType.php")
                .with_property("id", Some("int"), 18)
                .with_property("foo", Some("int"), 24),
        )
        .with_class(
            LOOSE_ENTITY,
            ClassDeclaration::new("src/Entity/LooselyTypedEntity.php")
                .with_property("id", Some("int"), 14)
                .with_property("untyped", None, 17),
        )
        .with_class(PLAIN_CLASS, ClassDeclaration::new("src/Service/Mailer.php"));

    for (n, property_type) in [(1, "string"), (2, "string"), (3, "?string"), (4, "string|null")] {
        index.add_class(
            generated_id_entity(n),
            ClassDeclaration::new(format!("src/Entity/GeneratedIdEntity{}.php", n))
                .with_property("id", Some(property_type), 19),
        );
    }

    index
}

/// The descriptor set the fixture domain is checked against
pub fn registry() -> DescriptorRegistry {
    let mut registry = DescriptorRegistry::new();
    registry.register(builtin::bigint());
    registry.register(builtin::string());
    registry.register(builtin::datetime());
    registry.register(builtin::datetime_immutable());
    registry.register(builtin::binary());
    registry.register(builtin::integer());
    registry.register(ReflectionDescriptor::from_signature(&TypeHandlerSignature {
        type_name: "custom".to_string(),
        to_property_return: Some("\\DateTimeInterface".to_string()),
        to_database_param: Some("array".to_string()),
    }));
    registry.register(builtin::date());
    registry.register(builtin::uuid("uuid"));
    registry
}
