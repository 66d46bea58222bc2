//! Semantic type expressions and the assignability predicate
//!
//! Both sides of a column mapping are reduced to a [`TypeExpr`]: the
//! descriptor's read/write types and the property's declared type. The rule
//! then only needs [`TypeExpr::is_assignable_to`].

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use std::sync::OnceLock;

/// Semantic type of a value on either side of a mapping
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum TypeExpr {
    /// Any value
    Mixed,

    /// The null value
    Null,

    /// Integer
    Int,

    /// Floating point
    Float,

    /// String
    String,

    /// Boolean
    Bool,

    /// Array / list / map
    Array,

    /// Stream or other opaque resource handle
    Resource,

    /// Instance of a class or interface (fully-qualified, no leading `\`)
    Object { class: String },

    /// Normalized union; never nested, never holds `mixed`, `null` last
    Union { members: Vec<TypeExpr> },
}

/// Type expression parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TypeParseError {
    #[error("empty type expression")]
    Empty,

    #[error("unsupported type expression: {0}")]
    Unsupported(String),
}

/// Class hierarchy queries needed for object assignability
pub trait ClassHierarchy: Send + Sync {
    /// Whether `class` extends or implements `ancestor` (strictly or not)
    fn is_subtype(&self, class: &str, ancestor: &str) -> bool;
}

/// Hierarchy of the value-object classes the built-in descriptors use
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinHierarchy;

impl BuiltinHierarchy {
    /// Known direct supertypes of a built-in class
    pub fn supertypes(class: &str) -> &'static [&'static str] {
        const DATE_TIME: &[&str] = &["DateTimeInterface"];
        const UUID: &[&str] = &["Ramsey\\Uuid\\UuidInterface"];

        match class.to_ascii_lowercase().as_str() {
            "datetime" | "datetimeimmutable" => DATE_TIME,
            "ramsey\\uuid\\uuid" | "ramsey\\uuid\\lazy\\lazyuuidfromstring" => UUID,
            _ => &[],
        }
    }
}

impl ClassHierarchy for BuiltinHierarchy {
    fn is_subtype(&self, class: &str, ancestor: &str) -> bool {
        class.eq_ignore_ascii_case(ancestor)
            || Self::supertypes(class)
                .iter()
                .any(|parent| self.is_subtype(parent, ancestor))
    }
}

impl TypeExpr {
    /// Object type for a class name; a leading `\` is dropped
    pub fn object(class: impl AsRef<str>) -> Self {
        Self::Object {
            class: class.as_ref().trim_start_matches('\\').to_string(),
        }
    }

    /// Build a normalized union
    ///
    /// Nested unions are flattened, duplicates dropped, `mixed` absorbs
    /// everything and `null` is moved last. A single member is returned as is.
    pub fn union(types: impl IntoIterator<Item = TypeExpr>) -> Self {
        let mut members: Vec<TypeExpr> = Vec::new();
        let mut has_null = false;

        for ty in types {
            let flattened = match ty {
                Self::Union { members } => members,
                other => vec![other],
            };

            for member in flattened {
                match member {
                    Self::Mixed => return Self::Mixed,
                    Self::Null => has_null = true,
                    other => {
                        if !members.iter().any(|m| m.same_as(&other)) {
                            members.push(other);
                        }
                    }
                }
            }
        }

        if has_null {
            members.push(Self::Null);
        }

        match members.len() {
            0 => Self::Mixed,
            1 => members.remove(0),
            _ => Self::Union { members },
        }
    }

    /// Parse a declared type such as `int`, `?string`, `int|null`, `\DateTime`
    pub fn parse(text: &str) -> Result<Self, TypeParseError> {
        text.parse()
    }

    /// Union with `null`
    pub fn add_null(&self) -> Self {
        Self::union([self.clone(), Self::Null])
    }

    /// The type without `null`; a bare `null` is returned unchanged
    pub fn remove_null(&self) -> Self {
        match self {
            Self::Union { members } => {
                Self::union(members.iter().filter(|m| **m != Self::Null).cloned())
            }
            other => other.clone(),
        }
    }

    /// Whether every value of `self` is accepted by `target`
    pub fn is_assignable_to(&self, target: &TypeExpr, hierarchy: &dyn ClassHierarchy) -> bool {
        match (self, target) {
            (_, Self::Mixed) => true,
            (Self::Union { members }, _) => members
                .iter()
                .all(|member| member.is_assignable_to(target, hierarchy)),
            (_, Self::Union { members }) => members
                .iter()
                .any(|member| self.is_assignable_to(member, hierarchy)),
            (Self::Mixed, _) => false,
            (Self::Object { class: from }, Self::Object { class: to }) => {
                from.eq_ignore_ascii_case(to) || hierarchy.is_subtype(from, to)
            }
            (from, to) => from == to,
        }
    }

    fn same_as(&self, other: &TypeExpr) -> bool {
        match (self, other) {
            (Self::Object { class: a }, Self::Object { class: b }) => a.eq_ignore_ascii_case(b),
            (a, b) => a == b,
        }
    }

    fn parse_atom(text: &str) -> Result<Self, TypeParseError> {
        let atom = text.trim();
        if atom.is_empty() {
            return Err(TypeParseError::Empty);
        }

        let keyword = match atom.to_ascii_lowercase().as_str() {
            "mixed" => Some(Self::Mixed),
            "null" => Some(Self::Null),
            "int" | "integer" => Some(Self::Int),
            "float" | "double" => Some(Self::Float),
            "string" => Some(Self::String),
            "bool" | "boolean" => Some(Self::Bool),
            "array" => Some(Self::Array),
            "resource" => Some(Self::Resource),
            "callable" | "iterable" | "object" | "void" | "never" | "self" | "static"
            | "parent" | "true" | "false" | "scalar" => {
                return Err(TypeParseError::Unsupported(atom.to_string()))
            }
            _ => None,
        };

        if let Some(ty) = keyword {
            return Ok(ty);
        }

        if class_name_pattern().is_match(atom) {
            Ok(Self::object(atom))
        } else {
            Err(TypeParseError::Unsupported(atom.to_string()))
        }
    }
}

fn class_name_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^\\?[A-Za-z_][A-Za-z0-9_]*(\\[A-Za-z_][A-Za-z0-9_]*)*$")
            .expect("class name pattern is valid")
    })
}

impl FromStr for TypeExpr {
    type Err = TypeParseError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let text = text.trim();
        if text.is_empty() {
            return Err(TypeParseError::Empty);
        }

        if let Some(inner) = text.strip_prefix('?') {
            if inner.contains('|') {
                return Err(TypeParseError::Unsupported(text.to_string()));
            }
            return Ok(Self::parse_atom(inner)?.add_null());
        }

        let members = text
            .split('|')
            .map(Self::parse_atom)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self::union(members))
    }
}

impl std::fmt::Display for TypeExpr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Mixed => write!(f, "mixed"),
            Self::Null => write!(f, "null"),
            Self::Int => write!(f, "int"),
            Self::Float => write!(f, "float"),
            Self::String => write!(f, "string"),
            Self::Bool => write!(f, "bool"),
            Self::Array => write!(f, "array"),
            Self::Resource => write!(f, "resource"),
            Self::Object { class } => write!(f, "{}", class),
            Self::Union { members } => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        write!(f, "|")?;
                    }
                    write!(f, "{}", member)?;
                }
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ty(text: &str) -> TypeExpr {
        TypeExpr::parse(text).unwrap()
    }

    fn assignable(from: &str, to: &str) -> bool {
        ty(from).is_assignable_to(&ty(to), &BuiltinHierarchy)
    }

    #[test]
    fn parse_and_display() {
        assert_eq!(ty("int").to_string(), "int");
        assert_eq!(ty("?int").to_string(), "int|null");
        assert_eq!(ty("null|int").to_string(), "int|null");
        assert_eq!(ty("\\DateTime").to_string(), "DateTime");
        assert_eq!(ty("integer|Boolean").to_string(), "int|bool");
        assert_eq!(
            ty("\\Ramsey\\Uuid\\UuidInterface|string").to_string(),
            "Ramsey\\Uuid\\UuidInterface|string"
        );
    }

    #[test]
    fn parse_rejects_unsupported_shapes() {
        assert_eq!(TypeExpr::parse(""), Err(TypeParseError::Empty));
        assert_eq!(TypeExpr::parse("int|"), Err(TypeParseError::Empty));
        assert!(matches!(TypeExpr::parse("array<int>"), Err(TypeParseError::Unsupported(_))));
        assert!(matches!(TypeExpr::parse("A&B"), Err(TypeParseError::Unsupported(_))));
        assert!(matches!(TypeExpr::parse("callable"), Err(TypeParseError::Unsupported(_))));
        assert!(matches!(TypeExpr::parse("?int|string"), Err(TypeParseError::Unsupported(_))));
    }

    #[test]
    fn union_normalization() {
        assert_eq!(ty("string|mixed"), TypeExpr::Mixed);
        assert_eq!(ty("string|string"), TypeExpr::String);
        assert_eq!(ty("DateTime|\\datetime").to_string(), "DateTime");
        assert_eq!(TypeExpr::union([ty("int|null"), ty("string")]).to_string(), "int|string|null");
    }

    #[test]
    fn null_helpers() {
        assert_eq!(TypeExpr::String.add_null().to_string(), "string|null");
        assert_eq!(ty("string|null").remove_null(), TypeExpr::String);
        assert_eq!(TypeExpr::Null.remove_null(), TypeExpr::Null);
        assert_eq!(ty("?int").remove_null().add_null(), ty("int|null"));
    }

    #[test]
    fn scalar_assignability() {
        assert!(assignable("string", "string"));
        assert!(assignable("string", "string|null"));
        assert!(!assignable("string|null", "string"));
        assert!(!assignable("int", "float"));
        assert!(assignable("int", "int|string"));
        assert!(assignable("int", "mixed"));
        assert!(!assignable("mixed", "int"));
        assert!(assignable("resource", "mixed"));
    }

    #[test]
    fn object_assignability_uses_hierarchy() {
        assert!(assignable("DateTime", "DateTimeInterface"));
        assert!(assignable("DateTimeImmutable", "\\DateTimeInterface"));
        assert!(!assignable("DateTime", "DateTimeImmutable"));
        assert!(!assignable("DateTimeInterface", "DateTime"));
        assert!(assignable("Ramsey\\Uuid\\Uuid", "Ramsey\\Uuid\\UuidInterface|string"));
        assert!(!assignable("int", "Ramsey\\Uuid\\UuidInterface|string"));
    }
}
