//! Entity column rule
//!
//! Compares, for every mapped property of a class, the column type's
//! descriptor against the property's declared type in both directions:
//!
//! - database → property: every value hydration can produce must fit the
//!   property;
//! - property → database: every value the property can hold must be
//!   accepted by the column.

use ormcheck_core::{
    Config, Diagnostic, DiagnosticCode, Location, Severity, SeverityThreshold, TypeExpr,
};
use ormcheck_descriptors::DescriptorRegistry;
use ormcheck_metadata::{ClassReflector, ColumnMapping, MetadataLoadError, MetadataResolver};

/// Rule behavior switches
#[derive(Debug, Clone, PartialEq)]
pub struct RuleOptions {
    /// Report column types that have no registered descriptor
    pub report_unknown_types: bool,

    /// Accept a nullable property for a non-nullable column on the write side
    pub allow_nullable_property_for_required_field: bool,

    /// Severity overrides per diagnostic code
    pub severity: SeverityThreshold,
}

impl Default for RuleOptions {
    fn default() -> Self {
        Self {
            report_unknown_types: true,
            allow_nullable_property_for_required_field: false,
            severity: SeverityThreshold::default(),
        }
    }
}

impl From<&Config> for RuleOptions {
    fn from(config: &Config) -> Self {
        Self {
            report_unknown_types: config.report_unknown_types,
            allow_nullable_property_for_required_field: config
                .allow_nullable_property_for_required_field,
            severity: config.severity.clone(),
        }
    }
}

/// Result of checking one class
#[derive(Debug, Clone, PartialEq)]
pub struct ClassCheck {
    /// The analyzed class
    pub class: String,

    /// Whether the resolver knows the class as mapped
    pub mapped: bool,

    /// Mappings the resolver returned for the class
    pub mappings: Vec<ColumnMapping>,

    /// Mappings that were actually compared; the others were skipped because
    /// the property is undeclared, untyped or of an unsupported type, or its
    /// column type is unknown and not reported
    pub checked: Vec<ColumnMapping>,

    /// Diagnostics produced by the comparison
    pub diagnostics: Vec<Diagnostic>,
}

impl ClassCheck {
    /// Check if the class has any errors
    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    /// Get count of errors
    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.severity == Severity::Error).count()
    }

    /// Whether the mapping was compared rather than skipped
    pub fn was_checked(&self, mapping: &ColumnMapping) -> bool {
        self.checked.contains(mapping)
    }
}

/// Checks column mappings of mapped classes against declared property types
pub struct EntityColumnRule<'a> {
    resolver: &'a dyn MetadataResolver,
    registry: &'a DescriptorRegistry,
    reflector: &'a dyn ClassReflector,
    options: RuleOptions,
}

impl<'a> EntityColumnRule<'a> {
    /// Create a rule with default options
    pub fn new(
        resolver: &'a dyn MetadataResolver,
        registry: &'a DescriptorRegistry,
        reflector: &'a dyn ClassReflector,
    ) -> Self {
        Self {
            resolver,
            registry,
            reflector,
            options: RuleOptions::default(),
        }
    }

    /// Set rule options
    pub fn with_options(mut self, options: RuleOptions) -> Self {
        self.options = options;
        self
    }

    pub fn resolver(&self) -> &'a dyn MetadataResolver {
        self.resolver
    }

    /// Check every mapped property of a class
    ///
    /// Unmapped classes yield an empty check. Metadata load failures are
    /// returned as is.
    pub fn check_class(&self, class: &str) -> Result<ClassCheck, MetadataLoadError> {
        let class = class.trim_start_matches('\\').to_string();

        if !self.resolver.is_mapped(&class)? {
            tracing::trace!(%class, "class is not mapped");
            return Ok(ClassCheck {
                class,
                mapped: false,
                mappings: Vec::new(),
                checked: Vec::new(),
                diagnostics: Vec::new(),
            });
        }

        let mappings = self.resolver.column_mappings(&class)?;
        let mut checked = Vec::new();
        let mut diagnostics = Vec::new();

        for mapping in &mappings {
            if let Some(found) = self.check_mapping(mapping) {
                checked.push(mapping.clone());
                diagnostics.extend(found);
            }
        }

        Ok(ClassCheck {
            class,
            mapped: true,
            mappings,
            checked,
            diagnostics,
        })
    }

    /// Check one column mapping; yields zero, one or two diagnostics
    ///
    /// Returns `None` when the mapping is skipped without comparison.
    pub fn check_mapping(&self, mapping: &ColumnMapping) -> Option<Vec<Diagnostic>> {
        let Some(property) = self
            .reflector
            .property(&mapping.declaring_class, &mapping.property_name)
        else {
            tracing::trace!(
                class = %mapping.declaring_class,
                property = %mapping.property_name,
                "mapped property is not declared, skipping"
            );
            return None;
        };

        let subject = format!("Property {}::${}", property.declaring_class, property.name);
        let location = Location::with_line(property.file.clone(), property.line);
        let diagnostic = |code: DiagnosticCode, message: String| {
            Diagnostic::new(code, self.options.severity.get_severity(code, Severity::Error), message)
                .with_location(location.clone())
                .with_subject(property.declaring_class.clone(), property.name.clone())
        };

        let descriptor = match self.registry.get(&mapping.column_type_name) {
            Ok(descriptor) => descriptor,
            Err(err) if self.options.report_unknown_types => {
                return Some(vec![diagnostic(
                    DiagnosticCode::OrmUnregisteredType,
                    format!("{}: {}", subject, err),
                )]);
            }
            Err(_) => return None,
        };

        let Some(property_type) = property
            .declared_type
            .as_deref()
            .and_then(|declared| TypeExpr::parse(declared).ok())
        else {
            tracing::trace!(
                class = %property.declaring_class,
                property = %property.name,
                declared = ?property.declared_type,
                "property type cannot be resolved, skipping"
            );
            return None;
        };

        let hierarchy = self.reflector.hierarchy();
        let mut diagnostics = Vec::new();

        let mut database_read = descriptor.database_read_type().clone();
        let mut database_write = descriptor.database_write_type().clone();
        if mapping.nullable {
            database_read = database_read.add_null();
            database_write = database_write.add_null();
        }

        if !database_read.is_assignable_to(&property_type, hierarchy) {
            diagnostics.push(diagnostic(
                DiagnosticCode::OrmTypeMismatch,
                format!(
                    "{} type mapping mismatch: database can contain {} but property expects {}.",
                    subject, database_read, property_type
                ),
            ));
        }

        // The database assigns generated identifiers, so null is never written.
        let null_never_written = mapping.is_generated
            || (self.options.allow_nullable_property_for_required_field && !mapping.nullable);
        let property_write = if null_never_written {
            property_type.remove_null()
        } else {
            property_type.clone()
        };

        if !property_write.is_assignable_to(&database_write, hierarchy) {
            diagnostics.push(diagnostic(
                DiagnosticCode::OrmTypeMismatch,
                format!(
                    "{} type mapping mismatch: property can contain {} but database expects {}.",
                    subject, property_type, database_write
                ),
            ));
        }

        Some(diagnostics)
    }
}
