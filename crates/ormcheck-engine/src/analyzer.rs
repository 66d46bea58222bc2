//! Multi-class analysis driver
//!
//! Runs the entity column rule over a set of classes and folds the results
//! into a [`Report`]. A mapping inherited from a mapped superclass is checked
//! once per subclass, but always attributed to the declaring class, so
//! identical diagnostics are reported only once.

use crate::entity_column_rule::EntityColumnRule;
use ormcheck_core::{AllowlistRules, Report};
use ormcheck_metadata::MetadataLoadError;
use std::collections::HashSet;

/// Engine errors
#[derive(Debug, Clone, thiserror::Error)]
pub enum EngineError {
    #[error(transparent)]
    Metadata(#[from] MetadataLoadError),
}

/// Runs the rule over many classes
pub struct Analyzer<'a> {
    rule: EntityColumnRule<'a>,
    allowlist: AllowlistRules,
    ignore: Vec<String>,
}

impl<'a> Analyzer<'a> {
    pub fn new(rule: EntityColumnRule<'a>) -> Self {
        Self {
            rule,
            allowlist: AllowlistRules::default(),
            ignore: Vec::new(),
        }
    }

    /// Skip classes matched by the allowlist
    pub fn with_allowlist(mut self, allowlist: AllowlistRules) -> Self {
        self.allowlist = allowlist;
        self
    }

    /// Drop diagnostics with these fingerprints from the report
    pub fn with_ignore(mut self, ignore: Vec<String>) -> Self {
        self.ignore = ignore;
        self
    }

    /// Analyze every class the resolver knows as mapped
    pub fn analyze_all(&self) -> Result<Report, EngineError> {
        let classes = self.rule.resolver().mapped_classes()?;
        self.analyze(classes)
    }

    /// Analyze the given classes, in order
    pub fn analyze<I, S>(&self, classes: I) -> Result<Report, EngineError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut report = Report::new();
        let mut seen_diagnostics = HashSet::new();
        let mut seen_properties = HashSet::new();

        for class in classes {
            let class = class.as_ref();
            if self.allowlist.is_class_skipped(class.trim_start_matches('\\')) {
                tracing::debug!(%class, "class skipped by allowlist");
                continue;
            }

            let check = self.rule.check_class(class)?;
            if !check.mapped {
                continue;
            }

            tracing::debug!(
                class = %check.class,
                mappings = check.mappings.len(),
                checked = check.checked.len(),
                diagnostics = check.diagnostics.len(),
                "class checked"
            );

            report.summary.classes_checked += 1;
            for mapping in &check.checked {
                seen_properties.insert((mapping.declaring_class.clone(), mapping.property_name.clone()));
            }

            for diagnostic in check.diagnostics {
                if seen_diagnostics.insert(diagnostic.clone()) {
                    report.add_diagnostic(diagnostic);
                }
            }
        }

        report.summary.properties_checked = seen_properties.len();
        let suppressed = report.suppress(&self.ignore);

        tracing::info!(
            classes = report.summary.classes_checked,
            properties = report.summary.properties_checked,
            diagnostics = report.summary.total,
            suppressed,
            "analysis finished"
        );

        Ok(report)
    }
}
