//! ormcheck Core
//!
//! Core domain model: semantic types, diagnostics, configuration, reports.
//! Never rename diagnostic codes or message templates - they are part of the
//! public API.

pub mod diagnostic;
pub mod types;
pub mod report;
pub mod config;

pub use diagnostic::{Diagnostic, DiagnosticCode, Severity, Location};
pub use types::{TypeExpr, TypeParseError, ClassHierarchy, BuiltinHierarchy};
pub use report::{Report, ReportSummary, ReportVersion};
pub use config::{Config, ConfigError, SeverityThreshold, AllowlistRules, CustomTypeConfig, DescriptorOverride, glob_match};
