//! ormcheck engine - Core business logic
//!
//! This crate implements the main business logic for ormcheck:
//! - Entity column rule (column type vs property type, both directions)
//! - Multi-class analysis and report generation

pub mod analyzer;
pub mod entity_column_rule;

pub use analyzer::{Analyzer, EngineError};
pub use entity_column_rule::{ClassCheck, EntityColumnRule, RuleOptions};
