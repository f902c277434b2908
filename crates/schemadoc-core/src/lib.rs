//! SchemaDoc Core
//!
//! Domain model for the design-document rewriter: rewrite rules and rule
//! sets, the document buffer with its file boundary, configuration, and the
//! stable rewrite report schema.

pub mod config;
pub mod document;
pub mod report;
pub mod rule;

pub use config::{Config, ConfigError, NoMatchPolicy};
pub use document::{Document, DocumentError};
pub use report::{ReportSummary, ReportVersion, RewriteReport, RuleOutcome};
pub use rule::{MatchSpec, RewriteRule, RuleGroup, RuleSet};
