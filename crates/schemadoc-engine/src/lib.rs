//! SchemaDoc engine
//!
//! Applies an ordered rule set to a document buffer: compile every rule up
//! front, then fold the text through the rules in declared order.

pub mod rewriter;

pub use rewriter::{DocumentRewriter, RewriteError, RewriteOutcome};
