//! Rewrite report schema (stable v1)
//!
//! The report records what every rule did in one run: match count, whether
//! the document changed, and input/output checksums. Zero matches is data
//! here, not an error; policy for surfacing it lives with the caller.

use serde::{Deserialize, Serialize};

/// Report schema version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportVersion {
    /// Major version (breaking changes)
    pub major: u32,

    /// Minor version (backward-compatible additions)
    pub minor: u32,
}

impl ReportVersion {
    /// Current report schema version
    pub const CURRENT: ReportVersion = ReportVersion { major: 1, minor: 0 };
}

impl std::fmt::Display for ReportVersion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// What a single rule did to the document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleOutcome {
    /// Group the rule belongs to
    pub group: String,

    /// Rule name
    pub rule: String,

    /// Number of non-overlapping occurrences replaced
    pub matches: usize,

    /// Whether the document text actually changed. A rule can match and
    /// still change nothing when its replacement equals the matched text.
    pub changed: bool,
}

/// Summary statistics for a run
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportSummary {
    /// Total number of rules applied
    pub rules_total: usize,

    /// Rules that changed the document
    pub rules_changed: usize,

    /// Rules that matched nothing
    pub rules_no_match: usize,

    /// Total occurrences replaced across all rules
    pub replacements: usize,
}

/// Rewrite report (report.json v1)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteReport {
    /// Schema version
    pub version: ReportVersion,

    /// Timestamp (ISO 8601)
    pub timestamp: String,

    /// SHA-256 of the document before the run
    pub input_checksum: String,

    /// SHA-256 of the document after the run
    pub output_checksum: String,

    /// Summary statistics
    pub summary: ReportSummary,

    /// Per-rule outcomes, in application order
    pub outcomes: Vec<RuleOutcome>,
}

impl RewriteReport {
    /// Build a report from per-rule outcomes
    pub fn from_outcomes(
        input_checksum: impl Into<String>,
        output_checksum: impl Into<String>,
        outcomes: Vec<RuleOutcome>,
    ) -> Self {
        let summary = ReportSummary {
            rules_total: outcomes.len(),
            rules_changed: outcomes.iter().filter(|o| o.changed).count(),
            rules_no_match: outcomes.iter().filter(|o| o.matches == 0).count(),
            replacements: outcomes.iter().map(|o| o.matches).sum(),
        };

        Self {
            version: ReportVersion::CURRENT,
            timestamp: chrono::Utc::now().to_rfc3339(),
            input_checksum: input_checksum.into(),
            output_checksum: output_checksum.into(),
            summary,
            outcomes,
        }
    }

    /// Rules that matched nothing this run
    pub fn no_match_rules(&self) -> impl Iterator<Item = &RuleOutcome> {
        self.outcomes.iter().filter(|o| o.matches == 0)
    }

    /// Whether any rule changed the document
    pub fn has_changes(&self) -> bool {
        self.summary.rules_changed > 0
    }

    /// Serialize to JSON string
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Save to file
    pub fn save_to_file(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let json = self
            .to_json()
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
        std::fs::write(path, json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn outcome(rule: &str, matches: usize, changed: bool) -> RuleOutcome {
        RuleOutcome {
            group: "users".to_string(),
            rule: rule.to_string(),
            matches,
            changed,
        }
    }

    #[test]
    fn summary_counts() {
        let report = RewriteReport::from_outcomes(
            "in",
            "out",
            vec![
                outcome("a", 1, true),
                outcome("b", 0, false),
                outcome("c", 3, true),
                outcome("d", 1, false),
            ],
        );

        assert_eq!(report.summary.rules_total, 4);
        assert_eq!(report.summary.rules_changed, 2);
        assert_eq!(report.summary.rules_no_match, 1);
        assert_eq!(report.summary.replacements, 5);
        assert!(report.has_changes());

        let no_match: Vec<_> = report.no_match_rules().map(|o| o.rule.as_str()).collect();
        assert_eq!(no_match, vec!["b"]);
    }

    #[test]
    fn unchanged_run() {
        let report = RewriteReport::from_outcomes("same", "same", vec![outcome("a", 0, false)]);
        assert!(!report.has_changes());
        assert_eq!(report.input_checksum, report.output_checksum);
    }

    #[test]
    fn report_serialization() {
        let report = RewriteReport::from_outcomes("in", "out", vec![outcome("a", 2, true)]);
        let json = report.to_json().unwrap();
        assert!(json.contains("\"outcomes\""));
        assert!(json.contains("\"input_checksum\""));

        let back: RewriteReport = serde_json::from_str(&json).unwrap();
        assert_eq!(back.summary, report.summary);
    }
}
