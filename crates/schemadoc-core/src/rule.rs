//! Rewrite rule model
//!
//! A rule pairs a match specification with a replacement template. Rules are
//! declarative data; compiling and applying them is the engine's job. Rule
//! order inside a set is meaningful: a rule sees the document as left by all
//! rules before it, and may anchor on text an earlier rule produced.

use serde::{Deserialize, Serialize};

/// How a rule locates the text it rewrites
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum MatchSpec {
    /// Exact text, matched verbatim
    Literal(String),

    /// Regular expression; may span lines and capture groups
    Pattern(String),
}

/// A single match-and-replace transformation
///
/// Every non-overlapping occurrence of the match is replaced in one
/// left-to-right pass. A rule that matches nothing leaves the document
/// byte-identical; there is no "apply at most once" primitive, so a rule
/// meant to fire once must carry a pattern specific enough to occur once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewriteRule {
    /// Stable rule identifier, unique within its rule set
    pub name: String,

    /// Match specification
    pub matcher: MatchSpec,

    /// Replacement text; `$1`-style group references for pattern rules
    pub replacement: String,

    /// Ordering annotation: what this rule assumes prior rules have done.
    /// Documentation only, not mechanically enforced.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl RewriteRule {
    /// Create a literal find/replace rule
    pub fn literal(
        name: impl Into<String>,
        find: impl Into<String>,
        replace: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: MatchSpec::Literal(find.into()),
            replacement: replace.into(),
            note: None,
        }
    }

    /// Create a pattern rule with a replacement template
    pub fn pattern(
        name: impl Into<String>,
        pattern: impl Into<String>,
        template: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: MatchSpec::Pattern(pattern.into()),
            replacement: template.into(),
            note: None,
        }
    }

    /// Attach an ordering note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Whether this is the degenerate literal form
    pub fn is_literal(&self) -> bool {
        matches!(self.matcher, MatchSpec::Literal(_))
    }
}

/// Rules grouped by the document section they rewrite
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleGroup {
    /// Logical entity the group affects (e.g. a table name)
    pub name: String,

    /// Rules in application order
    pub rules: Vec<RewriteRule>,
}

impl RuleGroup {
    /// Create an empty group
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rules: Vec::new(),
        }
    }

    /// Append a rule to the group
    pub fn rule(mut self, rule: RewriteRule) -> Self {
        self.rules.push(rule);
        self
    }
}

/// Ordered collection of rule groups applied in one run
///
/// Iteration order is application order. Rules are not independent: a later
/// rule's pattern must be satisfiable against the document as produced by
/// all rules before it.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuleSet {
    /// Groups in application order
    pub groups: Vec<RuleGroup>,
}

impl RuleSet {
    /// Create an empty rule set
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a group to the set
    pub fn group(mut self, group: RuleGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Iterate over all rules in application order, with their group name
    pub fn iter(&self) -> impl Iterator<Item = (&str, &RewriteRule)> {
        self.groups
            .iter()
            .flat_map(|g| g.rules.iter().map(move |r| (g.name.as_str(), r)))
    }

    /// Total number of rules across all groups
    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.rules.len()).sum()
    }

    /// Whether the set contains no rules
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
