//! Document rewriter
//!
//! `DocumentRewriter::new` compiles the whole rule set before any text is
//! touched, so a malformed pattern aborts the run while the source document
//! is still intact. `apply` then threads the buffer through every rule in
//! declared order; each rule sees the output of the one before it.

use regex::Regex;
use schemadoc_core::{MatchSpec, RuleOutcome, RuleSet};

/// Error constructing a rewriter from a rule set
#[derive(Debug, thiserror::Error)]
pub enum RewriteError {
    #[error("rule '{rule}' has an invalid pattern: {source}")]
    Pattern {
        rule: String,
        #[source]
        source: Box<regex::Error>,
    },

    /// An empty literal would match between every pair of characters
    #[error("rule '{rule}' has an empty match text")]
    EmptyLiteral { rule: String },
}

#[derive(Debug)]
enum CompiledMatcher {
    Literal(String),
    Pattern(Regex),
}

#[derive(Debug)]
struct CompiledRule {
    group: String,
    name: String,
    matcher: CompiledMatcher,
    replacement: String,
}

/// Result of one run over a document
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// Final document text
    pub text: String,

    /// Per-rule outcomes, in application order
    pub outcomes: Vec<RuleOutcome>,
}

/// Applies a compiled rule set to document text
#[derive(Debug)]
pub struct DocumentRewriter {
    rules: Vec<CompiledRule>,
}

impl DocumentRewriter {
    /// Compile every rule in the set, in order
    ///
    /// Fails on the first malformed pattern or empty literal; nothing is
    /// applied until every rule has compiled.
    pub fn new(rules: &RuleSet) -> Result<Self, RewriteError> {
        let mut compiled = Vec::with_capacity(rules.len());

        for (group, rule) in rules.iter() {
            let matcher = match &rule.matcher {
                MatchSpec::Literal(find) => {
                    if find.is_empty() {
                        return Err(RewriteError::EmptyLiteral {
                            rule: rule.name.clone(),
                        });
                    }
                    CompiledMatcher::Literal(find.clone())
                }
                MatchSpec::Pattern(pattern) => {
                    let re = Regex::new(pattern).map_err(|e| RewriteError::Pattern {
                        rule: rule.name.clone(),
                        source: Box::new(e),
                    })?;
                    CompiledMatcher::Pattern(re)
                }
            };

            compiled.push(CompiledRule {
                group: group.to_string(),
                name: rule.name.clone(),
                matcher,
                replacement: rule.replacement.clone(),
            });
        }

        Ok(Self { rules: compiled })
    }

    /// Number of compiled rules
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether the rewriter holds no rules
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Apply every rule in order, threading each rule's output into the next
    ///
    /// Every non-overlapping occurrence of a rule's match is replaced in a
    /// single left-to-right pass. A rule that matches nothing is recorded
    /// with `matches == 0` and leaves the text byte-identical. Given the
    /// same input and rule set the output is always identical.
    pub fn apply(&self, input: &str) -> RewriteOutcome {
        let mut text = input.to_string();
        let mut outcomes = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            let (matches, rewritten) = match &rule.matcher {
                CompiledMatcher::Literal(find) => {
                    let matches = text.matches(find.as_str()).count();
                    let rewritten =
                        (matches > 0).then(|| text.replace(find.as_str(), &rule.replacement));
                    (matches, rewritten)
                }
                CompiledMatcher::Pattern(re) => {
                    let matches = re.find_iter(&text).count();
                    let rewritten = (matches > 0)
                        .then(|| re.replace_all(&text, rule.replacement.as_str()).into_owned());
                    (matches, rewritten)
                }
            };

            // An identity replacement matches without changing the text
            let changed = rewritten.as_deref().is_some_and(|r| r != text);

            outcomes.push(RuleOutcome {
                group: rule.group.clone(),
                rule: rule.name.clone(),
                matches,
                changed,
            });

            if let Some(rewritten) = rewritten {
                text = rewritten;
            }
        }

        RewriteOutcome { text, outcomes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use schemadoc_core::{RewriteRule, RuleGroup, RuleSet};

    fn set_of(rules: Vec<RewriteRule>) -> RuleSet {
        let mut group = RuleGroup::new("test");
        for rule in rules {
            group = group.rule(rule);
        }
        RuleSet::new().group(group)
    }

    #[test]
    fn literal_replaces_all_occurrences() {
        let set = set_of(vec![RewriteRule::literal("swap", "user_id", "id")]);
        let rewriter = DocumentRewriter::new(&set).unwrap();

        let out = rewriter.apply("user_id, name, user_id");
        assert_eq!(out.text, "id, name, id");
        assert_eq!(out.outcomes[0].matches, 2);
        assert!(out.outcomes[0].changed);
    }

    #[test]
    fn pattern_capture_groups_substitute() {
        let set = set_of(vec![RewriteRule::pattern(
            "wrap",
            r"(\w+) BIGSERIAL",
            "$1 BIGINT GENERATED ALWAYS AS IDENTITY",
        )]);
        let rewriter = DocumentRewriter::new(&set).unwrap();

        let out = rewriter.apply("    seat_id BIGSERIAL PRIMARY KEY,");
        assert_eq!(
            out.text,
            "    seat_id BIGINT GENERATED ALWAYS AS IDENTITY PRIMARY KEY,"
        );
    }

    #[test]
    fn pattern_spans_line_boundaries() {
        let set = set_of(vec![RewriteRule::pattern(
            "collapse",
            r"alpha,\s+beta",
            "alpha,\n    gamma,\n    beta",
        )]);
        let rewriter = DocumentRewriter::new(&set).unwrap();

        let out = rewriter.apply("alpha,\n    beta");
        assert_eq!(out.text, "alpha,\n    gamma,\n    beta");
    }

    #[test]
    fn zero_match_rule_is_a_silent_no_op() {
        let set = set_of(vec![RewriteRule::literal("ghost", "not present", "x")]);
        let rewriter = DocumentRewriter::new(&set).unwrap();

        let input = "some document text";
        let out = rewriter.apply(input);
        assert_eq!(out.text, input);
        assert_eq!(out.outcomes[0].matches, 0);
        assert!(!out.outcomes[0].changed);
    }

    #[test]
    fn apply_is_deterministic() {
        let set = set_of(vec![
            RewriteRule::literal("a", "one", "two"),
            RewriteRule::pattern("b", r"t(w)o", "t$1in"),
        ]);
        let rewriter = DocumentRewriter::new(&set).unwrap();

        let first = rewriter.apply("one one");
        let second = rewriter.apply("one one");
        assert_eq!(first.text, second.text);
        assert_eq!(first.outcomes, second.outcomes);
    }

    #[test]
    fn rule_order_is_observable() {
        // r1 renames every user_id; r2 anchors on user_id elsewhere in the
        // document, so it only fires if it runs before r1.
        let r1 = RewriteRule::literal("rename", "user_id", "id");
        let r2 = RewriteRule::literal(
            "retarget-fk",
            "REFERENCES users(user_id)",
            "REFERENCES users(uid)",
        );

        let input = "    user_id BIGSERIAL PRIMARY KEY,\n    owner BIGINT REFERENCES users(user_id),";

        let rename_first = DocumentRewriter::new(&set_of(vec![r1.clone(), r2.clone()])).unwrap();
        let out = rename_first.apply(input);
        assert_eq!(
            out.text,
            "    id BIGSERIAL PRIMARY KEY,\n    owner BIGINT REFERENCES users(id),"
        );
        // r1 already consumed r2's anchor
        assert_eq!(out.outcomes[1].matches, 0);

        let retarget_first = DocumentRewriter::new(&set_of(vec![r2, r1])).unwrap();
        let swapped = retarget_first.apply(input);
        assert_eq!(
            swapped.text,
            "    id BIGSERIAL PRIMARY KEY,\n    owner BIGINT REFERENCES users(uid),"
        );
        assert_eq!(swapped.outcomes[0].matches, 1);

        assert_ne!(out.text, swapped.text);
    }

    #[test]
    fn malformed_pattern_fails_before_any_application() {
        let set = set_of(vec![
            RewriteRule::literal("fine", "a", "b"),
            RewriteRule::pattern("broken", r"(unclosed", "$1"),
        ]);

        let err = DocumentRewriter::new(&set).unwrap_err();
        match err {
            RewriteError::Pattern { rule, .. } => assert_eq!(rule, "broken"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_literal_is_rejected() {
        let set = set_of(vec![RewriteRule::literal("empty", "", "x")]);
        let err = DocumentRewriter::new(&set).unwrap_err();
        assert!(matches!(err, RewriteError::EmptyLiteral { rule } if rule == "empty"));
    }

    #[test]
    fn identity_replacement_matches_without_changing() {
        let set = set_of(vec![RewriteRule::literal("keep", "FK: movie_id", "FK: movie_id")]);
        let rewriter = DocumentRewriter::new(&set).unwrap();

        let out = rewriter.apply("| FK: movie_id |");
        assert_eq!(out.text, "| FK: movie_id |");
        assert_eq!(out.outcomes[0].matches, 1);
        assert!(!out.outcomes[0].changed);
    }

    #[test]
    fn empty_rule_set_returns_input() {
        let rewriter = DocumentRewriter::new(&RuleSet::new()).unwrap();
        assert!(rewriter.is_empty());

        let out = rewriter.apply("untouched");
        assert_eq!(out.text, "untouched");
        assert!(out.outcomes.is_empty());
    }
}
