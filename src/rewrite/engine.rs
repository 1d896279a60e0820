//! Substitution engine: ordered rule application over a single document.
//!
//! Given a rule table, the engine:
//! 1. Collects every non-overlapping match for a rule, left to right
//! 2. Drops candidates whose lookahead marker never appears after the match
//! 3. Splices the replacements in back to front, so earlier offsets stay valid
//! 4. Feeds the result to the next rule in declaration order

use regex::{Captures, Regex};
use serde::Serialize;

use crate::error::Result;

// ============================================================================
// Types
// ============================================================================

/// How a pattern rule builds its replacement text.
pub enum Replacement {
    /// Fixed template with `${n}` back-references to captured groups.
    Template(&'static str),
    /// Function of the captures. Used where the replacement must carry
    /// captured sub-values (a boolean, a message expression) through unchanged.
    Computed(fn(&Captures) -> String),
}

/// A single rewrite rule.
pub enum Rule {
    /// Exact substring swap, no pattern. Used where the patterned form is not
    /// specific enough to match unambiguously.
    Literal {
        name: &'static str,
        from: &'static str,
        to: &'static str,
    },
    /// Regex substitution over the whole document. When `lookahead` is set,
    /// a candidate match only counts if the marker string appears somewhere
    /// after the match end.
    Pattern {
        name: &'static str,
        pattern: &'static str,
        lookahead: Option<&'static str>,
        replacement: Replacement,
    },
}

/// Result of applying one rule.
pub struct Applied {
    /// Text after the rule's substitution pass.
    pub text: String,
    /// Number of replacements made.
    pub matches: usize,
}

/// Per-rule outcome within a run.
#[derive(Debug, Clone, Serialize)]
pub struct RuleOutcome {
    /// Rule name.
    pub rule: String,
    /// Number of replacements the rule made.
    pub matches: usize,
}

/// The full result of a rewrite run.
#[derive(Debug, Clone, Serialize)]
pub struct RewriteReport {
    /// Per-rule outcomes, in application order.
    pub outcomes: Vec<RuleOutcome>,
    /// Total replacements across all rules.
    pub total_matches: usize,
    /// Number of rules that made at least one replacement.
    pub rules_fired: usize,
    /// Whether the final text differs from the input.
    pub changed: bool,
    /// Whether the result was written back to disk.
    pub applied: bool,
}

// ============================================================================
// Rule application
// ============================================================================

impl Rule {
    pub fn name(&self) -> &'static str {
        match self {
            Rule::Literal { name, .. } => name,
            Rule::Pattern { name, .. } => name,
        }
    }

    /// Apply this rule globally over `text`. Zero matches is a no-op, not an
    /// error; the caller decides whether that is worth reporting.
    pub fn apply(&self, text: &str) -> Result<Applied> {
        match self {
            Rule::Literal { from, to, .. } => {
                let matches = text.matches(from).count();
                let new_text = if matches == 0 {
                    text.to_string()
                } else {
                    text.replace(from, to)
                };
                Ok(Applied {
                    text: new_text,
                    matches,
                })
            }
            Rule::Pattern {
                pattern,
                lookahead,
                replacement,
                ..
            } => {
                let re = Regex::new(pattern)?;

                // Collect all hits with their positions and rendered replacements
                let mut hits: Vec<(usize, usize, String)> = Vec::new();

                for caps in re.captures_iter(text) {
                    let Some(whole) = caps.get(0) else {
                        continue;
                    };

                    // Lookahead: the marker must occur somewhere after the match
                    if let Some(marker) = lookahead {
                        if !text[whole.end()..].contains(marker) {
                            continue;
                        }
                    }

                    let rendered = match replacement {
                        Replacement::Template(template) => {
                            let mut out = String::new();
                            caps.expand(template, &mut out);
                            out
                        }
                        Replacement::Computed(build) => build(&caps),
                    };

                    hits.push((whole.start(), whole.end(), rendered));
                }

                let matches = hits.len();

                // Splice back to front so earlier offsets stay valid
                let mut new_text = text.to_string();
                for (start, end, rendered) in hits.iter().rev() {
                    new_text.replace_range(*start..*end, rendered);
                }

                Ok(Applied {
                    text: new_text,
                    matches,
                })
            }
        }
    }
}

/// Apply the rule table in declaration order over `text`.
///
/// Each rule is one global substitution pass; rule N's output is rule N+1's
/// input. Rules are independent: a rule never observes whether a prior rule
/// fired, only the text the prior rule produced.
pub fn apply_rules(rules: &[Rule], text: &str) -> Result<(String, RewriteReport)> {
    let mut current = text.to_string();
    let mut outcomes = Vec::with_capacity(rules.len());

    for rule in rules {
        let applied = rule.apply(&current)?;
        outcomes.push(RuleOutcome {
            rule: rule.name().to_string(),
            matches: applied.matches,
        });
        current = applied.text;
    }

    let total_matches = outcomes.iter().map(|o| o.matches).sum();
    let rules_fired = outcomes.iter().filter(|o| o.matches > 0).count();
    let changed = current != text;

    Ok((
        current,
        RewriteReport {
            outcomes,
            total_matches,
            rules_fired,
            changed,
            applied: false,
        },
    ))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_rule_swaps_exact_snippet() {
        let rule = Rule::Literal {
            name: "swap",
            from: "old();",
            to: "new();",
        };
        let applied = rule.apply("a();\nold();\nb();\nold();\n").unwrap();
        assert_eq!(applied.matches, 2);
        assert_eq!(applied.text, "a();\nnew();\nb();\nnew();\n");
    }

    #[test]
    fn literal_rule_zero_matches_is_noop() {
        let rule = Rule::Literal {
            name: "swap",
            from: "old();",
            to: "new();",
        };
        let applied = rule.apply("nothing here\n").unwrap();
        assert_eq!(applied.matches, 0);
        assert_eq!(applied.text, "nothing here\n");
    }

    #[test]
    fn template_rule_expands_group_references() {
        let rule = Rule::Pattern {
            name: "wrap",
            pattern: r"return \{ (\w+) \};",
            lookahead: None,
            replacement: Replacement::Template("return wrap(${1});"),
        };
        let applied = rule.apply("return { user };\nreturn { users };\n").unwrap();
        assert_eq!(applied.matches, 2);
        assert_eq!(applied.text, "return wrap(user);\nreturn wrap(users);\n");
    }

    #[test]
    fn computed_rule_builds_replacement_from_captures() {
        fn build(caps: &Captures) -> String {
            format!("flag = {};", &caps[1])
        }
        let rule = Rule::Pattern {
            name: "flag",
            pattern: r"return (true|false);",
            lookahead: None,
            replacement: Replacement::Computed(build),
        };
        let applied = rule.apply("return false;\n").unwrap();
        assert_eq!(applied.matches, 1);
        assert_eq!(applied.text, "flag = false;\n");
    }

    #[test]
    fn lookahead_gates_on_later_marker() {
        let rule = Rule::Pattern {
            name: "gated",
            pattern: r"return \{ users \};",
            lookahead: Some("async listFollowers"),
            replacement: Replacement::Template("return wrapped();"),
        };

        let applied = rule
            .apply("return { users };\n  },\n\n  async listFollowers(\n")
            .unwrap();
        assert_eq!(applied.matches, 1);
        assert!(applied.text.starts_with("return wrapped();"));
    }

    #[test]
    fn missing_marker_leaves_text_unmodified() {
        let rule = Rule::Pattern {
            name: "gated",
            pattern: r"return \{ users \};",
            lookahead: Some("async listFollowers"),
            replacement: Replacement::Template("return wrapped();"),
        };

        let input = "return { users };\n  },\n\n  async getUserProfile(\n";
        let applied = rule.apply(input).unwrap();
        assert_eq!(applied.matches, 0);
        assert_eq!(applied.text, input);
    }

    #[test]
    fn lookahead_selects_occurrence_before_marker_only() {
        let rule = Rule::Pattern {
            name: "gated",
            pattern: r"return \{ users \};",
            lookahead: Some("async listFollowers"),
            replacement: Replacement::Template("return wrapped();"),
        };

        // First occurrence precedes the marker, second follows it
        let input = "return { users };\n  async listFollowers(\nreturn { users };\n";
        let applied = rule.apply(input).unwrap();
        assert_eq!(applied.matches, 1);
        assert_eq!(
            applied.text,
            "return wrapped();\n  async listFollowers(\nreturn { users };\n"
        );
    }

    #[test]
    fn apply_rules_runs_sequentially() {
        // The second rule matches text produced by the first
        let rules = vec![
            Rule::Literal {
                name: "first",
                from: "alpha",
                to: "beta",
            },
            Rule::Literal {
                name: "second",
                from: "beta",
                to: "gamma",
            },
        ];

        let (text, report) = apply_rules(&rules, "alpha\n").unwrap();
        assert_eq!(text, "gamma\n");
        assert_eq!(report.outcomes[0].matches, 1);
        assert_eq!(report.outcomes[1].matches, 1);
        assert_eq!(report.total_matches, 2);
        assert_eq!(report.rules_fired, 2);
        assert!(report.changed);
        assert!(!report.applied);
    }

    #[test]
    fn apply_rules_counts_zero_match_rules() {
        let rules = vec![
            Rule::Literal {
                name: "hit",
                from: "x",
                to: "y",
            },
            Rule::Literal {
                name: "miss",
                from: "never",
                to: "ever",
            },
        ];

        let (text, report) = apply_rules(&rules, "x\n").unwrap();
        assert_eq!(text, "y\n");
        assert_eq!(report.rules_fired, 1);
        assert_eq!(report.outcomes[1].rule, "miss");
        assert_eq!(report.outcomes[1].matches, 0);
    }

    #[test]
    fn apply_rules_unchanged_input_reports_no_change() {
        let rules = vec![Rule::Literal {
            name: "miss",
            from: "never",
            to: "ever",
        }];

        let (text, report) = apply_rules(&rules, "untouched\n").unwrap();
        assert_eq!(text, "untouched\n");
        assert!(!report.changed);
        assert_eq!(report.total_matches, 0);
    }

    #[test]
    fn report_serializes_to_json() {
        let rules = vec![Rule::Literal {
            name: "hit",
            from: "x",
            to: "y",
        }];
        let (_, report) = apply_rules(&rules, "x\n").unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["rules_fired"], 1);
        assert_eq!(json["outcomes"][0]["rule"], "hit");
        assert_eq!(json["outcomes"][0]["matches"], 1);
    }
}
