//! Substitution engine — an ordered list of text-to-text rules folded over
//! an in-memory buffer.
//!
//! Two rule shapes:
//! - Literal: exact find-and-replace, every occurrence
//! - Structural: a multi-line regex whose captures are re-emitted through a
//!   replacement template
//!
//! Order is part of the contract: each rule operates on the output of the
//! previous one, never on the original buffer, so rules must not be applied
//! independently or reordered.

use regex::Regex;
use serde::Serialize;

/// A single rewrite rule.
pub struct Rule {
    /// Short identifier used in summaries and status output.
    pub name: &'static str,
    kind: RuleKind,
}

enum RuleKind {
    Literal {
        find: &'static str,
        replace: &'static str,
    },
    Structural {
        pattern: Regex,
        template: &'static str,
    },
}

impl Rule {
    /// Exact substring replacement.
    pub fn literal(name: &'static str, find: &'static str, replace: &'static str) -> Self {
        Rule {
            name,
            kind: RuleKind::Literal { find, replace },
        }
    }

    /// Regex replacement; capture groups are re-emitted via `template`.
    /// Patterns are hardcoded, so a failure to compile is a programming error.
    pub fn structural(name: &'static str, pattern: &str, template: &'static str) -> Self {
        Rule {
            name,
            kind: RuleKind::Structural {
                pattern: Regex::new(pattern).unwrap(),
                template,
            },
        }
    }

    /// Apply this rule to `text`, returning the new text and the number of
    /// occurrences replaced.
    pub fn apply(&self, text: &str) -> (String, usize) {
        match &self.kind {
            RuleKind::Literal { find, replace } => {
                let count = text.matches(find).count();
                if count == 0 {
                    (text.to_string(), 0)
                } else {
                    (text.replace(find, replace), count)
                }
            }
            RuleKind::Structural { pattern, template } => {
                let count = pattern.find_iter(text).count();
                if count == 0 {
                    (text.to_string(), 0)
                } else {
                    (pattern.replace_all(text, *template).into_owned(), count)
                }
            }
        }
    }
}

/// Per-rule replacement count for one buffer.
#[derive(Debug, Clone, Serialize)]
pub struct RuleHit {
    pub rule: &'static str,
    pub replacements: usize,
}

/// Fold `rules` over `content` in order, collecting counts for the rules
/// that fired.
pub fn apply_rules(rules: &[Rule], content: &str) -> (String, Vec<RuleHit>) {
    let mut text = content.to_string();
    let mut hits = Vec::new();

    for rule in rules {
        let (next, count) = rule.apply(&text);
        text = next;
        if count > 0 {
            hits.push(RuleHit {
                rule: rule.name,
                replacements: count,
            });
        }
    }

    (text, hits)
}
