//! Edit rules that fold variant transaction descriptions into one spelling.
//!
//! The rule file is a list of `search=<regex>` / `replace=<text>` pairs.
//! Rules are tried in file order and only the first one that actually
//! changes the description is applied.

use regex::{NoExpand, Regex};
use std::io::BufRead;
use thiserror::Error;

use crate::issue::Issue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("Bad transaction edits entry: Missing '=' : {0}")]
    MissingDelimiter(String),
    #[error("Bad transaction edits entry: Bad type: {0}")]
    UnknownKey(String),
    #[error("Bad transaction edits entry: Couldn't compile the regexp {pattern:?}: {reason}")]
    BadPattern { pattern: String, reason: String },
    #[error("Bad transaction edits entry: Replace entry missing for previous search")]
    ReplaceMissing,
    #[error("Bad transaction edits entry: Replace entry has no preceding search")]
    ReplaceWithoutSearch,
}

#[derive(Debug, Clone)]
pub struct EditRule {
    search: String,
    pattern: Regex,
    replacement: String,
}

impl EditRule {
    pub fn new(search: &str, replacement: &str) -> Result<Self, RuleError> {
        let pattern = Regex::new(search).map_err(|e| RuleError::BadPattern {
            pattern: search.to_string(),
            reason: e.to_string(),
        })?;
        Ok(EditRule {
            search: search.to_string(),
            pattern,
            replacement: replacement.to_string(),
        })
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match; `$` in the replacement is taken literally.
    pub fn apply(&self, text: &str) -> String {
        self.pattern
            .replace_all(text, NoExpand(&self.replacement))
            .into_owned()
    }
}

#[derive(Debug, Clone, Default)]
pub struct EditRules {
    rules: Vec<EditRule>,
}

/// Where the parser is between a `search` and its `replace`.
enum Pending {
    Idle,
    Search { rule: String, pattern: Regex, line: usize },
    /// The current rule already failed; its `replace` is dropped quietly.
    Dropped,
}

impl EditRules {
    pub fn new(rules: Vec<EditRule>) -> Self {
        Self { rules }
    }

    /// Parse a rule file. Bad entries are returned as issues and skipped.
    pub fn parse<R: BufRead>(reader: R, origin: &str) -> std::io::Result<(Self, Vec<Issue>)> {
        let mut rules = Vec::new();
        let mut issues = Vec::new();
        let mut pending = Pending::Idle;
        // Whether the last `key=value` line was a `search`, valid or not.
        let mut after_search = false;

        for (idx, line) in reader.lines().enumerate() {
            let line = line?;
            let line_no = idx + 1;
            if line.trim().is_empty() {
                continue;
            }

            let Some((key, value)) = line.split_once('=') else {
                issues.push(Issue::new(origin, line_no, RuleError::MissingDelimiter(line.clone())));
                pending = Pending::Dropped;
                continue;
            };

            match key {
                "search" => {
                    if after_search {
                        issues.push(Issue::new(origin, line_no, RuleError::ReplaceMissing));
                    }
                    pending = match Regex::new(value) {
                        Ok(pattern) => Pending::Search {
                            rule: value.to_string(),
                            pattern,
                            line: line_no,
                        },
                        Err(e) => {
                            issues.push(Issue::new(
                                origin,
                                line_no,
                                RuleError::BadPattern {
                                    pattern: value.to_string(),
                                    reason: e.to_string(),
                                },
                            ));
                            Pending::Dropped
                        }
                    };
                }
                "replace" => {
                    match std::mem::replace(&mut pending, Pending::Idle) {
                        Pending::Search { rule, pattern, .. } => rules.push(EditRule {
                            search: rule,
                            pattern,
                            replacement: value.to_string(),
                        }),
                        Pending::Dropped => {}
                        Pending::Idle => {
                            issues.push(Issue::new(origin, line_no, RuleError::ReplaceWithoutSearch));
                        }
                    }
                }
                other => {
                    issues.push(Issue::new(origin, line_no, RuleError::UnknownKey(other.to_string())));
                    pending = Pending::Dropped;
                }
            }
            after_search = key == "search";
        }

        if let Pending::Search { line, .. } = pending {
            issues.push(Issue::new(origin, line, RuleError::ReplaceMissing));
        }

        tracing::debug!(origin, rules = rules.len(), issues = issues.len(), "loaded edit rules");
        Ok((Self { rules }, issues))
    }

    /// Rewrite `text` with the first rule that changes it. Unchanged if none do.
    pub fn normalize(&self, text: &str) -> String {
        self.rules
            .iter()
            .map(|rule| rule.apply(text))
            .find(|edited| edited != text)
            .unwrap_or_else(|| text.to_string())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EditRule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::IssueKind;

    fn parse(text: &str) -> (EditRules, Vec<Issue>) {
        EditRules::parse(text.as_bytes(), "edits.txt").unwrap()
    }

    fn rule_errors(issues: &[Issue]) -> Vec<(usize, RuleError)> {
        issues
            .iter()
            .map(|i| match &i.kind {
                IssueKind::Rule(e) => (i.line, e.clone()),
                other => panic!("unexpected issue kind: {other:?}"),
            })
            .collect()
    }

    #[test]
    fn variants_normalize_to_one_name() {
        let rules = EditRules::new(vec![EditRule::new(r"TESCO STORES \d+", "Tesco").unwrap()]);
        assert_eq!(rules.normalize("TESCO STORES 123"), "Tesco");
        assert_eq!(rules.normalize("TESCO STORES 456"), "Tesco");
    }

    #[test]
    fn no_matching_rule_returns_input() {
        let rules = EditRules::new(vec![EditRule::new("AMZN", "Amazon").unwrap()]);
        assert_eq!(rules.normalize("STARBUCKS"), "STARBUCKS");
    }

    #[test]
    fn first_changing_rule_wins_without_chaining() {
        let rules = EditRules::new(vec![
            EditRule::new("SAINSBURYS S/MKTS", "SAINSBURYS").unwrap(),
            EditRule::new("SAINSBURYS", "Sainsbury's").unwrap(),
        ]);
        // Only the first rule applies; the second is not run on its output.
        assert_eq!(rules.normalize("SAINSBURYS S/MKTS"), "SAINSBURYS");
        assert_eq!(rules.normalize("SAINSBURYS"), "Sainsbury's");
    }

    #[test]
    fn matching_rule_that_changes_nothing_is_skipped() {
        let rules = EditRules::new(vec![
            EditRule::new("Tesco", "Tesco").unwrap(),
            EditRule::new("Tesco", "Supermarket").unwrap(),
        ]);
        assert_eq!(rules.normalize("Tesco"), "Supermarket");
    }

    #[test]
    fn all_occurrences_replaced() {
        let rules = EditRules::new(vec![EditRule::new("-", " ").unwrap()]);
        assert_eq!(rules.normalize("A-B-C"), "A B C");
    }

    #[test]
    fn replacement_is_literal() {
        let rules = EditRules::new(vec![EditRule::new(r"(\d+)", "$1x").unwrap()]);
        assert_eq!(rules.normalize("ref 42"), "ref $1x");
    }

    #[test]
    fn normalized_text_is_stable() {
        let rules = EditRules::new(vec![EditRule::new(r"TESCO STORES \d+", "Tesco").unwrap()]);
        let once = rules.normalize("TESCO STORES 99");
        assert_eq!(rules.normalize(&once), once);
    }

    #[test]
    fn parse_well_formed_file() {
        let (rules, issues) = parse("search=TESCO.*\nreplace=Tesco\n\nsearch=AMZN\nreplace=Amazon\n");
        assert!(issues.is_empty());
        assert_eq!(rules.len(), 2);
        let first = rules.iter().next().unwrap();
        assert_eq!(first.search(), "TESCO.*");
        assert_eq!(first.replacement(), "Tesco");
    }

    #[test]
    fn parse_value_may_contain_equals() {
        let (rules, issues) = parse("search=A=B\nreplace=C=D\n");
        assert!(issues.is_empty());
        assert_eq!(rules.normalize("xA=By"), "xC=Dy");
    }

    #[test]
    fn parse_missing_delimiter_drops_rule() {
        let (rules, issues) = parse("search=X\nnonsense\nreplace=Y\nsearch=A\nreplace=B\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rule_errors(&issues),
            vec![(2, RuleError::MissingDelimiter("nonsense".to_string()))]
        );
    }

    #[test]
    fn parse_bad_regex_drops_its_replace() {
        let (rules, issues) = parse("search=(unclosed\nreplace=Y\nsearch=ok\nreplace=fine\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].line, 1);
        assert!(matches!(
            issues[0].kind,
            IssueKind::Rule(RuleError::BadPattern { .. })
        ));
    }

    #[test]
    fn parse_unknown_key() {
        let (rules, issues) = parse("find=X\nreplace=Y\n");
        assert!(rules.is_empty());
        assert_eq!(
            rule_errors(&issues),
            vec![(1, RuleError::UnknownKey("find".to_string()))]
        );
    }

    #[test]
    fn parse_search_after_search() {
        let (rules, issues) = parse("search=X\nsearch=Y\nreplace=Z\n");
        assert_eq!(rule_errors(&issues), vec![(2, RuleError::ReplaceMissing)]);
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.normalize("Y"), "Z");
        assert_eq!(rules.normalize("X"), "X");
    }

    #[test]
    fn parse_search_after_failed_search() {
        let (rules, issues) = parse("search=(unclosed\nsearch=ok\nreplace=fine\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rules.normalize("ok"), "fine");
        let errors = rule_errors(&issues);
        assert_eq!(errors.len(), 2);
        assert!(matches!(errors[0], (1, RuleError::BadPattern { .. })));
        assert_eq!(errors[1], (2, RuleError::ReplaceMissing));
    }

    #[test]
    fn parse_unknown_key_resets_search() {
        let (_, issues) = parse("search=X\nfind=Y\nsearch=Z\nreplace=W\n");
        assert_eq!(
            rule_errors(&issues),
            vec![(2, RuleError::UnknownKey("find".to_string()))]
        );
    }

    #[test]
    fn parse_replace_without_search() {
        let (rules, issues) = parse("replace=Z\nsearch=X\nreplace=Y\nreplace=W\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(
            rule_errors(&issues),
            vec![(1, RuleError::ReplaceWithoutSearch), (4, RuleError::ReplaceWithoutSearch)]
        );
    }

    #[test]
    fn parse_trailing_search_is_reported() {
        let (rules, issues) = parse("search=X\nreplace=Y\nsearch=Z\n");
        assert_eq!(rules.len(), 1);
        assert_eq!(rule_errors(&issues), vec![(3, RuleError::ReplaceMissing)]);
    }

    #[test]
    fn edit_rule_new_rejects_bad_pattern() {
        assert!(matches!(
            EditRule::new("[", "x"),
            Err(RuleError::BadPattern { .. })
        ));
    }
}
