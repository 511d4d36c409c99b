use bankac_core::category::{CASH, CHEQUE, UNKNOWN};
use bankac_core::{CategoryTree, Transaction, TreeError};
use serde::{Deserialize, Serialize};

use crate::rules::EditRules;

/// Bank type codes that route a transaction straight to a fixed bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TypeCodes {
    pub cheque: String,
    pub cash: String,
}

impl Default for TypeCodes {
    fn default() -> Self {
        Self {
            cheque: "CHQ".to_string(),
            cash: "CPT".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Category the transaction should be aggregated under.
    pub category: String,
    /// Set when the tree refused the new category. `category` is still usable.
    pub error: Option<TreeError>,
}

/// Decides which category a transaction belongs to, growing the tree as needed.
pub struct Classifier<'a> {
    rules: &'a EditRules,
    codes: &'a TypeCodes,
}

impl<'a> Classifier<'a> {
    pub fn new(rules: &'a EditRules, codes: &'a TypeCodes) -> Self {
        Self { rules, codes }
    }

    pub fn classify(&self, tree: &mut CategoryTree, tx: &Transaction) -> Classification {
        let (bucket, category) = if tx.kind == self.codes.cheque {
            (CHEQUE, tx.description.clone())
        } else if tx.kind == self.codes.cash {
            (CASH, tx.description.clone())
        } else {
            if tree.contains(&tx.description) {
                return Classification {
                    category: tx.description.clone(),
                    error: None,
                };
            }
            let normalized = self.rules.normalize(&tx.description);
            if tree.contains(&normalized) {
                return Classification {
                    category: normalized,
                    error: None,
                };
            }
            (UNKNOWN, normalized)
        };

        let error = tree.add_category(bucket, &category).err();
        Classification { category, error }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::EditRule;
    use bankac_core::category::ROOT;
    use bankac_core::Money;
    use chrono::NaiveDate;

    fn make_tx(kind: &str, description: &str) -> Transaction {
        Transaction {
            line: 2,
            date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
            kind: kind.to_string(),
            description: description.to_string(),
            debit: Money::from_cents(500),
            credit: Money::zero(),
            balance: Money::zero(),
        }
    }

    fn tesco_rules() -> EditRules {
        EditRules::new(vec![EditRule::new(r"TESCO STORES \d+", "Tesco").unwrap()])
    }

    #[test]
    fn cheque_goes_under_cheque_bucket() {
        let mut tree = CategoryTree::new().unwrap();
        let rules = tesco_rules();
        let codes = TypeCodes::default();
        let c = Classifier::new(&rules, &codes).classify(&mut tree, &make_tx("CHQ", "rent"));
        assert_eq!(c, Classification { category: "rent".to_string(), error: None });
        assert_eq!(tree.parent_of("rent"), Some(CHEQUE));
    }

    #[test]
    fn cash_goes_under_cash_bucket_unnormalized() {
        let mut tree = CategoryTree::new().unwrap();
        let rules = tesco_rules();
        let codes = TypeCodes::default();
        let c = Classifier::new(&rules, &codes)
            .classify(&mut tree, &make_tx("CPT", "TESCO STORES 9"));
        assert_eq!(c.category, "TESCO STORES 9");
        assert_eq!(tree.parent_of("TESCO STORES 9"), Some(CASH));
    }

    #[test]
    fn known_description_used_as_is() {
        let mut tree = CategoryTree::new().unwrap();
        tree.add_category(ROOT, "groceries").unwrap();
        tree.add_category("groceries", "TESCO STORES 1").unwrap();
        let rules = tesco_rules();
        let codes = TypeCodes::default();
        let c = Classifier::new(&rules, &codes).classify(&mut tree, &make_tx("DEB", "TESCO STORES 1"));
        assert_eq!(c.category, "TESCO STORES 1");
        assert!(!tree.contains("Tesco"));
    }

    #[test]
    fn normalized_known_name_is_used() {
        let mut tree = CategoryTree::new().unwrap();
        tree.add_category(ROOT, "groceries").unwrap();
        tree.add_category("groceries", "Tesco").unwrap();
        let before = tree.len();
        let rules = tesco_rules();
        let codes = TypeCodes::default();
        let c = Classifier::new(&rules, &codes).classify(&mut tree, &make_tx("DEB", "TESCO STORES 77"));
        assert_eq!(c.category, "Tesco");
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn unknown_description_becomes_new_leaf() {
        let mut tree = CategoryTree::new().unwrap();
        let rules = tesco_rules();
        let codes = TypeCodes::default();
        let classifier = Classifier::new(&rules, &codes);
        let first = classifier.classify(&mut tree, &make_tx("DEB", "TESCO STORES 123"));
        let second = classifier.classify(&mut tree, &make_tx("DEB", "TESCO STORES 456"));
        assert_eq!(first.category, "Tesco");
        assert_eq!(second.category, "Tesco");
        assert_eq!(tree.parent_of("Tesco"), Some(UNKNOWN));
        assert_eq!(tree.by_name(UNKNOWN).unwrap().children().len(), 1);
    }

    #[test]
    fn conflict_is_reported_but_category_kept() {
        let mut tree = CategoryTree::new().unwrap();
        tree.add_category(ROOT, "housing").unwrap();
        tree.add_category("housing", "rent").unwrap();
        let rules = EditRules::default();
        let codes = TypeCodes::default();
        let c = Classifier::new(&rules, &codes).classify(&mut tree, &make_tx("CHQ", "rent"));
        assert_eq!(c.category, "rent");
        assert!(matches!(c.error, Some(TreeError::ConflictingParent { .. })));
        assert_eq!(tree.parent_of("rent"), Some("housing"));
    }

    #[test]
    fn custom_type_codes() {
        let mut tree = CategoryTree::new().unwrap();
        let rules = EditRules::default();
        let codes = TypeCodes {
            cheque: "CHEQUE".to_string(),
            cash: "ATM".to_string(),
        };
        let classifier = Classifier::new(&rules, &codes);
        classifier.classify(&mut tree, &make_tx("ATM", "LINK 42"));
        classifier.classify(&mut tree, &make_tx("CHQ", "100001"));
        assert_eq!(tree.parent_of("LINK 42"), Some(CASH));
        assert_eq!(tree.parent_of("100001"), Some(UNKNOWN));
    }
}
