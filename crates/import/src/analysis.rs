use bankac_core::{CategoryTree, Transaction};

use crate::classify::{Classifier, TypeCodes};
use crate::issue::Issue;
use crate::rules::EditRules;

/// Classifies transactions one at a time and folds them into the tree.
pub struct Analysis {
    tree: CategoryTree,
    rules: EditRules,
    codes: TypeCodes,
    issues: Vec<Issue>,
    processed: usize,
}

impl Analysis {
    pub fn new(tree: CategoryTree, rules: EditRules, codes: TypeCodes) -> Self {
        Self {
            tree,
            rules,
            codes,
            issues: Vec::new(),
            processed: 0,
        }
    }

    /// Classify `tx`, then add it to its category and every ancestor.
    /// Returns the category it was counted under, if any.
    pub fn process(&mut self, origin: &str, tx: &Transaction) -> Option<String> {
        let classification = Classifier::new(&self.rules, &self.codes).classify(&mut self.tree, tx);
        if let Some(e) = classification.error {
            self.issues.push(Issue::new(origin, tx.line, e));
        }

        if let Err(e) = self.tree.absorb(&classification.category, tx) {
            self.issues.push(Issue::new(origin, tx.line, e));
            return None;
        }
        self.processed += 1;
        tracing::trace!(line = tx.line, category = %classification.category, "absorbed transaction");
        Some(classification.category)
    }

    pub fn process_all<'t, I>(&mut self, origin: &str, transactions: I)
    where
        I: IntoIterator<Item = &'t Transaction>,
    {
        for tx in transactions {
            self.process(origin, tx);
        }
    }

    pub fn tree(&self) -> &CategoryTree {
        &self.tree
    }

    pub fn into_tree(self) -> CategoryTree {
        self.tree
    }

    /// Number of transactions aggregated so far.
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// Hand over the issues collected so far, leaving none behind.
    pub fn take_issues(&mut self) -> Vec<Issue> {
        std::mem::take(&mut self.issues)
    }
}
