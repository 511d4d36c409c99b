use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

use super::money::Money;
use super::period::DateRange;
use super::transaction::Transaction;

/// Name of the root category every other category descends from.
pub const ROOT: &str = "all";
/// Bucket for descriptions that no map entry or edit rule recognised.
pub const UNKNOWN: &str = "unknown";
/// Bucket for cash machine withdrawals.
pub const CASH: &str = "cash";
/// Bucket for cheques.
pub const CHEQUE: &str = "cheque";

/// The fixed first-level categories seeded under the root.
pub const BUCKETS: &[&str] = &[UNKNOWN, CASH, CHEQUE];

/// Position of a category in its tree. Only meaningful for the tree that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CategoryId(pub usize);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    #[error("the parent {parent:?} of child {child:?} does not exist")]
    NoSuchParent { parent: String, child: String },
    #[error("child {child:?} already has a parent: {requested:?} != {existing:?}")]
    ConflictingParent {
        child: String,
        requested: String,
        existing: String,
    },
    #[error("no such category: {0:?}")]
    UnknownCategory(String),
    #[error("totals for category {0:?} are too large to hold")]
    AmountOverflow(String),
}

/// Rolled-up figures for a category and everything beneath it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Aggregate {
    pub count: usize,
    /// `None` until the first transaction arrives.
    pub dates: Option<DateRange>,
    pub debit: Money,
    pub credit: Money,
}

impl Aggregate {
    /// Totals with `tx` folded in, or `None` if an amount would overflow.
    fn absorbed(&self, tx: &Transaction) -> Option<Aggregate> {
        let dates = match self.dates {
            Some(mut range) => {
                range.widen(tx.date);
                range
            }
            None => DateRange::single(tx.date),
        };
        Some(Aggregate {
            count: self.count + 1,
            dates: Some(dates),
            debit: self.debit.checked_add(tx.debit)?,
            credit: self.credit.checked_add(tx.credit)?,
        })
    }

    /// Debit plus credit; the figure categories are ranked and filtered by.
    pub fn turnover(&self) -> Money {
        self.debit.saturating_add(self.credit)
    }

    pub fn net(&self) -> Money {
        self.credit.saturating_sub(self.debit)
    }
}

#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    parent: Option<CategoryId>,
    depth: usize,
    children: Vec<CategoryId>,
    totals: Aggregate,
}

impl Category {
    fn new(name: &str, parent: Option<CategoryId>, depth: usize) -> Self {
        Category {
            name: name.to_string(),
            parent,
            depth,
            children: Vec::new(),
            totals: Aggregate::default(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<CategoryId> {
        self.parent
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn children(&self) -> &[CategoryId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    pub fn totals(&self) -> &Aggregate {
        &self.totals
    }
}

/// Strict tree of categories, keyed by name.
///
/// Nodes live in an arena and refer to each other by [`CategoryId`]. A child
/// can only be attached under a parent that already exists and its parent is
/// fixed from then on, so the structure cannot form a cycle.
#[derive(Debug, Clone)]
pub struct CategoryTree {
    nodes: Vec<Category>,
    index: HashMap<String, CategoryId>,
    max_depth: usize,
    max_name_width: usize,
}

impl CategoryTree {
    /// Build the root and the three fixed buckets beneath it.
    pub fn new() -> Result<Self, TreeError> {
        let mut tree = CategoryTree {
            nodes: vec![Category::new(ROOT, None, 0)],
            index: HashMap::from([(ROOT.to_string(), CategoryId(0))]),
            max_depth: 0,
            max_name_width: 0,
        };
        for bucket in BUCKETS {
            tree.add_category(ROOT, bucket)?;
        }
        Ok(tree)
    }

    /// Attach `child` under `parent`.
    ///
    /// Re-adding an existing child under the same parent is a no-op returning
    /// the existing id. On error the tree is left untouched.
    pub fn add_category(&mut self, parent: &str, child: &str) -> Result<CategoryId, TreeError> {
        let parent_id = self.id_of(parent).ok_or_else(|| TreeError::NoSuchParent {
            parent: parent.to_string(),
            child: child.to_string(),
        })?;

        if let Some(existing) = self.id_of(child) {
            let existing_parent = self.parent_of(child).unwrap_or(ROOT);
            if existing_parent != parent {
                return Err(TreeError::ConflictingParent {
                    child: child.to_string(),
                    requested: parent.to_string(),
                    existing: existing_parent.to_string(),
                });
            }
            return Ok(existing);
        }

        let id = CategoryId(self.nodes.len());
        let depth = self.nodes[parent_id.0].depth + 1;
        self.nodes.push(Category::new(child, Some(parent_id), depth));
        self.nodes[parent_id.0].children.push(id);
        self.index.insert(child.to_string(), id);

        self.max_depth = self.max_depth.max(depth);
        self.max_name_width = self.max_name_width.max(child.chars().count());

        tracing::debug!(category = child, parent, depth, "added category");
        Ok(id)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    pub fn id_of(&self, name: &str) -> Option<CategoryId> {
        self.index.get(name).copied()
    }

    pub fn get(&self, id: CategoryId) -> Option<&Category> {
        self.nodes.get(id.0)
    }

    pub fn by_name(&self, name: &str) -> Option<&Category> {
        self.id_of(name).and_then(|id| self.get(id))
    }

    /// Name of the parent of `name`. The root is reported as its own parent.
    pub fn parent_of(&self, name: &str) -> Option<&str> {
        let node = self.by_name(name)?;
        match node.parent {
            Some(parent) => Some(self.nodes[parent.0].name()),
            None => Some(node.name()),
        }
    }

    pub fn root(&self) -> &Category {
        &self.nodes[0]
    }

    pub fn root_id(&self) -> CategoryId {
        CategoryId(0)
    }

    /// Categories in the order they were created, root first.
    pub fn iter(&self) -> impl Iterator<Item = &Category> {
        self.nodes.iter()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Deepest level any category sits at.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Widest category name, in characters.
    pub fn max_name_width(&self) -> usize {
        self.max_name_width
    }

    /// Fold `tx` into the named category and each of its ancestors up to the root.
    ///
    /// Either every node on the path is updated or, on error, none is.
    pub fn absorb(&mut self, name: &str, tx: &Transaction) -> Result<(), TreeError> {
        let mut next = Some(
            self.id_of(name)
                .ok_or_else(|| TreeError::UnknownCategory(name.to_string()))?,
        );
        let mut updated = Vec::new();
        while let Some(id) = next {
            let node = &self.nodes[id.0];
            let totals = node
                .totals
                .absorbed(tx)
                .ok_or_else(|| TreeError::AmountOverflow(node.name.clone()))?;
            updated.push((id, totals));
            next = node.parent;
        }
        for (id, totals) in updated {
            self.nodes[id.0].totals = totals;
        }
        Ok(())
    }
}
