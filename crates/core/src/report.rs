//! Turns a finished [`CategoryTree`] into an ordered list of report rows.
//!
//! Rows carry raw values; formatting them into columns is left to the caller.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::category::{Aggregate, CategoryId, CategoryTree};
use super::money::Money;

/// Spaces of indentation per level of depth.
pub const INDENT_WIDTH: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReportStyle {
    /// Every category, down to the individual leaves.
    #[default]
    ShowLeaves,
    /// Only categories that have children.
    Summary,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportOptions {
    pub style: ReportStyle,
    /// Keep categories that saw no transactions.
    pub show_zeros: bool,
    /// Drop categories whose debit plus credit falls below this.
    pub minimal_amount: Money,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            style: ReportStyle::ShowLeaves,
            show_zeros: false,
            minimal_amount: Money::zero(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportRow {
    pub name: String,
    pub depth: usize,
    pub count: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub debit: Money,
    /// Share of the grand debit total; `None` when that total is zero.
    pub debit_share: Option<f64>,
    pub credit: Money,
    /// Share of the grand credit total; `None` when that total is zero.
    pub credit_share: Option<f64>,
    pub net: Money,
}

impl ReportRow {
    /// Name indented according to depth.
    pub fn label(&self) -> String {
        format!("{}{}", " ".repeat(INDENT_WIDTH * self.depth), self.name)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub rows: Vec<ReportRow>,
    /// Width needed to show the deepest, longest indented name.
    pub name_width: usize,
}

/// Walk the tree from the root, busiest categories first.
///
/// A suppressed category hides its whole subtree, even descendants that would
/// pass the filters on their own.
pub fn build_report(tree: &CategoryTree, options: &ReportOptions) -> Report {
    let grand = tree.root().totals();
    let mut rows = Vec::new();
    visit(tree, tree.root_id(), grand, options, &mut rows);

    Report {
        rows,
        name_width: INDENT_WIDTH * tree.max_depth() + tree.max_name_width(),
    }
}

fn visit(
    tree: &CategoryTree,
    id: CategoryId,
    grand: &Aggregate,
    options: &ReportOptions,
    rows: &mut Vec<ReportRow>,
) {
    let Some(node) = tree.get(id) else {
        return;
    };
    let totals = node.totals();

    if options.style == ReportStyle::Summary && node.is_leaf() {
        return;
    }
    if !options.show_zeros && totals.count == 0 {
        return;
    }
    if totals.turnover() < options.minimal_amount {
        return;
    }

    rows.push(ReportRow {
        name: node.name().to_string(),
        depth: node.depth(),
        count: totals.count,
        first_date: totals.dates.map(|d| d.start),
        last_date: totals.dates.map(|d| d.end),
        debit: totals.debit,
        debit_share: totals.debit.share_of(grand.debit),
        credit: totals.credit,
        credit_share: totals.credit.share_of(grand.credit),
        net: totals.net(),
    });

    let mut children: Vec<CategoryId> = node.children().to_vec();
    // Stable sort: equal turnovers keep creation order.
    children.sort_by_cached_key(|child| {
        std::cmp::Reverse(tree.get(*child).map(|c| c.totals().turnover()))
    });
    for child in children {
        visit(tree, child, grand, options, rows);
    }
}
