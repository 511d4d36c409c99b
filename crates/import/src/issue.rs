use bankac_core::TreeError;
use std::fmt;
use thiserror::Error;

use crate::category_map::MapError;
use crate::csv::RecordError;
use crate::rules::RuleError;

/// Something wrong with a single input line. Never fatal on its own.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IssueKind {
    #[error(transparent)]
    Tree(#[from] TreeError),
    #[error(transparent)]
    Map(#[from] MapError),
    #[error(transparent)]
    Rule(#[from] RuleError),
    #[error(transparent)]
    Record(#[from] RecordError),
}

/// A reported problem, pinned to the file and line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Issue {
    pub origin: String,
    pub line: usize,
    pub kind: IssueKind,
}

impl Issue {
    pub fn new(origin: &str, line: usize, kind: impl Into<IssueKind>) -> Self {
        Issue {
            origin: origin.to_string(),
            line,
            kind: kind.into(),
        }
    }
}

impl fmt::Display for Issue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}: {}", self.origin, self.line, self.kind)
    }
}

impl std::error::Error for Issue {}
