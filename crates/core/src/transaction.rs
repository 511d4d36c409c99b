use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::money::Money;

/// One statement line, as parsed from the account file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Line in the source file, for diagnostics.
    pub line: usize,
    pub date: NaiveDate,
    /// Short bank code such as `CHQ` or `DEB`.
    pub kind: String,
    pub description: String,
    pub debit: Money,
    pub credit: Money,
    /// Running balance after this transaction. Not aggregated.
    pub balance: Money,
}
