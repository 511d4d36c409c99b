pub mod category;
pub mod money;
pub mod period;
pub mod report;
pub mod transaction;

pub use category::{Aggregate, Category, CategoryId, CategoryTree, TreeError};
pub use money::Money;
pub use period::DateRange;
pub use report::{build_report, Report, ReportOptions, ReportRow, ReportStyle};
pub use transaction::Transaction;
