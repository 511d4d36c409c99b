pub mod analysis;
pub mod category_map;
pub mod classify;
pub mod csv;
pub mod issue;
pub mod rules;

pub use analysis::Analysis;
pub use category_map::{load_category_map, parse_map_line, MapError};
pub use classify::{Classification, Classifier, TypeCodes};
pub use self::csv::{read_statement, CsvError, RecordError, StatementBatch, StatementLayout};
pub use issue::{Issue, IssueKind};
pub use rules::{EditRule, EditRules, RuleError};
