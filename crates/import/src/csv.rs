use bankac_core::{Money, Transaction};
use chrono::NaiveDate;
use csv::StringRecord;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::str::FromStr;
use thiserror::Error;

use crate::issue::Issue;

/// Where each field sits in a bank statement export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatementLayout {
    pub date_column: usize,
    pub kind_column: usize,
    pub description_column: usize,
    pub debit_column: usize,
    pub credit_column: usize,
    pub balance_column: usize,
    pub date_format: String,
    pub has_header: bool,
    pub delimiter: String,
}

impl Default for StatementLayout {
    fn default() -> Self {
        Self {
            date_column: 0,
            kind_column: 1,
            description_column: 4,
            debit_column: 5,
            credit_column: 6,
            balance_column: 7,
            date_format: "%d/%m/%Y".to_string(),
            has_header: true,
            delimiter: ",".to_string(),
        }
    }
}

/// Failure of the statement stream as a whole.
#[derive(Error, Debug)]
pub enum CsvError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
}

/// Failure of a single statement record. The record is skipped.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordError {
    #[error("Missing {name} column ({index})")]
    MissingColumn { name: &'static str, index: usize },
    #[error("Couldn't parse the date {value:?} (expected format {format:?})")]
    InvalidDate { value: String, format: String },
    #[error("Couldn't parse the {name}: {value:?}")]
    InvalidAmount { name: &'static str, value: String },
}

/// Transactions read from one statement, plus the records that were rejected.
#[derive(Debug, Default)]
pub struct StatementBatch {
    pub transactions: Vec<Transaction>,
    pub issues: Vec<Issue>,
}

pub fn read_statement<R: Read>(
    data: R,
    layout: &StatementLayout,
    origin: &str,
) -> Result<StatementBatch, CsvError> {
    let delimiter = layout.delimiter.as_bytes().first().copied().unwrap_or(b',');
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(layout.has_header)
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(data);

    let mut batch = StatementBatch::default();
    // Fields are decoded lossily: a non-UTF-8 byte becomes U+FFFD.
    for result in reader.byte_records() {
        let raw = result?;
        let line = raw
            .position()
            .map(|p| p.line() as usize)
            .unwrap_or_default();
        let record: StringRecord = raw
            .iter()
            .map(|field| String::from_utf8_lossy(field).into_owned())
            .collect::<Vec<_>>()
            .into();

        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        match parse_record(&record, line, layout) {
            Ok(tx) => batch.transactions.push(tx),
            Err(e) => batch.issues.push(Issue::new(origin, line, e)),
        }
    }

    Ok(batch)
}

fn parse_record(
    record: &StringRecord,
    line: usize,
    layout: &StatementLayout,
) -> Result<Transaction, RecordError> {
    let field = |name: &'static str, index: usize| {
        record
            .get(index)
            .ok_or(RecordError::MissingColumn { name, index })
    };

    let date = parse_date(field("date", layout.date_column)?, &layout.date_format)?;
    let kind = field("type", layout.kind_column)?.trim().to_string();
    let description = field("description", layout.description_column)?.to_string();
    let debit = parse_amount(field("debit", layout.debit_column)?, "debit amount")?;
    let credit = parse_amount(field("credit", layout.credit_column)?, "credit amount")?;
    let balance = parse_amount(field("balance", layout.balance_column)?, "balance amount")?;

    Ok(Transaction {
        line,
        date,
        kind,
        description,
        debit,
        credit,
        balance,
    })
}

fn parse_date(s: &str, format: &str) -> Result<NaiveDate, RecordError> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, format).map_err(|_| RecordError::InvalidDate {
        value: s.to_string(),
        format: format.to_string(),
    })
}

/// Empty fields are zero. Accounting parentheses mean negative.
fn parse_amount(s: &str, name: &'static str) -> Result<Money, RecordError> {
    let s = s.trim();
    if s.is_empty() {
        return Ok(Money::zero());
    }
    let (negative, digits) = if s.starts_with('(') && s.ends_with(')') {
        (true, &s[1..s.len() - 1])
    } else {
        (false, s)
    };
    let digits = digits.replace([',', '$', '£', ' '], "");
    let mut dec = Decimal::from_str(&digits).map_err(|_| RecordError::InvalidAmount {
        name,
        value: s.to_string(),
    })?;
    if negative {
        dec = -dec;
    }
    Ok(Money::from_decimal(dec))
}
