//! Column formatting for report rows.
//!
//! Zero amounts and undefined percentages are left blank so the busy figures
//! stand out.

use bankac_core::{Money, Report, ReportRow};
use chrono::NaiveDate;
use clap::ValueEnum;
use std::io::{self, Write};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Fixed-width table.
    #[default]
    Text,
    /// Rows as a JSON array.
    Json,
}

const DATE_FORMAT: &str = "%Y-%b-%d";

#[derive(Clone, Copy, PartialEq, Eq)]
enum Align {
    Left,
    Right,
}

struct Column {
    heading: [&'static str; 3],
    align: Align,
    min_width: usize,
}

const COLUMNS: [Column; 9] = [
    Column { heading: ["", "", "Transaction Type"], align: Align::Left, min_width: 0 },
    Column { heading: ["", "", "Count"], align: Align::Right, min_width: 5 },
    Column { heading: ["Date of", "First", "Transaction"], align: Align::Left, min_width: 11 },
    Column { heading: ["Date of", "Last", "Transaction"], align: Align::Left, min_width: 11 },
    Column { heading: ["", "Debit", "Amount"], align: Align::Right, min_width: 10 },
    Column { heading: ["", "", "%age"], align: Align::Right, min_width: 5 },
    Column { heading: ["", "Credit", "Amount"], align: Align::Right, min_width: 10 },
    Column { heading: ["", "", "%age"], align: Align::Right, min_width: 5 },
    Column { heading: ["", "Nett", "Amount"], align: Align::Right, min_width: 10 },
];

pub fn write_report<W: Write>(out: &mut W, report: &Report, format: OutputFormat) -> io::Result<()> {
    match format {
        OutputFormat::Text => write_table(out, report),
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, &report.rows)?;
            writeln!(out)
        }
    }
}

fn write_table<W: Write>(out: &mut W, report: &Report) -> io::Result<()> {
    let cells: Vec<[String; 9]> = report.rows.iter().map(row_cells).collect();

    let widths: Vec<usize> = COLUMNS
        .iter()
        .enumerate()
        .map(|(i, col)| {
            let heading = col.heading.iter().map(|h| h.len()).max().unwrap_or(0);
            let data = cells.iter().map(|c| c[i].chars().count()).max().unwrap_or(0);
            let floor = if i == 0 { report.name_width } else { col.min_width };
            heading.max(data).max(floor)
        })
        .collect();

    for line in 0..3 {
        let headings: Vec<&str> = COLUMNS.iter().map(|c| c.heading[line]).collect();
        write_line(out, &headings, &widths)?;
    }
    let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
    write_line(out, &rule, &widths)?;

    for row in &cells {
        write_line(out, row, &widths)?;
    }
    Ok(())
}

fn write_line<W: Write, S: AsRef<str>>(out: &mut W, cells: &[S], widths: &[usize]) -> io::Result<()> {
    let mut line = String::new();
    for ((cell, col), &width) in cells.iter().zip(COLUMNS.iter()).zip(widths) {
        if !line.is_empty() {
            line.push(' ');
        }
        let cell = cell.as_ref();
        match col.align {
            Align::Left => line.push_str(&format!("{cell:<width$}")),
            Align::Right => line.push_str(&format!("{cell:>width$}")),
        }
    }
    writeln!(out, "{}", line.trim_end())
}

fn row_cells(row: &ReportRow) -> [String; 9] {
    [
        row.label(),
        row.count.to_string(),
        format_date(row.first_date),
        format_date(row.last_date),
        format_amount(row.debit),
        format_share(row.debit_share),
        format_amount(row.credit),
        format_share(row.credit_share),
        format_amount(row.net),
    ]
}

fn format_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string()).unwrap_or_default()
}

fn format_amount(amount: Money) -> String {
    if amount.is_zero() {
        String::new()
    } else {
        amount.to_string()
    }
}

fn format_share(share: Option<f64>) -> String {
    match share {
        Some(s) if s.is_finite() && s != 0.0 => format!("{:.0}%", s * 100.0),
        _ => String::new(),
    }
}
