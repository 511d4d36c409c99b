use anyhow::Result;
use bankac_core::{build_report, Money, ReportOptions, ReportStyle};
use clap::{ArgAction, Parser};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod render;
mod run;
mod settings;

use render::OutputFormat;
use run::Inputs;
use settings::Settings;

/// Analyse a bank account statement by category.
#[derive(Parser, Debug)]
#[command(name = "bankac", version, about)]
struct Cli {
    /// The file containing the bank account transactions
    #[arg(long, env = "BANKAC_AC_FILE")]
    ac_file: PathBuf,

    /// The file containing the transaction name map
    #[arg(long, env = "BANKAC_MAP_FILE")]
    map_file: PathBuf,

    /// The file containing the transaction name replacements
    #[arg(long, env = "BANKAC_EDIT_FILE")]
    edit_file: PathBuf,

    /// Don't suppress entries which have no transactions
    #[arg(long, alias = "show-zeros")]
    show_zeroes: bool,

    /// Show a summary report with no leaf transactions
    #[arg(long)]
    summary: bool,

    /// Don't show summaries where the total transactions are less than this
    #[arg(long)]
    minimal_amount: Option<Money>,

    /// Settings file (TOML) with the statement layout and report defaults
    #[arg(long, env = "BANKAC_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Log more (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    /// Flags given on the command line win over the settings file.
    fn apply_to(&self, options: &mut ReportOptions) {
        if self.show_zeroes {
            options.show_zeros = true;
        }
        if self.summary {
            options.style = ReportStyle::Summary;
        }
        if let Some(amount) = self.minimal_amount {
            options.minimal_amount = amount;
        }
    }

    fn inputs(&self) -> Inputs {
        Inputs {
            ac_file: self.ac_file.clone(),
            map_file: self.map_file.clone(),
            edit_file: self.edit_file.clone(),
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "bankac={level},bankac_core={level},bankac_import={level}"
        ))
    });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let mut settings = Settings::load(cli.config.as_deref())?;
    cli.apply_to(&mut settings.report);

    let outcome = run::analyse(&cli.inputs(), &settings)?;
    for issue in &outcome.issues {
        tracing::warn!("{issue}");
    }

    let report = build_report(&outcome.tree, &settings.report);
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    render::write_report(&mut out, &report, cli.format)?;

    Ok(())
}
