use anyhow::{Context, Result};
use bankac_core::CategoryTree;
use bankac_import::{load_category_map, read_statement, Analysis, EditRules, Issue};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// The three files a run reads.
#[derive(Debug, Clone)]
pub struct Inputs {
    pub ac_file: PathBuf,
    pub map_file: PathBuf,
    pub edit_file: PathBuf,
}

/// Result of a run: the populated tree plus every problem found along the way.
pub struct Outcome {
    pub tree: CategoryTree,
    pub issues: Vec<Issue>,
    pub transactions: usize,
}

fn open(path: &Path, desc: &str) -> Result<File> {
    File::open(path).with_context(|| format!("Couldn't open the {desc} file: {}", path.display()))
}

/// Load the configuration files, then classify and aggregate every transaction.
pub fn analyse(inputs: &Inputs, settings: &Settings) -> Result<Outcome> {
    let mut issues = Vec::new();

    let mut tree = CategoryTree::new().context("Cannot initialise the map of transaction types")?;

    let map_origin = inputs.map_file.display().to_string();
    let map = open(&inputs.map_file, "map of transaction types")?;
    issues.extend(
        load_category_map(&mut tree, BufReader::new(map), &map_origin)
            .with_context(|| format!("Couldn't read {map_origin}"))?,
    );

    let edit_origin = inputs.edit_file.display().to_string();
    let edits = open(&inputs.edit_file, "transaction edits")?;
    let (rules, rule_issues) = EditRules::parse(BufReader::new(edits), &edit_origin)
        .with_context(|| format!("Couldn't read {edit_origin}"))?;
    issues.extend(rule_issues);

    tracing::info!(categories = tree.len(), rules = rules.len(), "configuration loaded");

    let ac_origin = inputs.ac_file.display().to_string();
    let ac = open(&inputs.ac_file, "bank account")?;
    let batch = read_statement(BufReader::new(ac), &settings.statement, &ac_origin)
        .with_context(|| format!("Couldn't read the transactions from {ac_origin}"))?;
    issues.extend(batch.issues);

    let mut analysis = Analysis::new(tree, rules, settings.type_codes.clone());
    analysis.process_all(&ac_origin, &batch.transactions);
    issues.extend(analysis.take_issues());

    let transactions = analysis.processed();
    tracing::info!(
        transactions,
        categories = analysis.tree().len(),
        issues = issues.len(),
        "statement analysed"
    );

    Ok(Outcome {
        tree: analysis.into_tree(),
        issues,
        transactions,
    })
}
