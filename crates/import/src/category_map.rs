use bankac_core::CategoryTree;
use std::io::BufRead;
use thiserror::Error;

use crate::issue::Issue;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MapError {
    #[error("Bad entry in the map of transaction types: no child category given: {0:?}")]
    MissingChild(String),
}

/// Split a `<parent> <child>` line. The child keeps any inner whitespace.
pub fn parse_map_line(line: &str) -> Result<(&str, &str), MapError> {
    let trimmed = line.trim();
    match trimmed.split_once(char::is_whitespace) {
        Some((parent, child)) if !child.trim().is_empty() => Ok((parent, child.trim_start())),
        _ => Err(MapError::MissingChild(line.to_string())),
    }
}

/// Feed every edge of a category map into `tree`, in file order.
///
/// Blank lines and `#` comments are skipped. Malformed lines and edges the
/// tree rejects come back as issues; the rest of the file is still loaded.
pub fn load_category_map<R: BufRead>(
    tree: &mut CategoryTree,
    reader: R,
    origin: &str,
) -> std::io::Result<Vec<Issue>> {
    let mut issues = Vec::new();

    for (idx, line) in reader.lines().enumerate() {
        let line = line?;
        let line_no = idx + 1;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            continue;
        }

        let (parent, child) = match parse_map_line(&line) {
            Ok(edge) => edge,
            Err(e) => {
                issues.push(Issue::new(origin, line_no, e));
                continue;
            }
        };
        if let Err(e) = tree.add_category(parent, child) {
            issues.push(Issue::new(origin, line_no, e));
        }
    }

    tracing::debug!(origin, categories = tree.len(), issues = issues.len(), "loaded category map");
    Ok(issues)
}
