//! Parser for the model's recommendation answer.
//!
//! Grammar, one entry per non-empty trimmed line:
//!   `ID: <token>`  where token is a run of non-whitespace characters
//!   `<token>`      where token matches `[A-Za-z0-9-]+`
//! Any other line is rejected and logged.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

const ID_PREFIX: &str = "ID: ";

static BARE_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9-]+$").expect("bare id pattern is valid"));

/// Extracts identifiers in the order the model listed them.
pub fn parse_recommended_ids(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter_map(|line| {
            let id = parse_line(line);
            if id.is_none() {
                warn!("Rejected recommendation line: {line:?}");
            }
            id
        })
        .collect()
}

fn parse_line(line: &str) -> Option<String> {
    if let Some(rest) = line.strip_prefix(ID_PREFIX) {
        let token = rest.trim();
        let well_formed = !token.is_empty() && !token.chars().any(char::is_whitespace);
        return well_formed.then(|| token.to_string());
    }

    BARE_ID.is_match(line).then(|| line.to_string())
}
