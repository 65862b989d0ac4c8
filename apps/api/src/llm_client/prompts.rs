// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.
// This file contains cross-cutting fragments and the template filler.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Appended to every prompt whose answer is parsed by code.
pub const NO_EXTRA_TEXT: &str = "Do not include any other text or explanation.";

static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-z_]+)\}").expect("placeholder pattern is valid"));

/// Fills `{name}` placeholders in one pass. Substituted values are never
/// scanned again, so user text containing `{...}` is inserted verbatim.
/// Placeholders without a value are left as they are.
pub fn fill_template(template: &str, values: &[(&str, &str)]) -> String {
    PLACEHOLDER
        .replace_all(template, |caps: &Captures| {
            values
                .iter()
                .find(|(name, _)| *name == &caps[1])
                .map(|(_, value)| value.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}
