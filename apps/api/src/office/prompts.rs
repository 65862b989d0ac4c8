// Prompt constants for office resolution.

use crate::llm_client::CompletionOptions;

/// System prompt for office lookup: constrains the answer to a street address.
pub const OFFICE_LOOKUP_SYSTEM: &str =
    "You are a precise assistant that provides exact office locations for major tech companies. \
    For headquarters and major offices, provide the exact street address. \
    Be consistent and precise with addresses. \
    Respond with the street address only.";

/// Office lookup prompt template. Replace `{company}` and `{location}` before sending.
pub const OFFICE_LOOKUP_PROMPT_TEMPLATE: &str = "What is the exact address of the main {company} \
    office or headquarters in {location}? Provide only the address, no additional text.";

pub const OFFICE_LOOKUP_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.0,
    max_tokens: 100,
};
