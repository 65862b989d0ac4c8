// Prompt constants for listing recommendations.

use crate::llm_client::CompletionOptions;

/// System prompt for recommendations: identifiers only.
pub const RECOMMENDATION_SYSTEM: &str = "You are a helpful assistant that analyzes apartment \
    listings and recommends the best matches based on user preferences. \
    Return only the IDs of the recommended apartments in the exact format specified.";

/// Recommendation prompt template.
/// Replace: {amenities}, {preferences}, {safety}, {cleanliness}, {max_price},
///          {max_distance}, {room_type}, {listings}, {no_extra_text}
pub const RECOMMENDATION_PROMPT_TEMPLATE: &str = r#"Given the following apartment listings and user preferences, recommend the top 3 apartments that best match the user's criteria. Consider the following factors:
- User's desired amenities: {amenities}
- User's additional preferences: {preferences}
- Safety preference: {safety}
- Cleanliness preference: {cleanliness}
- Price range: Up to ${max_price}
- Distance preference: Up to {max_distance} miles
- Room type: {room_type}

Here are the available apartments:
{listings}

If amenities are N/A, use your general knowledge of the building, its address and the surrounding area to infer likely amenities. If you cannot infer them, recommend based on the other criteria.

IMPORTANT: Return ONLY the IDs of the top 3 apartments that best match the user's preferences. Format your response exactly like this:
ID: <id1>
ID: <id2>
ID: <id3>

{no_extra_text} Just the IDs in the format shown above."#;

/// One listing block inside the prompt.
/// Replace: {id}, {title}, {price}, {location}, {distance}, {rating}, {amenities}
pub const LISTING_BLOCK_TEMPLATE: &str = "ID: {id}
Title: {title}
Price: ${price}/mo
Location: {location}
Distance: {distance}
Rating: {rating}
Amenities: {amenities}
";

pub const RECOMMENDATION_OPTIONS: CompletionOptions = CompletionOptions {
    temperature: 0.7,
    max_tokens: 150,
};

/// Upper bound on ids returned to the client.
pub const MAX_RECOMMENDATIONS: usize = 3;
