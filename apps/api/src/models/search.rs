use std::fmt;

use serde::{Deserialize, Serialize};

use crate::models::lenient;

/// Desired neighbourhood safety, as selected in the search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum SafetyPreference {
    #[default]
    Any,
    VerySafe,
    Safe,
    Moderate,
}

impl From<Option<String>> for SafetyPreference {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("very_safe") => Self::VerySafe,
            Some("safe") => Self::Safe,
            Some("moderate") => Self::Moderate,
            _ => Self::Any,
        }
    }
}

impl fmt::Display for SafetyPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::VerySafe => "very_safe",
            Self::Safe => "safe",
            Self::Moderate => "moderate",
        })
    }
}

/// Desired cleanliness, as selected in the search form.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "Option<String>")]
pub enum CleanlinessPreference {
    #[default]
    Any,
    VeryClean,
    Clean,
    Moderate,
}

impl From<Option<String>> for CleanlinessPreference {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some("very_clean") => Self::VeryClean,
            Some("clean") => Self::Clean,
            Some("moderate") => Self::Moderate,
            _ => Self::Any,
        }
    }
}

impl fmt::Display for CleanlinessPreference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Any => "any",
            Self::VeryClean => "very_clean",
            Self::Clean => "clean",
            Self::Moderate => "moderate",
        })
    }
}

/// One housing search, exactly as the client form submits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchParams {
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub company: String,
    /// "City, Region"
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub location: String,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub start_date: String,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub end_date: String,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub max_price: f64,
    /// Miles from the office.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub max_distance: f64,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub room_type: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub amenities: Vec<String>,
    #[serde(deserialize_with = "lenient::string_list")]
    pub preferences: Vec<String>,
    pub safety_preference: SafetyPreference,
    pub cleanliness_preference: CleanlinessPreference,
}

impl SearchParams {
    /// Splits "City, Region" into trimmed tokens. Either may be absent.
    pub fn city_and_region(&self) -> (Option<&str>, Option<&str>) {
        let mut parts = self.location.split(',').map(str::trim);
        let city = parts.next().filter(|s| !s.is_empty());
        let region = parts.next().filter(|s| !s.is_empty());
        (city, region)
    }

    /// Bedroom count implied by the room type: studio is 0, otherwise the
    /// first run of digits, otherwise 1.
    pub fn bedroom_count(&self) -> u32 {
        let room_type = self.room_type.trim();
        if room_type.eq_ignore_ascii_case("studio") {
            return 0;
        }

        let digits: String = room_type
            .chars()
            .skip_while(|c| !c.is_ascii_digit())
            .take_while(|c| c.is_ascii_digit())
            .collect();

        digits.parse().unwrap_or(1)
    }
}
