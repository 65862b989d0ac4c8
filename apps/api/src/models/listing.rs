use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize, Serializer};

use crate::models::lenient;

/// How far a listing is from the resolved office.
///
/// Kept structured inside the service and rendered to the display string
/// only when serialized for the client.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(from = "Option<String>")]
pub enum DistanceLabel {
    #[default]
    Unknown,
    WithinRange {
        miles: f64,
        office_address: Option<String>,
    },
    ExceedsRange {
        miles: f64,
        office_address: Option<String>,
    },
}

static LABEL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d+(?:\.\d+)?) miles( \(exceeds max distance\))?(?: from (.+))?$")
        .expect("distance label pattern is valid")
});

impl DistanceLabel {
    /// Labels a measured distance against the user's ceiling.
    pub fn classify(miles: f64, max_distance: f64, office_address: &str) -> Self {
        let office_address = Some(office_address.to_string());
        if miles <= max_distance {
            Self::WithinRange {
                miles,
                office_address,
            }
        } else {
            Self::ExceedsRange {
                miles,
                office_address,
            }
        }
    }

    pub fn miles(&self) -> Option<f64> {
        match self {
            Self::Unknown => None,
            Self::WithinRange { miles, .. } | Self::ExceedsRange { miles, .. } => Some(*miles),
        }
    }

    pub fn exceeds_range(&self) -> bool {
        matches!(self, Self::ExceedsRange { .. })
    }
}

impl fmt::Display for DistanceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (miles, office, exceeds) = match self {
            Self::Unknown => return f.write_str("Unknown from office"),
            Self::WithinRange {
                miles,
                office_address,
            } => (miles, office_address, false),
            Self::ExceedsRange {
                miles,
                office_address,
            } => (miles, office_address, true),
        };

        write!(f, "{miles:.1} miles")?;
        if exceeds {
            f.write_str(" (exceeds max distance)")?;
        }
        if let Some(address) = office {
            write!(f, " from {address}")?;
        }
        Ok(())
    }
}

/// Parses the display form back. Anything unrecognised is `Unknown`.
impl From<String> for DistanceLabel {
    fn from(text: String) -> Self {
        let Some(caps) = LABEL_PATTERN.captures(text.trim()) else {
            return Self::Unknown;
        };
        let Ok(miles) = caps[1].parse::<f64>() else {
            return Self::Unknown;
        };
        let office_address = caps.get(3).map(|m| m.as_str().to_string());

        if caps.get(2).is_some() {
            Self::ExceedsRange {
                miles,
                office_address,
            }
        } else {
            Self::WithinRange {
                miles,
                office_address,
            }
        }
    }
}

impl From<Option<String>> for DistanceLabel {
    fn from(text: Option<String>) -> Self {
        text.map(Self::from).unwrap_or_default()
    }
}

impl Serialize for DistanceLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// One apartment as returned to the client.
///
/// `id` is prefixed with the source tag (`rentcast-…`) so identifiers from
/// different providers never collide within a response.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApartmentListing {
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub id: String,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub title: String,
    /// Monthly rent.
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub price: f64,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub location: String,
    pub distance: DistanceLabel,
    #[serde(deserialize_with = "lenient::f64_or_zero")]
    pub rating: f64,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub image: String,
    #[serde(deserialize_with = "lenient::string_list")]
    pub amenities: Vec<String>,
    #[serde(deserialize_with = "lenient::string_or_empty")]
    pub url: String,
}
