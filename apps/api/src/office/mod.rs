//! Office Resolver: finds the street address and coordinates of an
//! employer's office in a given city.
//!
//! Known employer/city pairs are answered from a fixed table with no network
//! traffic. Everything else is one completion call (address) followed by one
//! geocoding call (coordinates). Any failure along the way yields `None`.

pub mod prompts;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{info, warn};

use crate::geo::Coordinates;
use crate::geocoding::{GeocodingClient, GeocodingError};
use crate::llm_client::prompts::fill_template;
use crate::llm_client::{LlmClient, LlmError};
use crate::office::prompts::{
    OFFICE_LOOKUP_OPTIONS, OFFICE_LOOKUP_PROMPT_TEMPLATE, OFFICE_LOOKUP_SYSTEM,
};

/// Resolved office for one request. Not cached across requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficeLocation {
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl OfficeLocation {
    pub fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }
}

struct KnownOffice {
    company: &'static str,
    /// Lowercase substring the requested location must contain.
    location_fragment: &'static str,
    address: &'static str,
    latitude: f64,
    longitude: f64,
}

/// Frequent queries answered without an LLM round trip.
const KNOWN_OFFICES: &[KnownOffice] = &[KnownOffice {
    company: "amazon",
    location_fragment: "arlington",
    address: "2100 Crystal Drive, Arlington, VA 22202",
    latitude: 38.8518,
    longitude: -77.0487,
}];

fn known_office(company: &str, location: &str) -> Option<OfficeLocation> {
    let company = company.trim();
    let location = location.to_lowercase();

    KNOWN_OFFICES
        .iter()
        .find(|k| company.eq_ignore_ascii_case(k.company) && location.contains(k.location_fragment))
        .map(|k| OfficeLocation {
            address: k.address.to_string(),
            latitude: k.latitude,
            longitude: k.longitude,
        })
}

#[derive(Debug, Error)]
enum LookupError {
    #[error("address lookup failed: {0}")]
    Llm(#[from] LlmError),

    #[error("geocoding failed: {0}")]
    Geocoding(#[from] GeocodingError),
}

#[derive(Clone)]
pub struct OfficeResolver {
    llm: LlmClient,
    geocoder: GeocodingClient,
}

impl OfficeResolver {
    pub fn new(llm: LlmClient, geocoder: GeocodingClient) -> Self {
        Self { llm, geocoder }
    }

    /// Returns the office for `company` in `location`, or `None` when it
    /// cannot be determined. Never fails the caller.
    pub async fn resolve(&self, company: &str, location: &str) -> Option<OfficeLocation> {
        if let Some(office) = known_office(company, location) {
            info!("Office for {company} in {location} resolved from known offices");
            return Some(office);
        }

        if !self.llm.is_configured() {
            warn!("Skipping office lookup: OPENAI_API_KEY is not configured");
            return None;
        }
        if !self.geocoder.is_configured() {
            warn!("Skipping office lookup: OPENCAGE_API_KEY is not configured");
            return None;
        }

        match self.lookup(company, location).await {
            Ok(Some(office)) => {
                info!(
                    "Office for {company} in {location}: {} ({}, {})",
                    office.address, office.latitude, office.longitude
                );
                Some(office)
            }
            Ok(None) => {
                warn!("No coordinates found for the {company} office in {location}");
                None
            }
            Err(e) => {
                warn!("Office lookup for {company} in {location} failed: {e}");
                None
            }
        }
    }

    async fn lookup(
        &self,
        company: &str,
        location: &str,
    ) -> Result<Option<OfficeLocation>, LookupError> {
        let prompt = fill_template(
            OFFICE_LOOKUP_PROMPT_TEMPLATE,
            &[("company", company), ("location", location)],
        );

        let answer = self
            .llm
            .complete(OFFICE_LOOKUP_SYSTEM, &prompt, OFFICE_LOOKUP_OPTIONS)
            .await?;
        let address = clean_address(&answer);

        let Some(coordinates) = self.geocoder.forward(&address).await? else {
            return Ok(None);
        };

        Ok(Some(OfficeLocation {
            address,
            latitude: coordinates.latitude,
            longitude: coordinates.longitude,
        }))
    }
}

/// Models sometimes wrap the address in quotes or end it with a period.
fn clean_address(answer: &str) -> String {
    answer
        .trim()
        .trim_matches(|c| c == '"' || c == '\'')
        .trim_end_matches('.')
        .trim()
        .to_string()
}
