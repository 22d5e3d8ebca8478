use serde::{Deserialize, Serialize};

/// A best-effort structured address produced by the autocomplete provider.
///
/// Fields absent from the provider response stay empty; nothing is guessed.
/// The struct is transient: it is folded into whichever record carries it
/// (as a JSON column) rather than persisted on its own.
#[derive(Clone, Debug, Default, Deserialize, PartialEq, Serialize)]
pub struct StructuredAddress {
    pub street_line1: String,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub country: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lat: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lng: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub place_id: Option<String>,
}

impl StructuredAddress {
    /// `"lat,lng"` rendering, the form stored alongside contact submissions.
    pub fn coordinates(&self) -> Option<String> {
        match (self.lat, self.lng) {
            (Some(lat), Some(lng)) => Some(format!("{lat},{lng}")),
            _ => None,
        }
    }
}
