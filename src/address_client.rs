use crate::domain::StructuredAddress;
use reqwest::{Client, Error};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Client for the Places-style autocomplete/details REST API.
///
/// Suggestion lookups are advisory: provider failures degrade to an empty
/// suggestion list at the route layer, and forms keep working on free-text
/// input alone.
#[derive(Clone)]
pub struct AddressClient {
    http_client: Client,
    base_url: String,
    api_key: Secret<String>,
    country_bias: String,
}

/// Queries shorter than this never reach the provider.
const MIN_QUERY_LENGTH: usize = 3;

#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct AddressSuggestion {
    pub description: String,
    pub place_id: String,
}

impl AddressClient {
    pub fn new(
        base_url: String,
        api_key: Secret<String>,
        country_bias: String,
        timeout: Duration,
    ) -> Self {
        let http_client = Client::builder().timeout(timeout).build().unwrap();

        Self {
            http_client,
            base_url,
            api_key,
            country_bias,
        }
    }

    /// Ordered candidate addresses for a free-text query, biased to the
    /// given country (falling back to the configured default). A non-OK
    /// provider status yields an empty list, not an error.
    pub async fn suggestions(
        &self,
        query: &str,
        country: Option<&str>,
    ) -> Result<Vec<AddressSuggestion>, Error> {
        if query.trim().len() < MIN_QUERY_LENGTH {
            return Ok(Vec::new());
        }

        let country = country.unwrap_or(&self.country_bias);
        let url = format!("{}/maps/api/place/autocomplete/json", &self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("input", query),
                ("types", "address"),
                ("components", &format!("country:{country}")),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<AutocompleteResponse>()
            .await?;

        if response.status == "OK" {
            Ok(response.predictions)
        } else {
            Ok(Vec::new())
        }
    }

    /// Resolves a suggestion's place id into a structured address.
    /// `Ok(None)` means the provider answered but had nothing for the id.
    pub async fn resolve(&self, place_id: &str) -> Result<Option<StructuredAddress>, Error> {
        let url = format!("{}/maps/api/place/details/json", &self.base_url);
        let response = self
            .http_client
            .get(&url)
            .query(&[
                ("place_id", place_id),
                ("fields", "address_component,geometry,place_id"),
                ("key", self.api_key.expose_secret()),
            ])
            .send()
            .await?
            .error_for_status()?
            .json::<DetailsResponse>()
            .await?;

        if response.status != "OK" {
            return Ok(None);
        }

        Ok(response.result.map(into_structured_address))
    }
}

fn into_structured_address(place: PlaceDetails) -> StructuredAddress {
    let mut street_number = String::new();
    let mut route = String::new();
    let mut address = StructuredAddress {
        country: "US".to_string(),
        place_id: place.place_id,
        ..Default::default()
    };

    for component in place.address_components {
        let value_for = |long: bool| {
            if long {
                component.long_name.clone()
            } else {
                component.short_name.clone()
            }
        };
        if component.types.iter().any(|t| t == "street_number") {
            street_number = value_for(true);
        } else if component.types.iter().any(|t| t == "route") {
            route = value_for(true);
        } else if component.types.iter().any(|t| t == "locality") {
            address.city = value_for(true);
        } else if component
            .types
            .iter()
            .any(|t| t == "administrative_area_level_1")
        {
            address.state = value_for(false);
        } else if component.types.iter().any(|t| t == "postal_code") {
            address.postal_code = value_for(true);
        } else if component.types.iter().any(|t| t == "country") {
            address.country = value_for(false);
        }
    }

    address.street_line1 = [street_number, route]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    if let Some(geometry) = place.geometry {
        address.lat = Some(geometry.location.lat);
        address.lng = Some(geometry.location.lng);
    }

    address
}

#[derive(Deserialize)]
struct AutocompleteResponse {
    status: String,
    #[serde(default)]
    predictions: Vec<AddressSuggestion>,
}

#[derive(Deserialize)]
struct DetailsResponse {
    status: String,
    result: Option<PlaceDetails>,
}

#[derive(Deserialize)]
struct PlaceDetails {
    #[serde(default)]
    address_components: Vec<AddressComponent>,
    geometry: Option<Geometry>,
    place_id: Option<String>,
}

#[derive(Deserialize)]
struct AddressComponent {
    long_name: String,
    short_name: String,
    types: Vec<String>,
}

#[derive(Deserialize)]
struct Geometry {
    location: Location,
}

#[derive(Deserialize)]
struct Location {
    lat: f64,
    lng: f64,
}
