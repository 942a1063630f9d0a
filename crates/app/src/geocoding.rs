//! Geocoding
//!
//! Forward and reverse lookups against a Nominatim-compatible service,
//! restricted to the delivery area. Lookups never fail: problems are
//! reported as [`GeocodeOutcome::NotFound`] or [`GeocodeOutcome::Unavailable`].

use async_trait::async_trait;
use larder::geo::{Address, BoundingBox, Coordinates, GeocodeOutcome, normalize_pincode};
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use tracing::{debug, warn};

#[derive(Debug, Clone)]
pub struct GeocoderConfig {
    /// Service base URL, e.g. `"https://nominatim.openstreetmap.org"`.
    pub base_url: String,

    /// Sent as `User-Agent`; public Nominatim instances require one.
    pub user_agent: String,
}

#[automock]
#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Coordinates for a free-text address.
    async fn forward(&self, query: String) -> GeocodeOutcome<Coordinates>;

    /// Postal address for a coordinate pair.
    async fn reverse(&self, point: Coordinates) -> GeocodeOutcome<Address>;
}

#[derive(Debug, Clone)]
pub struct GeocodingClient {
    base_url: String,
    bounds: BoundingBox,
    http: Client,
}

impl GeocodingClient {
    /// Create a client bounded to [`BoundingBox::INDIA`].
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: GeocoderConfig) -> Result<Self, reqwest::Error> {
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            bounds: BoundingBox::INDIA,
            http: Client::builder().user_agent(config.user_agent).build()?,
        })
    }

    async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T, reqwest::Error> {
        self.http
            .get(format!("{}/{path}", self.base_url))
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
    }
}

#[async_trait]
impl Geocoder for GeocodingClient {
    #[tracing::instrument(name = "geocoding.forward", skip(self))]
    async fn forward(&self, query: String) -> GeocodeOutcome<Coordinates> {
        let query = query.trim();

        if query.is_empty() {
            return GeocodeOutcome::NotFound;
        }

        let params = [
            ("q", query.to_string()),
            ("format", "json".to_string()),
            ("limit", "1".to_string()),
            ("countrycodes", "in".to_string()),
            ("viewbox", self.bounds.viewbox()),
            ("bounded", "1".to_string()),
        ];

        match self.get::<Vec<Place>>("search", &params).await {
            Ok(places) => first_in_bounds(places, &self.bounds),
            Err(error) => {
                warn!(%error, "forward geocoding unavailable");

                GeocodeOutcome::Unavailable
            }
        }
    }

    #[tracing::instrument(name = "geocoding.reverse", skip(self))]
    async fn reverse(&self, point: Coordinates) -> GeocodeOutcome<Address> {
        if !self.bounds.contains(point) {
            debug!("coordinates outside delivery area");

            return GeocodeOutcome::NotFound;
        }

        let params = [
            ("lat", point.lat.to_string()),
            ("lon", point.lon.to_string()),
            ("format", "json".to_string()),
            ("addressdetails", "1".to_string()),
        ];

        match self.get::<ReversePlace>("reverse", &params).await {
            Ok(place) => place
                .address
                .map_or(GeocodeOutcome::NotFound, |details| {
                    GeocodeOutcome::Found(details.normalize())
                }),
            Err(error) => {
                warn!(%error, "reverse geocoding unavailable");

                GeocodeOutcome::Unavailable
            }
        }
    }
}

fn first_in_bounds(places: Vec<Place>, bounds: &BoundingBox) -> GeocodeOutcome<Coordinates> {
    places
        .into_iter()
        .filter_map(|place| place.coordinates())
        .find(|point| bounds.contains(*point))
        .map_or(GeocodeOutcome::NotFound, GeocodeOutcome::Found)
}

/// A `/search` result. Coordinates arrive as strings.
#[derive(Debug, Deserialize)]
struct Place {
    lat: String,
    lon: String,
}

impl Place {
    fn coordinates(&self) -> Option<Coordinates> {
        let point = Coordinates {
            lat: self.lat.trim().parse().ok()?,
            lon: self.lon.trim().parse().ok()?,
        };

        point.is_finite().then_some(point)
    }
}

/// A `/reverse` result. Unmatched lookups come back with an `error` field and no address.
#[derive(Debug, Deserialize)]
struct ReversePlace {
    address: Option<AddressDetails>,
}

#[derive(Debug, Default, Deserialize)]
struct AddressDetails {
    house_number: Option<String>,
    road: Option<String>,
    neighbourhood: Option<String>,
    suburb: Option<String>,
    city: Option<String>,
    town: Option<String>,
    village: Option<String>,
    county: Option<String>,
    state_district: Option<String>,
    state: Option<String>,
    postcode: Option<String>,
}

impl AddressDetails {
    fn normalize(self) -> Address {
        let address = [
            self.house_number,
            self.road,
            self.neighbourhood,
            self.suburb,
        ]
        .into_iter()
        .flatten()
        .map(|part| part.trim().to_string())
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ");

        let city = self
            .city
            .or(self.town)
            .or(self.village)
            .or(self.county)
            .or(self.state_district)
            .unwrap_or_default();

        Address {
            address,
            city,
            state: self.state.unwrap_or_default(),
            pincode: self
                .postcode
                .as_deref()
                .and_then(normalize_pincode)
                .unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    #[test]
    fn reverse_details_are_normalized() -> TestResult {
        let place: ReversePlace = serde_json::from_str(
            r#"{
                "display_name": "12, MG Road, Shanthala Nagar, Bengaluru",
                "address": {
                    "house_number": "12",
                    "road": "MG Road",
                    "suburb": "Shanthala Nagar",
                    "city": "Bengaluru",
                    "state": "Karnataka",
                    "postcode": "560 001",
                    "country_code": "in"
                }
            }"#,
        )?;

        let address = place.address.map(AddressDetails::normalize);

        assert_eq!(
            address,
            Some(Address {
                address: "12, MG Road, Shanthala Nagar".to_string(),
                city: "Bengaluru".to_string(),
                state: "Karnataka".to_string(),
                pincode: "560001".to_string(),
            })
        );

        Ok(())
    }

    #[test]
    fn towns_stand_in_for_cities() {
        let address = AddressDetails {
            town: Some("Manali".to_string()),
            state: Some("Himachal Pradesh".to_string()),
            postcode: Some("0123".to_string()),
            ..AddressDetails::default()
        }
        .normalize();

        assert_eq!(address.city, "Manali");
        assert_eq!(address.pincode, "");
    }

    #[test]
    fn unmatched_reverse_lookup_has_no_address() -> TestResult {
        let place: ReversePlace = serde_json::from_str(r#"{"error":"Unable to geocode"}"#)?;

        assert!(place.address.is_none());

        Ok(())
    }

    #[test]
    fn forward_results_outside_bounds_are_not_found() {
        let places = vec![Place {
            lat: "51.5074".to_string(),
            lon: "-0.1278".to_string(),
        }];

        assert_eq!(
            first_in_bounds(places, &BoundingBox::INDIA),
            GeocodeOutcome::NotFound
        );
    }

    #[test]
    fn forward_picks_first_result_in_bounds() {
        let places = vec![
            Place {
                lat: "not a number".to_string(),
                lon: "77.59".to_string(),
            },
            Place {
                lat: "12.9716".to_string(),
                lon: "77.5946".to_string(),
            },
        ];

        assert_eq!(
            first_in_bounds(places, &BoundingBox::INDIA),
            GeocodeOutcome::Found(Coordinates {
                lat: 12.9716,
                lon: 77.5946,
            })
        );
    }

    #[tokio::test]
    async fn reverse_outside_bounds_skips_the_network() -> TestResult {
        let client = GeocodingClient::new(GeocoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            user_agent: "larder-tests".to_string(),
        })?;

        let outcome = client
            .reverse(Coordinates {
                lat: 40.71,
                lon: -74.0,
            })
            .await;

        assert_eq!(outcome, GeocodeOutcome::NotFound);

        Ok(())
    }

    #[tokio::test]
    async fn blank_queries_are_not_found() -> TestResult {
        let client = GeocodingClient::new(GeocoderConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            user_agent: "larder-tests".to_string(),
        })?;

        assert_eq!(client.forward("   ".to_string()).await, GeocodeOutcome::NotFound);

        Ok(())
    }
}
