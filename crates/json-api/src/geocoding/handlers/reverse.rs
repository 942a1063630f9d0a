//! Reverse Geocode Handler

use std::sync::Arc;

use larder::geo::{Address, Coordinates, GeocodeOutcome};
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

use super::status;

/// Address Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct AddressResponse {
    pub address: String,
    pub city: String,
    pub state: String,

    /// Six digit postal code; empty when unknown
    pub pincode: String,
}

impl From<Address> for AddressResponse {
    fn from(address: Address) -> Self {
        Self {
            address: address.address,
            city: address.city,
            state: address.state,
            pincode: address.pincode,
        }
    }
}

/// Reverse Geocode Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ReverseGeocodeResponse {
    /// found, not_found or unavailable
    pub status: String,

    pub address: Option<AddressResponse>,
}

impl From<GeocodeOutcome<Address>> for ReverseGeocodeResponse {
    fn from(outcome: GeocodeOutcome<Address>) -> Self {
        Self {
            status: status(&outcome).to_string(),
            address: outcome.found().map(Into::into),
        }
    }
}

/// Reverse Geocode Handler
///
/// Postal address for a point inside the delivery area.
#[endpoint(tags("geocoding"), summary = "Reverse Geocode")]
pub(crate) async fn handler(
    lat: QueryParam<f64, true>,
    lon: QueryParam<f64, true>,
    depot: &mut Depot,
) -> Result<Json<ReverseGeocodeResponse>, StatusError> {
    let point = Coordinates {
        lat: lat.into_inner(),
        lon: lon.into_inner(),
    };

    let outcome = depot
        .obtain_or_500::<Arc<State>>()?
        .app
        .geocoder
        .reverse(point)
        .await;

    Ok(Json(outcome.into()))
}

#[cfg(test)]
mod tests {
    use larder_app::{context::AppContext, geocoding::MockGeocoder};
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use crate::test_helpers::{service, strict_context};

    use super::*;

    fn make_service(geocoder: MockGeocoder) -> Service {
        service(
            AppContext {
                geocoder: Arc::new(geocoder),
                ..strict_context()
            },
            Router::with_path("geocode/reverse").get(handler),
            false,
        )
    }

    #[tokio::test]
    async fn test_found_point_returns_address() -> TestResult {
        let mut geocoder = MockGeocoder::new();

        geocoder
            .expect_reverse()
            .once()
            .withf(|point| (point.lat - 19.076).abs() < 1e-9 && (point.lon - 72.8777).abs() < 1e-9)
            .return_once(|_| {
                GeocodeOutcome::Found(Address {
                    address: "Marine Drive".to_string(),
                    city: "Mumbai".to_string(),
                    state: "Maharashtra".to_string(),
                    pincode: "400020".to_string(),
                })
            });

        let response: ReverseGeocodeResponse =
            TestClient::get("http://example.com/geocode/reverse?lat=19.076&lon=72.8777")
                .send(&make_service(geocoder))
                .await
                .take_json()
                .await?;

        assert_eq!(response.status, "found");
        assert_eq!(
            response.address.map(|address| address.pincode),
            Some("400020".to_string())
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_not_found_has_no_address() -> TestResult {
        let mut geocoder = MockGeocoder::new();

        geocoder
            .expect_reverse()
            .once()
            .return_once(|_| GeocodeOutcome::NotFound);

        let response: ReverseGeocodeResponse =
            TestClient::get("http://example.com/geocode/reverse?lat=51.5&lon=-0.12")
                .send(&make_service(geocoder))
                .await
                .take_json()
                .await?;

        assert_eq!(response.status, "not_found");
        assert!(response.address.is_none(), "expected no address");

        Ok(())
    }

    #[tokio::test]
    async fn test_missing_coordinates_return_400() -> TestResult {
        let mut geocoder = MockGeocoder::new();

        geocoder.expect_reverse().never();

        let res = TestClient::get("http://example.com/geocode/reverse?lat=19.0")
            .send(&make_service(geocoder))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
