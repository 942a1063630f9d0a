//! Forward Geocode Handler

use std::sync::Arc;

use larder::geo::{Coordinates, GeocodeOutcome};
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, state::State};

use super::status;

/// Coordinates Response
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub(crate) struct CoordinatesResponse {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinates> for CoordinatesResponse {
    fn from(point: Coordinates) -> Self {
        Self {
            lat: point.lat,
            lon: point.lon,
        }
    }
}

/// Forward Geocode Response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ForwardGeocodeResponse {
    /// found, not_found or unavailable
    pub status: String,

    pub coordinates: Option<CoordinatesResponse>,
}

impl From<GeocodeOutcome<Coordinates>> for ForwardGeocodeResponse {
    fn from(outcome: GeocodeOutcome<Coordinates>) -> Self {
        Self {
            status: status(&outcome).to_string(),
            coordinates: outcome.found().map(Into::into),
        }
    }
}

/// Forward Geocode Handler
///
/// Coordinates for a free-text address inside the delivery area.
#[endpoint(tags("geocoding"), summary = "Geocode Address")]
pub(crate) async fn handler(
    q: QueryParam<String, true>,
    depot: &mut Depot,
) -> Result<Json<ForwardGeocodeResponse>, StatusError> {
    let outcome = depot
        .obtain_or_500::<Arc<State>>()?
        .app
        .geocoder
        .forward(q.into_inner())
        .await;

    Ok(Json(outcome.into()))
}
