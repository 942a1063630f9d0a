//! Geocoding Handlers

use larder::geo::GeocodeOutcome;

pub(crate) mod forward;
pub(crate) mod reverse;

fn status<T>(outcome: &GeocodeOutcome<T>) -> &'static str {
    match outcome {
        GeocodeOutcome::Found(_) => "found",
        GeocodeOutcome::NotFound => "not_found",
        GeocodeOutcome::Unavailable => "unavailable",
    }
}
