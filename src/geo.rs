//! Geography
//!
//! Input validation for geocoding lookups. Coordinates and results outside
//! the delivery area's bounding box are treated as not found.

use serde::{Deserialize, Serialize};

/// A latitude/longitude pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    /// Latitude.
    pub lat: f64,

    /// Longitude.
    pub lon: f64,
}

impl Coordinates {
    /// Whether both components are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.lat.is_finite() && self.lon.is_finite()
    }
}

/// An inclusive latitude/longitude rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    /// Southern edge.
    pub min_lat: f64,

    /// Northern edge.
    pub max_lat: f64,

    /// Western edge.
    pub min_lon: f64,

    /// Eastern edge.
    pub max_lon: f64,
}

impl BoundingBox {
    /// Mainland India and its islands.
    pub const INDIA: BoundingBox = BoundingBox {
        min_lat: 6.5,
        max_lat: 35.7,
        min_lon: 68.1,
        max_lon: 97.4,
    };

    /// Whether `point` lies inside the box, edges included.
    pub fn contains(&self, point: Coordinates) -> bool {
        point.is_finite()
            && (self.min_lat..=self.max_lat).contains(&point.lat)
            && (self.min_lon..=self.max_lon).contains(&point.lon)
    }

    /// `min_lon,max_lat,max_lon,min_lat`, the order geocoders expect for a viewbox.
    pub fn viewbox(&self) -> String {
        format!(
            "{},{},{},{}",
            self.min_lon, self.max_lat, self.max_lon, self.min_lat
        )
    }
}

/// A normalized postal address.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    /// Street level description.
    pub address: String,

    /// City, town or village.
    pub city: String,

    /// State.
    pub state: String,

    /// Six digit postal code; empty when unknown.
    pub pincode: String,
}

/// Result of a geocoding lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "result", rename_all = "snake_case")]
pub enum GeocodeOutcome<T> {
    /// The lookup matched.
    Found(T),

    /// The lookup ran but matched nothing usable.
    NotFound,

    /// The geocoding service could not be reached or answered with an error.
    Unavailable,
}

impl<T> GeocodeOutcome<T> {
    /// The result, if found.
    pub fn found(self) -> Option<T> {
        match self {
            GeocodeOutcome::Found(value) => Some(value),
            GeocodeOutcome::NotFound | GeocodeOutcome::Unavailable => None,
        }
    }
}

/// Extract a valid Indian pincode from free text.
///
/// A pincode is six digits not starting with zero; spaces inside it are tolerated.
pub fn normalize_pincode(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| !c.is_whitespace()).collect();

    let valid = digits.len() == 6
        && digits.chars().all(|c| c.is_ascii_digit())
        && !digits.starts_with('0');

    valid.then_some(digits)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn india_box_contains_major_cities() {
        let bengaluru = Coordinates {
            lat: 12.97,
            lon: 77.59,
        };
        let delhi = Coordinates {
            lat: 28.61,
            lon: 77.21,
        };

        assert!(BoundingBox::INDIA.contains(bengaluru));
        assert!(BoundingBox::INDIA.contains(delhi));
    }

    #[test]
    fn india_box_excludes_elsewhere() {
        let london = Coordinates {
            lat: 51.5,
            lon: -0.12,
        };
        let nan = Coordinates {
            lat: f64::NAN,
            lon: 77.0,
        };

        assert!(!BoundingBox::INDIA.contains(london));
        assert!(!BoundingBox::INDIA.contains(nan));
    }

    #[test]
    fn edges_are_inside() {
        let corner = Coordinates {
            lat: 6.5,
            lon: 97.4,
        };

        assert!(BoundingBox::INDIA.contains(corner));
    }

    #[test]
    fn viewbox_is_west_north_east_south() {
        assert_eq!(BoundingBox::INDIA.viewbox(), "68.1,35.7,97.4,6.5");
    }

    #[test]
    fn pincodes_are_normalized() {
        assert_eq!(normalize_pincode("560 001"), Some("560001".to_string()));
        assert_eq!(normalize_pincode("060001"), None);
        assert_eq!(normalize_pincode("5600"), None);
        assert_eq!(normalize_pincode("56000a"), None);
    }
}
