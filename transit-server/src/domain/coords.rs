//! Geographic coordinates and great-circle distance.

use super::TransitError;

const DEG_TO_RAD: f64 = 0.017_453_292_519_943_295;
const EARTH_RADIUS_METERS: f64 = 6_372_797.560_856;

/// A validated latitude/longitude pair, in degrees.
///
/// Any `Coordinates` value is finite and in range by construction, so the
/// distance math below never sees NaN or infinities.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Coordinates {
    lat: f64,
    lng: f64,
}

impl Coordinates {
    /// Validates and constructs a coordinate pair.
    ///
    /// Latitude must lie in [-90, 90] and longitude in [-180, 180];
    /// non-finite values are rejected.
    pub fn new(lat: f64, lng: f64) -> Result<Self, TransitError> {
        if !lat.is_finite() || !lng.is_finite() {
            return Err(TransitError::InvalidCoordinates(
                "latitude and longitude must be finite".into(),
            ));
        }
        if !(-90.0..=90.0).contains(&lat) {
            return Err(TransitError::InvalidCoordinates(format!(
                "latitude {lat} out of range [-90, 90]"
            )));
        }
        if !(-180.0..=180.0).contains(&lng) {
            return Err(TransitError::InvalidCoordinates(format!(
                "longitude {lng} out of range [-180, 180]"
            )));
        }
        Ok(Self { lat, lng })
    }

    pub fn lat(&self) -> f64 {
        self.lat
    }

    pub fn lng(&self) -> f64 {
        self.lng
    }

    /// Great-circle (haversine) distance to another point, in meters.
    pub fn distance_meters(&self, other: &Coordinates) -> f64 {
        let lat_arc = (self.lat - other.lat) * DEG_TO_RAD;
        let lng_arc = (self.lng - other.lng) * DEG_TO_RAD;
        let lat_h = (lat_arc * 0.5).sin().powi(2);
        let lng_h = (lng_arc * 0.5).sin().powi(2);
        let cos_product = (self.lat * DEG_TO_RAD).cos() * (other.lat * DEG_TO_RAD).cos();
        EARTH_RADIUS_METERS * 2.0 * (lat_h + cos_product * lng_h).sqrt().asin()
    }
}
