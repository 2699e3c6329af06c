use serde::{Deserialize, Serialize};

/// Mean Earth radius used by the great-circle distance, in miles.
pub const EARTH_RADIUS_MILES: f64 = 3958.8;

/// Origin used when the viewer's position cannot be determined (Los Angeles).
pub const DEFAULT_LOCATION: Location = Location {
    latitude: 34.0522,
    longitude: -118.2437,
};

/// A WGS84 coordinate pair in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

impl Location {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Latitude in [-90, 90] and longitude in [-180, 180], both finite.
    pub fn is_valid(&self) -> bool {
        self.latitude.is_finite()
            && self.longitude.is_finite()
            && (-90.0..=90.0).contains(&self.latitude)
            && (-180.0..=180.0).contains(&self.longitude)
    }

    pub fn offset(&self, delta_latitude: f64, delta_longitude: f64) -> Self {
        Self::new(
            self.latitude + delta_latitude,
            self.longitude + delta_longitude,
        )
    }

    pub fn distance_to(&self, other: &Location) -> f64 {
        distance_miles(self, other)
    }
}

/// Great-circle distance between two points using the haversine formula, in miles.
pub fn distance_miles(a: &Location, b: &Location) -> f64 {
    let lat1 = a.latitude.to_radians();
    let lat2 = b.latitude.to_radians();
    let delta_lat = (b.latitude - a.latitude).to_radians();
    let delta_lon = (b.longitude - a.longitude).to_radians();

    let h = (delta_lat / 2.0).sin().powi(2)
        + lat1.cos() * lat2.cos() * (delta_lon / 2.0).sin().powi(2);
    // Rounding can push h a hair outside [0, 1] for near-antipodal points.
    let h = h.clamp(0.0, 1.0);
    let c = 2.0 * h.sqrt().atan2((1.0 - h).sqrt());

    EARTH_RADIUS_MILES * c
}
