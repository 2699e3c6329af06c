use serde::Serialize;
use thiserror::Error;
use tracing::warn;

use crate::domain::location::Location;

#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum LocationError {
    #[error("location permission denied")]
    PermissionDenied,
    #[error("timed out waiting for a position")]
    Timeout,
    #[error("geolocation is not supported")]
    Unsupported,
    #[error("coordinates out of range")]
    InvalidCoordinates,
}

/// Answers "where is the viewer right now".
pub trait Locator: Send + Sync {
    fn current_location(&self) -> Result<Location, LocationError>;
}

/// Always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocator(pub Location);

impl Locator for FixedLocator {
    fn current_location(&self) -> Result<Location, LocationError> {
        Ok(self.0)
    }
}

/// Always fails with the given error.
#[derive(Debug, Clone, Copy)]
pub struct FailingLocator(pub LocationError);

impl Locator for FailingLocator {
    fn current_location(&self) -> Result<Location, LocationError> {
        Err(self.0)
    }
}

/// Coordinates handed over by a client, possibly incomplete.
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientCoordinates {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

impl Locator for ClientCoordinates {
    fn current_location(&self) -> Result<Location, LocationError> {
        match (self.latitude, self.longitude) {
            (None, None) => Err(LocationError::Unsupported),
            (Some(latitude), Some(longitude)) => {
                let location = Location::new(latitude, longitude);
                if location.is_valid() {
                    Ok(location)
                } else {
                    Err(LocationError::InvalidCoordinates)
                }
            }
            _ => Err(LocationError::InvalidCoordinates),
        }
    }
}

/// User-facing explanation shown when the fallback location was used.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocationNotice {
    pub title: &'static str,
    pub description: &'static str,
}

impl From<LocationError> for LocationNotice {
    fn from(err: LocationError) -> Self {
        match err {
            LocationError::PermissionDenied => Self {
                title: "Location Access Denied",
                description: "Please enable location access in your browser settings to see nearby posts. Using a default location for now.",
            },
            LocationError::Unsupported => Self {
                title: "Geolocation Not Supported",
                description: "Your browser does not support geolocation. Using a default location.",
            },
            LocationError::Timeout | LocationError::InvalidCoordinates => Self {
                title: "Location Error",
                description: "Could not retrieve your current location. Using a default location.",
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedLocation {
    pub location: Location,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notice: Option<LocationNotice>,
}

/// Asks the locator and falls back to `fallback` with a notice on any failure.
pub fn resolve_location(locator: &dyn Locator, fallback: Location) -> ResolvedLocation {
    match locator.current_location() {
        Ok(location) => ResolvedLocation {
            location,
            notice: None,
        },
        Err(err) => {
            warn!(error = %err, "falling back to default location");
            ResolvedLocation {
                location: fallback,
                notice: Some(LocationNotice::from(err)),
            }
        }
    }
}
