use serde::{Deserialize, Serialize};

/// `[longitude, latitude]` in degrees.
pub type Coordinates = [f64; 2];

/// Zoom of the whole-country view. Every focus zoom is strictly above it.
pub const MIN_ZOOM: f64 = 1.0;

/// Geographic centre of Brazil used by the neutral camera.
pub const BRAZIL_CENTER: Coordinates = [-54.0, -15.0];

/// Whole-country camera position shown between campaigns.
pub const NEUTRAL_POSITION: CameraPosition = CameraPosition {
    coordinates: BRAZIL_CENTER,
    zoom: MIN_ZOOM,
};

const POSITION_EPSILON: f64 = 1e-9;

/// Logical camera target: where to look and how close.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraPosition {
    pub coordinates: Coordinates,
    pub zoom: f64,
}

impl CameraPosition {
    pub const fn new(coordinates: Coordinates, zoom: f64) -> Self {
        Self { coordinates, zoom }
    }

    pub fn is_neutral(&self) -> bool {
        self.zoom <= MIN_ZOOM + POSITION_EPSILON
    }

    /// Equality with a small tolerance so re-derived targets compare equal.
    pub fn same_as(&self, other: &CameraPosition) -> bool {
        (self.coordinates[0] - other.coordinates[0]).abs() < POSITION_EPSILON
            && (self.coordinates[1] - other.coordinates[1]).abs() < POSITION_EPSILON
            && (self.zoom - other.zoom).abs() < POSITION_EPSILON
    }
}

impl Default for CameraPosition {
    fn default() -> Self {
        NEUTRAL_POSITION
    }
}

#[cfg(test)]
mod tests {
    use super::{CameraPosition, MIN_ZOOM, NEUTRAL_POSITION};

    #[test]
    fn neutral_position_is_neutral() {
        assert!(NEUTRAL_POSITION.is_neutral());
        assert!(!CameraPosition::new([-46.6, -23.5], 6.0).is_neutral());
    }

    #[test]
    fn same_as_tolerates_float_noise() {
        let a = CameraPosition::new([-43.2, -22.9], 7.5);
        let b = CameraPosition::new([-43.2 + 1e-12, -22.9], 7.5);
        assert!(a.same_as(&b));
        assert!(!a.same_as(&CameraPosition::new([-43.2, -22.9], MIN_ZOOM)));
    }
}
