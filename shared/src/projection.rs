use std::f64::consts::{FRAC_PI_4, PI};

use crate::geo::{BRAZIL_CENTER, Coordinates};

/// Mercator is undefined at the poles; clamp the domain like web maps do.
pub const MAX_LATITUDE: f64 = 85.051_128_78;
pub const MAX_LONGITUDE: f64 = 180.0;

/// Scale (pixels per radian) that fits Brazil into an 800px-wide frame.
const BRAZIL_SCALE_PER_PX: f64 = 1.0;

/// Fixed pixel space the base geometry is drawn in. The browser scales the
/// whole frame to the screen, so this never changes at runtime.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapFrame {
    pub width: f64,
    pub height: f64,
}

impl MapFrame {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> [f64; 2] {
        [self.width / 2.0, self.height / 2.0]
    }
}

impl Default for MapFrame {
    fn default() -> Self {
        Self::new(800.0, 800.0)
    }
}

/// Spherical Mercator with d3-style `scale`/`center`/`translate`:
/// `center` projects exactly onto `translate`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mercator {
    scale: f64,
    translate: [f64; 2],
    origin: [f64; 2],
}

impl Mercator {
    pub fn new(scale: f64, center: Coordinates, translate: [f64; 2]) -> Self {
        let origin = raw_project(center).unwrap_or([0.0, 0.0]);
        Self {
            scale,
            translate,
            origin,
        }
    }

    /// The one projection shared by the base geometry and the camera.
    pub fn brazil(frame: MapFrame) -> Self {
        Self::new(
            frame.width * BRAZIL_SCALE_PER_PX,
            BRAZIL_CENTER,
            frame.center(),
        )
    }

    pub const fn scale(&self) -> f64 {
        self.scale
    }

    pub const fn translate(&self) -> [f64; 2] {
        self.translate
    }

    /// Project `[lon, lat]` into frame pixels. `None` outside the domain.
    pub fn project(&self, coordinates: Coordinates) -> Option<[f64; 2]> {
        let [x, y] = raw_project(coordinates)?;
        Some([
            self.translate[0] + (x - self.origin[0]) * self.scale,
            self.translate[1] - (y - self.origin[1]) * self.scale,
        ])
    }

    pub fn invert(&self, point: [f64; 2]) -> Option<Coordinates> {
        if !point[0].is_finite() || !point[1].is_finite() || self.scale == 0.0 {
            return None;
        }
        let x = (point[0] - self.translate[0]) / self.scale + self.origin[0];
        let y = (self.translate[1] - point[1]) / self.scale + self.origin[1];
        let lon = x.to_degrees();
        let lat = (2.0 * y.exp().atan() - PI / 2.0).to_degrees();
        in_domain([lon, lat]).then_some([lon, lat])
    }
}

pub fn in_domain(coordinates: Coordinates) -> bool {
    let [lon, lat] = coordinates;
    lon.is_finite()
        && lat.is_finite()
        && lon.abs() <= MAX_LONGITUDE
        && lat.abs() <= MAX_LATITUDE
}

fn raw_project(coordinates: Coordinates) -> Option<[f64; 2]> {
    if !in_domain(coordinates) {
        return None;
    }
    let lambda = coordinates[0].to_radians();
    let phi = coordinates[1].to_radians();
    let y = (FRAC_PI_4 + phi / 2.0).tan().ln();
    y.is_finite().then_some([lambda, y])
}

#[cfg(test)]
mod tests {
    use super::{MapFrame, Mercator, in_domain};
    use crate::geo::BRAZIL_CENTER;

    fn assert_close(actual: f64, expected: f64, eps: f64) {
        let diff = (actual - expected).abs();
        assert!(
            diff < eps,
            "expected {expected}, got {actual} (diff: {diff})"
        );
    }

    #[test]
    fn center_projects_to_translate() {
        let frame = MapFrame::default();
        let projection = Mercator::brazil(frame);
        let p = projection.project(BRAZIL_CENTER).expect("centre is in domain");
        assert_close(p[0], 400.0, 1e-9);
        assert_close(p[1], 400.0, 1e-9);
    }

    #[test]
    fn north_is_up_and_east_is_right() {
        let projection = Mercator::brazil(MapFrame::default());
        let manaus = projection.project([-60.0, -3.1]).expect("manaus");
        let porto_alegre = projection.project([-51.2, -30.0]).expect("porto alegre");
        assert!(manaus[1] < porto_alegre[1]);
        assert!(manaus[0] < porto_alegre[0]);
    }

    #[test]
    fn invert_recovers_coordinates() {
        let projection = Mercator::brazil(MapFrame::default());
        let recife = [-34.88, -8.05];
        let p = projection.project(recife).expect("recife");
        let back = projection.invert(p).expect("invertible");
        assert_close(back[0], recife[0], 1e-9);
        assert_close(back[1], recife[1], 1e-9);
    }

    #[test]
    fn rejects_out_of_domain_coordinates() {
        let projection = Mercator::brazil(MapFrame::default());
        assert!(projection.project([0.0, 89.9]).is_none());
        assert!(projection.project([-200.0, 0.0]).is_none());
        assert!(projection.project([f64::NAN, 0.0]).is_none());
        assert!(!in_domain([0.0, f64::INFINITY]));
    }
}
