//! Camera interpolation in pixel space.
//!
//! The base geometry is projected exactly once. Pan and zoom are expressed as
//! a single `translate + scale` transform over that fixed drawing, so each
//! animation frame only rewrites one transform instead of re-projecting every
//! polygon vertex.

use thiserror::Error;

use crate::easing::{Easing, ZOOM_IN_CURVE, ZOOM_OUT_CURVE, lerp};
use crate::geo::{CameraPosition, Coordinates};
use crate::projection::{MapFrame, Mercator};

pub const ZOOM_OUT_DURATION_MS: f64 = 1_500.0;
pub const ZOOM_IN_DURATION_MS: f64 = 4_000.0;

const TRANSFORM_EPSILON: f64 = 1e-6;

/// `translate(x, y) scale(k)` applied to the frame, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    pub x: f64,
    pub y: f64,
    pub k: f64,
}

impl ViewTransform {
    pub const IDENTITY: ViewTransform = ViewTransform {
        x: 0.0,
        y: 0.0,
        k: 1.0,
    };

    pub fn apply(&self, point: [f64; 2]) -> [f64; 2] {
        [point[0] * self.k + self.x, point[1] * self.k + self.y]
    }

    pub fn interpolate(&self, to: &ViewTransform, t: f64) -> ViewTransform {
        ViewTransform {
            x: lerp(self.x, to.x, t),
            y: lerp(self.y, to.y, t),
            k: lerp(self.k, to.k, t),
        }
    }

    pub fn approx_eq(&self, other: &ViewTransform) -> bool {
        (self.x - other.x).abs() < TRANSFORM_EPSILON
            && (self.y - other.y).abs() < TRANSFORM_EPSILON
            && (self.k - other.k).abs() < TRANSFORM_EPSILON
    }

    /// CSS `transform` value; pair with `transform-origin: 0 0`.
    pub fn css(&self) -> String {
        format!(
            "translate({:.3}px, {:.3}px) scale({:.5})",
            self.x, self.y, self.k
        )
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Duration and curve of one camera move, chosen by direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MotionProfile {
    ZoomOut,
    ZoomIn,
}

impl MotionProfile {
    pub fn for_target(target: &CameraPosition) -> Self {
        if target.is_neutral() {
            Self::ZoomOut
        } else {
            Self::ZoomIn
        }
    }

    pub const fn duration_ms(self) -> f64 {
        match self {
            Self::ZoomOut => ZOOM_OUT_DURATION_MS,
            Self::ZoomIn => ZOOM_IN_DURATION_MS,
        }
    }

    pub const fn easing(self) -> Easing {
        match self {
            Self::ZoomOut => Easing::Bezier(ZOOM_OUT_CURVE),
            Self::ZoomIn => Easing::Bezier(ZOOM_IN_CURVE),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum CameraError {
    #[error("coordinates {coordinates:?} are outside the projection domain")]
    OutOfDomain { coordinates: Coordinates },
    #[error("zoom {zoom} must be a positive finite number")]
    InvalidZoom { zoom: f64 },
}

/// Outcome of handing the interpolator a target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CameraCommand {
    /// Same target as the committed one; nothing restarted.
    Unchanged,
    /// Already displayed at the destination; committed without animating.
    Settled,
    Animating {
        profile: MotionProfile,
        duration_ms: f64,
    },
}

#[derive(Debug, Clone, Copy)]
struct TransformAnimation {
    from: ViewTransform,
    to: ViewTransform,
    start_ms: f64,
    profile: MotionProfile,
}

impl TransformAnimation {
    fn progress(&self, now_ms: f64) -> f64 {
        ((now_ms - self.start_ms) / self.profile.duration_ms()).clamp(0.0, 1.0)
    }

    fn value_at(&self, now_ms: f64) -> ViewTransform {
        let t = self.profile.easing().apply(self.progress(now_ms));
        self.from.interpolate(&self.to, t)
    }
}

/// Owns the displayed transform and its in-flight animation. Callers only
/// ever hand it targets; last target wins.
#[derive(Debug, Clone)]
pub struct CameraInterpolator {
    frame: MapFrame,
    projection: Mercator,
    committed: Option<CameraPosition>,
    current: ViewTransform,
    animation: Option<TransformAnimation>,
}

impl CameraInterpolator {
    pub fn new(frame: MapFrame, projection: Mercator) -> Self {
        Self {
            frame,
            projection,
            committed: None,
            current: ViewTransform::IDENTITY,
            animation: None,
        }
    }

    pub fn brazil(frame: MapFrame) -> Self {
        Self::new(frame, Mercator::brazil(frame))
    }

    pub const fn projection(&self) -> &Mercator {
        &self.projection
    }

    pub const fn frame(&self) -> MapFrame {
        self.frame
    }

    pub const fn committed(&self) -> Option<CameraPosition> {
        self.committed
    }

    /// Transform that puts `target` at the frame centre, scaled by its zoom.
    pub fn destination(&self, target: &CameraPosition) -> Result<ViewTransform, CameraError> {
        if !target.zoom.is_finite() || target.zoom <= 0.0 {
            return Err(CameraError::InvalidZoom { zoom: target.zoom });
        }
        let point =
            self.projection
                .project(target.coordinates)
                .ok_or(CameraError::OutOfDomain {
                    coordinates: target.coordinates,
                })?;
        let [cx, cy] = self.frame.center();
        Ok(ViewTransform {
            x: cx - point[0] * target.zoom,
            y: cy - point[1] * target.zoom,
            k: target.zoom,
        })
    }

    /// Commit a new target. On error the displayed transform and any
    /// in-flight animation are left untouched.
    pub fn set_target(
        &mut self,
        target: CameraPosition,
        now_ms: f64,
    ) -> Result<CameraCommand, CameraError> {
        let destination = self.destination(&target)?;

        if self
            .committed
            .is_some_and(|committed| committed.same_as(&target))
        {
            return Ok(CameraCommand::Unchanged);
        }

        let from = self.sample(now_ms);
        self.committed = Some(target);

        if from.approx_eq(&destination) {
            self.current = destination;
            self.animation = None;
            return Ok(CameraCommand::Settled);
        }

        let profile = MotionProfile::for_target(&target);
        self.animation = Some(TransformAnimation {
            from,
            to: destination,
            start_ms: now_ms,
            profile,
        });
        Ok(CameraCommand::Animating {
            profile,
            duration_ms: profile.duration_ms(),
        })
    }

    /// Advance to `now_ms` and return the transform to paint.
    pub fn sample(&mut self, now_ms: f64) -> ViewTransform {
        if let Some(animation) = self.animation {
            if animation.progress(now_ms) >= 1.0 {
                self.current = animation.to;
                self.animation = None;
            } else {
                self.current = animation.value_at(now_ms);
            }
        }
        self.current
    }

    pub fn current(&self) -> ViewTransform {
        self.current
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
