//! Camera fit animation
//!
//! After an import or a reparent the host asks the camera to frame the visible
//! geometry. The move is interpolated over a fixed duration, one step per frame
//! callback. There is a single animation slot: starting a new fit replaces the
//! running one, so frames of the superseded animation are never applied.

use glam::Vec3;

use super::bounds::Aabb;

/// Vertical field of view used to compute the framing distance
const FIT_FOV: f32 = 45.0_f32 * std::f32::consts::PI / 180.0;
/// Extra room around the framed box
const FIT_PADDING: f32 = 1.2;
const MIN_DISTANCE: f32 = 0.5;

/// Camera target and distance (orbit camera parameters)
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CameraPose {
    pub target: Vec3,
    pub distance: f32,
}

impl Default for CameraPose {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            distance: 6.0,
        }
    }
}

impl CameraPose {
    /// Pose framing the given box
    pub fn framing(bounds: &Aabb) -> Self {
        let radius = bounds.radius().max(f32::EPSILON);
        let distance = (radius / (FIT_FOV * 0.5).sin() * FIT_PADDING).max(MIN_DISTANCE);
        Self {
            target: bounds.center(),
            distance,
        }
    }

    fn lerp(&self, other: &CameraPose, t: f32) -> CameraPose {
        CameraPose {
            target: self.target.lerp(other.target, t),
            distance: self.distance + (other.distance - self.distance) * t,
        }
    }
}

struct FitAnimation {
    from: CameraPose,
    to: CameraPose,
    started_at: f64,
}

/// Animated camera framing driven by the host's per-frame callback
pub struct CameraFit {
    pose: CameraPose,
    animation: Option<FitAnimation>,
    /// Animation length in seconds
    duration: f64,
}

impl CameraFit {
    pub fn new(duration_ms: u64) -> Self {
        Self {
            pose: CameraPose::default(),
            animation: None,
            duration: duration_ms as f64 / 1000.0,
        }
    }

    /// Current camera pose (as of the last tick)
    pub fn pose(&self) -> CameraPose {
        self.pose
    }

    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Start framing `bounds` at time `now` (seconds). Replaces any running fit.
    pub fn start(&mut self, bounds: &Aabb, now: f64) {
        let to = CameraPose::framing(bounds);
        tracing::debug!("Camera fit to {:?} (distance {:.2})", to.target, to.distance);
        self.animation = Some(FitAnimation {
            from: self.pose,
            to,
            started_at: now,
        });
    }

    /// Advance the animation to `now` and return the pose for this frame
    pub fn tick(&mut self, now: f64) -> CameraPose {
        if let Some(anim) = &self.animation {
            let t = if self.duration <= 0.0 {
                1.0
            } else {
                ((now - anim.started_at) / self.duration).clamp(0.0, 1.0)
            };
            if t >= 1.0 {
                self.pose = anim.to;
                self.animation = None;
            } else {
                self.pose = anim.from.lerp(&anim.to, ease_out_cubic(t as f32));
            }
        }
        self.pose
    }
}

fn ease_out_cubic(t: f32) -> f32 {
    1.0 - (1.0 - t).powi(3)
}
