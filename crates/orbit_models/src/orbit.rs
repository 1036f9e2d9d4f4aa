use bevy::math::EulerRot;
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

// =================================================================================================
//
//                                          Components
//
// =================================================================================================

/// Rotates a target transform from two per-frame axis inputs.
///
/// The controller resolves its [`OrbitOwner`] once when the component is added. On success the
/// resolved entity is cached as [`OrbitTarget`]; when nothing can be resolved the controller is
/// marked [`OrbitTerminated`] and never touches a transform.
///
/// Inputs are read from the sibling [`OrbitInput`] component, the accumulated angles live in
/// [`OrbitState`]. Both are inserted automatically.
#[derive(Component, Reflect, Debug, Clone, Default)]
#[reflect(Component)]
#[require(OrbitInput, OrbitState)]
pub struct OrbitController {
    pub owner: OrbitOwner,
    pub settings: OrbitSettings,
}

impl OrbitController {
    /// Controller that rotates the entity it is attached to.
    pub fn new(settings: OrbitSettings) -> Self {
        Self { owner: OrbitOwner::Owner, settings }
    }

    /// Controller that rotates another entity.
    pub fn targeting(target: Entity, settings: OrbitSettings) -> Self {
        Self { owner: OrbitOwner::Specified(target), settings }
    }
}

/// Which entity an [`OrbitController`] drives.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrbitOwner {
    /// The entity carrying the controller.
    #[default]
    Owner,
    /// Any other entity with a `Transform`.
    Specified(Entity),
}

/// The resolved transform handle, cached for the whole active period.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Eq)]
#[reflect(Component)]
pub struct OrbitTarget(pub Entity);

/// Marks a controller that finished. No input or apply stage runs for it anymore.
#[derive(Component, Reflect, Debug, Clone, Copy, Default)]
#[reflect(Component)]
pub struct OrbitTerminated;

/// A single input channel.
///
/// `Unbound` freezes the orientation axis paired with this channel: the apply stage keeps
/// whatever angle the transform currently has instead of driving it.
#[derive(Reflect, Debug, Clone, Copy, PartialEq, Default)]
pub enum OrbitAxis {
    Bound(f32),
    #[default]
    Unbound,
}

impl OrbitAxis {
    pub fn value(self) -> Option<f32> {
        match self {
            OrbitAxis::Bound(value) => Some(value),
            OrbitAxis::Unbound => None,
        }
    }

    pub fn is_bound(self) -> bool {
        matches!(self, OrbitAxis::Bound(_))
    }
}

/// Per-frame input slots, written by the host before [`OrbitState::accumulate`] runs.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct OrbitInput {
    pub x: OrbitAxis,
    pub y: OrbitAxis,
}

impl OrbitInput {
    pub fn bound(x: f32, y: f32) -> Self {
        Self { x: OrbitAxis::Bound(x), y: OrbitAxis::Bound(y) }
    }
}

/// Accumulated yaw / pitch in degrees. Reset to zero on every activation.
#[derive(Component, Reflect, Debug, Clone, Copy, PartialEq, Default)]
#[reflect(Component)]
pub struct OrbitState {
    pub yaw: f32,
    pub pitch: f32,
}

// =================================================================================================
//
//                                           Settings
//
// =================================================================================================

/// Tuning values of a controller. Loaded from `orbit.toml`, missing keys take the defaults.
///
/// Nothing is validated: a clamp range with `min > max` or a huge smoothing factor simply
/// produces whatever the formulas give.
#[derive(Reflect, Deserialize, Serialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct OrbitSettings {
    /// Degrees of pitch per unit of input X.
    pub sensitivity_x: f32,
    /// Degrees of yaw per unit of input Y.
    pub sensitivity_y: f32,

    pub clamp_yaw: bool,
    pub yaw_min: f32,
    pub yaw_max: f32,

    pub clamp_pitch: bool,
    pub pitch_min: f32,
    pub pitch_max: f32,

    /// Slerp towards the target instead of snapping to it.
    pub smoothing: bool,
    /// Multiplied with the frame delta to get the slerp parameter. Meant for `1.0..=15.0`.
    pub smoothing_factor: f32,

    /// Added to the yaw when composing the orientation, keeps the initial facing.
    pub yaw_offset: f32,
}

impl Default for OrbitSettings {
    fn default() -> Self {
        Self {
            sensitivity_x: 5.0,
            sensitivity_y: 5.0,
            clamp_yaw: true,
            yaw_min: -80.0,
            yaw_max: 80.0,
            clamp_pitch: false,
            pitch_min: -40.0,
            pitch_max: 40.0,
            smoothing: false,
            smoothing_factor: 1.0,
            yaw_offset: 0.0,
        }
    }
}

// =================================================================================================
//
//                                          Arithmetic
//
// =================================================================================================

impl OrbitState {
    /// Input stage. Adds the bound deltas to the accumulators and clamps them.
    ///
    /// Input X drives pitch, input Y drives yaw. Input Y is subtracted.
    pub fn accumulate(&mut self, settings: &OrbitSettings, input: &OrbitInput) {
        if let Some(x) = input.x.value() {
            self.pitch += x * settings.sensitivity_x;
        }
        if let Some(y) = input.y.value() {
            self.yaw -= y * settings.sensitivity_y;
        }

        if settings.clamp_yaw {
            self.yaw = clamp_angle(self.yaw, settings.yaw_min, settings.yaw_max);
        }
        if settings.clamp_pitch {
            self.pitch = clamp_angle(self.pitch, settings.pitch_min, settings.pitch_max);
        }
    }

    /// Returns the `(pitch, yaw)` pair the apply stage drives, in degrees.
    ///
    /// Each channel freezes the angle it drives: an unbound X keeps pitch and an unbound Y keeps
    /// yaw. A frozen angle is read back from `current`.
    pub fn effective_angles(&self, input: &OrbitInput, current: Quat) -> (f32, f32) {
        let (current_pitch, current_yaw) = euler_degrees(current);

        let pitch = match input.x {
            OrbitAxis::Bound(_) => self.pitch,
            OrbitAxis::Unbound => current_pitch,
        };
        let yaw = match input.y {
            OrbitAxis::Bound(_) => self.yaw,
            OrbitAxis::Unbound => current_yaw,
        };
        (pitch, yaw)
    }

    /// Apply stage. Computes the rotation the target should have after this frame.
    ///
    /// With smoothing the result is `current.slerp(target, delta_secs * smoothing_factor)`.
    /// The parameter is not clamped, values above one overshoot.
    pub fn orientation(
        &self,
        settings: &OrbitSettings,
        input: &OrbitInput,
        current: Quat,
        delta_secs: f32,
    ) -> Quat {
        let (pitch, yaw) = self.effective_angles(input, current);
        let target = compose_orientation(pitch, yaw, settings.yaw_offset);

        if settings.smoothing {
            current.slerp(target, delta_secs * settings.smoothing_factor)
        } else {
            target
        }
    }
}

/// Wraps `angle` by at most one turn, then clamps it into `[min, max]`.
///
/// Only a single period is removed per call: `-800` becomes `-440`, not `-80`.
pub fn clamp_angle(angle: f32, min: f32, max: f32) -> f32 {
    let mut angle = angle;
    if angle < -360.0 {
        angle += 360.0;
    }
    if angle > 360.0 {
        angle -= 360.0;
    }
    // Not `f32::clamp`, which panics when min > max.
    angle.max(min).min(max)
}

/// Builds a zero-roll rotation from pitch (about X) and yaw plus offset (about Y), in degrees.
pub fn compose_orientation(pitch: f32, yaw: f32, yaw_offset: f32) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        (yaw + yaw_offset).to_radians(),
        pitch.to_radians(),
        0.0,
    )
}

/// Reads `(pitch, yaw)` in degrees back out of a rotation.
pub fn euler_degrees(rotation: Quat) -> (f32, f32) {
    let (yaw, pitch, _roll) = rotation.to_euler(EulerRot::YXZ);
    (pitch.to_degrees(), yaw.to_degrees())
}
