//! Controller configuration.
//!
//! `MotionConfig` is the flat option set a host passes at construction. The
//! jump and walk motions each take an immutable view of it (`JumpConfig`,
//! `WalkConfig`) when they are created.

use glam::Vec3;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::error::MotionError;
use crate::Result;

/// Speed used when the configured walk speed is unusable.
pub const FALLBACK_WALK_SPEED: f32 = 2.5;

/// Construction-time options. Keys are camelCase on the wire.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MotionConfig {
    /// Peak height of the jump arc, in world units above the baseline.
    pub jump_height: f32,
    /// Seconds from take-off to landing.
    pub jump_duration: f32,

    /// Walk alternation endpoints. `None` (or equal values) selects the
    /// forward-nudge fallback.
    pub left_x: Option<f32>,
    pub right_x: Option<f32>,
    /// Translation speed in units per second.
    pub walk_speed: f32,
    /// Seconds to complete each facing turn.
    pub turn_duration: f32,
    /// Re-face the baseline orientation after arriving.
    pub return_to_front: bool,
    /// Signed displacement used when the endpoints are degenerate.
    pub forward_distance: f32,
    /// Grid quantum for horizontal positions; 0 disables snapping.
    pub step_size: f32,

    /// Where the character is placed when it is attached to the scene.
    pub initial_position: Vec3,
    /// Pitch applied about the local X axis after facing the viewpoint.
    pub pitch_offset_deg: f32,
    /// Uniform scale of the character root.
    pub scale: f32,
}

impl Default for MotionConfig {
    fn default() -> Self {
        Self {
            jump_height: 0.6,
            jump_duration: 0.5,
            left_x: Some(-5.0),
            right_x: Some(5.0),
            walk_speed: 20.0,
            turn_duration: 0.35,
            return_to_front: true,
            forward_distance: 0.01,
            step_size: 2.0,
            initial_position: Vec3::new(0.0, -6.0, 0.0),
            pitch_offset_deg: 15.0,
            scale: 1.0,
        }
    }
}

impl MotionConfig {
    /// Parse a JSON options object and validate it.
    pub fn from_json(s: &str) -> Result<Self> {
        let cfg: MotionConfig = serde_json::from_str(s)?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Strict range checks. Motions built from an unvalidated config still
    /// run; they sanitize instead (see `WalkConfig::from_motion`).
    pub fn validate(&self) -> Result<()> {
        non_negative("jumpDuration", self.jump_duration)?;
        non_negative("turnDuration", self.turn_duration)?;
        non_negative("stepSize", self.step_size)?;
        finite("jumpHeight", self.jump_height)?;
        finite("forwardDistance", self.forward_distance)?;
        finite("pitchOffsetDeg", self.pitch_offset_deg)?;
        if !(self.walk_speed.is_finite() && self.walk_speed > 0.0) {
            return Err(MotionError::invalid(
                "walkSpeed",
                self.walk_speed,
                "must be a positive number",
            ));
        }
        if !(self.scale.is_finite() && self.scale > 0.0) {
            return Err(MotionError::invalid(
                "scale",
                self.scale,
                "must be a positive number",
            ));
        }
        if !self.initial_position.is_finite() {
            return Err(MotionError::new("initialPosition must be finite"));
        }
        Ok(())
    }

    pub fn jump(&self) -> JumpConfig {
        JumpConfig::from_motion(self)
    }

    pub fn walk(&self) -> WalkConfig {
        WalkConfig::from_motion(self)
    }
}

fn finite(field: &str, v: f32) -> Result<()> {
    if v.is_finite() {
        Ok(())
    } else {
        Err(MotionError::invalid(field, v, "must be finite"))
    }
}

fn non_negative(field: &str, v: f32) -> Result<()> {
    finite(field, v)?;
    if v < 0.0 {
        return Err(MotionError::invalid(field, v, "must be >= 0"));
    }
    Ok(())
}

/// Clamp a duration to `[0, inf)`; NaN becomes 0 (instant).
fn sanitize_duration(field: &str, v: f32) -> f32 {
    if v >= 0.0 {
        v
    } else {
        warn!("{field} = {v} is not a usable duration; treating as instant");
        0.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpConfig {
    pub height: f32,
    pub duration: f32,
}

impl JumpConfig {
    pub fn from_motion(cfg: &MotionConfig) -> Self {
        let height = if cfg.jump_height.is_finite() {
            cfg.jump_height
        } else {
            warn!("jumpHeight = {} is not finite; using 0", cfg.jump_height);
            0.0
        };
        Self {
            height,
            duration: sanitize_duration("jumpDuration", cfg.jump_duration),
        }
    }
}

/// Immutable per-session walk parameters.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkConfig {
    pub left_x: Option<f32>,
    pub right_x: Option<f32>,
    pub forward_distance: f32,
    pub walk_speed: f32,
    pub turn_duration: f32,
    pub step_size: f32,
    pub return_to_front: bool,
}

impl WalkConfig {
    pub fn from_motion(cfg: &MotionConfig) -> Self {
        let walk_speed = if cfg.walk_speed.is_finite() && cfg.walk_speed > 0.0 {
            cfg.walk_speed
        } else {
            warn!(
                "walkSpeed = {} is not usable; falling back to {FALLBACK_WALK_SPEED}",
                cfg.walk_speed
            );
            FALLBACK_WALK_SPEED
        };
        let step_size = if cfg.step_size.is_finite() && cfg.step_size > 0.0 {
            cfg.step_size
        } else {
            0.0
        };
        let forward_distance = if cfg.forward_distance.is_finite() {
            cfg.forward_distance
        } else {
            0.0
        };
        Self {
            left_x: cfg.left_x,
            right_x: cfg.right_x,
            forward_distance,
            walk_speed,
            turn_duration: sanitize_duration("turnDuration", cfg.turn_duration),
            step_size,
            return_to_front: cfg.return_to_front,
        }
    }

    /// Both endpoints, when they are finite and distinct.
    pub fn endpoints(&self) -> Option<(f32, f32)> {
        match (self.left_x, self.right_x) {
            (Some(l), Some(r)) if l.is_finite() && r.is_finite() && l != r => Some((l, r)),
            _ => None,
        }
    }

    #[inline]
    pub fn snapping(&self) -> bool {
        self.step_size > 0.0
    }

    /// Arrival tolerance for the translation phase.
    #[inline]
    pub fn arrive_epsilon(&self) -> f32 {
        (self.step_size * 0.25).max(1e-4)
    }
}

impl Default for WalkConfig {
    fn default() -> Self {
        MotionConfig::default().walk()
    }
}
