//! Walk motion: turn to face a horizontal target, translate there, and
//! optionally turn back to the rest orientation.
//!
//! Phases run in order `TurningAway -> Moving -> [TurningBack] -> Done`; `Done`
//! discards the session and the motion reads as `Idle` again.

use std::f32::consts::FRAC_PI_2;

use glam::Quat;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

use crate::clip::{ClipLibrary, PlayOptions};
use crate::config::WalkConfig;
use crate::outputs::{MotionEvent, MotionFrame, MotionKind};
use crate::pose::{Baseline, Transform};

const WALK_FADE_IN: f32 = 0.1;
const WALK_FADE_OUT: f32 = 0.12;
/// Distance under which the current position counts as "at" an endpoint.
const ENDPOINT_TOLERANCE: f32 = 1e-3;
/// A snapped target this close to the start counts as no movement at all.
const COLLAPSE_EPSILON: f32 = 1e-9;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WalkPhase {
    Idle,
    TurningAway,
    Moving,
    TurningBack,
    Done,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WalkSession {
    pub phase: WalkPhase,
    pub target_x: f32,
    pub turn_start: f64,
    pub turn_from: Quat,
    pub turn_to: Quat,
    pub move_start_x: f32,
}

#[derive(Clone, Debug)]
pub struct WalkMotion {
    cfg: WalkConfig,
    session: Option<WalkSession>,
}

impl WalkMotion {
    pub fn new(cfg: WalkConfig) -> Self {
        Self { cfg, session: None }
    }

    pub fn config(&self) -> &WalkConfig {
        &self.cfg
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn phase(&self) -> WalkPhase {
        self.session.map_or(WalkPhase::Idle, |s| s.phase)
    }

    pub fn session(&self) -> Option<&WalkSession> {
        self.session.as_ref()
    }

    /// Start a walk session from the current pose. Returns false (and changes
    /// nothing) if a session is already running.
    pub fn trigger(
        &mut self,
        now: f64,
        pose: &Transform,
        baseline: &Baseline,
        out: &mut MotionFrame,
    ) -> bool {
        if self.session.is_some() {
            return false;
        }
        let current_x = pose.translation.x;
        let target_x = resolve_target(&self.cfg, current_x);
        let yaw = if target_x > current_x {
            FRAC_PI_2
        } else {
            -FRAC_PI_2
        };

        self.session = Some(WalkSession {
            phase: WalkPhase::TurningAway,
            target_x,
            turn_start: now,
            turn_from: pose.rotation,
            turn_to: (Quat::from_rotation_y(yaw) * baseline.orientation).normalize(),
            move_start_x: current_x,
        });
        debug!("walk: start x={current_x} -> target={target_x}");
        out.push_event(MotionEvent::WalkStarted { target_x });
        out.push_event(MotionEvent::WalkPhaseChanged {
            from: WalkPhase::Idle,
            to: WalkPhase::TurningAway,
        });
        true
    }

    /// Advance the running session by one frame, writing into `pose`.
    /// Returns false when there is no session.
    pub fn update(
        &mut self,
        now: f64,
        dt: f32,
        pose: &mut Transform,
        baseline: &Baseline,
        clips: &ClipLibrary,
        out: &mut MotionFrame,
    ) -> bool {
        let cfg = self.cfg;
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        match session.phase {
            WalkPhase::TurningAway => {
                if apply_turn(session, now, cfg.turn_duration, pose) {
                    let clip = clips.resolve_for(MotionKind::Walk);
                    clips.play(clip.as_ref(), PlayOptions::repeat(WALK_FADE_IN, 1.0), out);
                    session.move_start_x = pose.translation.x;
                    enter(session, WalkPhase::Moving, out);
                }
            }
            WalkPhase::Moving => {
                let target = session.target_x;
                let x = advance_x(&cfg, pose.translation.x, target, dt);
                trace!("walk: x {} -> {x}", pose.translation.x);
                pose.translation.x = x;

                if (target - x).abs() <= cfg.arrive_epsilon() {
                    pose.translation.x = target;
                    let clip = clips.resolve_for(MotionKind::Walk);
                    clips.stop(clip.as_ref(), WALK_FADE_OUT, out);
                    out.push_event(MotionEvent::WalkArrived { x: target });

                    if cfg.return_to_front {
                        session.turn_from = pose.rotation;
                        session.turn_to = baseline.orientation;
                        session.turn_start = now;
                        enter(session, WalkPhase::TurningBack, out);
                    } else {
                        enter(session, WalkPhase::Done, out);
                    }
                }
            }
            WalkPhase::TurningBack => {
                if apply_turn(session, now, cfg.turn_duration, pose) {
                    enter(session, WalkPhase::Done, out);
                }
            }
            WalkPhase::Idle | WalkPhase::Done => {}
        }

        if session.phase == WalkPhase::Done {
            self.session = None;
            debug!("walk: finished");
            out.push_event(MotionEvent::WalkFinished);
        }
        true
    }
}

fn enter(session: &mut WalkSession, to: WalkPhase, out: &mut MotionFrame) {
    debug!("walk: {:?} -> {:?}", session.phase, to);
    out.push_event(MotionEvent::WalkPhaseChanged {
        from: session.phase,
        to,
    });
    session.phase = to;
}

/// Slerp the orientation for the current turn. On completion the rotation is
/// set to the turn target exactly and true is returned.
fn apply_turn(session: &WalkSession, now: f64, duration: f32, pose: &mut Transform) -> bool {
    let p = turn_progress(now - session.turn_start, duration);
    if p >= 1.0 {
        pose.rotation = session.turn_to;
        return true;
    }
    pose.rotation = session.turn_from.slerp(session.turn_to, p);
    false
}

fn turn_progress(elapsed: f64, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((elapsed / duration as f64) as f32).clamp(0.0, 1.0)
}

/// Sign of `delta`, with zero treated as positive.
#[inline]
fn direction(delta: f32) -> f32 {
    if delta < 0.0 {
        -1.0
    } else {
        1.0
    }
}

/// Nearest multiple of `step`, rounding halves up.
#[inline]
pub fn quantize_to_step(v: f32, step: f32) -> f32 {
    (v / step + 0.5).floor() * step
}

#[inline]
fn ceil_to_step(v: f32, step: f32) -> f32 {
    (v / step).ceil() * step
}

#[inline]
fn floor_to_step(v: f32, step: f32) -> f32 {
    (v / step).floor() * step
}

/// Endpoint (or forward-nudge position) a walk from `current_x` heads for,
/// before grid snapping.
pub fn choose_endpoint(cfg: &WalkConfig, current_x: f32) -> f32 {
    match cfg.endpoints() {
        Some((left, right)) => {
            let dist_l = (current_x - left).abs();
            let dist_r = (current_x - right).abs();
            if dist_l < ENDPOINT_TOLERANCE {
                right
            } else if dist_r < ENDPOINT_TOLERANCE {
                left
            } else if dist_l < dist_r {
                right
            } else {
                left
            }
        }
        None => current_x + cfg.forward_distance,
    }
}

/// Final destination of a walk from `current_x`. With snapping on, the
/// destination is the grid point nearest the endpoint, or one step past
/// `current_x` when that grid point is `current_x` itself.
pub fn resolve_target(cfg: &WalkConfig, current_x: f32) -> f32 {
    let target = choose_endpoint(cfg, current_x);
    if !cfg.snapping() {
        return target;
    }
    let step = cfg.step_size;
    let snapped = quantize_to_step(target, step);
    if (snapped - current_x).abs() < COLLAPSE_EPSILON {
        current_x + direction(target - current_x) * step
    } else {
        snapped
    }
}

/// One frame of translation from `current` towards `target`. Never passes
/// `target`; with snapping on, always moves by at least one grid cell or to
/// the target, whichever is closer.
pub fn advance_x(cfg: &WalkConfig, current: f32, target: f32, dt: f32) -> f32 {
    let dir = direction(target - current);
    let remaining = (target - current).abs();
    let travel = (cfg.walk_speed * dt.max(0.0)).min(remaining);
    let next = current + dir * travel;
    if !cfg.snapping() {
        return next;
    }

    let step = cfg.step_size;
    let snapped = if dir > 0.0 {
        ceil_to_step(next, step).min(target)
    } else {
        floor_to_step(next, step).max(target)
    };
    if (snapped - current).abs() < cfg.arrive_epsilon() {
        let forced = current + dir * step;
        if dir > 0.0 {
            forced.min(target)
        } else {
            forced.max(target)
        }
    } else {
        snapped
    }
}
