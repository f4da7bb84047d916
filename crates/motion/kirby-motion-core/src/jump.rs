//! Vertical jump: a single half-sine arc over a fixed duration.

use std::f32::consts::PI;

use log::debug;

use crate::clip::{ClipLibrary, PlayOptions};
use crate::config::JumpConfig;
use crate::outputs::{MotionEvent, MotionFrame, MotionKind};

const JUMP_FADE_IN: f32 = 0.1;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct JumpSession {
    pub start_time: f64,
}

#[derive(Clone, Debug)]
pub struct JumpMotion {
    cfg: JumpConfig,
    session: Option<JumpSession>,
}

impl JumpMotion {
    pub fn new(cfg: JumpConfig) -> Self {
        Self { cfg, session: None }
    }

    pub fn config(&self) -> &JumpConfig {
        &self.cfg
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&JumpSession> {
        self.session.as_ref()
    }

    /// Start an arc at `now`. Returns false (and changes nothing) if a jump is
    /// already running. Exclusion against walking is the controller's job.
    pub fn trigger(&mut self, now: f64, clips: &ClipLibrary, out: &mut MotionFrame) -> bool {
        if self.session.is_some() {
            return false;
        }
        self.session = Some(JumpSession { start_time: now });
        debug!("jump: start at t={now:.3}");

        let clip = clips.resolve_for(MotionKind::Jump);
        clips.play(clip.as_ref(), PlayOptions::once(JUMP_FADE_IN), out);
        out.push_event(MotionEvent::JumpStarted);
        true
    }

    /// Root height at `now` for a baseline at `base_y`. Returns `None` when no
    /// jump is running. On the landing frame the height is exactly `base_y`
    /// and the session ends.
    pub fn update(&mut self, now: f64, base_y: f32, out: &mut MotionFrame) -> Option<f32> {
        let session = self.session?;
        let progress = arc_progress(now - session.start_time, self.cfg.duration);

        if progress >= 1.0 {
            self.session = None;
            debug!("jump: landed");
            out.push_event(MotionEvent::JumpLanded);
            return Some(base_y);
        }

        Some(base_y + self.cfg.height * (PI * progress).sin())
    }
}

/// Normalized arc time in `[0, 1]`. A zero duration lands immediately.
fn arc_progress(elapsed: f64, duration: f32) -> f32 {
    if duration <= 0.0 {
        return 1.0;
    }
    ((elapsed / duration as f64) as f32).clamp(0.0, 1.0)
}
