//! MotionController: owns the character transform and baseline, arbitrates
//! between jump and walk, and is driven once per rendered frame.
//!
//! Methods:
//! - new, attach / attach_at (baseline capture), set_clips
//! - trigger_jump, trigger_walk, observe_triggers (token-driven hosts)
//! - on_frame (advance the active motion, drain queued outputs)

use glam::Vec3;
use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::clip::ClipLibrary;
use crate::config::MotionConfig;
use crate::ids::{TriggerLatch, TriggerToken};
use crate::jump::JumpMotion;
use crate::outputs::{DropReason, MotionEvent, MotionFrame, MotionKind};
use crate::pose::{Baseline, Transform};
use crate::walk::{WalkMotion, WalkPhase};

/// Which triggers an `observe_triggers` call accepted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerOutcome {
    pub jump: bool,
    pub walk: bool,
}

#[derive(Debug)]
pub struct MotionController {
    cfg: MotionConfig,
    clips: ClipLibrary,
    jump: JumpMotion,
    walk: WalkMotion,

    transform: Transform,
    baseline: Option<Baseline>,

    jump_latch: TriggerLatch,
    walk_latch: TriggerLatch,

    // Clip commands and events queued by triggers between frames.
    pending: MotionFrame,
}

impl MotionController {
    pub fn new(cfg: MotionConfig) -> Self {
        Self {
            jump: JumpMotion::new(cfg.jump()),
            walk: WalkMotion::new(cfg.walk()),
            transform: Transform {
                translation: cfg.initial_position,
                scale: cfg.scale,
                ..Transform::default()
            },
            cfg,
            clips: ClipLibrary::default(),
            baseline: None,
            jump_latch: TriggerLatch::new(),
            walk_latch: TriggerLatch::new(),
            pending: MotionFrame::default(),
        }
    }

    pub fn config(&self) -> &MotionConfig {
        &self.cfg
    }

    /// Place the character at its configured initial position, face
    /// `viewpoint`, and capture the baseline. Only the first call has effect.
    pub fn attach(&mut self, viewpoint: Vec3) -> bool {
        self.attach_at(self.cfg.initial_position, viewpoint)
    }

    /// Like `attach`, with an explicit initial position.
    pub fn attach_at(&mut self, position: Vec3, viewpoint: Vec3) -> bool {
        if self.baseline.is_some() {
            debug!("attach: baseline already captured; ignoring");
            return false;
        }
        let baseline = Baseline::capture(position, viewpoint, self.cfg.pitch_offset_deg);
        self.transform = Transform {
            translation: position,
            rotation: baseline.orientation,
            scale: self.cfg.scale,
        };
        self.baseline = Some(baseline);
        info!("attach: baseline y={} captured", baseline.position_y);
        true
    }

    #[inline]
    pub fn is_attached(&self) -> bool {
        self.baseline.is_some()
    }

    pub fn baseline(&self) -> Option<&Baseline> {
        self.baseline.as_ref()
    }

    /// Report the clip identifiers the host's mixer holds.
    pub fn set_clips<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.clips.set_available(names);
    }

    pub fn clips(&self) -> &ClipLibrary {
        &self.clips
    }

    #[inline]
    pub fn transform(&self) -> &Transform {
        &self.transform
    }

    #[inline]
    pub fn jump_active(&self) -> bool {
        self.jump.is_active()
    }

    #[inline]
    pub fn walk_phase(&self) -> WalkPhase {
        self.walk.phase()
    }

    #[inline]
    pub fn walk_target(&self) -> Option<f32> {
        self.walk.session().map(|s| s.target_x)
    }

    /// True when neither motion is running.
    #[inline]
    pub fn is_idle(&self) -> bool {
        !self.jump.is_active() && !self.walk.is_active()
    }

    /// Request a jump at `now` (seconds). Dropped while any motion runs.
    pub fn trigger_jump(&mut self, now: f64) -> bool {
        if let Some(reason) = self.blocked(MotionKind::Jump) {
            return self.drop_trigger(MotionKind::Jump, reason);
        }
        self.jump.trigger(now, &self.clips, &mut self.pending)
    }

    /// Request a walk at `now` (seconds). Dropped while any motion runs.
    pub fn trigger_walk(&mut self, now: f64) -> bool {
        let Some(baseline) = self.baseline else {
            return self.drop_trigger(MotionKind::Walk, DropReason::NotAttached);
        };
        if let Some(reason) = self.blocked(MotionKind::Walk) {
            return self.drop_trigger(MotionKind::Walk, reason);
        }
        self.walk
            .trigger(now, &self.transform, &baseline, &mut self.pending)
    }

    /// Token-driven triggering: a motion is requested when its token differs
    /// from the last one seen. Jump is considered before walk.
    pub fn observe_triggers(
        &mut self,
        now: f64,
        jump: Option<TriggerToken>,
        walk: Option<TriggerToken>,
    ) -> TriggerOutcome {
        let mut outcome = TriggerOutcome::default();
        if self.jump_latch.observe(jump) {
            outcome.jump = self.trigger_jump(now);
        }
        if self.walk_latch.observe(walk) {
            outcome.walk = self.trigger_walk(now);
        }
        outcome
    }

    fn blocked(&self, kind: MotionKind) -> Option<DropReason> {
        if self.baseline.is_none() {
            return Some(DropReason::NotAttached);
        }
        let (same, other, other_kind) = match kind {
            MotionKind::Jump => (self.jump.is_active(), self.walk.is_active(), MotionKind::Walk),
            MotionKind::Walk => (self.walk.is_active(), self.jump.is_active(), MotionKind::Jump),
        };
        if same {
            Some(DropReason::AlreadyActive)
        } else if other {
            Some(DropReason::OtherActive(other_kind))
        } else {
            None
        }
    }

    fn drop_trigger(&mut self, kind: MotionKind, reason: DropReason) -> bool {
        debug!("{kind:?} trigger dropped: {reason:?}");
        self.pending
            .push_event(MotionEvent::TriggerDropped { kind, reason });
        false
    }

    /// Advance whichever motion is running by one frame. `now` is the frame
    /// clock in seconds, `dt` the time since the previous frame. The returned
    /// frame also carries everything queued by triggers since the last call.
    pub fn on_frame(&mut self, now: f64, dt: f32) -> MotionFrame {
        let mut frame = std::mem::take(&mut self.pending);

        if let Some(baseline) = self.baseline {
            if self.jump.is_active() {
                if let Some(y) = self.jump.update(now, baseline.position_y, &mut frame) {
                    self.transform.translation.y = y;
                }
            } else if self.walk.is_active() {
                self.walk.update(
                    now,
                    dt,
                    &mut self.transform,
                    &baseline,
                    &self.clips,
                    &mut frame,
                );
            }
        }

        frame.transform = self.transform;
        frame
    }
}

impl Default for MotionController {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attached() -> MotionController {
        let mut c = MotionController::default();
        assert!(c.attach(Vec3::new(0.0, -6.77, 20.0)));
        c
    }

    #[test]
    fn new_places_character_at_initial_position() {
        let c = MotionController::default();
        assert_eq!(c.transform().translation, Vec3::new(0.0, -6.0, 0.0));
        assert!(!c.is_attached());
    }

    #[test]
    fn baseline_is_captured_once() {
        let mut c = attached();
        let first = *c.baseline().unwrap();
        assert!(!c.attach_at(Vec3::new(1.0, 2.0, 3.0), Vec3::ZERO));
        assert_eq!(*c.baseline().unwrap(), first);
        assert_eq!(c.transform().rotation, first.orientation);
    }

    #[test]
    fn triggers_before_attach_are_dropped() {
        let mut c = MotionController::default();
        assert!(!c.trigger_jump(0.0));
        assert!(!c.trigger_walk(0.0));
        let frame = c.on_frame(0.0, 0.016);
        assert_eq!(
            frame.events,
            vec![
                MotionEvent::TriggerDropped {
                    kind: MotionKind::Jump,
                    reason: DropReason::NotAttached
                },
                MotionEvent::TriggerDropped {
                    kind: MotionKind::Walk,
                    reason: DropReason::NotAttached
                },
            ]
        );
    }

    #[test]
    fn idle_frames_leave_transform_untouched() {
        let mut c = attached();
        let before = *c.transform();
        for i in 0..10 {
            let f = c.on_frame(i as f64 / 60.0, 1.0 / 60.0);
            assert!(f.is_quiet());
            assert_eq!(f.transform, before);
        }
    }

    #[test]
    fn pending_outputs_drain_once() {
        let mut c = attached();
        c.set_clips(["Jump"]);
        assert!(c.trigger_jump(0.0));
        let first = c.on_frame(0.01, 0.01);
        assert_eq!(first.clips.len(), 1);
        assert!(first.events.contains(&MotionEvent::JumpStarted));
        let second = c.on_frame(0.02, 0.01);
        assert!(second.clips.is_empty());
    }

    #[test]
    fn walk_blocked_reason_names_jump() {
        let mut c = attached();
        c.trigger_jump(0.0);
        assert!(!c.trigger_walk(0.05));
        let frame = c.on_frame(0.06, 0.01);
        assert!(frame.events.contains(&MotionEvent::TriggerDropped {
            kind: MotionKind::Walk,
            reason: DropReason::OtherActive(MotionKind::Jump),
        }));
    }
}
