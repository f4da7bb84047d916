//! Output contracts from the controller.
//!
//! Each frame returns the character transform, the clip commands queued since
//! the previous frame (trigger-time commands included), and a list of semantic
//! events. Adapters apply clip commands to the host and forward events.

use serde::{Deserialize, Serialize};

use crate::clip::{ClipCommand, ClipSink};
use crate::pose::Transform;
use crate::walk::WalkPhase;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MotionKind {
    Jump,
    Walk,
}

impl MotionKind {
    /// Substring used to find this motion's clip.
    pub fn clip_hint(self) -> &'static str {
        match self {
            MotionKind::Jump => "jump",
            MotionKind::Walk => "walk",
        }
    }
}

/// Why a trigger was dropped.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DropReason {
    /// The character transform is not available yet.
    NotAttached,
    /// The same motion is already running.
    AlreadyActive,
    /// The other motion is running.
    OtherActive(MotionKind),
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
#[non_exhaustive]
pub enum MotionEvent {
    JumpStarted,
    JumpLanded,
    WalkStarted { target_x: f32 },
    WalkPhaseChanged { from: WalkPhase, to: WalkPhase },
    WalkArrived { x: f32 },
    WalkFinished,
    TriggerDropped { kind: MotionKind, reason: DropReason },
}

/// Everything the host needs after one `on_frame` call.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct MotionFrame {
    #[serde(default)]
    pub transform: Transform,
    #[serde(default)]
    pub clips: Vec<ClipCommand>,
    #[serde(default)]
    pub events: Vec<MotionEvent>,
}

impl MotionFrame {
    #[inline]
    pub fn push_clip(&mut self, cmd: ClipCommand) {
        self.clips.push(cmd);
    }

    #[inline]
    pub fn push_event(&mut self, event: MotionEvent) {
        self.events.push(event);
    }

    #[inline]
    pub fn is_quiet(&self) -> bool {
        self.clips.is_empty() && self.events.is_empty()
    }

    /// Forward every queued clip command to the host mixer, in order.
    pub fn apply_clips(&self, sink: &mut dyn ClipSink) {
        for cmd in &self.clips {
            cmd.apply(sink);
        }
    }

    /// Phases entered this frame, in order.
    pub fn phases(&self) -> impl Iterator<Item = WalkPhase> + '_ {
        self.events.iter().filter_map(|e| match e {
            MotionEvent::WalkPhaseChanged { to, .. } => Some(*to),
            _ => None,
        })
    }
}
