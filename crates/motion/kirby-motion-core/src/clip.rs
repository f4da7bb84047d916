//! Clip resolution and playback commands.
//!
//! The controller never touches a skeletal mixer directly. It resolves a
//! semantic motion name against the clip identifiers the host reported and
//! emits `ClipCommand`s; the host applies them through a `ClipSink`.

use log::debug;
use serde::{Deserialize, Serialize};

use crate::outputs::{MotionFrame, MotionKind};

/// Identifier of one host-side clip, as reported by `ClipLibrary::set_available`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipHandle(pub String);

impl ClipHandle {
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClipHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClipLoop {
    Once,
    Repeat,
}

#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PlayOptions {
    pub looping: ClipLoop,
    pub fade_in: f32,
    pub time_scale: f32,
    /// Hold the last pose when a `Once` clip finishes.
    pub clamp_when_finished: bool,
}

impl PlayOptions {
    pub fn once(fade_in: f32) -> Self {
        Self {
            looping: ClipLoop::Once,
            fade_in,
            time_scale: 1.0,
            clamp_when_finished: true,
        }
    }

    pub fn repeat(fade_in: f32, time_scale: f32) -> Self {
        Self {
            looping: ClipLoop::Repeat,
            fade_in,
            time_scale,
            clamp_when_finished: false,
        }
    }
}

/// A request for the host's clip mixer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ClipCommand {
    /// Restart `clip` from its first frame and fade it in, cross-fading with
    /// whatever is already playing.
    Play { clip: ClipHandle, options: PlayOptions },
    /// Fade `clip` out over `fade_out` seconds.
    Stop { clip: ClipHandle, fade_out: f32 },
}

impl ClipCommand {
    pub fn clip(&self) -> &ClipHandle {
        match self {
            ClipCommand::Play { clip, .. } | ClipCommand::Stop { clip, .. } => clip,
        }
    }

    pub fn apply(&self, sink: &mut dyn ClipSink) {
        match self {
            ClipCommand::Play { clip, options } => sink.play(clip, options),
            ClipCommand::Stop { clip, fade_out } => sink.stop(clip, *fade_out),
        }
    }
}

/// Host-side clip mixer.
pub trait ClipSink {
    fn play(&mut self, clip: &ClipHandle, options: &PlayOptions);
    fn stop(&mut self, clip: &ClipHandle, fade_out: f32);
}

/// The clips a host has available, and the policy binding motions to them.
#[derive(Clone, Debug, Default)]
pub struct ClipLibrary {
    available: Vec<ClipHandle>,
}

impl ClipLibrary {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut lib = Self::default();
        lib.set_available(names);
        lib
    }

    /// Replace the available clip set (clips usually arrive after the model loads).
    pub fn set_available<I, S>(&mut self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.available = names.into_iter().map(|n| ClipHandle(n.into())).collect();
    }

    pub fn available(&self) -> &[ClipHandle] {
        &self.available
    }

    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// First clip whose identifier contains `hint`, ignoring case.
    pub fn resolve(&self, hint: &str) -> Option<ClipHandle> {
        let needle = hint.to_lowercase();
        self.available
            .iter()
            .find(|c| c.0.to_lowercase().contains(&needle))
            .cloned()
    }

    /// Resolve the clip for a motion. Walking falls back to the first
    /// available clip; jumping has no fallback.
    pub fn resolve_for(&self, kind: MotionKind) -> Option<ClipHandle> {
        let found = self.resolve(kind.clip_hint());
        match (found, kind) {
            (Some(h), _) => Some(h),
            (None, MotionKind::Walk) => self.available.first().cloned(),
            (None, MotionKind::Jump) => None,
        }
    }

    /// Queue a play command; no-op without a handle.
    pub fn play(&self, handle: Option<&ClipHandle>, options: PlayOptions, out: &mut MotionFrame) {
        match handle {
            Some(clip) => out.push_clip(ClipCommand::Play {
                clip: clip.clone(),
                options,
            }),
            None => debug!("play: no clip resolved; motion continues without one"),
        }
    }

    /// Queue a stop command; no-op without a handle.
    pub fn stop(&self, handle: Option<&ClipHandle>, fade_out: f32, out: &mut MotionFrame) {
        if let Some(clip) = handle {
            out.push_clip(ClipCommand::Stop {
                clip: clip.clone(),
                fade_out,
            });
        }
    }
}
