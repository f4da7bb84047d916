//! Kirby Motion Core (engine-agnostic)
//!
//! Procedural jump and walk motion for a skinned character, layered over
//! host-side skeletal clips. The host drives `MotionController::on_frame` once
//! per rendered frame, forwards UI triggers, reads back the root transform and
//! applies the returned clip commands to its mixer.

pub mod clip;
pub mod config;
pub mod controller;
pub mod error;
pub mod ids;
pub mod jump;
pub mod outputs;
pub mod pose;
pub mod walk;

// Re-exports for consumers (adapters)
pub use clip::{ClipCommand, ClipHandle, ClipLibrary, ClipLoop, ClipSink, PlayOptions};
pub use config::{JumpConfig, MotionConfig, WalkConfig};
pub use controller::{MotionController, TriggerOutcome};
pub use error::MotionError;
pub use ids::{TokenAllocator, TriggerLatch, TriggerToken};
pub use jump::JumpMotion;
pub use outputs::{DropReason, MotionEvent, MotionFrame, MotionKind};
pub use pose::{Baseline, Transform};
pub use walk::{WalkMotion, WalkPhase};

pub use glam::{Quat, Vec3};

/// Motion core result type
pub type Result<T> = core::result::Result<T, MotionError>;
