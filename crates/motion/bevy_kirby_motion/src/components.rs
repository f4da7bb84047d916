use bevy::prelude::*;
use kirby_motion_core::{MotionConfig, MotionController};

/// Procedural jump/walk state for one character root.
#[derive(Component, Debug)]
pub struct CharacterMotion(pub MotionController);

impl CharacterMotion {
    pub fn new(cfg: MotionConfig) -> Self {
        Self(MotionController::new(cfg))
    }

    /// Builder-style clip registration, for spawning.
    pub fn with_clips<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.0.set_clips(names);
        self
    }
}

impl Default for CharacterMotion {
    fn default() -> Self {
        Self::new(MotionConfig::default())
    }
}
