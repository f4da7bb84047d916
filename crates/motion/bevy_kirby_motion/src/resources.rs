use bevy::prelude::*;
use kirby_motion_core::ClipCommand;

/// Point the characters face at rest (the camera position in the original
/// scene).
#[derive(Resource, Debug, Clone, Copy)]
pub struct ReferenceViewpoint(pub Vec3);

impl Default for ReferenceViewpoint {
    fn default() -> Self {
        Self(Vec3::new(0.0, -6.77, 20.0))
    }
}

/// Clip commands produced this frame, tagged with their character. Refilled by
/// `drive_motion_system` each frame; the app's mixer reads it after that.
#[derive(Resource, Default, Debug)]
pub struct PendingClipCommands {
    pub commands: Vec<(Entity, ClipCommand)>,
}

impl PendingClipCommands {
    pub fn drain(&mut self) -> std::vec::Drain<'_, (Entity, ClipCommand)> {
        self.commands.drain(..)
    }
}
