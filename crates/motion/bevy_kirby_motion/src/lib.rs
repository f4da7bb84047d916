//! Bevy adapter for `kirby_motion_core`.
//!
//! Spawn an entity with [`CharacterMotion`] and a `Transform`; the plugin
//! captures its baseline against [`ReferenceViewpoint`], routes
//! [`MotionTrigger`] events to it, and writes the root transform every frame.
//! Clip commands are staged in [`PendingClipCommands`] for the app's mixer.

use bevy::prelude::*;

pub mod components;
pub mod resources;
pub mod systems;

pub use components::CharacterMotion;
pub use resources::{PendingClipCommands, ReferenceViewpoint};

use kirby_motion_core::{MotionEvent, MotionKind};

/// Request a motion on one character.
#[derive(Event, Debug, Clone, Copy)]
pub struct MotionTrigger {
    pub target: Entity,
    pub kind: MotionKind,
}

/// A motion event reported by a character's controller.
#[derive(Event, Debug, Clone)]
pub struct MotionNotice {
    pub entity: Entity,
    pub event: MotionEvent,
}

pub struct KirbyMotionPlugin;

impl Plugin for KirbyMotionPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<MotionTrigger>()
            .add_event::<MotionNotice>()
            .init_resource::<ReferenceViewpoint>()
            .init_resource::<PendingClipCommands>()
            .add_systems(
                Update,
                (
                    systems::attach_characters_system,
                    systems::route_triggers_system,
                    systems::drive_motion_system,
                )
                    .chain(),
            );
    }
}
