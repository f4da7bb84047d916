use bevy::log::{debug, warn};
use bevy::prelude::*;

use crate::components::CharacterMotion;
use crate::resources::{PendingClipCommands, ReferenceViewpoint};
use crate::{MotionNotice, MotionTrigger};
use kirby_motion_core::{MotionKind, Transform as MotionTransform};

/// Copy the controller's root transform onto the entity.
fn write_transform(src: &MotionTransform, dst: &mut Transform) {
    dst.translation = Vec3::from_array(src.translation.to_array());
    dst.rotation = Quat::from_array(src.rotation.to_array());
    dst.scale = Vec3::splat(src.scale);
}

/// Capture the baseline of characters that have not been attached yet.
pub fn attach_characters_system(
    viewpoint: Res<ReferenceViewpoint>,
    mut q: Query<(Entity, &mut CharacterMotion, &mut Transform)>,
) {
    let view = kirby_motion_core::Vec3::from_array(viewpoint.0.to_array());
    for (entity, mut motion, mut tf) in q.iter_mut() {
        if motion.0.is_attached() {
            continue;
        }
        motion.0.attach(view);
        write_transform(motion.0.transform(), &mut tf);
        debug!("attached character {entity:?}");
    }
}

/// Forward trigger events to their characters' controllers.
pub fn route_triggers_system(
    time: Res<Time>,
    mut triggers: EventReader<MotionTrigger>,
    mut q: Query<&mut CharacterMotion>,
) {
    let now = time.elapsed_seconds_f64();
    for trigger in triggers.read() {
        let Ok(mut motion) = q.get_mut(trigger.target) else {
            warn!("motion trigger for unknown character {:?}", trigger.target);
            continue;
        };
        match trigger.kind {
            MotionKind::Jump => motion.0.trigger_jump(now),
            MotionKind::Walk => motion.0.trigger_walk(now),
        };
    }
}

/// Advance every character one frame, write transforms, stage clip commands
/// and forward events. The staged commands are replaced every frame.
pub fn drive_motion_system(
    time: Res<Time>,
    mut q: Query<(Entity, &mut CharacterMotion, &mut Transform)>,
    mut pending: ResMut<PendingClipCommands>,
    mut notices: EventWriter<MotionNotice>,
) {
    let now = time.elapsed_seconds_f64();
    let dt = time.delta_seconds();
    pending.commands.clear();
    for (entity, mut motion, mut tf) in q.iter_mut() {
        if !motion.0.is_attached() {
            continue;
        }
        let frame = motion.0.on_frame(now, dt);
        write_transform(&frame.transform, &mut tf);
        pending
            .commands
            .extend(frame.clips.into_iter().map(|cmd| (entity, cmd)));
        notices.send_batch(
            frame
                .events
                .into_iter()
                .map(|event| MotionNotice { entity, event }),
        );
    }
}
