use kirby_motion_core::{ClipHandle, ClipSink, MotionConfig, MotionController, PlayOptions, Vec3};

/// Prints clip requests instead of driving a real mixer.
struct PrintMixer;

impl ClipSink for PrintMixer {
    fn play(&mut self, clip: &ClipHandle, options: &PlayOptions) {
        println!("  mixer: play {clip} ({:?}, fade in {}s)", options.looping, options.fade_in);
    }

    fn stop(&mut self, clip: &ClipHandle, fade_out: f32) {
        println!("  mixer: stop {clip} (fade out {fade_out}s)");
    }
}

fn main() -> anyhow::Result<()> {
    let cfg = MotionConfig::from_json(r#"{ "stepSize": 0.03 }"#)?;
    let mut ctl = MotionController::new(cfg);
    ctl.attach(Vec3::new(0.0, -6.77, 20.0));
    ctl.set_clips(["Armature|Idle", "Armature|Jump", "Armature|Walk"]);

    let dt = 1.0 / 60.0;
    let mut now = 0.0f64;
    let mut mixer = PrintMixer;

    ctl.trigger_walk(now);
    for frame_no in 0..240 {
        now += dt as f64;
        if frame_no == 120 {
            println!("jump accepted: {}", ctl.trigger_jump(now));
        }
        let frame = ctl.on_frame(now, dt);
        frame.apply_clips(&mut mixer);
        for event in &frame.events {
            println!("t={now:.3} {event:?}");
        }
        if frame_no % 20 == 0 {
            println!("t={now:.3} {}", serde_json::to_string(&frame.transform)?);
        }
    }
    Ok(())
}
