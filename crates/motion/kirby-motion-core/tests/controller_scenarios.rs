use kirby_motion_core::walk::{choose_endpoint, quantize_to_step};
use kirby_motion_core::{
    DropReason, MotionConfig, MotionController, MotionEvent, MotionKind, TokenAllocator,
    TriggerToken, Vec3, WalkPhase,
};
use kirby_test_fixtures::{configs, scenes};

const DT: f32 = 1.0 / 60.0;

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn demo_viewpoint() -> Vec3 {
    let scene = scenes::load("demo-page").expect("demo scene fixture");
    Vec3::from_array(scene.viewpoint)
}

fn from_fixture(name: &str) -> MotionController {
    init_logging();
    let json = configs::json(name).expect("config fixture");
    let cfg = MotionConfig::from_json(&json).expect("fixture config should validate");
    let mut c = MotionController::new(cfg);
    assert!(c.attach(demo_viewpoint()));
    c
}

#[test]
fn walk_scenario_from_left_endpoint() {
    let mut c = from_fixture("walk-scenario");
    assert_eq!(c.transform().translation.x, -5.0);
    assert_eq!(choose_endpoint(&c.config().walk(), -5.0), 5.0);

    assert!(c.trigger_walk(0.0));
    let target = c.walk_target().unwrap();
    // the right endpoint rounded onto the 0.03 grid: 167 cells, 5.01
    assert_eq!(target, quantize_to_step(5.0, 0.03));
    assert!(target > 5.0 && target - 5.0 < 0.03);

    let mut now = 0.0;
    let mut phases = Vec::new();
    for _ in 0..10_000 {
        now += DT as f64;
        let frame = c.on_frame(now, DT);
        phases.extend(frame.phases());
        if c.walk_phase() == WalkPhase::Idle {
            break;
        }
    }

    assert_eq!(
        phases,
        vec![
            WalkPhase::TurningAway,
            WalkPhase::Moving,
            WalkPhase::TurningBack,
            WalkPhase::Done,
        ]
    );
    assert_eq!(c.transform().translation.x, target);
    assert_eq!(c.transform().rotation, c.baseline().unwrap().orientation);
    assert_eq!(c.transform().translation.y, c.baseline().unwrap().position_y);
}

#[test]
fn jump_is_dropped_in_every_walk_phase() {
    let mut c = from_fixture("walk-scenario");
    c.trigger_walk(0.0);

    let mut now = 0.0;
    let mut seen = Vec::new();
    while c.walk_phase() != WalkPhase::Idle {
        let phase = c.walk_phase();
        if !seen.contains(&phase) {
            seen.push(phase);
        }
        assert!(!c.trigger_jump(now));
        assert!(!c.jump_active());
        now += DT as f64;
        c.on_frame(now, DT);
    }
    assert_eq!(
        seen,
        vec![WalkPhase::TurningAway, WalkPhase::Moving, WalkPhase::TurningBack]
    );
}

#[test]
fn walk_is_dropped_while_jumping() {
    let mut c = from_fixture("demo-page");
    assert!(c.trigger_jump(0.0));
    let x = c.transform().translation.x;
    for i in 1..=20 {
        let now = i as f64 * 0.02;
        assert!(!c.trigger_walk(now));
        assert_eq!(c.walk_phase(), WalkPhase::Idle);
        let frame = c.on_frame(now, 0.02);
        assert_eq!(frame.transform.translation.x, x);
    }
    // jump is over after 0.5 s; walking is allowed again
    c.on_frame(0.6, 0.2);
    assert!(c.trigger_walk(0.61));
}

#[test]
fn only_one_motion_advances_per_frame() {
    let mut c = from_fixture("demo-page");
    c.trigger_jump(0.0);
    c.trigger_walk(0.0);
    let frame = c.on_frame(0.1, 0.1);
    assert!(frame.events.contains(&MotionEvent::JumpStarted));
    assert!(frame.events.contains(&MotionEvent::TriggerDropped {
        kind: MotionKind::Walk,
        reason: DropReason::OtherActive(MotionKind::Jump),
    }));
    assert!(!frame
        .events
        .iter()
        .any(|e| matches!(e, MotionEvent::WalkStarted { .. })));
}

#[test]
fn tokens_trigger_on_change_only() {
    let mut c = from_fixture("demo-page");
    let mut tokens = TokenAllocator::new();

    // no key yet
    let out = c.observe_triggers(0.0, None, None);
    assert!(!out.jump && !out.walk);

    let jump_key = tokens.alloc();
    assert!(c.observe_triggers(0.0, Some(jump_key), None).jump);

    // same key on later renders does nothing, even after landing
    let mut now = 0.0;
    for _ in 0..60 {
        now += DT as f64;
        c.on_frame(now, DT);
        assert!(!c.observe_triggers(now, Some(jump_key), None).jump);
    }
    assert!(!c.jump_active());

    assert!(c.observe_triggers(now, Some(tokens.alloc()), None).jump);
}

#[test]
fn token_change_during_motion_is_consumed() {
    let mut c = from_fixture("demo-page");
    let walk_key = Some(TriggerToken(1));
    assert!(c.observe_triggers(0.0, Some(TriggerToken(1)), None).jump);
    // walk requested mid-jump: dropped, not deferred
    assert!(!c.observe_triggers(0.1, Some(TriggerToken(1)), walk_key).walk);
    c.on_frame(1.0, 0.9);
    assert!(c.is_idle());
    assert!(!c.observe_triggers(1.1, Some(TriggerToken(1)), walk_key).walk);
    assert_eq!(c.walk_phase(), WalkPhase::Idle);
}

#[test]
fn degenerate_fixture_walks_forward_without_turning_back() {
    let mut c = from_fixture("degenerate-endpoints");
    let start_x = c.transform().translation.x;
    c.trigger_walk(0.0);
    assert_eq!(c.walk_target(), Some(start_x + 0.5));
    let mut now = 0.0;
    while !c.is_idle() {
        now += DT as f64;
        c.on_frame(now, DT);
    }
    assert_eq!(c.transform().translation.x, start_x + 0.5);
    assert_ne!(c.transform().rotation, c.baseline().unwrap().orientation);
}

#[test]
fn every_config_fixture_validates() {
    for key in configs::keys() {
        let json = configs::json(&key).unwrap();
        MotionConfig::from_json(&json).unwrap_or_else(|e| panic!("{key}: {e}"));
    }
}
