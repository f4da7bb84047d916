use js_sys::Function;
use serde_wasm_bindgen as swb;
use wasm_bindgen::prelude::*;

use kirby_motion_core::{
    ClipCommand, ClipHandle, ClipSink, MotionConfig, MotionController, MotionFrame, PlayOptions,
    TriggerToken, Vec3,
};

#[wasm_bindgen]
pub struct KirbyMotion {
    core: MotionController,
}

fn jsvalue_is_undefined_or_null(v: &JsValue) -> bool {
    v.is_undefined() || v.is_null()
}

/// JS trigger keys are plain numbers; anything else means "no key yet".
fn token_from_js(v: Option<f64>) -> Option<TriggerToken> {
    v.filter(|n| n.is_finite() && *n >= 0.0)
        .map(|n| TriggerToken(n as u64))
}

/// Forwards clip commands to a JS callback as `{ op, clip, ... }` objects.
struct JsClipSink {
    f: Function,
    error: Option<JsValue>,
}

impl JsClipSink {
    fn send(&mut self, cmd: &ClipCommand) {
        if self.error.is_some() {
            return;
        }
        let result = swb::to_value(cmd)
            .map_err(JsValue::from)
            .and_then(|arg| self.f.call1(&JsValue::UNDEFINED, &arg));
        if let Err(e) = result {
            self.error = Some(e);
        }
    }
}

impl ClipSink for JsClipSink {
    fn play(&mut self, clip: &ClipHandle, options: &PlayOptions) {
        self.send(&ClipCommand::Play {
            clip: clip.clone(),
            options: *options,
        });
    }

    fn stop(&mut self, clip: &ClipHandle, fade_out: f32) {
        self.send(&ClipCommand::Stop {
            clip: clip.clone(),
            fade_out,
        });
    }
}

#[wasm_bindgen]
impl KirbyMotion {
    /// Create a controller. Pass a camelCase options object or undefined/null
    /// for defaults.
    /// Example:
    ///   new KirbyMotion({ walkSpeed: 20, stepSize: 0.03 })
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<KirbyMotion, JsError> {
        console_error_panic_hook::set_once();

        let cfg: MotionConfig = if jsvalue_is_undefined_or_null(&config) {
            MotionConfig::default()
        } else {
            swb::from_value(config).map_err(|e| JsError::new(&format!("config error: {e}")))?
        };
        cfg.validate()
            .map_err(|e| JsError::new(&format!("config error: {e}")))?;

        Ok(KirbyMotion {
            core: MotionController::new(cfg),
        })
    }

    /// Capture the rest baseline facing the camera at (x, y, z). Call once the
    /// model is loaded. Returns false if already attached.
    #[wasm_bindgen]
    pub fn attach(&mut self, x: f32, y: f32, z: f32) -> bool {
        self.core.attach(Vec3::new(x, y, z))
    }

    #[wasm_bindgen(js_name = isAttached)]
    pub fn is_attached(&self) -> bool {
        self.core.is_attached()
    }

    /// Report the clip names found in the loaded model.
    #[wasm_bindgen(js_name = setClips)]
    pub fn set_clips(&mut self, names: Vec<String>) {
        self.core.set_clips(names);
    }

    #[wasm_bindgen(js_name = triggerJump)]
    pub fn trigger_jump(&mut self, now_seconds: f64) -> bool {
        self.core.trigger_jump(now_seconds)
    }

    #[wasm_bindgen(js_name = triggerWalk)]
    pub fn trigger_walk(&mut self, now_seconds: f64) -> bool {
        self.core.trigger_walk(now_seconds)
    }

    /// Counter-style triggers: pass the current jump/walk keys (or undefined)
    /// on every render. Returns `{ jump, walk }` telling which were accepted.
    #[wasm_bindgen(js_name = observeTriggers)]
    pub fn observe_triggers(
        &mut self,
        now_seconds: f64,
        jump_key: Option<f64>,
        walk_key: Option<f64>,
    ) -> Result<JsValue, JsError> {
        let outcome = self.core.observe_triggers(
            now_seconds,
            token_from_js(jump_key),
            token_from_js(walk_key),
        );
        swb::to_value(&outcome).map_err(|e| JsError::new(&format!("outcome error: {e}")))
    }

    /// Advance one rendered frame. Returns `{ transform, clips, events }`.
    #[wasm_bindgen(js_name = onFrame)]
    pub fn on_frame(&mut self, now_seconds: f64, dt: f32) -> Result<JsValue, JsError> {
        let frame = self.core.on_frame(now_seconds, dt);
        swb::to_value(&frame).map_err(|e| JsError::new(&format!("frame error: {e}")))
    }

    /// Current root transform `{ translation: [x,y,z], rotation: [x,y,z,w], scale }`.
    #[wasm_bindgen]
    pub fn transform(&self) -> Result<JsValue, JsError> {
        swb::to_value(self.core.transform())
            .map_err(|e| JsError::new(&format!("transform error: {e}")))
    }

    #[wasm_bindgen(js_name = walkPhase)]
    pub fn walk_phase(&self) -> Result<JsValue, JsError> {
        swb::to_value(&self.core.walk_phase())
            .map_err(|e| JsError::new(&format!("phase error: {e}")))
    }

    #[wasm_bindgen(js_name = isIdle)]
    pub fn is_idle(&self) -> bool {
        self.core.is_idle()
    }

    /// Call `callback(command)` for every clip command in a frame returned by
    /// `onFrame`, in order. Stops at the first callback error.
    #[wasm_bindgen(js_name = applyClips)]
    pub fn apply_clips(&self, frame: JsValue, callback: Function) -> Result<(), JsValue> {
        if jsvalue_is_undefined_or_null(&frame) {
            return Ok(());
        }
        let frame: MotionFrame = swb::from_value(frame)?;
        let mut sink = JsClipSink {
            f: callback,
            error: None,
        };
        frame.apply_clips(&mut sink);
        match sink.error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// Debug helper: the current config as a JSON string.
    #[wasm_bindgen(js_name = configJson)]
    pub fn config_json(&self) -> Result<String, JsError> {
        serde_json::to_string(self.core.config())
            .map_err(|e| JsError::new(&format!("config error: {e}")))
    }
}

/// Bumped whenever the JS-facing surface changes shape.
#[wasm_bindgen]
pub fn abi_version() -> u32 {
    1
}
