use battletanks_core::{self as bt, roster, Match, MatchConfig, MatchInputs, StepOutcome};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Install panic hook so WASM panics show in browser console instead of silently freezing.
#[wasm_bindgen(start)]
pub fn init_panic_hook() {
    console_error_panic_hook::set_once();
}

fn log(msg: &str) {
    web_sys::console::log_1(&JsValue::from_str(msg));
}

/// Entity as handed to the renderer. Positions are raw, not log-rounded.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsEntity {
    id: String,
    kind: String,
    x: f64,
    z: f64,
    vx: f64,
    vz: f64,
    health: Option<i32>,
    ghost: bool,
}

fn entity_to_js(e: &bt::Entity) -> JsEntity {
    JsEntity {
        id: e.id.clone(),
        kind: e.kind().as_str().to_string(),
        x: e.pos.x,
        z: e.pos.z,
        vx: e.vel.x,
        vz: e.vel.z,
        health: e.health(),
        ghost: e.is_ghost(),
    }
}

/// Serialize a JS value to JSON text via `JSON.stringify`.
fn stringify(value: &JsValue) -> Result<String, JsError> {
    js_sys::JSON::stringify(value)
        .map(String::from)
        .map_err(|_| JsError::new("value cannot be stringified"))
}

#[wasm_bindgen]
pub struct WasmMatch {
    inner: Match,
    announced: bool,
}

#[wasm_bindgen]
impl WasmMatch {
    /// Start a match. `users` is an array of usernames in any order; it is
    /// trimmed, de-duplicated and sorted here. `config_json` may be empty.
    #[wasm_bindgen(constructor)]
    pub fn new(room: &str, seed_word: &str, users: JsValue, config_json: Option<String>) -> Result<WasmMatch, JsError> {
        let names: Vec<String> = serde_wasm_bindgen::from_value(users)
            .map_err(|e| JsError::new(&format!("users must be an array of strings: {e}")))?;
        let config = match config_json.as_deref().map(str::trim) {
            Some(text) if !text.is_empty() => serde_json::from_str::<MatchConfig>(text)
                .map_err(|e| JsError::new(&format!("bad match config: {e}")))?,
            _ => MatchConfig::default(),
        };
        config
            .validate()
            .map_err(|e| JsError::new(&format!("bad match config: {e}")))?;
        let inputs = MatchInputs::new(room, seed_word, roster::sanitize(names));
        log(&format!(
            "[BT] start room=\"{}\" seed=\"{}\" players={}",
            inputs.room,
            inputs.seed_word,
            inputs.participants.len()
        ));
        Ok(WasmMatch {
            inner: Match::start(inputs, config),
            announced: false,
        })
    }

    /// Feed the frame time in seconds (e.g. `performance.now() / 1000`).
    /// Returns true once the match has finished.
    pub fn advance(&mut self, now_seconds: f64) -> bool {
        let finished = self.inner.advance(now_seconds) == StepOutcome::Finished;
        if finished {
            self.announce();
        }
        finished
    }

    /// Current entities for rendering.
    pub fn export_entities(&self) -> Result<JsValue, JsError> {
        let entities: Vec<JsEntity> = self.inner.entities().iter().map(entity_to_js).collect();
        serde_wasm_bindgen::to_value(&entities).map_err(|e| JsError::new(&e.to_string()))
    }

    /// Close the match now and return the canonical proof JSON.
    pub fn export_now(&mut self) -> Result<String, JsError> {
        let proof = self
            .inner
            .export_now()
            .map_err(|e| JsError::new(&e.to_string()))?;
        self.announce();
        Ok(proof.canonical)
    }

    /// Canonical proof JSON once finished.
    pub fn proof_json(&self) -> Result<Option<String>, JsError> {
        let proof = self.inner.proof().map_err(|e| JsError::new(&e.to_string()))?;
        Ok(proof.map(|p| p.canonical))
    }

    /// Hex fingerprint once finished.
    pub fn fingerprint(&self) -> Result<Option<String>, JsError> {
        let proof = self.inner.proof().map_err(|e| JsError::new(&e.to_string()))?;
        Ok(proof.map(|p| p.fingerprint))
    }

    /// Suggested download name, `battle-proof-<hash>.json`.
    pub fn file_name(&self) -> Result<Option<String>, JsError> {
        let proof = self.inner.proof().map_err(|e| JsError::new(&e.to_string()))?;
        Ok(proof.map(|p| p.file_name()))
    }

    // Quick accessors
    pub fn tick(&self) -> f64 { self.inner.tick() as f64 }
    pub fn is_finished(&self) -> bool { self.inner.is_finished() }
    pub fn live_count(&self) -> usize { self.inner.entities().len() }
}

impl WasmMatch {
    /// Log the proof hash to the console the first time the match ends.
    fn announce(&mut self) {
        if self.announced {
            return;
        }
        self.announced = true;
        match self.inner.proof() {
            Ok(Some(proof)) => log(&format!(
                "[BT] match finished at tick {}, proof hash: {}",
                self.inner.tick(),
                proof.fingerprint
            )),
            Ok(None) => {}
            Err(e) => web_sys::console::error_1(&JsValue::from_str(&format!("[BT] proof error: {e}"))),
        }
    }
}

/// Recompute the fingerprint of a proof given as JSON text or as an object.
#[wasm_bindgen]
pub fn verify_proof(proof: JsValue) -> Result<String, JsError> {
    let text = match proof.as_string() {
        Some(text) => text,
        None => stringify(&proof)?,
    };
    bt::verify(&text).map_err(|e| JsError::new(&e.to_string()))
}

/// 32-bit seed of a string, as every client derives it.
#[wasm_bindgen]
pub fn derive_seed(text: &str) -> u32 {
    bt::derive_seed(text)
}
