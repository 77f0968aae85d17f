use provable::types::HashSeriesState;
use provable::verify::{
    recompute_floats, recompute_ints, verify_link, verify_reveals, verify_series_hash,
    verify_server_seed,
};
use serde::Serialize;
use serde_wasm_bindgen::{from_value, to_value};
use wasm_bindgen::prelude::*;

#[derive(Serialize)]
struct CheckPayload {
    ok: bool,
    error: Option<String>,
}

impl CheckPayload {
    fn from_result<E: ToString>(result: Result<(), E>) -> Self {
        match result {
            Ok(()) => Self {
                ok: true,
                error: None,
            },
            Err(err) => Self {
                ok: false,
                error: Some(err.to_string()),
            },
        }
    }
}

#[wasm_bindgen]
pub fn server_hash(server_seed: &str) -> String {
    provable::sha256_hex(server_seed)
}

#[wasm_bindgen]
pub fn check_server_seed(server_seed: &str, server_hash: &str) -> Result<JsValue, JsValue> {
    let payload = CheckPayload::from_result(verify_server_seed(server_seed, server_hash));
    to_value(&payload).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn check_link(prev: &str, curr: &str) -> bool {
    verify_link(prev, curr)
}

/// `reveals` is a JS array of hex strings in increasing index order.
#[wasm_bindgen]
pub fn check_reveals(commitment: &str, reveals: JsValue) -> Result<JsValue, JsValue> {
    let reveals: Vec<String> = from_value(reveals)
        .map_err(|err| JsValue::from_str(&format!("failed to decode reveals: {err}")))?;
    let payload = CheckPayload::from_result(verify_reveals(commitment, &reveals));
    to_value(&payload).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn floats(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    cursor: u64,
    count: usize,
) -> Result<JsValue, JsValue> {
    let values =
        recompute_floats(server_seed, client_seed, nonce, cursor, count).map_err(to_js_err)?;
    to_value(&values).map_err(|err| JsValue::from_str(&err.to_string()))
}

#[wasm_bindgen]
pub fn ints(
    server_seed: &str,
    client_seed: &str,
    nonce: u64,
    cursor: u64,
    count: usize,
    max: u64,
    min: i64,
) -> Result<JsValue, JsValue> {
    let values = recompute_ints(server_seed, client_seed, nonce, cursor, count, max, min)
        .map_err(to_js_err)?;
    to_value(&values).map_err(|err| JsValue::from_str(&err.to_string()))
}

/// `state` is `{ seed, salt, nonce }`.
#[wasm_bindgen]
pub fn check_series_hash(state: JsValue, hash: &str) -> Result<bool, JsValue> {
    let state: HashSeriesState = from_value(state)
        .map_err(|err| JsValue::from_str(&format!("failed to decode series state: {err}")))?;
    Ok(verify_series_hash(&state, hash))
}

fn to_js_err(err: provable::Error) -> JsValue {
    JsValue::from_str(&err.to_string())
}
