//! JavaScript bindings for web front ends.
//!
//! Only available with the `tsify` feature:
//!
//! ```toml
//! [dependencies]
//! qrforge = { version = "0.1", features = ["tsify"] }
//! ```
//!
//! # Example (JavaScript/TypeScript)
//!
//! ```javascript
//! import init, { encodePayload, resolveQuery, patchConfiguration } from 'qrforge';
//!
//! await init();
//!
//! const payload = encodePayload('wifi', { networkName: 'Cafe', hidden: true });
//! const resolution = resolveQuery(window.location.search);
//! const next = patchConfiguration(resolution.configuration, { margin: 4 });
//! ```

use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::config::{patch, PartialConfiguration, RenderingConfiguration};
use crate::encode::encode;
use crate::intent::{FieldMap, IntentKind};
use crate::preferences::negotiate_locale;
use crate::resolve::{resolve, RawParameterBag};

fn to_js<T: Serialize>(value: &T) -> Result<JsValue, JsError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsError::new(&format!("Failed to serialize: {e}")))
}

fn from_js<T: serde::de::DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsError> {
    serde_wasm_bindgen::from_value(value).map_err(|e| JsError::new(&format!("Invalid {what}: {e}")))
}

/// Encodes a field object for an intent kind.
#[wasm_bindgen(js_name = "encodePayload")]
pub fn encode_payload(kind: &str, fields: JsValue) -> Result<String, JsError> {
    let kind: IntentKind = kind.parse().map_err(|e| JsError::new(&format!("{e}")))?;
    let fields: FieldMap = if fields.is_undefined() || fields.is_null() {
        FieldMap::new()
    } else {
        from_js(fields, "field map")?
    };
    Ok(encode(kind, &fields))
}

/// Resolves a query string (with or without `?`) into a resolution object.
#[wasm_bindgen(js_name = "resolveQuery")]
pub fn resolve_query(query: &str) -> Result<JsValue, JsError> {
    to_js(&resolve(&RawParameterBag::from_query(query)))
}

#[wasm_bindgen(js_name = "defaultConfiguration")]
pub fn default_configuration() -> Result<JsValue, JsError> {
    to_js(&RenderingConfiguration::default())
}

/// Shallow-merges `partial` into `current` and returns the new configuration.
/// `current` is clamped on the way in, so the result is always in bounds.
#[wasm_bindgen(js_name = "patchConfiguration")]
pub fn patch_configuration(current: JsValue, partial: JsValue) -> Result<JsValue, JsError> {
    let current: RenderingConfiguration = from_js(current, "configuration")?;
    let partial: PartialConfiguration = from_js(partial, "partial configuration")?;
    to_js(&patch(&current, &partial))
}

/// Builds `<base>/generate?...` from a parameter object, skipping empty values.
#[wasm_bindgen(js_name = "generateUrl")]
pub fn generate_url(base: &str, params: JsValue) -> Result<String, JsError> {
    let bag: RawParameterBag = from_js(params, "parameters")?;
    bag.generate_url(base)
        .map(String::from)
        .map_err(|e| JsError::new(&format!("Invalid base URL: {e}")))
}

/// Best supported locale code for the browser's language list.
#[wasm_bindgen(js_name = "negotiateLocale")]
pub fn negotiate_locale_code(languages: Vec<String>) -> String {
    negotiate_locale(languages.iter().map(String::as_str)).code.to_owned()
}
