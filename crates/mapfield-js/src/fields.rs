//! Page-level entry points.

use mapfield_browser::{MapEvent, ProviderSettings, boot, page_fields};
use mapfield_core::FieldConfig;
use wasm_bindgen::prelude::*;

use crate::types::{BootReport, JsFieldConfig, JsRegistration};

/// Register one field. Its map is created by the next `bootMapFields`.
#[wasm_bindgen(js_name = registerMapField)]
pub fn register_map_field(config: JsFieldConfig) -> Result<JsRegistration, JsError> {
    let config = FieldConfig::from(config)
        .validated()
        .map_err(|e| JsError::new(&format!("Invalid map field: {}", e)))?;
    Ok(page_fields().register(config).into())
}

/// Register every field found in the page markup, load the provider once,
/// and create the maps when it is ready.
///
/// Calling this more than once is harmless: the provider is requested once
/// and each field's map is created once.
#[wasm_bindgen(js_name = bootMapFields)]
pub async fn boot_map_fields(api_key: String) -> Result<JsValue, JsError> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsError::new("No document available"))?;

    let fields = page_fields();
    let scan = fields.register_from_document(&document);

    let initialized = boot(fields, ProviderSettings::new(api_key))
        .await
        .map_err(|e| JsError::new(&format!("Map provider failed to load: {}", e)))?;

    let report = BootReport {
        registered: scan.registered,
        skipped: scan.skipped,
        initialized,
    };
    serde_wasm_bindgen::to_value(&report)
        .map_err(|e| JsError::new(&format!("Serialization error: {}", e)))
}

/// Current stored value of a live field, or `undefined`.
#[wasm_bindgen(js_name = mapFieldValue)]
pub fn map_field_value(input_id: &str) -> Option<String> {
    page_fields().value(input_id)
}

/// Clear a live field the way its clear control would. Returns `false` if
/// the field has no map.
#[wasm_bindgen(js_name = clearMapField)]
pub fn clear_map_field(input_id: &str) -> bool {
    page_fields().dispatch(input_id, MapEvent::Clear)
}
