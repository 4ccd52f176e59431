use wasm_bindgen::prelude::*;

/// Fit a scene given as JSON; returns the report as JSON.
#[wasm_bindgen(js_name = fitScene)]
pub fn fit_scene(json: &str) -> Result<String, JsValue> {
    let report = crate::fit_scene_json(json).map_err(to_js_error)?;
    serde_json::to_string(&report).map_err(|e| to_js_error(crate::FitError::Report(e)))
}

/// Like [`fit_scene`], but takes and returns plain JS objects.
#[wasm_bindgen(js_name = fitSceneValue)]
pub fn fit_scene_value(scene: JsValue) -> Result<JsValue, JsValue> {
    let scene: crate::Scene = serde_wasm_bindgen::from_value(scene)?;
    let report = crate::fit_scene(&scene).map_err(to_js_error)?;
    Ok(serde_wasm_bindgen::to_value(&report)?)
}

fn to_js_error(e: crate::FitError) -> JsValue {
    js_sys::Error::new(&e.to_string()).into()
}
