//! WASM bindings for papermark.
//!
//! Exposes `render()` to a browser editor via wasm-bindgen. Returns a JS
//! object `{ html, diagnostics }` and throws only on a hard parse failure.

use papermark_markup::Diagnostic;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A diagnostic as the editor sees it: character offsets plus a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditorDiagnostic {
    pub start: usize,
    pub end: usize,
    pub message: String,
}

impl From<&Diagnostic> for EditorDiagnostic {
    fn from(diagnostic: &Diagnostic) -> Self {
        Self {
            start: diagnostic.span.start,
            end: diagnostic.span.end,
            message: diagnostic.message.clone(),
        }
    }
}

/// Flatten diagnostics for the editor, keeping their order.
pub fn editor_diagnostics(diagnostics: &[Diagnostic]) -> Vec<EditorDiagnostic> {
    diagnostics.iter().map(EditorDiagnostic::from).collect()
}

/// Render markup source to HTML.
///
/// Returns a JS object with `{ html: string, diagnostics: [{ start, end, message }] }`.
#[wasm_bindgen]
pub fn render(source: &str) -> Result<JsValue, JsError> {
    let output =
        papermark_html::render_markup(source).map_err(|e| JsError::new(&e.to_string()))?;

    let diagnostics = serde_wasm_bindgen::to_value(&editor_diagnostics(&output.diagnostics))
        .map_err(|e| JsError::new(&e.to_string()))?;

    let js_obj = js_sys::Object::new();
    js_sys::Reflect::set(&js_obj, &"html".into(), &output.html.into())
        .map_err(|_| JsError::new("Failed to set html property"))?;
    js_sys::Reflect::set(&js_obj, &"diagnostics".into(), &diagnostics)
        .map_err(|_| JsError::new("Failed to set diagnostics property"))?;

    Ok(js_obj.into())
}

/// Get the renderer version.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
