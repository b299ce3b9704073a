//! iecdoc-wasm - WebAssembly bindings for iecdoc
//!
//! Groups CSV text and generates the transcript PDF in the browser. There
//! are no system fonts under WebAssembly, so callers pass the bytes of a
//! TTF/OTF font to draw page text with.

use serde::Serialize;
use wasm_bindgen::prelude::*;

use iecdoc_data::RecordGrouper;
use iecdoc_pdf::{ExportDriver, SvgRasterizer};
use iecdoc_render::TranscriptLayout;

/// Returns the current version of iecdoc
#[wasm_bindgen]
pub fn version() -> String {
    iecdoc_render::VERSION.to_string()
}

/// Group CSV text by student
///
/// Returns a plain object mapping each student to their list of records,
/// each record an object of column name to cell text.
#[wasm_bindgen]
pub fn group_csv(text: &str) -> Result<JsValue, JsError> {
    let dataset = RecordGrouper::default().parse(text)?;
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    Ok(dataset.serialize(&serializer)?)
}

/// Generate the transcript PDF for every student in the CSV text
#[wasm_bindgen]
pub fn generate_pdf(text: &str, font_bytes: Vec<u8>) -> Result<Vec<u8>, JsError> {
    render_pdf(text, font_bytes).map_err(|e| JsError::new(&e.to_string()))
}

fn render_pdf(text: &str, font_bytes: Vec<u8>) -> Result<Vec<u8>, Box<dyn std::error::Error>> {
    let dataset = RecordGrouper::default().parse(text)?;
    let pages = TranscriptLayout::default().pages(&dataset);

    let mut rasterizer = SvgRasterizer::without_system_fonts();
    if !font_bytes.is_empty() {
        rasterizer = rasterizer.with_font_data(font_bytes);
    }

    let artifact = ExportDriver::new(rasterizer).export_all(&pages)?;
    Ok(artifact.into_bytes())
}
