//! JSON renderer: structured output for tooling integration.
//!
//! Serializes the extracted records directly; spans are import-only and omitted.

use crate::model::DeclarationRecord;
use crate::render::Renderer;
use anyhow::Result;

pub struct JsonRenderer;

impl Renderer for JsonRenderer {
    fn render(&self, records: &[DeclarationRecord]) -> Result<String> {
        let mut out = serde_json::to_string_pretty(records)?;
        out.push('\n');
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "json"
    }
}
