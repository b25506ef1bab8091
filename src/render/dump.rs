//! Dump renderer: the flat documentation format read back by [`crate::parser::dump`].
//!
//! Per declaration: documentation lines, attribute lines, then the display
//! signature on one line, indented four spaces per nesting level. Classes and
//! declarations with members get a brace pair around their members. A blank
//! line follows every declaration so the reader can tell where a signature ends.

use crate::canonical::display_signature;
use crate::model::DeclarationRecord;
use crate::render::Renderer;
use anyhow::Result;

const INDENT: &str = "    ";

pub struct DumpRenderer;

impl Renderer for DumpRenderer {
    fn render(&self, records: &[DeclarationRecord]) -> Result<String> {
        let mut lines = Vec::new();
        for record in records {
            render_declaration(record, 0, &mut lines);
        }

        let mut out = lines.join("\n").trim_end().to_string();
        if !out.is_empty() {
            out.push('\n');
        }
        Ok(out)
    }

    fn file_extension(&self) -> &str {
        "txt"
    }
}

fn render_declaration(record: &DeclarationRecord, depth: usize, lines: &mut Vec<String>) {
    let indent = INDENT.repeat(depth);
    let indented = |line: &str| format!("{indent}{line}");

    if !record.documentation.is_empty() {
        lines.extend(record.documentation.lines().map(indented));
    }
    if !record.attributes.is_empty() {
        lines.extend(record.attributes.lines().map(indented));
    }

    let signature = display_signature(&record.signature_content);
    let braced = !record.members.is_empty() || signature.contains("class ");
    lines.push(indented(&signature));

    if braced {
        lines.push(indented("{"));
        for member in &record.members {
            render_declaration(member, depth + 1, lines);
        }
        lines.push(indented("}"));
    }
    lines.push(String::new());
}
