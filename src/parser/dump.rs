//! Documentation dump reader.
//!
//! The dump is the line-oriented format written by [`crate::render::dump`],
//! possibly edited by hand:
//!
//! ```text
//! /// <summary>A widget.</summary>
//! [Serializable]
//! public class Widget : IDisposable
//! {
//!     /// <summary>Adds two numbers.</summary>
//!     public int Add(int a, int b)
//!
//! }
//! ```
//!
//! Each run of `///` lines is a documentation block. The non-blank lines after it
//! are `[...]` attributes and the signature. After the signature, a blank line, a
//! brace-only line or the next documentation block ends the entry. Braces carry no
//! other meaning, so nesting does not matter here: every entry is keyed by its
//! canonical signature alone.

use crate::canonical::canonical_key;
use crate::model::{DeclarationKind, DocDictionary, DocEntry};
use crate::parser::csharp::DOC_MARKER;
use regex::Regex;
use std::sync::LazyLock;

/// Leading C# modifiers, skipped before sniffing the declaration keyword.
static RE_MODIFIERS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:(?:public|private|protected|internal|static|sealed|abstract|partial|readonly|unsafe|new|file|ref|virtual|override|async|extern)\s+)*",
    )
    .unwrap()
});

fn is_doc_line(line: &str) -> bool {
    line.starts_with(DOC_MARKER)
}

fn is_brace_line(line: &str) -> bool {
    line.chars().all(|c| c == '{' || c == '}')
}

/// Guess the declaration kind of a dump signature from its text.
///
/// Heuristic: a parameter list means a callable, a leading `class`/`struct`
/// keyword with a parameter list means a constructor, otherwise the type
/// keyword decides. Kind is informational; it never affects the matching key.
pub fn infer_kind(signature: &str) -> DeclarationKind {
    let rest = RE_MODIFIERS.find(signature).map_or(signature, |m| &signature[m.end()..]);
    let keyword = rest.split_whitespace().next().unwrap_or_default();
    let has_parameters = signature.contains('(') && signature.contains(')');

    match keyword {
        "class" | "struct" if has_parameters => DeclarationKind::Constructor,
        "enum" => DeclarationKind::Enum,
        "struct" => DeclarationKind::Struct,
        "interface" => DeclarationKind::Interface,
        "class" => DeclarationKind::Class,
        _ if has_parameters => DeclarationKind::Method,
        _ => DeclarationKind::Class,
    }
}

/// Parse a documentation dump into a dictionary keyed by canonical signature.
///
/// Later entries overwrite earlier ones with the same key.
pub fn parse(dump: &str) -> DocDictionary {
    let lines: Vec<&str> = dump.lines().map(str::trim).collect();
    let mut dictionary = DocDictionary::new();
    let mut i = 0;

    while i < lines.len() {
        if !is_doc_line(lines[i]) {
            i += 1;
            continue;
        }

        let block_line = i + 1;
        let mut doc_lines = Vec::new();
        while i < lines.len() && is_doc_line(lines[i]) {
            doc_lines.push(lines[i]);
            i += 1;
        }

        let mut attr_lines = Vec::new();
        let mut sig_lines = Vec::new();
        while i < lines.len() && !is_doc_line(lines[i]) {
            let line = lines[i];
            if line.is_empty() || is_brace_line(line) {
                if !sig_lines.is_empty() {
                    i += 1;
                    break;
                }
            } else if line.starts_with('[') {
                attr_lines.push(line);
            } else {
                sig_lines.push(line);
            }
            i += 1;
        }

        let signature = sig_lines.join(" ");
        if signature.is_empty() {
            tracing::warn!(line = block_line, "skipped documentation block without a signature");
            continue;
        }

        let kind = infer_kind(&signature);
        let key = canonical_key(&signature, kind);
        if key.is_empty() {
            tracing::warn!(line = block_line, %signature, "skipped documentation block with an empty key");
            continue;
        }

        let entry = DocEntry {
            kind,
            documentation: doc_lines.join("\n"),
            attributes: attr_lines.join("\n"),
        };
        if dictionary.insert(key.clone(), entry).is_some() {
            tracing::debug!(%key, %kind, "replaced documentation for duplicate signature");
        } else {
            tracing::debug!(%key, %kind, "stored documentation");
        }
    }

    dictionary
}
