//! Signature normalization.
//!
//! Two forms are derived from the same raw signature text:
//!
//! - [`canonical_key`]: the strict matching key. All whitespace is removed so
//!   `int index` and `intindex` compare equal; formatting differences between the
//!   source and a hand-edited dump never break a match.
//! - [`display_signature`]: the single-line form written into dumps. Whitespace
//!   is collapsed, not removed, and constraint clauses are separated by ` where `.
//!
//! Matching must only ever go through [`canonical_key`]. Because the strict form
//! discards exactly the whitespace the display form keeps, the key of a display
//! signature equals the key of the raw signature it came from.

use crate::model::DeclarationKind;
use regex::Regex;
use std::sync::LazyLock;

/// The generic-constraint keyword, only as a whole word.
static RE_WHERE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\bwhere\b").unwrap());

/// Split a signature into its main part and its constraint clauses (without the keyword).
fn split_constraints(signature: &str) -> (&str, Vec<&str>) {
    let mut parts = RE_WHERE.split(signature);
    let main = parts.next().unwrap_or_default();
    (main, parts.collect())
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn strip_whitespace(text: &str) -> String {
    text.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Strict matching key for a raw signature.
pub fn canonical_key(signature: &str, kind: DeclarationKind) -> String {
    let (main, constraints) = split_constraints(signature);

    let mut key = strip_whitespace(&collapse_whitespace(main));
    for clause in constraints {
        key.push_str("where");
        key.push_str(&strip_whitespace(clause));
    }

    let key = key.trim_end_matches(['{', '}']).to_string();
    tracing::trace!(%kind, raw = signature, %key, "canonicalized signature");
    key
}

/// Human-readable single-line signature for dumps.
pub fn display_signature(signature: &str) -> String {
    let collapsed = collapse_whitespace(signature);
    let (main, constraints) = split_constraints(&collapsed);

    let mut out = main.trim().to_string();
    for clause in constraints {
        out.push_str(" where ");
        out.push_str(clause.trim());
    }
    out
}
