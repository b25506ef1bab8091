//! Data model for extracted declarations and parsed documentation dumps.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;

/// Kind of a C# declaration the engine knows how to document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclarationKind {
    Method,
    Constructor,
    Class,
    Struct,
    Interface,
    Enum,
}

impl DeclarationKind {
    /// Map a tree-sitter node kind to a declaration kind.
    pub fn from_node_kind(kind: &str) -> Option<Self> {
        match kind {
            "method_declaration" => Some(Self::Method),
            "constructor_declaration" => Some(Self::Constructor),
            "class_declaration" => Some(Self::Class),
            "struct_declaration" => Some(Self::Struct),
            "interface_declaration" => Some(Self::Interface),
            "enum_declaration" => Some(Self::Enum),
            _ => None,
        }
    }

    /// Methods and constructors take a parameter list.
    pub fn is_callable(self) -> bool {
        matches!(self, Self::Method | Self::Constructor)
    }

    /// Kinds whose body members are recursed into.
    pub fn has_members(self) -> bool {
        matches!(self, Self::Class | Self::Struct)
    }
}

impl fmt::Display for DeclarationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Method => "method",
            Self::Constructor => "constructor",
            Self::Class => "class",
            Self::Struct => "struct",
            Self::Interface => "interface",
            Self::Enum => "enum",
        };
        f.write_str(name)
    }
}

/// Byte range of a declaration's documentation, attributes and signature.
///
/// `start..end` is the region replaced by the splicer. `head` is where the
/// declaration node itself begins (first attribute or signature token), so
/// `start..head` is the doc comment block, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Span {
    pub start: usize,
    pub head: usize,
    pub end: usize,
}

/// One declaration found in a syntax tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclarationRecord {
    pub kind: DeclarationKind,
    pub canonical_key: String,
    /// `///` lines in source order, trimmed, newline-joined
    pub documentation: String,
    /// Attribute lists, newline-joined
    pub attributes: String,
    /// Modifiers, name, type parameters, parameters/base list, constraints
    pub signature_content: String,
    /// Only computed in import mode
    #[serde(skip)]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub members: Vec<DeclarationRecord>,
}

impl DeclarationRecord {
    /// This record followed by all nested members, depth-first.
    pub fn flatten(&self) -> Vec<&DeclarationRecord> {
        let mut out = vec![self];
        for member in &self.members {
            out.extend(member.flatten());
        }
        out
    }
}

/// Documentation for one signature, as read from a dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocEntry {
    pub kind: DeclarationKind,
    pub documentation: String,
    pub attributes: String,
}

/// Canonical key → documentation. Drained by the splicer.
pub type DocDictionary = HashMap<String, DocEntry>;
