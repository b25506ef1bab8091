//! C# declaration extractor.
//!
//! Walks a tree-sitter C# syntax tree and produces one [`DeclarationRecord`] per
//! class, struct, interface, enum, method and constructor:
//!
//! - `///` comments immediately preceding the declaration → `documentation`
//! - `attribute_list` children → `attributes`
//! - modifiers, keyword, return type, name, type parameters, parameter list,
//!   base list and constraint clauses → `signature_content`
//! - members of class and struct bodies → `members`, recursively
//!
//! Import mode is wider: every declaration inside a class, struct or interface
//! body is collected, so nested enums and interface methods can be spliced too.
//!
//! Namespaces and other wrappers are transparent: a class inside a namespace is
//! top-level. A struct inside a class is a member of that class, never top-level.

use crate::canonical::canonical_key;
use crate::model::{DeclarationKind, DeclarationRecord, Span};
use tree_sitter::{Node, Tree};

/// Prefix of a structured documentation comment line.
pub const DOC_MARKER: &str = "///";

/// What the extractor computes per declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExtractMode {
    /// Documentation, attributes, signature and members. Used for dumps.
    Export,
    /// Export data plus the byte span the splicer replaces. Collects every
    /// nested declaration, including interface members.
    Import,
}

impl ExtractMode {
    /// Whether members of a `container` body are recorded.
    fn recurses_into(self, container: DeclarationKind) -> bool {
        match self {
            Self::Export => container.has_members(),
            Self::Import => container.has_members() || container == DeclarationKind::Interface,
        }
    }

    /// Whether a nested declaration of `kind` becomes a member record.
    fn keeps_member(self, kind: DeclarationKind) -> bool {
        match self {
            Self::Export => kind.is_callable() || kind.has_members(),
            Self::Import => true,
        }
    }
}

/// How a child of a declaration node contributes to its record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Attribute,
    /// Space-separated signature token: modifier, keyword, type, name, base list, constraint
    Word,
    /// Glued to the previous token: `<T>`, `(int x)`
    Attached,
    /// Member list, method body or initializer; ends the signature
    Body,
    Skip,
}

fn classify(kind: &str) -> Role {
    match kind {
        "attribute_list" => Role::Attribute,
        "comment" => Role::Skip,
        "type_parameter_list" | "parameter_list" => Role::Attached,
        "declaration_list"
        | "enum_member_declaration_list"
        | "block"
        | "arrow_expression_clause"
        | "constructor_initializer"
        | ";" => Role::Body,
        _ => Role::Word,
    }
}

fn node_text<'a>(node: &Node, source: &'a str) -> &'a str {
    &source[node.start_byte()..node.end_byte()]
}

/// Signature text being accumulated, and where its last token ends.
#[derive(Default)]
struct Signature {
    text: String,
    end: Option<usize>,
}

impl Signature {
    fn push_word(&mut self, word: &str, end: usize) {
        if !self.text.is_empty() {
            self.text.push(' ');
        }
        self.text.push_str(word);
        self.end = Some(end);
    }

    fn push_attached(&mut self, part: &str, end: usize) {
        self.text.push_str(part);
        self.end = Some(end);
    }
}

/// Extract all top-level declarations (with nested members) from a parsed tree.
pub fn extract(tree: &Tree, source: &str, mode: ExtractMode) -> Vec<DeclarationRecord> {
    let declarations = top_level(tree.root_node(), source, mode);
    if declarations.is_empty() {
        tracing::warn!("no declarations found in source");
    }
    declarations
}

fn top_level(node: Node<'_>, source: &str, mode: ExtractMode) -> Vec<DeclarationRecord> {
    let mut cursor = node.walk();
    let children: Vec<Node<'_>> = node.children(&mut cursor).collect();
    children
        .into_iter()
        .flat_map(|child| match DeclarationKind::from_node_kind(child.kind()) {
            Some(kind) => vec![extract_declaration(child, kind, source, mode)],
            None => top_level(child, source, mode),
        })
        .collect()
}

fn collect_members(body: Node<'_>, source: &str, mode: ExtractMode) -> Vec<DeclarationRecord> {
    let mut cursor = body.walk();
    let children: Vec<Node<'_>> = body.children(&mut cursor).collect();
    children
        .into_iter()
        .filter_map(|child| {
            let kind = DeclarationKind::from_node_kind(child.kind())?;
            mode.keeps_member(kind)
                .then(|| extract_declaration(child, kind, source, mode))
        })
        .collect()
}

fn extract_declaration(
    node: Node<'_>,
    kind: DeclarationKind,
    source: &str,
    mode: ExtractMode,
) -> DeclarationRecord {
    let mut signature = Signature::default();
    let mut attributes: Vec<&str> = Vec::new();
    let mut head: Option<usize> = None;
    let mut body: Option<Node<'_>> = None;

    let mut cursor = node.walk();
    for child in node.children(&mut cursor) {
        let role = classify(child.kind());
        match role {
            Role::Body => {
                body = Some(child);
                break;
            }
            Role::Skip => continue,
            _ => {
                head.get_or_insert(child.start_byte());
            }
        }
        let text = node_text(&child, source);
        match role {
            Role::Attribute => attributes.push(text.trim()),
            Role::Word => signature.push_word(text, child.end_byte()),
            Role::Attached => signature.push_attached(text, child.end_byte()),
            Role::Body | Role::Skip => {}
        }
    }

    let comments = doc_comments(node, source);
    let documentation = comments
        .iter()
        .map(|comment| node_text(comment, source).trim())
        .collect::<Vec<_>>()
        .join("\n");

    let signature_content = signature.text.trim().to_string();
    let canonical_key = canonical_key(&signature_content, kind);

    let span = match mode {
        ExtractMode::Export => None,
        ExtractMode::Import => {
            let head = head.unwrap_or_else(|| node.start_byte());
            let start = comments
                .first()
                .map_or(head, |comment| comment.start_byte().min(head));
            Some(Span {
                start,
                head,
                end: signature.end.unwrap_or(head),
            })
        }
    };

    let members = match body {
        Some(body) if mode.recurses_into(kind) => collect_members(body, source, mode),
        _ => Vec::new(),
    };

    tracing::debug!(%kind, key = %canonical_key, "extracted declaration");

    DeclarationRecord {
        kind,
        canonical_key,
        documentation,
        attributes: attributes.join("\n"),
        signature_content,
        span,
        members,
    }
}

/// The contiguous run of `///` comments directly before `node`, in source order.
///
/// Any other sibling, including a plain `//` comment, ends the run.
fn doc_comments<'t>(node: Node<'t>, source: &str) -> Vec<Node<'t>> {
    let mut comments = Vec::new();
    let mut previous = node.prev_sibling();
    while let Some(sibling) = previous {
        let is_doc = sibling.kind() == "comment"
            && node_text(&sibling, source).trim_start().starts_with(DOC_MARKER);
        if !is_doc {
            break;
        }
        comments.push(sibling);
        previous = sibling.prev_sibling();
    }
    comments.reverse();
    comments
}
