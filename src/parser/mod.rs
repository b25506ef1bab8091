//! Parser module: the C# syntax-tree collaborator plus the two readers built on it.
//!
//! - [`csharp`] walks a tree-sitter tree and extracts declaration records.
//! - [`dump`] reads the flat documentation dump back into a dictionary.

pub mod csharp;
pub mod dump;

use crate::model::DeclarationRecord;
use thiserror::Error;
use tree_sitter::{Parser, Tree};

pub use csharp::ExtractMode;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("failed to load the C# grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),
    #[error("parser produced no syntax tree")]
    NoTree,
}

/// A tree-sitter parser bound to the C# grammar.
///
/// Holds no shared state; create one per thread when extracting in parallel.
pub struct SourceParser {
    parser: Parser,
}

impl SourceParser {
    pub fn new() -> Result<Self, ParseError> {
        let mut parser = Parser::new();
        parser.set_language(&tree_sitter_c_sharp::language())?;
        Ok(Self { parser })
    }

    pub fn parse(&mut self, source: &str) -> Result<Tree, ParseError> {
        self.parser.parse(source, None).ok_or(ParseError::NoTree)
    }
}

/// Parse `source` and extract its declarations in the given mode.
pub fn extract_source(
    parser: &mut SourceParser,
    source: &str,
    mode: ExtractMode,
) -> Result<Vec<DeclarationRecord>, ParseError> {
    let tree = parser.parse(source)?;
    Ok(csharp::extract(&tree, source, mode))
}
