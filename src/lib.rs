//! docsync: keep C# XML documentation comments in sync with a flat dump.
//!
//! Export path: [`parser::extract_source`] in [`ExtractMode::Export`] →
//! [`render::dump::DumpRenderer`] writes the dump.
//!
//! Import path: [`parser::dump::parse`] reads an (edited) dump into a
//! [`DocDictionary`], [`parser::extract_source`] in [`ExtractMode::Import`]
//! locates every declaration's byte span, and [`splice::apply`] rewrites the
//! source, touching nothing but the matched documentation.
//!
//! All operations are synchronous and hold no global state; use one
//! [`SourceParser`] per thread to process files in parallel.

pub mod canonical;
pub mod model;
pub mod parser;
pub mod render;
pub mod splice;

pub use model::{DeclarationKind, DeclarationRecord, DocDictionary, DocEntry, Span};
pub use parser::{ExtractMode, ParseError, SourceParser};
