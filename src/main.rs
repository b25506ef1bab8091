//! docsync: export C# documentation comments to a flat dump and merge them back.
//!
//! - **extract**: `docsync extract src/*.cs -o docs.txt` writes every declaration's
//!   `///` docs, attributes and signature, nested by class.
//! - **apply**: `docsync apply Widget.cs -d docs.txt --in-place` replaces the docs of
//!   every declaration whose signature appears in the dump, leaving all other text
//!   byte-identical.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use docsync::parser::{self, dump, ExtractMode, SourceParser};
use docsync::render;
use docsync::{splice, DeclarationRecord};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "docsync",
    about = "Synchronize C# documentation comments between source files and a documentation dump"
)]
struct Cli {
    /// Log every extracted, stored and updated signature
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Write documentation, attributes and signatures to a dump.
    Extract {
        /// Input files (glob patterns and directories supported)
        #[arg(required = true)]
        files: Vec<String>,

        /// Output file, or an existing directory for one dump per input.
        /// Defaults to stdout.
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Output format: dump (default), json
        #[arg(short = 'f', long, default_value = "dump")]
        format: String,
    },
    /// Merge documentation from a dump into a source file.
    Apply {
        /// C# source file to update
        source: PathBuf,

        /// Dump to read documentation from (defaults to the source file itself)
        #[arg(short = 'd', long = "doc-file")]
        doc_file: Option<PathBuf>,

        /// Output file. Defaults to stdout.
        #[arg(short = 'o', long, conflicts_with = "in_place")]
        output: Option<PathBuf>,

        /// Overwrite the source file
        #[arg(long)]
        in_place: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match cli.command {
        Command::Extract {
            files,
            output,
            format,
        } => extract_mode(&files, output.as_deref(), &format),
        Command::Apply {
            source,
            doc_file,
            output,
            in_place,
        } => {
            let target = if in_place { Some(source.clone()) } else { output };
            apply_mode(&source, doc_file.as_deref(), target.as_deref())
        }
    }
}

/// Logs go to stderr. `RUST_LOG` wins unless `--verbose` is given.
fn init_logging(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

/// extract: parse every input in export mode and render the records.
fn extract_mode(patterns: &[String], output: Option<&Path>, format: &str) -> Result<()> {
    let renderer = render::create_renderer(format)?;
    let input_files = expand_globs(patterns)?;
    if input_files.is_empty() {
        bail!("no input files matched");
    }
    let mut parser = SourceParser::new()?;

    // One dump per input when writing into a directory
    if let Some(dir) = output.filter(|p| p.is_dir()) {
        for path in &input_files {
            let records = extract_file(&mut parser, path)?;
            let out_path = dir.join(format!(
                "{}.{}",
                derive_output_name(path),
                renderer.file_extension()
            ));
            write_output(Some(&out_path), &renderer.render(&records)?)?;
        }
        return Ok(());
    }

    let mut records = Vec::new();
    for path in &input_files {
        records.extend(extract_file(&mut parser, path)?);
    }
    write_output(output, &renderer.render(&records)?)
}

fn extract_file(parser: &mut SourceParser, path: &Path) -> Result<Vec<DeclarationRecord>> {
    let content =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    tracing::info!(file = %path.display(), "extracting");
    parser::extract_source(parser, &content, ExtractMode::Export)
        .with_context(|| format!("failed to parse {}", path.display()))
}

/// apply: merge the dump into the source and write the result once.
fn apply_mode(source_path: &Path, doc_file: Option<&Path>, target: Option<&Path>) -> Result<()> {
    let source = fs::read_to_string(source_path)
        .with_context(|| format!("failed to read {}", source_path.display()))?;

    let doc_path = doc_file.unwrap_or(source_path);
    let dump_text = if doc_path == source_path {
        source.clone()
    } else {
        fs::read_to_string(doc_path)
            .with_context(|| format!("failed to read {}", doc_path.display()))?
    };

    let mut dictionary = dump::parse(&dump_text);
    if dictionary.is_empty() {
        tracing::warn!(
            doc_file = %doc_path.display(),
            "no documentation parsed from doc file, source left unchanged"
        );
        return write_output(target, &source);
    }

    let mut parser = SourceParser::new()?;
    let records = parser::extract_source(&mut parser, &source, ExtractMode::Import)
        .with_context(|| format!("failed to parse {}", source_path.display()))?;
    let updated = splice::apply(&source, &records, &mut dictionary);

    write_output(target, &updated)
}

/// Write to `path`, or to stdout when no path is given.
fn write_output(path: Option<&Path>, content: &str) -> Result<()> {
    match path {
        Some(path) => fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display())),
        None => {
            let mut stdout = io::stdout().lock();
            stdout
                .write_all(content.as_bytes())
                .context("failed to write stdout")?;
            stdout.flush().context("failed to write stdout")
        }
    }
}

/// Extension of the C# sources picked up from directory arguments.
const SOURCE_EXTENSION: &str = "cs";

/// Turn a command-line argument into a glob: a directory means its `.cs` files
/// (non-recursive), anything else is taken as a pattern.
fn source_pattern(arg: &str) -> String {
    let path = Path::new(arg);
    if path.is_dir() {
        let dir = glob::Pattern::escape(&path.to_string_lossy());
        format!("{}/*.{}", dir.trim_end_matches('/'), SOURCE_EXTENSION)
    } else {
        arg.to_string()
    }
}

/// Resolve file, directory and glob arguments into a sorted, deduplicated list
/// of source files.
fn expand_globs(patterns: &[String]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for arg in patterns {
        if Path::new(arg).is_file() {
            files.push(PathBuf::from(arg));
            continue;
        }
        let pattern = source_pattern(arg);
        let before = files.len();
        let entries = glob::glob(&pattern)
            .with_context(|| format!("invalid glob pattern: {}", pattern))?;
        for entry in entries {
            match entry {
                Ok(path) if path.is_file() => files.push(path),
                Ok(_) => {}
                Err(err) => tracing::warn!(%err, "skipped unreadable path"),
            }
        }
        if files.len() == before {
            tracing::warn!(%pattern, "no files matched");
        }
    }
    files.sort();
    files.dedup();
    Ok(files)
}

/// Derive the output file name (without extension) from a source path.
/// "src/Widget.cs" → "Widget"
fn derive_output_name(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string_lossy().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_name_from_cs() {
        assert_eq!(derive_output_name(Path::new("src/Widget.cs")), "Widget");
        assert_eq!(derive_output_name(Path::new("Widget.cs")), "Widget");
    }

    #[test]
    fn output_name_no_extension() {
        assert_eq!(derive_output_name(Path::new("Makefile")), "Makefile");
    }

    #[test]
    fn directory_argument_becomes_cs_pattern() {
        let dir = tempfile::TempDir::new().unwrap();
        let arg = dir.path().to_string_lossy().to_string();
        assert!(source_pattern(&arg).ends_with("/*.cs"));
        assert_eq!(source_pattern("src/**/*.cs"), "src/**/*.cs");
    }

    #[test]
    fn directories_scan_only_cs_files() {
        let dir = tempfile::TempDir::new().unwrap();
        fs::write(dir.path().join("B.cs"), "class B { }").unwrap();
        fs::write(dir.path().join("A.cs"), "class A { }").unwrap();
        fs::write(dir.path().join("notes.txt"), "x").unwrap();

        let files = expand_globs(&[dir.path().to_string_lossy().to_string()]).unwrap();
        let names: Vec<String> = files.iter().map(|p| derive_output_name(p)).collect();
        assert_eq!(names, vec!["A", "B"]);
    }
}
