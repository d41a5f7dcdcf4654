//! `jsondata` CLI: convert, query and merge documents from the command line.
//!
//! ## Usage
//!
//! ```sh
//! # JSON on stdin to XML on stdout
//! echo '{"note":{"to":"Tove"}}' | jsondata convert --to xml
//!
//! # Convert between files, formats taken from the extensions
//! jsondata convert -i people.csv -o people.json
//!
//! # Look up a dot-path
//! jsondata get user.address.city -i user.json
//!
//! # Remove nested keys (empty parents are pruned)
//! jsondata remove user.address.zip -i user.json
//!
//! # Merge files, collecting colliding values into lists
//! jsondata merge a.json b.json --policy Combine
//!
//! # List the collision policy names
//! jsondata options
//! ```
//!
//! Logging goes to stderr and is controlled with `RUST_LOG`
//! (e.g. `RUST_LOG=jsondata_core=debug`).

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use jsondata_core::{ConflictPolicy, Document, Format, Value};
use std::io::{self, Read};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "jsondata",
    version,
    about = "Ordered, dot-path addressable documents over JSON, XML and CSV"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert a document between JSON, XML and CSV
    Convert {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Print the value at a key or dot-path
    Get {
        /// Key or dot-path to look up
        path: String,
        #[command(flatten)]
        input: InputArgs,
        /// Treat the path as a literal key (no dot-path descent)
        #[arg(long)]
        flat: bool,
    },
    /// Remove keys or dot-paths from a document
    Remove {
        /// Keys or dot-paths to remove
        #[arg(required = true)]
        paths: Vec<String>,
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
        /// Treat the paths as literal keys (no dot-path descent)
        #[arg(long)]
        flat: bool,
    },
    /// Merge documents from several files, in order
    Merge {
        /// Files to merge; the first is the primary document
        #[arg(required = true)]
        files: Vec<PathBuf>,
        /// Collision policy: None, Update or Combine
        #[arg(long, default_value = "None")]
        policy: ConflictPolicy,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// Sort a document's top-level keys
    SortKeys {
        #[command(flatten)]
        input: InputArgs,
        #[command(flatten)]
        output: OutputArgs,
    },
    /// List the collision policy names
    Options,
}

#[derive(Args)]
struct InputArgs {
    /// Input file (reads from stdin if omitted)
    #[arg(short, long)]
    input: Option<PathBuf>,
    /// Input format; defaults to JSON on stdin. A file's extension must match it
    #[arg(long)]
    from: Option<Format>,
}

#[derive(Args)]
struct OutputArgs {
    /// Output file (writes to stdout if omitted)
    #[arg(short, long)]
    output: Option<PathBuf>,
    /// Output format; defaults to JSON on stdout. A file's extension must match it
    #[arg(long)]
    to: Option<Format>,
    /// Root element name for XML output
    #[arg(long)]
    root: Option<String>,
    /// Write JSON without whitespace
    #[arg(long)]
    compact: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Convert { input, output } => {
            let value = read_input(&input)?;
            write_output(&output, &value)?;
        }
        Commands::Get { path, input, flat } => {
            let doc = into_document(read_input(&input)?)?;
            let value = doc
                .get_path(&path, !flat)
                .with_context(|| format!("Failed to look up {path:?}"))?;
            match value {
                Value::Document(_) | Value::List(_) => println!("{value:#}"),
                scalar => println!("{scalar}"),
            }
        }
        Commands::Remove {
            paths,
            input,
            output,
            flat,
        } => {
            let doc = into_document(read_input(&input)?)?;
            let removed = doc
                .remove(paths.as_slice(), !flat)
                .context("Failed to remove keys")?;
            write_output(&output, &Value::Document(removed))?;
        }
        Commands::Merge {
            files,
            policy,
            output,
        } => {
            let mut docs = files
                .iter()
                .map(|path| {
                    let value = jsondata_core::read_file(path)
                        .with_context(|| format!("Failed to read {}", path.display()))?;
                    into_document(value)
                })
                .collect::<Result<Vec<_>>>()?;
            let primary = docs.remove(0);
            tracing::info!(files = files.len(), policy = %policy, "merging documents");
            let merged = primary
                .merge(&docs, policy)
                .with_context(|| format!("Failed to merge with the {policy} option"))?;
            write_output(&output, &Value::Document(merged))?;
        }
        Commands::SortKeys { input, output } => {
            let doc = into_document(read_input(&input)?)?;
            write_output(&output, &Value::Document(doc.sort_keys()))?;
        }
        Commands::Options => {
            for (name, policy) in ConflictPolicy::options() {
                println!("{name}\t{policy:?}");
            }
        }
    }

    Ok(())
}

fn read_input(args: &InputArgs) -> Result<Value> {
    match (&args.input, args.from) {
        (Some(path), None) => jsondata_core::read_file(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        (Some(path), Some(format)) => jsondata_core::read_file_as(path, format)
            .with_context(|| format!("Failed to read {format} file: {}", path.display())),
        (None, format) => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            parse_as(format.unwrap_or(Format::Json), &buf)
        }
    }
}

fn parse_as(format: Format, text: &str) -> Result<Value> {
    format
        .parse(text)
        .with_context(|| format!("Failed to parse {format} input"))
}

fn write_output(args: &OutputArgs, value: &Value) -> Result<()> {
    let root = args.root.as_deref();
    match &args.output {
        Some(path) => {
            let format = match args.to {
                Some(format) => format,
                None => Format::from_path(path)?,
            };
            jsondata_core::write_file_as(path, format, value, root, args.compact)
                .with_context(|| format!("Failed to write file: {}", path.display()))
        }
        None => {
            let format = args.to.unwrap_or(Format::Json);
            let text = format
                .render(value, root, args.compact)
                .with_context(|| format!("Failed to render {format} output"))?;
            if text.ends_with('\n') {
                print!("{text}");
            } else {
                println!("{text}");
            }
            Ok(())
        }
    }
}

fn into_document(value: Value) -> Result<Document> {
    match value {
        Value::Document(doc) => Ok(doc),
        other => bail!("Expected a document, found {}", other.type_name()),
    }
}
