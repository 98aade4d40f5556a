//! `jsonisator` CLI: render sample graphs, and parse, reformat, or check JSON
//! documents against the bundled domain model.
//!
//! ## Usage
//!
//! ```sh
//! # Write one sample customer to result.json
//! jsonisator sample -o result.json
//!
//! # Append three more customers to the same file
//! jsonisator sample -o result.json --append --count 3
//!
//! # Parse a customer document and print the populated instance
//! jsonisator parse --type customer -i result.json
//!
//! # Normalize a batch of products (stdin → stdout)
//! cat products.json | jsonisator reformat --type product --many
//!
//! # Check JSON syntax only
//! jsonisator check -i result.json
//! ```
//!
//! Logs go to stderr; set `RUST_LOG=debug` for more detail.

mod model;
mod sink;

use std::fmt::Debug;
use std::io::{self, Read};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use jsonisator_core::{parse, parse_many, parse_value, render, render_many, Record};
use tracing_subscriber::EnvFilter;

use crate::model::{sample_customer, Customer, Model, Order, Product};
use crate::sink::JsonSink;

#[derive(Parser)]
#[command(
    name = "jsonisator",
    version,
    about = "Descriptor-driven object graph to JSON mapper"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render sample customers with random identifiers
    Sample {
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Append to the output file instead of replacing it
        #[arg(long, requires = "output")]
        append: bool,
        /// Number of customers to generate
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Parse a document and print the populated instance
    Parse {
        /// Type the document describes
        #[arg(long = "type", value_enum)]
        kind: Kind,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Accept an array of instances
        #[arg(long)]
        many: bool,
    },
    /// Parse a document and render it again
    Reformat {
        /// Type the document describes
        #[arg(long = "type", value_enum)]
        kind: Kind,
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
        /// Output file (writes to stdout if omitted)
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Accept an array of instances
        #[arg(long)]
        many: bool,
    },
    /// Check JSON syntax without mapping to a type
    Check {
        /// Input file (reads from stdin if omitted)
        #[arg(short, long)]
        input: Option<PathBuf>,
    },
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Kind {
    Customer,
    Order,
    Product,
    Model,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    match cli.command {
        Commands::Sample {
            output,
            append,
            count,
        } => {
            let customers: Vec<Customer> = (0..count).map(sample_customer).collect();
            match output {
                Some(path) => {
                    let mut sink = JsonSink::new(path, append);
                    for customer in customers {
                        sink.write(customer);
                    }
                    tracing::debug!(count = sink.len(), "buffered samples");
                    sink.flush()
                        .with_context(|| format!("Failed to flush to {}", sink.path().display()))?;
                }
                None => {
                    let text = render_many(&customers).context("Failed to render samples")?;
                    write_output(None, &text)?;
                }
            }
        }
        Commands::Parse { kind, input, many } => {
            let text = read_input(input.as_ref())?;
            let debug = match kind {
                Kind::Customer => debug_form::<Customer>(&text, many)?,
                Kind::Order => debug_form::<Order>(&text, many)?,
                Kind::Product => debug_form::<Product>(&text, many)?,
                Kind::Model => debug_form::<Model>(&text, many)?,
            };
            println!("{}", debug);
        }
        Commands::Reformat {
            kind,
            input,
            output,
            many,
        } => {
            let text = read_input(input.as_ref())?;
            let rendered = match kind {
                Kind::Customer => reformat::<Customer>(&text, many)?,
                Kind::Order => reformat::<Order>(&text, many)?,
                Kind::Product => reformat::<Product>(&text, many)?,
                Kind::Model => reformat::<Model>(&text, many)?,
            };
            write_output(output.as_ref(), &rendered)?;
        }
        Commands::Check { input } => {
            let text = read_input(input.as_ref())?;
            match parse_value(&text) {
                Ok(_) => println!("valid JSON ({} bytes)", text.len()),
                Err(err) => {
                    tracing::warn!(error = %err, "syntax check failed");
                    return Err(err).context("Invalid JSON");
                }
            }
        }
    }

    Ok(())
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

fn load<T: Record>(text: &str, many: bool) -> Result<Vec<T>> {
    let type_name = T::descriptor()
        .map(|d| d.name().to_string())
        .context("Failed to describe type")?;
    let instances = if many {
        parse_many::<T>(text)
    } else {
        parse::<T>(text).map(|instance| vec![instance])
    }
    .with_context(|| format!("Failed to parse {}", type_name))?;
    tracing::debug!(type_name = %type_name, count = instances.len(), "parsed");
    Ok(instances)
}

fn debug_form<T: Record + Debug>(text: &str, many: bool) -> Result<String> {
    let instances = load::<T>(text, many)?;
    Ok(match instances.as_slice() {
        [single] if !many => format!("{:#?}", single),
        all => format!("{:#?}", all),
    })
}

fn reformat<T: Record>(text: &str, many: bool) -> Result<String> {
    let instances = load::<T>(text, many)?;
    if many {
        render_many(&instances).context("Failed to render document")
    } else {
        instances
            .first()
            .map(render)
            .transpose()
            .context("Failed to render document")?
            .context("No instance parsed")
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read file: {}", path.display())),
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

fn write_output(path: Option<&PathBuf>, content: &str) -> Result<()> {
    match path {
        Some(path) => {
            std::fs::write(path, content)
                .with_context(|| format!("Failed to write file: {}", path.display()))?;
        }
        None => {
            print!("{}", content);
        }
    }
    Ok(())
}
