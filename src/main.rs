//! bracecfg CLI
//!
//! Entry point for the `bracecfg` inspection tool.

use bracecfg::tokenizer::{render, Tokenizer};
use bracecfg::{Config, ParseOptions, Schema};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};
use std::process;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "bracecfg")]
#[command(about = "Parse brace-nested configuration strings against a schema", version)]
struct Cli {
    /// Enable debug logging (RUST_LOG takes precedence)
    #[arg(long, short = 'v', global = true)]
    verbose: bool,

    /// Maximum group nesting depth
    #[arg(long, global = true, default_value_t = ParseOptions::default().max_depth)]
    max_depth: usize,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Parse a configuration string and print the resulting config
    Parse {
        /// Path to the schema description (JSON)
        #[arg(long, short = 's')]
        schema: PathBuf,

        /// Lower-precedence configuration strings, applied in order
        #[arg(long, short = 'l')]
        layer: Vec<String>,

        /// The configuration string
        input: String,
    },

    /// Print the entry tree of a configuration string
    Tokens {
        /// The configuration string
        input: String,
    },

    /// Print the flattened schema
    Schema {
        /// Path to the schema description (JSON)
        #[arg(long, short = 's')]
        schema: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let options = ParseOptions {
        max_depth: cli.max_depth,
    };

    match cli.command {
        Commands::Parse {
            schema,
            layer,
            input,
        } => run_parse(&schema, &layer, &input, &options),
        Commands::Tokens { input } => run_tokens(&input, &options),
        Commands::Schema { schema } => run_schema(&schema),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run_parse(schema_path: &Path, layers: &[String], input: &str, options: &ParseOptions) {
    let schema = match load_schema(schema_path) {
        Ok(s) => Arc::new(s),
        Err(e) => {
            eprintln!("Error loading schema: {}", e);
            process::exit(1);
        }
    };

    let mut config = match Config::parse_with(schema, input, options) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    };

    for layer in layers {
        if let Err(e) = config.layer_with(layer, options) {
            eprintln!("Parse error in layer '{}': {}", layer, e);
            process::exit(1);
        }
    }

    print_json(&serde_json::json!({
        "config": config.to_json(),
        "unparsed": config.unparsed(),
    }));
}

fn run_tokens(input: &str, options: &ParseOptions) {
    let tokenizer = Tokenizer::new().with_max_depth(options.max_depth);

    match tokenizer.tokenize(input) {
        Ok(tokenized) => print_json(&serde_json::json!({
            "entries": tokenized.entries,
            "rendered": render(&tokenized.entries),
            "unparsed": tokenized.unparsed,
        })),
        Err(e) => {
            eprintln!("Parse error: {}", e);
            process::exit(1);
        }
    }
}

fn run_schema(schema_path: &Path) {
    match load_schema(schema_path) {
        Ok(schema) => {
            for (path, field) in schema.paths() {
                let mut line = format!("{:<32} {}", path, field.kind);
                if let Some(ref default) = field.default {
                    line.push_str(&format!(" = {}", default));
                }
                if let Some(ref sub_key) = field.default_sub_key {
                    line.push_str(&format!(" (default key: {})", sub_key));
                }
                println!("{}", line);
            }
        }
        Err(e) => {
            eprintln!("Error loading schema: {}", e);
            process::exit(1);
        }
    }
}

fn load_schema(path: &Path) -> Result<Schema, String> {
    let text = fs::read_to_string(path).map_err(|e| format!("{}: {}", path.display(), e))?;
    Schema::from_json_str(&text).map_err(|e| format!("{}: {}", path.display(), e))
}

fn print_json(value: &serde_json::Value) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => println!("{}", json),
        Err(e) => {
            eprintln!("Error serializing output: {}", e);
            process::exit(1);
        }
    }
}
