//! Command-line interface for wikitok
//! This binary tokenizes wikitext files and prints the token tree in different formats.
//!
//! Usage:
//!   wikitok tokens `<path>` [--format `<format>`] [--config `<file>`]  - Tokenize a file
//!   wikitok list-formats                                        - List all available formats
//!
//! Log output goes to stderr and is filtered by the `WIKITOK_LOG` environment variable
//! (e.g. `WIKITOK_LOG=debug`). The default level is `warn`.

use clap::{Arg, Command};
use tracing_subscriber::EnvFilter;
use wikitok::wikitext::config::Loader;
use wikitok::wikitext::formats::FormatRegistry;
use wikitok::wikitext::tokenize_with_config;

fn main() {
    init_logging();

    let matches = Command::new("wikitok")
        .version(env!("CARGO_PKG_VERSION"))
        .about("A tool for inspecting how wikitext is tokenized")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(
            Command::new("tokens")
                .about("Tokenize a wikitext file and print the tokens")
                .arg(
                    Arg::new("path")
                        .help("Path to the wikitext file")
                        .required(true)
                        .index(1),
                )
                .arg(
                    Arg::new("format")
                        .long("format")
                        .short('f')
                        .help("Output format (e.g., 'treeviz', 'json')")
                        .default_value("treeviz"),
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .short('c')
                        .help("TOML file layered over the built-in defaults"),
                ),
        )
        .subcommand(Command::new("list-formats").about("List available output formats"))
        .get_matches();

    match matches.subcommand() {
        Some(("tokens", tokens_matches)) => {
            let path = tokens_matches.get_one::<String>("path").unwrap();
            let format = tokens_matches.get_one::<String>("format").unwrap();
            let config = tokens_matches.get_one::<String>("config");
            handle_tokens_command(path, format, config.map(String::as_str));
        }
        Some(("list-formats", _)) => {
            handle_list_formats_command();
        }
        _ => unreachable!(),
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_env("WIKITOK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Handle the tokens command
fn handle_tokens_command(path: &str, format: &str, config_path: Option<&str>) {
    let mut loader = Loader::new();
    if let Some(config_path) = config_path {
        loader = loader.with_file(config_path);
    }
    let config = loader.build().unwrap_or_else(|e| {
        eprintln!("Error loading configuration: {}", e);
        std::process::exit(1);
    });

    let source = std::fs::read_to_string(path).unwrap_or_else(|e| {
        eprintln!("Error reading file: {}", e);
        std::process::exit(1);
    });

    let chunk = tokenize_with_config(&source, config).unwrap_or_else(|e| {
        eprintln!("Tokenize error: {}", e);
        std::process::exit(1);
    });

    let output = FormatRegistry::with_defaults()
        .serialize(&chunk, format)
        .unwrap_or_else(|e| {
            eprintln!("Format error: {}", e);
            std::process::exit(1);
        });

    print!("{}", output);
}

/// Handle the list-formats command
fn handle_list_formats_command() {
    let registry = FormatRegistry::with_defaults();
    println!("Available formats:\n");
    for name in registry.list_formats() {
        println!("  {}", name);
        if let Some(formatter) = registry.get(&name) {
            println!("    {}", formatter.description());
        }
    }
}
