//! proto2ts CLI
//!
//! Command-line interface for compiling `.proto` files into TypeScript
//! declarations and inspecting the intermediate stages.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use proto2ts::report::render_all;
use proto2ts::{compile, parse_source, CompileOptions, Diagnostic, ProjectConfig};
use proto2ts_parser::descriptor::encode_descriptor_set;
use proto2ts_parser::tokenize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "proto2ts")]
#[command(version, about = "Compile Protocol Buffers definitions into TypeScript declarations", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a .proto file to TypeScript declarations
    #[command(after_help = "EXAMPLES:\n  \
        # Print declarations to stdout\n  \
        proto2ts compile person.proto\n\n  \
        # Write to a file with 4-space indentation\n  \
        proto2ts compile person.proto -o person.ts --indent 4\n\n  \
        # Resolve imports through a project config\n  \
        proto2ts compile api/v1/store.proto --config proto2ts.yaml")]
    Compile {
        /// Path to the .proto file
        input: PathBuf,

        /// Output file (stdout if not specified)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Spaces per indentation level (overrides the config file)
        #[arg(long)]
        indent: Option<usize>,

        /// Project config file (YAML)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Print the token stream of a .proto file as JSON
    Tokens {
        /// Path to the .proto file
        input: PathBuf,
    },

    /// Print the parsed AST of a .proto file as JSON
    Ast {
        /// Path to the .proto file
        input: PathBuf,
    },

    /// Write a FileDescriptorSet for a .proto file
    #[command(after_help = "EXAMPLES:\n  \
        proto2ts descriptor store.proto -o store.pb --name acme/store/v1/store.proto")]
    Descriptor {
        /// Path to the .proto file
        input: PathBuf,

        /// Output file for the encoded descriptor set
        #[arg(short, long)]
        output: PathBuf,

        /// File name recorded in the descriptor (defaults to the input path)
        #[arg(long)]
        name: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(level)
        .parse_default_env()
        .init();

    match cli.command {
        Commands::Compile {
            input,
            output,
            indent,
            config,
        } => compile_command(
            &input,
            output.as_deref(),
            indent,
            config.as_deref(),
            cli.verbose,
        ),
        Commands::Tokens { input } => tokens_command(&input),
        Commands::Ast { input } => ast_command(&input),
        Commands::Descriptor {
            input,
            output,
            name,
        } => descriptor_command(&input, &output, name.as_deref()),
    }
}

fn compile_command(
    input: &Path,
    output: Option<&Path>,
    indent: Option<usize>,
    config: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let source = read_source(input)?;

    let mut options = match config {
        Some(path) => {
            let config = ProjectConfig::load(path)
                .with_context(|| format!("Failed to load config {}", path.display()))?;
            CompileOptions::from_config(&config)
        }
        None => CompileOptions::default(),
    };
    if let Some(indent) = indent {
        anyhow::ensure!(indent > 0, "--indent must be at least 1");
        options = options.with_indent_size(indent);
    }

    if verbose {
        eprintln!("{} Compiling {}", "→".cyan(), input.display());
        eprintln!("  Indent: {}", options.indent_size);
    }

    let result = compile(&source, &options);
    if !result.is_ok() {
        return report_failure(&result.errors, &source, input);
    }

    match output {
        Some(path) => {
            fs::write(path, &result.code)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            eprintln!("{} Wrote {}", "✓".green(), path.display());
        }
        None => print!("{}", result.code),
    }

    Ok(())
}

fn tokens_command(input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let lexed = tokenize(&source);

    if !lexed.errors.is_empty() {
        let errors: Vec<Diagnostic> = lexed.errors.iter().map(Diagnostic::from).collect();
        return report_failure(&errors, &source, input);
    }

    let json = serde_json::to_string_pretty(&lexed.tokens).context("Failed to serialize tokens")?;
    println!("{}", json);
    Ok(())
}

fn ast_command(input: &Path) -> Result<()> {
    let source = read_source(input)?;
    let file = match parse_source(&source) {
        Ok(file) => file,
        Err(errors) => return report_failure(&errors, &source, input),
    };

    let json = serde_json::to_string_pretty(&file).context("Failed to serialize AST")?;
    println!("{}", json);
    Ok(())
}

fn descriptor_command(input: &Path, output: &Path, name: Option<&str>) -> Result<()> {
    let source = read_source(input)?;
    let file = match parse_source(&source) {
        Ok(file) => file,
        Err(errors) => return report_failure(&errors, &source, input),
    };

    let default_name = input.to_string_lossy();
    let name = name.unwrap_or(&default_name);
    let bytes = encode_descriptor_set(&file, name);

    fs::write(output, &bytes)
        .with_context(|| format!("Failed to write {}", output.display()))?;
    eprintln!(
        "{} Wrote descriptor set for {} ({} bytes) to {}",
        "✓".green(),
        name.yellow(),
        bytes.len(),
        output.display()
    );
    Ok(())
}

fn read_source(input: &Path) -> Result<String> {
    log::debug!("reading {}", input.display());
    fs::read_to_string(input).with_context(|| format!("Failed to read {}", input.display()))
}

/// Print rendered diagnostics to stderr and fail with a summary
fn report_failure(errors: &[Diagnostic], source: &str, input: &Path) -> Result<()> {
    let filename = input.display().to_string();
    eprint!("{}", render_all(errors, source, &filename));
    anyhow::bail!(
        "could not compile {} ({} error{})",
        filename,
        errors.len(),
        if errors.len() == 1 { "" } else { "s" }
    )
}
