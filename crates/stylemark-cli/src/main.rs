use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "stylemark")]
#[command(about = "stylemark: turn commented SCSS into HTML documents")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a .scss file, or every .scss/.css file in a directory, to HTML
    Build {
        /// Input file or directory
        path: PathBuf,

        /// Indent nested elements by two spaces per level
        #[arg(long)]
        indent: bool,

        /// Do not write the <name>.json syntax tree dump
        #[arg(long)]
        no_ast: bool,

        /// Write output files here instead of next to each input
        #[arg(long, value_name = "DIR")]
        out_dir: Option<PathBuf>,
    },

    /// Check files for parse errors without generating output
    Check {
        /// Input file or directory
        path: PathBuf,
    },
}

/// Options for `build`.
#[derive(Debug, Clone, Default)]
struct BuildOptions {
    indent: bool,
    ast: bool,
    out_dir: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Command::Build {
            path,
            indent,
            no_ast,
            out_dir,
        } => {
            let options = BuildOptions {
                indent,
                ast: !no_ast,
                out_dir,
            };
            cmd_build(&path, &options)
        }
        Command::Check { path } => cmd_check(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

/// The files a command works on: `path` itself, or the stylesheets directly
/// inside it, sorted by name.
fn collect_inputs(path: &Path) -> Result<Vec<PathBuf>> {
    if !path.exists() {
        bail!("file not found: {}", path.display());
    }

    if !path.is_dir() {
        return Ok(vec![path.to_path_buf()]);
    }

    let entries = fs::read_dir(path)
        .with_context(|| format!("Failed to read directory {}", path.display()))?;

    let mut inputs = Vec::new();
    for entry in entries {
        let entry_path = entry?.path();
        let is_stylesheet = entry_path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext == "scss" || ext == "css");
        if entry_path.is_file() && is_stylesheet {
            inputs.push(entry_path);
        }
    }
    inputs.sort();

    if inputs.is_empty() {
        log::warn!("No .scss or .css files in {}", path.display());
    }

    Ok(inputs)
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
}

fn cmd_build(path: &Path, options: &BuildOptions) -> Result<()> {
    if let Some(dir) = &options.out_dir {
        fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory {}", dir.display()))?;
    }

    for input in collect_inputs(path)? {
        let html_path = build_file(&input, options)?;
        eprintln!("Built: {}", html_path.display());
    }

    Ok(())
}

/// Convert one file; returns the path of the written HTML.
fn build_file(input: &Path, options: &BuildOptions) -> Result<PathBuf> {
    let source = read_source(input)?;

    log::info!("{}", progress("Parsing", input, source.len()));
    let output = stylemark_codegen::transform_with_ast(&source, options.indent)
        .with_context(|| format!("Failed to parse {}", input.display()))?;

    let stem = input
        .file_stem()
        .and_then(|s| s.to_str())
        .with_context(|| format!("Invalid file name: {}", input.display()))?;
    let dir = match &options.out_dir {
        Some(dir) => dir.as_path(),
        None => input.parent().unwrap_or(Path::new(".")),
    };

    let html_path = dir.join(format!("{stem}.html"));
    log::info!("{}", progress("Writing HTML to", &html_path, output.html.len()));
    fs::write(&html_path, &output.html)
        .with_context(|| format!("Failed to write {}", html_path.display()))?;

    if options.ast {
        let json_path = dir.join(format!("{stem}.json"));
        let json = output.ast.to_json().context("Failed to serialize syntax tree")?;
        log::info!("{}", progress("Writing AST JSON to", &json_path, json.len()));
        fs::write(&json_path, json)
            .with_context(|| format!("Failed to write {}", json_path.display()))?;
    }

    Ok(html_path)
}

/// A log line such as `Parsing card.scss (18 bytes)`.
fn progress(action: &str, path: &Path, bytes: usize) -> String {
    format!("{action} {} ({bytes} bytes)", path.display())
}

fn cmd_check(path: &Path) -> Result<()> {
    for input in collect_inputs(path)? {
        let source = read_source(&input)?;
        stylemark_parser::Parser::parse(&source)
            .with_context(|| format!("Failed to parse {}", input.display()))?;
        eprintln!("OK: {}", input.display());
    }

    Ok(())
}
