//! Partial Render CLI
//!
//! Usage:
//!   partial-render [OPTIONS] [PARTIAL]
//!
//! Options:
//!   -t, --templates <DIR>    Template root directory
//!   -c, --config <FILE>      Renderer configuration (TOML format)
//!   -d, --data <FILE>        Locals (TOML format; tables with `_type` are objects)
//!   -h, --help               Print help

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use partial_render::{
    FileSystemLookup, Locals, PartialOptions, PartialPathCache, PartialRenderer, RendererConfig,
    Value,
};

#[derive(Parser)]
#[command(name = "partial-render")]
#[command(about = "Render partial templates for objects and collections")]
struct Cli {
    /// Partial path to render (omit with --from-local)
    partial: Option<String>,

    /// Template root directory
    #[arg(short, long, default_value = ".")]
    templates: PathBuf,

    /// Renderer configuration file (TOML format)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Locals file (TOML format)
    #[arg(short, long)]
    data: Option<PathBuf>,

    /// Render the partial once per element of this local
    #[arg(long)]
    collection: Option<String>,

    /// Bind this local as the partial's object
    #[arg(long)]
    object: Option<String>,

    /// Render this local by naming convention (object or collection)
    #[arg(long)]
    from_local: Option<String>,

    /// Variable name the object is bound to
    #[arg(long = "as")]
    as_name: Option<String>,

    /// Layout wrapped around the rendered partial
    #[arg(short, long)]
    layout: Option<String>,

    /// Partial rendered between collection elements
    #[arg(short, long)]
    spacer: Option<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => match RendererConfig::from_file(path) {
            Ok(c) => c,
            Err(e) => {
                eprintln!("Error loading config '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RendererConfig::default(),
    };

    let locals = match &cli.data {
        Some(path) => match load_locals(path) {
            Ok(locals) => locals,
            Err(message) => {
                eprintln!("Error loading data '{}': {}", path.display(), message);
                std::process::exit(1);
            }
        },
        None => Locals::new(),
    };

    let options = match build_options(&cli, locals) {
        Ok(options) => options,
        Err(message) => {
            eprintln!("Error: {}", message);
            std::process::exit(1);
        }
    };

    let lookup = FileSystemLookup::from_config(&cli.templates, &config);
    let renderer =
        PartialRenderer::new(Arc::new(lookup), Arc::new(PartialPathCache::new())).with_config(config);

    match renderer.render(&renderer.view(), options) {
        Ok(Some(output)) => println!("{}", output),
        Ok(None) => {}
        Err(e) => {
            eprintln!("Error: {}", e.report());
            std::process::exit(1);
        }
    }
}

/// Read a TOML file whose top-level table becomes the locals
fn load_locals(path: &Path) -> Result<Locals, String> {
    let content = fs::read_to_string(path).map_err(|e| e.to_string())?;
    let table: toml::Table = toml::from_str(&content).map_err(|e| e.to_string())?;
    Ok(table
        .into_iter()
        .map(|(key, value)| (key, Value::from(value)))
        .collect())
}

fn take_local(locals: &Locals, key: &str) -> Result<Value, String> {
    locals
        .get(key)
        .cloned()
        .ok_or_else(|| format!("no local named '{}' in the data file", key))
}

fn build_options(cli: &Cli, locals: Locals) -> Result<PartialOptions, String> {
    let mut options = match (&cli.partial, &cli.from_local) {
        (Some(path), None) => PartialOptions::path(path.clone()),
        (None, Some(key)) => PartialOptions::value(take_local(&locals, key)?),
        (Some(_), Some(_)) => return Err("give either a partial path or --from-local, not both".to_string()),
        (None, None) => return Err("a partial path or --from-local is required".to_string()),
    };

    if let Some(key) = &cli.collection {
        options = options.with_collection(take_local(&locals, key)?);
    }
    if let Some(key) = &cli.object {
        options = options.with_object(take_local(&locals, key)?);
    }
    if let Some(name) = &cli.as_name {
        options = options.with_as(name.clone());
    }
    if let Some(layout) = &cli.layout {
        options = options.with_layout(layout.clone());
    }
    if let Some(spacer) = &cli.spacer {
        options = options.with_spacer_template(spacer.clone());
    }

    Ok(options.with_locals(locals))
}
