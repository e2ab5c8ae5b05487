use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::Parser;
use fpp::ast::{merge_namespaces, Namespace};
use fpp::config::{Configuration, KindRegistry};
use fpp::definition::DefinitionCollection;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Compiles FPP type definitions and prints the generated class descriptors as JSON
#[derive(Parser)]
#[command(version, author = "Jan P. <honza.spacir1@gmail.com>")]
struct Opts {
    /// `.fpp` file or directory to scan
    path: PathBuf,
    /// JSON file with output path templates
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    pretty: bool,
}

fn load_config(path: Option<&Path>) -> Result<Configuration> {
    match path {
        Some(path) => Configuration::from_json_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display())),
        None => Ok(Configuration::default()),
    }
}

/// Parses every file, logging the ones that fail. Returns the namespaces
/// found and the number of failed files.
fn parse_all(files: &[PathBuf], registry: &KindRegistry) -> (Vec<Namespace>, usize) {
    let mut namespaces = Vec::new();
    let mut failed = 0;
    for file in files {
        match fpp::parse_file(file, registry) {
            Ok(parsed) => {
                tracing::debug!(path = %file.display(), namespaces = parsed.len(), "parsed file");
                namespaces.extend(parsed);
            }
            Err(err) => {
                tracing::error!(path = %file.display(), "{}", err);
                failed += 1;
            }
        }
    }
    (namespaces, failed)
}

fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "fpp=info".into()))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let opts = Opts::parse();
    let config = load_config(opts.config.as_deref())?;

    let files = fpp::scan::scan(&opts.path);
    if files.is_empty() {
        bail!("No .fpp files found at {}", opts.path.display());
    }
    tracing::info!(files = files.len(), "compiling");

    let (namespaces, failed_files) = parse_all(&files, &config.registry);
    let collection = DefinitionCollection::from_namespaces(&merge_namespaces(namespaces))?;
    let compilation = fpp::build_all(&collection, &config);

    let json = if opts.pretty {
        serde_json::to_string_pretty(&compilation.descriptors)?
    } else {
        serde_json::to_string(&compilation.descriptors)?
    };
    println!("{}", json);

    if failed_files > 0 || !compilation.is_ok() {
        bail!(
            "{} file(s) failed to parse, {} definition(s) failed to build",
            failed_files,
            compilation.failures.len()
        );
    }
    Ok(())
}
