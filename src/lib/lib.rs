#[macro_use]
extern crate thiserror;

use std::fs;
use std::path::{Path, PathBuf};

use crate::ast::Namespace;
use crate::builder::{BuildError, Descriptors};
use crate::config::{Configuration, ConfigurationError, KindRegistry};
use crate::definition::{DefinitionCollection, DefinitionError};
use crate::input::Input;
use crate::parser::Parser;

pub mod ast;
pub mod builder;
pub mod config;
pub mod definition;
pub mod deriving;
pub mod descriptor;
pub mod input;
pub mod lexical;
pub mod namespace;
pub mod parser;
pub mod scan;
pub mod types;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Parsing failed with:\n{0}")]
    Parse(String),
    #[error("Failed to read {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Definition(#[from] DefinitionError),
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
}

fn pretty_error(at: Input<'_>) -> String {
    let (line, column) = at.line_col();
    let mut out_str = String::new();
    out_str += &match at.peek() {
        Some(c) => format!("\nUnexpected token '{}' at line {}, column {}", c, line, column),
        None => format!("\nUnexpected end of input at line {}, column {}", line, column),
    };
    out_str += &format!("\n|\n|  {}\n", at.current_line());
    out_str += &format!("|~~{}^\n", "~".repeat(column - 1));

    out_str
}

/// Parses a whole source file into its namespaces.
pub fn parse(content: &str, registry: &KindRegistry) -> Result<Vec<Namespace>, Error> {
    let input = Input::new(content);
    match namespace::multiple_namespaces(registry.parsers()).parse(input) {
        Some((namespaces, _)) => {
            tracing::debug!(namespaces = namespaces.len(), "parsed source");
            Ok(namespaces)
        }
        None => Err(Error::Parse(pretty_error(namespace::failure_point(
            registry.parsers(),
            input,
        )))),
    }
}

pub fn parse_file<P: AsRef<Path>>(path: P, registry: &KindRegistry) -> Result<Vec<Namespace>, Error> {
    let path = path.as_ref();
    let file = fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse(&file, registry)
}

/// Result of building a whole collection. A failing definition does not stop
/// the others from being built.
#[derive(Debug, Default)]
pub struct Compilation {
    pub descriptors: Descriptors,
    /// Fully qualified definition name and why it failed
    pub failures: Vec<(String, BuildError)>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool { self.failures.is_empty() }
}

pub fn build_all(collection: &DefinitionCollection, config: &Configuration) -> Compilation {
    let mut out = Compilation::default();
    for definition in collection {
        let built = builder::build(definition, collection, config).and_then(|descriptors| {
            let clash = descriptors
                .keys()
                .find(|fqcn| out.descriptors.contains_key(*fqcn))
                .cloned();
            match clash {
                Some(fqcn) => Err(BuildError::DuplicateClass(fqcn)),
                None => Ok(descriptors),
            }
        });
        match built {
            Ok(descriptors) => out.descriptors.extend(descriptors),
            Err(err) => {
                tracing::warn!(definition = %definition.fqcn(), %err, "build failed");
                out.failures.push((definition.fqcn(), err));
            }
        }
    }
    tracing::info!(
        classes = out.descriptors.len(),
        failures = out.failures.len(),
        "build finished"
    );
    out
}

/// Parses, lowers and builds `content` in one go.
pub fn compile(content: &str, config: &Configuration) -> Result<Compilation, Error> {
    let namespaces = parse(content, &config.registry)?;
    let collection = DefinitionCollection::from_namespaces(&namespaces)?;
    Ok(build_all(&collection, config))
}
