//! Build configuration and the registry of known kinds
use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::ast::{Kind, Type};
use crate::builder::{BuildError, Descriptors};
use crate::definition::{Definition, DefinitionCollection};
use crate::input::Input;
use crate::parser::{BoxedParser, ParseResult};
use crate::types;

pub type ParseFn = for<'a> fn(Input<'a>) -> ParseResult<'a, Type>;
pub type BuildFn = fn(&Definition, &DefinitionCollection, &Configuration) -> Result<Descriptors, BuildError>;
/// `(type, snippet) -> snippet` converting between the wrapped and raw value
pub type ConvertFn = fn(&Type, &str) -> Result<String, BuildError>;
pub type SnippetFn = fn(&str) -> String;
pub type EqualsFn = fn(&str, &str) -> String;

#[derive(Error, Debug)]
pub enum ConfigurationError {
    #[error("Kind '{0}' is already registered")]
    DuplicateKind(Kind),
    #[error("Keyword '{0}' is already registered")]
    DuplicateKeyword(&'static str),
    #[error("Keyword '{new}' is ambiguous with registered keyword '{existing}'")]
    AmbiguousKeyword { new: &'static str, existing: &'static str },
    #[error("Output template '{0}' must contain {{classname}}")]
    InvalidTemplate(String),
    #[error("Failed to read configuration {path}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything the compiler knows about one kind of declaration
#[derive(Clone, Copy)]
pub struct TypeConfiguration {
    pub kind: Kind,
    pub keyword: &'static str,
    pub parse: ParseFn,
    pub build: BuildFn,
    pub from_external_value: ConvertFn,
    pub to_external_value: ConvertFn,
    pub validator: Option<SnippetFn>,
    pub validation_error_message: Option<SnippetFn>,
    pub equals: Option<EqualsFn>,
}

impl std::fmt::Debug for TypeConfiguration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeConfiguration")
            .field("kind", &self.kind)
            .field("keyword", &self.keyword)
            .finish()
    }
}

/// Registered kinds, tried in registration order when parsing
#[derive(Clone, Debug)]
pub struct KindRegistry {
    kinds: Vec<TypeConfiguration>,
}

impl KindRegistry {
    pub fn empty() -> KindRegistry { KindRegistry { kinds: Vec::new() } }

    /// Adds a kind. Keywords must be unique and must not prefix each other.
    pub fn register(&mut self, config: TypeConfiguration) -> Result<(), ConfigurationError> {
        for existing in &self.kinds {
            if existing.kind == config.kind {
                return Err(ConfigurationError::DuplicateKind(config.kind));
            }
            if existing.keyword == config.keyword {
                return Err(ConfigurationError::DuplicateKeyword(config.keyword));
            }
            if existing.keyword.starts_with(config.keyword) || config.keyword.starts_with(existing.keyword) {
                return Err(ConfigurationError::AmbiguousKeyword {
                    new: config.keyword,
                    existing: existing.keyword,
                });
            }
        }
        tracing::debug!(kind = %config.kind, keyword = config.keyword, "registered kind");
        self.kinds.push(config);
        Ok(())
    }

    pub fn get(&self, kind: Kind) -> Option<&TypeConfiguration> { self.kinds.iter().find(|c| c.kind == kind) }

    pub fn iter(&self) -> std::slice::Iter<'_, TypeConfiguration> { self.kinds.iter() }

    /// One parser per registered kind, in registration order
    pub fn parsers<'a>(&self) -> Vec<BoxedParser<'a, Type>> {
        self.kinds
            .iter()
            .map(|c| Box::new(c.parse) as BoxedParser<'a, Type>)
            .collect()
    }
}

impl Default for KindRegistry {
    /// Every built-in kind
    fn default() -> Self {
        KindRegistry {
            kinds: vec![
                types::enumeration::configuration(),
                types::data::configuration(),
                types::int::configuration(),
                types::float::configuration(),
                types::guid::configuration(),
                types::string::configuration(),
                types::boolean::configuration(),
                types::marker::configuration(),
            ],
        }
    }
}

fn default_template() -> String { "src/{namespace}/{classname}.php".to_string() }

/// Output path templates. `{namespace}` expands to the namespace with its
/// separators turned into `/`, `{classname}` to the unqualified class name.
#[derive(Clone, PartialEq, Debug, Serialize, Deserialize)]
pub struct PathTemplates {
    #[serde(default = "default_template")]
    pub default: String,
    /// Namespace prefix -> template. The longest matching prefix wins.
    #[serde(default)]
    pub namespaces: BTreeMap<String, String>,
}

impl Default for PathTemplates {
    fn default() -> Self {
        PathTemplates {
            default: default_template(),
            namespaces: BTreeMap::new(),
        }
    }
}

impl PathTemplates {
    pub fn validate(&self) -> Result<(), ConfigurationError> {
        for template in std::iter::once(&self.default).chain(self.namespaces.values()) {
            if !template.contains("{classname}") {
                return Err(ConfigurationError::InvalidTemplate(template.clone()));
            }
        }
        Ok(())
    }

    fn template_for(&self, namespace: &str) -> &str {
        self.namespaces
            .iter()
            .filter(|(prefix, _)| {
                namespace == prefix.as_str()
                    || namespace
                        .strip_prefix(prefix.as_str())
                        .map_or(false, |rest| rest.starts_with('\\') || rest.starts_with('.'))
            })
            .max_by_key(|(prefix, _)| prefix.len())
            .map_or(self.default.as_str(), |(_, template)| template.as_str())
    }

    pub fn resolve(&self, namespace: &str, classname: &str) -> PathBuf {
        let dir = namespace.replace(['\\', '.'], "/");
        let path = self
            .template_for(namespace)
            .replace("{namespace}", &dir)
            .replace("{classname}", classname)
            .replace("//", "/");
        PathBuf::from(path)
    }
}

#[derive(Clone, Debug, Default)]
pub struct Configuration {
    pub registry: KindRegistry,
    pub paths: PathTemplates,
    /// Replaces the registry's build function for a kind
    pub overrides: HashMap<Kind, BuildFn>,
}

impl Configuration {
    pub fn with_paths(paths: PathTemplates) -> Result<Configuration, ConfigurationError> {
        paths.validate()?;
        Ok(Configuration {
            paths,
            ..Configuration::default()
        })
    }

    /// Reads output templates from a JSON file, registering the built-in kinds.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Configuration, ConfigurationError> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| ConfigurationError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Configuration::with_paths(serde_json::from_str(&content)?)
    }

    pub fn override_builder(mut self, kind: Kind, build: BuildFn) -> Configuration {
        self.overrides.insert(kind, build);
        self
    }

    pub fn type_configuration(&self, kind: Kind) -> Option<&TypeConfiguration> { self.registry.get(kind) }

    /// The build function for `kind`, honouring overrides
    pub fn builder_for(&self, kind: Kind) -> Option<BuildFn> {
        self.overrides
            .get(&kind)
            .copied()
            .or_else(|| self.registry.get(kind).map(|c| c.build))
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_registry_has_every_kind() {
        let registry = KindRegistry::default();
        let keywords: Vec<&str> = registry.iter().map(|c| c.keyword).collect();
        assert_eq!(keywords, vec!["enum", "data", "int", "float", "guid", "string", "bool", "marker"]);
    }

    #[test]
    fn registering_twice_fails() {
        let mut registry = KindRegistry::default();
        let err = registry.register(types::int::configuration()).unwrap_err();
        assert!(matches!(err, ConfigurationError::DuplicateKind(Kind::Int)));
    }

    #[test]
    fn prefixing_keywords_are_ambiguous() {
        let mut registry = KindRegistry::empty();
        registry.register(types::int::configuration()).unwrap();
        let mut integer = types::float::configuration();
        integer.keyword = "integer";
        let err = registry.register(integer).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Keyword 'integer' is ambiguous with registered keyword 'int'"
        );
    }

    #[test]
    fn duplicate_keyword_for_new_kind() {
        let mut registry = KindRegistry::empty();
        registry.register(types::int::configuration()).unwrap();
        let mut clash = types::float::configuration();
        clash.keyword = "int";
        assert!(matches!(
            registry.register(clash),
            Err(ConfigurationError::DuplicateKeyword("int"))
        ));
    }

    #[test]
    fn longest_namespace_prefix_wins() {
        let mut paths = PathTemplates::default();
        paths
            .namespaces
            .insert("Foo".to_string(), "lib/{namespace}/{classname}.php".to_string());
        paths
            .namespaces
            .insert("Foo\\Bar".to_string(), "gen/{classname}.php".to_string());

        assert_eq!(paths.resolve("Foo\\Bar", "Age"), PathBuf::from("gen/Age.php"));
        assert_eq!(paths.resolve("Foo\\Baz", "Age"), PathBuf::from("lib/Foo/Baz/Age.php"));
        assert_eq!(paths.resolve("Foobar", "Age"), PathBuf::from("src/Foobar/Age.php"));
    }

    #[test]
    fn templates_need_classname() {
        let paths = PathTemplates {
            default: "src/{namespace}".to_string(),
            namespaces: BTreeMap::new(),
        };
        assert!(matches!(
            Configuration::with_paths(paths),
            Err(ConfigurationError::InvalidTemplate(_))
        ));
    }

    #[test]
    fn loads_from_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fpp.json");
        std::fs::write(&path, r#"{ "namespaces": { "App": "app/{classname}.php" } }"#).unwrap();
        let config = Configuration::from_json_file(&path).unwrap();
        assert_eq!(config.paths.default, "src/{namespace}/{classname}.php");
        assert_eq!(config.paths.resolve("App", "User"), PathBuf::from("app/User.php"));
    }

    #[test]
    fn overrides_take_precedence() {
        fn nothing(_: &Definition, _: &DefinitionCollection, _: &Configuration) -> Result<Descriptors, BuildError> {
            Ok(Descriptors::new())
        }
        let config = Configuration::default().override_builder(Kind::Int, nothing);
        assert!(config.builder_for(Kind::Int).is_some());
        assert_eq!(config.overrides.len(), 1);
        assert!(Configuration::default().overrides.is_empty());
    }
}
