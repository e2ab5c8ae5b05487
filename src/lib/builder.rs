//! Turns definitions into class descriptors
//!
//! [`build`] checks that a definition is well formed, resolves its derivings
//! and hands it to the builder registered for its kind. The helpers in here are
//! shared by the per-kind builders in [`crate::types`].
use std::collections::BTreeMap;

use crate::ast::Kind;
use crate::config::Configuration;
use crate::definition::{Constructor, Definition, DefinitionCollection};
use crate::deriving::{self, Deriving, DerivingError};
use crate::descriptor::{ClassBuilder, ClassDescriptor, ClassKeyword};

/// Fully qualified class name -> descriptor
pub type Descriptors = BTreeMap<String, ClassDescriptor>;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("Type mismatch for '{definition}': {reason}")]
    TypeMismatch { definition: String, reason: String },
    #[error("Unsupported definition '{definition}', expected {expected}")]
    UnsupportedDefinition { definition: String, expected: Kind },
    #[error("{operation} is not supported for {kind}")]
    NotSupported { operation: &'static str, kind: Kind },
    #[error("Definition '{0}' has no constructors")]
    NoConstructors(String),
    #[error("No builder registered for {0}")]
    UnregisteredKind(Kind),
    #[error("Class '{0}' is generated by more than one definition")]
    DuplicateClass(String),
    #[error("Unknown parent '{parent}' for '{definition}'")]
    UnknownParent { definition: String, parent: String },
    #[error(transparent)]
    Deriving(#[from] DerivingError),
}

/// Builds every class `definition` generates.
pub fn build(
    definition: &Definition,
    collection: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    check_shape(definition)?;
    deriving::resolve(definition)?;
    if let Some(parent) = &definition.parent {
        if collection.get(parent).is_none() {
            return Err(BuildError::UnknownParent {
                definition: definition.fqcn(),
                parent: parent.clone(),
            });
        }
    }

    let kind = definition.r#type.kind();
    let build = config.builder_for(kind).ok_or(BuildError::UnregisteredKind(kind))?;
    let descriptors = build(definition, collection, config)?;
    tracing::debug!(definition = %definition.fqcn(), classes = descriptors.len(), "built definition");
    Ok(descriptors)
}

fn mismatch(definition: &Definition, reason: String) -> BuildError {
    BuildError::TypeMismatch {
        definition: definition.fqcn(),
        reason,
    }
}

/// Checks that the constructors agree with the declared kind.
pub fn check_shape(definition: &Definition) -> Result<(), BuildError> {
    let count = definition.constructors.len();
    match definition.r#type.kind() {
        Kind::Marker if count == 0 => Ok(()),
        Kind::Marker => Err(mismatch(definition, format!("a marker cannot have constructors, found {}", count))),
        _ if count == 0 => Err(BuildError::NoConstructors(definition.fqcn())),
        Kind::Enum => Ok(()),
        Kind::Data if count == 1 => Ok(()),
        Kind::Data => Err(mismatch(definition, format!("data needs exactly one constructor, found {}", count))),
        _ if count == 1 && definition.constructors[0].arguments.len() == 1 => Ok(()),
        kind => Err(mismatch(
            definition,
            format!("{} needs exactly one constructor with one argument", kind),
        )),
    }
}

/// Keyword for the class generated for `constructor`, or for the base class
/// of a sum type when `constructor` is `None`.
pub fn build_class_keyword(
    definition: &Definition,
    constructor: Option<&Constructor>,
) -> Result<ClassKeyword, BuildError> {
    if definition.constructors.is_empty() {
        return Err(BuildError::NoConstructors(definition.fqcn()));
    }
    match constructor {
        None => Ok(ClassKeyword::Abstract),
        // the constructor doubles as the base class its siblings extend
        Some(c) if definition.constructors.len() > 1 && c.name == definition.fqcn() => Ok(ClassKeyword::None),
        Some(_) => Ok(ClassKeyword::Final),
    }
}

/// Label an `Enum` deriving assigns to `constructor`: its unqualified name.
pub fn build_enum_value(definition: &Definition, constructor: &Constructor) -> Option<String> {
    if definition.derives(Deriving::Enum) {
        Some(constructor.classname().to_string())
    } else {
        None
    }
}

/// Class builder for `classname` in the definition's namespace, with the
/// output path resolved from the configuration.
pub fn class_builder(definition: &Definition, classname: &str, config: &Configuration) -> ClassBuilder {
    ClassBuilder::new(definition.namespace.clone(), classname)
        .output_path(config.paths.resolve(&definition.namespace, classname))
}

/// Wraps a single descriptor into the map `build` returns.
pub fn single(descriptor: ClassDescriptor) -> Descriptors {
    let mut out = Descriptors::new();
    out.insert(descriptor.fqcn(), descriptor);
    out
}

/// Snippet converting the raw value `param` into the type named `type_name`,
/// or `None` if the name is not a known definition.
pub fn from_external_value(
    definition: &Definition,
    type_name: &str,
    param: &str,
    collection: &DefinitionCollection,
    config: &Configuration,
) -> Option<String> {
    let target = collection.resolve(&definition.namespace, type_name)?;
    let cfg = config.type_configuration(target.r#type.kind())?;
    (cfg.from_external_value)(&target.r#type, param).ok()
}

/// Snippet converting `param` of the type named `type_name` into its raw value.
pub fn to_external_value(
    definition: &Definition,
    type_name: &str,
    param: &str,
    collection: &DefinitionCollection,
    config: &Configuration,
) -> Option<String> {
    let target = collection.resolve(&definition.namespace, type_name)?;
    let cfg = config.type_configuration(target.r#type.kind())?;
    (cfg.to_external_value)(&target.r#type, param).ok()
}

/// Snippet comparing `param` with `other`, both of the type named `type_name`.
pub fn equals_snippet(
    definition: &Definition,
    type_name: Option<&str>,
    param: &str,
    other: &str,
    collection: &DefinitionCollection,
    config: &Configuration,
) -> String {
    type_name
        .and_then(|name| collection.resolve(&definition.namespace, name))
        .and_then(|target| config.type_configuration(target.r#type.kind()))
        .and_then(|cfg| cfg.equals)
        .map(|equals| equals(param, other))
        .unwrap_or_else(|| format!("{} === {}", param, other))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::{self, Argument, Named, Type};

    fn color(constructors: Vec<Constructor>, derivings: Vec<Deriving>) -> Definition {
        let ty = Type::Enum(ast::Enum {
            classname: "Color".to_string(),
            markers: vec![],
            variants: constructors.iter().map(|c| c.classname().to_string()).collect(),
            derivings: vec![],
        });
        Definition::new("Foo", "Color", ty, constructors).with_derivings(derivings)
    }

    #[test]
    fn base_class_is_abstract() {
        let definition = color(vec![Constructor::new("Foo\\Red")], vec![]);
        assert_eq!(build_class_keyword(&definition, None).unwrap().as_prefix(), "abstract ");
    }

    #[test]
    fn single_constructor_is_final() {
        let definition = color(vec![Constructor::new("Foo\\Red")], vec![]);
        let constructor = &definition.constructors[0];
        assert_eq!(build_class_keyword(&definition, Some(constructor)).unwrap(), ClassKeyword::Final);
    }

    #[test]
    fn variants_of_a_sum_type_are_final() {
        let definition = color(vec![Constructor::new("Foo\\Red"), Constructor::new("Foo\\Blue")], vec![]);
        assert_eq!(
            build_class_keyword(&definition, Some(&definition.constructors[1])).unwrap(),
            ClassKeyword::Final
        );
    }

    #[test]
    fn constructor_named_like_its_definition_has_no_keyword() {
        let ty = Type::Data(ast::Data {
            classname: "Bar".to_string(),
            markers: vec![],
            arguments: vec![],
            derivings: vec![],
        });
        let constructor = Constructor::new("Foo\\Bar");
        let definition = Definition::new("Foo", "Bar", ty, vec![constructor.clone(), Constructor::new("Foo\\Baz")]);
        assert_eq!(build_class_keyword(&definition, Some(&constructor)).unwrap().as_prefix(), "");
    }

    #[test]
    fn zero_constructors_is_an_error() {
        let definition = color(vec![], vec![]);
        assert_eq!(
            build_class_keyword(&definition, None).unwrap_err(),
            BuildError::NoConstructors("Foo\\Color".to_string())
        );
    }

    #[test]
    fn enum_value_is_the_unqualified_name() {
        let definition = color(
            vec![Constructor::new("My\\Red"), Constructor::new("My\\Blue")],
            vec![Deriving::Enum],
        );
        assert_eq!(
            build_enum_value(&definition, &definition.constructors[0]),
            Some("Red".to_string())
        );
        let plain = color(vec![Constructor::new("My\\Red")], vec![]);
        assert_eq!(build_enum_value(&plain, &plain.constructors[0]), None);
    }

    #[test]
    fn enum_deriving_needs_two_constructors() {
        let definition = color(vec![Constructor::new("Foo\\Red")], vec![Deriving::Enum]);
        let collection = DefinitionCollection::new(vec![definition.clone()]).unwrap();
        let err = build(&definition, &collection, &Configuration::default()).unwrap_err();
        assert!(matches!(err, BuildError::Deriving(DerivingError::InvalidEnum { .. })));
    }

    #[test]
    fn shape_must_match_kind() {
        let age = Definition::new(
            "Foo",
            "Age",
            Type::Int(Named::new("Age", vec![])),
            vec![Constructor::new("Foo\\Age"), Constructor::new("Foo\\Other")],
        );
        assert!(matches!(check_shape(&age), Err(BuildError::TypeMismatch { .. })));

        let marker = Definition::new(
            "Foo",
            "Flag",
            Type::Marker(Named::new("Flag", vec![])),
            vec![Constructor::new("Foo\\Flag")],
        );
        assert!(matches!(check_shape(&marker), Err(BuildError::TypeMismatch { .. })));

        let empty = Definition::new("Foo", "Age", Type::Int(Named::new("Age", vec![])), vec![]);
        assert_eq!(check_shape(&empty), Err(BuildError::NoConstructors("Foo\\Age".to_string())));
    }

    #[test]
    fn unknown_parent_fails() {
        let definition = color(vec![Constructor::new("Foo\\Red"), Constructor::new("Foo\\Blue")], vec![])
            .with_parent("Foo\\Missing");
        let collection = DefinitionCollection::new(vec![definition.clone()]).unwrap();
        assert!(matches!(
            build(&definition, &collection, &Configuration::default()),
            Err(BuildError::UnknownParent { .. })
        ));
    }

    #[test]
    fn override_replaces_kind_builder() {
        fn nothing(_: &Definition, _: &DefinitionCollection, _: &Configuration) -> Result<Descriptors, BuildError> {
            Ok(Descriptors::new())
        }
        let age = Definition::new(
            "Foo",
            "Age",
            Type::Int(Named::new("Age", vec![])),
            vec![Constructor::new("Foo\\Age").with_arguments(vec![Argument::new("value").typed("int")])],
        );
        let collection = DefinitionCollection::new(vec![age.clone()]).unwrap();
        let config = Configuration::default().override_builder(Kind::Int, nothing);
        assert!(build(&age, &collection, &config).unwrap().is_empty());
        assert_eq!(build(&age, &collection, &Configuration::default()).unwrap().len(), 1);
    }
}
