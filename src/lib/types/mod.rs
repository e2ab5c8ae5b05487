//! One module per kind of declaration
//!
//! Every kind exposes a `configuration()` bundling its grammar, builder,
//! conversion snippets and validators. The helpers below cover what the
//! value-object kinds have in common.
use crate::ast::{Kind, Named};
use crate::builder::{self, BuildError};
use crate::config::Configuration;
use crate::definition::Definition;
use crate::descriptor::{ClassBuilder, Method, Parameter, Property};
use crate::input::Input;
use crate::lexical::{keyword, markers, spaces, spaces1, type_name};
use crate::parser::*;

pub mod boolean;
pub mod data;
pub mod enumeration;
pub mod float;
pub mod guid;
pub mod int;
pub mod marker;
pub mod string;

/// `kw TypeName Markers? ;`
pub(crate) fn named_declaration<'a>(kw: &'static str) -> impl Parser<'a, Named> {
    let head = spaces()
        .then(keyword(kw))
        .then(spaces1())
        .then(type_name())
        .skip(spaces());
    let marks = optional(markers());
    let tail = spaces().then(char(';'));
    move |input: Input<'a>| {
        let (classname, rest) = head.parse(input)?;
        let (markers, rest) = marks.parse(rest)?;
        let (_, rest) = tail.parse(rest)?;
        Some((Named::new(classname, markers.unwrap_or_default()), rest))
    }
}

pub(crate) fn expect_kind(definition: &Definition, expected: Kind) -> Result<(), BuildError> {
    if definition.r#type.kind() == expected {
        Ok(())
    } else {
        Err(BuildError::UnsupportedDefinition {
            definition: definition.fqcn(),
            expected,
        })
    }
}

pub(crate) fn not_supported(operation: &'static str, kind: Kind) -> BuildError { BuildError::NotSupported { operation, kind } }

/// Final class wrapping a single private scalar `value`.
pub(crate) fn value_object(
    definition: &Definition,
    config: &Configuration,
    kind: Kind,
    scalar: &str,
) -> Result<ClassBuilder, BuildError> {
    expect_kind(definition, kind)?;
    let constructor = definition
        .constructors
        .first()
        .ok_or_else(|| BuildError::NoConstructors(definition.fqcn()))?;
    let keyword = builder::build_class_keyword(definition, Some(constructor))?;

    Ok(builder::class_builder(definition, &definition.name, config)
        .keyword(keyword)
        .implements(definition.r#type.markers())
        .property(Property::private("value").typed(Some(scalar)))
        .method(
            Method::public("__construct")
                .param(Parameter::new("value").typed(Some(scalar)))
                .body("$this->value = $value;"),
        )
        .method(Method::public("value").returns(scalar).body("return $this->value;"))
        .method(
            Method::public("equals")
                .param(Parameter::new("other").typed(Some("self")))
                .returns("bool")
                .body("return $this->value === $other->value;"),
        ))
}
