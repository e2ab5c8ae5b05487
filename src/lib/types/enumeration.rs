//! `enum Name = A | B;` declares a sum type
//!
//! Every variant becomes a final class extending an abstract base. The base
//! carries an `OPTIONS` constant mapping names to variant classes, the
//! variants carry their name as `VALUE`. A variant named like the enum itself
//! takes the place of the base.
use std::collections::HashSet;

use crate::ast::{self, Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Constructor, Definition, DefinitionCollection};
use crate::deriving::Deriving;
use crate::descriptor::{ClassBuilder, Method, Parameter};
use crate::input::Input;
use crate::lexical::{assignment, deriving_clause, identifier, keyword, markers, spaces, spaces1, type_name};
use crate::parser::*;

const FROM_NAME_BODY: &str = "if (! isset(self::OPTIONS[$name])) {
    throw new \\InvalidArgumentException('Unknown enum name given');
}

$class = self::OPTIONS[$name];

return new $class();";

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::Enum,
        keyword: "enum",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: None,
        validation_error_message: None,
        equals: Some(equals),
    }
}

/// `A | B | C`, unique names
pub fn variants<'a>() -> impl Parser<'a, Vec<String>> {
    let variant = surrounded(spaces(), identifier(), spaces());
    let list = sep_by1(variant, char('|'));
    move |input: Input<'a>| {
        let (variants, rest) = list.parse(input)?;
        let mut seen = HashSet::new();
        if variants.iter().all(|v| seen.insert(v.as_str())) {
            Some((variants, rest))
        } else {
            None
        }
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> {
    let (classname, rest) = spaces()
        .then(keyword("enum"))
        .then(spaces1())
        .then(type_name())
        .skip(spaces())
        .parse(input)?;
    let (markers, rest) = optional(markers()).parse(rest)?;
    let (_, rest) = assignment().parse(rest)?;
    let (variants, rest) = variants().parse(rest)?;
    let (derivings, rest) = optional(deriving_clause()).parse(rest)?;
    let (_, rest) = spaces().then(char(';')).parse(rest)?;

    let ty = ast::Enum {
        classname,
        markers: markers.unwrap_or_default(),
        variants,
        derivings: derivings.unwrap_or_default(),
    };
    Some((Type::Enum(ty), rest))
}

fn quoted(value: &str) -> String { format!("'{}'", value.replace('\'', "\\'")) }

fn options(definition: &Definition) -> String {
    let entries: Vec<String> = definition
        .constructors
        .iter()
        .map(|c| format!("    {} => {}::class,", quoted(c.classname()), c.classname()))
        .collect();
    format!("[\n{}\n]", entries.join("\n"))
}

fn base_class(definition: &Definition, own: Option<&Constructor>, config: &Configuration) -> Result<ClassBuilder, BuildError> {
    let mut class = builder::class_builder(definition, &definition.name, config)
        .keyword(builder::build_class_keyword(definition, own)?)
        .implements(definition.r#type.markers());
    if let Some(parent) = &definition.parent {
        class = class.extends(parent.as_str());
    }

    class = class
        .constant("OPTIONS", options(definition))
        .method(Method::public("name").returns("string").body("return static::VALUE;"))
        .method(
            Method::public("fromName")
                .static_()
                .param(Parameter::new("name").typed(Some("string")))
                .returns("self")
                .body(FROM_NAME_BODY),
        );

    if definition.derives(Deriving::Equals) {
        class = class.method(
            Method::public("equals")
                .param(Parameter::new("other").typed(Some("self")))
                .returns("bool")
                .body("return \\get_class($this) === \\get_class($other);"),
        );
    }
    if definition.derives(Deriving::ToString) {
        class = class
            .method(Method::public("toString").returns("string").body("return static::VALUE;"))
            .method(Method::public("__toString").returns("string").body("return static::VALUE;"));
    }
    if definition.derives(Deriving::FromString) {
        class = class.method(
            Method::public("fromString")
                .static_()
                .param(Parameter::new("value").typed(Some("string")))
                .returns("self")
                .body("return self::fromName($value);"),
        );
    }
    Ok(class)
}

fn with_value(class: ClassBuilder, definition: &Definition, constructor: &Constructor) -> ClassBuilder {
    match builder::build_enum_value(definition, constructor) {
        Some(value) => class.constant("VALUE", quoted(&value)),
        None => class,
    }
}

pub fn build(
    definition: &Definition,
    _: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    super::expect_kind(definition, Kind::Enum)?;
    let fqcn = definition.fqcn();
    let own = definition.constructors.iter().find(|c| c.name == fqcn);

    let mut base = base_class(definition, own, config)?;
    if let Some(constructor) = own {
        base = with_value(base, definition, constructor);
    }

    let mut descriptors = builder::single(base.build());
    for constructor in definition.constructors.iter().filter(|c| c.name != fqcn) {
        let variant = builder::class_builder(definition, constructor.classname(), config)
            .keyword(builder::build_class_keyword(definition, Some(constructor))?)
            .extends(definition.name.as_str());
        let variant = with_value(variant, definition, constructor).build();
        descriptors.insert(variant.fqcn(), variant);
    }
    Ok(descriptors)
}

pub fn from_external_value(ty: &Type, param: &str) -> Result<String, BuildError> {
    Ok(format!("{}::fromName({})", ty.classname(), param))
}

pub fn to_external_value(_: &Type, param: &str) -> Result<String, BuildError> { Ok(format!("{}->name()", param)) }

pub fn equals(param: &str, other: &str) -> String { format!("{}->name() === {}->name()", param, other) }
