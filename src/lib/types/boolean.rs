//! `bool Name;` wraps a boolean
use crate::ast::{Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Definition, DefinitionCollection};
use crate::input::Input;
use crate::parser::{map, ParseResult, Parser};

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::Bool,
        keyword: "bool",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: Some(validator),
        validation_error_message: Some(validation_error_message),
        equals: Some(equals),
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> { map(super::named_declaration("bool"), Type::Bool).parse(input) }

pub fn build(
    definition: &Definition,
    _: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    let class = super::value_object(definition, config, Kind::Bool, "bool")?;
    Ok(builder::single(class.build()))
}

pub fn from_external_value(ty: &Type, param: &str) -> Result<String, BuildError> {
    Ok(format!("new {}({})", ty.classname(), param))
}

pub fn to_external_value(_: &Type, param: &str) -> Result<String, BuildError> { Ok(format!("{}->value()", param)) }

pub fn validator(param: &str) -> String { format!("\\is_bool(${})", param) }

pub fn validation_error_message(param: &str) -> String { format!("Error on \"{}\", bool expected", param) }

pub fn equals(param: &str, other: &str) -> String { format!("{}->equals({})", param, other) }
