//! `string Name;` wraps a string
use crate::ast::{Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Definition, DefinitionCollection};
use crate::descriptor::Method;
use crate::input::Input;
use crate::parser::{map, ParseResult, Parser};

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::String,
        keyword: "string",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: Some(validator),
        validation_error_message: Some(validation_error_message),
        equals: Some(equals),
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> {
    map(super::named_declaration("string"), Type::String).parse(input)
}

pub fn build(
    definition: &Definition,
    _: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    let class = super::value_object(definition, config, Kind::String, "string")?
        .method(Method::public("toString").returns("string").body("return $this->value;"))
        .method(Method::public("__toString").returns("string").body("return $this->value;"));
    Ok(builder::single(class.build()))
}

pub fn from_external_value(ty: &Type, param: &str) -> Result<String, BuildError> {
    Ok(format!("new {}({})", ty.classname(), param))
}

pub fn to_external_value(_: &Type, param: &str) -> Result<String, BuildError> { Ok(format!("{}->toString()", param)) }

pub fn validator(param: &str) -> String { format!("\\is_string(${})", param) }

pub fn validation_error_message(param: &str) -> String { format!("Error on \"{}\", string expected", param) }

pub fn equals(param: &str, other: &str) -> String { format!("{}->equals({})", param, other) }
