//! `marker Name;` declares an interface other types can be tagged with
use crate::ast::{Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Definition, DefinitionCollection};
use crate::input::Input;
use crate::parser::{map, ParseResult, Parser};

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::Marker,
        keyword: "marker",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: None,
        validation_error_message: None,
        equals: None,
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> {
    map(super::named_declaration("marker"), Type::Marker).parse(input)
}

pub fn build(
    definition: &Definition,
    _: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    super::expect_kind(definition, Kind::Marker)?;
    let class = definition
        .r#type
        .markers()
        .iter()
        .fold(builder::class_builder(definition, &definition.name, config).interface(), |class, parent| {
            class.extends(parent.as_str())
        });
    Ok(builder::single(class.build()))
}

pub fn from_external_value(_: &Type, _: &str) -> Result<String, BuildError> {
    Err(super::not_supported("from_external_value", Kind::Marker))
}

pub fn to_external_value(_: &Type, _: &str) -> Result<String, BuildError> {
    Err(super::not_supported("to_external_value", Kind::Marker))
}
