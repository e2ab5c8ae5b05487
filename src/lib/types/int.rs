//! `int Name;` wraps an integer
use crate::ast::{Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Definition, DefinitionCollection};
use crate::input::Input;
use crate::parser::{map, ParseResult, Parser};

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::Int,
        keyword: "int",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: Some(validator),
        validation_error_message: Some(validation_error_message),
        equals: Some(equals),
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> { map(super::named_declaration("int"), Type::Int).parse(input) }

pub fn build(
    definition: &Definition,
    _: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    let class = super::value_object(definition, config, Kind::Int, "int")?;
    Ok(builder::single(class.build()))
}

pub fn from_external_value(ty: &Type, param: &str) -> Result<String, BuildError> {
    Ok(format!("new {}({})", ty.classname(), param))
}

pub fn to_external_value(_: &Type, param: &str) -> Result<String, BuildError> { Ok(format!("{}->value()", param)) }

pub fn validator(param: &str) -> String { format!("\\is_numeric(${})", param) }

pub fn validation_error_message(param: &str) -> String { format!("Error on \"{}\", int expected", param) }

pub fn equals(param: &str, other: &str) -> String { format!("{}->equals({})", param, other) }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Named;
    use crate::descriptor::ClassKeyword;
    use crate::parser::run;

    #[test]
    fn parses_int() {
        let (ty, _) = run(&parse, "int Age;").unwrap();
        assert_eq!(ty, Type::Int(Named::new("Age", vec![])));
        assert!(run(&parse, "integer Age;").is_none());
    }

    #[test]
    fn builds_final_value_object() {
        let ty = Type::Int(Named::new("Age", vec!["Comparable".to_string()]));
        let definition = Definition::from_type("Foo", &ty).unwrap();
        let collection = DefinitionCollection::new(vec![definition.clone()]).unwrap();
        let classes = build(&definition, &collection, &Configuration::default()).unwrap();

        let class = &classes["Foo\\Age"];
        assert_eq!(class.keyword, ClassKeyword::Final);
        assert_eq!(class.implements, vec!["Comparable".to_string()]);
        assert_eq!(class.property("value").unwrap().type_hint.as_deref(), Some("int"));
        assert_eq!(class.method("value").unwrap().body, "return $this->value;");
        assert_eq!(
            class.method("equals").unwrap().body,
            "return $this->value === $other->value;"
        );
    }

    #[test]
    fn conversion_snippets() {
        let ty = Type::Int(Named::new("Age", vec![]));
        assert_eq!(from_external_value(&ty, "$age").unwrap(), "new Age($age)");
        assert_eq!(to_external_value(&ty, "$this->age").unwrap(), "$this->age->value()");
        assert_eq!(validator("age"), "\\is_numeric($age)");
        assert_eq!(validation_error_message("age"), "Error on \"age\", int expected");
    }

    #[test]
    fn missing_constructor_is_an_error() {
        let ty = Type::Int(Named::new("Age", vec![]));
        let definition = Definition::new("Foo", "Age", ty, vec![]);
        let collection = DefinitionCollection::new(vec![definition.clone()]).unwrap();
        assert_eq!(
            build(&definition, &collection, &Configuration::default()).unwrap_err(),
            BuildError::NoConstructors("Foo\\Age".to_string())
        );
    }

    #[test]
    fn rejects_other_kinds() {
        let ty = Type::Float(Named::new("Price", vec![]));
        let definition = Definition::from_type("Foo", &ty).unwrap();
        let collection = DefinitionCollection::new(vec![definition.clone()]).unwrap();
        assert!(matches!(
            build(&definition, &collection, &Configuration::default()),
            Err(BuildError::UnsupportedDefinition { expected: Kind::Int, .. })
        ));
    }
}
