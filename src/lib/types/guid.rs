//! `guid Name;` wraps a UUID
//!
//! The generated class is built on `ramsey/uuid`, whose imports are added to
//! the namespace declaring the guid.
use crate::ast::{Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Definition, DefinitionCollection};
use crate::descriptor::{Method, Parameter, Property};
use crate::input::Input;
use crate::parser::{map, ParseResult, Parser};

const FACTORY_BODY: &str = "if (null === self::$factory) {
    self::$factory = new UuidFactory(new FeatureSet(true));
}

return self::$factory;";

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::Guid,
        keyword: "guid",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: Some(validator),
        validation_error_message: Some(validation_error_message),
        equals: Some(equals),
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> { map(super::named_declaration("guid"), Type::Guid).parse(input) }

fn string_param(name: &str) -> Parameter { Parameter::new(name).typed(Some("string")) }

pub fn build(
    definition: &Definition,
    _: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    super::expect_kind(definition, Kind::Guid)?;
    let keyword = builder::build_class_keyword(definition, definition.constructors.first())?;

    let class = builder::class_builder(definition, &definition.name, config)
        .keyword(keyword)
        .implements(definition.r#type.markers())
        .property(Property::private("uuid").typed(Some("UuidInterface")))
        .property(
            Property::private("factory")
                .typed(Some("UuidFactory"))
                .nullable(true)
                .static_(),
        )
        .method(
            Method::public("__construct")
                .private()
                .param(Parameter::new("uuid").typed(Some("UuidInterface")))
                .body("$this->uuid = $uuid;"),
        )
        .method(
            Method::public("generate")
                .static_()
                .returns("self")
                .body("return new self(self::factory()->uuid4());"),
        )
        .method(
            Method::public("fromString")
                .static_()
                .param(string_param("uuid"))
                .returns("self")
                .body("return new self(self::factory()->fromString($uuid));"),
        )
        .method(
            Method::public("fromBinary")
                .static_()
                .param(string_param("bytes"))
                .returns("self")
                .body("return new self(self::factory()->fromBytes($bytes));"),
        )
        .method(Method::public("toString").returns("string").body("return $this->uuid->toString();"))
        .method(Method::public("__toString").returns("string").body("return $this->uuid->toString();"))
        .method(Method::public("toBinary").returns("string").body("return $this->uuid->getBytes();"))
        .method(
            Method::public("equals")
                .param(Parameter::new("other").typed(Some("self")))
                .returns("bool")
                .body("return $this->uuid->equals($other->uuid);"),
        )
        .method(
            Method::public("factory")
                .private()
                .static_()
                .returns("UuidFactory")
                .body(FACTORY_BODY),
        );

    Ok(builder::single(class.build()))
}

pub fn from_external_value(ty: &Type, param: &str) -> Result<String, BuildError> {
    Ok(format!("{}::fromString({})", ty.classname(), param))
}

pub fn to_external_value(_: &Type, param: &str) -> Result<String, BuildError> { Ok(format!("{}->toString()", param)) }

pub fn validator(param: &str) -> String { format!("\\is_string(${0}) && Uuid::isValid(${0})", param) }

pub fn validation_error_message(param: &str) -> String { format!("Error on \"{}\", uuid expected", param) }

pub fn equals(param: &str, other: &str) -> String { format!("{}->equals({})", param, other) }

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::ast::Named;
    use crate::descriptor::{ClassKeyword, Visibility};
    use crate::parser::run;

    fn user_id() -> Definition { Definition::from_type("App", &Type::Guid(Named::new("UserId", vec![]))).unwrap() }

    #[test]
    fn parses_guid() {
        let (ty, _) = run(&parse, "\n  guid UserId;").unwrap();
        assert_eq!(ty, Type::Guid(Named::new("UserId", vec![])));
    }

    #[test]
    fn builds_uuid_wrapper() {
        let definition = user_id();
        let collection = DefinitionCollection::new(vec![definition.clone()]).unwrap();
        let classes = build(&definition, &collection, &Configuration::default()).unwrap();
        let class = &classes["App\\UserId"];

        assert_eq!(class.keyword, ClassKeyword::Final);
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(
            names,
            vec![
                "__construct",
                "generate",
                "fromString",
                "fromBinary",
                "toString",
                "__toString",
                "toBinary",
                "equals",
                "factory"
            ]
        );
        assert_eq!(class.method("__construct").unwrap().visibility, Visibility::Private);
        let factory = class.property("factory").unwrap();
        assert!(factory.is_static && factory.nullable);
        assert!(class.method("generate").unwrap().is_static);
    }

    #[test]
    fn conversions_go_through_strings() {
        let ty = Type::Guid(Named::new("UserId", vec![]));
        assert_eq!(from_external_value(&ty, "$id").unwrap(), "UserId::fromString($id)");
        assert_eq!(to_external_value(&ty, "$this->id").unwrap(), "$this->id->toString()");
        assert_eq!(validator("id"), "\\is_string($id) && Uuid::isValid($id)");
    }
}
