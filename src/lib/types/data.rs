//! `data Name = { ... };` declares a record
//!
//! Every argument becomes a private property with an accessor and a parameter
//! of the constructor, in declaration order. The `Equals`, `ToString`,
//! `FromString`, `ToArray` and `FromArray` derivings add the matching methods,
//! converting nested definitions through the conversion snippets of their kind.
use std::collections::HashSet;

use crate::ast::{self, Argument, Kind, Type};
use crate::builder::{self, BuildError, Descriptors};
use crate::config::{Configuration, TypeConfiguration};
use crate::definition::{Definition, DefinitionCollection};
use crate::deriving::Deriving;
use crate::descriptor::{Method, Parameter, Property};
use crate::input::Input;
use crate::lexical::{assignment, deriving_clause, identifier, keyword, literal, markers, spaces, spaces1, type_name};
use crate::parser::*;

pub fn configuration() -> TypeConfiguration {
    TypeConfiguration {
        kind: Kind::Data,
        keyword: "data",
        parse,
        build,
        from_external_value,
        to_external_value,
        validator: None,
        validation_error_message: None,
        equals: Some(equals),
    }
}

/// `?`? TypeName? `[]`? `$name` (`= literal`)?
pub fn argument<'a>() -> impl Parser<'a, Argument> {
    let nullable = optional(char('?'));
    let ty = optional(type_name());
    let list = optional(string("[]"));
    let name = spaces().then(char('$')).then(identifier()).skip(spaces());
    let default = optional(char('=').then(spaces()).then(literal()));
    move |input: Input<'a>| {
        let (_, rest) = spaces().parse(input)?;
        let (nullable, rest) = nullable.parse(rest)?;
        let (r#type, rest) = ty.parse(rest)?;
        let (list, rest) = list.parse(rest)?;
        let (name, rest) = name.parse(rest)?;
        let (default_value, rest) = default.parse(rest)?;
        let (_, rest) = spaces().parse(rest)?;
        let argument = Argument {
            name,
            r#type,
            nullable: nullable.is_some(),
            is_list: list.is_some(),
            default_value,
        };
        Some((argument, rest))
    }
}

/// `{ arg, arg }`. Argument names must be unique.
pub fn arguments<'a>() -> impl Parser<'a, Vec<Argument>> {
    let open = spaces().then(char('{'));
    let close = spaces().then(char('}'));
    let list = surrounded(open, sep_by1(argument(), char(',')), close);
    move |input: Input<'a>| {
        let (arguments, rest) = list.parse(input)?;
        let mut seen = HashSet::new();
        if arguments.iter().all(|a| seen.insert(a.name.as_str())) {
            Some((arguments, rest))
        } else {
            None
        }
    }
}

pub fn parse(input: Input<'_>) -> ParseResult<'_, Type> {
    let (classname, rest) = spaces()
        .then(keyword("data"))
        .then(spaces1())
        .then(type_name())
        .skip(spaces())
        .parse(input)?;
    let (markers, rest) = optional(markers()).parse(rest)?;
    let (_, rest) = assignment().parse(rest)?;
    let (arguments, rest) = arguments().parse(rest)?;
    let (derivings, rest) = optional(spaces().then(deriving_clause())).parse(rest)?;
    let (_, rest) = spaces().then(char(';')).parse(rest)?;

    let data = ast::Data {
        classname,
        markers: markers.unwrap_or_default(),
        arguments,
        derivings: derivings.unwrap_or_default(),
    };
    Some((Type::Data(data), rest))
}

/// Lookups a data builder needs to convert its arguments
struct Context<'d> {
    definition: &'d Definition,
    collection: &'d DefinitionCollection,
    config: &'d Configuration,
}

impl<'d> Context<'d> {
    fn target(&self, ty: Option<&str>) -> Option<&'d Definition> {
        ty.and_then(|name| self.collection.resolve(&self.definition.namespace, name))
    }

    /// Kind configuration for an argument type, either a known definition or
    /// a scalar named by a kind keyword.
    fn type_configuration(&self, ty: Option<&str>) -> Option<&'d TypeConfiguration> {
        match self.target(ty) {
            Some(target) => self.config.type_configuration(target.r#type.kind()),
            None => {
                let name = ty?;
                self.config.registry.iter().find(|c| c.keyword == name)
            }
        }
    }

    fn to_raw(&self, ty: Option<&str>, expr: &str) -> String {
        match self.target(ty) {
            Some(target) if target.r#type.kind() == Kind::Data => {
                if target.derives(Deriving::ToArray) {
                    format!("{}->toArray()", expr)
                } else {
                    expr.to_string()
                }
            }
            Some(_) => ty
                .and_then(|name| builder::to_external_value(self.definition, name, expr, self.collection, self.config))
                .unwrap_or_else(|| expr.to_string()),
            None => expr.to_string(),
        }
    }

    fn from_raw(&self, ty: Option<&str>, expr: &str) -> String {
        match self.target(ty) {
            Some(target) if target.r#type.kind() == Kind::Data => {
                if target.derives(Deriving::FromArray) {
                    format!("{}::fromArray({})", target.name, expr)
                } else {
                    expr.to_string()
                }
            }
            Some(_) => ty
                .and_then(|name| builder::from_external_value(self.definition, name, expr, self.collection, self.config))
                .unwrap_or_else(|| expr.to_string()),
            None => expr.to_string(),
        }
    }

    fn converts(&self, ty: Option<&str>) -> bool { self.to_raw(ty, "$x") != "$x" }

    /// Cast turning a string into the scalar `ty` holds, looking through
    /// value objects to the kind they wrap.
    fn scalar_cast(&self, ty: Option<&str>) -> &'static str {
        match self.type_configuration(ty).map(|c| c.kind) {
            Some(Kind::Int) => "(int) ",
            Some(Kind::Float) => "(float) ",
            Some(Kind::Bool) => "(bool) ",
            _ => "",
        }
    }
}

fn type_hint(argument: &Argument) -> Option<&str> {
    if argument.is_list {
        Some("array")
    } else {
        argument.r#type.as_deref()
    }
}

fn list_comment(argument: &Argument, tag: &str) -> Option<String> {
    match (&argument.r#type, argument.is_list) {
        (Some(ty), true) => Some(format!("@{} {}[]", tag, ty)),
        _ => None,
    }
}

fn property(argument: &Argument) -> Property {
    let property = Property::private(argument.name.as_str())
        .typed(type_hint(argument))
        .nullable(argument.nullable);
    match list_comment(argument, "var") {
        Some(comment) => property.comment(comment),
        None => property,
    }
}

fn parameter(argument: &Argument) -> Parameter {
    Parameter::new(argument.name.as_str())
        .typed(type_hint(argument))
        .nullable(argument.nullable)
        .default_value(argument.default_value.clone())
}

fn accessor(argument: &Argument) -> Method {
    let mut method = Method::public(argument.name.as_str()).body(format!("return $this->{};", argument.name));
    if let Some(ty) = type_hint(argument) {
        method = method.returns(ty).returns_nullable(argument.nullable && !argument.is_list);
    }
    match list_comment(argument, "return") {
        Some(comment) => method.comment(comment),
        None => method,
    }
}

fn guard_null(argument: &Argument, expr: &str, converted: String) -> String {
    if argument.nullable && converted != expr {
        format!("null === {} ? null : {}", expr, converted)
    } else {
        converted
    }
}

fn equals_method(ctx: &Context<'_>, arguments: &[Argument]) -> Method {
    let comparisons: Vec<String> = arguments
        .iter()
        .map(|a| {
            let this = format!("$this->{}", a.name);
            let other = format!("$other->{}", a.name);
            if a.is_list {
                return format!("{} == {}", this, other);
            }
            let cmp = builder::equals_snippet(
                ctx.definition,
                a.r#type.as_deref(),
                &this,
                &other,
                ctx.collection,
                ctx.config,
            );
            if a.nullable && !cmp.contains("===") {
                format!("(null === {0} ? null === {1} : (null !== {1} && {2}))", this, other, cmp)
            } else {
                cmp
            }
        })
        .collect();

    Method::public("equals")
        .param(Parameter::new("other").typed(Some("self")))
        .returns("bool")
        .body(format!("return {};", comparisons.join("\n    && ")))
}

fn to_array_method(ctx: &Context<'_>, arguments: &[Argument]) -> Method {
    let mut body = String::from("return [\n");
    for a in arguments {
        let this = format!("$this->{}", a.name);
        let value = if a.is_list && ctx.converts(a.r#type.as_deref()) {
            format!(
                "\\array_map(fn ($v) => {}, {})",
                ctx.to_raw(a.r#type.as_deref(), "$v"),
                this
            )
        } else {
            guard_null(a, &this, ctx.to_raw(a.r#type.as_deref(), &this))
        };
        body.push_str(&format!("    '{}' => {},\n", a.name, value));
    }
    body.push_str("];");
    Method::public("toArray").returns("array").body(body)
}

fn validation(ctx: &Context<'_>, argument: &Argument) -> Option<(String, String)> {
    let key = format!("data['{}']", argument.name);
    if argument.is_list {
        return Some((
            format!("\\is_array(${})", key),
            format!("Error on \"{}\", array expected", argument.name),
        ));
    }
    let cfg = ctx.type_configuration(argument.r#type.as_deref())?;
    let validator = cfg.validator?;
    let message = cfg.validation_error_message?;
    Some((validator(&key), message(&argument.name)))
}

fn from_array_method(ctx: &Context<'_>, arguments: &[Argument]) -> Method {
    let mut body = String::new();
    for a in arguments {
        let key = format!("$data['{}']", a.name);
        let optional = a.nullable || a.default_value.is_some();
        if !optional {
            body.push_str(&format!(
                "if (! \\array_key_exists('{0}', $data)) {{\n    throw new \\InvalidArgumentException('Key \"{0}\" is missing in data array');\n}}\n\n",
                a.name
            ));
        }
        if let Some((check, message)) = validation(ctx, a) {
            let condition = if optional {
                format!("isset({}) && ! ({})", key, check)
            } else {
                format!("! ({})", check)
            };
            body.push_str(&format!(
                "if ({}) {{\n    throw new \\InvalidArgumentException('{}');\n}}\n\n",
                condition, message
            ));
        }

        let converted = if a.is_list && ctx.converts(a.r#type.as_deref()) {
            format!("\\array_map(fn ($v) => {}, {})", ctx.from_raw(a.r#type.as_deref(), "$v"), key)
        } else {
            ctx.from_raw(a.r#type.as_deref(), &key)
        };
        let assigned = if optional {
            let fallback = a.default_value.as_deref().unwrap_or("null");
            format!("isset({}) ? {} : {}", key, converted, fallback)
        } else {
            converted
        };
        body.push_str(&format!("${} = {};\n\n", a.name, assigned));
    }

    let params: Vec<String> = arguments.iter().map(|a| format!("${}", a.name)).collect();
    body.push_str(&format!("return new self({});", params.join(", ")));

    Method::public("fromArray")
        .static_()
        .param(Parameter::new("data").typed(Some("array")))
        .returns("self")
        .body(body)
}


pub fn build(
    definition: &Definition,
    collection: &DefinitionCollection,
    config: &Configuration,
) -> Result<Descriptors, BuildError> {
    super::expect_kind(definition, Kind::Data)?;
    let constructor = definition
        .constructors
        .first()
        .ok_or_else(|| BuildError::NoConstructors(definition.fqcn()))?;
    let arguments = &constructor.arguments;
    let ctx = Context {
        definition,
        collection,
        config,
    };

    let mut class = builder::class_builder(definition, constructor.classname(), config)
        .keyword(builder::build_class_keyword(definition, Some(constructor))?)
        .implements(definition.r#type.markers());
    if let Some(parent) = &definition.parent {
        class = class.extends(parent.as_str());
    }

    let assignments: Vec<String> = arguments
        .iter()
        .map(|a| format!("$this->{0} = ${0};", a.name))
        .collect();
    let init = arguments
        .iter()
        .fold(Method::public("__construct"), |m, a| m.param(parameter(a)))
        .body(assignments.join("\n"));

    class = arguments.iter().fold(class, |c, a| c.property(property(a)));
    class = class.method(init);
    class = arguments.iter().fold(class, |c, a| c.method(accessor(a)));

    if definition.derives(Deriving::Equals) {
        class = class.method(equals_method(&ctx, arguments));
    }
    if definition.derives(Deriving::ToArray) {
        class = class.method(to_array_method(&ctx, arguments));
    }
    if definition.derives(Deriving::FromArray) {
        class = class.method(from_array_method(&ctx, arguments));
    }
    if let [only] = arguments.as_slice() {
        if definition.derives(Deriving::ToString) {
            let raw = format!("(string) {}", ctx.to_raw(only.r#type.as_deref(), &format!("$this->{}", only.name)));
            class = class
                .method(Method::public("toString").returns("string").body(format!("return {};", raw)))
                .method(Method::public("__toString").returns("string").body(format!("return {};", raw)));
        }
        if definition.derives(Deriving::FromString) {
            let value = format!("{}$value", ctx.scalar_cast(only.r#type.as_deref()));
            class = class.method(
                Method::public("fromString")
                    .static_()
                    .param(Parameter::new("value").typed(Some("string")))
                    .returns("self")
                    .body(format!("return new self({});", ctx.from_raw(only.r#type.as_deref(), &value))),
            );
        }
    }

    Ok(builder::single(class.build()))
}

pub fn from_external_value(_: &Type, _: &str) -> Result<String, BuildError> {
    Err(super::not_supported("from_external_value", Kind::Data))
}

pub fn to_external_value(_: &Type, _: &str) -> Result<String, BuildError> {
    Err(super::not_supported("to_external_value", Kind::Data))
}

// loose comparison walks the properties
pub fn equals(param: &str, other: &str) -> String { format!("{} == {}", param, other) }
