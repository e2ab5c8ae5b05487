//! Language-agnostic class descriptors
//!
//! A [`ClassDescriptor`] is the complete shape of one generated class or
//! interface. It is assembled with a [`ClassBuilder`] and is immutable once
//! built; rendering it to source text is left to an external emitter.
use std::path::PathBuf;

use serde::Serialize;

use crate::ast::Import;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Protected,
    Private,
}

/// Modifier in front of `class`
#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKeyword {
    Abstract,
    Final,
    None,
}

impl ClassKeyword {
    /// The keyword as it prefixes a class declaration, with trailing space
    pub fn as_prefix(&self) -> &'static str {
        match self {
            ClassKeyword::Abstract => "abstract ",
            ClassKeyword::Final => "final ",
            ClassKeyword::None => "",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ClassKind {
    Class,
    Interface,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Constant {
    pub name: String,
    /// Source snippet
    pub value: String,
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Property {
    pub name: String,
    pub type_hint: Option<String>,
    pub nullable: bool,
    pub visibility: Visibility,
    pub is_static: bool,
    pub comment: Option<String>,
}

impl Property {
    pub fn private<S: Into<String>>(name: S) -> Property {
        Property {
            name: name.into(),
            type_hint: None,
            nullable: false,
            visibility: Visibility::Private,
            is_static: false,
            comment: None,
        }
    }

    pub fn typed(mut self, ty: Option<&str>) -> Property {
        self.type_hint = ty.map(str::to_string);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Property {
        self.nullable = nullable;
        self
    }

    pub fn static_(mut self) -> Property {
        self.is_static = true;
        self
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Property {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Parameter {
    pub name: String,
    pub type_hint: Option<String>,
    pub nullable: bool,
    /// Source snippet
    pub default_value: Option<String>,
}

impl Parameter {
    pub fn new<S: Into<String>>(name: S) -> Parameter {
        Parameter {
            name: name.into(),
            type_hint: None,
            nullable: false,
            default_value: None,
        }
    }

    pub fn typed(mut self, ty: Option<&str>) -> Parameter {
        self.type_hint = ty.map(str::to_string);
        self
    }

    pub fn nullable(mut self, nullable: bool) -> Parameter {
        self.nullable = nullable;
        self
    }

    pub fn default_value(mut self, value: Option<String>) -> Parameter {
        self.default_value = value;
        self
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Method {
    pub name: String,
    pub visibility: Visibility,
    pub is_static: bool,
    pub is_abstract: bool,
    pub parameters: Vec<Parameter>,
    pub return_type: Option<String>,
    pub return_nullable: bool,
    /// Source snippet, without the surrounding braces
    pub body: String,
    pub comment: Option<String>,
}

impl Method {
    pub fn public<S: Into<String>>(name: S) -> Method {
        Method {
            name: name.into(),
            visibility: Visibility::Public,
            is_static: false,
            is_abstract: false,
            parameters: Vec::new(),
            return_type: None,
            return_nullable: false,
            body: String::new(),
            comment: None,
        }
    }

    pub fn private(mut self) -> Method {
        self.visibility = Visibility::Private;
        self
    }

    pub fn static_(mut self) -> Method {
        self.is_static = true;
        self
    }

    pub fn abstract_(mut self) -> Method {
        self.is_abstract = true;
        self
    }

    pub fn param(mut self, parameter: Parameter) -> Method {
        self.parameters.push(parameter);
        self
    }

    pub fn returns<S: Into<String>>(mut self, ty: S) -> Method {
        self.return_type = Some(ty.into());
        self
    }

    pub fn returns_nullable(mut self, nullable: bool) -> Method {
        self.return_nullable = nullable;
        self
    }

    pub fn body<S: Into<String>>(mut self, body: S) -> Method {
        self.body = body.into();
        self
    }

    pub fn comment<S: Into<String>>(mut self, comment: S) -> Method {
        self.comment = Some(comment.into());
        self
    }
}

#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct ClassDescriptor {
    pub namespace: String,
    pub name: String,
    pub kind: ClassKind,
    pub keyword: ClassKeyword,
    pub extends: Vec<String>,
    pub implements: Vec<String>,
    pub imports: Vec<Import>,
    pub constants: Vec<Constant>,
    pub properties: Vec<Property>,
    pub methods: Vec<Method>,
    /// Where the emitter should write the rendered class
    pub output_path: PathBuf,
}

impl ClassDescriptor {
    pub fn fqcn(&self) -> String { crate::definition::qualify(&self.namespace, &self.name) }

    pub fn method(&self, name: &str) -> Option<&Method> { self.methods.iter().find(|m| m.name == name) }

    pub fn property(&self, name: &str) -> Option<&Property> { self.properties.iter().find(|p| p.name == name) }

    pub fn constant(&self, name: &str) -> Option<&Constant> { self.constants.iter().find(|c| c.name == name) }
}

/// Accumulates the shape of a class, then hands out an immutable descriptor.
#[derive(Clone, Debug)]
pub struct ClassBuilder {
    inner: ClassDescriptor,
}

impl ClassBuilder {
    pub fn new<N: Into<String>, C: Into<String>>(namespace: N, name: C) -> ClassBuilder {
        ClassBuilder {
            inner: ClassDescriptor {
                namespace: namespace.into(),
                name: name.into(),
                kind: ClassKind::Class,
                keyword: ClassKeyword::None,
                extends: Vec::new(),
                implements: Vec::new(),
                imports: Vec::new(),
                constants: Vec::new(),
                properties: Vec::new(),
                methods: Vec::new(),
                output_path: PathBuf::new(),
            },
        }
    }

    pub fn interface(mut self) -> ClassBuilder {
        self.inner.kind = ClassKind::Interface;
        self
    }

    pub fn keyword(mut self, keyword: ClassKeyword) -> ClassBuilder {
        self.inner.keyword = keyword;
        self
    }

    pub fn extends<S: Into<String>>(mut self, parent: S) -> ClassBuilder {
        self.inner.extends.push(parent.into());
        self
    }

    pub fn implements(mut self, markers: &[String]) -> ClassBuilder {
        self.inner.implements.extend(markers.iter().cloned());
        self
    }

    pub fn imports(mut self, imports: Vec<Import>) -> ClassBuilder {
        self.inner.imports.extend(imports);
        self
    }

    pub fn constant<N: Into<String>, V: Into<String>>(mut self, name: N, value: V) -> ClassBuilder {
        self.inner.constants.push(Constant {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    pub fn property(mut self, property: Property) -> ClassBuilder {
        self.inner.properties.push(property);
        self
    }

    pub fn method(mut self, method: Method) -> ClassBuilder {
        self.inner.methods.push(method);
        self
    }

    pub fn output_path(mut self, path: PathBuf) -> ClassBuilder {
        self.inner.output_path = path;
        self
    }

    pub fn build(self) -> ClassDescriptor { self.inner }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn builder_collects_members_in_order() {
        let class = ClassBuilder::new("Foo", "Age")
            .keyword(ClassKeyword::Final)
            .implements(&["Comparable".to_string()])
            .property(Property::private("value").typed(Some("int")))
            .method(Method::public("value").returns("int").body("return $this->value;"))
            .method(Method::public("equals").returns("bool"))
            .build();

        assert_eq!(class.fqcn(), "Foo\\Age");
        assert_eq!(class.keyword.as_prefix(), "final ");
        assert_eq!(class.implements, vec!["Comparable".to_string()]);
        let names: Vec<&str> = class.methods.iter().map(|m| m.name.as_str()).collect();
        assert_eq!(names, vec!["value", "equals"]);
        assert_eq!(class.property("value").and_then(|p| p.type_hint.as_deref()), Some("int"));
    }

    #[test]
    fn serializes_lowercase_enums() {
        let class = ClassBuilder::new("Foo", "Marker").interface().build();
        let json = serde_json::to_value(&class).unwrap();
        assert_eq!(json["kind"], "interface");
        assert_eq!(json["keyword"], "none");
    }
}
