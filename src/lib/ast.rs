//! Contains the AST which is output by the parser
//!
//! Nothing here is checked beyond what the grammar enforces. Lowering into
//! [`crate::definition::Definition`]s is where cross-declaration rules apply.
use std::fmt::{self, Display, Formatter};

use serde::Serialize;

/// Every kind of declaration the language knows about
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub enum Kind {
    Enum,
    Data,
    Int,
    Float,
    Guid,
    String,
    Bool,
    Marker,
}

impl Kind {
    pub fn keyword(&self) -> &'static str {
        match self {
            Kind::Enum => "enum",
            Kind::Data => "data",
            Kind::Int => "int",
            Kind::Float => "float",
            Kind::Guid => "guid",
            Kind::String => "string",
            Kind::Bool => "bool",
            Kind::Marker => "marker",
        }
    }
}

impl Display for Kind {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "{}", self.keyword()) }
}

/// A single `$name` in a data declaration
#[derive(Clone, PartialEq, Debug, Serialize)]
pub struct Argument {
    pub name: String,
    /// `None` means untyped
    pub r#type: Option<String>,
    pub nullable: bool,
    /// `type` is then the element type
    pub is_list: bool,
    /// Literal source text, e.g. `'foo'`, `[]`, `null`
    pub default_value: Option<String>,
}

impl Argument {
    pub fn new<S: Into<String>>(name: S) -> Argument {
        Argument {
            name: name.into(),
            r#type: None,
            nullable: false,
            is_list: false,
            default_value: None,
        }
    }

    pub fn typed<S: Into<String>>(mut self, ty: S) -> Argument {
        self.r#type = Some(ty.into());
        self
    }

    pub fn nullable(mut self) -> Argument {
        self.nullable = true;
        self
    }

    pub fn list(mut self) -> Argument {
        self.is_list = true;
        self
    }

    pub fn with_default<S: Into<String>>(mut self, value: S) -> Argument {
        self.default_value = Some(value.into());
        self
    }

    pub fn is_scalar(&self) -> bool { matches!(self.r#type.as_deref(), Some("string" | "int" | "bool" | "float")) }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Enum {
    pub classname: String,
    pub markers: Vec<String>,
    pub variants: Vec<String>,
    pub derivings: Vec<String>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct Data {
    pub classname: String,
    pub markers: Vec<String>,
    pub arguments: Vec<Argument>,
    pub derivings: Vec<String>,
}

/// Declarations made of a keyword, a name and markers only
#[derive(Clone, PartialEq, Debug)]
pub struct Named {
    pub classname: String,
    pub markers: Vec<String>,
}

impl Named {
    pub fn new<S: Into<String>>(classname: S, markers: Vec<String>) -> Named {
        Named {
            classname: classname.into(),
            markers,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub enum Type {
    Enum(Enum),
    Data(Data),
    Int(Named),
    Float(Named),
    Guid(Named),
    String(Named),
    Bool(Named),
    /// Markers listed on a marker are the interfaces it extends
    Marker(Named),
}

impl Type {
    pub fn kind(&self) -> Kind {
        match self {
            Type::Enum(_) => Kind::Enum,
            Type::Data(_) => Kind::Data,
            Type::Int(_) => Kind::Int,
            Type::Float(_) => Kind::Float,
            Type::Guid(_) => Kind::Guid,
            Type::String(_) => Kind::String,
            Type::Bool(_) => Kind::Bool,
            Type::Marker(_) => Kind::Marker,
        }
    }

    pub fn classname(&self) -> &str {
        match self {
            Type::Enum(e) => &e.classname,
            Type::Data(d) => &d.classname,
            Type::Int(n) | Type::Float(n) | Type::Guid(n) | Type::String(n) | Type::Bool(n) | Type::Marker(n) => {
                &n.classname
            }
        }
    }

    pub fn markers(&self) -> &[String] {
        match self {
            Type::Enum(e) => &e.markers,
            Type::Data(d) => &d.markers,
            Type::Int(n) | Type::Float(n) | Type::Guid(n) | Type::String(n) | Type::Bool(n) | Type::Marker(n) => {
                &n.markers
            }
        }
    }

    /// Deriving tags as written in the source
    pub fn derivings(&self) -> &[String] {
        match self {
            Type::Enum(e) => &e.derivings,
            Type::Data(d) => &d.derivings,
            _ => &[],
        }
    }

    /// Imports the generated code for this type needs in its namespace
    pub fn required_imports(&self) -> Vec<Import> {
        match self {
            Type::Guid(_) => ["FeatureSet", "Uuid", "UuidFactory", "UuidInterface"]
                .iter()
                .map(|name| Import::new(format!("Ramsey\\Uuid\\{}", name)))
                .collect(),
            _ => Vec::new(),
        }
    }
}

#[derive(Clone, PartialEq, Eq, Debug, Serialize)]
pub struct Import {
    pub name: String,
    pub alias: Option<String>,
}

impl Import {
    pub fn new<S: Into<String>>(name: S) -> Import {
        Import {
            name: name.into(),
            alias: None,
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Namespace {
    pub name: String,
    pub imports: Vec<Import>,
    pub types: Vec<Type>,
}

impl Namespace {
    pub fn new<S: Into<String>>(name: S) -> Namespace {
        Namespace {
            name: name.into(),
            imports: Vec::new(),
            types: Vec::new(),
        }
    }

    pub fn add_import(&mut self, import: Import) {
        if !self.imports.contains(&import) {
            self.imports.push(import);
        }
    }

    pub fn add_type(&mut self, ty: Type) {
        for import in ty.required_imports() {
            self.add_import(import);
        }
        self.types.push(ty);
    }

    /// Appends everything declared in a reopened block of the same namespace.
    pub fn merge(&mut self, other: Namespace) {
        for import in other.imports {
            self.add_import(import);
        }
        self.types.extend(other.types);
    }
}

/// Folds reopened namespaces into their first occurrence, keeping source order.
pub fn merge_namespaces<I: IntoIterator<Item = Namespace>>(namespaces: I) -> Vec<Namespace> {
    let mut merged: Vec<Namespace> = Vec::new();
    for namespace in namespaces {
        match merged.iter_mut().find(|n| n.name == namespace.name) {
            Some(existing) => existing.merge(namespace),
            None => merged.push(namespace),
        }
    }
    merged
}
