//! Build-ready definitions
//!
//! Parsed namespaces are lowered into one [`Definition`] per declaration and
//! collected into a [`DefinitionCollection`], which the builder uses for cross
//! references.
use std::collections::HashMap;

use crate::ast::{Argument, Namespace, Type};
use crate::deriving::{Deriving, DerivingError};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DefinitionError {
    #[error("Duplicate definition: {0}")]
    Duplicate(String),
    #[error(transparent)]
    Deriving(#[from] DerivingError),
}

/// One variant of a sum type, or the only shape of a product type
#[derive(Clone, PartialEq, Debug)]
pub struct Constructor {
    /// Fully qualified, e.g. `Foo\Red`
    pub name: String,
    pub arguments: Vec<Argument>,
}

impl Constructor {
    pub fn new<S: Into<String>>(name: S) -> Constructor {
        Constructor {
            name: name.into(),
            arguments: Vec::new(),
        }
    }

    pub fn with_arguments(mut self, arguments: Vec<Argument>) -> Constructor {
        self.arguments = arguments;
        self
    }

    /// Unqualified class name
    pub fn classname(&self) -> &str { unqualified(&self.name) }
}

pub fn unqualified(name: &str) -> &str { name.rsplit('\\').next().unwrap_or(name) }

pub fn qualify(namespace: &str, name: &str) -> String {
    if namespace.is_empty() {
        name.to_string()
    } else {
        format!("{}\\{}", namespace, name)
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Definition {
    pub namespace: String,
    pub name: String,
    pub r#type: Type,
    pub constructors: Vec<Constructor>,
    pub derivings: Vec<Deriving>,
    /// Class the generated base class extends
    pub parent: Option<String>,
}

impl Definition {
    pub fn new<N: Into<String>, C: Into<String>>(
        namespace: N,
        name: C,
        r#type: Type,
        constructors: Vec<Constructor>,
    ) -> Definition {
        Definition {
            namespace: namespace.into(),
            name: name.into(),
            r#type,
            constructors,
            derivings: Vec::new(),
            parent: None,
        }
    }

    pub fn with_derivings(mut self, derivings: Vec<Deriving>) -> Definition {
        self.derivings = derivings;
        self
    }

    pub fn with_parent<S: Into<String>>(mut self, parent: S) -> Definition {
        self.parent = Some(parent.into());
        self
    }

    pub fn fqcn(&self) -> String { qualify(&self.namespace, &self.name) }

    pub fn derives(&self, deriving: Deriving) -> bool { self.derivings.contains(&deriving) }

    /// Lowers one parsed declaration.
    pub fn from_type(namespace: &str, ty: &Type) -> Result<Definition, DerivingError> {
        let classname = ty.classname();
        let mut derivings = ty
            .derivings()
            .iter()
            .map(|tag| tag.parse::<Deriving>())
            .collect::<Result<Vec<_>, _>>()?;

        let constructors = match ty {
            Type::Enum(e) => {
                if !derivings.contains(&Deriving::Enum) {
                    derivings.insert(0, Deriving::Enum);
                }
                e.variants
                    .iter()
                    .map(|v| Constructor::new(qualify(namespace, v)))
                    .collect()
            }
            Type::Data(d) => vec![Constructor::new(qualify(namespace, classname)).with_arguments(d.arguments.clone())],
            Type::Int(_) | Type::Float(_) | Type::Guid(_) | Type::String(_) | Type::Bool(_) => {
                let value = Argument::new("value").typed(ty.kind().keyword());
                vec![Constructor::new(qualify(namespace, classname)).with_arguments(vec![value])]
            }
            Type::Marker(_) => Vec::new(),
        };

        Ok(Definition::new(namespace, classname, ty.clone(), constructors).with_derivings(derivings))
    }
}

/// All definitions of one compilation run, in declaration order
#[derive(Clone, Debug, Default)]
pub struct DefinitionCollection {
    definitions: Vec<Definition>,
    index: HashMap<String, usize>,
}

impl DefinitionCollection {
    pub fn new(definitions: Vec<Definition>) -> Result<DefinitionCollection, DefinitionError> {
        let mut index = HashMap::with_capacity(definitions.len());
        for (i, definition) in definitions.iter().enumerate() {
            if index.insert(definition.fqcn(), i).is_some() {
                return Err(DefinitionError::Duplicate(definition.fqcn()));
            }
        }
        Ok(DefinitionCollection { definitions, index })
    }

    pub fn from_namespaces(namespaces: &[Namespace]) -> Result<DefinitionCollection, DefinitionError> {
        let mut definitions = Vec::new();
        for namespace in namespaces {
            for ty in &namespace.types {
                definitions.push(Definition::from_type(&namespace.name, ty)?);
            }
        }
        DefinitionCollection::new(definitions)
    }

    pub fn get(&self, fqcn: &str) -> Option<&Definition> { self.index.get(fqcn).map(|&i| &self.definitions[i]) }

    /// Resolves a type name as written inside `namespace`, trying the
    /// namespace-relative name first.
    pub fn resolve(&self, namespace: &str, name: &str) -> Option<&Definition> {
        self.get(&qualify(namespace, name)).or_else(|| self.get(name.trim_start_matches('\\')))
    }

    /// The definition owning the constructor called `name`
    pub fn owner_of(&self, constructor: &str) -> Option<&Definition> {
        self.definitions
            .iter()
            .find(|d| d.constructors.iter().any(|c| c.name == constructor))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Definition> { self.definitions.iter() }

    pub fn len(&self) -> usize { self.definitions.len() }

    pub fn is_empty(&self) -> bool { self.definitions.is_empty() }
}

impl<'c> IntoIterator for &'c DefinitionCollection {
    type Item = &'c Definition;
    type IntoIter = std::slice::Iter<'c, Definition>;

    fn into_iter(self) -> Self::IntoIter { self.definitions.iter() }
}
