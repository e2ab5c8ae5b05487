//! Deriving resolution
//!
//! Derivings are requested behaviours attached to a definition. Resolving them
//! turns the declared list into a set and rejects combinations the builder
//! cannot honour.
use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use serde::Serialize;

use crate::definition::Definition;

#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Debug, Serialize)]
pub enum Deriving {
    Enum,
    Equals,
    ToString,
    FromString,
    ToArray,
    FromArray,
}

impl Deriving {
    pub const ALL: [Deriving; 6] = [
        Deriving::Enum,
        Deriving::Equals,
        Deriving::ToString,
        Deriving::FromString,
        Deriving::ToArray,
        Deriving::FromArray,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Deriving::Enum => "Enum",
            Deriving::Equals => "Equals",
            Deriving::ToString => "ToString",
            Deriving::FromString => "FromString",
            Deriving::ToArray => "ToArray",
            Deriving::FromArray => "FromArray",
        }
    }
}

impl Display for Deriving {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result { write!(f, "{}", self.name()) }
}

impl FromStr for Deriving {
    type Err = DerivingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Deriving::ALL
            .iter()
            .copied()
            .find(|d| d.name() == s)
            .ok_or_else(|| DerivingError::Unknown(s.to_string()))
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum DerivingError {
    #[error("Unknown deriving '{0}'")]
    Unknown(String),
    #[error("Invalid enum deriving on '{definition}': {reason}")]
    InvalidEnum { definition: String, reason: String },
    #[error("Deriving {first} conflicts with {second} on '{definition}'")]
    Conflict {
        definition: String,
        first: Deriving,
        second: Deriving,
    },
    #[error("Cannot derive {deriving} for '{definition}': {reason}")]
    Unsupported {
        definition: String,
        deriving: Deriving,
        reason: String,
    },
}

pub type DerivingSet = BTreeSet<Deriving>;

const CONFLICTS: [(Deriving, Deriving); 2] = [
    (Deriving::Enum, Deriving::ToArray),
    (Deriving::Enum, Deriving::FromArray),
];

/// Validates the derivings of `definition` and returns them as a set.
pub fn resolve(definition: &Definition) -> Result<DerivingSet, DerivingError> {
    let set: DerivingSet = definition.derivings.iter().copied().collect();
    let name = definition.fqcn();

    for (first, second) in CONFLICTS.iter() {
        if set.contains(first) && set.contains(second) {
            return Err(DerivingError::Conflict {
                definition: name,
                first: *first,
                second: *second,
            });
        }
    }

    if set.contains(&Deriving::Enum) {
        if definition.constructors.len() < 2 {
            return Err(DerivingError::InvalidEnum {
                definition: name,
                reason: format!(
                    "at least 2 constructors required, found {}",
                    definition.constructors.len()
                ),
            });
        }
        if let Some(c) = definition.constructors.iter().find(|c| !c.arguments.is_empty()) {
            return Err(DerivingError::InvalidEnum {
                definition: name,
                reason: format!("constructor '{}' has arguments", c.name),
            });
        }
    }

    for deriving in [Deriving::ToString, Deriving::FromString].iter() {
        if !set.contains(deriving) || set.contains(&Deriving::Enum) {
            continue;
        }
        let single_value = definition.constructors.len() == 1 && definition.constructors[0].arguments.len() == 1;
        if !single_value {
            return Err(DerivingError::Unsupported {
                definition: name,
                deriving: *deriving,
                reason: "requires exactly one constructor with exactly one argument".to_string(),
            });
        }
    }

    Ok(set)
}
