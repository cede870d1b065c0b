//! Declaration model structs for serde deserialization.
//!
//! This is the already-parsed form of an annotated client class as a host
//! front end hands it over: names, raw type text and attribute lists. Nothing
//! here is interpreted yet; the extractor turns it into the resolved IR.

use serde::{Deserialize, Serialize};

use crate::error::GenerateError;

/// One annotated client class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClassDeclaration {
    /// Enclosing namespace (empty for the global namespace).
    #[serde(default)]
    pub namespace: String,
    /// File-level imports, in source order.
    #[serde(default)]
    pub imports: Vec<String>,
    /// Class identifier.
    pub name: String,
    /// Class-level attributes (`ApiClientGenerator(...)`).
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Method members, in source order.
    #[serde(default)]
    pub methods: Vec<MethodDeclaration>,
}

/// A method member of the client class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDeclaration {
    /// Method identifier.
    pub name: String,
    /// Return type exactly as written, e.g. `Task<WeatherForecast[]>`.
    pub return_type: String,
    /// Method-level attributes (verb, `ThrowsExceptions`, ...).
    #[serde(default)]
    pub attributes: Vec<Attribute>,
    /// Parameters, in declaration order.
    #[serde(default)]
    pub parameters: Vec<ParameterDeclaration>,
}

/// A method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterDeclaration {
    /// Parameter identifier, possibly `@`-prefixed.
    pub name: String,
    /// Type text as written, e.g. `System.Threading.CancellationToken`.
    #[serde(rename = "type")]
    pub type_name: String,
    /// Binding attributes (`Body`, `Header`, `AliasAs`, `Fmt`).
    #[serde(default)]
    pub attributes: Vec<Attribute>,
}

/// An annotation applied to a class, method or parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribute {
    /// Attribute name, possibly namespace-qualified or `Attribute`-suffixed.
    pub name: String,
    /// Arguments in source order.
    #[serde(default)]
    pub args: Vec<AttributeArgument>,
}

/// A positional (`name` absent) or named attribute argument.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeArgument {
    /// Argument name for `Name = value` arguments.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Argument value.
    pub value: ArgumentValue,
}

/// Attribute argument value.
///
/// Only [`ArgumentValue::String`] is a literal usable as a path template; a
/// [`ArgumentValue::Symbol`] stands for any non-literal expression
/// (`Serialization.Custom`, a constant reference, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    /// `true` / `false`
    Bool(bool),
    /// Integer literal.
    Int(i64),
    /// String literal.
    String(String),
    /// Any other expression, kept as text.
    Symbol {
        /// Expression text, e.g. `Serialization.Custom`.
        symbol: String,
    },
}

impl ArgumentValue {
    /// The string literal, if this is one.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Text for symbolic lookups: string literals and symbols both qualify.
    pub fn as_symbolic(&self) -> Option<&str> {
        match self {
            ArgumentValue::String(s) | ArgumentValue::Symbol { symbol: s } => Some(s),
            _ => None,
        }
    }

    /// The boolean literal, if this is one.
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            ArgumentValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// The integer literal, if this is one.
    pub const fn as_int(&self) -> Option<i64> {
        match self {
            ArgumentValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl Attribute {
    /// First positional argument.
    pub fn positional(&self) -> Option<&ArgumentValue> {
        self.args.iter().find(|a| a.name.is_none()).map(|a| &a.value)
    }

    /// Named argument lookup, case-insensitive.
    pub fn named(&self, key: &str) -> Option<&ArgumentValue> {
        self.args
            .iter()
            .find(|a| a.name.as_deref().is_some_and(|n| n.eq_ignore_ascii_case(key)))
            .map(|a| &a.value)
    }
}

/// A declaration file: either a single class or a `clients` list.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeclarationFile {
    Many { clients: Vec<ClassDeclaration> },
    One(Box<ClassDeclaration>),
}

impl DeclarationFile {
    fn into_vec(self) -> Vec<ClassDeclaration> {
        match self {
            DeclarationFile::Many { clients } => clients,
            DeclarationFile::One(class) => vec![*class],
        }
    }
}

/// Parse declarations from JSON text.
pub fn from_json(text: &str) -> Result<Vec<ClassDeclaration>, GenerateError> {
    let file: DeclarationFile = serde_json::from_str(text)?;
    Ok(file.into_vec())
}

/// Parse declarations from YAML text.
pub fn from_yaml(text: &str) -> Result<Vec<ClassDeclaration>, GenerateError> {
    let file: DeclarationFile = serde_yaml::from_str(text)?;
    Ok(file.into_vec())
}
