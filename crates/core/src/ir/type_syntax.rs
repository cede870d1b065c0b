//! Type syntax parsing for declared return and parameter types.
//!
//! Supports the subset the generator needs to reason about: dotted names,
//! generic argument lists, `[]` array suffixes and `?` nullable suffixes.
//! Anything else (tuples, pointers, function types) is rejected.

use std::fmt;

use serde::{Serialize, Serializer};

/// A parsed type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeSyntax {
    /// `Name` or `Name<A, B>`
    Named {
        /// Possibly qualified name.
        name: String,
        /// Type arguments, empty for a plain name.
        args: Vec<TypeSyntax>,
    },
    /// `T[]`
    Array(Box<TypeSyntax>),
    /// `T?`
    Nullable(Box<TypeSyntax>),
}

impl TypeSyntax {
    /// Parse a complete type from text.
    pub fn parse(text: &str) -> Result<TypeSyntax, String> {
        let mut parser = Parser {
            chars: text.chars().collect(),
            pos: 0,
        };
        let ty = parser.parse_type()?;
        parser.skip_ws();
        if parser.pos != parser.chars.len() {
            return Err(format!(
                "unexpected '{}' at offset {} in type '{}'",
                parser.chars[parser.pos], parser.pos, text
            ));
        }
        Ok(ty)
    }

    /// Element type when this is an array.
    pub fn array_element(&self) -> Option<&TypeSyntax> {
        match self {
            TypeSyntax::Array(element) => Some(element),
            _ => None,
        }
    }
}

impl fmt::Display for TypeSyntax {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeSyntax::Named { name, args } if args.is_empty() => f.write_str(name),
            TypeSyntax::Named { name, args } => {
                f.write_str(name)?;
                f.write_str("<")?;
                for (idx, arg) in args.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                f.write_str(">")
            }
            TypeSyntax::Array(element) => write!(f, "{element}[]"),
            TypeSyntax::Nullable(inner) => write!(f, "{inner}?"),
        }
    }
}

impl Serialize for TypeSyntax {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct Parser {
    chars: Vec<char>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while self.peek().is_some_and(char::is_whitespace) {
            self.pos += 1;
        }
    }

    fn expect(&mut self, expected: char) -> Result<(), String> {
        self.skip_ws();
        match self.peek() {
            Some(c) if c == expected => {
                self.pos += 1;
                Ok(())
            }
            Some(c) => Err(format!("expected '{expected}', found '{c}'")),
            None => Err(format!("expected '{expected}', found end of input")),
        }
    }

    fn parse_type(&mut self) -> Result<TypeSyntax, String> {
        self.skip_ws();
        let name = self.parse_name()?;
        let mut args = Vec::new();

        self.skip_ws();
        if self.peek() == Some('<') {
            self.pos += 1;
            loop {
                args.push(self.parse_type()?);
                self.skip_ws();
                match self.peek() {
                    Some(',') => self.pos += 1,
                    Some('>') => {
                        self.pos += 1;
                        break;
                    }
                    Some(c) => return Err(format!("unexpected '{c}' in type arguments")),
                    None => return Err("unterminated type argument list".into()),
                }
            }
        }

        let mut ty = TypeSyntax::Named { name, args };
        loop {
            self.skip_ws();
            match self.peek() {
                Some('[') => {
                    self.pos += 1;
                    self.expect(']')?;
                    ty = TypeSyntax::Array(Box::new(ty));
                }
                Some('?') => {
                    self.pos += 1;
                    ty = TypeSyntax::Nullable(Box::new(ty));
                }
                _ => break,
            }
        }
        Ok(ty)
    }

    fn parse_name(&mut self) -> Result<String, String> {
        let start = self.pos;
        while self
            .peek()
            .is_some_and(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '.' | ':'))
        {
            self.pos += 1;
        }
        let name: String = self.chars[start..self.pos].iter().collect();
        if name.is_empty() {
            return Err(match self.peek() {
                Some(c) => format!("expected a type name, found '{c}'"),
                None => "expected a type name, found end of input".into(),
            });
        }

        // `global::System.String` is fine, `System..String` or `.String` are not.
        let unqualified = name.strip_prefix("global::").unwrap_or(&name);
        let valid = unqualified.split('.').all(|segment| {
            segment
                .chars()
                .next()
                .is_some_and(|c| c.is_alphabetic() || c == '_' || c == '@')
                && !segment.contains(':')
        });
        if !valid {
            return Err(format!("invalid type name '{name}'"));
        }
        Ok(name)
    }
}
