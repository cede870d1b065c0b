//! Common utilities for C# code generation.
//!
//! This module provides shared helper functions used across extraction and codegen.

use std::collections::HashSet;
use std::sync::LazyLock;

/// C# reserved keywords that need an `@` prefix to be used as identifiers.
pub static CS_RESERVED_WORDS: LazyLock<HashSet<&'static str>> = LazyLock::new(|| {
    [
        "abstract", "as", "base", "bool", "break", "byte", "case", "catch", "char", "checked",
        "class", "const", "continue", "decimal", "default", "delegate", "do", "double", "else",
        "enum", "event", "explicit", "extern", "false", "finally", "fixed", "float", "for",
        "foreach", "goto", "if", "implicit", "in", "int", "interface", "internal", "is", "lock",
        "long", "namespace", "new", "null", "object", "operator", "out", "override", "params",
        "private", "protected", "public", "readonly", "ref", "return", "sbyte", "sealed",
        "short", "sizeof", "stackalloc", "static", "string", "struct", "switch", "this",
        "throw", "true", "try", "typeof", "uint", "ulong", "unchecked", "unsafe", "ushort",
        "using", "virtual", "void", "volatile", "while",
    ]
    .into_iter()
    .collect()
});

/// Keyword type names, plus `void`. None of them can wrap an async result.
const CS_PREDEFINED_TYPES: &[&str] = &[
    "bool", "byte", "char", "decimal", "double", "dynamic", "float", "int", "long", "nint",
    "nuint", "object", "sbyte", "short", "string", "uint", "ulong", "ushort", "void",
];

/// Whether `name` is a C# keyword type such as `int` or `void`.
pub fn is_predefined_type(name: &str) -> bool {
    CS_PREDEFINED_TYPES.contains(&name)
}

/// Identifier usable in generated code (`class` becomes `@class`).
pub fn escape_identifier(name: &str) -> String {
    if CS_RESERVED_WORDS.contains(name) {
        format!("@{name}")
    } else {
        name.to_string()
    }
}

/// Attribute name without namespace qualification or `Attribute` suffix.
///
/// `ApiClient.Generated.HeaderAttribute` and `Header` both yield `Header`.
pub fn attribute_base_name(name: &str) -> &str {
    let last = name.rsplit('.').next().unwrap_or(name).trim();
    match last.strip_suffix("Attribute") {
        Some(stripped) if !stripped.is_empty() => stripped,
        _ => last,
    }
}

/// Segment of a path template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathSegment<'a> {
    /// Literal text between placeholders.
    Static(&'a str),
    /// `{name}` or `{name:constraint}`; `name` excludes the constraint.
    Placeholder {
        /// Name matched against parameters.
        name: &'a str,
        /// Original text including braces.
        raw: &'a str,
    },
}

/// Split a path template into literal text and `{placeholder}` segments.
///
/// An unterminated `{` is kept as literal text.
pub fn split_path_template(path: &str) -> Vec<PathSegment<'_>> {
    let mut segments = Vec::new();
    let mut rest = path;

    while let Some(open) = rest.find('{') {
        let Some(close_rel) = rest[open..].find('}') else {
            break;
        };
        let close = open + close_rel;
        if open > 0 {
            segments.push(PathSegment::Static(&rest[..open]));
        }
        let raw = &rest[open..=close];
        let inner = &rest[open + 1..close];
        let name = inner.split(':').next().unwrap_or(inner).trim();
        segments.push(PathSegment::Placeholder { name, raw });
        rest = &rest[close + 1..];
    }

    if !rest.is_empty() {
        segments.push(PathSegment::Static(rest));
    }
    segments
}

/// Placeholder names of a path template, in order.
pub fn path_placeholders(path: &str) -> Vec<&str> {
    split_path_template(path)
        .into_iter()
        .filter_map(|segment| match segment {
            PathSegment::Placeholder { name, .. } => Some(name),
            PathSegment::Static(_) => None,
        })
        .collect()
}

/// Escape text for a C# regular string literal.
pub fn escape_cs_string(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape literal text inside a C# interpolated string (braces are doubled).
pub fn escape_interpolated_text(s: &str) -> String {
    escape_cs_string(s).replace('{', "{{").replace('}', "}}")
}

/// Lowercased name for case-insensitive type dispatch, without `global::`.
pub fn normalized_type_name(name: &str) -> String {
    name.strip_prefix("global::")
        .unwrap_or(name)
        .to_ascii_lowercase()
}
