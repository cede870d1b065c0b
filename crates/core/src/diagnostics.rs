//! Diagnostics reported while extracting a declaration.
//!
//! Every diagnostic is an error for the method it names: the method is still
//! generated, but the part the diagnostic describes is left out.

use std::fmt;

use serde::Serialize;

/// What went wrong.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum DiagnosticKind {
    /// More than one parameter carries request content (`[Body]` / `[Body(true)]`).
    MultipleContentParameters {
        /// Offending parameter names, in declaration order.
        parameters: Vec<String>,
    },
}

/// A diagnostic located at a method of a client class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Diagnostic {
    /// Client class the method belongs to.
    pub class_name: String,
    /// Method the diagnostic is located at.
    pub method_name: String,
    /// What was found.
    #[serde(flatten)]
    pub kind: DiagnosticKind,
}

impl Diagnostic {
    /// Stable identifier, shown next to the message.
    pub const fn code(&self) -> &'static str {
        match self.kind {
            DiagnosticKind::MultipleContentParameters { .. } => "CG001",
        }
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            DiagnosticKind::MultipleContentParameters { parameters } => write!(
                f,
                "{} {}.{}: more than one body/form parameter ({}); request content is not generated",
                self.code(),
                self.class_name,
                self.method_name,
                parameters.join(", ")
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_lists_offending_parameters() {
        let diag = Diagnostic {
            class_name: "Client".into(),
            method_name: "PostAsync".into(),
            kind: DiagnosticKind::MultipleContentParameters {
                parameters: vec!["a".into(), "b".into()],
            },
        };
        assert_eq!(
            diag.to_string(),
            "CG001 Client.PostAsync: more than one body/form parameter (a, b); request content is not generated"
        );
    }
}
