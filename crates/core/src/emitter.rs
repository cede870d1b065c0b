//! C# client emitter for annotated class declarations.
//!
//! This module is a thin wrapper around the IR-based code generation.
//! The pipeline is:
//! 1. Parse: JSON/YAML -> ClassDeclaration
//! 2. Extract: ClassDeclaration -> ClientDescriptor (all annotation logic resolved)
//! 3. Codegen: ClientDescriptor -> CsUnit (C# AST)
//! 4. Emit: CsUnit -> String (via SourceWriter)

use serde::Serialize;
use tracing::debug;

use crate::config::GeneratorDefaults;
use crate::declaration::ClassDeclaration;
use crate::diagnostics::Diagnostic;
use crate::error::GenerateError;
use crate::ir::{codegen_client, extract_client};

/// A generated compilation unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedSource {
    /// Deterministic file name derived from the class name.
    pub hint_name: String,
    /// Generated source text.
    pub text: String,
}

/// Output of generating one class.
#[derive(Debug, Clone)]
pub struct GenerationOutput {
    /// The generated source.
    pub source: GeneratedSource,
    /// Diagnostics reported during generation.
    pub diagnostics: Vec<Diagnostic>,
}

impl GenerationOutput {
    /// Whether any diagnostic was reported for the class.
    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }
}

/// Generate C# source for one client class.
pub fn generate_client(
    class: &ClassDeclaration,
    defaults: &GeneratorDefaults,
) -> Result<GenerationOutput, GenerateError> {
    let extraction = extract_client(class, defaults);
    let client = &extraction.client;

    let text = codegen_client(client)
        .to_source()
        .map_err(|err| GenerateError::UnbalancedBlocks {
            class: client.class_name.clone(),
            depth: err.depth,
        })?;

    debug!(
        class = %client.class_name,
        methods = client.methods.len(),
        eligible = client.eligible_methods().count(),
        diagnostics = extraction.diagnostics.len(),
        "Generated client."
    );

    Ok(GenerationOutput {
        source: GeneratedSource {
            hint_name: client.hint_name(),
            text,
        },
        diagnostics: extraction.diagnostics,
    })
}

/// Generate every class of a JSON declaration document.
pub fn generate(
    declaration_json: &str,
    defaults: &GeneratorDefaults,
) -> Result<Vec<GenerationOutput>, GenerateError> {
    crate::declaration::from_json(declaration_json)?
        .iter()
        .map(|class| generate_client(class, defaults))
        .collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_json_document() {
        let json = r#"{
            "clients": [
                { "name": "First", "methods": [] },
                {
                    "namespace": "Acme",
                    "name": "Second",
                    "methods": [
                        {
                            "name": "PingAsync",
                            "returnType": "Task",
                            "attributes": [{ "name": "Get", "args": [{ "value": "/ping" }] }]
                        }
                    ]
                }
            ]
        }"#;
        let outputs = generate(json, &GeneratorDefaults::default()).unwrap();
        let names: Vec<_> = outputs.iter().map(|o| o.source.hint_name.as_str()).collect();
        assert_eq!(names, vec!["First_Generated.g.cs", "Second_Generated.g.cs"]);
        assert!(outputs[1].source.text.contains("Task PingAsync();"));
        assert!(!outputs[1].has_errors());
    }

    #[test]
    fn test_generate_rejects_invalid_json() {
        let err = generate("[", &GeneratorDefaults::default()).unwrap_err();
        assert!(matches!(err, GenerateError::Json(_)));
    }
}
