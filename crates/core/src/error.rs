//! Errors of the generation pipeline.

use thiserror::Error;

/// Errors that stop a generation pass.
///
/// Shape problems in a declaration are not errors: they surface as
/// [`crate::Diagnostic`]s or demote the offending method.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The declaration document is not valid JSON for the model.
    #[error("invalid JSON declaration: {0}")]
    Json(#[from] serde_json::Error),

    /// The declaration document is not valid YAML for the model.
    #[error("invalid YAML declaration: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// The shared attribute template failed to render.
    #[error("failed to render attribute template: {0}")]
    Template(#[from] tera::Error),

    /// Emission left blocks open.
    #[error("generated source for {class} has {depth} unclosed block(s)")]
    UnbalancedBlocks {
        /// Client class being rendered.
        class: String,
        /// Blocks still open at the end.
        depth: usize,
    },
}
