//! Code generator for typed HTTP clients.
//!
//! A client class is declared as data (JSON or YAML): a namespace, imports,
//! and annotated method signatures. The generator resolves every annotation
//! into an IR and renders a C# interface plus a partial class implementing
//! each request over `System.Net.Http.HttpClient`.

pub mod common;
pub mod config;
pub mod declaration;
pub mod diagnostics;
pub mod emitter;
pub mod error;
pub mod ir;

pub use common::{COMMON_HINT_NAME, common_attributes};
pub use config::{DEFAULT_ROOT_NAMESPACE, GeneratorDefaults, clamp_threshold};
pub use declaration::ClassDeclaration;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use emitter::{GeneratedSource, GenerationOutput, generate, generate_client};
pub use error::GenerateError;
