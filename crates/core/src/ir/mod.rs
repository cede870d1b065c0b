//! Intermediate Representation for client class to C# code generation.
//!
//! This module defines a three-layer architecture:
//! 1. API-level IR: resolved client, methods, bindings, return shapes
//! 2. C# AST IR: expressions, statements, methods, the compilation unit
//! 3. Emission: AST to C# source text via the `Emit` trait and `SourceWriter`
//!
//! The separation allows:
//! - All annotation corner cases resolved during extraction
//! - Code generation builds structured AST (testable)
//! - Emission is purely mechanical string building
//!
//! ## Module Structure
//!
//! - `api`: API-level IR (ClientDescriptor, MethodDescriptor, ParameterDescriptor)
//! - `type_syntax`: return/parameter type text parsing
//! - `extract`: class declaration -> API IR
//! - `types`: C# AST IR (CsExpr, CsStmt, CsMethod, CsUnit)
//! - `codegen`: API IR -> C# AST
//! - `emit`: C# AST -> code strings
//! - `writer`: indentation-aware text accumulator
//! - `utils`: common utilities shared across modules

mod api;
mod codegen;
mod emit;
mod extract;
mod type_syntax;
mod types;
pub mod utils;
mod writer;

// Re-export the main entry points
pub use api::{
    Binding, ClientDescriptor, Endpoint, HttpVerb, MethodDescriptor, ParameterDescriptor,
    PassthroughReason, ReturnShape, SerializationMode, Serializer,
};
pub use codegen::{codegen_client, default_value_for};
pub use emit::{AUTO_GENERATED_HEADER, Emit};
pub use extract::{Extraction, classify_parameter, extract_client, resolve_return_shape};
pub use type_syntax::TypeSyntax;
pub use types::CsUnit;
pub use writer::{SourceWriter, Unbalanced};
