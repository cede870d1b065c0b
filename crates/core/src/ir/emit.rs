//! C# code emission.
//!
//! Expressions implement the `Emit` trait and render to a single string.
//! Statements and declarations are block-structured, so they are written
//! through a [`SourceWriter`] that owns indentation.

use super::types::{
    BinOp, CatchClause, CsClass, CsDeclaration, CsExpr, CsInterface, CsLiteral, CsMethod,
    CsParam, CsSignature, CsStmt, CsUnit, InterpolationPart,
};
use super::utils::{escape_cs_string, escape_interpolated_text};
use super::writer::{SourceWriter, Unbalanced};

/// First line of every generated file.
pub const AUTO_GENERATED_HEADER: &str = "// <auto-generated/>";

/// Trait for emitting C# code from AST nodes.
pub trait Emit {
    /// Convert the AST node to its C# string representation.
    fn emit(&self) -> String;
}

// =============================================================================
// Expressions
// =============================================================================

impl Emit for CsLiteral {
    fn emit(&self) -> String {
        match self {
            CsLiteral::String(s) => format!("\"{}\"", escape_cs_string(s)),
            CsLiteral::Int(i) => i.to_string(),
            CsLiteral::Bool(b) => b.to_string(),
            CsLiteral::Default => "default".to_string(),
        }
    }
}

impl Emit for InterpolationPart {
    fn emit(&self) -> String {
        match self {
            InterpolationPart::Text(text) => escape_interpolated_text(text),
            InterpolationPart::Hole { expr, format: None } => format!("{{{expr}}}"),
            InterpolationPart::Hole {
                expr,
                format: Some(format),
            } => format!("{{{expr}:{format}}}"),
        }
    }
}

impl Emit for BinOp {
    fn emit(&self) -> String {
        match self {
            BinOp::Equal => "==".to_string(),
            BinOp::Greater => ">".to_string(),
            BinOp::And => "&&".to_string(),
        }
    }
}

fn emit_args(args: &[CsExpr]) -> String {
    args.iter().map(Emit::emit).collect::<Vec<_>>().join(", ")
}

impl Emit for CsExpr {
    fn emit(&self) -> String {
        match self {
            CsExpr::Ident(name) => name.clone(),
            CsExpr::Literal(lit) => lit.emit(),
            CsExpr::Interpolated(parts) => {
                let content: String = parts.iter().map(Emit::emit).collect();
                format!("$\"{content}\"")
            }
            CsExpr::Call {
                callee,
                type_args,
                args,
            } => {
                let generics = if type_args.is_empty() {
                    String::new()
                } else {
                    format!("<{}>", type_args.join(", "))
                };
                format!("{}{}({})", callee.emit(), generics, emit_args(args))
            }
            CsExpr::Member { object, member } => format!("{}.{}", object.emit(), member),
            CsExpr::New { ty, args } => format!("new {}({})", ty, emit_args(args)),
            CsExpr::Await(expr) => format!("await {}", expr.emit()),
            CsExpr::Not(expr) => {
                // Operands that bind looser than `!` need parentheses
                if matches!(**expr, CsExpr::Binary { .. } | CsExpr::Await(_)) {
                    format!("!({})", expr.emit())
                } else {
                    format!("!{}", expr.emit())
                }
            }
            CsExpr::Binary { left, op, right } => {
                format!("{} {} {}", left.emit(), op.emit(), right.emit())
            }
            CsExpr::Raw(code) => code.clone(),
        }
    }
}

// =============================================================================
// Signatures
// =============================================================================

impl Emit for CsParam {
    fn emit(&self) -> String {
        format!("{} {}", self.ty, self.name)
    }
}

impl Emit for CsSignature {
    fn emit(&self) -> String {
        let params = self.params.iter().map(Emit::emit).collect::<Vec<_>>().join(", ");
        format!("{} {}({})", self.return_type, self.name, params)
    }
}

impl Emit for CsDeclaration {
    fn emit(&self) -> String {
        if self.modifiers.is_empty() {
            format!("{};", self.signature.emit())
        } else {
            format!("{} {};", self.modifiers, self.signature.emit())
        }
    }
}

// =============================================================================
// Statements
// =============================================================================

fn write_body(w: &mut SourceWriter, body: &[CsStmt]) {
    w.begin_block();
    for stmt in body {
        stmt.write_to(w);
    }
    w.end_block();
}

impl CsStmt {
    /// Write the statement at the writer's current depth.
    pub fn write_to(&self, w: &mut SourceWriter) {
        match self {
            CsStmt::VarDecl { name, init } => {
                w.write_line(&format!("var {} = {};", name, init.emit()));
            }
            CsStmt::Assign { target, value } => {
                w.write_line(&format!("{} = {};", target.emit(), value.emit()));
            }
            CsStmt::Expr(expr) => w.write_line(&format!("{};", expr.emit())),
            CsStmt::Return(expr) => w.write_line(&format!("return {};", expr.emit())),
            CsStmt::Rethrow => w.write_line("throw;"),
            CsStmt::If { cond, then_body } => {
                w.write_line(&format!("if ({})", cond.emit()));
                write_body(w, then_body);
            }
            CsStmt::Using { name, init, body } => {
                w.write_line(&format!("using (var {} = {})", name, init.emit()));
                write_body(w, body);
            }
            CsStmt::ForEach {
                item,
                collection,
                body,
            } => {
                w.write_line(&format!("foreach (var {} in {})", item, collection.emit()));
                write_body(w, body);
            }
            CsStmt::Block(body) => write_body(w, body),
            CsStmt::Try {
                body,
                catch,
                finally,
            } => {
                w.write_line("try");
                write_body(w, body);
                if let Some(CatchClause {
                    exception_type,
                    variable,
                    body,
                }) = catch
                {
                    w.write_line(&format!("catch ({exception_type} {variable})"));
                    write_body(w, body);
                }
                if let Some(finally) = finally {
                    w.write_line("finally");
                    write_body(w, finally);
                }
            }
            CsStmt::Blank => w.blank_line(),
        }
    }
}

// =============================================================================
// Declarations
// =============================================================================

impl CsMethod {
    pub fn write_to(&self, w: &mut SourceWriter) {
        w.write_line(&format!("{} {}", self.modifiers, self.signature.emit()));
        write_body(w, &self.body);
    }
}

impl CsInterface {
    pub fn write_to(&self, w: &mut SourceWriter) {
        w.write_line(&format!("public interface {}", self.name));
        w.begin_block();
        for member in &self.members {
            w.write_line(&member.emit());
        }
        w.end_block();
    }
}

impl CsClass {
    pub fn write_to(&self, w: &mut SourceWriter) {
        if self.bases.is_empty() {
            w.write_line(&format!("public partial class {}", self.name));
        } else {
            w.write_line(&format!(
                "public partial class {} : {}",
                self.name,
                self.bases.join(", ")
            ));
        }
        w.begin_block();

        let mut first = true;
        let mut separate = |w: &mut SourceWriter| {
            if !first {
                w.blank_line();
            }
            first = false;
        };

        if !self.fields.is_empty() {
            separate(w);
            for field in &self.fields {
                w.write_line(&format!("{field};"));
            }
        }
        for method in &self.methods {
            separate(w);
            method.write_to(w);
        }
        if !self.partial_declarations.is_empty() {
            separate(w);
            for decl in &self.partial_declarations {
                w.write_line(&decl.emit());
            }
        }

        w.end_block();
    }
}

impl CsUnit {
    /// Render the complete file.
    pub fn to_source(&self) -> Result<String, Unbalanced> {
        let mut w = SourceWriter::new();
        w.write_line(AUTO_GENERATED_HEADER);
        for using in &self.usings {
            w.write_line(&format!("using {using};"));
        }
        w.blank_line();

        let scoped = !self.namespace.is_empty();
        if scoped {
            w.write_line(&format!("namespace {}", self.namespace));
            w.begin_block();
        }
        self.interface.write_to(&mut w);
        w.blank_line();
        self.class.write_to(&mut w);
        if scoped {
            w.end_block();
        }
        w.finish()
    }
}

// =============================================================================
// Tests
// =============================================================================
