//! C# IR types for code generation.
//!
//! This module defines the C# syntax the generator produces:
//! - CsExpr: Expressions (identifiers, calls, interpolated strings, ...)
//! - CsStmt: Statements, including block-structured ones (try, using, if)
//! - CsUnit: A compilation unit with an interface and a partial class

/// C# literal values
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsLiteral {
    String(String),
    Int(i64),
    Bool(bool),
    /// `default`
    Default,
}

/// Part of an interpolated string `$"..."`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterpolationPart {
    /// Literal text (escaped on emission)
    Text(String),
    /// `{expr}` or `{expr:format}`
    Hole { expr: String, format: Option<String> },
}

/// C# expression
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsExpr {
    /// Identifier or dotted path: `response`, `System.Net.Http.HttpMethod.Get`
    Ident(String),
    Literal(CsLiteral),
    /// Interpolated string: `$"/items/{id}"`
    Interpolated(Vec<InterpolationPart>),
    /// Method call: `callee<type_args>(args)`
    Call {
        callee: Box<CsExpr>,
        type_args: Vec<String>,
        args: Vec<CsExpr>,
    },
    /// Member access: `object.member`
    Member { object: Box<CsExpr>, member: String },
    /// Object creation: `new Type(args)`
    New { ty: String, args: Vec<CsExpr> },
    /// `await expr`
    Await(Box<CsExpr>),
    /// `!expr`
    Not(Box<CsExpr>),
    /// Binary operation: `left op right`
    Binary {
        left: Box<CsExpr>,
        op: BinOp,
        right: Box<CsExpr>,
    },
    /// Raw code that doesn't fit the AST
    Raw(String),
}

/// Binary operators
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Equal,
    Greater,
    And,
}

impl CsExpr {
    pub fn ident(name: impl Into<String>) -> CsExpr {
        CsExpr::Ident(name.into())
    }

    pub fn string(value: impl Into<String>) -> CsExpr {
        CsExpr::Literal(CsLiteral::String(value.into()))
    }

    pub fn member(self, member: impl Into<String>) -> CsExpr {
        CsExpr::Member {
            object: Box::new(self),
            member: member.into(),
        }
    }

    pub fn call(self, args: Vec<CsExpr>) -> CsExpr {
        CsExpr::Call {
            callee: Box::new(self),
            type_args: Vec::new(),
            args,
        }
    }

    pub fn call_generic(self, type_arg: impl Into<String>, args: Vec<CsExpr>) -> CsExpr {
        CsExpr::Call {
            callee: Box::new(self),
            type_args: vec![type_arg.into()],
            args,
        }
    }

    pub fn awaited(self) -> CsExpr {
        CsExpr::Await(Box::new(self))
    }

    pub fn negated(self) -> CsExpr {
        CsExpr::Not(Box::new(self))
    }

    pub fn binary(self, op: BinOp, right: CsExpr) -> CsExpr {
        CsExpr::Binary {
            left: Box::new(self),
            op,
            right: Box::new(right),
        }
    }
}

/// Catch clause of a try statement
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatchClause {
    /// Exception type, e.g. `System.Exception`
    pub exception_type: String,
    pub variable: String,
    pub body: Vec<CsStmt>,
}

/// Statement in a method body
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CsStmt {
    /// `var name = init;`
    VarDecl { name: String, init: CsExpr },
    /// `target = value;`
    Assign { target: CsExpr, value: CsExpr },
    /// Expression statement
    Expr(CsExpr),
    /// `return expr;`
    Return(CsExpr),
    /// `throw;`
    Rethrow,
    /// `if (cond) { ... }`
    If { cond: CsExpr, then_body: Vec<CsStmt> },
    /// `using (var name = init) { ... }`
    Using {
        name: String,
        init: CsExpr,
        body: Vec<CsStmt>,
    },
    /// `foreach (var item in collection) { ... }`
    ForEach {
        item: String,
        collection: CsExpr,
        body: Vec<CsStmt>,
    },
    /// Bare scope `{ ... }`
    Block(Vec<CsStmt>),
    /// `try { } catch (...) { } finally { }`
    Try {
        body: Vec<CsStmt>,
        catch: Option<CatchClause>,
        finally: Option<Vec<CsStmt>>,
    },
    /// Empty line
    Blank,
}

/// Method parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsParam {
    pub ty: String,
    pub name: String,
}

/// Method signature shared by declarations and implementations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsSignature {
    pub return_type: String,
    pub name: String,
    pub params: Vec<CsParam>,
}

/// A method with a body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsMethod {
    /// e.g. `public partial async`
    pub modifiers: String,
    pub signature: CsSignature,
    pub body: Vec<CsStmt>,
}

/// A body-less declaration: `modifiers signature;`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsDeclaration {
    /// e.g. `private partial`; empty for interface members
    pub modifiers: String,
    pub signature: CsSignature,
}

/// `public interface IName { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsInterface {
    pub name: String,
    pub members: Vec<CsDeclaration>,
}

/// `public partial class Name : Bases { ... }`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsClass {
    pub name: String,
    pub bases: Vec<String>,
    /// Field declarations, without the trailing `;`
    pub fields: Vec<String>,
    pub methods: Vec<CsMethod>,
    /// Partial declarations the consumer implements
    pub partial_declarations: Vec<CsDeclaration>,
}

/// Complete generated file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsUnit {
    /// `using` directives, in order
    pub usings: Vec<String>,
    /// Empty for the global namespace
    pub namespace: String,
    /// Generated client interface
    pub interface: CsInterface,
    /// Generated client class
    pub class: CsClass,
}
