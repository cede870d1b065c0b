//! Code generation from API IR to C# AST.
//!
//! This module transforms a resolved `ClientDescriptor` into a `CsUnit`:
//! an interface listing every eligible method, a partial class implementing
//! them, and the partial hook and serializer declarations the consumer fills in.
//!
//! The generated AST can then be rendered via `CsUnit::to_source`.

use tracing::debug;

use super::api::{
    Binding, ClientDescriptor, Endpoint, MethodDescriptor, ParameterDescriptor, ReturnShape,
    Serializer,
};
use super::emit::Emit;
use super::type_syntax::TypeSyntax;
use super::types::{
    BinOp, CatchClause, CsClass, CsDeclaration, CsExpr, CsInterface, CsLiteral, CsMethod,
    CsParam, CsSignature, CsStmt, CsUnit, InterpolationPart,
};
use super::utils::{PathSegment, escape_identifier, normalized_type_name, split_path_template};

const HTTP_CLIENT_FIELD: &str = "_httpClient";
const ERROR_HOOK: &str = "LogError";
const SLOW_CALL_HOOK: &str = "LogConnectionTooLongWarning";

/// How the awaited value of a parameterized method is produced.
#[derive(Debug, Clone, PartialEq, Eq)]
enum ValueKind {
    /// Reaching the value means success.
    Bool,
    /// Raw body as text.
    Text,
    /// Raw body as bytes.
    Bytes,
    /// Deserialized body; `element` is set for array types.
    Deserialized { element: Option<String> },
}

impl ValueKind {
    fn of(shape: &ReturnShape) -> Option<Self> {
        let inner = shape.inner_type.as_ref()?;
        let bare = match inner {
            TypeSyntax::Nullable(inner) => inner.as_ref(),
            other => other,
        };
        let kind = match normalized_type_name(&bare.to_string()).as_str() {
            "bool" | "boolean" | "system.boolean" => ValueKind::Bool,
            "string" | "system.string" => ValueKind::Text,
            "byte[]" | "system.byte[]" => ValueKind::Bytes,
            _ => ValueKind::Deserialized {
                element: shape.array_element_type.as_ref().map(ToString::to_string),
            },
        };
        Some(kind)
    }

    /// Value returned when no response value was produced.
    fn default_value(&self) -> CsExpr {
        match self {
            ValueKind::Bool => CsExpr::Literal(CsLiteral::Bool(false)),
            ValueKind::Text => CsExpr::ident("string.Empty"),
            ValueKind::Bytes => empty_array("byte"),
            ValueKind::Deserialized {
                element: Some(element),
            } => empty_array(element),
            ValueKind::Deserialized { element: None } => CsExpr::Literal(CsLiteral::Default),
        }
    }

    /// Whether value production can finish without returning.
    fn can_fall_through(&self) -> bool {
        matches!(self, ValueKind::Deserialized { .. })
    }
}

fn empty_array(element: &str) -> CsExpr {
    CsExpr::ident("System.Array")
        .member("Empty")
        .call_generic(element, vec![])
}

/// The synthesized fallback for a return shape, if it has a value.
pub fn default_value_for(shape: &ReturnShape) -> Option<String> {
    ValueKind::of(shape).map(|kind| kind.default_value().emit())
}

/// Per-method generation context.
struct MethodContext<'a> {
    client: &'a ClientDescriptor,
    method: &'a MethodDescriptor,
    endpoint: &'a Endpoint,
    value: Option<ValueKind>,
    /// Cancellation token argument, when one is bound.
    cancellation: Option<CsExpr>,
}

impl MethodContext<'_> {
    fn qualified_name(&self) -> CsExpr {
        CsExpr::string(self.client.qualified_name(self.method))
    }

    /// Arguments for content reads; the token is only threaded on the modern runtime.
    fn read_args(&self) -> Vec<CsExpr> {
        match &self.cancellation {
            Some(token) if self.client.targets_modern_runtime => vec![token.clone()],
            _ => Vec::new(),
        }
    }

    fn read_content(&self, reader: &str) -> CsExpr {
        CsExpr::ident("response")
            .member("Content")
            .member(reader)
            .call(self.read_args())
            .awaited()
    }
}

/// Generate the complete C# unit for a client.
pub fn codegen_client(client: &ClientDescriptor) -> CsUnit {
    let mut interface_members = Vec::new();
    let mut methods = Vec::new();
    let mut stubs = Vec::new();

    for method in &client.methods {
        let Some(endpoint) = &method.endpoint else {
            continue;
        };
        let generated = codegen_method(client, method, endpoint, &mut stubs);
        interface_members.push(CsDeclaration {
            modifiers: String::new(),
            signature: generated.signature.clone(),
        });
        methods.push(generated);
    }

    let interface_name = format!("I{}", client.class_name);
    CsUnit {
        usings: client.imports.clone(),
        namespace: client.namespace.clone(),
        interface: CsInterface {
            name: interface_name.clone(),
            members: interface_members,
        },
        class: CsClass {
            name: client.class_name.clone(),
            bases: vec![interface_name],
            fields: vec![format!(
                "private readonly System.Net.Http.HttpClient {HTTP_CLIENT_FIELD}"
            )],
            methods,
            partial_declarations: hook_declarations(client).into_iter().chain(stubs).collect(),
        },
    }
}

fn private_partial(return_type: &str, name: String, params: Vec<CsParam>) -> CsDeclaration {
    CsDeclaration {
        modifiers: "private partial".into(),
        signature: CsSignature {
            return_type: return_type.into(),
            name,
            params,
        },
    }
}

fn param(ty: &str, name: &str) -> CsParam {
    CsParam {
        ty: ty.into(),
        name: name.into(),
    }
}

fn hook_declarations(client: &ClientDescriptor) -> Vec<CsDeclaration> {
    let mut hooks = vec![private_partial(
        "void",
        ERROR_HOOK.into(),
        vec![
            param("string", "methodName"),
            param("string", "path"),
            param("System.Exception", "e"),
        ],
    )];
    if client.has_slow_call_threshold() {
        hooks.push(private_partial(
            "void",
            SLOW_CALL_HOOK.into(),
            vec![
                param("string", "methodName"),
                param("string", "path"),
                param("long", "connectionDuration"),
            ],
        ));
    }
    hooks
}

/// Declare a custom serializer stub and return the name to call.
///
/// Overloads of one method share `base_name`. A stub with the same parameter
/// types and return type is reused; one differing only in return type would not
/// compile, so it gets an ordinal suffix instead (`DeserializeGetAsync2`).
fn declare_stub(
    stubs: &mut Vec<CsDeclaration>,
    return_type: &str,
    base_name: &str,
    params: Vec<CsParam>,
) -> String {
    let same_params = |existing: &CsDeclaration| {
        existing.signature.params.len() == params.len()
            && existing
                .signature
                .params
                .iter()
                .zip(&params)
                .all(|(a, b)| a.ty == b.ty)
    };

    let mut name = base_name.to_string();
    let mut ordinal = 1;
    loop {
        match stubs
            .iter()
            .find(|s| s.signature.name == name && same_params(*s))
        {
            None => {
                stubs.push(private_partial(return_type, name.clone(), params));
                return name;
            }
            Some(existing) if existing.signature.return_type == return_type => return name,
            Some(_) => {
                ordinal += 1;
                name = format!("{base_name}{ordinal}");
            }
        }
    }
}

fn codegen_method(
    client: &ClientDescriptor,
    method: &MethodDescriptor,
    endpoint: &Endpoint,
    stubs: &mut Vec<CsDeclaration>,
) -> CsMethod {
    let ctx = MethodContext {
        client,
        method,
        endpoint,
        value: ValueKind::of(&endpoint.return_shape),
        cancellation: method
            .cancellation_parameter()
            .map(|p| CsExpr::ident(escape_identifier(&p.name))),
    };

    let threshold = method.slow_call_threshold_ms;
    let mut body = vec![CsStmt::VarDecl {
        name: "url".into(),
        init: codegen_url(method, &endpoint.path_template),
    }];
    if threshold > 0 {
        body.push(CsStmt::VarDecl {
            name: "stopwatch".into(),
            init: CsExpr::ident("System.Diagnostics.Stopwatch")
                .member("StartNew")
                .call(vec![]),
        });
    }

    body.push(CsStmt::Try {
        body: vec![codegen_request(&ctx, stubs)],
        catch: Some(codegen_catch(&ctx)),
        finally: (threshold > 0).then(|| codegen_slow_call_check(&ctx, threshold)),
    });

    if let Some(value) = &ctx.value
        && (!method.throws_on_failure || value.can_fall_through())
    {
        body.push(CsStmt::Blank);
        body.push(CsStmt::Return(value.default_value()));
    }

    debug!(
        method = %client.qualified_name(method),
        verb = ?endpoint.http_verb,
        path = %endpoint.path_template,
        "Generated method."
    );

    CsMethod {
        modifiers: "public partial async".into(),
        signature: CsSignature {
            return_type: endpoint.return_shape.render(),
            name: method.name.clone(),
            params: method
                .parameters
                .iter()
                .map(|p| param(&p.type_name, &escape_identifier(&p.name)))
                .collect(),
        },
        body,
    }
}

/// URL expression: the literal path for parameterless methods, otherwise an
/// interpolation with route substitution and a query string.
fn codegen_url(method: &MethodDescriptor, path: &str) -> CsExpr {
    if method.parameters.is_empty() {
        return CsExpr::string(path);
    }

    let mut parts = Vec::new();
    for segment in split_path_template(path) {
        match segment {
            PathSegment::Static(text) => parts.push(InterpolationPart::Text(text.into())),
            PathSegment::Placeholder { name, raw } => {
                let bound = method
                    .parameters_with(Binding::Route)
                    .any(|p| p.name == name);
                if bound {
                    parts.push(InterpolationPart::Hole {
                        expr: escape_identifier(name),
                        format: None,
                    });
                } else {
                    parts.push(InterpolationPart::Text(raw.into()));
                }
            }
        }
    }

    for (i, query) in method.parameters_with(Binding::Query).enumerate() {
        let separator = if i == 0 { '?' } else { '&' };
        parts.push(InterpolationPart::Text(format!(
            "{separator}{}=",
            query.query_key()
        )));
        parts.push(InterpolationPart::Hole {
            expr: escape_identifier(&query.name),
            format: query.format_specifier.clone(),
        });
    }

    CsExpr::Interpolated(parts)
}

fn request_member(member: &str) -> CsExpr {
    CsExpr::ident("request").member(member)
}

fn codegen_request(ctx: &MethodContext<'_>, stubs: &mut Vec<CsDeclaration>) -> CsStmt {
    let mut body = vec![
        CsStmt::Assign {
            target: request_member("Method"),
            value: CsExpr::ident("System.Net.Http.HttpMethod")
                .member(ctx.endpoint.http_verb.http_method_member()),
        },
        CsStmt::Assign {
            target: request_member("RequestUri"),
            value: CsExpr::New {
                ty: "System.Uri".into(),
                args: vec![
                    CsExpr::ident("url"),
                    CsExpr::ident("System.UriKind.RelativeOrAbsolute"),
                ],
            },
        },
    ];

    for header in ctx.method.parameters_with(Binding::Header) {
        body.push(codegen_header(header));
    }

    if let Some(content) = ctx.method.content_parameter() {
        match content.binding {
            Binding::Form => body.extend(codegen_form_content(content)),
            _ => body.extend(codegen_json_content(ctx, content, stubs)),
        }
    }

    let mut send_args = vec![CsExpr::ident("request")];
    send_args.extend(ctx.cancellation.clone());
    body.push(CsStmt::Using {
        name: "response".into(),
        init: CsExpr::ident(HTTP_CLIENT_FIELD)
            .member("SendAsync")
            .call(send_args)
            .awaited(),
        body: codegen_response(ctx, stubs),
    });

    CsStmt::Using {
        name: "request".into(),
        init: CsExpr::New {
            ty: "System.Net.Http.HttpRequestMessage".into(),
            args: vec![],
        },
        body,
    }
}

/// One scoped block per header: substitute the value into the template,
/// split name from value, fall back to the template's literal value when empty.
fn codegen_header(header: &ParameterDescriptor) -> CsStmt {
    let template = header.header_template.as_deref().unwrap_or_default();
    let (name, fallback) = template.split_once(':').unwrap_or((template, ""));

    let substituted = CsExpr::Interpolated(vec![
        InterpolationPart::Text(format!("{}:", name.trim())),
        InterpolationPart::Hole {
            expr: escape_identifier(&header.name),
            format: header.format_specifier.clone(),
        },
    ]);

    let value = format!(
        "headerText.Length > 0 ? headerText : {}",
        CsExpr::string(fallback.trim()).emit()
    );

    CsStmt::Block(vec![
        CsStmt::VarDecl {
            name: "header".into(),
            init: substituted.member("Split").call(vec![
                CsExpr::Raw("new[] { ':' }".into()),
                CsExpr::Literal(CsLiteral::Int(2)),
            ]),
        },
        CsStmt::VarDecl {
            name: "headerText".into(),
            init: CsExpr::Raw("header[1]".into()).member("Trim").call(vec![]),
        },
        CsStmt::Expr(request_member("Headers").member("TryAddWithoutValidation").call(vec![
            CsExpr::Raw("header[0]".into()).member("Trim").call(vec![]),
            CsExpr::Raw(value),
        ])),
    ])
}

fn codegen_json_content(
    ctx: &MethodContext<'_>,
    content: &ParameterDescriptor,
    stubs: &mut Vec<CsDeclaration>,
) -> Vec<CsStmt> {
    let value = CsExpr::ident(escape_identifier(&content.name));
    let serialized = match ctx.method.serializer {
        Serializer::Newtonsoft => CsExpr::ident("Newtonsoft.Json.JsonConvert")
            .member("SerializeObject")
            .call(vec![value]),
        Serializer::SystemTextJson => CsExpr::ident("System.Text.Json.JsonSerializer")
            .member("Serialize")
            .call(vec![value]),
        Serializer::Custom => {
            let name = declare_stub(
                stubs,
                "string",
                &format!("Serialize{}", ctx.method.name),
                vec![param(&content.type_name, "value")],
            );
            CsExpr::ident(name).call(vec![value])
        }
    };

    vec![
        CsStmt::VarDecl {
            name: "json".into(),
            init: serialized,
        },
        CsStmt::Assign {
            target: request_member("Content"),
            value: CsExpr::New {
                ty: "System.Net.Http.StringContent".into(),
                args: vec![
                    CsExpr::ident("json"),
                    CsExpr::ident("System.Text.Encoding.UTF8"),
                    CsExpr::string("application/json"),
                ],
            },
        },
    ]
}

/// Url-encoded form built from the readable public properties of the value.
fn codegen_form_content(content: &ParameterDescriptor) -> Vec<CsStmt> {
    const PAIR: &str = "System.Collections.Generic.KeyValuePair<string, string>";
    let value = escape_identifier(&content.name);

    let add_pair = CsExpr::ident("form").member("Add").call(vec![CsExpr::New {
        ty: PAIR.into(),
        args: vec![
            CsExpr::ident("property").member("Name"),
            CsExpr::ident("System.Convert").member("ToString").call(vec![
                CsExpr::ident("propertyValue"),
                CsExpr::ident("System.Globalization.CultureInfo.InvariantCulture"),
            ]),
        ],
    }]);

    let properties = CsExpr::ident(value.as_str())
        .member("GetType")
        .call(vec![])
        .member("GetProperties")
        .call(vec![CsExpr::Raw(
            "System.Reflection.BindingFlags.Public | System.Reflection.BindingFlags.Instance"
                .into(),
        )]);

    vec![
        CsStmt::VarDecl {
            name: "form".into(),
            init: CsExpr::New {
                ty: format!("System.Collections.Generic.List<{PAIR}>"),
                args: vec![],
            },
        },
        CsStmt::If {
            cond: CsExpr::Raw(format!("{value} is not null")),
            then_body: vec![CsStmt::ForEach {
                item: "property".into(),
                collection: properties,
                body: vec![CsStmt::If {
                    cond: CsExpr::ident("property").member("CanRead").binary(
                        BinOp::And,
                        CsExpr::Raw("property.GetIndexParameters().Length == 0".into()),
                    ),
                    then_body: vec![
                        CsStmt::VarDecl {
                            name: "propertyValue".into(),
                            init: CsExpr::ident("property")
                                .member("GetValue")
                                .call(vec![CsExpr::ident(value.as_str())]),
                        },
                        CsStmt::If {
                            cond: CsExpr::Raw("propertyValue is not null".into()),
                            then_body: vec![CsStmt::Expr(add_pair)],
                        },
                    ],
                }],
            }],
        },
        CsStmt::Assign {
            target: request_member("Content"),
            value: CsExpr::New {
                ty: "System.Net.Http.FormUrlEncodedContent".into(),
                args: vec![CsExpr::ident("form")],
            },
        },
    ]
}

fn codegen_response(ctx: &MethodContext<'_>, stubs: &mut Vec<CsDeclaration>) -> Vec<CsStmt> {
    let mut body = Vec::new();

    match &ctx.value {
        Some(value) if !ctx.method.throws_on_failure => body.push(CsStmt::If {
            cond: CsExpr::ident("response").member("IsSuccessStatusCode").negated(),
            then_body: vec![CsStmt::Return(value.default_value())],
        }),
        _ => body.push(CsStmt::Expr(
            CsExpr::ident("response")
                .member("EnsureSuccessStatusCode")
                .call(vec![]),
        )),
    }

    let Some(value) = &ctx.value else {
        return body;
    };
    body.push(CsStmt::Blank);

    match value {
        ValueKind::Bool => body.push(CsStmt::Return(CsExpr::Literal(CsLiteral::Bool(true)))),
        ValueKind::Text => body.push(CsStmt::Return(ctx.read_content("ReadAsStringAsync"))),
        ValueKind::Bytes => {
            body.push(CsStmt::Return(ctx.read_content("ReadAsByteArrayAsync")));
        }
        ValueKind::Deserialized { .. } => {
            let inner = ctx
                .endpoint
                .return_shape
                .inner_type_name()
                .unwrap_or_default();
            let deserialized = codegen_deserialize(ctx, &inner, stubs);
            body.push(CsStmt::If {
                cond: CsExpr::ident("response")
                    .member("StatusCode")
                    .binary(BinOp::Equal, CsExpr::ident("System.Net.HttpStatusCode.OK"))
                    .binary(
                        BinOp::And,
                        CsExpr::Raw("response.Content is not null".into()),
                    ),
                then_body: vec![
                    CsStmt::VarDecl {
                        name: "content".into(),
                        init: ctx.read_content("ReadAsStringAsync"),
                    },
                    CsStmt::If {
                        cond: CsExpr::ident("string")
                            .member("IsNullOrEmpty")
                            .call(vec![CsExpr::ident("content")])
                            .negated(),
                        then_body: vec![CsStmt::Return(deserialized)],
                    },
                ],
            });
        }
    }
    body
}

fn codegen_deserialize(
    ctx: &MethodContext<'_>,
    inner: &str,
    stubs: &mut Vec<CsDeclaration>,
) -> CsExpr {
    let content = CsExpr::ident("content");
    match ctx.method.serializer {
        Serializer::Newtonsoft => CsExpr::ident("Newtonsoft.Json.JsonConvert")
            .member("DeserializeObject")
            .call_generic(inner, vec![content]),
        Serializer::SystemTextJson => CsExpr::ident("System.Text.Json.JsonSerializer")
            .member("Deserialize")
            .call_generic(inner, vec![content]),
        Serializer::Custom => {
            let name = declare_stub(
                stubs,
                inner,
                &format!("Deserialize{}", ctx.method.name),
                vec![param("string", "content")],
            );
            CsExpr::ident(name).call(vec![content])
        }
    }
}

fn codegen_catch(ctx: &MethodContext<'_>) -> CatchClause {
    let mut body = vec![CsStmt::Expr(CsExpr::ident(ERROR_HOOK).call(vec![
        ctx.qualified_name(),
        CsExpr::ident("url"),
        CsExpr::ident("e"),
    ]))];
    if ctx.method.throws_on_failure {
        body.push(CsStmt::Rethrow);
    }
    CatchClause {
        exception_type: "System.Exception".into(),
        variable: "e".into(),
        body,
    }
}

fn codegen_slow_call_check(ctx: &MethodContext<'_>, threshold: u32) -> Vec<CsStmt> {
    let elapsed = || CsExpr::ident("stopwatch").member("ElapsedMilliseconds");
    vec![
        CsStmt::Expr(CsExpr::ident("stopwatch").member("Stop").call(vec![])),
        CsStmt::If {
            cond: elapsed().binary(
                BinOp::Greater,
                CsExpr::Literal(CsLiteral::Int(i64::from(threshold))),
            ),
            then_body: vec![CsStmt::Expr(CsExpr::ident(SLOW_CALL_HOOK).call(vec![
                ctx.qualified_name(),
                CsExpr::ident("url"),
                elapsed(),
            ]))],
        },
    ]
}
