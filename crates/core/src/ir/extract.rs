//! Extraction from an annotated class declaration to API IR.
//!
//! This module handles all the annotation-specific logic:
//! - Verb/path recognition and passthrough demotion
//! - Parameter binding classification (fixed precedence)
//! - Return type shape resolution
//! - Class and method option resolution ("inherit" never survives)
//! - Validation of request content parameters

use tracing::{debug, warn};

use crate::config::{GeneratorDefaults, clamp_threshold};
use crate::declaration::{
    ArgumentValue, Attribute, ClassDeclaration, MethodDeclaration, ParameterDeclaration,
};
use crate::diagnostics::{Diagnostic, DiagnosticKind};

use super::api::{
    Binding, ClientDescriptor, Endpoint, HttpVerb, MethodDescriptor, ParameterDescriptor,
    PassthroughReason, ReturnShape, SerializationMode, Serializer,
};
use super::type_syntax::TypeSyntax;
use super::utils::{attribute_base_name, is_predefined_type, path_placeholders};

const CLASS_ATTRIBUTE: &str = "ApiClientGenerator";
const CANCELLATION_TOKEN_TYPE: &str = "CancellationToken";

/// Result of extracting one class: the IR plus anything worth reporting.
#[derive(Debug, Clone)]
pub struct Extraction {
    /// The resolved class.
    pub client: ClientDescriptor,
    /// Validation findings, in method order.
    pub diagnostics: Vec<Diagnostic>,
}

/// Class-level options after applying project defaults.
#[derive(Debug, Clone, Copy)]
struct ClassOptions {
    serializer: Serializer,
    net_core: bool,
    threshold_ms: u32,
}

/// Extract a client class into API IR.
pub fn extract_client(class: &ClassDeclaration, defaults: &GeneratorDefaults) -> Extraction {
    let options = resolve_class_options(class, defaults);
    debug!(
        class = %class.name,
        serializer = ?options.serializer,
        net_core = options.net_core,
        threshold_ms = options.threshold_ms,
        "Resolved class options."
    );

    let mut diagnostics = Vec::new();
    let methods = class
        .methods
        .iter()
        .map(|method| extract_method(&class.name, method, options, &mut diagnostics))
        .collect();

    Extraction {
        client: ClientDescriptor {
            namespace: class.namespace.clone(),
            class_name: class.name.clone(),
            imports: class.imports.clone(),
            methods,
            serializer: options.serializer,
            slow_call_threshold_ms: options.threshold_ms,
            targets_modern_runtime: options.net_core,
        },
        diagnostics,
    }
}

fn find_attribute<'a>(attributes: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attributes
        .iter()
        .find(|attr| attribute_base_name(&attr.name).eq_ignore_ascii_case(name))
}

fn parse_serialization(value: &ArgumentValue, owner: &str) -> SerializationMode {
    let Some(symbol) = value.as_symbolic() else {
        warn!(owner, "Serialization option is not a symbol; inheriting.");
        return SerializationMode::Inherit;
    };
    SerializationMode::from_symbol(symbol).unwrap_or_else(|| {
        warn!(owner, symbol, "Unknown serialization mode; inheriting.");
        SerializationMode::Inherit
    })
}

fn resolve_class_options(class: &ClassDeclaration, defaults: &GeneratorDefaults) -> ClassOptions {
    let attr = find_attribute(&class.attributes, CLASS_ATTRIBUTE);

    let net_core = attr
        .and_then(|a| a.named("NetCore"))
        .and_then(ArgumentValue::as_bool)
        .unwrap_or(defaults.net_core);

    let serializer = attr
        .and_then(|a| a.named("Serialization"))
        .map_or(SerializationMode::Inherit, |v| parse_serialization(v, &class.name))
        .resolve(defaults.serializer);

    let threshold_ms = attr
        .and_then(|a| a.named("ConnectionTooLongWarn"))
        .and_then(ArgumentValue::as_int)
        .map_or(defaults.connection_too_long_warn, clamp_threshold);

    ClassOptions {
        serializer,
        net_core,
        threshold_ms,
    }
}

/// Find the verb attribute. Verbs are tried in order, each against every attribute.
fn find_verb(attributes: &[Attribute]) -> Option<(HttpVerb, &Attribute)> {
    HttpVerb::ALL.into_iter().find_map(|verb| {
        attributes
            .iter()
            .find(|attr| {
                attribute_base_name(&attr.name)
                    .to_ascii_lowercase()
                    .starts_with(verb.attribute_prefix())
            })
            .map(|attr| (verb, attr))
    })
}

/// Resolve the shape of a declared return type.
pub fn resolve_return_shape(return_type: &str) -> Result<ReturnShape, String> {
    match TypeSyntax::parse(return_type)? {
        TypeSyntax::Named { name, .. } if is_predefined_type(&name) => {
            Err(format!("'{name}' is not an awaitable wrapper"))
        }
        TypeSyntax::Named { name, args } if args.is_empty() => Ok(ReturnShape {
            wrapper_type: name,
            is_parameterized: false,
            inner_type: None,
            is_array: false,
            array_element_type: None,
        }),
        TypeSyntax::Named { name, mut args } if args.len() == 1 => {
            let inner = args.remove(0);
            let array_element_type = inner.array_element().cloned();
            Ok(ReturnShape {
                wrapper_type: name,
                is_parameterized: true,
                is_array: array_element_type.is_some(),
                array_element_type,
                inner_type: Some(inner),
            })
        }
        other => Err(format!("'{other}' is not an awaitable wrapper with at most one type argument")),
    }
}

fn extract_method(
    class_name: &str,
    method: &MethodDeclaration,
    options: ClassOptions,
    diagnostics: &mut Vec<Diagnostic>,
) -> MethodDescriptor {
    let (endpoint, passthrough) = match resolve_endpoint(method) {
        Ok(endpoint) => (Some(endpoint), None),
        Err(reason) => {
            debug!(
                class = class_name,
                method = %method.name,
                ?reason,
                "Method passed through without generation."
            );
            (None, Some(reason))
        }
    };

    let path = endpoint.as_ref().map_or("", |e| e.path_template.as_str());
    let placeholders = path_placeholders(path);
    let parameters: Vec<_> = method
        .parameters
        .iter()
        .map(|param| classify_parameter(param, &placeholders))
        .collect();

    for placeholder in &placeholders {
        if !parameters.iter().any(|p| p.name == *placeholder) {
            warn!(
                class = class_name,
                method = %method.name,
                placeholder,
                "Route placeholder has no matching parameter; it stays literal."
            );
        }
    }

    let throws_on_failure = find_attribute(&method.attributes, "ThrowsExceptions")
        .is_some_and(|attr| attr.positional().and_then(ArgumentValue::as_bool).unwrap_or(true));

    let serializer = find_attribute(&method.attributes, "Serialization")
        .and_then(Attribute::positional)
        .map_or(SerializationMode::Inherit, |v| parse_serialization(v, &method.name))
        .resolve(options.serializer);

    let method_threshold = find_attribute(&method.attributes, "ConnectionTooLongWarn")
        .and_then(Attribute::positional)
        .and_then(ArgumentValue::as_int)
        .map_or(0, clamp_threshold);
    let slow_call_threshold_ms = if method_threshold > 0 {
        method_threshold
    } else {
        options.threshold_ms
    };

    let content_suppressed = endpoint.is_some()
        && validate_content_parameters(class_name, &method.name, &parameters, diagnostics);

    MethodDescriptor {
        name: method.name.clone(),
        parameters,
        endpoint,
        passthrough,
        throws_on_failure,
        serializer,
        slow_call_threshold_ms,
        content_suppressed,
    }
}

fn resolve_endpoint(method: &MethodDeclaration) -> Result<Endpoint, PassthroughReason> {
    let (http_verb, attr) =
        find_verb(&method.attributes).ok_or(PassthroughReason::NoVerbAttribute)?;
    let path_template = attr
        .positional()
        .and_then(ArgumentValue::as_literal)
        .ok_or(PassthroughReason::MissingPathLiteral)?
        .to_string();
    let return_shape = resolve_return_shape(&method.return_type).map_err(|err| {
        warn!(method = %method.name, error = %err, "Unresolvable return type.");
        PassthroughReason::UnresolvedReturnType
    })?;

    Ok(Endpoint {
        http_verb,
        path_template,
        return_shape,
    })
}

/// Classify a parameter.
///
/// Precedence: route placeholder, then `Body`, then `Header`, then
/// cancellation token, then query.
pub fn classify_parameter(param: &ParameterDeclaration, placeholders: &[&str]) -> ParameterDescriptor {
    let name = param.name.trim_start_matches('@').to_string();
    let attrs = &param.attributes;

    let query_alias = find_attribute(attrs, "AliasAs")
        .and_then(Attribute::positional)
        .and_then(ArgumentValue::as_literal)
        .map(str::to_string);
    let format_specifier = find_attribute(attrs, "Fmt")
        .and_then(Attribute::positional)
        .and_then(ArgumentValue::as_literal)
        .map(str::to_string);

    let mut header_template = None;
    let binding = if placeholders.contains(&name.as_str()) {
        Binding::Route
    } else if let Some(body) = find_attribute(attrs, "Body") {
        let form = body.args.iter().find_map(|a| a.value.as_bool()).unwrap_or(false);
        if form { Binding::Form } else { Binding::Body }
    } else if let Some(header) = find_attribute(attrs, "Header") {
        header_template = Some(
            header
                .positional()
                .and_then(ArgumentValue::as_literal)
                .map_or_else(|| format!("{name}:"), str::to_string),
        );
        Binding::Header
    } else if param.type_name.trim().ends_with(CANCELLATION_TOKEN_TYPE) {
        Binding::None
    } else {
        Binding::Query
    };

    ParameterDescriptor {
        name,
        type_name: param.type_name.trim().to_string(),
        binding,
        query_alias,
        format_specifier,
        header_template,
    }
}

/// Report more than one content parameter. Returns whether content is suppressed.
fn validate_content_parameters(
    class_name: &str,
    method_name: &str,
    parameters: &[ParameterDescriptor],
    diagnostics: &mut Vec<Diagnostic>,
) -> bool {
    let content: Vec<String> = parameters
        .iter()
        .filter(|p| p.binding.carries_content())
        .map(|p| p.name.clone())
        .collect();
    if content.len() <= 1 {
        return false;
    }

    let diagnostic = Diagnostic {
        class_name: class_name.to_string(),
        method_name: method_name.to_string(),
        kind: DiagnosticKind::MultipleContentParameters { parameters: content },
    };
    warn!("{diagnostic}");
    diagnostics.push(diagnostic);
    true
}
