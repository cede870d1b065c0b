//! API-level IR for a client class.
//!
//! This module defines the resolved model handed from extraction to codegen:
//! - ClientDescriptor: one annotated client class
//! - MethodDescriptor: a method, generated or passed through
//! - ParameterDescriptor: a classified parameter
//! - ReturnShape: the awaited result of a method
//!
//! Every option is already resolved here. `Serializer` has no "inherit"
//! variant, so nothing symbolic can reach the emitter.

use serde::Serialize;

use super::type_syntax::TypeSyntax;

/// HTTP verb of a generated method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpVerb {
    /// `[Get]`
    Get,
    /// `[Post]`
    Post,
    /// `[Put]`
    Put,
    /// `[Delete]`
    Delete,
}

impl HttpVerb {
    /// Verbs in recognition order.
    pub const ALL: [HttpVerb; 4] = [HttpVerb::Get, HttpVerb::Post, HttpVerb::Put, HttpVerb::Delete];

    /// Attribute name prefix that selects this verb.
    pub const fn attribute_prefix(self) -> &'static str {
        match self {
            HttpVerb::Get => "get",
            HttpVerb::Post => "post",
            HttpVerb::Put => "put",
            HttpVerb::Delete => "delete",
        }
    }

    /// `System.Net.Http.HttpMethod` member name.
    pub const fn http_method_member(self) -> &'static str {
        match self {
            HttpVerb::Get => "Get",
            HttpVerb::Post => "Post",
            HttpVerb::Put => "Put",
            HttpVerb::Delete => "Delete",
        }
    }
}

/// Serialization mode as written on a class or method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum SerializationMode {
    /// Use the enclosing scope's serializer.
    #[default]
    Inherit,
    /// Force [`Serializer::Newtonsoft`].
    Newtonsoft,
    /// Force [`Serializer::SystemTextJson`].
    SystemTextJson,
    /// Force [`Serializer::Custom`].
    Custom,
}

impl SerializationMode {
    /// Parse a symbolic name such as `Serialization.Custom` or `newtonsoft`.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let last = symbol.rsplit('.').next().unwrap_or(symbol).trim();
        match last.to_ascii_lowercase().as_str() {
            "inherit" => Some(SerializationMode::Inherit),
            "newtonsoft" => Some(SerializationMode::Newtonsoft),
            "systemtextjson" => Some(SerializationMode::SystemTextJson),
            "custom" => Some(SerializationMode::Custom),
            _ => None,
        }
    }

    /// Resolve against an outer (already resolved) serializer.
    pub const fn resolve(self, outer: Serializer) -> Serializer {
        match self {
            SerializationMode::Inherit => outer,
            SerializationMode::Newtonsoft => Serializer::Newtonsoft,
            SerializationMode::SystemTextJson => Serializer::SystemTextJson,
            SerializationMode::Custom => Serializer::Custom,
        }
    }
}

/// A concrete serialization backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum Serializer {
    /// `Newtonsoft.Json.JsonConvert`
    #[default]
    Newtonsoft,
    /// `System.Text.Json.JsonSerializer`
    SystemTextJson,
    /// Per-method `partial` stubs implemented by the consumer.
    Custom,
}

/// Role of a parameter in the request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Binding {
    /// Substituted into a `{name}` path placeholder.
    Route,
    /// Appended to the query string.
    Query,
    /// Sent as a request header.
    Header,
    /// Serialized as the JSON request body.
    Body,
    /// Sent as a url-encoded form body.
    Form,
    /// Not part of the request (cancellation token).
    None,
}

impl Binding {
    /// Whether the parameter becomes request content.
    pub const fn carries_content(self) -> bool {
        matches!(self, Binding::Body | Binding::Form)
    }
}

/// A classified method parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParameterDescriptor {
    /// Parameter name without a verbatim `@` prefix.
    pub name: String,
    /// Declared type text.
    pub type_name: String,
    /// Role in the request.
    pub binding: Binding,
    /// Query-string key replacing `name`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query_alias: Option<String>,
    /// Format pattern applied when the value is stringified.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub format_specifier: Option<String>,
    /// Literal `Name: fallback` header template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub header_template: Option<String>,
}

impl ParameterDescriptor {
    /// Key used in the query string.
    pub fn query_key(&self) -> &str {
        self.query_alias.as_deref().unwrap_or(&self.name)
    }
}

/// The awaited result of a method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnShape {
    /// Wrapper type as written (`Task`, `System.Threading.Tasks.ValueTask`).
    pub wrapper_type: String,
    /// Whether the wrapper carries a value (`Task<T>`).
    pub is_parameterized: bool,
    /// Single type argument of the wrapper.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inner_type: Option<TypeSyntax>,
    /// Whether the inner type is an array.
    pub is_array: bool,
    /// Element type when the inner type is an array.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub array_element_type: Option<TypeSyntax>,
}

impl ReturnShape {
    /// Inner type rendered as source text.
    pub fn inner_type_name(&self) -> Option<String> {
        self.inner_type.as_ref().map(ToString::to_string)
    }

    /// Full return type rendered as source text.
    pub fn render(&self) -> String {
        match &self.inner_type {
            Some(inner) if self.is_parameterized => format!("{}<{}>", self.wrapper_type, inner),
            _ => self.wrapper_type.clone(),
        }
    }
}

/// Why a method is passed through instead of generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PassthroughReason {
    /// No `Get|Post|Put|Delete` attribute.
    NoVerbAttribute,
    /// Verb attribute without a string-literal first argument.
    MissingPathLiteral,
    /// Return type text could not be resolved to a shape.
    UnresolvedReturnType,
}

/// The generated part of an eligible method.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Endpoint {
    /// Request verb.
    pub http_verb: HttpVerb,
    /// Path as written, `{name}` placeholders included.
    pub path_template: String,
    /// Awaited result.
    pub return_shape: ReturnShape,
}

/// A method member of the client class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MethodDescriptor {
    /// Method identifier.
    pub name: String,
    /// Classified parameters, in declaration order.
    pub parameters: Vec<ParameterDescriptor>,
    /// Present for eligible methods.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<Endpoint>,
    /// Present for methods left to the consumer.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub passthrough: Option<PassthroughReason>,
    /// Rethrow after logging instead of returning a default.
    pub throws_on_failure: bool,
    /// Resolved serializer for body and response values.
    pub serializer: Serializer,
    /// Resolved threshold: the method value, or the class value when the method has none.
    pub slow_call_threshold_ms: u32,
    /// Set when request content was rejected by validation.
    pub content_suppressed: bool,
}

impl MethodDescriptor {
    /// Whether the method is generated.
    pub const fn is_eligible(&self) -> bool {
        self.endpoint.is_some()
    }

    /// The cancellation token threaded into transport calls, if any.
    pub fn cancellation_parameter(&self) -> Option<&ParameterDescriptor> {
        self.parameters
            .iter()
            .find(|p| p.binding == Binding::None)
    }

    /// Parameters bound as `binding`, in declaration order.
    pub fn parameters_with(&self, binding: Binding) -> impl Iterator<Item = &ParameterDescriptor> {
        self.parameters.iter().filter(move |p| p.binding == binding)
    }

    /// The single content parameter, unless validation suppressed content.
    pub fn content_parameter(&self) -> Option<&ParameterDescriptor> {
        if self.content_suppressed {
            return None;
        }
        self.parameters.iter().find(|p| p.binding.carries_content())
    }
}

/// A resolved client class.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientDescriptor {
    /// Enclosing namespace, empty for the global namespace.
    pub namespace: String,
    /// Partial class name.
    pub class_name: String,
    /// `using` directives copied to the generated file.
    pub imports: Vec<String>,
    /// Every method, eligible or not, in declaration order.
    pub methods: Vec<MethodDescriptor>,
    /// Class-level serializer.
    pub serializer: Serializer,
    /// Class-wide slow-call threshold in milliseconds, 0 disables.
    pub slow_call_threshold_ms: u32,
    /// Thread cancellation tokens into content reads.
    pub targets_modern_runtime: bool,
}

impl ClientDescriptor {
    /// Methods that are generated.
    pub fn eligible_methods(&self) -> impl Iterator<Item = &MethodDescriptor> {
        self.methods.iter().filter(|m| m.is_eligible())
    }

    /// Whether the slow-call hook has to be declared.
    pub fn has_slow_call_threshold(&self) -> bool {
        self.slow_call_threshold_ms > 0
            || self
                .eligible_methods()
                .any(|m| m.slow_call_threshold_ms > 0)
    }

    /// `Class.Method`, as reported to the hooks.
    pub fn qualified_name(&self, method: &MethodDescriptor) -> String {
        format!("{}.{}", self.class_name, method.name)
    }

    /// Name of the generated file.
    pub fn hint_name(&self) -> String {
        format!("{}_Generated.g.cs", self.class_name)
    }
}
