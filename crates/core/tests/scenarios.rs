//! End-to-end generation scenarios: declaration text in, C# source out.

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use clientgen_core::declaration::from_yaml;
use clientgen_core::ir::{Binding, extract_client};
use clientgen_core::{DiagnosticKind, GenerationOutput, GeneratorDefaults, generate_client};

fn generate_one(yaml: &str) -> GenerationOutput {
    let classes = from_yaml(yaml).unwrap();
    assert_eq!(classes.len(), 1);
    generate_client(&classes[0], &GeneratorDefaults::default()).unwrap()
}

/// Lines of the generated text with indentation stripped.
fn lines(text: &str) -> Vec<&str> {
    text.lines().map(str::trim).collect()
}

const HELLO_CLIENT: &str = r#"
namespace: Sample
imports: [System, System.Threading.Tasks]
name: SampleApiClient
methods:
  - name: GetHelloAsync
    returnType: Task<string>
    attributes: [{ name: Get, args: [{ value: "/" }] }]
"#;

#[test]
fn test_hello_get_full_output() {
    let output = generate_one(HELLO_CLIENT);
    assert!(output.diagnostics.is_empty());
    assert_eq!(output.source.hint_name, "SampleApiClient_Generated.g.cs");

    let expected = r#"// <auto-generated/>
using System;
using System.Threading.Tasks;

namespace Sample
{
    public interface ISampleApiClient
    {
        Task<string> GetHelloAsync();
    }

    public partial class SampleApiClient : ISampleApiClient
    {
        private readonly System.Net.Http.HttpClient _httpClient;

        public partial async Task<string> GetHelloAsync()
        {
            var url = "/";
            try
            {
                using (var request = new System.Net.Http.HttpRequestMessage())
                {
                    request.Method = System.Net.Http.HttpMethod.Get;
                    request.RequestUri = new System.Uri(url, System.UriKind.RelativeOrAbsolute);
                    using (var response = await _httpClient.SendAsync(request))
                    {
                        if (!response.IsSuccessStatusCode)
                        {
                            return string.Empty;
                        }

                        return await response.Content.ReadAsStringAsync();
                    }
                }
            }
            catch (System.Exception e)
            {
                LogError("SampleApiClient.GetHelloAsync", url, e);
            }

            return string.Empty;
        }

        private partial void LogError(string methodName, string path, System.Exception e);
    }
}
"#;
    assert_eq!(output.source.text, expected);
}

const PARAMETERS_CLIENT: &str = r#"
namespace: Sample
name: SampleApiClient
methods:
  - name: GetItemAsync
    returnType: Task<string>
    attributes: [{ name: Post, args: [{ value: "/parameters-test/{id}/test/{val}" }] }]
    parameters:
      - { name: id, type: int }
      - { name: val, type: int }
      - { name: val2, type: string }
      - { name: val4, type: int, attributes: [{ name: AliasAs, args: [{ value: mode }] }] }
      - { name: from, type: System.DateTime, attributes: [{ name: Fmt, args: [{ value: yyyy-MM }] }] }
      - { name: headerValue, type: string, attributes: [{ name: Header, args: [{ value: "X-TEST: val" }] }] }
      - { name: headerId, type: int, attributes: [{ name: Header, args: [{ value: "X-ID" }] }] }
"#;

#[test]
fn test_parameter_bindings_and_url() {
    let classes = from_yaml(PARAMETERS_CLIENT).unwrap();
    let client = extract_client(&classes[0], &GeneratorDefaults::default()).client;
    let bindings: Vec<_> = client.methods[0]
        .parameters
        .iter()
        .map(|p| (p.name.as_str(), p.binding))
        .collect();
    assert_eq!(
        bindings,
        vec![
            ("id", Binding::Route),
            ("val", Binding::Route),
            ("val2", Binding::Query),
            ("val4", Binding::Query),
            ("from", Binding::Query),
            ("headerValue", Binding::Header),
            ("headerId", Binding::Header),
        ]
    );

    let output = generate_one(PARAMETERS_CLIENT);
    let text = lines(&output.source.text);
    assert!(text.contains(
        &"var url = $\"/parameters-test/{id}/test/{val}?val2={val2}&mode={val4}&from={from:yyyy-MM}\";"
    ));
    assert!(text.contains(&"request.Method = System.Net.Http.HttpMethod.Post;"));
    assert!(text.contains(&"var header = $\"X-TEST:{headerValue}\".Split(new[] { ':' }, 2);"));
    assert!(text.contains(&"var header = $\"X-ID:{headerId}\".Split(new[] { ':' }, 2);"));
    assert!(text.contains(
        &"request.Headers.TryAddWithoutValidation(header[0].Trim(), headerText.Length > 0 ? headerText : \"val\");"
    ));
    assert!(text.contains(
        &"request.Headers.TryAddWithoutValidation(header[0].Trim(), headerText.Length > 0 ? headerText : \"\");"
    ));
    assert!(text.contains(
        &"public partial async Task<string> GetItemAsync(int id, int val, string val2, int val4, System.DateTime from, string headerValue, int headerId)"
    ));
}

#[test]
fn test_alias_replaces_name_in_query() {
    let output = generate_one(
        r#"
name: Client
methods:
  - name: SearchAsync
    returnType: Task
    attributes: [{ name: Get, args: [{ value: "/search" }] }]
    parameters:
      - { name: term, type: string, attributes: [{ name: AliasAs, args: [{ value: q }] }] }
"#,
    );
    assert!(output.source.text.contains("var url = $\"/search?q={term}\";"));
    assert!(!output.source.text.contains("term={term}"));
}

#[test]
fn test_route_precedence_over_annotations() {
    let classes = from_yaml(
        r#"
name: Client
methods:
  - name: PutAsync
    returnType: Task
    attributes: [{ name: Put, args: [{ value: "/items/{id}" }] }]
    parameters:
      - name: id
        type: int
        attributes: [{ name: Body }, { name: Header, args: [{ value: "X-ID:" }] }]
"#,
    )
    .unwrap();
    let client = extract_client(&classes[0], &GeneratorDefaults::default()).client;
    assert_eq!(client.methods[0].parameters[0].binding, Binding::Route);

    let text = generate_client(&classes[0], &GeneratorDefaults::default())
        .unwrap()
        .source
        .text;
    assert!(text.contains("var url = $\"/items/{id}\";"));
    assert!(!text.contains("request.Content"));
    assert!(!text.contains("TryAddWithoutValidation"));
}

#[test]
fn test_throwing_method_rethrows() {
    let output = generate_one(
        r#"
name: Client
methods:
  - name: GetItemAsync
    returnType: Task<Item>
    attributes: [{ name: Get, args: [{ value: "/item" }] }, { name: ThrowsExceptions }]
"#,
    );
    let text = lines(&output.source.text);
    assert!(text.contains(&"response.EnsureSuccessStatusCode();"));
    assert!(!text.contains(&"if (!response.IsSuccessStatusCode)"));
    let catch = text
        .iter()
        .position(|l| *l == "catch (System.Exception e)")
        .unwrap();
    assert_eq!(text[catch + 2], "LogError(\"Client.GetItemAsync\", url, e);");
    assert_eq!(text[catch + 3], "throw;");
    // Deserialization guards can fall through, so the fallback stays
    assert!(text.contains(&"return default;"));
}

#[test]
fn test_slow_call_threshold_wraps_every_exit() {
    let output = generate_one(
        r#"
name: Client
attributes:
  - name: ApiClientGenerator
    args: [{ name: ConnectionTooLongWarn, value: 50 }]
methods:
  - name: PingAsync
    returnType: Task
    attributes: [{ name: Get, args: [{ value: "/ping" }] }]
  - name: SlowAsync
    returnType: Task
    attributes:
      - { name: Get, args: [{ value: "/slow" }] }
      - { name: ConnectionTooLongWarn, args: [{ value: 200 }] }
"#,
    );
    let text = lines(&output.source.text);
    let start = text
        .iter()
        .position(|l| *l == "var stopwatch = System.Diagnostics.Stopwatch.StartNew();")
        .unwrap();
    assert_eq!(text[start + 1], "try");
    let finally = text.iter().position(|l| *l == "finally").unwrap();
    assert_eq!(text[finally + 2], "stopwatch.Stop();");
    assert_eq!(text[finally + 3], "if (stopwatch.ElapsedMilliseconds > 50)");
    assert_eq!(
        text[finally + 5],
        "LogConnectionTooLongWarning(\"Client.PingAsync\", url, stopwatch.ElapsedMilliseconds);"
    );
    assert!(text.contains(&"if (stopwatch.ElapsedMilliseconds > 200)"));
    assert_eq!(
        text.iter()
            .filter(|l| l.starts_with("private partial void LogConnectionTooLongWarning("))
            .count(),
        1
    );
}

#[test]
fn test_multiple_content_parameters_skip_content_only() {
    let output = generate_one(
        r#"
name: Client
methods:
  - name: PostAsync
    returnType: Task
    attributes: [{ name: Post, args: [{ value: "/items" }] }]
    parameters:
      - { name: first, type: Item, attributes: [{ name: Body }] }
      - { name: second, type: Item, attributes: [{ name: Body, args: [{ value: true }] }] }
  - name: PingAsync
    returnType: Task
    attributes: [{ name: Get, args: [{ value: "/ping" }] }]
"#,
    );
    assert!(output.has_errors());
    assert_eq!(
        output.diagnostics[0].kind,
        DiagnosticKind::MultipleContentParameters {
            parameters: vec!["first".into(), "second".into()]
        }
    );
    let text = &output.source.text;
    assert!(text.contains("public partial async Task PostAsync(Item first, Item second)"));
    assert!(text.contains("public partial async Task PingAsync()"));
    assert!(!text.contains("request.Content"));
}

#[test]
fn test_default_value_law() {
    let cases = [
        ("bool", "return false;"),
        ("string", "return string.Empty;"),
        ("byte[]", "return System.Array.Empty<byte>();"),
        ("Item[]", "return System.Array.Empty<Item>();"),
        ("Item", "return default;"),
    ];
    for (inner, fallback) in cases {
        let yaml = format!(
            r#"
name: Client
methods:
  - name: GetAsync
    returnType: Task<{inner}>
    attributes: [{{ name: Get, args: [{{ value: "/" }}] }}]
"#
        );
        let output = generate_one(&yaml);
        let text = lines(&output.source.text);
        let last_return = text
            .iter()
            .rev()
            .find(|l| l.starts_with("return "))
            .unwrap();
        assert_eq!(*last_return, fallback, "fallback for {inner}");
    }
}

#[test]
fn test_passthrough_methods_are_not_generated() {
    let output = generate_one(
        r#"
name: Client
methods:
  - name: Manual
    returnType: Task
  - name: Tuple
    returnType: (int, int)
    attributes: [{ name: Get, args: [{ value: "/" }] }]
  - name: GetCount
    returnType: int
    attributes: [{ name: Get, args: [{ value: "/count" }] }]
  - name: PingAsync
    returnType: Task
    attributes: [{ name: Get, args: [{ value: "/ping" }] }]
"#,
    );
    let text = &output.source.text;
    assert!(!text.contains("Manual"));
    assert!(!text.contains("Tuple"));
    assert!(!text.contains("GetCount"));
    assert!(text.contains("Task PingAsync();"));
}

#[test]
fn test_generation_is_idempotent() {
    let classes = from_yaml(PARAMETERS_CLIENT).unwrap();
    let defaults = GeneratorDefaults::default();
    let first = generate_client(&classes[0], &defaults).unwrap();
    let second = generate_client(&classes[0], &defaults).unwrap();
    assert_eq!(first.source, second.source);
}
