//! Drives the `clientgen` command line end to end on temporary directories.

#![allow(clippy::unwrap_used, clippy::expect_used)]

use std::fs;
use std::path::Path;

use clientgen_cli::run_cli;
use tempfile::TempDir;

const CLIENTS: &str = r#"{
  "clients": [
    {
      "namespace": "SampleConsole",
      "imports": ["System.Threading", "System.Threading.Tasks"],
      "name": "WeatherClient",
      "attributes": [
        { "name": "ApiClientGenerator", "args": [{ "name": "NetCore", "value": true }] }
      ],
      "methods": [
        {
          "name": "GetForecastAsync",
          "returnType": "Task<WeatherForecast[]>",
          "attributes": [{ "name": "Get", "args": [{ "value": "/weatherforecast" }] }],
          "parameters": [{ "name": "ct", "type": "CancellationToken" }]
        }
      ]
    },
    {
      "name": "StatusClient",
      "methods": [
        {
          "name": "IsAliveAsync",
          "returnType": "Task<bool>",
          "attributes": [{ "name": "Get", "args": [{ "value": "/alive" }] }]
        }
      ]
    }
  ]
}"#;

fn cli(args: &[&str]) -> i32 {
    let mut argv = vec!["clientgen".to_string()];
    argv.extend(args.iter().map(|a| (*a).to_string()));
    run_cli(argv)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn write_clients(dir: &TempDir) -> std::path::PathBuf {
    let input = dir.path().join("clients.json");
    fs::write(&input, CLIENTS).unwrap();
    input
}

#[test]
fn test_generate_then_check() {
    let dir = TempDir::new().unwrap();
    let input = write_clients(&dir);
    let out = dir.path().join("out");

    assert_eq!(cli(&["generate", path_str(&input), "--out-dir", path_str(&out), "--check"]), 1);
    assert_eq!(cli(&["generate", path_str(&input), "--out-dir", path_str(&out)]), 0);

    let weather = fs::read_to_string(out.join("WeatherClient_Generated.g.cs")).unwrap();
    assert!(weather.contains("await _httpClient.SendAsync(request, ct)"));
    assert!(weather.contains("await response.Content.ReadAsStringAsync(ct)"));
    assert!(weather.contains("return System.Array.Empty<WeatherForecast>();"));
    assert!(out.join("StatusClient_Generated.g.cs").is_file());
    assert!(out.join("Common.g.cs").is_file());

    assert_eq!(cli(&["generate", path_str(&input), "--out-dir", path_str(&out), "--check"]), 0);

    fs::write(out.join("StatusClient_Generated.g.cs"), "stale\n").unwrap();
    assert_eq!(cli(&["generate", path_str(&input), "--out-dir", path_str(&out), "--check"]), 1);
}

#[test]
fn test_missing_input_fails() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("missing.yaml");
    assert_eq!(cli(&["generate", path_str(&missing)]), 1);
}

#[test]
fn test_attributes_to_file() {
    let dir = TempDir::new().unwrap();
    let out = dir.path().join("Common.g.cs");
    assert_eq!(
        cli(&["attributes", "--namespace", "Acme.Http", "--out", path_str(&out)]),
        0
    );
    let text = fs::read_to_string(out).unwrap();
    assert!(text.starts_with("// <auto-generated/>\nnamespace Acme.Http\n"));
}

#[test]
fn test_inspect_invalid_declaration_fails() {
    let dir = TempDir::new().unwrap();
    let input = dir.path().join("broken.json");
    fs::write(&input, "{ \"name\": ").unwrap();
    assert_eq!(cli(&["inspect", path_str(&input)]), 1);
}
