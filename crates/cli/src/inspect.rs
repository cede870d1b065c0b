//! `inspect` command: prints the resolved model of a declaration file with its diagnostics.

use std::path::{Path, PathBuf};

use clap::Args;
use clientgen_core::Diagnostic;
use clientgen_core::ir::{ClientDescriptor, extract_client};
use serde::Serialize;

use crate::config::load_config;
use crate::inputs::load_declarations;
use crate::run_command;

/// Arguments of `clientgen inspect`.
#[derive(Args, Debug, Clone)]
pub struct InspectArgs {
    /// Declaration file (.json, .yaml, .yml)
    #[arg(value_name = "INPUT")]
    pub input: PathBuf,
    /// Path to the project configuration [default: ./clientgen.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Resolved IR of one class, as printed by `inspect`.
#[derive(Debug, Serialize)]
struct InspectReport {
    client: ClientDescriptor,
    diagnostics: Vec<Diagnostic>,
}

/// Run `inspect`, returning the process exit code.
pub fn run(args: InspectArgs) -> i32 {
    run_command(|| {
        let project_dir = std::env::current_dir()
            .map_err(|err| format!("Failed to get current directory: {err}"))?;
        println!("{}", inspect(&args, &project_dir)?);
        Ok(())
    })
}

/// Extract every class of the input and render the IR as pretty JSON.
pub fn inspect(args: &InspectArgs, project_dir: &Path) -> Result<String, String> {
    let config = load_config(args.config.as_deref(), project_dir)?;
    let reports: Vec<_> = load_declarations(&args.input)?
        .iter()
        .map(|class| {
            let extraction = extract_client(class, &config.defaults);
            InspectReport {
                client: extraction.client,
                diagnostics: extraction.diagnostics,
            }
        })
        .collect();
    serde_json::to_string_pretty(&reports).map_err(|err| format!("Failed to serialize IR: {err}"))
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_inspect_prints_resolved_ir() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("client.yaml");
        fs::write(
            &input,
            r#"
name: Client
attributes:
  - name: ApiClientGenerator
    args: [{ name: Serialization, value: { symbol: Serialization.SystemTextJson } }]
methods:
  - name: GetAsync
    returnType: Task<Item[]>
    attributes: [{ name: Get, args: [{ value: "/items/{id}" }] }]
    parameters:
      - { name: id, type: int }
      - { name: a, type: Item, attributes: [{ name: Body }] }
      - { name: b, type: Item, attributes: [{ name: Body }] }
"#,
        )
        .unwrap();

        let json = inspect(
            &InspectArgs {
                input,
                config: None,
            },
            dir.path(),
        )
        .unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        let client = &value[0]["client"];
        assert_eq!(client["className"], "Client");
        assert_eq!(client["serializer"], "SystemTextJson");
        let method = &client["methods"][0];
        assert_eq!(method["endpoint"]["httpVerb"], "GET");
        assert_eq!(method["endpoint"]["returnShape"]["innerType"], "Item[]");
        assert_eq!(method["endpoint"]["returnShape"]["isArray"], true);
        assert_eq!(method["parameters"][0]["binding"], "Route");
        assert_eq!(method["contentSuppressed"], true);

        let diagnostic = &value[0]["diagnostics"][0];
        assert_eq!(diagnostic["kind"], "multipleContentParameters");
        assert_eq!(diagnostic["methodName"], "GetAsync");
    }
}
