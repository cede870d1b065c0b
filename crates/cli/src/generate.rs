//! `generate` command: writes every client plus `Common.g.cs`, or with `--check` reports stale files.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use clap::Args;
use clientgen_core::{COMMON_HINT_NAME, Diagnostic, GeneratedSource, common_attributes, generate_client};
use console::style;
use rayon::prelude::*;
use tracing::{debug, info};

use crate::config::{DEFAULT_OUT_DIR, load_config};
use crate::diff::FileChange;
use crate::inputs::{collect_inputs, load_declarations};
use crate::run_command;

/// Arguments of `clientgen generate`.
#[derive(Args, Debug, Clone)]
pub struct GenerateArgs {
    /// Declaration files (.json, .yaml, .yml) or directories containing them
    #[arg(value_name = "INPUT", required = true)]
    pub inputs: Vec<PathBuf>,
    /// Output directory [default: `out-dir` from clientgen.toml, else "Generated"]
    #[arg(long = "out-dir", short = 'o', value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
    /// Show what would change and fail if anything is out of date, without writing
    #[arg(long)]
    pub check: bool,
    /// Path to the project configuration [default: ./clientgen.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
    /// Do not emit Common.g.cs
    #[arg(long = "no-common")]
    pub no_common: bool,
}

/// What a generation run did.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct GenerateSummary {
    /// Files written to disk.
    pub written: usize,
    /// Files already identical on disk.
    pub unchanged: usize,
    /// Files that differ from disk (check mode only).
    pub stale: usize,
    /// Diagnostics reported across all clients.
    pub error_diagnostics: usize,
}

/// Run `generate`, returning the process exit code.
pub fn run(args: GenerateArgs) -> i32 {
    run_command(|| run_inner(&args))
}

fn run_inner(args: &GenerateArgs) -> Result<(), String> {
    let project_dir =
        std::env::current_dir().map_err(|err| format!("Failed to get current directory: {err}"))?;
    let summary = generate(args, &project_dir)?;

    if args.check {
        if summary.stale > 0 {
            return Err(format!(
                "{} generated file(s) out of date; run without --check to update",
                summary.stale
            ));
        }
        println!("{} generated files are up to date", style("✓").green());
    } else {
        println!(
            "{} wrote {} file(s), {} unchanged",
            style("✓").green(),
            summary.written,
            summary.unchanged
        );
    }

    if summary.error_diagnostics > 0 {
        return Err(format!(
            "{} error diagnostic(s) reported",
            summary.error_diagnostics
        ));
    }
    Ok(())
}

fn report(diagnostic: &Diagnostic) {
    eprintln!("{}: {diagnostic}", style("error").red().bold());
}

/// Generate every client of the inputs into the output directory.
pub fn generate(args: &GenerateArgs, project_dir: &Path) -> Result<GenerateSummary, String> {
    let config = load_config(args.config.as_deref(), project_dir)?;
    let out_dir = project_dir.join(
        args.out_dir
            .clone()
            .or(config.out_dir)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUT_DIR)),
    );
    let defaults = config.defaults;

    let files = collect_inputs(&args.inputs)?;
    if files.is_empty() {
        return Err("No declaration files found".to_string());
    }
    debug!(count = files.len(), "Collected declaration files.");

    let classes: Vec<_> = files
        .par_iter()
        .map(|path| load_declarations(path))
        .collect::<Result<Vec<_>, String>>()?
        .into_iter()
        .flatten()
        .collect();

    let outputs = classes
        .par_iter()
        .map(|class| generate_client(class, &defaults).map_err(|err| err.to_string()))
        .collect::<Result<Vec<_>, String>>()?;

    let mut summary = GenerateSummary::default();
    let mut seen = HashSet::new();
    let mut sources: Vec<GeneratedSource> = Vec::with_capacity(outputs.len() + 1);
    for output in outputs {
        for diagnostic in &output.diagnostics {
            report(diagnostic);
            summary.error_diagnostics += 1;
        }
        if !seen.insert(output.source.hint_name.clone()) {
            return Err(format!(
                "Two clients would both be written to {}",
                output.source.hint_name
            ));
        }
        sources.push(output.source);
    }
    if !args.no_common {
        sources.push(
            common_attributes(&defaults.root_namespace)
                .map_err(|err| format!("Failed to render {COMMON_HINT_NAME}: {err}"))?,
        );
    }

    let changes: Vec<_> = sources
        .into_iter()
        .map(|source| FileChange::load(&out_dir, source.hint_name, source.text))
        .collect();

    if args.check {
        for change in changes.iter().filter(|c| c.is_stale()) {
            summary.stale += 1;
            if let Some(report) = change.check_report() {
                print!("{report}");
            }
        }
        summary.unchanged = changes.len() - summary.stale;
        return Ok(summary);
    }

    fs::create_dir_all(&out_dir)
        .map_err(|err| format!("Failed to create {}: {err}", out_dir.display()))?;
    for change in &changes {
        if !change.is_stale() {
            summary.unchanged += 1;
            continue;
        }
        let target = change.target(&out_dir);
        fs::write(&target, &change.new_content)
            .map_err(|err| format!("Failed to write {}: {err}", target.display()))?;
        info!(path = %target.display(), "Wrote generated file.");
        summary.written += 1;
    }

    Ok(summary)
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    const CLIENT: &str = r#"
namespace: Sample
name: SampleApiClient
methods:
  - name: GetHelloAsync
    returnType: Task<string>
    attributes: [{ name: Get, args: [{ value: "/" }] }]
"#;

    fn args(inputs: Vec<PathBuf>, check: bool) -> GenerateArgs {
        GenerateArgs {
            inputs,
            out_dir: None,
            check,
            config: None,
            no_common: false,
        }
    }

    #[test]
    fn test_generate_writes_then_check_passes() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("client.yaml");
        fs::write(&input, CLIENT).unwrap();

        let summary = generate(&args(vec![input.clone()], false), dir.path()).unwrap();
        assert_eq!(summary.written, 2);
        let out = dir.path().join("Generated");
        assert!(out.join("SampleApiClient_Generated.g.cs").is_file());
        assert!(out.join("Common.g.cs").is_file());

        let again = generate(&args(vec![input.clone()], false), dir.path()).unwrap();
        assert_eq!(again.written, 0);
        assert_eq!(again.unchanged, 2);

        let check = generate(&args(vec![input], true), dir.path()).unwrap();
        assert_eq!(check.stale, 0);
    }

    #[test]
    fn test_check_reports_stale_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("client.yaml");
        fs::write(&input, CLIENT).unwrap();

        let summary = generate(&args(vec![input], true), dir.path()).unwrap();
        assert_eq!(summary.stale, 2);
        assert!(!dir.path().join("Generated").exists());
    }

    #[test]
    fn test_config_sets_out_dir_and_namespace() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("client.yaml");
        fs::write(&input, CLIENT).unwrap();
        fs::write(
            dir.path().join("clientgen.toml"),
            "[generator]\nroot-namespace = \"Acme.Attributes\"\nout-dir = \"out\"\n",
        )
        .unwrap();

        generate(&args(vec![input], false), dir.path()).unwrap();
        let common = fs::read_to_string(dir.path().join("out").join("Common.g.cs")).unwrap();
        assert!(common.contains("namespace Acme.Attributes"));
    }

    #[test]
    fn test_duplicate_class_names_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.yaml"), CLIENT).unwrap();
        fs::write(dir.path().join("b.yaml"), CLIENT).unwrap();

        let err = generate(&args(vec![dir.path().to_path_buf()], false), dir.path()).unwrap_err();
        assert!(err.contains("SampleApiClient_Generated.g.cs"));
    }

    #[test]
    fn test_error_diagnostics_are_counted() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("client.yaml");
        fs::write(
            &input,
            r#"
name: Client
methods:
  - name: PostAsync
    returnType: Task
    attributes: [{ name: Post, args: [{ value: "/x" }] }]
    parameters:
      - { name: a, type: Item, attributes: [{ name: Body }] }
      - { name: b, type: Item, attributes: [{ name: Body }] }
"#,
        )
        .unwrap();
        let mut generate_args = args(vec![input], false);
        generate_args.no_common = true;

        let summary = generate(&generate_args, dir.path()).unwrap();
        assert_eq!(summary.error_diagnostics, 1);
        assert_eq!(summary.written, 1);
    }
}
