//! `attributes` command: prints or writes `Common.g.cs`.

use std::fs;
use std::path::PathBuf;

use clap::Args;
use clientgen_core::{COMMON_HINT_NAME, common_attributes};

use crate::config::load_config;
use crate::run_command;

/// Arguments of `clientgen attributes`.
#[derive(Args, Debug, Clone)]
pub struct AttributesArgs {
    /// Namespace for the attribute definitions [default: `root-namespace` from clientgen.toml]
    #[arg(long, value_name = "NAMESPACE")]
    pub namespace: Option<String>,
    /// Write to this file instead of stdout
    #[arg(long, short = 'o', value_name = "FILE")]
    pub out: Option<PathBuf>,
    /// Path to the project configuration [default: ./clientgen.toml]
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,
}

/// Run `attributes`, returning the process exit code.
pub fn run(args: AttributesArgs) -> i32 {
    run_command(|| {
        let project_dir = std::env::current_dir()
            .map_err(|err| format!("Failed to get current directory: {err}"))?;
        let namespace = match args.namespace {
            Some(ns) => ns,
            None => load_config(args.config.as_deref(), &project_dir)?
                .defaults
                .root_namespace,
        };
        let source = common_attributes(&namespace)
            .map_err(|err| format!("Failed to render {COMMON_HINT_NAME}: {err}"))?;
        match &args.out {
            Some(path) => fs::write(path, &source.text)
                .map_err(|err| format!("Failed to write {}: {err}", path.display())),
            None => {
                print!("{}", source.text);
                Ok(())
            }
        }
    })
}
