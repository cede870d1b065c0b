//! Command line interface for the client generator.

use clap::{CommandFactory, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use tracing_subscriber::prelude::*;

pub mod attributes;
pub mod config;
pub mod diff;
pub mod generate;
pub mod inputs;
pub mod inspect;

/// Environment variable controlling log output.
pub const LOG_ENV: &str = "CLIENTGEN_LOG";

const LOG_TARGETS: [&str; 2] = ["clientgen_core", "clientgen_cli"];

#[derive(Parser, Debug)]
#[command(
    name = "clientgen",
    version,
    about = "Generate typed C# HTTP clients from annotated class declarations"
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate client sources
    Generate(generate::GenerateArgs),
    /// Print the resolved IR and diagnostics as JSON
    Inspect(inspect::InspectArgs),
    /// Print the shared attribute definitions (Common.g.cs)
    Attributes(attributes::AttributesArgs),
}

/// Parse `args` (including the program name) and run the command.
pub fn run_cli(args: Vec<String>) -> i32 {
    match Cli::try_parse_from(args) {
        Ok(cli) => match cli.command {
            Some(Commands::Generate(args)) => generate::run(args),
            Some(Commands::Inspect(args)) => inspect::run(args),
            Some(Commands::Attributes(args)) => attributes::run(args),
            None => {
                let mut cmd = Cli::command();
                let _ = cmd.print_help();
                println!();
                0
            }
        },
        Err(e) => {
            let code = e.exit_code();
            let _ = e.print();
            code
        }
    }
}

/// Run a command body, mapping its error to a printed message and exit code 1.
pub fn run_command<F>(f: F) -> i32
where
    F: FnOnce() -> Result<(), String>,
{
    match f() {
        Ok(()) => 0,
        Err(err) => {
            eprintln!("{err}");
            1
        }
    }
}

/// Install the stderr log subscriber.
pub fn init_tracing() {
    // CLIENTGEN_LOG: "trace", "debug", "info", "warn", "error"
    // or a full tracing filter spec like "clientgen_core=debug"
    let filter = log_filter(std::env::var(LOG_ENV).ok().as_deref());

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_line_number(true)
        .with_file(true)
        .with_filter(EnvFilter::new(filter));

    if tracing_subscriber::registry()
        .with(fmt_layer)
        .try_init()
        .is_err()
    {
        eprintln!("Warning: tracing subscriber already initialized");
    }
}

fn log_filter(setting: Option<&str>) -> String {
    let scoped = |level: &str| {
        LOG_TARGETS
            .iter()
            .map(|target| format!("{target}={level}"))
            .collect::<Vec<_>>()
            .join(",")
    };
    match setting {
        Some(level) if is_plain_level(level) => scoped(level),
        Some(spec) => spec.to_string(),
        None => scoped("info"),
    }
}

fn is_plain_level(s: &str) -> bool {
    matches!(
        s.to_ascii_lowercase().as_str(),
        "trace" | "debug" | "info" | "warn" | "error"
    )
}
