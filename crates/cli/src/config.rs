//! Project configuration (`clientgen.toml`).

use std::fs;
use std::path::{Path, PathBuf};

use clientgen_core::ir::SerializationMode;
use clientgen_core::{GeneratorDefaults, clamp_threshold};
use tracing::debug;

/// Configuration file looked up in the project directory.
pub const CONFIG_FILENAME: &str = "clientgen.toml";
/// Output directory when neither the command line nor the file sets one.
pub const DEFAULT_OUT_DIR: &str = "Generated";

/// Settings read from the `[generator]` table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ProjectConfig {
    /// Generator defaults below class-level options.
    pub defaults: GeneratorDefaults,
    /// `out-dir`, relative to the project directory.
    pub out_dir: Option<PathBuf>,
}

/// Load the configuration: an explicit path must exist, otherwise
/// `clientgen.toml` in `project_dir` is used when present.
pub fn load_config(explicit: Option<&Path>, project_dir: &Path) -> Result<ProjectConfig, String> {
    let path = match explicit {
        Some(path) => path.to_path_buf(),
        None => {
            let candidate = project_dir.join(CONFIG_FILENAME);
            if !candidate.is_file() {
                debug!(dir = %project_dir.display(), "No clientgen.toml found, using defaults.");
                return Ok(ProjectConfig::default());
            }
            candidate
        }
    };

    let contents = fs::read_to_string(&path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    let config = parse_config(&contents)
        .map_err(|err| format!("Invalid configuration in {}: {err}", path.display()))?;
    debug!(path = %path.display(), ?config, "Loaded project configuration.");
    Ok(config)
}

/// Parse configuration text. Keys missing from `[generator]` keep their defaults.
pub fn parse_config(contents: &str) -> Result<ProjectConfig, String> {
    let value: toml::Value = contents
        .parse()
        .map_err(|err| format!("Failed to parse TOML: {err}"))?;

    let mut config = ProjectConfig::default();
    let Some(generator) = value.get("generator") else {
        return Ok(config);
    };
    if !generator.is_table() {
        return Err("`generator` must be a table".to_string());
    }

    if let Some(ns) = get_string(generator, "root-namespace")? {
        config.defaults.root_namespace = ns;
    }
    if let Some(symbol) = get_string(generator, "serialization")? {
        let mode = SerializationMode::from_symbol(&symbol)
            .ok_or_else(|| format!("Unknown serialization mode '{symbol}'"))?;
        config.defaults = config.defaults.with_serialization(mode);
    }
    if let Some(net_core) = generator.get("net-core") {
        config.defaults.net_core = net_core
            .as_bool()
            .ok_or_else(|| "`net-core` must be a boolean".to_string())?;
    }
    if let Some(threshold) = generator.get("connection-too-long-warn") {
        let ms = threshold
            .as_integer()
            .ok_or_else(|| "`connection-too-long-warn` must be an integer".to_string())?;
        config.defaults.connection_too_long_warn = clamp_threshold(ms);
    }
    config.out_dir = get_string(generator, "out-dir")?.map(PathBuf::from);

    Ok(config)
}

fn get_string(table: &toml::Value, key: &str) -> Result<Option<String>, String> {
    match table.get(key) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| Some(s.to_string()))
            .ok_or_else(|| format!("`{key}` must be a string")),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use clientgen_core::ir::Serializer;

    #[test]
    fn test_parse_full_generator_table() {
        let config = parse_config(
            r#"
[generator]
root-namespace = "Acme.Clients"
serialization = "SystemTextJson"
net-core = true
connection-too-long-warn = 250
out-dir = "src/Generated"
"#,
        )
        .unwrap();
        assert_eq!(config.defaults.root_namespace, "Acme.Clients");
        assert_eq!(config.defaults.serializer, Serializer::SystemTextJson);
        assert!(config.defaults.net_core);
        assert_eq!(config.defaults.connection_too_long_warn, 250);
        assert_eq!(config.out_dir, Some(PathBuf::from("src/Generated")));
    }

    #[test]
    fn test_missing_table_uses_defaults() {
        let config = parse_config("[other]\nkey = 1\n").unwrap();
        assert_eq!(config, ProjectConfig::default());
    }

    #[test]
    fn test_negative_threshold_clamps() {
        let config = parse_config("[generator]\nconnection-too-long-warn = -10\n").unwrap();
        assert_eq!(config.defaults.connection_too_long_warn, 0);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        assert!(parse_config("[generator]\nserialization = \"Yaml\"\n").is_err());
        assert!(parse_config("[generator]\nnet-core = \"yes\"\n").is_err());
        assert!(parse_config("generator = 3\n").is_err());
        assert!(parse_config("[generator\n").is_err());
    }

    #[test]
    fn test_load_config_from_project_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(
            load_config(None, dir.path()).unwrap(),
            ProjectConfig::default()
        );

        fs::write(
            dir.path().join(CONFIG_FILENAME),
            "[generator]\nnet-core = true\n",
        )
        .unwrap();
        assert!(load_config(None, dir.path()).unwrap().defaults.net_core);

        let missing = dir.path().join("nope.toml");
        assert!(load_config(Some(&missing), dir.path()).is_err());
    }
}
