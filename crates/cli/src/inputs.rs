//! Declaration input discovery and loading.

use std::ffi::OsStr;
use std::fs;
use std::path::{Path, PathBuf};

use clientgen_core::ClassDeclaration;
use clientgen_core::declaration::{from_json, from_yaml};
use walkdir::WalkDir;

const DECLARATION_EXTENSIONS: [&str; 3] = ["json", "yaml", "yml"];

fn is_declaration_file(path: &Path) -> bool {
    path.extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| {
            DECLARATION_EXTENSIONS
                .iter()
                .any(|known| ext.eq_ignore_ascii_case(known))
        })
}

/// Expand inputs into declaration files. Directories are walked recursively
/// and their matches sorted; explicit files are kept in the order given.
pub fn collect_inputs(inputs: &[PathBuf]) -> Result<Vec<PathBuf>, String> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let mut found = Vec::new();
            for entry in WalkDir::new(input) {
                let entry = entry.map_err(|err| {
                    format!("Failed to read directory {}: {err}", input.display())
                })?;
                if entry.file_type().is_file() && is_declaration_file(entry.path()) {
                    found.push(entry.into_path());
                }
            }
            found.sort();
            files.extend(found);
        } else if input.is_file() {
            files.push(input.clone());
        } else {
            return Err(format!("Input not found: {}", input.display()));
        }
    }
    Ok(files)
}

/// Parse a declaration file; `.json` is read as JSON, anything else as YAML.
pub fn load_declarations(path: &Path) -> Result<Vec<ClassDeclaration>, String> {
    let contents = fs::read_to_string(path)
        .map_err(|err| format!("Failed to read {}: {err}", path.display()))?;
    let is_json = path
        .extension()
        .and_then(OsStr::to_str)
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
    let parsed = if is_json {
        from_json(&contents)
    } else {
        from_yaml(&contents)
    };
    parsed.map_err(|err| format!("{}: {err}", path.display()))
}
