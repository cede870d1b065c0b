//! Generated files paired with what is on disk, and the report `generate --check` prints for them.

use std::fs;
use std::path::{Path, PathBuf};

use console::style;
use similar::{ChangeTag, TextDiff};

/// How a generated file relates to the file already at its path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeKind {
    /// Disk already holds the generated text.
    Unchanged,
    /// Nothing on disk yet.
    Missing,
    /// Disk holds different text.
    Modified,
}

/// Lines a write would add and remove.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct LineCounts {
    /// Lines only in the generated text.
    pub inserted: usize,
    /// Lines only in the file on disk.
    pub deleted: usize,
}

/// A generated file and what is currently on disk at its path.
#[derive(Debug)]
pub struct FileChange {
    /// Hint name, relative to the output directory.
    pub rel_path: String,
    /// Generated text.
    pub new_content: String,
    /// Text on disk, if the file exists.
    pub existing_content: Option<String>,
}

impl FileChange {
    /// Pair generated content with the file at `out_dir/rel_path`.
    pub fn load(out_dir: &Path, rel_path: String, new_content: String) -> Self {
        let existing_content = fs::read_to_string(out_dir.join(&rel_path)).ok();
        Self {
            rel_path,
            new_content,
            existing_content,
        }
    }

    /// Classify this file against disk.
    pub fn kind(&self) -> ChangeKind {
        match &self.existing_content {
            None => ChangeKind::Missing,
            Some(existing) if existing == &self.new_content => ChangeKind::Unchanged,
            Some(_) => ChangeKind::Modified,
        }
    }

    /// Whether writing this file would change the disk.
    pub fn is_stale(&self) -> bool {
        self.kind() != ChangeKind::Unchanged
    }

    /// Where this file is written.
    pub fn target(&self, out_dir: &Path) -> PathBuf {
        out_dir.join(&self.rel_path)
    }

    /// Count inserted and deleted lines; a missing file counts every generated line.
    pub fn line_counts(&self) -> LineCounts {
        let existing = self.existing_content.as_deref().unwrap_or_default();
        let diff = TextDiff::from_lines(existing, &self.new_content);
        let mut counts = LineCounts::default();
        for change in diff.iter_all_changes() {
            match change.tag() {
                ChangeTag::Insert => counts.inserted += 1,
                ChangeTag::Delete => counts.deleted += 1,
                ChangeTag::Equal => {}
            }
        }
        counts
    }

    /// What `--check` prints for this file: a status line, then the hunks of a
    /// modified file. `None` when the file is up to date.
    pub fn check_report(&self) -> Option<String> {
        let counts = self.line_counts();
        let Some(existing) = self.existing_content.as_deref() else {
            return Some(format!(
                "{} {} missing ({} lines)\n",
                style("+").green().bold(),
                style(&self.rel_path).bold(),
                counts.inserted
            ));
        };
        if existing == self.new_content {
            return None;
        }

        let mut output = format!(
            "{} {} out of date ({}, {})\n",
            style("~").yellow().bold(),
            style(&self.rel_path).bold(),
            style(format!("+{}", counts.inserted)).green(),
            style(format!("-{}", counts.deleted)).red()
        );

        let diff = TextDiff::from_lines(existing, &self.new_content);
        let unified = diff.unified_diff();
        for hunk in unified.iter_hunks() {
            output.push_str(&format!("{}\n", style(hunk.header()).cyan()));
            for change in hunk.iter_changes() {
                let mut line = change.value().to_string();
                if change.missing_newline() {
                    line.push('\n');
                }
                let line = match change.tag() {
                    ChangeTag::Delete => style(format!("-{line}")).red().to_string(),
                    ChangeTag::Insert => style(format!("+{line}")).green().to_string(),
                    ChangeTag::Equal => format!(" {line}"),
                };
                output.push_str(&line);
            }
        }

        Some(output)
    }
}
