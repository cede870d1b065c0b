//! Indentation-aware source text accumulator.

use thiserror::Error;

const INDENT: &str = "    ";

/// Returned by [`SourceWriter::finish`] when blocks were left open.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{depth} block(s) left open")]
pub struct Unbalanced {
    /// Number of blocks left open.
    pub depth: usize,
}

/// Accumulates source text with an explicit indentation depth.
///
/// `begin_block`/`end_block` must pair up. Closing a block at depth zero is
/// a bug in the caller and panics.
#[derive(Debug, Default)]
pub struct SourceWriter {
    buf: String,
    depth: usize,
}

impl SourceWriter {
    /// An empty writer at depth zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write text at the current depth. Every embedded line is re-indented;
    /// `\r\n` is normalized and empty lines carry no trailing whitespace.
    pub fn write_line(&mut self, text: &str) {
        for line in text.split('\n') {
            let line = line.strip_suffix('\r').unwrap_or(line);
            if line.is_empty() {
                self.buf.push('\n');
                continue;
            }
            for _ in 0..self.depth {
                self.buf.push_str(INDENT);
            }
            self.buf.push_str(line);
            self.buf.push('\n');
        }
    }

    /// Write an empty line.
    pub fn blank_line(&mut self) {
        self.buf.push('\n');
    }

    /// Write `{` and indent.
    pub fn begin_block(&mut self) {
        self.write_line("{");
        self.depth += 1;
    }

    /// Dedent and write `}`.
    ///
    /// # Panics
    ///
    /// Panics when no block is open.
    pub fn end_block(&mut self) {
        assert!(self.depth > 0, "end_block without a matching begin_block");
        self.depth -= 1;
        self.write_line("}");
    }

    /// The accumulated text; fails when blocks are still open.
    pub fn finish(self) -> Result<String, Unbalanced> {
        if self.depth != 0 {
            return Err(Unbalanced { depth: self.depth });
        }
        Ok(self.buf)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_nested_blocks_indent_four_spaces() {
        let mut w = SourceWriter::new();
        w.write_line("namespace A");
        w.begin_block();
        w.write_line("class B");
        w.begin_block();
        w.write_line("int x;");
        w.end_block();
        w.end_block();
        assert_eq!(
            w.finish().unwrap(),
            "namespace A\n{\n    class B\n    {\n        int x;\n    }\n}\n"
        );
    }

    #[test]
    fn test_multiline_text_is_reindented() {
        let mut w = SourceWriter::new();
        w.begin_block();
        w.write_line("a\r\n\nb");
        w.end_block();
        assert_eq!(w.finish().unwrap(), "{\n    a\n\n    b\n}\n");
    }

    #[test]
    fn test_finish_reports_open_blocks() {
        let mut w = SourceWriter::new();
        w.begin_block();
        w.begin_block();
        assert_eq!(w.finish(), Err(Unbalanced { depth: 2 }));
    }

    #[test]
    #[should_panic(expected = "end_block without a matching begin_block")]
    fn test_unmatched_end_block_panics() {
        let mut w = SourceWriter::new();
        w.end_block();
    }
}
