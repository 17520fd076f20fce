//! Indenting text writer for generated C# units.

const INDENT: &str = "    ";

pub(super) struct CodeWriter {
    buffer: String,
    indent: usize,
}

impl CodeWriter {
    pub(super) const fn new() -> Self {
        Self {
            buffer: String::new(),
            indent: 0,
        }
    }

    pub(super) fn line(&mut self, line: &str) {
        for _ in 0..self.indent {
            self.buffer.push_str(INDENT);
        }
        self.buffer.push_str(line);
        self.buffer.push('\n');
    }

    pub(super) fn blank(&mut self) {
        self.buffer.push('\n');
    }

    /// Writes `header` followed by an opening brace and indents.
    pub(super) fn open_block(&mut self, header: &str) {
        self.line(header);
        self.line("{");
        self.indent += 1;
    }

    /// Outdents and writes the closing brace.
    pub(super) fn close_block(&mut self) {
        self.indent = self.indent.saturating_sub(1);
        self.line("}");
    }

    #[cfg(test)]
    pub(super) const fn depth(&self) -> usize {
        self.indent
    }

    pub(super) fn finish(self) -> String {
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blocks_nest_and_balance() {
        let mut writer = CodeWriter::new();
        writer.open_block("namespace Game");
        writer.open_block("public partial class Player");
        writer.line("private int X => 1;");
        writer.close_block();
        writer.close_block();
        assert_eq!(writer.depth(), 0);
        assert_eq!(
            writer.finish(),
            "namespace Game\n{\n    public partial class Player\n    {\n        private int X => 1;\n    }\n}\n"
        );
    }
}
