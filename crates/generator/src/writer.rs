//! Indentation-aware output buffer

pub(crate) struct TsWriter {
    output: String,
    indent_unit: String,
    depth: usize,
    /// One entry per open scope: whether it already holds a declaration
    started: Vec<bool>,
}

impl TsWriter {
    pub(crate) fn new(indent_size: usize) -> Self {
        Self {
            output: String::new(),
            indent_unit: " ".repeat(indent_size),
            depth: 0,
            started: vec![false],
        }
    }

    /// Marks the start of a declaration, separating it from the previous
    /// declaration of the same scope with a blank line.
    pub(crate) fn begin_declaration(&mut self) {
        if let Some(started) = self.started.last_mut() {
            if *started {
                self.output.push('\n');
            }
            *started = true;
        }
    }

    pub(crate) fn line(&mut self, text: &str) {
        for _ in 0..self.depth {
            self.output.push_str(&self.indent_unit);
        }
        self.output.push_str(text);
        self.output.push('\n');
    }

    /// Writes `header {` and enters a new scope
    pub(crate) fn open(&mut self, header: &str) {
        self.line(&format!("{} {{", header));
        self.depth += 1;
        self.started.push(false);
    }

    pub(crate) fn close(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        if self.started.len() > 1 {
            self.started.pop();
        }
        self.line("}");
    }

    pub(crate) fn finish(self) -> String {
        self.output
    }
}
