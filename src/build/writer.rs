//! Line-oriented output buffer for the model document.

use std::fmt;
use std::fmt::Write;

/// Append-only buffer with a running indent level.
///
/// The document envelope is emitted unindented by the assembler, so the level
/// starts at 1 for the first `Item`. [`ModelWriter::indent`] emits the tab
/// prefix of the next line and [`ModelWriter::write`] completes it. The
/// writer never polices the level: balancing increments and decrements is the
/// caller's responsibility, and a level driven negative simply emits no tabs.
#[derive(Debug)]
pub struct ModelWriter {
    buf: String,
    level: i32,
}

impl Default for ModelWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl ModelWriter {
    pub fn new() -> Self {
        ModelWriter {
            buf: String::new(),
            level: 1,
        }
    }

    /// Adjust the indent level by `delta`, then emit that many tabs without a
    /// trailing newline.
    pub fn indent(&mut self, delta: i32) -> &mut Self {
        self.level += delta;
        for _ in 0..self.level {
            self.buf.push('\t');
        }
        self
    }

    /// Append `fragment` and terminate the line.
    pub fn write(&mut self, fragment: impl fmt::Display) -> &mut Self {
        let _ = write!(self.buf, "{fragment}");
        self.buf.push('\n');
        self
    }

    /// The accumulated text, fragments in append order.
    pub fn render(self) -> String {
        self.buf
    }
}
