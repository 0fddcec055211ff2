//! Formatting cursor shared by the writers.
//!
//! Indentation is written lazily: [`Emitter::newline`] only ends the line,
//! and the next push writes the indent at the depth current at that moment.
//! Blank lines therefore carry no trailing whitespace, and an `outdent`
//! between `newline` and a closing brace lands the brace at the outer depth.

use crate::config::RenderOptions;

pub struct Emitter {
    output: String,
    indent: usize,
    indent_unit: String,
    at_line_start: bool,
}

impl Emitter {
    pub fn new(indent_width: usize) -> Self {
        Self {
            output: String::new(),
            indent: 0,
            indent_unit: " ".repeat(indent_width),
            at_line_start: true,
        }
    }

    pub fn from_options(options: &RenderOptions) -> Self {
        Self::new(options.indent_width)
    }

    pub fn push(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.write_pending_indent();
        self.output.push_str(text);
    }

    pub fn newline(&mut self) {
        self.output.push('\n');
        self.at_line_start = true;
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn outdent(&mut self) {
        debug_assert!(self.indent > 0, "outdent below column zero");
        self.indent = self.indent.saturating_sub(1);
    }

    /// Remove the separator appended after the last element of a sequence.
    ///
    /// Call only after at least one element was written; an empty sequence
    /// appended no separator and has nothing to remove.
    pub fn trim_separator(&mut self, separator: &str) {
        debug_assert!(
            self.output.ends_with(separator),
            "no trailing {separator:?} to trim"
        );
        if self.output.ends_with(separator) {
            self.output.truncate(self.output.len() - separator.len());
        }
    }

    /// Take the rendered text. Every indent must have been closed.
    pub fn finish(self) -> String {
        debug_assert_eq!(self.indent, 0, "unbalanced indentation after render");
        self.output
    }

    fn write_pending_indent(&mut self) {
        if self.at_line_start {
            self.at_line_start = false;
            for _ in 0..self.indent {
                self.output.push_str(&self.indent_unit);
            }
        }
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::from_options(&RenderOptions::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indent_is_written_lazily() {
        let mut out = Emitter::new(2);
        out.push("{");
        out.indent();
        out.newline();
        out.newline();
        out.push("x");
        out.outdent();
        out.newline();
        out.push("}");

        assert_eq!(out.finish(), "{\n\n  x\n}");
    }

    #[test]
    fn test_trim_separator() {
        let mut out = Emitter::default();
        out.push("f(");
        for arg in ["a", "b", "c"] {
            out.push(arg);
            out.push(", ");
        }
        out.trim_separator(", ");
        out.push(")");

        assert_eq!(out.finish(), "f(a, b, c)");
    }

    #[test]
    #[should_panic(expected = "unbalanced indentation")]
    #[cfg(debug_assertions)]
    fn test_unbalanced_indent_is_caught() {
        let mut out = Emitter::default();
        out.indent();
        out.finish();
    }
}
