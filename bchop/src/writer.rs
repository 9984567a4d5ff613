//! Indentation-aware line writer for generated source.

use std::fmt::{self, Write};
use std::ops::{Deref, DerefMut};

const INDENT_UNIT: &str = "    ";

/// Accumulates generated source line by line at the current indentation.
///
/// Indentation is only ever raised through [`CodeWriter::indent`], whose guard
/// restores the previous depth when dropped.
#[derive(Debug, Default)]
pub struct CodeWriter {
    buf: String,
    depth: usize,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        CodeWriter {
            buf: String::with_capacity(capacity),
            depth: 0,
        }
    }

    /// Write one line at the current depth.
    pub fn line(&mut self, text: impl fmt::Display) {
        for _ in 0..self.depth {
            self.buf.push_str(INDENT_UNIT);
        }
        // fmt::Write for String never fails.
        let _ = writeln!(self.buf, "{}", text);
    }

    /// Write an empty line, without indentation.
    pub fn blank(&mut self) {
        self.buf.push('\n');
    }

    /// Enter a nested block one level deeper.
    pub fn indent(&mut self) -> Indented<'_> {
        self.depth += 1;
        Indented { writer: self }
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn as_str(&self) -> &str {
        &self.buf
    }

    pub fn into_string(self) -> String {
        self.buf
    }
}

/// A nested block of a [`CodeWriter`]. Dereferences to the writer; the depth
/// is restored when the guard goes out of scope.
#[must_use = "dropping the guard immediately undoes the indent"]
pub struct Indented<'w> {
    writer: &'w mut CodeWriter,
}

impl Deref for Indented<'_> {
    type Target = CodeWriter;

    fn deref(&self) -> &CodeWriter {
        self.writer
    }
}

impl DerefMut for Indented<'_> {
    fn deref_mut(&mut self) -> &mut CodeWriter {
        self.writer
    }
}

impl Drop for Indented<'_> {
    fn drop(&mut self) {
        self.writer.depth -= 1;
    }
}
