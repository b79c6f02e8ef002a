//! Test support: an in-memory terminal.
use crate::sink::{Stream, Terminal};
use crossterm::style::Color;
use std::io;

/// One line captured by [`MemoryTerminal`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WrittenLine {
    pub stream: Stream,
    /// Foreground color in effect when the line was written.
    pub color: Color,
    pub text: String,
}

/// A [`Terminal`] that records everything written to it.
///
/// Like the real console it only records a color change when the color
/// actually differs from the current one. [`fail_on_write`](Self::fail_on_write)
/// makes the n-th line write fail, for exercising error paths.
#[derive(Debug)]
pub struct MemoryTerminal {
    foreground: Color,
    lines: Vec<WrittenLine>,
    color_changes: Vec<Color>,
    writes: usize,
    fail_on: Option<usize>,
    flushes: usize,
}

impl MemoryTerminal {
    pub fn new() -> Self {
        Self::with_foreground(Color::Reset)
    }

    pub fn with_foreground(foreground: Color) -> Self {
        Self {
            foreground,
            lines: Vec::new(),
            color_changes: Vec::new(),
            writes: 0,
            fail_on: None,
            flushes: 0,
        }
    }

    /// Makes the `n`-th call to `write_line` (1-based) fail.
    pub fn fail_on_write(mut self, n: usize) -> Self {
        self.fail_on = Some(n);
        self
    }

    pub fn lines(&self) -> &[WrittenLine] {
        &self.lines
    }

    pub fn stdout_lines(&self) -> Vec<&str> {
        self.lines_on(Stream::Out)
    }

    pub fn stderr_lines(&self) -> Vec<&str> {
        self.lines_on(Stream::Err)
    }

    pub fn color_changes(&self) -> &[Color] {
        &self.color_changes
    }

    pub fn flush_count(&self) -> usize {
        self.flushes
    }

    fn lines_on(&self, stream: Stream) -> Vec<&str> {
        self.lines
            .iter()
            .filter(|line| line.stream == stream)
            .map(|line| line.text.as_str())
            .collect()
    }
}

impl Default for MemoryTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for MemoryTerminal {
    fn foreground(&self) -> Color {
        self.foreground
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        if self.foreground != color {
            self.foreground = color;
            self.color_changes.push(color);
        }
        Ok(())
    }

    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        self.writes += 1;
        if self.fail_on == Some(self.writes) {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "terminal closed"));
        }
        self.lines.push(WrittenLine {
            stream,
            color: self.foreground,
            text: line.to_string(),
        });
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.flushes += 1;
        Ok(())
    }
}
