//! Scoped foreground color handling for the console sink.
//!
//! A batch may switch colors several times; [`ForegroundGuard`] makes sure the
//! terminal ends up in the color it had before the batch, on every exit path.
use super::terminal::{Stream, Terminal};
use crossterm::style::Color;
use std::io;

/// RAII guard that restores a terminal's foreground color.
///
/// The guard records the color in effect when it is created. Writes issued
/// through it may change the color freely; dropping the guard puts the
/// recorded color back, so an early return with `?` never leaves the terminal
/// colored. Use [`finish`](Self::finish) on the success path to observe a
/// failure of the restoring write itself.
#[must_use = "dropping the guard immediately restores the previous color"]
pub struct ForegroundGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
    previous: Color,
    restored: bool,
}

impl<'a, T: Terminal + ?Sized> ForegroundGuard<'a, T> {
    /// Creates a new guard, recording the terminal's current color.
    ///
    /// # Arguments
    ///
    /// * `terminal` - The terminal whose color is restored when the guard ends.
    pub fn capture(terminal: &'a mut T) -> Self {
        let previous = terminal.foreground();
        Self {
            terminal,
            previous,
            restored: false,
        }
    }

    /// The color that will be restored.
    pub fn previous(&self) -> Color {
        self.previous
    }

    /// Switches the terminal's color until the next change or the guard's end.
    pub fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        self.terminal.set_foreground(color)
    }

    /// Writes a line through the guarded terminal.
    pub fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        self.terminal.write_line(stream, line)
    }

    /// Restores the captured color and reports whether that succeeded.
    pub fn finish(mut self) -> io::Result<()> {
        self.restored = true;
        self.terminal.set_foreground(self.previous)
    }
}

impl<'a, T: Terminal + ?Sized> Drop for ForegroundGuard<'a, T> {
    fn drop(&mut self) {
        if !self.restored {
            let _ = self.terminal.set_foreground(self.previous);
        }
    }
}
