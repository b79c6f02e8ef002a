//! Terminal access used by the console sink.
use crossterm::{
    execute,
    style::{Color, ResetColor, SetForegroundColor},
};
use std::io::{self, Stderr, Stdout, Write};
use std::sync::{Arc, LazyLock, Mutex, PoisonError};

/// Output stream a line is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stream {
    Out,
    Err,
}

/// A terminal with a single foreground color shared by both streams.
pub trait Terminal {
    /// The foreground color currently in effect.
    fn foreground(&self) -> Color;

    /// Switches the foreground color used by subsequent writes.
    fn set_foreground(&mut self, color: Color) -> io::Result<()>;

    /// Writes `line` followed by a line terminator.
    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()>;

    /// Flushes both streams.
    fn flush(&mut self) -> io::Result<()>;
}

/// Foreground color of the process's terminal, shared by every
/// `ConsoleTerminal` built with [`ConsoleTerminal::new`].
static PROCESS_FOREGROUND: LazyLock<Arc<Mutex<Color>>> =
    LazyLock::new(|| Arc::new(Mutex::new(Color::Reset)));

/// A pair of output streams driven with crossterm escape sequences.
///
/// Color changes are emitted on the out stream, and only when the color
/// actually changes, so a sink that never leaves `Color::Reset` writes plain
/// text.
pub struct ConsoleTerminal<O = Stdout, E = Stderr> {
    out: O,
    err: E,
    foreground: Arc<Mutex<Color>>,
}

impl ConsoleTerminal {
    /// Creates a terminal over the process's stdout and stderr.
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            err: io::stderr(),
            foreground: PROCESS_FOREGROUND.clone(),
        }
    }
}

impl Default for ConsoleTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: Write, E: Write> ConsoleTerminal<O, E> {
    /// Creates a terminal over arbitrary writers.
    ///
    /// The terminal gets its own foreground color, starting at `Color::Reset`,
    /// instead of the process-wide one.
    pub fn with_writers(out: O, err: E) -> Self {
        Self {
            out,
            err,
            foreground: Arc::new(Mutex::new(Color::Reset)),
        }
    }

    /// Returns the out stream.
    pub fn out(&self) -> &O {
        &self.out
    }

    /// Returns the err stream.
    pub fn err(&self) -> &E {
        &self.err
    }
}

impl<O: Write, E: Write> Terminal for ConsoleTerminal<O, E> {
    fn foreground(&self) -> Color {
        *self.foreground.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn set_foreground(&mut self, color: Color) -> io::Result<()> {
        let mut current = self
            .foreground
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *current == color {
            return Ok(());
        }

        match color {
            Color::Reset => execute!(self.out, ResetColor)?,
            color => execute!(self.out, SetForegroundColor(color))?,
        }
        *current = color;
        Ok(())
    }

    fn write_line(&mut self, stream: Stream, line: &str) -> io::Result<()> {
        match stream {
            Stream::Out => writeln!(self.out, "{}", line),
            Stream::Err => writeln!(self.err, "{}", line),
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()?;
        self.err.flush()
    }
}
