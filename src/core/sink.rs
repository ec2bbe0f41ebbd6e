//! Log sinks: where a console writes diagnostics and command output.

use std::io::Write;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use super::{ConsoleOutputEvent, ConsoleOutputLevel};

/// A write-only destination for console output.
pub trait LogSink: Send + Sync {
    /// Write one line of output.
    fn write_line(&mut self, level: ConsoleOutputLevel, message: &str);
}

/// Shared in-memory sink.
///
/// Clones share the same buffer, so a caller can keep one handle and give
/// another to the console, then drain what the console wrote.
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::{Console, OutputBuffer};
///
/// let output = OutputBuffer::new();
/// let mut console = Console::new(output.clone());
/// console.execute("nope");
///
/// assert_eq!(output.lines(), vec!["unknown command: nope"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct OutputBuffer {
    events: Arc<Mutex<Vec<ConsoleOutputEvent>>>,
}

impl OutputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Remove and return everything written so far.
    pub fn drain(&self) -> Vec<ConsoleOutputEvent> {
        std::mem::take(&mut *self.lock())
    }

    /// Copy of the buffered text, oldest first.
    pub fn lines(&self) -> Vec<String> {
        self.lock().iter().map(|e| e.message.clone()).collect()
    }

    /// Copy of the buffered events, oldest first.
    pub fn events(&self) -> Vec<ConsoleOutputEvent> {
        self.lock().clone()
    }

    pub fn clear(&self) {
        self.lock().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<ConsoleOutputEvent>> {
        // A panicking writer cannot leave a Vec half-pushed.
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl LogSink for OutputBuffer {
    fn write_line(&mut self, level: ConsoleOutputLevel, message: &str) {
        self.lock().push(ConsoleOutputEvent::new(level, message));
    }
}

/// Sink that writes plain lines to any [`Write`] implementation.
///
/// Write errors are ignored; output is best effort.
#[derive(Debug)]
pub struct WriterSink<W> {
    writer: W,
}

impl<W: Write> WriterSink<W> {
    pub fn new(writer: W) -> Self {
        Self { writer }
    }

    /// Unwrap the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl WriterSink<std::io::Stdout> {
    /// Sink writing to standard output.
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

impl<W: Write + Send + Sync> LogSink for WriterSink<W> {
    fn write_line(&mut self, _level: ConsoleOutputLevel, message: &str) {
        let _ = writeln!(self.writer, "{}", message);
    }
}
