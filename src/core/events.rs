//! Console messages for communication between layers.
//!
//! - Driver -> Console: [`ConsoleInputEvent`] lines to execute
//! - Console -> Driver: [`ConsoleOutputEvent`] diagnostics and command output

use bevy::prelude::*;

/// Message sent when a line is submitted to the console.
///
/// # Examples
///
/// ```ignore
/// fn submit_line(mut events: MessageWriter<ConsoleInputEvent>) {
///     events.write(ConsoleInputEvent::new("set test_int 100"));
/// }
/// ```
#[derive(Message, Debug, Clone)]
pub struct ConsoleInputEvent {
    /// The raw line to execute.
    pub command: String,
}

impl ConsoleInputEvent {
    /// Create a new input event.
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

/// A line of console output.
///
/// Also the unit stored by [`OutputBuffer`](super::OutputBuffer).
#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct ConsoleOutputEvent {
    /// The message text.
    pub message: String,
    /// The log level/type.
    pub level: ConsoleOutputLevel,
}

/// Log level for console output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ConsoleOutputLevel {
    /// Debug information.
    Debug,
    /// General information.
    #[default]
    Info,
    /// Warning, e.g. a trailing quote.
    Warn,
    /// Failed line or command.
    Error,
    /// Echo of the line that was executed.
    Command,
    /// Output written by a command handler.
    Result,
}

impl ConsoleOutputEvent {
    /// Create a new output event.
    pub fn new(level: ConsoleOutputLevel, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            level,
        }
    }

    /// Create a warning message.
    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Warn, message)
    }

    /// Create an error message.
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Error, message)
    }

    /// Create a result message.
    pub fn result(message: impl Into<String>) -> Self {
        Self::new(ConsoleOutputLevel::Result, message)
    }
}

/// Plugin that registers all console messages.
pub struct ConsoleEventsPlugin;

impl Plugin for ConsoleEventsPlugin {
    fn build(&self, app: &mut App) {
        app.add_message::<ConsoleInputEvent>()
            .add_message::<ConsoleOutputEvent>();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_console_input_event() {
        let event = ConsoleInputEvent::new("echo 1");
        assert_eq!(event.command, "echo 1");
    }

    #[test]
    fn test_console_output_event() {
        let event = ConsoleOutputEvent::error("unknown command: fly");
        assert_eq!(event.level, ConsoleOutputLevel::Error);
        assert_eq!(event.message, "unknown command: fly");
        assert_eq!(ConsoleOutputEvent::result("1").level, ConsoleOutputLevel::Result);
    }
}
