//! Error types for the console core.
//!
//! Every error's `Display` text is exactly the diagnostic line written to
//! the console's log sink.

use thiserror::Error;

use super::VarKind;

/// Broad failure category, one per class of console diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// The line could not be tokenized into anything executable.
    Parse,
    /// A token is neither a literal nor a known variable.
    Resolution,
    /// An unknown command or variable name.
    Lookup,
    /// Argument count does not match a command's declared arity.
    Arity,
    /// Write to a read-only variable.
    Permission,
    /// Coercion requested between incompatible kinds.
    Type,
    /// The command's own logic reported failure.
    Handler,
    /// Conflicting registration (duplicate name).
    Registration,
    /// A registry or line limit was exceeded.
    Capacity,
}

/// Errors produced while registering, resolving, or executing.
#[derive(Debug, Error)]
pub enum ConsoleError {
    /// The line contained no tokens.
    #[error("nothing to execute")]
    NothingToExecute,

    /// The line is longer than the configured limit.
    #[error("line too long: {len} bytes (limit {limit})")]
    LineTooLong { len: usize, limit: usize },

    /// The line produced more tokens than the configured limit.
    #[error("too many tokens: {count} (limit {limit})")]
    TooManyTokens { count: usize, limit: usize },

    /// A token is not a literal and names no variable.
    #[error("unknown symbol: \"{0}\"")]
    UnknownSymbol(String),

    /// The first token names no registered command.
    #[error("unknown command: {0}")]
    UnknownCommand(String),

    /// A name refers to no registered variable.
    #[error("unknown variable: {0}")]
    UnknownVariable(String),

    /// Resolved argument count differs from the command's exact arity.
    #[error("{command}: expected {expected} arguments")]
    Arity {
        command: String,
        expected: usize,
        found: usize,
    },

    /// A setter was called on a read-only variable.
    #[error("{0} is read-only")]
    ReadOnly(String),

    /// A value of the wrong kind was read from or written to a variable.
    #[error("{name}: cannot use {kind} variable as {requested}")]
    TypeMismatch {
        name: String,
        kind: VarKind,
        requested: VarKind,
    },

    /// A handler asked for an argument position that was not supplied.
    #[error("missing argument {index}")]
    MissingArgument { index: usize },

    /// A handler reported failure without further detail.
    #[error("command reported failure")]
    Failed,

    /// A handler panicked; the console stays usable.
    #[error("{command} panicked: {message}")]
    HandlerPanicked { command: String, message: String },

    /// A variable with this name is already registered.
    #[error("variable already registered: {0}")]
    DuplicateVariable(String),

    /// A command with this name is already registered.
    #[error("command already registered: {0}")]
    DuplicateCommand(String),

    /// A registry reached its configured capacity.
    #[error("{registry} registry is full ({limit} entries)")]
    CapacityExceeded {
        registry: &'static str,
        limit: usize,
    },
}

impl ConsoleError {
    /// The taxonomy class of this error.
    pub fn category(&self) -> ErrorCategory {
        match self {
            ConsoleError::NothingToExecute => ErrorCategory::Parse,
            ConsoleError::LineTooLong { .. }
            | ConsoleError::TooManyTokens { .. }
            | ConsoleError::CapacityExceeded { .. } => ErrorCategory::Capacity,
            ConsoleError::UnknownSymbol(_) => ErrorCategory::Resolution,
            ConsoleError::UnknownCommand(_) | ConsoleError::UnknownVariable(_) => {
                ErrorCategory::Lookup
            }
            ConsoleError::Arity { .. } => ErrorCategory::Arity,
            ConsoleError::ReadOnly(_) => ErrorCategory::Permission,
            ConsoleError::TypeMismatch { .. } => ErrorCategory::Type,
            ConsoleError::MissingArgument { .. }
            | ConsoleError::Failed
            | ConsoleError::HandlerPanicked { .. } => ErrorCategory::Handler,
            ConsoleError::DuplicateVariable(_) | ConsoleError::DuplicateCommand(_) => {
                ErrorCategory::Registration
            }
        }
    }
}
