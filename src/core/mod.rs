//! Core console types with zero optional dependencies.
//!
//! This module provides the fundamental building blocks:
//! - [`Console`] - Registries, log sink, and the line dispatcher
//! - [`Variable`] - Named cells holding one of four scalar kinds
//! - [`Command`] - Named handlers with a declared arity
//! - [`VariableRegistry`] / [`CommandRegistry`] - Bounded, ordered name tables
//! - [`tokenize`] - Quote-aware line tokenizer
//! - [`resolve_arguments`] - Token to typed argument resolution
//! - [`LogSink`] - Output destinations
//! - Events for communication between layers

mod error;
mod variable;
mod command;
mod registry;
mod tokenizer;
mod resolver;
mod events;
mod sink;
mod console;

pub use error::{ConsoleError, ErrorCategory};
pub use variable::{Value, VarFlags, VarKind, Variable};
pub use command::{Arity, Command, CommandHandler, CommandResult};
pub use registry::{
    CommandRegistry, VarId, VariableRegistry, DEFAULT_MAX_COMMANDS, DEFAULT_MAX_VARS,
};
pub use tokenizer::{tokenize, TokenizedLine};
pub use resolver::{resolve_arguments, resolve_token, Argument, Arguments};
pub use events::{ConsoleEventsPlugin, ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel};
pub use sink::{LogSink, OutputBuffer, WriterSink};
pub use console::{
    Console, ConsoleLimits, Execution, DEFAULT_MAX_LINE_LEN, DEFAULT_MAX_TOKENS,
};
