//! Console command implementation.
//!
//! Commands are named handlers invoked by the first token of a line.

use std::fmt;
use std::sync::Arc;

use super::{Arguments, Console, ConsoleError};

/// Result returned by a command handler.
pub type CommandResult = Result<(), ConsoleError>;

/// Type alias for command handler functions.
///
/// Handlers receive:
/// - `console`: the console executing the line, for output and variable access
/// - `args`: the resolved arguments, in token order
///
/// Handlers are reference counted so a running handler may execute further
/// lines on the same console.
pub type CommandHandler = Arc<dyn Fn(&mut Console, &mut Arguments) -> CommandResult + Send + Sync>;

/// Number of arguments a command accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Arity {
    /// Exactly this many resolved arguments.
    Exact(usize),
    /// Any number of arguments.
    #[default]
    Variadic,
}

impl Arity {
    /// Check whether `count` arguments satisfy this arity.
    #[inline]
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => n == count,
            Arity::Variadic => true,
        }
    }
}

impl From<usize> for Arity {
    fn from(count: usize) -> Self {
        Arity::Exact(count)
    }
}

/// A console command with a handler function.
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::{Command, Arity};
///
/// let greet = Command::new("greet", |console, args| {
///     let who = match console.arg(args, 0) {
///         Some(var) => var.render(),
///         None => "world".to_string(),
///     };
///     console.print(format!("hello, {who}"));
///     Ok(())
/// })
/// .arity(Arity::Variadic)
/// .description("Say hello");
///
/// assert_eq!(greet.name(), "greet");
/// ```
#[derive(Clone)]
pub struct Command {
    name: Box<str>,
    description: &'static str,
    arity: Arity,
    handler: CommandHandler,
}

impl Command {
    /// Create a new variadic command with the given name and handler.
    pub fn new<F>(name: impl Into<Box<str>>, handler: F) -> Self
    where
        F: Fn(&mut Console, &mut Arguments) -> CommandResult + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            description: "",
            arity: Arity::Variadic,
            handler: Arc::new(handler),
        }
    }

    /// Set the accepted argument count.
    pub fn arity(mut self, arity: impl Into<Arity>) -> Self {
        self.arity = arity.into();
        self
    }

    /// Set the description.
    pub fn description(mut self, desc: &'static str) -> Self {
        self.description = desc;
        self
    }

    /// Get the command name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the description.
    #[inline]
    pub fn get_description(&self) -> &'static str {
        self.description
    }

    /// Get the declared arity.
    #[inline]
    pub fn get_arity(&self) -> Arity {
        self.arity
    }

    /// Get a shared handle to the handler.
    #[inline]
    pub fn handler(&self) -> CommandHandler {
        Arc::clone(&self.handler)
    }
}

impl fmt::Debug for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Command")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}
