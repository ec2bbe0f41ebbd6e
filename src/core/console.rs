//! The console: registries, log sink, and line dispatcher.
//!
//! [`Console::execute`] runs one line through tokenize, command lookup,
//! argument resolution, arity check, and handler invocation. Every failure
//! is written to the log sink and returned in the [`Execution`]; none of
//! them leave the console unusable for the next line.

use std::any::Any;
use std::fmt;
use std::io::{BufRead, Write};
use std::panic::{self, AssertUnwindSafe};

use bevy::prelude::*;

use super::{
    resolve_arguments, tokenize, Argument, Arguments, Arity, Command, CommandHandler,
    CommandRegistry, CommandResult, ConsoleError, ConsoleOutputLevel, LogSink, VarFlags, VarId,
    VarKind, Variable, VariableRegistry, DEFAULT_MAX_COMMANDS, DEFAULT_MAX_VARS,
};

use crate::persist::{self, PersistError};

/// Default maximum accepted line length in bytes.
pub const DEFAULT_MAX_LINE_LEN: usize = 1024;

/// Default maximum number of tokens per line, command name included.
pub const DEFAULT_MAX_TOKENS: usize = 128;

/// Resource limits of a console.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConsoleLimits {
    pub max_commands: usize,
    pub max_vars: usize,
    pub max_line_len: usize,
    pub max_tokens: usize,
}

impl Default for ConsoleLimits {
    fn default() -> Self {
        Self {
            max_commands: DEFAULT_MAX_COMMANDS,
            max_vars: DEFAULT_MAX_VARS,
            max_line_len: DEFAULT_MAX_LINE_LEN,
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

/// Result of executing one line.
///
/// `processed` tells whether the line reached the dispatch stage (a
/// command was found and its arguments resolved). `outcome` carries the
/// result of that dispatch: arity mismatch and handler failure are
/// processed lines with a failed outcome.
#[derive(Debug)]
pub struct Execution {
    processed: bool,
    outcome: CommandResult,
}

impl Execution {
    /// True if a command was dispatched for this line.
    #[inline]
    pub fn processed(&self) -> bool {
        self.processed
    }

    /// True if the command ran and reported success.
    #[inline]
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }

    #[inline]
    pub fn outcome(&self) -> &CommandResult {
        &self.outcome
    }

    /// The failure, if any.
    #[inline]
    pub fn error(&self) -> Option<&ConsoleError> {
        self.outcome.as_ref().err()
    }

    pub fn into_result(self) -> CommandResult {
        self.outcome
    }
}

/// An embeddable command console.
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::{Command, Console, OutputBuffer, VarFlags, VarKind};
///
/// let output = OutputBuffer::new();
/// let mut console = Console::new(output.clone());
///
/// console.register_var("health", VarKind::Int, VarFlags::NONE).unwrap();
/// console
///     .register_command(
///         Command::new("heal", |console, args| {
///             let amount = console.require_arg(args, 0)?.get_int();
///             let health = console.find_var_mut("health").ok_or(bevy_quake_console::core::ConsoleError::Failed)?;
///             let current = health.get_int();
///             health.set_int(current + amount)
///         })
///         .arity(1),
///     )
///     .unwrap();
///
/// assert!(console.execute("heal 25").succeeded());
/// assert_eq!(console.find_var("health").unwrap().get_int(), 25);
///
/// let run = console.execute("heal");
/// assert!(run.processed());
/// assert!(!run.succeeded());
/// assert_eq!(output.lines(), vec!["heal: expected 1 arguments", "heal failed"]);
/// ```
#[derive(Resource)]
pub struct Console {
    vars: VariableRegistry,
    commands: CommandRegistry,
    log: Box<dyn LogSink>,
    limits: ConsoleLimits,
}

impl Console {
    /// Create a console with default limits and the built-in `help` command.
    pub fn new(sink: impl LogSink + 'static) -> Self {
        Self::with_limits(sink, ConsoleLimits::default())
    }

    /// Create a console with explicit limits.
    pub fn with_limits(sink: impl LogSink + 'static, limits: ConsoleLimits) -> Self {
        let mut console = Self {
            vars: VariableRegistry::with_capacity_limit(limits.max_vars),
            commands: CommandRegistry::with_capacity_limit(limits.max_commands),
            log: Box::new(sink),
            limits,
        };

        let help = Command::new("help", help)
            .arity(0)
            .description("List all commands");
        if let Err(err) = console.register_command(help) {
            warn!("Console: could not register 'help': {}", err);
        }

        console
    }

    /// Get the configured limits.
    #[inline]
    pub fn limits(&self) -> ConsoleLimits {
        self.limits
    }

    /// Register a zero-valued variable.
    pub fn register_var(
        &mut self,
        name: impl Into<Box<str>>,
        kind: VarKind,
        flags: VarFlags,
    ) -> Result<VarId, ConsoleError> {
        self.vars.register(name, kind, flags)
    }

    /// Register a fully built variable.
    pub fn insert_var(&mut self, var: Variable) -> Result<VarId, ConsoleError> {
        self.vars.insert(var)
    }

    /// Register a command.
    pub fn register_command(&mut self, cmd: Command) -> Result<(), ConsoleError> {
        self.commands.register(cmd)
    }

    /// Get a variable by name.
    pub fn find_var(&self, name: &str) -> Option<&Variable> {
        self.vars.by_name(name)
    }

    /// Get a mutable variable by name.
    pub fn find_var_mut(&mut self, name: &str) -> Option<&mut Variable> {
        self.vars.by_name_mut(name)
    }

    /// Get the variable registry.
    #[inline]
    pub fn vars(&self) -> &VariableRegistry {
        &self.vars
    }

    /// Get the variable registry mutably.
    #[inline]
    pub fn vars_mut(&mut self) -> &mut VariableRegistry {
        &mut self.vars
    }

    /// Get the command registry.
    #[inline]
    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    /// The variable behind argument `index`.
    pub fn arg<'a>(&'a self, args: &'a Arguments, index: usize) -> Option<&'a Variable> {
        args.get(index).map(|arg| arg.variable(&self.vars))
    }

    /// The variable behind argument `index`, mutably.
    ///
    /// Bound arguments yield the live registry variable.
    pub fn arg_mut<'a>(
        &'a mut self,
        args: &'a mut Arguments,
        index: usize,
    ) -> Option<&'a mut Variable> {
        match args.get_mut(index)? {
            Argument::Literal(var) => Some(var),
            Argument::Bound(id) => Some(self.vars.get_mut(*id)),
        }
    }

    /// Like [`arg`](Self::arg), failing with [`ConsoleError::MissingArgument`].
    pub fn require_arg<'a>(
        &'a self,
        args: &'a Arguments,
        index: usize,
    ) -> Result<&'a Variable, ConsoleError> {
        self.arg(args, index)
            .ok_or(ConsoleError::MissingArgument { index })
    }

    /// Like [`arg_mut`](Self::arg_mut), failing with [`ConsoleError::MissingArgument`].
    pub fn require_arg_mut<'a>(
        &'a mut self,
        args: &'a mut Arguments,
        index: usize,
    ) -> Result<&'a mut Variable, ConsoleError> {
        self.arg_mut(args, index)
            .ok_or(ConsoleError::MissingArgument { index })
    }

    /// Write a line to the log sink.
    pub fn log(&mut self, level: ConsoleOutputLevel, message: impl AsRef<str>) {
        self.log.write_line(level, message.as_ref());
    }

    /// Write command output.
    pub fn print(&mut self, message: impl AsRef<str>) {
        self.log(ConsoleOutputLevel::Result, message);
    }

    /// Write a warning.
    pub fn warn(&mut self, message: impl AsRef<str>) {
        self.log(ConsoleOutputLevel::Warn, message);
    }

    /// Write an error diagnostic.
    pub fn error(&mut self, message: impl AsRef<str>) {
        self.log(ConsoleOutputLevel::Error, message);
    }

    /// Execute one line.
    ///
    /// The line and its arguments are local to this call, so handlers may
    /// execute further lines on the same console.
    pub fn execute(&mut self, line: &str) -> Execution {
        let execution = self.dispatch(line);
        debug!(
            "Console: {:?} processed={} outcome={:?}",
            line,
            execution.processed,
            execution.outcome
        );
        execution
    }

    fn dispatch(&mut self, line: &str) -> Execution {
        if line.len() > self.limits.max_line_len {
            return self.reject(ConsoleError::LineTooLong {
                len: line.len(),
                limit: self.limits.max_line_len,
            });
        }

        let tokens = tokenize(line);
        if tokens.has_trailing_quote() {
            self.warn("trailing quote");
        }

        let Some(name) = tokens.command() else {
            return self.reject(ConsoleError::NothingToExecute);
        };

        if tokens.len() > self.limits.max_tokens {
            return self.reject(ConsoleError::TooManyTokens {
                count: tokens.len(),
                limit: self.limits.max_tokens,
            });
        }

        let (arity, handler) = match self.commands.find(name) {
            Some(cmd) => (cmd.get_arity(), cmd.handler()),
            None => return self.reject(ConsoleError::UnknownCommand(name.to_string())),
        };

        let mut args = match resolve_arguments(&self.vars, tokens.args()) {
            Ok(args) => args,
            Err(err) => return self.reject(err),
        };

        let outcome = match arity {
            Arity::Exact(expected) if !arity.accepts(args.len()) => Err(ConsoleError::Arity {
                command: name.to_string(),
                expected,
                found: args.len(),
            }),
            _ => self.invoke(name, &handler, &mut args),
        };
        drop(args);

        if let Err(err) = &outcome {
            if !matches!(err, ConsoleError::Failed) {
                self.error(err.to_string());
            }
            self.error(format!("{} failed", name));
        }

        Execution {
            processed: true,
            outcome,
        }
    }

    /// Run a handler, turning a panic into [`ConsoleError::HandlerPanicked`].
    fn invoke(&mut self, name: &str, handler: &CommandHandler, args: &mut Arguments) -> CommandResult {
        let handler = handler.as_ref();
        panic::catch_unwind(AssertUnwindSafe(|| handler(self, args))).unwrap_or_else(|payload| {
            Err(ConsoleError::HandlerPanicked {
                command: name.to_string(),
                message: panic_message(payload.as_ref()),
            })
        })
    }

    fn reject(&mut self, err: ConsoleError) -> Execution {
        self.error(err.to_string());
        Execution {
            processed: false,
            outcome: Err(err),
        }
    }

    /// Write every non-read-only variable in the save-file format.
    pub fn save(&self, out: impl Write) -> Result<(), PersistError> {
        persist::save(&self.vars, out)
    }

    /// Apply a save file; returns the number of variables set.
    pub fn load(&mut self, input: impl BufRead) -> Result<usize, PersistError> {
        persist::load(&mut self.vars, input)
    }
}

impl fmt::Debug for Console {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Console")
            .field("vars", &self.vars.len())
            .field("commands", &self.commands.len())
            .field("limits", &self.limits)
            .finish_non_exhaustive()
    }
}

/// Built-in `help`: count, then every command name on one line.
fn help(console: &mut Console, _args: &mut Arguments) -> CommandResult {
    let names: Vec<&str> = console.commands.names().collect();
    let summary = format!("{} commands available", names.len());
    let listing = names.join(" ");
    console.print(summary);
    console.print(listing);
    Ok(())
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::core::{ErrorCategory, OutputBuffer};

    fn console() -> (Console, OutputBuffer) {
        let output = OutputBuffer::new();
        (Console::new(output.clone()), output)
    }

    /// Registers `tick` with the given arity; returns its call counter.
    fn add_counted(console: &mut Console, arity: Arity) -> Arc<AtomicUsize> {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        console
            .register_command(
                Command::new("tick", move |_console, _args| {
                    counter.fetch_add(1, Ordering::SeqCst);
                    Ok(())
                })
                .arity(arity),
            )
            .unwrap();
        calls
    }

    #[test]
    fn test_empty_line_is_not_processed() {
        let (mut console, output) = console();
        for line in ["", "   ", "\n"] {
            let run = console.execute(line);
            assert!(!run.processed());
            assert!(matches!(run.error(), Some(ConsoleError::NothingToExecute)));
        }
        assert_eq!(output.lines(), vec!["nothing to execute"; 3]);
    }

    #[test]
    fn test_unknown_command() {
        let (mut console, output) = console();
        let run = console.execute("fly 1");
        assert!(!run.processed());
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Lookup);
        assert_eq!(output.lines(), vec!["unknown command: fly"]);
    }

    #[test]
    fn test_arity_checked_before_invoke() {
        let (mut console, output) = console();
        let calls = add_counted(&mut console, Arity::Exact(2));

        for line in ["tick 1", "tick 1 2 3"] {
            let run = console.execute(line);
            assert!(run.processed());
            assert_eq!(run.error().unwrap().category(), ErrorCategory::Arity);
        }
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        assert!(console.execute("tick 1 2").succeeded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let lines = output.lines();
        assert_eq!(lines[0], "tick: expected 2 arguments");
        assert_eq!(lines[1], "tick failed");
    }

    #[test]
    fn test_variadic_accepts_any_count() {
        let (mut console, _output) = console();
        let calls = add_counted(&mut console, Arity::Variadic);
        assert!(console.execute("tick").succeeded());
        assert!(console.execute("tick 1 2 3 4 5").succeeded());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_zero_arity_rejects_arguments() {
        let (mut console, output) = console();
        let calls = add_counted(&mut console, Arity::Exact(0));

        let run = console.execute("tick 5");
        assert!(matches!(
            run.error(),
            Some(ConsoleError::Arity { expected: 0, found: 1, .. })
        ));
        assert_eq!(output.lines(), vec!["tick: expected 0 arguments", "tick failed"]);

        assert!(console.execute("tick").succeeded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unknown_symbol_aborts_and_console_stays_usable() {
        let (mut console, output) = console();
        let calls = add_counted(&mut console, Arity::Variadic);

        let run = console.execute("tick 1 not_a_var_or_number");
        assert!(!run.processed());
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Resolution);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(output.lines(), vec!["unknown symbol: \"not_a_var_or_number\""]);

        assert!(console.execute("tick 1").succeeded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_handler_failure_is_processed() {
        let (mut console, output) = console();
        console
            .register_command(Command::new("fail", |_, _| Err(ConsoleError::Failed)))
            .unwrap();

        let run = console.execute("fail");
        assert!(run.processed());
        assert!(!run.succeeded());
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Handler);
        assert_eq!(output.lines(), vec!["fail failed"]);
    }

    #[test]
    fn test_handler_panic_is_contained() {
        let (mut console, output) = console();
        console
            .register_command(Command::new("boom", |_, _| panic!("kaboom")))
            .unwrap();

        let run = console.execute("boom");
        assert!(run.processed());
        assert!(matches!(
            run.error(),
            Some(ConsoleError::HandlerPanicked { message, .. }) if message == "kaboom"
        ));
        assert_eq!(output.lines(), vec!["boom panicked: kaboom", "boom failed"]);

        // The handler is still registered and the console still works
        assert!(console.commands().contains("boom"));
        assert!(console.execute("help").succeeded());
    }

    #[test]
    fn test_bound_argument_mutates_live_variable() {
        let (mut console, _output) = console();
        console.register_var("score", VarKind::Int, VarFlags::NONE).unwrap();
        console
            .register_command(
                Command::new("bump", |console, args| {
                    let var = console.require_arg_mut(args, 0)?;
                    let next = var.get_int() + 1;
                    var.set_int(next)
                })
                .arity(1),
            )
            .unwrap();

        console.execute("bump score");
        console.execute("bump score");
        assert_eq!(console.find_var("score").unwrap().get_int(), 2);

        // Literals are read-only
        let run = console.execute("bump 5");
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_trailing_quote_still_executes() {
        let (mut console, output) = console();
        let calls = add_counted(&mut console, Arity::Exact(1));

        assert!(console.execute("tick \"open string").succeeded());
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(output.events()[0].level, ConsoleOutputLevel::Warn);
        assert_eq!(output.lines(), vec!["trailing quote"]);
    }

    #[test]
    fn test_reentrant_execute() {
        let (mut console, _output) = console();
        let calls = add_counted(&mut console, Arity::Variadic);
        console
            .register_command(Command::new("twice", |console, _args| {
                console.execute("tick 1").into_result()?;
                console.execute("tick 2").into_result()
            }))
            .unwrap();

        assert!(console.execute("twice").succeeded());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_help_lists_commands() {
        let (mut console, output) = console();
        add_counted(&mut console, Arity::Variadic);

        assert!(console.execute("help").succeeded());
        assert_eq!(output.lines(), vec!["2 commands available", "help tick"]);

        output.clear();
        let run = console.execute("help extra");
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Arity);
    }

    #[test]
    fn test_line_limits() {
        let output = OutputBuffer::new();
        let limits = ConsoleLimits {
            max_line_len: 16,
            max_tokens: 3,
            ..ConsoleLimits::default()
        };
        let mut console = Console::with_limits(output.clone(), limits);
        add_counted(&mut console, Arity::Variadic);

        let run = console.execute("tick 1 2 3 4 5 6 7 8 9");
        assert!(matches!(run.error(), Some(ConsoleError::LineTooLong { limit: 16, .. })));

        let run = console.execute("tick 1 2 3");
        assert!(matches!(run.error(), Some(ConsoleError::TooManyTokens { count: 4, limit: 3 })));
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Capacity);

        assert!(console.execute("tick 1 2").succeeded());
    }

    #[test]
    fn test_registry_limits_surface_as_errors() {
        let limits = ConsoleLimits {
            max_commands: 1,
            max_vars: 1,
            ..ConsoleLimits::default()
        };
        let mut console = Console::with_limits(OutputBuffer::new(), limits);

        // `help` already occupies the only command slot
        let err = console
            .register_command(Command::new("extra", |_, _| Ok(())))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::CapacityExceeded { registry: "command", .. }));

        console.register_var("a", VarKind::Int, VarFlags::NONE).unwrap();
        assert!(console.register_var("b", VarKind::Int, VarFlags::NONE).is_err());
    }
}
