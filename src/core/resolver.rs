//! Argument resolution.
//!
//! Turns the tokens after the command name into typed arguments. Literals
//! become read-only ephemeral variables owned by their argument; names of
//! registered variables become handles into the registry, so a handler
//! writing through them changes the live variable.

use super::{ConsoleError, VarId, Variable, VariableRegistry};
use super::variable::{scan_float, scan_int};

/// One resolved argument.
#[derive(Debug, Clone, PartialEq)]
pub enum Argument {
    /// An ephemeral variable wrapping a literal token; dropped with the argument.
    Literal(Variable),
    /// A persistent variable owned by the registry.
    Bound(VarId),
}

impl Argument {
    /// The variable this argument refers to.
    pub fn variable<'a>(&'a self, vars: &'a VariableRegistry) -> &'a Variable {
        match self {
            Argument::Literal(var) => var,
            Argument::Bound(id) => vars.get(*id),
        }
    }

    /// True if this argument refers to a registered variable.
    #[inline]
    pub fn is_bound(&self) -> bool {
        matches!(self, Argument::Bound(_))
    }
}

/// Arguments passed to a command handler, in token order.
///
/// Built fresh for every executed line and dropped as soon as the
/// handler returns.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Arguments {
    items: Vec<Argument>,
}

impl Arguments {
    /// Create an argument list from resolved arguments.
    pub fn new(items: Vec<Argument>) -> Self {
        Self { items }
    }

    /// Get the number of arguments.
    #[inline]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Check if there are no arguments.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get an argument by index.
    #[inline]
    pub fn get(&self, index: usize) -> Option<&Argument> {
        self.items.get(index)
    }

    /// Get a mutable argument by index.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Argument> {
        self.items.get_mut(index)
    }

    /// Iterate over arguments.
    pub fn iter(&self) -> impl Iterator<Item = &Argument> {
        self.items.iter()
    }
}

/// Resolve one argument token.
///
/// Classification order:
/// 1. Leading `"` or `-`: string literal of the rest of the token
/// 2. Exact name of a registered variable
/// 3. Numeric literal: floating point when the integer prefix is followed
///    by `e`, `E`, or `.`, integer otherwise
pub fn resolve_token(vars: &VariableRegistry, token: &str) -> Result<Argument, ConsoleError> {
    if let Some(rest) = token.strip_prefix(['"', '-']) {
        return Ok(Argument::Literal(Variable::literal(token, rest)));
    }

    if let Some(id) = vars.find(token) {
        return Ok(Argument::Bound(id));
    }

    let literal = if is_float_literal(token) {
        scan_float(token).map(|(v, _)| Variable::literal(token, v))
    } else {
        scan_int(token).map(|(v, _)| Variable::literal(token, v))
    };

    literal
        .map(Argument::Literal)
        .ok_or_else(|| ConsoleError::UnknownSymbol(token.to_string()))
}

/// Resolve every token, stopping at the first that fails.
///
/// Arguments built before the failure are dropped with the error.
pub fn resolve_arguments<'a>(
    vars: &VariableRegistry,
    tokens: impl IntoIterator<Item = &'a str>,
) -> Result<Arguments, ConsoleError> {
    tokens
        .into_iter()
        .map(|token| resolve_token(vars, token))
        .collect::<Result<Vec<_>, _>>()
        .map(Arguments::new)
}

fn is_float_literal(token: &str) -> bool {
    let consumed = scan_int(token).map_or(0, |(_, n)| n);
    matches!(token.as_bytes().get(consumed), Some(b'e' | b'E' | b'.'))
}
