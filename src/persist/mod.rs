//! Persistence layer for console variables.
//!
//! Save file grammar, one variable per line:
//!
//! ```text
//! <name> : <value>
//! ```
//!
//! Only variables without [`VarFlags::READ_ONLY`](crate::core::VarFlags::READ_ONLY)
//! are written, in registration order. Values use [`Variable::render`]:
//! strings as-is apart from the escapes below, integers and booleans in
//! decimal, doubles with six fractional digits.
//!
//! String values escape backslash, line feed, and carriage return as `\\`,
//! `\n`, and `\r` so every variable stays on one line. Any other
//! backslash sequence loads unchanged.
//!
//! Loading applies lines in order. An unknown name stops the load; lines
//! already applied stay applied.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;

use bevy::prelude::*;
use thiserror::Error;

use crate::config::ConsoleSettings;
use crate::core::{Console, ConsoleError, VarKind, Variable, VariableRegistry};

/// Separator between name and value.
pub const SEPARATOR: &str = " : ";

/// Errors that can occur while saving or loading variables.
#[derive(Debug, Error)]
pub enum PersistError {
    /// Underlying read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Line does not match `<name> : <value>`.
    #[error("line {line}: expected '<name> : <value>'")]
    Malformed { line: usize },

    /// Line names a variable that is not registered.
    #[error("line {line}: unknown variable: {name}")]
    UnknownVariable { line: usize, name: String },

    /// Value text cannot be parsed as the variable's kind.
    #[error("line {line}: invalid {kind} value for {name}: {value:?}")]
    InvalidValue {
        line: usize,
        name: String,
        kind: VarKind,
        value: String,
    },

    /// The variable refused the value (read-only).
    #[error("line {line}: {source}")]
    Rejected { line: usize, source: ConsoleError },
}

/// Write every writable variable of `vars` to `out`.
pub fn save(vars: &VariableRegistry, mut out: impl Write) -> Result<(), PersistError> {
    for var in vars.iter().filter(|var| !var.is_read_only()) {
        let value = match var.kind() {
            VarKind::String => escape(&var.render()),
            _ => var.render(),
        };
        writeln!(out, "{}{}{}", var.name(), SEPARATOR, value)?;
    }
    out.flush()?;
    Ok(())
}

/// Apply a save file to `vars`; returns the number of variables set.
///
/// Blank lines are skipped. Variables not named in the input keep their
/// current value.
pub fn load(vars: &mut VariableRegistry, input: impl BufRead) -> Result<usize, PersistError> {
    let mut applied = 0;

    for (index, text) in input.lines().enumerate() {
        let text = text?;
        let line = index + 1;
        let text = text.strip_suffix('\r').unwrap_or(&text);
        if text.trim().is_empty() {
            continue;
        }

        let (name, value) = text
            .split_once(SEPARATOR)
            .ok_or(PersistError::Malformed { line })?;

        let var = vars
            .by_name_mut(name)
            .ok_or_else(|| PersistError::UnknownVariable {
                line,
                name: name.to_string(),
            })?;

        apply(var, value, line)?;
        debug!("Loaded variable: {} = \"{}\"", name, value);
        applied += 1;
    }

    Ok(applied)
}

fn apply(var: &mut Variable, value: &str, line: usize) -> Result<(), PersistError> {
    let invalid = |var: &Variable| PersistError::InvalidValue {
        line,
        name: var.name().to_string(),
        kind: var.kind(),
        value: value.to_string(),
    };

    let result = match var.kind() {
        VarKind::String => var.set_string(&unescape(value)),
        VarKind::Int | VarKind::Bool => {
            let parsed = value.trim().parse::<i64>().map_err(|_| invalid(var))?;
            var.set_int(parsed)
        }
        VarKind::Double => {
            let parsed = value.trim().parse::<f64>().map_err(|_| invalid(var))?;
            var.set_double(parsed)
        }
    };

    result.map_err(|source| PersistError::Rejected { line, source })
}

fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => escaped.push_str("\\\\"),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }
    escaped
}

fn unescape(value: &str) -> String {
    let mut unescaped = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            unescaped.push(c);
            continue;
        }
        match chars.next() {
            Some('\\') => unescaped.push('\\'),
            Some('n') => unescaped.push('\n'),
            Some('r') => unescaped.push('\r'),
            // Unknown sequence, kept as written
            Some(other) => {
                unescaped.push('\\');
                unescaped.push(other);
            }
            None => unescaped.push('\\'),
        }
    }
    unescaped
}

/// Save to a file, creating parent directories if needed.
pub fn save_to_path(vars: &VariableRegistry, path: impl AsRef<Path>) -> Result<(), PersistError> {
    let path = path.as_ref();

    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
        }
    }

    save(vars, BufWriter::new(File::create(path)?))
}

/// Load from a file.
pub fn load_from_path(
    vars: &mut VariableRegistry,
    path: impl AsRef<Path>,
) -> Result<usize, PersistError> {
    load(vars, BufReader::new(File::open(path)?))
}

/// System to apply the save file once user registration has run.
pub fn load_saved_variables(mut console: ResMut<Console>, settings: Res<ConsoleSettings>) {
    let Some(path) = settings.save_file.as_deref() else {
        return;
    };

    if !path.exists() {
        info!("No save file found at '{}', using defaults", path.display());
        return;
    }

    match load_from_path(console.vars_mut(), path) {
        Ok(count) => info!("Loaded {} variables from '{}'", count, path.display()),
        Err(e) => error!("Failed to load save file '{}': {}", path.display(), e),
    }
}

/// System to write the save file when the app is exiting.
pub fn save_variables_on_exit(
    mut exits: MessageReader<AppExit>,
    console: Res<Console>,
    settings: Res<ConsoleSettings>,
) {
    if exits.read().count() == 0 {
        return;
    }
    let Some(path) = settings.save_file.as_deref() else {
        return;
    };

    match save_to_path(console.vars(), path) {
        Ok(()) => info!("Saved variables to '{}'", path.display()),
        Err(e) => error!("Failed to write save file '{}': {}", path.display(), e),
    }
}
