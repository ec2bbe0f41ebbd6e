//! Console variable implementation.
//!
//! A variable is a named cell holding one of four scalar kinds. Its kind is
//! fixed at creation; all reads and writes go through a single coercion
//! matrix so `set`, `echo`, and the save file agree on conversions.

use std::fmt::{self, Display};

use super::ConsoleError;

/// Flags controlling variable behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VarFlags(u32);

impl VarFlags {
    /// No flags set.
    pub const NONE: Self = Self(0);

    /// Every setter fails; the variable is also skipped when saving.
    pub const READ_ONLY: Self = Self(1 << 0);

    /// Check if a flag is set.
    #[inline]
    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    /// Combine two flag sets.
    #[inline]
    pub const fn union(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }

    /// Check if no flags are set.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl std::ops::BitOr for VarFlags {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self::Output {
        self.union(rhs)
    }
}

impl std::ops::BitOrAssign for VarFlags {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        *self = self.union(rhs);
    }
}

/// The four scalar kinds a variable can hold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    Double,
    String,
    Int,
    Bool,
}

impl VarKind {
    /// Name shown to the user by `inspect`.
    pub fn name(&self) -> &'static str {
        match self {
            VarKind::Double => "double",
            VarKind::String => "string",
            VarKind::Int => "int",
            VarKind::Bool => "bool",
        }
    }
}

impl Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A variable's payload.
///
/// `Bool` keeps its integer form; any nonzero value is true. Int and Bool
/// accept the same writes and differ only in how they are shown.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Double(f64),
    Int(i64),
    Bool(i64),
    String(String),
}

impl Value {
    /// The zero value for a kind.
    pub fn default_for(kind: VarKind) -> Self {
        match kind {
            VarKind::Double => Value::Double(0.0),
            VarKind::String => Value::String(String::new()),
            VarKind::Int => Value::Int(0),
            VarKind::Bool => Value::Bool(0),
        }
    }

    /// The kind tag of this payload.
    pub fn kind(&self) -> VarKind {
        match self {
            Value::Double(_) => VarKind::Double,
            Value::String(_) => VarKind::String,
            Value::Int(_) => VarKind::Int,
            Value::Bool(_) => VarKind::Bool,
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Double(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Bool(value as i64)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::String(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::String(value)
    }
}

/// A named, typed console variable.
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::{Variable, VarFlags, VarKind};
///
/// let mut speed = Variable::new("cl_speed", 3.7);
/// assert_eq!(speed.kind(), VarKind::Double);
/// assert_eq!(speed.get_int(), 3);
///
/// speed.set_int(100).unwrap();
/// assert_eq!(speed.get_double(), 100.0);
///
/// let mut version = Variable::new("version", 2i64).flags(VarFlags::READ_ONLY);
/// assert!(version.set_int(3).is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    name: Box<str>,
    value: Value,
    flags: VarFlags,
    ephemeral: bool,
}

impl Variable {
    /// Create a variable with an initial value.
    pub fn new(name: impl Into<Box<str>>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            flags: VarFlags::NONE,
            ephemeral: false,
        }
    }

    /// Create a zero-valued variable of the given kind.
    pub fn with_kind(name: impl Into<Box<str>>, kind: VarKind) -> Self {
        Self::new(name, Value::default_for(kind))
    }

    /// Create a read-only ephemeral variable wrapping a literal token.
    pub fn literal(token: &str, value: impl Into<Value>) -> Self {
        Self {
            name: token.into(),
            value: value.into(),
            flags: VarFlags::READ_ONLY,
            ephemeral: true,
        }
    }

    /// Set the flags.
    pub fn flags(mut self, flags: VarFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Get the name.
    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the kind. Never changes after creation.
    #[inline]
    pub fn kind(&self) -> VarKind {
        self.value.kind()
    }

    /// Get the raw payload.
    #[inline]
    pub fn value(&self) -> &Value {
        &self.value
    }

    /// Get the flags.
    #[inline]
    pub fn get_flags(&self) -> VarFlags {
        self.flags
    }

    #[inline]
    pub fn is_read_only(&self) -> bool {
        self.flags.contains(VarFlags::READ_ONLY)
    }

    /// True for variables created from literal tokens.
    #[inline]
    pub fn is_ephemeral(&self) -> bool {
        self.ephemeral
    }

    /// Read as an integer.
    ///
    /// Doubles are truncated toward zero; strings yield their leading
    /// integer, or 0 if they do not start with one.
    pub fn get_int(&self) -> i64 {
        match &self.value {
            Value::Int(v) | Value::Bool(v) => *v,
            Value::Double(v) => *v as i64,
            Value::String(s) => scan_int(s).map_or(0, |(v, _)| v),
        }
    }

    /// Read as a double. Strings yield their leading number, or 0.0.
    pub fn get_double(&self) -> f64 {
        match &self.value {
            Value::Int(v) | Value::Bool(v) => *v as f64,
            Value::Double(v) => *v,
            Value::String(s) => scan_float(s).map_or(0.0, |(v, _)| v),
        }
    }

    /// Read as a boolean (nonzero integer view).
    pub fn get_bool(&self) -> bool {
        self.get_int() != 0
    }

    /// Read the text of a String variable.
    pub fn get_string(&self) -> Result<&str, ConsoleError> {
        match &self.value {
            Value::String(s) => Ok(s),
            _ => Err(self.mismatch(VarKind::String)),
        }
    }

    /// Write an integer. Doubles store the converted value.
    pub fn set_int(&mut self, value: i64) -> Result<(), ConsoleError> {
        self.check_writable()?;
        if self.kind() == VarKind::String {
            return Err(self.mismatch(VarKind::Int));
        }
        match &mut self.value {
            Value::Int(v) | Value::Bool(v) => *v = value,
            Value::Double(v) => *v = value as f64,
            Value::String(_) => {}
        }
        Ok(())
    }

    /// Write a double. Int and Bool store the truncated value.
    pub fn set_double(&mut self, value: f64) -> Result<(), ConsoleError> {
        self.check_writable()?;
        if self.kind() == VarKind::String {
            return Err(self.mismatch(VarKind::Double));
        }
        match &mut self.value {
            Value::Double(v) => *v = value,
            Value::Int(v) | Value::Bool(v) => *v = value as i64,
            Value::String(_) => {}
        }
        Ok(())
    }

    /// Write a boolean as 1 or 0.
    pub fn set_bool(&mut self, value: bool) -> Result<(), ConsoleError> {
        self.set_int(value as i64)
    }

    /// Write the text of a String variable.
    pub fn set_string(&mut self, value: &str) -> Result<(), ConsoleError> {
        self.check_writable()?;
        if self.kind() != VarKind::String {
            return Err(self.mismatch(VarKind::String));
        }
        if let Value::String(s) = &mut self.value {
            s.clear();
            s.push_str(value);
        }
        Ok(())
    }

    /// Copy `source`'s value into `self`, coerced to `self`'s kind.
    pub fn assign_from(&mut self, source: &Variable) -> Result<(), ConsoleError> {
        match self.kind() {
            VarKind::String => self.set_string(source.get_string()?),
            VarKind::Double => self.set_double(source.get_double()),
            VarKind::Int | VarKind::Bool => self.set_int(source.get_int()),
        }
    }

    /// Fixed-format text of the value, as written to the save file.
    pub fn render(&self) -> String {
        match &self.value {
            Value::Double(v) => format!("{:.6}", v),
            Value::Int(v) | Value::Bool(v) => v.to_string(),
            Value::String(s) => s.clone(),
        }
    }

    fn check_writable(&self) -> Result<(), ConsoleError> {
        if self.is_read_only() {
            Err(ConsoleError::ReadOnly(self.name.to_string()))
        } else {
            Ok(())
        }
    }

    fn mismatch(&self, requested: VarKind) -> ConsoleError {
        ConsoleError::TypeMismatch {
            name: self.name.to_string(),
            kind: self.kind(),
            requested,
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" = \"{}\" ({})", self.name, self.render(), self.kind())
    }
}

/// Parse a base-10 integer prefix, returning the value and bytes consumed.
///
/// Accepts an optional sign. Out-of-range values saturate.
pub(crate) fn scan_int(text: &str) -> Option<(i64, usize)> {
    let bytes = text.as_bytes();
    let mut pos = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let digits_start = pos;
    while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
        pos += 1;
    }
    if pos == digits_start {
        return None;
    }

    let value = text[..pos].parse::<i64>().unwrap_or(if bytes[0] == b'-' {
        i64::MIN
    } else {
        i64::MAX
    });
    Some((value, pos))
}

/// Parse a floating-point prefix (`[sign] digits [. digits] [e [sign] digits]`).
pub(crate) fn scan_float(text: &str) -> Option<(f64, usize)> {
    let bytes = text.as_bytes();
    let digits_from = |mut pos: usize| {
        while bytes.get(pos).is_some_and(u8::is_ascii_digit) {
            pos += 1;
        }
        pos
    };

    let start = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    let mut pos = digits_from(start);
    let mut mantissa_digits = pos - start;

    if bytes.get(pos) == Some(&b'.') {
        let frac_end = digits_from(pos + 1);
        mantissa_digits += frac_end - (pos + 1);
        pos = frac_end;
    }
    if mantissa_digits == 0 {
        return None;
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp = pos + 1;
        if matches!(bytes.get(exp), Some(b'+' | b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            pos = exp_end;
        }
    }

    text[..pos].parse::<f64>().ok().map(|v| (v, pos))
}
