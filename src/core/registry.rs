//! Variable and command registries.
//!
//! Both registries keep entries in registration order (for `help` and the
//! save file) with a name index for lookup. Capacity is bounded by a
//! configurable limit; overflow and duplicate names are reported as errors.

use std::collections::HashMap;

use super::{Command, ConsoleError, VarFlags, VarKind, Variable};

/// Default maximum number of variables.
pub const DEFAULT_MAX_VARS: usize = 1024;

/// Default maximum number of commands.
pub const DEFAULT_MAX_COMMANDS: usize = 128;

/// Stable handle to a variable in a [`VariableRegistry`].
///
/// Variables are never removed, so a handle stays valid for the lifetime
/// of the registry that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct VarId(usize);

impl VarId {
    /// Position in registration order.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Owns every persistent variable of a console.
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::{VariableRegistry, VarFlags, VarKind};
///
/// let mut vars = VariableRegistry::new();
/// let id = vars.register("sv_gravity", VarKind::Double, VarFlags::NONE).unwrap();
/// vars.get_mut(id).set_double(800.0).unwrap();
///
/// assert_eq!(vars.find("sv_gravity"), Some(id));
/// assert_eq!(vars.by_name("sv_gravity").unwrap().get_int(), 800);
/// assert!(vars.register("sv_gravity", VarKind::Int, VarFlags::NONE).is_err());
/// ```
#[derive(Debug)]
pub struct VariableRegistry {
    vars: Vec<Variable>,
    index: HashMap<Box<str>, VarId>,
    limit: usize,
}

impl Default for VariableRegistry {
    fn default() -> Self {
        Self::with_capacity_limit(DEFAULT_MAX_VARS)
    }
}

impl VariableRegistry {
    /// Create a new empty registry with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding at most `limit` variables.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            vars: Vec::new(),
            index: HashMap::new(),
            limit,
        }
    }

    /// Register a zero-valued variable of the given kind.
    pub fn register(
        &mut self,
        name: impl Into<Box<str>>,
        kind: VarKind,
        flags: VarFlags,
    ) -> Result<VarId, ConsoleError> {
        self.insert(Variable::with_kind(name, kind).flags(flags))
    }

    /// Register a fully built variable.
    pub fn insert(&mut self, var: Variable) -> Result<VarId, ConsoleError> {
        if self.index.contains_key(var.name()) {
            return Err(ConsoleError::DuplicateVariable(var.name().to_string()));
        }
        if self.vars.len() >= self.limit {
            return Err(ConsoleError::CapacityExceeded {
                registry: "variable",
                limit: self.limit,
            });
        }

        let id = VarId(self.vars.len());
        self.index.insert(var.name().into(), id);
        self.vars.push(var);
        Ok(id)
    }

    /// Look up a variable by exact name.
    #[inline]
    pub fn find(&self, name: &str) -> Option<VarId> {
        self.index.get(name).copied()
    }

    /// Get a variable by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different registry.
    #[inline]
    pub fn get(&self, id: VarId) -> &Variable {
        &self.vars[id.0]
    }

    /// Get a mutable variable by handle.
    ///
    /// # Panics
    ///
    /// Panics if `id` was issued by a different registry.
    #[inline]
    pub fn get_mut(&mut self, id: VarId) -> &mut Variable {
        &mut self.vars[id.0]
    }

    /// Get a variable by name.
    pub fn by_name(&self, name: &str) -> Option<&Variable> {
        self.find(name).map(|id| self.get(id))
    }

    /// Get a mutable variable by name.
    pub fn by_name_mut(&mut self, name: &str) -> Option<&mut Variable> {
        let id = self.find(name)?;
        Some(self.get_mut(id))
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Configured maximum number of variables.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Iterate over all variables in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Variable> {
        self.vars.iter()
    }
}

/// Owns every command of a console.
#[derive(Debug)]
pub struct CommandRegistry {
    commands: Vec<Command>,
    index: HashMap<Box<str>, usize>,
    limit: usize,
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::with_capacity_limit(DEFAULT_MAX_COMMANDS)
    }
}

impl CommandRegistry {
    /// Create a new empty registry with the default limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding at most `limit` commands.
    pub fn with_capacity_limit(limit: usize) -> Self {
        Self {
            commands: Vec::new(),
            index: HashMap::new(),
            limit,
        }
    }

    /// Register a command. Re-registering a name is an error.
    pub fn register(&mut self, cmd: Command) -> Result<(), ConsoleError> {
        if self.index.contains_key(cmd.name()) {
            return Err(ConsoleError::DuplicateCommand(cmd.name().to_string()));
        }
        if self.commands.len() >= self.limit {
            return Err(ConsoleError::CapacityExceeded {
                registry: "command",
                limit: self.limit,
            });
        }

        self.index.insert(cmd.name().into(), self.commands.len());
        self.commands.push(cmd);
        Ok(())
    }

    /// Look up a command by exact name.
    pub fn find(&self, name: &str) -> Option<&Command> {
        self.index.get(name).map(|&i| &self.commands[i])
    }

    #[inline]
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.commands.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Configured maximum number of commands.
    #[inline]
    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Iterate over all commands in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Command> {
        self.commands.iter()
    }

    /// Iterate over command names in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().map(Command::name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Arity, ErrorCategory};

    #[test]
    fn test_registry_var() {
        let mut registry = VariableRegistry::new();
        let id = registry
            .register("sv_gravity", VarKind::Double, VarFlags::NONE)
            .unwrap();

        assert!(registry.contains("sv_gravity"));
        assert_eq!(registry.find("sv_gravity"), Some(id));
        assert_eq!(registry.get(id).kind(), VarKind::Double);
        assert_eq!(registry.get(id).get_double(), 0.0);
        assert_eq!(registry.find("sv_cheats"), None);
    }

    #[test]
    fn test_registry_set_through_handle() {
        let mut registry = VariableRegistry::new();
        let id = registry.insert(Variable::new("count", 1i64)).unwrap();

        registry.get_mut(id).set_int(5).unwrap();
        assert_eq!(registry.by_name("count").unwrap().get_int(), 5);

        registry.by_name_mut("count").unwrap().set_int(6).unwrap();
        assert_eq!(registry.get(id).get_int(), 6);
    }

    #[test]
    fn test_registration_order() {
        let mut registry = VariableRegistry::new();
        for name in ["zeta", "alpha", "mid"] {
            registry.register(name, VarKind::Int, VarFlags::NONE).unwrap();
        }
        let names: Vec<_> = registry.iter().map(Variable::name).collect();
        assert_eq!(names, vec!["zeta", "alpha", "mid"]);
    }

    #[test]
    fn test_duplicate_var_is_error() {
        let mut registry = VariableRegistry::new();
        registry.insert(Variable::new("test_var", 42i64)).unwrap();

        let err = registry.insert(Variable::new("test_var", 100i64)).unwrap_err();
        assert!(matches!(err, ConsoleError::DuplicateVariable(ref name) if name == "test_var"));
        assert_eq!(err.category(), ErrorCategory::Registration);

        // First value untouched
        assert_eq!(registry.by_name("test_var").unwrap().get_int(), 42);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_var_capacity() {
        let mut registry = VariableRegistry::with_capacity_limit(2);
        registry.register("a", VarKind::Int, VarFlags::NONE).unwrap();
        registry.register("b", VarKind::Int, VarFlags::NONE).unwrap();

        let err = registry.register("c", VarKind::Int, VarFlags::NONE).unwrap_err();
        assert!(matches!(err, ConsoleError::CapacityExceeded { limit: 2, .. }));
        assert!(!registry.contains("c"));
    }

    #[test]
    fn test_registry_cmd() {
        let mut registry = CommandRegistry::new();
        registry
            .register(Command::new("test", |_, _| Ok(())).arity(1))
            .unwrap();

        assert!(registry.contains("test"));
        assert_eq!(registry.find("test").unwrap().get_arity(), Arity::Exact(1));
        assert!(registry.find("missing").is_none());
    }

    #[test]
    fn test_duplicate_cmd_is_error() {
        let mut registry = CommandRegistry::new();
        registry.register(Command::new("test_cmd", |_, _| Ok(()))).unwrap();

        let err = registry
            .register(Command::new("test_cmd", |_, _| Ok(())))
            .unwrap_err();
        assert!(matches!(err, ConsoleError::DuplicateCommand(_)));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_cmd_capacity_and_names() {
        let mut registry = CommandRegistry::with_capacity_limit(2);
        registry.register(Command::new("one", |_, _| Ok(()))).unwrap();
        registry.register(Command::new("two", |_, _| Ok(()))).unwrap();

        assert!(matches!(
            registry.register(Command::new("three", |_, _| Ok(()))),
            Err(ConsoleError::CapacityExceeded { registry: "command", .. })
        ));
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["one", "two"]);
    }
}
