//! Standard command set.
//!
//! Registers the read-only `TRUE`/`FALSE` constants and the `inspect`,
//! `echo`, and `set` commands.

use crate::core::{Command, Console, ConsoleError, VarFlags, VarKind, Variable};

/// Register the standard variables and commands on `console`.
///
/// # Examples
///
/// ```
/// use bevy_quake_console::core::{Console, OutputBuffer, VarFlags, VarKind};
/// use bevy_quake_console::stdlib::register_stdlib;
///
/// let output = OutputBuffer::new();
/// let mut console = Console::new(output.clone());
/// register_stdlib(&mut console).unwrap();
/// console.register_var("fov", VarKind::Double, VarFlags::NONE).unwrap();
///
/// console.execute("set fov 90");
/// console.execute("echo fov");
/// assert_eq!(output.lines(), vec!["90.000000"]);
/// ```
pub fn register_stdlib(console: &mut Console) -> Result<(), ConsoleError> {
    console.insert_var(Variable::new("TRUE", true).flags(VarFlags::READ_ONLY))?;
    console.insert_var(Variable::new("FALSE", false).flags(VarFlags::READ_ONLY))?;

    // inspect - Print the kind of a variable or literal
    console.register_command(
        Command::new("inspect", |console, args| {
            let kind = console.require_arg(args, 0)?.kind();
            console.print(format!("var type: {}", kind));
            Ok(())
        })
        .arity(1)
        .description("Print the type of a value"),
    )?;

    // echo - Print a value
    console.register_command(
        Command::new("echo", |console, args| {
            let var = console.require_arg(args, 0)?;
            let text = match var.kind() {
                VarKind::Bool if var.get_bool() => "TRUE".to_string(),
                VarKind::Bool => "FALSE".to_string(),
                _ => var.render(),
            };
            console.print(text);
            Ok(())
        })
        .arity(1)
        .description("Print a value"),
    )?;

    // set - Copy a value into a variable, converted to its type
    console.register_command(
        Command::new("set", |console, args| {
            let source = console.require_arg(args, 1)?.clone();
            console.require_arg_mut(args, 0)?.assign_from(&source)
        })
        .arity(2)
        .description("Assign a value to a variable"),
    )?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{ErrorCategory, OutputBuffer};

    fn console() -> (Console, OutputBuffer) {
        let output = OutputBuffer::new();
        let mut console = Console::new(output.clone());
        register_stdlib(&mut console).unwrap();
        for (name, kind) in [
            ("test_string", VarKind::String),
            ("test_int", VarKind::Int),
            ("test_double", VarKind::Double),
        ] {
            console.register_var(name, kind, VarFlags::NONE).unwrap();
        }
        (console, output)
    }

    #[test]
    fn test_script_replay() {
        let (mut console, output) = console();
        let script = [
            "inspect TRUE",
            "inspect 1",
            "inspect 1.5",
            "echo \"how are you today\"",
            "set test_string \"This console is cool!\"",
            "echo test_string",
            "inspect test_string",
            "set test_int 100",
            "echo test_int",
            "inspect test_int",
            "set test_double 50.0",
            "echo test_double",
            "inspect test_double",
            "set test_double test_int",
            "echo test_double",
            "set test_int test_double",
            "echo test_int",
        ];
        for line in script {
            assert!(console.execute(line).succeeded(), "{line:?} failed");
        }

        assert_eq!(
            output.lines(),
            vec![
                "var type: bool",
                "var type: int",
                "var type: double",
                "how are you today",
                "This console is cool!",
                "var type: string",
                "100",
                "var type: int",
                "50.000000",
                "var type: double",
                "100.000000",
                "100",
            ]
        );
    }

    #[test]
    fn test_constants() {
        let (mut console, output) = console();
        console.execute("echo TRUE");
        console.execute("echo FALSE");
        assert_eq!(output.lines(), vec!["TRUE", "FALSE"]);

        let run = console.execute("set TRUE 0");
        assert!(run.processed());
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Permission);
        assert!(console.find_var("TRUE").unwrap().get_bool());
    }

    #[test]
    fn test_set_bool_from_literal() {
        let (mut console, output) = console();
        console.register_var("god", VarKind::Bool, VarFlags::NONE).unwrap();

        console.execute("set god 1");
        console.execute("echo god");
        console.execute("set god FALSE");
        console.execute("echo god");
        assert_eq!(output.lines(), vec!["TRUE", "FALSE"]);
    }

    #[test]
    fn test_set_double_truncates_into_int() {
        let (mut console, _output) = console();
        console.execute("set test_double 3.7");
        console.execute("set test_int test_double");
        assert_eq!(console.find_var("test_int").unwrap().get_int(), 3);
    }

    #[test]
    fn test_echo_quoted_string_keeps_inner_spaces() {
        let (mut console, output) = console();
        console.execute("echo \"a b c\"");
        assert_eq!(output.lines(), vec!["a b c"]);
    }

    #[test]
    fn test_echo_unknown_symbol_then_recover() {
        let (mut console, output) = console();

        let run = console.execute("echo not_a_var_or_number");
        assert!(!run.processed());
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Resolution);

        assert!(console.execute("echo 7").succeeded());
        assert_eq!(
            output.lines(),
            vec!["unknown symbol: \"not_a_var_or_number\"", "7"]
        );
    }

    #[test]
    fn test_set_type_mismatch() {
        let (mut console, output) = console();

        let run = console.execute("set test_string 5");
        assert!(run.processed());
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Type);
        assert_eq!(output.lines().last().unwrap(), "set failed");
        assert_eq!(console.find_var("test_string").unwrap().get_string().unwrap(), "");
    }

    #[test]
    fn test_set_number_from_string_prefix() {
        let (mut console, _output) = console();
        console.execute("set test_int \"42 apples");
        assert_eq!(console.find_var("test_int").unwrap().get_int(), 42);
    }

    #[test]
    fn test_set_literal_destination_fails() {
        let (mut console, _output) = console();
        let run = console.execute("set 1 2");
        assert_eq!(run.error().unwrap().category(), ErrorCategory::Permission);
    }

    #[test]
    fn test_arity_of_stdlib() {
        let (mut console, output) = console();
        let run = console.execute("set test_int");
        assert!(run.processed());
        assert!(!run.succeeded());
        assert_eq!(output.lines(), vec!["set: expected 2 arguments", "set failed"]);

        output.clear();
        console.execute("echo");
        assert_eq!(output.lines(), vec!["echo: expected 1 arguments", "echo failed"]);
    }

    #[test]
    fn test_help_after_stdlib() {
        let (mut console, output) = console();
        console.execute("help");
        assert_eq!(
            output.lines(),
            vec!["4 commands available", "help inspect echo set"]
        );
    }

    #[test]
    fn test_register_twice_fails() {
        let (mut console, _output) = console();
        assert!(matches!(
            register_stdlib(&mut console),
            Err(ConsoleError::DuplicateVariable(_))
        ));
    }
}
