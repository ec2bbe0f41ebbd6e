//! Scripted console example.
//!
//! Drives the core console directly, without a Bevy app, and prints
//! everything it writes to stdout.
//!
//! Run with: `cargo run --example script`

use bevy_quake_console::core::{Console, VarFlags, VarKind, WriterSink};
use bevy_quake_console::register_stdlib;

const SCRIPT: &[&str] = &[
    // var identification
    "inspect TRUE",
    // literal identification
    "inspect 1",
    "inspect 1.5",
    // string literals
    "echo \"how are you today\"",
    // string assignment
    "set test_string \"This console is cool!\"",
    "echo test_string",
    "inspect test_string",
    // int assignment
    "set test_int 100",
    "echo test_int",
    "inspect test_int",
    // double assignment
    "set test_double 50.0",
    "echo test_double",
    "inspect test_double",
    // int to double conversion
    "set test_double test_int",
    "echo test_double",
    // double to int conversion
    "set test_int test_double",
    "echo test_int",
];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut console = Console::new(WriterSink::stdout());
    register_stdlib(&mut console)?;

    console.register_var("test_string", VarKind::String, VarFlags::NONE)?;
    console.register_var("test_int", VarKind::Int, VarFlags::NONE)?;
    console.register_var("test_double", VarKind::Double, VarFlags::NONE)?;

    for line in SCRIPT {
        console.execute(line);
    }

    Ok(())
}
