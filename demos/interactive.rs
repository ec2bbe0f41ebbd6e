//! Interactive terminal console example.
//!
//! Reads lines from stdin, executes them, and keeps writable variables in
//! `console_save.txt` between runs.
//!
//! Run with: `cargo run --example interactive --features terminal`
//!
//! Try:
//! - `help` - List available commands
//! - `set sv_gravity 1000` then `echo sv_gravity`
//! - `say "hello there"` - Broadcast a message
//! - `quit` - Save and exit

use std::io::Write;
use std::time::Duration;

use bevy::app::ScheduleRunnerPlugin;
use bevy::prelude::*;
use bevy_quake_console::prelude::*;
use bevy_quake_console::TerminalPlugin;

fn main() {
    println!("ready");
    println!("type quit to exit");
    let _ = std::io::stdout().flush();

    let settings = ConsoleSettings {
        echo_input: false,
        ..ConsoleSettings::default()
    }
    .with_save_file("console_save.txt");

    App::new()
        .add_plugins(MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(
            Duration::from_secs_f64(1.0 / 30.0),
        )))
        .add_plugins(ConsolePlugin::new(settings))
        .add_plugins(TerminalPlugin::default())
        .add_systems(Startup, setup)
        .run();

    println!("done");
}

fn setup(mut console: ResMut<Console>) {
    let vars = [
        Variable::new("sv_gravity", 800.0),
        Variable::new("sv_maxplayers", 32i64),
        Variable::new("sv_hostname", "My Server"),
        Variable::new("sv_cheats", false),
        Variable::new("version", 1i64).flags(VarFlags::READ_ONLY),
    ];
    for var in vars {
        if let Err(e) = console.insert_var(var) {
            error!("{}", e);
        }
    }

    let say = Command::new("say", |console, args| {
        let message = console.require_arg(args, 0)?.render();
        console.print(format!("[SERVER] {}", message));
        Ok(())
    })
    .arity(1)
    .description("Broadcast a message");

    if let Err(e) = console.register_command(say) {
        error!("{}", e);
    }
}
