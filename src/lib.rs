//! An embeddable quake-style command console for Bevy.
//!
//! bevy_quake_console provides:
//!
//! - **Variables**: named, typed cells (`double`, `string`, `int`, `bool`)
//!   with one coercion matrix shared by commands and the save file
//! - **Commands**: named handlers with a declared arity
//! - **Dispatcher**: quote-aware tokenizer, literal/variable resolution,
//!   arity checking, and panic-safe handler invocation
//! - **Save file**: `<name> : <value>` persistence of writable variables
//!
//! The [`core`] module has no Bevy systems and can be driven directly;
//! [`ConsolePlugin`] wires it into an app through messages.
//!
//! # Features
//!
//! - `settings` (default): RON settings file for [`ConsoleSettings`]
//! - `terminal`: stdin/stdout backend for headless apps
//! - `log_capture`: mirror application log events into the console output
//! - `full`: Enable everything
//!
//! # Quick Start
//!
//! ```ignore
//! use bevy::prelude::*;
//! use bevy_quake_console::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(ConsolePlugin::default())
//!         .add_systems(Startup, setup_console)
//!         .run();
//! }
//!
//! fn setup_console(mut console: ResMut<Console>) {
//!     console.register_var("sv_gravity", VarKind::Double, VarFlags::NONE).unwrap();
//!
//!     console
//!         .register_command(
//!             Command::new("noclip", |console, _args| {
//!                 console.print("noclip toggled");
//!                 Ok(())
//!             })
//!             .arity(0),
//!         )
//!         .unwrap();
//!
//!     console.execute("set sv_gravity 800");
//! }
//! ```

use bevy::prelude::*;

// Core module (always available, zero optional deps)
pub mod core;

pub mod config;
pub mod persist;
pub mod stdlib;

// Log capture (feature-gated)
#[cfg(feature = "log_capture")]
pub mod logging;

// Terminal backend (feature-gated)
#[cfg(feature = "terminal")]
pub mod terminal;

// Re-export core types at crate root for convenience
pub use self::core::{
    Argument, Arguments, Arity, Command, CommandHandler, CommandResult, Console, ConsoleError,
    ConsoleEventsPlugin, ConsoleInputEvent, ConsoleLimits, ConsoleOutputEvent,
    ConsoleOutputLevel, ErrorCategory, Execution, LogSink, OutputBuffer, Value, VarFlags,
    VarId, VarKind, Variable, WriterSink,
};

pub use config::ConsoleSettings;
#[cfg(feature = "settings")]
pub use config::SettingsError;
pub use persist::PersistError;
pub use stdlib::register_stdlib;

#[cfg(feature = "log_capture")]
pub use logging::custom_log_layer;

#[cfg(feature = "terminal")]
pub use terminal::{TerminalConfig, TerminalPlugin};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::core::{
        Arguments, Arity, Command, Console, ConsoleError, ConsoleInputEvent, ConsoleOutputEvent,
        ConsoleOutputLevel, VarFlags, VarKind, Variable,
    };
    pub use crate::config::ConsoleSettings;
    pub use crate::{ConsoleOutput, ConsolePlugin};
}

/// Main console plugin.
///
/// Inserts the [`Console`], [`ConsoleOutput`], and [`ConsoleSettings`]
/// resources. Each frame, queued [`ConsoleInputEvent`]s are executed and
/// everything the console wrote is forwarded as [`ConsoleOutputEvent`]s.
///
/// The save file named by [`ConsoleSettings::save_file`] is applied in
/// `PostStartup`, after `Startup` systems have registered their variables,
/// and written when an [`AppExit`] message is seen.
///
/// # Configuration
///
/// ```ignore
/// ConsolePlugin::new(ConsoleSettings::default().with_save_file("console_save.txt"))
/// ```
#[derive(Default)]
pub struct ConsolePlugin {
    pub settings: ConsoleSettings,
}

impl ConsolePlugin {
    pub fn new(settings: ConsoleSettings) -> Self {
        Self { settings }
    }
}

impl Plugin for ConsolePlugin {
    fn build(&self, app: &mut App) {
        let output = OutputBuffer::new();
        let mut console = Console::with_limits(output.clone(), self.settings.limits());

        if self.settings.standard_library {
            if let Err(e) = register_stdlib(&mut console) {
                error!("Failed to register standard library: {}", e);
            }
        }

        app.insert_resource(console)
            .insert_resource(ConsoleOutput(output))
            .insert_resource(self.settings.clone())
            .add_plugins(ConsoleEventsPlugin);

        // 1. execute_console_input: Run queued lines against the console
        // 2. send_console_output: Forward buffered output as messages
        app.add_systems(
            Update,
            (execute_console_input, send_console_output).chain(),
        );

        app.add_systems(PostStartup, persist::load_saved_variables)
            .add_systems(Last, persist::save_variables_on_exit);
    }
}

/// Resource holding the buffer the plugin's [`Console`] writes to.
#[derive(Resource, Debug, Clone, Default)]
pub struct ConsoleOutput(pub OutputBuffer);

/// System that executes submitted lines.
fn execute_console_input(
    mut input_events: MessageReader<ConsoleInputEvent>,
    mut console: ResMut<Console>,
    settings: Res<ConsoleSettings>,
) {
    for event in input_events.read() {
        if settings.echo_input {
            console.log(ConsoleOutputLevel::Command, format!("$ {}", event.command));
        }
        console.execute(&event.command);
    }
}

/// System that sends buffered output events.
fn send_console_output(
    output: Res<ConsoleOutput>,
    mut output_events: MessageWriter<ConsoleOutputEvent>,
) {
    for event in output.0.drain() {
        output_events.write(event);
    }
}
