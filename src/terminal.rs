//! Terminal backend for headless console sessions.
//!
//! Reads lines from stdin on a background thread and submits them as
//! [`ConsoleInputEvent`]s; prints every [`ConsoleOutputEvent`] to stdout.
//! A line containing only the quit word ends the app with [`AppExit`],
//! which also triggers the save file write.

use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use bevy::prelude::*;

use crate::core::{ConsoleInputEvent, ConsoleOutputEvent, ConsoleOutputLevel};

/// Plugin that adds terminal (stdin/stdout) console support.
#[derive(Default)]
pub struct TerminalPlugin {
    pub config: TerminalConfig,
}

impl Plugin for TerminalPlugin {
    fn build(&self, app: &mut App) {
        let (sender, receiver) = mpsc::channel();
        let _handle = spawn_stdin_reader(sender);

        app.insert_resource(StdinReceiver(Mutex::new(receiver)))
            .insert_resource(self.config.clone())
            .add_systems(Update, read_stdin)
            .add_systems(PostUpdate, write_stdout);
    }
}

/// Configuration for terminal behavior.
#[derive(Resource, Debug, Clone)]
pub struct TerminalConfig {
    /// Whether to use colored output (ANSI escape codes).
    pub colored: bool,
    /// Line that exits the app instead of being executed.
    pub quit_word: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            colored: false, // Disabled by default - causes issues on some terminals
            quit_word: "quit".to_string(),
        }
    }
}

#[derive(Resource)]
struct StdinReceiver(Mutex<Receiver<String>>);

fn spawn_stdin_reader(sender: Sender<String>) -> JoinHandle<()> {
    thread::spawn(move || {
        let stdin = io::stdin();
        let handle = stdin.lock();

        for line in handle.lines().map_while(Result::ok) {
            let text = line.trim().to_string();
            if !text.is_empty() && sender.send(text).is_err() {
                break;
            }
        }
    })
}

fn read_stdin(
    receiver: Res<StdinReceiver>,
    config: Res<TerminalConfig>,
    mut events: MessageWriter<ConsoleInputEvent>,
    mut exit: MessageWriter<AppExit>,
) {
    let rx = receiver.0.lock().unwrap_or_else(PoisonError::into_inner);
    while let Ok(line) = rx.try_recv() {
        if is_quit(&line, &config.quit_word) {
            exit.write(AppExit::Success);
            break;
        }
        events.write(ConsoleInputEvent::new(line));
    }
}

fn is_quit(line: &str, quit_word: &str) -> bool {
    line.trim() == quit_word
}

fn write_stdout(mut events: MessageReader<ConsoleOutputEvent>, config: Res<TerminalConfig>) {
    let mut stdout = io::stdout().lock();
    for event in events.read() {
        let _ = if config.colored {
            writeln!(stdout, "{}{}\x1b[0m", level_color(event.level), event.message)
        } else {
            writeln!(stdout, "{}", event.message)
        };
    }
    let _ = stdout.flush();
}

fn level_color(level: ConsoleOutputLevel) -> &'static str {
    match level {
        ConsoleOutputLevel::Debug => "\x1b[90m",
        ConsoleOutputLevel::Info => "\x1b[0m",
        ConsoleOutputLevel::Warn => "\x1b[33m",
        ConsoleOutputLevel::Error => "\x1b[31m",
        ConsoleOutputLevel::Command => "\x1b[36m",
        ConsoleOutputLevel::Result => "\x1b[32m",
    }
}
