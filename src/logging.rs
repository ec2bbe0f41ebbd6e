//! Custom [LogPlugin](bevy::log::LogPlugin) functionality.
//!
//! Mirrors application log events into the console output stream:
//!
//! ```ignore
//! App::new().add_plugins((
//!     DefaultPlugins.set(LogPlugin {
//!         custom_layer: custom_log_layer,
//!         ..default()
//!     }),
//!     ConsolePlugin::default(),
//! ));
//! ```

use bevy::log::{BoxedLayer, Level};
use bevy::prelude::*;
use std::sync::mpsc;
use tracing::Subscriber;
use tracing_subscriber::field::Visit;
use tracing_subscriber::Layer;

use crate::core::{ConsoleOutputEvent, ConsoleOutputLevel};

/// A function that implements the log reading functionality for the
/// console via [`LogPlugin::custom_layer`](bevy::log::LogPlugin::custom_layer).
pub fn custom_log_layer(app: &mut App) -> Option<BoxedLayer> {
    Some(Box::new(create_custom_log_layer(app)))
}

fn create_custom_log_layer(app: &mut App) -> LogCaptureLayer {
    let (layer, receiver) = LogCaptureLayer::new();
    app.add_message::<ConsoleOutputEvent>();
    app.insert_non_send_resource(CapturedLogEvents(receiver));
    app.add_systems(PostUpdate, transfer_log_events);
    layer
}

/// Transfers captured events from [`CapturedLogEvents`] to [`MessageWriter<ConsoleOutputEvent>`].
fn transfer_log_events(
    receiver: NonSend<CapturedLogEvents>,
    mut output_events: MessageWriter<ConsoleOutputEvent>,
) {
    for event in receiver.0.try_iter() {
        output_events.write(event);
    }
}

/// Temporarily stores captured events until [`transfer_log_events`] runs.
struct CapturedLogEvents(mpsc::Receiver<ConsoleOutputEvent>);

/// A [`Layer`] that turns log events into [`ConsoleOutputEvent`]s.
///
/// Events from this crate are skipped so the console's own traces do not
/// feed back into its output.
struct LogCaptureLayer {
    sender: mpsc::Sender<ConsoleOutputEvent>,
}

impl LogCaptureLayer {
    fn new() -> (Self, mpsc::Receiver<ConsoleOutputEvent>) {
        let (sender, receiver) = mpsc::channel();
        (Self { sender }, receiver)
    }
}

impl<S: Subscriber + for<'a> tracing_subscriber::registry::LookupSpan<'a>> Layer<S>
    for LogCaptureLayer
{
    fn on_event(
        &self,
        event: &tracing::Event<'_>,
        _ctx: tracing_subscriber::layer::Context<'_, S>,
    ) {
        let metadata = event.metadata();
        if metadata.target().starts_with(env!("CARGO_CRATE_NAME")) {
            return;
        }

        let mut message = None;
        event.record(&mut LogEventVisitor(&mut message));
        if let Some(message) = message {
            let _ = self
                .sender
                .send(ConsoleOutputEvent::new(output_level(*metadata.level()), message));
        }
    }
}

fn output_level(level: Level) -> ConsoleOutputLevel {
    if level == Level::ERROR {
        ConsoleOutputLevel::Error
    } else if level == Level::WARN {
        ConsoleOutputLevel::Warn
    } else if level == Level::INFO {
        ConsoleOutputLevel::Info
    } else {
        ConsoleOutputLevel::Debug
    }
}

/// A [`Visit`]or that extracts the `message` field of an event.
struct LogEventVisitor<'a>(&'a mut Option<String>);

impl Visit for LogEventVisitor<'_> {
    fn record_debug(&mut self, field: &tracing::field::Field, value: &dyn std::fmt::Debug) {
        // Only log out messages
        if field.name() == "message" {
            *self.0 = Some(format!("{value:?}"));
        }
    }
}
