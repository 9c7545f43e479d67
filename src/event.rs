use crate::api::{ApiError, SubmitReceipt, WeatherRecord, WeatherRequest};
use color_eyre::eyre::OptionExt;
use futures::{FutureExt, StreamExt};
use ratatui::crossterm::event::Event as CrosstermEvent;
use std::time::Duration;
use tokio::sync::mpsc;

/// The frequency at which tick events are emitted.
const TICK_FPS: f64 = 30.0;

/// Representation of all possible events.
#[derive(Debug)]
pub enum Event {
    /// An event that is emitted on a regular schedule.
    Tick,
    /// Crossterm events.
    ///
    /// These events are emitted by the terminal.
    Crossterm(CrosstermEvent),
    /// Application events.
    App(AppEvent),
}

/// Application events.
#[derive(Debug)]
pub enum AppEvent {
    /// A submission returned from the weather service.
    SubmitFinished {
        request: WeatherRequest,
        result: Result<SubmitReceipt, ApiError>,
    },
    /// A lookup returned from the weather service.
    LookupFinished {
        id: String,
        result: Result<WeatherRecord, ApiError>,
    },
}

/// Terminal event handler.
#[derive(Debug)]
pub struct EventHandler {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
    /// Event receiver channel.
    receiver: mpsc::UnboundedReceiver<Event>,
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl EventHandler {
    /// Constructs a new instance of [`EventHandler`] and spawns a task to read terminal events.
    pub fn new() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        let actor = EventTask::new(sender.clone());
        tokio::spawn(async { actor.run().await });
        Self { sender, receiver }
    }

    /// Constructs a handler without the terminal reader, only app events arrive.
    pub fn detached() -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        Self { sender, receiver }
    }

    /// Receives an event from the sender.
    ///
    /// This function blocks until an event is received.
    ///
    /// # Errors
    ///
    /// This function returns an error if the sender channel is disconnected.
    pub async fn next(&mut self) -> color_eyre::Result<Event> {
        self.receiver.recv().await.ok_or_eyre("Failed to receive event")
    }

    /// A sender for background tasks reporting back to the event loop.
    pub fn sender(&self) -> AppEventSender {
        AppEventSender {
            sender: self.sender.clone(),
        }
    }
}

/// Cloneable handle for posting [`AppEvent`]s from spawned tasks.
#[derive(Debug, Clone)]
pub struct AppEventSender {
    sender: mpsc::UnboundedSender<Event>,
}

impl AppEventSender {
    pub fn send(&self, app_event: AppEvent) {
        // The receiver is gone only when the app is shutting down
        let _ = self.sender.send(Event::App(app_event));
    }
}

/// A task that handles reading crossterm events and emitting tick events on a regular schedule.
struct EventTask {
    /// Event sender channel.
    sender: mpsc::UnboundedSender<Event>,
}

impl EventTask {
    fn new(sender: mpsc::UnboundedSender<Event>) -> Self {
        Self { sender }
    }

    /// Runs the event task.
    ///
    /// This function emits tick events at a fixed rate and polls for crossterm events in between.
    async fn run(self) -> color_eyre::Result<()> {
        let tick_rate = Duration::from_secs_f64(1.0 / TICK_FPS);
        let mut reader = crossterm::event::EventStream::new();
        let mut tick = tokio::time::interval(tick_rate);
        loop {
            let tick_delay = tick.tick();
            let crossterm_event = reader.next().fuse();
            tokio::select! {
              _ = self.sender.closed() => {
                break;
              }
              _ = tick_delay => {
                self.send(Event::Tick);
              }
              Some(Ok(evt)) = crossterm_event => {
                self.send(Event::Crossterm(evt));
              }
            };
        }
        Ok(())
    }

    /// Sends an event to the receiver.
    fn send(&self, event: Event) {
        // Ignores the result because shutting down the app drops the receiver, which causes
        // the send operation to fail. This is expected behavior and should not panic.
        let _ = self.sender.send(event);
    }
}
