//! Input events and the host event channel
//!
//! [`PickerInput`] is the normalized form every input surface is reduced to
//! before it reaches [`Picker::dispatch`](crate::sync::Picker::dispatch).
//! [`EventHandler`] is a bounded, non-blocking queue feeding the host loop
//! from the terminal poller and from collaborators (suggestion fetchers,
//! swatch panels) that write colors from other tasks.

use crossterm::event::Event as CrosstermEvent;
use smol::channel::{bounded, Receiver, Sender, TryRecvError};
use std::{
    sync::atomic::{AtomicBool, Ordering},
    time::Duration,
};

use crate::{
    error::{ChromaError, ChromaResult},
    preview::{GradientDirection, GradientKind},
    state::Slot,
};

/// Maximum number of pending events in the channel
const MAX_EVENTS: usize = 1024;

/// A position in wheel-local pixels, origin at the top-left of the wheel surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Arrow keys understood by the focused wheel
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WheelKey {
    Left,
    Right,
    Up,
    Down,
}

/// The three range inputs
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SliderKind {
    /// Absolute hue in degrees, `0..=360`
    Hue,
    /// Offset around 50% saturation, `-100..=100`
    Saturation,
    /// Offset around 50% lightness, `-100..=100`
    Brightness,
}

impl SliderKind {
    /// Inclusive range accepted by the slider
    pub fn range(self) -> (f64, f64) {
        match self {
            SliderKind::Hue => (0.0, 360.0),
            SliderKind::Saturation | SliderKind::Brightness => (-100.0, 100.0),
        }
    }
}

/// Changes to the gradient preview controls
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GradientControl {
    Kind(GradientKind),
    Direction(GradientDirection),
    Opacity(f64),
}

/// One normalized input for the picker
#[derive(Debug, Clone, PartialEq)]
pub enum PickerInput {
    /// Press on the wheel surface; starts a drag
    PointerDown(Point),
    /// Pointer motion; only acted on while dragging
    PointerMove(Point),
    /// Release observed anywhere; ends the drag
    PointerUp,
    /// Discrete click on the wheel
    Click(Point),
    /// Arrow key on the focused wheel
    Key(WheelKey),
    /// Text of a hex field after an edit
    HexField { slot: Slot, text: String },
    /// A range input moved
    Slider { kind: SliderKind, value: f64 },
    /// Choose which slot the wheel and sliders edit
    SelectSlot(Slot),
    /// Write from a collaborator, e.g. a swatch or suggestion click
    SetActiveColor(String),
    /// Hosting surface changed size
    Resize { diameter: u32 },
    /// Gradient preview controls
    Gradient(GradientControl),
}

/// Events consumed by the host loop
#[derive(Debug, Clone)]
pub enum Event {
    /// Raw terminal event from the poller
    Terminal(CrosstermEvent),
    /// Already-normalized picker input from a collaborator
    Input(PickerInput),
    /// Event indicating the event loop should terminate
    Quit,
}

/// Handles event processing and distribution
#[derive(Debug)]
pub struct EventHandler {
    /// Sender for event channel
    tx: Sender<Event>,
    /// Receiver for event channel
    rx: Receiver<Event>,
    /// Flag indicating if the terminal poller should keep running
    running: AtomicBool,
}

impl EventHandler {
    /// Creates a new event handler with bounded channel
    pub fn new() -> Self {
        let (tx, rx) = bounded(MAX_EVENTS);
        Self {
            tx,
            rx,
            running: AtomicBool::new(true),
        }
    }

    /// A sender for collaborators that push inputs from their own tasks
    pub fn sender(&self) -> Sender<Event> {
        self.tx.clone()
    }

    /// Attempts to send an event through the channel without blocking
    pub fn try_send(&self, event: Event) -> ChromaResult<()> {
        self.tx
            .try_send(event)
            .map_err(|_| ChromaError::channel_closed("event channel", (0, 0)).into())
    }

    /// Non-blocking attempt to receive an event
    pub fn try_recv(&self) -> ChromaResult<Option<Event>> {
        match self.rx.try_recv() {
            Ok(event) => Ok(Some(event)),
            Err(TryRecvError::Empty) => Ok(None),
            Err(TryRecvError::Closed) => {
                Err(ChromaError::channel_closed("event channel", (0, 0)).into())
            }
        }
    }

    /// Polls the terminal and forwards key, mouse and resize events
    pub async fn run(&self, tick_rate: Duration) -> ChromaResult<()> {
        while self.running.load(Ordering::Acquire) {
            let ready = smol::unblock(move || crossterm::event::poll(tick_rate))
                .await
                .map_err(|e| input_failure("event polling", e))?;

            if ready {
                let event = smol::unblock(crossterm::event::read)
                    .await
                    .map_err(|e| input_failure("event reading", e))?;

                if matches!(
                    event,
                    CrosstermEvent::Key(_) | CrosstermEvent::Mouse(_) | CrosstermEvent::Resize(..)
                ) {
                    self.tx.send(Event::Terminal(event)).await.map_err(|_| {
                        ChromaError::channel_closed("event channel", (0, 0))
                    })?;
                }
            }

            smol::future::yield_now().await;
        }

        Ok(())
    }

    /// Stops the terminal poller
    pub fn stop(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Checks if the terminal poller is running
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

/// Poll or read failure of the terminal input stream
fn input_failure(stage: &str, err: std::io::Error) -> ChromaError {
    ChromaError::event(stage, (0, stage.len()), format!("{} failed: {}", stage, err))
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use smol::block_on;

    #[test]
    fn test_event_handler_lifecycle() {
        let handler = EventHandler::new();
        assert!(handler.is_running());

        handler.stop();
        assert!(!handler.is_running());
    }

    #[test]
    fn test_collaborator_input_is_queued() {
        let handler = EventHandler::new();
        let sender = handler.sender();

        block_on(async {
            sender
                .send(Event::Input(PickerInput::SetActiveColor("#00ff00".into())))
                .await
                .unwrap();
        });

        let received = handler.try_recv().unwrap();
        assert!(matches!(
            received,
            Some(Event::Input(PickerInput::SetActiveColor(ref hex))) if hex == "#00ff00"
        ));
        assert!(handler.try_recv().unwrap().is_none());
    }

    #[test]
    fn test_channel_capacity() {
        let handler = EventHandler::new();

        for _ in 0..MAX_EVENTS {
            assert!(handler.try_send(Event::Input(PickerInput::PointerUp)).is_ok());
        }

        assert!(handler.try_send(Event::Quit).is_err());
    }

    #[test]
    fn test_input_failure_is_event_error() {
        let err = input_failure(
            "event reading",
            std::io::Error::new(std::io::ErrorKind::Interrupted, "stdin closed"),
        );

        assert_eq!(err.to_string(), "Event error: event reading failed: stdin closed");
        match err {
            ChromaError::Event { src, err_span, .. } => {
                assert_eq!(src, "event reading");
                assert_eq!(err_span, (0, 13).into());
            }
            _ => panic!("Wrong error variant"),
        }
    }

    #[test]
    fn test_slider_ranges() {
        assert_eq!(SliderKind::Hue.range(), (0.0, 360.0));
        assert_eq!(SliderKind::Brightness.range(), (-100.0, 100.0));
    }
}
