//! Application orchestration module
//!
//! [`Controller`] turns terminal events into [`PickerInput`] and owns the
//! picker; it needs no terminal and is what the tests drive. [`App`] wires a
//! controller to a real [`Tui`] and the async [`EventHandler`].

use std::{
    future::Future,
    sync::Arc,
    time::{Duration, Instant},
};

use crossterm::event::{
    Event as CrosstermEvent, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton,
    MouseEvent, MouseEventKind,
};
use ratatui::{layout::Rect, Frame};
use smol::{future::FutureExt, Task};

use crate::{
    colors::is_valid_color_string,
    config::PickerConfig,
    error::ChromaResult,
    event::{Event, EventHandler, GradientControl, PickerInput, SliderKind, WheelKey},
    state::{ColorSnapshot, Slot},
    sync::Picker,
    tui::{self, Tui, WheelGeometry},
};

/// Slider nudge per key press, in slider units
const SLIDER_STEP: f64 = 5.0;

/// Opacity nudge per key press
const OPACITY_STEP: f64 = 0.1;

/// Pause between frames of the host loop
const FRAME_INTERVAL: Duration = Duration::from_millis(8);

/// Longest text the hex entry accepts, `#` included
const HEX_ENTRY_LEN: usize = 7;

/// Terminal-independent input handling around a [`Picker`]
#[derive(Debug)]
pub struct Controller {
    picker: Picker,
    geometry: WheelGeometry,
    /// Text of the hex field while it has focus
    entry: Option<String>,
    running: bool,
}

impl Controller {
    pub fn new(config: &PickerConfig) -> Self {
        Self {
            picker: Picker::new(config),
            geometry: WheelGeometry::default(),
            entry: None,
            running: true,
        }
    }

    pub fn picker(&self) -> &Picker {
        &self.picker
    }

    pub fn picker_mut(&mut self) -> &mut Picker {
        &mut self.picker
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Hex field text while editing
    pub fn entry(&self) -> Option<&str> {
        self.entry.as_deref()
    }

    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }

    /// Recompute the wheel placement for a screen area
    pub fn layout(&mut self, area: Rect) {
        let (geometry, _) = tui::split(area);
        self.geometry = geometry;
        self.picker.dispatch(
            PickerInput::Resize {
                diameter: geometry.diameter,
            },
            Instant::now(),
        );
    }

    /// Handle one event from the channel
    pub fn handle(&mut self, event: Event, now: Instant) {
        match event {
            Event::Quit => self.quit(),
            Event::Input(input) => {
                self.picker.dispatch(input, now);
            }
            Event::Terminal(CrosstermEvent::Key(key)) => self.handle_key(key, now),
            Event::Terminal(CrosstermEvent::Mouse(mouse)) => self.handle_mouse(mouse, now),
            Event::Terminal(CrosstermEvent::Resize(width, height)) => {
                self.layout(Rect::new(0, 0, width, height))
            }
            Event::Terminal(_) => {}
        }
    }

    /// Release any trailing drag update whose window has closed
    pub fn tick(&mut self, now: Instant) {
        self.picker.tick(now);
    }

    pub fn draw(&mut self, frame: &mut Frame<'_>) {
        let area = frame.area();
        if tui::split(area).0 != self.geometry {
            self.layout(area);
        }
        tui::draw_picker(frame, &mut self.picker, self.entry.as_deref());
    }

    fn handle_key(&mut self, key: KeyEvent, now: Instant) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.quit();
            return;
        }
        if self.entry.is_some() {
            self.handle_entry_key(key, now);
            return;
        }
        if let Some(input) = self.key_to_input(key) {
            self.picker.dispatch(input, now);
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit(),
            KeyCode::Char('#') => {
                tracing::trace!("hex entry opened");
                self.entry = Some("#".to_string());
            }
            KeyCode::Char('t') => {
                let theme = self.picker.theme().toggled();
                self.picker.set_theme(theme);
            }
            _ => {}
        }
    }

    /// Keys that map directly onto a picker input
    fn key_to_input(&self, key: KeyEvent) -> Option<PickerInput> {
        let sliders = self.picker.surfaces().sliders;
        let gradient = &self.picker.surfaces().gradient;

        let input = match key.code {
            KeyCode::Left => PickerInput::Key(WheelKey::Left),
            KeyCode::Right => PickerInput::Key(WheelKey::Right),
            KeyCode::Up => PickerInput::Key(WheelKey::Up),
            KeyCode::Down => PickerInput::Key(WheelKey::Down),
            KeyCode::Tab | KeyCode::BackTab => {
                PickerInput::SelectSlot(self.picker.active_slot().other())
            }
            KeyCode::Char(c @ ('h' | 'H')) => {
                let delta = if c == 'H' { SLIDER_STEP } else { -SLIDER_STEP };
                PickerInput::Slider {
                    kind: SliderKind::Hue,
                    value: (f64::from(sliders.hue) + delta).rem_euclid(360.0),
                }
            }
            KeyCode::Char(c @ ('s' | 'S')) => slider_step(
                SliderKind::Saturation,
                sliders.saturation,
                c == 'S',
            ),
            KeyCode::Char(c @ ('b' | 'B')) => slider_step(
                SliderKind::Brightness,
                sliders.brightness,
                c == 'B',
            ),
            KeyCode::Char('g') => PickerInput::Gradient(GradientControl::Kind(gradient.kind.next())),
            KeyCode::Char('d') => {
                PickerInput::Gradient(GradientControl::Direction(gradient.direction.next()))
            }
            KeyCode::Char(c @ ('o' | 'O')) => {
                let delta = if c == 'O' { OPACITY_STEP } else { -OPACITY_STEP };
                let opacity = ((gradient.opacity + delta) * 10.0).round() / 10.0;
                PickerInput::Gradient(GradientControl::Opacity(opacity.clamp(0.0, 1.0)))
            }
            KeyCode::Char(c @ '1'..='9') => {
                let index = c.to_digit(10)? as usize - 1;
                let hex = self.picker.surfaces().recent.get(index)?;
                PickerInput::SetActiveColor(hex.to_string())
            }
            _ => return None,
        };

        Some(input)
    }

    fn handle_entry_key(&mut self, key: KeyEvent, now: Instant) {
        let Some(text) = self.entry.as_mut() else {
            return;
        };

        match key.code {
            KeyCode::Enter | KeyCode::Esc => {
                tracing::trace!(text = %text, "hex entry closed");
                self.entry = None;
                return;
            }
            KeyCode::Backspace => {
                if text.len() > 1 {
                    text.pop();
                }
            }
            KeyCode::Char(c) if c.is_ascii_hexdigit() && text.len() < HEX_ENTRY_LEN => {
                text.push(c);
            }
            _ => return,
        }

        if is_valid_color_string(text) {
            let input = PickerInput::HexField {
                slot: self.picker.active_slot(),
                text: text.clone(),
            };
            self.picker.dispatch(input, now);
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent, now: Instant) {
        let pos = self.geometry.to_local(mouse.column, mouse.row);

        let input = match mouse.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                if !self.geometry.contains(mouse.column, mouse.row) {
                    return;
                }
                PickerInput::PointerDown(pos)
            }
            MouseEventKind::Drag(MouseButton::Left) => PickerInput::PointerMove(pos),
            MouseEventKind::Up(MouseButton::Left) => PickerInput::PointerUp,
            _ => return,
        };

        self.picker.dispatch(input, now);
    }
}

fn slider_step(kind: SliderKind, current: i32, up: bool) -> PickerInput {
    let (min, max) = kind.range();
    let delta = if up { SLIDER_STEP } else { -SLIDER_STEP };
    PickerInput::Slider {
        kind,
        value: (f64::from(current) + delta).clamp(min, max),
    }
}

/// Core application struct managing all components
pub struct App {
    /// Terminal interface manager
    tui: Tui,
    controller: Controller,
    /// Event handling system
    events: Arc<EventHandler>,
    /// Event polling rate
    tick_rate: Duration,
    /// Background task handles
    tasks: Vec<Task<ChromaResult<()>>>,
}

impl App {
    /// Creates a new application instance
    pub fn new(config: &PickerConfig, tick_rate: Duration) -> ChromaResult<Self> {
        let tui = Tui::new()?;

        Ok(Self {
            tui,
            controller: Controller::new(config),
            events: Arc::new(EventHandler::new()),
            tick_rate,
            tasks: Vec::new(),
        })
    }

    /// Spawns a background task
    pub fn spawn<F>(&mut self, future: F) -> ChromaResult<()>
    where
        F: Future<Output = ChromaResult<()>> + Send + 'static,
    {
        let task = smol::spawn(future);
        self.tasks.push(task);
        Ok(())
    }

    /// Runs the event loop until quit; returns the final colors
    pub async fn run(&mut self) -> ChromaResult<ColorSnapshot> {
        let events = self.events.clone();
        let tick_rate = self.tick_rate;
        self.spawn(async move { events.run(tick_rate).await })?;

        let size = self.tui.size()?;
        self.controller
            .layout(Rect::new(0, 0, size.width, size.height));
        tracing::info!(
            diameter = self.controller.picker().diameter(),
            "picker started"
        );

        while self.controller.is_running() {
            while let Some(event) = self.events.try_recv()? {
                self.controller.handle(event, Instant::now());
                if !self.controller.is_running() {
                    break;
                }
            }
            self.controller.tick(Instant::now());

            let controller = &mut self.controller;
            self.tui.draw(|frame| controller.draw(frame))?;

            smol::Timer::after(FRAME_INTERVAL).await;
        }

        self.events.stop();
        self.cleanup_tasks().await;

        let snapshot = self.controller.picker().snapshot();
        tracing::info!(
            primary = %snapshot.primary.to_hex(),
            secondary = %snapshot.secondary.to_hex(),
            "picker stopped"
        );
        Ok(snapshot)
    }

    /// Cleanup background tasks
    async fn cleanup_tasks(&mut self) {
        let tasks = std::mem::take(&mut self.tasks);
        for task in tasks {
            match task
                .or(async {
                    smol::Timer::after(Duration::from_secs(1)).await;
                    Ok(())
                })
                .await
            {
                Ok(_) => {}
                Err(e) => tracing::warn!("task cleanup error: {}", e),
            }
        }
    }

    pub fn controller(&self) -> &Controller {
        &self.controller
    }

    /// Returns a reference to the event handler
    pub fn events(&self) -> &EventHandler {
        &self.events
    }

    /// Returns the current tick rate
    pub fn tick_rate(&self) -> Duration {
        self.tick_rate
    }
}
