//! Input synchronization
//!
//! [`Picker`] is the single dispatcher between input surfaces and the color
//! state. Each surface (wheel pointer, wheel keys, sliders, hex fields,
//! collaborators) is reduced to a target slot and a candidate color, stored
//! through [`ColorState`], and the resulting [`ColorChange`] is fanned out to
//! the passive [`Surfaces`] and to subscribers. Nothing downstream can call
//! back into the picker, so edits never loop.

use std::time::Instant;

use crate::{
    colors::{is_valid_color_string, Hsl, Theme},
    config::PickerConfig,
    event::{GradientControl, PickerInput, Point, SliderKind, WheelKey},
    preview::{GradientPreview, LivePreview, Surfaces},
    state::{ColorChange, ColorObserver, ColorSnapshot, ColorState, Origin, Slot, SubscriptionId},
    throttle::Throttle,
    wheel::{wheel_angle, Bitmap, WheelRenderer, WHEEL_LIGHTNESS},
};

/// The color picker session: state, wheel, drag tracking and bound surfaces
#[derive(Debug)]
pub struct Picker {
    state: ColorState,
    wheel: WheelRenderer,
    throttle: Throttle<Point>,
    surfaces: Surfaces,
    /// Current wheel diameter in pixels, 0 until the host reports geometry
    diameter: u32,
    dragging: bool,
    /// Lightness applied by wheel and arrow-key edits, set only by the brightness slider
    brightness: f64,
    theme: Theme,
    hue_step: f64,
    saturation_step: f64,
}

impl Picker {
    pub fn new(config: &PickerConfig) -> Self {
        let state = ColorState::new(config.default_color);
        let gradient = GradientPreview::new(
            config.gradient_kind,
            config.gradient_direction,
            config.opacity,
        );
        let surfaces = Surfaces::new(&state.snapshot(), gradient, config.max_recent_colors);

        Self {
            state,
            wheel: WheelRenderer::new(config.indicator_radius),
            throttle: Throttle::new(config.throttle_interval),
            surfaces,
            diameter: 0,
            dragging: false,
            brightness: WHEEL_LIGHTNESS,
            theme: config.theme,
            hue_step: config.hue_step,
            saturation_step: config.saturation_step,
        }
    }

    /// Apply one normalized input. Returns the change it caused, if any.
    pub fn dispatch(&mut self, input: PickerInput, now: Instant) -> Option<ColorChange> {
        match input {
            PickerInput::PointerDown(pos) => self.pointer_down(pos),
            PickerInput::PointerMove(pos) => self.pointer_move(pos, now),
            PickerInput::PointerUp => self.pointer_up(),
            PickerInput::Click(pos) => self.click(pos),
            PickerInput::Key(key) => self.key(key),
            PickerInput::HexField { slot, text } => self.edit_hex(slot, &text),
            PickerInput::Slider { kind, value } => self.slider(kind, value),
            PickerInput::SetActiveColor(hex) => self.set_active_color(&hex),
            PickerInput::SelectSlot(slot) => {
                self.select_slot(slot);
                None
            }
            PickerInput::Resize { diameter } => {
                self.resize(diameter);
                None
            }
            PickerInput::Gradient(control) => {
                self.set_gradient(control);
                None
            }
        }
    }

    // Geometry

    /// Report the hosting surface's rendered diameter
    pub fn resize(&mut self, diameter: u32) {
        if diameter != self.diameter {
            tracing::debug!(from = self.diameter, to = diameter, "wheel resized");
        }
        self.diameter = diameter;
    }

    pub fn diameter(&self) -> u32 {
        self.diameter
    }

    // Wheel pointer

    /// Press on the wheel surface. Starts a drag when the press lands inside
    /// the square surface, even outside the disc.
    pub fn pointer_down(&mut self, pos: Point) -> Option<ColorChange> {
        let size = f64::from(self.diameter);
        if self.diameter == 0 || !(0.0..=size).contains(&pos.x) || !(0.0..=size).contains(&pos.y) {
            return None;
        }

        self.dragging = true;
        self.throttle.reset();
        self.apply_wheel(pos)
    }

    /// Throttled drag motion; ignored unless a drag is active
    pub fn pointer_move(&mut self, pos: Point, now: Instant) -> Option<ColorChange> {
        if !self.dragging {
            return None;
        }
        let pos = self.throttle.submit(now, pos)?;
        self.apply_wheel(pos)
    }

    /// Release from anywhere. Ends the drag and applies a suppressed final move.
    pub fn pointer_up(&mut self) -> Option<ColorChange> {
        let was_dragging = std::mem::replace(&mut self.dragging, false);
        let pending = self.throttle.flush();
        self.throttle.reset();

        if was_dragging {
            pending.and_then(|pos| self.apply_wheel(pos))
        } else {
            None
        }
    }

    /// Fire a trailing drag update whose throttle window has closed
    pub fn tick(&mut self, now: Instant) -> Option<ColorChange> {
        if !self.dragging {
            return None;
        }
        let pos = self.throttle.poll(now)?;
        self.apply_wheel(pos)
    }

    /// Discrete click; ignored outside the disc
    pub fn click(&mut self, pos: Point) -> Option<ColorChange> {
        let (_, reach) = self.polar(pos)?;
        if reach > 1.0 {
            tracing::debug!(x = pos.x, y = pos.y, "click outside wheel ignored");
            return None;
        }
        self.apply_wheel(pos)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Lightness used by wheel and arrow-key edits. Hex entry and
    /// collaborator writes leave it alone.
    pub fn brightness(&self) -> f64 {
        self.brightness
    }

    // Keyboard, sliders, text

    /// Arrow keys nudge hue (wrapping) or saturation (clamped)
    pub fn key(&mut self, key: WheelKey) -> Option<ColorChange> {
        let slot = self.state.active_slot();
        let color = self.state.get(slot).with_lightness(self.brightness);
        let next = match key {
            WheelKey::Left => color.with_hue(color.h - self.hue_step),
            WheelKey::Right => color.with_hue(color.h + self.hue_step),
            WheelKey::Up => color.with_saturation(color.s + self.saturation_step),
            WheelKey::Down => color.with_saturation(color.s - self.saturation_step),
        };
        Some(self.commit(slot, next, Origin::Keyboard))
    }

    /// Move a range input. Out-of-range or non-finite values are ignored.
    pub fn slider(&mut self, kind: SliderKind, value: f64) -> Option<ColorChange> {
        let (min, max) = kind.range();
        if !value.is_finite() || value < min || value > max {
            tracing::debug!(?kind, value, "slider value out of range ignored");
            return None;
        }

        let slot = self.state.active_slot();
        let color = self.state.get(slot);
        let next = match kind {
            SliderKind::Hue => color.with_hue(value),
            SliderKind::Saturation => color.with_saturation(offset_to_unit(value)),
            SliderKind::Brightness => {
                self.brightness = offset_to_unit(value);
                color.with_lightness(self.brightness)
            }
        };
        Some(self.commit(slot, next, Origin::Slider(kind)))
    }

    /// Text of a slot's hex field changed. Half-typed values are ignored.
    pub fn edit_hex(&mut self, slot: Slot, text: &str) -> Option<ColorChange> {
        if !is_valid_color_string(text) {
            return None;
        }
        let change = self.state.set_from_hex(slot, text, Origin::HexField)?;
        self.surfaces.recent.push(text);
        Some(self.fan_out(change))
    }

    // Slots

    /// Retarget wheel and slider edits; no color changes
    pub fn select_slot(&mut self, slot: Slot) {
        self.state.set_active_slot(slot);
        self.surfaces.retarget(&self.state.snapshot());
    }

    pub fn active_slot(&self) -> Slot {
        self.state.active_slot()
    }

    pub fn get(&self, slot: Slot) -> Hsl {
        self.state.get(slot)
    }

    pub fn snapshot(&self) -> ColorSnapshot {
        self.state.snapshot()
    }

    // Collaborator contract

    /// Hex of the active slot
    pub fn active_color(&self) -> String {
        self.state.active().to_hex()
    }

    /// Write the active slot through the same gate as manual hex entry
    pub fn set_active_color(&mut self, hex: &str) -> Option<ColorChange> {
        if !is_valid_color_string(hex) {
            return None;
        }
        let slot = self.state.active_slot();
        let change = self.state.set_from_hex(slot, hex, Origin::External)?;
        Some(self.fan_out(change))
    }

    pub fn subscribe(&mut self, observer: impl ColorObserver + 'static) -> SubscriptionId {
        self.state.subscribe(observer)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    // Presentation

    pub fn set_gradient(&mut self, control: GradientControl) {
        match control {
            GradientControl::Kind(kind) => self.surfaces.gradient.set_kind(kind),
            GradientControl::Direction(direction) => self.surfaces.gradient.set_direction(direction),
            GradientControl::Opacity(opacity) => {
                self.surfaces.gradient.set_opacity(opacity);
                let opacity = self.surfaces.gradient.opacity;
                self.surfaces.preview = LivePreview::new(&self.surfaces.readout.hex, opacity);
            }
        }
    }

    pub fn set_max_recent_colors(&mut self, max: usize) {
        self.surfaces.recent.set_capacity(max);
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.theme = theme;
    }

    pub fn surfaces(&self) -> &Surfaces {
        &self.surfaces
    }

    pub fn wheel(&self) -> &WheelRenderer {
        &self.wheel
    }

    /// Wheel frame for the current diameter with the active slot's indicator
    pub fn render_wheel(&mut self) -> Option<&Bitmap> {
        let color = self.state.active();
        self.wheel.render(self.diameter, color, self.theme.indicator_stroke())
    }

    // Internals

    /// Hue and distance/radius of a wheel-local point
    fn polar(&self, pos: Point) -> Option<(f64, f64)> {
        if self.diameter == 0 || !pos.x.is_finite() || !pos.y.is_finite() {
            return None;
        }
        let radius = f64::from(self.diameter) / 2.0;
        let dx = pos.x - radius;
        let dy = pos.y - radius;
        Some((wheel_angle(dx, dy), dx.hypot(dy) / radius))
    }

    /// Wheel edits set hue and saturation at the picker's brightness
    fn apply_wheel(&mut self, pos: Point) -> Option<ColorChange> {
        let (hue, reach) = self.polar(pos)?;
        let slot = self.state.active_slot();
        let next = Hsl {
            h: hue,
            s: reach.clamp(0.0, 1.0),
            l: self.brightness,
        };
        Some(self.commit(slot, next, Origin::Wheel))
    }

    fn commit(&mut self, slot: Slot, color: Hsl, origin: Origin) -> ColorChange {
        let change = self.state.set_from_hsl(slot, color, origin);
        self.fan_out(change)
    }

    fn fan_out(&mut self, change: ColorChange) -> ColorChange {
        self.surfaces.refresh(change.slot, change.color, &change.snapshot);
        change
    }
}

impl Default for Picker {
    fn default() -> Self {
        Self::new(&PickerConfig::default())
    }
}

/// Map a `-100..=100` offset slider onto `[0, 1]` around a 0.5 midpoint
fn offset_to_unit(value: f64) -> f64 {
    (value / 100.0 + 0.5).clamp(0.0, 1.0)
}
