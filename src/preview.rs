//! Passive display surfaces bound to the color state
//!
//! Every surface here is plain data refreshed from a
//! [`ColorChange`](crate::state::ColorChange). None of them can call back into
//! the picker, which is what keeps a wheel edit from re-entering the slider
//! path and vice versa.

use std::collections::VecDeque;

use crate::{
    colors::{to_rgba, Hsl, Rgba},
    state::{ColorSnapshot, Slot},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Conic,
}

impl GradientKind {
    /// Cycle Linear → Radial → Conic → Linear
    pub fn next(self) -> Self {
        match self {
            GradientKind::Linear => GradientKind::Radial,
            GradientKind::Radial => GradientKind::Conic,
            GradientKind::Conic => GradientKind::Linear,
        }
    }
}

/// Direction keyword of a linear gradient
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GradientDirection {
    #[default]
    ToRight,
    ToLeft,
    ToBottom,
    ToTop,
    ToBottomRight,
    ToTopLeft,
}

impl GradientDirection {
    pub fn as_css(self) -> &'static str {
        match self {
            GradientDirection::ToRight => "to right",
            GradientDirection::ToLeft => "to left",
            GradientDirection::ToBottom => "to bottom",
            GradientDirection::ToTop => "to top",
            GradientDirection::ToBottomRight => "to bottom right",
            GradientDirection::ToTopLeft => "to top left",
        }
    }

    pub fn next(self) -> Self {
        match self {
            GradientDirection::ToRight => GradientDirection::ToBottom,
            GradientDirection::ToBottom => GradientDirection::ToLeft,
            GradientDirection::ToLeft => GradientDirection::ToTop,
            GradientDirection::ToTop => GradientDirection::ToBottomRight,
            GradientDirection::ToBottomRight => GradientDirection::ToTopLeft,
            GradientDirection::ToTopLeft => GradientDirection::ToRight,
        }
    }

    /// Whether the first color sits at the far end of a horizontal sample
    fn reversed(self) -> bool {
        matches!(
            self,
            GradientDirection::ToLeft | GradientDirection::ToTopLeft | GradientDirection::ToTop
        )
    }
}

/// Two-slot gradient preview
#[derive(Debug, Clone, PartialEq)]
pub struct GradientPreview {
    pub kind: GradientKind,
    pub direction: GradientDirection,
    pub opacity: f64,
    from: Hsl,
    to: Hsl,
    css: String,
    recomputed: u64,
}

impl GradientPreview {
    pub fn new(kind: GradientKind, direction: GradientDirection, opacity: f64) -> Self {
        let mut preview = Self {
            kind,
            direction,
            opacity: opacity.clamp(0.0, 1.0),
            from: Hsl::BLACK,
            to: Hsl::BLACK,
            css: String::new(),
            recomputed: 0,
        };
        preview.recompute();
        preview
    }

    /// Take both slot colors from a snapshot and rebuild
    pub fn update_colors(&mut self, snapshot: &ColorSnapshot) {
        self.from = snapshot.primary;
        self.to = snapshot.secondary;
        self.recompute();
    }

    pub fn set_kind(&mut self, kind: GradientKind) {
        self.kind = kind;
        self.recompute();
    }

    pub fn set_direction(&mut self, direction: GradientDirection) {
        self.direction = direction;
        self.recompute();
    }

    pub fn set_opacity(&mut self, opacity: f64) {
        if !opacity.is_finite() {
            return;
        }
        self.opacity = opacity.clamp(0.0, 1.0);
        self.recompute();
    }

    /// CSS `*-gradient(...)` string for web hosts
    pub fn css(&self) -> &str {
        &self.css
    }

    /// How many times the preview has been rebuilt
    pub fn recomputed(&self) -> u64 {
        self.recomputed
    }

    /// Color at `t` in `[0, 1]` along the gradient, for hosts painting it themselves
    pub fn sample(&self, t: f64) -> Rgba {
        let alpha = (self.opacity * 255.0).round() as u8;
        let from = Rgba::from(self.from).with_alpha(alpha);
        let to = Rgba::from(self.to).with_alpha(alpha);
        let t = if self.kind == GradientKind::Linear && self.direction.reversed() {
            1.0 - t
        } else {
            t
        };
        from.mix(&to, t)
    }

    fn recompute(&mut self) {
        let from = rgba_css(self.from, self.opacity);
        let to = rgba_css(self.to, self.opacity);
        self.css = match self.kind {
            GradientKind::Linear => {
                format!("linear-gradient({}, {}, {})", self.direction.as_css(), from, to)
            }
            GradientKind::Radial => format!("radial-gradient(circle, {}, {})", from, to),
            GradientKind::Conic => format!("conic-gradient({}, {})", from, to),
        };
        self.recomputed += 1;
    }
}

fn rgba_css(color: Hsl, opacity: f64) -> String {
    // A hex built from an Hsl is always well-formed
    to_rgba(&color.to_hex(), opacity).unwrap_or_default()
}

/// Text readouts of the most recently changed color
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Readout {
    pub hex: String,
    pub rgb: String,
    pub hsl: String,
}

impl Readout {
    pub fn from_color(color: Hsl) -> Self {
        let rgb = color.to_rgb();
        Self {
            hex: rgb.to_hex(),
            rgb: format!("({}, {}, {})", rgb.r, rgb.g, rgb.b),
            hsl: format!(
                "({:.0}, {:.0}%, {:.0}%)",
                color.h,
                color.s * 100.0,
                color.l * 100.0
            ),
        }
    }
}

/// Slider thumb positions back-propagated from the state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SliderPositions {
    /// Degrees, `0..=359`
    pub hue: i32,
    /// Offset from 50% saturation
    pub saturation: i32,
    /// Offset from 50% lightness
    pub brightness: i32,
}

impl SliderPositions {
    /// Inverse of the `value / 100 + 0.5` slider mapping
    pub fn from_color(color: Hsl) -> Self {
        Self {
            hue: color.h.round() as i32 % 360,
            saturation: ((color.s - 0.5) * 100.0).round() as i32,
            brightness: ((color.l - 0.5) * 100.0).round() as i32,
        }
    }
}

/// Live single-color preview
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LivePreview {
    /// `rgba(...)` background
    pub background: String,
    /// Accessible label
    pub label: String,
}

impl LivePreview {
    pub fn new(hex: &str, opacity: f64) -> Self {
        Self {
            background: to_rgba(hex, opacity).unwrap_or_default(),
            label: format!("Color Preview: {}", hex),
        }
    }
}

/// Most-recent-first list of distinct hex strings
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentColors {
    colors: VecDeque<String>,
    capacity: usize,
}

impl RecentColors {
    pub fn new(capacity: usize) -> Self {
        Self {
            colors: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Insert at the front unless already present; drops the oldest past capacity.
    /// Returns whether the list changed.
    pub fn push(&mut self, hex: &str) -> bool {
        let hex = hex.to_ascii_lowercase();
        if self.capacity == 0 || self.colors.contains(&hex) {
            return false;
        }
        self.colors.push_front(hex);
        self.colors.truncate(self.capacity);
        true
    }

    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity;
        self.colors.truncate(capacity);
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.colors.iter().map(String::as_str)
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.colors.get(index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }
}

/// Every surface the picker keeps in sync
#[derive(Debug, Clone, PartialEq)]
pub struct Surfaces {
    pub sliders: SliderPositions,
    pub readout: Readout,
    pub preview: LivePreview,
    pub gradient: GradientPreview,
    pub recent: RecentColors,
}

impl Surfaces {
    pub fn new(snapshot: &ColorSnapshot, gradient: GradientPreview, recent_capacity: usize) -> Self {
        let active = snapshot.active_color();
        let mut surfaces = Self {
            sliders: SliderPositions::from_color(active),
            readout: Readout::from_color(active),
            preview: LivePreview::new(&active.to_hex(), gradient.opacity),
            gradient,
            recent: RecentColors::new(recent_capacity),
        };
        surfaces.gradient.update_colors(snapshot);
        surfaces
    }

    /// Refresh everything derived from `color` after a mutation of `slot`
    pub fn refresh(&mut self, slot: Slot, color: Hsl, snapshot: &ColorSnapshot) {
        if slot == snapshot.active {
            self.sliders = SliderPositions::from_color(color);
        }
        self.readout = Readout::from_color(color);
        self.preview = LivePreview::new(&color.to_hex(), self.gradient.opacity);
        self.gradient.update_colors(snapshot);
    }

    /// Re-point slider and readout surfaces at a newly active slot
    pub fn retarget(&mut self, snapshot: &ColorSnapshot) {
        let active = snapshot.active_color();
        self.sliders = SliderPositions::from_color(active);
        self.readout = Readout::from_color(active);
        self.preview = LivePreview::new(&active.to_hex(), self.gradient.opacity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn snapshot(primary: &str, secondary: &str) -> ColorSnapshot {
        let parse = |hex: &str| crate::colors::Rgb::from_hex(hex).map(|rgb| rgb.to_hsl()).unwrap();
        ColorSnapshot {
            primary: parse(primary),
            secondary: parse(secondary),
            active: Slot::Primary,
        }
    }

    #[test]
    fn test_gradient_css() {
        let mut gradient = GradientPreview::new(GradientKind::Linear, GradientDirection::ToRight, 1.0);
        gradient.update_colors(&snapshot("#ff0000", "#0000ff"));
        assert_eq!(
            gradient.css(),
            "linear-gradient(to right, rgba(255, 0, 0, 1), rgba(0, 0, 255, 1))"
        );

        gradient.set_kind(GradientKind::Radial);
        gradient.set_opacity(0.5);
        assert_eq!(
            gradient.css(),
            "radial-gradient(circle, rgba(255, 0, 0, 0.5), rgba(0, 0, 255, 0.5))"
        );

        gradient.set_kind(GradientKind::Conic);
        assert_eq!(
            gradient.css(),
            "conic-gradient(rgba(255, 0, 0, 0.5), rgba(0, 0, 255, 0.5))"
        );
    }

    #[test]
    fn test_gradient_recomputes_on_every_control() {
        let mut gradient = GradientPreview::new(GradientKind::Linear, GradientDirection::ToRight, 1.0);
        let base = gradient.recomputed();

        gradient.update_colors(&snapshot("#000000", "#ffffff"));
        gradient.set_direction(GradientDirection::ToTop);
        gradient.set_kind(GradientKind::Conic);
        gradient.set_opacity(0.2);
        gradient.set_opacity(f64::NAN);

        assert_eq!(gradient.recomputed(), base + 4);
        assert_eq!(gradient.opacity, 0.2);
    }

    #[test]
    fn test_gradient_sample() {
        let mut gradient = GradientPreview::new(GradientKind::Linear, GradientDirection::ToRight, 1.0);
        gradient.update_colors(&snapshot("#000000", "#ffffff"));

        assert_eq!(gradient.sample(0.0), Rgba::BLACK);
        assert_eq!(gradient.sample(1.0), Rgba::WHITE);

        gradient.set_direction(GradientDirection::ToLeft);
        assert_eq!(gradient.sample(0.0), Rgba::WHITE);
    }

    #[test]
    fn test_readout() {
        let readout = Readout::from_color(Hsl::new(0.0, 1.0, 0.5));
        assert_eq!(readout.hex, "#ff0000");
        assert_eq!(readout.rgb, "(255, 0, 0)");
        assert_eq!(readout.hsl, "(0, 100%, 50%)");
    }

    #[test]
    fn test_slider_positions_invert_mapping() {
        let positions = SliderPositions::from_color(Hsl::new(359.6, 0.75, 0.2));
        assert_eq!(positions, SliderPositions { hue: 0, saturation: 25, brightness: -30 });
    }

    #[test]
    fn test_live_preview() {
        let preview = LivePreview::new("#00ff00", 0.25);
        assert_eq!(preview.background, "rgba(0, 255, 0, 0.25)");
        assert_eq!(preview.label, "Color Preview: #00ff00");
    }

    #[test]
    fn test_recent_colors() {
        let mut recent = RecentColors::new(3);
        assert!(recent.push("#111111"));
        assert!(recent.push("#222222"));
        assert!(!recent.push("#111111"));
        assert!(recent.push("#333333"));
        assert!(recent.push("#AAAAAA"));

        let listed: Vec<_> = recent.iter().collect();
        assert_eq!(listed, vec!["#aaaaaa", "#333333", "#222222"]);

        recent.set_capacity(1);
        assert_eq!(recent.len(), 1);
        assert_eq!(recent.get(0), Some("#aaaaaa"));

        recent.set_capacity(0);
        assert!(!recent.push("#123456"));
        assert!(recent.is_empty());
    }
}
