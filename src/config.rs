//! Picker configuration

use std::time::Duration;

use crate::{
    colors::{Hsl, Rgb, Theme},
    error::{ChromaError, ChromaResult},
    preview::{GradientDirection, GradientKind},
    throttle::DEFAULT_INTERVAL,
    wheel::INDICATOR_RADIUS,
};

/// Default capacity of the recent colors list
pub const DEFAULT_MAX_RECENT_COLORS: usize = 5;

/// Hue nudge per arrow key, in degrees
pub const DEFAULT_HUE_STEP: f64 = 5.0;

/// Saturation nudge per arrow key
pub const DEFAULT_SATURATION_STEP: f64 = 0.05;

const ENV_DEFAULT: &str = "CHROMASYNC_DEFAULT";
const ENV_THEME: &str = "CHROMASYNC_THEME";
const ENV_THROTTLE_MS: &str = "CHROMASYNC_THROTTLE_MS";

/// Startup settings for a [`Picker`](crate::sync::Picker)
#[derive(Debug, Clone, PartialEq)]
pub struct PickerConfig {
    /// Initial color of both slots
    pub default_color: Hsl,
    /// Minimum spacing of pointer-move updates during a drag
    pub throttle_interval: Duration,
    /// Radius of the selection ring in wheel pixels
    pub indicator_radius: f64,
    pub hue_step: f64,
    pub saturation_step: f64,
    pub max_recent_colors: usize,
    pub theme: Theme,
    /// Preview and gradient opacity, `[0, 1]`
    pub opacity: f64,
    pub gradient_kind: GradientKind,
    pub gradient_direction: GradientDirection,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            default_color: Hsl::BLACK,
            throttle_interval: DEFAULT_INTERVAL,
            indicator_radius: INDICATOR_RADIUS,
            hue_step: DEFAULT_HUE_STEP,
            saturation_step: DEFAULT_SATURATION_STEP,
            max_recent_colors: DEFAULT_MAX_RECENT_COLORS,
            theme: Theme::default(),
            opacity: 1.0,
            gradient_kind: GradientKind::default(),
            gradient_direction: GradientDirection::default(),
        }
    }
}

impl PickerConfig {
    /// Defaults overridden by `CHROMASYNC_DEFAULT`, `CHROMASYNC_THEME` and
    /// `CHROMASYNC_THROTTLE_MS` when set
    pub fn from_env() -> ChromaResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with an injectable variable source
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ChromaResult<Self> {
        let mut config = Self::default();

        if let Some(hex) = lookup(ENV_DEFAULT) {
            config = config.with_default_hex(&hex)?;
        }

        if let Some(theme) = lookup(ENV_THEME) {
            let parsed = Theme::parse(&theme)
                .ok_or_else(|| ChromaError::config(ENV_THEME, theme.as_str(), "expected `light` or `dark`"))?;
            config.theme = parsed;
        }

        if let Some(ms) = lookup(ENV_THROTTLE_MS) {
            let parsed = ms.trim().parse::<u64>().map_err(|e| {
                ChromaError::config(ENV_THROTTLE_MS, ms.as_str(), format!("expected milliseconds: {}", e))
            })?;
            config.throttle_interval = Duration::from_millis(parsed);
        }

        Ok(config)
    }

    /// Set the initial color from `#rrggbb`; malformed input is an error here
    pub fn with_default_hex(mut self, hex: &str) -> ChromaResult<Self> {
        let rgb = Rgb::from_hex(hex.trim())
            .ok_or_else(|| ChromaError::config(ENV_DEFAULT, hex, "expected a #rrggbb color"))?;
        self.default_color = rgb.to_hsl();
        Ok(self)
    }

    pub fn with_default_color(mut self, color: Hsl) -> Self {
        self.default_color = color.normalized();
        self
    }

    pub fn with_throttle_interval(mut self, interval: Duration) -> Self {
        self.throttle_interval = interval;
        self
    }

    /// Non-positive or non-finite radii keep the previous value
    pub fn with_indicator_radius(mut self, radius: f64) -> Self {
        if radius.is_finite() && radius > 0.0 {
            self.indicator_radius = radius;
        }
        self
    }

    pub fn with_max_recent_colors(mut self, max: usize) -> Self {
        self.max_recent_colors = max;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_opacity(mut self, opacity: f64) -> Self {
        if opacity.is_finite() {
            self.opacity = opacity.clamp(0.0, 1.0);
        }
        self
    }

    pub fn with_gradient(mut self, kind: GradientKind, direction: GradientDirection) -> Self {
        self.gradient_kind = kind;
        self.gradient_direction = direction;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = PickerConfig::default();
        assert_eq!(config.default_color, Hsl::BLACK);
        assert_eq!(config.throttle_interval, Duration::from_millis(50));
        assert_eq!(config.indicator_radius, 8.0);
        assert_eq!(config.max_recent_colors, 5);
        assert_eq!(config.theme, Theme::Light);
    }

    #[test]
    fn test_from_lookup() {
        let config = PickerConfig::from_lookup(lookup(&[
            ("CHROMASYNC_DEFAULT", "#3366CC"),
            ("CHROMASYNC_THEME", "dark"),
            ("CHROMASYNC_THROTTLE_MS", "16"),
        ]))
        .unwrap();

        assert_eq!(config.default_color.to_hex(), "#3366cc");
        assert_eq!(config.theme, Theme::Dark);
        assert_eq!(config.throttle_interval, Duration::from_millis(16));
    }

    #[test]
    fn test_invalid_values_are_errors() {
        let bad_hex = PickerConfig::from_lookup(lookup(&[("CHROMASYNC_DEFAULT", "#fff")]));
        assert!(bad_hex.unwrap_err().to_string().contains("CHROMASYNC_DEFAULT"));

        let bad_theme = PickerConfig::from_lookup(lookup(&[("CHROMASYNC_THEME", "sepia")]));
        assert!(bad_theme.is_err());

        let bad_ms = PickerConfig::from_lookup(lookup(&[("CHROMASYNC_THROTTLE_MS", "fast")]));
        assert!(bad_ms.is_err());
    }

    #[test]
    fn test_builders_guard_ranges() {
        let config = PickerConfig::default()
            .with_indicator_radius(-3.0)
            .with_opacity(4.0)
            .with_default_color(Hsl { h: 400.0, s: 0.5, l: 0.5 });

        assert_eq!(config.indicator_radius, 8.0);
        assert_eq!(config.opacity, 1.0);
        assert_eq!(config.default_color.h, 40.0);
    }
}
