//! Color models and conversions.
//!
//! Provides a total (never failing) color math layer with:
//! - `Rgb` 8-bit triples and `Hsl`, the canonical continuous form
//! - Hex string parsing, formatting and validation
//! - `Rgba` pixel colors for bitmaps and terminal output
//! - Theme-dependent contrast colors and `owo-colors` styling helpers
//!
//! Invalid input yields `None` rather than an error: these functions run on
//! every keystroke of a live text field, where half-typed values are normal.

use owo_colors::OwoColorize;
use ratatui::style::Color as RatatuiColor;
use std::fmt::{self, Display};

/// An 8-bit RGB color, a derived view of [`Hsl`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Build from unbounded channel values, rounding and clamping each to 0..=255
    pub fn from_channels(r: f64, g: f64, b: f64) -> Self {
        Self::new(quantize(r), quantize(g), quantize(b))
    }

    /// Parse a `#rrggbb` string (case-insensitive).
    ///
    /// Short `#rgb` forms, a missing `#`, or any other shape return `None`.
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }

        let r = u8::from_str_radix(&digits[0..2], 16).ok()?;
        let g = u8::from_str_radix(&digits[2..4], 16).ok()?;
        let b = u8::from_str_radix(&digits[4..6], 16).ok()?;
        Some(Self::new(r, g, b))
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Convert to HSL. Hue is rounded to a whole degree in `[0, 360)`.
    pub fn to_hsl(&self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;

        // Achromatic: hue and saturation are undefined, pin them to zero.
        if max == min {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let delta = max - min;
        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let sector = if max == r {
            (g - b) / delta + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };

        Hsl {
            h: wrap_degrees((sector * 60.0).round()),
            s,
            l,
        }
    }

    /// Get the RGB components
    pub fn components(&self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

impl Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}

/// Hue/saturation/lightness, the canonical color form.
///
/// `h` is in degrees `[0, 360)`, `s` and `l` are in `[0, 1]`. Values built
/// through [`Hsl::new`] or [`Hsl::normalized`] always satisfy these bounds.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub const BLACK: Hsl = Hsl {
        h: 0.0,
        s: 0.0,
        l: 0.0,
    };

    /// Create a normalized HSL color
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }.normalized()
    }

    /// Wrap hue into `[0, 360)` and clamp saturation and lightness into `[0, 1]`.
    /// Non-finite components collapse to zero.
    pub fn normalized(self) -> Self {
        Self {
            h: wrap_degrees(finite_or_zero(self.h)),
            s: unit(self.s),
            l: unit(self.l),
        }
    }

    /// Convert to 8-bit RGB using the piecewise hue-to-channel algorithm
    pub fn to_rgb(&self) -> Rgb {
        let Hsl { h, s, l } = self.normalized();
        let h = h / 360.0;

        let q = if l < 0.5 {
            l * (1.0 + s)
        } else {
            l + s - l * s
        };
        let p = 2.0 * l - q;

        Rgb::from_channels(
            hue_to_channel(p, q, h + 1.0 / 3.0) * 255.0,
            hue_to_channel(p, q, h) * 255.0,
            hue_to_channel(p, q, h - 1.0 / 3.0) * 255.0,
        )
    }

    /// Shorthand for `to_rgb().to_hex()`
    pub fn to_hex(&self) -> String {
        self.to_rgb().to_hex()
    }

    pub fn with_hue(self, h: f64) -> Self {
        Self { h, ..self }.normalized()
    }

    pub fn with_saturation(self, s: f64) -> Self {
        Self { s, ..self }.normalized()
    }

    pub fn with_lightness(self, l: f64) -> Self {
        Self { l, ..self }.normalized()
    }
}

impl Display for Hsl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hsl({:.0}, {:.0}%, {:.0}%)",
            self.h,
            self.s * 100.0,
            self.l * 100.0
        )
    }
}

impl From<Rgb> for Hsl {
    fn from(rgb: Rgb) -> Self {
        rgb.to_hsl()
    }
}

impl From<Hsl> for Rgb {
    fn from(hsl: Hsl) -> Self {
        hsl.to_rgb()
    }
}

/// Strict `#rgb` / `#rrggbb` check, the gate for free-text color input
pub fn is_valid_color_string(s: &str) -> bool {
    match s.strip_prefix('#') {
        Some(digits) if matches!(digits.len(), 3 | 6) => {
            digits.bytes().all(|b| b.is_ascii_hexdigit())
        }
        _ => false,
    }
}

/// Compose a hex color and an opacity into `rgba(r, g, b, a)`.
///
/// Opacity is clamped to `[0, 1]`. Returns `None` for anything
/// [`Rgb::from_hex`] rejects.
pub fn to_rgba(hex: &str, opacity: f64) -> Option<String> {
    let rgb = Rgb::from_hex(hex)?;
    Some(format!(
        "rgba({}, {}, {}, {})",
        rgb.r,
        rgb.g,
        rgb.b,
        unit(opacity)
    ))
}

fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }

    if t < 1.0 / 6.0 {
        p + (q - p) * 6.0 * t
    } else if t < 1.0 / 2.0 {
        q
    } else if t < 2.0 / 3.0 {
        p + (q - p) * (2.0 / 3.0 - t) * 6.0
    } else {
        p
    }
}

fn quantize(v: f64) -> u8 {
    finite_or_zero(v).round().clamp(0.0, 255.0) as u8
}

fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

fn unit(v: f64) -> f64 {
    finite_or_zero(v).clamp(0.0, 1.0)
}

/// Wrap an angle into `[0, 360)`
pub(crate) fn wrap_degrees(deg: f64) -> f64 {
    let wrapped = deg.rem_euclid(360.0);
    // rem_euclid of a tiny negative value rounds up to exactly 360.0
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// An RGBA pixel, the unit of wheel bitmaps and terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::rgba(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);

    /// Create a new RGB color with full opacity
    #[inline]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Create a new RGBA color with specified alpha
    #[inline]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Get color with modified alpha
    pub fn with_alpha(&self, alpha: u8) -> Self {
        Self { a: alpha, ..*self }
    }

    /// Mix with another color by a specified amount (0.0-1.0)
    pub fn mix(&self, other: &Rgba, amount: f64) -> Self {
        let t = unit(amount);
        let lerp = |a: u8, b: u8| quantize(f64::from(a) * (1.0 - t) + f64::from(b) * t);
        Self::rgba(
            lerp(self.r, other.r),
            lerp(self.g, other.g),
            lerp(self.b, other.b),
            lerp(self.a, other.a),
        )
    }

    pub fn is_transparent(&self) -> bool {
        self.a == 0
    }

    /// Get the RGBA components
    pub fn components(&self) -> (u8, u8, u8, u8) {
        (self.r, self.g, self.b, self.a)
    }

    /// Convert to ratatui Color; alpha is dropped
    pub fn to_ratatui(&self) -> RatatuiColor {
        RatatuiColor::Rgb(self.r, self.g, self.b)
    }

    /// Convert to owo-colors RGB type
    pub fn to_owo_rgb(&self) -> owo_colors::Rgb {
        owo_colors::Rgb(self.r, self.g, self.b)
    }
}

impl From<Rgb> for Rgba {
    fn from(rgb: Rgb) -> Self {
        Self::rgb(rgb.r, rgb.g, rgb.b)
    }
}

impl From<Hsl> for Rgba {
    fn from(hsl: Hsl) -> Self {
        hsl.to_rgb().into()
    }
}

impl From<Rgba> for RatatuiColor {
    fn from(color: Rgba) -> Self {
        color.to_ratatui()
    }
}

impl From<Rgba> for owo_colors::Rgb {
    fn from(color: Rgba) -> Self {
        color.to_owo_rgb()
    }
}

/// Light or dark host theme. Only affects cosmetic contrast choices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Parse `"light"` or `"dark"`, ignoring case
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Stroke color of the wheel selection ring
    pub fn indicator_stroke(self) -> Rgba {
        match self {
            Self::Light => Rgba::BLACK,
            Self::Dark => Rgba::WHITE,
        }
    }

    /// Background for host surfaces
    pub fn background(self) -> Rgba {
        match self {
            Self::Light => palette::LIGHT_BASE,
            Self::Dark => palette::DARK_BASE,
        }
    }

    /// Foreground text for host surfaces
    pub fn foreground(self) -> Rgba {
        match self {
            Self::Light => palette::DARK_BASE,
            Self::Dark => palette::TEXT,
        }
    }
}

/// Fixed colors used by the terminal host
pub mod palette {
    use super::Rgba;

    pub const DARK_BASE: Rgba = Rgba::rgb(15, 18, 20); // #0F1214
    pub const LIGHT_BASE: Rgba = Rgba::rgb(246, 248, 250); // #F6F8FA
    pub const TEXT: Rgba = Rgba::rgb(230, 237, 243); // #E6EDF3
    pub const MUTED: Rgba = Rgba::rgb(139, 148, 158); // #8B949E
    pub const ACCENT: Rgba = Rgba::rgb(0, 228, 154); // #00E49A
    pub const ERROR: Rgba = Rgba::rgb(255, 46, 95); // #FF2E5F
}

/// Extension trait for styling terminal messages with the host palette
pub trait ThemeColorize: OwoColorize {
    /// Apply accent color
    #[inline]
    fn accent(self) -> String
    where
        Self: Sized + Display,
    {
        let (r, g, b, _) = palette::ACCENT.components();
        format!("{}", self.truecolor(r, g, b))
    }

    /// Apply muted text color
    #[inline]
    fn muted(self) -> String
    where
        Self: Sized + Display,
    {
        let (r, g, b, _) = palette::MUTED.components();
        format!("{}", self.truecolor(r, g, b))
    }

    /// Apply error color
    #[inline]
    fn error(self) -> String
    where
        Self: Sized + Display,
    {
        let (r, g, b, _) = palette::ERROR.components();
        format!("{}", self.truecolor(r, g, b))
    }

    /// Paint a swatch-like block in the given color
    #[inline]
    fn swatch(self, color: Rgb) -> String
    where
        Self: Sized + Display,
    {
        format!("{}", self.on_truecolor(color.r, color.g, color.b))
    }
}

impl<T: OwoColorize + Display> ThemeColorize for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rand::{rngs::StdRng, Rng, SeedableRng};

    #[test]
    fn test_hex_round_trip_sampled() {
        let mut rng = StdRng::seed_from_u64(0x5eed);
        for _ in 0..20_000 {
            let rgb = Rgb::new(rng.gen(), rng.gen(), rng.gen());
            assert_eq!(Rgb::from_hex(&rgb.to_hex()), Some(rgb));
        }

        for v in [0u8, 1, 127, 128, 254, 255] {
            let rgb = Rgb::new(v, v, v);
            assert_eq!(Rgb::from_hex(&rgb.to_hex()), Some(rgb));
        }
    }

    #[test]
    fn test_hex_formatting() {
        assert_eq!(Rgb::new(255, 128, 0).to_hex(), "#ff8000");
        assert_eq!(Rgb::new(0, 0, 0).to_hex(), "#000000");
        assert_eq!(Rgb::from_channels(300.0, -4.0, 127.5).to_hex(), "#ff0080");
        assert_eq!(Rgb::from_channels(f64::NAN, 0.4, 254.6).to_hex(), "#0000ff");
    }

    #[test]
    fn test_hex_parsing_is_strict() {
        assert_eq!(Rgb::from_hex("#FF8000"), Some(Rgb::new(255, 128, 0)));
        assert_eq!(Rgb::from_hex("#ff8000"), Some(Rgb::new(255, 128, 0)));

        for bad in ["ff8000", "#fff", "#ff80", "#ff80000", "#gg8000", "#+f8000", "", "#", " #ff8000"] {
            assert_eq!(Rgb::from_hex(bad), None, "{bad:?} should be rejected");
        }
    }

    #[test]
    fn test_hsl_to_rgb_channels_in_range() {
        let mut h = -720.0;
        while h <= 720.0 {
            for s in [-0.5, 0.0, 0.25, 0.5, 1.0, 1.5] {
                for l in [-0.1, 0.0, 0.3, 0.5, 0.8, 1.0, 2.0] {
                    // u8 output is range-checked by construction; this guards against panics
                    let rgb = Hsl { h, s, l }.to_rgb();
                    let back = rgb.to_hsl();
                    assert!((0.0..360.0).contains(&back.h));
                    assert!((0.0..=1.0).contains(&back.s));
                    assert!((0.0..=1.0).contains(&back.l));
                }
            }
            h += 7.5;
        }
    }

    #[test]
    fn test_primary_conversions() {
        assert_eq!(Hsl::new(0.0, 1.0, 0.5).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsl::new(120.0, 1.0, 0.5).to_rgb(), Rgb::new(0, 255, 0));
        assert_eq!(Hsl::new(240.0, 1.0, 0.5).to_rgb(), Rgb::new(0, 0, 255));
        assert_eq!(Hsl::new(360.0, 1.0, 0.5).to_rgb(), Rgb::new(255, 0, 0));
        assert_eq!(Hsl::new(-120.0, 1.0, 0.5).to_rgb(), Rgb::new(0, 0, 255));

        let blue = Rgb::new(0, 0, 255).to_hsl();
        assert_eq!(blue, Hsl { h: 240.0, s: 1.0, l: 0.5 });
    }

    #[test]
    fn test_achromatic_edge_cases() {
        assert_eq!(Rgb::new(0, 0, 0).to_hsl(), Hsl { h: 0.0, s: 0.0, l: 0.0 });
        assert_eq!(Rgb::new(255, 255, 255).to_hsl(), Hsl { h: 0.0, s: 0.0, l: 1.0 });

        let gray = Rgb::new(128, 128, 128).to_hsl();
        assert_eq!((gray.h, gray.s), (0.0, 0.0));
        assert_eq!(Hsl::new(200.0, 0.0, 0.5).to_rgb(), Rgb::new(128, 128, 128));
    }

    #[test]
    fn test_hue_is_whole_degrees() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..5_000 {
            let hsl = Rgb::new(rng.gen(), rng.gen(), rng.gen()).to_hsl();
            assert_eq!(hsl.h, hsl.h.round());
            assert!((0.0..360.0).contains(&hsl.h));
        }
    }

    #[test]
    fn test_wheel_colors_round_trip_within_quantization() {
        for h in 0..360 {
            let hsl = Hsl::new(f64::from(h), 1.0, 0.5);
            let first = hsl.to_rgb();
            let second = first.to_hsl().to_rgb();
            assert!(first.r.abs_diff(second.r) <= 1, "{hsl:?}: {first:?} vs {second:?}");
            assert!(first.g.abs_diff(second.g) <= 1, "{hsl:?}: {first:?} vs {second:?}");
            assert!(first.b.abs_diff(second.b) <= 1, "{hsl:?}: {first:?} vs {second:?}");
        }
    }

    #[test]
    fn test_normalization() {
        assert_eq!(Hsl::new(-5.0, 2.0, -1.0), Hsl { h: 355.0, s: 1.0, l: 0.0 });
        assert_eq!(Hsl::new(f64::NAN, f64::INFINITY, 0.5), Hsl { h: 0.0, s: 0.0, l: 0.5 });
        assert_eq!(Hsl::new(-1e-20, 0.5, 0.5).h, 0.0);
    }

    #[test]
    fn test_is_valid_color_string() {
        assert!(is_valid_color_string("#fff"));
        assert!(is_valid_color_string("#ffffff"));
        assert!(is_valid_color_string("#A0b1C2"));

        assert!(!is_valid_color_string("fff"));
        assert!(!is_valid_color_string("#ff"));
        assert!(!is_valid_color_string("#gggggg"));
        assert!(!is_valid_color_string("#ffff"));
        assert!(!is_valid_color_string(""));
    }

    #[test]
    fn test_to_rgba() {
        assert_eq!(to_rgba("#ff8000", 0.5).as_deref(), Some("rgba(255, 128, 0, 0.5)"));
        assert_eq!(to_rgba("#ff8000", 3.0).as_deref(), Some("rgba(255, 128, 0, 1)"));
        assert_eq!(to_rgba("#ff8000", -1.0).as_deref(), Some("rgba(255, 128, 0, 0)"));
        assert_eq!(to_rgba("#fff", 1.0), None);
        assert_eq!(to_rgba("nope", 1.0), None);
    }

    #[test]
    fn test_display() {
        assert_eq!(Rgb::new(1, 2, 3).to_string(), "rgb(1, 2, 3)");
        assert_eq!(Hsl::new(90.0, 1.0, 0.5).to_string(), "hsl(90, 100%, 50%)");
    }

    #[test]
    fn test_rgba_conversions() {
        let color = Rgba::rgb(255, 128, 0);
        assert_eq!(color.to_owo_rgb(), owo_colors::Rgb(255, 128, 0));
        assert_eq!(color.to_ratatui(), RatatuiColor::Rgb(255, 128, 0));
        assert_eq!(Rgba::from(Rgb::new(1, 2, 3)), Rgba::rgba(1, 2, 3, 255));
        assert_eq!(color.with_alpha(64).components(), (255, 128, 0, 64));
    }

    #[test]
    fn test_mix() {
        let mid = Rgba::BLACK.mix(&Rgba::WHITE, 0.5);
        assert_eq!(mid, Rgba::rgb(128, 128, 128));
        assert_eq!(Rgba::BLACK.mix(&Rgba::WHITE, 2.0), Rgba::WHITE);
    }

    #[test]
    fn test_theme() {
        assert_eq!(Theme::Dark.indicator_stroke(), Rgba::WHITE);
        assert_eq!(Theme::Light.indicator_stroke(), Rgba::BLACK);
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::parse(" DARK "), Some(Theme::Dark));
        assert_eq!(Theme::parse("sepia"), None);
    }

    #[test]
    fn test_theme_colorize() {
        let colored = "Test".accent();
        assert!(colored.contains("\x1b["));
        assert!("Test".error().contains("\x1b["));
    }
}
