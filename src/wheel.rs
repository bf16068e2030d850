//! Hue/saturation wheel rasterization
//!
//! The disc gradient is expensive (one HSL conversion per pixel) and depends
//! only on the diameter, so it is cached and regenerated only when the
//! diameter changes. The selection ring is drawn on a copy of the cached base
//! every frame and never touches the cache.
//!
//! Angles follow the hit-testing convention: `atan2(dy, dx)` in screen
//! coordinates (y grows downward) plus 90°, so hue 0 points up and hue
//! increases clockwise on screen (90° to the right, 180° down). The same two
//! helpers, [`wheel_angle`] and [`indicator_offset`], are used for painting,
//! hit-testing and indicator placement, which keeps them exact inverses.

use crate::colors::{wrap_degrees, Hsl, Rgba};

/// Lightness of the wheel's base gradient
pub const WHEEL_LIGHTNESS: f64 = 0.5;

/// Default selection ring radius in pixels
pub const INDICATOR_RADIUS: f64 = 8.0;

/// Selection ring stroke width in pixels
pub const INDICATOR_STROKE: f64 = 2.0;

/// Square RGBA pixel buffer, row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Bitmap {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Bitmap {
    /// A fully transparent bitmap
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn get(&self, x: u32, y: u32) -> Option<Rgba> {
        self.index(x, y).map(|i| self.pixels[i])
    }

    pub fn set(&mut self, x: u32, y: u32, color: Rgba) {
        if let Some(i) = self.index(x, y) {
            self.pixels[i] = color;
        }
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    fn index(&self, x: u32, y: u32) -> Option<usize> {
        (x < self.width && y < self.height).then(|| y as usize * self.width as usize + x as usize)
    }
}

/// Hue in degrees for an offset from the wheel center
pub fn wheel_angle(dx: f64, dy: f64) -> f64 {
    wrap_degrees(dy.atan2(dx).to_degrees() + 90.0)
}

/// Offset from the wheel center for a hue and saturation; inverse of [`wheel_angle`]
pub fn indicator_offset(hue: f64, saturation: f64, radius: f64) -> (f64, f64) {
    let angle = (hue - 90.0).to_radians();
    let distance = radius * saturation;
    (distance * angle.cos(), distance * angle.sin())
}

/// Indicator center in bitmap pixels for a wheel of `diameter`
pub fn indicator_center(diameter: u32, color: Hsl) -> (f64, f64) {
    let radius = f64::from(diameter) / 2.0;
    let (dx, dy) = indicator_offset(color.h, color.s, radius);
    (radius + dx, radius + dy)
}

/// Renders the wheel with a diameter-keyed base cache
#[derive(Debug, Clone)]
pub struct WheelRenderer {
    /// Static gradient; its width is the diameter it was rendered for
    cache: Option<Bitmap>,
    /// Base plus indicator, reused between frames
    frame: Bitmap,
    indicator_radius: f64,
    regenerations: u64,
}

impl WheelRenderer {
    pub fn new(indicator_radius: f64) -> Self {
        Self {
            cache: None,
            frame: Bitmap::new(0, 0),
            indicator_radius,
            regenerations: 0,
        }
    }

    /// Produce a frame for `diameter` with the ring at `color`'s hue and saturation.
    ///
    /// Returns `None` when there is no geometry yet (`diameter == 0`).
    pub fn render(&mut self, diameter: u32, color: Hsl, stroke: Rgba) -> Option<&Bitmap> {
        if diameter == 0 {
            return None;
        }
        if self.cached_diameter() != Some(diameter) {
            self.regenerate(diameter);
        }

        let base = self.cache.as_ref()?;
        self.frame.clone_from(base);

        let (cx, cy) = indicator_center(diameter, color.normalized());
        draw_ring(&mut self.frame, cx, cy, self.indicator_radius, stroke);
        Some(&self.frame)
    }

    /// Diameter the cached base was rendered for
    pub fn cached_diameter(&self) -> Option<u32> {
        self.cache.as_ref().map(Bitmap::width)
    }

    /// The cached base gradient, without indicator
    pub fn base(&self) -> Option<&Bitmap> {
        self.cache.as_ref()
    }

    /// Number of full base regenerations so far
    pub fn regenerations(&self) -> u64 {
        self.regenerations
    }

    pub fn indicator_radius(&self) -> f64 {
        self.indicator_radius
    }

    /// Drop the cached base; the next render regenerates it
    pub fn invalidate(&mut self) {
        self.cache = None;
    }

    fn regenerate(&mut self, diameter: u32) {
        let mut base = Bitmap::new(diameter, diameter);
        let radius = f64::from(diameter) / 2.0;

        for y in 0..diameter {
            for x in 0..diameter {
                let dx = f64::from(x) + 0.5 - radius;
                let dy = f64::from(y) + 0.5 - radius;
                let distance = dx.hypot(dy);
                if distance <= radius {
                    let hsl = Hsl {
                        h: wheel_angle(dx, dy),
                        s: (distance / radius).min(1.0),
                        l: WHEEL_LIGHTNESS,
                    };
                    base.set(x, y, hsl.into());
                }
            }
        }

        self.cache = Some(base);
        self.regenerations += 1;
        tracing::debug!(diameter, regenerations = self.regenerations, "regenerated wheel base");
    }
}

impl Default for WheelRenderer {
    fn default() -> Self {
        Self::new(INDICATOR_RADIUS)
    }
}

/// Hollow ring of `INDICATOR_STROKE` width centered on `radius`
fn draw_ring(bitmap: &mut Bitmap, cx: f64, cy: f64, radius: f64, stroke: Rgba) {
    let half = INDICATOR_STROKE / 2.0;
    let reach = radius + half;

    let x0 = (cx - reach).floor().max(0.0) as u32;
    let y0 = (cy - reach).floor().max(0.0) as u32;
    let x1 = (cx + reach).ceil().min(f64::from(bitmap.width())) as u32;
    let y1 = (cy + reach).ceil().min(f64::from(bitmap.height())) as u32;

    for y in y0..y1 {
        for x in x0..x1 {
            let distance = (f64::from(x) + 0.5 - cx).hypot(f64::from(y) + 0.5 - cy);
            if (distance - radius).abs() <= half {
                bitmap.set(x, y, stroke);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::colors::Rgb;
    use pretty_assertions::assert_eq;

    fn ring_bounds(diameter: u32, color: Hsl) -> (f64, f64, f64) {
        let (cx, cy) = indicator_center(diameter, color);
        (cx, cy, INDICATOR_RADIUS + INDICATOR_STROKE)
    }

    fn outside(x: u32, y: u32, (cx, cy, reach): (f64, f64, f64)) -> bool {
        let px = f64::from(x) + 0.5;
        let py = f64::from(y) + 0.5;
        (px - cx).abs() > reach || (py - cy).abs() > reach
    }

    #[test]
    fn test_angle_convention() {
        let close = |a: f64, b: f64| (a - b).abs() < 1e-9 || (360.0 - (a - b).abs()) < 1e-9;

        assert!(close(wheel_angle(0.0, -10.0), 0.0));
        assert!(close(wheel_angle(10.0, 0.0), 90.0));
        assert!(close(wheel_angle(0.0, 10.0), 180.0));
        assert!(close(wheel_angle(-10.0, 0.0), 270.0));
    }

    #[test]
    fn test_indicator_offset_inverts_angle() {
        for hue in (0..360).step_by(15) {
            let hue = f64::from(hue);
            let (dx, dy) = indicator_offset(hue, 0.8, 50.0);
            assert!((dx.hypot(dy) - 40.0).abs() < 1e-9);
            let back = wheel_angle(dx, dy);
            let diff = (back - hue).abs();
            assert!(diff < 1e-9 || (360.0 - diff) < 1e-9, "{hue} -> {back}");
        }
    }

    #[test]
    fn test_zero_diameter_is_noop() {
        let mut wheel = WheelRenderer::default();
        assert!(wheel.render(0, Hsl::BLACK, Rgba::BLACK).is_none());
        assert_eq!(wheel.regenerations(), 0);
        assert_eq!(wheel.cached_diameter(), None);
    }

    #[test]
    fn test_base_gradient() {
        let mut wheel = WheelRenderer::default();
        wheel.render(101, Hsl::new(180.0, 0.0, 0.5), Rgba::BLACK);
        let base = wheel.base().unwrap();

        // Corners lie outside the disc
        assert!(base.get(0, 0).unwrap().is_transparent());
        assert!(base.get(100, 100).unwrap().is_transparent());

        // Top edge is hue 0 (red), right edge hue 90
        let top = base.get(50, 0).unwrap();
        assert_eq!(Rgb::new(top.r, top.g, top.b).to_hsl().h, 0.0);
        assert!(top.r > 240 && top.g < 10 && top.b < 10, "{top:?}");

        let right = base.get(100, 50).unwrap();
        let hsl = Rgb::new(right.r, right.g, right.b).to_hsl();
        assert_eq!(hsl.h, 90.0);

        // Center is unsaturated mid gray
        let center = base.get(50, 50).unwrap();
        assert!(center.r.abs_diff(center.g) <= 3 && center.g.abs_diff(center.b) <= 3);
    }

    #[test]
    fn test_cache_reused_across_color_changes() {
        let mut wheel = WheelRenderer::default();
        let first_color = Hsl::new(0.0, 0.5, 0.5);
        let second_color = Hsl::new(200.0, 0.9, 0.3);

        let first = wheel.render(96, first_color, Rgba::BLACK).unwrap().clone();
        let second = wheel.render(96, second_color, Rgba::BLACK).unwrap().clone();
        assert_eq!(wheel.regenerations(), 1);

        let base = wheel.base().unwrap();
        let a = ring_bounds(96, first_color);
        let b = ring_bounds(96, second_color);
        let mut compared = 0;
        for y in 0..96 {
            for x in 0..96 {
                if outside(x, y, a) && outside(x, y, b) {
                    assert_eq!(first.get(x, y), base.get(x, y));
                    assert_eq!(second.get(x, y), base.get(x, y));
                    compared += 1;
                }
            }
        }
        assert!(compared > 96 * 96 / 2);
        assert_ne!(first, second);
    }

    #[test]
    fn test_resize_invalidates_cache() {
        let mut wheel = WheelRenderer::default();

        wheel.render(64, Hsl::BLACK, Rgba::BLACK);
        wheel.render(64, Hsl::new(90.0, 1.0, 0.5), Rgba::BLACK);
        assert_eq!(wheel.regenerations(), 1);

        let frame = wheel.render(80, Hsl::BLACK, Rgba::BLACK).unwrap();
        assert_eq!((frame.width(), frame.height()), (80, 80));
        assert_eq!(wheel.regenerations(), 2);
        assert_eq!(wheel.cached_diameter(), Some(80));

        wheel.invalidate();
        wheel.render(80, Hsl::BLACK, Rgba::BLACK);
        assert_eq!(wheel.regenerations(), 3);
    }

    #[test]
    fn test_indicator_is_hollow_ring() {
        let mut wheel = WheelRenderer::default();
        let color = Hsl::new(0.0, 0.5, 0.5);
        let frame = wheel.render(100, color, Rgba::WHITE).unwrap().clone();
        let base = wheel.base().unwrap();

        let (cx, cy) = indicator_center(100, color);
        assert!((cx - 50.0).abs() < 1e-9 && (cy - 25.0).abs() < 1e-9);

        // Ring center keeps the gradient, the stroke sits at the radius
        assert_eq!(frame.get(50, 25), base.get(50, 25));
        assert_eq!(frame.get(57, 25), Some(Rgba::WHITE));
        assert_eq!(frame.get(42, 25), Some(Rgba::WHITE));
    }

    #[test]
    fn test_indicator_clipped_at_bitmap_edge() {
        let mut wheel = WheelRenderer::new(12.0);
        let frame = wheel.render(20, Hsl::new(45.0, 1.0, 0.5), Rgba::BLACK).unwrap();
        assert_eq!(frame.pixels().len(), 400);
    }
}
