#![forbid(unsafe_code)]

//! # Chromasync
//!
//! Color-state synchronization for wheel, slider and hex color pickers.
//!
//! ## Overview
//!
//! One canonical HSL value per slot drives every surface that shows or edits
//! it:
//!
//! - **Single mutation path**: every edit goes through [`ColorState`], which
//!   notifies subscribers exactly once per accepted change
//! - **Passive surfaces**: sliders, readouts, previews and the gradient are
//!   refreshed from the change and never write back, so updates cannot loop
//! - **Cached wheel**: the hue/saturation disc is rendered once per diameter
//!   and only the selection ring is redrawn per frame
//! - **Throttled drags**: pointer moves are rate limited with a trailing edge
//!   so the final position always lands
//!
//! ## Core Components
//!
//! - [`Picker`]: the session, routing [`PickerInput`] to state and surfaces
//! - [`ColorState`]: the two color slots and their observers
//! - [`WheelRenderer`]: wheel bitmap with cached base gradient
//! - [`Throttle`]: trailing-edge rate limiter on an explicit clock
//! - [`App`] and [`Tui`]: a terminal host built on `ratatui` and `smol`
//!
//! ## Example Usage
//!
//! ```rust
//! use chromasync::{ColorChange, Picker, PickerConfig, PickerInput, Slot};
//! use std::time::Instant;
//!
//! let mut picker = Picker::new(&PickerConfig::default());
//! picker.resize(200);
//!
//! picker.subscribe(|change: &ColorChange| {
//!     println!("{:?} is now {}", change.slot, change.color.to_hex());
//! });
//!
//! picker.dispatch(
//!     PickerInput::HexField {
//!         slot: Slot::Primary,
//!         text: "#3366cc".to_string(),
//!     },
//!     Instant::now(),
//! );
//! assert_eq!(picker.active_color(), "#3366cc");
//! ```
//!
//! ## Error Handling
//!
//! Color math and state updates never fail; malformed input is ignored.
//! The terminal host and configuration report failures as [`ChromaError`]
//! diagnostics through [`ChromaResult`].

/// Re-exports of core components
pub use app::{App, Controller};
pub use colors::{is_valid_color_string, to_rgba, Hsl, Rgb, Rgba, Theme, ThemeColorize};
pub use config::PickerConfig;
pub use error::{ChromaError, ChromaResult};
pub use event::{Event, EventHandler, PickerInput, Point, SliderKind, WheelKey};
pub use state::{ColorChange, ColorObserver, ColorSnapshot, ColorState, Origin, Slot};
pub use sync::Picker;
pub use throttle::Throttle;
pub use tui::Tui;
pub use wheel::WheelRenderer;

/// Application orchestration module
pub mod app;
/// Color types, conversions and theme colors
pub mod colors;
/// Startup configuration
pub mod config;
/// Error types and handling
pub mod error;
/// Input events and the host event channel
pub mod event;
/// Passive surfaces bound to the color state
pub mod preview;
/// Canonical color slots and change notification
pub mod state;
/// Input routing between surfaces and state
pub mod sync;
/// Trailing-edge throttle
pub mod throttle;
/// Terminal interface management
pub mod tui;
/// Color wheel rendering and geometry
pub mod wheel;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::{cell::RefCell, rc::Rc, time::Instant};

    #[test]
    fn test_every_surface_follows_one_edit() {
        let mut picker = Picker::new(&PickerConfig::default());
        picker.resize(120);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        picker.subscribe(move |change: &ColorChange| {
            sink.borrow_mut().push(change.color.to_hex());
        });

        picker.dispatch(
            PickerInput::HexField {
                slot: Slot::Primary,
                text: "#00ff00".to_string(),
            },
            Instant::now(),
        );

        let surfaces = picker.surfaces();
        assert_eq!(*seen.borrow(), vec!["#00ff00".to_string()]);
        assert_eq!(surfaces.readout.hex, "#00ff00");
        assert_eq!(surfaces.sliders.hue, 120);
        assert!(surfaces.gradient.css().contains("rgba(0, 255, 0, 1)"));
        assert!(picker.render_wheel().is_some());
    }
}
