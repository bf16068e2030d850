//! Canonical color state and change notification
//!
//! [`ColorState`] is the only place a color is stored. Everything else either
//! reads a [`ColorSnapshot`] or receives a [`ColorChange`] after a mutation.
//! Observers get a shared reference to the change and nothing else, so a
//! notification has no path back into the state.

use std::fmt::{self, Debug};

use crate::{colors::Hsl, event::SliderKind};

/// One of the two independently held colors
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Slot {
    #[default]
    Primary,
    Secondary,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::Primary, Slot::Secondary];

    pub fn other(self) -> Self {
        match self {
            Slot::Primary => Slot::Secondary,
            Slot::Secondary => Slot::Primary,
        }
    }

    fn index(self) -> usize {
        match self {
            Slot::Primary => 0,
            Slot::Secondary => 1,
        }
    }
}

/// The input surface a mutation came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    /// Pointer click or drag on the wheel
    Wheel,
    /// Arrow keys on the focused wheel
    Keyboard,
    /// One of the range inputs
    Slider(SliderKind),
    /// A hex text field
    HexField,
    /// A collaborator using the read/write contract
    External,
}

/// Immutable copy of the whole state
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorSnapshot {
    pub primary: Hsl,
    pub secondary: Hsl,
    pub active: Slot,
}

impl ColorSnapshot {
    pub fn get(&self, slot: Slot) -> Hsl {
        match slot {
            Slot::Primary => self.primary,
            Slot::Secondary => self.secondary,
        }
    }

    pub fn active_color(&self) -> Hsl {
        self.get(self.active)
    }
}

/// Emitted exactly once per accepted mutation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorChange {
    pub slot: Slot,
    pub color: Hsl,
    pub origin: Origin,
    pub snapshot: ColorSnapshot,
}

/// Receives color change notifications
pub trait ColorObserver {
    fn color_changed(&mut self, change: &ColorChange);
}

impl<F> ColorObserver for F
where
    F: FnMut(&ColorChange),
{
    fn color_changed(&mut self, change: &ColorChange) {
        self(change)
    }
}

/// Handle returned by [`ColorState::subscribe`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Per-slot canonical colors plus the active edit target
pub struct ColorState {
    slots: [Hsl; 2],
    active: Slot,
    observers: Vec<(SubscriptionId, Box<dyn ColorObserver>)>,
    next_id: u64,
}

impl ColorState {
    /// Both slots start at `initial`, primary slot active
    pub fn new(initial: Hsl) -> Self {
        let initial = initial.normalized();
        Self {
            slots: [initial; 2],
            active: Slot::Primary,
            observers: Vec::new(),
            next_id: 0,
        }
    }

    pub fn get(&self, slot: Slot) -> Hsl {
        self.slots[slot.index()]
    }

    pub fn active_slot(&self) -> Slot {
        self.active
    }

    /// Color of the active slot
    pub fn active(&self) -> Hsl {
        self.get(self.active)
    }

    pub fn snapshot(&self) -> ColorSnapshot {
        ColorSnapshot {
            primary: self.get(Slot::Primary),
            secondary: self.get(Slot::Secondary),
            active: self.active,
        }
    }

    /// Store a normalized color and notify every observer once
    pub fn set_from_hsl(&mut self, slot: Slot, hsl: Hsl, origin: Origin) -> ColorChange {
        let color = hsl.normalized();
        self.slots[slot.index()] = color;

        let change = ColorChange {
            slot,
            color,
            origin,
            snapshot: self.snapshot(),
        };
        tracing::trace!(?slot, ?origin, hex = %color.to_hex(), "color changed");

        for (_, observer) in &mut self.observers {
            observer.color_changed(&change);
        }
        change
    }

    /// Parse `#rrggbb` and store it; anything else is ignored without notification
    pub fn set_from_hex(&mut self, slot: Slot, hex: &str, origin: Origin) -> Option<ColorChange> {
        let Some(rgb) = crate::colors::Rgb::from_hex(hex) else {
            tracing::debug!(?slot, input = hex, "ignoring unparsable hex");
            return None;
        };
        Some(self.set_from_hsl(slot, rgb.to_hsl(), origin))
    }

    /// Retarget subsequent wheel/slider edits. Colors are untouched.
    pub fn set_active_slot(&mut self, slot: Slot) {
        self.active = slot;
    }

    pub fn subscribe(&mut self, observer: impl ColorObserver + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.observers.push((id, Box::new(observer)));
        id
    }

    /// Returns whether the subscription existed
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }
}

impl Default for ColorState {
    fn default() -> Self {
        Self::new(Hsl::BLACK)
    }
}

impl Debug for ColorState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ColorState")
            .field("primary", &self.slots[0])
            .field("secondary", &self.slots[1])
            .field("active", &self.active)
            .field("observers", &self.observers.len())
            .finish()
    }
}
