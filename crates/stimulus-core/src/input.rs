//! Keyboard modifier state sampled at draw time.
//!
//! The free-layout branch of image sizing depends on which modifier keys the
//! editor user holds while dragging. The host samples the keyboard once per
//! frame through a [`ModifierObserver`] and passes the resulting
//! [`Modifiers`] into the draw call, keeping layout a pure function of its
//! inputs.

use std::ops::BitOr;

/// Set of held modifier keys.
///
/// # Examples
///
/// ```
/// # use stimulus_core::input::Modifiers;
/// let held = Modifiers::CONTROL | Modifiers::SHIFT;
/// assert!(held.control());
/// assert!(!held.is_only(Modifiers::CONTROL));
/// assert!(Modifiers::ALT.is_only(Modifiers::ALT));
/// ```
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Modifiers {
    control: bool,
    alt: bool,
    shift: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        control: false,
        alt: false,
        shift: false,
    };
    pub const CONTROL: Modifiers = Modifiers {
        control: true,
        ..Modifiers::NONE
    };
    pub const ALT: Modifiers = Modifiers {
        alt: true,
        ..Modifiers::NONE
    };
    pub const SHIFT: Modifiers = Modifiers {
        shift: true,
        ..Modifiers::NONE
    };

    pub fn control(self) -> bool {
        self.control
    }

    pub fn alt(self) -> bool {
        self.alt
    }

    pub fn shift(self) -> bool {
        self.shift
    }

    /// Returns true if exactly the keys of `other` are held, nothing more.
    pub fn is_only(self, other: Modifiers) -> bool {
        self == other
    }
}

impl BitOr for Modifiers {
    type Output = Modifiers;

    fn bitor(self, rhs: Self) -> Self::Output {
        Modifiers {
            control: self.control || rhs.control,
            alt: self.alt || rhs.alt,
            shift: self.shift || rhs.shift,
        }
    }
}

/// Source of the current keyboard modifier state.
pub trait ModifierObserver {
    fn current_modifiers(&self) -> Modifiers;
}

/// Observer for hosts without a keyboard, such as batch rendering.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoModifiers;

impl ModifierObserver for NoModifiers {
    fn current_modifiers(&self) -> Modifiers {
        Modifiers::NONE
    }
}

impl ModifierObserver for Modifiers {
    fn current_modifiers(&self) -> Modifiers {
        *self
    }
}
