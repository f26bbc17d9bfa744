//! The input events that ask for a popup.

use std::cell::Cell;

use flyout_core::config::Triggers;
use flyout_core::geometry::{Point, Rectangle};

/// What a popup is anchored to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Anchor {
    /// An on-screen element with real extent, such as the row or button that
    /// was interacted with.
    Element(Rectangle),
    /// A bare cursor location, as produced by a right click on empty space.
    Pointer(Point),
}

impl Anchor {
    /// The anchor as a rectangle. A pointer anchor becomes a degenerate
    /// rectangle of zero extent.
    #[must_use]
    pub fn bounds(&self) -> Rectangle {
        match self {
            Self::Element(bounds) => *bounds,
            Self::Pointer(point) => Rectangle::at(*point),
        }
    }

    /// Returns true for a bare cursor anchor.
    #[must_use]
    pub fn is_pointer(&self) -> bool {
        matches!(self, Self::Pointer(_))
    }
}

/// The gesture that fired.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerKind {
    /// A primary click.
    Click,
    /// A primary double click.
    DoubleClick,
    /// The pointer settled over the anchor.
    Hover,
    /// A secondary click or the keyboard menu key.
    ContextMenu,
}

impl TriggerKind {
    /// The [`Triggers`] flag this gesture corresponds to.
    #[must_use]
    pub fn as_flag(self) -> Triggers {
        match self {
            Self::Click => Triggers::CLICK,
            Self::DoubleClick => Triggers::DOUBLE_CLICK,
            Self::Hover => Triggers::HOVER,
            Self::ContextMenu => Triggers::CONTEXT_MENU,
        }
    }
}

/// An input event that may open a popup.
#[derive(Debug, Clone)]
pub struct TriggerEvent {
    /// The gesture that fired.
    pub kind: TriggerKind,
    /// What the popup anchors to.
    pub anchor: Anchor,
    default_prevented: Cell<bool>,
}

impl TriggerEvent {
    /// Creates a fresh, unconsumed trigger event.
    pub fn new(kind: TriggerKind, anchor: Anchor) -> Self {
        Self {
            kind,
            anchor,
            default_prevented: Cell::new(false),
        }
    }

    /// Marks the event as consumed so the host's default handling (native
    /// context menus, link navigation) is suppressed.
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    /// Whether [`TriggerEvent::prevent_default`] was called.
    #[must_use]
    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pointer_anchor_has_zero_extent() {
        let anchor = Anchor::Pointer(Point::new(40.0, 60.0));
        let bounds = anchor.bounds();

        assert!(anchor.is_pointer());
        assert_eq!(bounds.x, 40.0);
        assert_eq!(bounds.y, 60.0);
        assert_eq!(bounds.width, 0.0);
        assert_eq!(bounds.height, 0.0);
    }

    #[test]
    fn trigger_kinds_map_onto_their_flags() {
        assert!(Triggers::CONTEXT_MENU.contains(TriggerKind::ContextMenu.as_flag()));
        assert!(!Triggers::CONTEXT_MENU.contains(TriggerKind::Hover.as_flag()));

        let combined = Triggers::CLICK | Triggers::HOVER;
        assert!(combined.contains(TriggerKind::Click.as_flag()));
        assert!(combined.contains(TriggerKind::Hover.as_flag()));
        assert!(!combined.contains(TriggerKind::DoubleClick.as_flag()));
    }

    #[test]
    fn prevent_default_sticks() {
        let event = TriggerEvent::new(
            TriggerKind::ContextMenu,
            Anchor::Pointer(Point::ORIGIN),
        );

        assert!(!event.is_default_prevented());
        event.prevent_default();
        assert!(event.is_default_prevented());
    }
}
