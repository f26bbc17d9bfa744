//! Popup configuration surface.
//!
//! All fields are optional in spirit: a `PopupConfig::default()` opens a
//! centered popup to the right of its anchor with no edge padding and the
//! standard arrow gap. Unknown keyword values coming from loosely-typed hosts
//! are treated as unset and reported on the log facade.

use bitflags::bitflags;

/// The side of the anchor a popup opens at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupPosition {
    /// Above the anchor.
    Top,
    /// To the right of the anchor.
    #[default]
    Right,
    /// Below the anchor.
    Bottom,
    /// To the left of the anchor.
    Left,
}

impl PopupPosition {
    /// Parses a keyword as used by loosely-typed host configuration.
    ///
    /// Unknown keywords fall back to the default and log a warning.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "top" => Self::Top,
            "right" => Self::Right,
            "bottom" => Self::Bottom,
            "left" => Self::Left,
            other => {
                log::warn!("unknown popup position keyword {other:?}; using default");
                Self::default()
            }
        }
    }

    /// Whether the popup opens on the horizontal axis of the anchor.
    #[must_use]
    pub const fn is_horizontal(self) -> bool {
        matches!(self, Self::Left | Self::Right)
    }
}

/// How a popup is aligned along the anchor's cross axis.
///
/// For [`PopupPosition::Left`]/[`PopupPosition::Right`] the alignment drives
/// the vertical coordinate; for top/bottom it drives the horizontal one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PopupAlignment {
    /// Centered on the anchor.
    #[default]
    Center,
    /// Flush with the anchor's leading edge.
    Start,
    /// Flush with the anchor's trailing edge.
    End,
    /// Entirely before the anchor's leading edge.
    BeforeStart,
    /// Entirely past the anchor's trailing edge.
    AfterEnd,
}

impl PopupAlignment {
    /// Parses a keyword as used by loosely-typed host configuration.
    ///
    /// Unknown keywords fall back to the default and log a warning.
    #[must_use]
    pub fn from_keyword(keyword: &str) -> Self {
        match keyword {
            "center" => Self::Center,
            "start" => Self::Start,
            "end" => Self::End,
            "beforestart" => Self::BeforeStart,
            "afterend" => Self::AfterEnd,
            other => {
                log::warn!("unknown popup alignment keyword {other:?}; using default");
                Self::default()
            }
        }
    }
}

bitflags! {
    /// The pointer gestures that may open a popup.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Triggers: u8 {
        /// A primary-button click.
        const CLICK = 1 << 0;
        /// A primary-button double click.
        const DOUBLE_CLICK = 1 << 1;
        /// The pointer entering the trigger element.
        const HOVER = 1 << 2;
        /// A secondary-button click or long press.
        const CONTEXT_MENU = 1 << 3;
    }
}

impl Default for Triggers {
    fn default() -> Self {
        Self::CONTEXT_MENU
    }
}

/// Configuration for opening an anchored popup.
#[derive(Debug, Clone, PartialEq)]
pub struct PopupConfig {
    /// The side of the anchor the popup opens at.
    pub position: PopupPosition,
    /// Cross-axis alignment; `None` picks the per-anchor default
    /// ([`PopupAlignment::Center`] for element anchors,
    /// [`PopupAlignment::Start`] for pointer anchors).
    pub alignment: Option<PopupAlignment>,
    /// Minimum distance kept from the viewport edges.
    ///
    /// `None` means 0 during initial placement and 12 during reflow.
    pub edge_padding: Option<f32>,
    /// Size of the arrow drawn between the anchor and the popup.
    pub arrow_size: f32,
    /// Gap between the anchor and the popup, in addition to the arrow.
    pub arrow_padding: f32,
    /// The gestures that open the popup.
    pub trigger: Triggers,
    /// Extra style classes applied to the rendered panel.
    pub custom_classes: Vec<String>,
}

impl Default for PopupConfig {
    fn default() -> Self {
        Self {
            position: PopupPosition::default(),
            alignment: None,
            edge_padding: None,
            arrow_size: 0.0,
            arrow_padding: 8.0,
            trigger: Triggers::default(),
            custom_classes: Vec::new(),
        }
    }
}

impl PopupConfig {
    /// Creates a [`PopupConfig`] with the documented defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the side of the anchor the popup opens at.
    #[must_use]
    pub fn position(mut self, position: PopupPosition) -> Self {
        self.position = position;
        self
    }

    /// Sets the cross-axis alignment.
    #[must_use]
    pub fn alignment(mut self, alignment: PopupAlignment) -> Self {
        self.alignment = Some(alignment);
        self
    }

    /// Sets the minimum distance kept from the viewport edges.
    #[must_use]
    pub fn edge_padding(mut self, padding: f32) -> Self {
        self.edge_padding = Some(padding);
        self
    }

    /// Sets the arrow size.
    #[must_use]
    pub fn arrow_size(mut self, size: f32) -> Self {
        self.arrow_size = size;
        self
    }

    /// Sets the gap between the anchor and the popup.
    #[must_use]
    pub fn arrow_padding(mut self, padding: f32) -> Self {
        self.arrow_padding = padding;
        self
    }

    /// Sets the gestures that open the popup.
    #[must_use]
    pub fn trigger(mut self, trigger: Triggers) -> Self {
        self.trigger = trigger;
        self
    }

    /// Adds a style class to the rendered panel.
    #[must_use]
    pub fn class(mut self, class: impl Into<String>) -> Self {
        self.custom_classes.push(class.into());
        self
    }

    /// The edge padding to use during initial placement.
    #[must_use]
    pub fn placement_padding(&self) -> f32 {
        self.edge_padding.unwrap_or(0.0)
    }

    /// The edge padding to use when nudging an already-open popup back
    /// on-screen.
    #[must_use]
    pub fn reflow_padding(&self) -> f32 {
        self.edge_padding.unwrap_or(12.0)
    }
}
