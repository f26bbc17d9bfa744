//! Panel placement.
//!
//! [`resolve`] implements the primary strategy: offset the panel from one
//! side of its anchor, align it along the other axis, then clamp both
//! coordinates into the viewport. [`fallback_corner`] is the coarse strategy
//! used when the panel's size is unknown, and [`submenu_position`] places a
//! child panel next to the row that opened it.

use flyout_core::config::{PopupAlignment, PopupConfig, PopupPosition};
use flyout_core::geometry::{Rectangle, Size};

/// Where a panel goes, expressed as offsets from the viewport edges.
///
/// Each side is independent; placement strategies set exactly one horizontal
/// and one vertical offset and leave the others `None`. Hosts apply the set
/// offsets and let the panel's own size determine the rest.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PanelPosition {
    /// Offset from the viewport's top edge.
    pub top: Option<f32>,
    /// Offset from the viewport's left edge.
    pub left: Option<f32>,
    /// Offset from the viewport's bottom edge.
    pub bottom: Option<f32>,
    /// Offset from the viewport's right edge.
    pub right: Option<f32>,
}

impl PanelPosition {
    /// A position anchored to the top-left corner.
    #[must_use]
    pub fn top_left(top: f32, left: f32) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            ..Self::default()
        }
    }
}

/// Clamps a panel coordinate into `[padding, max_extent - extent]`.
///
/// When the panel is larger than the viewport the two bounds cross; the
/// lower bound wins, so the panel overflows the far edge and its near edge
/// stays reachable.
fn clamp(coord: f32, extent: f32, max_extent: f32, padding: f32) -> f32 {
    coord.min(max_extent - extent).max(padding)
}

fn aligned(anchor_start: f32, anchor_extent: f32, extent: f32, alignment: PopupAlignment) -> f32 {
    match alignment {
        PopupAlignment::Start => anchor_start,
        PopupAlignment::End => anchor_start + anchor_extent - extent,
        PopupAlignment::BeforeStart => anchor_start - extent,
        PopupAlignment::AfterEnd => anchor_start + anchor_extent,
        PopupAlignment::Center => anchor_start + anchor_extent / 2.0 - extent / 2.0,
    }
}

/// Places a panel of known size relative to its anchor.
///
/// The panel sits on the configured side of the anchor, offset by the arrow
/// allowance, aligned along the perpendicular axis, and finally clamped into
/// the viewport. With no explicit alignment, element anchors center and
/// degenerate (pointer) anchors align to their start.
#[must_use]
pub fn resolve(
    anchor: Rectangle,
    size: Size,
    config: &PopupConfig,
    viewport: Size,
) -> PanelPosition {
    let alignment = config.alignment.unwrap_or(
        if anchor.width == 0.0 && anchor.height == 0.0 {
            PopupAlignment::Start
        } else {
            PopupAlignment::Center
        },
    );

    let offset = config.arrow_size + config.arrow_padding;
    let padding = config.placement_padding();

    let (x, y) = match config.position {
        PopupPosition::Right => (
            anchor.x + anchor.width + offset,
            aligned(anchor.y, anchor.height, size.height, alignment),
        ),
        PopupPosition::Left => (
            anchor.x - (size.width + offset),
            aligned(anchor.y, anchor.height, size.height, alignment),
        ),
        PopupPosition::Bottom => (
            aligned(anchor.x, anchor.width, size.width, alignment),
            anchor.y + anchor.height + offset,
        ),
        PopupPosition::Top => (
            aligned(anchor.x, anchor.width, size.width, alignment),
            anchor.y - (size.height + offset),
        ),
    };

    PanelPosition::top_left(
        clamp(y, size.height, viewport.height, padding),
        clamp(x, size.width, viewport.width, padding),
    )
}

/// Places a panel of unknown size at its anchor point.
///
/// Used when measurement fails. Each axis anchors to the viewport edge the
/// panel would grow away from, so however big the panel turns out to be it
/// grows into the viewport instead of out of it.
#[must_use]
pub fn fallback_corner(anchor: Rectangle, size: Size, viewport: Size) -> PanelPosition {
    let mut position = PanelPosition::default();

    if anchor.y + size.height > viewport.height {
        position.bottom = Some(viewport.height - anchor.y);
    } else {
        position.top = Some(anchor.y);
    }

    if anchor.x + size.width > viewport.width {
        position.right = Some(viewport.width - anchor.x);
    } else {
        position.left = Some(anchor.x);
    }

    position
}

/// Places a child panel next to the row that opened it.
///
/// The child opens to the right of the row, top-aligned. If it would clip
/// the bottom it snaps to the bottom edge; if it would clip the right it
/// flips to the row's left side.
#[must_use]
pub fn submenu_position(row: Rectangle, child: Size, viewport: Size) -> PanelPosition {
    let mut position = PanelPosition::default();

    if row.y + child.height > viewport.height {
        position.bottom = Some(0.0);
    } else {
        position.top = Some(row.y);
    }

    if row.x + row.width + child.width > viewport.width {
        position.left = Some(row.x - child.width);
    } else {
        position.left = Some(row.x + row.width);
    }

    position
}
