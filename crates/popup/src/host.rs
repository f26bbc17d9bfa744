//! The seam to whatever actually draws panels.
//!
//! The engine never renders. It hands a [`SurfaceSpec`] to a [`DialogHost`],
//! which materializes a floating surface and returns a [`SurfaceHandle`] the
//! session uses to observe, nudge, and tear the surface down.

use std::rc::Rc;

use flyout_core::geometry::{Rectangle, Size};
use flyout_core::menu::{Link, MenuItem, TemplateSubmenu};
use futures::future::LocalBoxFuture;

use crate::error::HostError;
use crate::position::PanelPosition;
use crate::resolve::ResolvedItem;
use crate::session::SessionId;

/// How a surface ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Outcome {
    /// The surface closed without a selection: dismissal, escape, a click
    /// elsewhere, or a parent tearing it down.
    #[default]
    Dismissed,
    /// A row was selected.
    Selected,
}

impl Outcome {
    /// Returns true if a row was selected.
    #[must_use]
    pub fn is_selected(self) -> bool {
        matches!(self, Self::Selected)
    }
}

/// What a surface shows.
pub enum SurfaceContent<T> {
    /// A menu: the items plus their per-open resolved render data.
    Menu {
        /// The items of the menu, in order.
        items: Rc<Vec<MenuItem<T>>>,
        /// One render record per item, same order.
        resolved: Vec<ResolvedItem>,
    },
    /// An opaque host template.
    Template(TemplateSubmenu),
}

/// Everything a host needs to materialize one surface.
pub struct SurfaceSpec<T> {
    /// The session the surface belongs to.
    pub session: SessionId,
    /// What the surface shows.
    pub content: SurfaceContent<T>,
    /// The context the popup was opened for.
    pub context: Rc<T>,
}

/// A floating surface under the engine's control.
pub trait SurfaceHandle {
    /// Resolves when the surface has closed, with how it ended.
    ///
    /// Single-shot: the session takes this future exactly once, right after
    /// opening.
    fn closed(&self) -> LocalBoxFuture<'static, Outcome>;

    /// The surface's current on-screen bounds, once the host has laid it
    /// out.
    fn bounds(&self) -> Option<Rectangle>;

    /// Moves the surface. Sides left `None` keep their current offset.
    fn reposition(&self, top: Option<f32>, left: Option<f32>);

    /// Closes the surface with the given outcome.
    fn close(&self, outcome: Outcome);
}

/// Renders floating surfaces on behalf of the engine.
pub trait DialogHost<T> {
    /// The host's handle type for an open surface.
    type Handle: SurfaceHandle;

    /// Opens a surface.
    ///
    /// `panel_classes` carries the configured styling classes plus one
    /// session-unique class; `has_backdrop` asks for a scrim that dismisses
    /// the surface when clicked.
    fn open(
        &self,
        surface: SurfaceSpec<T>,
        position: PanelPosition,
        panel_classes: &[String],
        has_backdrop: bool,
    ) -> Result<Self::Handle, HostError>;

    /// Current size of the viewport surfaces are placed in.
    fn viewport(&self) -> Size;

    /// Follows a link item's hyperlink.
    ///
    /// The default opens the URL with the platform handler and logs a
    /// failure rather than surfacing it, since the menu is already closing.
    fn follow_link(&self, link: &Link) {
        if let Err(error) = opener::open(&link.url) {
            log::error!("failed to open {}: {error}", link.url);
        }
    }
}
