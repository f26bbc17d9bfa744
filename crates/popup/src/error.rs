//! Failures a popup session can surface.

use flyout_core::menu::ResolveError;

use crate::session::SessionState;

/// A failure reported by the dialog host.
#[derive(Debug, Clone, thiserror::Error)]
#[error("dialog host failed: {reason}")]
pub struct HostError {
    reason: String,
}

impl HostError {
    /// Creates a new [`HostError`] with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A failure produced while estimating panel bounds.
#[derive(Debug, Clone, thiserror::Error)]
#[error("bounds estimation failed: {reason}")]
pub struct MeasureError {
    reason: String,
}

impl MeasureError {
    /// Creates a new [`MeasureError`] with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Anything that can go wrong while running a popup session.
#[derive(Debug, Clone, thiserror::Error)]
pub enum PopupError {
    /// The dialog host refused to open or manipulate a surface.
    #[error(transparent)]
    Host(#[from] HostError),

    /// A submenu resolver failed, so its panel was not opened.
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    /// A lifecycle step was requested out of order.
    #[error("invalid session transition: {from:?} -> {to:?}")]
    InvalidTransition {
        /// The state the session was in.
        from: SessionState,
        /// The state that was requested.
        to: SessionState,
    },

    /// The session was asked to open while already past [`SessionState::Pending`].
    #[error("session is already active")]
    AlreadyActive,

    /// A child panel was requested from a session that is not open.
    #[error("parent session is not open")]
    ParentNotOpen,
}
