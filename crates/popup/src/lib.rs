//! Anchored popup sessions and nested menus.
//!
//! This crate turns the passive model types of [`flyout_core`] into running
//! popups. The pieces, roughly in the order a popup passes through them:
//!
//! - [`trigger`] captures the input event that asked for a popup and the
//!   anchor it points at.
//! - [`measure`] estimates how big the panel will be before it exists.
//! - [`position`] picks where the panel goes, clamped to the viewport.
//! - [`resolve`] evaluates per-item callbacks into plain render data.
//! - [`session`] owns one panel from trigger to teardown.
//! - [`coordinator`] reacts to row activation, opening child sessions and
//!   cascading selection back up the chain.
//! - [`host`] is the seam to whatever actually draws panels.
//!
//! Everything here is single-threaded. Sessions are [`std::rc::Rc`]-shared
//! and callbacks need not be `Send`; drive the futures on a local executor.

pub mod coordinator;
pub mod error;
pub mod host;
pub mod measure;
pub mod position;
pub mod resolve;
pub mod session;
pub mod testing;
pub mod trigger;

pub use coordinator::activate_item;
pub use error::{HostError, MeasureError, PopupError};
pub use host::{DialogHost, Outcome, SurfaceContent, SurfaceHandle, SurfaceSpec};
pub use measure::{BoundsEstimator, RowEstimator, RowMetrics, TextMeasurer};
pub use position::{PanelPosition, fallback_corner, submenu_position};
pub use resolve::{ResolvedItem, resolve_items};
pub use session::{PopupSession, SessionContent, SessionId, SessionState};
pub use trigger::{Anchor, TriggerEvent, TriggerKind};
