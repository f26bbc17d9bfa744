//! Anchored popup menus and tooltips for host-rendered surfaces.
//!
//! `flyout` computes everything about a popup except its pixels: where it
//! goes, how big it will be, which rows it shows, and when it opens and
//! closes. Rendering stays with a [`DialogHost`] you implement for your UI
//! stack.
//!
//! The crate is an umbrella over two members:
//!
//! - [`core`](crate::core) holds the passive model: geometry, placement
//!   configuration, the menu item tree, and label mnemonics.
//! - [`popup`] runs the model: measurement, placement, sessions, and
//!   nested-menu coordination.
//!
//! [`open_context_menu`] is the shortest path through all of it:
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use flyout::popup::testing::{FixedTextMeasurer, MockHost};
//! use flyout::popup::{RowEstimator, TriggerEvent, TriggerKind, Anchor};
//! use flyout::{MenuItem, Point, PopupConfig};
//!
//! # futures::executor::block_on(async {
//! let host = Rc::new(MockHost::new(flyout::Size::new(800.0, 600.0)));
//! let estimator = Rc::new(RowEstimator::new(FixedTextMeasurer::new(8.0)));
//!
//! let items = vec![
//!     MenuItem::action("Copy").on_activate(|text: &String| println!("copy {text}")),
//!     MenuItem::separator(),
//!     MenuItem::action("Paste"),
//! ];
//!
//! let event = TriggerEvent::new(
//!     TriggerKind::ContextMenu,
//!     Anchor::Pointer(Point::new(120.0, 80.0)),
//! );
//!
//! let outcome = flyout::open_context_menu(
//!     host,
//!     estimator,
//!     PopupConfig::default(),
//!     items,
//!     Rc::new(String::from("hello")),
//!     &event,
//! )
//! .await?;
//!
//! println!("menu ended: {outcome:?}");
//! # Ok::<(), flyout::popup::PopupError>(())
//! # });
//! ```

use std::rc::Rc;

pub use flyout_core as core;
pub use flyout_popup as popup;

pub use flyout_core::config::{PopupAlignment, PopupConfig, PopupPosition, Triggers};
pub use flyout_core::geometry::{Point, Rectangle, Size};
pub use flyout_core::menu::{ItemKind, Link, LinkTarget, MenuItem, Template, TemplateSubmenu};
pub use flyout_popup::host::{DialogHost, Outcome};
pub use flyout_popup::session::{PopupSession, SessionContent};

use flyout_popup::error::PopupError;
use flyout_popup::measure::BoundsEstimator;
use flyout_popup::trigger::TriggerEvent;

/// Opens a context menu and waits for it to finish.
///
/// Builds a session over `items`, opens it at the event's anchor, and
/// resolves once the menu closes, however deep the selection happened.
/// Row activation still goes through [`popup::activate_item`], driven by the
/// host's input handling.
pub async fn open_context_menu<T, H: DialogHost<T>>(
    host: Rc<H>,
    estimator: Rc<dyn BoundsEstimator<T>>,
    config: PopupConfig,
    items: Vec<MenuItem<T>>,
    context: Rc<T>,
    event: &TriggerEvent,
) -> Result<Outcome, PopupError> {
    let session = Rc::new(PopupSession::new(
        host,
        estimator,
        config,
        context,
        SessionContent::Menu(Rc::new(items)),
    ));

    session.open_at(event).await?;
    session.reflow();
    Ok(session.closed().await)
}

/// Opens a tooltip and hands back its running session.
///
/// The caller keeps the session and closes it when the hover ends:
///
/// ```ignore
/// let tooltip = flyout::open_tooltip(host, estimator, config, content, context, &event).await?;
/// // later, on pointer leave:
/// tooltip.close(Outcome::Dismissed);
/// ```
pub async fn open_tooltip<T, H: DialogHost<T>>(
    host: Rc<H>,
    estimator: Rc<dyn BoundsEstimator<T>>,
    config: PopupConfig,
    content: TemplateSubmenu,
    context: Rc<T>,
    event: &TriggerEvent,
) -> Result<Rc<PopupSession<T, H>>, PopupError> {
    let session = Rc::new(PopupSession::new(
        host,
        estimator,
        config,
        context,
        SessionContent::Template(content),
    ));

    session.open_at(event).await?;
    session.reflow();
    Ok(session)
}
