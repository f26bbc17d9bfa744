//! One popup panel, from trigger to teardown.
//!
//! A [`PopupSession`] walks a fixed lifecycle:
//!
//! ```text
//! Pending -> Measuring -> Positioned -> Open -> Closing -> Closed
//! ```
//!
//! Every step is validated, so a session can never be opened twice or closed
//! before it exists. Sessions form a tree: opening a submenu spawns a child
//! session adopted by its parent, and closing a parent tears its children
//! down first.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use flyout_core::config::PopupConfig;
use flyout_core::geometry::Size;
use flyout_core::menu::{ItemKind, MenuItem, ResolveError, TemplateSubmenu};
use rustc_hash::FxHashSet;

use crate::error::PopupError;
use crate::host::{DialogHost, Outcome, SurfaceContent, SurfaceHandle, SurfaceSpec};
use crate::measure::BoundsEstimator;
use crate::position::{self, PanelPosition};
use crate::resolve::{self, ChildCache};
use crate::trigger::TriggerEvent;

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Created, not yet triggered.
    Pending,
    /// Estimating the panel's size.
    Measuring,
    /// Size known, placement chosen, surface not yet open.
    Positioned,
    /// The surface is on screen.
    Open,
    /// Tearing down; children close first.
    Closing,
    /// Gone. Terminal.
    Closed,
}

impl SessionState {
    fn can_become(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Measuring)
                | (Self::Measuring, Self::Positioned)
                | (Self::Positioned, Self::Open)
                | (Self::Measuring | Self::Positioned | Self::Open, Self::Closing)
                | (Self::Closing, Self::Closed)
        )
    }
}

static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(0);

/// Identifies one session for its whole lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SessionId(u64);

impl SessionId {
    fn next() -> Self {
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// The session-unique styling class attached to the session's panel.
    #[must_use]
    pub fn panel_class(self) -> String {
        format!("flyout-{}", self.0)
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// What a session's panel shows.
pub enum SessionContent<T> {
    /// A menu of items.
    Menu(Rc<Vec<MenuItem<T>>>),
    /// An opaque host template.
    Template(TemplateSubmenu),
}

impl<T> Clone for SessionContent<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Menu(items) => Self::Menu(Rc::clone(items)),
            Self::Template(template) => Self::Template(template.clone()),
        }
    }
}

/// One popup panel and everything needed to run it.
///
/// Wrap sessions in [`Rc`]; child spawning and the helpers in
/// [`crate::coordinator`] share them.
pub struct PopupSession<T, H: DialogHost<T>> {
    id: SessionId,
    host: Rc<H>,
    estimator: Rc<dyn BoundsEstimator<T>>,
    config: PopupConfig,
    context: Rc<T>,
    content: SessionContent<T>,
    state: Cell<SessionState>,
    handle: RefCell<Option<H::Handle>>,
    children: RefCell<Vec<Rc<PopupSession<T, H>>>>,
    cache: ChildCache<T>,
    resolving: RefCell<FxHashSet<usize>>,
    on_open_changed: Option<Rc<dyn Fn(bool)>>,
}

// Clears one row's in-flight marker when its resolution ends, even by
// cancellation. Other rows' markers are untouched.
struct ResolvingGuard<'a> {
    rows: &'a RefCell<FxHashSet<usize>>,
    index: usize,
}

impl Drop for ResolvingGuard<'_> {
    fn drop(&mut self) {
        let _ = self.rows.borrow_mut().remove(&self.index);
    }
}

impl<T, H: DialogHost<T>> PopupSession<T, H> {
    /// Creates a session in [`SessionState::Pending`].
    pub fn new(
        host: Rc<H>,
        estimator: Rc<dyn BoundsEstimator<T>>,
        config: PopupConfig,
        context: Rc<T>,
        content: SessionContent<T>,
    ) -> Self {
        Self {
            id: SessionId::next(),
            host,
            estimator,
            config,
            context,
            content,
            state: Cell::new(SessionState::Pending),
            handle: RefCell::new(None),
            children: RefCell::new(Vec::new()),
            cache: ChildCache::new(),
            resolving: RefCell::new(FxHashSet::default()),
            on_open_changed: None,
        }
    }

    /// Registers a callback observing the panel coming and going.
    ///
    /// Called with `true` right after the surface opens and `false` right
    /// after it closes.
    #[must_use]
    pub fn on_open_changed(mut self, callback: impl Fn(bool) + 'static) -> Self {
        self.on_open_changed = Some(Rc::new(callback));
        self
    }

    /// The session's identifier.
    #[must_use]
    pub fn id(&self) -> SessionId {
        self.id
    }

    /// Where the session is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// The placement configuration.
    #[must_use]
    pub fn config(&self) -> &PopupConfig {
        &self.config
    }

    /// The context the popup was opened for.
    #[must_use]
    pub fn context(&self) -> &Rc<T> {
        &self.context
    }

    /// Whether the children resolver of the given row is in flight.
    ///
    /// Hosts use this to show a busy indicator on the row. Rows resolve
    /// independently; one row finishing never clears another's marker.
    #[must_use]
    pub fn is_resolving(&self, index: usize) -> bool {
        self.resolving.borrow().contains(&index)
    }

    pub(crate) fn host(&self) -> &Rc<H> {
        &self.host
    }

    pub(crate) fn estimator(&self) -> &Rc<dyn BoundsEstimator<T>> {
        &self.estimator
    }

    pub(crate) fn menu_items(&self) -> Option<Rc<Vec<MenuItem<T>>>> {
        match &self.content {
            SessionContent::Menu(items) => Some(Rc::clone(items)),
            SessionContent::Template(_) => None,
        }
    }

    fn advance(&self, to: SessionState) -> Result<(), PopupError> {
        let from = self.state.get();
        if !from.can_become(to) {
            return Err(PopupError::InvalidTransition { from, to });
        }

        log::trace!("session {}: {from:?} -> {to:?}", self.id);
        self.state.set(to);
        Ok(())
    }

    fn notify_open(&self, open: bool) {
        if let Some(callback) = &self.on_open_changed {
            callback(open);
        }
    }

    /// Runs the session up to [`SessionState::Open`] for a trigger event.
    ///
    /// Consumes the event's default handling, measures the content, places
    /// the panel, and opens it through the host. A second call while the
    /// session is past [`SessionState::Pending`] fails with
    /// [`PopupError::AlreadyActive`] and leaves the session as it was.
    pub async fn open_at(&self, event: &TriggerEvent) -> Result<(), PopupError> {
        if self.state.get() != SessionState::Pending {
            return Err(PopupError::AlreadyActive);
        }

        event.prevent_default();
        self.advance(SessionState::Measuring)?;

        let measured = match &self.content {
            SessionContent::Menu(items) => {
                self.estimator.measure_items(items, &self.context).await
            }
            SessionContent::Template(template) => match (template.width, template.height) {
                (Some(width), Some(height)) => Ok(Size::new(width, height)),
                _ => self.estimator.measure_template(template).await,
            },
        };

        let anchor = event.anchor.bounds();
        let viewport = self.host.viewport();
        let placement = match measured {
            Ok(size) => position::resolve(anchor, size, &self.config, viewport),
            Err(error) => {
                log::warn!(
                    "session {}: size estimate unavailable ({error}), anchoring at trigger",
                    self.id
                );
                position::fallback_corner(anchor, Size::ZERO, viewport)
            }
        };

        self.advance(SessionState::Positioned)?;
        self.present(placement)
    }

    /// Runs the session up to [`SessionState::Open`] at a placement chosen
    /// by the caller, skipping measurement.
    ///
    /// Used for child panels, whose size is estimated before they are
    /// spawned.
    pub fn open_positioned(&self, placement: PanelPosition) -> Result<(), PopupError> {
        if self.state.get() != SessionState::Pending {
            return Err(PopupError::AlreadyActive);
        }

        self.advance(SessionState::Measuring)?;
        self.advance(SessionState::Positioned)?;
        self.present(placement)
    }

    /// Opens the surface at an already chosen placement.
    pub fn present(&self, placement: PanelPosition) -> Result<(), PopupError> {
        let content = match &self.content {
            SessionContent::Menu(items) => SurfaceContent::Menu {
                items: Rc::clone(items),
                resolved: resolve::resolve_items(items, &self.context),
            },
            SessionContent::Template(template) => SurfaceContent::Template(template.clone()),
        };

        let mut classes = self.config.custom_classes.clone();
        classes.push(self.id.panel_class());

        let handle = self.host.open(
            SurfaceSpec {
                session: self.id,
                content,
                context: Rc::clone(&self.context),
            },
            placement,
            &classes,
            true,
        )?;

        *self.handle.borrow_mut() = Some(handle);
        self.advance(SessionState::Open)?;
        self.notify_open(true);
        Ok(())
    }

    /// Waits for the surface to close and returns how it ended.
    ///
    /// Resolves whether the host closed the surface (dismissal) or the
    /// engine did (selection, cascade). After it resolves the session is
    /// [`SessionState::Closed`].
    pub async fn closed(&self) -> Outcome {
        // The future is taken outside the borrow so host callbacks can
        // reach the handle while we wait.
        let waiter = self.handle.borrow().as_ref().map(SurfaceHandle::closed);

        let Some(waiter) = waiter else {
            return Outcome::Dismissed;
        };

        let outcome = waiter.await;
        self.finish(outcome);
        outcome
    }

    /// Closes the surface now.
    ///
    /// Children close first, each as [`Outcome::Dismissed`]. Also abandons a
    /// session stuck before [`SessionState::Open`], such as one whose host
    /// refused to open a surface. Harmless on a session that has not started
    /// or is already closed.
    pub fn close(&self, outcome: Outcome) {
        self.finish(outcome);
    }

    fn finish(&self, outcome: Outcome) {
        let from = self.state.get();
        if !from.can_become(SessionState::Closing) {
            return;
        }
        let _ = self.advance(SessionState::Closing);

        for child in self.children.borrow_mut().drain(..) {
            child.close(Outcome::Dismissed);
        }

        if let Some(handle) = self.handle.borrow_mut().take() {
            handle.close(outcome);
        }

        let _ = self.advance(SessionState::Closed);
        if from == SessionState::Open {
            self.notify_open(false);
        }
    }

    /// Nudges an open panel back inside the viewport.
    ///
    /// Compares the surface's real bounds against the viewport and pulls
    /// any overflowing side back in, leaving the configured gap to the
    /// edge. Does nothing on a panel that already fits or a session that is
    /// not open, so calling it repeatedly is harmless.
    pub fn reflow(&self) {
        if self.state.get() != SessionState::Open {
            return;
        }

        let handle = self.handle.borrow();
        let Some(handle) = handle.as_ref() else {
            return;
        };
        let Some(bounds) = handle.bounds() else {
            return;
        };

        let viewport = self.host.viewport();
        let padding = self.config.reflow_padding();

        let top = (bounds.y + bounds.height > viewport.height)
            .then(|| viewport.height - (bounds.height + padding));
        let left = (bounds.x + bounds.width > viewport.width)
            .then(|| viewport.width - (bounds.width + padding));

        if top.is_some() || left.is_some() {
            handle.reposition(top, left);
        }
    }

    /// Produces the children a menu item would open.
    ///
    /// Static children are handed out directly. Resolver children are
    /// awaited, honoring the item's caching choice; while one resolution is
    /// in flight, re-activating the same row fails with
    /// [`PopupError::AlreadyActive`] instead of racing a second resolver.
    pub async fn resolve_children(
        &self,
        index: usize,
    ) -> Result<Rc<Vec<MenuItem<T>>>, PopupError> {
        let items = self
            .menu_items()
            .ok_or_else(|| ResolveError::new("template panels have no menu items"))?;

        if let Some(children) = items
            .get(index)
            .and_then(|item| resolve::known_children(item, index, &self.cache))
        {
            return Ok(children);
        }

        let Some(MenuItem {
            kind: ItemKind::Resolver {
                resolver,
                cache_resolved,
            },
            ..
        }) = items.get(index)
        else {
            return Err(ResolveError::new("item has no resolvable children").into());
        };

        if !self.resolving.borrow_mut().insert(index) {
            return Err(PopupError::AlreadyActive);
        }
        let _guard = ResolvingGuard {
            rows: &self.resolving,
            index,
        };

        let children = Rc::new(resolver(&self.context).await?);
        if *cache_resolved {
            self.cache.insert(index, Rc::clone(&children));
        }

        Ok(children)
    }

    pub(crate) fn adopt_child(&self, child: Rc<PopupSession<T, H>>) {
        self.children.borrow_mut().push(child);
    }

    pub(crate) fn release_child(&self, id: SessionId) {
        self.children.borrow_mut().retain(|child| child.id != id);
    }
}
