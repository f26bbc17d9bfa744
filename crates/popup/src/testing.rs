//! Test doubles for the host seam.
//!
//! [`MockHost`] records every surface it is asked to open and lets tests
//! close them by hand, so session and coordinator behavior can be exercised
//! without a real renderer. Driven with a local executor, typically
//! `futures::executor::LocalPool`.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use flyout_core::geometry::{Rectangle, Size};
use flyout_core::menu::Link;
use futures::channel::oneshot;
use futures::future::LocalBoxFuture;

use crate::error::HostError;
use crate::host::{DialogHost, Outcome, SurfaceContent, SurfaceHandle, SurfaceSpec};
use crate::measure::TextMeasurer;
use crate::position::PanelPosition;
use crate::resolve::ResolvedItem;
use crate::session::SessionId;

/// Measures every character at a fixed advance.
#[derive(Debug, Clone, Copy)]
pub struct FixedTextMeasurer {
    advance: f32,
}

impl FixedTextMeasurer {
    /// Creates a measurer with the given per-character advance.
    #[must_use]
    pub fn new(advance: f32) -> Self {
        Self { advance }
    }
}

impl TextMeasurer for FixedTextMeasurer {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.advance
    }
}

/// One surface a [`MockHost`] was asked to open.
pub struct MockSurface {
    /// The session the surface belongs to.
    pub session: SessionId,
    /// The placement it was opened at.
    pub position: PanelPosition,
    /// The styling classes it was opened with.
    pub classes: Vec<String>,
    /// Whether a dismissing backdrop was requested.
    pub has_backdrop: bool,
    /// The resolved menu rows, empty for a template surface.
    pub rows: Vec<ResolvedItem>,
    bounds: Cell<Option<Rectangle>>,
    sender: RefCell<Option<oneshot::Sender<Outcome>>>,
    receiver: RefCell<Option<oneshot::Receiver<Outcome>>>,
    close_log: Rc<RefCell<Vec<SessionId>>>,
}

impl MockSurface {
    /// Pretends the host has laid the surface out at `bounds`.
    pub fn set_bounds(&self, bounds: Rectangle) {
        self.bounds.set(Some(bounds));
    }

    /// Whether the surface has been closed.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.sender.borrow().is_none()
    }
}

impl SurfaceHandle for Rc<MockSurface> {
    fn closed(&self) -> LocalBoxFuture<'static, Outcome> {
        let receiver = self.receiver.borrow_mut().take();
        Box::pin(async move {
            match receiver {
                Some(receiver) => receiver.await.unwrap_or(Outcome::Dismissed),
                None => Outcome::Dismissed,
            }
        })
    }

    fn bounds(&self) -> Option<Rectangle> {
        self.bounds.get()
    }

    fn reposition(&self, top: Option<f32>, left: Option<f32>) {
        // Reports post-move bounds, like a live layout would.
        if let Some(mut bounds) = self.bounds.get() {
            if let Some(top) = top {
                bounds.y = top;
            }
            if let Some(left) = left {
                bounds.x = left;
            }
            self.bounds.set(Some(bounds));
        }
    }

    fn close(&self, outcome: Outcome) {
        if let Some(sender) = self.sender.borrow_mut().take() {
            self.close_log.borrow_mut().push(self.session);
            let _ = sender.send(outcome);
        }
    }
}

/// A [`DialogHost`] that records surfaces instead of rendering them.
pub struct MockHost {
    viewport: Cell<Size>,
    surfaces: RefCell<Vec<Rc<MockSurface>>>,
    followed: RefCell<Vec<Link>>,
    close_log: Rc<RefCell<Vec<SessionId>>>,
    fail_next: Cell<bool>,
}

impl MockHost {
    /// Creates a host with the given viewport size.
    #[must_use]
    pub fn new(viewport: Size) -> Self {
        Self {
            viewport: Cell::new(viewport),
            surfaces: RefCell::new(Vec::new()),
            followed: RefCell::new(Vec::new()),
            close_log: Rc::new(RefCell::new(Vec::new())),
            fail_next: Cell::new(false),
        }
    }

    /// Makes the next [`DialogHost::open`] call fail.
    pub fn fail_next_open(&self) {
        self.fail_next.set(true);
    }

    /// Pretends the viewport was resized.
    pub fn set_viewport(&self, viewport: Size) {
        self.viewport.set(viewport);
    }

    /// Every surface opened so far, oldest first.
    #[must_use]
    pub fn surfaces(&self) -> Vec<Rc<MockSurface>> {
        self.surfaces.borrow().clone()
    }

    /// The most recently opened surface.
    #[must_use]
    pub fn last_surface(&self) -> Option<Rc<MockSurface>> {
        self.surfaces.borrow().last().cloned()
    }

    /// The links followed through this host.
    #[must_use]
    pub fn followed_links(&self) -> Vec<Link> {
        self.followed.borrow().clone()
    }

    /// Session ids in the order their surfaces closed.
    #[must_use]
    pub fn close_order(&self) -> Vec<SessionId> {
        self.close_log.borrow().clone()
    }
}

impl<T> DialogHost<T> for MockHost {
    type Handle = Rc<MockSurface>;

    fn open(
        &self,
        surface: SurfaceSpec<T>,
        position: PanelPosition,
        panel_classes: &[String],
        has_backdrop: bool,
    ) -> Result<Self::Handle, HostError> {
        if self.fail_next.take() {
            return Err(HostError::new("host refused to open surface"));
        }

        let rows = match surface.content {
            SurfaceContent::Menu { resolved, .. } => resolved,
            SurfaceContent::Template(_) => Vec::new(),
        };

        let (sender, receiver) = oneshot::channel();
        let opened = Rc::new(MockSurface {
            session: surface.session,
            position,
            classes: panel_classes.to_vec(),
            has_backdrop,
            rows,
            bounds: Cell::new(None),
            sender: RefCell::new(Some(sender)),
            receiver: RefCell::new(Some(receiver)),
            close_log: Rc::clone(&self.close_log),
        });

        self.surfaces.borrow_mut().push(Rc::clone(&opened));
        Ok(opened)
    }

    fn viewport(&self) -> Size {
        self.viewport.get()
    }

    fn follow_link(&self, link: &Link) {
        self.followed.borrow_mut().push(link.clone());
    }
}
