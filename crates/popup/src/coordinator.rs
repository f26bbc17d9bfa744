//! Row activation and nested-menu coordination.
//!
//! [`activate_item`] is what a host calls when a menu row is clicked or
//! confirmed with the keyboard. Leaf rows run their action and close the
//! whole chain; submenu rows spawn a child session next to the row and wait
//! for it, cascading a child's selection back up through every ancestor.

use std::rc::Rc;

use flyout_core::geometry::{Rectangle, Size};
use flyout_core::menu::{ItemKind, MenuItem, ResolveError, TemplateSubmenu};

use crate::error::PopupError;
use crate::host::{DialogHost, Outcome};
use crate::position::submenu_position;
use crate::resolve::resolve_item;
use crate::session::{PopupSession, SessionContent, SessionState};

// Size assumed for a template child that declares no hints and cannot be
// measured. The panel still reflows once its real bounds exist.
const TEMPLATE_FALLBACK_SIZE: Size = Size {
    width: 300.0,
    height: 500.0,
};

/// Activates the menu row at `index` in an open session.
///
/// Separators and rows whose disabled predicate fires are ignored. A leaf
/// row runs its action, follows its link if it has one, and closes the
/// session as [`Outcome::Selected`]. A submenu row resolves its children,
/// opens them in a child session placed beside `row_bounds`, and waits:
///
/// - child dismissed: the child is released and this session stays open;
/// - child selected: this row's own action runs, then this session closes
///   as selected too, so the selection cascades to the root.
///
/// A failing children resolver aborts the activation and leaves the session
/// open; nothing is presented for the submenu.
pub async fn activate_item<T, H: DialogHost<T>>(
    session: &Rc<PopupSession<T, H>>,
    index: usize,
    row_bounds: Rectangle,
) -> Result<(), PopupError> {
    if session.state() != SessionState::Open {
        return Err(PopupError::ParentNotOpen);
    }

    let items = session
        .menu_items()
        .ok_or_else(|| ResolveError::new("template panels have no menu rows"))?;
    let Some(item) = items.get(index) else {
        log::warn!("session {}: no row at index {index}", session.id());
        return Ok(());
    };

    let context = session.context();
    let resolved = resolve_item(index, item, context);
    if resolved.separator || resolved.disabled {
        return Ok(());
    }

    if !item.has_children() {
        if let Some(action) = &item.action {
            action(context);
        }
        if let Some(link) = &item.link {
            session.host().follow_link(link);
        }
        session.close(Outcome::Selected);
        return Ok(());
    }

    let (content, size) = match &item.kind {
        ItemKind::Template(template) => {
            let size = template_size(session, template).await;
            (SessionContent::Template(template.clone()), size)
        }
        _ => {
            let children = session.resolve_children(index).await?;
            let size = menu_size(session, &children).await;
            (SessionContent::Menu(children), size)
        }
    };

    let placement = submenu_position(row_bounds, size, session.host().viewport());
    let child = Rc::new(PopupSession::new(
        Rc::clone(session.host()),
        Rc::clone(session.estimator()),
        session.config().clone(),
        Rc::clone(context),
        content,
    ));

    session.adopt_child(Rc::clone(&child));
    if let Err(error) = child.open_positioned(placement) {
        session.release_child(child.id());
        return Err(error);
    }

    let outcome = child.closed().await;
    session.release_child(child.id());

    if outcome.is_selected() {
        if let Some(action) = &item.action {
            action(context);
        }
        session.close(Outcome::Selected);
    }

    Ok(())
}

async fn menu_size<T, H: DialogHost<T>>(
    session: &Rc<PopupSession<T, H>>,
    children: &[MenuItem<T>],
) -> Size {
    match session
        .estimator()
        .measure_items(children, session.context())
        .await
    {
        Ok(size) => size,
        Err(error) => {
            log::warn!("session {}: child menu unmeasured: {error}", session.id());
            Size::ZERO
        }
    }
}

async fn template_size<T, H: DialogHost<T>>(
    session: &Rc<PopupSession<T, H>>,
    template: &TemplateSubmenu,
) -> Size {
    if let (Some(width), Some(height)) = (template.width, template.height) {
        return Size::new(width, height);
    }

    match session.estimator().measure_template(template).await {
        Ok(size) => size,
        Err(error) => {
            log::debug!(
                "session {}: template unmeasured ({error}), assuming {}x{}",
                session.id(),
                TEMPLATE_FALLBACK_SIZE.width,
                TEMPLATE_FALLBACK_SIZE.height,
            );
            Size {
                width: template.width.unwrap_or(TEMPLATE_FALLBACK_SIZE.width),
                height: template.height.unwrap_or(TEMPLATE_FALLBACK_SIZE.height),
            }
        }
    }
}
