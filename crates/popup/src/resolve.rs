//! Per-open evaluation of menu items.
//!
//! Item callbacks run once per open, when the panel is about to be shown,
//! and their answers are frozen into plain [`ResolvedItem`] records for the
//! host to render. A failing callback is logged and falls back to the
//! property's safe default instead of aborting the open.

use std::cell::RefCell;
use std::rc::Rc;

use flyout_core::menu::{ItemKind, MenuItem, PredicateFn};
use flyout_core::mnemonic::{FormattedLabel, format_label};
use rustc_hash::FxHashMap;

/// The render-ready view of one menu item.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedItem {
    /// Index of the item in its menu.
    pub index: usize,
    /// Whether the row is a separator.
    pub separator: bool,
    /// Whether the row is disabled for this open.
    pub disabled: bool,
    /// Whether the row is shown for this open.
    pub visible: bool,
    /// Whether activating the row opens a child panel.
    pub has_children: bool,
    /// The label with underline markup extracted, if the item has one.
    pub formatted_label: Option<FormattedLabel>,
}

fn evaluate<T>(predicate: Option<&PredicateFn<T>>, context: &T, default: bool, what: &str) -> bool {
    match predicate {
        None => default,
        Some(predicate) => match predicate(context) {
            Ok(value) => value,
            Err(error) => {
                log::warn!("{what} predicate failed, using default: {error}");
                default
            }
        },
    }
}

pub(crate) fn resolve_item<T>(index: usize, item: &MenuItem<T>, context: &T) -> ResolvedItem {
    ResolvedItem {
        index,
        separator: item.is_separator(),
        disabled: evaluate(item.is_disabled.as_ref(), context, false, "disabled"),
        visible: evaluate(item.is_visible.as_ref(), context, true, "visible"),
        has_children: item.has_children(),
        formatted_label: item.label.as_deref().map(format_label),
    }
}

/// Evaluates every item of a menu for one open.
pub fn resolve_items<T>(items: &[MenuItem<T>], context: &T) -> Vec<ResolvedItem> {
    items
        .iter()
        .enumerate()
        .map(|(index, item)| resolve_item(index, item, context))
        .collect()
}

/// Resolved submenu children, kept per parent session.
///
/// Only items that opted into caching land here; everything else resolves
/// fresh on each open.
pub(crate) struct ChildCache<T> {
    entries: RefCell<FxHashMap<usize, Rc<Vec<MenuItem<T>>>>>,
}

impl<T> ChildCache<T> {
    pub(crate) fn new() -> Self {
        Self {
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    pub(crate) fn get(&self, index: usize) -> Option<Rc<Vec<MenuItem<T>>>> {
        self.entries.borrow().get(&index).cloned()
    }

    pub(crate) fn insert(&self, index: usize, children: Rc<Vec<MenuItem<T>>>) {
        let _ = self.entries.borrow_mut().insert(index, children);
    }
}

/// Returns the static or cached children an item would open, if that can be
/// known without running a resolver.
pub(crate) fn known_children<T>(
    item: &MenuItem<T>,
    index: usize,
    cache: &ChildCache<T>,
) -> Option<Rc<Vec<MenuItem<T>>>> {
    match &item.kind {
        ItemKind::Submenu(children) => Some(Rc::new(children.clone())),
        ItemKind::Resolver { cache_resolved, .. } if *cache_resolved => cache.get(index),
        _ => None,
    }
}
