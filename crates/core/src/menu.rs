//! The menu item model.
//!
//! A menu is an ordered sequence of [`MenuItem`]s, each of which is either a
//! separator, a plain activatable row, or one of three flavors of submenu:
//! children known up front, children resolved asynchronously on demand, or an
//! opaque host template. The flavor is carried by [`ItemKind`], so an item can
//! never be in more than one of those states at once.
//!
//! Items are generic over a context type `T`: the value describing what the
//! menu was opened for. Every callback receives it.
//!
//! ```
//! use flyout_core::menu::MenuItem;
//!
//! struct FileRow {
//!     path: String,
//! }
//!
//! let items: Vec<MenuItem<FileRow>> = vec![
//!     MenuItem::action("Open").on_activate(|row: &FileRow| {
//!         println!("opening {}", row.path);
//!     }),
//!     MenuItem::separator(),
//!     MenuItem::submenu(
//!         "Share",
//!         vec![MenuItem::action("Copy link"), MenuItem::action("Email")],
//!     ),
//! ];
//! ```

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use futures::future::LocalBoxFuture;

/// Callback invoked when a menu item is activated.
pub type ActionFn<T> = Rc<dyn Fn(&T)>;

/// Callback computing a per-open boolean property of a menu item.
///
/// Failures are caught by the resolver, reported on the log facade, and
/// replaced by the property's safe default; they never abort rendering.
pub type PredicateFn<T> = Rc<dyn Fn(&T) -> Result<bool, CallbackError>>;

/// Asynchronous loader for the children of a submenu item.
pub type ResolverFn<T> =
    Rc<dyn Fn(&T) -> LocalBoxFuture<'static, Result<Vec<MenuItem<T>>, ResolveError>>>;

/// A failure reported by a per-item callback.
#[derive(Debug, Clone, thiserror::Error)]
#[error("menu item callback failed: {reason}")]
pub struct CallbackError {
    reason: String,
}

impl CallbackError {
    /// Creates a new [`CallbackError`] with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// A failure produced by a submenu children resolver.
///
/// Unlike [`CallbackError`], this is not swallowed: an unresolved submenu is
/// not opened at all, since presenting it empty would mislead the user.
#[derive(Debug, Clone, thiserror::Error)]
#[error("submenu resolver failed: {reason}")]
pub struct ResolveError {
    reason: String,
}

impl ResolveError {
    /// Creates a new [`ResolveError`] with the given reason.
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// The `target` applied when a link item is followed.
///
/// Mirrors the DOM anchor targets `_self`, `_blank`, `_parent`, and `_top`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkTarget {
    /// Navigate the surface the menu lives in.
    #[default]
    Current,
    /// Open a new surface.
    Blank,
    /// Navigate the parent surface.
    Parent,
    /// Navigate the topmost surface.
    Top,
}

/// A hyperlink a menu item points at instead of (or in addition to) an
/// action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Link {
    /// The URL to follow.
    pub url: String,
    /// Where to open the URL.
    pub target: LinkTarget,
}

impl Link {
    /// Creates a [`Link`] with the default [`LinkTarget`].
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            target: LinkTarget::default(),
        }
    }

    /// Sets where the URL opens.
    #[must_use]
    pub fn target(mut self, target: LinkTarget) -> Self {
        self.target = target;
        self
    }
}

/// An opaque renderable handed through to the dialog host.
///
/// The engine never inspects a template; it only measures it (or uses the
/// declared size hints) and forwards it to the host for rendering. Hosts
/// downcast to whatever view type they put in.
#[derive(Clone)]
pub struct Template(Rc<dyn Any>);

impl Template {
    /// Wraps a host view in a [`Template`].
    pub fn new<V: 'static>(view: V) -> Self {
        Self(Rc::new(view))
    }

    /// Recovers the wrapped view, if it is a `V`.
    #[must_use]
    pub fn downcast_ref<V: 'static>(&self) -> Option<&V> {
        self.0.downcast_ref::<V>()
    }
}

impl fmt::Debug for Template {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Template(..)")
    }
}

/// A submenu rendered from an opaque host template.
#[derive(Debug, Clone)]
pub struct TemplateSubmenu {
    /// The renderable content of the child panel.
    pub template: Template,
    /// Declared width of the child panel, if known.
    pub width: Option<f32>,
    /// Declared height of the child panel, if known.
    pub height: Option<f32>,
}

/// The concrete flavor of a menu item.
pub enum ItemKind<T> {
    /// A visual divider. A labelled divider keeps the item's `label`.
    Separator,
    /// A plain activatable row with no children.
    Action,
    /// A submenu whose children are known up front.
    Submenu(Vec<MenuItem<T>>),
    /// A submenu whose children are loaded on demand.
    Resolver {
        /// The loader invoked when the submenu is opened.
        resolver: ResolverFn<T>,
        /// Whether children resolved once are reused on later opens.
        ///
        /// Off by default, so every open sees fresh data.
        cache_resolved: bool,
    },
    /// A submenu rendered from an opaque host template.
    Template(TemplateSubmenu),
}

impl<T> Clone for ItemKind<T> {
    fn clone(&self) -> Self {
        match self {
            Self::Separator => Self::Separator,
            Self::Action => Self::Action,
            Self::Submenu(children) => Self::Submenu(children.clone()),
            Self::Resolver {
                resolver,
                cache_resolved,
            } => Self::Resolver {
                resolver: Rc::clone(resolver),
                cache_resolved: *cache_resolved,
            },
            Self::Template(template) => Self::Template(template.clone()),
        }
    }
}

impl<T> fmt::Debug for ItemKind<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Separator => f.write_str("Separator"),
            Self::Action => f.write_str("Action"),
            Self::Submenu(children) => write!(f, "Submenu({} children)", children.len()),
            Self::Resolver { cache_resolved, .. } => {
                write!(f, "Resolver {{ cache_resolved: {cache_resolved} }}")
            }
            Self::Template(template) => template.fmt(f),
        }
    }
}

/// A single entry in a menu.
pub struct MenuItem<T> {
    /// Text label of the row. May carry `_x_` underline markup; see
    /// [`crate::mnemonic::format_label`].
    pub label: Option<String>,
    /// Icon identifier rendered on the leading side of the row.
    pub icon: Option<String>,
    /// Text shown for the item's keyboard shortcut.
    pub shortcut_label: Option<String>,
    /// Hyperlink followed when the item is activated.
    pub link: Option<Link>,
    /// Callback invoked when the item is activated.
    ///
    /// Never invoked for submenu flavors; activating those opens the child
    /// panel instead. It still runs when a descendant selection closes the
    /// chain through this item.
    pub action: Option<ActionFn<T>>,
    /// Per-open predicate deciding whether the row is disabled.
    pub is_disabled: Option<PredicateFn<T>>,
    /// Per-open predicate deciding whether the row is shown.
    pub is_visible: Option<PredicateFn<T>>,
    /// The flavor of the item.
    pub kind: ItemKind<T>,
}

impl<T> MenuItem<T> {
    fn with_kind(label: Option<String>, kind: ItemKind<T>) -> Self {
        Self {
            label,
            icon: None,
            shortcut_label: None,
            link: None,
            action: None,
            is_disabled: None,
            is_visible: None,
            kind,
        }
    }

    /// Creates a separator.
    #[must_use]
    pub fn separator() -> Self {
        Self::with_kind(None, ItemKind::Separator)
    }

    /// Creates a separator carrying a label.
    #[must_use]
    pub fn labeled_separator(label: impl Into<String>) -> Self {
        Self::with_kind(Some(label.into()), ItemKind::Separator)
    }

    /// Creates a plain activatable row.
    #[must_use]
    pub fn action(label: impl Into<String>) -> Self {
        Self::with_kind(Some(label.into()), ItemKind::Action)
    }

    /// Creates a submenu whose children are known up front.
    #[must_use]
    pub fn submenu(label: impl Into<String>, children: Vec<MenuItem<T>>) -> Self {
        Self::with_kind(Some(label.into()), ItemKind::Submenu(children))
    }

    /// Creates a submenu whose children are loaded on demand.
    ///
    /// The resolver runs on every open unless [`MenuItem::cache_resolved`] is
    /// turned on.
    #[must_use]
    pub fn resolved_submenu(
        label: impl Into<String>,
        resolver: impl Fn(&T) -> LocalBoxFuture<'static, Result<Vec<MenuItem<T>>, ResolveError>>
        + 'static,
    ) -> Self {
        Self::with_kind(
            Some(label.into()),
            ItemKind::Resolver {
                resolver: Rc::new(resolver),
                cache_resolved: false,
            },
        )
    }

    /// Creates a submenu rendered from an opaque host template.
    #[must_use]
    pub fn template_submenu(label: impl Into<String>, template: Template) -> Self {
        Self::with_kind(
            Some(label.into()),
            ItemKind::Template(TemplateSubmenu {
                template,
                width: None,
                height: None,
            }),
        )
    }

    /// Sets the icon identifier.
    #[must_use]
    pub fn icon(mut self, icon: impl Into<String>) -> Self {
        self.icon = Some(icon.into());
        self
    }

    /// Sets the keyboard shortcut text.
    #[must_use]
    pub fn shortcut_label(mut self, shortcut: impl Into<String>) -> Self {
        self.shortcut_label = Some(shortcut.into());
        self
    }

    /// Sets the hyperlink followed on activation.
    #[must_use]
    pub fn link(mut self, link: Link) -> Self {
        self.link = Some(link);
        self
    }

    /// Sets the activation callback.
    #[must_use]
    pub fn on_activate(mut self, action: impl Fn(&T) + 'static) -> Self {
        self.action = Some(Rc::new(action));
        self
    }

    /// Disables the row whenever the predicate returns `true`.
    #[must_use]
    pub fn disabled_when(self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.try_disabled_when(move |context| Ok(predicate(context)))
    }

    /// Fallible form of [`MenuItem::disabled_when`]. An `Err` is logged and
    /// the row stays enabled.
    #[must_use]
    pub fn try_disabled_when(
        mut self,
        predicate: impl Fn(&T) -> Result<bool, CallbackError> + 'static,
    ) -> Self {
        self.is_disabled = Some(Rc::new(predicate));
        self
    }

    /// Hides the row whenever the predicate returns `false`.
    #[must_use]
    pub fn visible_when(self, predicate: impl Fn(&T) -> bool + 'static) -> Self {
        self.try_visible_when(move |context| Ok(predicate(context)))
    }

    /// Fallible form of [`MenuItem::visible_when`]. An `Err` is logged and
    /// the row stays visible.
    #[must_use]
    pub fn try_visible_when(
        mut self,
        predicate: impl Fn(&T) -> Result<bool, CallbackError> + 'static,
    ) -> Self {
        self.is_visible = Some(Rc::new(predicate));
        self
    }

    /// Reuses resolver output across opens of this submenu.
    ///
    /// Only has an effect on [`ItemKind::Resolver`] items.
    #[must_use]
    pub fn cache_resolved(mut self, cache: bool) -> Self {
        if let ItemKind::Resolver { cache_resolved, .. } = &mut self.kind {
            *cache_resolved = cache;
        }
        self
    }

    /// Declares the size of a template child panel.
    ///
    /// Only has an effect on [`ItemKind::Template`] items.
    #[must_use]
    pub fn child_size(mut self, width: f32, height: f32) -> Self {
        if let ItemKind::Template(template) = &mut self.kind {
            template.width = Some(width);
            template.height = Some(height);
        }
        self
    }

    /// Returns true if this item is a separator.
    #[must_use]
    pub fn is_separator(&self) -> bool {
        matches!(self.kind, ItemKind::Separator)
    }

    /// Returns true if activating this item opens a child panel.
    #[must_use]
    pub fn has_children(&self) -> bool {
        matches!(
            self.kind,
            ItemKind::Submenu(_) | ItemKind::Resolver { .. } | ItemKind::Template(_)
        )
    }
}

impl<T> Clone for MenuItem<T> {
    fn clone(&self) -> Self {
        Self {
            label: self.label.clone(),
            icon: self.icon.clone(),
            shortcut_label: self.shortcut_label.clone(),
            link: self.link.clone(),
            action: self.action.clone(),
            is_disabled: self.is_disabled.clone(),
            is_visible: self.is_visible.clone(),
            kind: self.kind.clone(),
        }
    }
}

impl<T> fmt::Debug for MenuItem<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MenuItem")
            .field("label", &self.label)
            .field("kind", &self.kind)
            .field("has_action", &self.action.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn action_never_coexists_with_children_structurally() {
        let item: MenuItem<()> =
            MenuItem::submenu("Parent", vec![MenuItem::action("Child")]).on_activate(|()| {});

        // Both can be set; the kind decides which one activation honors.
        assert!(item.has_children());
        assert!(item.action.is_some());
    }

    #[test]
    fn cache_resolved_is_a_noop_on_non_resolver_items() {
        let item: MenuItem<()> = MenuItem::action("Leaf").cache_resolved(true);

        assert!(matches!(item.kind, ItemKind::Action));
    }

    #[test]
    fn child_size_applies_to_template_items_only() {
        let template: MenuItem<()> =
            MenuItem::template_submenu("Preview", Template::new("view")).child_size(320.0, 240.0);

        match template.kind {
            ItemKind::Template(t) => {
                assert_eq!(t.width, Some(320.0));
                assert_eq!(t.height, Some(240.0));
            }
            other => panic!("unexpected kind: {other:?}"),
        }

        let leaf: MenuItem<()> = MenuItem::action("Leaf").child_size(320.0, 240.0);
        assert!(matches!(leaf.kind, ItemKind::Action));
    }

    #[test]
    fn cloning_shares_callbacks() {
        use std::cell::Cell;

        let hits = Rc::new(Cell::new(0));
        let hits_in_action = Rc::clone(&hits);

        let item: MenuItem<()> = MenuItem::action("Leaf").on_activate(move |()| {
            hits_in_action.set(hits_in_action.get() + 1);
        });
        let copy = item.clone();

        if let Some(action) = &copy.action {
            action(&());
        }

        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn template_downcasts_to_its_view_type() {
        let template = Template::new(String::from("hello"));

        assert_eq!(template.downcast_ref::<String>().map(String::as_str), Some("hello"));
        assert!(template.downcast_ref::<u32>().is_none());
    }
}
