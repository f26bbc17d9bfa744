//! The essential ideas of flyout.
//!
//! This crate holds the pieces of the popup engine that have no opinion about
//! how anything is rendered: geometric primitives, the popup configuration
//! surface, the menu item model, and the label-markup parser. Everything here
//! is pure data plus a handful of callbacks; the lifecycle machinery lives in
//! `flyout_popup`.

pub mod config;
pub mod geometry;
pub mod menu;
pub mod mnemonic;

pub use config::{PopupAlignment, PopupConfig, PopupPosition, Triggers};
pub use geometry::{Point, Rectangle, Size};
pub use menu::{
    ActionFn, CallbackError, ItemKind, Link, LinkTarget, MenuItem, PredicateFn, ResolveError,
    ResolverFn, Template, TemplateSubmenu,
};
pub use mnemonic::{FormattedLabel, format_label};
