//! Panel size estimation.
//!
//! A panel has to be placed before the host has rendered it, so the engine
//! estimates its size up front. [`RowEstimator`] does this for menus from
//! fixed row heights and measured label widths; template panels rely on
//! declared size hints instead.

use std::rc::Rc;

use flyout_core::geometry::Size;
use flyout_core::menu::{MenuItem, TemplateSubmenu};
use futures::future::LocalBoxFuture;

use crate::error::MeasureError;

/// Fixed per-row heights of a rendered menu.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowMetrics {
    /// Height of a regular row.
    pub row_height: f32,
    /// Height of a separator row.
    pub separator_height: f32,
}

impl Default for RowMetrics {
    fn default() -> Self {
        Self {
            row_height: 24.0,
            separator_height: 2.0,
        }
    }
}

/// Measures rendered text, in the host's font.
pub trait TextMeasurer {
    /// Width of `text` when rendered as a menu label.
    fn text_width(&self, text: &str) -> f32;
}

impl<M: TextMeasurer + ?Sized> TextMeasurer for Rc<M> {
    fn text_width(&self, text: &str) -> f32 {
        (**self).text_width(text)
    }
}

/// Estimates the size of a panel before it exists.
///
/// Estimation is async because a host may need a layout pass to answer.
pub trait BoundsEstimator<T> {
    /// Estimated size of a menu panel showing `items`.
    fn measure_items<'a>(
        &'a self,
        items: &'a [MenuItem<T>],
        context: &'a T,
    ) -> LocalBoxFuture<'a, Result<Size, MeasureError>>;

    /// Estimated size of a template panel.
    ///
    /// Called only when the template declares no size hints.
    fn measure_template<'a>(
        &'a self,
        template: &'a TemplateSubmenu,
    ) -> LocalBoxFuture<'a, Result<Size, MeasureError>>;
}

/// Estimates menu panels as stacked fixed-height rows.
///
/// The width is taken from the visually longest label plus the longest
/// shortcut text; "longest" is judged by character count before measuring,
/// which is close enough for menu labels in a uniform font.
#[derive(Debug, Clone)]
pub struct RowEstimator<M> {
    measurer: M,
    metrics: RowMetrics,
}

impl<M: TextMeasurer> RowEstimator<M> {
    /// Creates an estimator with the default [`RowMetrics`].
    pub fn new(measurer: M) -> Self {
        Self {
            measurer,
            metrics: RowMetrics::default(),
        }
    }

    /// Overrides the per-row heights.
    #[must_use]
    pub fn metrics(mut self, metrics: RowMetrics) -> Self {
        self.metrics = metrics;
        self
    }

    fn estimate<T>(&self, items: &[MenuItem<T>]) -> Size {
        if items.is_empty() {
            return Size::ZERO;
        }

        let mut height = 0.0;
        for item in items {
            height += if item.is_separator() {
                self.metrics.separator_height
            } else {
                self.metrics.row_height
            };
        }

        // Separator labels are group headings, rendered narrow; they never
        // drive the panel width.
        let longest = |text: fn(&MenuItem<T>) -> Option<&str>| {
            items
                .iter()
                .filter(|item| !item.is_separator())
                .filter_map(text)
                .max_by_key(|label| label.chars().count())
        };

        let mut width = 0.0;
        if let Some(label) = longest(|item| item.label.as_deref()) {
            width += self.measurer.text_width(label);
        }
        if let Some(shortcut) = longest(|item| item.shortcut_label.as_deref()) {
            width += self.measurer.text_width(shortcut);
        }

        Size::new(width, height)
    }
}

impl<T, M: TextMeasurer> BoundsEstimator<T> for RowEstimator<M> {
    fn measure_items<'a>(
        &'a self,
        items: &'a [MenuItem<T>],
        _context: &'a T,
    ) -> LocalBoxFuture<'a, Result<Size, MeasureError>> {
        let size = self.estimate(items);
        Box::pin(async move { Ok(size) })
    }

    fn measure_template<'a>(
        &'a self,
        _template: &'a TemplateSubmenu,
    ) -> LocalBoxFuture<'a, Result<Size, MeasureError>> {
        Box::pin(async move {
            Err(MeasureError::new(
                "row estimation cannot size template content",
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;

    use crate::testing::FixedTextMeasurer;

    use super::*;

    fn estimator() -> RowEstimator<FixedTextMeasurer> {
        RowEstimator::new(FixedTextMeasurer::new(10.0))
    }

    #[test]
    fn rows_and_separators_stack() {
        let items: Vec<MenuItem<()>> = vec![
            MenuItem::action("Cut"),
            MenuItem::separator(),
            MenuItem::action("Paste"),
        ];

        let size = block_on(estimator().measure_items(&items, &())).unwrap();

        assert_eq!(size.height, 50.0);
    }

    #[test]
    fn width_comes_from_longest_label_and_shortcut() {
        let items: Vec<MenuItem<()>> = vec![
            MenuItem::action("Cut").shortcut_label("Ctrl+X"),
            MenuItem::action("Select All").shortcut_label("Ctrl+A"),
        ];

        let size = block_on(estimator().measure_items(&items, &())).unwrap();

        // "Select All" (10 chars) plus "Ctrl+X"/"Ctrl+A" (6 chars).
        assert_eq!(size.width, 160.0);
    }

    #[test]
    fn separator_labels_do_not_drive_width() {
        let items: Vec<MenuItem<()>> = vec![
            MenuItem::action("Cut"),
            MenuItem::labeled_separator("A much longer group heading"),
        ];

        let size = block_on(estimator().measure_items(&items, &())).unwrap();

        assert_eq!(size.width, 30.0);
        assert_eq!(size.height, 26.0);
    }

    #[test]
    fn empty_menus_measure_to_zero() {
        let items: Vec<MenuItem<()>> = Vec::new();

        let size = block_on(estimator().measure_items(&items, &())).unwrap();

        assert_eq!(size, Size::ZERO);
    }

    #[test]
    fn templates_are_not_row_measurable() {
        use flyout_core::menu::Template;

        let template = TemplateSubmenu {
            template: Template::new(()),
            width: None,
            height: None,
        };

        let estimator = estimator();
        let estimator: &dyn BoundsEstimator<()> = &estimator;
        assert!(block_on(estimator.measure_template(&template)).is_err());
    }
}
