//! Thumbnail strip controller
//!
//! Shows one cell per page, marks the active page and keeps it scrolled
//! into view. The strip never navigates on its own: a tap is reported
//! upward as [`StripEffect::PageSelected`] and the active cell only
//! changes when the pager pushes the new index back down.

use std::sync::Arc;
use std::time::Duration;

use crate::pdf::{CacheError, DocumentSource, ThumbnailCache, ThumbnailSet};

use super::layout::StripLayout;
use super::types::{CellStyle, Color, Rect, Size};

/// Opacity of the active cell when no border colors are configured
pub const ACTIVE_OPACITY: f32 = 1.0;

/// Opacity of inactive cells when no border colors are configured
pub const INACTIVE_OPACITY: f32 = 0.2;

/// Border width used with border colors
pub const BORDER_WIDTH: f32 = 1.0;

/// Highlight policy for active/inactive thumbnails
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThumbnailStyle {
    pub active_border: Option<Color>,
    pub inactive_border: Option<Color>,
}

impl ThumbnailStyle {
    /// Borders when both colors are set, dimming otherwise
    #[must_use]
    pub fn cell_style(&self, active: bool) -> CellStyle {
        match (self.active_border, self.inactive_border) {
            (Some(active_color), Some(inactive_color)) => CellStyle::Border {
                color: if active { active_color } else { inactive_color },
                width: BORDER_WIDTH,
            },
            _ => CellStyle::Opacity(if active {
                ACTIVE_OPACITY
            } else {
                INACTIVE_OPACITY
            }),
        }
    }
}

/// What one strip cell shows
#[derive(Clone, Debug, PartialEq)]
pub struct ThumbnailCellView {
    pub index: usize,
    pub frame: Rect,
    /// False while thumbnails are pending or the page failed to render
    pub has_image: bool,
    pub active: bool,
    pub style: CellStyle,
}

/// Effects produced by strip operations
#[derive(Clone, Debug, PartialEq)]
pub enum StripEffect {
    /// Strip scrolled to a new offset
    ScrollTo { offset: f32, animated: bool },
    /// Visible cells were re-rendered
    Reloaded { generation: u64, cells: usize },
    /// User picked a page; the pager should navigate there
    PageSelected(usize),
}

pub struct ThumbnailStripController {
    page_count: usize,
    current_page_index: usize,
    page_images: Option<Arc<ThumbnailSet>>,
    cache: ThumbnailCache,
    layout: StripLayout,
    style: ThumbnailStyle,
    viewport: Size,
    scroll_offset: f32,
    rendered: Vec<ThumbnailCellView>,
    generation: u64,
}

impl ThumbnailStripController {
    #[must_use]
    pub fn new(
        page_count: usize,
        current_page_index: usize,
        layout: StripLayout,
        style: ThumbnailStyle,
        cache: ThumbnailCache,
    ) -> Self {
        Self {
            page_count,
            current_page_index,
            page_images: None,
            cache,
            layout,
            style,
            viewport: Size::default(),
            scroll_offset: 0.0,
            rendered: Vec::new(),
            generation: 0,
        }
    }

    /// Start background thumbnail generation for `document`
    pub fn start_thumbnails(&mut self, document: Arc<dyn DocumentSource>) -> Result<bool, CacheError> {
        self.cache.start(document)
    }

    /// Apply a finished thumbnail set if one has arrived
    pub fn poll_thumbnails(&mut self) -> Vec<StripEffect> {
        match self.cache.poll() {
            Some(set) => self.set_page_images(set),
            None => Vec::new(),
        }
    }

    /// Block until the thumbnail set arrives or `timeout` elapses
    pub fn wait_for_thumbnails(&mut self, timeout: Duration) -> Vec<StripEffect> {
        match self.cache.wait_for_delivery(timeout) {
            Some(set) => self.set_page_images(set),
            None => Vec::new(),
        }
    }

    /// Move the active marker to `index`.
    ///
    /// Scrolls (animated) to center the cell when it changed and is out of
    /// view, then re-renders the visible cells. Re-setting the current
    /// value never scrolls.
    pub fn set_current_page_index(&mut self, index: usize) -> Vec<StripEffect> {
        let changed = index != self.current_page_index;
        self.current_page_index = index;

        let mut effects = Vec::new();
        if changed && index < self.page_count && !self.is_cell_visible(index) {
            effects.push(self.scroll_to_center(index, true));
        }
        effects.push(self.reload());
        effects
    }

    /// Replace the thumbnail snapshot and re-render every visible cell
    pub fn set_page_images(&mut self, images: Arc<ThumbnailSet>) -> Vec<StripEffect> {
        if images.len() != self.page_count {
            log::warn!(
                "thumbnail set has {} slots for {} cells",
                images.len(),
                self.page_count
            );
        }
        self.page_images = Some(images);
        vec![self.reload()]
    }

    /// Strip resized; keep the active cell in view
    pub fn set_viewport(&mut self, viewport: Size) -> Vec<StripEffect> {
        self.viewport = viewport;
        self.scroll_offset = self
            .scroll_offset
            .clamp(0.0, self.layout.max_scroll_offset(self.page_count, viewport.width));

        let mut effects = Vec::new();
        if self.current_page_index < self.page_count && !self.is_cell_visible(self.current_page_index)
        {
            effects.push(self.scroll_to_center(self.current_page_index, false));
        }
        effects.push(self.reload());
        effects
    }

    /// User scrolled the strip
    pub fn did_scroll(&mut self, offset: f32) {
        self.scroll_offset = offset;
        self.render_visible();
    }

    /// User tapped cell `index`
    pub fn tap(&self, index: usize) -> Vec<StripEffect> {
        if index >= self.page_count {
            log::debug!("ignoring tap on thumbnail {index} of {}", self.page_count);
            return Vec::new();
        }
        vec![StripEffect::PageSelected(index)]
    }

    /// Cell contents for `index`, independent of visibility
    #[must_use]
    pub fn cell(&self, index: usize) -> Option<ThumbnailCellView> {
        if index >= self.page_count {
            return None;
        }
        let active = index == self.current_page_index;
        Some(ThumbnailCellView {
            index,
            frame: self.layout.cell_frame(index, self.viewport.width),
            has_image: self
                .page_images
                .as_ref()
                .is_some_and(|images| images.get(index).is_some()),
            active,
            style: self.style.cell_style(active),
        })
    }

    /// Number of cells; depends only on the page count
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.page_count
    }

    /// Cells produced by the last render pass
    #[must_use]
    pub fn visible_cells(&self) -> &[ThumbnailCellView] {
        &self.rendered
    }

    /// Number of full re-renders so far
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    #[must_use]
    pub fn current_page_index(&self) -> usize {
        self.current_page_index
    }

    #[must_use]
    pub fn page_images(&self) -> Option<&Arc<ThumbnailSet>> {
        self.page_images.as_ref()
    }

    #[must_use]
    pub fn scroll_offset(&self) -> f32 {
        self.scroll_offset
    }

    #[must_use]
    pub fn viewport(&self) -> Size {
        self.viewport
    }

    #[must_use]
    pub fn layout(&self) -> &StripLayout {
        &self.layout
    }

    #[must_use]
    pub fn cache(&self) -> &ThumbnailCache {
        &self.cache
    }

    /// Width the strip wants inside `available`
    #[must_use]
    pub fn preferred_width(&self, available: f32) -> f32 {
        self.layout.preferred_width(self.page_count, available)
    }

    fn is_cell_visible(&self, index: usize) -> bool {
        self.layout
            .is_visible(index, self.page_count, self.scroll_offset, self.viewport.width)
    }

    fn scroll_to_center(&mut self, index: usize, animated: bool) -> StripEffect {
        self.scroll_offset = self
            .layout
            .centered_offset(index, self.page_count, self.viewport.width);
        StripEffect::ScrollTo {
            offset: self.scroll_offset,
            animated,
        }
    }

    fn reload(&mut self) -> StripEffect {
        self.generation += 1;
        self.render_visible();
        StripEffect::Reloaded {
            generation: self.generation,
            cells: self.rendered.len(),
        }
    }

    fn render_visible(&mut self) {
        let range = self
            .layout
            .visible_range(self.page_count, self.scroll_offset, self.viewport.width);
        self.rendered = range.filter_map(|index| self.cell(index)).collect();
    }
}

#[cfg(test)]
mod tests {
    use image::RgbImage;

    use super::*;
    use crate::pdf::{Thumbnail, ThumbnailSize};

    const RED: Color = Color::rgb(255, 0, 0);
    const GRAY: Color = Color::rgb(128, 128, 128);

    fn strip(page_count: usize) -> ThumbnailStripController {
        let mut strip = ThumbnailStripController::new(
            page_count,
            0,
            StripLayout::new(1000.0),
            ThumbnailStyle::default(),
            ThumbnailCache::new(ThumbnailSize::new(4, 4), 1),
        );
        // 5 cells of pitch 20 fit exactly
        strip.set_viewport(Size::new(100.0, 22.0));
        strip
    }

    fn full_set(page_count: usize) -> Arc<ThumbnailSet> {
        let slots = (0..page_count)
            .map(|page| Some(Thumbnail::new(page, RgbImage::new(2, 2))))
            .collect();
        Arc::new(ThumbnailSet::from_slots(slots, page_count))
    }

    fn scrolls(effects: &[StripEffect]) -> usize {
        effects
            .iter()
            .filter(|e| matches!(e, StripEffect::ScrollTo { .. }))
            .count()
    }

    #[test]
    fn visible_target_does_not_scroll() {
        let mut strip = strip(50);
        let effects = strip.set_current_page_index(3);

        assert_eq!(scrolls(&effects), 0);
        assert!(matches!(effects.last(), Some(StripEffect::Reloaded { .. })));
        assert_eq!(strip.current_page_index(), 3);
    }

    #[test]
    fn offscreen_target_scrolls_centered_and_animated() {
        let mut strip = strip(50);
        let effects = strip.set_current_page_index(20);

        assert_eq!(
            effects[0],
            StripEffect::ScrollTo {
                offset: 359.0,
                animated: true
            }
        );
        assert!(strip.visible_cells().iter().any(|c| c.index == 20 && c.active));
    }

    #[test]
    fn same_index_never_scrolls() {
        let mut strip = strip(50);
        strip.did_scroll(600.0);
        // Index 0 is off screen now, but it is already current
        let effects = strip.set_current_page_index(0);

        assert_eq!(scrolls(&effects), 0);
        assert_eq!(strip.scroll_offset(), 600.0);
    }

    #[test]
    fn every_set_rerenders() {
        let mut strip = strip(10);
        let before = strip.generation();
        strip.set_current_page_index(1);
        strip.set_current_page_index(1);
        assert_eq!(strip.generation(), before + 2);
    }

    #[test]
    fn placeholders_before_delivery_keep_cell_count() {
        let mut strip = strip(5);
        assert_eq!(strip.cell_count(), 5);
        assert_eq!(strip.visible_cells().len(), 5);
        assert!(strip.visible_cells().iter().all(|c| !c.has_image));

        let effects = strip.set_page_images(full_set(5));
        assert_eq!(
            effects,
            vec![StripEffect::Reloaded {
                generation: strip.generation(),
                cells: 5
            }]
        );
        assert_eq!(strip.cell_count(), 5);
        assert!(strip.visible_cells().iter().all(|c| c.has_image));
    }

    #[test]
    fn borders_need_both_colors() {
        let both = ThumbnailStyle {
            active_border: Some(RED),
            inactive_border: Some(GRAY),
        };
        assert_eq!(
            both.cell_style(true),
            CellStyle::Border {
                color: RED,
                width: 1.0
            }
        );
        assert_eq!(
            both.cell_style(false),
            CellStyle::Border {
                color: GRAY,
                width: 1.0
            }
        );

        let only_active = ThumbnailStyle {
            active_border: Some(RED),
            inactive_border: None,
        };
        assert_eq!(only_active.cell_style(true), CellStyle::Opacity(1.0));
        assert_eq!(only_active.cell_style(false), CellStyle::Opacity(0.2));
    }

    #[test]
    fn tap_reports_without_moving_marker() {
        let strip = strip(5);
        assert_eq!(strip.tap(3), vec![StripEffect::PageSelected(3)]);
        assert_eq!(strip.current_page_index(), 0);
        assert!(strip.tap(5).is_empty());
    }

    #[test]
    fn empty_document_has_no_cells() {
        let mut strip = strip(0);
        assert_eq!(strip.cell_count(), 0);
        assert!(strip.tap(0).is_empty());
        let effects = strip.set_current_page_index(0);
        assert_eq!(scrolls(&effects), 0);
        assert!(strip.visible_cells().is_empty());
        assert!(strip.cell(0).is_none());
    }

    #[test]
    fn resize_brings_active_cell_back() {
        let mut strip = strip(50);
        strip.set_current_page_index(20);
        // Shrink so cell 20 falls outside the clamped offset window
        let effects = strip.set_viewport(Size::new(40.0, 22.0));

        assert!(effects
            .iter()
            .any(|e| matches!(e, StripEffect::ScrollTo { animated: false, .. })));
        assert!(strip.visible_cells().iter().any(|c| c.index == 20));
    }
}
