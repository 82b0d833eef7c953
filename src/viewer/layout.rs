//! Layout arithmetic for the pager and the thumbnail strip

use std::ops::Range;

use super::types::{Point, Rect, ScrollDirection, Size};

/// Logical size of one strip cell
pub const THUMBNAIL_CELL_SIZE: Size = Size::new(18.0, 22.0);

/// Gap between strip cells
pub const THUMBNAIL_CELL_SPACING: f32 = 2.0;

/// Horizontal inset applied on both sides of a full-width strip
pub const THUMBNAIL_WIDE_INSET: f32 = 6.0;

/// Page under a scroll offset along one axis, before clamping to the
/// document: `round(max(offset, 0) / extent)`.
///
/// A non-positive or non-finite extent (no layout yet) maps to page 0.
#[must_use]
pub fn candidate_index(offset: f32, extent: f32) -> usize {
    if !(extent > 0.0) || !extent.is_finite() || offset.is_nan() {
        return 0;
    }
    let pages = (offset.max(0.0) / extent).round();
    if pages >= usize::MAX as f32 {
        usize::MAX
    } else {
        pages as usize
    }
}

/// Clamp a candidate page into `[0, page_count)`
#[must_use]
pub fn clamp_index(candidate: usize, page_count: usize) -> usize {
    candidate.min(page_count.saturating_sub(1))
}

/// Current page for a pager content offset
#[must_use]
pub fn page_index_for_offset(
    offset: Point,
    viewport: Size,
    direction: ScrollDirection,
    page_count: usize,
) -> usize {
    clamp_index(
        candidate_index(direction.offset(offset), direction.extent(viewport)),
        page_count,
    )
}

/// Content offset that shows `page` filling the viewport
#[must_use]
pub fn offset_for_page(page: usize, viewport: Size, direction: ScrollDirection) -> Point {
    direction.point(page as f32 * direction.extent(viewport))
}

/// Layout policy of the thumbnail strip.
///
/// Cells are fixed-size and laid out left to right. When the strip is as
/// wide as the screen it gets symmetric insets, otherwise none.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StripLayout {
    pub cell_size: Size,
    pub spacing: f32,
    pub wide_inset: f32,
    pub screen_width: f32,
}

impl StripLayout {
    #[must_use]
    pub fn new(screen_width: f32) -> Self {
        Self {
            cell_size: THUMBNAIL_CELL_SIZE,
            spacing: THUMBNAIL_CELL_SPACING,
            wide_inset: THUMBNAIL_WIDE_INSET,
            screen_width,
        }
    }

    /// Horizontal inset on each side for a strip of `viewport_width`
    #[must_use]
    pub fn inset(&self, viewport_width: f32) -> f32 {
        if viewport_width >= self.screen_width {
            self.wide_inset
        } else {
            0.0
        }
    }

    fn pitch(&self) -> f32 {
        self.cell_size.width + self.spacing
    }

    #[must_use]
    pub fn cell_frame(&self, index: usize, viewport_width: f32) -> Rect {
        let x = self.inset(viewport_width) + index as f32 * self.pitch();
        Rect::new(x, 0.0, self.cell_size.width, self.cell_size.height)
    }

    /// Scrollable width of `count` cells including insets
    #[must_use]
    pub fn content_width(&self, count: usize, viewport_width: f32) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let cells = count as f32 * self.cell_size.width + (count - 1) as f32 * self.spacing;
        cells + 2.0 * self.inset(viewport_width)
    }

    #[must_use]
    pub fn max_scroll_offset(&self, count: usize, viewport_width: f32) -> f32 {
        (self.content_width(count, viewport_width) - viewport_width).max(0.0)
    }

    /// Cells intersecting the window `[scroll_x, scroll_x + viewport_width)`
    #[must_use]
    pub fn visible_range(&self, count: usize, scroll_x: f32, viewport_width: f32) -> Range<usize> {
        if count == 0 || !(viewport_width > 0.0) {
            return 0..0;
        }
        let inset = self.inset(viewport_width);
        let pitch = self.pitch();

        // Cell i spans [inset + i*pitch, inset + i*pitch + cell_width)
        let first = ((scroll_x - inset - self.cell_size.width) / pitch).floor() + 1.0;
        let end = ((scroll_x + viewport_width - inset) / pitch).ceil();

        let first = first.max(0.0) as usize;
        let end = (end.max(0.0) as usize).min(count);
        first.min(end)..end
    }

    #[must_use]
    pub fn is_visible(&self, index: usize, count: usize, scroll_x: f32, viewport_width: f32) -> bool {
        self.visible_range(count, scroll_x, viewport_width)
            .contains(&index)
    }

    /// Scroll offset that centers cell `index`, clamped to the content
    #[must_use]
    pub fn centered_offset(&self, index: usize, count: usize, viewport_width: f32) -> f32 {
        let frame = self.cell_frame(index, viewport_width);
        let offset = frame.mid_x() - viewport_width / 2.0;
        offset.clamp(0.0, self.max_scroll_offset(count, viewport_width))
    }

    /// Width the strip wants inside `available`: just wide enough for all
    /// cells, never wider than the space it is given.
    #[must_use]
    pub fn preferred_width(&self, count: usize, available: f32) -> f32 {
        if count == 0 {
            return 0.0;
        }
        let cells = count as f32 * self.cell_size.width + (count - 1) as f32 * self.spacing;
        cells.min(available.max(0.0))
    }
}

impl Default for StripLayout {
    fn default() -> Self {
        Self::new(crate::settings::DEFAULT_SCREEN_WIDTH)
    }
}
