//! Core types for thumbnail rendering

use image::RgbImage;

/// Pixel dimensions a thumbnail is rendered to fit into
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ThumbnailSize {
    pub width: u32,
    pub height: u32,
}

impl ThumbnailSize {
    #[must_use]
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Scale that fits a page of the given bounds inside this size,
    /// preserving aspect ratio.
    #[must_use]
    pub fn fit_scale(self, page_width: f32, page_height: f32) -> f32 {
        if page_width <= 0.0 || page_height <= 0.0 {
            return 1.0;
        }
        let sx = self.width as f32 / page_width;
        let sy = self.height as f32 / page_height;
        sx.min(sy)
    }
}

impl Default for ThumbnailSize {
    fn default() -> Self {
        // Twice the logical strip cell (18x22)
        Self::new(36, 44)
    }
}

/// A rendered page preview.
#[derive(Clone)]
pub struct Thumbnail {
    /// Page number (0-indexed)
    pub page: usize,
    /// RGB pixels
    pub image: RgbImage,
}

impl Thumbnail {
    #[must_use]
    pub fn new(page: usize, image: RgbImage) -> Self {
        Self { page, image }
    }

    #[must_use]
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    #[must_use]
    pub fn height(&self) -> u32 {
        self.image.height()
    }
}

impl std::fmt::Debug for Thumbnail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Thumbnail")
            .field("page", &self.page)
            .field("width", &self.image.width())
            .field("height", &self.image.height())
            .finish_non_exhaustive()
    }
}

/// Complete ordered set of page previews, one slot per page.
///
/// A `None` slot is a placeholder for a page that failed to render.
/// The set is only ever built whole; consumers share it through an `Arc`
/// and never mutate it.
#[derive(Clone, Debug, Default)]
pub struct ThumbnailSet {
    slots: Vec<Option<Thumbnail>>,
}

impl ThumbnailSet {
    /// Build a set for a document with `page_count` pages.
    ///
    /// Extra slots are dropped and missing slots become placeholders, so
    /// the result always has exactly `page_count` entries.
    #[must_use]
    pub fn from_slots(mut slots: Vec<Option<Thumbnail>>, page_count: usize) -> Self {
        if slots.len() != page_count {
            log::warn!(
                "thumbnail batch has {} slots for {page_count} pages, normalizing",
                slots.len()
            );
            slots.resize_with(page_count, || None);
        }
        Self { slots }
    }

    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Thumbnail for a page, `None` for placeholders or out-of-range pages
    #[must_use]
    pub fn get(&self, page: usize) -> Option<&Thumbnail> {
        self.slots.get(page).and_then(Option::as_ref)
    }

    /// Number of slots holding a rendered image
    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    #[must_use]
    pub fn placeholder_count(&self) -> usize {
        self.len() - self.rendered_count()
    }

    pub fn iter(&self) -> impl Iterator<Item = Option<&Thumbnail>> {
        self.slots.iter().map(Option::as_ref)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn thumb(page: usize) -> Thumbnail {
        Thumbnail::new(page, RgbImage::new(4, 5))
    }

    #[test]
    fn fit_scale_uses_tighter_axis() {
        let size = ThumbnailSize::new(36, 44);
        // Letter page: height bound
        assert!((size.fit_scale(612.0, 792.0) - 44.0 / 792.0).abs() < f32::EPSILON);
        // Wide landscape page: width bound
        assert!((size.fit_scale(720.0, 100.0) - 0.05).abs() < 1e-6);
        assert_eq!(size.fit_scale(0.0, 100.0), 1.0);
    }

    #[test]
    fn short_batch_is_padded_with_placeholders() {
        let set = ThumbnailSet::from_slots(vec![Some(thumb(0))], 3);
        assert_eq!(set.len(), 3);
        assert_eq!(set.rendered_count(), 1);
        assert_eq!(set.placeholder_count(), 2);
        assert!(set.get(2).is_none());
    }

    #[test]
    fn long_batch_is_truncated() {
        let set = ThumbnailSet::from_slots(vec![Some(thumb(0)), Some(thumb(1))], 1);
        assert_eq!(set.len(), 1);
        assert_eq!(set.get(0).map(|t| t.page), Some(0));
    }

    #[test]
    fn empty_set_is_valid() {
        let set = ThumbnailSet::from_slots(Vec::new(), 0);
        assert!(set.is_empty());
        assert_eq!(set.placeholder_count(), 0);
    }
}
