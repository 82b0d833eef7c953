//! Pager state management

use super::chrome::{ChromeEvent, ChromeVisibility};
use super::layout::{clamp_index, offset_for_page, page_index_for_offset};
use super::types::{Point, ScrollDirection, Size};

/// Authoritative paging state for one open document
#[derive(Clone, Debug)]
pub struct PagerState {
    /// Total page count
    pub page_count: usize,

    /// Current page (0-indexed)
    pub current_page: usize,

    /// Axis the pages slide along
    pub direction: ScrollDirection,

    /// Pager viewport; every page cell has exactly this size
    pub viewport: Size,

    /// Live scroll position
    pub content_offset: Point,

    /// Chrome state
    pub chrome: ChromeVisibility,

    /// Discard zoom on the outgoing page when the page changes
    pub reset_zoom: bool,
}

impl PagerState {
    /// Create state opened at `initial_page` (clamped into the document)
    #[must_use]
    pub fn new(
        page_count: usize,
        initial_page: usize,
        direction: ScrollDirection,
        reset_zoom: bool,
    ) -> Self {
        Self {
            page_count,
            current_page: clamp_index(initial_page, page_count),
            direction,
            viewport: Size::default(),
            content_offset: Point::default(),
            chrome: ChromeVisibility::default(),
            reset_zoom,
        }
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::Scrolled(offset) => {
                self.content_offset = offset;
                self.follow_offset()
            }

            Command::ScrollEnded => self.chrome_event(ChromeEvent::ScrollEnded),

            Command::PageTapped => self.chrome_event(ChromeEvent::PageTapped),

            Command::SelectPage(page) => {
                if self.page_count == 0 {
                    return vec![];
                }
                let target = clamp_index(page, self.page_count);
                let offset = offset_for_page(target, self.viewport, self.direction);
                self.content_offset = offset;

                let mut effects = vec![Effect::ScrollTo {
                    offset,
                    animated: false,
                }];
                effects.extend(self.move_to(target));
                // Close the loop even when the page did not change
                if !effects.contains(&Effect::SyncStrip(target)) {
                    effects.push(Effect::SyncStrip(target));
                }
                effects
            }

            Command::Resize(viewport) => {
                self.viewport = viewport;
                if self.page_count == 0 {
                    self.content_offset = Point::default();
                    return vec![];
                }
                let offset = offset_for_page(self.current_page, viewport, self.direction);
                self.content_offset = offset;
                vec![
                    Effect::ReloadPage(self.current_page),
                    Effect::ScrollTo {
                        offset,
                        animated: false,
                    },
                    Effect::SyncStrip(self.current_page),
                ]
            }
        }
    }

    /// Re-derive the current page from the content offset
    fn follow_offset(&mut self) -> Vec<Effect> {
        if self.page_count == 0 || !(self.direction.extent(self.viewport) > 0.0) {
            return vec![];
        }
        let candidate = page_index_for_offset(
            self.content_offset,
            self.viewport,
            self.direction,
            self.page_count,
        );
        self.move_to(candidate)
    }

    fn move_to(&mut self, page: usize) -> Vec<Effect> {
        if page == self.current_page {
            return vec![];
        }
        let mut effects = Vec::with_capacity(2);
        if self.reset_zoom {
            effects.push(Effect::ReloadPage(self.current_page));
        }
        log::debug!("page {} -> {page}", self.current_page);
        self.current_page = page;
        effects.push(Effect::SyncStrip(page));
        effects
    }

    fn chrome_event(&mut self, event: ChromeEvent) -> Vec<Effect> {
        let next = self.chrome.next(event);
        if next == self.chrome {
            return vec![];
        }
        log::debug!("chrome {} -> {}", self.chrome.as_str(), next.as_str());
        self.chrome = next;
        vec![Effect::AnimateChrome(next)]
    }
}

/// Commands that modify pager state
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Command {
    /// Scroll position changed
    Scrolled(Point),
    /// Deceleration stopped
    ScrollEnded,
    /// Single tap on a page
    PageTapped,
    /// Navigate to a page (from the thumbnail strip)
    SelectPage(usize),
    /// Viewport size changed (rotation, window resize)
    Resize(Size),
}

/// Effects produced by state changes
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Re-render a page cell, discarding its zoom
    ReloadPage(usize),
    /// Move the pager to an offset
    ScrollTo { offset: Point, animated: bool },
    /// Push the current page down to the thumbnail strip
    SyncStrip(usize),
    /// Slide the chrome to a new state
    AnimateChrome(ChromeVisibility),
}
