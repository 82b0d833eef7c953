//! Page sync controller - owns the current page and drives pager, strip
//! and chrome from the interactive thread

use std::sync::Arc;
use std::time::Duration;

use crate::pdf::{CacheError, DocumentInfo, DocumentSource, ThumbnailCache, ThumbnailSize};

use super::chrome::{CHROME_ANIMATION, ChromeLayout, ChromeMetrics, ChromeVisibility};
use super::layout::{StripLayout, offset_for_page};
use super::pager::{Command, Effect, PagerState};
use super::strip::{StripEffect, ThumbnailStripController, ThumbnailStyle};
use super::types::{Point, Rect, ScrollDirection, Size};

/// Zoom scale of a page cell that has not been zoomed
pub const DEFAULT_ZOOM: f32 = 1.0;

/// Viewer configuration
#[derive(Clone, Debug)]
pub struct ViewerOptions {
    pub scroll_direction: ScrollDirection,
    pub reset_zoom_on_page_change: bool,
    pub thumbnails_enabled: bool,
    pub initial_page: usize,
    pub strip_layout: StripLayout,
    pub thumbnail_style: ThumbnailStyle,
    pub thumbnail_size: ThumbnailSize,
    pub thumbnail_workers: usize,
    pub nav_height: f32,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        let chrome = ChromeMetrics::default();
        Self {
            scroll_direction: ScrollDirection::default(),
            reset_zoom_on_page_change: false,
            thumbnails_enabled: true,
            initial_page: 0,
            strip_layout: StripLayout::default(),
            thumbnail_style: ThumbnailStyle::default(),
            thumbnail_size: ThumbnailSize::default(),
            thumbnail_workers: crate::pdf::DEFAULT_THUMBNAIL_WORKERS,
            nav_height: chrome.nav_height,
        }
    }
}

/// What one pager cell shows
#[derive(Clone, Debug, PartialEq)]
pub struct PageCellView {
    pub index: usize,
    pub frame: Rect,
    pub zoom: f32,
    /// Times this cell has been re-rendered
    pub generation: u64,
}

/// Work the host view must carry out
#[derive(Clone, Debug, PartialEq)]
pub enum ViewEffect {
    /// Move the pager
    ScrollPager { offset: Point, animated: bool },
    /// Re-render a page cell (its zoom was reset)
    ReloadPage(usize),
    /// Slide the chrome bars
    AnimateChrome {
        visibility: ChromeVisibility,
        layout: ChromeLayout,
        duration: Duration,
    },
    /// Thumbnail strip work
    Strip(StripEffect),
}

#[derive(Clone, Copy, Debug)]
struct PageCell {
    zoom: f32,
    generation: u64,
}

/// Synchronizes the full-size pager with the thumbnail strip.
///
/// Every method must be called from the interactive thread. Thumbnails
/// are generated in the background and only applied by
/// [`PageSyncController::poll`].
pub struct PageSyncController {
    document: Arc<dyn DocumentSource>,
    info: DocumentInfo,
    state: PagerState,
    strip: Option<ThumbnailStripController>,
    cells: Vec<PageCell>,
    chrome_metrics: ChromeMetrics,
}

impl PageSyncController {
    #[must_use]
    pub fn new(document: Arc<dyn DocumentSource>, options: ViewerOptions) -> Self {
        let info = DocumentInfo::from_source(document.as_ref());
        let page_count = info.page_count;
        let state = PagerState::new(
            page_count,
            options.initial_page,
            options.scroll_direction,
            options.reset_zoom_on_page_change,
        );

        let strip = options.thumbnails_enabled.then(|| {
            ThumbnailStripController::new(
                page_count,
                state.current_page,
                options.strip_layout,
                options.thumbnail_style,
                ThumbnailCache::new(options.thumbnail_size, options.thumbnail_workers),
            )
        });

        let chrome_metrics = ChromeMetrics {
            nav_height: options.nav_height,
            strip_height: if strip.is_some() {
                options.strip_layout.cell_size.height
            } else {
                0.0
            },
        };

        Self {
            document,
            info,
            state,
            strip,
            cells: vec![
                PageCell {
                    zoom: DEFAULT_ZOOM,
                    generation: 0
                };
                page_count
            ],
            chrome_metrics,
        }
    }

    /// Kick off background thumbnail generation.
    ///
    /// No-op when thumbnails are disabled or generation already started.
    pub fn start_thumbnails(&mut self) -> Result<(), CacheError> {
        if let Some(strip) = self.strip.as_mut() {
            strip.start_thumbnails(Arc::clone(&self.document))?;
        }
        Ok(())
    }

    /// Apply background results that have arrived. Call once per UI tick.
    pub fn poll(&mut self) -> Vec<ViewEffect> {
        self.strip
            .as_mut()
            .map(|strip| strip.poll_thumbnails().into_iter().map(ViewEffect::Strip).collect())
            .unwrap_or_default()
    }

    /// Block until thumbnails arrive or `timeout` elapses
    pub fn wait_for_thumbnails(&mut self, timeout: Duration) -> Vec<ViewEffect> {
        self.strip
            .as_mut()
            .map(|strip| {
                strip
                    .wait_for_thumbnails(timeout)
                    .into_iter()
                    .map(ViewEffect::Strip)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Apply a pager command and carry out its effects
    pub fn handle(&mut self, cmd: Command) -> Vec<ViewEffect> {
        let effects = self.state.apply(cmd);
        self.execute_effects(effects)
    }

    /// Pager scrolled to `offset`
    pub fn did_scroll(&mut self, offset: Point) -> Vec<ViewEffect> {
        self.handle(Command::Scrolled(offset))
    }

    /// Pager stopped decelerating
    pub fn did_end_decelerating(&mut self) -> Vec<ViewEffect> {
        self.handle(Command::ScrollEnded)
    }

    /// Single tap on a page
    pub fn page_tapped(&mut self) -> Vec<ViewEffect> {
        self.handle(Command::PageTapped)
    }

    /// Tap on thumbnail `index`; the strip reports it and the pager navigates
    pub fn thumbnail_tapped(&mut self, index: usize) -> Vec<ViewEffect> {
        let Some(strip) = self.strip.as_ref() else {
            return Vec::new();
        };

        let mut out = Vec::new();
        for effect in strip.tap(index) {
            match effect {
                StripEffect::PageSelected(page) => out.extend(self.handle(Command::SelectPage(page))),
                other => out.push(ViewEffect::Strip(other)),
            }
        }
        out
    }

    /// Viewport resized; re-anchor on the same page
    pub fn transition_to_size(&mut self, viewport: Size) -> Vec<ViewEffect> {
        let mut out = Vec::new();
        if let Some(strip) = self.strip.as_mut() {
            let strip_viewport = Size::new(
                strip.preferred_width(viewport.width),
                self.chrome_metrics.strip_height,
            );
            out.extend(strip.set_viewport(strip_viewport).into_iter().map(ViewEffect::Strip));
        }
        out.extend(self.handle(Command::Resize(viewport)));
        out
    }

    /// Host pinch-zoomed a page cell
    pub fn set_page_zoom(&mut self, page: usize, zoom: f32) {
        if let Some(cell) = self.cells.get_mut(page) {
            cell.zoom = zoom;
        }
    }

    fn execute_effects(&mut self, effects: Vec<Effect>) -> Vec<ViewEffect> {
        let mut out = Vec::with_capacity(effects.len());

        for effect in effects {
            match effect {
                Effect::ReloadPage(page) => {
                    if let Some(cell) = self.cells.get_mut(page) {
                        cell.zoom = DEFAULT_ZOOM;
                        cell.generation += 1;
                    }
                    out.push(ViewEffect::ReloadPage(page));
                }

                Effect::ScrollTo { offset, animated } => {
                    out.push(ViewEffect::ScrollPager { offset, animated });
                }

                Effect::SyncStrip(page) => {
                    if let Some(strip) = self.strip.as_mut() {
                        out.extend(
                            strip
                                .set_current_page_index(page)
                                .into_iter()
                                .map(ViewEffect::Strip),
                        );
                    }
                }

                Effect::AnimateChrome(visibility) => {
                    out.push(ViewEffect::AnimateChrome {
                        visibility,
                        layout: self.chrome_metrics.layout(visibility),
                        duration: CHROME_ANIMATION,
                    });
                }
            }
        }

        out
    }

    #[must_use]
    pub fn current_page_index(&self) -> usize {
        self.state.current_page
    }

    /// Number of pager cells; equals the page count
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    #[must_use]
    pub fn page_cell(&self, index: usize) -> Option<PageCellView> {
        let cell = self.cells.get(index)?;
        let origin = offset_for_page(index, self.state.viewport, self.state.direction);
        Some(PageCellView {
            index,
            frame: Rect {
                origin,
                size: self.state.viewport,
            },
            zoom: cell.zoom,
            generation: cell.generation,
        })
    }

    #[must_use]
    pub fn content_offset(&self) -> Point {
        self.state.content_offset
    }

    #[must_use]
    pub fn chrome(&self) -> ChromeVisibility {
        self.state.chrome
    }

    #[must_use]
    pub fn chrome_layout(&self) -> ChromeLayout {
        self.chrome_metrics.layout(self.state.chrome)
    }

    #[must_use]
    pub fn strip(&self) -> Option<&ThumbnailStripController> {
        self.strip.as_ref()
    }

    #[must_use]
    pub fn document_info(&self) -> &DocumentInfo {
        &self.info
    }
}
