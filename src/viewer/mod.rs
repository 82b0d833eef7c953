//! Headless viewer: pager, thumbnail strip and chrome

pub mod chrome;
pub mod controller;
pub mod layout;
pub mod pager;
pub mod strip;
pub mod types;

pub use chrome::{CHROME_ANIMATION, ChromeEvent, ChromeLayout, ChromeMetrics, ChromeVisibility};
pub use controller::{DEFAULT_ZOOM, PageCellView, PageSyncController, ViewEffect, ViewerOptions};
pub use layout::{StripLayout, candidate_index, clamp_index, offset_for_page, page_index_for_offset};
pub use pager::{Command, Effect, PagerState};
pub use strip::{StripEffect, ThumbnailCellView, ThumbnailStripController, ThumbnailStyle};
pub use types::{CellStyle, Color, Point, Rect, ScrollDirection, Size};
