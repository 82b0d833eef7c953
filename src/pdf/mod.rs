//! PDF document access and background thumbnail rendering

mod cache;
mod document;
mod fault;
#[cfg(feature = "pdf")]
mod mupdf_document;
mod types;
mod worker;

pub use cache::{CacheState, ThumbnailCache};
pub use document::{DocumentInfo, DocumentSource, PageRenderer};
pub use fault::{CacheError, RenderFault};
#[cfg(feature = "pdf")]
pub use mupdf_document::MupdfDocument;
pub use types::{Thumbnail, ThumbnailSet, ThumbnailSize};
pub use worker::{Delivery, thumbnail_worker};

/// Default number of thumbnail render threads
pub const DEFAULT_THUMBNAIL_WORKERS: usize = 2;

/// Name prefix of thumbnail threads
pub const THUMBNAIL_THREAD_NAME: &str = "thumbnail-render";
