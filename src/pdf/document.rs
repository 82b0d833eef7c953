//! Document service consumed by the viewer

use std::panic::{self, AssertUnwindSafe};

use rayon::prelude::*;

use super::fault::RenderFault;
use super::types::{Thumbnail, ThumbnailSize};

/// Renders pages of one open document.
///
/// Renderers are opened per thread and are not shared, so backends whose
/// native handles are not thread-safe can still render in parallel.
pub trait PageRenderer {
    fn render_thumbnail(&mut self, page: usize, size: ThumbnailSize)
    -> Result<Thumbnail, RenderFault>;
}

/// Read-only document handle.
pub trait DocumentSource: Send + Sync {
    /// Total page count
    fn page_count(&self) -> usize;

    /// Password used to unlock the document, if any
    fn password(&self) -> Option<&str>;

    fn file_name(&self) -> &str;

    /// Raw document bytes
    fn file_data(&self) -> &[u8];

    fn title(&self) -> Option<&str> {
        None
    }

    /// Open a renderer for the calling thread
    fn open_renderer(&self) -> Result<Box<dyn PageRenderer>, RenderFault>;

    /// Render one preview per page, in page order.
    ///
    /// Runs on whatever rayon pool it is installed into. A page that fails
    /// or panics while rendering leaves a `None` slot; the batch always has
    /// `page_count` entries.
    fn render_all_thumbnails(&self, size: ThumbnailSize) -> Vec<Option<Thumbnail>> {
        (0..self.page_count())
            .into_par_iter()
            .map_init(
                || self.open_renderer(),
                |renderer, page| {
                    let slot = match renderer {
                        Ok(renderer) => render_isolated(&mut **renderer, page, size),
                        Err(e) => {
                            log::warn!("no renderer for page {page}: {e}");
                            return None;
                        }
                    };
                    if let Err(PagePanicked) = slot {
                        // The renderer may be left half-updated; start over
                        *renderer = self.open_renderer();
                        return None;
                    }
                    slot.ok().flatten()
                },
            )
            .collect()
    }
}

struct PagePanicked;

/// Render one page, turning a failure into a placeholder and a panic into
/// `Err(PagePanicked)`.
fn render_isolated(
    renderer: &mut dyn PageRenderer,
    page: usize,
    size: ThumbnailSize,
) -> Result<Option<Thumbnail>, PagePanicked> {
    match panic::catch_unwind(AssertUnwindSafe(|| renderer.render_thumbnail(page, size))) {
        Ok(Ok(thumbnail)) => Ok(Some(thumbnail)),
        Ok(Err(e)) => {
            log::warn!("thumbnail for page {page} failed: {e}");
            Ok(None)
        }
        Err(payload) => {
            let reason = payload
                .downcast_ref::<&str>()
                .map(|s| (*s).to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            log::warn!("thumbnail for page {page} panicked: {reason}");
            Err(PagePanicked)
        }
    }
}

/// Document metadata
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DocumentInfo {
    pub page_count: usize,
    pub title: Option<String>,
    pub file_name: String,
    pub is_protected: bool,
}

impl DocumentInfo {
    #[must_use]
    pub fn from_source(source: &dyn DocumentSource) -> Self {
        Self {
            page_count: source.page_count(),
            title: source.title().map(str::to_owned),
            file_name: source.file_name().to_owned(),
            is_protected: source.password().is_some(),
        }
    }

    /// Title shown in the chrome, falling back to the file name
    #[must_use]
    pub fn display_title(&self) -> &str {
        self.title.as_deref().unwrap_or(&self.file_name)
    }
}
