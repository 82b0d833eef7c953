//! In-memory document for tests

use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use image::{Rgb, RgbImage};

use crate::pdf::{DocumentSource, PageRenderer, RenderFault, Thumbnail, ThumbnailSize};

/// Document whose pages render as solid colors.
///
/// Page `n` renders with a red channel of `n % 256`, so tests can tell
/// slots apart. Pages can be made to fail, and rendering can be held
/// behind a gate until the test releases it.
pub struct FakeDocument {
    file_name: String,
    data: Vec<u8>,
    password: Option<String>,
    page_count: usize,
    failing: HashSet<usize>,
    panicking: HashSet<usize>,
    fail_open: bool,
    gate: Option<flume::Receiver<()>>,
    renders: Arc<AtomicUsize>,
}

impl FakeDocument {
    pub fn new(page_count: usize) -> Self {
        Self {
            file_name: format!("fake-{page_count}.pdf"),
            data: b"%PDF-1.7 fake".to_vec(),
            password: None,
            page_count,
            failing: HashSet::new(),
            panicking: HashSet::new(),
            fail_open: false,
            gate: None,
            renders: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Make the given pages fail to render
    pub fn failing_pages(mut self, pages: impl IntoIterator<Item = usize>) -> Self {
        self.failing.extend(pages);
        self
    }

    /// Make the renderer panic on the given pages
    pub fn panicking_pages(mut self, pages: impl IntoIterator<Item = usize>) -> Self {
        self.panicking.extend(pages);
        self
    }

    /// Make opening a renderer fail
    pub fn failing_open(mut self) -> Self {
        self.fail_open = true;
        self
    }

    pub fn with_password(mut self, password: &str) -> Self {
        self.password = Some(password.to_string());
        self
    }

    /// Hold every page render until the returned sender sends a unit or is
    /// dropped.
    pub fn gated(mut self) -> (flume::Sender<()>, Self) {
        let (tx, rx) = flume::unbounded();
        self.gate = Some(rx);
        (tx, self)
    }

    /// Pages rendered (or attempted) so far, across all threads
    pub fn render_count(&self) -> usize {
        self.renders.load(Ordering::SeqCst)
    }
}

impl DocumentSource for FakeDocument {
    fn page_count(&self) -> usize {
        self.page_count
    }

    fn password(&self) -> Option<&str> {
        self.password.as_deref()
    }

    fn file_name(&self) -> &str {
        &self.file_name
    }

    fn file_data(&self) -> &[u8] {
        &self.data
    }

    fn open_renderer(&self) -> Result<Box<dyn PageRenderer>, RenderFault> {
        if self.fail_open {
            return Err(RenderFault::generic("fake renderer refused to open"));
        }
        Ok(Box::new(FakeRenderer {
            page_count: self.page_count,
            failing: self.failing.clone(),
            panicking: self.panicking.clone(),
            gate: self.gate.clone(),
            renders: Arc::clone(&self.renders),
        }))
    }
}

struct FakeRenderer {
    page_count: usize,
    failing: HashSet<usize>,
    panicking: HashSet<usize>,
    gate: Option<flume::Receiver<()>>,
    renders: Arc<AtomicUsize>,
}

impl PageRenderer for FakeRenderer {
    fn render_thumbnail(
        &mut self,
        page: usize,
        size: ThumbnailSize,
    ) -> Result<Thumbnail, RenderFault> {
        if let Some(gate) = &self.gate {
            // Disconnection releases the gate for good
            let _ = gate.recv();
        }
        self.renders.fetch_add(1, Ordering::SeqCst);

        if page >= self.page_count {
            return Err(RenderFault::PageOutOfRange {
                page,
                page_count: self.page_count,
            });
        }
        if self.panicking.contains(&page) {
            panic!("fake renderer crashed on page {page}");
        }
        if self.failing.contains(&page) {
            return Err(RenderFault::generic(format!("page {page} is corrupt")));
        }

        let image = RgbImage::from_pixel(size.width, size.height, Rgb([(page % 256) as u8, 0, 0]));
        Ok(Thumbnail::new(page, image))
    }
}
