//! Background-generated thumbnail set for one document

use std::sync::Arc;
use std::time::Duration;

use flume::{Receiver, RecvTimeoutError, TryRecvError};

use super::document::DocumentSource;
use super::fault::CacheError;
use super::types::{ThumbnailSet, ThumbnailSize};
use super::worker::thumbnail_worker;
use super::{DEFAULT_THUMBNAIL_WORKERS, THUMBNAIL_THREAD_NAME};

/// Lifecycle of the thumbnail set
#[derive(Clone, Debug)]
pub enum CacheState {
    /// Generation not started
    Idle,
    /// Background render in flight; nothing observable yet
    Rendering,
    /// Complete set delivered
    Ready(Arc<ThumbnailSet>),
    /// Worker exited without delivering
    Failed,
}

/// Owns the per-page preview images of one document.
///
/// Rendering happens on a background thread fanning out over a private
/// rayon pool. The finished set crosses back over a channel and is only
/// applied when the interactive thread calls [`ThumbnailCache::poll`].
pub struct ThumbnailCache {
    state: CacheState,
    size: ThumbnailSize,
    workers: usize,
    delivery_rx: Option<Receiver<ThumbnailSet>>,
}

impl ThumbnailCache {
    #[must_use]
    pub fn new(size: ThumbnailSize, workers: usize) -> Self {
        Self {
            state: CacheState::Idle,
            size,
            workers: workers.max(1),
            delivery_rx: None,
        }
    }

    /// Begin generating thumbnails for `document`.
    ///
    /// Returns `Ok(false)` when generation was already started; the set is
    /// produced at most once per cache.
    pub fn start(&mut self, document: Arc<dyn DocumentSource>) -> Result<bool, CacheError> {
        if !matches!(self.state, CacheState::Idle) {
            log::warn!(
                "thumbnail generation for {} already started, ignoring",
                document.file_name()
            );
            return Ok(false);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|i| format!("{THUMBNAIL_THREAD_NAME}-{i}"))
            .build()?;

        let (delivery_tx, delivery_rx) = flume::bounded(1);
        let size = self.size;

        log::info!(
            "Starting thumbnail generation for {} ({} pages, {} workers)",
            document.file_name(),
            document.page_count(),
            self.workers
        );

        std::thread::Builder::new()
            .name(THUMBNAIL_THREAD_NAME.to_string())
            .spawn(move || {
                thumbnail_worker(document.as_ref(), &pool, size, &delivery_tx);
            })?;

        self.delivery_rx = Some(delivery_rx);
        self.state = CacheState::Rendering;
        Ok(true)
    }

    /// Pick up a finished set without blocking.
    ///
    /// Returns the set only on the call that observes its arrival; later
    /// calls return `None` and the set stays available via
    /// [`ThumbnailCache::snapshot`].
    pub fn poll(&mut self) -> Option<Arc<ThumbnailSet>> {
        let rx = self.delivery_rx.as_ref()?;
        match rx.try_recv() {
            Ok(set) => Some(self.accept(set)),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => {
                self.abandon();
                None
            }
        }
    }

    /// Block the calling thread until the set arrives or `timeout` elapses.
    pub fn wait_for_delivery(&mut self, timeout: Duration) -> Option<Arc<ThumbnailSet>> {
        let rx = self.delivery_rx.as_ref()?;
        match rx.recv_timeout(timeout) {
            Ok(set) => Some(self.accept(set)),
            Err(RecvTimeoutError::Timeout) => None,
            Err(RecvTimeoutError::Disconnected) => {
                self.abandon();
                None
            }
        }
    }

    /// Current set, `None` until delivered
    #[must_use]
    pub fn snapshot(&self) -> Option<Arc<ThumbnailSet>> {
        match &self.state {
            CacheState::Ready(set) => Some(Arc::clone(set)),
            _ => None,
        }
    }

    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self.state, CacheState::Ready(_))
    }

    #[must_use]
    pub fn state(&self) -> &CacheState {
        &self.state
    }

    #[must_use]
    pub fn size(&self) -> ThumbnailSize {
        self.size
    }

    fn accept(&mut self, set: ThumbnailSet) -> Arc<ThumbnailSet> {
        let set = Arc::new(set);
        log::debug!(
            "thumbnail set ready: {} slots, {} placeholders",
            set.len(),
            set.placeholder_count()
        );
        self.delivery_rx = None;
        self.state = CacheState::Ready(Arc::clone(&set));
        set
    }

    fn abandon(&mut self) {
        log::warn!("thumbnail worker exited without delivering");
        self.delivery_rx = None;
        self.state = CacheState::Failed;
    }
}

impl Default for ThumbnailCache {
    fn default() -> Self {
        Self::new(ThumbnailSize::default(), DEFAULT_THUMBNAIL_WORKERS)
    }
}
