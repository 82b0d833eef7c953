//! Thumbnail render worker - runs on a background thread

use std::time::Instant;

use flume::Sender;
use rayon::ThreadPool;

use super::document::DocumentSource;
use super::types::{ThumbnailSet, ThumbnailSize};

/// What happened to a finished batch
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The set was handed to the interactive side
    Delivered,
    /// The receiving cache was gone; the set was dropped
    ObserverGone,
}

/// Render every page preview and deliver the complete set once.
///
/// Holds only the sending half of the delivery channel, so a viewer torn
/// down mid-render is never kept alive by this thread.
pub fn thumbnail_worker(
    document: &dyn DocumentSource,
    pool: &ThreadPool,
    size: ThumbnailSize,
    delivery: &Sender<ThumbnailSet>,
) -> Delivery {
    let page_count = document.page_count();
    let started = Instant::now();

    let slots = pool.install(|| document.render_all_thumbnails(size));
    let set = ThumbnailSet::from_slots(slots, page_count);

    log::debug!(
        "rendered {}/{} thumbnails for {} in {:?}",
        set.rendered_count(),
        page_count,
        document.file_name(),
        started.elapsed()
    );

    match delivery.send(set) {
        Ok(()) => Delivery::Delivered,
        Err(_) => {
            log::debug!(
                "thumbnail observer for {} is gone, dropping {page_count} thumbnails",
                document.file_name()
            );
            Delivery::ObserverGone
        }
    }
}
