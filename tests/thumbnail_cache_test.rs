use std::sync::Arc;
use std::time::Duration;

use pdfpager::pdf::{CacheState, ThumbnailCache, ThumbnailSize};
use pdfpager::test_utils::FakeDocument;

const WAIT: Duration = Duration::from_secs(10);

#[test]
fn slots_line_up_with_pages() {
    let mut cache = ThumbnailCache::new(ThumbnailSize::new(6, 8), 3);
    cache
        .start(Arc::new(FakeDocument::new(9).failing_pages([0, 8])))
        .expect("start");

    let set = cache.wait_for_delivery(WAIT).expect("delivered");
    assert_eq!(set.len(), 9);
    for (page, slot) in set.iter().enumerate() {
        match slot {
            Some(thumbnail) => {
                assert_eq!(thumbnail.page, page);
                assert_eq!((thumbnail.width(), thumbnail.height()), (6, 8));
                assert_eq!(thumbnail.image.get_pixel(0, 0).0[0], page as u8);
            }
            None => assert!(page == 0 || page == 8, "unexpected placeholder at {page}"),
        }
    }
}

#[test]
fn unopenable_document_delivers_all_placeholders() {
    let mut cache = ThumbnailCache::new(ThumbnailSize::new(4, 4), 2);
    cache
        .start(Arc::new(FakeDocument::new(3).failing_open()))
        .expect("start");

    let set = cache.wait_for_delivery(WAIT).expect("delivered");
    assert_eq!(set.len(), 3);
    assert_eq!(set.placeholder_count(), 3);
    assert!(matches!(cache.state(), CacheState::Ready(_)));
}

#[test]
fn poll_eventually_observes_delivery() {
    let mut cache = ThumbnailCache::new(ThumbnailSize::new(4, 4), 1);
    cache.start(Arc::new(FakeDocument::new(2))).expect("start");

    let deadline = std::time::Instant::now() + WAIT;
    let mut delivered = None;
    while delivered.is_none() && std::time::Instant::now() < deadline {
        delivered = cache.poll();
        std::thread::sleep(Duration::from_millis(2));
    }

    assert_eq!(delivered.map(|set| set.rendered_count()), Some(2));
    assert!(cache.is_ready());
}

#[test]
fn crash_on_one_page_leaves_one_placeholder() {
    let mut cache = ThumbnailCache::new(ThumbnailSize::new(4, 4), 2);
    cache
        .start(Arc::new(FakeDocument::new(4).panicking_pages([1])))
        .expect("start");

    let set = cache.wait_for_delivery(WAIT).expect("delivered");
    assert_eq!(set.len(), 4);
    assert_eq!(set.rendered_count(), 3);
    assert_eq!(set.placeholder_count(), 1);
    assert!(set.get(1).is_none());
}
