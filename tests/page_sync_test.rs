use std::sync::Arc;
use std::time::Duration;

use pdfpager::pdf::{
    CacheState, DocumentSource, PageRenderer, RenderFault, Thumbnail, ThumbnailSize,
};
use pdfpager::test_utils::FakeDocument;
use pdfpager::viewer::{
    ChromeVisibility, PageSyncController, Point, ScrollDirection, Size, StripEffect, ViewEffect,
    ViewerOptions,
};

const WAIT: Duration = Duration::from_secs(10);
const PHONE: Size = Size::new(300.0, 500.0);

fn open(document: FakeDocument, options: ViewerOptions) -> PageSyncController {
    let mut controller = PageSyncController::new(Arc::new(document), options);
    controller.transition_to_size(PHONE);
    controller
}

/// Document whose thumbnail batch crashes before anything is delivered
struct CrashingBatch;

impl DocumentSource for CrashingBatch {
    fn page_count(&self) -> usize {
        4
    }

    fn password(&self) -> Option<&str> {
        None
    }

    fn file_name(&self) -> &str {
        "crashing.pdf"
    }

    fn file_data(&self) -> &[u8] {
        &[]
    }

    fn open_renderer(&self) -> Result<Box<dyn PageRenderer>, RenderFault> {
        Err(RenderFault::generic("unused"))
    }

    fn render_all_thumbnails(&self, _size: ThumbnailSize) -> Vec<Option<Thumbnail>> {
        panic!("batch crashed");
    }
}

fn strip_index(controller: &PageSyncController) -> usize {
    controller
        .strip()
        .map(|strip| strip.current_page_index())
        .expect("strip enabled")
}

#[test]
fn scroll_and_tap_keep_pager_and_strip_in_step() {
    let mut controller = open(FakeDocument::new(12), ViewerOptions::default());

    controller.did_scroll(Point::new(620.0, 0.0));
    assert_eq!(controller.current_page_index(), 2);
    assert_eq!(strip_index(&controller), 2);

    controller.thumbnail_tapped(9);
    assert_eq!(controller.current_page_index(), 9);
    assert_eq!(strip_index(&controller), 9);
    assert_eq!(controller.content_offset(), Point::new(2700.0, 0.0));

    // The pager's own scroll callback for the programmatic move is a no-op
    let effects = controller.did_scroll(Point::new(2700.0, 0.0));
    assert!(effects.is_empty());
    assert_eq!(strip_index(&controller), 9);
}

#[test]
fn current_page_follows_rounding_and_clamping() {
    let page_count = 7;
    let mut controller = open(FakeDocument::new(page_count), ViewerOptions::default());

    let mut offset = -500.0_f32;
    while offset <= 3000.0 {
        controller.did_scroll(Point::new(offset, 0.0));
        let expected = ((offset.max(0.0) / PHONE.width).round() as usize).min(page_count - 1);
        assert_eq!(controller.current_page_index(), expected, "offset {offset}");
        assert_eq!(strip_index(&controller), expected, "offset {offset}");
        offset += 37.5;
    }
}

#[test]
fn vertical_pager_reads_vertical_offsets() {
    let options = ViewerOptions {
        scroll_direction: ScrollDirection::Vertical,
        ..ViewerOptions::default()
    };
    let mut controller = open(FakeDocument::new(5), options);

    controller.did_scroll(Point::new(0.0, 1100.0));
    assert_eq!(controller.current_page_index(), 2);

    controller.thumbnail_tapped(4);
    assert_eq!(controller.content_offset(), Point::new(0.0, 2000.0));
}

#[test]
fn cell_count_is_stable_across_delivery() {
    let (gate, document) = FakeDocument::new(5).failing_pages([2]).gated();
    let mut controller = open(document, ViewerOptions::default());
    controller.start_thumbnails().expect("start");

    {
        let strip = controller.strip().expect("strip");
        assert_eq!(strip.cell_count(), 5);
        assert_eq!(strip.visible_cells().len(), 5);
        assert!(strip.visible_cells().iter().all(|cell| !cell.has_image));
    }
    assert!(controller.poll().is_empty(), "nothing arrives while gated");

    drop(gate);
    let effects = controller.wait_for_thumbnails(WAIT);
    assert!(
        effects
            .iter()
            .any(|effect| matches!(effect, ViewEffect::Strip(StripEffect::Reloaded { cells: 5, .. })))
    );

    let strip = controller.strip().expect("strip");
    assert_eq!(strip.cell_count(), 5);
    let images = strip.page_images().expect("delivered");
    assert_eq!(images.len(), 5);
    assert_eq!(images.rendered_count(), 4);
    assert_eq!(images.placeholder_count(), 1);

    let with_images: Vec<bool> = strip.visible_cells().iter().map(|cell| cell.has_image).collect();
    assert_eq!(with_images, vec![true, true, false, true, true]);

    // Delivered once; later polls are quiet
    assert!(controller.poll().is_empty());
}

#[test]
fn offscreen_page_scrolls_strip_with_animation() {
    let mut controller = open(FakeDocument::new(40), ViewerOptions::default());
    let strip = controller.strip().expect("strip");
    assert_eq!(strip.viewport().width, 300.0);

    let effects = controller.did_scroll(Point::new(9000.0, 0.0));
    assert_eq!(controller.current_page_index(), 30);
    assert!(effects.contains(&ViewEffect::Strip(StripEffect::ScrollTo {
        offset: 459.0,
        animated: true
    })));

    let strip = controller.strip().expect("strip");
    assert!(strip.visible_cells().iter().any(|cell| cell.index == 30 && cell.active));
}

#[test]
fn rotation_reanchors_without_animation() {
    let mut controller = open(FakeDocument::new(6), ViewerOptions::default());
    controller.thumbnail_tapped(3);

    let effects = controller.transition_to_size(Size::new(700.0, 300.0));
    assert_eq!(controller.current_page_index(), 3);
    assert!(effects.contains(&ViewEffect::ScrollPager {
        offset: Point::new(2100.0, 0.0),
        animated: false
    }));
    assert!(effects.contains(&ViewEffect::ReloadPage(3)));
    assert_eq!(strip_index(&controller), 3);
}

#[test]
fn chrome_toggles_on_tap_and_hides_after_scroll() {
    let mut controller = open(FakeDocument::new(3), ViewerOptions::default());
    assert_eq!(controller.chrome(), ChromeVisibility::Visible);

    controller.page_tapped();
    assert_eq!(controller.chrome(), ChromeVisibility::Hidden);
    controller.page_tapped();
    assert_eq!(controller.chrome(), ChromeVisibility::Visible);

    controller.did_scroll(Point::new(300.0, 0.0));
    let effects = controller.did_end_decelerating();
    assert_eq!(controller.chrome(), ChromeVisibility::Hidden);
    assert_eq!(effects.len(), 1);
    assert!(controller.did_end_decelerating().is_empty());
}

#[test]
fn empty_document_survives_every_operation() {
    let mut controller = open(FakeDocument::new(0), ViewerOptions::default());
    controller.start_thumbnails().expect("start");

    controller.did_scroll(Point::new(500.0, 0.0));
    controller.did_end_decelerating();
    assert!(controller.thumbnail_tapped(0).is_empty());
    controller.page_tapped();
    controller.transition_to_size(Size::new(800.0, 300.0));
    controller.wait_for_thumbnails(WAIT);

    assert_eq!(controller.current_page_index(), 0);
    assert_eq!(controller.cell_count(), 0);
    assert!(controller.page_cell(0).is_none());
    let strip = controller.strip().expect("strip");
    assert_eq!(strip.cell_count(), 0);
    assert!(strip.visible_cells().is_empty());
    assert_eq!(strip.page_images().map(|images| images.len()), Some(0));
}

#[test]
fn closing_viewer_mid_render_discards_thumbnails() {
    let (gate, document) = FakeDocument::new(4).gated();
    let document = Arc::new(document);

    let mut controller = PageSyncController::new(document.clone(), ViewerOptions::default());
    controller.transition_to_size(PHONE);
    controller.start_thumbnails().expect("start");
    drop(controller);

    drop(gate);
    let deadline = std::time::Instant::now() + WAIT;
    while document.render_count() < 4 && std::time::Instant::now() < deadline {
        std::thread::sleep(Duration::from_millis(5));
    }
    assert_eq!(document.render_count(), 4);
}

#[test]
fn failed_generation_keeps_placeholders() {
    let mut controller = PageSyncController::new(Arc::new(CrashingBatch), ViewerOptions::default());
    controller.transition_to_size(PHONE);
    controller.start_thumbnails().expect("start");

    assert!(controller.wait_for_thumbnails(WAIT).is_empty());

    let strip = controller.strip().expect("strip");
    assert!(matches!(strip.cache().state(), CacheState::Failed));
    assert_eq!(strip.cache().size(), ThumbnailSize::default());
    assert!(strip.page_images().is_none());
    assert_eq!(strip.cell_count(), 4);
    assert_eq!(strip.visible_cells().len(), 4);
    assert!(strip.visible_cells().iter().all(|cell| !cell.has_image));

    // The viewer stays usable
    controller.thumbnail_tapped(3);
    assert_eq!(controller.current_page_index(), 3);
    assert!(controller.poll().is_empty());
}
