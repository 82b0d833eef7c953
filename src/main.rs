use std::fs::File;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, info};
use simplelog::{Config, LevelFilter, WriteLogger};

use pdfpager::panic_handler::initialize_panic_handler;
use pdfpager::pdf::CacheState;
use pdfpager::settings::ViewerSettings;
use pdfpager::viewer::{PageSyncController, ScrollDirection, Size, ViewEffect};
use pdfpager::{DocumentSource, ThumbnailSet};

#[derive(Parser, Debug)]
#[command(name = "pdfpager", version, about = "Page through a PDF with a thumbnail strip")]
struct Cli {
    /// PDF file to open
    file: PathBuf,

    /// Password for encrypted documents
    #[arg(long)]
    password: Option<String>,

    /// Page to open at (0-indexed)
    #[arg(long, default_value_t = 0)]
    page: usize,

    /// Page vertically instead of horizontally
    #[arg(long)]
    vertical: bool,

    /// Discard a page's zoom when leaving it
    #[arg(long)]
    reset_zoom: bool,

    /// Disable the thumbnail strip
    #[arg(long)]
    no_thumbnails: bool,

    /// Pager viewport as WIDTHxHEIGHT
    #[arg(long, default_value = "390x844", value_parser = parse_viewport)]
    viewport: Size,

    /// Scroll offsets to replay along the paging axis
    #[arg(long = "offset", allow_negative_numbers = true)]
    offsets: Vec<f32>,

    /// Thumbnail to tap after the scroll replay
    #[arg(long)]
    tap_thumbnail: Option<usize>,

    /// Write rendered thumbnails as PNG files into this directory
    #[arg(long)]
    thumbnails_out: Option<PathBuf>,

    /// How long to wait for thumbnails
    #[arg(long, default_value_t = 30)]
    timeout_secs: u64,

    /// Settings file (defaults to the user config directory)
    #[arg(long)]
    config: Option<PathBuf>,

    #[arg(long, default_value = "pdfpager.log")]
    log_file: PathBuf,

    /// off, error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: String,
}

fn parse_viewport(value: &str) -> Result<Size, String> {
    let (width, height) = value
        .split_once(['x', 'X'])
        .ok_or_else(|| format!("expected WIDTHxHEIGHT, got {value:?}"))?;
    let width: f32 = width.trim().parse().map_err(|e| format!("bad width: {e}"))?;
    let height: f32 = height.trim().parse().map_err(|e| format!("bad height: {e}"))?;
    if !(width > 0.0 && height > 0.0) {
        return Err(format!("viewport must be positive, got {value:?}"));
    }
    Ok(Size::new(width, height))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = LevelFilter::from_str(&cli.log_level)
        .map_err(|_| anyhow!("unknown log level {:?}", cli.log_level))?;
    WriteLogger::init(
        level,
        Config::default(),
        File::create(&cli.log_file)
            .with_context(|| format!("creating log file {}", cli.log_file.display()))?,
    )?;
    initialize_panic_handler();

    info!("Starting pdfpager");
    let result = run(&cli);
    if let Err(err) = &result {
        log::error!("Application error: {err:?}");
    }
    info!("Shutting down pdfpager");
    result
}

fn run(cli: &Cli) -> Result<()> {
    let mut settings = ViewerSettings::load_or_create(cli.config.as_deref());
    if cli.vertical {
        settings.scroll_direction = ScrollDirection::Vertical;
    }
    if cli.reset_zoom {
        settings.reset_zoom_on_page_change = true;
    }
    if cli.no_thumbnails {
        settings.thumbnails_enabled = false;
    }

    let mut options = settings.viewer_options().context("invalid settings")?;
    options.initial_page = cli.page;
    let direction = options.scroll_direction;

    let document = open_document(&cli.file, cli.password.clone())?;
    let mut controller = PageSyncController::new(document, options);
    log_effects(controller.transition_to_size(cli.viewport));
    controller
        .start_thumbnails()
        .context("starting thumbnail generation")?;

    for offset in &cli.offsets {
        log_effects(controller.did_scroll(direction.point(*offset)));
    }
    if !cli.offsets.is_empty() {
        log_effects(controller.did_end_decelerating());
    }
    if let Some(index) = cli.tap_thumbnail {
        log_effects(controller.thumbnail_tapped(index));
    }

    log_effects(controller.wait_for_thumbnails(Duration::from_secs(cli.timeout_secs)));

    let images = controller
        .strip()
        .and_then(|strip| strip.page_images().cloned());
    if let (Some(dir), Some(images)) = (&cli.thumbnails_out, &images) {
        write_thumbnails(dir, images)?;
    }

    print_summary(&controller, images.as_deref());
    Ok(())
}

#[cfg(feature = "pdf")]
fn open_document(path: &Path, password: Option<String>) -> Result<Arc<dyn DocumentSource>> {
    let document = pdfpager::pdf::MupdfDocument::open(path, password)
        .with_context(|| format!("opening {}", path.display()))?;
    Ok(Arc::new(document))
}

#[cfg(not(feature = "pdf"))]
fn open_document(path: &Path, _password: Option<String>) -> Result<Arc<dyn DocumentSource>> {
    anyhow::bail!(
        "cannot open {}: built without the `pdf` feature",
        path.display()
    )
}

fn write_thumbnails(dir: &Path, images: &ThumbnailSet) -> Result<()> {
    std::fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
    for thumbnail in images.iter().flatten() {
        let path = dir.join(format!("page-{:04}.png", thumbnail.page + 1));
        thumbnail
            .image
            .save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    info!("Wrote {} thumbnails to {dir:?}", images.rendered_count());
    Ok(())
}

fn print_summary(controller: &PageSyncController, images: Option<&ThumbnailSet>) {
    let info = controller.document_info();
    println!("document:     {}", info.display_title());
    println!("pages:        {}", info.page_count);
    println!("cells:        {}", controller.cell_count());
    println!("current page: {}", controller.current_page_index());
    println!("chrome:       {}", controller.chrome().as_str());

    match controller.strip() {
        None => println!("thumbnails:   disabled"),
        Some(strip) => {
            let size = strip.cache().size();
            println!(
                "strip cells:  {} ({}x{} px thumbnails)",
                strip.cell_count(),
                size.width,
                size.height
            );
            match images {
                Some(images) => println!(
                    "thumbnails:   {} rendered, {} placeholder",
                    images.rendered_count(),
                    images.placeholder_count()
                ),
                None if matches!(strip.cache().state(), CacheState::Failed) => {
                    println!("thumbnails:   failed ({} placeholders)", strip.cell_count())
                }
                None => println!("thumbnails:   pending ({} placeholders)", strip.cell_count()),
            }
        }
    }
}

fn log_effects(effects: Vec<ViewEffect>) {
    for effect in effects {
        debug!("{effect:?}");
    }
}
