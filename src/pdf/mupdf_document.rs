//! MuPDF-backed document source

use std::path::Path;

use image::RgbImage;
use mupdf::{Colorspace, Document, Matrix, Pixmap};

use super::document::{DocumentSource, PageRenderer};
use super::fault::RenderFault;
use super::types::{Thumbnail, ThumbnailSize};

const PDF_MAGIC: &str = "application/pdf";

/// A PDF held in memory and opened through MuPDF.
///
/// MuPDF documents are not `Send`, so only the bytes are kept here; every
/// rendering thread opens its own handle.
pub struct MupdfDocument {
    file_name: String,
    data: Vec<u8>,
    password: Option<String>,
    page_count: usize,
    title: Option<String>,
}

impl MupdfDocument {
    /// Read and validate a PDF from disk
    pub fn open(path: &Path, password: Option<String>) -> Result<Self, RenderFault> {
        let data = std::fs::read(path).map_err(|e| {
            RenderFault::generic(format!("failed to read {}: {e}", path.display()))
        })?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        Self::from_bytes(file_name, data, password)
    }

    pub fn from_bytes(
        file_name: impl Into<String>,
        data: Vec<u8>,
        password: Option<String>,
    ) -> Result<Self, RenderFault> {
        let doc = open_document(&data, password.as_deref())?;
        let page_count = usize::try_from(doc.page_count()?)
            .map_err(|_| RenderFault::generic("negative page count"))?;
        let title = doc
            .metadata(mupdf::MetadataName::Title)
            .ok()
            .filter(|t| !t.is_empty());

        let file_name = file_name.into();
        log::info!("Opened {file_name}: {page_count} pages");

        Ok(Self {
            file_name,
            data,
            password,
            page_count,
            title,
        })
    }
}

impl DocumentSource for MupdfDocument {
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

    fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    fn open_renderer(&self) -> Result<Box<dyn PageRenderer>, RenderFault> {
        let doc = open_document(&self.data, self.password.as_deref())?;
        Ok(Box::new(MupdfRenderer {
            doc,
            page_count: self.page_count,
        }))
    }
}

fn open_document(data: &[u8], password: Option<&str>) -> Result<Document, RenderFault> {
    let mut doc = Document::from_bytes(data, PDF_MAGIC)?;

    if doc.needs_password()? {
        let Some(password) = password else {
            return Err(RenderFault::PasswordRequired);
        };
        if !doc.authenticate(password)? {
            return Err(RenderFault::WrongPassword);
        }
    }

    Ok(doc)
}

struct MupdfRenderer {
    doc: Document,
    page_count: usize,
}

impl PageRenderer for MupdfRenderer {
    fn render_thumbnail(
        &mut self,
        page: usize,
        size: ThumbnailSize,
    ) -> Result<Thumbnail, RenderFault> {
        if page >= self.page_count {
            return Err(RenderFault::PageOutOfRange {
                page,
                page_count: self.page_count,
            });
        }
        let page_num = i32::try_from(page).map_err(|_| RenderFault::generic("page index overflow"))?;
        let pdf_page = self.doc.load_page(page_num)?;

        let bounds = pdf_page.bounds()?;
        let scale = size.fit_scale(bounds.x1 - bounds.x0, bounds.y1 - bounds.y0);

        let rgb = Colorspace::device_rgb();
        let pixmap = pdf_page.to_pixmap(&Matrix::new_scale(scale, scale), &rgb, false, false)?;

        Ok(Thumbnail::new(page, pixmap_to_image(&pixmap)?))
    }
}

fn pixmap_to_image(pixmap: &Pixmap) -> Result<RgbImage, RenderFault> {
    let stride = usize::try_from(pixmap.stride())
        .map_err(|_| RenderFault::generic("Negative pixmap stride"))?;
    samples_to_image(
        pixmap.samples(),
        pixmap.width(),
        pixmap.height(),
        stride,
        pixmap.n() as usize,
    )
}

/// Pack `n`-channel rows of `stride` bytes into tightly packed RGB
fn samples_to_image(
    samples: &[u8],
    width: u32,
    height: u32,
    stride: usize,
    n: usize,
) -> Result<RgbImage, RenderFault> {
    if n < 3 {
        return Err(RenderFault::generic(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }
    if width == 0 || height == 0 || stride == 0 {
        return Err(RenderFault::generic(format!(
            "Empty pixmap: {width}x{height}, stride {stride}"
        )));
    }

    let w = width as usize;
    let h = height as usize;
    let row_bytes = w * n;
    if row_bytes > stride || samples.len() < stride.saturating_mul(h - 1) + row_bytes {
        return Err(RenderFault::generic("Pixmap buffer size mismatch"));
    }

    let mut out = Vec::with_capacity(w * h * 3);
    for y in 0..h {
        let row = &samples[y * stride..y * stride + row_bytes];
        if n == 3 {
            out.extend_from_slice(row);
        } else {
            for px in row.chunks_exact(n) {
                out.extend_from_slice(&px[..3]);
            }
        }
    }

    RgbImage::from_raw(width, height, out)
        .ok_or_else(|| RenderFault::generic("Pixmap dimensions do not match pixel data"))
}
