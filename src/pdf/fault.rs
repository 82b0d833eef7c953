//! Error types for the thumbnail pipeline

/// Errors from opening a document or rendering one of its pages
#[derive(Debug, thiserror::Error)]
pub enum RenderFault {
    #[cfg(feature = "pdf")]
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("document requires a password")]
    PasswordRequired,

    #[error("incorrect document password")]
    WrongPassword,

    #[error("page {page} out of range ({page_count} pages)")]
    PageOutOfRange { page: usize, page_count: usize },

    #[error("{detail}")]
    Generic { detail: String },
}

impl RenderFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Errors from starting background thumbnail generation
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("failed to build thumbnail worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),

    #[error("failed to spawn thumbnail thread: {0}")]
    Spawn(#[from] std::io::Error),
}
