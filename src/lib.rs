// Export modules for use in tests
pub mod panic_handler;
pub mod pdf;
pub mod settings;
pub mod viewer;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use pdf::{DocumentSource, ThumbnailCache, ThumbnailSet, ThumbnailSize};
pub use settings::{SettingsError, ViewerSettings};
pub use viewer::{PageSyncController, ThumbnailStripController, ViewEffect, ViewerOptions};
