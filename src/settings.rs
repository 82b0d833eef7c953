use log::{debug, error, info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::pdf::{DEFAULT_THUMBNAIL_WORKERS, ThumbnailSize};
use crate::viewer::{Color, ScrollDirection, StripLayout, ThumbnailStyle, ViewerOptions};

pub const CURRENT_VERSION: u32 = 1;
const SETTINGS_FILENAME: &str = "config.yaml";
const APP_NAME: &str = "pdfpager";

/// Screen width assumed when none is configured (logical points)
pub const DEFAULT_SCREEN_WIDTH: f32 = 390.0;

#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    #[error("failed to access {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse {path:?}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to serialize settings: {0}")]
    Serialize(#[from] serde_yaml::Error),

    #[error("{field} is not a #RRGGBB color: {value:?}")]
    InvalidColor { field: &'static str, value: String },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerSettings {
    #[serde(default = "default_version")]
    pub version: u32,

    #[serde(default)]
    pub scroll_direction: ScrollDirection,

    #[serde(default)]
    pub reset_zoom_on_page_change: bool,

    #[serde(default = "default_true")]
    pub thumbnails_enabled: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active_thumbnail_border_color: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inactive_thumbnail_border_color: Option<String>,

    #[serde(default = "default_thumbnail_workers")]
    pub thumbnail_workers: usize,

    #[serde(default = "default_thumbnail_width")]
    pub thumbnail_width: u32,

    #[serde(default = "default_thumbnail_height")]
    pub thumbnail_height: u32,

    #[serde(default = "default_screen_width")]
    pub screen_width: f32,
}

fn default_true() -> bool {
    true
}

fn default_version() -> u32 {
    CURRENT_VERSION
}

fn default_thumbnail_workers() -> usize {
    DEFAULT_THUMBNAIL_WORKERS
}

fn default_thumbnail_width() -> u32 {
    ThumbnailSize::default().width
}

fn default_thumbnail_height() -> u32 {
    ThumbnailSize::default().height
}

fn default_screen_width() -> f32 {
    DEFAULT_SCREEN_WIDTH
}

impl Default for ViewerSettings {
    fn default() -> Self {
        Self {
            version: CURRENT_VERSION,
            scroll_direction: ScrollDirection::default(),
            reset_zoom_on_page_change: false,
            thumbnails_enabled: true,
            active_thumbnail_border_color: None,
            inactive_thumbnail_border_color: None,
            thumbnail_workers: default_thumbnail_workers(),
            thumbnail_width: default_thumbnail_width(),
            thumbnail_height: default_thumbnail_height(),
            screen_width: default_screen_width(),
        }
    }
}

impl ViewerSettings {
    /// Parse and validate settings from a YAML file
    pub fn load_from_path(path: &Path) -> Result<Self, SettingsError> {
        let content = fs::read_to_string(path).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let mut settings: Self =
            serde_yaml::from_str(&content).map_err(|source| SettingsError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        settings.thumbnail_style()?;

        if settings.version < CURRENT_VERSION {
            migrate_settings(&mut settings);
            settings.save_to_path(path)?;
        }

        debug!("Loaded settings from {path:?}");
        Ok(settings)
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), SettingsError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|source| SettingsError::Io {
                    path: parent.to_path_buf(),
                    source,
                })?;
            }
        }

        let mut content = String::from(SETTINGS_HEADER);
        content.push_str(&serde_yaml::to_string(self)?);

        fs::write(path, content).map_err(|source| SettingsError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        debug!("Saved settings to {path:?}");
        Ok(())
    }

    /// Load from `path` (or the default location), creating the file with
    /// defaults when it does not exist. Broken files fall back to defaults.
    pub fn load_or_create(path: Option<&Path>) -> Self {
        let path = match path.map(Path::to_path_buf).or_else(preferred_config_path) {
            Some(path) => path,
            None => {
                warn!("Could not determine config directory, using default settings");
                return Self::default();
            }
        };

        if !path.exists() {
            info!("Settings file not found, creating with defaults at {path:?}");
            let settings = Self::default();
            if let Err(e) = settings.save_to_path(&path) {
                error!("{e}");
            }
            return settings;
        }

        Self::load_from_path(&path).unwrap_or_else(|e| {
            error!("{e}");
            Self::default()
        })
    }

    /// Highlight colors; both must be set for border styling to apply
    pub fn thumbnail_style(&self) -> Result<ThumbnailStyle, SettingsError> {
        Ok(ThumbnailStyle {
            active_border: parse_color(
                "active_thumbnail_border_color",
                self.active_thumbnail_border_color.as_deref(),
            )?,
            inactive_border: parse_color(
                "inactive_thumbnail_border_color",
                self.inactive_thumbnail_border_color.as_deref(),
            )?,
        })
    }

    pub fn viewer_options(&self) -> Result<ViewerOptions, SettingsError> {
        Ok(ViewerOptions {
            scroll_direction: self.scroll_direction,
            reset_zoom_on_page_change: self.reset_zoom_on_page_change,
            thumbnails_enabled: self.thumbnails_enabled,
            strip_layout: StripLayout::new(self.screen_width),
            thumbnail_style: self.thumbnail_style()?,
            thumbnail_size: ThumbnailSize::new(
                self.thumbnail_width.max(1),
                self.thumbnail_height.max(1),
            ),
            thumbnail_workers: self.thumbnail_workers.max(1),
            ..ViewerOptions::default()
        })
    }
}

fn parse_color(field: &'static str, value: Option<&str>) -> Result<Option<Color>, SettingsError> {
    value
        .map(|value| {
            Color::from_hex(value).ok_or_else(|| SettingsError::InvalidColor {
                field,
                value: value.to_string(),
            })
        })
        .transpose()
}

fn migrate_settings(settings: &mut ViewerSettings) {
    info!(
        "Migrating settings from v{} to v{}",
        settings.version, CURRENT_VERSION
    );

    settings.version = CURRENT_VERSION;
}

pub fn preferred_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|config| config.join(APP_NAME).join(SETTINGS_FILENAME))
}

const SETTINGS_HEADER: &str = r#"# pdfpager viewer settings
#
# scroll_direction: horizontal | vertical
# Thumbnail border colors use #RRGGBB. Set both to draw borders; otherwise
# inactive thumbnails are dimmed.
"#;
