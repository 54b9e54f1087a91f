/// Picker configuration
///
/// Loaded from `<config_dir>/photo-picker/config.json`. A missing file means
/// defaults; missing fields inside an existing file also fall back to defaults.
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{PickerError, Result};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct PickerConfig {
    /// Number of cells per grid row
    pub columns: usize,
    /// Number of cells in the recycled pool (one page of items)
    pub page_size: usize,
    /// Edge length of a cell in logical pixels
    pub cell_size: f32,
    /// Thumbnail pixels per logical pixel (display scale)
    pub thumbnail_scale: f32,
    /// Number of decoded thumbnails kept in memory
    pub memory_cache_capacity: usize,
    /// Size budget of the on-disk thumbnail tier, enforced at startup
    pub disk_cache_max_bytes: u64,
    /// Override for the library database location
    pub library_path: Option<PathBuf>,
}

impl Default for PickerConfig {
    fn default() -> Self {
        Self {
            columns: 4,
            page_size: 24,
            cell_size: 120.0,
            thumbnail_scale: 2.0,
            memory_cache_capacity: 256,
            disk_cache_max_bytes: 256 * 1024 * 1024,
            library_path: None,
        }
    }
}

impl PickerConfig {
    /// Load the config from the default location
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::default_path()?)
    }

    /// Load the config from `path`, or defaults when the file does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let json = fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&json).map_err(|source| PickerError::Config {
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!("Loaded config from {}", path.display());
        Ok(config.sanitized())
    }

    /// Write the config as pretty JSON, creating parent directories
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(self).map_err(|source| PickerError::Config {
            path: path.to_path_buf(),
            source,
        })?;
        fs::write(path, json)?;
        Ok(())
    }

    /// `<config_dir>/photo-picker/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::config_dir().ok_or(PickerError::MissingDirectory("config"))?;
        path.push("photo-picker");
        path.push("config.json");
        Ok(path)
    }

    /// Size in pixels requested from the thumbnail cache for one cell
    pub fn thumbnail_size(&self) -> iced::Size<u32> {
        let edge = (self.cell_size * self.thumbnail_scale).round().max(1.0) as u32;
        iced::Size::new(edge, edge)
    }

    // Zero columns or an empty pool would leave nothing to lay out
    fn sanitized(mut self) -> Self {
        self.columns = self.columns.max(1);
        self.page_size = self.page_size.max(1);
        self.memory_cache_capacity = self.memory_cache_capacity.max(1);
        if !(self.cell_size.is_finite() && self.cell_size > 0.0) {
            self.cell_size = Self::default().cell_size;
        }
        if !(self.thumbnail_scale.is_finite() && self.thumbnail_scale > 0.0) {
            self.thumbnail_scale = Self::default().thumbnail_scale;
        }
        self
    }
}
