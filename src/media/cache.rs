/// Shared thumbnail cache
///
/// One `ImageCache` is created at startup and cloned into every thumbnail
/// request. Lookups go memory -> disk -> decode from the source file; decoding
/// and disk I/O happen on tokio's blocking pool so the UI thread never waits.
use image::{imageops::FilterType, DynamicImage};
use lru::LruCache;
use sha2::{Digest, Sha256};
use std::fs;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::UNIX_EPOCH;

use crate::error::{PickerError, Result};
use crate::state::item::{ContentMode, Picture};

/// Options attached to a thumbnail request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequestOptions {
    /// Whether the cache may go to the network for assets not stored locally.
    /// The local library never needs it; it is carried for remote-backed caches.
    pub network_access_allowed: bool,
}

impl Default for RequestOptions {
    fn default() -> Self {
        Self {
            network_access_allowed: true,
        }
    }
}

/// A request for one thumbnail
#[derive(Debug, Clone, PartialEq)]
pub struct ThumbnailRequest {
    pub identifier: String,
    pub target_size: iced::Size<u32>,
    pub content_mode: ContentMode,
    pub options: RequestOptions,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    identifier: String,
    width: u32,
    height: u32,
    mode: ContentMode,
}

impl From<&ThumbnailRequest> for CacheKey {
    fn from(request: &ThumbnailRequest) -> Self {
        Self {
            identifier: request.identifier.clone(),
            width: request.target_size.width,
            height: request.target_size.height,
            mode: request.content_mode,
        }
    }
}

#[derive(Debug)]
struct CacheInner {
    disk_dir: Option<PathBuf>,
    memory: Mutex<LruCache<CacheKey, Picture>>,
}

/// Caching thumbnail service shared by all grid cells
#[derive(Debug, Clone)]
pub struct ImageCache {
    inner: Arc<CacheInner>,
}

impl ImageCache {
    /// Create a cache with an optional disk tier under `disk_dir`
    pub fn new(disk_dir: Option<PathBuf>, memory_capacity: usize) -> Self {
        Self {
            inner: Arc::new(CacheInner {
                disk_dir,
                memory: Mutex::new(LruCache::new(
                    NonZeroUsize::new(memory_capacity).unwrap_or(NonZeroUsize::MIN),
                )),
            }),
        }
    }

    /// Create a cache whose disk tier lives in the user cache directory
    /// (`~/.cache/photo-picker/thumbnails` on Linux), trimmed to
    /// `disk_budget` bytes before first use
    pub fn with_default_dir(memory_capacity: usize, disk_budget: u64) -> Result<Self> {
        let dir = default_disk_dir()?;
        fs::create_dir_all(&dir)?;
        tracing::info!("Thumbnail cache at {}", dir.display());

        match prune_disk_tier(&dir, disk_budget) {
            Ok(0) => {}
            Ok(removed) => tracing::info!("Pruned {} cached thumbnails", removed),
            Err(e) => tracing::warn!("Could not prune thumbnail cache: {}", e),
        }

        Ok(Self::new(Some(dir), memory_capacity))
    }

    /// Resolve a thumbnail for `request`
    ///
    /// Resolves to `None` when the asset cannot be read or decoded; the
    /// failure is logged and otherwise swallowed.
    pub async fn request_thumbnail(self, request: ThumbnailRequest) -> Option<Picture> {
        let key = CacheKey::from(&request);

        if let Some(picture) = self.lookup(&key) {
            tracing::trace!("Memory hit for {}", request.identifier);
            return Some(picture);
        }

        tracing::trace!(
            "Loading {} at {}x{} (network allowed: {})",
            request.identifier,
            request.target_size.width,
            request.target_size.height,
            request.options.network_access_allowed
        );

        let disk_dir = self.inner.disk_dir.clone();
        let blocking_key = key.clone();
        let loaded = tokio::task::spawn_blocking(move || load_thumbnail(&blocking_key, disk_dir.as_deref()))
            .await
            .map_err(PickerError::from)
            .and_then(|result| result);

        match loaded {
            Ok(picture) => {
                self.store(key, picture.clone());
                Some(picture)
            }
            Err(e) => {
                tracing::warn!("Thumbnail unavailable for {}: {}", request.identifier, e);
                None
            }
        }
    }

    /// Number of thumbnails held in memory
    pub fn memory_len(&self) -> usize {
        self.memory().len()
    }

    // `get` promotes the entry, so thumbnails on screen outlive ones
    // scrolled past long ago.
    fn lookup(&self, key: &CacheKey) -> Option<Picture> {
        self.memory().get(key).cloned()
    }

    fn store(&self, key: CacheKey, picture: Picture) {
        self.memory().put(key, picture);
    }

    // A poisoned lock only means another request panicked mid-insert; the
    // map itself is still usable.
    fn memory(&self) -> MutexGuard<'_, LruCache<CacheKey, Picture>> {
        self.inner.memory.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// `<cache_dir>/photo-picker/thumbnails`
pub fn default_disk_dir() -> Result<PathBuf> {
    let mut path = dirs::cache_dir()
        .or_else(dirs::home_dir)
        .ok_or(PickerError::MissingDirectory("cache"))?;
    path.push("photo-picker");
    path.push("thumbnails");
    Ok(path)
}

/// Delete the least recently written thumbnails in `dir` until the tier
/// fits in `max_bytes`. Returns how many files were removed.
pub fn prune_disk_tier(dir: &Path, max_bytes: u64) -> Result<usize> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let meta = entry.metadata()?;
        if !meta.is_file() {
            continue;
        }
        let modified = meta.modified().unwrap_or(UNIX_EPOCH);
        files.push((modified, meta.len(), entry.path()));
    }

    let mut total: u64 = files.iter().map(|(_, len, _)| len).sum();
    if total <= max_bytes {
        return Ok(0);
    }

    files.sort_by_key(|(modified, _, _)| *modified);

    let mut removed = 0;
    for (_, len, path) in files {
        if total <= max_bytes {
            break;
        }
        match fs::remove_file(&path) {
            Ok(()) => {
                total = total.saturating_sub(len);
                removed += 1;
            }
            Err(e) => tracing::debug!("Could not remove {}: {}", path.display(), e),
        }
    }
    Ok(removed)
}

/// Blocking load: disk tier first, then decode and resize the source
fn load_thumbnail(key: &CacheKey, disk_dir: Option<&Path>) -> Result<Picture> {
    let source = Path::new(&key.identifier);
    let disk_path = disk_dir.map(|dir| dir.join(disk_file_name(key, source)));

    if let Some(path) = disk_path.as_deref() {
        if path.exists() {
            match image::open(path) {
                Ok(cached) => return Ok(Picture::from_image(cached.to_rgba8())),
                Err(e) => tracing::debug!("Ignoring unreadable cached thumbnail {}: {}", path.display(), e),
            }
        }
    }

    let decoded = image::open(source)?;
    let thumbnail = resize_for_mode(decoded, key.width, key.height, key.mode);

    if let Some(path) = disk_path.as_deref() {
        if let Err(e) = thumbnail.save(path) {
            tracing::debug!("Could not write thumbnail {}: {}", path.display(), e);
        }
    }

    Ok(Picture::from_image(thumbnail.to_rgba8()))
}

fn resize_for_mode(image: DynamicImage, width: u32, height: u32, mode: ContentMode) -> DynamicImage {
    let (width, height) = (width.max(1), height.max(1));
    match mode {
        ContentMode::AspectFill => image.resize_to_fill(width, height, FilterType::Lanczos3),
        ContentMode::AspectFit => image.resize(width, height, FilterType::Lanczos3),
        ContentMode::Center => {
            if image.width() > width || image.height() > height {
                image.resize(width, height, FilterType::Lanczos3)
            } else {
                image
            }
        }
    }
}

/// Name of the disk tier file; the source's modification time is part of
/// the hash so an edited file gets a fresh thumbnail.
fn disk_file_name(key: &CacheKey, source: &Path) -> String {
    let modified = fs::metadata(source)
        .and_then(|meta| meta.modified())
        .ok()
        .and_then(|time| time.duration_since(UNIX_EPOCH).ok())
        .map(|age| age.as_secs())
        .unwrap_or(0);

    let mut hasher = Sha256::new();
    hasher.update(key.identifier.as_bytes());
    hasher.update(modified.to_le_bytes());
    let digest = hex::encode(hasher.finalize());

    let mode = match key.mode {
        ContentMode::AspectFill => "fill",
        ContentMode::AspectFit => "fit",
        ContentMode::Center => "center",
    };
    format!("{}_{}x{}_{}.png", &digest[..32], key.width, key.height, mode)
}
