use chrono::Utc;
use rusqlite::{params, Connection, ErrorCode, Row};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::data::{Asset, MediaKind};
use super::item::DisplayItem;
use crate::error::{PickerError, Result};
use crate::media::probe;

/// Result of a folder import operation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub imported_count: usize,
    pub skipped_count: usize,
}

/// Outcome of importing a single file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImportOutcome {
    Imported,
    Duplicate,
    Unsupported,
}

/// The MediaLibrary manages the SQLite catalog of photos and videos.
/// It is the picker grid's data source.
pub struct MediaLibrary {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl MediaLibrary {
    /// Open or create the library database at `db_path`
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        tracing::debug!("Library database at {}", db_path.display());

        let library = MediaLibrary {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// A throwaway library, used by tests
    pub fn open_in_memory() -> Result<Self> {
        let library = MediaLibrary {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        library.init_schema()?;
        Ok(library)
    }

    /// `<data_dir>/photo-picker/library.db`
    pub fn default_path() -> Result<PathBuf> {
        let mut path = dirs::data_dir()
            .or_else(dirs::home_dir)
            .ok_or(PickerError::MissingDirectory("data"))?;
        path.push("photo-picker");
        path.push("library.db");
        Ok(path)
    }

    /// Create the tables and indexes if they don't exist
    fn init_schema(&self) -> Result<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS assets (
                id                  INTEGER PRIMARY KEY AUTOINCREMENT,
                path                TEXT NOT NULL UNIQUE,
                filename            TEXT NOT NULL,
                media_type          TEXT NOT NULL,
                duration_seconds    REAL,
                imported_at         INTEGER NOT NULL,
                file_status         TEXT NOT NULL DEFAULT 'exists'
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_assets_imported_at
             ON assets(imported_at DESC)",
            [],
        )?;

        Ok(())
    }

    /// Path to the database file (`None` for in-memory libraries)
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn asset_count(&self) -> Result<i64> {
        let count: i64 = self.conn.query_row("SELECT COUNT(*) FROM assets", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Import one file; unsupported extensions are ignored
    pub fn import_file(&self, path: &Path) -> Result<ImportOutcome> {
        let Some(kind) = path
            .extension()
            .and_then(|extension| MediaKind::from_extension(&extension.to_string_lossy()))
        else {
            return Ok(ImportOutcome::Unsupported);
        };

        let path_str = path.to_string_lossy().to_string();
        let filename = path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string();

        let duration_seconds = match kind {
            MediaKind::Video => probe::probe_duration(path),
            MediaKind::Image => None,
        };

        let result = self.conn.execute(
            "INSERT INTO assets (path, filename, media_type, duration_seconds, imported_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![path_str, filename, kind.as_str(), duration_seconds, Utc::now().timestamp()],
        );

        match result {
            Ok(_) => Ok(ImportOutcome::Imported),
            Err(rusqlite::Error::SqliteFailure(err, _)) if err.code == ErrorCode::ConstraintViolation => {
                Ok(ImportOutcome::Duplicate)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Recursively import every supported file under `folder`
    pub fn import_folder(&self, folder: &Path) -> Result<ImportSummary> {
        tracing::info!("Scanning folder: {}", folder.display());
        let mut summary = ImportSummary::default();

        for entry in WalkDir::new(folder)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            match self.import_file(path) {
                Ok(ImportOutcome::Imported) => {
                    summary.imported_count += 1;
                    if summary.imported_count % 100 == 0 {
                        tracing::debug!("Imported {} files...", summary.imported_count);
                    }
                }
                Ok(ImportOutcome::Duplicate) => summary.skipped_count += 1,
                Ok(ImportOutcome::Unsupported) => {}
                Err(e) => tracing::warn!("Error importing {}: {}", path.display(), e),
            }
        }

        tracing::info!(
            "Import complete: {} new, {} skipped",
            summary.imported_count,
            summary.skipped_count
        );
        Ok(summary)
    }

    /// All assets, newest import first
    pub fn assets(&self) -> Result<Vec<Asset>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, filename, path, media_type, duration_seconds, file_status
             FROM assets
             ORDER BY imported_at DESC, id DESC",
        )?;

        let assets = stmt
            .query_map([], asset_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(assets)
    }

    /// What the grid shows, in order; deleted files are left out
    pub fn display_items(&self) -> Result<Vec<DisplayItem>> {
        Ok(self
            .assets()?
            .iter()
            .filter(|asset| asset.file_status == "exists")
            .map(Asset::display_item)
            .collect())
    }

    /// Mark assets whose files disappeared as 'deleted'
    pub fn verify_files(&self) -> Result<usize> {
        let mut stmt = self
            .conn
            .prepare("SELECT id, path FROM assets WHERE file_status = 'exists'")?;

        let existing: Vec<(i64, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))?
            .filter_map(|r| r.ok())
            .collect();

        let mut deleted_count = 0;
        for (id, file_path) in existing {
            if !Path::new(&file_path).exists() {
                self.conn.execute(
                    "UPDATE assets SET file_status = 'deleted' WHERE id = ?1",
                    params![id],
                )?;
                deleted_count += 1;
            }
        }

        if deleted_count > 0 {
            tracing::info!("Marked {} missing files as deleted", deleted_count);
        }
        Ok(deleted_count)
    }
}

fn asset_from_row(row: &Row<'_>) -> rusqlite::Result<Asset> {
    let media_type: String = row.get(3)?;
    Ok(Asset {
        id: row.get(0)?,
        filename: row.get(1)?,
        path: row.get(2)?,
        // Rows are only written by `import_file`, so the fallback never hits in practice
        kind: MediaKind::parse(&media_type).unwrap_or(MediaKind::Image),
        duration_seconds: row.get(4)?,
        file_status: row.get(5)?,
    })
}

impl std::fmt::Debug for MediaLibrary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MediaLibrary")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::probe::tests::mvhd_v0;
    use std::fs;

    #[test]
    fn test_import_folder_classifies_files() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.jpg"), b"jpeg").unwrap();
        fs::create_dir(dir.path().join("nested")).unwrap();
        fs::write(dir.path().join("nested").join("clip.mp4"), mvhd_v0(1000, 75_000)).unwrap();
        fs::write(dir.path().join("broken.mov"), b"no header").unwrap();
        fs::write(dir.path().join("notes.txt"), b"ignore me").unwrap();

        let library = MediaLibrary::open_in_memory().unwrap();
        let summary = library.import_folder(dir.path()).unwrap();

        assert_eq!(summary.imported_count, 3);
        assert_eq!(summary.skipped_count, 0);
        assert_eq!(library.asset_count().unwrap(), 3);

        let assets = library.assets().unwrap();
        let clip = assets.iter().find(|a| a.filename == "clip.mp4").unwrap();
        assert_eq!(clip.kind, MediaKind::Video);
        assert_eq!(clip.duration_seconds, Some(75.0));

        let items = library.display_items().unwrap();
        assert_eq!(items.len(), 3);
        assert_eq!(
            items.iter().filter(|i| matches!(i, DisplayItem::VideoPlaceholder)).count(),
            1
        );
    }

    #[test]
    fn test_reimport_skips_duplicates() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.png"), b"png").unwrap();
        fs::write(dir.path().join("b.png"), b"png").unwrap();

        let library = MediaLibrary::open_in_memory().unwrap();
        library.import_folder(dir.path()).unwrap();
        let again = library.import_folder(dir.path()).unwrap();

        assert_eq!(
            again,
            ImportSummary {
                imported_count: 0,
                skipped_count: 2
            }
        );
    }

    #[test]
    fn test_unsupported_file_is_not_imported() {
        let library = MediaLibrary::open_in_memory().unwrap();
        let outcome = library.import_file(Path::new("/photos/raw.nef")).unwrap();
        assert_eq!(outcome, ImportOutcome::Unsupported);
        assert_eq!(library.asset_count().unwrap(), 0);
    }

    #[test]
    fn test_deleted_files_leave_the_grid() {
        let dir = tempfile::tempdir().unwrap();
        let keep = dir.path().join("keep.jpg");
        let gone = dir.path().join("gone.jpg");
        fs::write(&keep, b"jpeg").unwrap();
        fs::write(&gone, b"jpeg").unwrap();

        let library = MediaLibrary::open_in_memory().unwrap();
        library.import_folder(dir.path()).unwrap();
        fs::remove_file(&gone).unwrap();

        assert_eq!(library.verify_files().unwrap(), 1);
        let items = library.display_items().unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].identifier(), Some(&*keep.to_string_lossy()));
    }

    #[test]
    fn test_on_disk_library_persists() {
        let dir = tempfile::tempdir().unwrap();
        let db_path = dir.path().join("data").join("library.db");
        fs::write(dir.path().join("a.jpg"), b"jpeg").unwrap();

        {
            let library = MediaLibrary::open(&db_path).unwrap();
            library.import_file(&dir.path().join("a.jpg")).unwrap();
        }

        let reopened = MediaLibrary::open(&db_path).unwrap();
        assert_eq!(reopened.path(), Some(db_path.as_path()));
        assert_eq!(reopened.asset_count().unwrap(), 1);
    }
}
