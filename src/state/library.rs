use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension, Row};
use std::path::{Path, PathBuf};

use super::data::ImageRecord;
use crate::texture::{self, RotateError};

/// Highest numeric suffix handed out for duplicate names (`.999`)
const MAX_DUPLICATES: u32 = 999;

#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("catalog database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error(transparent)]
    Image(#[from] RotateError),

    #[error("image file not found: {0}")]
    NotFound(String),

    #[error("no free name left for `{0}` (.001 to .999 are taken)")]
    NameSpaceExhausted(String),

    #[error("failed to create catalog directory: {0}")]
    Io(#[from] std::io::Error),
}

/// The Library manages the SQLite image catalog.
///
/// It plays the part of the host's image datablocks: every loaded image gets
/// a unique name, and shader nodes refer to images by that name.
pub struct Library {
    conn: Connection,
    db_path: Option<PathBuf>,
}

impl Library {
    /// Open (or create) the catalog at `db_path`
    pub fn open(db_path: &Path) -> Result<Self, LibraryError> {
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let conn = Connection::open(db_path)?;
        log::debug!("📁 Image catalog at: {}", db_path.display());

        let library = Library {
            conn,
            db_path: Some(db_path.to_path_buf()),
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Catalog that lives only as long as this value
    pub fn open_in_memory() -> Result<Self, LibraryError> {
        let library = Library {
            conn: Connection::open_in_memory()?,
            db_path: None,
        };
        library.init_schema()?;
        Ok(library)
    }

    /// Where the catalog lives by default
    ///
    /// - Linux: ~/.local/share/boxproject-tools/images.db
    /// - macOS: ~/Library/Application Support/boxproject-tools/images.db
    /// - Windows: %APPDATA%\boxproject-tools\images.db
    pub fn default_path() -> Option<PathBuf> {
        let mut path = dirs::data_dir().or_else(dirs::home_dir)?;
        path.push("boxproject-tools");
        path.push("images.db");
        Some(path)
    }

    fn init_schema(&self) -> Result<(), LibraryError> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS images (
                id              INTEGER PRIMARY KEY AUTOINCREMENT,
                name            TEXT NOT NULL UNIQUE,
                filepath        TEXT NOT NULL,
                width           INTEGER NOT NULL,
                height          INTEGER NOT NULL,
                loaded_at       INTEGER NOT NULL
            )",
            [],
        )?;

        self.conn.execute(
            "CREATE INDEX IF NOT EXISTS idx_images_filepath ON images(filepath)",
            [],
        )?;

        Ok(())
    }

    /// Path of the database file, `None` for in-memory catalogs
    pub fn path(&self) -> Option<&Path> {
        self.db_path.as_deref()
    }

    pub fn image_count(&self) -> Result<i64, LibraryError> {
        let count = self
            .conn
            .query_row("SELECT COUNT(*) FROM images", [], |row| row.get(0))?;
        Ok(count)
    }

    fn record_from_row(row: &Row<'_>) -> rusqlite::Result<ImageRecord> {
        Ok(ImageRecord {
            id: row.get(0)?,
            name: row.get(1)?,
            filepath: row.get(2)?,
            width: row.get(3)?,
            height: row.get(4)?,
            loaded_at: row.get(5)?,
        })
    }

    pub fn get(&self, id: i64) -> Result<Option<ImageRecord>, LibraryError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, filepath, width, height, loaded_at FROM images WHERE id = ?1",
                params![id],
                Self::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    pub fn find_by_name(&self, name: &str) -> Result<Option<ImageRecord>, LibraryError> {
        let record = self
            .conn
            .query_row(
                "SELECT id, name, filepath, width, height, loaded_at FROM images WHERE name = ?1",
                params![name],
                Self::record_from_row,
            )
            .optional()?;
        Ok(record)
    }

    /// All images, oldest first
    pub fn all_images(&self) -> Result<Vec<ImageRecord>, LibraryError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, filepath, width, height, loaded_at FROM images ORDER BY id ASC",
        )?;

        let images = stmt
            .query_map([], Self::record_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(images)
    }

    /// Load an image file into the catalog and return its record
    ///
    /// The record is named after the file. A name that is already taken gets
    /// the first free `.001`-style suffix, the same way the host names
    /// duplicate datablocks. Loading the same file twice yields two records.
    pub fn load(&self, filepath: &str) -> Result<ImageRecord, LibraryError> {
        let path = Path::new(filepath);
        if !path.is_file() {
            return Err(LibraryError::NotFound(filepath.to_string()));
        }

        let (width, height) = texture::image_dimensions(path)?;
        let name = self.unique_name(file_name(filepath))?;
        let loaded_at = Utc::now().timestamp();

        self.conn.execute(
            "INSERT INTO images (name, filepath, width, height, loaded_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![name, filepath, width, height, loaded_at],
        )?;

        log::info!("📥 Loaded image {} ({}x{}) from {}", name, width, height, filepath);

        Ok(ImageRecord {
            id: self.conn.last_insert_rowid(),
            name,
            filepath: filepath.to_string(),
            width,
            height,
            loaded_at,
        })
    }

    fn name_taken(&self, name: &str) -> Result<bool, LibraryError> {
        let taken = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM images WHERE name = ?1)",
            params![name],
            |row| row.get(0),
        )?;
        Ok(taken)
    }

    fn unique_name(&self, base: &str) -> Result<String, LibraryError> {
        if !self.name_taken(base)? {
            return Ok(base.to_string());
        }

        for n in 1..=MAX_DUPLICATES {
            let candidate = format!("{}.{:03}", base, n);
            if !self.name_taken(&candidate)? {
                return Ok(candidate);
            }
        }

        Err(LibraryError::NameSpaceExhausted(base.to_string()))
    }

    /// Count catalog entries whose file is gone from disk
    pub fn verify_files(&self) -> Result<usize, LibraryError> {
        let missing = self
            .all_images()?
            .into_iter()
            .filter(|image| !Path::new(&image.filepath).exists())
            .inspect(|image| log::warn!("⚠️  Missing file for {}: {}", image.name, image.filepath))
            .count();

        if missing > 0 {
            log::warn!("⚠️  {} catalog images point at missing files", missing);
        }

        Ok(missing)
    }
}

/// Last path component, splitting on both separator styles
fn file_name(filepath: &str) -> &str {
    filepath
        .rsplit(['/', '\\'])
        .next()
        .unwrap_or(filepath)
}

impl std::fmt::Debug for Library {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Library")
            .field("db_path", &self.db_path)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::RgbImage;

    fn write_image(dir: &Path, name: &str, width: u32, height: u32) -> String {
        let path = dir.join(name);
        RgbImage::new(width, height).save(&path).unwrap();
        path.to_string_lossy().to_string()
    }

    #[test]
    fn test_load_and_find() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "brick.png", 4, 2);
        let library = Library::open_in_memory().unwrap();

        let record = library.load(&path).unwrap();
        assert_eq!(record.name, "brick.png");
        assert_eq!((record.width, record.height), (4, 2));

        assert_eq!(library.find_by_name("brick.png").unwrap(), Some(record.clone()));
        assert_eq!(library.get(record.id).unwrap(), Some(record));
        assert_eq!(library.find_by_name("other.png").unwrap(), None);
        assert_eq!(library.image_count().unwrap(), 1);
    }

    #[test]
    fn test_duplicate_names_get_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_image(dir.path(), "brick.png", 1, 1);
        let library = Library::open_in_memory().unwrap();

        let names: Vec<_> = (0..3).map(|_| library.load(&path).unwrap().name).collect();
        assert_eq!(names, vec!["brick.png", "brick.png.001", "brick.png.002"]);
    }

    #[test]
    fn test_load_missing_file() {
        let library = Library::open_in_memory().unwrap();
        let err = library.load("/definitely/not/here.png").unwrap_err();
        assert!(matches!(err, LibraryError::NotFound(_)));
        assert_eq!(library.image_count().unwrap(), 0);
    }

    #[test]
    fn test_verify_files() {
        let dir = tempfile::tempdir().unwrap();
        let keep = write_image(dir.path(), "keep.png", 1, 1);
        let gone = write_image(dir.path(), "gone.png", 1, 1);
        let library = Library::open_in_memory().unwrap();
        library.load(&keep).unwrap();
        library.load(&gone).unwrap();

        assert_eq!(library.verify_files().unwrap(), 0);
        std::fs::remove_file(&gone).unwrap();
        assert_eq!(library.verify_files().unwrap(), 1);
    }

    #[test]
    fn test_catalog_persists_on_disk() {
        let dir = tempfile::tempdir().unwrap();
        let image = write_image(dir.path(), "wood.jpg", 3, 3);
        let db = dir.path().join("catalog").join("images.db");

        {
            let library = Library::open(&db).unwrap();
            library.load(&image).unwrap();
        }

        let library = Library::open(&db).unwrap();
        assert_eq!(library.path(), Some(db.as_path()));
        let all = library.all_images().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "wood.jpg");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name("/a/b/c.png"), "c.png");
        assert_eq!(file_name("C:\\a\\c.png"), "c.png");
        assert_eq!(file_name("c.png"), "c.png");
    }
}
