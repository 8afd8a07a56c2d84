//! JSON file storage for album records.
//!
//! Albums are kept as a pretty-printed JSON array. The default location is
//! the XDG data directory, `~/.local/share/aq/albums.json` on Linux.

use std::fs;
use std::io;
use std::path::PathBuf;

use directories::ProjectDirs;
use thiserror::Error;

use crate::album::Album;

/// Default album filename.
const ALBUMS_FILENAME: &str = "albums.json";

/// Application qualifier (for XDG paths).
const QUALIFIER: &str = "";

/// Application organization (for XDG paths).
const ORGANIZATION: &str = "";

/// Application name (for XDG paths).
const APPLICATION: &str = "aq";

/// Errors that can occur while reading or writing the album file.
#[derive(Debug, Error)]
pub enum AlbumStoreError {
    /// Failed to determine XDG data directory.
    #[error("failed to determine data directory: no valid home directory found")]
    NoDataDir,

    /// I/O error during file read.
    #[error("failed to read album file '{path}': {source}")]
    ReadError {
        /// The path that failed to read.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during file write.
    #[error("failed to write album file '{path}': {source}")]
    WriteError {
        /// The path that failed to write.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// I/O error during directory creation.
    #[error("failed to create data directory '{path}': {source}")]
    CreateDirError {
        /// The directory path that failed to create.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for album store operations.
pub type Result<T> = std::result::Result<T, AlbumStoreError>;

/// Reads and writes the album file.
///
/// # Example
///
/// ```no_run
/// use album_filter_rs::AlbumStore;
///
/// let store = AlbumStore::new()?;
/// let albums = store.load()?;
/// println!("{} albums", albums.len());
/// # Ok::<(), album_filter_rs::AlbumStoreError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AlbumStore {
    /// Path to the album file.
    path: PathBuf,
}

impl AlbumStore {
    /// Creates a store using the default XDG data path.
    ///
    /// # Errors
    ///
    /// Returns `AlbumStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn new() -> Result<Self> {
        let path = Self::default_path()?;
        Ok(Self { path })
    }

    /// Creates a store reading from a custom path.
    pub fn with_path(path: PathBuf) -> Self {
        Self { path }
    }

    /// Returns the default path of the album file.
    ///
    /// # Errors
    ///
    /// Returns `AlbumStoreError::NoDataDir` if the home directory cannot be determined.
    pub fn default_path() -> Result<PathBuf> {
        let project_dirs = ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION)
            .ok_or(AlbumStoreError::NoDataDir)?;

        Ok(project_dirs.data_dir().join(ALBUMS_FILENAME))
    }

    /// Returns the path to the album file.
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Returns true if the album file exists on disk.
    pub fn exists(&self) -> bool {
        self.path.exists()
    }

    /// Loads all albums.
    ///
    /// # Errors
    ///
    /// - Returns `AlbumStoreError::ReadError` if the file cannot be read.
    /// - Returns `AlbumStoreError::Json` if the file is not a JSON array of albums.
    pub fn load(&self) -> Result<Vec<Album>> {
        let contents = fs::read_to_string(&self.path).map_err(|e| AlbumStoreError::ReadError {
            path: self.path.clone(),
            source: e,
        })?;
        let albums: Vec<Album> = serde_json::from_str(&contents)?;
        tracing::debug!(path = %self.path.display(), count = albums.len(), "loaded albums");
        Ok(albums)
    }

    /// Writes all albums, replacing the file.
    ///
    /// Creates the parent directory if it doesn't exist. Writes go to a
    /// temporary file first and are renamed into place.
    ///
    /// # Errors
    ///
    /// - Returns `AlbumStoreError::CreateDirError` if the directory cannot be created.
    /// - Returns `AlbumStoreError::WriteError` if the file cannot be written.
    /// - Returns `AlbumStoreError::Json` if serialization fails.
    pub fn save(&self, albums: &[Album]) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| AlbumStoreError::CreateDirError {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let json = serde_json::to_string_pretty(albums)?;

        let temp_path = self.path.with_extension("tmp");
        fs::write(&temp_path, &json).map_err(|e| AlbumStoreError::WriteError {
            path: temp_path.clone(),
            source: e,
        })?;
        fs::rename(&temp_path, &self.path).map_err(|e| AlbumStoreError::WriteError {
            path: self.path.clone(),
            source: e,
        })?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_path_ends_with_albums_file() {
        let path = AlbumStore::default_path().expect("should get default path");
        let path_str = path.to_string_lossy();

        assert!(
            path_str.ends_with("albums.json"),
            "path should end with albums.json: {}",
            path_str
        );
        assert!(path_str.contains("aq"), "path should contain 'aq': {}", path_str);
        assert!(path.is_absolute(), "path should be absolute: {:?}", path);
    }

    #[test]
    fn test_with_custom_path() {
        let custom_path = PathBuf::from("/tmp/test/albums.json");
        let store = AlbumStore::with_path(custom_path.clone());

        assert_eq!(store.path(), &custom_path);
    }

    #[test]
    fn test_read_error_includes_file_path() {
        let store = AlbumStore::with_path(PathBuf::from("/nonexistent/path/to/albums.json"));

        let error = store.load().unwrap_err();
        let error_msg = error.to_string();

        assert!(
            error_msg.contains("/nonexistent/path/to/albums.json"),
            "error should include file path: {}",
            error_msg
        );
        assert!(
            error_msg.contains("failed to read album file"),
            "error should describe the operation: {}",
            error_msg
        );
    }
}
