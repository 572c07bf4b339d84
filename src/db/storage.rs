use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tempfile::NamedTempFile;
use tracing::debug;

/// Whole-document byte storage behind the record store.
pub trait DocumentStorage: Send + Sync {
    /// Returns `Ok(None)` when no document has been written yet.
    fn read(&self) -> io::Result<Option<Vec<u8>>>;

    /// Replaces the document. On error the previous document must be intact.
    fn write(&self, bytes: &[u8]) -> io::Result<()>;

    /// Human-readable location used in log lines.
    fn describe(&self) -> String;
}

pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStorage for FileStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        match fs::read(&self.path) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e),
        }
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        // temp file in the same directory, then rename over the old document
        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path)?;

        debug!("wrote {} bytes to {}", bytes.len(), self.path.display());
        Ok(())
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// In-process storage, used by tests and throwaway instances.
#[derive(Default)]
pub struct MemoryStorage {
    document: Mutex<Option<Vec<u8>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_document(bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            document: Mutex::new(Some(bytes.into())),
        }
    }

    fn lock(&self) -> io::Result<std::sync::MutexGuard<'_, Option<Vec<u8>>>> {
        self.document
            .lock()
            .map_err(|_| io::Error::other("memory storage lock poisoned"))
    }
}

impl DocumentStorage for MemoryStorage {
    fn read(&self) -> io::Result<Option<Vec<u8>>> {
        Ok(self.lock()?.clone())
    }

    fn write(&self, bytes: &[u8]) -> io::Result<()> {
        *self.lock()? = Some(bytes.to_vec());
        Ok(())
    }

    fn describe(&self) -> String {
        "<memory>".to_string()
    }
}
