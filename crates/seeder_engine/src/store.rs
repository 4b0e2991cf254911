use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use rand::Rng;
use seeder_core::random_token;
use seeder_logging::seeder_warn;
use tempfile::NamedTempFile;
use thiserror::Error;

/// Length of the random lowercase name given to each downloaded item.
pub const ITEM_NAME_LEN: usize = 10;

const MAX_NAME_ATTEMPTS: usize = 16;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store directory {path:?} missing or not writable: {message}")]
    StoreDir { path: PathBuf, message: String },
    #[error("no free item name after {attempts} attempts")]
    NamesExhausted { attempts: usize },
    #[error("io error: {0}")]
    Io(#[from] io::Error),
}

fn store_dir_error(path: &Path, message: impl ToString) -> StoreError {
    StoreError::StoreDir {
        path: path.to_path_buf(),
        message: message.to_string(),
    }
}

/// Ensure the store directory exists and is writable; create it if missing.
pub fn ensure_store_dir(dir: &Path) -> Result<(), StoreError> {
    if dir.exists() {
        let meta = fs::metadata(dir).map_err(|e| store_dir_error(dir, e))?;
        if !meta.is_dir() {
            return Err(store_dir_error(dir, "path is not a directory"));
        }
    } else {
        fs::create_dir_all(dir).map_err(|e| store_dir_error(dir, e))?;
    }
    // Writability probe; the temp file is removed on drop.
    NamedTempFile::new_in(dir).map_err(|e| store_dir_error(dir, e))?;
    Ok(())
}

/// Directory holding one file per collected item.
///
/// Items are regular files whose names do not start with `.`; in-flight temp
/// files are hidden and therefore never enumerated.
#[derive(Debug, Clone)]
pub struct CollectionStore {
    dir: PathBuf,
}

impl CollectionStore {
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        ensure_store_dir(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_of(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    /// Writes `bytes` under a fresh random name and returns that name.
    ///
    /// The content is written to a temp file first and then linked into place
    /// without replacing anything; a taken name is retried with a new one.
    pub fn insert<R: Rng + ?Sized>(&self, bytes: &[u8], rng: &mut R) -> Result<String, StoreError> {
        let mut tmp = NamedTempFile::new_in(&self.dir)?;
        tmp.write_all(bytes)?;
        tmp.flush()?;

        for _ in 0..MAX_NAME_ATTEMPTS {
            let name = random_token(rng, ITEM_NAME_LEN);
            match tmp.persist_noclobber(self.path_of(&name)) {
                Ok(_) => return Ok(name),
                Err(err) if err.error.kind() == io::ErrorKind::AlreadyExists => {
                    tmp = err.file;
                }
                Err(err) => return Err(StoreError::Io(err.error)),
            }
        }
        Err(StoreError::NamesExhausted {
            attempts: MAX_NAME_ATTEMPTS,
        })
    }

    /// Snapshot of the current item names, sorted.
    pub fn items(&self) -> Result<Vec<String>, StoreError> {
        let mut names = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    seeder_warn!("skipping unreadable entry in {:?}: {}", self.dir, err);
                    continue;
                }
            };
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.starts_with('.') {
                continue;
            }
            if entry.file_type().map(|t| t.is_file()).unwrap_or(false) {
                names.push(name);
            }
        }
        names.sort();
        Ok(names)
    }

    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.items()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    pub fn open_item(&self, name: &str) -> io::Result<File> {
        File::open(self.path_of(name))
    }

    pub fn read(&self, name: &str) -> io::Result<Vec<u8>> {
        fs::read(self.path_of(name))
    }

    pub fn remove(&self, name: &str) -> io::Result<()> {
        fs::remove_file(self.path_of(name))
    }
}
