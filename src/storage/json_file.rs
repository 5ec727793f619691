//! JSON file store living in a data directory

use std::{
    fs::{self, File, OpenOptions},
    io::{self, Write},
    path::{Path, PathBuf},
};

use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, info};

use super::{Store, EXERCISES_KEY, UNIT_KEY};
use crate::{catalog::ExerciseDefinition, error::StoreError, units::Unit};

/// Store that keeps one `<key>.json` file per key
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Create a store rooted at `dir`; the directory is created on first write
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key))
    }

    fn read<T: DeserializeOwned>(&self, key: &'static str) -> Result<Option<T>, StoreError> {
        let path = self.path_for(key);
        let data = match fs::read_to_string(&path) {
            Ok(data) => data,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!("No stored value for {} at {}", key, path.display());
                return Ok(None);
            }
            Err(source) => return Err(StoreError::Read { key, source }),
        };

        serde_json::from_str(&data)
            .map(Some)
            .map_err(|source| StoreError::Parse { key, source })
    }

    fn write<T: Serialize + ?Sized>(&self, key: &'static str, value: &T) -> Result<(), StoreError> {
        let content = serde_json::to_vec_pretty(value)
            .map_err(|source| StoreError::Serialize { key, source })?;

        write_atomically(&self.path_for(key), &content)
            .map_err(|source| StoreError::Write { key, source })?;

        debug!("Persisted {} to {}", key, self.dir.display());
        Ok(())
    }
}

impl Store for JsonFileStore {
    fn load_exercises(&self) -> Result<Option<Vec<ExerciseDefinition>>, StoreError> {
        self.read(EXERCISES_KEY)
    }

    fn save_exercises(&self, exercises: &[ExerciseDefinition]) -> Result<(), StoreError> {
        self.write(EXERCISES_KEY, exercises)
    }

    fn load_unit(&self) -> Result<Option<Unit>, StoreError> {
        self.read(UNIT_KEY)
    }

    fn save_unit(&self, unit: Unit) -> Result<(), StoreError> {
        info!("Saving unit preference: {}", unit);
        self.write(UNIT_KEY, &unit)
    }
}

/// Write through a temp file in the same directory, then rename over the target.
fn write_atomically(path: &Path, content: &[u8]) -> io::Result<()> {
    let parent = path.parent().ok_or_else(|| {
        io::Error::new(io::ErrorKind::InvalidInput, "Path has no parent directory")
    })?;
    fs::create_dir_all(parent)?;

    let temp_path = path.with_file_name(format!(
        ".{}.tmp.{}",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id()
    ));

    {
        let mut file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)?;
        file.write_all(content)?;
        file.sync_all()?;
    }

    fs::rename(&temp_path, path)?;

    #[cfg(unix)]
    {
        if let Ok(dir) = File::open(parent) {
            if let Err(e) = dir.sync_all() {
                debug!("Failed to sync directory {}: {}", parent.display(), e);
            }
        }
    }

    Ok(())
}
