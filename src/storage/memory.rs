//! In-memory store, shared between clones

use std::sync::{Arc, Mutex, MutexGuard};

use super::Store;
use crate::{catalog::ExerciseDefinition, error::StoreError, units::Unit};

#[derive(Debug, Default)]
struct MemoryData {
    exercises: Option<Vec<ExerciseDefinition>>,
    unit: Option<Unit>,
    fail_writes: bool,
    writes: usize,
}

/// Store backed by process memory. Clones see the same data, which lets a
/// caller keep a handle and inspect what the catalog persisted.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    inner: Arc<Mutex<MemoryData>>,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with an exercise list
    pub fn with_exercises(exercises: Vec<ExerciseDefinition>) -> Self {
        let store = Self::new();
        if let Ok(mut data) = store.inner.lock() {
            data.exercises = Some(exercises);
        }
        store
    }

    /// Pre-populate the unit preference
    pub fn with_unit(self, unit: Unit) -> Self {
        if let Ok(mut data) = self.inner.lock() {
            data.unit = Some(unit);
        }
        self
    }

    /// Make every subsequent write fail
    pub fn set_fail_writes(&self, fail: bool) {
        if let Ok(mut data) = self.inner.lock() {
            data.fail_writes = fail;
        }
    }

    /// Currently stored exercise list
    pub fn exercises(&self) -> Option<Vec<ExerciseDefinition>> {
        self.inner.lock().ok().and_then(|data| data.exercises.clone())
    }

    /// Currently stored unit preference
    pub fn unit(&self) -> Option<Unit> {
        self.inner.lock().ok().and_then(|data| data.unit)
    }

    /// Number of successful writes so far
    pub fn write_count(&self) -> usize {
        self.inner.lock().map(|data| data.writes).unwrap_or(0)
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryData>, StoreError> {
        self.inner
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }

    fn lock_for_write(&self, key: &'static str) -> Result<MutexGuard<'_, MemoryData>, StoreError> {
        let data = self.lock()?;
        if data.fail_writes {
            return Err(StoreError::Write {
                key,
                source: std::io::Error::new(std::io::ErrorKind::Other, "writes disabled"),
            });
        }
        Ok(data)
    }
}

impl Store for MemoryStore {
    fn load_exercises(&self) -> Result<Option<Vec<ExerciseDefinition>>, StoreError> {
        Ok(self.lock()?.exercises.clone())
    }

    fn save_exercises(&self, exercises: &[ExerciseDefinition]) -> Result<(), StoreError> {
        let mut data = self.lock_for_write(super::EXERCISES_KEY)?;
        data.exercises = Some(exercises.to_vec());
        data.writes += 1;
        Ok(())
    }

    fn load_unit(&self) -> Result<Option<Unit>, StoreError> {
        Ok(self.lock()?.unit)
    }

    fn save_unit(&self, unit: Unit) -> Result<(), StoreError> {
        let mut data = self.lock_for_write(super::UNIT_KEY)?;
        data.unit = Some(unit);
        data.writes += 1;
        Ok(())
    }
}
