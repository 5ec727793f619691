//! Exercise catalog: the ordered list of exercise definitions
//!
//! The catalog is loaded once at startup and written back to the store after
//! every mutation. List order is browsing order, so new exercises are appended
//! and nothing is ever re-sorted.

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::{
    error::{Result, SessionError, StoreError, ValidationError},
    storage::Store,
    units::{self, Unit},
};

const GENERATED_ID_PREFIX: &str = "ex_";

/// A persisted exercise with its session defaults
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExerciseDefinition {
    pub id: String,
    pub name: String,
    pub default_sets: u32,
    pub default_reps: u32,
    /// Expressed in the global unit preference
    pub default_weight: f64,
    #[serde(default)]
    pub stopwatch_enabled: bool,
}

/// Form values for creating an exercise
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExercise {
    pub name: String,
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    #[serde(default)]
    pub stopwatch_enabled: bool,
}

impl NewExercise {
    pub fn validate(&self) -> std::result::Result<(), ValidationError> {
        validate_name(&self.name)?;
        validate_defaults(&ExerciseDefaults {
            sets: self.sets,
            reps: self.reps,
            weight: self.weight,
            stopwatch_enabled: self.stopwatch_enabled,
        })
    }
}

/// The mutable defaults of an exercise, written back by "save settings"
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExerciseDefaults {
    pub sets: u32,
    pub reps: u32,
    pub weight: f64,
    pub stopwatch_enabled: bool,
}

pub(crate) fn validate_name(name: &str) -> std::result::Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }
    Ok(())
}

pub(crate) fn validate_weight(weight: f64) -> std::result::Result<(), ValidationError> {
    if !weight.is_finite() || weight < 0.0 {
        return Err(ValidationError::InvalidWeight(weight));
    }
    Ok(())
}

fn validate_defaults(defaults: &ExerciseDefaults) -> std::result::Result<(), ValidationError> {
    if defaults.sets == 0 {
        return Err(ValidationError::NonPositiveSets);
    }
    if defaults.reps == 0 {
        return Err(ValidationError::NonPositiveReps);
    }
    validate_weight(defaults.weight)
}

/// Built-in exercises used when the store holds no list yet
pub fn seed_exercises() -> Vec<ExerciseDefinition> {
    [
        ("bench", "Bench Press", 4, 10, 60.0),
        ("squat", "Squat", 5, 5, 80.0),
        ("pullup", "Pull-ups", 4, 8, 0.0),
        ("dl", "Deadlift", 3, 5, 100.0),
    ]
    .into_iter()
    .map(|(id, name, sets, reps, weight)| ExerciseDefinition {
        id: id.to_string(),
        name: name.to_string(),
        default_sets: sets,
        default_reps: reps,
        default_weight: weight,
        stopwatch_enabled: false,
    })
    .collect()
}

/// In-memory exercise list bound to its store
pub struct ExerciseCatalog {
    exercises: Vec<ExerciseDefinition>,
    store: Arc<dyn Store>,
    /// Millisecond stamp of the newest generated id; generated ids only grow
    last_issued: i64,
    write_errors: Vec<String>,
}

impl ExerciseCatalog {
    /// Load the catalog from `store`, seeding the built-in list when absent
    pub fn load(store: Arc<dyn Store>) -> std::result::Result<Self, StoreError> {
        let exercises = match store.load_exercises()? {
            Some(exercises) => {
                info!("Loaded {} exercises from store", exercises.len());
                exercises
            }
            None => {
                info!("No stored exercises, using built-in defaults");
                seed_exercises()
            }
        };

        let last_issued = exercises
            .iter()
            .filter_map(|e| e.id.strip_prefix(GENERATED_ID_PREFIX))
            .filter_map(|stamp| stamp.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        Ok(Self {
            exercises,
            store,
            last_issued,
            write_errors: Vec::new(),
        })
    }

    /// All exercises in browsing order
    pub fn all(&self) -> &[ExerciseDefinition] {
        &self.exercises
    }

    pub fn get(&self, id: &str) -> Option<&ExerciseDefinition> {
        self.exercises.iter().find(|e| e.id == id)
    }

    pub fn len(&self) -> usize {
        self.exercises.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exercises.is_empty()
    }

    /// Validate and append a new exercise under a freshly generated id
    pub fn add(&mut self, new: NewExercise) -> Result<ExerciseDefinition> {
        new.validate()?;

        let definition = ExerciseDefinition {
            id: self.next_id(),
            name: new.name.trim().to_string(),
            default_sets: new.sets,
            default_reps: new.reps,
            default_weight: new.weight,
            stopwatch_enabled: new.stopwatch_enabled,
        };

        info!("Adding exercise {} ({})", definition.name, definition.id);
        self.exercises.push(definition.clone());
        self.persist();
        Ok(definition)
    }

    /// Remove an exercise; the caller is responsible for having confirmed it
    pub fn remove(&mut self, id: &str) -> Result<ExerciseDefinition> {
        let index = self.index_of(id)?;
        let removed = self.exercises.remove(index);

        info!("Removed exercise {} ({})", removed.name, removed.id);
        self.persist();
        Ok(removed)
    }

    /// Overwrite the defaults of an exercise
    pub fn update_defaults(&mut self, id: &str, defaults: ExerciseDefaults) -> Result<ExerciseDefinition> {
        validate_defaults(&defaults)?;
        let index = self.index_of(id)?;

        let exercise = &mut self.exercises[index];
        exercise.default_sets = defaults.sets;
        exercise.default_reps = defaults.reps;
        exercise.default_weight = defaults.weight;
        exercise.stopwatch_enabled = defaults.stopwatch_enabled;
        let updated = exercise.clone();

        debug!("Updated defaults for {}: {:?}", id, defaults);
        self.persist();
        Ok(updated)
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<ExerciseDefinition> {
        validate_name(name)?;
        let index = self.index_of(id)?;

        let exercise = &mut self.exercises[index];
        exercise.name = name.trim().to_string();
        let renamed = exercise.clone();

        info!("Renamed exercise {} to {}", id, renamed.name);
        self.persist();
        Ok(renamed)
    }

    /// Convert every default weight after a unit preference change
    pub fn rescale_weights(&mut self, from: Unit, to: Unit) {
        if from == to {
            return;
        }

        for exercise in &mut self.exercises {
            exercise.default_weight = units::convert(exercise.default_weight, from, to);
        }

        info!("Converted {} exercise weights from {} to {}", self.exercises.len(), from, to);
        self.persist();
    }

    /// Drain the store failures collected since the last call
    pub fn take_write_errors(&mut self) -> Vec<String> {
        std::mem::take(&mut self.write_errors)
    }

    pub(crate) fn store(&self) -> &Arc<dyn Store> {
        &self.store
    }

    fn index_of(&self, id: &str) -> Result<usize> {
        self.exercises
            .iter()
            .position(|e| e.id == id)
            .ok_or_else(|| SessionError::UnknownExercise(id.to_string()))
    }

    fn next_id(&mut self) -> String {
        let mut stamp = Utc::now().timestamp_millis().max(self.last_issued + 1);
        while self.get(&format!("{}{}", GENERATED_ID_PREFIX, stamp)).is_some() {
            stamp += 1;
        }
        self.last_issued = stamp;
        format!("{}{}", GENERATED_ID_PREFIX, stamp)
    }

    fn persist(&mut self) {
        if let Err(e) = self.store.save_exercises(&self.exercises) {
            warn!("Failed to persist exercise catalog: {}", e);
            self.write_errors.push(format!("Saving exercises failed: {}", e));
        }
    }
}

impl std::fmt::Debug for ExerciseCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExerciseCatalog")
            .field("exercises", &self.exercises)
            .field("last_issued", &self.last_issued)
            .finish()
    }
}
