//! Persistent store module
//!
//! The store keeps two keys: the ordered exercise list and the unit
//! preference. Absence of either means "use the built-in default".

pub mod json_file;
pub mod memory;

use crate::{catalog::ExerciseDefinition, error::StoreError, units::Unit};

// Re-export main types
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;

/// Key holding the exercise list
pub const EXERCISES_KEY: &str = "fitness_exercises";
/// Key holding the unit preference
pub const UNIT_KEY: &str = "fitness_unit";

/// Key-value persistence for exercise definitions and the unit preference
pub trait Store: Send + Sync {
    /// Read the stored exercise list, `None` when nothing was saved yet
    fn load_exercises(&self) -> Result<Option<Vec<ExerciseDefinition>>, StoreError>;

    /// Replace the stored exercise list
    fn save_exercises(&self, exercises: &[ExerciseDefinition]) -> Result<(), StoreError>;

    /// Read the stored unit preference, `None` when nothing was saved yet
    fn load_unit(&self) -> Result<Option<Unit>, StoreError>;

    /// Replace the stored unit preference
    fn save_unit(&self, unit: Unit) -> Result<(), StoreError>;
}
