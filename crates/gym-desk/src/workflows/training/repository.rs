use super::domain::{
    Exercise, ExerciseFields, ExerciseId, ProgramFields, ProgramId, TrainingProgram,
};
use crate::store::RepositoryError;

/// Exercise catalog and program storage.
pub trait TrainingRepository: Send + Sync {
    fn insert_exercise(&self, fields: ExerciseFields) -> Result<Exercise, RepositoryError>;
    fn update_exercise(&self, exercise: Exercise) -> Result<Exercise, RepositoryError>;
    /// Removes the exercise together with every program built on it.
    fn delete_exercise(&self, id: ExerciseId) -> Result<(), RepositoryError>;
    fn exercise(&self, id: ExerciseId) -> Result<Option<Exercise>, RepositoryError>;
    fn exercises(&self) -> Result<Vec<Exercise>, RepositoryError>;

    fn insert_program(&self, fields: ProgramFields) -> Result<TrainingProgram, RepositoryError>;
    fn update_program(&self, program: TrainingProgram) -> Result<TrainingProgram, RepositoryError>;
    fn delete_program(&self, id: ProgramId) -> Result<(), RepositoryError>;
    fn program(&self, id: ProgramId) -> Result<Option<TrainingProgram>, RepositoryError>;
    fn programs(&self) -> Result<Vec<TrainingProgram>, RepositoryError>;
}
