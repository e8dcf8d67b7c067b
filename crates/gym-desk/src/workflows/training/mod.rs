//! Exercise catalog and member training programs.

pub mod domain;
pub mod repository;
pub mod router;
pub mod service;

pub use domain::{
    Exercise, ExerciseDraft, ExerciseFields, ExerciseId, ExerciseKind, ProgramDraft,
    ProgramFields, ProgramFilter, ProgramId, TrainingProgram,
};
pub use repository::TrainingRepository;
pub use router::training_router;
pub use service::{TrainingService, TrainingServiceError};
