use std::sync::Arc;

use tracing::info;

use super::domain::{
    Exercise, ExerciseDraft, ExerciseId, ProgramDraft, ProgramFilter, ProgramId, TrainingProgram,
};
use super::repository::TrainingRepository;
use crate::store::RepositoryError;
use crate::workflows::members::access::{
    is_administrator, require_administrator, require_owner_or_administrator, AccessError, Caller,
    CallerError,
};
use crate::workflows::members::repository::AccountRepository;
use crate::workflows::members::{Account, AccountId};
use crate::workflows::validation::{contains_ignore_case, ValidationError};

pub struct TrainingService<S> {
    store: Arc<S>,
}

impl<S> TrainingService<S>
where
    S: AccountRepository + TrainingRepository + 'static,
{
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub fn caller(&self, caller: Caller) -> Result<Account, TrainingServiceError> {
        Ok(caller.require(&*self.store)?)
    }

    pub fn create_exercise(
        &self,
        actor: &Account,
        draft: ExerciseDraft,
    ) -> Result<Exercise, TrainingServiceError> {
        require_administrator(actor, "manage the exercise catalog")?;
        let exercise = self.store.insert_exercise(draft.validate()?)?;
        info!(exercise = exercise.id.0, name = %exercise.fields.name, "exercise created");
        Ok(exercise)
    }

    pub fn update_exercise(
        &self,
        actor: &Account,
        id: ExerciseId,
        draft: ExerciseDraft,
    ) -> Result<Exercise, TrainingServiceError> {
        require_administrator(actor, "manage the exercise catalog")?;
        let fields = draft.validate()?;
        self.require_exercise(id)?;
        Ok(self.store.update_exercise(Exercise { id, fields })?)
    }

    pub fn delete_exercise(&self, actor: &Account, id: ExerciseId) -> Result<(), TrainingServiceError> {
        require_administrator(actor, "manage the exercise catalog")?;
        self.require_exercise(id)?;
        self.store.delete_exercise(id)?;
        info!(exercise = id.0, "exercise deleted");
        Ok(())
    }

    /// Catalog ordered by name.
    pub fn exercises(&self) -> Result<Vec<Exercise>, TrainingServiceError> {
        let mut exercises = self.store.exercises()?;
        exercises.sort_by_key(|exercise| (exercise.fields.name.to_lowercase(), exercise.id));
        Ok(exercises)
    }

    pub fn create_program(
        &self,
        actor: &Account,
        draft: ProgramDraft,
    ) -> Result<TrainingProgram, TrainingServiceError> {
        let owner = self.owner_for(actor, draft.owner, actor.id)?;
        let fields = draft.validate(owner)?;
        self.require_exercise(fields.exercise)?;

        let program = self.store.insert_program(fields)?;
        info!(
            program = program.id.0,
            owner = program.fields.owner.0,
            "training program created"
        );
        Ok(program)
    }

    /// Owners and administrators may edit; only administrators may move a
    /// program to another member.
    pub fn update_program(
        &self,
        actor: &Account,
        id: ProgramId,
        draft: ProgramDraft,
    ) -> Result<TrainingProgram, TrainingServiceError> {
        let existing = self.require_program(id)?;
        require_owner_or_administrator(actor, existing.fields.owner, "training program")?;

        let owner = self.owner_for(actor, draft.owner, existing.fields.owner)?;
        let fields = draft.validate(owner)?;
        self.require_exercise(fields.exercise)?;

        Ok(self.store.update_program(TrainingProgram { id, fields })?)
    }

    pub fn delete_program(&self, actor: &Account, id: ProgramId) -> Result<(), TrainingServiceError> {
        let existing = self.require_program(id)?;
        require_owner_or_administrator(actor, existing.fields.owner, "training program")?;
        self.store.delete_program(id)?;
        info!(program = id.0, actor = actor.id.0, "training program deleted");
        Ok(())
    }

    /// Administrators see every program, members only their own. Newest first.
    pub fn programs(
        &self,
        actor: &Account,
        filter: &ProgramFilter,
    ) -> Result<Vec<TrainingProgram>, TrainingServiceError> {
        let needle = filter
            .program_name
            .as_deref()
            .map(str::trim)
            .filter(|needle| !needle.is_empty());
        let administrator = is_administrator(actor);

        let mut programs: Vec<TrainingProgram> = self
            .store
            .programs()?
            .into_iter()
            .filter(|program| administrator || program.fields.owner == actor.id)
            .filter(|program| {
                needle.map_or(true, |needle| {
                    contains_ignore_case(&program.fields.program_name, needle)
                })
            })
            .collect();

        programs.sort_by(|left, right| right.id.cmp(&left.id));
        Ok(programs)
    }

    fn owner_for(
        &self,
        actor: &Account,
        requested: Option<AccountId>,
        fallback: AccountId,
    ) -> Result<AccountId, TrainingServiceError> {
        match requested {
            Some(owner) if owner != fallback => {
                require_administrator(actor, "assign programs to other members")?;
                if self.store.account(owner)?.is_none() {
                    return Err(TrainingServiceError::OwnerNotFound(owner));
                }
                Ok(owner)
            }
            _ => Ok(fallback),
        }
    }

    fn require_exercise(&self, id: ExerciseId) -> Result<Exercise, TrainingServiceError> {
        self.store
            .exercise(id)?
            .ok_or(TrainingServiceError::ExerciseNotFound(id))
    }

    fn require_program(&self, id: ProgramId) -> Result<TrainingProgram, TrainingServiceError> {
        self.store
            .program(id)?
            .ok_or(TrainingServiceError::ProgramNotFound(id))
    }
}

#[derive(Debug, thiserror::Error)]
pub enum TrainingServiceError {
    #[error(transparent)]
    Access(#[from] AccessError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("exercise {0} not found")]
    ExerciseNotFound(ExerciseId),
    #[error("training program {0} not found")]
    ProgramNotFound(ProgramId),
    #[error("account {0} not found")]
    OwnerNotFound(AccountId),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl From<CallerError> for TrainingServiceError {
    fn from(value: CallerError) -> Self {
        match value {
            CallerError::Access(err) => Self::Access(err),
            CallerError::Repository(err) => Self::Repository(err),
        }
    }
}
