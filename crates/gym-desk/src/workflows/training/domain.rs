use std::fmt;

use serde::{Deserialize, Serialize};

use crate::workflows::members::AccountId;
use crate::workflows::validation::{self, optional_text, trimmed_text, ValidationError};

const DEFAULT_MUSCLE_GROUP: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExerciseId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgramId(pub u64);

impl fmt::Display for ExerciseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ProgramId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExerciseKind {
    #[default]
    Strength,
    Cardio,
    Flexibility,
}

impl ExerciseKind {
    pub const fn label(self) -> &'static str {
        match self {
            ExerciseKind::Strength => "Strength",
            ExerciseKind::Cardio => "Cardio",
            ExerciseKind::Flexibility => "Flexibility",
        }
    }
}

/// Catalog entry programs are built from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Exercise {
    pub id: ExerciseId,
    #[serde(flatten)]
    pub fields: ExerciseFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseFields {
    pub name: String,
    pub kind: ExerciseKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExerciseDraft {
    pub name: String,
    #[serde(default)]
    pub kind: ExerciseKind,
}

impl ExerciseDraft {
    pub fn validate(self) -> Result<ExerciseFields, ValidationError> {
        Ok(ExerciseFields {
            name: trimmed_text("name", &self.name, 2, 100)?,
            kind: self.kind,
        })
    }
}

/// A member's program: one exercise with its volume and load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrainingProgram {
    pub id: ProgramId,
    #[serde(flatten)]
    pub fields: ProgramFields,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFields {
    pub owner: AccountId,
    pub exercise: ExerciseId,
    pub program_name: String,
    pub muscle_group: String,
    pub sets: i32,
    pub repetitions: i32,
    pub load_kg: i32,
    pub minutes: i32,
    pub video_url: Option<String>,
}

/// Program form. `owner` is only honored for administrators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramDraft {
    #[serde(default)]
    pub owner: Option<AccountId>,
    pub exercise: ExerciseId,
    pub program_name: String,
    #[serde(default)]
    pub muscle_group: Option<String>,
    #[serde(default = "default_volume")]
    pub sets: i32,
    #[serde(default = "default_volume")]
    pub repetitions: i32,
    #[serde(default)]
    pub load_kg: i32,
    #[serde(default)]
    pub minutes: i32,
    #[serde(default)]
    pub video_url: Option<String>,
}

fn default_volume() -> i32 {
    10
}

impl ProgramDraft {
    pub fn validate(self, owner: AccountId) -> Result<ProgramFields, ValidationError> {
        let muscle_group = optional_text("muscle_group", self.muscle_group.as_deref(), 50)?
            .unwrap_or_else(|| DEFAULT_MUSCLE_GROUP.to_string());

        let video_url = optional_text("video_url", self.video_url.as_deref(), 500)?;
        if let Some(url) = &video_url {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(ValidationError::new(
                    "video_url",
                    "must be an http or https URL",
                ));
            }
        }

        Ok(ProgramFields {
            owner,
            exercise: self.exercise,
            program_name: trimmed_text("program_name", &self.program_name, 3, 100)?,
            muscle_group,
            sets: validation::within("sets", self.sets, 1, 50)?,
            repetitions: validation::within("repetitions", self.repetitions, 1, 1000)?,
            load_kg: validation::within("load_kg", self.load_kg, 0, i32::MAX)?,
            minutes: validation::within("minutes", self.minutes, 0, i32::MAX)?,
            video_url,
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgramFilter {
    #[serde(default)]
    pub program_name: Option<String>,
}
