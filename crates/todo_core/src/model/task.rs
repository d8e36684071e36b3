//! Task domain model.
//!
//! # Responsibility
//! - Define the canonical to-do item handled by use-cases and controllers.
//! - Own field validation rules shared by add/update flows.
//!
//! # Invariants
//! - `id == 0` means "not yet persisted"; the store assigns the real id.
//! - `title` is non-blank and at most `MAX_TITLE_LENGTH` characters.
//! - `description` is at most `MAX_DESCRIPTION_LENGTH` characters.
//! - `creation_date` is set once at creation and has millisecond precision.

use chrono::{DateTime, Timelike, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned task identifier. `0` marks an unsaved task.
pub type TaskId = i64;

/// Maximum title length, counted in characters.
pub const MAX_TITLE_LENGTH: usize = 50;
/// Maximum description length, counted in characters.
pub const MAX_DESCRIPTION_LENGTH: usize = 500;

/// Field validation failure for a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TaskValidationError {
    /// Title is empty or whitespace-only.
    EmptyTitle,
    /// Title exceeds `MAX_TITLE_LENGTH` characters.
    TitleTooLong,
    /// Description exceeds `MAX_DESCRIPTION_LENGTH` characters.
    DescriptionTooLong,
}

impl TaskValidationError {
    /// Stable machine-readable code used in log lines.
    pub fn code(self) -> &'static str {
        match self {
            Self::EmptyTitle => "empty_title",
            Self::TitleTooLong => "title_too_long",
            Self::DescriptionTooLong => "description_too_long",
        }
    }
}

impl Display for TaskValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyTitle => write!(f, "task title cannot be empty"),
            Self::TitleTooLong => {
                write!(f, "task title cannot exceed {MAX_TITLE_LENGTH} characters")
            }
            Self::DescriptionTooLong => write!(
                f,
                "task description cannot exceed {MAX_DESCRIPTION_LENGTH} characters"
            ),
        }
    }
}

impl Error for TaskValidationError {}

/// A user-created to-do item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    pub description: String,
    pub creation_date: DateTime<Utc>,
    pub completed: bool,
}

impl Task {
    /// Creates an unsaved, not-completed task stamped with the current time.
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: 0,
            title: title.into(),
            description: description.into(),
            creation_date: now_millis(),
            completed: false,
        }
    }

    /// Returns whether the store has assigned an id to this task.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }

    /// Returns a copy with the completion flag flipped.
    ///
    /// Identity and creation date are preserved.
    pub fn toggled(&self) -> Self {
        Self {
            completed: !self.completed,
            ..self.clone()
        }
    }

    /// Checks field constraints in fixed order; the first failure wins.
    ///
    /// Lengths are counted in Unicode scalar values, not bytes.
    pub fn validate(&self) -> Result<(), TaskValidationError> {
        if self.title.trim().is_empty() {
            return Err(TaskValidationError::EmptyTitle);
        }
        if self.title.chars().count() > MAX_TITLE_LENGTH {
            return Err(TaskValidationError::TitleTooLong);
        }
        if self.description.chars().count() > MAX_DESCRIPTION_LENGTH {
            return Err(TaskValidationError::DescriptionTooLong);
        }
        Ok(())
    }
}

/// Current UTC time truncated to whole milliseconds, the precision the
/// store keeps.
pub fn now_millis() -> DateTime<Utc> {
    let now = Utc::now();
    let millis_only = (now.nanosecond() / 1_000_000) * 1_000_000;
    now.with_nanosecond(millis_only).unwrap_or(now)
}
