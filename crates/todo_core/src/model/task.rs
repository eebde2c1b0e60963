//! Task domain model.
//!
//! # Invariants
//! - A task belongs to exactly one account and one category of that account.
//! - Saves are full upserts: every field of `TaskInput` overwrites the row.

use crate::model::account::AccountId;
use crate::model::category::CategoryId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type TaskId = Uuid;

/// Persisted task row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: TaskId,
    pub content: String,
    pub completed: bool,
    pub important: bool,
    pub account_id: AccountId,
    pub category_id: CategoryId,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Full write shape for task upserts.
///
/// Owner account is not part of the input; it always comes from the session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskInput {
    pub id: TaskId,
    pub content: String,
    pub category_id: CategoryId,
    pub completed: bool,
    pub important: bool,
}

impl TaskInput {
    /// Builds the input for a fresh task: new id, both flags cleared.
    pub fn new(content: impl Into<String>, category_id: CategoryId) -> Self {
        Self {
            id: Uuid::new_v4(),
            content: content.into(),
            category_id,
            completed: false,
            important: false,
        }
    }

    /// Rebuilds the full input from a stored task so one field can change
    /// while all others are re-supplied.
    pub fn from_task(task: &Task) -> Self {
        Self {
            id: task.id,
            content: task.content.clone(),
            category_id: task.category_id,
            completed: task.completed,
            important: task.important,
        }
    }

    /// Trims content in place and rejects blank values.
    pub fn normalized(mut self) -> Result<Self, ModelValidationError> {
        let trimmed = self.content.trim();
        if trimmed.is_empty() {
            return Err(ModelValidationError::EmptyTaskContent);
        }
        self.content = trimmed.to_string();
        Ok(self)
    }
}
