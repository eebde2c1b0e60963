//! Task use-case service.
//!
//! # Responsibility
//! - Provide create/update/toggle/rename/delete entry points for tasks.
//! - Express single-field edits as full upserts that re-supply every other
//!   current field.

use crate::model::category::CategoryId;
use crate::model::task::{Task, TaskId, TaskInput};
use crate::repo::task_repo::TaskRepository;
use crate::repo::{RepoError, RepoResult};
use crate::session::Session;

/// Use-case service wrapper for task operations.
pub struct TaskService<R: TaskRepository> {
    repo: R,
}

impl<R: TaskRepository> TaskService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every task owned by the session account.
    pub fn list_tasks(&self, session: &Session) -> RepoResult<Vec<Task>> {
        self.repo.list_tasks(session.account_id())
    }

    /// Lists the session account's tasks inside one category.
    pub fn list_tasks_in_category(
        &self,
        session: &Session,
        category_id: CategoryId,
    ) -> RepoResult<Vec<Task>> {
        self.repo
            .list_tasks_in_category(session.account_id(), category_id)
    }

    pub fn get_task(&self, session: &Session, id: TaskId) -> RepoResult<Option<Task>> {
        self.repo.get_task(session.account_id(), id)
    }

    /// Creates an incomplete, unimportant task in `category_id`.
    pub fn create_task(
        &self,
        session: &Session,
        content: &str,
        category_id: CategoryId,
    ) -> RepoResult<Task> {
        self.repo
            .save_task(session.account_id(), &TaskInput::new(content, category_id))
    }

    /// Full upsert: every field of `input` overwrites the stored row.
    pub fn update_task(&self, session: &Session, input: &TaskInput) -> RepoResult<Task> {
        self.repo.save_task(session.account_id(), input)
    }

    /// Changes the given flags, keeping content, category and the other flag.
    pub fn set_flags(
        &self,
        session: &Session,
        id: TaskId,
        completed: Option<bool>,
        important: Option<bool>,
    ) -> RepoResult<Task> {
        let current = self.require_task(session, id)?;
        let mut input = TaskInput::from_task(&current);
        input.completed = completed.unwrap_or(current.completed);
        input.important = important.unwrap_or(current.important);
        self.update_task(session, &input)
    }

    /// Replaces content, keeping category and flags.
    pub fn rename_task(&self, session: &Session, id: TaskId, content: &str) -> RepoResult<Task> {
        let current = self.require_task(session, id)?;
        let mut input = TaskInput::from_task(&current);
        input.content = content.to_string();
        self.update_task(session, &input)
    }

    pub fn delete_task(&self, session: &Session, id: TaskId) -> RepoResult<()> {
        self.repo.delete_task(session.account_id(), id)
    }

    fn require_task(&self, session: &Session, id: TaskId) -> RepoResult<Task> {
        self.get_task(session, id)?
            .ok_or(RepoError::NotFound { entity: "task", id })
    }
}
