//! Home screen view-model: categories, tasks, selection, transient event.
//!
//! # Responsibility
//! - Own presentation state that is not persisted (selected category).
//! - Run one store round trip per step; no transaction spans a whole action.
//! - Reduce every failure to the `event` message string.
//!
//! # Invariants
//! - Selection defaults to the first category on load/delete and the last on
//!   create; an empty category list clears selection and tasks.
//! - `tasks` always shows the selected category (empty when none).

use crate::model::category::{Category, CategoryId};
use crate::model::task::{Task, TaskId};
use crate::repo::category_repo::SqliteCategoryRepository;
use crate::repo::task_repo::SqliteTaskRepository;
use crate::repo::RepoError;
use crate::service::category_service::CategoryService;
use crate::service::task_service::TaskService;
use crate::service::{ServiceError, ServiceResult};
use crate::session::{Session, SessionStore};
use log::warn;
use rusqlite::Connection;

/// Which category to select after the list is reloaded.
#[derive(Debug, Clone, Copy)]
enum Reselect {
    First,
    Last,
    Keep(CategoryId),
}

/// Home screen state: account categories, selected category tasks and the last event.
pub struct HomeViewModel<'conn, S: SessionStore> {
    conn: &'conn Connection,
    sessions: S,
    categories: Vec<Category>,
    tasks: Vec<Task>,
    selected_category: Option<Category>,
    event: Option<String>,
}

impl<'conn, S: SessionStore> HomeViewModel<'conn, S> {
    /// Creates an empty view-model; call [`Self::load`] to populate it.
    pub fn new(conn: &'conn Connection, sessions: S) -> Self {
        Self {
            conn,
            sessions,
            categories: Vec::new(),
            tasks: Vec::new(),
            selected_category: None,
            event: None,
        }
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn selected_category(&self) -> Option<&Category> {
        self.selected_category.as_ref()
    }

    /// Last transient notification, success or failure.
    pub fn event(&self) -> Option<&str> {
        self.event.as_deref()
    }

    pub fn clear_event(&mut self) {
        self.event = None;
    }

    /// Loads categories and selects the first one.
    pub fn load(&mut self) {
        self.load_with_selection(None);
    }

    /// Loads categories, keeping `preferred` selected when it still exists.
    pub fn load_with_selection(&mut self, preferred: Option<CategoryId>) {
        let reselect = preferred.map_or(Reselect::First, Reselect::Keep);
        self.run("load", |vm| {
            let session = vm.session()?;
            vm.reload(&session, reselect)?;
            Ok(None)
        });
    }

    pub fn select_category(&mut self, id: CategoryId) {
        self.run("select_category", |vm| {
            let session = vm.session()?;
            let category = match vm.categories.iter().find(|category| category.id == id) {
                Some(category) => category.clone(),
                None => vm
                    .category_service()?
                    .get_category(&session, id)?
                    .ok_or(RepoError::NotFound {
                        entity: "category",
                        id,
                    })?,
            };
            vm.selected_category = Some(category);
            vm.reload_tasks(&session)?;
            Ok(None)
        });
    }

    pub fn add_category(&mut self, name: &str) {
        self.run("add_category", |vm| {
            let session = vm.session()?;
            vm.category_service()?.create_category(&session, name)?;
            vm.reload(&session, Reselect::Last)?;
            Ok(Some("Category added"))
        });
    }

    pub fn rename_category(&mut self, id: CategoryId, new_name: &str) {
        self.run("rename_category", |vm| {
            let session = vm.session()?;
            vm.category_service()?
                .rename_category(&session, id, new_name)?;
            vm.categories = vm.category_service()?.list_categories(&session)?;
            if vm.selected_category.as_ref().map(|category| category.id) == Some(id) {
                vm.selected_category = vm.categories.iter().find(|c| c.id == id).cloned();
            }
            Ok(Some("Category renamed"))
        });
    }

    pub fn delete_category(&mut self, id: CategoryId) {
        self.run("delete_category", |vm| {
            let session = vm.session()?;
            vm.category_service()?.delete_category(&session, id)?;
            vm.reload(&session, Reselect::First)?;
            Ok(Some("Category deleted"))
        });
    }

    /// Adds a task to the selected category; no-op without a selection.
    pub fn add_task(&mut self, content: &str) {
        let Some(category_id) = self.selected_category.as_ref().map(|category| category.id) else {
            return;
        };
        self.run("add_task", |vm| {
            let session = vm.session()?;
            vm.task_service()?
                .create_task(&session, content, category_id)?;
            vm.reload_tasks(&session)?;
            Ok(Some("Task added"))
        });
    }

    /// Changes completed and/or important, re-supplying every other field.
    pub fn update_task(&mut self, id: TaskId, completed: Option<bool>, important: Option<bool>) {
        self.run("update_task", |vm| {
            let session = vm.session()?;
            vm.task_service()?
                .set_flags(&session, id, completed, important)?;
            vm.reload_tasks(&session)?;
            Ok(Some("Task updated"))
        });
    }

    pub fn rename_task(&mut self, id: TaskId, new_content: &str) {
        self.run("rename_task", |vm| {
            let session = vm.session()?;
            vm.task_service()?.rename_task(&session, id, new_content)?;
            vm.reload_tasks(&session)?;
            Ok(Some("Task renamed"))
        });
    }

    pub fn delete_task(&mut self, id: TaskId) {
        self.run("delete_task", |vm| {
            let session = vm.session()?;
            vm.task_service()?.delete_task(&session, id)?;
            vm.reload_tasks(&session)?;
            Ok(Some("Task deleted"))
        });
    }

    /// Clears the session and all screen state.
    pub fn logout(&mut self) {
        self.run("logout", |vm| {
            vm.sessions.clear()?;
            vm.categories.clear();
            vm.tasks.clear();
            vm.selected_category = None;
            Ok(Some("logout"))
        });
    }

    fn run(
        &mut self,
        op: &'static str,
        action: impl FnOnce(&mut Self) -> ServiceResult<Option<&'static str>>,
    ) {
        match action(self) {
            Ok(Some(message)) => self.event = Some(message.to_string()),
            Ok(None) => {}
            Err(err) => {
                warn!(
                    "event=home_{op} module=viewmodel status=error error_code={}",
                    err.code()
                );
                self.event = Some(err.to_string());
            }
        }
    }

    fn session(&self) -> ServiceResult<Session> {
        self.sessions.current()?.ok_or(ServiceError::NotLoggedIn)
    }

    fn category_service(&self) -> ServiceResult<CategoryService<SqliteCategoryRepository<'conn>>> {
        Ok(CategoryService::new(SqliteCategoryRepository::try_new(
            self.conn,
        )?))
    }

    fn task_service(&self) -> ServiceResult<TaskService<SqliteTaskRepository<'conn>>> {
        Ok(TaskService::new(SqliteTaskRepository::try_new(self.conn)?))
    }

    fn reload(&mut self, session: &Session, reselect: Reselect) -> ServiceResult<()> {
        self.categories = self.category_service()?.list_categories(session)?;
        self.selected_category = match reselect {
            Reselect::First => self.categories.first().cloned(),
            Reselect::Last => self.categories.last().cloned(),
            Reselect::Keep(id) => self
                .categories
                .iter()
                .find(|category| category.id == id)
                .or_else(|| self.categories.first())
                .cloned(),
        };
        self.reload_tasks(session)
    }

    fn reload_tasks(&mut self, session: &Session) -> ServiceResult<()> {
        self.tasks = match self.selected_category.as_ref() {
            Some(category) => self
                .task_service()?
                .list_tasks_in_category(session, category.id)?,
            None => Vec::new(),
        };
        Ok(())
    }
}
