//! Category use-case service.
//!
//! # Invariants
//! - Every call is scoped to `session.account_id()`.
//! - Rename keeps the category id; only the name changes.

use crate::model::category::{Category, CategoryId};
use crate::repo::category_repo::CategoryRepository;
use crate::repo::RepoResult;
use crate::session::Session;

/// Use-case service wrapper for category operations.
pub struct CategoryService<R: CategoryRepository> {
    repo: R,
}

impl<R: CategoryRepository> CategoryService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists the session account's categories in creation order.
    pub fn list_categories(&self, session: &Session) -> RepoResult<Vec<Category>> {
        self.repo.list_categories(session.account_id())
    }

    pub fn get_category(&self, session: &Session, id: CategoryId) -> RepoResult<Option<Category>> {
        self.repo.get_category(session.account_id(), id)
    }

    /// Creates a category with a fresh id.
    pub fn create_category(&self, session: &Session, name: &str) -> RepoResult<Category> {
        self.repo.create_category(session.account_id(), name)
    }

    /// Renames by upserting the same id with a new name.
    pub fn rename_category(
        &self,
        session: &Session,
        id: CategoryId,
        new_name: &str,
    ) -> RepoResult<Category> {
        self.repo.save_category(session.account_id(), id, new_name)
    }

    /// Deletes a category together with its tasks.
    pub fn delete_category(&self, session: &Session, id: CategoryId) -> RepoResult<()> {
        self.repo.delete_category(session.account_id(), id)
    }
}
