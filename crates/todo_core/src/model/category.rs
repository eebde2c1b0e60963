//! Category domain model.

use crate::model::account::AccountId;
use crate::model::ModelValidationError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type CategoryId = Uuid;

/// Named grouping of tasks, owned by one account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: CategoryId,
    pub name: String,
    pub account_id: AccountId,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms update timestamp.
    pub updated_at: i64,
}

/// Trims a category name and rejects blank values.
pub fn normalize_category_name(name: &str) -> Result<String, ModelValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ModelValidationError::EmptyCategoryName);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::normalize_category_name;
    use crate::model::ModelValidationError;

    #[test]
    fn normalize_trims_and_rejects_blank() {
        assert_eq!(normalize_category_name("  Work ").unwrap(), "Work");
        assert_eq!(
            normalize_category_name(" \t").unwrap_err(),
            ModelValidationError::EmptyCategoryName
        );
    }
}
