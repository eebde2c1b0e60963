//! Domain model types.
//!
//! # Responsibility
//! - Define account/category/task records shared by repositories and services.
//! - Own field-level validation that must run before storage access.

pub mod account;
pub mod category;
pub mod credentials;
pub mod task;

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Validation failures for category/task write inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelValidationError {
    /// Category name is blank after trim.
    EmptyCategoryName,
    /// Task content is blank after trim.
    EmptyTaskContent,
}

impl Display for ModelValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyCategoryName => write!(f, "category name must not be blank"),
            Self::EmptyTaskContent => write!(f, "task content must not be blank"),
        }
    }
}

impl Error for ModelValidationError {}
