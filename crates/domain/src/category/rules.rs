//! Category business rules.
//!
//! Pure functions; the service wires them to repository lookups.

use common::CategoryId;
use store::Category;

use crate::error::CategoryError;

const MAX_NAME_LENGTH: usize = 255;

/// Rejects empty and oversized names.
pub fn validate_name(name: &str) -> Result<(), CategoryError> {
    if name.trim().is_empty() {
        return Err(CategoryError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(CategoryError::NameTooLong);
    }
    Ok(())
}

/// A category can never be its own parent.
pub fn validate_not_self_reference(
    id: CategoryId,
    parent_id: CategoryId,
) -> Result<(), CategoryError> {
    if id == parent_id {
        return Err(CategoryError::SelfParent);
    }
    Ok(())
}

/// Names are unique catalog-wide, compared case-insensitively.
pub fn validate_name_uniqueness(existing: &str, candidate: &str) -> Result<(), CategoryError> {
    if existing.to_lowercase() == candidate.to_lowercase() {
        return Err(CategoryError::DuplicateName(candidate.to_string()));
    }
    Ok(())
}

/// A referenced parent must resolve to a stored category.
pub fn validate_parent_exists(parent: Option<&Category>) -> Result<(), CategoryError> {
    if parent.is_none() {
        return Err(CategoryError::ParentNotFound);
    }
    Ok(())
}
