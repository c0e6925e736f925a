//! Category commands.

use common::CategoryId;

/// Command to create a new category.
#[derive(Debug, Clone)]
pub struct CreateCategory {
    /// Unique category name.
    pub name: String,

    /// Optional parent for hierarchy placement.
    pub parent_id: Option<CategoryId>,
}

impl CreateCategory {
    /// Creates a new CreateCategory command.
    pub fn new(name: impl Into<String>, parent_id: Option<CategoryId>) -> Self {
        Self {
            name: name.into(),
            parent_id,
        }
    }
}

/// Command to update an existing category.
///
/// `parent_id` distinguishes "leave unchanged" (`None`) from "set to this
/// value" (`Some(Some(id))`) and "detach from parent" (`Some(None)`).
#[derive(Debug, Clone)]
pub struct UpdateCategory {
    pub id: CategoryId,
    pub name: Option<String>,
    pub parent_id: Option<Option<CategoryId>>,
}

impl UpdateCategory {
    /// Creates an update command that changes nothing.
    pub fn new(id: CategoryId) -> Self {
        Self {
            id,
            name: None,
            parent_id: None,
        }
    }

    /// Sets a new name.
    pub fn rename(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets a new parent.
    pub fn reparent(mut self, parent_id: Option<CategoryId>) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}
