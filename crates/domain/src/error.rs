//! Domain error types.

use messaging::BusError;
use store::StoreError;
use thiserror::Error;

/// Classification of a domain failure, used by the transport layer to pick
/// a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A referenced aggregate does not exist.
    NotFound,

    /// A uniqueness or concurrency violation.
    Conflict,

    /// A business rule rejected the request.
    InvalidRequest,

    /// Infrastructure failure.
    Internal,
}

/// Category business-rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CategoryError {
    #[error("Category not found")]
    NotFound,

    #[error("Category with this name already exists")]
    NameTaken,

    #[error("Category with name \"{0}\" already exists")]
    DuplicateName(String),

    #[error("Parent category not found")]
    ParentNotFound,

    #[error("A category cannot be its own parent")]
    SelfParent,

    #[error("Category name cannot be empty")]
    EmptyName,

    #[error("Category name cannot exceed 255 characters")]
    NameTooLong,
}

impl CategoryError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CategoryError::NotFound => ErrorKind::NotFound,
            CategoryError::NameTaken | CategoryError::DuplicateName(_) => ErrorKind::Conflict,
            CategoryError::ParentNotFound
            | CategoryError::SelfParent
            | CategoryError::EmptyName
            | CategoryError::NameTooLong => ErrorKind::InvalidRequest,
        }
    }
}

/// Product business-rule violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductError {
    #[error("Product not found")]
    NotFound,

    #[error("Product with this name already exists")]
    NameTaken,

    #[error("Category not found")]
    CategoryNotFound,

    #[error("One or more categories not found")]
    CategoriesNotFound,

    #[error("Category already associated with this product")]
    CategoryAlreadyAssociated,

    #[error("Category not associated with this product")]
    CategoryNotAssociated,

    #[error("Duplicate attribute key: {0}")]
    DuplicateAttributeKey(String),

    #[error("Attribute with key \"{0}\" already exists")]
    AttributeExists(String),

    #[error("Attribute not associated with this product")]
    AttributeNotAssociated,

    #[error("Archived products cannot be reactivated")]
    ArchivedReactivation,

    #[error("Only DRAFT products can be activated")]
    NotDraft,

    #[error("Product must have at least 1 category to be activated")]
    ActivationNeedsCategory,

    #[error("Product must have at least 1 attribute to be activated")]
    ActivationNeedsAttribute,

    #[error("Archived products cannot have categories or attributes modified")]
    ArchivedAssociationChange,

    #[error("Cannot modify archived product")]
    ArchivedModification,

    #[error("ACTIVE product must have at least 1 category")]
    ActiveNeedsCategory,

    #[error("ACTIVE product must have at least 1 attribute")]
    ActiveNeedsAttribute,

    #[error("Description cannot be empty")]
    EmptyDescription,

    #[error("Product name cannot be empty")]
    EmptyName,

    #[error("Product name cannot exceed 255 characters")]
    NameTooLong,
}

impl ProductError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProductError::NotFound
            | ProductError::CategoryNotAssociated
            | ProductError::AttributeNotAssociated => ErrorKind::NotFound,
            ProductError::NameTaken => ErrorKind::Conflict,
            ProductError::CategoryNotFound
            | ProductError::CategoriesNotFound
            | ProductError::CategoryAlreadyAssociated
            | ProductError::AttributeExists(_)
            | ProductError::DuplicateAttributeKey(_)
            | ProductError::ArchivedReactivation
            | ProductError::NotDraft
            | ProductError::ActivationNeedsCategory
            | ProductError::ActivationNeedsAttribute
            | ProductError::ArchivedAssociationChange
            | ProductError::ArchivedModification
            | ProductError::ActiveNeedsCategory
            | ProductError::ActiveNeedsAttribute
            | ProductError::EmptyDescription
            | ProductError::EmptyName
            | ProductError::NameTooLong => ErrorKind::InvalidRequest,
        }
    }
}

/// Errors that can occur during catalog command handling.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("{0}")]
    Category(#[from] CategoryError),

    #[error("{0}")]
    Product(#[from] ProductError),

    /// An error occurred in the persistence layer.
    #[error("Storage error: {0}")]
    Store(#[from] StoreError),

    /// The event publish step failed after the write committed.
    #[error("Event publication failed: {0}")]
    Publish(#[from] BusError),
}

impl DomainError {
    /// Classifies the error for the transport layer.
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::Category(e) => e.kind(),
            DomainError::Product(e) => e.kind(),
            DomainError::Store(StoreError::VersionConflict { .. }) => ErrorKind::Conflict,
            DomainError::Store(_) | DomainError::Publish(_) => ErrorKind::Internal,
        }
    }
}
