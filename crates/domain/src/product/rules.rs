//! Product business rules and state-machine guards.

use std::collections::HashSet;

use store::{Product, ProductAttribute};

use crate::error::ProductError;

const MAX_NAME_LENGTH: usize = 255;

/// Rejects empty and oversized names.
pub fn validate_name(name: &str) -> Result<(), ProductError> {
    if name.trim().is_empty() {
        return Err(ProductError::EmptyName);
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(ProductError::NameTooLong);
    }
    Ok(())
}

/// Activation guard. Check order matters: the archived check comes first,
/// then the draft check, then category count before attribute count.
pub fn validate_can_activate(product: &Product) -> Result<(), ProductError> {
    if product.status.is_archived() {
        return Err(ProductError::ArchivedReactivation);
    }
    if !product.status.is_draft() {
        return Err(ProductError::NotDraft);
    }
    if product.categories.is_empty() {
        return Err(ProductError::ActivationNeedsCategory);
    }
    if product.attributes.is_empty() {
        return Err(ProductError::ActivationNeedsAttribute);
    }
    Ok(())
}

/// Archived products cannot gain categories or attributes.
pub fn validate_can_add_associations(product: &Product) -> Result<(), ProductError> {
    if product.status.is_archived() {
        return Err(ProductError::ArchivedAssociationChange);
    }
    Ok(())
}

/// Archived products cannot have existing categories or attributes changed.
pub fn validate_can_modify(product: &Product) -> Result<(), ProductError> {
    if product.status.is_archived() {
        return Err(ProductError::ArchivedModification);
    }
    Ok(())
}

/// Scans a candidate attribute list and fails on the first duplicate key.
/// Keys compare case-sensitively.
pub fn validate_attribute_key_uniqueness(
    attributes: &[ProductAttribute],
) -> Result<(), ProductError> {
    let mut seen = HashSet::new();
    for attribute in attributes {
        if !seen.insert(attribute.key.as_str()) {
            return Err(ProductError::DuplicateAttributeKey(attribute.key.clone()));
        }
    }
    Ok(())
}

/// Fails if the key is already present on the product.
pub fn validate_attribute_key_not_exists(
    product: &Product,
    key: &str,
) -> Result<(), ProductError> {
    if product.has_attribute(key) {
        return Err(ProductError::AttributeExists(key.to_string()));
    }
    Ok(())
}

/// Rejects blank descriptions, returning the trimmed text.
pub fn validate_description(description: &str) -> Result<String, ProductError> {
    let trimmed = description.trim();
    if trimmed.is_empty() {
        return Err(ProductError::EmptyDescription);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use store::ProductStatus;

    fn product_with(status: ProductStatus, categories: usize, attributes: usize) -> Product {
        let mut product = Product::new(
            "Laptop",
            None,
            (0..categories).map(|_| common::CategoryId::new()).collect(),
            (0..attributes)
                .map(|i| ProductAttribute::new(format!("key{i}"), "v"))
                .collect(),
        );
        product.status = status;
        product
    }

    #[test]
    fn activation_requires_draft_with_associations() {
        assert!(validate_can_activate(&product_with(ProductStatus::Draft, 1, 1)).is_ok());

        assert_eq!(
            validate_can_activate(&product_with(ProductStatus::Archived, 1, 1)),
            Err(ProductError::ArchivedReactivation)
        );
        assert_eq!(
            validate_can_activate(&product_with(ProductStatus::Active, 1, 1)),
            Err(ProductError::NotDraft)
        );
        assert_eq!(
            validate_can_activate(&product_with(ProductStatus::Draft, 0, 1)),
            Err(ProductError::ActivationNeedsCategory)
        );
        assert_eq!(
            validate_can_activate(&product_with(ProductStatus::Draft, 1, 0)),
            Err(ProductError::ActivationNeedsAttribute)
        );
    }

    #[test]
    fn category_check_precedes_attribute_check() {
        assert_eq!(
            validate_can_activate(&product_with(ProductStatus::Draft, 0, 0)),
            Err(ProductError::ActivationNeedsCategory)
        );
    }

    #[test]
    fn archived_products_are_frozen() {
        let archived = product_with(ProductStatus::Archived, 1, 1);
        assert_eq!(
            validate_can_add_associations(&archived),
            Err(ProductError::ArchivedAssociationChange)
        );
        assert_eq!(
            validate_can_modify(&archived),
            Err(ProductError::ArchivedModification)
        );

        let draft = product_with(ProductStatus::Draft, 0, 0);
        assert!(validate_can_add_associations(&draft).is_ok());
        assert!(validate_can_modify(&draft).is_ok());
    }

    #[test]
    fn duplicate_keys_rejected_at_creation() {
        let attributes = vec![
            ProductAttribute::new("color", "red"),
            ProductAttribute::new("size", "L"),
            ProductAttribute::new("color", "blue"),
        ];
        assert_eq!(
            validate_attribute_key_uniqueness(&attributes),
            Err(ProductError::DuplicateAttributeKey("color".to_string()))
        );

        // Case differs, so keys do not collide.
        let cased = vec![
            ProductAttribute::new("color", "red"),
            ProductAttribute::new("Color", "blue"),
        ];
        assert!(validate_attribute_key_uniqueness(&cased).is_ok());
    }

    #[test]
    fn existing_key_rejected_on_addition() {
        let product = Product::new(
            "Laptop",
            None,
            vec![],
            vec![ProductAttribute::new("color", "red")],
        );
        assert_eq!(
            validate_attribute_key_not_exists(&product, "color"),
            Err(ProductError::AttributeExists("color".to_string()))
        );
        assert!(validate_attribute_key_not_exists(&product, "Color").is_ok());
    }

    #[test]
    fn description_is_trimmed_and_nonblank() {
        assert_eq!(
            validate_description("  a laptop  ").unwrap(),
            "a laptop".to_string()
        );
        assert_eq!(
            validate_description("   "),
            Err(ProductError::EmptyDescription)
        );
    }
}
