//! Product lifecycle, association, and attribute endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{
    ActivateProduct, AddAttributeToProduct, AddCategoryToProduct, ArchiveProduct, CreateProduct,
    RemoveCategoryFromProduct, RemoveProductAttribute, UpdateProductAttribute,
    UpdateProductDescription,
};
use serde::{Deserialize, Serialize};
use store::{
    AttributeValue, CategoryRepository, Product, ProductAttribute, ProductRepository,
};

use crate::error::ApiError;

use super::{AppState, parse_category_id, parse_product_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: Option<String>,
    #[serde(default)]
    pub category_ids: Vec<String>,
    #[serde(default)]
    pub attributes: Vec<AttributeRequest>,
}

#[derive(Deserialize)]
pub struct AttributeRequest {
    pub key: String,
    pub value: serde_json::Value,
}

#[derive(Deserialize)]
pub struct UpdateDescriptionRequest {
    pub description: String,
}

#[derive(Deserialize)]
pub struct UpdateAttributeRequest {
    pub value: serde_json::Value,
}

fn parse_attribute_value(value: serde_json::Value) -> Result<AttributeValue, ApiError> {
    serde_json::from_value(value)
        .map_err(|_| ApiError::BadRequest("Attribute value must be a string, number, or boolean".to_string()))
}

// -- Response types --

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub status: String,
    pub categories: Vec<String>,
    pub attributes: Vec<AttributeResponse>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

#[derive(Serialize)]
pub struct AttributeResponse {
    pub key: String,
    pub value: serde_json::Value,
}

impl From<ProductAttribute> for AttributeResponse {
    fn from(attr: ProductAttribute) -> Self {
        let value = match attr.value {
            AttributeValue::String(s) => serde_json::Value::String(s),
            AttributeValue::Number(n) => serde_json::json!(n),
            AttributeValue::Boolean(b) => serde_json::Value::Bool(b),
        };
        Self {
            key: attr.key,
            value,
        }
    }
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.to_string(),
            name: product.name,
            description: product.description,
            status: product.status.to_string(),
            categories: product.categories.iter().map(|id| id.to_string()).collect(),
            attributes: product.attributes.into_iter().map(Into::into).collect(),
            version: product.version,
            created_at: product.created_at.to_rfc3339(),
            updated_at: product.updated_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /products — create a new product in DRAFT status.
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Json(req): Json<CreateProductRequest>,
) -> Result<(axum::http::StatusCode, Json<ProductResponse>), ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let category_ids = req
        .category_ids
        .iter()
        .map(|id| parse_category_id(id))
        .collect::<Result<Vec<_>, _>>()?;

    let attributes = req
        .attributes
        .into_iter()
        .map(|attr| Ok(ProductAttribute::new(attr.key, parse_attribute_value(attr.value)?)))
        .collect::<Result<Vec<_>, ApiError>>()?;

    let mut cmd = CreateProduct::new(req.name)
        .categories(category_ids)
        .attributes(attributes);
    if let Some(description) = req.description {
        cmd = cmd.description(description);
    }

    let product = state.product_service.create_product(cmd).await?;
    Ok((axum::http::StatusCode::CREATED, Json(product.into())))
}

/// GET /products — list all products, oldest first.
#[tracing::instrument(skip(state))]
pub async fn list<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let products = state.product_service.list_products().await?;
    Ok(Json(products.into_iter().map(Into::into).collect()))
}

/// GET /products/:id — load a product by ID.
#[tracing::instrument(skip(state))]
pub async fn get<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = state.product_service.get_product(product_id).await?;
    Ok(Json(product.into()))
}

/// POST /products/:id/activate — move a DRAFT product to ACTIVE.
#[tracing::instrument(skip(state))]
pub async fn activate<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = state
        .product_service
        .activate_product(ActivateProduct::new(product_id))
        .await?;
    Ok(Json(product.into()))
}

/// POST /products/:id/archive — archive a product. Idempotent.
#[tracing::instrument(skip(state))]
pub async fn archive<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = state
        .product_service
        .archive_product(ArchiveProduct::new(product_id))
        .await?;
    Ok(Json(product.into()))
}

/// PATCH /products/:id/description — replace the description.
#[tracing::instrument(skip(state, req))]
pub async fn update_description<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateDescriptionRequest>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = state
        .product_service
        .update_description(UpdateProductDescription::new(product_id, req.description))
        .await?;
    Ok(Json(product.into()))
}

/// POST /products/:id/categories/:category_id — associate a category.
#[tracing::instrument(skip(state))]
pub async fn add_category<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let category_id = parse_category_id(&category_id)?;
    let product = state
        .product_service
        .add_category(AddCategoryToProduct::new(product_id, category_id))
        .await?;
    Ok(Json(product.into()))
}

/// DELETE /products/:id/categories/:category_id — remove an association.
#[tracing::instrument(skip(state))]
pub async fn remove_category<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path((id, category_id)): Path<(String, String)>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let category_id = parse_category_id(&category_id)?;
    let product = state
        .product_service
        .remove_category(RemoveCategoryFromProduct::new(product_id, category_id))
        .await?;
    Ok(Json(product.into()))
}

/// POST /products/:id/attributes — add an attribute.
#[tracing::instrument(skip(state, req))]
pub async fn add_attribute<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
    Json(req): Json<AttributeRequest>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let value = parse_attribute_value(req.value)?;
    let product = state
        .product_service
        .add_attribute(AddAttributeToProduct::new(product_id, req.key, value))
        .await?;
    Ok(Json(product.into()))
}

/// PUT /products/:id/attributes/:key — replace an attribute's value.
#[tracing::instrument(skip(state, req))]
pub async fn update_attribute<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path((id, key)): Path<(String, String)>,
    Json(req): Json<UpdateAttributeRequest>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let value = parse_attribute_value(req.value)?;
    let product = state
        .product_service
        .update_attribute(UpdateProductAttribute::new(product_id, key, value))
        .await?;
    Ok(Json(product.into()))
}

/// DELETE /products/:id/attributes/:key — remove an attribute.
#[tracing::instrument(skip(state))]
pub async fn remove_attribute<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path((id, key)): Path<(String, String)>,
) -> Result<Json<ProductResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let product_id = parse_product_id(&id)?;
    let product = state
        .product_service
        .remove_attribute(RemoveProductAttribute::new(product_id, key))
        .await?;
    Ok(Json(product.into()))
}
