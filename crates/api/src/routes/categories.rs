//! Category command and query endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use domain::{CreateCategory, UpdateCategory};
use serde::{Deserialize, Deserializer, Serialize};
use store::{Category, CategoryRepository, ProductRepository};

use crate::error::ApiError;

use super::{AppState, parse_category_id};

// -- Request types --

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub parent_id: Option<String>,
}

/// Update payload where `parent_id` distinguishes an absent field (leave
/// unchanged) from an explicit `null` (detach from parent).
#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub parent_id: Option<Option<String>>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

// -- Response types --

#[derive(Serialize)]
pub struct CategoryResponse {
    pub id: String,
    pub name: String,
    pub parent_id: Option<String>,
    pub version: i64,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Category> for CategoryResponse {
    fn from(category: Category) -> Self {
        Self {
            id: category.id.to_string(),
            name: category.name,
            parent_id: category.parent_id.map(|id| id.to_string()),
            version: category.version,
            created_at: category.created_at.to_rfc3339(),
            updated_at: category.updated_at.to_rfc3339(),
        }
    }
}

// -- Handlers --

/// POST /categories — create a new category.
#[tracing::instrument(skip(state, req), fields(name = %req.name))]
pub async fn create<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Json(req): Json<CreateCategoryRequest>,
) -> Result<(axum::http::StatusCode, Json<CategoryResponse>), ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let parent_id = req
        .parent_id
        .as_deref()
        .map(parse_category_id)
        .transpose()?;

    let category = state
        .category_service
        .create_category(CreateCategory::new(req.name, parent_id))
        .await?;

    Ok((axum::http::StatusCode::CREATED, Json(category.into())))
}

/// GET /categories — list all categories, oldest first.
#[tracing::instrument(skip(state))]
pub async fn list<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
) -> Result<Json<Vec<CategoryResponse>>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let categories = state.category_service.list_categories().await?;
    Ok(Json(categories.into_iter().map(Into::into).collect()))
}

/// GET /categories/:id — load a category by ID.
#[tracing::instrument(skip(state))]
pub async fn get<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
) -> Result<Json<CategoryResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let category_id = parse_category_id(&id)?;
    let category = state.category_service.get_category(category_id).await?;
    Ok(Json(category.into()))
}

/// PATCH /categories/:id — rename and/or reparent a category.
#[tracing::instrument(skip(state, req))]
pub async fn update<P, C>(
    State(state): State<Arc<AppState<P, C>>>,
    Path(id): Path<String>,
    Json(req): Json<UpdateCategoryRequest>,
) -> Result<Json<CategoryResponse>, ApiError>
where
    P: ProductRepository + Clone + 'static,
    C: CategoryRepository + Clone + 'static,
{
    let category_id = parse_category_id(&id)?;

    let mut cmd = UpdateCategory::new(category_id);
    if let Some(name) = req.name {
        cmd = cmd.rename(name);
    }
    if let Some(parent) = req.parent_id {
        let parent = parent.as_deref().map(parse_category_id).transpose()?;
        cmd = cmd.reparent(parent);
    }

    let category = state.category_service.update_category(cmd).await?;
    Ok(Json(category.into()))
}
