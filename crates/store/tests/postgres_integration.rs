//! PostgreSQL integration tests
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p store --test postgres_integration -- --test-threads=1
//! ```

use std::sync::Arc;

use common::CategoryId;
use sqlx::PgPool;
use store::{
    Category, CategoryRepository, PostgresCategoryRepository, PostgresProductRepository, Product,
    ProductAttribute, ProductRepository, ProductStatus, StoreError,
};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use serial_test::serial;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

/// Global shared container
static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            // Create a temporary pool just for migrations
            let temp_pool = PgPool::connect(&connection_string).await.unwrap();

            // Run migrations using raw_sql to execute multiple statements
            sqlx::raw_sql(include_str!(
                "../../../migrations/001_create_catalog_tables.sql"
            ))
            .execute(&temp_pool)
            .await
            .unwrap();
            sqlx::raw_sql(include_str!("../../../migrations/002_create_audit_logs.sql"))
                .execute(&temp_pool)
                .await
                .unwrap();

            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get fresh repositories with their own pool and cleared tables
async fn get_test_repos() -> (PostgresCategoryRepository, PostgresProductRepository) {
    let info = get_container_info().await;

    // Create a fresh pool for each test to avoid connection issues
    let pool = sqlx::postgres::PgPoolOptions::new()
        .max_connections(5)
        .connect(&info.connection_string)
        .await
        .unwrap();

    // Clear tables for test isolation
    sqlx::query("TRUNCATE TABLE product_categories, products, categories")
        .execute(&pool)
        .await
        .unwrap();

    (
        PostgresCategoryRepository::new(pool.clone()),
        PostgresProductRepository::new(pool),
    )
}

#[tokio::test]
#[serial]
async fn save_and_find_category() {
    let (categories, _) = get_test_repos().await;

    let saved = categories
        .save(Category::new("Electronics", None))
        .await
        .unwrap();
    assert_eq!(saved.version, 1);

    let loaded = categories.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(loaded.name, "Electronics");
    assert_eq!(loaded.version, 1);
    assert!(loaded.parent_id.is_none());
}

#[tokio::test]
#[serial]
async fn category_name_lookup_is_case_insensitive() {
    let (categories, _) = get_test_repos().await;
    categories
        .save(Category::new("Electronics", None))
        .await
        .unwrap();

    assert!(
        categories
            .find_by_name("ELECTRONICS")
            .await
            .unwrap()
            .is_some()
    );
    assert!(categories.find_by_name("Books").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn category_update_bumps_version_and_detects_conflicts() {
    let (categories, _) = get_test_repos().await;
    let saved = categories
        .save(Category::new("Electronics", None))
        .await
        .unwrap();

    let mut first = saved.clone();
    first.name = "Gadgets".to_string();
    let updated = categories.save(first).await.unwrap();
    assert_eq!(updated.version, 2);

    // Saving the stale copy at version 1 must conflict.
    let mut second = saved;
    second.name = "Devices".to_string();
    let err = categories.save(second).await.unwrap_err();
    assert!(matches!(
        err,
        StoreError::VersionConflict {
            expected: 1,
            actual: 2,
            ..
        }
    ));
}

#[tokio::test]
#[serial]
async fn find_by_ids_skips_missing() {
    let (categories, _) = get_test_repos().await;
    let a = categories.save(Category::new("A", None)).await.unwrap();
    let b = categories.save(Category::new("B", None)).await.unwrap();

    let found = categories
        .find_by_ids(&[a.id, CategoryId::new(), b.id])
        .await
        .unwrap();
    assert_eq!(found.len(), 2);
}

#[tokio::test]
#[serial]
async fn category_parent_link_persists() {
    let (categories, _) = get_test_repos().await;
    let parent = categories.save(Category::new("Root", None)).await.unwrap();
    let child = categories
        .save(Category::new("Child", Some(parent.id)))
        .await
        .unwrap();

    let loaded = categories.find_by_id(child.id).await.unwrap().unwrap();
    assert_eq!(loaded.parent_id, Some(parent.id));
}

#[tokio::test]
#[serial]
async fn save_and_find_product_with_associations() {
    let (categories, products) = get_test_repos().await;
    let category = categories
        .save(Category::new("Electronics", None))
        .await
        .unwrap();

    let product = Product::new(
        "Laptop",
        Some("A fast laptop".to_string()),
        vec![category.id],
        vec![
            ProductAttribute::new("color", "silver"),
            ProductAttribute::new("weight", 1.4),
            ProductAttribute::new("fragile", true),
        ],
    );
    let saved = products.save(product).await.unwrap();
    assert_eq!(saved.version, 1);

    let loaded = products.find_by_id(saved.id).await.unwrap().unwrap();
    assert_eq!(loaded.status, ProductStatus::Draft);
    assert_eq!(loaded.categories, vec![category.id]);
    assert_eq!(loaded.attributes.len(), 3);
    assert!(loaded.has_attribute("fragile"));
}

#[tokio::test]
#[serial]
async fn product_category_rewrite_preserves_order() {
    let (categories, products) = get_test_repos().await;
    let a = categories.save(Category::new("A", None)).await.unwrap();
    let b = categories.save(Category::new("B", None)).await.unwrap();
    let c = categories.save(Category::new("C", None)).await.unwrap();

    let saved = products
        .save(Product::new("Laptop", None, vec![a.id, b.id], vec![]))
        .await
        .unwrap();

    let mut reordered = saved;
    reordered.categories = vec![c.id, a.id];
    products.save(reordered.clone()).await.unwrap();

    let loaded = products.find_by_id(reordered.id).await.unwrap().unwrap();
    assert_eq!(loaded.categories, vec![c.id, a.id]);
}

#[tokio::test]
#[serial]
async fn product_update_detects_stale_version() {
    let (_, products) = get_test_repos().await;
    let saved = products
        .save(Product::new("Laptop", None, vec![], vec![]))
        .await
        .unwrap();

    let mut first = saved.clone();
    first.status = ProductStatus::Archived;
    products.save(first).await.unwrap();

    let err = products.save(saved).await.unwrap_err();
    assert!(matches!(err, StoreError::VersionConflict { actual: 2, .. }));
}

#[tokio::test]
#[serial]
async fn product_name_lookup_is_case_insensitive() {
    let (_, products) = get_test_repos().await;
    products
        .save(Product::new("Laptop", None, vec![], vec![]))
        .await
        .unwrap();

    assert!(products.find_by_name("laptop").await.unwrap().is_some());
    assert!(products.find_by_name("LAPTOP").await.unwrap().is_some());
    assert!(products.find_by_name("Phone").await.unwrap().is_none());
}

#[tokio::test]
#[serial]
async fn list_returns_oldest_first() {
    let (categories, _) = get_test_repos().await;
    let first = categories.save(Category::new("First", None)).await.unwrap();
    let second = categories
        .save(Category::new("Second", None))
        .await
        .unwrap();

    let all = categories.list().await.unwrap();
    assert_eq!(all.len(), 2);
    assert_eq!(all[0].id, first.id);
    assert_eq!(all[1].id, second.id);
}
