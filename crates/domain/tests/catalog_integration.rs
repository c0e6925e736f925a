//! End-to-end domain tests: commands against in-memory stores with a live
//! in-process broker, asserting on the published event stream.

use std::sync::Arc;

use domain::{
    ActivateProduct, AddAttributeToProduct, AddCategoryToProduct, ArchiveProduct, CategoryService,
    CreateCategory, CreateProduct, ProductService, RemoveProductAttribute, UpdateCategory,
    UpdateProductDescription,
};
use messaging::{
    CATEGORY_EVENTS_TOPIC, EventMessage, EventPublisher, InMemoryBroker, MessageBus,
    PRODUCT_EVENTS_TOPIC,
};
use store::memory::{InMemoryCategoryRepository, InMemoryProductRepository};
use store::{ProductAttribute, ProductStatus};

struct Catalog {
    categories: CategoryService<InMemoryCategoryRepository>,
    products: ProductService<InMemoryProductRepository, InMemoryCategoryRepository>,
    broker: Arc<InMemoryBroker>,
}

async fn catalog() -> Catalog {
    let broker = Arc::new(InMemoryBroker::new());
    let publisher = Arc::new(EventPublisher::new());
    publisher.connect(broker.clone()).await;

    let category_repo = InMemoryCategoryRepository::new();
    Catalog {
        categories: CategoryService::new(category_repo.clone(), publisher.clone()),
        products: ProductService::new(
            InMemoryProductRepository::new(),
            category_repo,
            publisher,
        ),
        broker,
    }
}

async fn envelopes(broker: &InMemoryBroker, topic: &str) -> Vec<EventMessage> {
    broker
        .retained(topic)
        .await
        .iter()
        .map(|m| serde_json::from_slice(&m.payload).unwrap())
        .collect()
}

#[tokio::test]
async fn full_product_lifecycle_produces_one_event_per_command() {
    let catalog = catalog().await;

    let electronics = catalog
        .categories
        .create_category(CreateCategory::new("Electronics", None))
        .await
        .unwrap();
    let computers = catalog
        .categories
        .create_category(CreateCategory::new("Computers", Some(electronics.id)))
        .await
        .unwrap();
    catalog
        .categories
        .update_category(UpdateCategory::new(computers.id).rename("Laptops & Desktops"))
        .await
        .unwrap();

    let product = catalog
        .products
        .create_product(
            CreateProduct::new("ThinkBook 14")
                .description("A 14-inch laptop")
                .categories(vec![computers.id])
                .attributes(vec![ProductAttribute::new("ram", "32GB")]),
        )
        .await
        .unwrap();
    catalog
        .products
        .add_attribute(AddAttributeToProduct::new(product.id, "weight", 1.4))
        .await
        .unwrap();
    catalog
        .products
        .add_category(AddCategoryToProduct::new(product.id, electronics.id))
        .await
        .unwrap();
    let active = catalog
        .products
        .activate_product(ActivateProduct::new(product.id))
        .await
        .unwrap();
    assert_eq!(active.status, ProductStatus::Active);

    catalog
        .products
        .remove_attribute(RemoveProductAttribute::new(product.id, "weight"))
        .await
        .unwrap();
    catalog
        .products
        .update_description(UpdateProductDescription::new(product.id, "Refreshed"))
        .await
        .unwrap();
    catalog
        .products
        .archive_product(ArchiveProduct::new(product.id))
        .await
        .unwrap();

    let category_events = envelopes(&catalog.broker, CATEGORY_EVENTS_TOPIC).await;
    assert_eq!(
        category_events
            .iter()
            .map(|e| e.event_type.as_str())
            .collect::<Vec<_>>(),
        vec!["CATEGORY_CREATED", "CATEGORY_CREATED", "CATEGORY_UPDATED"]
    );

    let product_events = envelopes(&catalog.broker, PRODUCT_EVENTS_TOPIC).await;
    assert_eq!(
        product_events
            .iter()
            .map(|e| e.event_type.as_str())
            .collect::<Vec<_>>(),
        vec![
            "PRODUCT_CREATED",
            "ATTRIBUTE_ADDED_TO_PRODUCT",
            "CATEGORY_ADDED_TO_PRODUCT",
            "PRODUCT_ACTIVATED",
            "ATTRIBUTE_REMOVED_FROM_PRODUCT",
            "PRODUCT_DESCRIPTION_UPDATED",
            "PRODUCT_ARCHIVED"
        ]
    );

    // Every product event targets the product aggregate and carries a
    // correlated event id.
    for event in &product_events {
        assert_eq!(event.aggregate_id, product.id.to_string());
        assert!(event.event_id.starts_with(&product.id.to_string()));
    }
}

#[tokio::test]
async fn failed_commands_publish_nothing() {
    let catalog = catalog().await;

    catalog
        .categories
        .create_category(CreateCategory::new("Electronics", None))
        .await
        .unwrap();
    let before = catalog.broker.message_count(CATEGORY_EVENTS_TOPIC).await;

    let result = catalog
        .categories
        .create_category(CreateCategory::new("Electronics", None))
        .await;
    assert!(result.is_err());
    assert_eq!(
        catalog.broker.message_count(CATEGORY_EVENTS_TOPIC).await,
        before
    );

    let result = catalog
        .products
        .activate_product(ActivateProduct::new(common::ProductId::new()))
        .await;
    assert!(result.is_err());
    assert_eq!(catalog.broker.message_count(PRODUCT_EVENTS_TOPIC).await, 0);
}

#[tokio::test]
async fn consumer_subscribed_later_sees_retained_history() {
    let catalog = catalog().await;

    catalog
        .products
        .create_product(CreateProduct::new("Laptop"))
        .await
        .unwrap();

    let mut sub = catalog
        .broker
        .subscribe(&[PRODUCT_EVENTS_TOPIC], true)
        .await
        .unwrap();
    let message = sub.recv().await.unwrap();
    let envelope: EventMessage = serde_json::from_slice(&message.payload).unwrap();
    assert_eq!(envelope.event_type, "PRODUCT_CREATED");
}
