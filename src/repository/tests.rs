use mongodb::bson::doc;

use super::*;
use crate::models::{MaterialUsage, OrderItem, OrderStatus};
use crate::storage::MemoryDocumentStore;

fn store() -> Arc<MemoryDocumentStore> {
    Arc::new(MemoryDocumentStore::new())
}

fn furniture_repo(store: &Arc<MemoryDocumentStore>) -> FurnitureRepository {
    Repository::new(store.clone())
}

fn names(listing: &Listing<Furniture>) -> Vec<&str> {
    listing.iter().map(|f| f.name.as_str()).collect()
}

#[tokio::test]
async fn test_add_returns_assigned_id() {
    let store = store();
    let repo = furniture_repo(&store);

    let desk = Furniture::new("Desk", "Desk", 250.0, 5);
    let id = repo.add(&desk).await.unwrap();

    let stored = repo.get_by_id(id).await.unwrap().unwrap();
    assert_eq!(stored.id, Some(id));
    assert_eq!(stored.name, "Desk");
    assert_eq!(stored.price, 250.0);
}

#[tokio::test]
async fn test_get_by_id_absent() {
    let repo = furniture_repo(&store());
    assert!(repo.get_by_id(ObjectId::new()).await.unwrap().is_none());
}

#[tokio::test]
async fn test_get_by_id_str_rejects_bad_hex() {
    let repo = furniture_repo(&store());
    let result = repo.get_by_id_str("not-an-id").await;
    assert!(matches!(result, Err(StorageError::InvalidId(_))));
}

#[tokio::test]
async fn test_get_all_preserves_store_order() {
    let store = store();
    let repo = furniture_repo(&store);
    for name in ["Wardrobe", "Bed", "Chair"] {
        repo.add(&Furniture::new(name, "Other", 10.0, 1))
            .await
            .unwrap();
    }

    let all = repo.get_all().await.unwrap();
    assert_eq!(names(&all), ["Wardrobe", "Bed", "Chair"]);
    assert!(all.is_clean());
}

#[tokio::test]
async fn test_find_by_name_is_case_insensitive() {
    let store = store();
    let repo = furniture_repo(&store);
    repo.add(&Furniture::new("Sofa", "Sofa", 300.0, 1))
        .await
        .unwrap();
    repo.add(&Furniture::new("SOFA", "Sofa", 320.0, 1))
        .await
        .unwrap();
    repo.add(&Furniture::new("Chair", "Chair", 40.0, 1))
        .await
        .unwrap();

    let found = repo.find_by_name("sofa").await.unwrap();
    assert_eq!(names(&found), ["Sofa", "SOFA"]);
}

#[tokio::test]
async fn test_find_by_name_is_substring_match() {
    let store = store();
    let repo = furniture_repo(&store);
    repo.add(&Furniture::new("Corner sofa", "Sofa", 500.0, 1))
        .await
        .unwrap();

    assert_eq!(repo.find_by_name("SOFA").await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_find_by_name_uses_regex_semantics() {
    let store = store();
    let repo = furniture_repo(&store);
    repo.add(&Furniture::new("Chair", "Chair", 40.0, 1))
        .await
        .unwrap();
    repo.add(&Furniture::new("Chaise", "Sofa", 400.0, 1))
        .await
        .unwrap();
    repo.add(&Furniture::new("Ch.ir", "Other", 1.0, 1))
        .await
        .unwrap();

    // "." matches any character, so the literal-dot name is not singled out.
    let dotted = repo.find_by_name("ch.ir").await.unwrap();
    assert_eq!(names(&dotted), ["Chair", "Ch.ir"]);

    let anchored = repo.find_by_name("^chai").await.unwrap();
    assert_eq!(names(&anchored), ["Chair", "Chaise"]);
}

#[tokio::test]
async fn test_find_by_category_is_exact() {
    let store = store();
    let repo = furniture_repo(&store);
    repo.add(&Furniture::new("Desk", "Desk", 250.0, 5))
        .await
        .unwrap();
    repo.add(&Furniture::new("Writing desk", "desk", 180.0, 2))
        .await
        .unwrap();

    let found = repo.find_by_category("Desk").await.unwrap();
    assert_eq!(names(&found), ["Desk"]);
}

#[tokio::test]
async fn test_get_sorted_by_price() {
    let store = store();
    let repo = furniture_repo(&store);
    for (name, price) in [("A", 120.0), ("B", 35.0), ("C", 120.0), ("D", 999.99)] {
        repo.add(&Furniture::new(name, "Other", price, 1))
            .await
            .unwrap();
    }

    let asc = repo.get_sorted("price", true).await.unwrap();
    let prices: Vec<f64> = asc.iter().map(|f| f.price).collect();
    assert!(prices.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(prices.len(), 4);

    let desc = repo.get_sorted("price", false).await.unwrap();
    let prices: Vec<f64> = desc.iter().map(|f| f.price).collect();
    assert!(prices.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn test_sort_mixes_integral_and_fractional_prices() {
    let store = store();
    store
        .insert_raw(
            "furniture",
            doc! { "name": "Int", "category": "Other", "price": 100, "stockQuantity": 1 },
        )
        .await
        .unwrap();
    store
        .insert_raw(
            "furniture",
            doc! { "name": "Frac", "category": "Other", "price": 99.5, "stockQuantity": 1 },
        )
        .await
        .unwrap();

    let repo = furniture_repo(&store);
    let sorted = repo.get_sorted("price", true).await.unwrap();
    assert_eq!(names(&sorted), ["Frac", "Int"]);
    assert_eq!(sorted.records[1].price, 100.0);
}

#[tokio::test]
async fn test_unsupported_sort_field_rejected() {
    let repo = furniture_repo(&store());
    let err = repo.get_sorted("colour", true).await.unwrap_err();
    assert!(matches!(
        err,
        StorageError::UnsupportedField { collection: "furniture", ref field } if field == "colour"
    ));
}

#[tokio::test]
async fn test_unsupported_search_field_rejected() {
    let repo = furniture_repo(&store());

    // category is exact-match only
    assert!(matches!(
        repo.find_matching("category", "desk").await,
        Err(StorageError::UnsupportedField { .. })
    ));
    assert!(matches!(
        repo.find_equal("name", "Desk").await,
        Err(StorageError::UnsupportedField { .. })
    ));
}

#[tokio::test]
async fn test_delete_semantics() {
    let store = store();
    let repo = furniture_repo(&store);
    let id = repo
        .add(&Furniture::new("Desk", "Desk", 250.0, 5))
        .await
        .unwrap();

    assert!(!repo.delete(ObjectId::new()).await.unwrap());
    assert!(repo.delete(id).await.unwrap());
    assert!(repo.get_by_id(id).await.unwrap().is_none());
    assert!(!repo.delete(id).await.unwrap());
}

#[tokio::test]
async fn test_delete_does_not_cascade() {
    let store = store();
    let furniture: FurnitureRepository = Repository::new(store.clone());
    let details: FurnitureDetailsRepository = Repository::new(store.clone());

    let desk_id = furniture
        .add(&Furniture::new("Desk", "Desk", 250.0, 5))
        .await
        .unwrap();
    details
        .add(&FurnitureDetails::new(desk_id, "Desk", "120x60x75 cm", 30.0, vec![]))
        .await
        .unwrap();

    assert!(furniture.delete(desk_id).await.unwrap());
    let orphan = details.get_by_furniture_id(desk_id).await.unwrap();
    assert_eq!(orphan.map(|d| d.furniture_id), Some(desk_id));
}

#[tokio::test]
async fn test_malformed_document_skipped_not_fatal() {
    let store = store();
    let repo = furniture_repo(&store);
    repo.add(&Furniture::new("Desk", "Desk", 250.0, 5))
        .await
        .unwrap();
    let bad_id = store
        .insert_raw("furniture", doc! { "name": "No price", "category": "Other" })
        .await
        .unwrap();
    repo.add(&Furniture::new("Chair", "Chair", 40.0, 4))
        .await
        .unwrap();

    let all = repo.get_all().await.unwrap();
    assert_eq!(names(&all), ["Desk", "Chair"]);
    assert_eq!(all.malformed.len(), 1);
    assert_eq!(all.malformed[0].id, Some(bad_id));
    assert_eq!(all.malformed[0].collection, "furniture");
}

#[tokio::test]
async fn test_get_by_id_malformed_is_error() {
    let store = store();
    let bad_id = store
        .insert_raw("furniture", doc! { "name": "No price", "category": "Other" })
        .await
        .unwrap();

    let repo = furniture_repo(&store);
    let err = repo.get_by_id(bad_id).await.unwrap_err();
    assert!(matches!(err, StorageError::Malformed(ref m) if m.id == Some(bad_id)));
}

#[tokio::test]
async fn test_unavailable_is_explicit() {
    let store = store();
    let repo = furniture_repo(&store);
    repo.add(&Furniture::new("Desk", "Desk", 250.0, 5))
        .await
        .unwrap();
    store.set_unavailable(true).await;

    assert!(repo.get_all().await.unwrap_err().is_unavailable());
    assert!(repo
        .add(&Furniture::new("Chair", "Chair", 40.0, 4))
        .await
        .unwrap_err()
        .is_unavailable());
}

#[tokio::test]
async fn test_fail_soft_degrades() {
    let store = store();
    let repo = furniture_repo(&store);
    let id = repo
        .add(&Furniture::new("Desk", "Desk", 250.0, 5))
        .await
        .unwrap();
    store.set_unavailable(true).await;

    assert!(repo.get_all().await.fail_soft().is_empty());
    assert!(repo.get_by_id(id).await.fail_soft().is_none());
    assert!(!repo.delete(id).await.fail_soft());
    assert!(repo
        .add(&Furniture::new("Chair", "Chair", 40.0, 4))
        .await
        .fail_soft()
        .is_none());

    store.set_unavailable(false).await;
    assert_eq!(repo.get_all().await.fail_soft().len(), 1);
}

#[tokio::test]
async fn test_customer_search_by_email() {
    let store = store();
    let repo: CustomerRepository = Repository::new(store.clone());
    repo.add(&Customer::new("Anna", "anna@oakworks.example"))
        .await
        .unwrap();
    repo.add(&Customer::new("Boris", "boris@example.com"))
        .await
        .unwrap();

    let found = repo.find_by_email("OAKWORKS").await.unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found.records[0].name, "Anna");
}

#[tokio::test]
async fn test_material_queries() {
    let store = store();
    let repo: MaterialRepository = Repository::new(store.clone());
    repo.add(&Material::new("Oak", "Wood", 12.5, "m", 100))
        .await
        .unwrap();
    repo.add(&Material::new("Oak veneer", "Wood", 4.0, "m²", 30))
        .await
        .unwrap();
    repo.add(&Material::new("Steel", "Metal", 8.0, "kg", 50))
        .await
        .unwrap();

    assert_eq!(repo.find_by_name("oak").await.unwrap().len(), 2);
    assert_eq!(repo.find_by_type("Metal").await.unwrap().len(), 1);

    let by_cost = repo.get_sorted("costPerUnit", false).await.unwrap();
    let costs: Vec<f64> = by_cost.iter().map(|m| m.cost_per_unit).collect();
    assert_eq!(costs, [12.5, 8.0, 4.0]);
}

#[tokio::test]
async fn test_order_queries() {
    let store = store();
    let repo: OrderRepository = Repository::new(store.clone());
    let anna = ObjectId::new();
    let boris = ObjectId::new();
    let chair = ObjectId::new();

    repo.add(&Order::new(
        anna,
        OrderStatus::Pending,
        vec![OrderItem::new(chair, 2, 40.0)],
    ))
    .await
    .unwrap();
    repo.add(&Order::new(anna, OrderStatus::Completed, vec![]))
        .await
        .unwrap();
    repo.add(&Order::new(
        boris,
        OrderStatus::Pending,
        vec![OrderItem::new(chair, 1, 40.0)],
    ))
    .await
    .unwrap();

    assert_eq!(repo.find_by_customer_id(anna).await.unwrap().len(), 2);
    assert_eq!(
        repo.find_by_status(OrderStatus::Pending)
            .await
            .unwrap()
            .len(),
        2
    );

    let by_total = repo.get_sorted("totalPrice", true).await.unwrap();
    let totals: Vec<f64> = by_total.iter().map(|o| o.total_price).collect();
    assert_eq!(totals, [0.0, 40.0, 80.0]);
}

#[tokio::test]
async fn test_find_by_status_includes_legacy_spelling() {
    let store = store();
    let repo: OrderRepository = Repository::new(store.clone());
    let customer = ObjectId::new();

    repo.add(&Order::new(customer, OrderStatus::InProgress, vec![]))
        .await
        .unwrap();
    let mut legacy = Order::new(customer, OrderStatus::InProgress, vec![]).encode();
    legacy.insert("status", "InProgress");
    store.insert_raw("orders", legacy).await.unwrap();
    repo.add(&Order::new(customer, OrderStatus::Pending, vec![]))
        .await
        .unwrap();

    let found = repo.find_by_status(OrderStatus::InProgress).await.unwrap();
    assert_eq!(found.len(), 2);
    assert!(found.is_clean());
    assert!(found.iter().all(|o| o.status == OrderStatus::InProgress));
}

#[tokio::test]
async fn test_details_lookup_by_furniture() {
    let store = store();
    let repo: FurnitureDetailsRepository = Repository::new(store.clone());
    let desk = ObjectId::new();
    let oak = ObjectId::new();

    repo.add(&FurnitureDetails::new(
        desk,
        "Desk",
        "120x60x75 cm",
        30.0,
        vec![MaterialUsage::new(oak, 3.5)],
    ))
    .await
    .unwrap();

    let found = repo.get_by_furniture_id(desk).await.unwrap().unwrap();
    assert_eq!(found.material_usages, vec![MaterialUsage::new(oak, 3.5)]);
    assert!(repo
        .get_by_furniture_id(ObjectId::new())
        .await
        .unwrap()
        .is_none());
    assert!(matches!(
        repo.get_sorted("description", true).await,
        Err(StorageError::UnsupportedField { .. })
    ));
}
