//! workshop-records: store summary
//!
//! Opens the configured document store, reports how many records each
//! collection holds, lists orders with their customer names, and closes
//! the connection.
//!
//! ## Configuration
//! - WORKSHOP_CONFIG: Path to a YAML config file (optional)
//! - WORKSHOP__STORAGE__MONGODB__URI / __DATABASE: store endpoint overrides
//! - WORKSHOP_LOG: tracing filter (default: info)

use tracing::{info, warn};

use workshop_records::config::Config;
use workshop_records::interfaces::Result;
use workshop_records::references::{resolve_label, UNKNOWN};
use workshop_records::repository::{
    CustomerRepository, FurnitureDetailsRepository, FurnitureRepository, MaterialRepository,
    OrderRepository,
};
use workshop_records::storage::{init_storage, Storage};
use workshop_records::utils::bootstrap::init_tracing;

#[tokio::main]
async fn main() -> std::result::Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let config = Config::load(None)?;
    let storage = init_storage(&config.storage).await?;

    if let Storage::Mongodb(store) = &storage {
        store.ping().await?;
    }

    summarize(&storage).await?;

    storage.close().await;
    Ok(())
}

async fn summarize(storage: &Storage) -> Result<()> {
    let store = storage.store();
    let customers = CustomerRepository::new(store.clone());
    let furniture = FurnitureRepository::new(store.clone());
    let materials = MaterialRepository::new(store.clone());
    let details = FurnitureDetailsRepository::new(store.clone());
    let orders = OrderRepository::new(store);

    let customer_count = customers.get_all().await?.len();
    let furniture_count = furniture.get_all().await?.len();
    let material_count = materials.get_all().await?.len();
    let details_count = details.get_all().await?.len();
    info!(customers = customer_count, "customers");
    info!(furniture = furniture_count, "furniture");
    info!(materials = material_count, "materials");
    info!(details = details_count, "furnitureDetails");

    for line in order_lines(&customers, &orders).await? {
        info!("{}", line);
    }
    Ok(())
}

/// Newest first, each with its customer's name. A customer that cannot be
/// read is logged and shown as the placeholder.
async fn order_lines(
    customers: &CustomerRepository,
    orders: &OrderRepository,
) -> Result<Vec<String>> {
    let listing = orders.get_sorted("orderDate", false).await?;
    for malformed in &listing.malformed {
        warn!("{}", malformed);
    }

    let mut lines = Vec::with_capacity(listing.len());
    for order in listing {
        let customer = match resolve_label(customers, order.customer_id).await {
            Ok(label) => label,
            Err(e) => {
                warn!(customer_id = %order.customer_id, "Customer lookup failed: {}", e);
                UNKNOWN.to_string()
            }
        };
        lines.push(format!(
            "{} {} {}",
            order.order_date().format("%Y-%m-%d"),
            customer,
            order
        ));
    }
    Ok(lines)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use mongodb::bson::doc;
    use workshop_records::interfaces::DocumentStore;
    use workshop_records::models::{Customer, Order, OrderStatus};
    use workshop_records::storage::MemoryDocumentStore;

    use super::*;

    #[tokio::test]
    async fn test_malformed_customer_does_not_stop_order_lines() {
        let store = Arc::new(MemoryDocumentStore::new());
        let shared: Arc<dyn DocumentStore> = store.clone();
        let customers = CustomerRepository::new(shared.clone());
        let orders = OrderRepository::new(shared);

        let anna = customers
            .add(&Customer::new("Anna", "anna@example.com"))
            .await
            .unwrap();
        let broken = store
            .insert_raw("customers", doc! { "name": "No email" })
            .await
            .unwrap();
        orders
            .add(&Order::new(anna, OrderStatus::Pending, vec![]))
            .await
            .unwrap();
        orders
            .add(&Order::new(broken, OrderStatus::Completed, vec![]))
            .await
            .unwrap();

        let lines = order_lines(&customers, &orders).await.unwrap();
        assert_eq!(lines.len(), 2);
        assert!(lines.iter().any(|l| l.contains("Anna")));
        assert!(lines.iter().any(|l| l.contains(UNKNOWN)));
    }
}
