//! Cross-collection searches.
//!
//! Both searches take free text that is either a record id or a name
//! pattern, and walk a reference to reach the records asked for.

use mongodb::bson::oid::ObjectId;
use tracing::debug;

use crate::interfaces::Result;
use crate::models::{Customer, Furniture, FurnitureDetails, Order};
use crate::repository::{Listing, Repository};

/// Orders placed by a customer given as an id or a name pattern.
///
/// Blank text lists every order. Id text searches by that customer id
/// directly. Anything else is matched against customer names and the orders
/// of every match are concatenated.
pub async fn orders_by_customer(
    customers: &Repository<Customer>,
    orders: &Repository<Order>,
    text: &str,
) -> Result<Listing<Order>> {
    let text = text.trim();
    if text.is_empty() {
        return orders.get_all().await;
    }
    if let Ok(customer_id) = ObjectId::parse_str(text) {
        return orders.find_by_customer_id(customer_id).await;
    }

    let matched = customers.find_by_name(text).await?;
    debug!(pattern = text, customers = matched.len(), "Order search by customer name");

    let mut result = Listing::empty();
    for customer in matched {
        if let Some(id) = customer.id {
            result.extend(orders.find_by_customer_id(id).await?);
        }
    }
    Ok(result)
}

/// Specifications of furniture given as an id or a name pattern.
///
/// Blank text lists every specification. Id text looks up the
/// specification of that furniture id. Anything else is matched against
/// furniture names and the specification of each match is collected;
/// matches without one are skipped.
pub async fn details_by_furniture(
    furniture: &Repository<Furniture>,
    details: &Repository<FurnitureDetails>,
    text: &str,
) -> Result<Vec<FurnitureDetails>> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(details.get_all().await?.into_iter().collect());
    }
    if let Ok(furniture_id) = ObjectId::parse_str(text) {
        return Ok(details
            .get_by_furniture_id(furniture_id)
            .await?
            .into_iter()
            .collect());
    }

    let matched = furniture.find_by_name(text).await?;
    let mut result = Vec::new();
    for item in matched {
        if let Some(id) = item.id {
            if let Some(spec) = details.get_by_furniture_id(id).await? {
                result.push(spec);
            }
        }
    }
    Ok(result)
}
