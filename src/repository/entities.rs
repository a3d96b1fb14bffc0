//! Entity-specific queries.

use mongodb::bson::oid::ObjectId;

use super::{Listing, Repository};
use crate::interfaces::Result;
use crate::models::{Customer, Furniture, FurnitureDetails, Material, Order, OrderStatus};

impl Repository<Customer> {
    pub async fn find_by_name(&self, name: &str) -> Result<Listing<Customer>> {
        self.find_matching("name", name).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Listing<Customer>> {
        self.find_matching("email", email).await
    }
}

impl Repository<Furniture> {
    pub async fn find_by_name(&self, name: &str) -> Result<Listing<Furniture>> {
        self.find_matching("name", name).await
    }

    pub async fn find_by_category(&self, category: &str) -> Result<Listing<Furniture>> {
        self.find_equal("category", category).await
    }
}

impl Repository<Material> {
    pub async fn find_by_name(&self, name: &str) -> Result<Listing<Material>> {
        self.find_matching("name", name).await
    }

    pub async fn find_by_type(&self, material_type: &str) -> Result<Listing<Material>> {
        self.find_equal("type", material_type).await
    }
}

impl Repository<FurnitureDetails> {
    /// All specifications recorded for one furniture item.
    pub async fn find_by_furniture_id(
        &self,
        furniture_id: ObjectId,
    ) -> Result<Listing<FurnitureDetails>> {
        self.find_equal("furnitureId", furniture_id).await
    }

    /// The first specification for a furniture item, if any.
    pub async fn get_by_furniture_id(
        &self,
        furniture_id: ObjectId,
    ) -> Result<Option<FurnitureDetails>> {
        Ok(self
            .find_by_furniture_id(furniture_id)
            .await?
            .into_iter()
            .next())
    }
}

impl Repository<Order> {
    pub async fn find_by_customer_id(&self, customer_id: ObjectId) -> Result<Listing<Order>> {
        self.find_equal("customerId", customer_id).await
    }

    /// Orders in `status`, including those stored under a legacy spelling.
    pub async fn find_by_status(&self, status: OrderStatus) -> Result<Listing<Order>> {
        let mut listing = Listing::empty();
        for value in status.wire_values() {
            listing.extend(self.find_equal("status", *value).await?);
        }
        Ok(listing)
    }
}
