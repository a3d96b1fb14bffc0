//! Customer orders.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};

use crate::codec::{self, DecodeError, Record};

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum OrderStatus {
    #[default]
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 4] = [
        OrderStatus::Pending,
        OrderStatus::InProgress,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    /// Wire value.
    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "Pending",
            OrderStatus::InProgress => "In Progress",
            OrderStatus::Completed => "Completed",
            OrderStatus::Cancelled => "Cancelled",
        }
    }

    /// Every stored spelling that decodes to this status, canonical first.
    pub fn wire_values(self) -> &'static [&'static str] {
        match self {
            OrderStatus::Pending => &["Pending"],
            OrderStatus::InProgress => &["In Progress", "InProgress"],
            OrderStatus::Completed => &["Completed"],
            OrderStatus::Cancelled => &["Cancelled"],
        }
    }
}

impl FromStr for OrderStatus {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.wire_values().iter().any(|value| *value == s))
            .ok_or_else(|| DecodeError::UnknownStatus(s.to_string()))
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<OrderStatus> for Bson {
    fn from(status: OrderStatus) -> Self {
        Bson::String(status.as_str().to_string())
    }
}

/// One line of an order. `price` is the furniture price at order time,
/// not a live reference.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderItem {
    pub furniture_id: ObjectId,
    pub quantity: u32,
    pub price: f64,
}

impl OrderItem {
    pub fn new(furniture_id: ObjectId, quantity: u32, price: f64) -> Self {
        Self {
            furniture_id,
            quantity,
            price,
        }
    }

    pub fn subtotal(&self) -> f64 {
        self.price * f64::from(self.quantity)
    }

    fn encode(&self) -> Document {
        doc! {
            "furnitureId": self.furniture_id,
            "quantity": codec::count_to_bson(self.quantity),
            "price": self.price,
        }
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            furniture_id: codec::read_object_id(doc, "furnitureId")?,
            quantity: codec::read_count(doc, "quantity")?,
            price: codec::read_decimal(doc, "price")?,
        })
    }
}

/// A customer purchase.
///
/// `total_price` is stored as given; it is never recomputed from `items`.
/// The order date is held at millisecond precision so it survives storage.
#[derive(Debug, Clone, PartialEq)]
pub struct Order {
    pub id: Option<ObjectId>,
    pub customer_id: ObjectId,
    order_date: DateTime<Utc>,
    pub status: OrderStatus,
    pub total_price: f64,
    pub items: Vec<OrderItem>,
}

impl Order {
    /// A new order dated now, with the total computed from `items`.
    pub fn new(customer_id: ObjectId, status: OrderStatus, items: Vec<OrderItem>) -> Self {
        let mut order = Self {
            id: None,
            customer_id,
            order_date: codec::truncate_to_millis(Utc::now()),
            status,
            total_price: 0.0,
            items,
        };
        order.total_price = order.items_total();
        order
    }

    pub fn order_date(&self) -> DateTime<Utc> {
        self.order_date
    }

    /// Set the order date, truncated to milliseconds.
    pub fn set_order_date(&mut self, date: DateTime<Utc>) {
        self.order_date = codec::truncate_to_millis(date);
    }

    pub fn with_order_date(mut self, date: DateTime<Utc>) -> Self {
        self.set_order_date(date);
        self
    }

    /// Σ(price × quantity) over the items. Zero for an empty order.
    pub fn items_total(&self) -> f64 {
        self.items
            .iter()
            .fold(0.0, |total, item| total + item.subtotal())
    }

    /// Short id shown in listings: the first six hex digits, or "New".
    pub fn short_id(&self) -> String {
        match self.id {
            Some(id) => id.to_hex()[..6].to_string(),
            None => "New".to_string(),
        }
    }
}

impl Record for Order {
    const COLLECTION: &'static str = "orders";
    const SORT_FIELDS: &'static [&'static str] = &["orderDate", "status", "totalPrice"];
    const TEXT_FIELDS: &'static [&'static str] = &[];
    const EXACT_FIELDS: &'static [&'static str] = &["customerId", "status"];

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn encode(&self) -> Document {
        let items: Vec<Bson> = self
            .items
            .iter()
            .map(|item| Bson::Document(item.encode()))
            .collect();

        let mut doc = codec::document_with_id(self.id);
        doc.insert("customerId", self.customer_id);
        doc.insert("orderDate", codec::datetime_to_bson(self.order_date));
        doc.insert("status", self.status);
        doc.insert("totalPrice", self.total_price);
        doc.insert("items", items);
        doc
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            id: codec::read_id(doc)?,
            customer_id: codec::read_object_id(doc, "customerId")?,
            order_date: codec::read_datetime(doc, "orderDate")?,
            status: codec::read_string(doc, "status")?.parse()?,
            total_price: codec::read_decimal(doc, "totalPrice")?,
            items: codec::read_nested_list(doc, "items", OrderItem::decode)?,
        })
    }
}

impl fmt::Display for Order {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Order #{} - {} - ${:.2}",
            self.short_id(),
            self.status,
            self.total_price
        )
    }
}
