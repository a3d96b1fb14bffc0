//! Catalog items.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;

use crate::codec::{self, DecodeError, Record};

/// A catalog item the workshop builds and sells.
#[derive(Debug, Clone, PartialEq)]
pub struct Furniture {
    pub id: Option<ObjectId>,
    pub name: String,
    pub category: String,
    pub price: f64,
    pub stock_quantity: u32,
}

impl Furniture {
    pub fn new(
        name: impl Into<String>,
        category: impl Into<String>,
        price: f64,
        stock_quantity: u32,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            category: category.into(),
            price,
            stock_quantity,
        }
    }
}

impl Record for Furniture {
    const COLLECTION: &'static str = "furniture";
    const SORT_FIELDS: &'static [&'static str] = &["name", "category", "price", "stockQuantity"];
    const TEXT_FIELDS: &'static [&'static str] = &["name"];
    const EXACT_FIELDS: &'static [&'static str] = &["category"];

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn encode(&self) -> Document {
        let mut doc = codec::document_with_id(self.id);
        doc.insert("name", self.name.as_str());
        doc.insert("category", self.category.as_str());
        doc.insert("price", self.price);
        doc.insert("stockQuantity", codec::count_to_bson(self.stock_quantity));
        doc
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            id: codec::read_id(doc)?,
            name: codec::read_string(doc, "name")?,
            category: codec::read_string(doc, "category")?,
            price: codec::read_decimal(doc, "price")?,
            stock_quantity: codec::read_count(doc, "stockQuantity")?,
        })
    }
}

impl fmt::Display for Furniture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}) - ${:.2}", self.name, self.category, self.price)
    }
}
