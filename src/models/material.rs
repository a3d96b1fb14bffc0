//! Raw materials.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;

use crate::codec::{self, DecodeError, Record};

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub id: Option<ObjectId>,
    pub name: String,
    pub material_type: String,
    pub cost_per_unit: f64,
    pub unit: String,
    pub stock_quantity: u32,
}

impl Material {
    pub fn new(
        name: impl Into<String>,
        material_type: impl Into<String>,
        cost_per_unit: f64,
        unit: impl Into<String>,
        stock_quantity: u32,
    ) -> Self {
        Self {
            id: None,
            name: name.into(),
            material_type: material_type.into(),
            cost_per_unit,
            unit: unit.into(),
            stock_quantity,
        }
    }
}

impl Record for Material {
    const COLLECTION: &'static str = "materials";
    const SORT_FIELDS: &'static [&'static str] = &["name", "type", "costPerUnit", "stockQuantity"];
    const TEXT_FIELDS: &'static [&'static str] = &["name"];
    const EXACT_FIELDS: &'static [&'static str] = &["type"];

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn encode(&self) -> Document {
        let mut doc = codec::document_with_id(self.id);
        doc.insert("name", self.name.as_str());
        doc.insert("type", self.material_type.as_str());
        doc.insert("costPerUnit", self.cost_per_unit);
        doc.insert("unit", self.unit.as_str());
        doc.insert("stockQuantity", codec::count_to_bson(self.stock_quantity));
        doc
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            id: codec::read_id(doc)?,
            name: codec::read_string(doc, "name")?,
            material_type: codec::read_string(doc, "type")?,
            cost_per_unit: codec::read_decimal(doc, "costPerUnit")?,
            unit: codec::read_string(doc, "unit")?,
            stock_quantity: codec::read_count(doc, "stockQuantity")?,
        })
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({}) - {} per {}",
            self.name, self.material_type, self.cost_per_unit, self.unit
        )
    }
}
