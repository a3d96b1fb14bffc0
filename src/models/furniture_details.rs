//! Composite specifications: which materials a furniture item consumes.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::{doc, Bson, Document};

use crate::codec::{self, DecodeError, Record};

/// Quantity of one material consumed by a furniture item.
#[derive(Debug, Clone, PartialEq)]
pub struct MaterialUsage {
    pub material_id: ObjectId,
    pub quantity: f64,
}

impl MaterialUsage {
    pub fn new(material_id: ObjectId, quantity: f64) -> Self {
        Self {
            material_id,
            quantity,
        }
    }

    fn encode(&self) -> Document {
        doc! {
            "materialId": self.material_id,
            "quantity": self.quantity,
        }
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            material_id: codec::read_object_id(doc, "materialId")?,
            quantity: codec::read_decimal(doc, "quantity")?,
        })
    }
}

/// Specification of a furniture item. At most one is expected per
/// furniture id; nothing enforces it.
#[derive(Debug, Clone, PartialEq)]
pub struct FurnitureDetails {
    pub id: Option<ObjectId>,
    pub furniture_id: ObjectId,
    pub description: String,
    /// Free-form, e.g. "100x50x75 cm".
    pub dimensions: String,
    pub weight: f64,
    pub material_usages: Vec<MaterialUsage>,
}

impl FurnitureDetails {
    pub fn new(
        furniture_id: ObjectId,
        description: impl Into<String>,
        dimensions: impl Into<String>,
        weight: f64,
        material_usages: Vec<MaterialUsage>,
    ) -> Self {
        Self {
            id: None,
            furniture_id,
            description: description.into(),
            dimensions: dimensions.into(),
            weight,
            material_usages,
        }
    }
}

impl Record for FurnitureDetails {
    const COLLECTION: &'static str = "furnitureDetails";
    const SORT_FIELDS: &'static [&'static str] = &["weight"];
    const TEXT_FIELDS: &'static [&'static str] = &[];
    const EXACT_FIELDS: &'static [&'static str] = &["furnitureId"];

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn encode(&self) -> Document {
        let usages: Vec<Bson> = self
            .material_usages
            .iter()
            .map(|usage| Bson::Document(usage.encode()))
            .collect();

        let mut doc = codec::document_with_id(self.id);
        doc.insert("furnitureId", self.furniture_id);
        doc.insert("description", self.description.as_str());
        doc.insert("dimensions", self.dimensions.as_str());
        doc.insert("weight", self.weight);
        doc.insert("materialUsages", usages);
        doc
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            id: codec::read_id(doc)?,
            furniture_id: codec::read_object_id(doc, "furnitureId")?,
            description: codec::read_string(doc, "description")?,
            dimensions: codec::read_string(doc, "dimensions")?,
            weight: codec::read_decimal(doc, "weight")?,
            material_usages: codec::read_nested_list(doc, "materialUsages", MaterialUsage::decode)?,
        })
    }
}

impl fmt::Display for FurnitureDetails {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}, {}kg, {} materials",
            self.dimensions,
            self.weight,
            self.material_usages.len()
        )
    }
}
