//! Customer records.

use std::fmt;

use mongodb::bson::oid::ObjectId;
use mongodb::bson::Document;

use crate::codec::{self, DecodeError, Record};

/// A workshop customer.
#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Option<ObjectId>,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
}

impl Customer {
    /// A new, not yet inserted customer. Name and email are required.
    pub fn new(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            email: email.into(),
            phone: None,
            address: None,
        }
    }

    pub fn with_phone(mut self, phone: impl Into<String>) -> Self {
        self.phone = Some(phone.into());
        self
    }

    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }
}

impl Record for Customer {
    const COLLECTION: &'static str = "customers";
    const SORT_FIELDS: &'static [&'static str] = &["name", "email"];
    const TEXT_FIELDS: &'static [&'static str] = &["name", "email"];
    const EXACT_FIELDS: &'static [&'static str] = &[];

    fn id(&self) -> Option<ObjectId> {
        self.id
    }

    fn encode(&self) -> Document {
        let mut doc = codec::document_with_id(self.id);
        doc.insert("name", self.name.as_str());
        doc.insert("email", self.email.as_str());
        if let Some(phone) = &self.phone {
            doc.insert("phone", phone.as_str());
        }
        if let Some(address) = &self.address {
            doc.insert("address", address.as_str());
        }
        doc
    }

    fn decode(doc: &Document) -> Result<Self, DecodeError> {
        Ok(Self {
            id: codec::read_id(doc)?,
            name: codec::read_string(doc, "name")?,
            email: codec::read_string(doc, "email")?,
            phone: codec::read_optional_string(doc, "phone")?,
            address: codec::read_optional_string(doc, "address")?,
        })
    }
}

impl fmt::Display for Customer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.email)
    }
}
