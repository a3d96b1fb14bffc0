//! Operations spanning more than one repository.

pub mod search;

pub use search::{details_by_furniture, orders_by_customer};
