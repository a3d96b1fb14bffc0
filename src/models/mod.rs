//! Workshop record types and their document codecs.

mod customer;
mod furniture;
mod furniture_details;
mod material;
mod order;

pub use customer::Customer;
pub use furniture::Furniture;
pub use furniture_details::{FurnitureDetails, MaterialUsage};
pub use material::Material;
pub use order::{Order, OrderItem, OrderStatus};
