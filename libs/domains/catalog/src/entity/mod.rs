//! Sea-ORM entities for the catalog tables.

pub mod brand;
pub mod category;
pub mod collection;
pub mod product;
pub mod product_collection;
