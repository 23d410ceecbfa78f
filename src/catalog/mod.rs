//! Product catalog module
//!
//! A fixed, read-only list of products. Lookups are linear scans that
//! preserve catalog order.

mod price;
mod product;

pub use price::Price;
pub use product::{Product, CATALOG};

/// All products in catalog order
pub fn all() -> &'static [Product] {
    &CATALOG
}

/// Find a product by exact id
pub fn find_by_id(id: u64) -> Option<&'static Product> {
    CATALOG.iter().find(|p| p.id == id)
}

/// Products whose category equals `category` exactly (case-sensitive)
pub fn by_category(category: &str) -> Vec<&'static Product> {
    CATALOG.iter().filter(|p| p.category == category).collect()
}
