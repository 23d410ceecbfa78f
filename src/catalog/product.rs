//! Product entity and the seeded catalog

use super::price::Price;
use serde::Serialize;

/// A catalog entry. Entries are never mutated; `stock` is informational
/// only and is not reserved by cart operations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Product {
    pub id: u64,
    pub name: &'static str,
    pub price: Price,
    pub category: &'static str,
    pub stock: u32,
}

impl Product {
    const fn new(
        id: u64,
        name: &'static str,
        price_cents: u64,
        category: &'static str,
        stock: u32,
    ) -> Self {
        Self {
            id,
            name,
            price: Price::from_cents(price_cents),
            category,
            stock,
        }
    }
}

/// The process-wide catalog, in listing order
pub static CATALOG: [Product; 5] = [
    Product::new(1, "Wireless Headphones", 7999, "electronics", 142),
    Product::new(2, "Running Shoes", 12995, "footwear", 58),
    Product::new(3, "Organic Coffee Beans", 1850, "grocery", 300),
    Product::new(4, "Leather Backpack", 19900, "accessories", 23),
    Product::new(5, "Yoga Mat", 3499, "fitness", 87),
];
