//! Currency amounts
//!
//! Prices are held as integer cents so totals stay exact. On the wire a
//! price is a plain JSON number (`79.99`, `18.5`, `199`), while cart totals
//! are rendered as strings with exactly two decimals.

use serde::{Serialize, Serializer};
use std::fmt;

/// A non-negative amount in cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price(u64);

impl Price {
    pub const fn from_cents(cents: u64) -> Self {
        Self(cents)
    }

    /// Total for `quantity` units, saturating instead of wrapping
    pub const fn times(self, quantity: u64) -> Self {
        Self(self.0.saturating_mul(quantity))
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:02}", self.0 / 100, self.0 % 100)
    }
}

impl Serialize for Price {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.0 % 100 == 0 {
            serializer.serialize_u64(self.0 / 100)
        } else {
            #[allow(clippy::cast_precision_loss)]
            let amount = self.0 as f64 / 100.0;
            serializer.serialize_f64(amount)
        }
    }
}
