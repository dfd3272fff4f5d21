//! Cart
//!
//! [`Cart`] is the in-memory line collection and all of its bookkeeping.
//! [`CartStore`] wraps a cart together with the storage slot it is mirrored
//! to, writing a fresh snapshot after every mutation.

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};

use crate::prices::{PriceError, Quantity, to_money};

mod line;
pub mod snapshot;
mod store;
pub mod table;

pub use line::{CartLine, LineKey, NewCartLine};
pub use store::CartStore;

/// Ordered collection of cart lines.
///
/// Lines keep insertion order and no two lines share a [`LineKey`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// Create an empty cart.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a cart from stored lines, merging rows that share an identity.
    pub fn from_lines(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut cart = Self::new();

        for line in lines {
            match cart
                .lines
                .iter_mut()
                .find(|existing| existing.is(line.product_id(), line.variant()))
            {
                Some(existing) => {
                    existing.add_quantity(line.quantity());
                }
                None => cart.lines.push(line),
            }
        }

        cart
    }

    /// Add `quantity` of an item, returning the resulting line quantity.
    ///
    /// A line with the same identity has its quantity increased; otherwise a
    /// new line is appended.
    pub fn add_line(&mut self, item: NewCartLine, quantity: Quantity) -> Quantity {
        if let Some(line) = self
            .lines
            .iter_mut()
            .find(|line| line.is(&item.product_id, &item.variant))
        {
            return line.add_quantity(quantity);
        }

        self.lines.push(CartLine::new(item, quantity));

        quantity
    }

    /// Add a single unit of an item.
    pub fn add(&mut self, item: NewCartLine) -> Quantity {
        self.add_line(item, Quantity::ONE)
    }

    /// Remove the line with the given identity, if present.
    pub fn remove_line(&mut self, key: &LineKey) -> Option<CartLine> {
        let index = self.lines.iter().position(|line| line.matches(key))?;

        Some(self.lines.remove(index))
    }

    /// Set a line's quantity. Zero or below removes the line.
    ///
    /// Returns `false` when no line has the given identity.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        match Quantity::from_signed(quantity) {
            Some(quantity) => match self.lines.iter_mut().find(|line| line.matches(key)) {
                Some(line) => {
                    line.set_quantity(quantity);
                    true
                }
                None => false,
            },
            None => self.remove_line(key).is_some(),
        }
    }

    /// Remove every line.
    pub fn clear(&mut self) {
        self.lines.clear();
    }

    /// Sum of `unit_price * quantity` over all lines; zero when empty.
    pub fn total(&self) -> Decimal {
        self.lines
            .iter()
            .map(CartLine::line_total)
            .fold(Decimal::ZERO, Decimal::saturating_add)
    }

    /// The total as money in `currency`.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::OutOfRange`] if the total does not fit the
    /// currency's minor units.
    pub fn total_money(
        &self,
        currency: &'static Currency,
    ) -> Result<Money<'static, Currency>, PriceError> {
        to_money(self.total(), currency)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    /// The line with the given identity.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.matches(key))
    }

    /// Total number of units across all lines.
    pub fn item_count(&self) -> u64 {
        self.lines
            .iter()
            .map(|line| u64::from(line.quantity().get()))
            .sum()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether the cart has no lines.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }
}
