//! Persisted cart store

use rust_decimal::Decimal;
use rusty_money::{Money, iso::Currency};
use tracing::{debug, warn};

use crate::{
    cart::{Cart, CartLine, LineKey, NewCartLine, snapshot},
    prices::{PriceError, Quantity},
    storage::Persister,
};

/// A [`Cart`] mirrored to a storage slot.
///
/// The slot is read once when the store is opened and rewritten after every
/// mutation. Storage faults never reach the caller: a cart that cannot be read
/// starts empty and a snapshot that cannot be written is logged and skipped,
/// leaving the in-memory cart authoritative.
#[derive(Debug)]
pub struct CartStore<P> {
    cart: Cart,
    persister: P,
    slot: String,
}

impl<P: Persister> CartStore<P> {
    /// Slot used by [`CartStore::open`].
    pub const DEFAULT_SLOT: &'static str = "cartItems";

    /// Open the cart kept in the default slot.
    pub fn open(persister: P) -> Self {
        Self::open_slot(persister, Self::DEFAULT_SLOT)
    }

    /// Open the cart kept in `slot`.
    pub fn open_slot(persister: P, slot: impl Into<String>) -> Self {
        let slot = slot.into();
        let cart = load(&persister, &slot);

        debug!(
            slot = %slot,
            lines = cart.len(),
            items = cart.item_count(),
            "opened cart"
        );

        Self {
            cart,
            persister,
            slot,
        }
    }

    /// Add `quantity` of an item, merging into an existing line with the same
    /// identity. Returns the resulting line quantity.
    pub fn add_line(&mut self, item: NewCartLine, quantity: Quantity) -> Quantity {
        let product_id = item.product_id.clone();
        let result = self.cart.add_line(item, quantity);

        debug!(%product_id, added = quantity.get(), quantity = result.get(), "added to cart");

        self.persist();

        result
    }

    /// Add a single unit of an item.
    pub fn add(&mut self, item: NewCartLine) -> Quantity {
        self.add_line(item, Quantity::ONE)
    }

    /// Remove a line. Absent lines are ignored.
    pub fn remove_line(&mut self, key: &LineKey) -> Option<CartLine> {
        let removed = self.cart.remove_line(key);

        debug!(
            product_id = %key.product_id,
            removed = removed.is_some(),
            "removed from cart"
        );

        self.persist();

        removed
    }

    /// Set a line's quantity; zero or below removes it.
    ///
    /// Returns `false` when no line has the given identity.
    pub fn set_quantity(&mut self, key: &LineKey, quantity: i64) -> bool {
        let matched = self.cart.set_quantity(key, quantity);

        debug!(product_id = %key.product_id, quantity, matched, "set cart quantity");

        self.persist();

        matched
    }

    /// Empty the cart and delete its slot.
    pub fn clear(&mut self) {
        self.cart.clear();

        if let Err(error) = self.persister.delete(&self.slot) {
            warn!(slot = %self.slot, %error, "failed to delete cart snapshot");
        }

        debug!(slot = %self.slot, "cleared cart");
    }

    /// Sum of `unit_price * quantity`; zero when empty.
    pub fn total(&self) -> Decimal {
        self.cart.total()
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
        self.cart.total_money(currency)
    }

    /// Lines in insertion order.
    pub fn lines(&self) -> &[CartLine] {
        self.cart.lines()
    }

    /// The line with the given identity.
    pub fn get(&self, key: &LineKey) -> Option<&CartLine> {
        self.cart.get(key)
    }

    /// Total number of units.
    pub fn item_count(&self) -> u64 {
        self.cart.item_count()
    }

    /// Number of distinct lines.
    pub fn len(&self) -> usize {
        self.cart.len()
    }

    /// Whether the cart is empty.
    pub fn is_empty(&self) -> bool {
        self.cart.is_empty()
    }

    /// The underlying cart.
    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Slot this store writes to.
    pub fn slot(&self) -> &str {
        &self.slot
    }

    /// The storage backend.
    pub fn persister(&self) -> &P {
        &self.persister
    }

    fn persist(&self) {
        let encoded = match snapshot::encode(self.cart.lines()) {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!(slot = %self.slot, %error, "failed to encode cart snapshot");
                return;
            }
        };

        if let Err(error) = self.persister.put(&self.slot, &encoded) {
            warn!(slot = %self.slot, %error, "failed to write cart snapshot");
        }
    }
}

fn load<P: Persister>(persister: &P, slot: &str) -> Cart {
    let stored = match persister.get(slot) {
        Ok(Some(stored)) => stored,
        Ok(None) => return Cart::new(),
        Err(error) => {
            warn!(slot, %error, "failed to read cart snapshot, starting empty");
            return Cart::new();
        }
    };

    match snapshot::decode(&stored) {
        Ok(lines) => Cart::from_lines(lines),
        Err(error) => {
            warn!(slot, %error, "discarding corrupt cart snapshot");
            Cart::new()
        }
    }
}
