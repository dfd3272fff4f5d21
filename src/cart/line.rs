//! Cart lines

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::{
    prices::{Price, Quantity},
    products::{ProductId, Variant},
};

/// Identity of a cart line: the product plus the chosen variant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LineKey {
    /// Product being bought.
    pub product_id: ProductId,

    /// Variant attributes, compared exactly.
    pub variant: Variant,
}

impl LineKey {
    /// Key for a product with no variant attributes.
    pub fn product(product_id: ProductId) -> Self {
        Self {
            product_id,
            variant: Variant::none(),
        }
    }

    /// Key for a product variant.
    pub fn new(product_id: ProductId, variant: Variant) -> Self {
        Self {
            product_id,
            variant,
        }
    }
}

/// Product data captured when a shopper adds something to the cart.
///
/// Title, price and image are a snapshot; they are not re-synced with the
/// catalog afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCartLine {
    /// Product being added.
    pub product_id: ProductId,

    /// Display name.
    pub title: String,

    /// Unit price at add time.
    pub unit_price: Price,

    /// Image URL or backend-relative path.
    pub image_ref: String,

    /// Variant attributes.
    pub variant: Variant,
}

impl NewCartLine {
    /// New line data with no image and no variant.
    pub fn new(product_id: ProductId, title: impl Into<String>, unit_price: Price) -> Self {
        Self {
            product_id,
            title: title.into(),
            unit_price,
            image_ref: String::new(),
            variant: Variant::none(),
        }
    }

    /// Set the image reference.
    #[must_use]
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = image_ref.into();
        self
    }

    /// Set the variant.
    #[must_use]
    pub fn with_variant(mut self, variant: Variant) -> Self {
        self.variant = variant;
        self
    }

    /// Identity this line would have once added.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.variant.clone())
    }
}

/// One row in the cart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    #[serde(alias = "id", alias = "_id")]
    product_id: ProductId,

    title: String,

    #[serde(alias = "price")]
    unit_price: Price,

    #[serde(default, alias = "image")]
    image_ref: String,

    quantity: Quantity,

    #[serde(flatten)]
    variant: Variant,
}

impl CartLine {
    pub(crate) fn new(item: NewCartLine, quantity: Quantity) -> Self {
        Self {
            product_id: item.product_id,
            title: item.title,
            unit_price: item.unit_price,
            image_ref: item.image_ref,
            quantity,
            variant: item.variant,
        }
    }

    /// Product id.
    pub fn product_id(&self) -> &ProductId {
        &self.product_id
    }

    /// Display name captured at add time.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Unit price captured at add time.
    pub fn unit_price(&self) -> Price {
        self.unit_price
    }

    /// Image URL or path.
    pub fn image_ref(&self) -> &str {
        &self.image_ref
    }

    /// Quantity, always at least one.
    pub fn quantity(&self) -> Quantity {
        self.quantity
    }

    /// Variant attributes.
    pub fn variant(&self) -> &Variant {
        &self.variant
    }

    /// Identity of this line.
    pub fn key(&self) -> LineKey {
        LineKey::new(self.product_id.clone(), self.variant.clone())
    }

    /// `unit_price * quantity`.
    pub fn line_total(&self) -> Decimal {
        self.unit_price.times(self.quantity)
    }

    pub(crate) fn is(&self, product_id: &ProductId, variant: &Variant) -> bool {
        self.product_id == *product_id && self.variant == *variant
    }

    pub(crate) fn matches(&self, key: &LineKey) -> bool {
        self.is(&key.product_id, &key.variant)
    }

    pub(crate) fn set_quantity(&mut self, quantity: Quantity) {
        self.quantity = quantity;
    }

    pub(crate) fn add_quantity(&mut self, quantity: Quantity) -> Quantity {
        self.quantity = self.quantity.saturating_add(quantity);
        self.quantity
    }

    pub(crate) fn normalise_variant(&mut self) {
        self.variant = std::mem::take(&mut self.variant).normalised();
    }
}
