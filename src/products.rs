//! Products
//!
//! The cart only holds references to products owned by the backend, so a
//! product is reduced here to its opaque identifier plus the optional variant
//! attributes a shopper picked.

use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when constructing a [`ProductId`].
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ProductIdError {
    /// The identifier was empty or only whitespace.
    #[error("product id cannot be empty")]
    Empty,
}

/// Opaque product identifier assigned by the backend.
///
/// Never empty; the cart does not check that the product exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ProductId(String);

impl ProductId {
    /// Create a product id, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ProductIdError::Empty`] if nothing is left after trimming.
    pub fn new(id: impl AsRef<str>) -> Result<Self, ProductIdError> {
        let id = id.as_ref().trim();

        if id.is_empty() {
            return Err(ProductIdError::Empty);
        }

        Ok(Self(id.to_string()))
    }

    /// Borrow the identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ProductId {
    type Err = ProductIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for ProductId {
    type Error = ProductIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<ProductId> for String {
    fn from(id: ProductId) -> Self {
        id.0
    }
}

impl Display for ProductId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Free-form variant attributes chosen for a product.
///
/// Both attributes take part in line identity: absent only matches absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Variant {
    /// Colour, if the product comes in several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    color: Option<String>,

    /// Size, if the product comes in several.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    size: Option<String>,
}

impl Variant {
    /// A variant with no attributes.
    pub fn none() -> Self {
        Self::default()
    }

    /// Set the colour. Blank values clear it.
    #[must_use]
    pub fn with_color(mut self, color: impl AsRef<str>) -> Self {
        self.color = normalise(color.as_ref());
        self
    }

    /// Set the size. Blank values clear it.
    #[must_use]
    pub fn with_size(mut self, size: impl AsRef<str>) -> Self {
        self.size = normalise(size.as_ref());
        self
    }

    /// The colour, if any.
    pub fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    /// The size, if any.
    pub fn size(&self) -> Option<&str> {
        self.size.as_deref()
    }

    /// Whether no attribute is set.
    pub fn is_empty(&self) -> bool {
        self.color.is_none() && self.size.is_none()
    }

    /// Re-apply blank-value normalisation, used after deserialisation.
    pub(crate) fn normalised(self) -> Self {
        Self {
            color: self.color.as_deref().and_then(normalise),
            size: self.size.as_deref().and_then(normalise),
        }
    }
}

impl Display for Variant {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match (self.color(), self.size()) {
            (Some(color), Some(size)) => write!(f, "{color} / {size}"),
            (Some(value), None) | (None, Some(value)) => f.write_str(value),
            (None, None) => Ok(()),
        }
    }
}

fn normalise(value: &str) -> Option<String> {
    let value = value.trim();

    (!value.is_empty()).then(|| value.to_string())
}
