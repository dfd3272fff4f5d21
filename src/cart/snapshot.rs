//! Cart snapshots
//!
//! The persisted form of a cart is a JSON array of line objects:
//!
//! ```json
//! [{"productId":"64f0","title":"Shawl","unitPrice":1500,"imageRef":"uploads/shawl.jpg","quantity":2,"color":"Red"}]
//! ```

use crate::cart::CartLine;

/// Serialise lines into a snapshot.
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if serialisation fails.
pub fn encode(lines: &[CartLine]) -> Result<String, serde_json::Error> {
    serde_json::to_string(lines)
}

/// Parse a snapshot back into lines.
///
/// Rows are returned as stored; identity merging happens in
/// [`Cart::from_lines`](crate::cart::Cart::from_lines).
///
/// # Errors
///
/// Returns a [`serde_json::Error`] if the snapshot is not a valid line array.
pub fn decode(snapshot: &str) -> Result<Vec<CartLine>, serde_json::Error> {
    let mut lines: Vec<CartLine> = serde_json::from_str(snapshot)?;

    lines.iter_mut().for_each(CartLine::normalise_variant);

    Ok(lines)
}

#[cfg(test)]
mod tests {
    use rust_decimal::{Decimal, dec};
    use testresult::TestResult;

    use crate::{
        cart::{Cart, NewCartLine},
        prices::{Price, Quantity},
        products::{ProductId, Variant},
    };

    use super::*;

    #[test]
    fn round_trip_is_identity() -> TestResult {
        let mut cart = Cart::new();

        cart.add_line(
            NewCartLine::new(ProductId::new("A")?, "Lawn suit", Price::new(dec!(2499.99))?)
                .with_image("uploads/lawn.jpg")
                .with_variant(Variant::none().with_color("Green").with_size("M")),
            Quantity::new(2).ok_or("quantity")?,
        );
        cart.add(NewCartLine::new(
            ProductId::new("B")?,
            "Dupatta",
            Price::new(dec!(0.5))?,
        ));

        let decoded = decode(&encode(cart.lines())?)?;

        assert_eq!(decoded, cart.lines());

        Ok(())
    }

    #[test]
    fn round_trip_keeps_every_price_digit() -> TestResult {
        let price = Price::new(dec!(1234567890.123456789))?;
        let mut cart = Cart::new();

        cart.add(NewCartLine::new(ProductId::new("A")?, "Bridal lehenga", price));

        let encoded = encode(cart.lines())?;
        let decoded = decode(&encoded)?;

        assert!(
            encoded.contains("\"unitPrice\":1234567890.123456789"),
            "price written in full: {encoded}"
        );
        assert_eq!(decoded, cart.lines());
        assert_eq!(decoded.first().map(CartLine::unit_price), Some(price));

        Ok(())
    }

    #[test]
    fn round_trip_keeps_largest_price() -> TestResult {
        let mut cart = Cart::new();

        cart.add(NewCartLine::new(
            ProductId::new("A")?,
            "Everything",
            Price::new(Decimal::MAX)?,
        ));
        cart.add(NewCartLine::new(
            ProductId::new("B")?,
            "Almost everything",
            Price::new(dec!(7922816251426433759354.395033))?,
        ));

        let decoded = decode(&encode(cart.lines())?)?;

        assert_eq!(decoded, cart.lines());
        assert_eq!(
            decoded.first().map(|line| line.unit_price().amount()),
            Some(Decimal::MAX)
        );

        Ok(())
    }

    #[test]
    fn decode_empty_array() -> TestResult {
        assert!(decode("[]")?.is_empty());

        Ok(())
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode("{not json").is_err(), "garbage must not decode");
        assert!(decode("{}").is_err(), "objects are not line arrays");
    }

    #[test]
    fn decode_rejects_zero_quantity() {
        let snapshot = r#"[{"productId":"A","title":"x","unitPrice":1,"imageRef":"","quantity":0}]"#;

        assert!(decode(snapshot).is_err(), "zero quantity rows are invalid");
    }

    #[test]
    fn decode_normalises_blank_variant_fields() -> TestResult {
        let snapshot =
            r#"[{"productId":"A","title":"x","unitPrice":1,"imageRef":"","quantity":1,"color":" "}]"#;

        let lines = decode(snapshot)?;

        assert!(lines.first().ok_or("line")?.variant().is_empty());

        Ok(())
    }
}
