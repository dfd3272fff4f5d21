//! Cart tables

use rusty_money::iso::Currency;
use tabled::{
    builder::Builder,
    settings::{Alignment, Style, object::Columns},
};

use crate::{
    cart::Cart,
    prices::{PriceError, to_money},
};

/// Render the cart as a table followed by the item count and total.
///
/// # Errors
///
/// Returns [`PriceError::OutOfRange`] if an amount cannot be expressed in
/// `currency`.
pub fn render(cart: &Cart, currency: &'static Currency) -> Result<String, PriceError> {
    let mut builder = Builder::default();

    builder.push_record(["#", "Product", "Variant", "Price", "Qty", "Amount"].map(String::from));

    for (index, line) in cart.lines().iter().enumerate() {
        builder.push_record([
            format!("{}", index + 1),
            format!("{} ({})", line.title(), line.product_id()),
            line.variant().to_string(),
            to_money(line.unit_price().amount(), currency)?.to_string(),
            line.quantity().to_string(),
            to_money(line.line_total(), currency)?.to_string(),
        ]);
    }

    let mut table = builder.build();

    table.with(Style::modern_rounded());
    table.modify(Columns::new(3..6), Alignment::right());

    let total = cart.total_money(currency)?;

    Ok(format!(
        "{table}\nItems: {}\nTotal: {total}",
        cart.item_count()
    ))
}
