//! Checkout
//!
//! Turns the cart and the shopper's contact form into the order payload the
//! backend expects, and clears the cart once the backend has accepted it.
//! Sending the payload is left to an [`OrderSubmitter`].

use std::{
    error::Error as StdError,
    fmt::{Display, Formatter, Result as FmtResult},
};

use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    cart::{Cart, CartLine, CartStore},
    images::ImageResolver,
    prices::{Price, Quantity},
    products::ProductId,
    storage::Persister,
};

/// Country calling code applied to local numbers.
pub const COUNTRY_CODE: &str = "92";

/// Digits in a national number, after the country code.
pub const NATIONAL_DIGITS: usize = 10;

/// Errors raised while checking out.
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// There is nothing to order.
    #[error("cart is empty")]
    EmptyCart,

    /// A required form field was blank.
    #[error("{0} is required")]
    MissingField(&'static str),

    /// A phone field is not a valid number.
    #[error("{0} must have {digits} digits after the country code", digits = NATIONAL_DIGITS)]
    InvalidPhone(&'static str),

    /// The email address is malformed.
    #[error("invalid email address")]
    InvalidEmail,

    /// The backend rejected or never received the order.
    #[error("order submission failed: {0}")]
    Submit(#[source] Box<dyn StdError + Send + Sync + 'static>),
}

/// How the order will be paid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum PaymentMethod {
    /// Cash on delivery, the only method offered.
    #[default]
    #[serde(rename = "COD")]
    CashOnDelivery,
}

/// Contact details as typed into the checkout form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutForm {
    /// Full name.
    pub name: String,

    /// Optional email address.
    pub email: String,

    /// Phone number, any formatting.
    pub phone: String,

    /// WhatsApp number, any formatting.
    pub whatsapp: String,

    /// Delivery address.
    pub address: String,

    /// Payment method.
    pub payment_method: PaymentMethod,
}

/// Validated contact details.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Customer {
    /// Full name.
    pub name: String,

    /// Email address, if given.
    pub email: Option<String>,

    /// Phone number.
    pub phone: PhoneNumber,

    /// WhatsApp number.
    pub whatsapp: PhoneNumber,

    /// Delivery address.
    pub address: String,
}

impl CheckoutForm {
    /// Trim and validate the form.
    ///
    /// # Errors
    ///
    /// - [`CheckoutError::MissingField`]: name, phone, whatsapp or address is blank.
    /// - [`CheckoutError::InvalidPhone`]: a number has the wrong digit count.
    /// - [`CheckoutError::InvalidEmail`]: a non-blank email is malformed.
    pub fn validate(&self) -> Result<Customer, CheckoutError> {
        let name = required("name", &self.name)?;
        let phone = required("phone", &self.phone)?;
        let whatsapp = required("whatsapp", &self.whatsapp)?;
        let address = required("address", &self.address)?;

        let phone = PhoneNumber::parse(phone).ok_or(CheckoutError::InvalidPhone("phone"))?;
        let whatsapp =
            PhoneNumber::parse(whatsapp).ok_or(CheckoutError::InvalidPhone("whatsapp"))?;

        let email = match self.email.trim() {
            "" => None,
            email if is_valid_email(email) => Some(email.to_string()),
            _ => return Err(CheckoutError::InvalidEmail),
        };

        Ok(Customer {
            name: name.to_string(),
            email,
            phone,
            whatsapp,
            address: address.to_string(),
        })
    }
}

fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, CheckoutError> {
    match value.trim() {
        "" => Err(CheckoutError::MissingField(field)),
        value => Ok(value),
    }
}

fn is_valid_email(email: &str) -> bool {
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };

    !local.is_empty()
        && !domain.contains('@')
        && !email.chars().any(char::is_whitespace)
        && domain
            .char_indices()
            .any(|(index, c)| c == '.' && index > 0 && index + 1 < domain.len())
}

/// A phone number in `+<country code><national number>` form.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Normalise a number typed in any local or international format.
    ///
    /// Non-digits are dropped, a trunk `0` is removed (also right after the
    /// country code), and the country code is added when missing. Returns
    /// `None` unless exactly [`NATIONAL_DIGITS`] national digits remain.
    pub fn parse(raw: &str) -> Option<Self> {
        let digits: String = raw.chars().filter(char::is_ascii_digit).collect();

        let without_trunk = if let Some(rest) = digits.strip_prefix("920") {
            format!("{COUNTRY_CODE}{rest}")
        } else if let Some(rest) = digits.strip_prefix('0') {
            rest.to_string()
        } else {
            digits
        };

        let national = if without_trunk.len() == COUNTRY_CODE.len() + NATIONAL_DIGITS {
            without_trunk.strip_prefix(COUNTRY_CODE)?
        } else {
            without_trunk.as_str()
        };

        (national.len() == NATIONAL_DIGITS).then(|| Self(format!("+{COUNTRY_CODE}{national}")))
    }

    /// The normalised number.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

/// One product row of an order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderProduct {
    /// Product id.
    pub product_id: ProductId,

    /// Title captured in the cart.
    pub title: String,

    /// Unit price captured in the cart.
    pub price: Price,

    /// Quantity ordered.
    pub quantity: Quantity,

    /// Absolute image URL.
    pub image: String,

    /// Chosen colour.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Chosen size.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<String>,
}

impl OrderProduct {
    fn from_line(line: &CartLine, resolver: &ImageResolver) -> Self {
        Self {
            product_id: line.product_id().clone(),
            title: line.title().to_string(),
            price: line.unit_price(),
            quantity: line.quantity(),
            image: resolver.resolve(Some(line.image_ref())),
            color: line.variant().color().map(str::to_string),
            size: line.variant().size().map(str::to_string),
        }
    }
}

/// The order payload sent to the backend.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderDraft {
    /// Customer name.
    pub customer_name: String,

    /// Email, empty when not given.
    pub email: String,

    /// Phone number.
    pub phone: PhoneNumber,

    /// WhatsApp number.
    pub whatsapp: PhoneNumber,

    /// Delivery address.
    pub address: String,

    /// Payment method.
    pub payment_method: PaymentMethod,

    /// Ordered products, in cart order.
    pub products: Vec<OrderProduct>,

    /// Cart total.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub total_amount: Decimal,
}

impl OrderDraft {
    /// Package a cart for submission.
    ///
    /// # Errors
    ///
    /// Returns [`CheckoutError::EmptyCart`] if the cart has no lines.
    pub fn build(
        customer: Customer,
        payment_method: PaymentMethod,
        cart: &Cart,
        resolver: &ImageResolver,
    ) -> Result<Self, CheckoutError> {
        if cart.is_empty() {
            return Err(CheckoutError::EmptyCart);
        }

        Ok(Self {
            customer_name: customer.name,
            email: customer.email.unwrap_or_default(),
            phone: customer.phone,
            whatsapp: customer.whatsapp,
            address: customer.address,
            payment_method,
            products: cart
                .lines()
                .iter()
                .map(|line| OrderProduct::from_line(line, resolver))
                .collect(),
            total_amount: cart.total(),
        })
    }
}

/// Sends orders to the backend.
pub trait OrderSubmitter {
    /// Error returned when the backend does not accept the order.
    type Error: StdError + Send + Sync + 'static;

    /// Submit an order. `Ok` means the backend confirmed it.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` if the order was not accepted.
    fn submit(&self, order: &OrderDraft) -> Result<(), Self::Error>;
}

/// Validate, package and submit the cart, clearing it once the order is
/// confirmed. The cart is left untouched when anything fails.
///
/// # Errors
///
/// Returns a [`CheckoutError`] for an empty cart, an invalid form, or a
/// rejected submission.
pub fn place_order<P, S>(
    store: &mut CartStore<P>,
    form: &CheckoutForm,
    resolver: &ImageResolver,
    submitter: &S,
) -> Result<OrderDraft, CheckoutError>
where
    P: Persister,
    S: OrderSubmitter,
{
    if store.is_empty() {
        return Err(CheckoutError::EmptyCart);
    }

    let customer = form.validate()?;
    let order = OrderDraft::build(customer, form.payment_method, store.cart(), resolver)?;

    if let Err(error) = submitter.submit(&order) {
        warn!(%error, "order submission failed");
        return Err(CheckoutError::Submit(Box::new(error)));
    }

    info!(
        lines = order.products.len(),
        total = %order.total_amount,
        "order placed"
    );

    store.clear();

    Ok(order)
}

#[cfg(test)]
mod tests {
    use rust_decimal::dec;
    use testresult::TestResult;

    use crate::{
        cart::NewCartLine,
        products::Variant,
        storage::MemoryStore,
    };

    use super::*;

    fn form() -> CheckoutForm {
        CheckoutForm {
            name: " Ayesha Khan ".to_string(),
            email: "ayesha@example.pk".to_string(),
            phone: "0300-1234567".to_string(),
            whatsapp: "+92 0321 7654321".to_string(),
            address: "House 12, Street 4, Lahore".to_string(),
            payment_method: PaymentMethod::CashOnDelivery,
        }
    }

    #[test]
    fn phone_numbers_normalise() {
        let expected = Some("+923001234567");

        for raw in [
            "03001234567",
            "3001234567",
            "+92 300 1234567",
            "923001234567",
            "+92 0300 1234567",
        ] {
            assert_eq!(
                PhoneNumber::parse(raw).as_ref().map(PhoneNumber::as_str),
                expected,
                "{raw}"
            );
        }
    }

    #[test]
    fn phone_numbers_with_wrong_length_are_rejected() {
        assert_eq!(PhoneNumber::parse("0300123"), None);
        assert_eq!(PhoneNumber::parse("+92 300 12345678"), None);
        assert_eq!(PhoneNumber::parse(""), None);
    }

    #[test]
    fn validate_trims_and_normalises() -> TestResult {
        let customer = form().validate()?;

        assert_eq!(customer.name, "Ayesha Khan");
        assert_eq!(customer.phone.as_str(), "+923001234567");
        assert_eq!(customer.whatsapp.as_str(), "+923217654321");
        assert_eq!(customer.email.as_deref(), Some("ayesha@example.pk"));

        Ok(())
    }

    #[test]
    fn validate_requires_fields() {
        let mut missing_address = form();
        missing_address.address = "   ".to_string();

        assert!(matches!(
            missing_address.validate(),
            Err(CheckoutError::MissingField("address"))
        ));
    }

    #[test]
    fn validate_rejects_short_whatsapp() {
        let mut short = form();
        short.whatsapp = "0321 765".to_string();

        assert!(matches!(
            short.validate(),
            Err(CheckoutError::InvalidPhone("whatsapp"))
        ));
    }

    #[test]
    fn email_is_optional_but_checked() -> TestResult {
        let mut without = form();
        without.email = String::new();

        assert_eq!(without.validate()?.email, None);

        for bad in ["ayesha", "ayesha@pk", "a b@example.pk", "@example.pk", "a@b@c.pk", "a@.pk"] {
            let mut invalid = form();
            invalid.email = bad.to_string();

            assert!(
                matches!(invalid.validate(), Err(CheckoutError::InvalidEmail)),
                "{bad} should be rejected"
            );
        }

        Ok(())
    }

    #[test]
    fn payment_method_serializes_as_cod() -> TestResult {
        assert_eq!(serde_json::to_string(&PaymentMethod::CashOnDelivery)?, "\"COD\"");

        Ok(())
    }

    #[test]
    fn draft_payload_shape() -> TestResult {
        let mut cart = Cart::new();
        cart.add_line(
            NewCartLine::new(ProductId::new("64f0")?, "Shawl", Price::new(dec!(1500))?)
                .with_image("uploads/shawl.jpg")
                .with_variant(Variant::none().with_color("Maroon")),
            Quantity::new(2).ok_or("quantity")?,
        );

        let mut no_email = form();
        no_email.email = String::new();

        let draft = OrderDraft::build(
            no_email.validate()?,
            PaymentMethod::CashOnDelivery,
            &cart,
            &ImageResolver::new("https://api.example.pk"),
        )?;

        assert_eq!(
            serde_json::to_value(&draft)?,
            serde_json::json!({
                "customerName": "Ayesha Khan",
                "email": "",
                "phone": "+923001234567",
                "whatsapp": "+923217654321",
                "address": "House 12, Street 4, Lahore",
                "paymentMethod": "COD",
                "products": [{
                    "productId": "64f0",
                    "title": "Shawl",
                    "price": 1500,
                    "quantity": 2,
                    "image": "https://api.example.pk/uploads/shawl.jpg",
                    "color": "Maroon",
                }],
                "totalAmount": 3000,
            })
        );

        Ok(())
    }

    #[test]
    fn draft_of_empty_cart_errors() -> TestResult {
        let result = OrderDraft::build(
            form().validate()?,
            PaymentMethod::CashOnDelivery,
            &Cart::new(),
            &ImageResolver::new("https://api.example.pk"),
        );

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));

        Ok(())
    }

    #[derive(Debug, Error)]
    #[error("backend unavailable")]
    struct Unavailable;

    struct Rejecting;

    impl OrderSubmitter for Rejecting {
        type Error = Unavailable;

        fn submit(&self, _order: &OrderDraft) -> Result<(), Self::Error> {
            Err(Unavailable)
        }
    }

    struct Accepting;

    impl OrderSubmitter for Accepting {
        type Error = Unavailable;

        fn submit(&self, _order: &OrderDraft) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    fn stocked(store: &MemoryStore) -> TestResult<CartStore<&MemoryStore>> {
        let mut cart = CartStore::open(store);

        cart.add(NewCartLine::new(
            ProductId::new("64f0")?,
            "Shawl",
            Price::new(dec!(1500))?,
        ));

        Ok(cart)
    }

    #[test]
    fn place_order_clears_cart_on_success() -> TestResult {
        let store = MemoryStore::new();
        let mut cart = stocked(&store)?;

        let order = place_order(
            &mut cart,
            &form(),
            &ImageResolver::new("https://api.example.pk"),
            &Accepting,
        )?;

        assert_eq!(order.total_amount, dec!(1500));
        assert!(cart.is_empty());
        assert!(!store.contains("cartItems"));

        Ok(())
    }

    #[test]
    fn place_order_keeps_cart_on_rejection() -> TestResult {
        let store = MemoryStore::new();
        let mut cart = stocked(&store)?;

        let result = place_order(
            &mut cart,
            &form(),
            &ImageResolver::new("https://api.example.pk"),
            &Rejecting,
        );

        assert!(matches!(result, Err(CheckoutError::Submit(_))));
        assert_eq!(cart.len(), 1);
        assert!(store.contains("cartItems"));

        Ok(())
    }

    #[test]
    fn place_order_keeps_cart_on_invalid_form() -> TestResult {
        let store = MemoryStore::new();
        let mut cart = stocked(&store)?;

        let result = place_order(
            &mut cart,
            &CheckoutForm::default(),
            &ImageResolver::new("https://api.example.pk"),
            &Accepting,
        );

        assert!(matches!(result, Err(CheckoutError::MissingField("name"))));
        assert_eq!(cart.len(), 1);

        Ok(())
    }

    #[test]
    fn place_order_with_empty_cart_errors() {
        let store = MemoryStore::new();
        let mut cart = CartStore::open(&store);

        let result = place_order(
            &mut cart,
            &form(),
            &ImageResolver::new("https://api.example.pk"),
            &Accepting,
        );

        assert!(matches!(result, Err(CheckoutError::EmptyCart)));
    }
}
