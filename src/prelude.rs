//! Storefront prelude.
//!
//! Convenience exports for common library consumers.

pub use crate::{
    cart::{Cart, CartLine, CartStore, LineKey, NewCartLine},
    checkout::{
        CheckoutError, CheckoutForm, Customer, OrderDraft, OrderProduct, OrderSubmitter,
        PaymentMethod, PhoneNumber, place_order,
    },
    images::ImageResolver,
    prices::{Price, PriceError, Quantity},
    products::{ProductId, ProductIdError, Variant},
    session::{Access, AccessError, AuthToken, Role, Session, SessionError, SessionUser},
    storage::{FileStore, MemoryStore, Persister, StorageError},
};
