//! Storefront
//!
//! Client-side core of a small cash-on-delivery shop: the shopping cart and
//! its local snapshot, the admin session, and checkout packaging. The remote
//! product and order APIs are collaborators reached through traits.

pub mod cart;
pub mod checkout;
pub mod config;
pub mod images;
pub mod logging;
pub mod prelude;
pub mod prices;
pub mod products;
pub mod session;
pub mod storage;
