use std::io::{self, Write};

use clap::Args;
use storefront::{
    cart::CartStore,
    checkout::{CheckoutForm, OrderDraft, OrderSubmitter, PaymentMethod, place_order},
    config::StorefrontConfig,
};
use thiserror::Error;

#[derive(Debug, Args)]
pub(crate) struct CheckoutArgs {
    /// Customer name
    #[arg(long)]
    name: String,

    /// Email address (optional)
    #[arg(long, default_value = "")]
    email: String,

    /// Phone number
    #[arg(long)]
    phone: String,

    /// WhatsApp number
    #[arg(long)]
    whatsapp: String,

    /// Delivery address
    #[arg(long)]
    address: String,
}

#[derive(Debug, Error)]
enum OutboxError {
    #[error("failed to encode order: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write order: {0}")]
    Write(#[from] io::Error),
}

/// Hands the order payload to whatever is reading stdout.
#[derive(Debug)]
struct StdoutOutbox;

impl OrderSubmitter for StdoutOutbox {
    type Error = OutboxError;

    fn submit(&self, order: &OrderDraft) -> Result<(), Self::Error> {
        let payload = serde_json::to_string_pretty(order)?;
        let mut stdout = io::stdout().lock();

        writeln!(stdout, "{payload}")?;
        stdout.flush()?;

        Ok(())
    }
}

pub(crate) fn run(args: CheckoutArgs, config: &StorefrontConfig) -> Result<(), String> {
    let store = config.storage.file_store();
    let mut cart = CartStore::open(&store);

    let form = CheckoutForm {
        name: args.name,
        email: args.email,
        phone: args.phone,
        whatsapp: args.whatsapp,
        address: args.address,
        payment_method: PaymentMethod::CashOnDelivery,
    };

    place_order(
        &mut cart,
        &form,
        &config.shop.image_resolver(),
        &StdoutOutbox,
    )
    .map_err(|error| error.to_string())?;

    Ok(())
}
