use clap::{Parser, Subcommand};
use storefront::config::StorefrontConfig;

mod cart;
mod checkout;
mod session;

#[derive(Debug, Parser)]
#[command(name = "storefront", about = "Storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(flatten)]
    pub(crate) config: StorefrontConfig,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Inspect and edit the cart
    Cart(cart::CartCommand),

    /// Sign in and out of the back office
    Session(session::SessionCommand),

    /// Place a cash-on-delivery order for the cart
    Checkout(checkout::CheckoutArgs),
}

impl Cli {
    pub(crate) fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command, &self.config),
            Commands::Session(command) => session::run(command, &self.config),
            Commands::Checkout(args) => checkout::run(args, &self.config),
        }
    }
}
