use std::num::NonZeroU32;

use clap::{Args, Subcommand};
use rust_decimal::Decimal;
use storefront::{
    cart::{CartStore, LineKey, NewCartLine, table},
    config::StorefrontConfig,
    prices::{Price, Quantity},
    products::{ProductId, Variant},
};

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add a product, merging with an existing line
    Add(AddArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Set a line's quantity; zero or below removes it
    Set(SetArgs),

    /// Empty the cart
    Clear,

    /// Print the cart and its total
    Show,
}

#[derive(Debug, Args)]
struct LineArgs {
    /// Product id
    #[arg(long)]
    id: ProductId,

    /// Variant colour
    #[arg(long)]
    color: Option<String>,

    /// Variant size
    #[arg(long)]
    size: Option<String>,
}

impl LineArgs {
    fn variant(&self) -> Variant {
        let variant = Variant::none();
        let variant = match &self.color {
            Some(color) => variant.with_color(color),
            None => variant,
        };

        match &self.size {
            Some(size) => variant.with_size(size),
            None => variant,
        }
    }

    fn key(&self) -> LineKey {
        LineKey::new(self.id.clone(), self.variant())
    }
}

#[derive(Debug, Args)]
struct AddArgs {
    #[command(flatten)]
    line: LineArgs,

    /// Product title
    #[arg(long)]
    title: String,

    /// Unit price in major units
    #[arg(long)]
    price: Decimal,

    /// Image URL or backend-relative path
    #[arg(long, default_value = "")]
    image: String,

    /// Units to add
    #[arg(long, default_value = "1")]
    quantity: NonZeroU32,
}

#[derive(Debug, Args)]
struct SetArgs {
    #[command(flatten)]
    line: LineArgs,

    /// New quantity
    #[arg(long, allow_hyphen_values = true)]
    quantity: i64,
}

pub(crate) fn run(command: CartCommand, config: &StorefrontConfig) -> Result<(), String> {
    let store = config.storage.file_store();
    let mut cart = CartStore::open(&store);

    match command.command {
        CartSubcommand::Add(args) => {
            let price = Price::new(args.price).map_err(|error| error.to_string())?;
            let item = NewCartLine::new(args.line.id.clone(), args.title, price)
                .with_image(args.image)
                .with_variant(args.line.variant());

            let quantity = cart.add_line(item, Quantity::from(args.quantity));

            println!("{} now x{quantity}", args.line.id);
        }
        CartSubcommand::Remove(args) => match cart.remove_line(&args.key()) {
            Some(line) => println!("removed {}", line.title()),
            None => println!("{} is not in the cart", args.id),
        },
        CartSubcommand::Set(args) => {
            if !cart.set_quantity(&args.line.key(), args.quantity) {
                println!("{} is not in the cart", args.line.id);
            }
        }
        CartSubcommand::Clear => {
            cart.clear();

            println!("cart cleared");
        }
        CartSubcommand::Show => {
            if cart.is_empty() {
                println!("Your cart is empty");
                return Ok(());
            }

            let currency = config.shop.currency().map_err(|error| error.to_string())?;
            let rendered = table::render(cart.cart(), currency)
                .map_err(|error| format!("failed to render cart: {error}"))?;

            println!("{rendered}");
        }
    }

    Ok(())
}
