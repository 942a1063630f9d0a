use std::path::PathBuf;

use clap::{Args, Subcommand};
use jiff::civil::Date;
use larder::{
    cart::{CartStore, FileCartStorage, NewCartItem, ScheduledDelivery},
    checkout::order_lines,
    pricing::store_currency,
};
use uuid::Uuid;

use super::format_amount;

#[derive(Debug, Args)]
pub(crate) struct CartCommand {
    /// Where the cart is saved between runs
    #[arg(long, env = "LARDER_CART_FILE", default_value = "larder-cart.json")]
    cart_file: PathBuf,

    #[command(subcommand)]
    command: CartSubcommand,
}

#[derive(Debug, Subcommand)]
enum CartSubcommand {
    /// Add one unit of a product
    Add(AddArgs),

    /// Remove a line
    Remove(LineArgs),

    /// Set the quantity of a line; zero or below removes it
    Qty(QuantityArgs),

    /// Set the order note, or clear it when no text is given
    Note {
        text: Option<String>,
    },

    /// Schedule a delivery slot
    Schedule(ScheduleArgs),

    /// Print the cart
    Show,

    /// Empty the cart, note and delivery slot included
    Clear,
}

#[derive(Debug, Args)]
struct AddArgs {
    #[arg(long)]
    product: Uuid,

    #[arg(long)]
    variant: Option<Uuid>,

    #[arg(long)]
    name: String,

    #[arg(long)]
    variant_name: Option<String>,

    /// Unit price in minor units
    #[arg(long)]
    price: u64,

    #[arg(long)]
    image: Option<String>,
}

#[derive(Debug, Args)]
struct LineArgs {
    #[arg(long)]
    product: Uuid,

    #[arg(long)]
    variant: Option<Uuid>,
}

#[derive(Debug, Args)]
struct QuantityArgs {
    #[command(flatten)]
    line: LineArgs,

    #[arg(long, allow_hyphen_values = true)]
    quantity: i64,
}

#[derive(Debug, Args)]
struct ScheduleArgs {
    /// Delivery date, e.g. 2026-10-20
    #[arg(long, required_unless_present = "clear", requires = "slot")]
    date: Option<Date>,

    /// Time slot label, e.g. 09:00-12:00
    #[arg(long)]
    slot: Option<String>,

    #[arg(long, conflicts_with_all = ["date", "slot"])]
    clear: bool,
}

pub(crate) fn run(command: CartCommand) -> Result<(), String> {
    let mut store = CartStore::open(FileCartStorage::new(command.cart_file), store_currency());

    match command.command {
        CartSubcommand::Add(args) => store.add_item(NewCartItem {
            product_id: args.product,
            variant_id: args.variant,
            name: args.name,
            variant_name: args.variant_name,
            unit_price: args.price,
            image: args.image,
        }),
        CartSubcommand::Remove(line) => store.remove_item(line.product, line.variant),
        CartSubcommand::Qty(args) => {
            store.update_quantity(args.line.product, args.quantity, args.line.variant);
        }
        CartSubcommand::Note { text } => store.set_note(text),
        CartSubcommand::Schedule(args) => {
            let delivery = match (args.date, args.slot) {
                (Some(date), Some(slot)) if !args.clear => Some(ScheduledDelivery { date, slot }),
                _ => None,
            };

            store.set_scheduled_delivery(delivery);
        }
        CartSubcommand::Show => {}
        CartSubcommand::Clear => store.clear(),
    }

    print_cart(&store)
}

fn print_cart(store: &CartStore<FileCartStorage>) -> Result<(), String> {
    let cart = store.cart();

    if cart.is_empty() {
        println!("cart is empty");
    }

    let lines = order_lines(cart).map_err(|error| format!("failed to price cart: {error}"))?;

    for line in lines {
        println!(
            "{} x{} @ {} = {}",
            line.description,
            line.quantity,
            format_amount(line.unit_price),
            format_amount(line.line_total)
        );
    }

    let total = cart
        .total_price()
        .map_err(|error| format!("failed to price cart: {error}"))?;

    println!("items: {}", cart.total_items());
    println!("total: {total}");

    if let Some(note) = cart.note() {
        println!("note: {note}");
    }

    if let Some(delivery) = cart.scheduled_delivery() {
        println!("delivery: {} {}", delivery.date, delivery.slot);
    }

    Ok(())
}
