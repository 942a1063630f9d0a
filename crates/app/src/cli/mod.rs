use clap::{Parser, Subcommand};
use larder::pricing::{money, store_currency};
use larder_app::database::{self, Db};

mod cart;
mod coupon;
mod db;
mod loyalty;
mod orders;
mod wallet;

#[derive(Debug, Parser)]
#[command(name = "larder", about = "Larder storefront CLI", long_about = None)]
pub(crate) struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    Cart(cart::CartCommand),
    Coupon(coupon::CouponCommand),
    Loyalty(loyalty::LoyaltyCommand),
    Wallet(wallet::WalletCommand),
    Orders(orders::OrdersCommand),
    Db(db::DbCommand),
}

impl Cli {
    pub(crate) async fn run(self) -> Result<(), String> {
        match self.command {
            Commands::Cart(command) => cart::run(command),
            Commands::Coupon(command) => coupon::run(command).await,
            Commands::Loyalty(command) => loyalty::run(command).await,
            Commands::Wallet(command) => wallet::run(command).await,
            Commands::Orders(command) => orders::run(command).await,
            Commands::Db(command) => db::run(command).await,
        }
    }
}

pub(crate) async fn connect(database_url: &str) -> Result<Db, String> {
    database::connect(database_url)
        .await
        .map(Db::new)
        .map_err(|error| format!("failed to connect to database: {error}"))
}

/// Minor units in the store currency, e.g. `₹1,250.00`.
pub(crate) fn format_amount(minor: u64) -> String {
    money(minor, store_currency()).map_or_else(|_| format!("{minor} (minor units)"), |m| m.to_string())
}
