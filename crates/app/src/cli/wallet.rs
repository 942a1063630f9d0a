use std::sync::Arc;

use clap::{Args, Subcommand};
use larder::{pricing::store_currency, wallet::PaymentMethod};
use larder_app::domain::wallet::{PgWalletService, TopUpFlow, TopUpStatus, WalletService};
use uuid::Uuid;

use super::{connect, format_amount};

#[derive(Debug, Args)]
pub(crate) struct WalletCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    /// Shopper UUID
    #[arg(long, env = "LARDER_USER", global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: WalletSubcommand,
}

#[derive(Debug, Subcommand)]
enum WalletSubcommand {
    /// Balance and the most recent transactions
    Show,

    /// Add funds through the simulated payment; Ctrl-C cancels it
    Add {
        /// Amount in minor units
        #[arg(long)]
        amount: u64,

        /// upi, card or net_banking
        #[arg(long, default_value = "upi")]
        method: PaymentMethod,
    },
}

pub(crate) async fn run(command: WalletCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let user = command
        .user
        .ok_or_else(|| "--user or LARDER_USER is required".to_string())?
        .into();

    let wallet = Arc::new(PgWalletService::new(connect(&database_url).await?));

    match command.command {
        WalletSubcommand::Show => {
            let view = wallet
                .wallet(user)
                .await
                .map_err(|error| format!("failed to load wallet: {error}"))?;

            println!("balance: {}", format_amount(view.balance));

            for transaction in view.recent {
                println!(
                    "{} {} {} {}",
                    transaction.created_at,
                    transaction.direction,
                    format_amount(transaction.amount),
                    transaction.description
                );
            }
        }
        WalletSubcommand::Add { amount, method } => {
            let flow = TopUpFlow::new(wallet, user, store_currency())
                .map_err(|error| format!("failed to open top-up: {error}"))?;

            flow.submit_amount(amount)
                .map_err(|error| format!("amount refused: {error}"))?;

            let mut payment = flow
                .pay(method)
                .map_err(|error| format!("failed to start payment: {error}"))?;

            println!("processing {} via {method}...", format_amount(amount));

            let applied = tokio::select! {
                joined = &mut payment => joined.map_err(|error| format!("payment task failed: {error}"))?,
                _ = tokio::signal::ctrl_c() => {
                    flow.dismiss();

                    payment.await.map_err(|error| format!("payment task failed: {error}"))?
                }
            };

            match flow.status() {
                TopUpStatus::Completed(_) if applied => {
                    let balance = flow.balance().unwrap_or_default();
                    println!("added {}; balance {}", format_amount(amount), format_amount(balance));
                }
                TopUpStatus::Failed(message) => return Err(message),
                _ => println!("payment cancelled"),
            }
        }
    }

    Ok(())
}
