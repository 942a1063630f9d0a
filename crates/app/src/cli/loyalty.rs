use clap::{Args, Subcommand};
use larder_app::domain::loyalty::{LoyaltyService, PgLoyaltyService};
use uuid::Uuid;

use super::{connect, format_amount};

#[derive(Debug, Args)]
pub(crate) struct LoyaltyCommand {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true, global = true)]
    database_url: Option<String>,

    /// Shopper UUID
    #[arg(long, env = "LARDER_USER", global = true)]
    user: Option<Uuid>,

    #[command(subcommand)]
    command: LoyaltySubcommand,
}

#[derive(Debug, Subcommand)]
enum LoyaltySubcommand {
    /// Points, tier and anything still locked in a return window
    Show,

    /// Convert points into wallet balance
    Convert {
        #[arg(long)]
        points: u64,
    },
}

pub(crate) async fn run(command: LoyaltyCommand) -> Result<(), String> {
    let database_url = command
        .database_url
        .ok_or_else(|| "--database-url or DATABASE_URL is required".to_string())?;

    let user = command
        .user
        .ok_or_else(|| "--user or LARDER_USER is required".to_string())?
        .into();

    let loyalty = PgLoyaltyService::new(connect(&database_url).await?);

    match command.command {
        LoyaltySubcommand::Show => {
            let summary = loyalty
                .summary(user)
                .await
                .map_err(|error| format!("failed to load loyalty summary: {error}"))?;

            println!("tier: {}", summary.tier);
            println!("points: {}", summary.points.total_points);
            println!("available: {}", summary.available_points);
            println!("lifetime_earned: {}", summary.points.lifetime_earned);

            match summary.progress.next {
                Some(next) => println!(
                    "progress: {}% ({} points to {next})",
                    summary.progress.percent.round_dp(1),
                    summary.progress.points_to_next
                ),
                None => println!("progress: top tier"),
            }

            for pending in summary.pending {
                println!("pending: {} until {}", pending.points, pending.unlocks_at);
            }
        }
        LoyaltySubcommand::Convert { points } => {
            let receipt = loyalty
                .convert_to_wallet(user, points)
                .await
                .map_err(|error| format!("conversion refused: {error}"))?;

            println!(
                "converted {} points into {}",
                receipt.points,
                format_amount(receipt.amount)
            );
            println!("wallet balance: {}", format_amount(receipt.balance));
        }
    }

    Ok(())
}
