use clap::{Args, Subcommand};
use larder_app::domain::coupons::{CouponsService, PgCouponsService};
use uuid::Uuid;

use super::{connect, format_amount};

#[derive(Debug, Args)]
pub(crate) struct CouponCommand {
    #[command(subcommand)]
    command: CouponSubcommand,
}

#[derive(Debug, Subcommand)]
enum CouponSubcommand {
    /// Check a coupon code against an order total without redeeming it
    Apply(ApplyArgs),
}

#[derive(Debug, Args)]
struct ApplyArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Shopper UUID
    #[arg(long, env = "LARDER_USER")]
    user: Uuid,

    /// Coupon code, matched case-insensitively
    #[arg(long)]
    code: String,

    /// Order total in minor units
    #[arg(long)]
    total: u64,
}

pub(crate) async fn run(command: CouponCommand) -> Result<(), String> {
    match command.command {
        CouponSubcommand::Apply(args) => {
            let coupons = PgCouponsService::new(connect(&args.database_url).await?);

            let applied = coupons
                .apply_coupon(args.user.into(), args.code, args.total)
                .await
                .map_err(|error| format!("coupon not applied: {error}"))?;

            println!("coupon: {}", applied.code);
            println!("discount: {}", format_amount(applied.discount));
            println!(
                "payable: {}",
                format_amount(args.total.saturating_sub(applied.discount))
            );

            Ok(())
        }
    }
}
