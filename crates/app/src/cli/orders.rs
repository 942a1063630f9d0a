use std::sync::Arc;

use clap::{Args, Subcommand};
use larder_app::domain::orders::{
    Notification, NotificationSink, OrderEvents, OrderNotifier, PgOrderEvents, TracingSink,
};
use larder_app::database;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

#[derive(Debug, Args)]
pub(crate) struct OrdersCommand {
    #[command(subcommand)]
    command: OrdersSubcommand,
}

#[derive(Debug, Subcommand)]
enum OrdersSubcommand {
    /// Print a notification for every change to the shopper's orders until Ctrl-C
    Watch(WatchArgs),
}

#[derive(Debug, Args)]
struct WatchArgs {
    /// PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,

    /// Shopper UUID
    #[arg(long, env = "LARDER_USER")]
    user: Uuid,
}

struct StdoutSink;

impl NotificationSink for StdoutSink {
    fn notify(&self, notification: &Notification) {
        println!("{}: {}", notification.title, notification.body);
    }
}

pub(crate) async fn run(command: OrdersCommand) -> Result<(), String> {
    match command.command {
        OrdersSubcommand::Watch(args) => {
            let pool = database::connect(&args.database_url)
                .await
                .map_err(|error| format!("failed to connect to database: {error}"))?;

            let subscription = PgOrderEvents::new(pool)
                .subscribe(args.user.into())
                .await
                .map_err(|error| format!("failed to subscribe to order changes: {error}"))?;

            let sinks: Vec<Arc<dyn NotificationSink>> = vec![Arc::new(TracingSink), Arc::new(StdoutSink)];
            let notifier = OrderNotifier::new(Arc::new(sinks));

            let cancel = CancellationToken::new();
            let on_interrupt = cancel.clone();

            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    on_interrupt.cancel();
                }
            });

            println!("watching orders for {}; Ctrl-C to stop", args.user);

            let delivered = notifier.run(subscription, cancel).await;

            println!("{delivered} notifications delivered");

            Ok(())
        }
    }
}
