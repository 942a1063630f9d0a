use clap::{Args, Subcommand};
use larder_app::database;

#[derive(Debug, Args)]
pub(crate) struct DbCommand {
    #[command(subcommand)]
    command: DbSubcommand,
}

#[derive(Debug, Subcommand)]
enum DbSubcommand {
    /// Apply pending schema migrations
    Migrate(MigrateArgs),
}

#[derive(Debug, Args)]
struct MigrateArgs {
    /// Administrative PostgreSQL connection string
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    database_url: String,
}

pub(crate) async fn run(command: DbCommand) -> Result<(), String> {
    match command.command {
        DbSubcommand::Migrate(args) => {
            let pool = database::connect(&args.database_url)
                .await
                .map_err(|error| format!("failed to connect to database: {error}"))?;

            sqlx::migrate!("../../migrations")
                .run(&pool)
                .await
                .map_err(|error| format!("failed to run migrations: {error}"))?;

            println!("migrations applied");

            Ok(())
        }
    }
}
