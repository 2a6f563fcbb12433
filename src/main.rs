mod db;
mod extract;
mod fetch;
mod ingest;
mod price;
mod settings;

use clap::{Parser, Subcommand};

use settings::Settings;

#[derive(Parser)]
#[command(name = "fragment_ingest", about = "Fragment sold-username ingestion pipeline")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create the sales table if it does not exist
    Init,
    /// Fetch the sold listing and ingest new sale records
    Run,
    /// Show store statistics
    Stats,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let settings = Settings::from_env();

    match cli.command {
        Commands::Init => {
            let pool = db::connect(&settings).await?;
            db::init_schema(&pool).await?;
            println!("Schema ready in {}", settings.db_path);
        }
        Commands::Run => {
            let pool = db::connect(&settings).await?;
            db::init_schema(&pool).await?;
            let stats = ingest::run(&pool, &settings).await?;
            println!(
                "Done: {} rows seen, {} inserted, {} duplicates, {} incomplete, {} bad prices.",
                stats.rows_seen, stats.inserted, stats.duplicates, stats.incomplete, stats.bad_price
            );
        }
        Commands::Stats => {
            let pool = db::connect(&settings).await?;
            db::init_schema(&pool).await?;
            let s = db::get_stats(&pool).await?;
            println!("Records:   {}", s.total);
            println!("Max id:    {}", s.max_id);
            match s.latest_sale {
                Some(ts) => println!("Last sale: {}", ts),
                None => println!("Last sale: -"),
            }
        }
    }

    Ok(())
}
