mod config;
mod generate_cmd;
mod plan_cmds;
mod serve_cmd;

use std::sync::Arc;

use clap::{Parser, Subcommand};

use bizplan_core::PlanService;
use bizplan_core::completion::HttpCompletionClient;
use bizplan_core::store::PgPlanStore;
use bizplan_db::pool;

use config::BizplanConfig;

#[derive(Parser)]
#[command(name = "bizplan", about = "LLM-backed business plan generator")]
struct Cli {
    /// Database URL (overrides BIZPLAN_DATABASE_URL env var)
    #[arg(long, global = true)]
    database_url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a bizplan config file (no database required)
    Init {
        /// PostgreSQL connection URL
        #[arg(long, default_value = "postgresql://localhost:5432/bizplan")]
        db_url: String,
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },
    /// Initialize the bizplan database (requires config file or env vars)
    DbInit,
    /// Generate a business plan and persist it
    Generate {
        /// Business name, e.g. "Sample Coffee Shop"
        business_name: String,
        /// Industry, e.g. "Food and Beverage"
        industry: String,
    },
    /// Run the HTTP server
    Serve {
        /// Address to bind
        #[arg(long, default_value = "127.0.0.1")]
        bind: String,
        /// Port to listen on
        #[arg(long, default_value_t = 3000)]
        port: u16,
    },
    /// Inspect and export persisted plans
    Plan {
        #[command(subcommand)]
        command: PlanCommands,
    },
}

#[derive(Subcommand)]
pub enum PlanCommands {
    /// Show one plan (or list all plans when no key is given)
    Show {
        /// Business name of the plan to show
        business_name: Option<String>,
        /// Industry of the plan to show
        industry: Option<String>,
    },
    /// Export a plan's text to a file or stdout
    Export {
        /// Business name of the plan to export
        business_name: String,
        /// Industry of the plan to export
        industry: String,
        /// Output file path (defaults to stdout)
        #[arg(long)]
        output: Option<String>,
    },
}

/// Execute the `bizplan init` command: write the config file.
fn cmd_init(db_url: &str, force: bool) -> anyhow::Result<()> {
    let path = config::config_path();

    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}\nUse --force to overwrite.",
            path.display()
        );
    }

    let cfg = config::ConfigFile {
        database: config::DatabaseSection {
            url: db_url.to_string(),
        },
        completion: config::CompletionSection::default(),
    };

    config::save_config(&cfg)?;

    println!("Config written to {}", path.display());
    println!("  database.url = {db_url}");
    println!();
    println!("Set OPENROUTER_API_KEY (or completion.api_key in the config file),");
    println!("then run `bizplan db-init` to create and migrate the database.");

    Ok(())
}

/// Execute the `bizplan db-init` command: create database and run migrations.
async fn cmd_db_init(cli_db_url: Option<&str>) -> anyhow::Result<()> {
    let resolved = BizplanConfig::resolve(cli_db_url)?;

    println!("Initializing bizplan database...");

    pool::ensure_database_exists(&resolved.db_config).await?;
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    pool::run_migrations(&db_pool).await?;

    let plan_rows = pool::count_plans(&db_pool).await?;
    println!("Database ready. plans: {plan_rows} rows");

    db_pool.close().await;

    println!("bizplan db-init complete.");
    Ok(())
}

/// Build the service: one pool and one HTTP client for the whole process.
async fn build_service(resolved: &BizplanConfig) -> anyhow::Result<(Arc<PlanService>, sqlx::PgPool)> {
    let db_pool = pool::create_pool(&resolved.db_config).await?;
    let completion_config = resolved.completion_config()?;
    let client = HttpCompletionClient::new(completion_config)?;

    let service = Arc::new(PlanService::new(
        Arc::new(client),
        Arc::new(PgPlanStore::new(db_pool.clone())),
    ));
    Ok((service, db_pool))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Init { db_url, force } => {
            cmd_init(&db_url, force)?;
        }
        Commands::DbInit => {
            cmd_db_init(cli.database_url.as_deref()).await?;
        }
        Commands::Generate {
            business_name,
            industry,
        } => {
            let resolved = BizplanConfig::resolve(cli.database_url.as_deref())?;
            let (service, db_pool) = build_service(&resolved).await?;
            let result = generate_cmd::run_generate(&service, &business_name, &industry).await;
            db_pool.close().await;
            result?;
        }
        Commands::Serve { bind, port } => {
            let resolved = BizplanConfig::resolve(cli.database_url.as_deref())?;
            let (service, db_pool) = build_service(&resolved).await?;
            let result = serve_cmd::run_serve(service, &bind, port).await;
            db_pool.close().await;
            result?;
        }
        Commands::Plan { command } => {
            let resolved = BizplanConfig::resolve(cli.database_url.as_deref())?;
            let db_pool = pool::create_pool(&resolved.db_config).await?;
            let result = plan_cmds::run_plan_command(command, &db_pool).await;
            db_pool.close().await;
            result?;
        }
    }

    Ok(())
}
