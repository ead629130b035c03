//! AgroDash CLI - prints the farm dashboard data through the query cache.

use std::sync::Arc;
use std::time::Duration;

use clap::{Parser, Subcommand};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use agrodash_api::{ApiConfig, Endpoint, FailureMode, MockFarmApi};
use agrodash_core::{FarmModule, ReportKind};
use agrodash_dashboard::{DashboardQueries, DashboardSnapshot};
use agrodash_query::{QueryCache, QueryClient, QueryConfig, RetryPolicy};

mod render;

use render::Output;

/// AgroDash CLI - farm dashboard data from the command line
#[derive(Parser)]
#[command(name = "agrodash")]
#[command(about = "CLI for the AgroDash farm dashboard", long_about = None)]
#[command(version)]
struct Cli {
    /// Simulated latency of every data source, in milliseconds
    /// (defaults to AGRODASH_LATENCY_MS or 500)
    #[arg(long)]
    latency_ms: Option<u64>,

    /// Seconds a cached result stays fresh
    #[arg(long, default_value = "30")]
    stale_secs: u64,

    /// Retries per failed fetch (fixed 200ms delay)
    #[arg(long, default_value = "0")]
    retries: u32,

    /// Make an endpoint fail (repeatable, e.g. --fail weather)
    #[arg(long = "fail", value_name = "ENDPOINT")]
    fail: Vec<Endpoint>,

    /// Print JSON instead of tables
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load every dashboard section at once
    Dashboard,

    /// Stat cards
    Metrics,

    /// Production per module
    Production,

    /// Inventory items and stock status
    Inventory,

    /// Farm task board
    Tasks {
        /// Only show tasks of one module (ganaderia, agricultura, avicultura, piscicultura)
        #[arg(long)]
        module: Option<FarmModule>,
    },

    /// Worker workload
    Workers,

    /// Recent activity feed
    Activities,

    /// Current weather and forecast
    Weather,

    /// Income and expenses per month
    Income,

    /// Comparison between farm modules
    Modules,

    /// Generated reports
    Reports,

    /// Scheduled report tasks
    #[command(name = "reportes-tasks")]
    ReportesTasks,

    /// Generate a report and list the reports again
    #[command(name = "generate-report")]
    GenerateReport {
        /// Report kind (produccion, financiero, inventario, personal)
        kind: ReportKind,
    },

    /// List data source endpoints
    Endpoints,
}

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "agrodash=warn",
        1 => "agrodash=info",
        _ => "agrodash=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // stderr keeps stdout clean for --json
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .init();
}

fn build_queries(cli: &Cli) -> DashboardQueries {
    let mut api_config = ApiConfig::from_env();
    if let Some(ms) = cli.latency_ms {
        api_config = api_config.with_latency(Duration::from_millis(ms));
    }

    let api = MockFarmApi::new(api_config);
    for endpoint in &cli.fail {
        api.set_failure(*endpoint, FailureMode::Always);
    }

    let retry = match cli.retries {
        0 => RetryPolicy::None,
        retries => RetryPolicy::Fixed {
            retries,
            delay: Duration::from_millis(200),
        },
    };
    let query_config = QueryConfig::default()
        .with_stale_time(Duration::from_secs(cli.stale_secs))
        .with_retry(retry);

    info!(
        latency = ?api_config.latency,
        stale_secs = cli.stale_secs,
        retries = cli.retries,
        "Starting AgroDash"
    );

    let client = QueryClient::new(QueryCache::new(), query_config);
    DashboardQueries::new(client, Arc::new(api))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let queries = build_queries(&cli);
    let mut out = Output::new(cli.json);

    match cli.command {
        Commands::Dashboard => {
            let snapshot = DashboardSnapshot::load(&queries).await;
            out.snapshot(&snapshot);
        }
        Commands::Metrics => {
            out.section("metrics", &queries.metrics().await, |items| render::metrics(items));
        }
        Commands::Production => {
            out.section(
                "production_summary",
                &queries.production_summary().await,
                |items| render::production(items),
            );
        }
        Commands::Inventory => {
            out.section("inventory", &queries.inventory().await, |items| render::inventory(items));
        }
        Commands::Tasks { module } => {
            let view = queries.tasks().await;
            let view = match module {
                Some(module) => render::filter_tasks(&view, module),
                None => view,
            };
            out.section("tasks", &view, |items| render::tasks(items));
        }
        Commands::Workers => {
            out.section("workers", &queries.workers().await, |items| render::workers(items));
        }
        Commands::Activities => {
            out.section("activities", &queries.activities().await, |items| render::activities(items));
        }
        Commands::Weather => {
            out.section("weather", &queries.weather().await, render::weather);
        }
        Commands::Income => {
            out.section(
                "monthly_income",
                &queries.monthly_income().await,
                |items| render::income(items),
            );
        }
        Commands::Modules => {
            out.section(
                "module_comparison",
                &queries.module_comparison().await,
                |items| render::modules(items),
            );
        }
        Commands::Reports => {
            out.section(
                "generated_reports",
                &queries.generated_reports().await,
                |items| render::reports(items),
            );
        }
        Commands::ReportesTasks => {
            out.section(
                "reportes_tasks",
                &queries.reportes_tasks().await,
                |items| render::reportes_tasks(items),
            );
        }
        Commands::GenerateReport { kind } => {
            // Warm the list so the mutation has something to invalidate.
            queries.generated_reports().await;
            let report = queries.generate_report(kind).await?;
            debug!(report_id = %report.id, "Report created");
            out.section(
                "generated_reports",
                &queries.generated_reports().await,
                |items| render::reports(items),
            );
        }
        Commands::Endpoints => {
            render::endpoints();
        }
    }

    out.finish()?;

    if out.failures() > 0 {
        std::process::exit(1);
    }
    Ok(())
}
