use clap::{Parser, Subcommand, ValueEnum};
use storage::{
    Database,
    services::policy::{ChronoOrder, ExportOrdering, MissingScalePolicy, ScoringPolicy},
};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "liveranking-import")]
#[command(about = "Competition maintenance: start lists, liveranking, results", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    #[arg(long, env = "DATABASE_URL")]
    database_url: String,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Register participants from a .csv, .xlsx or .xls start list
    Participants {
        #[arg(short, long)]
        competition: i32,

        file: PathBuf,
    },
    /// Recompute every liveranking entry from the run ledger
    Rebuild {
        #[arg(short, long)]
        competition: i32,

        #[arg(long, value_enum, default_value = "skip")]
        missing_scale: MissingScale,
    },
    /// Write the results workbook
    Export {
        #[arg(short, long)]
        competition: i32,

        #[arg(long, default_value = "./exports")]
        output: PathBuf,

        #[arg(long, value_enum, default_value = "asc")]
        chrono_order: Chrono,

        #[arg(long, value_enum, default_value = "skip")]
        missing_scale: MissingScale,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum MissingScale {
    Reject,
    Skip,
}

impl From<MissingScale> for MissingScalePolicy {
    fn from(value: MissingScale) -> Self {
        match value {
            MissingScale::Reject => Self::Reject,
            MissingScale::Skip => Self::Skip,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Chrono {
    Asc,
    Desc,
}

impl From<Chrono> for ChronoOrder {
    fn from(value: Chrono) -> Self {
        match value {
            Chrono::Asc => Self::Ascending,
            Chrono::Desc => Self::Descending,
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("import={log_level},importer={log_level},storage={log_level}").into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let db = Database::new(&cli.database_url).await?;
    db.run_migrations().await?;

    match cli.command {
        Commands::Participants { competition, file } => {
            let summary = importer::import_start_list(&db, competition, &file).await?;
            tracing::info!(
                "✓ {} participants registered, {} already present",
                summary.created,
                summary.skipped
            );
        }
        Commands::Rebuild {
            competition,
            missing_scale,
        } => {
            let policy = ScoringPolicy {
                recompute_missing_scale: missing_scale.into(),
                ..ScoringPolicy::default()
            };
            let summary = importer::rebuild_liveranking(&db, &policy, competition).await?;
            tracing::info!(
                "✓ {} entries rebuilt, {} participants without runs",
                summary.updated,
                summary.removed
            );
        }
        Commands::Export {
            competition,
            output,
            chrono_order,
            missing_scale,
        } => {
            let policy = ScoringPolicy {
                export_ordering: ExportOrdering {
                    chrono: chrono_order.into(),
                },
                export_missing_scale: missing_scale.into(),
                ..ScoringPolicy::default()
            };
            let path = importer::export_results(&db, &policy, competition, &output).await?;
            tracing::info!("✓ Results written to: {}", path.display());
        }
    }

    Ok(())
}
