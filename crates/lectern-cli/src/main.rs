//! Lectern CLI: operational commands over the document catalog.
//!
//! Reads DATABASE_URL, DOCUMENT_STORAGE_PATH and the other settings from the
//! environment (a `.env` file is loaded first). `extract` needs no database.

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use lectern_cli::{
    init_tracing, render_document_table, render_extraction_report, render_stats_table,
};
use lectern_core::models::{DocumentFilter, DocumentStatus, DEFAULT_PAGE_SIZE};
use lectern_core::Config;
use lectern_db::{setup_database, DocumentStore, PostgresDocumentStore};
use lectern_processing::{ContainerParser, DocumentFormat};
use lectern_services::{DocumentCatalog, StorageStatsAggregator};
use lectern_storage::StorageBackends;
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use uuid::Uuid;

#[derive(Parser)]
#[command(name = "lectern", about = "Lectern document storage CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Json,
    Table,
}

#[derive(Subcommand)]
enum Commands {
    /// Move one disk-backed document's bytes into its database row
    MigrateInline {
        /// Document UUID
        id: Uuid,
    },
    /// Move every disk-backed document inline; exits 1 if any fail
    MigrateAllInline,
    /// Write a document's bytes to a file without changing its record
    Export {
        /// Document UUID
        id: Uuid,
        /// Target path (parent directories are created)
        path: PathBuf,
    },
    /// Show storage statistics
    Stats {
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// List documents, newest first
    List {
        #[arg(long, value_name = "UUID")]
        subject: Option<Uuid>,
        #[arg(long, value_name = "UUID")]
        class: Option<Uuid>,
        /// uploaded, processing, completed or failed
        #[arg(long)]
        status: Option<DocumentStatus>,
        #[arg(long, value_name = "UUID")]
        uploaded_by: Option<Uuid>,
        #[arg(long, default_value = "1")]
        page: u32,
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: u32,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
    /// Report the media a file would yield on ingestion (no database access)
    Extract {
        /// Path to the document
        file: PathBuf,
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },
}

fn print_json(value: &impl Serialize) -> anyhow::Result<()> {
    let out = serde_json::to_string_pretty(value).context("Serialize output")?;
    println!("{}", out);
    Ok(())
}

async fn connect() -> anyhow::Result<(DocumentCatalog, Arc<dyn DocumentStore>)> {
    let config = Config::from_env().context("Failed to load configuration")?;
    let pool = setup_database(&config).await?;
    let store: Arc<dyn DocumentStore> = Arc::new(PostgresDocumentStore::new(pool));
    let backends = StorageBackends::from_config(config.storage())
        .await
        .context("Failed to initialize storage backends")?;

    Ok((
        DocumentCatalog::new(store.clone(), backends, config.storage()),
        store,
    ))
}

#[derive(Serialize)]
struct ExtractionReport {
    file: String,
    format: DocumentFormat,
    degraded: Option<String>,
    media: Vec<ExtractedMedia>,
}

#[derive(Serialize)]
struct ExtractedMedia {
    order_index: i32,
    filename: String,
    mime_type: String,
    size_bytes: usize,
    relationship_id: Option<String>,
}

async fn extract(file: PathBuf, format: OutputFormat) -> anyhow::Result<()> {
    let data = tokio::fs::read(&file)
        .await
        .with_context(|| format!("Failed to read {}", file.display()))?;
    let detected = DocumentFormat::detect(&data);
    let outcome = ContainerParser::new().extract_async(data).await;
    let name = file.display().to_string();

    match format {
        OutputFormat::Json => print_json(&ExtractionReport {
            file: name,
            format: detected,
            degraded: outcome.degraded_reason().map(|r| r.to_string()),
            media: outcome
                .candidates()
                .iter()
                .map(|c| ExtractedMedia {
                    order_index: c.order_index,
                    filename: c.filename.clone(),
                    mime_type: c.mime_type.clone(),
                    size_bytes: c.data.len(),
                    relationship_id: c.relationship_id.clone(),
                })
                .collect(),
        }),
        OutputFormat::Table => {
            println!("{}", render_extraction_report(&name, detected, &outcome));
            Ok(())
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cli = Cli::parse();

    match cli.command {
        Commands::Extract { file, format } => extract(file, format).await?,
        Commands::MigrateInline { id } => {
            let (catalog, _) = connect().await?;
            let document = catalog.migrate_to_inline(id).await?;
            print_json(&document)?;
        }
        Commands::MigrateAllInline => {
            let (catalog, _) = connect().await?;
            let report = catalog.migrate_all_inline().await?;
            print_json(&report)?;
            if report.has_failures() {
                tracing::warn!(
                    failed = report.failed.len(),
                    "Some migrations failed. Check logs for details."
                );
                std::process::exit(1);
            }
        }
        Commands::Export { id, path } => {
            let (catalog, _) = connect().await?;
            let written = catalog.export_to_path(id, &path).await?;
            print_json(&serde_json::json!({
                "document_id": id,
                "path": written.display().to_string(),
            }))?;
        }
        Commands::Stats { format } => {
            let (_, store) = connect().await?;
            let stats = StorageStatsAggregator::new(store).compute_stats().await?;
            match format {
                OutputFormat::Json => print_json(&stats)?,
                OutputFormat::Table => println!("{}", render_stats_table(&stats)),
            }
        }
        Commands::List {
            subject,
            class,
            status,
            uploaded_by,
            page,
            page_size,
            format,
        } => {
            let filter = DocumentFilter {
                subject_id: subject,
                class_id: class,
                status,
                uploaded_by,
            };
            let (catalog, _) = connect().await?;
            let result = catalog.list(&filter, page, page_size).await?;
            match format {
                OutputFormat::Json => print_json(&result)?,
                OutputFormat::Table => println!("{}", render_document_table(&result)),
            }
        }
    }

    Ok(())
}
