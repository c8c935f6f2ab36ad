#![forbid(unsafe_code)]
//! `taller` operator command: query, create and render records against the
//! same SQLite file the HTTP service uses, or run that service.

use chrono::Utc;
use clap::{Args, Parser, Subcommand};
use serde_json::json;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode as ProcessExitCode;
use taller_model::{Folio, RecordDraft};
use taller_query::{RecordFilter, RecordStore, SortDirective};
use taller_report::render_record;
use taller_server::{ApiConfig, ServerConfig};
use tracing::{debug, warn};

mod errors;

pub use errors::{emit_error, CliError, ExitCode, MachineError};

#[derive(Parser, Debug)]
#[command(name = "taller", version, about = "Workshop order records")]
struct Cli {
    /// SQLite database file.
    #[arg(long, global = true, default_value = "./database.db")]
    db: PathBuf,
    /// PNG watermark drawn behind each report section.
    #[arg(long, global = true, default_value = "./logo.png")]
    logo: PathBuf,
    /// Print errors as JSON on stderr.
    #[arg(long, global = true, default_value_t = false)]
    json: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List records as JSON.
    List(ListArgs),
    /// Create a record dated today and print its folio.
    Create(CreateArgs),
    /// Write the PDF report of one record.
    Render {
        folio: String,
        #[arg(long)]
        out: Option<PathBuf>,
    },
    /// Run the HTTP service.
    Serve(ServeArgs),
}

#[derive(Args, Debug)]
struct ListArgs {
    #[arg(long)]
    unit: Option<String>,
    #[arg(long = "order-type")]
    order_type: Option<String>,
    #[arg(long)]
    date: Option<String>,
    #[arg(long = "sort-by")]
    sort_by: Option<String>,
    #[arg(long)]
    order: Option<String>,
}

#[derive(Args, Debug)]
struct CreateArgs {
    #[arg(long)]
    unit: Option<String>,
    #[arg(long = "measure-type")]
    measure_type: Option<String>,
    #[arg(long = "measure-value")]
    measure_value: Option<String>,
    #[arg(long = "order-type")]
    order_type: Option<String>,
    #[arg(long)]
    comments: Option<String>,
    #[arg(long = "reported-by")]
    reported_by: Option<String>,
}

impl CreateArgs {
    fn into_draft(self) -> RecordDraft {
        RecordDraft {
            unit: self.unit.unwrap_or_default(),
            measure_type: self.measure_type.unwrap_or_default(),
            measure_value: self.measure_value.unwrap_or_default(),
            order_type: self.order_type.unwrap_or_default(),
            comments: self.comments,
            reported_by: self.reported_by.unwrap_or_default(),
        }
    }
}

#[derive(Args, Debug)]
struct ServeArgs {
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,
    #[arg(long = "static-root", default_value = ".")]
    static_root: PathBuf,
    #[arg(long = "max-body-bytes", default_value_t = 16 * 1024)]
    max_body_bytes: usize,
    /// JSON log lines, as with `TALLER_LOG_JSON` for the server binary.
    #[arg(
        long = "log-json",
        default_value_t = true,
        action = clap::ArgAction::Set,
        value_name = "BOOL"
    )]
    log_json: bool,
}

#[must_use]
pub fn main_entry() -> ProcessExitCode {
    let machine_json = std::env::args().any(|arg| arg == "--json");
    match run() {
        Ok(()) => ProcessExitCode::SUCCESS,
        Err(err) => {
            emit_error(&err, machine_json);
            ProcessExitCode::from(err.exit_code as u8)
        }
    }
}

fn run() -> Result<(), CliError> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            if matches!(
                err.kind(),
                clap::error::ErrorKind::DisplayHelp | clap::error::ErrorKind::DisplayVersion
            ) {
                print!("{err}");
                return Ok(());
            }
            return Err(CliError::usage(err.to_string().trim_end().to_string()));
        }
    };

    match cli.command {
        Commands::Serve(args) => serve(&cli.db, &cli.logo, args),
        Commands::List(args) => {
            init_stderr_tracing();
            list(&cli.db, args)
        }
        Commands::Create(args) => {
            init_stderr_tracing();
            create(&cli.db, args)
        }
        Commands::Render { folio, out } => {
            init_stderr_tracing();
            render(&cli.db, &cli.logo, &folio, out)
        }
    }
}

/// Diagnostics go to stderr so stdout stays machine-readable.
fn init_stderr_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}

fn open_store(db: &Path) -> Result<RecordStore, CliError> {
    RecordStore::open(db).map_err(CliError::from)
}

fn print_json(value: &serde_json::Value) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::internal(format!("encode output: {e}")))?;
    println!("{text}");
    Ok(())
}

fn list(db: &Path, args: ListArgs) -> Result<(), CliError> {
    let store = open_store(db)?;
    let filter = RecordFilter {
        unit: args.unit,
        order_type: args.order_type,
        date: args.date,
    };
    let sort = SortDirective {
        sort_by: args.sort_by,
        order: args.order,
    };
    let records = store.list(&filter, &sort)?;
    debug!(count = records.len(), "records listed");
    let value = serde_json::to_value(&records)
        .map_err(|e| CliError::internal(format!("encode records: {e}")))?;
    print_json(&value)
}

fn create(db: &Path, args: CreateArgs) -> Result<(), CliError> {
    let draft = args.into_draft();
    // Checked before opening so a bad invocation never creates the file.
    draft.validate().map_err(|e| CliError::from(taller_query::StoreError::from(e)))?;
    let store = open_store(db)?;
    let receipt = store.insert(&draft, Utc::now().date_naive())?;
    print_json(&json!({
        "message": "Registro creado",
        "folio": receipt.folio,
        "date": receipt.date,
    }))
}

fn render(db: &Path, logo: &Path, raw_folio: &str, out: Option<PathBuf>) -> Result<(), CliError> {
    let folio = Folio::parse(raw_folio)
        .ok_or_else(|| CliError::usage(format!("invalid folio: {raw_folio}")))?;
    let store = open_store(db)?;
    let record = store
        .fetch(folio)?
        .ok_or_else(|| CliError::not_found(format!("record {folio} not found")))?;
    let watermark = taller_server::load_watermark(logo);
    let path = out.unwrap_or_else(|| PathBuf::from(folio.document_filename()));

    let file = File::create(&path)
        .map_err(|e| CliError::internal(format!("create {}: {e}", path.display())))?;
    let mut writer = BufWriter::new(file);
    let result = render_record(&record, watermark.as_deref(), &mut writer)
        .map_err(CliError::from)
        .and_then(|bytes| {
            writer
                .flush()
                .map(|()| bytes)
                .map_err(|e| CliError::internal(format!("write {}: {e}", path.display())))
        });
    drop(writer);

    match result {
        Ok(bytes) => print_json(&json!({
            "folio": folio,
            "path": path.display().to_string(),
            "bytes": bytes,
        })),
        Err(err) => {
            if let Err(e) = std::fs::remove_file(&path) {
                warn!(path = %path.display(), error = %e, "partial report not removed");
            }
            Err(err)
        }
    }
}

fn serve(db: &Path, logo: &Path, args: ServeArgs) -> Result<(), CliError> {
    taller_server::init_tracing(args.log_json);
    let config = ServerConfig {
        bind_addr: args.bind,
        db_path: db.to_path_buf(),
        logo_path: logo.to_path_buf(),
        api: ApiConfig {
            max_body_bytes: args.max_body_bytes,
            static_root: args.static_root,
            ..ApiConfig::default()
        },
    };
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::internal(format!("tokio runtime: {e}")))?;
    runtime
        .block_on(taller_server::run(config))
        .map_err(|e| CliError::new(ExitCode::DependencyFailure, e, json!({})))
}
