//! resvstore CLI
//!
//! Command-line interface for a local reservation store.

use std::fs::File;
use std::io::{self, BufReader, BufWriter};
use std::path::PathBuf;

use chrono::NaiveDateTime;
use clap::{Parser, Subcommand};
use resvstore::codec::parse_flexible;
use resvstore::config::FlushSync;
use resvstore::{Config, Reservation, ReservationId, ReservationStore, Result, StoreError};
use tracing_subscriber::{fmt, EnvFilter};

/// resvstore CLI
#[derive(Parser, Debug)]
#[command(name = "resvstore")]
#[command(about = "Manage named, timestamped reservations in a flat file")]
#[command(version)]
struct Args {
    /// Data file
    #[arg(short, long, default_value = "./reservations.dat")]
    data_file: PathBuf,

    /// Skip fsync on flush
    #[arg(long)]
    no_sync: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// List all reservations
    List {
        /// Print JSON instead of one line per record
        #[arg(long)]
        json: bool,
    },

    /// Show a reservation by id
    Get {
        id: ReservationId,
    },

    /// Add a reservation
    Add {
        name: String,

        /// e.g. 2030-12-25T14:30 or "2030/12/25 14:30"
        #[arg(value_parser = parse_time)]
        time: NaiveDateTime,
    },

    /// Replace the name and time of a reservation
    Update {
        id: ReservationId,

        name: String,

        #[arg(value_parser = parse_time)]
        time: NaiveDateTime,
    },

    /// Delete a reservation
    Delete {
        id: ReservationId,
    },

    /// Remove reservations in the past
    Cleanup,

    /// Search and sort reservations
    Search {
        /// Substring of the name (any case) or of the time
        #[arg(short, long)]
        term: Option<String>,

        /// name or time
        #[arg(short, long, default_value = "")]
        sort: String,

        /// asc or desc
        #[arg(short, long, default_value = "asc")]
        order: String,
    },

    /// Import reservations from a CSV file
    Import {
        file: PathBuf,
    },

    /// Export reservations as CSV (stdout when no file is given)
    Export {
        file: Option<PathBuf>,
    },
}

fn parse_time(input: &str) -> std::result::Result<NaiveDateTime, String> {
    parse_flexible(input.trim()).map_err(|e| e.to_string())
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,resvstore=debug"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();

    tracing::debug!("resvstore v{}", resvstore::VERSION);
    tracing::debug!("Data file: {}", args.data_file.display());

    let sync = if args.no_sync {
        FlushSync::Never
    } else {
        FlushSync::OnFlush
    };
    let config = Config::builder()
        .data_file(&args.data_file)
        .sync(sync)
        .build();

    let store = ReservationStore::open(config);

    if let Err(e) = run(&store, args.command) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(store: &ReservationStore, command: Commands) -> Result<()> {
    match command {
        Commands::List { json } => {
            let records = store.list();
            if json {
                print_json(&records)?;
            } else {
                print_records(&records);
            }
        }
        Commands::Get { id } => match store.get(id) {
            Some(record) => println!("{}", record),
            None => return Err(StoreError::NotFound(id)),
        },
        Commands::Add { name, time } => {
            let record = store.add(&name, time)?;
            println!("Added {}", record);
        }
        Commands::Update { id, name, time } => {
            let record = store.update(id, &name, time)?;
            println!("Updated {}", record);
        }
        Commands::Delete { id } => {
            if !store.delete(id) {
                return Err(StoreError::NotFound(id));
            }
            println!("Deleted reservation {}", id);
        }
        Commands::Cleanup => {
            let removed = store.cleanup_past_now();
            println!("Removed {} past reservations", removed.len());
        }
        Commands::Search { term, sort, order } => {
            let records = store.search_and_sort(term.as_deref(), &sort, &order);
            print_records(&records);
        }
        Commands::Import { file } => {
            let reader = BufReader::new(File::open(&file)?);
            let report = store.import_from(reader)?;
            for skipped in &report.skipped_lines {
                eprintln!("line {}: {} ({})", skipped.line_number, skipped.reason, skipped.line);
            }
            println!(
                "Imported {} reservations, skipped {}",
                report.imported,
                report.skipped()
            );
        }
        Commands::Export { file } => {
            let count = match file {
                Some(path) => store.export(BufWriter::new(File::create(&path)?))?,
                None => store.export(io::stdout().lock())?,
            };
            tracing::info!("Exported {} reservations", count);
        }
    }
    Ok(())
}

fn print_records(records: &[Reservation]) {
    if records.is_empty() {
        println!("No reservations");
        return;
    }
    for record in records {
        println!("{}", record);
    }
}

fn print_json(records: &[Reservation]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .map_err(|e| StoreError::Serialization(e.to_string()))?;
    println!("{}", json);
    Ok(())
}
