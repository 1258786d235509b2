//! lifelog-export - CSV export of raw records
//!
//! Writes the selected collections for a week, month, or year to stdout or a
//! file.

use std::fs::File;
use std::io::{self, BufWriter};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use lifelog_core::analytics::{Domain, TimeRange};
use lifelog_core::export::{export_file_name, write_csv, ExportData, ExportSelection};
use lifelog_core::{Config, Database};

#[derive(Parser)]
#[command(name = "lifelog-export")]
#[command(about = "Export logged records as CSV")]
#[command(version)]
struct Args {
    /// Time range: week, month, or year (default: from config)
    #[arg(short, long)]
    range: Option<TimeRange>,

    /// Output file (use '-' for stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write into this directory using the default file name
    #[arg(long, conflicts_with = "output")]
    dir: Option<PathBuf>,

    #[arg(long)]
    no_mood: bool,

    #[arg(long)]
    no_nutrition: bool,

    #[arg(long)]
    no_finance: bool,

    #[arg(long)]
    no_health: bool,
}

impl Args {
    fn selection(&self) -> ExportSelection {
        let mut domains = Vec::new();
        if !self.no_mood {
            domains.push(Domain::Mood);
        }
        if !self.no_nutrition {
            domains.push(Domain::Nutrition);
        }
        if !self.no_finance {
            domains.push(Domain::Finance);
        }
        if !self.no_health {
            // Selects every health metric, not only steps
            domains.push(Domain::HealthSteps);
        }
        ExportSelection::only(&domains)
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Load configuration
    let config = Config::load().context("failed to load configuration")?;

    // Initialize logging
    let _log_guard =
        lifelog_core::logging::init(&config.logging).context("failed to initialize logging")?;

    let zone = config
        .analytics
        .calendar_zone()
        .context("invalid analytics configuration")?;
    let range = args.range.unwrap_or(config.analytics.default_range);
    let today = zone.today();

    // Open database
    let db = Database::open(&config.resolved_database_path()).context("failed to open database")?;
    db.migrate().context("failed to run database migrations")?;

    let data = ExportData::collect(&db, range.resolve(today), args.selection(), &zone)
        .context("failed to read records")?;

    let output = match (&args.output, &args.dir) {
        (Some(path), _) if path.as_os_str() != "-" => Some(path.clone()),
        (None, Some(dir)) => Some(dir.join(export_file_name(range, today))),
        _ => None,
    };

    match output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            write_csv(&mut writer, &data, &zone).context("failed to write CSV")?;
            eprintln!("Exported {} records to {}", data.len(), path.display());
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            write_csv(&mut writer, &data, &zone).context("failed to write CSV")?;
        }
    }

    tracing::info!(range = %range, records = data.len(), "Export complete");
    Ok(())
}
