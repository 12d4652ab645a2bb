//! Guangyun Table Reconciler CLI
//!
//! Command-line tool for cross-validating and merging the two exports of the
//! Guangyun rime table into one canonical semicolon-delimited file.

use clap::{Parser, Subcommand};
use gy_core::{
    check_delimiters, reconcile, write_output_file, FlatExport, ReconciledRow, ReferenceTable,
    RunReport,
};
use std::path::PathBuf;

const DEFAULT_REFERENCE: &str = "scripts/mdbdump.csv";
const DEFAULT_FLAT: &str = "original/Kuankhiunn0704.txt";
const DEFAULT_OUTPUT: &str = "Kuankhiunn0704-semicolon.txt";

#[derive(Parser)]
#[command(name = "gy-cli")]
#[command(about = "Guangyun Rime Table Reconciler", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Reconcile both exports and write the canonical file
    Merge {
        /// Path to the database export (CSV)
        #[arg(short, long, default_value = DEFAULT_REFERENCE)]
        reference: PathBuf,

        /// Path to the flat-text export
        #[arg(short, long, default_value = DEFAULT_FLAT)]
        flat: PathBuf,

        /// Output file path
        #[arg(short, long, default_value = DEFAULT_OUTPUT)]
        output: PathBuf,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Cross-validate both exports without writing the canonical file
    Check {
        /// Path to the database export (CSV)
        #[arg(short, long, default_value = DEFAULT_REFERENCE)]
        reference: PathBuf,

        /// Path to the flat-text export
        #[arg(short, long, default_value = DEFAULT_FLAT)]
        flat: PathBuf,

        /// Write a JSON run report to this path
        #[arg(long)]
        report: Option<PathBuf>,
    },

    /// Show one reconciled record
    Show {
        /// Path to the database export (CSV)
        #[arg(short, long, default_value = DEFAULT_REFERENCE)]
        reference: PathBuf,

        /// Path to the flat-text export
        #[arg(short, long, default_value = DEFAULT_FLAT)]
        flat: PathBuf,

        /// Record identifier to show
        #[arg(long)]
        record: String,

        /// Print the record as JSON
        #[arg(long)]
        json: bool,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run() -> gy_core::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Merge {
            reference,
            flat,
            output,
            report,
        } => cmd_merge(&reference, &flat, &output, report.as_ref()),
        Commands::Check {
            reference,
            flat,
            report,
        } => cmd_check(&reference, &flat, report.as_ref()),
        Commands::Show {
            reference,
            flat,
            record,
            json,
        } => cmd_show(&reference, &flat, &record, json),
    }
}

fn load_and_reconcile(
    reference_path: &PathBuf,
    flat_path: &PathBuf,
) -> gy_core::Result<(ReferenceTable, FlatExport, Vec<ReconciledRow>)> {
    let reference = ReferenceTable::load(reference_path)?;
    println!(
        "Loaded {} reference rows from {}",
        reference.len(),
        reference_path.display()
    );

    let export = FlatExport::load(flat_path, &reference)?;
    println!(
        "Loaded {} flat records from {}",
        export.records.len(),
        flat_path.display()
    );

    let rows = reconcile(&reference, &export)?;
    println!("Reconciled {} records, all fields cross-validated", rows.len());

    Ok((reference, export, rows))
}

fn cmd_merge(
    reference_path: &PathBuf,
    flat_path: &PathBuf,
    output: &PathBuf,
    report_path: Option<&PathBuf>,
) -> gy_core::Result<()> {
    let (reference, export, rows) = load_and_reconcile(reference_path, flat_path)?;

    write_output_file(output, &export.header, &rows)?;
    println!("Wrote {} rows to {}", rows.len(), output.display());

    if let Some(path) = report_path {
        let report = RunReport::new(&reference, &export, &rows);
        report.save(path)?;
        println!("Wrote run report to {}", path.display());
    }

    Ok(())
}

fn cmd_check(
    reference_path: &PathBuf,
    flat_path: &PathBuf,
    report_path: Option<&PathBuf>,
) -> gy_core::Result<()> {
    let (reference, export, rows) = load_and_reconcile(reference_path, flat_path)?;

    check_delimiters(&rows)?;
    println!("No output delimiter collisions");

    let report = RunReport::new(&reference, &export, &rows);
    println!();
    println!("Degradation:");
    println!("  {} replacement markers", report.replacement_markers);
    println!("  {} characters outside the legacy range", report.astral_chars);
    println!();
    println!("Multi-valued columns:");
    for stats in &report.columns {
        if stats.multi_valued_rows > 0 {
            println!(
                "  {} ({} rows, up to {} sub-fields)",
                stats.name, stats.multi_valued_rows, stats.max_subfields
            );
        }
    }

    if let Some(path) = report_path {
        report.save(path)?;
        println!();
        println!("Wrote run report to {}", path.display());
    }

    Ok(())
}

fn cmd_show(
    reference_path: &PathBuf,
    flat_path: &PathBuf,
    record: &str,
    json: bool,
) -> gy_core::Result<()> {
    let reference = ReferenceTable::load(reference_path)?;
    let export = FlatExport::load(flat_path, &reference)?;
    let rows = reconcile(&reference, &export)?;

    let row = rows
        .iter()
        .find(|r| r.id == record)
        .ok_or_else(|| gy_core::Error::RecordNotFound(record.to_string()))?;

    if json {
        let fields: Vec<serde_json::Value> = row
            .named_fields()
            .map(|(column, value)| serde_json::json!({ "column": column, "value": value }))
            .collect();
        let doc = serde_json::json!({ "record": row.id, "fields": fields });
        println!("{}", serde_json::to_string_pretty(&doc)?);
    } else {
        println!("Record: {}", row.id);
        println!();
        for (column, value) in row.named_fields() {
            println!("  {:<12} {}", column, value);
        }
    }

    Ok(())
}
