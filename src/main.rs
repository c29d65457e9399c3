use anyhow::Result;
use clap::Parser;
use refcheck::{ForeignKeyRelation, IntegrityChecker};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "refcheck")]
#[command(about = "Verifies referential integrity across masked datasets")]
struct Args {
    /// Path to the first SQLite database file
    #[arg(long = "db_path1")]
    db_path1: PathBuf,

    /// Path to the second SQLite database file (masked version)
    #[arg(long = "db_path2")]
    db_path2: PathBuf,

    /// Name of the table to check for referential integrity
    #[arg(long = "table_name")]
    table_name: String,

    /// Name of the foreign key column in the table
    #[arg(long = "foreign_key_column")]
    foreign_key_column: String,

    /// Name of the parent table referenced by the foreign key
    #[arg(long = "parent_table")]
    parent_table: String,

    /// Name of the key column in the parent table
    #[arg(long = "parent_key_column")]
    parent_key_column: String,

    /// Emit the report as JSON instead of plain text
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let args = Args::parse();

    let relation = ForeignKeyRelation {
        table_name: args.table_name,
        foreign_key_column: args.foreign_key_column,
        parent_table: args.parent_table,
        parent_key_column: args.parent_key_column,
    };

    let checker = IntegrityChecker::new(args.db_path1, args.db_path2, relation)?;
    let report = checker.check()?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if report.is_valid() {
        println!("Data consistency check passed.");
    } else {
        println!("Data consistency check failed.");
        println!("Found {} orphaned foreign keys:", report.orphans.len());
        for value in &report.orphans {
            println!("  {}", value);
        }
    }

    if !report.is_valid() {
        std::process::exit(1);
    }
    Ok(())
}
