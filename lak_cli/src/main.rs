//! CLI for the Lyss/Busswil collection calendar: seed the database from JSON
//! year documents and write iCalendar files for an address.

use std::env::current_dir;
use std::fs::write;
use std::path::{Path, PathBuf};

use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use lak_core::{
    calendar::{self, ExportKind, ExportQuery},
    ical::generator::Emitter,
    schedule, seed,
    store::Store,
};

#[derive(Debug, Parser)]
#[command(about = "Paper and cardboard collection calendar for Lyss and Busswil")]
pub struct Arguments {
    /// path to the SQLite database
    #[arg(long, default_value = "abfallkalender.db")]
    pub database: PathBuf,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// load seed JSON year documents into the database
    Import {
        /// directory containing one JSON document per year
        data_dir: PathBuf,
    },
    /// write an iCalendar file with the collection dates of an address
    Export {
        #[command(flatten)]
        args: ExportArgs,
    },
}

#[derive(Debug, Args)]
pub struct ExportArgs {
    /// the street
    pub street: String,
    /// the house number
    pub house_number: Option<String>,
    /// calendar year (defaults to the current year)
    #[arg(long)]
    pub year: Option<i32>,
    /// collection types to include: papier, karton or all
    #[arg(long, default_value = "all")]
    pub r#type: ExportKind,
    /// restrict the export to one collection date (YYYY-MM-DD)
    #[arg(long)]
    pub date: Option<String>,
}

fn main() -> Result<()> {
    let Arguments { database, command } = Arguments::parse();
    match command {
        Command::Import { data_dir } => run_import(&database, &data_dir),
        Command::Export { args } => run_export(&database, &args),
    }
}

fn run_import(database: &Path, data_dir: &Path) -> Result<()> {
    let store = Store::open(database)?;
    let years = seed::import_dir(&store, data_dir)?;
    if years.is_empty() {
        bail!("no seed documents found in {}", data_dir.display());
    }
    for year in years {
        println!("imported {year}");
    }
    Ok(())
}

fn run_export(database: &Path, args: &ExportArgs) -> Result<()> {
    let store = Store::open(database)?;
    let query = ExportQuery {
        street: args.street.clone(),
        house_number: args.house_number.clone(),
        year: args.year.unwrap_or_else(schedule::current_year),
        kind: args.r#type,
        date: args.date.clone(),
    };
    let today = calendar::today();
    let Some(export) = calendar::export(&store, &query, &today)? else {
        bail!("street not found: {}", args.street);
    };
    let mut path = current_dir()?;
    path.push(&export.filename);
    write(&path, export.calendar.generate())?;
    println!("wrote {}", path.display());
    Ok(())
}
