//! Seed-data import.
//!
//! One JSON document per year feeds the street directory and the collection
//! schedules of both localities. The serving path never writes; this module
//! is the only producer of database content.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::params;
use serde::Deserialize;

use crate::model::{CollectionType, Locality};
use crate::store::Store;

/// Per-year seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct YearData {
    pub year: i32,
    pub lyss: LocalityData,
    pub busswil: LocalityData,
}

/// Streets and schedules of one locality.
#[derive(Debug, Clone, Deserialize)]
pub struct LocalityData {
    pub streets: Vec<StreetSeed>,
    pub schedules: ScheduleSeed,
}

/// One street entry as it appears in the seed document.
#[derive(Debug, Clone, Deserialize)]
pub struct StreetSeed {
    pub name: String,
    pub directory: i64,
    #[serde(default, rename = "houseNumbers")]
    pub house_numbers: Option<String>,
}

/// Collection dates keyed by directory number.
#[derive(Debug, Clone, Deserialize)]
pub struct ScheduleSeed {
    #[serde(default)]
    pub papier: BTreeMap<String, Vec<String>>,
    #[serde(default)]
    pub karton: BTreeMap<String, Vec<String>>,
}

/// Import every `*.json` year document in `dir`, returning the years seen.
pub fn import_dir(store: &Store, dir: &Path) -> Result<Vec<i32>> {
    let mut entries = fs::read_dir(dir)
        .with_context(|| format!("failed to read seed directory {}", dir.display()))?
        .collect::<Result<Vec<_>, _>>()?;
    entries.sort_by_key(|entry| entry.path());
    let mut years = Vec::new();
    for entry in entries {
        let path = entry.path();
        if path.extension().map_or(true, |extension| extension != "json") {
            continue;
        }
        let text = fs::read_to_string(&path)
            .with_context(|| format!("failed to read {}", path.display()))?;
        let data: YearData = serde_json::from_str(&text)
            .with_context(|| format!("invalid seed document {}", path.display()))?;
        import_year(store, &data)?;
        years.push(data.year);
    }
    Ok(years)
}

/// Import one year document.
///
/// Replaces that year's schedules and dates, and the whole street directory:
/// streets are not versioned by year, the latest imported document wins.
pub fn import_year(store: &Store, data: &YearData) -> Result<()> {
    let conn = &store.conn;
    conn.execute(
        "DELETE FROM collection_dates WHERE schedule_id IN
         (SELECT id FROM schedules WHERE year = ?1)",
        params![data.year],
    )?;
    conn.execute("DELETE FROM schedules WHERE year = ?1", params![data.year])?;
    conn.execute("DELETE FROM streets", [])?;
    import_locality(store, data.year, Locality::Lyss, &data.lyss)?;
    import_locality(store, data.year, Locality::Busswil, &data.busswil)?;
    Ok(())
}

fn import_locality(
    store: &Store,
    year: i32,
    locality: Locality,
    data: &LocalityData,
) -> Result<()> {
    let conn = &store.conn;
    for street in &data.streets {
        conn.execute(
            "INSERT INTO streets (name, house_numbers, directory, locality)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                street.name,
                street.house_numbers,
                street.directory,
                locality.as_str()
            ],
        )?;
    }
    for (collection_type, schedules) in [
        (CollectionType::Papier, &data.schedules.papier),
        (CollectionType::Karton, &data.schedules.karton),
    ] {
        for (directory, dates) in schedules {
            let directory: i64 = directory
                .parse()
                .with_context(|| format!("invalid directory key {directory:?}"))?;
            conn.execute(
                "INSERT INTO schedules (year, directory, collection_type)
                 VALUES (?1, ?2, ?3)",
                params![year, directory, collection_type.as_str()],
            )?;
            let schedule_id = conn.last_insert_rowid();
            for date in dates {
                conn.execute(
                    "INSERT INTO collection_dates (schedule_id, date) VALUES (?1, ?2)",
                    params![schedule_id, date],
                )?;
            }
        }
    }
    Ok(())
}
