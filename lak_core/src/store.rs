//! SQLite access.
//!
//! All SQL of the serving path lives here; consumers receive a [`Store`]
//! reference as a parameter instead of reaching for a shared connection. The
//! serving path only reads, writes happen through the seed import.

use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::{params, Connection, Row};

use crate::model::{CollectionType, Street};

pub struct Store {
    pub(crate) conn: Connection,
}

impl Store {
    /// Open the database at `path`, creating the schema when missing.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let conn = Connection::open(path.as_ref())
            .with_context(|| format!("failed to open database at {}", path.as_ref().display()))?;
        let store = Store { conn };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory database, used by tests.
    pub fn open_in_memory() -> Result<Self> {
        let store = Store {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<()> {
        self.conn.execute_batch(
            "CREATE TABLE IF NOT EXISTS streets (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                house_numbers TEXT,
                directory INTEGER NOT NULL,
                locality TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS schedules (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                year INTEGER NOT NULL,
                directory INTEGER NOT NULL,
                collection_type TEXT NOT NULL
            );
            CREATE TABLE IF NOT EXISTS collection_dates (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                schedule_id INTEGER NOT NULL REFERENCES schedules(id),
                date TEXT NOT NULL
            );
            CREATE INDEX IF NOT EXISTS idx_streets_name ON streets(name);
            CREATE INDEX IF NOT EXISTS idx_schedules_year_directory
                ON schedules(year, directory);
            CREATE INDEX IF NOT EXISTS idx_collection_dates_schedule
                ON collection_dates(schedule_id);",
        )?;
        Ok(())
    }

    /// All directory entries sharing `name`, in insertion order.
    ///
    /// Insertion order is the resolution order: the resolver picks the first
    /// matching entry among overlapping ranges.
    pub fn streets_by_name(&self, name: &str) -> Result<Vec<Street>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, house_numbers, directory, locality
             FROM streets
             WHERE name = ?1
             ORDER BY id ASC",
        )?;
        let streets = stmt
            .query_map(params![name], street_from_row)?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(streets)
    }

    /// All street records, name ascending, optionally restricted to one
    /// locality.
    ///
    /// The filter is a plain equality bind: an unknown locality value yields
    /// an empty list rather than an error.
    pub fn streets(&self, locality: Option<&str>) -> Result<Vec<Street>> {
        let streets = match locality {
            Some(locality) => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, house_numbers, directory, locality
                     FROM streets
                     WHERE locality = ?1
                     ORDER BY name ASC",
                )?;
                let rows = stmt.query_map(params![locality], street_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
            None => {
                let mut stmt = self.conn.prepare(
                    "SELECT id, name, house_numbers, directory, locality
                     FROM streets
                     ORDER BY name ASC",
                )?;
                let rows = stmt.query_map([], street_from_row)?
                    .collect::<Result<Vec<_>, _>>()?;
                rows
            }
        };
        Ok(streets)
    }

    /// Collection dates of one year/directory/type, ascending.
    pub fn collection_dates(
        &self,
        year: i32,
        directory: i64,
        collection_type: CollectionType,
    ) -> Result<Vec<String>> {
        let mut stmt = self.conn.prepare(
            "SELECT cd.date FROM collection_dates cd
             JOIN schedules s ON cd.schedule_id = s.id
             WHERE s.year = ?1 AND s.directory = ?2 AND s.collection_type = ?3
             ORDER BY cd.date ASC",
        )?;
        let dates = stmt
            .query_map(
                params![year, directory, collection_type.as_str()],
                |row| row.get(0),
            )?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(dates)
    }
}

fn street_from_row(row: &Row<'_>) -> rusqlite::Result<Street> {
    let locality: String = row.get(4)?;
    Ok(Street {
        id: row.get(0)?,
        name: row.get(1)?,
        house_numbers: row.get(2)?,
        directory: row.get(3)?,
        locality: locality.parse().map_err(|_| rusqlite::Error::InvalidQuery)?,
    })
}
