//! iCalendar export of collection dates.

use std::str::FromStr;

use anyhow::Result;
use chrono::Local;
use ical::{
    generator::{IcalCalendar, IcalCalendarBuilder, IcalEvent, IcalEventBuilder, Property},
    ical_property,
};
use regex::Regex;
use serde::Deserialize;

use crate::model::CollectionType;
use crate::resolver;
use crate::store::Store;

static PROD_ID: &str = "-//Abfallkalender Lyss//DE";
static DOMAIN: &str = "abfallkalender-lyss.ch";
static TIMEZONE: &str = "Europe/Zurich";
static STAMP_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Which collection types an export covers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Papier,
    Karton,
    #[default]
    All,
}

impl ExportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportKind::Papier => "papier",
            ExportKind::Karton => "karton",
            ExportKind::All => "all",
        }
    }

    fn includes(&self, collection_type: CollectionType) -> bool {
        match self {
            ExportKind::Papier => collection_type == CollectionType::Papier,
            ExportKind::Karton => collection_type == CollectionType::Karton,
            ExportKind::All => true,
        }
    }
}

impl FromStr for ExportKind {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "papier" => Ok(ExportKind::Papier),
            "karton" => Ok(ExportKind::Karton),
            "all" => Ok(ExportKind::All),
            other => anyhow::bail!("unknown export type: {other}"),
        }
    }
}

/// Parameters of one calendar export.
#[derive(Debug, Clone)]
pub struct ExportQuery {
    pub street: String,
    pub house_number: Option<String>,
    pub year: i32,
    pub kind: ExportKind,
    /// Restrict the export to one exact collection date (`YYYY-MM-DD`).
    pub date: Option<String>,
}

/// A generated calendar plus the download name around it.
pub struct CalendarExport {
    pub filename: String,
    pub calendar: IcalCalendar,
}

/// Today's date as `YYYY-MM-DD`, read once per request for the upcoming-dates
/// filter.
pub fn today() -> String {
    Local::now().format("%Y-%m-%d").to_string()
}

/// Build the calendar export for an address.
///
/// Returns `Ok(None)` when no street record matches. `today` bounds the
/// export to upcoming dates unless `query.date` requests a single one.
pub fn export(store: &Store, query: &ExportQuery, today: &str) -> Result<Option<CalendarExport>> {
    let candidates = store.streets_by_name(&query.street)?;
    let Some(selected) = resolver::resolve(&candidates, query.house_number.as_deref()) else {
        return Ok(None);
    };
    let stamp = Local::now().format(STAMP_FORMAT).to_string();
    let mut calendar = IcalCalendarBuilder::version("2.0")
        .gregorian()
        .prodid(PROD_ID)
        .build();
    calendar
        .properties
        .push(ical_property!("METHOD", "PUBLISH"));
    calendar.properties.push(ical_property!(
        "X-WR-CALNAME",
        calendar_name(query.kind, &selected.name, query.year)
    ));
    for collection_type in [CollectionType::Papier, CollectionType::Karton] {
        if !query.kind.includes(collection_type) {
            continue;
        }
        let dates = store.collection_dates(query.year, selected.directory, collection_type)?;
        for date in qualifying_dates(dates, today, query.date.as_deref()) {
            calendar
                .events
                .push(collection_event(&date, collection_type, &selected.name, &stamp));
        }
    }
    Ok(Some(CalendarExport {
        filename: filename(query.kind, query.year, query.date.as_deref()),
        calendar,
    }))
}

/// Apply the export date filter.
///
/// A requested single date is matched by exact string equality and bypasses
/// the upcoming-dates filter; otherwise only dates on or after `today` are
/// kept. `YYYY-MM-DD` strings order chronologically, so both filters compare
/// strings.
fn qualifying_dates(dates: Vec<String>, today: &str, single_date: Option<&str>) -> Vec<String> {
    match single_date {
        Some(single_date) => dates
            .into_iter()
            .filter(|date| date == single_date)
            .collect(),
        None => dates
            .into_iter()
            .filter(|date| date.as_str() >= today)
            .collect(),
    }
}

/// Build one whole-day collection event.
fn collection_event(
    date: &str,
    collection_type: CollectionType,
    street: &str,
    stamp: &str,
) -> IcalEvent {
    let label = collection_type.label();
    IcalEventBuilder::tzid(TIMEZONE)
        .uid(uid(date, collection_type, street))
        .changed(stamp)
        .one_day(date.replace('-', ""))
        .set(ical_property!("SUMMARY", label))
        .set(ical_property!("DESCRIPTION", format!("{label} für {street}")))
        .build()
}

/// Stable identifier of one collection at one street.
///
/// Changing this function is a breaking change for subscribed calendars.
fn uid(date: &str, collection_type: CollectionType, street: &str) -> String {
    let whitespace = Regex::new(r"\s+").unwrap();
    let slug = whitespace.replace_all(street, "-").to_lowercase();
    format!("{date}-{}-{slug}@{DOMAIN}", collection_type.as_str())
}

/// Display name embedded as `X-WR-CALNAME`.
fn calendar_name(kind: ExportKind, street: &str, year: i32) -> String {
    match kind {
        ExportKind::All => format!("Abfallkalender {street} {year}"),
        ExportKind::Papier => format!("Papier {street} {year}"),
        ExportKind::Karton => format!("Karton {street} {year}"),
    }
}

/// Download filename of an export.
fn filename(kind: ExportKind, year: i32, single_date: Option<&str>) -> String {
    match (single_date, kind) {
        (Some(date), _) => format!("abfallkalender-{date}.ics"),
        (None, ExportKind::All) => format!("abfallkalender-lyss-{year}.ics"),
        (None, kind) => format!("{}-{year}.ics", kind.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use ical::generator::Emitter;

    use crate::calendar::{
        calendar_name, export, filename, qualifying_dates, uid, ExportKind, ExportQuery,
    };
    use crate::model::CollectionType;
    use crate::seed::{self, YearData};
    use crate::store::Store;

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        let data: YearData =
            serde_json::from_str(include_str!("seed/tests/2025.json")).unwrap();
        seed::import_year(&store, &data).unwrap();
        store
    }

    fn query(kind: ExportKind, date: Option<&str>) -> ExportQuery {
        ExportQuery {
            street: String::from("Bernstrasse"),
            house_number: None,
            year: 2025,
            kind,
            date: date.map(String::from),
        }
    }

    #[test]
    fn test_qualifying_dates_keeps_upcoming() {
        let dates = vec![
            String::from("2025-01-08"),
            String::from("2025-06-01"),
            String::from("2025-12-30"),
        ];
        assert_eq!(
            qualifying_dates(dates, "2025-06-01", None),
            vec!["2025-06-01", "2025-12-30"]
        );
    }

    #[test]
    fn test_qualifying_dates_single_date_bypasses_today() {
        let dates = vec![String::from("2025-01-08"), String::from("2025-12-30")];
        assert_eq!(
            qualifying_dates(dates.clone(), "2025-06-01", Some("2025-01-08")),
            vec!["2025-01-08"]
        );
        assert!(qualifying_dates(dates, "2025-06-01", Some("2025-02-02")).is_empty());
    }

    #[test]
    fn test_uid_slugifies_street() {
        assert_eq!(
            uid("2025-01-08", CollectionType::Papier, "Alte  Lyssstrasse"),
            "2025-01-08-papier-alte-lyssstrasse@abfallkalender-lyss.ch"
        );
    }

    #[test]
    fn test_filename_selection() {
        assert_eq!(
            filename(ExportKind::All, 2025, None),
            "abfallkalender-lyss-2025.ics"
        );
        assert_eq!(filename(ExportKind::Papier, 2025, None), "papier-2025.ics");
        assert_eq!(filename(ExportKind::Karton, 2025, None), "karton-2025.ics");
        assert_eq!(
            filename(ExportKind::All, 2025, Some("2025-01-08")),
            "abfallkalender-2025-01-08.ics"
        );
    }

    #[test]
    fn test_calendar_name_selection() {
        assert_eq!(
            calendar_name(ExportKind::All, "Bernstrasse", 2025),
            "Abfallkalender Bernstrasse 2025"
        );
        assert_eq!(
            calendar_name(ExportKind::Papier, "Bernstrasse", 2025),
            "Papier Bernstrasse 2025"
        );
        assert_eq!(
            calendar_name(ExportKind::Karton, "Bernstrasse", 2025),
            "Karton Bernstrasse 2025"
        );
    }

    #[test]
    fn test_export_unknown_street() {
        let store = seeded_store();
        let mut unknown = query(ExportKind::All, None);
        unknown.street = String::from("Hauptstrasse");
        assert!(export(&store, &unknown, "2025-01-01").unwrap().is_none());
    }

    #[test]
    fn test_export_all_upcoming_dates() {
        let store = seeded_store();
        let result = export(&store, &query(ExportKind::All, None), "2025-06-01")
            .unwrap()
            .unwrap();
        assert_eq!(result.filename, "abfallkalender-lyss-2025.ics");
        let generated = result.calendar.generate();
        // papier 2025-07-09/2025-10-08 and karton 2025-08-13/2025-11-12 remain
        assert_eq!(generated.matches("BEGIN:VEVENT").count(), 4);
        assert!(generated.contains("DTSTART;VALUE=DATE:20250709"));
        assert!(generated.contains("DTSTART;VALUE=DATE:20251112"));
        assert!(!generated.contains("20250108"));
        assert!(generated.contains("SUMMARY:Papiersammlung"));
        assert!(generated.contains("SUMMARY:Kartonsammlung"));
        assert!(generated.contains("X-WR-CALNAME:Abfallkalender Bernstrasse 2025"));
        assert!(generated.contains("METHOD:PUBLISH"));
        assert!(generated.contains("\r\n"));
    }

    #[test]
    fn test_export_single_type() {
        let store = seeded_store();
        let result = export(&store, &query(ExportKind::Karton, None), "2025-01-01")
            .unwrap()
            .unwrap();
        assert_eq!(result.filename, "karton-2025.ics");
        let generated = result.calendar.generate();
        assert_eq!(generated.matches("BEGIN:VEVENT").count(), 4);
        assert!(!generated.contains("Papiersammlung"));
    }

    #[test]
    fn test_export_single_date_yields_one_event() {
        let store = seeded_store();
        let result = export(
            &store,
            &query(ExportKind::All, Some("2025-01-08")),
            "2025-06-01",
        )
        .unwrap()
        .unwrap();
        assert_eq!(result.filename, "abfallkalender-2025-01-08.ics");
        let generated = result.calendar.generate();
        assert_eq!(generated.matches("BEGIN:VEVENT").count(), 1);
        assert!(generated.contains("DTSTART;VALUE=DATE:20250108"));
        assert!(generated
            .contains("UID:2025-01-08-papier-bernstrasse@abfallkalender-lyss.ch"));
    }

    #[test]
    fn test_export_resolves_house_number() {
        let store = seeded_store();
        let bielstrasse = ExportQuery {
            street: String::from("Bielstrasse"),
            house_number: Some(String::from("50")),
            year: 2025,
            kind: ExportKind::Papier,
            date: None,
        };
        let result = export(&store, &bielstrasse, "2025-01-01").unwrap().unwrap();
        let generated = result.calendar.generate();
        // directory 1 dates, not the general entry's directory 3
        assert!(generated.contains("DTSTART;VALUE=DATE:20250108"));
        assert!(!generated.contains("DTSTART;VALUE=DATE:20250122"));
    }
}
