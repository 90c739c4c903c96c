//! Schedule lookup: resolve an address and collect its date lists.

use anyhow::Result;
use chrono::{Datelike, Local};
use serde::Serialize;

use crate::model::{CollectionType, Locality};
use crate::resolver;
use crate::store::Store;

/// Date lists of one resolved address, as served by `/api/schedule`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleResult {
    pub street: String,
    pub house_numbers: Option<String>,
    pub locality: Locality,
    pub directory: i64,
    pub papier: Vec<String>,
    pub karton: Vec<String>,
}

/// The current calendar year, the default when a request names none.
pub fn current_year() -> i32 {
    Local::now().year()
}

/// Look up the collection dates of an address.
///
/// Returns `Ok(None)` when no street record matches `street` exactly. A year
/// or type without stored dates yields an empty list, not an error.
pub fn lookup(
    store: &Store,
    street: &str,
    house_number: Option<&str>,
    year: i32,
) -> Result<Option<ScheduleResult>> {
    let candidates = store.streets_by_name(street)?;
    let Some(selected) = resolver::resolve(&candidates, house_number) else {
        return Ok(None);
    };
    let papier = store.collection_dates(year, selected.directory, CollectionType::Papier)?;
    let karton = store.collection_dates(year, selected.directory, CollectionType::Karton)?;
    Ok(Some(ScheduleResult {
        street: selected.name.clone(),
        house_numbers: selected.house_numbers.clone(),
        locality: selected.locality,
        directory: selected.directory,
        papier,
        karton,
    }))
}

#[cfg(test)]
mod tests {
    use crate::model::Locality;
    use crate::schedule::lookup;
    use crate::seed::{self, YearData};
    use crate::store::Store;

    fn seeded_store() -> Store {
        let store = Store::open_in_memory().unwrap();
        let data: YearData =
            serde_json::from_str(include_str!("seed/tests/2025.json")).unwrap();
        seed::import_year(&store, &data).unwrap();
        store
    }

    #[test]
    fn test_lookup_unknown_street() {
        let store = seeded_store();
        assert_eq!(lookup(&store, "Hauptstrasse", None, 2025).unwrap(), None);
    }

    #[test]
    fn test_lookup_resolves_house_number_to_directory() {
        let store = seeded_store();
        let result = lookup(&store, "Bielstrasse", Some("50"), 2025)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, 1);
        assert_eq!(result.house_numbers.as_deref(), Some("1-59"));
        assert_eq!(result.papier[0], "2025-01-08");

        let result = lookup(&store, "Bielstrasse", Some("100"), 2025)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, 2);
        assert_eq!(result.papier[0], "2025-01-15");
    }

    #[test]
    fn test_lookup_without_house_number_prefers_general_entry() {
        let store = seeded_store();
        let result = lookup(&store, "Bielstrasse", None, 2025).unwrap().unwrap();
        assert_eq!(result.directory, 3);
        assert_eq!(result.house_numbers, None);
    }

    #[test]
    fn test_lookup_unmatched_house_number_falls_back_to_general_entry() {
        let store = seeded_store();
        let result = lookup(&store, "Bielstrasse", Some("300"), 2025)
            .unwrap()
            .unwrap();
        assert_eq!(result.directory, 3);
    }

    #[test]
    fn test_lookup_year_without_dates_yields_empty_lists() {
        let store = seeded_store();
        let result = lookup(&store, "Bernstrasse", None, 2024).unwrap().unwrap();
        assert_eq!(result.street, "Bernstrasse");
        assert_eq!(result.locality, Locality::Lyss);
        assert!(result.papier.is_empty());
        assert!(result.karton.is_empty());
    }
}
