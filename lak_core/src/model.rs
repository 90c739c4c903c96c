//! Domain records for streets and collection schedules.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The two municipalities served by this calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locality {
    Lyss,
    Busswil,
}

impl Locality {
    /// Value stored in the `streets.locality` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Locality::Lyss => "lyss",
            Locality::Busswil => "busswil",
        }
    }
}

impl fmt::Display for Locality {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}", self.as_str())
    }
}

impl FromStr for Locality {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "lyss" => Ok(Locality::Lyss),
            "busswil" => Ok(Locality::Busswil),
            other => anyhow::bail!("unknown locality: {other}"),
        }
    }
}

/// The collection types covered by the calendar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CollectionType {
    Papier,
    Karton,
}

impl CollectionType {
    /// Value stored in the `schedules.collection_type` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionType::Papier => "papier",
            CollectionType::Karton => "karton",
        }
    }

    /// Human label used for calendar event summaries.
    pub fn label(&self) -> &'static str {
        match self {
            CollectionType::Papier => "Papiersammlung",
            CollectionType::Karton => "Kartonsammlung",
        }
    }
}

/// One street directory entry.
///
/// Several records may share a name when house number ranges map to different
/// directories; at most one of them carries no `house_numbers` restriction
/// (the general entry).
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Street {
    pub id: i64,
    pub name: String,
    pub house_numbers: Option<String>,
    pub directory: i64,
    pub locality: Locality,
}

impl Street {
    /// Whether this entry applies to all house numbers of the street.
    pub fn is_general(&self) -> bool {
        self.house_numbers.is_none()
    }
}
