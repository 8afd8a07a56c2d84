//! Sorting of album lists.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::album::Album;

/// Album attribute to sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    Id,
    Name,
    Owner,
    Date,
    Location,
}

/// Direction of a sort.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Normal,
    Reverse,
}

impl SortField {
    pub fn as_str(self) -> &'static str {
        match self {
            SortField::Id => "id",
            SortField::Name => "name",
            SortField::Owner => "owner",
            SortField::Date => "date",
            SortField::Location => "location",
        }
    }

    fn compare(self, a: &Album, b: &Album) -> Ordering {
        match self {
            SortField::Id => a.id.cmp(&b.id),
            SortField::Name => a.name.cmp(&b.name),
            SortField::Owner => a.owner.cmp(&b.owner),
            SortField::Date => a.created_at.cmp(&b.created_at),
            SortField::Location => a.location.cmp(&b.location),
        }
    }
}

impl fmt::Display for SortField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "id" => Ok(SortField::Id),
            "name" => Ok(SortField::Name),
            "owner" => Ok(SortField::Owner),
            "date" | "created_at" => Ok(SortField::Date),
            "location" => Ok(SortField::Location),
            other => Err(format!("unknown sort field: {other}")),
        }
    }
}

impl FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" | "asc" => Ok(SortOrder::Normal),
            "reverse" | "desc" => Ok(SortOrder::Reverse),
            other => Err(format!("unknown sort order: {other}")),
        }
    }
}

/// Sorts albums in place. The sort is stable, so albums with equal keys
/// keep their relative order.
pub fn sort_albums(albums: &mut [&Album], field: SortField, order: SortOrder) {
    albums.sort_by(|a, b| {
        let ordering = field.compare(a, b);
        match order {
            SortOrder::Normal => ordering,
            SortOrder::Reverse => ordering.reverse(),
        }
    });
}
