//! Cached data domains

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// A logical collection cached on the device.
///
/// Each domain maps to one remote table and one cache namespace key. The
/// cached snapshot for a domain is always replaced wholesale, never merged
/// field-by-field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Domain {
    Items,
    Categories,
    Suppliers,
    Rooms,
    Counts,
}

impl Domain {
    /// All cached domains, in display order.
    pub const ALL: [Self; 5] = [
        Self::Items,
        Self::Categories,
        Self::Suppliers,
        Self::Rooms,
        Self::Counts,
    ];

    /// Short lowercase name used by the CLI and `Display`.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Items => "items",
            Self::Categories => "categories",
            Self::Suppliers => "suppliers",
            Self::Rooms => "rooms",
            Self::Counts => "counts",
        }
    }

    /// Key under which this domain's snapshot is cached.
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Items => "cached_items",
            Self::Categories => "cached_categories",
            Self::Suppliers => "cached_suppliers",
            Self::Rooms => "cached_rooms",
            Self::Counts => "cached_counts",
        }
    }

    /// Remote table backing this domain.
    #[must_use]
    pub const fn table(self) -> &'static str {
        match self {
            Self::Items => "inventory_items",
            Self::Categories => "categories",
            Self::Suppliers => "suppliers",
            Self::Rooms => "rooms",
            Self::Counts => "room_counts",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Domain {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|domain| domain.name() == s || domain.table() == s)
            .ok_or_else(|| Error::InvalidChange(format!("unknown domain: {s}")))
    }
}
