//! Contact domain model
//!
//! The backend speaks camelCase JSON and assigns ids server-side
//! (`_id` is accepted as an alias for deployments backed by MongoDB).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Contact category - fixed set, matching the web client's filter menu
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Category {
    Family,
    Friend,
    Work,
    #[default]
    Other,
}

impl Category {
    /// All categories, in menu order
    pub const ALL: [Category; 4] = [
        Category::Family,
        Category::Friend,
        Category::Work,
        Category::Other,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Family => "Family",
            Category::Friend => "Friend",
            Category::Work => "Work",
            Category::Other => "Other",
        }
    }
}

impl std::str::FromStr for Category {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "Family" | "family" => Ok(Category::Family),
            "Friend" | "friend" => Ok(Category::Friend),
            "Work" | "work" => Ok(Category::Work),
            "Other" | "other" => Ok(Category::Other),
            other => Err(format!("Unknown category: {}", other)),
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single address-book record owned by an authenticated user
///
/// The in-memory collection of these is a cached copy of server state;
/// `id` is server-assigned and immutable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    #[serde(alias = "_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub last_contacted: Option<DateTime<Utc>>,
}

/// A contact as entered in a form, before the server assigns an id
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContactDraft {
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub category: Category,
    #[serde(default)]
    pub notes: String,
    #[serde(default)]
    pub is_favorite: bool,
    #[serde(default)]
    pub last_contacted: Option<DateTime<Utc>>,
}

/// Filters applied alongside the free-text search query
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchFilters {
    /// Restrict to one category (exact match) when set
    pub category: Option<Category>,
    /// Restrict to favorites when set
    pub favorites_only: bool,
}
