//! Ways to filter posts based on their fields. Filter semantics work just like SQL:
//! If a field is unset, its filter won't be applied.
//! If set, filter out posts that don't match the filter.
use chrono::{offset::Utc, DateTime};
use serde::Deserialize;
use uuid::Uuid;

/// Filters that can be applied to queries on the datastore.
#[derive(Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct PostFilters {
    pub id: Option<Uuid>,
    pub posted_by: Option<Uuid>,
    pub text_contains: Option<String>,
    pub posted_before: Option<DateTime<Utc>>,
    pub posted_after: Option<DateTime<Utc>>,
    /// Maximum number of posts to let match the filter
    #[serde(default = "default_limit")]
    pub limit: u8,
}

impl Default for PostFilters {
    fn default() -> Self {
        Self {
            id: None,
            posted_by: None,
            text_contains: None,
            posted_before: None,
            posted_after: None,
            limit: default_limit(),
        }
    }
}

fn default_limit() -> u8 {
    100
}

/// Filters for searching users. Both are exact matches.
#[derive(Default, Deserialize, Debug, Clone, Eq, PartialEq)]
pub struct UserFilters {
    pub username: Option<String>,
    pub email: Option<String>,
}
