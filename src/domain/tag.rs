use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Color assigned to tags created without an explicit one.
pub const DEFAULT_TAG_COLOR: &str = "#FFDEAD";

/// Domain representation of a tag that recipes can be filed under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Tag {
    /// Unique identifier of the tag.
    pub id: i32,
    /// Human-readable name of the tag.
    pub name: String,
    /// Hex color (`#RRGGBB`) used when rendering the tag.
    pub color: String,
    /// URL-friendly identifier used by recipe filters.
    pub slug: String,
}

/// Payload required to insert a new tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTag {
    pub name: String,
    pub color: String,
    pub slug: String,
}

impl NewTag {
    /// Construct a new tag payload with a trimmed name and slug.
    pub fn new(name: impl Into<String>, color: impl Into<String>, slug: impl Into<String>) -> Self {
        Self {
            name: name.into().trim().to_string(),
            color: color.into(),
            slug: slug.into().trim().to_string(),
        }
    }
}

/// Patch data applied when updating an existing tag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateTag {
    pub name: String,
    pub color: String,
    pub slug: String,
    /// Timestamp captured when the patch was created.
    pub updated_at: NaiveDateTime,
}
