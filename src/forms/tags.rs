use chrono::NaiveDateTime;
use serde::Deserialize;
use thiserror::Error;
use validator::{Validate, ValidationErrors};

use crate::domain::tag::{DEFAULT_TAG_COLOR, NewTag, UpdateTag};
use crate::forms::{first_invalid_field, first_invalid_message, sanitize_inline_text};

/// Maximum allowed length for a tag name.
const NAME_MAX_LEN: usize = 50;
const NAME_MAX_LEN_VALIDATOR: u64 = NAME_MAX_LEN as u64;

/// Maximum allowed length for a tag slug.
const SLUG_MAX_LEN: usize = 150;
const SLUG_MAX_LEN_VALIDATOR: u64 = SLUG_MAX_LEN as u64;

/// Result type returned by the tag form helpers.
pub type TagFormResult<T> = Result<T, TagFormError>;

/// Errors that can occur while processing tag forms.
#[derive(Debug, Error)]
pub enum TagFormError {
    /// Validation failures from the `validator` crate.
    #[error("{}", first_invalid_message(.0))]
    Validation(#[from] ValidationErrors),
    /// The provided name is empty after sanitization.
    #[error("tag name cannot be empty")]
    EmptyName,
    /// The color is not a `#RRGGBB` hex value.
    #[error("invalid color `{value}`, expected #RRGGBB")]
    InvalidColor { value: String },
    /// The slug contains characters outside `[-a-zA-Z0-9_]`.
    #[error("slug may only contain latin letters, digits, `-` and `_`")]
    InvalidSlug,
}

impl TagFormError {
    /// Name of the payload field the error refers to.
    pub fn field(&self) -> String {
        match self {
            TagFormError::Validation(errors) => first_invalid_field(errors),
            TagFormError::EmptyName => "name".to_string(),
            TagFormError::InvalidColor { .. } => "color".to_string(),
            TagFormError::InvalidSlug => "slug".to_string(),
        }
    }
}

/// JSON payload used to create or replace a tag.
#[derive(Debug, Deserialize, Validate)]
pub struct TagForm {
    /// Display name of the tag.
    #[validate(length(min = 1, max = NAME_MAX_LEN_VALIDATOR))]
    pub name: String,
    /// Optional `#RRGGBB` color; the default color is used when omitted.
    #[serde(default)]
    pub color: Option<String>,
    /// Slug used by recipe filters.
    #[validate(length(min = 1, max = SLUG_MAX_LEN_VALIDATOR))]
    pub slug: String,
}

impl TagForm {
    /// Validates and sanitizes the payload into a domain `NewTag`.
    pub fn into_new_tag(self) -> TagFormResult<NewTag> {
        let (name, color, slug) = self.sanitize()?;

        Ok(NewTag::new(name, color, slug))
    }

    /// Validates and sanitizes the payload into a domain `UpdateTag`.
    pub fn into_update_tag(self, updated_at: NaiveDateTime) -> TagFormResult<UpdateTag> {
        let (name, color, slug) = self.sanitize()?;

        Ok(UpdateTag {
            name,
            color,
            slug,
            updated_at,
        })
    }

    fn sanitize(self) -> TagFormResult<(String, String, String)> {
        self.validate()?;

        let name = sanitize_inline_text(&self.name);
        if name.is_empty() {
            return Err(TagFormError::EmptyName);
        }

        let color = match self.color.as_deref().map(str::trim) {
            None | Some("") => DEFAULT_TAG_COLOR.to_string(),
            Some(value) => normalize_color(value)?,
        };

        let slug = self.slug.trim().to_string();
        if slug.is_empty() || !slug.chars().all(is_slug_char) {
            return Err(TagFormError::InvalidSlug);
        }

        Ok((name, color, slug))
    }
}

fn normalize_color(value: &str) -> TagFormResult<String> {
    let valid = value.len() == 7
        && value.starts_with('#')
        && value[1..].chars().all(|ch| ch.is_ascii_hexdigit());

    if !valid {
        return Err(TagFormError::InvalidColor {
            value: value.to_string(),
        });
    }

    Ok(value.to_ascii_uppercase())
}

fn is_slug_char(ch: char) -> bool {
    ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn form(name: &str, color: Option<&str>, slug: &str) -> TagForm {
        TagForm {
            name: name.to_string(),
            color: color.map(str::to_string),
            slug: slug.to_string(),
        }
    }

    #[test]
    fn tag_form_sanitizes_and_converts() {
        let new_tag = form("  Завтрак \t на скорую руку ", Some("#e26c2d"), "breakfast")
            .into_new_tag()
            .expect("expected conversion to succeed");

        assert_eq!(new_tag.name, "Завтрак на скорую руку");
        assert_eq!(new_tag.color, "#E26C2D");
        assert_eq!(new_tag.slug, "breakfast");
    }

    #[test]
    fn tag_form_falls_back_to_default_color() {
        let new_tag = form("Обед", None, "lunch")
            .into_new_tag()
            .expect("expected conversion to succeed");

        assert_eq!(new_tag.color, DEFAULT_TAG_COLOR);
    }

    #[test]
    fn tag_form_rejects_bad_color() {
        let result = form("Обед", Some("red"), "lunch").into_new_tag();

        let err = result.expect_err("expected color error");
        assert!(matches!(err, TagFormError::InvalidColor { .. }));
        assert_eq!(err.field(), "color");
    }

    #[test]
    fn tag_form_rejects_bad_slug() {
        let err = form("Обед", None, "обед")
            .into_new_tag()
            .expect_err("expected slug error");

        assert!(matches!(err, TagFormError::InvalidSlug));
        assert_eq!(err.field(), "slug");
    }

    #[test]
    fn tag_form_reports_too_long_name() {
        let err = form(&"x".repeat(NAME_MAX_LEN + 1), None, "long")
            .into_new_tag()
            .expect_err("expected length error");

        assert_eq!(err.field(), "name");
    }

    #[test]
    fn tag_form_rejects_blank_name() {
        let err = form("   ", None, "blank")
            .into_new_tag()
            .expect_err("expected empty name");

        assert!(matches!(err, TagFormError::EmptyName));
    }

    #[test]
    fn tag_form_builds_update() {
        let updated_at = NaiveDate::from_ymd_opt(2024, 3, 8)
            .and_then(|date| date.and_hms_opt(12, 0, 0))
            .expect("valid timestamp");

        let update = form("Ужин", Some("#00ff00"), "dinner")
            .into_update_tag(updated_at)
            .expect("expected payload conversion to succeed");

        assert_eq!(update.name, "Ужин");
        assert_eq!(update.color, "#00FF00");
        assert_eq!(update.updated_at, updated_at);
    }
}
