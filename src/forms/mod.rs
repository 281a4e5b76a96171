use std::borrow::Cow;

use validator::{ValidationError, ValidationErrors};

pub mod ingredients;
pub mod recipes;
pub mod tags;

/// Field name used for errors that are not tied to a single field.
pub const NON_FIELD_ERRORS: &str = "non_field_errors";

/// Name of the first failing field, in alphabetical order.
pub fn first_invalid_field(errors: &ValidationErrors) -> String {
    let mut fields: Vec<Cow<'static, str>> = errors.field_errors().into_keys().collect();
    fields.sort();

    fields
        .into_iter()
        .next()
        .map(|field| field.into_owned())
        .unwrap_or_else(|| NON_FIELD_ERRORS.to_string())
}

/// Human-readable message for the first failing field.
pub fn first_invalid_message(errors: &ValidationErrors) -> String {
    let field = first_invalid_field(errors);

    errors
        .field_errors()
        .get(field.as_str())
        .and_then(|field_errors| field_errors.first())
        .map(describe)
        .unwrap_or_else(|| "invalid value".to_string())
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }

    match error.code.as_ref() {
        "length" => match (error.params.get("min"), error.params.get("max")) {
            (Some(min), Some(max)) => format!("must be between {min} and {max} characters long"),
            (Some(min), None) => format!("must be at least {min} characters long"),
            (None, Some(max)) => format!("must be at most {max} characters long"),
            (None, None) => "has invalid length".to_string(),
        },
        "range" => match error.params.get("min") {
            Some(min) => format!("must be greater than or equal to {min}"),
            None => "is out of range".to_string(),
        },
        code => format!("invalid value ({code})"),
    }
}

/// Collapse runs of whitespace and drop control characters.
pub fn sanitize_inline_text(input: &str) -> String {
    let mut sanitized = String::with_capacity(input.len());
    let mut previous_whitespace = false;

    for ch in input.trim().chars() {
        if ch.is_whitespace() {
            if !previous_whitespace {
                sanitized.push(' ');
                previous_whitespace = true;
            }
        } else if ch.is_control() {
            continue;
        } else {
            sanitized.push(ch);
            previous_whitespace = false;
        }
    }

    sanitized
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 1, max = 5))]
        name: String,
        #[validate(range(min = 1))]
        amount: i32,
    }

    #[test]
    fn first_invalid_field_picks_alphabetically_first() {
        let sample = Sample {
            name: String::new(),
            amount: 0,
        };

        let errors = sample.validate().expect_err("expected validation errors");

        assert_eq!(first_invalid_field(&errors), "amount");
        assert_eq!(
            first_invalid_message(&errors),
            "must be greater than or equal to 1"
        );
    }

    #[test]
    fn sanitize_inline_text_collapses_whitespace() {
        assert_eq!(sanitize_inline_text("  Борщ \t\n с  салом "), "Борщ с салом");
        assert_eq!(sanitize_inline_text("\u{7}"), "");
    }
}
