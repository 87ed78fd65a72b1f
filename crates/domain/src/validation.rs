//! Caller-facing validation for profile, theme and link input
//!
//! The data layer never enforces these rules itself. Callers run them before
//! handing input to a mutation so users get field-level messages instead of
//! a remote constraint failure.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::constants::{
    MAX_BIO_LENGTH, MAX_EMAIL_LENGTH, MAX_LINK_TITLE_LENGTH, MAX_LOCATION_LENGTH,
    MAX_PHONE_LENGTH, MAX_PROFILE_TITLE_LENGTH, USERNAME_MAX_LENGTH, USERNAME_MIN_LENGTH,
};
use crate::types::{Link, ProfileUpdate, ThemeUpdate};

static USERNAME_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9_-]+$").expect("USERNAME_PATTERN should compile - this is a bug")
});
static ICON_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z-]+$").expect("ICON_PATTERN should compile - this is a bug"));
static HEX_COLOR_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^#[0-9A-Fa-f]{6}$").expect("HEX_COLOR_PATTERN should compile - this is a bug")
});
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$")
        .expect("EMAIL_PATTERN should compile - this is a bug")
});

/// Type alias for validation results
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validation error with detailed field-level errors
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationError {
    pub errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with a single field error
    pub fn field(field: impl Into<String>, message: impl Into<String>) -> Self {
        let mut err = Self::new();
        err.add_field_error(field, message);
        err
    }

    pub fn add_field_error(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError { field: field.into(), message: message.into() });
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn error_count(&self) -> usize {
        self.errors.len()
    }

    /// Get errors for a specific field
    pub fn field_errors(&self, field: &str) -> Vec<&FieldError> {
        self.errors.iter().filter(|e| e.field == field).collect()
    }

    /// Prefix every field name, e.g. `links[2].url`.
    fn nested(mut self, prefix: &str) -> Self {
        for error in &mut self.errors {
            error.field = format!("{prefix}.{}", error.field);
        }
        self
    }

    fn merge(&mut self, other: Self) {
        self.errors.extend(other.errors);
    }

    fn finish(self) -> ValidationResult<()> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.errors.as_slice() {
            [] => write!(f, "Validation error with no specific field errors"),
            [only] => write!(f, "{}: {}", only.field, only.message),
            errors => {
                write!(f, "Validation failed with {} errors: ", errors.len())?;
                for (i, error) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, "; ")?;
                    }
                    write!(f, "{}: {}", error.field, error.message)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Individual field error
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

fn check_max_len(errors: &mut ValidationError, field: &str, value: &str, max: usize) {
    if value.trim().chars().count() > max {
        errors.add_field_error(field, format!("must be less than {max} characters"));
    }
}

fn check_optional_max_len(
    errors: &mut ValidationError,
    field: &str,
    value: Option<&Option<String>>,
    max: usize,
) {
    if let Some(Some(value)) = value {
        check_max_len(errors, field, value, max);
    }
}

/// Username rules: trimmed, 3 to 30 characters, letters, digits, `_` and `-`.
pub fn validate_username(username: &str) -> ValidationResult<()> {
    let mut errors = ValidationError::new();
    let trimmed = username.trim();
    let length = trimmed.chars().count();

    if length < USERNAME_MIN_LENGTH {
        errors.add_field_error(
            "username",
            format!("must be at least {USERNAME_MIN_LENGTH} characters"),
        );
    } else if length > USERNAME_MAX_LENGTH {
        errors.add_field_error(
            "username",
            format!("must be less than {USERNAME_MAX_LENGTH} characters"),
        );
    }
    if length > 0 && !USERNAME_PATTERN.is_match(trimmed) {
        errors.add_field_error(
            "username",
            "can only contain letters, numbers, underscores and hyphens",
        );
    }

    errors.finish()
}

/// A link needs a title, a well-formed absolute URL and, if present, a
/// lowercase icon name.
pub fn validate_link(link: &Link) -> ValidationResult<()> {
    let mut errors = ValidationError::new();

    if link.title.trim().is_empty() {
        errors.add_field_error("title", "is required");
    } else {
        check_max_len(&mut errors, "title", &link.title, MAX_LINK_TITLE_LENGTH);
    }

    if url::Url::parse(link.url.trim()).is_err() {
        errors.add_field_error("url", "invalid URL format");
    }

    if !link.icon_class.is_empty() && !ICON_PATTERN.is_match(&link.icon_class) {
        errors.add_field_error("icon_class", "invalid icon name");
    }

    errors.finish()
}

/// Validate every link, reporting fields as `links[i].field`.
pub fn validate_links(links: &[Link]) -> ValidationResult<()> {
    let mut errors = ValidationError::new();
    for (index, link) in links.iter().enumerate() {
        if let Err(err) = validate_link(link) {
            errors.merge(err.nested(&format!("links[{index}]")));
        }
    }
    errors.finish()
}

pub fn validate_profile_update(update: &ProfileUpdate) -> ValidationResult<()> {
    let mut errors = ValidationError::new();

    if let Some(username) = &update.username {
        if let Err(err) = validate_username(username) {
            errors.merge(err);
        }
    }
    check_optional_max_len(
        &mut errors,
        "title",
        update.title.as_ref(),
        MAX_PROFILE_TITLE_LENGTH,
    );
    check_optional_max_len(&mut errors, "bio", update.bio.as_ref(), MAX_BIO_LENGTH);
    check_optional_max_len(
        &mut errors,
        "contact_phone",
        update.contact_phone.as_ref(),
        MAX_PHONE_LENGTH,
    );
    check_optional_max_len(
        &mut errors,
        "contact_location",
        update.contact_location.as_ref(),
        MAX_LOCATION_LENGTH,
    );

    // Empty string is allowed and means "no contact email".
    if let Some(Some(email)) = &update.contact_email {
        let email = email.trim();
        if !email.is_empty() {
            if !EMAIL_PATTERN.is_match(email) {
                errors.add_field_error("contact_email", "invalid email format");
            }
            check_max_len(&mut errors, "contact_email", email, MAX_EMAIL_LENGTH);
        }
    }

    errors.finish()
}

pub fn validate_theme_update(update: &ThemeUpdate) -> ValidationResult<()> {
    let mut errors = ValidationError::new();

    let colors = [
        ("bg_color", &update.bg_color),
        ("button_bg_color", &update.button_bg_color),
        ("button_text_color", &update.button_text_color),
        ("text_color", &update.text_color),
    ];
    for (field, value) in colors {
        if let Some(color) = value {
            if !HEX_COLOR_PATTERN.is_match(color) {
                errors.add_field_error(field, "invalid color format");
            }
        }
    }

    errors.finish()
}
