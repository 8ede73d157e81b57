//! # Validation Module
//!
//! Input checks for board names, appearance settings, and imported services.
//! Every check appends to a [`Validator`] so a client gets all field errors
//! at once instead of one per round trip.

use crate::error::{CoreError, FieldError, Result};
use crate::model::Customization;

pub const MAX_BOARD_NAME_LEN: usize = 64;
pub const MAX_TITLE_LEN: usize = 100;
pub const MAX_URL_LEN: usize = 2048;
pub const MAX_CUSTOM_CSS_LEN: usize = 16 * 1024;
pub const MAX_OPACITY: u8 = 100;
pub const COLUMN_COUNT_RANGE: std::ops::RangeInclusive<u8> = 1..=24;

/// Collects field errors.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn board_name(&mut self, field: &str, name: &str) {
        if let Err(message) = check_board_name(name) {
            self.push(field, message);
        }
    }

    pub fn max_len(&mut self, field: &str, value: &str, max: usize) {
        if value.chars().count() > max {
            self.push(field, format!("must be at most {max} characters"));
        }
    }

    /// Empty is allowed; otherwise absolute http(s) or a root-relative path.
    pub fn optional_url(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        if value.len() > MAX_URL_LEN {
            self.push(field, format!("must be at most {MAX_URL_LEN} characters"));
        } else if !is_url(value) {
            self.push(field, "must start with http://, https:// or /");
        }
    }

    pub fn required_url(&mut self, field: &str, value: &str) {
        if value.is_empty() {
            self.push(field, "is required");
        } else {
            self.optional_url(field, value);
        }
    }

    pub fn color(&mut self, field: &str, value: &str) {
        if !is_hex_color(value) {
            self.push(field, "must be a #RGB or #RRGGBB color");
        }
    }

    /// Appearance settings of a board.
    pub fn customization(&mut self, c: &Customization) {
        self.max_len("pageTitle", &c.page_title, MAX_TITLE_LEN);
        self.max_len("metaTitle", &c.meta_title, MAX_TITLE_LEN);
        self.optional_url("logoImageUrl", &c.logo_image_url);
        self.optional_url("faviconImageUrl", &c.favicon_image_url);
        self.optional_url("backgroundImageUrl", &c.background_image_url);
        self.color("primaryColor", &c.primary_color);
        self.color("secondaryColor", &c.secondary_color);
        if c.opacity > MAX_OPACITY {
            self.push("opacity", format!("must be between 0 and {MAX_OPACITY}"));
        }
        if c.custom_css.len() > MAX_CUSTOM_CSS_LEN {
            self.push("customCss", format!("must be at most {MAX_CUSTOM_CSS_LEN} bytes"));
        }
    }

    pub fn column_count(&mut self, field: &str, count: u8) {
        if !COLUMN_COUNT_RANGE.contains(&count) {
            self.push(
                field,
                format!(
                    "must be between {} and {}",
                    COLUMN_COUNT_RANGE.start(),
                    COLUMN_COUNT_RANGE.end()
                ),
            );
        }
    }

    pub fn finish(self) -> Result<()> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(CoreError::Validation(self.errors))
        }
    }
}

/// Board names end up in URLs, so only a conservative charset is allowed.
pub fn check_board_name(name: &str) -> std::result::Result<(), String> {
    if name.is_empty() {
        return Err("is required".to_string());
    }
    if name.len() > MAX_BOARD_NAME_LEN {
        return Err(format!("must be at most {MAX_BOARD_NAME_LEN} characters"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        return Err("may only contain letters, digits, '-' and '_'".to_string());
    }
    Ok(())
}

pub fn validate_board_name(name: &str) -> Result<()> {
    let mut v = Validator::new();
    v.board_name("name", name);
    v.finish()
}

fn is_url(value: &str) -> bool {
    let rest = value
        .strip_prefix("https://")
        .or_else(|| value.strip_prefix("http://"));
    match rest {
        Some(host) => !host.is_empty() && !host.chars().any(char::is_whitespace),
        None => value.starts_with('/') && !value.chars().any(char::is_whitespace),
    }
}

pub fn is_hex_color(value: &str) -> bool {
    match value.strip_prefix('#') {
        Some(hex) => (hex.len() == 3 || hex.len() == 6) && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}
