//! Application constants
//!
//! Centralized location for all domain-level constants used throughout the
//! application.

// Physical column names shared by every table candidate
pub const OWNER_COLUMN: &str = "user_id";
pub const USERNAME_COLUMN: &str = "username";
pub const PROFILE_ID_COLUMN: &str = "profile_id";
pub const DISPLAY_ORDER_COLUMN: &str = "display_order";
pub const IS_ACTIVE_COLUMN: &str = "is_active";
pub const ID_COLUMN: &str = "id";

/// Columns readable by anonymous visitors. Contact fields are owner-only.
pub const PUBLIC_PROFILE_COLUMNS: &str =
    "id, username, title, role, company, bio, profile_picture_url, cover_image_url";

// Default table candidates, tried in order
pub const DEFAULT_PROFILE_TABLES: &[&str] = &["profiles", "Perfiles"];
pub const DEFAULT_THEME_TABLES: &[&str] = &["theme_settings"];
pub const DEFAULT_LINK_TABLES: &[&str] = &["links"];

/// Username assigned when the identity has no usable email local part.
pub const FALLBACK_USERNAME: &str = "user";

// Data service defaults
pub const DEFAULT_DATA_SERVICE_TIMEOUT_SECS: u64 = 30;

// Validation limits
pub const USERNAME_MIN_LENGTH: usize = 3;
pub const USERNAME_MAX_LENGTH: usize = 30;
pub const MAX_LINK_TITLE_LENGTH: usize = 100;
pub const MAX_PROFILE_TITLE_LENGTH: usize = 100;
pub const MAX_BIO_LENGTH: usize = 500;
pub const MAX_EMAIL_LENGTH: usize = 255;
pub const MAX_PHONE_LENGTH: usize = 20;
pub const MAX_LOCATION_LENGTH: usize = 100;
