//! Route prefixes shared by handlers, services and tests.

/// Prefix of the JSON API.
pub const API_PREFIX: &str = "/api";

/// Relay-served uploaded files: `/uploads/{filename}`.
pub const UPLOADS_ROUTE: &str = "/uploads";

/// Relay-served downloaded results: `/downloads/{filename}`.
pub const DOWNLOADS_ROUTE: &str = "/downloads";
