/// Bearer credential resolution and the authenticated request extractor
pub mod auth;
/// Mapping of booking errors to HTTP responses
pub mod error_handling;
