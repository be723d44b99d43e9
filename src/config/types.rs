// Configuration types module
// Defines all configuration-related data structures

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub site: SiteConfig,
    pub logging: LoggingConfig,
}

/// Listener configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    #[serde(default)]
    pub workers: Option<usize>,
}

/// What gets served and where it comes from
#[derive(Debug, Deserialize, Clone)]
pub struct SiteConfig {
    /// Root directory for static files
    pub directory: String,
    /// File served for a directory URL when present
    pub index_file: String,
    /// Request path answered by the entry lister
    pub entries_path: String,
    /// Glob enumerated by the entry lister, relative to the working directory
    pub entries_pattern: String,
    /// Leading prefix stripped from every listed entry
    pub entries_prefix: String,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    /// Access log format (plain, common, combined, json, or custom pattern)
    pub access_log_format: String,
    /// Access log file path (optional, stdout if not set)
    #[serde(default)]
    pub access_log_file: Option<String>,
    /// Error log file path (optional, stderr if not set)
    #[serde(default)]
    pub error_log_file: Option<String>,
}
