// Configuration module entry point
// Layers command line flags over built-in defaults

mod state;
mod types;

use std::net::SocketAddr;

pub use state::AppState;
pub use types::{Config, LoggingConfig, ServerConfig, SiteConfig};

use crate::cli::Args;

/// Glob listed by the entries endpoint. Resolved against the working
/// directory, not `--directory`.
pub const DEFAULT_ENTRIES_PATTERN: &str = "web/blog/*";
pub const DEFAULT_ENTRIES_PREFIX: &str = "web/";

impl Config {
    /// Build the configuration from defaults overridden by command line flags.
    /// There is no file or environment source.
    pub fn load(args: &Args) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 80)?
            .set_default("site.directory", "web/")?
            .set_default("site.index_file", "index.html")?
            .set_default("site.entries_path", "/blog")?
            .set_default("site.entries_pattern", DEFAULT_ENTRIES_PATTERN)?
            .set_default("site.entries_prefix", DEFAULT_ENTRIES_PREFIX)?
            .set_default("logging.access_log_format", "plain")?
            .set_override_option("server.port", args.port.map(i64::from))?
            .set_override_option(
                "server.workers",
                args.workers.and_then(|w| i64::try_from(w).ok()),
            )?
            .set_override_option("site.directory", args.directory.clone())?
            .set_override_option("logging.access_log_format", args.log_format.clone())?
            .set_override_option("logging.access_log_file", args.access_log.clone())?
            .set_override_option("logging.error_log_file", args.error_log.clone())?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}
