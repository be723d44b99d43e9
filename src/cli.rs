//! Command line flags
//!
//! Every flag is optional; unset flags fall back to the defaults in
//! [`crate::config::Config::load`].

use clap::Parser;

#[derive(Debug, Clone, Default, Parser)]
#[command(name = "siteserve", version, about = "Serve a personal site from a directory")]
pub struct Args {
    /// Port to serve on (loopback only)
    #[arg(long)]
    pub port: Option<u16>,

    /// Directory of web files
    #[arg(long)]
    pub directory: Option<String>,

    /// Number of runtime worker threads (defaults to CPU cores)
    #[arg(long)]
    pub workers: Option<usize>,

    /// Access log format: plain, common, combined, json or a `$var` pattern
    #[arg(long = "log-format")]
    pub log_format: Option<String>,

    /// Append access log lines to this file instead of stdout
    #[arg(long = "access-log")]
    pub access_log: Option<String>,

    /// Append error log lines to this file instead of stderr
    #[arg(long = "error-log")]
    pub error_log: Option<String>,
}
