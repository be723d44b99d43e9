//! Logger module
//!
//! Logging utilities for the server:
//! - Server lifecycle logging
//! - Access logging with multiple formats
//! - Error and warning logging
//! - File-based logging support

mod format;
pub mod writer;

pub use format::AccessLogEntry;

use crate::config::Config;
use std::net::SocketAddr;

/// Initialize the logger with configuration
///
/// Should be called once at application startup.
pub fn init(config: &Config) -> std::io::Result<()> {
    writer::init(
        config.logging.access_log_file.as_deref(),
        config.logging.error_log_file.as_deref(),
    )
}

/// Write to info/access log
fn write_info(message: &str) {
    match writer::get() {
        Some(w) => w.write_access(message),
        None => println!("{message}"),
    }
}

/// Write to error log
fn write_error(message: &str) {
    match writer::get() {
        Some(w) => w.write_error(message),
        None => eprintln!("{message}"),
    }
}

/// Startup banner. The first line is always `Running on port <port>`.
pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    for line in startup_lines(addr, config) {
        write_info(&line);
    }
}

fn startup_lines(addr: &SocketAddr, config: &Config) -> Vec<String> {
    let mut lines = vec![
        format!("Running on port {}", addr.port()),
        format!("Serving files from: {}", config.site.directory),
        format!(
            "Listing {} at {}",
            config.site.entries_pattern, config.site.entries_path
        ),
    ];
    if let Some(workers) = config.server.workers {
        lines.push(format!("Worker threads: {workers}"));
    }
    if let Some(ref path) = config.logging.access_log_file {
        lines.push(format!("Access log: {path}"));
    }
    if let Some(ref path) = config.logging.error_log_file {
        lines.push(format!("Error log: {path}"));
    }
    lines
}

pub fn log_connection_error(err: &impl std::fmt::Display) {
    write_error(&format!("[ERROR] Failed to serve connection: {err}"));
}

pub fn log_error(message: &str) {
    write_error(&format!("[ERROR] {message}"));
}

pub fn log_warning(message: &str) {
    write_error(&format!("[WARN] {message}"));
}

/// Log formatted access log entry
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    write_info(&entry.format(format));
}

pub fn log_shutdown(reason: &str) {
    write_info(&format!("Shutting down: {reason}"));
}
