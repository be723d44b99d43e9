//! Access log format module
//!
//! Supports:
//! - `plain` (`<time> <remote_addr> <METHOD> <uri>`, the default)
//! - `common` (Common Log Format - CLF)
//! - `combined` (Apache/Nginx combined format)
//! - `json` (one JSON object per line)
//! - Custom patterns with `$variables`

use chrono::{DateTime, Local};

const CLF_TIME: &str = "%d/%b/%Y:%H:%M:%S %z";

/// Access log entry describing one serviced request
#[derive(Debug, Clone)]
pub struct AccessLogEntry {
    /// Client socket address
    pub remote_addr: String,
    pub time: DateTime<Local>,
    pub method: String,
    /// Request target as received (path and query)
    pub uri: String,
    /// HTTP version (1.0, 1.1, 2)
    pub http_version: String,
    pub status: u16,
    pub body_bytes: u64,
    pub referer: Option<String>,
    pub user_agent: Option<String>,
    /// Time spent in the handler, in microseconds
    pub request_time_us: u64,
}

impl AccessLogEntry {
    /// Create a new access log entry stamped with the current time
    pub fn new(remote_addr: String, method: String, uri: String) -> Self {
        Self {
            remote_addr,
            time: Local::now(),
            method,
            uri,
            http_version: "1.1".to_string(),
            status: 200,
            body_bytes: 0,
            referer: None,
            user_agent: None,
            request_time_us: 0,
        }
    }

    /// Format the log entry according to the specified format
    pub fn format(&self, format: &str) -> String {
        match format {
            "plain" => self.format_plain(),
            "common" => self.format_common(),
            "combined" => self.format_combined(),
            "json" => self.format_json(),
            custom => self.format_custom(custom),
        }
    }

    fn format_plain(&self) -> String {
        format!(
            "{} {} {} {}",
            self.time.format("%Y/%m/%d %H:%M:%S"),
            self.remote_addr,
            self.method,
            self.uri
        )
    }

    fn request_line(&self) -> String {
        format!("{} {} HTTP/{}", self.method, self.uri, self.http_version)
    }

    /// `$remote_addr - - [$time_local] "$request" $status $body_bytes_sent`
    fn format_common(&self) -> String {
        format!(
            "{} - - [{}] \"{}\" {} {}",
            self.remote_addr,
            self.time.format(CLF_TIME),
            self.request_line(),
            self.status,
            self.body_bytes,
        )
    }

    /// Common format plus `"$http_referer" "$http_user_agent"`
    fn format_combined(&self) -> String {
        format!(
            "{} \"{}\" \"{}\"",
            self.format_common(),
            self.referer.as_deref().unwrap_or("-"),
            self.user_agent.as_deref().unwrap_or("-"),
        )
    }

    fn format_json(&self) -> String {
        serde_json::json!({
            "remote_addr": self.remote_addr,
            "time": self.time.to_rfc3339(),
            "method": self.method,
            "uri": self.uri,
            "http_version": self.http_version,
            "status": self.status,
            "body_bytes": self.body_bytes,
            "referer": self.referer,
            "user_agent": self.user_agent,
            "request_time_us": self.request_time_us,
        })
        .to_string()
    }

    /// Custom format with variable substitution
    ///
    /// Supported variables:
    /// - `$remote_addr`
    /// - `$time_local` - local time in Common Log Format
    /// - `$time_iso8601`
    /// - `$request` - full request line ("METHOD /uri HTTP/version")
    /// - `$request_method`
    /// - `$request_uri`
    /// - `$status`
    /// - `$body_bytes_sent`
    /// - `$http_referer`
    /// - `$http_user_agent`
    /// - `$request_time` - handler time in seconds (3 decimal places)
    fn format_custom(&self, pattern: &str) -> String {
        #[allow(clippy::cast_precision_loss)]
        let request_time = self.request_time_us as f64 / 1_000_000.0;

        // $request_time and $request_* must be replaced before $request
        pattern
            .replace("$remote_addr", &self.remote_addr)
            .replace("$time_local", &self.time.format(CLF_TIME).to_string())
            .replace("$time_iso8601", &self.time.to_rfc3339())
            .replace("$request_time", &format!("{request_time:.3}"))
            .replace("$request_method", &self.method)
            .replace("$request_uri", &self.uri)
            .replace("$request", &self.request_line())
            .replace("$status", &self.status.to_string())
            .replace("$body_bytes_sent", &self.body_bytes.to_string())
            .replace("$http_referer", self.referer.as_deref().unwrap_or("-"))
            .replace("$http_user_agent", self.user_agent.as_deref().unwrap_or("-"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry() -> AccessLogEntry {
        let mut entry = AccessLogEntry::new(
            "127.0.0.1:50312".to_string(),
            "GET".to_string(),
            "/blog?page=2".to_string(),
        );
        entry.status = 500;
        entry.body_bytes = 21;
        entry.user_agent = Some("curl/8.5.0".to_string());
        entry.request_time_us = 2600;
        entry
    }

    #[test]
    fn test_format_plain() {
        let log = entry().format("plain");
        assert!(log.ends_with(" 127.0.0.1:50312 GET /blog?page=2"), "{log}");
    }

    #[test]
    fn test_format_common() {
        let log = entry().format("common");
        assert!(log.starts_with("127.0.0.1:50312 - - ["));
        assert!(log.contains("\"GET /blog?page=2 HTTP/1.1\" 500 21"));
        assert!(!log.contains("curl"));
    }

    #[test]
    fn test_format_combined() {
        let log = entry().format("combined");
        assert!(log.ends_with("500 21 \"-\" \"curl/8.5.0\""), "{log}");
    }

    #[test]
    fn test_format_json() {
        let log = entry().format("json");
        let value: serde_json::Value = serde_json::from_str(&log).unwrap();
        assert_eq!(value["remote_addr"], "127.0.0.1:50312");
        assert_eq!(value["method"], "GET");
        assert_eq!(value["uri"], "/blog?page=2");
        assert_eq!(value["status"], 500);
        assert_eq!(value["referer"], serde_json::Value::Null);
    }

    #[test]
    fn test_format_custom() {
        let log = entry().format("$remote_addr $request_method $request_uri $status $request_time");
        assert_eq!(log, "127.0.0.1:50312 GET /blog?page=2 500 0.003");
    }
}
