pub mod profile;

use crate::adapters::body::{FileBody, OCTET_STREAM};
use crate::adapters::network::DEFAULT_CHANNEL_CAPACITY;
use crate::core::listener::DEFAULT_PROGRESS_INTERVAL;
use crate::domain::model::UploadRequest;
use crate::utils::error::{Result, UploadError};
use crate::utils::validation::{self, Validate};
use clap::Parser;
use profile::UploadProfile;
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Default, Serialize, Deserialize, Parser)]
#[command(name = "upload")]
#[command(about = "Upload a file over HTTP and report progress")]
pub struct UploadConfig {
    #[arg(long, help = "Destination URL")]
    pub url: Option<String>,

    #[arg(long, help = "File to upload")]
    pub file: Option<String>,

    #[arg(long, help = "HTTP method [default: POST]")]
    pub method: Option<String>,

    #[arg(long, help = "Content type [default: application/octet-stream]")]
    pub content_type: Option<String>,

    #[arg(short = 'H', long = "header", help = "Extra header, 'Name: value'")]
    pub headers: Vec<String>,

    #[arg(long)]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Minimum time between progress updates [default: 100]")]
    pub progress_interval_ms: Option<u64>,

    #[arg(long, help = "Chunks buffered ahead of the network [default: 16]")]
    pub channel_capacity: Option<usize>,

    #[arg(long, help = "Log the request body at debug level")]
    pub log_body: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub json_logs: bool,

    #[arg(long, help = "Print progress events as JSON lines")]
    pub json_events: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "TOML profile with request defaults")]
    pub config: Option<String>,
}

impl UploadConfig {
    /// Fills every option left unset on the command line from the profile.
    /// Profile headers go before command-line headers.
    pub fn merge_profile(&mut self, profile: UploadProfile) {
        let request = profile.request;
        self.url = self.url.take().or(request.url);
        self.method = self.method.take().or(request.method);
        self.content_type = self.content_type.take().or(request.content_type);
        self.timeout_seconds = self.timeout_seconds.or(request.timeout_seconds);
        self.progress_interval_ms = self.progress_interval_ms.or(profile.progress.interval_ms);
        self.channel_capacity = self
            .channel_capacity
            .or(profile.progress.channel_capacity);

        let mut headers: Vec<String> = request
            .headers
            .into_iter()
            .map(|(name, value)| format!("{}: {}", name, value))
            .collect();
        headers.append(&mut self.headers);
        self.headers = headers;
    }

    /// Loads `--config` if given.
    pub fn load_profile(&mut self) -> Result<()> {
        if let Some(path) = self.config.clone() {
            tracing::debug!("Loading profile from {}", path);
            let profile = UploadProfile::from_file(&path)?;
            self.merge_profile(profile);
        }
        Ok(())
    }

    pub fn method(&self) -> &str {
        self.method.as_deref().unwrap_or("POST")
    }

    pub fn content_type(&self) -> &str {
        self.content_type.as_deref().unwrap_or(OCTET_STREAM)
    }

    pub fn progress_interval(&self) -> Duration {
        self.progress_interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_PROGRESS_INTERVAL)
    }

    pub fn channel_capacity(&self) -> usize {
        self.channel_capacity.unwrap_or(DEFAULT_CHANNEL_CAPACITY)
    }

    /// Builds the request for the configured file. Call [`Validate::validate`] first.
    pub fn to_request(&self) -> Result<UploadRequest> {
        let url = validation::validate_required_field("url", &self.url)?;
        let file = validation::validate_required_field("file", &self.file)?;

        let url = url::Url::parse(url).map_err(|e| UploadError::InvalidConfigValueError {
            field: "url".to_string(),
            value: url.clone(),
            reason: e.to_string(),
        })?;
        let method = reqwest::Method::from_bytes(self.method().as_bytes()).map_err(|_| {
            UploadError::InvalidConfigValueError {
                field: "method".to_string(),
                value: self.method().to_string(),
                reason: "Not a valid HTTP method".to_string(),
            }
        })?;

        let body = FileBody::new(file, Some(self.content_type()));
        let mut request = UploadRequest::new(method, url, Box::new(body));
        for line in &self.headers {
            let (name, value) = validation::parse_header("header", line)?;
            request = request.header(name, value);
        }
        if let Some(seconds) = self.timeout_seconds {
            request = request.timeout(Duration::from_secs(seconds));
        }

        Ok(request)
    }
}

impl Validate for UploadConfig {
    fn validate(&self) -> Result<()> {
        let url = validation::validate_required_field("url", &self.url)?;
        validation::validate_url("url", url)?;

        let file = validation::validate_required_field("file", &self.file)?;
        validation::validate_path("file", file)?;

        validation::validate_method("method", self.method())?;
        validation::validate_non_empty_string("content_type", self.content_type())?;
        validation::validate_positive_number("channel_capacity", self.channel_capacity(), 1)?;

        for line in &self.headers {
            validation::parse_header("header", line)?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::RequestBody;

    fn base_config() -> UploadConfig {
        UploadConfig {
            url: Some("http://localhost:8080/upload".to_string()),
            file: Some("data.bin".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_parse_cli_args() {
        let config = UploadConfig::parse_from([
            "upload",
            "--url",
            "https://example.com/u",
            "--file",
            "a.bin",
            "-H",
            "X-One: 1",
            "--header",
            "X-Two: 2",
            "--progress-interval-ms",
            "250",
        ]);
        assert_eq!(config.url.as_deref(), Some("https://example.com/u"));
        assert_eq!(config.headers, vec!["X-One: 1", "X-Two: 2"]);
        assert_eq!(config.progress_interval(), Duration::from_millis(250));
        assert_eq!(config.method(), "POST");
        assert_eq!(config.channel_capacity(), DEFAULT_CHANNEL_CAPACITY);
    }

    #[test]
    fn test_validate() {
        assert!(base_config().validate().is_ok());

        let mut missing_url = base_config();
        missing_url.url = None;
        assert!(matches!(
            missing_url.validate(),
            Err(UploadError::MissingConfigError { .. })
        ));

        let mut bad_capacity = base_config();
        bad_capacity.channel_capacity = Some(0);
        assert!(bad_capacity.validate().is_err());

        let mut bad_header = base_config();
        bad_header.headers = vec!["nocolon".to_string()];
        assert!(bad_header.validate().is_err());
    }

    #[test]
    fn test_command_line_wins_over_profile() {
        let mut config = base_config();
        config.method = Some("PATCH".to_string());
        config.headers = vec!["X-Cli: yes".to_string()];

        let profile = UploadProfile::from_toml_str(
            r#"
[request]
url = "http://profile.example.com/"
method = "PUT"
content_type = "text/csv"

[request.headers]
X-Profile = "yes"

[progress]
channel_capacity = 4
"#,
        )
        .unwrap();
        config.merge_profile(profile);

        assert_eq!(config.url.as_deref(), Some("http://localhost:8080/upload"));
        assert_eq!(config.method(), "PATCH");
        assert_eq!(config.content_type(), "text/csv");
        assert_eq!(config.channel_capacity(), 4);
        assert_eq!(config.headers, vec!["X-Profile: yes", "X-Cli: yes"]);
    }

    #[test]
    fn test_to_request() {
        let mut config = base_config();
        config.headers = vec!["Authorization: Bearer t".to_string()];
        config.timeout_seconds = Some(5);

        let request = config.to_request().unwrap();
        assert_eq!(request.head.method, reqwest::Method::POST);
        assert_eq!(request.head.url.as_str(), "http://localhost:8080/upload");
        assert_eq!(
            request.head.headers,
            vec![("Authorization".to_string(), "Bearer t".to_string())]
        );
        assert_eq!(request.head.timeout, Some(Duration::from_secs(5)));
        assert_eq!(request.body.content_type(), Some(OCTET_STREAM));
    }
}
