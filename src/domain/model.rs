use crate::domain::ports::RequestBody;
use crate::utils::error::Result;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Upload progress for one request, in the shape handed to event consumers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEvent {
    pub request_id: u64,
    pub progress: u64,
    pub total: Option<u64>,
}

impl ProgressEvent {
    /// One JSON object per line, for piping into other tools.
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Everything about a request except its body.
#[derive(Debug, Clone)]
pub struct RequestHead {
    pub method: reqwest::Method,
    pub url: url::Url,
    pub headers: Vec<(String, String)>,
    pub timeout: Option<Duration>,
}

pub struct UploadRequest {
    pub head: RequestHead,
    pub body: Box<dyn RequestBody>,
}

impl UploadRequest {
    pub fn new(method: reqwest::Method, url: url::Url, body: Box<dyn RequestBody>) -> Self {
        Self {
            head: RequestHead {
                method,
                url,
                headers: Vec::new(),
                timeout: None,
            },
            body,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.head.headers.push((name.into(), value.into()));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.head.timeout = Some(timeout);
        self
    }
}

#[derive(Debug, Clone)]
pub struct UploadResponse {
    pub status: u16,
    pub body: String,
}

impl UploadResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}
