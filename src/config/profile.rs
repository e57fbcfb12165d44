use crate::utils::error::{Result, UploadError};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

/// Upload settings kept in a TOML file, for requests made over and over.
///
/// ```toml
/// [request]
/// url = "https://uploads.example.com/v1/blobs"
/// method = "PUT"
///
/// [request.headers]
/// Authorization = "Bearer ${UPLOAD_TOKEN}"
///
/// [progress]
/// interval_ms = 250
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadProfile {
    #[serde(default)]
    pub request: RequestProfile,
    #[serde(default)]
    pub progress: ProgressProfile,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestProfile {
    pub url: Option<String>,
    pub method: Option<String>,
    pub content_type: Option<String>,
    pub timeout_seconds: Option<u64>,
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProgressProfile {
    pub interval_ms: Option<u64>,
    pub channel_capacity: Option<usize>,
}

impl UploadProfile {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed = substitute_env_vars(content);
        toml::from_str(&processed).map_err(|e| UploadError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }
}

/// Replaces `${VAR}` with the environment value. Unset variables stay as written.
fn substitute_env_vars(content: &str) -> String {
    static ENV_VAR: OnceLock<Regex> = OnceLock::new();
    let re = ENV_VAR.get_or_init(|| {
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("env var pattern is valid")
    });

    re.replace_all(content, |caps: &Captures| {
        let var_name = &caps[1];
        std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
    })
    .into_owned()
}
