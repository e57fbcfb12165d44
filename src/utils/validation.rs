use crate::utils::error::{Result, UploadError};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(UploadError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| UploadError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Checks an HTTP method token (`POST`, `PUT`, ...).
pub fn validate_method(field_name: &str, method: &str) -> Result<()> {
    reqwest::Method::from_bytes(method.as_bytes())
        .map(|_| ())
        .map_err(|_| UploadError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: method.to_string(),
            reason: "Not a valid HTTP method".to_string(),
        })
}

/// Splits a `Name: value` header line.
pub fn parse_header(field_name: &str, line: &str) -> Result<(String, String)> {
    let invalid = |reason: &str| UploadError::InvalidConfigValueError {
        field: field_name.to_string(),
        value: line.to_string(),
        reason: reason.to_string(),
    };

    let (name, value) = line
        .split_once(':')
        .ok_or_else(|| invalid("Expected 'Name: value'"))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(invalid("Header name cannot be empty"));
    }
    reqwest::header::HeaderName::from_bytes(name.as_bytes())
        .map_err(|_| invalid("Invalid header name"))?;

    Ok((name.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("url", "https://example.com/upload").is_ok());
        assert!(validate_url("url", "http://example.com").is_ok());
        assert!(validate_url("url", "").is_err());
        assert!(validate_url("url", "invalid-url").is_err());
        assert!(validate_url("url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("channel_capacity", 16, 1).is_ok());
        assert!(validate_positive_number("channel_capacity", 0, 1).is_err());
    }

    #[test]
    fn test_validate_method() {
        assert!(validate_method("method", "POST").is_ok());
        assert!(validate_method("method", "PUT").is_ok());
        assert!(validate_method("method", "BAD METHOD").is_err());
    }

    #[test]
    fn test_parse_header() {
        let (name, value) = parse_header("header", "Authorization: Bearer abc").unwrap();
        assert_eq!(name, "Authorization");
        assert_eq!(value, "Bearer abc");

        assert!(parse_header("header", "no-colon").is_err());
        assert!(parse_header("header", ": value").is_err());
        assert!(parse_header("header", "bad name: x").is_err());
    }

    #[test]
    fn test_validate_required_field() {
        let present = Some(3);
        let missing: Option<i32> = None;
        assert_eq!(*validate_required_field("file", &present).unwrap(), 3);
        assert!(matches!(
            validate_required_field("file", &missing),
            Err(UploadError::MissingConfigError { .. })
        ));
    }
}
