use crate::utils::error::{MobilityError, Result};
use std::fmt::Display;
use std::path::Path;
use url::Url;

/// Implemented by every config type so binaries can check settings up front.
pub trait Validate {
    fn validate(&self) -> Result<()>;
}

fn invalid(field: &str, value: impl Display, reason: impl Into<String>) -> MobilityError {
    MobilityError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.into(),
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(invalid(field_name, url_str, "URL cannot be empty"));
    }
    let url = Url::parse(url_str)
        .map_err(|e| invalid(field_name, url_str, format!("not a valid URL: {}", e)))?;
    match url.scheme() {
        "http" | "https" => Ok(()),
        scheme => Err(invalid(
            field_name,
            url_str,
            format!("only http(s) URLs are supported, got '{}'", scheme),
        )),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(invalid(field_name, path, "path cannot be empty"));
    }
    if path.contains('\0') {
        return Err(invalid(field_name, path, "path contains a null byte"));
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: usize, min_value: usize) -> Result<()> {
    if value < min_value {
        return Err(invalid(
            field_name,
            value,
            format!("must be at least {}", min_value),
        ));
    }
    Ok(())
}

pub fn validate_file_extensions(
    field_name: &str,
    files: &[String],
    allowed_extensions: &[&str],
) -> Result<()> {
    for file in files {
        match Path::new(file).extension().and_then(|ext| ext.to_str()) {
            Some(ext) if allowed_extensions.contains(&ext) => {}
            Some(ext) => {
                return Err(invalid(
                    field_name,
                    file,
                    format!(
                        "unsupported file extension '{}', expected one of: {}",
                        ext,
                        allowed_extensions.join(", ")
                    ),
                ))
            }
            None => return Err(invalid(field_name, file, "file has no extension")),
        }
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(invalid(field_name, value, "value cannot be blank"));
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(invalid(
            field_name,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("mobility_url", "https://example.com").is_ok());
        assert!(validate_url("mobility_url", "http://example.com").is_ok());
        assert!(validate_url("mobility_url", "").is_err());
        assert!(validate_url("mobility_url", "invalid-url").is_err());
        assert!(validate_url("mobility_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("limit", 5, 1).is_ok());
        assert!(validate_positive_number("limit", 0, 1).is_err());
    }

    #[test]
    fn test_validate_file_extensions() {
        let files = vec!["mrc_table2.csv".to_string(), "mrc_table10.csv".to_string()];
        assert!(validate_file_extensions("dataset_files", &files, &["csv"]).is_ok());

        let invalid_files = vec!["mrc_table2.xlsx".to_string()];
        assert!(validate_file_extensions("dataset_files", &invalid_files, &["csv"]).is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("min_q1_share", 5.0, 0.0, 50.0).is_ok());
        assert!(validate_range("min_q1_share", 0.0, 0.0, 50.0).is_ok());
        assert!(validate_range("min_q1_share", 50.1, 0.0, 50.0).is_err());
        assert!(validate_range("min_q1_share", -1.0, 0.0, 50.0).is_err());
    }
}
