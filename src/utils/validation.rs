use crate::domain::model::FieldError;
use crate::utils::error::{AppError, Result};
use regex::Regex;
use std::sync::LazyLock;
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is a valid regex")
});

static CURRENCY_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").expect("currency pattern is a valid regex"));

pub fn is_valid_email(value: &str) -> bool {
    let value = value.trim();
    value.len() <= 254 && EMAIL_PATTERN.is_match(value)
}

/// 接受 JSON 整數或整數字串，且必須 >= 1
pub fn parse_positive_int(value: &serde_json::Value) -> Option<u32> {
    let parsed = match value {
        serde_json::Value::Number(n) => n.as_u64(),
        serde_json::Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    }?;

    match u32::try_from(parsed) {
        Ok(age) if age >= 1 => Some(age),
        _ => None,
    }
}

/// 文字欄位接受 JSON 字串、數字或布林，轉成字串；陣列、物件與 null 視為缺漏
pub fn scalar_text(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// 逐欄收集請求驗證錯誤，不在第一個錯誤就中止
#[derive(Debug, Default)]
pub struct FieldValidator {
    errors: Vec<FieldError>,
}

impl FieldValidator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail(&mut self, field: &str, message: &str) {
        self.errors.push(FieldError::new(field, message));
    }

    pub fn non_empty<'a>(&mut self, field: &str, value: Option<&'a str>, message: &str) -> Option<&'a str> {
        match value {
            Some(v) if !v.trim().is_empty() => Some(v),
            _ => {
                self.fail(field, message);
                None
            }
        }
    }

    pub fn email<'a>(&mut self, field: &str, value: Option<&'a str>, message: &str) -> Option<&'a str> {
        match value {
            Some(v) if is_valid_email(v) => Some(v),
            _ => {
                self.fail(field, message);
                None
            }
        }
    }

    pub fn positive_int(&mut self, field: &str, value: Option<&serde_json::Value>, message: &str) -> Option<u32> {
        let parsed = value.and_then(parse_positive_int);
        if parsed.is_none() {
            self.fail(field, message);
        }
        parsed
    }

    pub fn parse<T: std::str::FromStr>(&mut self, field: &str, value: Option<&str>, message: &str) -> Option<T> {
        let parsed = value.and_then(|v| v.parse::<T>().ok());
        if parsed.is_none() {
            self.fail(field, message);
        }
        parsed
    }

    pub fn finish(self) -> std::result::Result<(), Vec<FieldError>> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(AppError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_database_url(field_name: &str, url_str: &str) -> Result<()> {
    match Url::parse(url_str) {
        Ok(url) if matches!(url.scheme(), "postgres" | "postgresql") => Ok(()),
        Ok(url) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url.scheme().to_string(),
            reason: "Only postgres:// connection strings are supported".to_string(),
        }),
        // 連線字串可能含密碼，不回顯原值
        Err(e) => Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: "<redacted>".to_string(),
            reason: format!("Invalid connection string: {}", e),
        }),
    }
}

pub fn validate_required_field<'a, T>(field_name: &str, value: &'a Option<T>) -> Result<&'a T> {
    value.as_ref().ok_or_else(|| AppError::MissingConfigError {
        field: field_name.to_string(),
    })
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_positive_number(field_name: &str, value: i64, min_value: i64) -> Result<()> {
    if value < min_value {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_currency_code(field_name: &str, value: &str) -> Result<()> {
    if !CURRENCY_PATTERN.is_match(value) {
        return Err(AppError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Currency must be a three-letter uppercase ISO 4217 code".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@x.com"));
        assert!(is_valid_email("first.last+tag@sub.example.org"));
        assert!(!is_valid_email(""));
        assert!(!is_valid_email("no-at-sign"));
        assert!(!is_valid_email("a@localhost"));
        assert!(!is_valid_email("a b@x.com"));
    }

    #[test]
    fn test_parse_positive_int() {
        assert_eq!(parse_positive_int(&json!(30)), Some(30));
        assert_eq!(parse_positive_int(&json!("42")), Some(42));
        assert_eq!(parse_positive_int(&json!(0)), None);
        assert_eq!(parse_positive_int(&json!(-3)), None);
        assert_eq!(parse_positive_int(&json!(12.5)), None);
        assert_eq!(parse_positive_int(&json!("abc")), None);
        assert_eq!(parse_positive_int(&json!(null)), None);
    }

    #[test]
    fn test_scalar_text() {
        assert_eq!(scalar_text(&json!("Asha")).as_deref(), Some("Asha"));
        assert_eq!(scalar_text(&json!(9876543210u64)).as_deref(), Some("9876543210"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!(["a"])), None);
        assert_eq!(scalar_text(&json!({"first": "A"})), None);
    }

    #[test]
    fn test_field_validator_collects_every_error() {
        let mut v = FieldValidator::new();
        v.non_empty("name", Some("  "), "Name is required");
        v.email("email", Some("bad"), "Valid email is required");
        v.non_empty("phone", Some("111"), "Phone number is required");

        let errors = v.finish().unwrap_err();
        let fields: Vec<&str> = errors.iter().map(|e| e.field.as_str()).collect();
        assert_eq!(fields, vec!["name", "email"]);
    }

    #[test]
    fn test_validate_url() {
        assert!(validate_url("razorpay.base_url", "https://api.razorpay.com").is_ok());
        assert!(validate_url("razorpay.base_url", "http://127.0.0.1:8080").is_ok());
        assert!(validate_url("razorpay.base_url", "").is_err());
        assert!(validate_url("razorpay.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_database_url() {
        assert!(validate_database_url("database.url", "postgres://u:p@localhost/db").is_ok());
        assert!(validate_database_url("database.url", "mongodb://localhost/db").is_err());
        assert!(validate_database_url("database.url", "not a url").is_err());
    }

    #[test]
    fn test_validate_currency_code() {
        assert!(validate_currency_code("registration.currency", "INR").is_ok());
        assert!(validate_currency_code("registration.currency", "inr").is_err());
        assert!(validate_currency_code("registration.currency", "RUPEE").is_err());
    }
}
