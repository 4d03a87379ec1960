use crate::domain::model::FieldError;
use thiserror::Error;

/// 啟動與設定階段的錯誤
#[derive(Error, Debug)]
pub enum AppError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Storage error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Gateway error: {0}")]
    GatewayError(#[from] GatewayError),
}

pub type Result<T> = std::result::Result<T, AppError>;

/// 金流服務商呼叫失敗
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Payment provider request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Payment provider rejected the request ({status}): {description}")]
    Rejected {
        status: u16,
        code: Option<String>,
        description: String,
    },

    #[error("Payment not found: {0}")]
    PaymentNotFound(String),

    #[error("Invalid payment provider URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid response from payment provider: {0}")]
    InvalidResponse(String),
}

/// 報名資料儲存失敗
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Registrant record rejected, {field}: {reason}")]
    InvalidRecord { field: String, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Client,
    Payment,
    Upstream,
    Storage,
}

/// 報名流程中的錯誤，於 HTTP 邊界轉換成狀態碼
#[derive(Error, Debug)]
pub enum RegistrationError {
    #[error("Validation failed for {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error("Payment {payment_id} is not verified (status: {})", .status.as_deref().unwrap_or("unknown"))]
    PaymentNotVerified {
        payment_id: String,
        status: Option<String>,
    },

    #[error(transparent)]
    Persistence(#[from] StoreError),
}

impl RegistrationError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            RegistrationError::Validation(_) => ErrorCategory::Client,
            RegistrationError::PaymentNotVerified { .. } => ErrorCategory::Payment,
            RegistrationError::Gateway(_) => ErrorCategory::Upstream,
            RegistrationError::Persistence(_) => ErrorCategory::Storage,
        }
    }

    pub fn status_code(&self) -> u16 {
        match self.category() {
            ErrorCategory::Client | ErrorCategory::Payment => 400,
            ErrorCategory::Upstream | ErrorCategory::Storage => 500,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            RegistrationError::Validation(_) => "Correct the listed fields and submit again",
            RegistrationError::PaymentNotVerified { .. } => {
                "Restart the payment flow and complete the payment"
            }
            RegistrationError::Gateway(_) => {
                "Check the payment provider credentials and network connectivity"
            }
            RegistrationError::Persistence(_) => "Check the database connection and schema",
        }
    }
}
