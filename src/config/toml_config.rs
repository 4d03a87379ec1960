use crate::adapters::razorpay::RAZORPAY_API_BASE_URL;
use crate::config::{validate_provider, StorageBackend};
use crate::core::registration::{DEFAULT_CURRENCY, DEFAULT_REGISTRATION_FEE};
use crate::core::ConfigProvider;
use crate::utils::error::{AppError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is a valid regex"));

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub database: DatabaseConfig,
    pub razorpay: RazorpayConfig,
    #[serde(default)]
    pub registration: RegistrationConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    pub static_dir: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default)]
    pub backend: StorageBackend,
    pub url: Option<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct RazorpayConfig {
    pub key_id: String,
    pub key_secret: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistrationConfig {
    #[serde(default = "default_fee")]
    pub fee: i64,
    #[serde(default = "default_currency")]
    pub currency: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    5
}

fn default_base_url() -> String {
    RAZORPAY_API_BASE_URL.to_string()
}

fn default_fee() -> i64 {
    DEFAULT_REGISTRATION_FEE
}

fn default_currency() -> String {
    DEFAULT_CURRENCY.to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            static_dir: None,
        }
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::default(),
            url: None,
            max_connections: default_max_connections(),
        }
    }
}

impl Default for RegistrationConfig {
    fn default() -> Self {
        Self {
            fee: default_fee(),
            currency: default_currency(),
        }
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);
        toml::from_str(&processed_content).map_err(AppError::from)
    }

    /// 替換環境變數 (例如 ${RAZORPAY_KEY_SECRET})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR_PATTERN
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }
}

impl ConfigProvider for TomlConfig {
    fn host(&self) -> &str {
        &self.server.host
    }

    fn port(&self) -> u16 {
        self.server.port
    }

    fn storage_backend(&self) -> StorageBackend {
        self.database.backend
    }

    fn database_url(&self) -> Option<&str> {
        self.database.url.as_deref()
    }

    fn database_max_connections(&self) -> u32 {
        self.database.max_connections
    }

    fn razorpay_key_id(&self) -> &str {
        &self.razorpay.key_id
    }

    fn razorpay_key_secret(&self) -> &str {
        &self.razorpay.key_secret
    }

    fn razorpay_base_url(&self) -> &str {
        &self.razorpay.base_url
    }

    fn registration_fee(&self) -> i64 {
        self.registration.fee
    }

    fn currency(&self) -> &str {
        &self.registration.currency
    }

    fn static_dir(&self) -> Option<&str> {
        self.server.static_dir.as_deref()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        validate_provider(self)?;

        // 未替換的 ${VAR} 代表環境變數缺漏
        for (field, value) in [
            ("razorpay.key_id", self.razorpay.key_id.as_str()),
            ("razorpay.key_secret", self.razorpay.key_secret.as_str()),
            ("database.url", self.database.url.as_deref().unwrap_or_default()),
        ] {
            if ENV_VAR_PATTERN.is_match(value) {
                return Err(AppError::ConfigError {
                    message: format!("{} references an unset environment variable", field),
                });
            }
        }

        Ok(())
    }
}
