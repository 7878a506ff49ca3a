use crate::adapters::soap::{Credentials, SoapProcessXmlClient};
use crate::core::connector::DEFAULT_CHUNK_SIZE;
use crate::domain::bank_transaction::BankTransaction;
use crate::domain::model::{Destiny, Office};
use crate::utils::error::{Result, TwinfieldError};
use crate::utils::validation::{
    validate_non_empty_string, validate_positive_number, validate_range,
    validate_required_field, validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::env;
use std::path::Path;
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TwinfieldConfig {
    pub connection: ConnectionConfig,
    pub request: Option<RequestConfig>,
    pub defaults: Option<DefaultsConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectionConfig {
    pub cluster_url: String,
    pub session_id: Option<String>,
    pub access_token: Option<String>,
    pub company_code: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestConfig {
    pub timeout_seconds: Option<u64>,
    pub retry_attempts: Option<u32>,
    pub retry_delay_seconds: Option<u64>,
    pub chunk_size: Option<usize>,
}

/// 輸入資料缺少欄位時套用的預設值
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DefaultsConfig {
    pub office: Option<String>,
    pub destiny: Option<Destiny>,
}

impl TwinfieldConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(TwinfieldError::Io)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| TwinfieldError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 從環境變數建立配置
    pub fn from_env() -> Result<Self> {
        let cluster_url =
            env::var("TWINFIELD_CLUSTER_URL").map_err(|_| TwinfieldError::ConfigError {
                message: "TWINFIELD_CLUSTER_URL environment variable is required".to_string(),
            })?;

        let chunk_size = match env::var("TWINFIELD_CHUNK_SIZE") {
            Ok(value) => Some(value.parse::<usize>().map_err(|e| {
                TwinfieldError::InvalidConfigValueError {
                    field: "TWINFIELD_CHUNK_SIZE".to_string(),
                    value: value.clone(),
                    reason: e.to_string(),
                }
            })?),
            Err(_) => None,
        };

        Ok(Self {
            connection: ConnectionConfig {
                cluster_url,
                session_id: env::var("TWINFIELD_SESSION_ID").ok(),
                access_token: env::var("TWINFIELD_ACCESS_TOKEN").ok(),
                company_code: env::var("TWINFIELD_COMPANY_CODE").ok(),
            },
            request: Some(RequestConfig {
                chunk_size,
                ..RequestConfig::default()
            }),
            defaults: None,
        })
    }

    /// 替換環境變數 (例如 ${TWINFIELD_SESSION_ID})，未設定的保留原文
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| TwinfieldError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_url("connection.cluster_url", &self.connection.cluster_url)?;

        match (&self.connection.session_id, &self.connection.access_token) {
            (Some(_), Some(_)) => {
                return Err(TwinfieldError::ConfigValidationError {
                    field: "connection".to_string(),
                    message: "set either session_id or access_token, not both".to_string(),
                })
            }
            (None, None) => {
                return Err(TwinfieldError::MissingConfigError {
                    field: "connection.session_id or connection.access_token".to_string(),
                })
            }
            (Some(session_id), None) => {
                check_credential("connection.session_id", session_id)?;
            }
            (None, Some(access_token)) => {
                check_credential("connection.access_token", access_token)?;
                let company_code =
                    validate_required_field("connection.company_code", &self.connection.company_code)?;
                check_credential("connection.company_code", company_code)?;
            }
        }

        validate_positive_number("request.chunk_size", self.chunk_size(), 1)?;
        validate_range("request.timeout_seconds", self.timeout().as_secs(), 1, 600)?;

        if let Some(office) = self.defaults.as_ref().and_then(|d| d.office.as_deref()) {
            validate_non_empty_string("defaults.office", office)?;
        }

        Ok(())
    }

    pub fn cluster_url(&self) -> &str {
        &self.connection.cluster_url
    }

    pub fn credentials(&self) -> Result<Credentials> {
        let connection = &self.connection;
        if let Some(session_id) = &connection.session_id {
            return Ok(Credentials::Session {
                session_id: session_id.clone(),
            });
        }

        let access_token = validate_required_field("connection.access_token", &connection.access_token)?;
        let company_code = validate_required_field("connection.company_code", &connection.company_code)?;
        Ok(Credentials::AccessToken {
            access_token: access_token.clone(),
            company_code: company_code.clone(),
        })
    }

    fn request(&self) -> RequestConfig {
        self.request.clone().unwrap_or_default()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.request().timeout_seconds.unwrap_or(30))
    }

    pub fn retry_attempts(&self) -> u32 {
        self.request().retry_attempts.unwrap_or(0)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.request().retry_delay_seconds.unwrap_or(1))
    }

    pub fn chunk_size(&self) -> usize {
        self.request().chunk_size.unwrap_or(DEFAULT_CHUNK_SIZE)
    }

    /// 依配置建立 SOAP 傳輸客戶端
    pub fn build_client(&self) -> Result<SoapProcessXmlClient> {
        SoapProcessXmlClient::with_options(
            self.cluster_url(),
            self.credentials()?,
            self.timeout(),
            self.retry_attempts(),
            self.retry_delay(),
        )
    }

    /// 為缺少 office / destiny 的交易補上預設值
    pub fn apply_defaults(&self, transaction: &mut BankTransaction) {
        let Some(defaults) = &self.defaults else {
            return;
        };

        if transaction.office.is_none() {
            transaction.office = defaults.office.as_deref().map(Office::from_code);
        }
        if transaction.destiny.is_none() {
            transaction.destiny = defaults.destiny;
        }
    }
}

fn check_credential(field: &str, value: &str) -> Result<()> {
    validate_non_empty_string(field, value)?;
    if value.contains("${") {
        return Err(TwinfieldError::ConfigValidationError {
            field: field.to_string(),
            message: format!("unresolved environment variable in '{}'", value),
        });
    }
    Ok(())
}

impl Validate for TwinfieldConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
