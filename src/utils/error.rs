use thiserror::Error;

#[derive(Error, Debug)]
pub enum TwinfieldError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unexpected HTTP status {status}: {body}")]
    HttpStatus { status: u16, body: String },

    #[error("SOAP fault {code}: {message}")]
    SoapFault { code: String, message: String },

    #[error("Missing required element: {0}")]
    MissingElement(String),

    #[error("Invalid value for element '{element}': {message}")]
    InvalidValue { element: String, message: String },

    #[error("{}", rejection_message(.messages))]
    Rejected { messages: Vec<String> },

    #[error("Response contains {actual} items, expected {expected}")]
    ResponseMismatch { expected: usize, actual: usize },

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

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

fn rejection_message(messages: &[String]) -> String {
    if messages.is_empty() {
        "Twinfield rejected the item without an error message".to_string()
    } else {
        messages.join(", ")
    }
}

pub type Result<T> = std::result::Result<T, TwinfieldError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Protocol,
    Data,
    Rejection,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl TwinfieldError {
    pub fn invalid_value(element: &str, message: impl Into<String>) -> Self {
        TwinfieldError::InvalidValue {
            element: element.to_string(),
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            TwinfieldError::Http(_) | TwinfieldError::HttpStatus { .. } => ErrorCategory::Network,
            TwinfieldError::SoapFault { .. }
            | TwinfieldError::Xml(_)
            | TwinfieldError::ResponseMismatch { .. } => ErrorCategory::Protocol,
            TwinfieldError::MissingElement(_)
            | TwinfieldError::InvalidValue { .. }
            | TwinfieldError::Serialization(_) => ErrorCategory::Data,
            TwinfieldError::Rejected { .. } => ErrorCategory::Rejection,
            TwinfieldError::ConfigError { .. }
            | TwinfieldError::MissingConfigError { .. }
            | TwinfieldError::InvalidConfigValueError { .. }
            | TwinfieldError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            TwinfieldError::Io(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Rejection => ErrorSeverity::Medium,
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Protocol | ErrorCategory::Data => ErrorSeverity::High,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// 給終端使用者看的簡短訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            TwinfieldError::Http(_) => "Could not reach Twinfield".to_string(),
            TwinfieldError::HttpStatus { status, .. } => {
                format!("Twinfield answered with HTTP status {}", status)
            }
            TwinfieldError::SoapFault { message, .. } => {
                format!("Twinfield refused the request: {}", message)
            }
            TwinfieldError::Rejected { .. } => format!("Twinfield rejected the item: {}", self),
            TwinfieldError::ResponseMismatch { .. } => {
                "Twinfield returned a response that does not match the request".to_string()
            }
            TwinfieldError::Xml(_)
            | TwinfieldError::MissingElement(_)
            | TwinfieldError::InvalidValue { .. } => {
                format!("Could not read the Twinfield response: {}", self)
            }
            TwinfieldError::Serialization(e) => format!("Invalid input data: {}", e),
            TwinfieldError::Io(e) => format!("File error: {}", e),
            _ => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the cluster URL and network connection, then retry",
            ErrorCategory::Protocol => {
                "Check that the session or access token is still valid and the cluster URL is correct"
            }
            ErrorCategory::Data => "Check the input data against the Twinfield bank transaction schema",
            ErrorCategory::Rejection => "Fix the rejected transaction and send it again",
            ErrorCategory::Configuration => "Check the configuration file and environment variables",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}
