use thiserror::Error;

#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Missing required input: {field}")]
    MissingInputError { field: String },

    #[error("Invalid number for {field}: '{value}'")]
    InvalidNumberError { field: String, value: String },

    #[error("Value out of range for {field}: {value} ({reason})")]
    OutOfRangeError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid input for {field}: '{value}' ({reason})")]
    InvalidInputError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {quantity} unit: '{unit}'")]
    UnknownUnitError { quantity: String, unit: String },

    #[error("Unknown tool: '{id}'")]
    UnknownToolError { id: String },

    #[error("Unsupported file: {reason}")]
    UnsupportedFileError { reason: String },

    #[error("Image processing error: {0}")]
    ImageError(#[from] image::ImageError),

    #[error("Base64 decode error: {0}")]
    Base64Error(#[from] base64::DecodeError),

    #[error("Zip operation failed: {0}")]
    ZipError(#[from] zip::result::ZipError),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Configuration validation error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid configuration value for {field}: '{value}' ({reason})")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

pub type Result<T> = std::result::Result<T, ToolError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// 使用者輸入問題 (缺漏、非數字、超出範圍)
    Input,
    /// 檔案無法讀取或解碼
    File,
    /// 執行環境或系統資源
    System,
    Config,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ToolError {
    pub fn missing(field: &str) -> Self {
        Self::MissingInputError {
            field: field.to_string(),
        }
    }

    pub fn invalid_number(field: &str, value: &str) -> Self {
        Self::InvalidNumberError {
            field: field.to_string(),
            value: value.to_string(),
        }
    }

    pub fn out_of_range(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::OutOfRangeError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn invalid_input(field: &str, value: impl ToString, reason: impl Into<String>) -> Self {
        Self::InvalidInputError {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.into(),
        }
    }

    pub fn unsupported_file(reason: impl Into<String>) -> Self {
        Self::UnsupportedFileError {
            reason: reason.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::MissingInputError { .. }
            | Self::InvalidNumberError { .. }
            | Self::OutOfRangeError { .. }
            | Self::InvalidInputError { .. }
            | Self::UnknownUnitError { .. }
            | Self::UnknownToolError { .. }
            | Self::Base64Error(_)
            | Self::CsvError(_)
            | Self::SerializationError(_) => ErrorCategory::Input,
            Self::UnsupportedFileError { .. } | Self::ImageError(_) => ErrorCategory::File,
            Self::ZipError(_) | Self::IoError(_) => ErrorCategory::System,
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => ErrorCategory::Config,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Medium,
            ErrorCategory::File => ErrorSeverity::High,
            ErrorCategory::System | ErrorCategory::Config => ErrorSeverity::Critical,
        }
    }

    /// 給使用者看的提示訊息
    pub fn user_friendly_message(&self) -> String {
        match self {
            Self::MissingInputError { field } => format!("Please enter a value for '{}'", field),
            Self::InvalidNumberError { field, value } => {
                format!("'{}' is not a valid number for '{}'", value, field)
            }
            Self::OutOfRangeError {
                field,
                value,
                reason,
            } => format!("{} is out of range for '{}': {}", value, field, reason),
            Self::InvalidInputError { field, reason, .. } => {
                format!("Invalid value for '{}': {}", field, reason)
            }
            Self::UnknownUnitError { quantity, unit } => {
                format!("'{}' is not a known {} unit", unit, quantity)
            }
            Self::UnknownToolError { id } => format!("There is no tool called '{}'", id),
            Self::UnsupportedFileError { reason } => {
                format!("This file cannot be processed: {}", reason)
            }
            Self::ImageError(e) => format!("The image could not be processed: {}", e),
            Self::Base64Error(e) => format!("The text is not valid Base64: {}", e),
            Self::CsvError(e) => format!("The CSV input could not be read: {}", e),
            Self::SerializationError(e) => format!("The JSON input could not be read: {}", e),
            Self::ZipError(e) => format!("Failed to build the archive: {}", e),
            Self::IoError(e) => format!("File system error: {}", e),
            Self::ConfigError { message } => format!("Configuration problem: {}", message),
            Self::ConfigValidationError { field, message } => {
                format!("Configuration problem in '{}': {}", field, message)
            }
            Self::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            Self::MissingInputError { field } => {
                format!("Pass the field with `-i {}=<value>`", field)
            }
            Self::InvalidNumberError { .. } => {
                "Use plain decimal notation such as 42 or 3.14".to_string()
            }
            Self::OutOfRangeError { .. } => "Adjust the value to the allowed range".to_string(),
            Self::InvalidInputError { .. } => {
                "Check the input format and try again".to_string()
            }
            Self::UnknownUnitError { .. } => {
                "Run `describe <tool>` to see the supported units".to_string()
            }
            Self::UnknownToolError { .. } => "Run `list` to see available tools".to_string(),
            Self::UnsupportedFileError { .. } | Self::ImageError(_) => {
                "Use a PNG, JPEG, WebP, BMP or ICO image".to_string()
            }
            Self::Base64Error(_) => "Remove any data URL prefix or stray characters".to_string(),
            Self::CsvError(_) => "Make sure every row has the same number of columns".to_string(),
            Self::SerializationError(_) => "Validate the JSON syntax".to_string(),
            Self::ZipError(_) | Self::IoError(_) => {
                "Check that the output directory is writable".to_string()
            }
            Self::ConfigError { .. }
            | Self::ConfigValidationError { .. }
            | Self::InvalidConfigValueError { .. } => {
                "Review the TOML configuration file".to_string()
            }
        }
    }
}
