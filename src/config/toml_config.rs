use crate::core::image_ops::OutputFormat;
use crate::domain::model::{FileInput, ToolInput};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{validate_config_range, validate_path, Validate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub const DEFAULT_OUTPUT_PATH: &str = "./output";
pub const DEFAULT_PRECISION: usize = 6;
pub const MAX_PRECISION: usize = 12;
/// 沿用來源圖片的格式
pub const AUTO_IMAGE_FORMAT: &str = "auto";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub output: OutputConfig,
    pub logging: Option<LoggingConfig>,
    #[serde(default)]
    pub jobs: Vec<ToolJob>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_directory")]
    pub directory: String,
    #[serde(default = "default_precision")]
    pub precision: usize,
    #[serde(default = "default_image_format")]
    pub image_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: default_directory(),
            precision: default_precision(),
            image_format: default_image_format(),
        }
    }
}

fn default_directory() -> String {
    DEFAULT_OUTPUT_PATH.to_string()
}

fn default_precision() -> usize {
    DEFAULT_PRECISION
}

fn default_image_format() -> String {
    AUTO_IMAGE_FORMAT.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// 批次日誌輸出成 JSON
    pub json: Option<bool>,
}

/// 批次設定中的一個工作：工具 id、欄位值，以及選填的輸入檔
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolJob {
    pub name: Option<String>,
    pub tool: String,
    #[serde(default)]
    pub inputs: BTreeMap<String, toml::Value>,
    pub file: Option<String>,
}

impl ToolJob {
    pub fn display_name(&self, index: usize) -> String {
        match &self.name {
            Some(name) if !name.trim().is_empty() => name.trim().to_string(),
            _ => format!("job-{}-{}", index + 1, self.tool),
        }
    }

    /// TOML 的數字與布林值一律轉成表單字串
    pub fn to_input(&self, file: Option<FileInput>) -> ToolInput {
        let mut input = ToolInput::new();
        for (key, value) in &self.inputs {
            let text = match value {
                toml::Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            input.set(key.clone(), text);
        }
        if let Some(file) = file {
            input.set_file(file);
        }
        input
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ToolError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| ToolError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${OUTPUT_DIR})，未設定的保留原字串
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| ToolError::ConfigError {
            message: format!("invalid substitution pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validate_path("output.directory", &self.output.directory)?;
        validate_config_range("output.precision", self.output.precision, 0, MAX_PRECISION)?;
        validate_image_format("output.image_format", &self.output.image_format)?;

        if let Some(level) = self.logging.as_ref().and_then(|l| l.level.as_deref()) {
            let valid_levels = ["trace", "debug", "info", "warn", "error"];
            if !valid_levels.contains(&level.to_ascii_lowercase().as_str()) {
                return Err(ToolError::InvalidConfigValueError {
                    field: "logging.level".to_string(),
                    value: level.to_string(),
                    reason: format!("Valid levels: {}", valid_levels.join(", ")),
                });
            }
        }

        for (index, job) in self.jobs.iter().enumerate() {
            if job.tool.trim().is_empty() {
                return Err(ToolError::ConfigValidationError {
                    field: format!("jobs[{}].tool", index),
                    message: "tool id cannot be empty".to_string(),
                });
            }
            if let Some(file) = &job.file {
                validate_path(&format!("jobs[{}].file", index), file)?;
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> Option<&str> {
        self.logging.as_ref().and_then(|l| l.level.as_deref())
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.json).unwrap_or(false)
    }
}

/// `auto` 或任一可輸出的圖片格式
pub fn validate_image_format(field: &str, value: &str) -> Result<()> {
    if value.eq_ignore_ascii_case(AUTO_IMAGE_FORMAT) || OutputFormat::parse(value).is_some() {
        return Ok(());
    }
    Err(ToolError::InvalidConfigValueError {
        field: field.to_string(),
        value: value.to_string(),
        reason: format!(
            "Unsupported format. Valid formats: {}, {}",
            AUTO_IMAGE_FORMAT,
            OutputFormat::OPTIONS.join(", ")
        ),
    })
}

impl ConfigProvider for TomlConfig {
    fn output_path(&self) -> &str {
        &self.output.directory
    }

    fn precision(&self) -> usize {
        self.output.precision
    }

    fn default_image_format(&self) -> &str {
        &self.output.image_format
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_batch_config() {
        let toml_content = r#"
[output]
directory = "./test-output"
precision = 2

[[jobs]]
name = "marathon"
tool = "length-converter"
inputs = { value = 42.195, from = "kilometer", to = "mile" }

[[jobs]]
tool = "image-grayscale"
file = "logo.png"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.output_path(), "./test-output");
        assert_eq!(config.precision(), 2);
        assert_eq!(config.default_image_format(), "auto");
        assert_eq!(config.jobs.len(), 2);
        assert_eq!(config.jobs[0].display_name(0), "marathon");
        assert_eq!(config.jobs[1].display_name(1), "job-2-image-grayscale");

        let input = config.jobs[0].to_input(None);
        assert_eq!(input.get("value"), Some("42.195"));
        assert_eq!(input.get("to"), Some("mile"));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_without_output_section() {
        let config = TomlConfig::from_toml_str("").unwrap();
        assert_eq!(config.output_path(), DEFAULT_OUTPUT_PATH);
        assert_eq!(config.precision(), DEFAULT_PRECISION);
        assert!(config.jobs.is_empty());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SMALL_TOOLKIT_TEST_OUT", "/tmp/toolkit-out");

        let toml_content = r#"
[output]
directory = "${SMALL_TOOLKIT_TEST_OUT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.output.directory, "/tmp/toolkit-out");

        std::env::remove_var("SMALL_TOOLKIT_TEST_OUT");
    }

    #[test]
    fn test_config_validation() {
        let config = TomlConfig::from_toml_str("[output]\nprecision = 40\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ToolError::InvalidConfigValueError { .. })
        ));

        let config = TomlConfig::from_toml_str("[output]\nimage_format = \"tiff\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[logging]\nlevel = \"loud\"\n").unwrap();
        assert!(config.validate().is_err());

        let config = TomlConfig::from_toml_str("[[jobs]]\ntool = \" \"\n").unwrap();
        assert!(matches!(
            config.validate(),
            Err(ToolError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_invalid_toml_is_config_error() {
        assert!(matches!(
            TomlConfig::from_toml_str("[output\n"),
            Err(ToolError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[output]
directory = "./file-output"
image_format = "webp"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.output_path(), "./file-output");
        assert_eq!(config.default_image_format(), "webp");
    }
}
