use crate::config::toml_config::{
    validate_image_format, TomlConfig, AUTO_IMAGE_FORMAT, DEFAULT_OUTPUT_PATH, DEFAULT_PRECISION,
    MAX_PRECISION,
};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_config_range, validate_path, Validate};
use clap::{Parser, Subcommand};

#[derive(Debug, Clone, Parser)]
#[command(name = "small-toolkit")]
#[command(about = "Unit converters, calculators, encoders and image tools")]
pub struct CliConfig {
    /// TOML settings file; command-line flags take precedence
    #[arg(long, global = true)]
    pub config: Option<String>,

    #[arg(long, global = true, help = "Directory for generated files [default: ./output]")]
    pub output_path: Option<String>,

    #[arg(long, global = true, help = "Decimal places shown for numeric results [default: 6]")]
    pub precision: Option<usize>,

    #[arg(long, global = true, help = "Default image output format, or 'auto' to keep the source format")]
    pub image_format: Option<String>,

    #[arg(long, global = true, help = "Print results as JSON")]
    pub json: bool,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// List the available tools
    List {
        /// unit, numeral, finance, date, text or image
        #[arg(long)]
        category: Option<String>,
    },
    /// Show the form fields of one tool
    Describe { tool: String },
    /// Run one tool
    Run {
        tool: String,

        /// Form field as key=value, repeatable
        #[arg(short = 'i', long = "input", value_parser = parse_key_value)]
        inputs: Vec<(String, String)>,

        /// Image or other file for tools with a file field
        #[arg(long)]
        file: Option<String>,

        /// Also write text and row results to the output directory
        #[arg(long)]
        save: bool,

        /// Print file results as a data URL instead of writing them
        #[arg(long)]
        data_url: bool,
    },
}

fn parse_key_value(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", raw))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing field name in '{}'", raw));
    }
    Ok((key.to_string(), value.to_string()))
}

impl CliConfig {
    /// 命令列未指定的設定才採用 TOML 的值
    pub fn merge_toml(&mut self, toml: &TomlConfig) {
        if self.output_path.is_none() {
            self.output_path = Some(toml.output.directory.clone());
        }
        if self.precision.is_none() {
            self.precision = Some(toml.output.precision);
        }
        if self.image_format.is_none() {
            self.image_format = Some(toml.output.image_format.clone());
        }
    }
}

impl ConfigProvider for CliConfig {
    fn output_path(&self) -> &str {
        self.output_path.as_deref().unwrap_or(DEFAULT_OUTPUT_PATH)
    }

    fn precision(&self) -> usize {
        self.precision.unwrap_or(DEFAULT_PRECISION)
    }

    fn default_image_format(&self) -> &str {
        self.image_format.as_deref().unwrap_or(AUTO_IMAGE_FORMAT)
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("output_path", self.output_path())?;
        validate_config_range("precision", self.precision(), 0, MAX_PRECISION)?;
        validate_image_format("image_format", self.default_image_format())?;
        if let Some(path) = &self.config {
            validate_path("config", path)?;
        }
        if let Command::Run { file: Some(file), .. } = &self.command {
            validate_path("file", file)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_run_command() {
        let config = CliConfig::try_parse_from([
            "small-toolkit",
            "--precision",
            "3",
            "run",
            "length-converter",
            "-i",
            "value=100",
            "-i",
            "from=meter",
            "--input",
            "to=ft",
        ])
        .unwrap();

        assert_eq!(config.precision(), 3);
        match config.command {
            Command::Run { tool, inputs, save, .. } => {
                assert_eq!(tool, "length-converter");
                assert_eq!(inputs.len(), 3);
                assert_eq!(inputs[2], ("to".to_string(), "ft".to_string()));
                assert!(!save);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_rejects_malformed_input_pair() {
        assert!(CliConfig::try_parse_from(["small-toolkit", "run", "x", "-i", "novalue"]).is_err());
        assert!(parse_key_value("=1").is_err());
        assert_eq!(
            parse_key_value("expr=a=b").unwrap(),
            ("expr".to_string(), "a=b".to_string())
        );
    }

    #[test]
    fn test_flags_override_toml() {
        let mut config =
            CliConfig::try_parse_from(["small-toolkit", "--precision", "2", "list"]).unwrap();
        let toml = TomlConfig::from_toml_str(
            "[output]\ndirectory = \"./from-toml\"\nprecision = 8\nimage_format = \"png\"\n",
        )
        .unwrap();
        config.merge_toml(&toml);

        assert_eq!(config.precision(), 2);
        assert_eq!(config.output_path(), "./from-toml");
        assert_eq!(config.default_image_format(), "png");
    }

    #[test]
    fn test_validation() {
        let config = CliConfig::try_parse_from(["small-toolkit", "--precision", "99", "list"]).unwrap();
        assert!(config.validate().is_err());

        let config = CliConfig::try_parse_from(["small-toolkit", "--image-format", "gif", "list"]).unwrap();
        assert!(config.validate().is_err());

        let config = CliConfig::try_parse_from(["small-toolkit", "describe", "bmi-calculator"]).unwrap();
        assert!(config.validate().is_ok());
    }
}
