use crate::utils::error::{Result, ToolError};

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_config_range(field_name: &str, value: usize, min: usize, max: usize) -> Result<()> {
    if value < min || value > max {
        return Err(ToolError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string<'a>(field_name: &str, value: &'a str) -> Result<&'a str> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolError::missing(field_name));
    }
    Ok(trimmed)
}

/// 解析使用者輸入的數字，拒絕 NaN 與無限大
pub fn parse_number(field_name: &str, raw: &str) -> Result<f64> {
    let trimmed = validate_non_empty_string(field_name, raw)?;
    // 允許千分位逗號，例如 "10,000"
    let cleaned: String = trimmed.chars().filter(|c| *c != ',' && *c != '_').collect();
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(ToolError::invalid_number(field_name, trimmed)),
    }
}

pub fn parse_integer(field_name: &str, raw: &str) -> Result<i64> {
    let trimmed = validate_non_empty_string(field_name, raw)?;
    trimmed
        .parse::<i64>()
        .map_err(|_| ToolError::invalid_number(field_name, trimmed))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(ToolError::out_of_range(
            field_name,
            value,
            format!("must be between {} and {}", min, max),
        ));
    }
    Ok(())
}

pub fn validate_positive(field_name: &str, value: f64) -> Result<()> {
    if value <= 0.0 {
        return Err(ToolError::out_of_range(field_name, value, "must be greater than 0"));
    }
    Ok(())
}

pub fn validate_non_negative(field_name: &str, value: f64) -> Result<()> {
    if value < 0.0 {
        return Err(ToolError::out_of_range(field_name, value, "cannot be negative"));
    }
    Ok(())
}

/// 計算結果溢位成 NaN 或無限大時視為超出範圍
pub fn validate_finite_result(field_name: &str, value: f64) -> Result<f64> {
    if !value.is_finite() {
        return Err(ToolError::out_of_range(
            field_name,
            value,
            "the result is too large to compute",
        ));
    }
    Ok(value)
}

/// 下拉選單欄位：比對時忽略大小寫
pub fn validate_choice<'a>(field_name: &str, value: &str, options: &[&'a str]) -> Result<&'a str> {
    let needle = value.trim();
    options
        .iter()
        .find(|opt| opt.eq_ignore_ascii_case(needle))
        .copied()
        .ok_or_else(|| {
            ToolError::invalid_input(
                field_name,
                needle,
                format!("expected one of: {}", options.join(", ")),
            )
        })
}
