//! 表單欄位的讀取與驗證，以及以函式指標組成的通用工具。

use crate::domain::model::{Category, FieldKind, FieldSpec, FileInput, ToolDescriptor, ToolInput, ToolOutput};
use crate::domain::ports::Tool;
use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{parse_integer, parse_number, validate_choice};

pub fn descriptor(id: &str, name: &str, category: Category, description: &str) -> ToolDescriptor {
    ToolDescriptor {
        id: id.to_string(),
        name: name.to_string(),
        category,
        description: description.to_string(),
    }
}

/// 計算前先擋下缺漏的必填欄位
pub fn check_required(fields: &[FieldSpec], input: &ToolInput) -> Result<()> {
    for field in fields.iter().filter(|f| f.required) {
        let present = match field.kind {
            FieldKind::File => input.file().is_some(),
            _ => input.get(field.name).is_some(),
        };
        if !present {
            return Err(ToolError::missing(field.name));
        }
    }
    Ok(())
}

pub fn required<'a>(input: &'a ToolInput, field: &str) -> Result<&'a str> {
    input.get(field).ok_or_else(|| ToolError::missing(field))
}

pub fn number(input: &ToolInput, field: &str) -> Result<f64> {
    parse_number(field, required(input, field)?)
}

pub fn integer(input: &ToolInput, field: &str) -> Result<i64> {
    parse_integer(field, required(input, field)?)
}

pub fn optional_integer(input: &ToolInput, field: &str, default: i64) -> Result<i64> {
    match input.get(field) {
        Some(raw) => parse_integer(field, raw),
        None => Ok(default),
    }
}

/// 像素等非負整數欄位
pub fn optional_pixels(input: &ToolInput, field: &str) -> Result<Option<u32>> {
    match input.get(field) {
        Some(raw) => {
            let value = parse_integer(field, raw)?;
            u32::try_from(value)
                .map(Some)
                .map_err(|_| ToolError::out_of_range(field, value, "must be a non-negative whole number"))
        }
        None => Ok(None),
    }
}

pub fn pixels(input: &ToolInput, field: &str) -> Result<u32> {
    optional_pixels(input, field)?.ok_or_else(|| ToolError::missing(field))
}

pub fn choice(
    input: &ToolInput,
    field: &str,
    options: &[&'static str],
    default: Option<&'static str>,
) -> Result<&'static str> {
    match (input.get(field), default) {
        (Some(raw), _) => validate_choice(field, raw, options),
        (None, Some(d)) => Ok(d),
        (None, None) => Err(ToolError::missing(field)),
    }
}

pub fn file(input: &ToolInput) -> Result<&FileInput> {
    input.file().ok_or_else(|| ToolError::missing("file"))
}

/// 大多數工具的形狀：固定描述、固定欄位、一個計算函式
pub struct FormTool {
    pub id: &'static str,
    pub name: &'static str,
    pub category: Category,
    pub description: &'static str,
    pub fields: fn() -> Vec<FieldSpec>,
    pub compute: fn(&ToolInput) -> Result<ToolOutput>,
}

impl Tool for FormTool {
    fn descriptor(&self) -> ToolDescriptor {
        descriptor(self.id, self.name, self.category, self.description)
    }

    fn fields(&self) -> Vec<FieldSpec> {
        (self.fields)()
    }

    fn run(&self, input: &ToolInput) -> Result<ToolOutput> {
        check_required(&(self.fields)(), input)?;
        (self.compute)(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_check_required() {
        let fields = vec![
            FieldSpec::number("value", "Value"),
            FieldSpec::text("note", "Note").optional(),
        ];
        assert!(check_required(&fields, &ToolInput::new().with("value", "1")).is_ok());
        assert!(matches!(
            check_required(&fields, &ToolInput::new().with("note", "x")),
            Err(ToolError::MissingInputError { field }) if field == "value"
        ));
    }

    #[test]
    fn test_choice_default() {
        let input = ToolInput::new();
        assert_eq!(choice(&input, "mode", &["a", "b"], Some("a")).unwrap(), "a");
        assert!(choice(&input, "mode", &["a", "b"], None).is_err());
    }

    #[test]
    fn test_pixels_rejects_negative() {
        let input = ToolInput::new().with("x", "-4");
        assert!(matches!(
            pixels(&input, "x"),
            Err(ToolError::OutOfRangeError { .. })
        ));
    }
}
