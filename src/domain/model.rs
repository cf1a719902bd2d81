use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::utils::format::format_number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Unit,
    Numeral,
    Finance,
    Date,
    Text,
    Image,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::Unit,
        Category::Numeral,
        Category::Finance,
        Category::Date,
        Category::Text,
        Category::Image,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Unit => "unit",
            Category::Numeral => "numeral",
            Category::Finance => "finance",
            Category::Date => "date",
            Category::Text => "text",
            Category::Image => "image",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(raw.trim()))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToolDescriptor {
    pub id: String,
    pub name: String,
    pub category: Category,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "options", rename_all = "lowercase")]
pub enum FieldKind {
    Number,
    Text,
    Date,
    Select(Vec<String>),
    File,
}

/// 表單欄位定義
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldSpec {
    pub name: &'static str,
    pub label: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl FieldSpec {
    pub fn number(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Number,
            required: true,
        }
    }

    pub fn text(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Text,
            required: true,
        }
    }

    pub fn date(name: &'static str, label: &'static str) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Date,
            required: true,
        }
    }

    pub fn select<S: ToString>(name: &'static str, label: &'static str, options: &[S]) -> Self {
        Self {
            name,
            label,
            kind: FieldKind::Select(options.iter().map(ToString::to_string).collect()),
            required: true,
        }
    }

    pub fn file(label: &'static str) -> Self {
        Self {
            name: "file",
            label,
            kind: FieldKind::File,
            required: true,
        }
    }

    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }
}

/// 使用者選取的檔案
#[derive(Debug, Clone)]
pub struct FileInput {
    pub name: String,
    pub bytes: Vec<u8>,
}

impl FileInput {
    pub fn new(name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            bytes,
        }
    }

    /// 不含副檔名的檔名，用來命名下載檔
    pub fn stem(&self) -> &str {
        std::path::Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or("image")
    }
}

/// 一次表單送出的內容
#[derive(Debug, Clone, Default)]
pub struct ToolInput {
    fields: BTreeMap<String, String>,
    file: Option<FileInput>,
}

impl ToolInput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    pub fn with_file(mut self, file: FileInput) -> Self {
        self.file = Some(file);
        self
    }

    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.fields.insert(name.into(), value.into());
    }

    pub fn set_file(&mut self, file: FileInput) {
        self.file = Some(file);
    }

    /// 空白字串視同未填
    pub fn get(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.trim().is_empty())
    }

    pub fn file(&self) -> Option<&FileInput> {
        self.file.as_ref()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Number(f64),
    Integer(i64),
    Text(String),
}

impl Value {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number(v) => Some(*v),
            Value::Integer(v) => Some(*v as f64),
            Value::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn render(&self, precision: usize) -> String {
        match self {
            Value::Number(v) => format_number(*v, precision),
            Value::Integer(v) => v.to_string(),
            Value::Text(s) => s.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    pub label: String,
    pub value: Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ResultRow {
    pub fn number(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            value: Value::Number(value),
            unit: None,
        }
    }

    pub fn integer(label: impl Into<String>, value: i64) -> Self {
        Self {
            label: label.into(),
            value: Value::Integer(value),
            unit: None,
        }
    }

    pub fn text(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: Value::Text(value.into()),
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn render(&self, precision: usize) -> String {
        match &self.unit {
            Some(unit) => format!("{} {}", self.value.render(precision), unit),
            None => self.value.render(precision),
        }
    }
}

/// 可下載的產出檔案
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileArtifact {
    pub file_name: String,
    pub mime: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl FileArtifact {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    pub fn to_data_url(&self) -> String {
        crate::core::image_ops::to_data_url(&self.mime, &self.bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "result", rename_all = "lowercase")]
pub enum ToolOutput {
    Rows(Vec<ResultRow>),
    Text(String),
    File(FileArtifact),
}

impl ToolOutput {
    pub fn single(row: ResultRow) -> Self {
        ToolOutput::Rows(vec![row])
    }

    pub fn rows(&self) -> &[ResultRow] {
        match self {
            ToolOutput::Rows(rows) => rows,
            _ => &[],
        }
    }

    pub fn row(&self, label: &str) -> Option<&ResultRow> {
        self.rows().iter().find(|r| r.label == label)
    }

    /// 第一列的數值，多數換算工具只有一列
    pub fn primary_number(&self) -> Option<f64> {
        self.rows().first().and_then(|r| r.value.as_f64())
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolOutput::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_file(&self) -> Option<&FileArtifact> {
        match self {
            ToolOutput::File(f) => Some(f),
            _ => None,
        }
    }

    /// 單行摘要，批次報表使用
    pub fn summary(&self, precision: usize) -> String {
        match self {
            ToolOutput::Rows(rows) => rows
                .iter()
                .map(|r| format!("{}: {}", r.label, r.render(precision)))
                .collect::<Vec<_>>()
                .join("; "),
            ToolOutput::Text(text) => text.clone(),
            ToolOutput::File(file) => format!("{} ({} bytes)", file.file_name, file.bytes.len()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_read_as_missing() {
        let input = ToolInput::new().with("value", "   ").with("from", "meter");
        assert_eq!(input.get("value"), None);
        assert_eq!(input.get("from"), Some("meter"));
    }

    #[test]
    fn test_data_url() {
        let artifact = FileArtifact::new("a.txt", "text/plain", b"hi".to_vec());
        assert_eq!(artifact.to_data_url(), "data:text/plain;base64,aGk=");
    }

    #[test]
    fn test_output_summary() {
        let output = ToolOutput::Rows(vec![
            ResultRow::number("Result", 32.0).with_unit("°F"),
            ResultRow::text("Formula", "(0 × 9/5) + 32"),
        ]);
        assert_eq!(output.summary(2), "Result: 32 °F; Formula: (0 × 9/5) + 32");
        assert_eq!(output.primary_number(), Some(32.0));
    }

    #[test]
    fn test_file_stem() {
        assert_eq!(FileInput::new("photos/cat.png", vec![]).stem(), "cat");
        assert_eq!(FileInput::new("", vec![]).stem(), "image");
    }
}
