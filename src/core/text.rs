use base64::{engine::general_purpose::STANDARD, Engine};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::{Map, Value};
use url::Url;

use crate::utils::error::{Result, ToolError};

// 與 encodeURIComponent 相同：保留 A-Z a-z 0-9 - _ . ! ~ * ' ( )
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

pub fn base64_encode(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// 忽略換行與空白，方便貼上分行的 Base64
pub fn base64_decode(text: &str) -> Result<Vec<u8>> {
    let compact: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return Err(ToolError::missing("text"));
    }
    Ok(STANDARD.decode(compact)?)
}

pub fn url_encode(text: &str) -> String {
    utf8_percent_encode(text, URI_COMPONENT).to_string()
}

/// 與 decodeURIComponent 相同：+ 保持原樣，% 後必須接兩個十六進位數字
pub fn url_decode(text: &str) -> Result<String> {
    let bytes = text.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        if *b != b'%' {
            continue;
        }
        let escape = bytes.get(i + 1..i + 3);
        if !escape.is_some_and(|hex| hex.iter().all(u8::is_ascii_hexdigit)) {
            return Err(ToolError::invalid_input(
                "text",
                text,
                format!("malformed escape at position {}", i),
            ));
        }
    }

    percent_decode_str(text)
        .decode_utf8()
        .map(|s| s.into_owned())
        .map_err(|_| ToolError::invalid_input("text", text, "decoded bytes are not valid UTF-8"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextCase {
    Upper,
    Lower,
    Title,
    Sentence,
}

impl TextCase {
    pub const OPTIONS: [&'static str; 4] = ["upper", "lower", "title", "sentence"];

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "upper" | "uppercase" => Some(TextCase::Upper),
            "lower" | "lowercase" => Some(TextCase::Lower),
            "title" | "titlecase" => Some(TextCase::Title),
            "sentence" | "sentencecase" => Some(TextCase::Sentence),
            _ => None,
        }
    }
}

pub fn convert_case(text: &str, case: TextCase) -> String {
    match case {
        TextCase::Upper => text.to_uppercase(),
        TextCase::Lower => text.to_lowercase(),
        TextCase::Title => {
            let mut out = String::with_capacity(text.len());
            let mut at_word_start = true;
            for c in text.chars() {
                if c.is_alphanumeric() || c == '\'' {
                    if at_word_start {
                        out.extend(c.to_uppercase());
                    } else {
                        out.extend(c.to_lowercase());
                    }
                    at_word_start = false;
                } else {
                    out.push(c);
                    at_word_start = true;
                }
            }
            out
        }
        TextCase::Sentence => {
            let mut out = String::with_capacity(text.len());
            let mut capitalize = true;
            for c in text.chars() {
                if capitalize && c.is_alphabetic() {
                    out.extend(c.to_uppercase());
                    capitalize = false;
                } else {
                    out.extend(c.to_lowercase());
                }
                if matches!(c, '.' | '!' | '?') {
                    capitalize = true;
                }
            }
            out
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextStats {
    pub characters: usize,
    pub characters_no_spaces: usize,
    pub words: usize,
    pub sentences: usize,
    pub paragraphs: usize,
}

pub fn word_count(text: &str) -> TextStats {
    let sentences = text
        .split(|c: char| matches!(c, '.' | '!' | '?'))
        .filter(|s| s.chars().any(char::is_alphanumeric))
        .count();
    let paragraphs = text
        .split("\n\n")
        .filter(|p| !p.trim().is_empty())
        .count();

    TextStats {
        characters: text.chars().count(),
        characters_no_spaces: text.chars().filter(|c| !c.is_whitespace()).count(),
        words: text.split_whitespace().count(),
        sentences,
        paragraphs,
    }
}

/// 第一列為欄位名稱，其餘每列轉成一個 JSON 物件
pub fn csv_to_json(csv_text: &str) -> Result<Value> {
    if csv_text.trim().is_empty() {
        return Err(ToolError::missing("csv"));
    }

    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(csv_text.as_bytes());
    let headers = reader.headers()?.clone();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut obj = Map::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            obj.insert(header.to_string(), Value::String(field.to_string()));
        }
        rows.push(Value::Object(obj));
    }
    Ok(Value::Array(rows))
}

/// 欄位為所有物件鍵的聯集，依首次出現順序排列
pub fn json_to_csv(json_text: &str) -> Result<String> {
    if json_text.trim().is_empty() {
        return Err(ToolError::missing("json"));
    }

    let parsed: Value = serde_json::from_str(json_text)?;
    let items = match parsed {
        Value::Array(items) => items,
        obj @ Value::Object(_) => vec![obj],
        _ => {
            return Err(ToolError::invalid_input(
                "json",
                "(document)",
                "expected an array of objects",
            ))
        }
    };

    let mut headers: Vec<String> = Vec::new();
    for item in &items {
        let obj = item.as_object().ok_or_else(|| {
            ToolError::invalid_input("json", item, "every array element must be an object")
        })?;
        for key in obj.keys() {
            if !headers.contains(key) {
                headers.push(key.clone());
            }
        }
    }

    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(&headers)?;
    for item in &items {
        let row: Vec<String> = headers
            .iter()
            .map(|h| match item.get(h) {
                None | Some(Value::Null) => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => other.to_string(),
            })
            .collect();
        writer.write_record(&row)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ToolError::IoError(e.into_error()))?;
    String::from_utf8(bytes).map_err(|_| ToolError::invalid_input("json", "(document)", "output is not UTF-8"))
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlParts {
    pub scheme: String,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub fragment: Option<String>,
}

pub fn parse_url(raw: &str) -> Result<UrlParts> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToolError::missing("url"));
    }
    let url = Url::parse(trimmed)
        .map_err(|e| ToolError::invalid_input("url", trimmed, format!("invalid URL: {}", e)))?;

    Ok(UrlParts {
        scheme: url.scheme().to_string(),
        host: url.host_str().map(str::to_string),
        port: url.port_or_known_default(),
        path: url.path().to_string(),
        query: url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect(),
        fragment: url.fragment().map(str::to_string),
    })
}

pub fn format_json(json_text: &str, minify: bool) -> Result<String> {
    if json_text.trim().is_empty() {
        return Err(ToolError::missing("json"));
    }
    let parsed: Value = serde_json::from_str(json_text)?;
    if minify {
        Ok(serde_json::to_string(&parsed)?)
    } else {
        Ok(serde_json::to_string_pretty(&parsed)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64() {
        assert_eq!(base64_encode(b"hello world"), "aGVsbG8gd29ybGQ=");
        assert_eq!(base64_decode("aGVsbG8g\nd29ybGQ=").unwrap(), b"hello world");
        assert!(matches!(base64_decode("***"), Err(ToolError::Base64Error(_))));
        assert!(matches!(base64_decode(" "), Err(ToolError::MissingInputError { .. })));
    }

    #[test]
    fn test_url_component() {
        assert_eq!(url_encode("a b&c=d/é"), "a%20b%26c%3Dd%2F%C3%A9");
        assert_eq!(url_encode("keep-_.!~*'()"), "keep-_.!~*'()");
        assert_eq!(url_decode("a%20b%C3%A9").unwrap(), "a bé");
        assert_eq!(url_decode("1+1%3D2").unwrap(), "1+1=2");
        assert!(url_decode("%FF").is_err());
    }

    #[test]
    fn test_url_decode_rejects_malformed_escape() {
        for bad in ["100%", "%2", "%zz", "a%G1b"] {
            assert!(
                matches!(url_decode(bad), Err(ToolError::InvalidInputError { .. })),
                "accepted {}",
                bad
            );
        }
    }

    #[test]
    fn test_case_conversion() {
        assert_eq!(convert_case("hello WORLD", TextCase::Upper), "HELLO WORLD");
        assert_eq!(convert_case("hello WORLD", TextCase::Title), "Hello World");
        assert_eq!(
            convert_case("first one. SECOND one! third", TextCase::Sentence),
            "First one. Second one! Third"
        );
        assert_eq!(TextCase::parse("Lowercase"), Some(TextCase::Lower));
        assert_eq!(TextCase::parse("camel"), None);
    }

    #[test]
    fn test_word_count() {
        let stats = word_count("One two three. Four five!\n\nNew paragraph here");
        assert_eq!(stats.words, 8);
        assert_eq!(stats.sentences, 3);
        assert_eq!(stats.paragraphs, 2);
        assert_eq!(word_count(""), TextStats::default());
    }

    #[test]
    fn test_csv_json() {
        let json = csv_to_json("name, age\nAda, 36\nAlan, 41\n").unwrap();
        assert_eq!(json[0]["name"], "Ada");
        assert_eq!(json[1]["age"], "41");

        let csv_text = json_to_csv(r#"[{"a":1,"b":"x"},{"b":"y","c":true}]"#).unwrap();
        assert_eq!(csv_text, "a,b,c\n1,x,\n,y,true\n");
        assert!(json_to_csv("[1, 2]").is_err());
        assert!(json_to_csv("{not json").is_err());
    }

    #[test]
    fn test_parse_url() {
        let parts = parse_url("https://example.com/a/b?q=rust&page=2#top").unwrap();
        assert_eq!(parts.scheme, "https");
        assert_eq!(parts.host.as_deref(), Some("example.com"));
        assert_eq!(parts.port, Some(443));
        assert_eq!(parts.path, "/a/b");
        assert_eq!(parts.query[1], ("page".to_string(), "2".to_string()));
        assert_eq!(parts.fragment.as_deref(), Some("top"));
        assert!(parse_url("not a url").is_err());
    }

    #[test]
    fn test_format_json() {
        assert_eq!(format_json("{ \"a\" : [1, 2] }", true).unwrap(), r#"{"a":[1,2]}"#);
        assert!(format_json("{ \"a\" : [1, 2] }", false).unwrap().contains("\n"));
    }
}
