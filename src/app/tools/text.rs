use crate::app::tools::form::{choice, required, FormTool};
use crate::core::registry::ToolRegistry;
use crate::core::text::{self, TextCase};
use crate::domain::model::{Category, FieldSpec, ResultRow, ToolInput, ToolOutput};
use crate::utils::error::{Result, ToolError};

fn base64_encode(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(text::base64_encode(required(input, "text")?.as_bytes())))
}

fn base64_decode(input: &ToolInput) -> Result<ToolOutput> {
    let raw = required(input, "text")?;
    let bytes = text::base64_decode(raw)?;
    let decoded = String::from_utf8(bytes).map_err(|_| {
        ToolError::invalid_input("text", raw.trim(), "decoded data is binary, not text")
    })?;
    Ok(ToolOutput::Text(decoded))
}

fn url_encode(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(text::url_encode(required(input, "text")?)))
}

fn url_decode(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(text::url_decode(required(input, "text")?)?))
}

fn case_converter(input: &ToolInput) -> Result<ToolOutput> {
    let selected = choice(input, "case", &TextCase::OPTIONS, None)?;
    let case = TextCase::parse(selected)
        .ok_or_else(|| ToolError::invalid_input("case", selected, "unknown case"))?;
    Ok(ToolOutput::Text(text::convert_case(required(input, "text")?, case)))
}

fn word_counter(input: &ToolInput) -> Result<ToolOutput> {
    let stats = text::word_count(required(input, "text")?);
    Ok(ToolOutput::Rows(vec![
        ResultRow::integer("Words", stats.words as i64),
        ResultRow::integer("Characters", stats.characters as i64),
        ResultRow::integer("Characters (no spaces)", stats.characters_no_spaces as i64),
        ResultRow::integer("Sentences", stats.sentences as i64),
        ResultRow::integer("Paragraphs", stats.paragraphs as i64),
    ]))
}

fn csv_to_json(input: &ToolInput) -> Result<ToolOutput> {
    let json = text::csv_to_json(required(input, "csv")?)?;
    Ok(ToolOutput::Text(serde_json::to_string_pretty(&json)?))
}

fn json_to_csv(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(text::json_to_csv(required(input, "json")?)?))
}

fn url_parser(input: &ToolInput) -> Result<ToolOutput> {
    let parts = text::parse_url(required(input, "url")?)?;

    let mut rows = vec![ResultRow::text("Scheme", parts.scheme)];
    if let Some(host) = parts.host {
        rows.push(ResultRow::text("Host", host));
    }
    if let Some(port) = parts.port {
        rows.push(ResultRow::integer("Port", i64::from(port)));
    }
    rows.push(ResultRow::text("Path", parts.path));
    for (key, value) in parts.query {
        rows.push(ResultRow::text(format!("Query: {}", key), value));
    }
    if let Some(fragment) = parts.fragment {
        rows.push(ResultRow::text("Fragment", fragment));
    }
    Ok(ToolOutput::Rows(rows))
}

fn json_formatter(input: &ToolInput) -> Result<ToolOutput> {
    let mode = choice(input, "mode", &["pretty", "minify"], Some("pretty"))?;
    Ok(ToolOutput::Text(text::format_json(
        required(input, "json")?,
        mode == "minify",
    )?))
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(FormTool {
        id: "base64-encode",
        name: "Base64 Encoder",
        category: Category::Text,
        description: "Encode text as Base64",
        fields: || vec![FieldSpec::text("text", "Text")],
        compute: base64_encode,
    });
    registry.register(FormTool {
        id: "base64-decode",
        name: "Base64 Decoder",
        category: Category::Text,
        description: "Decode Base64 back into text",
        fields: || vec![FieldSpec::text("text", "Base64")],
        compute: base64_decode,
    });
    registry.register(FormTool {
        id: "url-encode",
        name: "URL Encoder",
        category: Category::Text,
        description: "Percent-encode text for use in a URL component",
        fields: || vec![FieldSpec::text("text", "Text")],
        compute: url_encode,
    });
    registry.register(FormTool {
        id: "url-decode",
        name: "URL Decoder",
        category: Category::Text,
        description: "Decode a percent-encoded URL component",
        fields: || vec![FieldSpec::text("text", "Encoded text")],
        compute: url_decode,
    });
    registry.register(FormTool {
        id: "case-converter",
        name: "Case Converter",
        category: Category::Text,
        description: "Change text to upper, lower, title or sentence case",
        fields: || {
            vec![
                FieldSpec::text("text", "Text"),
                FieldSpec::select("case", "Case", &TextCase::OPTIONS),
            ]
        },
        compute: case_converter,
    });
    registry.register(FormTool {
        id: "word-counter",
        name: "Word Counter",
        category: Category::Text,
        description: "Count words, characters, sentences and paragraphs",
        fields: || vec![FieldSpec::text("text", "Text")],
        compute: word_counter,
    });
    registry.register(FormTool {
        id: "csv-to-json",
        name: "CSV to JSON",
        category: Category::Text,
        description: "Turn CSV rows into an array of JSON objects",
        fields: || vec![FieldSpec::text("csv", "CSV (first row is the header)")],
        compute: csv_to_json,
    });
    registry.register(FormTool {
        id: "json-to-csv",
        name: "JSON to CSV",
        category: Category::Text,
        description: "Flatten an array of JSON objects into CSV",
        fields: || vec![FieldSpec::text("json", "JSON array")],
        compute: json_to_csv,
    });
    registry.register(FormTool {
        id: "url-parser",
        name: "URL Parser",
        category: Category::Text,
        description: "Split a URL into scheme, host, port, path and query",
        fields: || vec![FieldSpec::text("url", "URL")],
        compute: url_parser,
    });
    registry.register(FormTool {
        id: "json-formatter",
        name: "JSON Formatter",
        category: Category::Text,
        description: "Pretty-print or minify JSON",
        fields: || {
            vec![
                FieldSpec::text("json", "JSON"),
                FieldSpec::select("mode", "Mode", &["pretty", "minify"]).optional(),
            ]
        },
        compute: json_formatter,
    });
}

#[cfg(test)]
mod tests {
    use crate::core::engine::ToolEngine;
    use crate::domain::model::ToolInput;
    use crate::utils::error::ToolError;

    #[test]
    fn test_base64_round_trip_through_tools() {
        let engine = ToolEngine::builtin();
        let encoded = engine
            .run("base64-encode", &ToolInput::new().with("text", "héllo"))
            .unwrap();
        let decoded = engine
            .run(
                "base64-decode",
                &ToolInput::new().with("text", encoded.as_text().unwrap()),
            )
            .unwrap();
        assert_eq!(decoded.as_text(), Some("héllo"));
    }

    #[test]
    fn test_base64_decode_rejects_binary() {
        let engine = ToolEngine::builtin();
        let result = engine.run("base64-decode", &ToolInput::new().with("text", "/w=="));
        assert!(matches!(result, Err(ToolError::InvalidInputError { .. })));
    }

    #[test]
    fn test_case_converter_requires_known_case() {
        let engine = ToolEngine::builtin();
        let input = ToolInput::new().with("text", "abc").with("case", "snake");
        assert!(engine.run("case-converter", &input).is_err());

        let input = ToolInput::new().with("text", "abc def").with("case", "title");
        assert_eq!(
            engine.run("case-converter", &input).unwrap().as_text(),
            Some("Abc Def")
        );
    }

    #[test]
    fn test_url_parser_rows() {
        let engine = ToolEngine::builtin();
        let input = ToolInput::new().with("url", "http://localhost:8080/search?q=rust");
        let output = engine.run("url-parser", &input).unwrap();
        assert_eq!(output.row("Port").unwrap().value.as_f64(), Some(8080.0));
        assert_eq!(output.row("Query: q").unwrap().value.as_text(), Some("rust"));
    }
}
