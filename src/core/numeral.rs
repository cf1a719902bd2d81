use crate::utils::error::{Result, ToolError};
use regex::Regex;
use std::sync::OnceLock;

pub const ROMAN_MIN: i64 = 1;
pub const ROMAN_MAX: i64 = 3999;

const ROMAN_TABLE: [(u32, &str); 13] = [
    (1000, "M"),
    (900, "CM"),
    (500, "D"),
    (400, "CD"),
    (100, "C"),
    (90, "XC"),
    (50, "L"),
    (40, "XL"),
    (10, "X"),
    (9, "IX"),
    (5, "V"),
    (4, "IV"),
    (1, "I"),
];

fn roman_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^M{0,3}(CM|CD|D?C{0,3})(XC|XL|L?X{0,3})(IX|IV|V?I{0,3})$")
            .expect("roman numeral pattern is valid")
    })
}

pub fn to_roman(number: i64) -> Result<String> {
    if !(ROMAN_MIN..=ROMAN_MAX).contains(&number) {
        return Err(ToolError::out_of_range(
            "number",
            number,
            format!("Roman numerals cover {} to {}", ROMAN_MIN, ROMAN_MAX),
        ));
    }

    let mut remaining = number as u32;
    let mut out = String::new();
    for (value, symbol) in ROMAN_TABLE {
        while remaining >= value {
            out.push_str(symbol);
            remaining -= value;
        }
    }
    Ok(out)
}

/// 只接受標準寫法，例如 "IIII" 或 "VX" 會被拒絕
pub fn from_roman(numeral: &str) -> Result<u32> {
    let normalized = numeral.trim().to_ascii_uppercase();
    if normalized.is_empty() {
        return Err(ToolError::missing("numeral"));
    }
    if !roman_pattern().is_match(&normalized) {
        return Err(ToolError::invalid_input(
            "numeral",
            numeral.trim(),
            "not a valid Roman numeral between I and MMMCMXCIX",
        ));
    }

    let mut rest = normalized.as_str();
    let mut total = 0;
    for (value, symbol) in ROMAN_TABLE {
        while let Some(tail) = rest.strip_prefix(symbol) {
            total += value;
            rest = tail;
        }
    }
    Ok(total)
}

pub fn validate_base(field: &str, base: u32) -> Result<()> {
    if !(2..=36).contains(&base) {
        return Err(ToolError::out_of_range(field, base, "base must be between 2 and 36"));
    }
    Ok(())
}

fn strip_radix_prefix(digits: &str, base: u32) -> &str {
    let prefix = match base {
        2 => "0b",
        8 => "0o",
        16 => "0x",
        _ => return digits,
    };
    match digits.get(..2) {
        Some(head) if digits.len() > 2 && head.eq_ignore_ascii_case(prefix) => &digits[2..],
        _ => digits,
    }
}

/// 逐位驗證並以位值加總轉成整數
pub fn parse_radix(raw: &str, base: u32) -> Result<u64> {
    validate_base("from_base", base)?;

    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| *c != '_' && !c.is_whitespace())
        .collect();
    let digits = strip_radix_prefix(&cleaned, base);
    if digits.is_empty() {
        return Err(ToolError::missing("value"));
    }

    let mut acc: u64 = 0;
    for c in digits.chars() {
        let digit = c.to_digit(base).ok_or_else(|| {
            ToolError::invalid_input(
                "value",
                raw.trim(),
                format!("'{}' is not a valid base-{} digit", c, base),
            )
        })?;
        acc = acc
            .checked_mul(u64::from(base))
            .and_then(|v| v.checked_add(u64::from(digit)))
            .ok_or_else(|| ToolError::out_of_range("value", raw.trim(), "exceeds 64-bit range"))?;
    }
    Ok(acc)
}

/// 反覆除以基數取餘數
pub fn to_radix(mut value: u64, base: u32) -> Result<String> {
    validate_base("to_base", base)?;
    if value == 0 {
        return Ok("0".to_string());
    }

    let base = u64::from(base);
    let mut digits = Vec::new();
    while value > 0 {
        let d = (value % base) as u32;
        // base 已驗證在 2..=36，from_digit 不會失敗
        digits.push(std::char::from_digit(d, base as u32).unwrap_or('?'));
        value /= base;
    }
    Ok(digits.iter().rev().collect())
}

pub fn convert_radix(raw: &str, from_base: u32, to_base: u32) -> Result<String> {
    validate_base("to_base", to_base)?;
    let value = parse_radix(raw, from_base)?;
    to_radix(value, to_base)
}

pub fn text_to_binary(text: &str) -> String {
    text.bytes()
        .map(|b| format!("{:08b}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn binary_to_text(raw: &str) -> Result<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToolError::missing("binary"));
    }

    // 沒有空白時視為連續的 8 位元分組
    let groups: Vec<String> = if trimmed.contains(char::is_whitespace) {
        trimmed.split_whitespace().map(str::to_string).collect()
    } else {
        if trimmed.len() % 8 != 0 {
            return Err(ToolError::invalid_input(
                "binary",
                trimmed,
                "length must be a multiple of 8 when groups are not separated",
            ));
        }
        trimmed
            .as_bytes()
            .chunks(8)
            .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
            .collect()
    };

    let mut bytes = Vec::with_capacity(groups.len());
    for group in &groups {
        if group.is_empty() || group.len() > 8 || !group.chars().all(|c| c == '0' || c == '1') {
            return Err(ToolError::invalid_input(
                "binary",
                group,
                "each group must be 1 to 8 binary digits",
            ));
        }
        let byte = u8::from_str_radix(group, 2)
            .map_err(|_| ToolError::invalid_input("binary", group, "not a byte"))?;
        bytes.push(byte);
    }

    String::from_utf8(bytes)
        .map_err(|_| ToolError::invalid_input("binary", trimmed, "bytes are not valid UTF-8 text"))
}

pub fn text_to_codes(text: &str) -> String {
    text.chars()
        .map(|c| u32::from(c).to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

pub fn codes_to_text(raw: &str) -> Result<String> {
    let mut out = String::new();
    for token in raw
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty())
    {
        let code: u32 = token
            .parse()
            .map_err(|_| ToolError::invalid_number("codes", token))?;
        let ch = char::from_u32(code).ok_or_else(|| {
            ToolError::out_of_range("codes", code, "not a valid Unicode code point")
        })?;
        out.push(ch);
    }
    if out.is_empty() {
        return Err(ToolError::missing("codes"));
    }
    Ok(out)
}
