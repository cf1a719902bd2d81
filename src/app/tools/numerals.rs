use crate::app::tools::form::{check_required, descriptor, integer, required, FormTool};
use crate::core::numeral;
use crate::core::registry::ToolRegistry;
use crate::domain::model::{Category, FieldSpec, ResultRow, ToolDescriptor, ToolInput, ToolOutput};
use crate::domain::ports::Tool;
use crate::utils::error::{Result, ToolError};

/// 固定來源與目標基數的轉換器，例如 decimal-to-binary
pub struct RadixTool {
    id: &'static str,
    name: &'static str,
    from: u32,
    to: u32,
}

const RADIX_TOOLS: [RadixTool; 10] = [
    RadixTool { id: "decimal-to-binary", name: "Decimal to Binary", from: 10, to: 2 },
    RadixTool { id: "binary-to-decimal", name: "Binary to Decimal", from: 2, to: 10 },
    RadixTool { id: "decimal-to-hex", name: "Decimal to Hex", from: 10, to: 16 },
    RadixTool { id: "hex-to-decimal", name: "Hex to Decimal", from: 16, to: 10 },
    RadixTool { id: "decimal-to-octal", name: "Decimal to Octal", from: 10, to: 8 },
    RadixTool { id: "octal-to-decimal", name: "Octal to Decimal", from: 8, to: 10 },
    RadixTool { id: "binary-to-hex", name: "Binary to Hex", from: 2, to: 16 },
    RadixTool { id: "hex-to-binary", name: "Hex to Binary", from: 16, to: 2 },
    RadixTool { id: "binary-to-octal", name: "Binary to Octal", from: 2, to: 8 },
    RadixTool { id: "octal-to-binary", name: "Octal to Binary", from: 8, to: 2 },
];

impl Tool for RadixTool {
    fn descriptor(&self) -> ToolDescriptor {
        descriptor(
            self.id,
            self.name,
            Category::Numeral,
            &format!("Convert a base-{} number to base {}", self.from, self.to),
        )
    }

    fn fields(&self) -> Vec<FieldSpec> {
        vec![FieldSpec::text("value", "Number")]
    }

    fn run(&self, input: &ToolInput) -> Result<ToolOutput> {
        check_required(&self.fields(), input)?;
        let converted = numeral::convert_radix(required(input, "value")?, self.from, self.to)?;
        // 十六進位慣例以大寫顯示
        if self.to == 16 {
            Ok(ToolOutput::Text(converted.to_uppercase()))
        } else {
            Ok(ToolOutput::Text(converted))
        }
    }
}

fn base(input: &ToolInput, field: &str) -> Result<u32> {
    let value = integer(input, field)?;
    let base = u32::try_from(value)
        .map_err(|_| ToolError::out_of_range(field, value, "base must be between 2 and 36"))?;
    numeral::validate_base(field, base)?;
    Ok(base)
}

fn number_to_roman(input: &ToolInput) -> Result<ToolOutput> {
    let number = integer(input, "number")?;
    Ok(ToolOutput::Text(numeral::to_roman(number)?))
}

fn roman_to_number(input: &ToolInput) -> Result<ToolOutput> {
    let value = numeral::from_roman(required(input, "numeral")?)?;
    Ok(ToolOutput::single(ResultRow::integer("Number", i64::from(value))))
}

fn base_converter(input: &ToolInput) -> Result<ToolOutput> {
    let from = base(input, "from_base")?;
    let to = base(input, "to_base")?;
    let converted = numeral::convert_radix(required(input, "value")?, from, to)?;
    let uppercase = input
        .get("uppercase")
        .is_some_and(|v| matches!(v.trim().to_ascii_lowercase().as_str(), "yes" | "true" | "1"));
    Ok(ToolOutput::Text(if uppercase {
        converted.to_uppercase()
    } else {
        converted
    }))
}

fn text_to_binary(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(numeral::text_to_binary(required(input, "text")?)))
}

fn binary_to_text(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(numeral::binary_to_text(required(input, "binary")?)?))
}

fn text_to_ascii(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(numeral::text_to_codes(required(input, "text")?)))
}

fn ascii_to_text(input: &ToolInput) -> Result<ToolOutput> {
    Ok(ToolOutput::Text(numeral::codes_to_text(required(input, "codes")?)?))
}

pub fn register(registry: &mut ToolRegistry) {
    for tool in RADIX_TOOLS {
        registry.register(tool);
    }

    registry.register(FormTool {
        id: "number-to-roman",
        name: "Number to Roman Numerals",
        category: Category::Numeral,
        description: "Write a number from 1 to 3999 as a Roman numeral",
        fields: || vec![FieldSpec::number("number", "Number (1-3999)")],
        compute: number_to_roman,
    });
    registry.register(FormTool {
        id: "roman-to-number",
        name: "Roman Numerals to Number",
        category: Category::Numeral,
        description: "Read a Roman numeral as a decimal number",
        fields: || vec![FieldSpec::text("numeral", "Roman numeral")],
        compute: roman_to_number,
    });
    registry.register(FormTool {
        id: "base-converter",
        name: "Number Base Converter",
        category: Category::Numeral,
        description: "Convert a whole number between any bases from 2 to 36",
        fields: || {
            vec![
                FieldSpec::text("value", "Number"),
                FieldSpec::number("from_base", "From base"),
                FieldSpec::number("to_base", "To base"),
                FieldSpec::select("uppercase", "Uppercase digits", &["no", "yes"]).optional(),
            ]
        },
        compute: base_converter,
    });
    registry.register(FormTool {
        id: "text-to-binary",
        name: "Text to Binary",
        category: Category::Numeral,
        description: "Show the UTF-8 bytes of text as 8-bit binary groups",
        fields: || vec![FieldSpec::text("text", "Text")],
        compute: text_to_binary,
    });
    registry.register(FormTool {
        id: "binary-to-text",
        name: "Binary to Text",
        category: Category::Numeral,
        description: "Decode 8-bit binary groups back into text",
        fields: || vec![FieldSpec::text("binary", "Binary")],
        compute: binary_to_text,
    });
    registry.register(FormTool {
        id: "text-to-ascii",
        name: "Text to ASCII Codes",
        category: Category::Numeral,
        description: "List the character code of every character",
        fields: || vec![FieldSpec::text("text", "Text")],
        compute: text_to_ascii,
    });
    registry.register(FormTool {
        id: "ascii-to-text",
        name: "ASCII Codes to Text",
        category: Category::Numeral,
        description: "Turn space or comma separated character codes into text",
        fields: || vec![FieldSpec::text("codes", "Character codes")],
        compute: ascii_to_text,
    });
}
