use crate::app::tools::form::{check_required, descriptor, number, required};
use crate::core::registry::ToolRegistry;
use crate::core::units::{convert, Quantity};
use crate::domain::model::{Category, FieldSpec, ResultRow, ToolDescriptor, ToolInput, ToolOutput};
use crate::domain::ports::Tool;
use crate::utils::error::Result;

/// 以換算係數表驅動的單位換算器，每種物理量一個
pub struct UnitConverterTool {
    quantity: Quantity,
}

impl UnitConverterTool {
    pub fn new(quantity: Quantity) -> Self {
        Self { quantity }
    }
}

impl Tool for UnitConverterTool {
    fn descriptor(&self) -> ToolDescriptor {
        descriptor(
            &format!("{}-converter", self.quantity.slug()),
            &format!("{} Converter", self.quantity.title()),
            Category::Unit,
            &format!(
                "Convert {} values between units",
                self.quantity.title().to_lowercase()
            ),
        )
    }

    fn fields(&self) -> Vec<FieldSpec> {
        let units: Vec<&str> = self.quantity.units().iter().map(|u| u.id).collect();
        vec![
            FieldSpec::number("value", "Value"),
            FieldSpec::select("from", "From unit", &units),
            FieldSpec::select("to", "To unit", &units),
        ]
    }

    fn run(&self, input: &ToolInput) -> Result<ToolOutput> {
        check_required(&self.fields(), input)?;
        let value = number(input, "value")?;
        let from = self.quantity.find_unit(required(input, "from")?)?;
        let to = self.quantity.find_unit(required(input, "to")?)?;

        let result = convert(self.quantity, value, from.id, to.id)?;
        tracing::debug!("{} {} -> {} {}", value, from.id, result, to.id);

        Ok(ToolOutput::single(
            ResultRow::number("Result", result).with_unit(to.symbol),
        ))
    }
}

pub fn register(registry: &mut ToolRegistry) {
    for quantity in Quantity::ALL {
        registry.register(UnitConverterTool::new(quantity));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::ToolError;

    #[test]
    fn test_length_converter() {
        let tool = UnitConverterTool::new(Quantity::Length);
        assert_eq!(tool.descriptor().id, "length-converter");

        let input = ToolInput::new()
            .with("value", "100")
            .with("from", "meter")
            .with("to", "ft");
        let output = tool.run(&input).unwrap();
        let row = output.row("Result").unwrap();
        assert_eq!(row.unit.as_deref(), Some("ft"));
        assert_eq!(row.render(3), "328.084 ft");
    }

    #[test]
    fn test_rejects_non_numeric_value() {
        let tool = UnitConverterTool::new(Quantity::Temperature);
        let input = ToolInput::new()
            .with("value", "warm")
            .with("from", "celsius")
            .with("to", "fahrenheit");
        assert!(matches!(
            tool.run(&input),
            Err(ToolError::InvalidNumberError { .. })
        ));
    }
}
