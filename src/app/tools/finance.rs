use crate::app::tools::form::{choice, integer, number, optional_integer, FormTool};
use crate::core::finance;
use crate::core::registry::ToolRegistry;
use crate::domain::model::{Category, FieldSpec, ResultRow, ToolInput, ToolOutput};
use crate::utils::error::Result;
use crate::utils::format::round_to;

// 金額一律以分為單位顯示
fn money(label: &str, value: f64) -> ResultRow {
    ResultRow::number(label, round_to(value, 2))
}

fn percent(label: &str, value: f64) -> ResultRow {
    ResultRow::number(label, round_to(value, 2)).with_unit("%")
}

fn loan(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::loan_payment(
        number(input, "amount")?,
        number(input, "rate")?,
        integer(input, "months")?,
    )?;
    Ok(ToolOutput::Rows(vec![
        money("Monthly payment", summary.monthly_payment),
        money("Total payment", summary.total_payment),
        money("Total interest", summary.total_interest),
    ]))
}

fn simple_interest(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::simple_interest(
        number(input, "principal")?,
        number(input, "rate")?,
        number(input, "years")?,
    )?;
    Ok(ToolOutput::Rows(vec![
        money("Interest", summary.interest),
        money("Total amount", summary.total),
    ]))
}

const COMPOUNDING: [&str; 5] = ["1", "2", "4", "12", "365"];

fn compound_interest(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::compound_interest(
        number(input, "principal")?,
        number(input, "rate")?,
        number(input, "years")?,
        optional_integer(input, "compounds_per_year", 12)?,
    )?;
    Ok(ToolOutput::Rows(vec![
        money("Total amount", summary.total),
        money("Interest", summary.interest),
    ]))
}

fn percentage_of(input: &ToolInput) -> Result<ToolOutput> {
    let result = finance::percentage_of(number(input, "percent")?, number(input, "value")?)?;
    Ok(ToolOutput::single(ResultRow::number("Result", result)))
}

fn percentage_change(input: &ToolInput) -> Result<ToolOutput> {
    let change = finance::percentage_change(number(input, "from")?, number(input, "to")?)?;
    let direction = if change > 0.0 {
        "Increase"
    } else if change < 0.0 {
        "Decrease"
    } else {
        "No change"
    };
    Ok(ToolOutput::Rows(vec![
        percent("Change", change),
        ResultRow::text("Direction", direction),
    ]))
}

fn discount(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::discount(number(input, "price")?, number(input, "percent")?)?;
    Ok(ToolOutput::Rows(vec![
        money("Final price", summary.final_price),
        money("You save", summary.saved),
    ]))
}

fn tip(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::tip(
        number(input, "bill")?,
        number(input, "percent")?,
        optional_integer(input, "people", 1)?,
    )?;
    Ok(ToolOutput::Rows(vec![
        money("Tip", summary.tip),
        money("Total", summary.total),
        money("Per person", summary.per_person),
    ]))
}

fn sales_tax(input: &ToolInput) -> Result<ToolOutput> {
    let mode = choice(input, "mode", &["exclusive", "inclusive"], Some("exclusive"))?;
    let summary = finance::sales_tax(
        number(input, "amount")?,
        number(input, "rate")?,
        mode == "inclusive",
    )?;
    Ok(ToolOutput::Rows(vec![
        money("Net amount", summary.net),
        money("Tax", summary.tax),
        money("Gross amount", summary.gross),
    ]))
}

fn roi(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::return_on_investment(number(input, "invested")?, number(input, "returned")?)?;
    Ok(ToolOutput::Rows(vec![
        money("Gain", summary.gain),
        percent("ROI", summary.roi_percent),
    ]))
}

fn bmi(input: &ToolInput) -> Result<ToolOutput> {
    let summary = finance::body_mass_index(number(input, "weight")?, number(input, "height")?)?;
    Ok(ToolOutput::Rows(vec![
        ResultRow::number("BMI", round_to(summary.bmi, 1)),
        ResultRow::text("Category", summary.category),
    ]))
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(FormTool {
        id: "loan-calculator",
        name: "Loan Calculator",
        category: Category::Finance,
        description: "Monthly payment and total interest of an amortized loan",
        fields: || {
            vec![
                FieldSpec::number("amount", "Loan amount"),
                FieldSpec::number("rate", "Annual interest rate (%)"),
                FieldSpec::number("months", "Term (months)"),
            ]
        },
        compute: loan,
    });
    registry.register(FormTool {
        id: "simple-interest",
        name: "Simple Interest Calculator",
        category: Category::Finance,
        description: "Interest earned without compounding",
        fields: || {
            vec![
                FieldSpec::number("principal", "Principal"),
                FieldSpec::number("rate", "Annual rate (%)"),
                FieldSpec::number("years", "Years"),
            ]
        },
        compute: simple_interest,
    });
    registry.register(FormTool {
        id: "compound-interest",
        name: "Compound Interest Calculator",
        category: Category::Finance,
        description: "Future value with periodic compounding",
        fields: || {
            vec![
                FieldSpec::number("principal", "Principal"),
                FieldSpec::number("rate", "Annual rate (%)"),
                FieldSpec::number("years", "Years"),
                FieldSpec::select("compounds_per_year", "Compounds per year", &COMPOUNDING).optional(),
            ]
        },
        compute: compound_interest,
    });
    registry.register(FormTool {
        id: "percentage-calculator",
        name: "Percentage Calculator",
        category: Category::Finance,
        description: "What is X% of Y",
        fields: || {
            vec![
                FieldSpec::number("percent", "Percent"),
                FieldSpec::number("value", "Of value"),
            ]
        },
        compute: percentage_of,
    });
    registry.register(FormTool {
        id: "percentage-change",
        name: "Percentage Change Calculator",
        category: Category::Finance,
        description: "Relative increase or decrease between two values",
        fields: || {
            vec![
                FieldSpec::number("from", "Original value"),
                FieldSpec::number("to", "New value"),
            ]
        },
        compute: percentage_change,
    });
    registry.register(FormTool {
        id: "discount-calculator",
        name: "Discount Calculator",
        category: Category::Finance,
        description: "Sale price after a percentage discount",
        fields: || {
            vec![
                FieldSpec::number("price", "Original price"),
                FieldSpec::number("percent", "Discount (%)"),
            ]
        },
        compute: discount,
    });
    registry.register(FormTool {
        id: "tip-calculator",
        name: "Tip Calculator",
        category: Category::Finance,
        description: "Tip amount and per-person share of a bill",
        fields: || {
            vec![
                FieldSpec::number("bill", "Bill amount"),
                FieldSpec::number("percent", "Tip (%)"),
                FieldSpec::number("people", "Number of people").optional(),
            ]
        },
        compute: tip,
    });
    registry.register(FormTool {
        id: "sales-tax-calculator",
        name: "Sales Tax Calculator",
        category: Category::Finance,
        description: "Add tax to a net amount or extract it from a gross amount",
        fields: || {
            vec![
                FieldSpec::number("amount", "Amount"),
                FieldSpec::number("rate", "Tax rate (%)"),
                FieldSpec::select("mode", "Amount is", &["exclusive", "inclusive"]).optional(),
            ]
        },
        compute: sales_tax,
    });
    registry.register(FormTool {
        id: "roi-calculator",
        name: "ROI Calculator",
        category: Category::Finance,
        description: "Return on investment as gain and percentage",
        fields: || {
            vec![
                FieldSpec::number("invested", "Amount invested"),
                FieldSpec::number("returned", "Amount returned"),
            ]
        },
        compute: roi,
    });
    registry.register(FormTool {
        id: "bmi-calculator",
        name: "BMI Calculator",
        category: Category::Finance,
        description: "Body-mass index from weight (kg) and height (cm)",
        fields: || {
            vec![
                FieldSpec::number("weight", "Weight (kg)"),
                FieldSpec::number("height", "Height (cm)"),
            ]
        },
        compute: bmi,
    });
}

#[cfg(test)]
mod tests {
    use crate::core::engine::ToolEngine;
    use crate::domain::model::ToolInput;
    use crate::utils::error::ToolError;

    #[test]
    fn test_loan_calculator() {
        let engine = ToolEngine::builtin();
        let input = ToolInput::new()
            .with("amount", "10000")
            .with("rate", "5")
            .with("months", "12");
        let output = engine.run("loan-calculator", &input).unwrap();
        assert_eq!(output.primary_number(), Some(856.07));
        assert_eq!(output.row("Total interest").unwrap().value.as_f64(), Some(272.9));
    }

    #[test]
    fn test_missing_field_is_reported_before_computing() {
        let engine = ToolEngine::builtin();
        let input = ToolInput::new().with("amount", "10000").with("rate", "5");
        match engine.run("loan-calculator", &input) {
            Err(ToolError::MissingInputError { field }) => assert_eq!(field, "months"),
            other => panic!("unexpected result: {:?}", other),
        }
    }

    #[test]
    fn test_sales_tax_modes() {
        let engine = ToolEngine::builtin();
        let input = ToolInput::new()
            .with("amount", "110")
            .with("rate", "10")
            .with("mode", "inclusive");
        let output = engine.run("sales-tax-calculator", &input).unwrap();
        assert_eq!(output.row("Tax").unwrap().value.as_f64(), Some(10.0));
    }

    #[test]
    fn test_percentage_change_direction() {
        let engine = ToolEngine::builtin();
        let input = ToolInput::new().with("from", "80").with("to", "60");
        let output = engine.run("percentage-change", &input).unwrap();
        assert_eq!(output.primary_number(), Some(-25.0));
        assert_eq!(output.row("Direction").unwrap().value.as_text(), Some("Decrease"));
    }
}
