use chrono::Datelike;

use crate::app::tools::form::{integer, required, FormTool};
use crate::core::dates::{self, DATE_FORMAT};
use crate::core::registry::ToolRegistry;
use crate::domain::model::{Category, FieldSpec, ResultRow, ToolInput, ToolOutput};
use crate::utils::error::Result;

fn age_calculator(input: &ToolInput) -> Result<ToolOutput> {
    let birth = dates::parse_date("birth_date", required(input, "birth_date")?)?;
    let on = match input.get("on") {
        Some(raw) => dates::parse_date("on", raw)?,
        None => dates::today(),
    };
    let age = dates::age_on(birth, on)?;

    Ok(ToolOutput::Rows(vec![
        ResultRow::integer("Years", i64::from(age.years)),
        ResultRow::integer("Months", i64::from(age.months)),
        ResultRow::integer("Days", i64::from(age.days)),
        ResultRow::integer("Total days", age.total_days),
    ]))
}

fn date_difference(input: &ToolInput) -> Result<ToolOutput> {
    let start = dates::parse_date("start", required(input, "start")?)?;
    let end = dates::parse_date("end", required(input, "end")?)?;
    let span = dates::days_between(start, end);

    Ok(ToolOutput::Rows(vec![
        ResultRow::integer("Days", span.days),
        ResultRow::integer("Weeks", span.weeks),
        ResultRow::integer("Remaining days", span.remaining_days),
    ]))
}

fn date_add(input: &ToolInput) -> Result<ToolOutput> {
    let date = dates::parse_date("date", required(input, "date")?)?;
    let result = dates::add_days(date, integer(input, "days")?)?;

    Ok(ToolOutput::Rows(vec![
        ResultRow::text("Date", result.format(DATE_FORMAT).to_string()),
        ResultRow::text("Weekday", result.weekday().to_string()),
    ]))
}

pub fn register(registry: &mut ToolRegistry) {
    registry.register(FormTool {
        id: "age-calculator",
        name: "Age Calculator",
        category: Category::Date,
        description: "Exact age in years, months and days",
        fields: || {
            vec![
                FieldSpec::date("birth_date", "Date of birth"),
                FieldSpec::date("on", "Age on (defaults to today)").optional(),
            ]
        },
        compute: age_calculator,
    });
    registry.register(FormTool {
        id: "date-difference",
        name: "Days Between Dates",
        category: Category::Date,
        description: "Number of days from one date to another",
        fields: || {
            vec![
                FieldSpec::date("start", "Start date"),
                FieldSpec::date("end", "End date"),
            ]
        },
        compute: date_difference,
    });
    registry.register(FormTool {
        id: "date-add",
        name: "Add Days to Date",
        category: Category::Date,
        description: "Move a date forward or back by a number of days",
        fields: || {
            vec![
                FieldSpec::date("date", "Date"),
                FieldSpec::number("days", "Days (negative to subtract)"),
            ]
        },
        compute: date_add,
    });
}
