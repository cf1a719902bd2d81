use chrono::{Datelike, Duration, Local, Months, NaiveDate};

use crate::utils::error::{Result, ToolError};

pub const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(ToolError::missing(field));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| ToolError::invalid_input(field, trimmed, format!("expected YYYY-MM-DD ({})", e)))
}

pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Age {
    pub years: i32,
    pub months: u32,
    pub days: u32,
    pub total_days: i64,
}

/// 以「滿月」計算：找出不超過 on 的最後一個月週年日，剩下的算天數
pub fn age_on(birth: NaiveDate, on: NaiveDate) -> Result<Age> {
    if birth > on {
        return Err(ToolError::out_of_range(
            "birth_date",
            birth.format(DATE_FORMAT),
            format!("must not be after {}", on.format(DATE_FORMAT)),
        ));
    }

    let mut whole_months =
        (on.year() - birth.year()) * 12 + on.month() as i32 - birth.month() as i32;
    let mut anchor = month_anniversary(birth, whole_months)?;
    if anchor > on {
        whole_months -= 1;
        anchor = month_anniversary(birth, whole_months)?;
    }

    Ok(Age {
        years: whole_months / 12,
        months: (whole_months % 12) as u32,
        days: (on - anchor).num_days() as u32,
        total_days: (on - birth).num_days(),
    })
}

// 月底會被夾到較短月份的最後一天，例如 1/31 + 1 個月 = 2/28
fn month_anniversary(birth: NaiveDate, months: i32) -> Result<NaiveDate> {
    birth
        .checked_add_months(Months::new(months.max(0) as u32))
        .ok_or_else(|| ToolError::out_of_range("birth_date", birth.format(DATE_FORMAT), "date is out of range"))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateSpan {
    pub days: i64,
    pub weeks: i64,
    pub remaining_days: i64,
}

/// 帶正負號：end 早於 start 時為負值
pub fn days_between(start: NaiveDate, end: NaiveDate) -> DateSpan {
    let days = (end - start).num_days();
    DateSpan {
        days,
        weeks: days / 7,
        remaining_days: days % 7,
    }
}

pub fn add_days(date: NaiveDate, days: i64) -> Result<NaiveDate> {
    Duration::try_days(days)
        .and_then(|delta| date.checked_add_signed(delta))
        .ok_or_else(|| ToolError::out_of_range("days", days, "resulting date is out of range"))
}
