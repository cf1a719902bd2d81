use crate::utils::error::{Result, ToolError};
use crate::utils::validation::{
    validate_finite_result, validate_non_negative, validate_positive, validate_range,
};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoanSummary {
    pub monthly_payment: f64,
    pub total_payment: f64,
    pub total_interest: f64,
}

/// 等額本息：`P·r·(1+r)^n / ((1+r)^n − 1)`，r 為月利率
pub fn loan_payment(principal: f64, annual_rate_percent: f64, months: i64) -> Result<LoanSummary> {
    validate_positive("amount", principal)?;
    validate_non_negative("rate", annual_rate_percent)?;
    if months < 1 {
        return Err(ToolError::out_of_range("months", months, "term must be at least 1 month"));
    }

    let n = months as f64;
    let r = annual_rate_percent / 12.0 / 100.0;
    let monthly_payment = if r == 0.0 {
        principal / n
    } else {
        let growth = (1.0 + r).powf(n);
        principal * r * growth / (growth - 1.0)
    };
    let monthly_payment = validate_finite_result("monthly_payment", monthly_payment)?;
    let total_payment = validate_finite_result("total_payment", monthly_payment * n)?;

    Ok(LoanSummary {
        monthly_payment,
        total_payment,
        total_interest: total_payment - principal,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InterestSummary {
    pub interest: f64,
    pub total: f64,
}

pub fn simple_interest(principal: f64, annual_rate_percent: f64, years: f64) -> Result<InterestSummary> {
    validate_non_negative("principal", principal)?;
    validate_non_negative("rate", annual_rate_percent)?;
    validate_non_negative("years", years)?;

    let interest = validate_finite_result("interest", principal * annual_rate_percent / 100.0 * years)?;
    Ok(InterestSummary {
        interest,
        total: validate_finite_result("total", principal + interest)?,
    })
}

pub fn compound_interest(
    principal: f64,
    annual_rate_percent: f64,
    years: f64,
    compounds_per_year: i64,
) -> Result<InterestSummary> {
    validate_non_negative("principal", principal)?;
    validate_non_negative("rate", annual_rate_percent)?;
    validate_non_negative("years", years)?;
    validate_range("compounds_per_year", compounds_per_year, 1, 365)?;

    let n = compounds_per_year as f64;
    let total = validate_finite_result(
        "total",
        principal * (1.0 + annual_rate_percent / 100.0 / n).powf(n * years),
    )?;
    Ok(InterestSummary {
        interest: total - principal,
        total,
    })
}

/// X% of Y
pub fn percentage_of(percent: f64, of: f64) -> Result<f64> {
    validate_finite_result("result", percent / 100.0 * of)
}

pub fn percentage_change(from: f64, to: f64) -> Result<f64> {
    if from == 0.0 {
        return Err(ToolError::out_of_range("from", from, "the starting value cannot be 0"));
    }
    validate_finite_result("change", (to - from) / from.abs() * 100.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DiscountSummary {
    pub saved: f64,
    pub final_price: f64,
}

pub fn discount(price: f64, percent: f64) -> Result<DiscountSummary> {
    validate_non_negative("price", price)?;
    validate_range("percent", percent, 0.0, 100.0)?;

    let saved = validate_finite_result("saved", price * percent / 100.0)?;
    Ok(DiscountSummary {
        saved,
        final_price: price - saved,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TipSummary {
    pub tip: f64,
    pub total: f64,
    pub per_person: f64,
}

pub fn tip(bill: f64, percent: f64, people: i64) -> Result<TipSummary> {
    validate_non_negative("bill", bill)?;
    validate_non_negative("percent", percent)?;
    if people < 1 {
        return Err(ToolError::out_of_range("people", people, "at least one person must pay"));
    }

    let tip = validate_finite_result("tip", bill * percent / 100.0)?;
    let total = validate_finite_result("total", bill + tip)?;
    Ok(TipSummary {
        tip,
        total,
        per_person: total / people as f64,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaxSummary {
    pub net: f64,
    pub tax: f64,
    pub gross: f64,
}

/// `inclusive` 為 true 時 amount 已含稅
pub fn sales_tax(amount: f64, rate_percent: f64, inclusive: bool) -> Result<TaxSummary> {
    validate_non_negative("amount", amount)?;
    validate_non_negative("rate", rate_percent)?;

    let rate = rate_percent / 100.0;
    let (net, gross) = if inclusive {
        (amount / (1.0 + rate), amount)
    } else {
        (amount, validate_finite_result("gross", amount * (1.0 + rate))?)
    };
    Ok(TaxSummary {
        net,
        tax: gross - net,
        gross,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RoiSummary {
    pub gain: f64,
    pub roi_percent: f64,
}

pub fn return_on_investment(invested: f64, returned: f64) -> Result<RoiSummary> {
    validate_positive("invested", invested)?;
    validate_non_negative("returned", returned)?;

    let gain = returned - invested;
    Ok(RoiSummary {
        gain,
        roi_percent: validate_finite_result("roi", gain / invested * 100.0)?,
    })
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BmiSummary {
    pub bmi: f64,
    pub category: &'static str,
}

/// WHO 成人分級
pub fn body_mass_index(weight_kg: f64, height_cm: f64) -> Result<BmiSummary> {
    validate_positive("weight", weight_kg)?;
    validate_positive("height", height_cm)?;

    let meters = height_cm / 100.0;
    let bmi = validate_finite_result("bmi", weight_kg / (meters * meters))?;
    let category = match bmi {
        b if b < 18.5 => "Underweight",
        b if b < 25.0 => "Normal weight",
        b if b < 30.0 => "Overweight",
        _ => "Obese",
    };
    Ok(BmiSummary { bmi, category })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loan_payment() {
        let summary = loan_payment(10_000.0, 5.0, 12).unwrap();
        assert!((summary.monthly_payment - 856.07).abs() < 0.005);
        assert!((summary.total_interest - 272.90).abs() < 0.01);
    }

    #[test]
    fn test_zero_rate_loan() {
        let summary = loan_payment(1_200.0, 0.0, 12).unwrap();
        assert_eq!(summary.monthly_payment, 100.0);
        assert_eq!(summary.total_interest, 0.0);
    }

    #[test]
    fn test_loan_rejects_bad_terms() {
        assert!(loan_payment(0.0, 5.0, 12).is_err());
        assert!(loan_payment(1000.0, -1.0, 12).is_err());
        assert!(loan_payment(1000.0, 5.0, 0).is_err());
    }

    #[test]
    fn test_loan_overflow_rejected() {
        assert!(matches!(
            loan_payment(1_000.0, 5.0, 2_000_000),
            Err(ToolError::OutOfRangeError { .. })
        ));
    }

    #[test]
    fn test_overflowing_results_rejected() {
        assert!(matches!(
            compound_interest(1_000.0, 50.0, 100_000.0, 1),
            Err(ToolError::OutOfRangeError { .. })
        ));
        assert!(simple_interest(1e300, 1e10, 1e10).is_err());
        assert!(percentage_of(1e308, 1e308).is_err());
        assert!(percentage_change(1e-300, 1e300).is_err());
        assert!(tip(1e308, 1e10, 1).is_err());
        assert!(sales_tax(1e308, 1e10, false).is_err());
        assert!(return_on_investment(1e-300, 1e300).is_err());
        assert!(body_mass_index(1e308, 1e-200).is_err());
    }

    #[test]
    fn test_interest() {
        let simple = simple_interest(1_000.0, 5.0, 2.0).unwrap();
        assert!((simple.interest - 100.0).abs() < 1e-9);

        let compound = compound_interest(1_000.0, 5.0, 10.0, 1).unwrap();
        assert!((compound.total - 1_628.894_626_777_442).abs() < 1e-6);
        assert!(compound_interest(1_000.0, 5.0, 10.0, 0).is_err());
    }

    #[test]
    fn test_percentages() {
        assert_eq!(percentage_of(20.0, 150.0).unwrap(), 30.0);
        assert_eq!(percentage_change(50.0, 75.0).unwrap(), 50.0);
        assert_eq!(percentage_change(-50.0, -25.0).unwrap(), 50.0);
        assert!(percentage_change(0.0, 10.0).is_err());
    }

    #[test]
    fn test_discount_and_tip() {
        let d = discount(80.0, 25.0).unwrap();
        assert_eq!(d.final_price, 60.0);
        assert!(discount(80.0, 120.0).is_err());

        let t = tip(100.0, 15.0, 4).unwrap();
        assert_eq!(t.total, 115.0);
        assert_eq!(t.per_person, 28.75);
        assert!(tip(100.0, 15.0, 0).is_err());
    }

    #[test]
    fn test_sales_tax() {
        let exclusive = sales_tax(100.0, 10.0, false).unwrap();
        assert!((exclusive.gross - 110.0).abs() < 1e-9);

        let inclusive = sales_tax(110.0, 10.0, true).unwrap();
        assert!((inclusive.net - 100.0).abs() < 1e-9);
        assert!((inclusive.tax - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_roi_and_bmi() {
        let roi = return_on_investment(1_000.0, 1_250.0).unwrap();
        assert_eq!(roi.roi_percent, 25.0);
        assert!(return_on_investment(0.0, 10.0).is_err());

        let bmi = body_mass_index(70.0, 175.0).unwrap();
        assert!((bmi.bmi - 22.857).abs() < 0.001);
        assert_eq!(bmi.category, "Normal weight");
    }
}
