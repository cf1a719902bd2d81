/// 依精度四捨五入並去掉多餘的尾零
pub fn format_number(value: f64, precision: usize) -> String {
    let mut text = format!("{:.*}", precision, value);
    if text.contains('.') {
        while text.ends_with('0') {
            text.pop();
        }
        if text.ends_with('.') {
            text.pop();
        }
    }
    if text == "-0" {
        text = "0".to_string();
    }
    text
}

pub fn round_to(value: f64, precision: u32) -> f64 {
    let factor = 10f64.powi(precision as i32);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_number_trims_zeros() {
        assert_eq!(format_number(32.0, 4), "32");
        assert_eq!(format_number(328.0839895, 3), "328.084");
        assert_eq!(format_number(856.0748, 2), "856.07");
        assert_eq!(format_number(-0.0001, 2), "0");
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(856.0748, 2), 856.07);
    }
}
