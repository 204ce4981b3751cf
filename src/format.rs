//! Display formatting helpers.

use chrono::NaiveDate;

/// Format an amount as US currency with two decimals and thousands
/// separators: `1234.5` -> `"$1,234.50"`.
pub fn currency(amount: f64) -> String {
    let negative = amount < 0.0;
    let cents = (amount.abs() * 100.0).round() as u64;
    let whole = cents / 100;
    let frac = cents % 100;

    let digits = whole.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(c);
    }

    let sign = if negative { "-" } else { "" };
    format!("{sign}${grouped}.{frac:02}")
}

/// Booking date as shown in history rows: `20/Aug/2026`.
pub fn booking_date(date: NaiveDate) -> String {
    date.format("%d/%b/%Y").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_currency_thousands_separator() {
        assert_eq!(currency(1234.5), "$1,234.50");
        assert_eq!(currency(1_234_567.891), "$1,234,567.89");
    }

    #[test]
    fn test_currency_small_amounts() {
        assert_eq!(currency(0.0), "$0.00");
        assert_eq!(currency(85.5), "$85.50");
        assert_eq!(currency(999.999), "$1,000.00");
    }

    #[test]
    fn test_currency_negative() {
        assert_eq!(currency(-1234.5), "-$1,234.50");
    }

    #[test]
    fn test_booking_date() {
        let date = NaiveDate::from_ymd_opt(2026, 8, 20).unwrap();
        assert_eq!(booking_date(date), "20/Aug/2026");
    }
}
