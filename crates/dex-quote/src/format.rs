use crate::amount::{Decimal, Rounding};
use crate::price::Price;

/// `$x.xx` value of `amount` at a USD unit price.
pub fn format_usd(amount: &Decimal, usd_price: &Decimal) -> String {
    let value = amount.mul_exact(usd_price);
    if value.is_zero() {
        return "$0.00".to_string();
    }
    format!("${}", value.to_fixed(2))
}

/// Compact rendering with `K`/`M`/`B` suffixes and two decimals.
pub fn format_compact(value: &Decimal) -> String {
    const SUFFIXES: [(u32, &str); 3] = [(9, "B"), (6, "M"), (3, "K")];

    for (exp, suffix) in SUFFIXES {
        if *value >= Decimal::from(10u64.pow(exp)) {
            return format!("{}{suffix}", value.div_pow10(exp).to_fixed(2));
        }
    }
    value.to_fixed(2)
}

/// Balance-style rendering: `0`, `< 0.0001`, or fixed decimals.
pub fn format_display(value: &Decimal, decimals: u32) -> String {
    if value.is_zero() {
        return "0".to_string();
    }
    if *value < display_floor() {
        return "< 0.0001".to_string();
    }
    value.to_fixed(decimals)
}

/// Amounts below this render as `< 0.0001`.
fn display_floor() -> Decimal {
    Decimal::from(1).div_pow10(4)
}

/// `0.5%`, `12.35%`.
pub fn format_percentage(value: &Decimal, decimals: u32) -> String {
    format!("{}%", value.rescale(decimals, Rounding::HalfUp))
}

/// `1 FLOW = 1.5 TEST`.
pub fn format_rate(from_symbol: &str, to_symbol: &str, price: &Price, decimals: u32) -> String {
    format!("1 {from_symbol} = {} {to_symbol}", price.to_decimal(decimals))
}

/// Shortfall of `actual_out` against `expected_out`, in percent. Zero when
/// nothing is expected or the actual output is at least the expected one.
pub fn price_impact(expected_out: &Decimal, actual_out: &Decimal) -> Decimal {
    if expected_out.is_zero() {
        return Decimal::zero();
    }
    let shortfall = expected_out.saturating_sub(actual_out);
    Price::from_decimal(expected_out)
        .convert_back(&shortfall.mul_exact(&Decimal::from(100)), 6, Rounding::HalfUp)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::parse(s).unwrap()
    }

    #[test]
    fn test_format_usd() {
        assert_eq!(format_usd(&d("2"), &d("0.75")), "$1.50");
        assert_eq!(format_usd(&d("0"), &d("0.75")), "$0.00");
        assert_eq!(format_usd(&d("3.333"), &d("1")), "$3.33");
        assert_eq!(format_usd(&d("0.001"), &d("1")), "$0.00");
    }

    #[test]
    fn test_format_compact() {
        assert_eq!(format_compact(&d("999.999")), "1000.00");
        assert_eq!(format_compact(&d("1500")), "1.50K");
        assert_eq!(format_compact(&d("2000000")), "2.00M");
        assert_eq!(format_compact(&d("3250000000")), "3.25B");
        assert_eq!(format_compact(&d("0.5")), "0.50");
    }

    #[test]
    fn test_format_display() {
        assert_eq!(format_display(&d("0"), 4), "0");
        assert_eq!(format_display(&d("0.00009"), 4), "< 0.0001");
        assert_eq!(format_display(&d("0.0001"), 4), "0.0001");
        assert_eq!(format_display(&d("12.34567"), 4), "12.3457");
    }

    #[test]
    fn test_format_percentage_and_rate() {
        assert_eq!(format_percentage(&d("0.5"), 2), "0.5%");
        assert_eq!(format_percentage(&d("12.3456"), 2), "12.35%");
        assert_eq!(
            format_rate("FLOW", "TEST", &Price::parse("1.5").unwrap(), 6),
            "1 FLOW = 1.5 TEST"
        );
    }

    #[test]
    fn test_price_impact() {
        assert_eq!(price_impact(&d("100"), &d("99")), d("1"));
        assert_eq!(price_impact(&d("3"), &d("2.985")), d("0.5"));
        assert_eq!(price_impact(&d("3"), &d("4")), Decimal::zero());
        assert_eq!(price_impact(&d("0"), &d("1")), Decimal::zero());
    }
}
