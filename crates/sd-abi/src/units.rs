//! Conversion between decimal amount strings and smallest-unit integers.
//!
//! Every call site that needs ether/token math goes through these two
//! functions with an explicit decimal count; nothing else in the workspace
//! multiplies or divides by the unit factor.

use alloy_primitives::U256;
use thiserror::Error;

/// Decimals of the native currency and of the sale token (both use wei-style
/// 10^18 smallest units).
pub const NATIVE_DECIMALS: u8 = 18;

#[derive(Debug, PartialEq, Eq, Error)]
pub enum UnitsError {
    #[error("amount is empty")]
    Empty,
    #[error("amount is not a decimal number")]
    Malformed,
    #[error("amount has more than {0} fractional digits")]
    TooPrecise(u8),
    #[error("amount does not fit in 256 bits")]
    Overflow,
}

/// `10^decimals` as a `U256`.
pub fn unit_factor(decimals: u8) -> U256 {
    U256::from(10u64).pow(U256::from(decimals))
}

/// Parse a decimal string like `"1.5"` into a smallest-unit integer.
///
/// Rejects anything that is not plain `digits[.digits]`, and any input with
/// more (significant) fractional digits than `decimals` allows.
pub fn parse_units(input: &str, decimals: u8) -> Result<U256, UnitsError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(UnitsError::Empty);
    }

    let (whole, frac) = match input.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (input, ""),
    };
    if whole.is_empty() && frac.is_empty() {
        return Err(UnitsError::Malformed);
    }
    if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
        return Err(UnitsError::Malformed);
    }

    let frac = frac.trim_end_matches('0');
    if frac.len() > decimals as usize {
        return Err(UnitsError::TooPrecise(decimals));
    }

    let whole = if whole.is_empty() {
        U256::ZERO
    } else {
        U256::from_str_radix(whole, 10).map_err(|_| UnitsError::Malformed)?
    };
    let mut amount = whole
        .checked_mul(unit_factor(decimals))
        .ok_or(UnitsError::Overflow)?;

    if !frac.is_empty() {
        let scale = unit_factor(decimals - frac.len() as u8);
        let frac = U256::from_str_radix(frac, 10).map_err(|_| UnitsError::Malformed)?;
        let frac = frac.checked_mul(scale).ok_or(UnitsError::Overflow)?;
        amount = amount.checked_add(frac).ok_or(UnitsError::Overflow)?;
    }

    Ok(amount)
}

/// Render a smallest-unit integer as an exact decimal string.
///
/// No rounding and no float detour: `2 * 10^18` with 18 decimals is `"2"`,
/// `15 * 10^17` is `"1.5"`.
pub fn format_units(amount: U256, decimals: u8) -> String {
    let factor = unit_factor(decimals);
    let whole = amount / factor;
    let remainder = amount % factor;
    if remainder.is_zero() {
        return whole.to_string();
    }
    let frac = format!("{:0>width$}", remainder.to_string(), width = decimals as usize);
    format!("{whole}.{frac}", frac = frac.trim_end_matches('0'))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wei(n: u128) -> U256 {
        U256::from(n)
    }

    #[test]
    fn formats_whole_amounts_exactly() {
        assert_eq!(format_units(wei(2_000_000_000_000_000_000), NATIVE_DECIMALS), "2");
        assert_eq!(format_units(U256::ZERO, NATIVE_DECIMALS), "0");
    }

    #[test]
    fn formats_fractional_amounts_without_trailing_zeros() {
        assert_eq!(format_units(wei(1_500_000_000_000_000_000), NATIVE_DECIMALS), "1.5");
        assert_eq!(format_units(wei(1), NATIVE_DECIMALS), "0.000000000000000001");
    }

    #[test]
    fn parses_decimal_input() {
        assert_eq!(parse_units("2", NATIVE_DECIMALS).unwrap(), wei(2_000_000_000_000_000_000));
        assert_eq!(parse_units("1.5", NATIVE_DECIMALS).unwrap(), wei(1_500_000_000_000_000_000));
        assert_eq!(parse_units("0.25", 2).unwrap(), wei(25));
        assert_eq!(parse_units(".5", NATIVE_DECIMALS).unwrap(), wei(500_000_000_000_000_000));
    }

    #[test]
    fn parse_format_round_trips() {
        for input in ["3", "0.125", "1234.000000000000000001"] {
            let parsed = parse_units(input, NATIVE_DECIMALS).unwrap();
            assert_eq!(format_units(parsed, NATIVE_DECIMALS), input);
        }
    }

    #[test]
    fn rejects_bad_input() {
        assert_eq!(parse_units("", NATIVE_DECIMALS), Err(UnitsError::Empty));
        assert_eq!(parse_units("  ", NATIVE_DECIMALS), Err(UnitsError::Empty));
        assert_eq!(parse_units(".", NATIVE_DECIMALS), Err(UnitsError::Malformed));
        assert_eq!(parse_units("1,5", NATIVE_DECIMALS), Err(UnitsError::Malformed));
        assert_eq!(parse_units("-1", NATIVE_DECIMALS), Err(UnitsError::Malformed));
        assert_eq!(parse_units("0.123", 2), Err(UnitsError::TooPrecise(2)));
        // Insignificant trailing zeros are not "extra precision".
        assert_eq!(parse_units("0.120", 2).unwrap(), wei(12));
    }
}
