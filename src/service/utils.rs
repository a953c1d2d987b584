use alloy::primitives::{U256, aliases::I256};
use rust_decimal::Decimal;

use super::ServiceResult;
use super::error::ServiceError;

/// Parse a human-readable decimal amount into its raw integer representation.
///
/// Fractional digits beyond `decimals` are truncated, never rounded up, so a
/// parsed amount can never exceed what the user typed.
pub fn parse_units(amount: &str, decimals: u8) -> ServiceResult<U256> {
    let trimmed = amount.trim();
    let (integer, fraction) = match trimmed.split_once('.') {
        Some((i, f)) => (i, f),
        None => (trimmed, ""),
    };

    if integer.is_empty() && fraction.is_empty() {
        return Err(ServiceError::InvalidAmount(amount.to_string()));
    }
    if !integer.chars().all(|c| c.is_ascii_digit())
        || !fraction.chars().all(|c| c.is_ascii_digit())
    {
        return Err(ServiceError::InvalidAmount(amount.to_string()));
    }

    let mut digits = String::with_capacity(integer.len() + decimals as usize);
    digits.push_str(integer);
    let width = decimals as usize;
    if fraction.len() >= width {
        digits.push_str(&fraction[..width]);
    } else {
        digits.push_str(fraction);
        digits.extend(std::iter::repeat_n('0', width - fraction.len()));
    }

    let digits = digits.trim_start_matches('0');
    if digits.is_empty() {
        return Ok(U256::ZERO);
    }

    U256::from_str_radix(digits, 10)
        .map_err(|_| ServiceError::InvalidAmount(amount.to_string()))
}

/// Format a raw integer amount as a decimal string.
///
/// Trailing fractional zeros are trimmed but at least one fractional digit is
/// always kept, so whole amounts render as e.g. `100.0`.
pub fn format_units(raw: U256, decimals: u8) -> String {
    if decimals == 0 {
        return format!("{raw}.0");
    }

    let scale = U256::from(10).pow(U256::from(decimals));
    let integer = raw / scale;
    let remainder = raw % scale;

    let mut fraction = format!("{remainder:0>width$}", width = decimals as usize);
    while fraction.len() > 1 && fraction.ends_with('0') {
        fraction.pop();
    }

    format!("{integer}.{fraction}")
}

/// Convert a raw integer amount into a `Decimal` for fiat arithmetic.
pub fn u256_to_decimal(raw: U256, decimals: u8) -> ServiceResult<Decimal> {
    format_units(raw, decimals)
        .parse::<Decimal>()
        .map_err(|e| ServiceError::InvalidAmount(format!("{raw}: {e}")))
}

/// Scale a Chainlink feed answer by the feed's reported decimals.
///
/// Bounded by `Decimal`'s range: an answer outside i128 or a scale beyond
/// 28 digits is an error, not a panic, since the feed address is
/// caller-supplied.
pub fn format_feed_answer(answer: I256, decimals: u8) -> ServiceResult<Decimal> {
    let raw: i128 = answer
        .try_into()
        .map_err(|e| ServiceError::InvalidAmount(format!("{answer}: {e}")))?;
    Decimal::try_from_i128_with_scale(raw, decimals as u32)
        .map_err(|e| ServiceError::InvalidAmount(format!("{answer} at {decimals} decimals: {e}")))
}

/// Convert an amount of wei into USD at the given ETH/USD price.
pub fn wei_to_usd(wei: U256, eth_usd: Decimal) -> ServiceResult<Decimal> {
    Ok(u256_to_decimal(wei, 18)? * eth_usd)
}

/// Render a USD amount as `$X.YZ`, rounded to cents.
pub fn format_usd(value: Decimal) -> String {
    format!("${:.2}", value.round_dp(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_whole_amount() {
        assert_eq!(parse_units("100", 6).unwrap(), U256::from(100_000_000u64));
        assert_eq!(
            parse_units("1", 18).unwrap(),
            U256::from(1_000_000_000_000_000_000u128)
        );
    }

    #[test]
    fn parse_fractional_amount() {
        assert_eq!(parse_units("0.5", 6).unwrap(), U256::from(500_000u64));
        assert_eq!(parse_units("1.25", 8).unwrap(), U256::from(125_000_000u64));
        assert_eq!(parse_units(".5", 6).unwrap(), U256::from(500_000u64));
    }

    #[test]
    fn parse_truncates_excess_precision() {
        // 7th decimal digit is dropped, not rounded.
        assert_eq!(parse_units("0.1234567", 6).unwrap(), U256::from(123_456u64));
        assert_eq!(parse_units("0.9999999", 6).unwrap(), U256::from(999_999u64));
    }

    #[test]
    fn parse_zero() {
        assert_eq!(parse_units("0", 18).unwrap(), U256::ZERO);
        assert_eq!(parse_units("0.0", 18).unwrap(), U256::ZERO);
    }

    #[test]
    fn parse_rejects_garbage() {
        for input in ["", ".", "abc", "1.2.3", "-1", "1,5"] {
            assert!(
                matches!(parse_units(input, 6), Err(ServiceError::InvalidAmount(_))),
                "expected InvalidAmount for {input:?}"
            );
        }
    }

    #[test]
    fn format_whole_amount_keeps_one_fractional_digit() {
        assert_eq!(format_units(U256::from(100_000_000u64), 6), "100.0");
        assert_eq!(format_units(U256::ZERO, 18), "0.0");
        assert_eq!(format_units(U256::from(42u64), 0), "42.0");
    }

    #[test]
    fn format_fractional_amount() {
        assert_eq!(format_units(U256::from(500_000u64), 6), "0.5");
        assert_eq!(format_units(U256::from(123_456u64), 6), "0.123456");
        assert_eq!(
            format_units(U256::from(1_500_000_000_000_000_000u128), 18),
            "1.5"
        );
    }

    #[test]
    fn parse_then_format_round_trips() {
        let raw = parse_units("2.75", 8).unwrap();
        assert_eq!(format_units(raw, 8), "2.75");
    }

    #[test]
    fn decimal_conversion() {
        let value = u256_to_decimal(U256::from(2_500_000u64), 6).unwrap();
        assert_eq!(value, Decimal::new(25, 1));
    }

    #[test]
    fn feed_answer_scaling() {
        // An 8-decimal Chainlink answer of $2000.50000000.
        let answer = I256::try_from(200_050_000_000i64).unwrap();
        let price = format_feed_answer(answer, 8).unwrap();
        assert_eq!(price, Decimal::new(200_050, 2));
    }

    #[test]
    fn feed_answer_with_oversized_decimals_is_an_error() {
        let answer = I256::try_from(100i64).unwrap();
        assert!(matches!(
            format_feed_answer(answer, 30),
            Err(ServiceError::InvalidAmount(_))
        ));
        assert!(matches!(
            format_feed_answer(answer, u8::MAX),
            Err(ServiceError::InvalidAmount(_))
        ));
    }

    #[test]
    fn usd_formatting_rounds_to_cents() {
        assert_eq!(format_usd(Decimal::new(12_345, 3)), "$12.35");
        assert_eq!(format_usd(Decimal::new(5, 0)), "$5.00");
    }

    #[test]
    fn wei_conversion_at_known_price() {
        // 0.01 ETH at $2000/ETH is $20.
        let wei = U256::from(10_000_000_000_000_000u128);
        let usd = wei_to_usd(wei, Decimal::from(2000)).unwrap();
        assert_eq!(usd, Decimal::from(20));
    }
}
