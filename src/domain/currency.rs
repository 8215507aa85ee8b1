//! Satoshi to BTC conversion.
//!
//! Amounts travel from the API as integer satoshi and are kept as exact decimal
//! strings on the client. Conversion is integer arithmetic only, so no amount
//! ever passes through a float.

/// Number of satoshi in one BTC.
pub const SATOSHI_PER_BTC: i64 = 100_000_000;

/// Number of decimal places in a BTC amount.
const BTC_SCALE: usize = 8;

/// Converts an integer satoshi amount into a decimal BTC string.
///
/// The result has at most eight fractional digits, trailing zeros trimmed,
/// and no unit suffix.
///
/// # Examples
///
/// ```
/// use votefeed::domain::currency::satoshi_to_btc;
///
/// assert_eq!(satoshi_to_btc(100_000_000), "1");
/// assert_eq!(satoshi_to_btc(0), "0");
/// assert_eq!(satoshi_to_btc(150_000_000), "1.5");
/// assert_eq!(satoshi_to_btc(1), "0.00000001");
/// ```
#[must_use]
pub fn satoshi_to_btc(satoshi: i64) -> String {
    let sign = if satoshi < 0 { "-" } else { "" };
    let magnitude = satoshi.unsigned_abs();
    let per_btc = SATOSHI_PER_BTC.unsigned_abs();

    let whole = magnitude / per_btc;
    let fraction = magnitude % per_btc;

    if fraction == 0 {
        return format!("{sign}{whole}");
    }

    let digits = format!("{fraction:0width$}", width = BTC_SCALE);
    let digits = digits.trim_end_matches('0');
    format!("{sign}{whole}.{digits}")
}

/// Parses a satoshi amount written as a decimal integer string.
///
/// Surrounding whitespace is ignored. Returns `None` for anything that is not
/// a plain integer (no fractions, no exponents).
#[must_use]
pub fn parse_satoshi(raw: &str) -> Option<i64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<i64>().ok()
}

/// Appends the unit suffix for display.
#[must_use]
pub fn display_btc(amount: &str) -> String {
    format!("{amount} BTC")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whole_and_zero_amounts() {
        assert_eq!(satoshi_to_btc(100_000_000), "1");
        assert_eq!(satoshi_to_btc(0), "0");
        assert_eq!(satoshi_to_btc(2_100_000_000_000_000), "21000000");
    }

    #[test]
    fn fractional_amounts_keep_every_satoshi() {
        assert_eq!(satoshi_to_btc(1), "0.00000001");
        assert_eq!(satoshi_to_btc(123_456_789), "1.23456789");
        assert_eq!(satoshi_to_btc(50_000), "0.0005");
    }

    #[test]
    fn negative_amounts_keep_sign() {
        assert_eq!(satoshi_to_btc(-150_000_000), "-1.5");
        assert_eq!(satoshi_to_btc(i64::MIN), "-92233720368.54775808");
    }

    #[test]
    fn parse_rejects_non_integers() {
        assert_eq!(parse_satoshi(" 42 "), Some(42));
        assert_eq!(parse_satoshi("1.5"), None);
        assert_eq!(parse_satoshi("1e8"), None);
        assert_eq!(parse_satoshi(""), None);
    }
}
