//! Hexadecimal floating-point text, the only textual form a `float` takes in programs and output.

const MANTISSA_BITS: i64 = 52;
const MIN_NORMAL_EXP: i64 = -1022;
const MAX_EXP: i64 = 1023;
const MIN_LSB_EXP: i64 = MIN_NORMAL_EXP - MANTISSA_BITS;

/// Formats `value` as `[-]0xH.HHHHHHHHHHHHHp±E`, matching the literal syntax.
pub fn format_hex_float(value: f64) -> String {
    if value.is_nan() {
        return "nan".to_string();
    }
    let sign = if value.is_sign_negative() { "-" } else { "" };
    if value.is_infinite() {
        return format!("{}inf", sign);
    }

    let bits = value.to_bits();
    let exponent_bits = ((bits >> 52) & 0x7ff) as i64;
    let fraction = bits & ((1u64 << 52) - 1);
    if exponent_bits == 0 && fraction == 0 {
        return format!("{}0x0.0p+0", sign);
    }

    let (lead, exponent) = if exponent_bits == 0 {
        (0, MIN_NORMAL_EXP)
    } else {
        (1, exponent_bits - MAX_EXP)
    };
    format!("{}0x{}.{:013x}p{:+}", sign, lead, fraction, exponent)
}

/// Parses hexadecimal float text into the nearest double (ties to even).
///
/// Accepts an optional sign, an optional `0x` prefix, hex digits with at most one `.`,
/// and an optional binary exponent `p[+-]D`. `inf`, `infinity` and `nan` are accepted too.
pub fn parse_hex_float(text: &str) -> Option<f64> {
    let text = text.trim();
    let (negative, rest) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    let lower = rest.to_ascii_lowercase();
    let magnitude = match lower.as_str() {
        "inf" | "infinity" => Some(f64::INFINITY),
        "nan" => Some(f64::NAN),
        _ => parse_hex_magnitude(&lower),
    }?;
    Some(if negative { -magnitude } else { magnitude })
}

fn parse_hex_magnitude(body: &str) -> Option<f64> {
    let body = body.strip_prefix("0x").unwrap_or(body);
    let (mantissa_text, exponent_text) = match body.split_once('p') {
        Some((mantissa, exponent)) => (mantissa, Some(exponent)),
        None => (body, None),
    };
    let (int_digits, frac_digits) = match mantissa_text.split_once('.') {
        Some((int_part, frac_part)) => (int_part, frac_part),
        None => (mantissa_text, ""),
    };
    if int_digits.is_empty() && frac_digits.is_empty() {
        return None;
    }

    let exponent = match exponent_text {
        Some(exponent) => parse_exponent(exponent)?,
        None => 0,
    };

    let mut mantissa = 0u128;
    let mut sticky = false;
    let mut scale = exponent.saturating_sub(4 * frac_digits.len() as i64);
    for ch in int_digits.chars().chain(frac_digits.chars()) {
        let digit = ch.to_digit(16)?;
        if mantissa >> 120 == 0 {
            mantissa = (mantissa << 4) | u128::from(digit);
        } else {
            scale = scale.saturating_add(4);
            sticky |= digit != 0;
        }
    }

    if mantissa == 0 {
        return Some(0.0);
    }
    Some(round_to_double(mantissa, scale, sticky))
}

fn parse_exponent(text: &str) -> Option<i64> {
    let (negative, digits) = match text.as_bytes().first() {
        Some(b'-') => (true, &text[1..]),
        Some(b'+') => (false, &text[1..]),
        _ => (false, text),
    };
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    let mut value = 0i64;
    for byte in digits.bytes() {
        value = value
            .saturating_mul(10)
            .saturating_add(i64::from(byte - b'0'));
    }
    Some(if negative { -value } else { value })
}

/// Rounds `mantissa * 2^scale` (plus a nonzero tail when `sticky`) to a double.
fn round_to_double(mantissa: u128, scale: i64, sticky: bool) -> f64 {
    let bit_len = 128 - i64::from(mantissa.leading_zeros());
    let top = scale.saturating_add(bit_len - 1);
    if top > MAX_EXP {
        return f64::INFINITY;
    }
    // Below half the smallest subnormal everything rounds to zero.
    if top < MIN_LSB_EXP - 1 {
        return 0.0;
    }

    let mut lsb = (top - MANTISSA_BITS).max(MIN_LSB_EXP);
    let shift = lsb.saturating_sub(scale);
    let mut kept = if shift <= 0 {
        mantissa << (-shift) as u32
    } else if shift > 128 {
        0
    } else {
        let shift = shift as u32;
        let kept = mantissa.checked_shr(shift).unwrap_or(0);
        let half = (mantissa >> (shift - 1)) & 1 == 1;
        let below = mantissa & ((1u128 << (shift - 1)) - 1) != 0 || sticky;
        if half && (below || kept & 1 == 1) {
            kept + 1
        } else {
            kept
        }
    };

    if kept >> (MANTISSA_BITS + 1) != 0 {
        kept >>= 1;
        lsb += 1;
    }
    if kept == 0 {
        return 0.0;
    }
    let kept_len = 128 - i64::from(kept.leading_zeros());
    if lsb + kept_len - 1 > MAX_EXP {
        return f64::INFINITY;
    }

    (kept as f64) * power_of_two(lsb)
}

fn power_of_two(exponent: i64) -> f64 {
    if exponent >= MIN_NORMAL_EXP {
        f64::from_bits(((exponent + MAX_EXP) as u64) << 52)
    } else {
        f64::from_bits(1u64 << (exponent - MIN_LSB_EXP))
    }
}

#[cfg(test)]
mod float_tests {
    use super::*;

    #[test]
    fn formats_common_values_like_literals() {
        assert_eq!(format_hex_float(2.0), "0x1.0000000000000p+1");
        assert_eq!(format_hex_float(1.0), "0x1.0000000000000p+0");
        assert_eq!(format_hex_float(0.5), "0x1.0000000000000p-1");
        assert_eq!(format_hex_float(-3.0), "-0x1.8000000000000p+1");
        assert_eq!(format_hex_float(0.1), "0x1.999999999999ap-4");
        assert_eq!(format_hex_float(0.0), "0x0.0p+0");
        assert_eq!(format_hex_float(-0.0), "-0x0.0p+0");
    }

    #[test]
    fn formats_subnormals_and_non_finite_values() {
        assert_eq!(
            format_hex_float(f64::from_bits(1)),
            "0x0.0000000000001p-1022"
        );
        assert_eq!(format_hex_float(f64::INFINITY), "inf");
        assert_eq!(format_hex_float(f64::NEG_INFINITY), "-inf");
        assert_eq!(format_hex_float(f64::NAN), "nan");
    }

    #[test]
    fn parses_literal_forms() {
        assert_eq!(parse_hex_float("0x1p+1"), Some(2.0));
        assert_eq!(parse_hex_float("0x0p+0"), Some(0.0));
        assert_eq!(parse_hex_float("-0x1.8p+1"), Some(-3.0));
        assert_eq!(parse_hex_float("0x1.999999999999ap-4"), Some(0.1));
        assert_eq!(parse_hex_float("1.8p1"), Some(3.0));
        assert_eq!(parse_hex_float("0xA"), Some(10.0));
        assert_eq!(parse_hex_float(".8"), Some(0.5));
        assert_eq!(parse_hex_float("+0x1p0"), Some(1.0));
        assert_eq!(parse_hex_float("0x1P-2"), Some(0.25));
    }

    #[test]
    fn rejects_malformed_text() {
        assert_eq!(parse_hex_float(""), None);
        assert_eq!(parse_hex_float("0x"), None);
        assert_eq!(parse_hex_float("."), None);
        assert_eq!(parse_hex_float("0x1g"), None);
        assert_eq!(parse_hex_float("0x1p"), None);
        assert_eq!(parse_hex_float("0x1.2.3"), None);
    }

    #[test]
    fn rounds_long_mantissas_to_nearest_even() {
        // 1 + 2^-53 is exactly halfway between 1 and the next double: ties to even.
        assert_eq!(parse_hex_float("0x1.00000000000008p+0"), Some(1.0));
        assert_eq!(
            parse_hex_float("0x1.00000000000018p+0"),
            Some(f64::from_bits(1.0f64.to_bits() + 2))
        );
        assert_eq!(
            parse_hex_float("0x1.000000000000080000000000000000001p+0"),
            Some(f64::from_bits(1.0f64.to_bits() + 1))
        );
    }

    #[test]
    fn handles_exponent_extremes() {
        assert_eq!(parse_hex_float("0x1p+1024"), Some(f64::INFINITY));
        assert_eq!(parse_hex_float("0x1p-1074"), Some(f64::from_bits(1)));
        assert_eq!(parse_hex_float("0x1p-1076"), Some(0.0));
        assert_eq!(parse_hex_float("0x1.fffffffffffffp+1023"), Some(f64::MAX));
        assert_eq!(parse_hex_float("0x1p-99999999999999999999"), Some(0.0));
        assert_eq!(parse_hex_float("-0x1p-9223372036854775807"), Some(-0.0));
        assert_eq!(
            parse_hex_float("0x1.8p-9223372036854775808"),
            Some(0.0),
            "exponent past i64::MIN saturates"
        );
        assert_eq!(
            parse_hex_float("0x1p+99999999999999999999"),
            Some(f64::INFINITY)
        );
    }

    #[test]
    fn rounds_values_near_the_smallest_subnormal() {
        // Exactly half of 2^-1074 ties to even (zero); anything above rounds up.
        assert_eq!(parse_hex_float("0x1p-1075"), Some(0.0));
        assert_eq!(parse_hex_float("0x1.0000000000001p-1075"), Some(f64::from_bits(1)));
        assert_eq!(parse_hex_float("0x1.8p-1075"), Some(f64::from_bits(1)));
        assert_eq!(parse_hex_float("0x1.fffffffffffffp-1076"), Some(0.0));
    }

    #[test]
    fn formatted_values_parse_back_exactly() {
        for value in [2.0, -0.1, 1e300, 5e-324, 123456.789, f64::MIN_POSITIVE] {
            let text = format_hex_float(value);
            assert_eq!(parse_hex_float(&text), Some(value), "{}", text);
        }
    }
}
