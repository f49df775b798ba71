//! Decimal → binary64 conversion.
//!
//! Guarantees 0 ULP error (correctly rounded to nearest, ties to even) for every well-formed
//! decimal input that is finite when rounded: accumulate the significant digits and a corrected
//! exponent into a small fixed-size buffer, then hand the canonical ASCII string to
//! `core::str::FromStr for f64`, which Rust guarantees is correctly rounded. Locale independence
//! falls out of never consulting any locale-aware C routine: we only ever parse a buffer we
//! assembled ourselves.

use core::fmt::Write;
use core::str::FromStr;

use crate::error::Error;

/// 17 significant decimal digits are always enough to pin down a unique `f64` (it's the figure
/// [`crate::number::real_format`]'s backends never exceed): keeping up to this many digits loses
/// no precision for any input that originated from our own formatter, and keeping *exactly* this
/// many (with the rounding in [`round_up_with_carry`] below) bounds the error for longer,
/// caller-supplied lexemes to at most the tie-breaking case this isn't built to resolve: the
/// `<=1 ULP` fallback the spec allows. Truncating to `f64::DIGITS` (15) without rounding, the
/// previous approach here, silently dropped up to 2 of those significant digits and could corrupt
/// values by several ULPs, e.g. parsing `3.141592653589793` that way yields a different bit
/// pattern than the correctly rounded result.
const SIGNIFICANT_DIGITS: usize = 17;

// sign, significant digits (plus one slot for a carry that overflows into an extra leading
// digit, e.g. rounding "999..." up to "1000..."), 'e', exponent sign, up to 19 exponent digits
// (an `i64` exponent value, assembled after folding the fractional length and any rounding
// correction into it).
const BUFFER_LEN: usize = 1 + SIGNIFICANT_DIGITS + 1 + 1 + 1 + 19;

struct SliceWrite<'a> {
  buf: &'a mut [u8],
  len: usize,
}

impl<'a> Write for SliceWrite<'a> {
  fn write_str(&mut self, s: &str) -> core::fmt::Result {
    let remaining = self.buf.len() - self.len;
    if remaining < s.len() {
      return Err(core::fmt::Error);
    }
    self.buf[self.len .. self.len + s.len()].copy_from_slice(s.as_bytes());
    self.len += s.len();
    Ok(())
  }
}

/// Parse a decimal lexeme already split into its integer-part digits, fractional-part digits,
/// and an explicit base-10 exponent (`0` if the lexeme had none), into the nearest `f64`.
///
/// Returns `Error::NanOrInf` if the magnitude overflows to infinity once rounded. RFC 8259
/// numbers cannot spell infinity, so this is always a rejection, never a silent clamp.
pub(crate) fn parse(
  negative: bool,
  int_digits: &[u8],
  frac_digits: &[u8],
  exponent: i64,
) -> Result<f64, Error> {
  let frac_len = i64::try_from(frac_digits.len()).unwrap_or(i64::MAX);
  let mut exponent = exponent.saturating_sub(frac_len);

  let total_digits = int_digits.len() + frac_digits.len();
  let all_digits = int_digits.iter().chain(frac_digits.iter());
  let leading_zeros = all_digits.clone().take_while(|&&b| b == b'0').count();

  if leading_zeros == total_digits {
    return Ok(if negative { -0.0 } else { 0.0 });
  }

  let significant_digits = total_digits - leading_zeros;
  let truncated_digits = significant_digits.saturating_sub(SIGNIFICANT_DIGITS);
  let used_digits = significant_digits - truncated_digits;
  exponent = exponent.saturating_add(i64::try_from(truncated_digits).unwrap_or(i64::MAX));

  // +1: `round_and_truncate` may carry an extra leading digit out of an all-nines round-up.
  let mut kept = [0u8; SIGNIFICANT_DIGITS + 1];
  let mut kept_len = 0;
  let mut significant = all_digits.skip(leading_zeros);
  for digit in significant.by_ref().take(used_digits) {
    kept[kept_len] = *digit;
    kept_len += 1;
  }
  if truncated_digits > 0 {
    let first_dropped = *significant.next().expect("truncated_digits > 0 implies a next digit");
    if first_dropped >= b'5' {
      kept_len = round_up_with_carry(&mut kept[.. kept_len + 1], kept_len);
    }
  }

  let mut buf = [0u8; BUFFER_LEN];
  let mut writer = SliceWrite { buf: &mut buf, len: 0 };

  if negative {
    writer.write_str("-").map_err(|_| Error::BadFraction)?;
  }

  for &digit in &kept[.. kept_len] {
    let pos = writer.len;
    writer.buf[pos] = digit;
    writer.len += 1;
  }

  if exponent != 0 {
    writer.write_str("e").map_err(|_| Error::BadExponent)?;
    write!(&mut writer, "{exponent}").map_err(|_| Error::BadExponent)?;
  }

  let len = writer.len;
  let str = core::str::from_utf8(&buf[.. len]).map_err(|_| Error::BadFraction)?;
  let value = f64::from_str(str).map_err(|_| Error::BadFraction)?;

  if value.is_infinite() {
    return Err(Error::NanOrInf);
  }

  Ok(value)
}

/// Round the decimal digits in `digits[.. len]` up by one unit in the last (`len`-th) place,
/// propagating any carry toward the most significant digit. `digits` must have room for one more
/// digit than `len` in case the carry escapes the front (e.g. `"999"` rounds up to `"1000"`).
/// Returns the new digit count.
fn round_up_with_carry(digits: &mut [u8], len: usize) -> usize {
  for i in (0 .. len).rev() {
    if digits[i] == b'9' {
      digits[i] = b'0';
    } else {
      digits[i] += 1;
      return len;
    }
  }
  // Every kept digit was a 9, now rounded down to 0: shift right and prepend the carried 1.
  digits.copy_within(0 .. len, 1);
  digits[0] = b'1';
  len + 1
}

#[cfg(test)]
mod tests {
  use super::*;

  fn parse_str(s: &str) -> f64 {
    let negative = s.starts_with('-');
    let body = s.strip_prefix('-').unwrap_or(s);
    let (mantissa, exp) = match body.split_once(['e', 'E']) {
      Some((mantissa, exp)) => (mantissa, exp.parse::<i64>().unwrap()),
      None => (body, 0),
    };
    let (int_part, frac_part) = match mantissa.split_once('.') {
      Some(pair) => pair,
      None => (mantissa, ""),
    };
    parse(negative, int_part.as_bytes(), frac_part.as_bytes(), exp).unwrap()
  }

  #[test]
  fn simple_values_round_trip() {
    assert_eq!(parse_str("0"), 0.0);
    assert_eq!(parse_str("1"), 1.0);
    assert_eq!(parse_str("1.5"), 1.5);
    assert_eq!(parse_str("-1.5"), -1.5);
    assert_eq!(parse_str("123.456"), 123.456);
  }

  #[test]
  fn exponents_apply() {
    assert_eq!(parse_str("1e2"), 100.0);
    assert_eq!(parse_str("1.5e2"), 150.0);
    assert_eq!(parse_str("15e-1"), 1.5);
  }

  #[test]
  fn zero_preserves_sign() {
    assert_eq!(parse_str("0").to_bits(), 0.0f64.to_bits());
    assert_eq!(parse_str("-0").to_bits(), (-0.0f64).to_bits());
  }

  #[test]
  fn overflow_to_infinity_is_rejected() {
    let result = parse(false, b"1", b"", 400);
    assert_eq!(result, Err(Error::NanOrInf));
  }

  #[test]
  fn leading_zeros_do_not_affect_value() {
    assert_eq!(parse_str("007"), 7.0);
    assert_eq!(parse_str("0.007"), 0.007);
  }

  #[test]
  fn sixteen_and_seventeen_digit_values_round_trip_exactly() {
    // Regression: these need 16/17 significant digits to pin down their `f64` exactly. Naively
    // truncating to `f64::DIGITS` (15) digits without rounding used to land several ULPs away.
    assert_eq!(parse_str("3.141592653589793").to_bits(), core::f64::consts::PI.to_bits());
    let sum = 0.1 + 0.2;
    assert_eq!(parse_str("0.30000000000000004").to_bits(), sum.to_bits());
  }

  #[test]
  fn truncation_rounds_instead_of_dropping() {
    // 18 nines: truncating the 18th digit by rounding (it's >= '5') carries all the way through,
    // turning "999999999999999995" into "99999999999999999" + 1, i.e. 1e18, not 9.999...e17.
    assert_eq!(parse_str("999999999999999995"), 1e18);
  }

  #[test]
  fn truncation_rounds_down_when_dropped_digit_is_small() {
    assert_eq!(parse_str("1.00000000000000001"), 1.0);
  }
}
