//! Scans a JSON number lexeme into a [`Value`], and the two decimal/binary64 conversions and the
//! integer formatter that back it.

mod real_format;
mod real_parse;
mod int_format;

pub(crate) use real_format::{format as format_real, BUFFER_LEN as REAL_BUFFER_LEN};
pub(crate) use int_format::{signed as format_signed, unsigned as format_unsigned};

use crate::error::Error;
use crate::value::Value;

/// Flags controlling how the scanner classifies a numeric lexeme.
///
/// Bit-packed into a single `u8` since there are exactly two independent booleans here and a
/// packed representation avoids wasting a byte per flag.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct ScanFlags(u8);

impl ScanFlags {
  const ALLOW_INF_AND_NAN: u8 = 1 << 0;
  const NUMBER_AS_RAW: u8 = 1 << 1;

  /// No flags set: strict RFC 8259 numbers, parsed to scalars.
  #[must_use]
  pub fn empty() -> Self {
    Self(0)
  }

  /// Accept the `NaN`, `Infinity`, `-Infinity` literals outside RFC 8259.
  #[must_use]
  pub fn with_allow_inf_and_nan(mut self) -> Self {
    self.0 |= Self::ALLOW_INF_AND_NAN;
    self
  }

  /// Preserve every numeric lexeme as [`Value::Raw`] instead of parsing it to a scalar.
  #[must_use]
  pub fn with_number_as_raw(mut self) -> Self {
    self.0 |= Self::NUMBER_AS_RAW;
    self
  }

  fn allow_inf_and_nan(self) -> bool {
    self.0 & Self::ALLOW_INF_AND_NAN != 0
  }

  fn number_as_raw(self) -> bool {
    self.0 & Self::NUMBER_AS_RAW != 0
  }
}

/// Classify a numeric lexeme into a [`Value`].
///
/// Exact steps:
/// 1. An optional leading `-` is consumed as the sign.
/// 2. If the remaining bytes spell `Infinity`/`NaN` (case-sensitive) exactly, this short-circuits:
///    with `ALLOW_INF_AND_NAN` set, to a literal [`Value::Real`]; without it, to
///    [`Error::LiteralNotAllowed`].
/// 3. At least one digit must follow; otherwise [`Error::NoDigit`].
/// 4. An optional `.` fractional part (at least one digit, else [`Error::BadFraction`]) and an
///    optional `e`/`E` exponent (optional sign, at least one digit, else [`Error::BadExponent`])
///    follow. Once the lexeme ends, `input` must be fully consumed; any bytes left over are
///    [`Error::TrailingGarbage`], so `input` must be a pre-delimited numeric lexeme (callers
///    splitting a number out of a larger document, such as [`crate::reader`], must trim it to
///    exactly the numeral first).
/// 5. With `NUMBER_AS_RAW`, the original slice is preserved verbatim as [`Value::Raw`].
/// 6. With no fractional part and no exponent, the lexeme is an integer: unsigned unless signed,
///    promoted to `Real` on overflow.
/// 7. Otherwise the real parser in [`real_parse`] produces the `f64`.
pub fn scan(input: &[u8], flags: ScanFlags) -> Result<Value<'_>, Error> {
  let mut i = 0;
  let negative = input.first() == Some(&b'-');
  if negative {
    i += 1;
  }

  let rest = &input[i ..];
  if rest == b"Infinity" || (!negative && rest == b"NaN") {
    if !flags.allow_inf_and_nan() {
      return Err(Error::LiteralNotAllowed);
    }
    if rest == b"NaN" {
      return Ok(Value::Real(f64::NAN));
    }
    return Ok(Value::Real(if negative { f64::NEG_INFINITY } else { f64::INFINITY }));
  }

  let int_start = i;
  while i < input.len() && input[i].is_ascii_digit() {
    i += 1;
  }
  if i == int_start {
    return Err(Error::NoDigit);
  }
  if input[int_start] == b'0' && i - int_start > 1 {
    return Err(Error::LeadingZero);
  }
  let int_digits = &input[int_start .. i];

  let mut frac_digits: &[u8] = &[];
  if input.get(i) == Some(&b'.') {
    i += 1;
    let frac_start = i;
    while i < input.len() && input[i].is_ascii_digit() {
      i += 1;
    }
    if i == frac_start {
      return Err(Error::BadFraction);
    }
    frac_digits = &input[frac_start .. i];
  }

  let mut exponent: i64 = 0;
  if matches!(input.get(i), Some(&b'e') | Some(&b'E')) {
    i += 1;
    let exp_negative = match input.get(i) {
      Some(&b'+') => {
        i += 1;
        false
      }
      Some(&b'-') => {
        i += 1;
        true
      }
      _ => false,
    };
    let exp_start = i;
    while i < input.len() && input[i].is_ascii_digit() {
      i += 1;
    }
    if i == exp_start {
      return Err(Error::BadExponent);
    }
    exponent = parse_exponent(&input[exp_start .. i], exp_negative);
  }

  if i != input.len() {
    return Err(Error::TrailingGarbage);
  }

  if flags.number_as_raw() {
    return Ok(Value::Raw(input));
  }

  if frac_digits.is_empty() && exponent == 0 {
    if let Some(value) = parse_u64(int_digits) {
      if !negative {
        return Ok(Value::Uint(value));
      }
      if value <= i64::MIN.unsigned_abs() {
        // Negating within the unsigned domain and reinterpreting the bit pattern as `i64` is
        // correct for every magnitude up to and including `i64::MIN`'s (`2^63`), which has no
        // positive `i64` counterpart to round-trip through signed negation directly.
        #[allow(clippy::cast_possible_wrap)]
        return Ok(Value::Sint(value.wrapping_neg() as i64));
      }
    }
  }

  let real = real_parse::parse(negative, int_digits, frac_digits, exponent)?;
  Ok(Value::Real(real))
}

fn parse_u64(digits: &[u8]) -> Option<u64> {
  let mut value: u64 = 0;
  for &digit in digits {
    value = value.checked_mul(10)?.checked_add(u64::from(digit - b'0'))?;
  }
  Some(value)
}

fn parse_exponent(digits: &[u8], negative: bool) -> i64 {
  let mut value: i64 = 0;
  for &digit in digits {
    value = match value.checked_mul(10).and_then(|v| v.checked_add(i64::from(digit - b'0'))) {
      Some(v) => v,
      // An exponent this large overflows to infinity/zero regardless; saturate instead of
      // wrapping so the real parser's overflow check still does the right thing.
      None => return if negative { i64::MIN } else { i64::MAX },
    };
  }
  if negative {
    value.wrapping_neg()
  } else {
    value
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn scan_default(input: &[u8]) -> Result<Value<'_>, Error> {
    scan(input, ScanFlags::empty())
  }

  #[test]
  fn integers() {
    assert!(matches!(scan_default(b"0"), Ok(Value::Uint(0))));
    assert!(matches!(scan_default(b"42"), Ok(Value::Uint(42))));
    assert!(matches!(scan_default(b"-42"), Ok(Value::Sint(-42))));
    assert!(matches!(scan_default(b"-0"), Ok(Value::Sint(0))));
  }

  #[test]
  fn i64_min_is_exact() {
    let input = i64::MIN.to_string();
    assert!(matches!(scan_default(input.as_bytes()), Ok(Value::Sint(v)) if v == i64::MIN));
  }

  #[test]
  fn u64_max_is_exact() {
    let input = u64::MAX.to_string();
    assert!(matches!(scan_default(input.as_bytes()), Ok(Value::Uint(v)) if v == u64::MAX));
  }

  #[test]
  fn overflowing_integer_promotes_to_real() {
    let input = "99999999999999999999999999999999";
    assert!(matches!(scan_default(input.as_bytes()), Ok(Value::Real(_))));
  }

  #[test]
  fn reals() {
    assert!(matches!(scan_default(b"1.5"), Ok(Value::Real(v)) if v == 1.5));
    assert!(matches!(scan_default(b"1e10"), Ok(Value::Real(v)) if v == 1e10));
    assert!(matches!(scan_default(b"-1.5e-3"), Ok(Value::Real(v)) if v == -1.5e-3));
  }

  #[test]
  fn rejects_no_digit() {
    assert_eq!(scan_default(b"-"), Err(Error::NoDigit));
    assert_eq!(scan_default(b""), Err(Error::NoDigit));
  }

  #[test]
  fn rejects_leading_zero() {
    assert_eq!(scan_default(b"01"), Err(Error::LeadingZero));
  }

  #[test]
  fn rejects_bad_fraction() {
    assert_eq!(scan_default(b"1."), Err(Error::BadFraction));
  }

  #[test]
  fn rejects_bad_exponent() {
    assert_eq!(scan_default(b"1e"), Err(Error::BadExponent));
    assert_eq!(scan_default(b"1e+"), Err(Error::BadExponent));
  }

  #[test]
  fn literals_require_flag() {
    assert_eq!(scan_default(b"Infinity"), Err(Error::LiteralNotAllowed));
    assert_eq!(scan_default(b"NaN"), Err(Error::LiteralNotAllowed));

    let flags = ScanFlags::empty().with_allow_inf_and_nan();
    assert!(matches!(scan(b"Infinity", flags), Ok(Value::Real(v)) if v.is_infinite() && v > 0.0));
    assert!(matches!(scan(b"-Infinity", flags), Ok(Value::Real(v)) if v.is_infinite() && v < 0.0));
    assert!(matches!(scan(b"NaN", flags), Ok(Value::Real(v)) if v.is_nan()));
  }

  #[test]
  fn raw_mode_preserves_lexeme() {
    let flags = ScanFlags::empty().with_number_as_raw();
    assert!(matches!(scan(b"1.5e10", flags), Ok(Value::Raw(b"1.5e10"))));
  }

  #[test]
  fn rejects_trailing_garbage() {
    assert_eq!(scan_default(b"1abc"), Err(Error::TrailingGarbage));
    assert_eq!(scan_default(b"1.5 "), Err(Error::TrailingGarbage));
    assert_eq!(scan_default(b"1e10x"), Err(Error::TrailingGarbage));

    let flags = ScanFlags::empty().with_number_as_raw();
    assert_eq!(scan(b"1abc", flags), Err(Error::TrailingGarbage));
  }
}
