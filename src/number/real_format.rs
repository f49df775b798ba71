//! binary64 → decimal formatting.
//!
//! A `ryu`-backed path (feature `ryu`, default-on) and a `core::fmt`-`Write`-into-a-fixed-buffer
//! fallback for when it isn't available. Either backend only has to produce *a* shortest
//! round-trip decimal; [`decompose`] then normalizes whichever one ran into significant digits
//! plus a power-of-ten exponent, and [`render`] renders that into this crate's fixed/scientific
//! output contract, so the two backends never need to agree on notation themselves.

use core::fmt::Write;

/// Long enough for a sign, the longest fixed-notation rendering our bounds allow (`f64::DIGITS`
/// digits plus up to 20 leading/trailing zeros), or the longest scientific rendering.
pub(crate) const BUFFER_LEN: usize = 32;

/// The most significant digits any backend hands us; `f64` never needs more than 17 to round-trip.
const MAX_DIGITS: usize = 17;

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

/// Format a finite `f64` as this crate's shortest round-trip decimal. Writes into `buf` and
/// returns the written prefix as a `str`.
///
/// Non-finite inputs (`NaN`, `±Infinity`) are handled by the writer directly as bare literals and
/// never reach this function.
pub(crate) fn format<'a>(value: f64, buf: &'a mut [u8; BUFFER_LEN]) -> &'a str {
  debug_assert!(value.is_finite());

  let mut backend_buf = [0u8; BUFFER_LEN];
  let backend = backend_format(value, &mut backend_buf);
  let decomposed = decompose(backend);
  render(&decomposed, buf)
}

#[cfg(feature = "ryu")]
fn backend_format<'a>(value: f64, buf: &'a mut [u8; BUFFER_LEN]) -> &'a str {
  let mut ryu_buf = ryu::Buffer::new();
  let formatted = ryu_buf.format_finite(value).as_bytes();
  buf[.. formatted.len()].copy_from_slice(formatted);
  // `ryu` only ever emits ASCII digits, '.', '-', and 'e'.
  core::str::from_utf8(&buf[.. formatted.len()]).expect("ryu output is not valid UTF-8")
}

// Ask `core::fmt` for the shortest round-trip decimal via `{:?}` and let `decompose` below do
// the truncation/correction that the `ryu` backend does inline.
#[cfg(not(feature = "ryu"))]
fn backend_format<'a>(value: f64, buf: &'a mut [u8; BUFFER_LEN]) -> &'a str {
  let mut writer = SliceWrite { buf, len: 0 };
  write!(&mut writer, "{value:?}").expect("fixed buffer undersized for f64 Debug output");
  let len = writer.len;
  core::str::from_utf8(&buf[.. len]).expect("core::fmt only emits ASCII for f64")
}

/// A decimal value normalized to "significant digits, with the decimal point implicitly after
/// the first digit" form: `value = (-1)^negative * 0.d1d2..dn * 10^(exponent + 1)`, i.e.
/// `exponent` is the power of ten of the first significant digit.
struct Decomposed {
  negative: bool,
  digits: [u8; MAX_DIGITS],
  digit_count: usize,
  exponent: i32,
}

impl Decomposed {
  fn digits_str(&self) -> &str {
    // ASCII digits only, by construction.
    core::str::from_utf8(&self.digits[.. self.digit_count]).expect("only ASCII digits stored")
  }
}

/// Parse a backend's decimal string (`-?\d+(\.\d+)?([eE][+-]?\d+)?`) into normalized form,
/// stripping leading and trailing zeros and folding them into the exponent.
fn decompose(source: &str) -> Decomposed {
  let (negative, rest) = match source.strip_prefix('-') {
    Some(rest) => (true, rest),
    None => (false, source),
  };

  let (mantissa, exp_part) = match rest.find(['e', 'E']) {
    Some(index) => (&rest[.. index], rest[index + 1 ..].parse::<i32>().unwrap_or(0)),
    None => (rest, 0),
  };

  let (int_part, frac_part) = match mantissa.split_once('.') {
    Some(pair) => pair,
    None => (mantissa, ""),
  };

  // `value = digits_as_integer * 10^point_exponent`, where `digits_as_integer` is `int_part` and
  // `frac_part` concatenated, read as a plain base-10 integer.
  let mut point_exponent = exp_part - i32::try_from(frac_part.len()).unwrap_or(i32::MAX);

  let mut digits = [0u8; MAX_DIGITS];
  let mut digit_count = 0;
  let mut seen_nonzero = false;
  let mut trailing_zero_run = 0usize;

  for &byte in int_part.as_bytes().iter().chain(frac_part.as_bytes()) {
    if !seen_nonzero && byte == b'0' {
      // Leading zero: contributes no value and doesn't shift the exponent.
      continue;
    }
    seen_nonzero = true;

    if digit_count < digits.len() {
      digits[digit_count] = byte;
      digit_count += 1;
    }

    trailing_zero_run = if byte == b'0' { trailing_zero_run + 1 } else { 0 };
  }

  // Stripping a trailing zero divides the represented integer by ten; the exponent absorbs it so
  // the value is unchanged.
  digit_count -= trailing_zero_run;
  point_exponent += i32::try_from(trailing_zero_run).unwrap_or(0);

  if digit_count == 0 {
    return Decomposed { negative, digits, digit_count: 0, exponent: 0 };
  }

  let exponent = point_exponent + i32::try_from(digit_count).unwrap_or(0) - 1;
  Decomposed { negative, digits, digit_count, exponent }
}

fn render<'a>(value: &Decomposed, buf: &'a mut [u8; BUFFER_LEN]) -> &'a str {
  let mut writer = SliceWrite { buf, len: 0 };

  if value.negative {
    writer.write_str("-").expect("fixed buffer undersized");
  }

  if value.digit_count == 0 {
    writer.write_str("0.0").expect("fixed buffer undersized");
    return finish(writer);
  }

  // [1e-4, 1e21): a value whose first significant digit sits at position `exponent` has magnitude
  // in that range exactly when `-4 <= exponent <= 20`.
  if (-4 ..= 20).contains(&value.exponent) {
    render_fixed(value, &mut writer);
  } else {
    render_scientific(value, &mut writer);
  }

  finish(writer)
}

fn render_fixed(value: &Decomposed, writer: &mut SliceWrite<'_>) {
  let digits = value.digits_str();
  let point_position = value.exponent + 1;

  if point_position <= 0 {
    writer.write_str("0.").expect("fixed buffer undersized");
    for _ in 0 .. (-point_position) {
      writer.write_str("0").expect("fixed buffer undersized");
    }
    writer.write_str(digits).expect("fixed buffer undersized");
    return;
  }

  #[allow(clippy::cast_sign_loss)]
  let point_position = point_position as usize;

  if point_position >= digits.len() {
    writer.write_str(digits).expect("fixed buffer undersized");
    for _ in 0 .. (point_position - digits.len()) {
      writer.write_str("0").expect("fixed buffer undersized");
    }
    writer.write_str(".0").expect("fixed buffer undersized");
  } else {
    let (whole, frac) = digits.split_at(point_position);
    writer.write_str(whole).expect("fixed buffer undersized");
    writer.write_str(".").expect("fixed buffer undersized");
    writer.write_str(frac).expect("fixed buffer undersized");
  }
}

fn render_scientific(value: &Decomposed, writer: &mut SliceWrite<'_>) {
  let digits = value.digits_str();
  let (first, rest) = digits.split_at(1);

  writer.write_str(first).expect("fixed buffer undersized");
  if !rest.is_empty() {
    writer.write_str(".").expect("fixed buffer undersized");
    writer.write_str(rest).expect("fixed buffer undersized");
  }
  writer.write_str("e").expect("fixed buffer undersized");
  write!(writer, "{}", value.exponent).expect("fixed buffer undersized");
}

fn finish<'a>(writer: SliceWrite<'a>) -> &'a str {
  core::str::from_utf8(&writer.buf[.. writer.len]).expect("we only ever wrote ASCII")
}

#[cfg(test)]
mod tests {
  extern crate std;

  use super::*;
  use std::string::String;

  fn format_str(value: f64) -> String {
    let mut buf = [0u8; BUFFER_LEN];
    format(value, &mut buf).into()
  }

  #[test]
  fn fixed_notation_within_bounds() {
    assert_eq!(format_str(1.0), "1.0");
    assert_eq!(format_str(0.5), "0.5");
    assert_eq!(format_str(123.456), "123.456");
    assert_eq!(format_str(0.0001), "0.0001");
  }

  #[test]
  fn scientific_outside_bounds() {
    assert_eq!(format_str(1e21), "1e21");
    assert_eq!(format_str(1e-5), "1e-5");
    assert_eq!(format_str(1.5e30), "1.5e30");
  }

  #[test]
  fn zero_formats_with_sign() {
    assert_eq!(format_str(0.0), "0.0");
    assert_eq!(format_str(-0.0), "-0.0");
  }

  #[test]
  fn negative_values() {
    assert_eq!(format_str(-1.0), "-1.0");
    assert_eq!(format_str(-1e30), "-1e30");
  }
}
