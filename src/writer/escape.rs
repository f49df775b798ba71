//! JSON string escaping.
//!
//! The inverse of validating that a string *already* follows RFC 8259's escaping rules: this
//! module decides which bytes of an *unescaped* string need escaping on the way out, using a
//! hex-digit table for the `\u00XX` control-character form.

const HEX_DIGITS: &[u8; 16] = b"0123456789abcdef";

/// Write `bytes` (arbitrary UTF-8, already unescaped) as the content of a JSON string, by feeding
/// chunks to `emit`. The surrounding quotes are the caller's responsibility.
///
/// Control characters (`U+0000..=U+001F`), `"`, and `\` are escaped; any other byte (including the
/// continuation bytes of multi-byte UTF-8 sequences, which are never in that range) passes
/// through unchanged. The ASCII control-character/`"`/`\` boundary is all the RFC actually
/// requires escaping.
pub(crate) fn escape(bytes: &[u8], mut emit: impl FnMut(&[u8])) {
  let mut run_start = 0;

  for (i, &byte) in bytes.iter().enumerate() {
    let short_escape: Option<&[u8]> = match byte {
      b'"' => Some(b"\\\""),
      b'\\' => Some(b"\\\\"),
      0x08 => Some(b"\\b"),
      0x0c => Some(b"\\f"),
      b'\n' => Some(b"\\n"),
      b'\r' => Some(b"\\r"),
      b'\t' => Some(b"\\t"),
      _ => None,
    };

    if let Some(short_escape) = short_escape {
      if run_start < i {
        emit(&bytes[run_start .. i]);
      }
      emit(short_escape);
      run_start = i + 1;
    } else if byte < 0x20 {
      if run_start < i {
        emit(&bytes[run_start .. i]);
      }
      emit(&unicode_escape(byte));
      run_start = i + 1;
    }
  }

  if run_start < bytes.len() {
    emit(&bytes[run_start ..]);
  }
}

fn unicode_escape(byte: u8) -> [u8; 6] {
  [
    b'\\',
    b'u',
    b'0',
    b'0',
    HEX_DIGITS[usize::from(byte >> 4)],
    HEX_DIGITS[usize::from(byte & 0x0f)],
  ]
}
