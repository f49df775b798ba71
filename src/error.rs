/// Every way a scan, parse, or write can fail.
///
/// A plain, `Copy` enum with no external error-derive dependency. No variant here carries a
/// heap-allocated message; callers needing prose can match on the variant and supply their own.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Error {
  /// A value in the tree carried a tag outside the variants `Value` defines.
  ///
  /// Only reachable through [`crate::value::Value::invalid_for_testing`].
  InvalidValueType,
  /// The tree contained a non-finite real (`NaN`, `+Infinity`, or `-Infinity`) and
  /// `ALLOW_INF_AND_NAN` was not set.
  NanOrInf,
  /// The allocator refused a request.
  MemoryAllocation,
  /// The output file could not be opened.
  #[cfg(feature = "std")]
  FileOpen,
  /// Writing to the output file failed partway through.
  #[cfg(feature = "std")]
  FileWrite,
  /// A required argument was missing or otherwise invalid (the raw-parts boundary).
  InvalidParameter,
  /// No digit was found where at least one was required.
  NoDigit,
  /// The integer part had a leading zero followed by another digit (e.g. `01`).
  LeadingZero,
  /// The exponent marker (`e`/`E`) was present without any following digits.
  BadExponent,
  /// The decimal point was present without any following digits.
  BadFraction,
  /// `NaN`/`Infinity`/`-Infinity` was encountered but `ALLOW_INF_AND_NAN` was not set.
  LiteralNotAllowed,
  /// Bytes remained after the numeric lexeme; the input was not a number on its own.
  TrailingGarbage,
}

#[cfg(feature = "std")]
impl core::fmt::Display for Error {
  fn fmt(&self, fmt: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
    let message = match self {
      Error::InvalidValueType => "value carried an unrecognized tag",
      Error::NanOrInf => "non-finite real without ALLOW_INF_AND_NAN",
      Error::MemoryAllocation => "allocator refused the request",
      Error::FileOpen => "could not open the output file",
      Error::FileWrite => "failed writing to the output file",
      Error::InvalidParameter => "invalid or missing required argument",
      Error::NoDigit => "expected at least one digit",
      Error::LeadingZero => "integer part has a leading zero",
      Error::BadExponent => "exponent marker without following digits",
      Error::BadFraction => "decimal point without following digits",
      Error::LiteralNotAllowed => "NaN/Infinity literal without ALLOW_INF_AND_NAN",
      Error::TrailingGarbage => "bytes remained after the numeric lexeme",
    };
    fmt.write_str(message)
  }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}
