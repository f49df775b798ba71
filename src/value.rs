//! The in-memory value tree the writer consumes.

#[cfg(feature = "alloc")]
use alloc::{vec::Vec, boxed::Box};

/// A JSON value.
///
/// Every case here is exactly one of the variants below; there is no representation for "no
/// variant" reachable through ordinary construction. The writer's invalid-tag rejection path is
/// reached only via [`Value::invalid_for_testing`], which exists solely so that path stays
/// covered by tests.
#[derive(Clone, Debug)]
#[non_exhaustive]
pub enum Value<'a> {
  /// `null`.
  Null,
  /// `true` or `false`.
  Bool(bool),
  /// A non-negative integer fitting in 64 unsigned bits.
  Uint(u64),
  /// A negative integer fitting in 64 signed bits.
  Sint(i64),
  /// An IEEE-754 binary64. May be `NaN` or infinite; whether that serializes depends on the
  /// writer's flags (see [`crate::writer::WriteFlags::ALLOW_INF_AND_NAN`]).
  Real(f64),
  /// The original numeric lexeme, preserved byte-for-byte instead of being parsed to a scalar.
  ///
  /// The writer emits this verbatim; it is the caller's responsibility to ensure it is a valid
  /// JSON number lexeme, since the writer does not re-validate it.
  Raw(&'a [u8]),
  /// UTF-8 textual content, not yet escaped.
  Str(&'a [u8]),
  /// An ordered sequence of values.
  #[cfg(feature = "alloc")]
  Arr(Vec<Value<'a>>),
  /// An ordered sequence of key/value pairs.
  ///
  /// Duplicate keys are permitted and preserved in insertion order; this type never deduplicates.
  #[cfg(feature = "alloc")]
  Obj(Vec<(&'a [u8], Value<'a>)>),
  /// A node whose tag does not correspond to a known variant.
  ///
  /// Never produced by any public constructor other than [`Value::invalid_for_testing`]; exists
  /// to keep the writer's "invalid tag" rejection path reachable by tests.
  #[doc(hidden)]
  InvalidForTesting,
}

impl<'a> Value<'a> {
  /// Construct a value with no recognized tag, for exercising the writer's rejection path.
  ///
  /// This is not something a well-behaved caller should ever construct; it exists because the
  /// writer's invalid-tag failure mode must remain reachable by tests even though Rust's type
  /// system makes it unreachable through ordinary use of this enum.
  #[doc(hidden)]
  #[must_use]
  pub fn invalid_for_testing() -> Self {
    Value::InvalidForTesting
  }

  /// `true` if this is a non-finite real (`NaN` or `±Infinity`).
  #[must_use]
  pub fn is_non_finite_real(&self) -> bool {
    matches!(self, Value::Real(f) if !f.is_finite())
  }

  /// A convenience constructor from a signed integer, choosing `Uint` when non-negative so that
  /// round-tripping through [`crate::number`] and back yields the same variant.
  #[must_use]
  pub fn from_i64(value: i64) -> Self {
    match u64::try_from(value) {
      Ok(value) => Value::Uint(value),
      Err(_) => Value::Sint(value),
    }
  }
}

#[cfg(feature = "alloc")]
impl<'a> Value<'a> {
  /// Build an array value from an iterator, for convenience in tests and examples.
  #[must_use]
  pub fn array(items: impl IntoIterator<Item = Value<'a>>) -> Self {
    Value::Arr(items.into_iter().collect())
  }

  /// Build an object value from an iterator of key/value pairs, preserving order (and
  /// duplicates) exactly as given.
  #[must_use]
  pub fn object(fields: impl IntoIterator<Item = (&'a [u8], Value<'a>)>) -> Self {
    Value::Obj(fields.into_iter().collect())
  }
}

/// An owned value tree plus, conceptually, the allocator that produced it.
///
/// The tree itself never allocates through the pluggable [`crate::allocator`] abstraction (only
/// the writer's output buffer does), so `Document` is a thin wrapper whose only job is to
/// express "exactly one root".
#[cfg(feature = "alloc")]
#[derive(Clone, Debug)]
pub struct Document<'a> {
  root: Box<Value<'a>>,
}

#[cfg(feature = "alloc")]
impl<'a> Document<'a> {
  /// Wrap a value tree as a document with this value as its single root.
  #[must_use]
  pub fn new(root: Value<'a>) -> Self {
    Self { root: Box::new(root) }
  }

  /// The document's root value.
  #[must_use]
  pub fn root(&self) -> &Value<'a> {
    &self.root
  }
}
