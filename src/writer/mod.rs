//! The document writer: serializes a [`crate::value::Value`] tree to compact or pretty JSON
//! against a pluggable [`crate::allocator::Allocator`].
//!
//! The traversal itself lives in [`engine`]; this module owns the public surface (flags, the
//! output buffer, and the handful of entry points) plus [`WriteBuffer`], the growable output
//! buffer the engine appends to.

mod engine;
mod escape;
mod frames;

use core::alloc::Layout;
use core::ops::Deref;
use core::ptr::NonNull;

use crate::allocator::{AllocError, Allocator};
use crate::error::Error;
use crate::value::Value;

/// Flags controlling the writer's layout and special-value policy.
///
/// Bit-packed the same way [`crate::number::ScanFlags`] is, for the same reason: two independent
/// booleans fit comfortably in one byte.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub struct WriteFlags(u8);

impl WriteFlags {
  const PRETTY: u8 = 1 << 0;
  const ALLOW_INF_AND_NAN: u8 = 1 << 1;

  /// Compact output: no whitespace anywhere, `,` between elements, `:` between key and value.
  #[must_use]
  pub fn compact() -> Self {
    Self(0)
  }

  /// Indent nested structure 4 spaces per level, one element per line, `": "` between key and
  /// value, and empty containers emitted inline (`[]`/`{}`).
  #[must_use]
  pub fn with_pretty(mut self) -> Self {
    self.0 |= Self::PRETTY;
    self
  }

  /// Permit `NaN`/`Infinity`/`-Infinity` reals to serialize as those bare literals instead of
  /// failing the write with [`Error::NanOrInf`].
  #[must_use]
  pub fn with_allow_inf_and_nan(mut self) -> Self {
    self.0 |= Self::ALLOW_INF_AND_NAN;
    self
  }

  pub(crate) fn pretty(self) -> bool {
    self.0 & Self::PRETTY != 0
  }

  pub(crate) fn allow_inf_and_nan(self) -> bool {
    self.0 & Self::ALLOW_INF_AND_NAN != 0
  }
}

/// A growable byte buffer owned by the writer, obtained from the allocator and handed to the
/// caller on success.
///
/// Freed automatically on `Drop`. On every failure path the engine simply propagates `Err` and
/// lets the partially-filled buffer drop before the caller ever sees it, and on success the
/// caller's own drop (or an explicit [`WriteBuffer::into_inner`]... no such method exists; callers
/// read through `Deref<Target = [u8]>`) releases it back to the same allocator it came from.
pub struct WriteBuffer<'buf, A: Allocator> {
  allocator: &'buf mut A,
  ptr: NonNull<u8>,
  len: usize,
  cap: usize,
}

impl<'buf, A: Allocator> WriteBuffer<'buf, A> {
  fn empty(allocator: &'buf mut A) -> Self {
    Self { allocator, ptr: NonNull::dangling(), len: 0, cap: 0 }
  }

  /// The written bytes so far.
  #[must_use]
  pub fn as_bytes(&self) -> &[u8] {
    if self.len == 0 {
      return &[];
    }
    // SAFETY: `ptr` is valid for `cap >= len` bytes whenever `cap != 0`, which holds here since
    // `len != 0` implies at least one successful `reserve`.
    unsafe { core::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
  }

  fn layout(cap: usize) -> Layout {
    Layout::array::<u8>(cap).expect("buffer length exceeds isize::MAX")
  }

  /// Ensure room for `additional` more bytes, growing geometrically (factor 1.5) when needed.
  fn reserve(&mut self, additional: usize) -> Result<(), Error> {
    let required = self.len.checked_add(additional).ok_or(Error::MemoryAllocation)?;
    if required <= self.cap {
      return Ok(());
    }

    let mut new_cap = self.cap.max(additional).max(16);
    while new_cap < required {
      new_cap = new_cap.saturating_mul(3) / 2 + 1;
    }

    if self.cap == 0 {
      let region =
        self.allocator.alloc(Self::layout(new_cap)).map_err(|AllocError| Error::MemoryAllocation)?;
      self.ptr = region.cast();
      self.cap = region.len();
    } else {
      // SAFETY: `ptr`/`cap` describe the allocation this `WriteBuffer` currently owns, allocated
      // or grown by this same `allocator`.
      let region = unsafe { self.allocator.grow(self.ptr, Self::layout(self.cap), Self::layout(new_cap)) }
        .map_err(|AllocError| Error::MemoryAllocation)?;
      self.ptr = region.cast();
      self.cap = region.len();
    }
    Ok(())
  }

  fn push_bytes(&mut self, bytes: &[u8]) -> Result<(), Error> {
    if bytes.is_empty() {
      return Ok(());
    }
    self.reserve(bytes.len())?;
    // SAFETY: `reserve` ensured `cap - len >= bytes.len()`, and `ptr` is valid for `cap` bytes.
    unsafe {
      core::ptr::copy_nonoverlapping(bytes.as_ptr(), self.ptr.as_ptr().add(self.len), bytes.len());
    }
    self.len += bytes.len();
    Ok(())
  }

  fn push_byte(&mut self, byte: u8) -> Result<(), Error> {
    self.push_bytes(&[byte])
  }
}

impl<'buf, A: Allocator> Deref for WriteBuffer<'buf, A> {
  type Target = [u8];

  fn deref(&self) -> &[u8] {
    self.as_bytes()
  }
}

impl<'buf, A: Allocator> Drop for WriteBuffer<'buf, A> {
  fn drop(&mut self) {
    if self.cap != 0 {
      // SAFETY: `ptr`/`cap` describe the live allocation owned by this buffer, never freed
      // anywhere else.
      unsafe { self.allocator.dealloc(self.ptr, Self::layout(self.cap)) };
    }
  }
}

/// Serialize `value`, using an unbounded, heap-allocated frame stack so arbitrarily deep trees
/// are supported.
///
/// On success the returned [`WriteBuffer`] derefs to the written bytes and frees itself (via
/// `allocator`) when dropped. On failure no bytes are returned; any partial output already pushed
/// into the buffer is released before this function returns.
#[cfg(feature = "alloc")]
pub fn write<'a, 'buf, A: Allocator>(
  value: &'a Value<'a>,
  flags: WriteFlags,
  allocator: &'buf mut A,
) -> Result<WriteBuffer<'buf, A>, Error> {
  let mut out = WriteBuffer::empty(allocator);
  let mut stack = frames::VecFrameStack::new();
  engine::write_root(value, flags, &mut out, &mut stack)?;
  Ok(out)
}

/// Serialize `value` using a fixed-depth, non-allocating frame stack capable of nesting up to
/// `4 * N` levels deep, for callers that want a bounded traversal stack instead of `write`'s
/// unbounded one (or that lack the `alloc` feature entirely, in which case `value` can never
/// contain a container in the first place, since `Value::Arr`/`Value::Obj` only exist under `alloc`).
pub fn write_bounded<'a, 'buf, A: Allocator, const N: usize>(
  value: &'a Value<'a>,
  flags: WriteFlags,
  allocator: &'buf mut A,
) -> Result<WriteBuffer<'buf, A>, Error> {
  let mut out = WriteBuffer::empty(allocator);
  let mut stack = frames::ConstFrameStack::<N>::new();
  engine::write_root(value, flags, &mut out, &mut stack)?;
  Ok(out)
}

/// A C-flavored entry point for callers crossing an FFI-like boundary: `value` models a possibly
/// null document pointer as `Option<&Value>`, `out_len` receives the written length (`0` on
/// failure), and the return is `None` rather than panicking on any failure, including a null
/// `value`.
#[cfg(feature = "alloc")]
pub fn write_raw_parts<'a, 'buf, A: Allocator>(
  value: Option<&'a Value<'a>>,
  flags: WriteFlags,
  allocator: &'buf mut A,
  out_len: &mut usize,
) -> Option<WriteBuffer<'buf, A>> {
  *out_len = 0;
  let value = value?;
  let buffer = write(value, flags, allocator).ok()?;
  *out_len = buffer.len();
  Some(buffer)
}

/// Serialize `value` and write the bytes to `path`, opening it for writing, emitting, and closing
/// on drop. No atomic-replace semantics: a partially-written file from a prior call is simply
/// overwritten.
#[cfg(feature = "std")]
pub fn write_to_file<'a, A: Allocator>(
  path: &std::path::Path,
  value: &'a Value<'a>,
  flags: WriteFlags,
  allocator: &mut A,
) -> Result<(), Error> {
  use std::io::Write as _;

  let buffer = write(value, flags, allocator)?;
  let mut file = std::fs::File::create(path).map_err(|_| Error::FileOpen)?;
  file.write_all(&buffer).map_err(|_| Error::FileWrite)?;
  Ok(())
}
