//! The non-recursive traversal driving a [`Value`] tree into a [`WriteBuffer`].
//!
//! Rather than recursing over the tree, this advances one discrete step at a time, driven by
//! `frames.peek()` over a small set of states (`Top`/`InArr`/`InObjKey`/`InObjVal`, exactly
//! [`super::frames::Frame`]). Each iteration of the loop in [`write_root`] is one step, with
//! everything the step needs to resume (which element is next, whose value is pending) carried
//! alongside it in [`Remaining`].

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

use super::escape;
use super::frames::{Frame, FrameStack};
use super::{WriteBuffer, WriteFlags};
use crate::allocator::Allocator;
use crate::error::Error;
use crate::number::{format_real, format_signed, format_unsigned, REAL_BUFFER_LEN};
use crate::value::Value;

const INDENT_UNIT: &[u8] = b"    ";

/// Drive the whole traversal of `value` into `out`, using `frames` as the (bounded or unbounded)
/// nesting stack.
pub(crate) fn write_root<A: Allocator>(
  value: &Value<'_>,
  flags: WriteFlags,
  out: &mut WriteBuffer<'_, A>,
  frames: &mut impl FrameStack,
) -> Result<(), Error> {
  #[cfg(feature = "alloc")]
  {
    write_document(value, flags, out, frames)
  }
  #[cfg(not(feature = "alloc"))]
  {
    write_scalar_bytes(out, value, flags)
  }
}

/// What remains to be visited for the innermost open container, mirrored one-to-one against
/// [`Frame`] (the `Frame` enum is kept payload-free and bit-packed; this is its payload, pushed
/// and popped in lockstep on a plain `Vec` since nothing about its size needs to be bounded
/// independently of the frame stack itself, since a `ConstFrameStack` already refuses the matching
/// `push` once full, which bounds how many `Remaining` entries ever accumulate).
#[cfg(feature = "alloc")]
enum Remaining<'a> {
  Arr { rest: &'a [Value<'a>], first: bool },
  ObjKey { rest: &'a [(&'a [u8], Value<'a>)], first: bool },
  ObjVal { rest: &'a [(&'a [u8], Value<'a>)], value: &'a Value<'a> },
}

#[cfg(feature = "alloc")]
fn write_document<'a, A: Allocator>(
  value: &'a Value<'a>,
  flags: WriteFlags,
  out: &mut WriteBuffer<'_, A>,
  frames: &mut impl FrameStack,
) -> Result<(), Error> {
  let mut remaining: Vec<Remaining<'a>> = Vec::new();
  enter_value(value, flags, out, frames, &mut remaining)?;

  loop {
    let Some(frame) = frames.peek() else { break };
    match frame {
      Frame::Top => break,
      Frame::InArr => step_array(flags, out, frames, &mut remaining)?,
      Frame::InObjKey => step_object_key(flags, out, frames, &mut remaining)?,
      Frame::InObjVal => step_object_value(flags, out, frames, &mut remaining)?,
    }
  }

  Ok(())
}

/// Emit the opening of `value`: for a container, this is just its opening delimiter (and, if
/// empty, its closing delimiter too, inline, with no frame pushed); for a scalar, the whole value.
#[cfg(feature = "alloc")]
fn enter_value<'a, A: Allocator>(
  value: &'a Value<'a>,
  flags: WriteFlags,
  out: &mut WriteBuffer<'_, A>,
  frames: &mut impl FrameStack,
  remaining: &mut Vec<Remaining<'a>>,
) -> Result<(), Error> {
  match value {
    Value::Arr(items) => {
      out.push_byte(b'[')?;
      if items.is_empty() {
        out.push_byte(b']')
      } else {
        frames.push(Frame::InArr).map_err(|_| Error::MemoryAllocation)?;
        remaining.push(Remaining::Arr { rest: items, first: true });
        Ok(())
      }
    }
    Value::Obj(pairs) => {
      out.push_byte(b'{')?;
      if pairs.is_empty() {
        out.push_byte(b'}')
      } else {
        frames.push(Frame::InObjKey).map_err(|_| Error::MemoryAllocation)?;
        remaining.push(Remaining::ObjKey { rest: pairs, first: true });
        Ok(())
      }
    }
    other => write_scalar_bytes(out, other, flags),
  }
}

#[cfg(feature = "alloc")]
fn step_array<'a, A: Allocator>(
  flags: WriteFlags,
  out: &mut WriteBuffer<'_, A>,
  frames: &mut impl FrameStack,
  remaining: &mut Vec<Remaining<'a>>,
) -> Result<(), Error> {
  let next = {
    let Some(Remaining::Arr { rest, first }) = remaining.last_mut() else {
      return Err(Error::InvalidValueType);
    };
    match rest.split_first() {
      None => None,
      Some((item, rest2)) => {
        let is_first = *first;
        *rest = rest2;
        *first = false;
        Some((is_first, item))
      }
    }
  };

  match next {
    None => {
      frames.pop();
      remaining.pop();
      if flags.pretty() {
        out.push_byte(b'\n')?;
        write_indent(out, frames.depth())?;
      }
      out.push_byte(b']')
    }
    Some((is_first, item)) => {
      if !is_first {
        out.push_byte(b',')?;
      }
      if flags.pretty() {
        out.push_byte(b'\n')?;
        write_indent(out, frames.depth())?;
      }
      enter_value(item, flags, out, frames, remaining)
    }
  }
}

#[cfg(feature = "alloc")]
fn step_object_key<'a, A: Allocator>(
  flags: WriteFlags,
  out: &mut WriteBuffer<'_, A>,
  frames: &mut impl FrameStack,
  remaining: &mut Vec<Remaining<'a>>,
) -> Result<(), Error> {
  let next = {
    let Some(Remaining::ObjKey { rest, first }) = remaining.last_mut() else {
      return Err(Error::InvalidValueType);
    };
    match rest.split_first() {
      None => None,
      Some((pair, rest2)) => {
        let is_first = *first;
        let &(key, ref value) = pair;
        Some((is_first, key, value, rest2))
      }
    }
  };

  match next {
    None => {
      frames.pop();
      remaining.pop();
      if flags.pretty() {
        out.push_byte(b'\n')?;
        write_indent(out, frames.depth())?;
      }
      out.push_byte(b'}')
    }
    Some((is_first, key, value, rest2)) => {
      if !is_first {
        out.push_byte(b',')?;
      }
      if flags.pretty() {
        out.push_byte(b'\n')?;
        write_indent(out, frames.depth())?;
      }
      write_str(out, key)?;
      out.push_byte(b':')?;
      if flags.pretty() {
        out.push_byte(b' ')?;
      }
      frames.replace_top(Frame::InObjVal);
      if let Some(slot) = remaining.last_mut() {
        *slot = Remaining::ObjVal { rest: rest2, value };
      }
      Ok(())
    }
  }
}

#[cfg(feature = "alloc")]
fn step_object_value<'a, A: Allocator>(
  flags: WriteFlags,
  out: &mut WriteBuffer<'_, A>,
  frames: &mut impl FrameStack,
  remaining: &mut Vec<Remaining<'a>>,
) -> Result<(), Error> {
  let (rest, value) = {
    let Some(Remaining::ObjVal { rest, value }) = remaining.last_mut() else {
      return Err(Error::InvalidValueType);
    };
    (*rest, *value)
  };

  frames.replace_top(Frame::InObjKey);
  if let Some(slot) = remaining.last_mut() {
    *slot = Remaining::ObjKey { rest, first: false };
  }

  enter_value(value, flags, out, frames, remaining)
}

fn write_indent<A: Allocator>(out: &mut WriteBuffer<'_, A>, depth: usize) -> Result<(), Error> {
  for _ in 0 .. depth {
    out.push_bytes(INDENT_UNIT)?;
  }
  Ok(())
}

/// Write a single node with no children of its own. Any container variant reaching here (only
/// possible under `alloc`, and only through a traversal bug, since containers are always
/// intercepted by `enter_value`) is treated the same as an unrecognized tag.
fn write_scalar_bytes<A: Allocator>(
  out: &mut WriteBuffer<'_, A>,
  value: &Value<'_>,
  flags: WriteFlags,
) -> Result<(), Error> {
  match value {
    Value::Null => out.push_bytes(b"null"),
    Value::Bool(true) => out.push_bytes(b"true"),
    Value::Bool(false) => out.push_bytes(b"false"),
    Value::Uint(n) => write_unsigned(out, *n),
    Value::Sint(n) => write_signed(out, *n),
    Value::Real(f) => write_real(out, *f, flags),
    Value::Raw(bytes) => out.push_bytes(bytes),
    Value::Str(bytes) => write_str(out, bytes),
    _ => Err(Error::InvalidValueType),
  }
}

fn write_unsigned<A: Allocator>(out: &mut WriteBuffer<'_, A>, value: u64) -> Result<(), Error> {
  for digit in format_unsigned(value) {
    out.push_byte(digit)?;
  }
  Ok(())
}

fn write_signed<A: Allocator>(out: &mut WriteBuffer<'_, A>, value: i64) -> Result<(), Error> {
  let (negative, digits) = format_signed(value);
  if negative {
    out.push_byte(b'-')?;
  }
  for digit in digits {
    out.push_byte(digit)?;
  }
  Ok(())
}

fn write_real<A: Allocator>(out: &mut WriteBuffer<'_, A>, value: f64, flags: WriteFlags) -> Result<(), Error> {
  if !value.is_finite() {
    if !flags.allow_inf_and_nan() {
      return Err(Error::NanOrInf);
    }
    return out.push_bytes(if value.is_nan() {
      b"NaN"
    } else if value.is_sign_negative() {
      b"-Infinity"
    } else {
      b"Infinity"
    });
  }

  let mut buf = [0u8; REAL_BUFFER_LEN];
  let rendered = format_real(value, &mut buf);
  out.push_bytes(rendered.as_bytes())
}

fn write_str<A: Allocator>(out: &mut WriteBuffer<'_, A>, bytes: &[u8]) -> Result<(), Error> {
  out.push_byte(b'"')?;
  let mut result = Ok(());
  escape::escape(bytes, |chunk| {
    if result.is_ok() {
      result = out.push_bytes(chunk);
    }
  });
  result?;
  out.push_byte(b'"')
}
