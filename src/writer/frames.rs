//! The writer's non-recursive traversal state.
//!
//! A 2-bit-per-slot packed array backing a bounded, non-allocating stack, four states to a byte.
//! [`Frame`] has exactly four variants (`Top`/`InArr`/`InObjKey`/`InObjVal`), which happens to use
//! all four 2-bit patterns instead of leaving one unused.

#[cfg(feature = "alloc")]
use alloc::vec::Vec;

/// Which traversal context the writer is currently emitting into.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum Frame {
  /// Nothing has been opened yet, or the single root value has just closed.
  Top,
  /// Inside an array, between elements.
  InArr,
  /// Inside an object, about to emit a key.
  InObjKey,
  /// Inside an object, about to emit a value (the key for this pair has already been written).
  InObjVal,
}

impl Frame {
  fn to_bits(self) -> u8 {
    match self {
      Frame::Top => 0,
      Frame::InArr => 1,
      Frame::InObjKey => 2,
      Frame::InObjVal => 3,
    }
  }

  fn from_bits(bits: u8) -> Self {
    match bits {
      0 => Frame::Top,
      1 => Frame::InArr,
      2 => Frame::InObjKey,
      3 => Frame::InObjVal,
      _ => unreachable!("masked by 0b11"),
    }
  }
}

/// A frame stack that can report it's full without growing.
pub(crate) trait FrameStack {
  /// The current nesting depth.
  fn depth(&self) -> usize;
  /// The innermost frame, if any.
  fn peek(&self) -> Option<Frame>;
  /// Replace the innermost frame in place (used when `InObjKey` becomes `InObjVal` and back).
  fn replace_top(&mut self, frame: Frame);
  /// Pop the innermost frame.
  fn pop(&mut self) -> Option<Frame>;
  /// Push a new innermost frame. Fails if the stack is already at capacity.
  fn push(&mut self, frame: Frame) -> Result<(), StackOverflow>;
}

/// The frame stack ran out of room.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) struct StackOverflow;

struct PackedFrames<const ONE_FOURTH_OF_MAX_DEPTH: usize>([u8; ONE_FOURTH_OF_MAX_DEPTH]);

impl<const ONE_FOURTH_OF_MAX_DEPTH: usize> PackedFrames<ONE_FOURTH_OF_MAX_DEPTH> {
  fn get(&self, i: usize) -> Frame {
    let mut entry = self.0[i / 4];
    entry >>= (i & 0b11) * 2;
    entry &= 0b11;
    Frame::from_bits(entry)
  }

  fn set(&mut self, i: usize, frame: Frame) {
    let shift = (i & 0b11) * 2;
    self.0[i / 4] &= !(0b11 << shift);
    self.0[i / 4] |= frame.to_bits() << shift;
  }
}

/// A bounded, non-allocating frame stack usable without the `alloc` feature. Supports nesting up
/// to `4 * ONE_FOURTH_OF_MAX_DEPTH` levels deep.
pub(crate) struct ConstFrameStack<const ONE_FOURTH_OF_MAX_DEPTH: usize> {
  items: PackedFrames<ONE_FOURTH_OF_MAX_DEPTH>,
  depth: usize,
}

impl<const ONE_FOURTH_OF_MAX_DEPTH: usize> ConstFrameStack<ONE_FOURTH_OF_MAX_DEPTH> {
  pub(crate) fn new() -> Self {
    Self { items: PackedFrames([0; ONE_FOURTH_OF_MAX_DEPTH]), depth: 0 }
  }
}

impl<const ONE_FOURTH_OF_MAX_DEPTH: usize> FrameStack for ConstFrameStack<ONE_FOURTH_OF_MAX_DEPTH> {
  fn depth(&self) -> usize {
    self.depth
  }

  fn peek(&self) -> Option<Frame> {
    let i = self.depth.checked_sub(1)?;
    Some(self.items.get(i))
  }

  fn replace_top(&mut self, frame: Frame) {
    if let Some(i) = self.depth.checked_sub(1) {
      self.items.set(i, frame);
    }
  }

  fn pop(&mut self) -> Option<Frame> {
    let i = self.depth.checked_sub(1)?;
    self.depth -= 1;
    Some(self.items.get(i))
  }

  fn push(&mut self, frame: Frame) -> Result<(), StackOverflow> {
    if self.depth == 4 * ONE_FOURTH_OF_MAX_DEPTH {
      return Err(StackOverflow);
    }
    self.items.set(self.depth, frame);
    self.depth += 1;
    Ok(())
  }
}

/// An unbounded frame stack for arbitrarily deep trees, backed by a plain `Vec<Frame>`. Available
/// whenever `alloc` is.
#[cfg(feature = "alloc")]
pub(crate) struct VecFrameStack(Vec<Frame>);

#[cfg(feature = "alloc")]
impl VecFrameStack {
  pub(crate) fn new() -> Self {
    Self(Vec::new())
  }
}

#[cfg(feature = "alloc")]
impl FrameStack for VecFrameStack {
  fn depth(&self) -> usize {
    self.0.len()
  }

  fn peek(&self) -> Option<Frame> {
    self.0.last().copied()
  }

  fn replace_top(&mut self, frame: Frame) {
    if let Some(top) = self.0.last_mut() {
      *top = frame;
    }
  }

  fn pop(&mut self) -> Option<Frame> {
    self.0.pop()
  }

  fn push(&mut self, frame: Frame) -> Result<(), StackOverflow> {
    self.0.push(frame);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn packs_all_four_frames() {
    let mut stack = ConstFrameStack::<4>::new();
    for frame in [Frame::Top, Frame::InArr, Frame::InObjKey, Frame::InObjVal, Frame::Top] {
      stack.push(frame).unwrap();
    }
    assert_eq!(stack.depth(), 5);
    assert_eq!(stack.pop(), Some(Frame::Top));
    assert_eq!(stack.pop(), Some(Frame::InObjVal));
    assert_eq!(stack.pop(), Some(Frame::InObjKey));
    assert_eq!(stack.pop(), Some(Frame::InArr));
    assert_eq!(stack.pop(), Some(Frame::Top));
    assert_eq!(stack.pop(), None);
  }

  #[test]
  fn overflows_past_capacity() {
    let mut stack = ConstFrameStack::<1>::new();
    for _ in 0 .. 4 {
      stack.push(Frame::InArr).unwrap();
    }
    assert_eq!(stack.push(Frame::InArr), Err(StackOverflow));
  }

  #[test]
  fn replace_top_changes_only_the_innermost_frame() {
    let mut stack = ConstFrameStack::<2>::new();
    stack.push(Frame::Top).unwrap();
    stack.push(Frame::InObjKey).unwrap();
    stack.replace_top(Frame::InObjVal);
    assert_eq!(stack.peek(), Some(Frame::InObjVal));
    assert_eq!(stack.pop(), Some(Frame::InObjVal));
    assert_eq!(stack.peek(), Some(Frame::Top));
  }
}
