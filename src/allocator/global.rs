use core::{alloc::Layout, ptr::NonNull};

use alloc::alloc::{alloc, realloc, dealloc};

use crate::allocator::{Allocator, AllocError};

/// An allocator backed by the process-global heap (`alloc::alloc`).
///
/// The ordinary choice whenever a bounded [`crate::allocator::PoolAllocator`] isn't called for;
/// grows are forwarded to `realloc` so the allocation can actually relocate, unlike the pool
/// allocator's in-place-only growth.
#[derive(Clone, Copy, Debug, Default)]
pub struct GlobalAllocator;

impl GlobalAllocator {
  /// Construct a `GlobalAllocator`. Carries no state; every instance behaves identically.
  #[must_use]
  pub fn new() -> Self {
    Self
  }
}

unsafe impl Allocator for GlobalAllocator {
  fn alloc(&mut self, layout: Layout) -> Result<NonNull<[u8]>, AllocError> {
    if layout.size() == 0 {
      return Ok(NonNull::slice_from_raw_parts(layout.dangling(), 0));
    }

    // SAFETY: `layout` has non-zero size, as checked above.
    let raw = unsafe { alloc(layout) };
    let ptr = NonNull::new(raw).ok_or(AllocError)?;
    Ok(NonNull::slice_from_raw_parts(ptr, layout.size()))
  }

  unsafe fn grow(
    &mut self,
    ptr: NonNull<u8>,
    old_layout: Layout,
    new_layout: Layout,
  ) -> Result<NonNull<[u8]>, AllocError> {
    debug_assert!(new_layout.size() >= old_layout.size());
    debug_assert_eq!(old_layout.align(), new_layout.align());

    if old_layout.size() == 0 {
      return self.alloc(new_layout);
    }

    // SAFETY: `ptr` was allocated by this allocator with `old_layout`, per the caller contract.
    let raw = unsafe { realloc(ptr.as_ptr(), old_layout, new_layout.size()) };
    let ptr = NonNull::new(raw).ok_or(AllocError)?;
    Ok(NonNull::slice_from_raw_parts(ptr, new_layout.size()))
  }

  unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout) {
    if layout.size() == 0 {
      return;
    }
    // SAFETY: `ptr` was allocated by this allocator with `layout`, per the caller contract.
    unsafe { dealloc(ptr.as_ptr(), layout) };
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn round_trips_alloc_grow_dealloc() {
    let mut allocator = GlobalAllocator::new();
    let layout = Layout::from_size_align(4, 1).unwrap();
    let region = allocator.alloc(layout).unwrap();
    let ptr = region.cast::<u8>();

    let bigger = Layout::from_size_align(64, 1).unwrap();
    let grown = unsafe { allocator.grow(ptr, layout, bigger).unwrap() };
    assert_eq!(grown.len(), 64);

    unsafe { allocator.dealloc(grown.cast::<u8>(), bigger) };
  }
}
