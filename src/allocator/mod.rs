//! The pluggable allocator the writer grows its output buffer against.
//!
//! Modeled the way Rust's own (unstable) `core::alloc::Allocator` trait shapes "opaque context
//! plus three operations" (`alloc`/`grow`/`dealloc` over a [`Layout`]), rather than a bespoke
//! function-pointer vtable. Every method may fail; callers (here, always [`crate::writer`])
//! propagate failure without producing partial output.

mod pool;
#[cfg(feature = "alloc")]
mod global;

pub use pool::PoolAllocator;
#[cfg(feature = "alloc")]
pub use global::GlobalAllocator;

use core::{alloc::Layout, ptr::NonNull};

/// The allocator refused a request.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct AllocError;

/// An allocator the writer can grow its output buffer against.
///
/// # Safety
///
/// Implementors must return regions that are valid for reads and writes of `layout.size()` bytes
/// aligned to `layout.align()`, and must not alias any other live allocation handed out by the
/// same instance. `grow` must preserve the first `old_layout.size()` bytes at `ptr` and return a
/// pointer to the (possibly relocated) grown region. The caller always switches to whatever
/// pointer `grow` returns and never reads through the old one again, so relocating is fine
/// ([`crate::allocator::GlobalAllocator`] does, via `realloc`) but a bump allocator that can't
/// relocate in place must fail instead ([`crate::allocator::PoolAllocator`] does exactly that).
pub unsafe trait Allocator {
  /// Allocate a fresh region meeting `layout`.
  fn alloc(&mut self, layout: Layout) -> Result<NonNull<[u8]>, AllocError>;

  /// Grow a previously-allocated region from `old_layout` to `new_layout`.
  ///
  /// `new_layout.size() >= old_layout.size()` is a precondition; implementations may debug-assert
  /// it but need not check it in release builds, matching how `core::alloc::Allocator` documents
  /// the same method.
  ///
  /// # Safety
  ///
  /// `ptr` must have been returned by a prior `alloc` or `grow` call on `self` with `old_layout`,
  /// and not yet deallocated.
  unsafe fn grow(
    &mut self,
    ptr: NonNull<u8>,
    old_layout: Layout,
    new_layout: Layout,
  ) -> Result<NonNull<[u8]>, AllocError>;

  /// Release a previously-allocated region.
  ///
  /// # Safety
  ///
  /// `ptr` must have been returned by a prior `alloc` or `grow` call on `self` with `layout`, and
  /// not yet deallocated.
  unsafe fn dealloc(&mut self, ptr: NonNull<u8>, layout: Layout);
}
