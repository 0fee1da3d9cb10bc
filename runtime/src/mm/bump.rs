// Bump Allocator
//
// Hands out monotonically increasing, non-overlapping byte ranges from a
// single `Region` and never reclaims anything. This is the bring-up heap:
// it exists so the kernel can run before a real allocator is in place.
//
// Each allocation is laid out as:
//
//   Tagged:      [ len: u32 ][ len bytes ... ]  pad to ALIGN
//                            ^ returned address
//   Headerless:  [ len bytes ... ]  pad to ALIGN
//                ^ returned address
//
// Every block starts on an `ALIGN` boundary and nothing stronger is offered.
//
// The header is what lets `adopt` recover the length of a raw C pointer,
// which `realloc` needs. Headerless heaps can still reallocate through an
// `Allocation`, because the handle carries its own length.
//
// Safety model:
// - Constructing an allocator is `unsafe`: the caller vouches that the
//   region is mapped, writable, and not used by anything else for the rest
//   of the program.
// - `Allocation` handles can only be made by the allocator, so the typed API
//   cannot be handed a foreign address.
// - Raw addresses coming back from C are checked against the header and the
//   cursor in `adopt` before they are trusted.
//
// Not thread-safe on its own; see `heap::LockedHeap` for the shared instance.

use core::ptr::NonNull;
use core::slice;

use super::region::{Cursor, Region, ALIGN};
use crate::error::{AllocError, AllocResult};
use crate::mem;

/// Size of the per-allocation length header in `HeaderMode::Tagged`.
pub const HEADER_SIZE: usize = core::mem::size_of::<u32>();

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderMode {
    /// Prefix every allocation with a `u32` length header
    Tagged,
    /// Reserve exactly the requested length, no metadata
    Headerless,
}

impl HeaderMode {
    pub const fn header_size(&self) -> usize {
        match self {
            HeaderMode::Tagged => HEADER_SIZE,
            HeaderMode::Headerless => 0,
        }
    }
}

/// A live block handed out by a `BumpAllocator`.
///
/// Not `Clone`: two handles to the same block would allow aliasing
/// `&mut [u8]` views.
#[derive(Debug, PartialEq, Eq)]
pub struct Allocation {
    ptr: NonNull<u8>,
    len: usize,
}

impl Allocation {
    /// # Safety
    /// `ptr..ptr + len` must be a block this heap handed out and that no
    /// other handle refers to.
    pub(crate) const unsafe fn from_raw_parts(ptr: NonNull<u8>, len: usize) -> Self {
        Self { ptr, len }
    }

    pub fn as_ptr(&self) -> *mut u8 {
        self.ptr.as_ptr()
    }

    pub fn addr(&self) -> usize {
        self.ptr.as_ptr() as usize
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn as_slice(&self) -> &[u8] {
        // The region outlives every handle (see `BumpAllocator::new`).
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Give up the handle and return the bare address, e.g. for `malloc`.
    pub fn into_raw(self) -> *mut u8 {
        self.ptr.as_ptr()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapStats {
    pub total: usize,
    pub used: usize,
    pub remaining: usize,
    pub allocations: usize,
}

pub struct BumpAllocator {
    cursor: Cursor,
    mode: HeaderMode,
    allocations: usize,
}

impl BumpAllocator {
    /// # Safety
    /// `region` must be mapped, writable memory that stays valid and
    /// otherwise unused for the rest of the program.
    pub const unsafe fn new(region: Region, mode: HeaderMode) -> Self {
        Self {
            cursor: Cursor::new(region),
            mode,
            allocations: 0,
        }
    }

    pub fn allocate(&mut self, len: usize) -> AllocResult<Allocation> {
        let header = self.mode.header_size();
        if self.mode == HeaderMode::Tagged && len > u32::MAX as usize {
            return Err(AllocError::LengthOverflow);
        }

        let total = len.checked_add(header).ok_or(AllocError::LengthOverflow)?;
        let block = self.cursor.reserve(total)?;

        if self.mode == HeaderMode::Tagged {
            // `block` is ALIGN-aligned, which covers u32.
            unsafe { (block as *mut u32).write(len as u32) };
        }

        let ptr = NonNull::new((block + header) as *mut u8).ok_or(AllocError::InvalidAddress)?;
        self.allocations += 1;
        Ok(unsafe { Allocation::from_raw_parts(ptr, len) })
    }

    /// Bump heaps never reclaim; the block simply stays reserved.
    pub fn release(&mut self, allocation: Allocation) {
        let _ = allocation;
    }

    /// Move `old` into a fresh block of `new_len` bytes.
    ///
    /// Copies `min(old.len(), new_len)` bytes, so shrinking never reads past
    /// the new length. `old` is not reclaimed and remains readable; on
    /// failure it is the caller's to keep using.
    pub fn reallocate(&mut self, old: &Allocation, new_len: usize) -> AllocResult<Allocation> {
        let new = self.allocate(new_len)?;
        let count = old.len().min(new_len);
        unsafe { mem::copy(new.as_ptr(), old.as_ptr(), count) };
        Ok(new)
    }

    /// Turn an address previously returned by `allocate` back into a handle.
    ///
    /// Rejects null and misaligned addresses, addresses outside the handed-out
    /// part of the region, and headers describing a block that runs past the
    /// cursor or the region limit. This cannot prove the address is the start
    /// of a block, only that trusting it stays in bounds.
    ///
    /// # Safety
    /// No other live `Allocation` may refer to the same block.
    pub unsafe fn adopt(&self, ptr: *mut u8) -> AllocResult<Allocation> {
        if self.mode == HeaderMode::Headerless {
            return Err(AllocError::Unsupported);
        }

        let addr = ptr as usize;
        let region = self.cursor.region();
        let lowest = region.base() + HEADER_SIZE;
        let highest = self.cursor.next().min(region.limit());
        if ptr.is_null() || addr % ALIGN != 0 || addr < lowest || addr > highest {
            return Err(AllocError::InvalidAddress);
        }

        let len = ((addr - HEADER_SIZE) as *const u32).read() as usize;
        match addr.checked_add(len) {
            Some(end) if end <= highest => {}
            _ => return Err(AllocError::InvalidAddress),
        }

        let ptr = NonNull::new(ptr).ok_or(AllocError::InvalidAddress)?;
        Ok(Allocation::from_raw_parts(ptr, len))
    }

    pub fn mode(&self) -> HeaderMode {
        self.mode
    }

    pub fn region(&self) -> Region {
        self.cursor.region()
    }

    pub fn stats(&self) -> HeapStats {
        HeapStats {
            total: self.cursor.region().size(),
            used: self.cursor.used(),
            remaining: self.cursor.remaining(),
            allocations: self.allocations,
        }
    }
}
