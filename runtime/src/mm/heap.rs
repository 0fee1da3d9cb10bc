// Global Bring-up Heap
//
// Process-wide instance of the bump allocator, shared by the Rust
// `#[global_allocator]` path and the exported C `malloc` family.
//
// Responsibilities:
// - Hold the single `BumpAllocator` behind a spinlock, empty until `init`
// - Serialize every cursor update (and mask interrupts on bare metal)
// - Translate raw C pointers to handles through `BumpAllocator::adopt`
// - Report every failure as an error or, on the raw paths, a null pointer
//
// Before `init` every request fails with `Uninitialized` / null rather than
// touching memory that may not exist yet.
//
// Alignment is capped at `ALIGN` (4 bytes). `GlobalAlloc` returns null for
// any layout with a larger `align()`, so on x86_64 `Box<u64>`, `Vec<usize>`
// and most `alloc` collections abort in `handle_alloc_error`. Only byte and
// 4-byte-aligned data can live on this heap.

use core::alloc::{GlobalAlloc, Layout};
use core::ptr::{self, NonNull};

use spin::Mutex;

use super::bump::{Allocation, BumpAllocator, HeapStats};
use super::region::ALIGN;
use crate::config::HeapConfig;
use crate::error::{self, AllocError, AllocResult};
use crate::util::without_interrupts;
use crate::{log_info, log_warn};

const LOG_ORIGIN: &str = "heap";

pub struct LockedHeap {
    inner: Mutex<Option<BumpAllocator>>,
}

/// The heap behind `malloc`/`free`/`realloc` and, if registered, the Rust
/// global allocator.
pub static HEAP: LockedHeap = LockedHeap::empty();

impl LockedHeap {
    pub const fn empty() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }

    /// Install a bump allocator over `config`'s region. Fails if the region
    /// is malformed or the heap was already set up.
    ///
    /// # Safety
    /// The region must be mapped, writable, and reserved for the heap for the
    /// rest of the program.
    pub unsafe fn init(&self, config: &HeapConfig) -> AllocResult<()> {
        let region = config.region()?;

        without_interrupts(|| {
            let mut inner = self.inner.lock();
            if inner.is_some() {
                return Err(AllocError::AlreadyInitialized);
            }
            *inner = Some(BumpAllocator::new(region, config.mode));
            Ok(())
        })?;

        log_info!(
            LOG_ORIGIN,
            "Initialized {:?} heap: {} bytes at 0x{:X}",
            config.mode,
            region.size(),
            region.base()
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        without_interrupts(|| self.inner.lock().is_some())
    }

    fn with<R>(&self, f: impl FnOnce(&mut BumpAllocator) -> AllocResult<R>) -> AllocResult<R> {
        without_interrupts(|| match self.inner.lock().as_mut() {
            Some(heap) => f(heap),
            None => Err(AllocError::Uninitialized),
        })
    }

    pub fn allocate(&self, len: usize) -> AllocResult<Allocation> {
        let result = self.with(|heap| heap.allocate(len));
        if let Err(AllocError::OutOfMemory) = result {
            log_warn!(LOG_ORIGIN, "Out of memory allocating {} bytes", len);
        }
        result
    }

    pub fn release(&self, allocation: Allocation) {
        let _ = self.with(|heap| {
            heap.release(allocation);
            Ok(())
        });
    }

    pub fn reallocate(&self, old: &Allocation, new_len: usize) -> AllocResult<Allocation> {
        let result = self.with(|heap| heap.reallocate(old, new_len));
        if let Err(AllocError::OutOfMemory) = result {
            log_warn!(LOG_ORIGIN, "Out of memory growing {} -> {} bytes", old.len(), new_len);
        }
        result
    }

    pub fn stats(&self) -> AllocResult<HeapStats> {
        self.with(|heap| Ok(heap.stats()))
    }

    /// `malloc` semantics: the usable address, or null on any failure.
    pub fn malloc(&self, len: usize) -> *mut u8 {
        error::into_raw(self.allocate(len).map(Allocation::into_raw))
    }

    /// `free` semantics: null and foreign pointers are ignored.
    ///
    /// # Safety
    /// `ptr` must be null or an address `malloc`/`realloc` returned that has
    /// not been freed.
    pub unsafe fn free(&self, ptr: *mut u8) {
        if ptr.is_null() {
            return;
        }
        let _ = self.with(|heap| heap.adopt(ptr).map(|a| heap.release(a)));
    }

    /// `realloc` semantics. A null `ptr` behaves like `malloc`. On failure
    /// null is returned and `ptr` stays valid.
    ///
    /// # Safety
    /// Same as `free`.
    pub unsafe fn realloc(&self, ptr: *mut u8, new_len: usize) -> *mut u8 {
        if ptr.is_null() {
            return self.malloc(new_len);
        }

        let result = self.with(|heap| {
            let old = heap.adopt(ptr)?;
            heap.reallocate(&old, new_len)
        });
        error::into_raw(result.map(Allocation::into_raw))
    }
}

unsafe impl GlobalAlloc for LockedHeap {
    /// Null for layouts aligned beyond `ALIGN`; see the module header.
    unsafe fn alloc(&self, layout: Layout) -> *mut u8 {
        if layout.align() > ALIGN {
            return ptr::null_mut();
        }
        self.malloc(layout.size())
    }

    unsafe fn dealloc(&self, _ptr: *mut u8, _layout: Layout) {}

    unsafe fn realloc(&self, ptr: *mut u8, layout: Layout, new_size: usize) -> *mut u8 {
        let Some(ptr) = NonNull::new(ptr) else {
            return ptr::null_mut();
        };
        if layout.align() > ALIGN {
            return ptr::null_mut();
        }

        // The layout already carries the old length, so no header lookup.
        let old = Allocation::from_raw_parts(ptr, layout.size());
        let result = self.reallocate(&old, new_size);
        error::into_raw(result.map(Allocation::into_raw))
    }
}
