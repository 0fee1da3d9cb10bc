// Allocator error codes and result types
//
// Every failure the heap can detect is one of these variants. Rust callers
// get them through `AllocResult`; the C entry points collapse all of them
// into a null return, which is the only failure signal the freestanding
// contract guarantees (there may be no console to report to).

use core::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocError {
    /// Reservation would move the cursor past the region limit
    OutOfMemory,
    /// Address was not produced by this allocator, or its header is corrupt
    InvalidAddress,
    /// Requested length does not fit the size header or overflows the address space
    LengthOverflow,
    /// Operation needs a length header but the heap is headerless
    Unsupported,
    /// Region base is not aligned to `mm::ALIGN`
    Misaligned,
    /// Region limit is below its base
    InvalidRegion,
    /// The global heap was already set up
    AlreadyInitialized,
    /// The global heap has not been set up yet
    Uninitialized,
}

impl AllocError {
    pub const fn as_str(&self) -> &'static str {
        match self {
            AllocError::OutOfMemory => "out of memory",
            AllocError::InvalidAddress => "invalid address",
            AllocError::LengthOverflow => "length overflow",
            AllocError::Unsupported => "unsupported without size headers",
            AllocError::Misaligned => "misaligned region base",
            AllocError::InvalidRegion => "invalid region bounds",
            AllocError::AlreadyInitialized => "heap already initialized",
            AllocError::Uninitialized => "heap not initialized",
        }
    }
}

impl fmt::Display for AllocError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result type for heap operations
pub type AllocResult<T> = Result<T, AllocError>;

/// Collapse a heap result into the C sentinel (null on any error).
#[inline]
pub fn into_raw(result: AllocResult<*mut u8>) -> *mut u8 {
    result.unwrap_or(core::ptr::null_mut())
}
