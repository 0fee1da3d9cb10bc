// Heap Region and Allocation Cursor
//
// A `Region` is the fixed span of addresses the heap may hand out, with an
// explicit, enforced limit. A `Cursor` is the single moving part of the bump
// design: the next free address inside that region.
//
// Invariants:
// - `base` and `limit` are both multiples of `ALIGN`
// - `region.base <= cursor <= region.limit` at all times
// - The cursor only ever moves forward
// - After every successful reservation the cursor is a multiple of `ALIGN`
//
// The cursor does pure address arithmetic and never touches memory, so it
// can be driven with hardware addresses that are not mapped on the host.

use crate::error::{AllocError, AllocResult};

/// Alignment of every address the heap returns and of the cursor itself.
pub const ALIGN: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    base: usize,
    limit: usize,
}

impl Region {
    /// Region covering `[base, limit)`. Address 0 is the null sentinel and
    /// can never be handed out, so a region may not start there.
    ///
    /// `limit` is rounded down to `ALIGN`; otherwise the aligned cursor could
    /// step past it.
    pub const fn new(base: usize, limit: usize) -> AllocResult<Self> {
        if base == 0 {
            return Err(AllocError::InvalidRegion);
        }
        if base % ALIGN != 0 {
            return Err(AllocError::Misaligned);
        }
        if limit < base {
            return Err(AllocError::InvalidRegion);
        }
        Ok(Self {
            base,
            limit: limit & !(ALIGN - 1),
        })
    }

    pub const fn with_size(base: usize, size: usize) -> AllocResult<Self> {
        match base.checked_add(size) {
            Some(limit) => Self::new(base, limit),
            None => Err(AllocError::InvalidRegion),
        }
    }

    pub const fn base(&self) -> usize {
        self.base
    }

    pub const fn limit(&self) -> usize {
        self.limit
    }

    pub const fn size(&self) -> usize {
        self.limit - self.base
    }

    pub const fn contains(&self, addr: usize) -> bool {
        addr >= self.base && addr < self.limit
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Cursor {
    region: Region,
    next: usize,
}

impl Cursor {
    pub const fn new(region: Region) -> Self {
        Self {
            region,
            next: region.base,
        }
    }

    /// Claim `bytes` at the cursor and return the start of the claimed range.
    ///
    /// The cursor is advanced past the range and rounded up to `ALIGN`.
    /// On failure the cursor is left untouched.
    pub fn reserve(&mut self, bytes: usize) -> AllocResult<usize> {
        let start = self.next;
        let end = start.checked_add(bytes).ok_or(AllocError::LengthOverflow)?;

        if end > self.region.limit {
            return Err(AllocError::OutOfMemory);
        }

        self.next = align_up(end, ALIGN).ok_or(AllocError::LengthOverflow)?;
        Ok(start)
    }

    pub const fn next(&self) -> usize {
        self.next
    }

    pub const fn region(&self) -> Region {
        self.region
    }

    pub const fn used(&self) -> usize {
        self.next - self.region.base
    }

    pub const fn remaining(&self) -> usize {
        self.region.limit.saturating_sub(self.next)
    }
}

/// Round `value` up to a multiple of `align` (a power of two).
pub const fn align_up(value: usize, align: usize) -> Option<usize> {
    match value.checked_add(align - 1) {
        Some(v) => Some(v & !(align - 1)),
        None => None,
    }
}
