// Heap Configuration
//
// Where the bring-up heap lives and how it lays out blocks. The defaults
// match the classic early-boot layout: 4 MiB starting at 2 MiB, just above
// the kernel image, with length headers so C `realloc` works.
//
// The region limit is always explicit. Boards with a different memory map
// build their own `HeapConfig` and pass it to `mm::heap::HEAP.init`.

use crate::error::AllocResult;
use crate::mm::{HeaderMode, Region};

pub const DEFAULT_HEAP_BASE: usize = 0x200000;
pub const DEFAULT_HEAP_SIZE: usize = 4 * 1024 * 1024;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapConfig {
    pub base: usize,
    pub size: usize,
    pub mode: HeaderMode,
}

impl HeapConfig {
    pub const DEFAULT: HeapConfig = HeapConfig::new(DEFAULT_HEAP_BASE, DEFAULT_HEAP_SIZE);

    pub const fn new(base: usize, size: usize) -> Self {
        Self {
            base,
            size,
            mode: HeaderMode::Tagged,
        }
    }

    pub const fn with_mode(self, mode: HeaderMode) -> Self {
        Self { mode, ..self }
    }

    pub const fn region(&self) -> AllocResult<Region> {
        Region::with_size(self.base, self.size)
    }
}

impl Default for HeapConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocError;

    #[test]
    fn default_layout() {
        let config = HeapConfig::default();
        assert_eq!(config.mode, HeaderMode::Tagged);

        let region = config.region().unwrap();
        assert_eq!(region.base(), 0x200000);
        assert_eq!(region.limit(), 0x600000);
    }

    #[test]
    fn bad_bounds_surface_as_errors() {
        assert_eq!(HeapConfig::new(0x200002, 64).region(), Err(AllocError::Misaligned));
        assert_eq!(HeapConfig::new(usize::MAX - 3, 64).region(), Err(AllocError::InvalidRegion));
        assert_eq!(
            HeapConfig::new(0x1000, 64).with_mode(HeaderMode::Headerless).mode,
            HeaderMode::Headerless
        );
    }
}
