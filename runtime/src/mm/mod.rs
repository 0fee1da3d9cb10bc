// Memory Management
//
// The bring-up heap, layered bottom-up:
// - `region`: address span and the forward-only cursor (pure arithmetic)
// - `bump`: the allocator proper, block layout, handles, raw-pointer checks
// - `heap`: the locked process-wide instance and its C / `GlobalAlloc` faces
//
// Nothing here reclaims memory. When the kernel has a real allocator it
// should take over from `heap::HEAP` rather than extend this one.

pub mod bump;
pub mod heap;
pub mod region;

pub use bump::{Allocation, BumpAllocator, HeaderMode, HeapStats, HEADER_SIZE};
pub use heap::{LockedHeap, HEAP};
pub use region::{Cursor, Region, ALIGN};
