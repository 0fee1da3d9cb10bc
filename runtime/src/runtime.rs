// Rustic freestanding runtime
//
// The support code a Rust kernel needs to boot on bare hardware before
// any allocator, C library, or console exists.
//
// Key responsibilities:
// - A bump heap over a fixed, bounded memory region (`mm`)
// - Byte copy/move/fill and peek/poke primitives (`mem`)
// - The C-facing symbols the kernel and `core` link against: `malloc`,
//   `calloc`, `free`, `realloc`, `memcpy`, `memmove`, `memset`
//   (`libc`, feature `c-abi`)
// - The `_cstart` trampoline and the `__morestack` stub (`entry`)
// - Leveled logging to a pluggable sink, COM1 serial on x86_64 (`log`)
//
// Design and implementation:
// - `no_std` outside of tests; no allocation anywhere in the runtime itself
// - One explicit allocator object; the global heap is a spinlocked wrapper
//   around it, installed once with an explicit `HeapConfig`
// - Every failure is an `AllocError` in Rust and null at the C boundary
// - Built `no_builtins` with `c-abi` so the hand-written `mem*` loops are
//   not lowered into calls to themselves
//
// Limitations:
// - Memory is never reclaimed; `free` is accepted and ignored
// - Alignment is capped at 4 bytes; `GlobalAlloc` returns null for wider
//   layouts, so `Box<u64>` and friends cannot use this heap on x86_64
// - Serial output exists only on bare-metal x86_64

#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "c-abi", no_builtins)]

pub mod build_info;
pub mod config;
pub mod entry;
pub mod error;
pub mod log;
pub mod mem;
pub mod mm;
pub mod util;

#[cfg(all(target_arch = "x86_64", target_os = "none"))]
pub mod serial;

#[cfg(feature = "c-abi")]
mod libc;

pub use config::HeapConfig;
pub use error::{AllocError, AllocResult};
pub use mm::{Allocation, BumpAllocator, HeaderMode, LockedHeap, Region, HEAP};
