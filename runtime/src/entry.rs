// Runtime Entry
//
// `_cstart` is where the early assembly startup code lands. It brings up
// the pieces the kernel needs before its own `main` can run, then calls
// `main(0, NULL)`: the kernel is linked like a C program but there is no
// loader to pass it arguments.
//
// Bring-up order:
// 1. Serial logging (bare-metal x86_64 only)
// 2. The global heap over `HeapConfig::DEFAULT`
// 3. `main`
//
// A heap that fails to initialize is logged and left empty; every
// allocation then returns null, which the kernel sees as out of memory.

use crate::build_info;
use crate::config::HeapConfig;
use crate::error::AllocResult;
use crate::mm::heap::HEAP;
use crate::{log_error, log_info};

const LOG_ORIGIN: &str = "rt:init";

/// Bring up logging and the global heap over `config`.
///
/// # Safety
/// `config` must describe memory reserved for the heap (see
/// `LockedHeap::init`).
pub unsafe fn bring_up(config: &HeapConfig) -> AllocResult<()> {
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    {
        crate::serial::init();
        crate::log::set_sink(&crate::serial::SERIAL_SINK);
    }

    log_info!(LOG_ORIGIN, "{}", build_info::BOOT_BANNER);

    if let Err(e) = HEAP.init(config) {
        log_error!(LOG_ORIGIN, "Heap unavailable: {}", e);
        return Err(e);
    }
    Ok(())
}

#[cfg(feature = "c-abi")]
extern "C" {
    fn main(argc: i32, argv: *const *const u8) -> i32;
}

#[cfg(feature = "c-abi")]
#[no_mangle]
pub unsafe extern "C" fn _cstart() {
    let _ = bring_up(&HeapConfig::DEFAULT);
    main(0, core::ptr::null());
}

/// Split-stack hook emitted by old toolchains. There is only one fixed
/// stack here, so there is nothing to grow.
#[cfg(feature = "c-abi")]
#[no_mangle]
pub extern "C" fn __morestack() {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AllocError;

    // The only test that touches the global heap.
    #[test]
    fn bring_up_installs_global_heap_once() {
        let buf = Box::leak(vec![0u32; 64].into_boxed_slice());
        let config = HeapConfig::new(buf.as_mut_ptr() as usize, 256);

        unsafe { bring_up(&config) }.unwrap();
        assert!(HEAP.is_initialized());
        assert!(!HEAP.malloc(16).is_null());
        assert_eq!(unsafe { bring_up(&config) }, Err(AllocError::AlreadyInitialized));
    }
}
