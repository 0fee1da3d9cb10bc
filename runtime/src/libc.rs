// C Runtime Shims
//
// Unmangled `malloc` family and `mem*` symbols for code that expects a C
// library: the kernel's own C parts, and `core`, which lowers copies and
// fills to `memcpy`/`memset` calls. All of them forward to `mm::heap::HEAP`
// or `mem`.
//
// Failure is reported the C way and only that way: null from the
// allocating calls. `free` of a foreign pointer is ignored.
//
// Built only with the `c-abi` feature.

use core::ffi::{c_int, c_void};

use crate::mem;
use crate::mm::heap::HEAP;

#[no_mangle]
pub unsafe extern "C" fn malloc(len: usize) -> *mut c_void {
    HEAP.malloc(len) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn calloc(num: usize, size: usize) -> *mut c_void {
    let Some(len) = num.checked_mul(size) else {
        return core::ptr::null_mut();
    };

    let ptr = HEAP.malloc(len);
    if !ptr.is_null() {
        mem::fill(ptr, 0, len);
    }
    ptr as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn free(ptr: *mut c_void) {
    HEAP.free(ptr as *mut u8)
}

#[no_mangle]
pub unsafe extern "C" fn realloc(ptr: *mut c_void, len: usize) -> *mut c_void {
    HEAP.realloc(ptr as *mut u8, len) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn memcpy(dst: *mut c_void, src: *const c_void, count: usize) -> *mut c_void {
    mem::copy(dst as *mut u8, src as *const u8, count) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn memmove(dst: *mut c_void, src: *const c_void, count: usize) -> *mut c_void {
    mem::move_bytes(dst as *mut u8, src as *const u8, count) as *mut c_void
}

#[no_mangle]
pub unsafe extern "C" fn memset(dst: *mut c_void, value: c_int, count: usize) -> *mut c_void {
    mem::fill(dst as *mut u8, value as u8, count) as *mut c_void
}
