// Raw Memory Primitives
//
// Byte-level copy, move, fill, and peek/poke used by the heap and exported
// to C by `libc`. Everything here works on raw addresses and is `unsafe`;
// callers are responsible for the ranges being valid.
//
// With the `c-abi` feature these back the exported `memcpy`/`memmove`/
// `memset`. The loops must stay plain byte loops and the crate is built
// `no_builtins`, otherwise LLVM lowers them into calls to themselves.

use core::ptr;

/// Copy `count` bytes from `src` to `dst` in ascending address order.
///
/// # Safety
/// Both ranges must be valid for `count` bytes and must not overlap.
pub unsafe fn copy(dst: *mut u8, src: *const u8, count: usize) -> *mut u8 {
    let mut i = 0;
    while i < count {
        *dst.add(i) = *src.add(i);
        i += 1;
    }
    dst
}

/// Overlap-safe copy.
///
/// # Safety
/// Both ranges must be valid for `count` bytes.
pub unsafe fn move_bytes(dst: *mut u8, src: *const u8, count: usize) -> *mut u8 {
    if (dst as usize) <= (src as usize) {
        return copy(dst, src, count);
    }

    let mut i = count;
    while i > 0 {
        i -= 1;
        *dst.add(i) = *src.add(i);
    }
    dst
}

/// # Safety
/// `dst` must be valid for `count` bytes.
pub unsafe fn fill(dst: *mut u8, value: u8, count: usize) -> *mut u8 {
    let mut i = 0;
    while i < count {
        *dst.add(i) = value;
        i += 1;
    }
    dst
}

/// Read one byte from an arbitrary address.
///
/// # Safety
/// `addr` must be readable. Volatile, so MMIO reads are not elided.
#[inline]
pub unsafe fn peek(addr: usize) -> u8 {
    ptr::read_volatile(addr as *const u8)
}

/// Write one byte to an arbitrary address.
///
/// # Safety
/// `addr` must be writable.
#[inline]
pub unsafe fn poke(addr: usize, value: u8) {
    ptr::write_volatile(addr as *mut u8, value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn copy_matches_source() {
        let src: Vec<u8> = (0..=255u8).cycle().take(4096).collect();
        let mut dst = vec![0u8; 4096];

        let ret = unsafe { copy(dst.as_mut_ptr(), src.as_ptr(), src.len()) };
        assert_eq!(ret, dst.as_mut_ptr());
        assert_eq!(dst, src);
    }

    #[test]
    fn zero_length_copy_touches_nothing() {
        let src = [1u8, 2, 3];
        let mut dst = [9u8; 3];
        unsafe { copy(dst.as_mut_ptr(), src.as_ptr(), 0) };
        assert_eq!(dst, [9, 9, 9]);
    }

    #[test]
    fn copy_stops_at_count() {
        let src = [7u8; 8];
        let mut dst = [0u8; 8];
        unsafe { copy(dst.as_mut_ptr(), src.as_ptr(), 5) };
        assert_eq!(dst, [7, 7, 7, 7, 7, 0, 0, 0]);
    }

    #[test]
    fn move_handles_overlap_both_ways() {
        let mut buf = *b"abcdefgh";
        let p = buf.as_mut_ptr();
        unsafe { move_bytes(p.add(2), p, 5) };
        assert_eq!(&buf, b"ababcdeh");

        let mut buf = *b"abcdefgh";
        let p = buf.as_mut_ptr();
        unsafe { move_bytes(p, p.add(3), 5) };
        assert_eq!(&buf, b"defghfgh");
    }

    #[test]
    fn fill_and_peek_poke() {
        let mut buf = [0u8; 16];
        unsafe { fill(buf.as_mut_ptr().add(4), 0xEE, 8) };
        assert_eq!(&buf[..4], &[0; 4]);
        assert_eq!(&buf[4..12], &[0xEE; 8]);
        assert_eq!(&buf[12..], &[0; 4]);

        let addr = buf.as_mut_ptr() as usize;
        unsafe {
            poke(addr + 1, 0x42);
            assert_eq!(peek(addr + 1), 0x42);
            assert_eq!(peek(addr + 4), 0xEE);
        }
    }
}
