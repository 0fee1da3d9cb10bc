// Runtime Utilities
//
// Interrupt-safe critical sections. On bare-metal x86_64 the closure runs
// with interrupts masked so an interrupt handler that touches the heap
// cannot spin forever on a lock held by the code it interrupted. Everywhere
// else (host builds, other architectures) it is a plain call.

#[inline(always)]
pub fn without_interrupts<F, R>(f: F) -> R
where
    F: FnOnce() -> R,
{
    #[cfg(all(target_arch = "x86_64", target_os = "none"))]
    {
        x86_64::instructions::interrupts::without_interrupts(f)
    }

    #[cfg(not(all(target_arch = "x86_64", target_os = "none")))]
    {
        f()
    }
}
