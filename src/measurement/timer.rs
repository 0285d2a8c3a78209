//! Platform-specific cycle counters.
//!
//! Provides serialized counter reads using:
//! - x86_64: `lfence; rdtsc` with compiler fence
//! - aarch64: `isb; mrs cntvct_el0`
//! - Fallback: `std::time::Instant` for other platforms

use std::hint::black_box as std_black_box;
use std::time::Instant;

/// Wrapper around `std::hint::black_box` for preventing compiler optimizations.
///
/// Use this to wrap function calls being measured so the compiler can neither
/// remove the computation nor move it across the counter reads.
#[inline]
pub fn black_box<T>(x: T) -> T {
    std_black_box(x)
}

/// A monotonic tick source.
///
/// Reads must be non-decreasing within one measurement window. Wraparound is
/// tolerated downstream: a wrapped pair yields a non-positive delta, which the
/// accumulator discards.
pub trait CycleTimer {
    /// Read the current tick count.
    fn read(&self) -> u64;

    /// Short human-readable name of the tick source.
    fn name(&self) -> &'static str {
        "custom"
    }
}

impl<T: CycleTimer + ?Sized> CycleTimer for &T {
    #[inline]
    fn read(&self) -> u64 {
        (**self).read()
    }

    fn name(&self) -> &'static str {
        (**self).name()
    }
}

/// The hardware cycle counter of the current CPU.
#[derive(Debug, Clone, Copy, Default)]
pub struct CpuCycles;

impl CycleTimer for CpuCycles {
    #[inline]
    fn read(&self) -> u64 {
        rdtsc()
    }

    fn name(&self) -> &'static str {
        if cfg!(target_arch = "x86_64") {
            "rdtsc"
        } else if cfg!(target_arch = "aarch64") {
            "cntvct_el0"
        } else {
            "instant"
        }
    }
}

/// Read the CPU cycle counter with appropriate serialization.
///
/// On x86_64, this uses `lfence; rdtsc` to ensure all prior instructions
/// complete before reading the timestamp counter.
///
/// On aarch64, this uses `isb; mrs cntvct_el0` for the virtual timer count.
///
/// On other platforms, falls back to `Instant::now()` based measurement
/// (less precise but still functional).
#[inline]
pub fn rdtsc() -> u64 {
    #[cfg(target_arch = "x86_64")]
    {
        rdtsc_x86_64()
    }

    #[cfg(target_arch = "aarch64")]
    {
        rdtsc_aarch64()
    }

    #[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
    {
        rdtsc_fallback()
    }
}

#[cfg(target_arch = "x86_64")]
#[inline]
fn rdtsc_x86_64() -> u64 {
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    let cycles: u64;
    // SAFETY: lfence and rdtsc only read the timestamp counter into rax/rdx.
    unsafe {
        std::arch::asm!(
            "lfence",
            "rdtsc",
            "shl rdx, 32",
            "or rax, rdx",
            out("rax") cycles,
            out("rdx") _,
            options(nostack, nomem),
        );
    }

    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    cycles
}

#[cfg(target_arch = "aarch64")]
#[inline]
fn rdtsc_aarch64() -> u64 {
    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    let cycles: u64;
    // SAFETY: isb and a read of the virtual counter have no memory effects.
    unsafe {
        std::arch::asm!(
            "isb",
            "mrs {}, cntvct_el0",
            out(reg) cycles,
            options(nostack, nomem),
        );
    }

    std::sync::atomic::compiler_fence(std::sync::atomic::Ordering::SeqCst);

    cycles
}

#[cfg(not(any(target_arch = "x86_64", target_arch = "aarch64")))]
#[inline]
fn rdtsc_fallback() -> u64 {
    // Static reference point keeps reads comparable within a run
    use std::sync::OnceLock;
    static START: OnceLock<Instant> = OnceLock::new();

    let start = START.get_or_init(Instant::now);
    start.elapsed().as_nanos() as u64
}

/// Wall-clock seconds since `start`, for run metadata.
pub(crate) fn elapsed_secs(start: Instant) -> f64 {
    start.elapsed().as_secs_f64()
}
