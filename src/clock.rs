//! Millisecond clock sources
//!
//! All scheduling and animation arithmetic works on a 32-bit millisecond
//! counter that wraps at 2^32. Elapsed time is always computed with
//! [`elapsed_ms`], which stays correct across a single wrap as long as the
//! interval is below 2^31 ms.

use core::cell::Cell;

use critical_section::Mutex;
use embassy_time::Instant;

/// Source of monotonic milliseconds since boot
pub trait Clock {
    /// Current time in milliseconds, wrapping at 2^32
    fn now_ms(&self) -> u32;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now_ms(&self) -> u32 {
        (**self).now_ms()
    }
}

/// Wrap-safe elapsed time between an anchor and now
#[inline]
pub const fn elapsed_ms(now: u32, anchor: u32) -> u32 {
    now.wrapping_sub(anchor)
}

/// Clock backed by the embassy time driver
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[allow(clippy::cast_possible_truncation)]
    fn now_ms(&self) -> u32 {
        // Truncation is the wrap.
        Instant::now().as_millis() as u32
    }
}

/// Counter clock advanced from a timer interrupt
///
/// Safe to share as a `static`: reads and updates go through a critical
/// section, so an ISR may call [`TickClock::tick`] while the executor reads.
pub struct TickClock {
    millis: Mutex<Cell<u32>>,
}

impl TickClock {
    /// Create a clock starting at zero
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Create a clock starting at the given millisecond value
    pub const fn starting_at(ms: u32) -> Self {
        Self {
            millis: Mutex::new(Cell::new(ms)),
        }
    }

    /// Advance the clock, wrapping at 2^32
    pub fn tick(&self, ms: u32) {
        critical_section::with(|cs| {
            let millis = self.millis.borrow(cs);
            millis.set(millis.get().wrapping_add(ms));
        });
    }

    /// Jump to an absolute value
    pub fn set(&self, ms: u32) {
        critical_section::with(|cs| self.millis.borrow(cs).set(ms));
    }
}

impl Default for TickClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for TickClock {
    fn now_ms(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }
}
