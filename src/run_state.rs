//! Run-state register
//!
//! A 32-bit mask that gates which tasks are eligible on a scheduler pass.
//! Five bits follow the device's connectivity lifecycle, the remaining
//! channels are free for the application.

use bitflags::bitflags;

bitflags! {
    /// Run-state mask
    ///
    /// The scheduler treats every bit opaquely; the named flags are the
    /// conventional assignment used by the built-in LED tasks.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct RunState: u32 {
        /// Boot, before any network mode is chosen
        const INIT = 1 << 0;
        /// Access-point configuration mode
        const AP = 1 << 1;
        /// Station mode, link down
        const STA_DOWN = 1 << 2;
        /// Station mode, link up
        const STA_UP = 1 << 3;
        /// Firmware update in progress
        const OTA = 1 << 4;

        const _ = !0;
    }
}

impl RunState {
    /// Nothing runs
    pub const STOPPED: Self = Self::empty();
    /// Every channel set
    pub const ALL: Self = Self::all();

    /// Mask with only channel `n` (0..32) set
    pub const fn channel(n: u8) -> Self {
        Self::from_bits_retain(1 << (n & 31))
    }

    /// Check if dispatching is disabled
    pub const fn is_stopped(self) -> bool {
        self.is_empty()
    }
}

impl Default for RunState {
    fn default() -> Self {
        Self::STOPPED
    }
}

impl From<u32> for RunState {
    fn from(bits: u32) -> Self {
        Self::from_bits_retain(bits)
    }
}

impl From<RunState> for u32 {
    fn from(state: RunState) -> Self {
        state.bits()
    }
}
