#![no_std]

pub mod clock;
pub mod color;
pub mod error;
pub mod gamma;
pub mod math8;
pub mod pixel;
pub mod rgb;
pub mod run_state;
pub mod scheduler;

pub use clock::{Clock, SystemClock, TickClock};
pub use color::{Hsv, RANDOM_COLOR, Rgb};
pub use error::Error;
pub use gamma::{cie1931_pwm, ws2812_lut};
pub use math8::U8Adjuster;
pub use pixel::{PixelEngine, PixelMode, PixelProgram, PixelStrip};
pub use rgb::{RgbChannel, RgbEngine, RgbPins, RgbProgram, RgbStep};
pub use run_state::RunState;
pub use scheduler::{Scheduler, StatsReport, TaskControl, TaskHandler, TaskStats};

pub use embassy_time::{Duration, Instant};

/// Maximum length of a channel or strip name
pub const MAX_NAME_LEN: usize = 30;

/// Maximum number of steps in a fade program
pub const MAX_RGB_STEPS: usize = 16;

/// Maximum number of colours in a pixel program
pub const MAX_PIXEL_COLORS: usize = 32;

/// Abstract addressable LED driver
///
/// Implement this trait to support different hardware platforms.
/// The pixel engine is generic over this trait.
pub trait OutputDriver {
    /// Write colors to the LED strip
    fn write(&mut self, colors: &[Rgb]);
}

/// Abstract PWM output
///
/// Duties are 10-bit, `0..=`[`gamma::MAX_PWM_VALUE`].
pub trait PwmOutput {
    /// Set the duty of one pin
    fn set_duty(&mut self, pin: u8, duty: u16);
}

/// Route the `log` macros to the ESP32 console
#[cfg(feature = "esp32-log")]
pub fn init_logger(level: log::LevelFilter) {
    esp_println::logger::init_logger(level);
}
