use super::program::{RgbProgram, RgbStep};
use crate::error::Error;

const PRESETS: [&[RgbStep]; 10] = [
    &[RgbStep::color(0xFF_FFFF)],
    &[RgbStep::color(0xFF_0000)],
    &[RgbStep::color(0x00_FF00)],
    &[RgbStep::color(0x00_00FF)],
    &[RgbStep::random().with_pause(1000)],
    &[RgbStep::random().with_fade_delay(3).with_pause(1000)],
    &[RgbStep::random().with_pause(200)],
    &[RgbStep::random().with_fade_delay(1).with_pause(200)],
    &[
        RgbStep::color(0xFF_0000).with_fade_delay(10),
        RgbStep::color(0x00_FF00).with_fade_delay(10),
        RgbStep::color(0x00_00FF).with_fade_delay(10),
    ],
    &[RgbStep::color(0)],
];

/// Number of built-in demo programs
pub const PRESET_COUNT: usize = PRESETS.len();

/// Built-in demo program, wrapping around the preset list
pub fn preset(variant: usize) -> Result<RgbProgram, Error> {
    RgbProgram::from_steps(PRESETS[variant % PRESET_COUNT])
}
