mod parse;
mod utils;

use smart_leds::{RGB8, hsv::Hsv as HSV};

pub use parse::{ColorToken, parse_color, parse_number};
pub use utils::{gamma_rgb, hue_to_rgb, rgb_from_u32, rgb_to_u32};

pub type Rgb = RGB8;
pub type Hsv = HSV;

/// Sentinel stored in colour programs for "draw a fresh random colour"
pub const RANDOM_COLOR: u32 = 0xFFFF_FFFF;

/// Largest 24-bit colour
pub const MAX_COLOR: u32 = 0x00FF_FFFF;

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
