use core::iter;

use smart_leds::{gamma, hsv::hsv2rgb};

use crate::color::{Hsv, Rgb};

/// Create an RGB color from a u32 value (0xRRGGBB format)
pub const fn rgb_from_u32(color: u32) -> Rgb {
    Rgb {
        r: ((color >> 16) & 0xFF) as u8,
        g: ((color >> 8) & 0xFF) as u8,
        b: (color & 0xFF) as u8,
    }
}

/// Pack an RGB color into a u32 value (0xRRGGBB format)
pub const fn rgb_to_u32(color: Rgb) -> u32 {
    ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32
}

/// Fully saturated color for a 16-bit hue (65536 = one turn)
#[allow(clippy::cast_possible_truncation)]
pub fn hue_to_rgb(hue: u16) -> Rgb {
    hsv2rgb(Hsv {
        hue: (hue >> 8) as u8,
        sat: 255,
        val: 255,
    })
}

/// Apply the pixel gamma curve to every channel
pub fn gamma_rgb(color: Rgb) -> Rgb {
    gamma(iter::once(color)).next().unwrap_or(color)
}
