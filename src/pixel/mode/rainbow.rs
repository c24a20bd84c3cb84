use super::{Canvas, Mode};
use crate::color::{gamma_rgb, hue_to_rgb};

/// Hue advance of the rainbow per frame
const RAINBOW_HUE_STEP: u16 = 256;

/// Hue advance of the chasing rainbow per frame, a full turn every 90 frames
#[allow(clippy::cast_possible_truncation)]
const CHASE_RAINBOW_HUE_STEP: u16 = (65536 / 90) as u16;

/// Spacing between lit pixels of the chasing rainbow
const CHASE_RAINBOW_SPACING: usize = 3;

/// Hue of `position` when one turn of the colour wheel spans the strip
#[allow(clippy::cast_possible_truncation)]
fn hue_at(first_hue: u16, position: usize, num_leds: usize) -> u16 {
    let spread = (position as u64 * 65536 / num_leds.max(1) as u64) as u16;
    first_hue.wrapping_add(spread)
}

/// Full colour wheel across the strip, rotating every frame
#[derive(Debug, Clone, Default)]
pub struct RainbowMode {
    first_hue: u16,
}

impl Mode for RainbowMode {
    fn render(&mut self, canvas: &mut Canvas<'_>) {
        let num_leds = canvas.leds.len();
        for (position, led) in canvas.leds.iter_mut().enumerate() {
            *led = gamma_rgb(hue_to_rgb(hue_at(self.first_hue, position, num_leds)));
        }
        self.first_hue = self.first_hue.wrapping_add(RAINBOW_HUE_STEP);
    }
}

/// Every third pixel lit with the rainbow, marching one pixel per frame
#[derive(Debug, Clone, Default)]
pub struct ChaseRainbowMode {
    first_hue: u16,
    phase: usize,
}

impl Mode for ChaseRainbowMode {
    fn render(&mut self, canvas: &mut Canvas<'_>) {
        canvas.clear();
        let num_leds = canvas.leds.len();
        for position in (self.phase..num_leds).step_by(CHASE_RAINBOW_SPACING) {
            canvas.leds[position] =
                gamma_rgb(hue_to_rgb(hue_at(self.first_hue, position, num_leds)));
        }
        self.phase = (self.phase + 1) % CHASE_RAINBOW_SPACING;
        self.first_hue = self.first_hue.wrapping_add(CHASE_RAINBOW_HUE_STEP);
    }
}
