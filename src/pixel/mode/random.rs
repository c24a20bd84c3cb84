use rand::Rng;

use super::{Canvas, Mode};
use crate::color::gamma_rgb;

/// One random pixel gets a random colour every frame
///
/// The strip is cleared on the first frame only, so the picture fills up
/// over time.
#[derive(Debug, Clone, Default)]
pub struct RandomMode {
    primed: bool,
}

impl Mode for RandomMode {
    fn render(&mut self, canvas: &mut Canvas<'_>) {
        if !self.primed {
            canvas.clear();
            self.primed = true;
        }
        let position = canvas.rng.gen_range(0..canvas.leds.len());
        let color = canvas.random_color();
        canvas.leds[position] = gamma_rgb(color);
    }
}
