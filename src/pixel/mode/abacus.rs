use super::{Canvas, Mode};
use crate::color::BLACK;

/// Beads slide from the start of the strip and stack up at the far end
///
/// `cursor.index` is the top of the stack, `cursor.temp_index` the moving
/// bead and `cursor.draw_count` the pixel it left on the previous frame.
/// Each bead moves by `offset` pixels per frame.
#[derive(Debug, Clone, Default)]
pub struct AbacusMode {
    primed: bool,
}

impl Mode for AbacusMode {
    fn render(&mut self, canvas: &mut Canvas<'_>) {
        let num_leds = canvas.num_leds();
        if !self.primed {
            canvas.clear();
            let cursor = &mut *canvas.cursor;
            cursor.index = num_leds - 1;
            cursor.temp_index = 0;
            cursor.draw_count = 0;
            cursor.offset = cursor.offset.max(1);
            self.primed = true;
        }

        canvas.set(canvas.cursor.draw_count, BLACK);
        let color = canvas.color(usize::from(canvas.cursor.index));
        canvas.set(canvas.cursor.temp_index, color);

        let cursor = &mut *canvas.cursor;
        if cursor.temp_index >= cursor.index {
            cursor.temp_index = 0;
            cursor.index = cursor.index.checked_sub(1).unwrap_or(num_leds - 1);
            cursor.draw_count = 0;
        } else {
            cursor.draw_count = cursor.temp_index;
            #[allow(clippy::cast_sign_loss)]
            let step = cursor.offset as u16;
            cursor.temp_index += step.min(cursor.index - cursor.temp_index);
        }
    }
}
