use super::{Canvas, Mode};

/// Program colours drawn backwards from the head, head moving by `offset`
///
/// Without `fill` only `program.len()` pixels are drawn per frame; with it
/// the program repeats over the whole strip. With `append` each frame is
/// drawn after the previous one and the strip is wiped when the head is
/// back at 0. A non-zero `toggle` flips the direction every `toggle` frames.
#[derive(Debug, Clone, Copy, Default)]
pub struct ChaseMode;

impl Mode for ChaseMode {
    fn render(&mut self, canvas: &mut Canvas<'_>) {
        if canvas.wipe || (canvas.append && canvas.cursor.index == 0) {
            canvas.clear();
        }

        let num_leds = canvas.num_leds();
        let limit = if canvas.fill {
            usize::from(num_leds)
        } else {
            canvas.program.len()
        };

        let mut position = canvas.cursor.index;
        for step in 0..limit {
            let color = canvas.color(step);
            canvas.set(position, color);
            position = position.checked_sub(1).unwrap_or(num_leds - 1);
        }

        let cursor = &mut *canvas.cursor;
        cursor.draw_count = cursor.draw_count.saturating_add(1);
        if canvas.toggle > 0 && cursor.draw_count >= canvas.toggle {
            cursor.offset = cursor.offset.wrapping_neg();
            cursor.draw_count = 0;
        }
        if canvas.append {
            let step = i32::try_from(limit).unwrap_or(i32::MAX);
            let step = if cursor.offset < 0 { -step } else { step };
            cursor.advance_by(step, num_leds);
        } else {
            cursor.advance(num_leds);
        }
    }
}
