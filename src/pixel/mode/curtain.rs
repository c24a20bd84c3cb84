use super::{Canvas, Mode};
use crate::color::BLACK;

/// Edge the curtain closes from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CurtainSide {
    Both,
    Left,
    Right,
}

/// Colours drawn in from the strip edges
///
/// The two-sided curtain blacks out the crossing pixels once the edges
/// meet. A one-sided curtain counts drawn pixels and, with `wipe`, clears
/// the strip after a full pass.
#[derive(Debug, Clone)]
pub struct CurtainMode {
    side: CurtainSide,
}

impl CurtainMode {
    pub const fn new(side: CurtainSide) -> Self {
        Self { side }
    }

    pub const fn side(&self) -> CurtainSide {
        self.side
    }
}

impl Mode for CurtainMode {
    fn render(&mut self, canvas: &mut Canvas<'_>) {
        let num_leds = canvas.num_leds();
        let left = canvas.cursor.index;
        let right = num_leds - 1 - left;

        match self.side {
            CurtainSide::Both => {
                if left >= right {
                    canvas.set(left, BLACK);
                    canvas.set(right, BLACK);
                } else {
                    let color = canvas.color(usize::from(left));
                    canvas.set(left, color);
                    let color = canvas.color(usize::from(right));
                    canvas.set(right, color);
                }
            }
            CurtainSide::Left | CurtainSide::Right => {
                if canvas.cursor.draw_count >= num_leds {
                    if canvas.wipe {
                        canvas.clear();
                    }
                    canvas.cursor.draw_count = 0;
                }
                let position = if self.side == CurtainSide::Left {
                    left
                } else {
                    right
                };
                let color = canvas.color(usize::from(position));
                canvas.set(position, color);
                canvas.cursor.draw_count += 1;
            }
        }

        canvas.cursor.advance(num_leds);
    }
}
