//! Pixel animation modes
//!
//! Modes are stored in an enum to avoid heap allocations, each one
//! implements the [`Mode`] trait. Per-mode animation phase lives in the
//! mode struct; the cursor shared by the program-driven modes lives in the
//! strip and reaches the mode through [`Canvas`].

mod abacus;
mod chase;
mod curtain;
mod rainbow;
mod random;

pub use abacus::AbacusMode;
pub use chase::ChaseMode;
pub use curtain::{CurtainMode, CurtainSide};
pub use rainbow::{ChaseRainbowMode, RainbowMode};
pub use random::RandomMode;

use rand::{Rng, rngs::SmallRng};

use crate::color::{BLACK, MAX_COLOR, RANDOM_COLOR, Rgb, rgb_from_u32};

const MODE_NAME_OFF: &str = "off";
const MODE_NAME_RAINBOW: &str = "rainbow";
const MODE_NAME_CHASE_RAINBOW: &str = "chase_rainbow";
const MODE_NAME_RANDOM: &str = "random";
const MODE_NAME_CHASE: &str = "chase";
const MODE_NAME_CURTAIN: &str = "curtain";
const MODE_NAME_CURTAIN_LEFT: &str = "curtain_left";
const MODE_NAME_CURTAIN_RIGHT: &str = "curtain_right";
const MODE_NAME_ABACUS: &str = "abacus";

const MODE_ID_OFF: u8 = 0;
const MODE_ID_RAINBOW: u8 = 1;
const MODE_ID_CHASE_RAINBOW: u8 = 2;
const MODE_ID_RANDOM: u8 = 3;
const MODE_ID_CHASE: u8 = 4;
const MODE_ID_CURTAIN: u8 = 5;
const MODE_ID_CURTAIN_LEFT: u8 = 6;
const MODE_ID_CURTAIN_RIGHT: u8 = 7;
const MODE_ID_ABACUS: u8 = 8;

pub trait Mode {
    /// Draw one frame into the canvas
    fn render(&mut self, canvas: &mut Canvas<'_>);
}

/// Cursor state shared by the program-driven modes
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Cursor {
    /// Head position, `0..num_leds`
    pub index: u16,
    /// Secondary position (abacus chaser)
    pub temp_index: u16,
    /// Frames drawn since the last direction flip or wipe
    pub draw_count: u16,
    /// Signed per-frame advance of `index`
    pub offset: i16,
}

impl Cursor {
    pub const fn new(offset: i16) -> Self {
        Self {
            index: 0,
            temp_index: 0,
            draw_count: 0,
            offset,
        }
    }

    /// Move `index` by `offset`, wrapping around the strip
    pub fn advance(&mut self, num_leds: u16) {
        self.advance_by(i32::from(self.offset), num_leds);
    }

    /// Move `index` by `step`, wrapping around the strip
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn advance_by(&mut self, step: i32, num_leds: u16) {
        let n = i32::from(num_leds.max(1));
        self.index = (i32::from(self.index) + step).rem_euclid(n) as u16;
    }
}

/// Everything a mode may touch while drawing one frame
pub struct Canvas<'a> {
    /// Pixel buffer, exactly `num_leds` long
    pub leds: &'a mut [Rgb],
    /// Colour program, never empty
    pub program: &'a [u32],
    pub cursor: &'a mut Cursor,
    pub rng: &'a mut SmallRng,
    /// Clear the buffer before each frame
    pub wipe: bool,
    /// Repeat the program across the whole strip
    pub fill: bool,
    /// Move the head by the program length, wiping when it is back at 0
    pub append: bool,
    /// Frames between direction flips, 0 disables
    pub toggle: u16,
}

impl Canvas<'_> {
    #[allow(clippy::cast_possible_truncation)]
    pub fn num_leds(&self) -> u16 {
        self.leds.len() as u16
    }

    pub fn clear(&mut self) {
        self.leds.fill(BLACK);
    }

    /// Program colour at `position` (wrapping), resolving random entries
    pub fn color(&mut self, position: usize) -> Rgb {
        if self.program.is_empty() {
            return BLACK;
        }
        match self.program[position % self.program.len()] {
            RANDOM_COLOR => self.random_color(),
            color => rgb_from_u32(color),
        }
    }

    /// Uniform 24-bit colour
    pub fn random_color(&mut self) -> Rgb {
        rgb_from_u32(self.rng.gen_range(0..=MAX_COLOR))
    }

    pub fn set(&mut self, index: u16, color: Rgb) {
        if let Some(led) = self.leds.get_mut(usize::from(index)) {
            *led = color;
        }
    }
}

/// Known pixel modes
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum PixelMode {
    Off = MODE_ID_OFF,
    Rainbow = MODE_ID_RAINBOW,
    ChaseRainbow = MODE_ID_CHASE_RAINBOW,
    Random = MODE_ID_RANDOM,
    Chase = MODE_ID_CHASE,
    Curtain = MODE_ID_CURTAIN,
    CurtainLeft = MODE_ID_CURTAIN_LEFT,
    CurtainRight = MODE_ID_CURTAIN_RIGHT,
    Abacus = MODE_ID_ABACUS,
}

impl PixelMode {
    pub fn from_raw(value: u8) -> Option<Self> {
        Some(match value {
            MODE_ID_OFF => Self::Off,
            MODE_ID_RAINBOW => Self::Rainbow,
            MODE_ID_CHASE_RAINBOW => Self::ChaseRainbow,
            MODE_ID_RANDOM => Self::Random,
            MODE_ID_CHASE => Self::Chase,
            MODE_ID_CURTAIN => Self::Curtain,
            MODE_ID_CURTAIN_LEFT => Self::CurtainLeft,
            MODE_ID_CURTAIN_RIGHT => Self::CurtainRight,
            MODE_ID_ABACUS => Self::Abacus,
            _ => return None,
        })
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Off => MODE_NAME_OFF,
            Self::Rainbow => MODE_NAME_RAINBOW,
            Self::ChaseRainbow => MODE_NAME_CHASE_RAINBOW,
            Self::Random => MODE_NAME_RANDOM,
            Self::Chase => MODE_NAME_CHASE,
            Self::Curtain => MODE_NAME_CURTAIN,
            Self::CurtainLeft => MODE_NAME_CURTAIN_LEFT,
            Self::CurtainRight => MODE_NAME_CURTAIN_RIGHT,
            Self::Abacus => MODE_NAME_ABACUS,
        }
    }

    pub fn parse_from_str(s: &str) -> Option<Self> {
        match s {
            MODE_NAME_OFF => Some(Self::Off),
            MODE_NAME_RAINBOW => Some(Self::Rainbow),
            MODE_NAME_CHASE_RAINBOW => Some(Self::ChaseRainbow),
            MODE_NAME_RANDOM => Some(Self::Random),
            MODE_NAME_CHASE => Some(Self::Chase),
            MODE_NAME_CURTAIN => Some(Self::Curtain),
            MODE_NAME_CURTAIN_LEFT => Some(Self::CurtainLeft),
            MODE_NAME_CURTAIN_RIGHT => Some(Self::CurtainRight),
            MODE_NAME_ABACUS => Some(Self::Abacus),
            _ => None,
        }
    }

    pub fn to_slot(self) -> ModeSlot {
        match self {
            Self::Off => ModeSlot::Off,
            Self::Rainbow => ModeSlot::Rainbow(RainbowMode::default()),
            Self::ChaseRainbow => ModeSlot::ChaseRainbow(ChaseRainbowMode::default()),
            Self::Random => ModeSlot::Random(RandomMode::default()),
            Self::Chase => ModeSlot::Chase(ChaseMode),
            Self::Curtain => ModeSlot::Curtain(CurtainMode::new(CurtainSide::Both)),
            Self::CurtainLeft => ModeSlot::Curtain(CurtainMode::new(CurtainSide::Left)),
            Self::CurtainRight => ModeSlot::Curtain(CurtainMode::new(CurtainSide::Right)),
            Self::Abacus => ModeSlot::Abacus(AbacusMode::default()),
        }
    }
}

/// Mode slot - enum containing the state of every mode
#[derive(Debug, Clone, Default)]
pub enum ModeSlot {
    #[default]
    Off,
    Rainbow(RainbowMode),
    ChaseRainbow(ChaseRainbowMode),
    Random(RandomMode),
    Chase(ChaseMode),
    Curtain(CurtainMode),
    Abacus(AbacusMode),
}

impl ModeSlot {
    /// Render the current mode
    pub fn render(&mut self, canvas: &mut Canvas<'_>) {
        match self {
            Self::Off => {}
            Self::Rainbow(mode) => mode.render(canvas),
            Self::ChaseRainbow(mode) => mode.render(canvas),
            Self::Random(mode) => mode.render(canvas),
            Self::Chase(mode) => mode.render(canvas),
            Self::Curtain(mode) => mode.render(canvas),
            Self::Abacus(mode) => mode.render(canvas),
        }
    }
}
