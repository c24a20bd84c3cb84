//! Pixel programs
//!
//! Besides the builder there is the legacy text form
//! `direction;pause;fill[;|,]colour,colour,...` where `fill` is 0 (wipe
//! every frame), 1 (repeat the program across the strip) or 2 (append each
//! frame after the previous one, wiping when the head is back at 0).
//! Missing trailing fields read as zero.

use heapless::Vec;

use super::mode::PixelMode;
use crate::{
    MAX_PIXEL_COLORS,
    color::{ColorToken, MAX_COLOR, RANDOM_COLOR, parse_color, parse_number},
    error::Error,
};

const FILL_MODE_WIPE: u8 = 0;
const FILL_MODE_REPEAT: u8 = 1;
const FILL_MODE_APPEND: u8 = 2;

/// Animation program of one strip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelProgram {
    pub mode: PixelMode,
    pub wipe: bool,
    pub fill: bool,
    /// Move the head by the program length each frame
    pub append: bool,
    /// Signed per-frame advance of the head
    pub offset: i16,
    /// Minimum time between frames
    pub delay_ms: u16,
    /// Frames between direction flips, 0 disables
    pub toggle: u16,
    pub brightness: u8,
    /// 24-bit colours, [`RANDOM_COLOR`] entries draw a fresh colour
    pub colors: Vec<u32, MAX_PIXEL_COLORS>,
}

impl PixelProgram {
    pub const fn new(mode: PixelMode) -> Self {
        Self {
            mode,
            wipe: false,
            fill: false,
            append: false,
            offset: 1,
            delay_ms: 0,
            toggle: 0,
            brightness: u8::MAX,
            colors: Vec::new(),
        }
    }

    #[must_use]
    pub const fn with_mode(mut self, mode: PixelMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub const fn with_wipe(mut self, wipe: bool) -> Self {
        self.wipe = wipe;
        self
    }

    #[must_use]
    pub const fn with_fill(mut self, fill: bool) -> Self {
        self.fill = fill;
        self
    }

    #[must_use]
    pub const fn with_append(mut self, append: bool) -> Self {
        self.append = append;
        self
    }

    #[must_use]
    pub const fn with_offset(mut self, offset: i16) -> Self {
        self.offset = offset;
        self
    }

    #[must_use]
    pub const fn with_delay(mut self, delay_ms: u16) -> Self {
        self.delay_ms = delay_ms;
        self
    }

    #[must_use]
    pub const fn with_toggle(mut self, toggle: u16) -> Self {
        self.toggle = toggle;
        self
    }

    #[must_use]
    pub const fn with_brightness(mut self, brightness: u8) -> Self {
        self.brightness = brightness;
        self
    }

    /// Append colours
    pub fn with_colors(mut self, colors: &[u32]) -> Result<Self, Error> {
        for &color in colors {
            self.push_color(color)?;
        }
        Ok(self)
    }

    /// Append a colour, masked to 24 bits unless it is [`RANDOM_COLOR`]
    pub fn push_color(&mut self, color: u32) -> Result<(), Error> {
        let color = if color == RANDOM_COLOR {
            color
        } else {
            color & MAX_COLOR
        };
        self.colors.push(color).map_err(|_| Error::ProgramTooLong)
    }

    /// Append an entry that draws a fresh colour every time it is used
    pub fn push_random(&mut self) -> Result<(), Error> {
        self.colors
            .push(RANDOM_COLOR)
            .map_err(|_| Error::ProgramTooLong)
    }

    /// Parse the legacy chase program text
    pub fn parse_legacy(text: &str) -> Result<Self, Error> {
        let mut fields = text.trim().splitn(4, ';');
        let direction: i16 = parse_number(fields.next())?;
        let pause: u16 = parse_number(fields.next())?;
        let mut fill_field = fields.next();
        let mut colors = fields.next();
        if colors.is_none()
            && let Some((fill, rest)) = fill_field.and_then(|field| field.split_once(','))
        {
            fill_field = Some(fill);
            colors = Some(rest);
        }

        let (wipe, fill, append) = match parse_number::<u8>(fill_field)? {
            FILL_MODE_WIPE => (true, false, false),
            FILL_MODE_REPEAT => (false, true, false),
            FILL_MODE_APPEND => (false, false, true),
            _ => return Err(Error::InvalidNumber),
        };

        let mut program = Self::new(PixelMode::Chase)
            .with_offset(direction)
            .with_delay(pause)
            .with_wipe(wipe)
            .with_fill(fill)
            .with_append(append);

        for color in colors.unwrap_or_default().split(',') {
            if color.trim().is_empty() {
                continue;
            }
            match parse_color(color)? {
                ColorToken::Value(value) => program.push_color(value)?,
                ColorToken::Random => program.push_random()?,
            }
        }
        Ok(program)
    }
}

impl Default for PixelProgram {
    fn default() -> Self {
        Self::new(PixelMode::Off)
    }
}
