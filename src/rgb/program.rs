//! Fade programs
//!
//! Text form: `colour;fade_delay;pause,colour;fade_delay;pause,...`.
//! Steps are comma separated, fields within a step are semicolon
//! separated, and missing trailing fields read as zero.

use heapless::Vec;

use crate::{
    MAX_RGB_STEPS,
    color::{ColorToken, parse_color, parse_number},
    error::Error,
};

/// One step of a fade program
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RgbStep {
    /// `0xBBRRGGBB`, the top octet is an optional brightness (0 = full)
    pub color: u32,
    /// Milliseconds between single-unit PWM shifts, 0 switches instantly
    pub fade_delay_ms: u16,
    /// Milliseconds to hold once the colour is reached
    pub pause_ms: u16,
    /// Draw a fresh colour every time the step activates
    pub random: bool,
}

impl RgbStep {
    /// Step with a fixed colour and no fade or pause
    pub const fn color(color: u32) -> Self {
        Self {
            color,
            fade_delay_ms: 0,
            pause_ms: 0,
            random: false,
        }
    }

    /// Step that picks a random colour
    pub const fn random() -> Self {
        Self {
            color: 0,
            fade_delay_ms: 0,
            pause_ms: 0,
            random: true,
        }
    }

    /// Set the fade delay
    #[must_use]
    pub const fn with_fade_delay(mut self, fade_delay_ms: u16) -> Self {
        self.fade_delay_ms = fade_delay_ms;
        self
    }

    /// Set the pause
    #[must_use]
    pub const fn with_pause(mut self, pause_ms: u16) -> Self {
        self.pause_ms = pause_ms;
        self
    }

    fn parse(text: &str) -> Result<Self, Error> {
        let mut fields = text.split(';');
        let color = parse_color(fields.next().unwrap_or_default())?;
        let fade_delay_ms = parse_number(fields.next())?;
        let pause_ms = parse_number(fields.next())?;

        let step = match color {
            ColorToken::Value(color) => Self::color(color),
            ColorToken::Random => Self::random(),
        };
        Ok(step.with_fade_delay(fade_delay_ms).with_pause(pause_ms))
    }
}

/// Ordered list of fade steps
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RgbProgram {
    steps: Vec<RgbStep, MAX_RGB_STEPS>,
}

impl RgbProgram {
    /// Create an empty program
    pub const fn new() -> Self {
        Self { steps: Vec::new() }
    }

    /// Create a program from a list of steps
    pub fn from_steps(steps: &[RgbStep]) -> Result<Self, Error> {
        let steps = Vec::from_slice(steps).map_err(|()| Error::ProgramTooLong)?;
        Ok(Self { steps })
    }

    /// Parse the text form
    ///
    /// An empty (or blank) string yields an empty program.
    pub fn parse(text: &str) -> Result<Self, Error> {
        let mut program = Self::new();
        let text = text.trim();
        if text.is_empty() {
            return Ok(program);
        }
        for step in text.split(',') {
            program.push(RgbStep::parse(step)?)?;
        }
        Ok(program)
    }

    /// Append a step
    pub fn push(&mut self, step: RgbStep) -> Result<(), Error> {
        self.steps.push(step).map_err(|_| Error::ProgramTooLong)
    }

    pub fn steps(&self) -> &[RgbStep] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// A single fixed-colour step: the engine stops once it is reached
    pub fn is_static(&self) -> bool {
        matches!(self.steps.as_slice(), [step] if !step.random)
    }
}
