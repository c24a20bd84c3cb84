use heapless::String;
use rand::Rng;

use super::program::{RgbProgram, RgbStep};
use crate::{
    MAX_NAME_LEN, PwmOutput,
    clock::elapsed_ms,
    color::MAX_COLOR,
    error::Error,
    gamma::cie1931,
};

/// PWM pin assignment of one channel, any pin may be absent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RgbPins {
    pub red: Option<u8>,
    pub green: Option<u8>,
    pub blue: Option<u8>,
}

impl RgbPins {
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self {
            red: Some(red),
            green: Some(green),
            blue: Some(blue),
        }
    }

    /// Single dimmable output, driven by the blue octet
    pub const fn single(pin: u8) -> Self {
        Self {
            red: None,
            green: None,
            blue: Some(pin),
        }
    }

    const fn as_array(self) -> [Option<u8>; 3] {
        [self.red, self.green, self.blue]
    }
}

/// Convert a `0xBBRRGGBB` colour into PWM duties
///
/// A non-zero top octet scales the three channels before the CIE-1931
/// mapping.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn color_to_pwm(color: u32) -> [u16; 3] {
    let brightness = (color >> 24) as u8;
    let mut channels = [(color >> 16) as u8, (color >> 8) as u8, color as u8];

    if brightness > 0 {
        let factor = f32::from(brightness) / 255.0;
        for channel in &mut channels {
            *channel = (f32::from(*channel) * factor) as u8;
        }
    }

    channels.map(cie1931)
}

/// One three-channel PWM output running a fade program
#[derive(Debug, Clone)]
pub struct RgbChannel {
    name: String<MAX_NAME_LEN>,
    pins: RgbPins,
    program: RgbProgram,
    index: Option<usize>,
    current: [u16; 3],
    desired: [u16; 3],
    last_shift_ms: u32,
    enabled: bool,
    single_step: bool,
    init_interval_s: u32,
}

impl RgbChannel {
    /// Create a channel with an empty program
    pub fn new(name: &str, pins: RgbPins) -> Result<Self, Error> {
        let mut owned = String::new();
        owned.push_str(name).map_err(|()| Error::NameTooLong)?;
        Ok(Self {
            name: owned,
            pins,
            program: RgbProgram::new(),
            index: None,
            current: [0; 3],
            desired: [0; 3],
            last_shift_ms: 0,
            enabled: false,
            single_step: false,
            init_interval_s: 0,
        })
    }

    /// Set the boot program
    #[must_use]
    pub fn with_program(mut self, program: RgbProgram) -> Self {
        self.enabled = !program.is_empty();
        self.single_step = program.is_static();
        self.program = program;
        self
    }

    /// Ignore external program changes for the first `secs` seconds
    #[must_use]
    pub const fn with_init_interval(mut self, secs: u32) -> Self {
        self.init_interval_s = secs;
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub const fn pins(&self) -> RgbPins {
        self.pins
    }

    pub fn program(&self) -> &RgbProgram {
        &self.program
    }

    /// Active step, `None` before the first transition
    pub const fn step_index(&self) -> Option<usize> {
        self.index
    }

    pub const fn current_pwm(&self) -> [u16; 3] {
        self.current
    }

    pub const fn desired_pwm(&self) -> [u16; 3] {
        self.desired
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub const fn is_static(&self) -> bool {
        self.single_step
    }

    /// Check if external program changes are still locked
    pub fn is_locked(&self, now: u32) -> bool {
        u64::from(now) < u64::from(self.init_interval_s) * 1000
    }

    /// Replace the program on request from a collaborator
    pub(crate) fn set_program<P: PwmOutput>(
        &mut self,
        program: &RgbProgram,
        now: u32,
        pwm: &mut P,
    ) -> Result<(), Error> {
        if self.init_interval_s > 0 {
            if self.is_locked(now) {
                log::warn!(
                    "rgb: {} ignoring program during initial interval ({}s)",
                    self.name,
                    self.init_interval_s
                );
                return Err(Error::ProgramLocked);
            }
            log::info!("rgb: {} initial interval elapsed", self.name);
            self.init_interval_s = 0;
        }

        self.install(program, pwm)
    }

    /// Replace the program, bypassing the initial interval
    pub(crate) fn install<P: PwmOutput>(
        &mut self,
        program: &RgbProgram,
        pwm: &mut P,
    ) -> Result<(), Error> {
        if program.is_empty() {
            log::error!("rgb: {} rejected empty program", self.name);
            self.enabled = false;
            return Err(Error::EmptyProgram);
        }

        self.current = [0; 3];
        self.desired = [0; 3];
        self.write(pwm);

        self.program = program.clone();
        self.index = None;
        self.last_shift_ms = 0;
        self.single_step = program.is_static();
        self.enabled = true;

        log::info!(
            "rgb: {} program set, {} steps{}",
            self.name,
            program.len(),
            if self.single_step { " (static)" } else { "" }
        );
        Ok(())
    }

    /// Advance the program by at most one fade unit or one step
    pub(crate) fn transition<P: PwmOutput, R: Rng>(&mut self, now: u32, pwm: &mut P, rng: &mut R) {
        if !self.enabled || self.program.is_empty() {
            return;
        }

        let Some(step) = self.current_step() else {
            self.advance(now, pwm, rng);
            return;
        };

        if self.current == self.desired {
            if self.single_step {
                return;
            }
            let pause = u32::from(step.pause_ms);
            if pause > 0 && elapsed_ms(now, self.last_shift_ms) < pause {
                return;
            }
            self.advance(now, pwm, rng);
            return;
        }

        let fade_delay = u32::from(step.fade_delay_ms);
        if fade_delay > 0 && elapsed_ms(now, self.last_shift_ms) < fade_delay {
            return;
        }
        self.last_shift_ms = now;

        if fade_delay == 0 {
            self.current = self.desired;
        } else {
            for (current, desired) in self.current.iter_mut().zip(self.desired) {
                if *current < desired {
                    *current += 1;
                } else if *current > desired {
                    *current -= 1;
                }
            }
        }
        self.write(pwm);
    }

    fn current_step(&self) -> Option<RgbStep> {
        self.index.and_then(|index| self.program.steps().get(index)).copied()
    }

    fn advance<P: PwmOutput, R: Rng>(&mut self, now: u32, pwm: &mut P, rng: &mut R) {
        let index = self.index.map_or(0, |index| (index + 1) % self.program.len());
        let Some(step) = self.program.steps().get(index).copied() else {
            return;
        };
        self.index = Some(index);
        self.last_shift_ms = now;

        let color = if step.random {
            rng.gen_range(0..=MAX_COLOR)
        } else {
            step.color
        };
        self.desired = color_to_pwm(color);

        log::debug!(
            "rgb: {} step[{}] colour:0x{:08X} fade:{} pause:{} -> {:?}",
            self.name,
            index,
            color,
            step.fade_delay_ms,
            step.pause_ms,
            self.desired
        );

        if step.fade_delay_ms == 0 && self.current != self.desired {
            self.current = self.desired;
            self.write(pwm);
        }
    }

    pub(crate) fn write<P: PwmOutput>(&self, pwm: &mut P) {
        for (pin, duty) in self.pins.as_array().into_iter().zip(self.current) {
            if let Some(pin) = pin {
                pwm.set_duty(pin, duty);
            }
        }
    }
}
