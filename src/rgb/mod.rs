//! PWM fade engine
//!
//! Drives one or more three-channel PWM outputs through multi-step colour
//! programs. Every call of the fade task moves each channel by at most one
//! PWM unit (or one program step), so a 1 ms task cadence gives smooth
//! fades without blocking other tasks.

mod channel;
mod presets;
mod program;

use heapless::Vec;
use rand::{SeedableRng, rngs::SmallRng};

pub use channel::{RgbChannel, RgbPins, color_to_pwm};
pub use presets::{PRESET_COUNT, preset};
pub use program::{RgbProgram, RgbStep};

use crate::{
    PwmOutput,
    error::Error,
    run_state::RunState,
    scheduler::TaskControl,
};

/// Name of the fade task
pub const FADE_TASK_NAME: &str = "PWM LED Transitions";

/// Fade task interval
pub const FADE_TASK_INTERVAL_MS: u32 = 1;

/// Run-states the fade task runs in unless configured otherwise
///
/// Includes INIT so LEDs animate while the device is still choosing its
/// network mode.
pub const DEFAULT_RGB_RUN_STATES: RunState = RunState::INIT
    .union(RunState::STA_DOWN)
    .union(RunState::STA_UP);

/// Fade engine for up to `CHANNELS` outputs
pub struct RgbEngine<P: PwmOutput, const CHANNELS: usize> {
    pwm: P,
    channels: Vec<RgbChannel, CHANNELS>,
    rng: SmallRng,
    run_states: RunState,
    preset: usize,
}

impl<P: PwmOutput, const CHANNELS: usize> RgbEngine<P, CHANNELS> {
    /// Create an engine without channels
    ///
    /// `seed` initialises the generator used by random steps.
    pub fn new(pwm: P, seed: u64) -> Self {
        Self {
            pwm,
            channels: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            run_states: DEFAULT_RGB_RUN_STATES,
            preset: 0,
        }
    }

    /// Set the run-states of the fade task
    #[must_use]
    pub fn with_run_states(mut self, run_states: RunState) -> Self {
        self.run_states = run_states;
        self
    }

    /// Add a channel and drive its pins low
    ///
    /// Returns the channel index.
    pub fn add_channel(&mut self, channel: RgbChannel) -> Result<usize, Error> {
        log::info!(
            "rgb: setting up {} pins:{:?} steps:{}",
            channel.name(),
            channel.pins(),
            channel.program().len()
        );
        self.channels
            .push(channel)
            .map_err(|_| Error::CapacityExceeded)?;
        let index = self.channels.len() - 1;
        if let Some(channel) = self.channels.get(index) {
            channel.write(&mut self.pwm);
        }
        Ok(index)
    }

    /// Register the fade task when there is at least one channel
    pub fn install<Ctx, T>(&self, tasks: &mut T) -> Result<(), Error>
    where
        Ctx: AsMut<Self>,
        T: TaskControl<Ctx> + ?Sized,
    {
        if self.channels.is_empty() {
            return Ok(());
        }
        tasks.register(
            FADE_TASK_NAME,
            self.run_states,
            FADE_TASK_INTERVAL_MS,
            fade_task::<Ctx, P, CHANNELS>,
        )
    }

    pub fn channels(&self) -> &[RgbChannel] {
        &self.channels
    }

    pub fn channel(&self, index: usize) -> Option<&RgbChannel> {
        self.channels.get(index)
    }

    /// Find a channel index by name
    pub fn find(&self, name: &str) -> Option<usize> {
        let found = self.channels.iter().position(|channel| channel.name() == name);
        if found.is_none() {
            log::debug!("rgb: {} not found", name);
        }
        found
    }

    /// Get a reference to the PWM output
    pub fn pwm(&self) -> &P {
        &self.pwm
    }

    /// Check if any channel runs a program
    pub fn any_enabled(&self) -> bool {
        self.channels.iter().any(RgbChannel::is_enabled)
    }

    /// Replace the program of a channel
    ///
    /// Rejected while the channel's initial interval is open.
    pub fn set_program(
        &mut self,
        index: usize,
        program: &RgbProgram,
        now: u32,
    ) -> Result<(), Error> {
        let channel = self.channels.get_mut(index).ok_or(Error::UnknownTarget)?;
        channel.set_program(program, now, &mut self.pwm)
    }

    /// Switch a channel to the next built-in demo program
    pub fn cycle_preset(&mut self, index: usize, now: u32) -> Result<(), Error> {
        let program = preset(self.preset)?;
        log::info!("rgb: preset variant {}", self.preset);
        self.set_program(index, &program, now)?;
        self.preset = (self.preset + 1) % PRESET_COUNT;
        Ok(())
    }

    /// Advance every channel by one transition step
    pub fn transition(&mut self, now: u32) {
        for channel in &mut self.channels {
            channel.transition(now, &mut self.pwm, &mut self.rng);
        }
    }
}

/// Scheduler task driving the fade engine
pub fn fade_task<Ctx, P, const CHANNELS: usize>(ctx: &mut Ctx, tasks: &mut dyn TaskControl<Ctx>)
where
    Ctx: AsMut<RgbEngine<P, CHANNELS>>,
    P: PwmOutput,
{
    let now = tasks.now_ms();
    ctx.as_mut().transition(now);
}
