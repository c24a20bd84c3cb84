//! Addressable pixel engine
//!
//! Each strip runs its own animation mode. The render task draws at most
//! one frame per strip per call and is only registered while some strip is
//! animating: setting a program registers it, the sweeper task removes it
//! once every strip is idle.

pub mod mode;
mod program;
mod strip;

use heapless::Vec;
use rand::{SeedableRng, rngs::SmallRng};

pub use mode::{ModeSlot, PixelMode};
pub use program::PixelProgram;
pub use strip::PixelStrip;

use crate::{OutputDriver, error::Error, run_state::RunState, scheduler::TaskControl};

/// Name of the render task
pub const RENDER_TASK_NAME: &str = "Pixel LED Transitions";

/// Render task interval
pub const RENDER_TASK_INTERVAL_MS: u32 = 1;

/// Name of the task removing the render task when every strip is idle
pub const SWEEPER_TASK_NAME: &str = "Pixel Program Sweeper";

/// Sweeper task interval
pub const SWEEPER_TASK_INTERVAL_MS: u32 = 10_000;

/// Run-states the render task runs in unless configured otherwise
pub const DEFAULT_PIXEL_RUN_STATES: RunState = RunState::INIT
    .union(RunState::STA_DOWN)
    .union(RunState::STA_UP);

/// Pixel engine for up to `STRIPS` strips of at most `LEDS` pixels
pub struct PixelEngine<D: OutputDriver, const STRIPS: usize, const LEDS: usize> {
    strips: Vec<PixelStrip<D, LEDS>, STRIPS>,
    rng: SmallRng,
    run_states: RunState,
}

impl<D: OutputDriver, const STRIPS: usize, const LEDS: usize> PixelEngine<D, STRIPS, LEDS> {
    /// Create an engine without strips
    ///
    /// `seed` initialises the generator used by random colours.
    pub fn new(seed: u64) -> Self {
        Self {
            strips: Vec::new(),
            rng: SmallRng::seed_from_u64(seed),
            run_states: DEFAULT_PIXEL_RUN_STATES,
        }
    }

    /// Set the run-states of the render task
    #[must_use]
    pub fn with_run_states(mut self, run_states: RunState) -> Self {
        self.run_states = run_states;
        self
    }

    /// Add a strip and blank it
    ///
    /// Returns the strip index.
    pub fn add_strip(&mut self, mut strip: PixelStrip<D, LEDS>) -> Result<usize, Error> {
        log::info!("pixel: setting up {} leds:{}", strip.name(), strip.num_leds());
        strip.clear();
        self.strips
            .push(strip)
            .map_err(|_| Error::CapacityExceeded)?;
        Ok(self.strips.len() - 1)
    }

    /// Register the sweeper, and the render task if a strip is animating
    pub fn install<Ctx, T>(&self, tasks: &mut T) -> Result<(), Error>
    where
        Ctx: AsMut<Self>,
        T: TaskControl<Ctx> + ?Sized,
    {
        tasks.register(
            SWEEPER_TASK_NAME,
            RunState::ALL,
            SWEEPER_TASK_INTERVAL_MS,
            sweeper_task::<Ctx, D, STRIPS, LEDS>,
        )?;
        if self.any_enabled() {
            self.ensure_render_task::<Ctx, T>(tasks)?;
        }
        Ok(())
    }

    pub fn strips(&self) -> &[PixelStrip<D, LEDS>] {
        &self.strips
    }

    pub fn strip(&self, index: usize) -> Option<&PixelStrip<D, LEDS>> {
        self.strips.get(index)
    }

    pub fn strip_mut(&mut self, index: usize) -> Option<&mut PixelStrip<D, LEDS>> {
        self.strips.get_mut(index)
    }

    /// Find a strip index by name
    pub fn find(&self, name: &str) -> Option<usize> {
        let found = self.strips.iter().position(|strip| strip.name() == name);
        if found.is_none() {
            log::debug!("pixel: {} not found", name);
        }
        found
    }

    /// Check if any strip is animating
    pub fn any_enabled(&self) -> bool {
        self.strips.iter().any(PixelStrip::is_enabled)
    }

    /// Restart the random generator
    pub fn reseed(&mut self, seed: u64) {
        self.rng = SmallRng::seed_from_u64(seed);
    }

    /// Replace the program of a strip
    ///
    /// Registers the render task before the strip starts animating. The
    /// strip is left untouched when the task table is full.
    pub fn set_program<Ctx, T>(
        &mut self,
        index: usize,
        program: &PixelProgram,
        tasks: &mut T,
    ) -> Result<(), Error>
    where
        Ctx: AsMut<Self>,
        T: TaskControl<Ctx> + ?Sized,
    {
        if index >= self.strips.len() {
            return Err(Error::UnknownTarget);
        }
        if program.mode != PixelMode::Off && !program.colors.is_empty() {
            self.ensure_render_task::<Ctx, T>(tasks)?;
        }
        let strip = self.strips.get_mut(index).ok_or(Error::UnknownTarget)?;
        strip.set_program(program)
    }

    /// Replace the program of a strip, taking the mode by name
    ///
    /// An unknown mode disables and blanks the strip.
    pub fn set_program_named<Ctx, T>(
        &mut self,
        index: usize,
        mode_name: &str,
        program: PixelProgram,
        tasks: &mut T,
    ) -> Result<(), Error>
    where
        Ctx: AsMut<Self>,
        T: TaskControl<Ctx> + ?Sized,
    {
        let Some(mode) = PixelMode::parse_from_str(mode_name) else {
            let strip = self.strips.get_mut(index).ok_or(Error::UnknownTarget)?;
            log::error!("pixel: {} unknown mode {}", strip.name(), mode_name);
            strip.disable();
            return Err(Error::UnknownMode);
        };
        self.set_program(index, &program.with_mode(mode), tasks)
    }

    /// Render one frame on every due strip
    pub fn render(&mut self, now: u32) {
        for strip in &mut self.strips {
            strip.render(now, &mut self.rng);
        }
    }

    fn ensure_render_task<Ctx, T>(&self, tasks: &mut T) -> Result<(), Error>
    where
        Ctx: AsMut<Self>,
        T: TaskControl<Ctx> + ?Sized,
    {
        if tasks.is_registered(RENDER_TASK_NAME) {
            return Ok(());
        }
        log::info!("pixel: starting render task");
        tasks.register(
            RENDER_TASK_NAME,
            self.run_states,
            RENDER_TASK_INTERVAL_MS,
            render_task::<Ctx, D, STRIPS, LEDS>,
        )
    }
}

/// Scheduler task rendering the pixel engine
pub fn render_task<Ctx, D, const STRIPS: usize, const LEDS: usize>(
    ctx: &mut Ctx,
    tasks: &mut dyn TaskControl<Ctx>,
) where
    Ctx: AsMut<PixelEngine<D, STRIPS, LEDS>>,
    D: OutputDriver,
{
    let now = tasks.now_ms();
    ctx.as_mut().render(now);
}

/// Scheduler task removing the render task once every strip is idle
pub fn sweeper_task<Ctx, D, const STRIPS: usize, const LEDS: usize>(
    ctx: &mut Ctx,
    tasks: &mut dyn TaskControl<Ctx>,
) where
    Ctx: AsMut<PixelEngine<D, STRIPS, LEDS>>,
    D: OutputDriver,
{
    if ctx.as_mut().any_enabled() || !tasks.is_registered(RENDER_TASK_NAME) {
        return;
    }
    log::info!("pixel: no active programs, stopping render task");
    tasks.unregister(RENDER_TASK_NAME);
}
