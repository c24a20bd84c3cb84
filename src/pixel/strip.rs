use heapless::{String, Vec};
use rand::rngs::SmallRng;

use super::{
    mode::{Canvas, Cursor, ModeSlot, PixelMode},
    program::PixelProgram,
};
use crate::{
    MAX_NAME_LEN, MAX_PIXEL_COLORS, OutputDriver,
    clock::elapsed_ms,
    color::{BLACK, Rgb},
    error::Error,
    math8::scale8,
};

/// One addressable strip with its driver and pixel buffer
///
/// The buffer keeps full-scale colours, brightness is applied to the frame
/// handed to the driver.
pub struct PixelStrip<D: OutputDriver, const LEDS: usize> {
    name: String<MAX_NAME_LEN>,
    driver: D,
    num_leds: u16,
    buffer: [Rgb; LEDS],
    mode: PixelMode,
    slot: ModeSlot,
    brightness: u8,
    wipe: bool,
    fill: bool,
    append: bool,
    delay_ms: u16,
    toggle: u16,
    cursor: Cursor,
    program: Vec<u32, MAX_PIXEL_COLORS>,
    last_frame_ms: u32,
    enabled: bool,
}

impl<D: OutputDriver, const LEDS: usize> PixelStrip<D, LEDS> {
    /// Create an idle strip of `num_leds` pixels, at most `LEDS`
    pub fn new(name: &str, num_leds: usize, driver: D) -> Result<Self, Error> {
        if num_leds == 0 || num_leds > LEDS {
            return Err(Error::InvalidLength);
        }
        let num_leds = u16::try_from(num_leds).map_err(|_| Error::InvalidLength)?;
        let mut owned = String::new();
        owned.push_str(name).map_err(|()| Error::NameTooLong)?;

        Ok(Self {
            name: owned,
            driver,
            num_leds,
            buffer: [BLACK; LEDS],
            mode: PixelMode::Off,
            slot: ModeSlot::Off,
            brightness: u8::MAX,
            wipe: false,
            fill: false,
            append: false,
            delay_ms: 0,
            toggle: 0,
            cursor: Cursor::default(),
            program: Vec::new(),
            last_frame_ms: 0,
            enabled: false,
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn driver(&self) -> &D {
        &self.driver
    }

    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    pub const fn num_leds(&self) -> usize {
        self.num_leds as usize
    }

    pub const fn mode(&self) -> PixelMode {
        self.mode
    }

    pub const fn brightness(&self) -> u8 {
        self.brightness
    }

    pub const fn cursor(&self) -> Cursor {
        self.cursor
    }

    pub fn program(&self) -> &[u32] {
        &self.program
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Full-scale pixel colours of the last frame
    pub fn pixels(&self) -> &[Rgb] {
        &self.buffer[..self.num_leds()]
    }

    /// Replace the program
    ///
    /// The strip is blanked first. `off` leaves it disabled. A rejected
    /// program only disables the strip, the previous program is kept.
    pub(crate) fn set_program(&mut self, program: &PixelProgram) -> Result<(), Error> {
        if program.mode != PixelMode::Off && program.colors.is_empty() {
            self.enabled = false;
            log::error!("pixel: {} rejected empty program", self.name);
            return Err(Error::EmptyProgram);
        }

        self.clear();
        self.program.clear();
        self.mode = program.mode;
        self.slot = ModeSlot::Off;

        if program.mode == PixelMode::Off {
            self.enabled = false;
            log::info!("pixel: {} off", self.name);
            return Ok(());
        }

        self.program.clone_from(&program.colors);
        self.wipe = program.wipe;
        self.fill = program.fill;
        self.append = program.append;
        self.delay_ms = program.delay_ms;
        self.toggle = program.toggle;
        self.brightness = program.brightness;
        self.cursor = Cursor::new(program.offset);
        self.slot = program.mode.to_slot();
        self.last_frame_ms = 0;
        self.enabled = true;

        log::info!(
            "pixel: {} mode:{} colours:{} offset:{} delay:{} toggle:{} brightness:{}",
            self.name,
            self.mode.as_str(),
            self.program.len(),
            program.offset,
            self.delay_ms,
            self.toggle,
            self.brightness
        );
        Ok(())
    }

    /// Stop animating and blank the strip
    pub(crate) fn disable(&mut self) {
        self.enabled = false;
        self.mode = PixelMode::Off;
        self.slot = ModeSlot::Off;
        self.program.clear();
        self.clear();
    }

    /// Blank the buffer and the hardware
    pub(crate) fn clear(&mut self) {
        self.buffer.fill(BLACK);
        self.commit();
    }

    /// Draw and show one frame if the strip is due
    pub(crate) fn render(&mut self, now: u32, rng: &mut SmallRng) {
        if !self.enabled {
            return;
        }
        let delay = u32::from(self.delay_ms);
        if delay > 0 && elapsed_ms(now, self.last_frame_ms) < delay {
            return;
        }

        let num_leds = self.num_leds();
        let mut canvas = Canvas {
            leds: &mut self.buffer[..num_leds],
            program: &self.program,
            cursor: &mut self.cursor,
            rng,
            wipe: self.wipe,
            fill: self.fill,
            append: self.append,
            toggle: self.toggle,
        };
        self.slot.render(&mut canvas);

        self.commit();
        self.last_frame_ms = now;
    }

    fn commit(&mut self) {
        let num_leds = self.num_leds();
        let mut frame = [BLACK; LEDS];
        for (out, pixel) in frame.iter_mut().zip(&self.buffer[..num_leds]) {
            *out = Rgb {
                r: scale8(pixel.r, self.brightness),
                g: scale8(pixel.g, self.brightness),
                b: scale8(pixel.b, self.brightness),
            };
        }
        self.driver.write(&frame[..num_leds]);
    }
}
