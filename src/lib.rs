#![cfg_attr(not(test), no_std)]

//! ILI9341 Display Driver
//!
//! ### Usage
//!
//! To control the display you need to set up:
//!
//! * Interface for communicating with display ([SpiInterface] over an
//!   `embedded-hal` SPI bus, or your own [Interface] implementation)
//! * Reset pin (optional), delay and bus frequency for [Ili9341::begin]
//!
//! ```ignore
//! let iface = SpiInterface::new(spi_bus, cs, dc);
//!
//! let mut display = Ili9341::new(iface, Some(reset_gpio));
//! display.begin(&mut delay, 40_000_000).unwrap();
//! display.set_rotation(1).unwrap();
//!
//! display.clear(Rgb565::RED).unwrap()
//! ```
//!
//! Without a reset line, pass `None` (or use [Ili9341::new_without_reset])
//! and [Ili9341::begin] falls back to a software reset.
use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::SpiBus;

mod command;
#[cfg(feature = "graphics")]
mod graphics;
pub mod init;
mod interface;
#[cfg(test)]
mod mock;
mod spi;

pub use crate::command::Command;
pub use crate::interface::Interface;
pub use crate::spi::SpiInterface;
pub use display_interface::DisplayError;

use crate::command::{MADCTL_BGR, MADCTL_MV, MADCTL_MX, MADCTL_MY, READ_INDEX_BASE};

type Result<T = (), E = DisplayError> = core::result::Result<T, E>;

/// Trait that defines display size information
pub trait DisplaySize {
    /// Width in pixels
    const WIDTH: usize;
    /// Height in pixels
    const HEIGHT: usize;
}

/// Native panel size of the ILI9341, 240x320 pixels in portrait
pub struct DisplaySize240x320;

impl DisplaySize for DisplaySize240x320 {
    const WIDTH: usize = 240;
    const HEIGHT: usize = 320;
}

/// Display orientation, numbered 0 to 3 clockwise from portrait
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Rotation {
    Portrait = 0,
    Landscape = 1,
    PortraitFlipped = 2,
    LandscapeFlipped = 3,
}

impl Rotation {
    /// Any value is accepted, only `value % 4` matters
    pub fn from_index(value: u8) -> Self {
        match value % 4 {
            0 => Self::Portrait,
            1 => Self::Landscape,
            2 => Self::PortraitFlipped,
            _ => Self::LandscapeFlipped,
        }
    }

    /// Memory access control register value for this orientation
    pub fn madctl(self) -> u8 {
        match self {
            Self::Portrait => MADCTL_MX | MADCTL_BGR,
            Self::Landscape => MADCTL_MV | MADCTL_BGR,
            Self::PortraitFlipped => MADCTL_MY | MADCTL_BGR,
            Self::LandscapeFlipped => MADCTL_MX | MADCTL_MY | MADCTL_MV | MADCTL_BGR,
        }
    }

    /// True for the two orientations that swap width and height
    pub fn is_landscape(self) -> bool {
        match self {
            Self::Landscape | Self::LandscapeFlipped => true,
            Self::Portrait | Self::PortraitFlipped => false,
        }
    }
}

/// Specify state of specific mode of operation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ModeState {
    On,
    Off,
}

/// Reset pin type for boards without a wired reset line.
///
/// Only names the `RESET` parameter of a driver built without a pin, see
/// [Ili9341::new_without_reset]. Whether [Ili9341::begin] resets in software
/// depends on the `Option` handed to the constructor, not on this type.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoResetPin;

impl digital::ErrorType for NoResetPin {
    type Error = Infallible;
}

impl OutputPin for NoResetPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        Ok(())
    }
}

/// ILI9341 driver, generic over its transport and reset line.
///
/// The pixel format programmed by [Ili9341::begin] is 16 bpp (RGB565).
///
/// The hardware makes it efficient to draw rectangles on the screen.
///
/// What happens is the following:
///
/// - A drawing window is prepared with [Ili9341::set_addr_window]
/// - The starting point for drawing is the top left corner of this window
/// - Every pair of bytes received is intepreted as a pixel value in rgb565
/// - As soon as a pixel is received, an internal counter is incremented,
///   and the next word will fill the next pixel (the adjacent on the right, or
///   the first of the next row if the row ended)
pub struct Ili9341<IFACE, RESET> {
    interface: IFACE,
    reset: Option<RESET>,
    width: usize,
    height: usize,
    rotation: Rotation,
}

impl<IFACE, RESET> Ili9341<IFACE, RESET>
where
    IFACE: Interface,
    RESET: OutputPin,
{
    /// Driver over `interface`. With `reset` set to `None`, [Ili9341::begin]
    /// resets the controller in software. No bus traffic happens until
    /// [Ili9341::begin].
    pub fn new(interface: IFACE, reset: Option<RESET>) -> Self {
        Self {
            interface,
            reset,
            width: DisplaySize240x320::WIDTH,
            height: DisplaySize240x320::HEIGHT,
            rotation: Rotation::Portrait,
        }
    }

    /// Bring the controller up: reset it, then play [init::INIT_SEQUENCE].
    ///
    /// `frequency_hz` is handed to [Interface::configure].
    pub fn begin<DELAY>(&mut self, delay: &mut DELAY, frequency_hz: u32) -> Result
    where
        DELAY: DelayNs,
    {
        self.interface.configure(frequency_hz)?;

        if self.reset.is_some() {
            self.hardware_reset(delay)?;
        } else {
            #[cfg(feature = "defmt")]
            defmt::debug!("ili9341: no reset pin, software reset");
            self.transaction(|iface| iface.write_command(Command::SoftwareReset as u8))?;
            delay.delay_ms(init::SOFTWARE_RESET_DELAY_MS);

            self.transaction(|iface| iface.write_command(Command::SleepModeOff as u8))?;
            delay.delay_ms(init::SLEEP_OUT_DELAY_MS);
        }

        self.transaction(|iface| init::run_sequence(iface, delay, init::INIT_SEQUENCE))?;

        // The table leaves MADCTL at rotation 0
        self.width = DisplaySize240x320::WIDTH;
        self.height = DisplaySize240x320::HEIGHT;
        self.rotation = Rotation::Portrait;

        #[cfg(feature = "defmt")]
        defmt::debug!("ili9341: initialized");
        Ok(())
    }

    fn hardware_reset<DELAY: DelayNs>(&mut self, delay: &mut DELAY) -> Result {
        let Some(reset) = self.reset.as_mut() else {
            return Ok(());
        };
        #[cfg(feature = "defmt")]
        defmt::debug!("ili9341: hardware reset");

        reset.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(init::HARDWARE_RESET_HIGH_MS);

        // Do hardware reset by holding reset low
        reset.set_low().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(init::HARDWARE_RESET_LOW_MS);

        // Set high for normal operation
        reset.set_high().map_err(|_| DisplayError::RSError)?;
        delay.delay_ms(init::HARDWARE_RESET_RECOVERY_MS);
        Ok(())
    }
}

impl<IFACE> Ili9341<IFACE, NoResetPin>
where
    IFACE: Interface,
{
    /// Driver for a board without a reset line; [Ili9341::begin] resets the
    /// controller in software instead.
    pub fn new_without_reset(interface: IFACE) -> Self {
        Self::new(interface, None)
    }
}

impl<SPI, CS, DC, RESET> Ili9341<SpiInterface<SPI, CS, DC>, RESET>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
    RESET: OutputPin,
{
    /// Build the SPI transport from a bus and its chip-select and
    /// data/command pins. `None` for `reset` selects the software reset.
    pub fn with_pins(spi: SPI, cs: CS, dc: DC, reset: Option<RESET>) -> Self {
        Self::new(SpiInterface::new(spi, cs, dc), reset)
    }
}

impl<SPI, CS, DC> Ili9341<SpiInterface<SPI, CS, DC>, NoResetPin>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    /// [Ili9341::with_pins] for a board without a reset line
    pub fn with_pins_without_reset(spi: SPI, cs: CS, dc: DC) -> Self {
        Self::with_pins(spi, cs, dc, None)
    }
}

impl<IFACE, RESET> Ili9341<IFACE, RESET>
where
    IFACE: Interface,
{
    /// Run `f` inside one bus transaction. The transaction is closed even if
    /// `f` fails; the first error is returned.
    fn transaction<T, F>(&mut self, f: F) -> Result<T>
    where
        F: FnOnce(&mut IFACE) -> Result<T>,
    {
        self.interface.begin_transaction()?;
        let result = f(&mut self.interface);
        let ended = self.interface.end_transaction();
        let value = result?;
        ended?;
        Ok(value)
    }

    fn command(&mut self, cmd: Command, args: &[u8]) -> Result {
        #[cfg(feature = "defmt")]
        defmt::trace!("ili9341: {} {=[u8]:#x}", cmd, args);
        self.transaction(|iface| {
            iface.write_command(cmd as u8)?;
            iface.write_bytes(args)
        })
    }

    /// Change the orientation of the screen. Only `value % 4` is used.
    pub fn set_rotation(&mut self, value: u8) -> Result {
        self.set_orientation(Rotation::from_index(value))
    }

    /// Change the orientation of the screen
    pub fn set_orientation(&mut self, rotation: Rotation) -> Result {
        if rotation.is_landscape() {
            self.width = DisplaySize240x320::HEIGHT;
            self.height = DisplaySize240x320::WIDTH;
        } else {
            self.width = DisplaySize240x320::WIDTH;
            self.height = DisplaySize240x320::HEIGHT;
        }
        self.rotation = rotation;

        self.command(Command::MemoryAccessControl, &[rotation.madctl()])
    }

    /// Invert the pixel color on screen
    pub fn invert_display(&mut self, invert: bool) -> Result {
        let cmd = if invert {
            Command::InvertOn
        } else {
            Command::InvertOff
        };
        self.command(cmd, &[])
    }

    /// Set the first line shown at the top of the scroll area.
    ///
    /// Values past the panel height are left to the controller.
    pub fn scroll_to(&mut self, y: u16) -> Result {
        self.transaction(|iface| {
            iface.write_command(Command::VerticalScrollAddr as u8)?;
            iface.write16(y)
        })
    }

    /// Select the `w` x `h` rectangle at (`x1`, `y1`) and start a memory write.
    ///
    /// Pixels written with [Ili9341::write_pixels] afterwards fill the
    /// rectangle row by row. This does not open a transaction: wrap the
    /// call and the pixel data with [Ili9341::start_write] and
    /// [Ili9341::end_write]. The caller keeps the window on 16 bits.
    pub fn set_addr_window(&mut self, x1: u16, y1: u16, w: u16, h: u16) -> Result {
        let x2 = x1.wrapping_add(w).wrapping_sub(1);
        let y2 = y1.wrapping_add(h).wrapping_sub(1);

        self.interface
            .write_command(Command::ColumnAddressSet as u8)?;
        self.interface.write16(x1)?;
        self.interface.write16(x2)?;
        self.interface.write_command(Command::PageAddressSet as u8)?;
        self.interface.write16(y1)?;
        self.interface.write16(y2)?;
        self.interface.write_command(Command::MemoryWrite as u8)
    }

    /// Acquire the bus for a run of [Ili9341::set_addr_window] and
    /// [Ili9341::write_pixels] calls
    pub fn start_write(&mut self) -> Result {
        self.interface.begin_transaction()
    }

    /// Release the bus acquired by [Ili9341::start_write]
    pub fn end_write(&mut self) -> Result {
        self.interface.end_transaction()
    }

    /// Stream rgb565 words into the current window
    pub fn write_pixels<I: IntoIterator<Item = u16>>(&mut self, data: I) -> Result {
        data.into_iter()
            .try_for_each(|word| self.interface.write16(word))
    }

    /// Draw a `w` x `h` rectangle at (`x`, `y`) from an iterator of rgb565
    /// words, in one transaction.
    ///
    /// The iterator is useful to avoid wasting memory by holding a buffer for
    /// the whole screen when it is not necessary.
    pub fn draw_raw_iter<I: IntoIterator<Item = u16>>(
        &mut self,
        x: u16,
        y: u16,
        w: u16,
        h: u16,
        data: I,
    ) -> Result {
        self.start_write()?;
        let result = self
            .set_addr_window(x, y, w, h)
            .and_then(|()| self.write_pixels(data));
        let ended = self.end_write();
        result?;
        ended
    }

    /// Read one byte of register `command`, parameter `index`.
    ///
    /// Uses the controller's undocumented read-mode register, so `index`
    /// selects which returned parameter byte is clocked out.
    pub fn read_command(&mut self, command: u8, index: u8) -> Result<u8> {
        self.transaction(|iface| {
            iface.write_command(Command::ReadModeEnable as u8)?;
            iface.write_byte(READ_INDEX_BASE.wrapping_add(index))?;
            iface.write_command(command)?;
            iface.read_byte()
        })
    }

    /// Control the screen sleep mode
    pub fn sleep_mode(&mut self, mode: ModeState) -> Result {
        match mode {
            ModeState::On => self.command(Command::SleepModeOn, &[]),
            ModeState::Off => self.command(Command::SleepModeOff, &[]),
        }
    }

    /// Control the screen display mode
    pub fn display_mode(&mut self, mode: ModeState) -> Result {
        match mode {
            ModeState::On => self.command(Command::DisplayOn, &[]),
            ModeState::Off => self.command(Command::DisplayOff, &[]),
        }
    }
}

impl<IFACE, RESET> Ili9341<IFACE, RESET> {
    /// Get the current screen width. It can change based on the current orientation
    pub fn width(&self) -> usize {
        self.width
    }

    /// Get the current screen height. It can change based on the current orientation
    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the orientation last written to the controller
    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    /// Consumes the ILI9341, gives back the interface and reset peripherals
    pub fn release(self) -> (IFACE, Option<RESET>) {
        (self.interface, self.reset)
    }
}
