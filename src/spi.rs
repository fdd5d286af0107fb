//! 4-wire SPI transport
//!
//! The controller latches a byte as a command while D/C is low and as data
//! while it is high. CS stays asserted for a whole transaction so that a
//! command and the byte read back after it belong to the same frame.

use embedded_hal::digital::OutputPin;
use embedded_hal::spi::SpiBus;

use crate::interface::Interface;
use crate::{DisplayError, Result};

/// [`Interface`] over an [`SpiBus`] with explicit chip-select and
/// data/command pins.
///
/// `SpiBus` is implemented for `&mut BUS`, so passing a borrowed bus keeps it
/// available to other devices once the display is released:
///
/// ```ignore
/// let iface = SpiInterface::new(&mut spi_bus, cs, dc);
/// ```
pub struct SpiInterface<SPI, CS, DC> {
    spi: SPI,
    cs: CS,
    dc: DC,
}

impl<SPI, CS, DC> SpiInterface<SPI, CS, DC>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    pub fn new(spi: SPI, cs: CS, dc: DC) -> Self {
        Self { spi, cs, dc }
    }

    /// Consumes the interface, gives back the bus and pins
    pub fn release(self) -> (SPI, CS, DC) {
        (self.spi, self.cs, self.dc)
    }

    fn flush(&mut self) -> Result {
        self.spi.flush().map_err(|_| DisplayError::BusWriteError)
    }
}

impl<SPI, CS, DC> Interface for SpiInterface<SPI, CS, DC>
where
    SPI: SpiBus,
    CS: OutputPin,
    DC: OutputPin,
{
    fn configure(&mut self, _frequency_hz: u32) -> Result {
        // The clock of an SpiBus is set by the HAL when the bus is built.
        #[cfg(feature = "defmt")]
        defmt::debug!("ili9341: bus clock requested {=u32} Hz", _frequency_hz);
        Ok(())
    }

    fn begin_transaction(&mut self) -> Result {
        self.cs.set_low().map_err(|_| DisplayError::CSError)
    }

    fn end_transaction(&mut self) -> Result {
        let flushed = self.flush();
        self.cs.set_high().map_err(|_| DisplayError::CSError)?;
        flushed
    }

    fn write_command(&mut self, command: u8) -> Result {
        self.dc.set_low().map_err(|_| DisplayError::DCError)?;
        self.spi
            .write(&[command])
            .map_err(|_| DisplayError::BusWriteError)?;
        // D/C must not change before the command byte has left the bus
        self.flush()?;
        self.dc.set_high().map_err(|_| DisplayError::DCError)
    }

    fn write_byte(&mut self, byte: u8) -> Result {
        self.write_bytes(&[byte])
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result {
        self.spi
            .write(bytes)
            .map_err(|_| DisplayError::BusWriteError)
    }

    fn write16(&mut self, word: u16) -> Result {
        self.write_bytes(&word.to_be_bytes())
    }

    fn read_byte(&mut self) -> Result<u8> {
        self.flush()?;
        let mut buf = [0u8; 1];
        // display-interface has no read variant
        self.spi
            .read(&mut buf)
            .map_err(|_| DisplayError::BusWriteError)?;
        Ok(buf[0])
    }
}
