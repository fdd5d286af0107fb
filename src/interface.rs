//! Transport abstraction
//!
//! The driver never touches the bus directly. Everything it needs from the
//! hardware is the small capability set below, so it can run over the bundled
//! [`SpiInterface`](crate::SpiInterface) or any custom transport (bit-banged
//! SPI, a test recorder, a bus shared through a mutex, ...).

use crate::Result;

/// Trait representing the interface to the hardware.
///
/// Implementors guarantee exclusive access to the controller between
/// [`begin_transaction`](Interface::begin_transaction) and
/// [`end_transaction`](Interface::end_transaction). All writes and reads the
/// driver issues happen inside such a scope, except
/// [`Ili9341::set_addr_window`](crate::Ili9341::set_addr_window) and
/// [`Ili9341::write_pixels`](crate::Ili9341::write_pixels), where the caller
/// opens the scope.
pub trait Interface {
    /// Apply the requested bus clock before the first transaction.
    ///
    /// Transports whose clock is fixed at construction ignore it.
    fn configure(&mut self, _frequency_hz: u32) -> Result {
        Ok(())
    }

    /// Acquire the bus and select the controller
    fn begin_transaction(&mut self) -> Result;

    /// Wait for pending writes, deselect the controller and release the bus
    fn end_transaction(&mut self) -> Result;

    /// Send a single command byte (D/C low)
    fn write_command(&mut self, command: u8) -> Result;

    /// Send a single data byte (D/C high)
    fn write_byte(&mut self, byte: u8) -> Result;

    /// Send a run of data bytes
    fn write_bytes(&mut self, bytes: &[u8]) -> Result {
        bytes.iter().try_for_each(|&byte| self.write_byte(byte))
    }

    /// Send a 16-bit data word, most significant byte first
    fn write16(&mut self, word: u16) -> Result;

    /// Clock in one data byte
    fn read_byte(&mut self) -> Result<u8>;
}

impl<T: Interface + ?Sized> Interface for &mut T {
    fn configure(&mut self, frequency_hz: u32) -> Result {
        T::configure(self, frequency_hz)
    }

    fn begin_transaction(&mut self) -> Result {
        T::begin_transaction(self)
    }

    fn end_transaction(&mut self) -> Result {
        T::end_transaction(self)
    }

    fn write_command(&mut self, command: u8) -> Result {
        T::write_command(self, command)
    }

    fn write_byte(&mut self, byte: u8) -> Result {
        T::write_byte(self, byte)
    }

    fn write_bytes(&mut self, bytes: &[u8]) -> Result {
        T::write_bytes(self, bytes)
    }

    fn write16(&mut self, word: u16) -> Result {
        T::write16(self, word)
    }

    fn read_byte(&mut self) -> Result<u8> {
        T::read_byte(self)
    }
}
