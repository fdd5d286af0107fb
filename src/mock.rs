//! Recording doubles for the transport, bus, pins and delay used by the unit tests

use std::cell::RefCell;
use std::collections::VecDeque;
use std::convert::Infallible;
use std::rc::Rc;
use std::vec::Vec;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, OutputPin};
use embedded_hal::spi::{self, SpiBus};

use crate::interface::Interface;
use crate::Result;

/// Everything the driver did, in order, across transport, reset pin and delay
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    Configure(u32),
    Begin,
    End,
    Command(u8),
    Data(u8),
    Word(u16),
    Read,
    Reset(bool),
    DelayMs(u32),
    DelayNs(u32),
}

pub type Log = Rc<RefCell<Vec<Event>>>;

pub fn log() -> Log {
    Rc::new(RefCell::new(Vec::new()))
}

pub struct MockInterface {
    pub log: Log,
    pub reads: VecDeque<u8>,
}

impl MockInterface {
    pub fn new(log: &Log) -> Self {
        Self {
            log: log.clone(),
            reads: VecDeque::new(),
        }
    }

    fn push(&self, event: Event) -> Result {
        self.log.borrow_mut().push(event);
        Ok(())
    }
}

impl Interface for MockInterface {
    fn configure(&mut self, frequency_hz: u32) -> Result {
        self.push(Event::Configure(frequency_hz))
    }

    fn begin_transaction(&mut self) -> Result {
        self.push(Event::Begin)
    }

    fn end_transaction(&mut self) -> Result {
        self.push(Event::End)
    }

    fn write_command(&mut self, command: u8) -> Result {
        self.push(Event::Command(command))
    }

    fn write_byte(&mut self, byte: u8) -> Result {
        self.push(Event::Data(byte))
    }

    fn write16(&mut self, word: u16) -> Result {
        self.push(Event::Word(word))
    }

    fn read_byte(&mut self) -> Result<u8> {
        self.push(Event::Read)?;
        Ok(self.reads.pop_front().unwrap_or_default())
    }
}

pub struct MockDelay {
    pub log: Log,
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.log.borrow_mut().push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.log.borrow_mut().push(Event::DelayMs(ms));
    }
}

/// Reset line that records its level changes into the shared log
pub struct LoggedPin {
    pub log: Log,
}

impl digital::ErrorType for LoggedPin {
    type Error = Infallible;
}

impl OutputPin for LoggedPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Reset(false));
        Ok(())
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.log.borrow_mut().push(Event::Reset(true));
        Ok(())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PinEvent {
    Low,
    High,
}

#[derive(Default)]
pub struct MockPin {
    pub events: Vec<PinEvent>,
    pub fail: bool,
}

impl digital::ErrorType for MockPin {
    type Error = digital::ErrorKind;
}

impl MockPin {
    fn set(&mut self, event: PinEvent) -> core::result::Result<(), digital::ErrorKind> {
        if self.fail {
            return Err(digital::ErrorKind::Other);
        }
        self.events.push(event);
        Ok(())
    }
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> core::result::Result<(), Self::Error> {
        self.set(PinEvent::Low)
    }

    fn set_high(&mut self) -> core::result::Result<(), Self::Error> {
        self.set(PinEvent::High)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BusEvent {
    Write(Vec<u8>),
    Read(usize),
    Flush,
}

#[derive(Default)]
pub struct MockBus {
    pub events: Vec<BusEvent>,
    pub read_queue: VecDeque<u8>,
}

impl spi::ErrorType for MockBus {
    type Error = spi::ErrorKind;
}

impl SpiBus for MockBus {
    fn read(&mut self, words: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.events.push(BusEvent::Read(words.len()));
        for word in words.iter_mut() {
            *word = self.read_queue.pop_front().unwrap_or_default();
        }
        Ok(())
    }

    fn write(&mut self, words: &[u8]) -> core::result::Result<(), Self::Error> {
        self.events.push(BusEvent::Write(words.to_vec()));
        Ok(())
    }

    fn transfer(&mut self, read: &mut [u8], write: &[u8]) -> core::result::Result<(), Self::Error> {
        self.write(write)?;
        self.read(read)
    }

    fn transfer_in_place(&mut self, words: &mut [u8]) -> core::result::Result<(), Self::Error> {
        self.events.push(BusEvent::Write(words.to_vec()));
        self.read(words)
    }

    fn flush(&mut self) -> core::result::Result<(), Self::Error> {
        self.events.push(BusEvent::Flush);
        Ok(())
    }
}
