//! Power-on command table and the interpreter that plays it back
//!
//! The table is a flat byte string of records:
//!
//! ```text
//! command, length, arg[0] .. arg[N-1]
//! ```
//!
//! where `N = length & 0x7F` and a set high bit in `length` asks for a
//! [`RECORD_DELAY_MS`] pause once the arguments are sent. A command byte of
//! `0x00` ends the table.

use embedded_hal::delay::DelayNs;

use crate::command::Command;
use crate::interface::Interface;
use crate::Result;

/// Pause after a software reset before the controller accepts commands
pub const SOFTWARE_RESET_DELAY_MS: u32 = 200;
/// Pause after sleep-out issued as part of the software reset
pub const SLEEP_OUT_DELAY_MS: u32 = 10;
/// Pause after a table record flagged with [`DELAY_FLAG`]
pub const RECORD_DELAY_MS: u32 = 150;

/// Reset line held high before the pulse
pub const HARDWARE_RESET_HIGH_MS: u32 = 100;
/// Reset line held low, the reset pulse itself
pub const HARDWARE_RESET_LOW_MS: u32 = 100;
/// Recovery after the reset line is released, before the first command
pub const HARDWARE_RESET_RECOVERY_MS: u32 = 200;

/// High bit of the length byte
pub const DELAY_FLAG: u8 = 0x80;
const ARG_COUNT_MASK: u8 = 0x7f;
const END_OF_TABLE: u8 = 0x00;

/// Initialization sequence for the ILI9341, 16 bpp, portrait, BGR.
#[rustfmt::skip]
pub const INIT_SEQUENCE: &[u8] = &[
    Command::Undocumented as u8, 3, 0x03, 0x80, 0x02,
    Command::PowerControlB as u8, 3, 0x00, 0xC1, 0x30,
    Command::PowerOnSequenceControl as u8, 4, 0x64, 0x03, 0x12, 0x81,
    Command::DriverTimingControlA as u8, 3, 0x85, 0x00, 0x78,
    Command::PowerControlA as u8, 5, 0x39, 0x2C, 0x00, 0x34, 0x02,
    Command::PumpRatioControl as u8, 1, 0x20,
    Command::DriverTimingControlB as u8, 2, 0x00, 0x00,
    Command::PowerControl1 as u8, 1, 0x23, // VRH[5:0]
    Command::PowerControl2 as u8, 1, 0x10, // SAP[2:0], BT[3:0]
    Command::VCOMControl1 as u8, 2, 0x3e, 0x28,
    Command::VCOMControl2 as u8, 1, 0x86,
    Command::MemoryAccessControl as u8, 1, 0x48, // MX, BGR
    Command::VerticalScrollAddr as u8, 1, 0x00,
    Command::PixelFormatSet as u8, 1, 0x55, // 16 bpp
    Command::NormalModeFrameRate as u8, 2, 0x00, 0x18,
    Command::DisplayFunctionControl as u8, 3, 0x08, 0x82, 0x27,
    Command::Enable3Gamma as u8, 1, 0x00, // off
    Command::GammaSet as u8, 1, 0x01, // curve 1
    Command::PositiveGammaControl as u8, 15,
        0x0F, 0x31, 0x2B, 0x0C, 0x0E, 0x08, 0x4E, 0xF1,
        0x37, 0x07, 0x10, 0x03, 0x0E, 0x09, 0x00,
    Command::NegativeGammaControl as u8, 15,
        0x00, 0x0E, 0x14, 0x03, 0x11, 0x07, 0x31, 0xC1,
        0x48, 0x08, 0x0F, 0x0C, 0x31, 0x36, 0x0F,
    Command::SleepModeOff as u8, DELAY_FLAG,
    Command::DisplayOn as u8, DELAY_FLAG,
    END_OF_TABLE,
];

/// One decoded entry of a command table
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InitRecord<'a> {
    pub command: u8,
    pub args: &'a [u8],
    pub delay_after: bool,
}

/// Iterator over the records of a command table.
///
/// Stops at the `0x00` sentinel. A table cut short ends iteration where its
/// bytes end, keeping whatever arguments were present.
#[derive(Clone, Debug)]
pub struct InitRecords<'a> {
    table: &'a [u8],
}

impl<'a> InitRecords<'a> {
    pub fn new(table: &'a [u8]) -> Self {
        Self { table }
    }
}

impl<'a> Iterator for InitRecords<'a> {
    type Item = InitRecord<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let (&command, rest) = self.table.split_first()?;
        if command == END_OF_TABLE {
            self.table = &[];
            return None;
        }
        let (&length, rest) = rest.split_first()?;
        let count = usize::from(length & ARG_COUNT_MASK).min(rest.len());
        let (args, rest) = rest.split_at(count);
        self.table = rest;

        Some(InitRecord {
            command,
            args,
            delay_after: length & DELAY_FLAG != 0,
        })
    }
}

/// Send every record of `table` through `interface`.
///
/// The caller owns the surrounding transaction.
pub fn run_sequence<IFACE, DELAY>(
    interface: &mut IFACE,
    delay: &mut DELAY,
    table: &[u8],
) -> Result
where
    IFACE: Interface + ?Sized,
    DELAY: DelayNs,
{
    for record in InitRecords::new(table) {
        #[cfg(feature = "defmt")]
        defmt::trace!(
            "ili9341: init {=u8:#x} ({=usize} args)",
            record.command,
            record.args.len()
        );
        interface.write_command(record.command)?;
        interface.write_bytes(record.args)?;
        if record.delay_after {
            delay.delay_ms(RECORD_DELAY_MS);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::{log, Event, MockDelay, MockInterface};

    #[test]
    fn table_is_well_formed() {
        // Walk the raw bytes: every record fits and the sentinel is the last byte.
        let mut i = 0;
        while INIT_SEQUENCE[i] != END_OF_TABLE {
            let count = usize::from(INIT_SEQUENCE[i + 1] & ARG_COUNT_MASK);
            i += 2 + count;
            assert!(i < INIT_SEQUENCE.len(), "record overruns the table");
        }
        assert_eq!(i, INIT_SEQUENCE.len() - 1);
    }

    #[test]
    fn decodes_table_records() {
        let records: Vec<_> = InitRecords::new(INIT_SEQUENCE).collect();
        assert_eq!(records.len(), 22);

        assert_eq!(
            records[0],
            InitRecord {
                command: 0xef,
                args: &[0x03, 0x80, 0x02],
                delay_after: false,
            }
        );
        assert_eq!(records[11].command, 0x36);
        assert_eq!(records[11].args, &[0x48]);
        assert_eq!(records[18].args.len(), 15);
        assert_eq!(records[19].args.len(), 15);

        let delayed: Vec<u8> = records
            .iter()
            .filter(|r| r.delay_after)
            .map(|r| r.command)
            .collect();
        assert_eq!(delayed, vec![0x11, 0x29]);
        assert!(records[20].args.is_empty());
    }

    #[test]
    fn halts_at_sentinel() {
        let table = [0x01, 0x00, 0x00, 0x29, 0x80];
        let records: Vec<_> = InitRecords::new(&table).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].command, 0x01);
    }

    #[test]
    fn truncated_table_ends_without_overrun() {
        let table = [0x2a, 0x04, 0x00, 0x01];
        let records: Vec<_> = InitRecords::new(&table).collect();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].args, &[0x00, 0x01]);

        assert_eq!(InitRecords::new(&[0x2a]).count(), 0);
        assert_eq!(InitRecords::new(&[]).count(), 0);
    }

    #[test]
    fn interpreter_emits_bytes_and_flagged_delays() {
        let log = log();
        let mut iface = MockInterface::new(&log);
        let mut delay = MockDelay { log: log.clone() };
        let table = [0xc0, 0x01, 0x23, 0x11, 0x80, 0xc5, 0x82, 0x3e, 0x28, 0x00];

        run_sequence(&mut iface, &mut delay, &table).unwrap();

        assert_eq!(
            *log.borrow(),
            vec![
                Event::Command(0xc0),
                Event::Data(0x23),
                Event::Command(0x11),
                Event::DelayMs(RECORD_DELAY_MS),
                Event::Command(0xc5),
                Event::Data(0x3e),
                Event::Data(0x28),
                Event::DelayMs(RECORD_DELAY_MS),
            ]
        );
    }
}
