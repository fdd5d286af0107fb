/// MADCTL: row address order, bottom to top
pub const MADCTL_MY: u8 = 0x80;
/// MADCTL: column address order, right to left
pub const MADCTL_MX: u8 = 0x40;
/// MADCTL: row/column exchange
pub const MADCTL_MV: u8 = 0x20;
/// MADCTL: blue-green-red pixel order
pub const MADCTL_BGR: u8 = 0x08;

/// Base of the undocumented read-mode register used by [`Command::ReadModeEnable`]
pub const READ_INDEX_BASE: u8 = 0x10;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    SoftwareReset = 0x01,
    SleepModeOn = 0x10,
    SleepModeOff = 0x11,
    GammaSet = 0x26,
    InvertOff = 0x20,
    InvertOn = 0x21,
    DisplayOff = 0x28,
    DisplayOn = 0x29,
    ColumnAddressSet = 0x2a,
    PageAddressSet = 0x2b,
    MemoryWrite = 0x2c,
    MemoryAccessControl = 0x36,
    VerticalScrollAddr = 0x37,
    PixelFormatSet = 0x3a,
    NormalModeFrameRate = 0xb1,
    DisplayFunctionControl = 0xb6,
    PowerControl1 = 0xc0,
    PowerControl2 = 0xc1,
    VCOMControl1 = 0xc5,
    VCOMControl2 = 0xc7,
    PowerControlB = 0xcf,
    ReadModeEnable = 0xd9,
    PositiveGammaControl = 0xe0,
    NegativeGammaControl = 0xe1,
    DriverTimingControlA = 0xe8,
    DriverTimingControlB = 0xea,
    PowerOnSequenceControl = 0xed,
    PowerControlA = 0xcb,
    /// Vendor init register, absent from the datasheet
    Undocumented = 0xef,
    Enable3Gamma = 0xf2,
    PumpRatioControl = 0xf7,
}
