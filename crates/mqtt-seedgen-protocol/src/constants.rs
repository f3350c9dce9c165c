/// Largest value a four-byte Variable Byte Integer can carry.
pub const MAX_REMAINING_LENGTH: u32 = 268_435_455;

/// Largest byte length of a UTF-8 Encoded String or Binary Data field.
pub const MAX_STRING_LENGTH: usize = 0xFFFF;

/// Variable Byte Integers never use more than four bytes.
pub const MAX_VARIABLE_INT_BYTES: usize = 4;

pub mod fixed_header {
    pub const CONNACK: u8 = 0x20;
    pub const PUBLISH: u8 = 0x30;
    pub const PUBACK: u8 = 0x40;
    pub const PUBREC: u8 = 0x50;
    /// PUBREL carries mandatory flags `0010`.
    pub const PUBREL: u8 = 0x62;
    pub const PUBCOMP: u8 = 0x70;
    pub const SUBACK: u8 = 0x90;
    pub const PINGRESP: u8 = 0xD0;
}

pub mod publish_flags {
    pub const DUP: u8 = 0x08;
    pub const QOS_MASK: u8 = 0x06;
    pub const QOS_SHIFT: u8 = 1;
    pub const RETAIN: u8 = 0x01;
}
