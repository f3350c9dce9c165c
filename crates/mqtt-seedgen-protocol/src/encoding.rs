//! Primitive field codecs shared by every packet builder.
//!
//! MQTT uses two length-carrying encodings:
//!
//! - **Variable Byte Integer**: seven data bits per byte, bit 7 set when
//!   another byte follows. Used for the fixed header's Remaining Length and
//!   for the MQTT v5 Properties Length.
//! - **UTF-8 Encoded String** / **Binary Data**: a two-byte big-endian length
//!   followed by the raw bytes.

use crate::constants::{MAX_REMAINING_LENGTH, MAX_STRING_LENGTH, MAX_VARIABLE_INT_BYTES};
use crate::error::{MqttError, Result};
use bytes::{Buf, BufMut};

/// Writes `value` as a Variable Byte Integer.
///
/// # Errors
/// Returns [`MqttError::InvalidLength`] if `value` exceeds 268,435,455.
pub fn encode_variable_int<B: BufMut>(buf: &mut B, value: u32) -> Result<()> {
    if value > MAX_REMAINING_LENGTH {
        return Err(MqttError::InvalidLength(value as usize));
    }

    let mut remaining = value;
    loop {
        #[allow(clippy::cast_possible_truncation)]
        let mut byte = (remaining % 128) as u8;
        remaining /= 128;
        if remaining > 0 {
            byte |= 0x80;
        }
        buf.put_u8(byte);
        if remaining == 0 {
            return Ok(());
        }
    }
}

/// Reads a Variable Byte Integer, rejecting encodings longer than four bytes.
///
/// # Errors
/// Returns [`MqttError::MalformedPacket`] on truncated input or a fifth
/// continuation byte.
pub fn decode_variable_int<B: Buf>(buf: &mut B) -> Result<u32> {
    let mut value: u32 = 0;
    let mut multiplier: u32 = 1;

    for _ in 0..MAX_VARIABLE_INT_BYTES {
        if !buf.has_remaining() {
            return Err(MqttError::MalformedPacket(
                "Truncated variable byte integer".to_string(),
            ));
        }
        let byte = buf.get_u8();
        value += u32::from(byte & 0x7F) * multiplier;
        if byte & 0x80 == 0 {
            return Ok(value);
        }
        multiplier *= 128;
    }

    Err(MqttError::MalformedPacket(
        "Variable byte integer exceeds 4 bytes".to_string(),
    ))
}

#[must_use]
pub fn variable_int_len(value: u32) -> usize {
    match value {
        0..=127 => 1,
        128..=16_383 => 2,
        16_384..=2_097_151 => 3,
        _ => 4,
    }
}

/// Encodes a Remaining Length into a fresh byte vector.
///
/// # Errors
/// Returns [`MqttError::InvalidLength`] if `len` exceeds 268,435,455.
pub fn encode_remaining_length(len: usize) -> Result<Vec<u8>> {
    let value = u32::try_from(len).map_err(|_| MqttError::InvalidLength(len))?;
    let mut out = Vec::with_capacity(variable_int_len(value.min(MAX_REMAINING_LENGTH)));
    encode_variable_int(&mut out, value)?;
    Ok(out)
}

/// Converts a computed body length into a Remaining Length value.
///
/// # Errors
/// Returns [`MqttError::InvalidLength`] if `len` cannot be represented.
pub fn remaining_length(len: usize) -> Result<u32> {
    u32::try_from(len)
        .ok()
        .filter(|v| *v <= MAX_REMAINING_LENGTH)
        .ok_or(MqttError::InvalidLength(len))
}

/// Writes a UTF-8 Encoded String.
///
/// # Errors
/// Returns [`MqttError::StringTooLong`] if the UTF-8 encoding exceeds 65535
/// bytes. Nothing is written in that case.
pub fn encode_string<B: BufMut>(buf: &mut B, s: &str) -> Result<()> {
    let bytes = s.as_bytes();
    let len = u16::try_from(bytes.len()).map_err(|_| MqttError::StringTooLong(bytes.len()))?;
    buf.put_u16(len);
    buf.put_slice(bytes);
    Ok(())
}

/// Encodes a UTF-8 Encoded String into a fresh byte vector.
///
/// # Errors
/// Returns [`MqttError::StringTooLong`] if the UTF-8 encoding exceeds 65535
/// bytes.
pub fn encode_utf8_field(s: &str) -> Result<Vec<u8>> {
    let mut out = Vec::with_capacity(string_len(s));
    encode_string(&mut out, s)?;
    Ok(out)
}

/// Writes a Binary Data field.
///
/// # Errors
/// Returns [`MqttError::BinaryTooLong`] if `data` exceeds 65535 bytes.
pub fn encode_binary<B: BufMut>(buf: &mut B, data: &[u8]) -> Result<()> {
    if data.len() > MAX_STRING_LENGTH {
        return Err(MqttError::BinaryTooLong(data.len()));
    }
    #[allow(clippy::cast_possible_truncation)]
    buf.put_u16(data.len() as u16);
    buf.put_slice(data);
    Ok(())
}

#[must_use]
pub fn string_len(s: &str) -> usize {
    2 + s.len()
}

#[must_use]
pub fn binary_len(data: &[u8]) -> usize {
    2 + data.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::BytesMut;
    use proptest::prelude::*;

    #[test]
    fn test_remaining_length_rollover_points() {
        assert_eq!(encode_remaining_length(0).unwrap(), vec![0x00]);
        assert_eq!(encode_remaining_length(127).unwrap(), vec![0x7F]);

        let rl128 = encode_remaining_length(128).unwrap();
        assert_eq!(rl128, vec![0x80, 0x01]);
        assert_eq!(rl128[0] & 0x80, 0x80);

        assert_eq!(encode_remaining_length(129).unwrap(), vec![0x81, 0x01]);
        assert_eq!(encode_remaining_length(16_383).unwrap(), vec![0xFF, 0x7F]);
        assert_eq!(
            encode_remaining_length(16_384).unwrap(),
            vec![0x80, 0x80, 0x01]
        );
        assert_eq!(
            encode_remaining_length(268_435_455).unwrap(),
            vec![0xFF, 0xFF, 0xFF, 0x7F]
        );
    }

    #[test]
    fn test_remaining_length_ceiling() {
        assert_eq!(
            encode_remaining_length(268_435_456),
            Err(MqttError::InvalidLength(268_435_456))
        );
        assert_eq!(
            encode_remaining_length(usize::MAX),
            Err(MqttError::InvalidLength(usize::MAX))
        );

        let mut buf = BytesMut::new();
        assert!(encode_variable_int(&mut buf, u32::MAX).is_err());
        assert!(buf.is_empty());
    }

    #[test]
    fn test_decode_variable_int_rejects_five_bytes() {
        let mut data: &[u8] = &[0x80, 0x80, 0x80, 0x80, 0x01];
        assert!(matches!(
            decode_variable_int(&mut data),
            Err(MqttError::MalformedPacket(_))
        ));
    }

    #[test]
    fn test_decode_variable_int_truncated() {
        let mut data: &[u8] = &[0x80];
        assert!(decode_variable_int(&mut data).is_err());
    }

    #[test]
    fn test_encode_utf8_field() {
        assert_eq!(encode_utf8_field("").unwrap(), vec![0x00, 0x00]);
        assert_eq!(
            encode_utf8_field("a/b").unwrap(),
            vec![0x00, 0x03, b'a', b'/', b'b']
        );

        // "°" and "温" are 2 and 3 bytes respectively
        let field = encode_utf8_field("温°").unwrap();
        assert_eq!(&field[..2], &[0x00, 0x05]);
        assert_eq!(&field[2..], "温°".as_bytes());
    }

    #[test]
    fn test_utf8_field_length_ceiling() {
        let at_limit = "a".repeat(65_535);
        let field = encode_utf8_field(&at_limit).unwrap();
        assert_eq!(&field[..2], &[0xFF, 0xFF]);
        let decoded = std::str::from_utf8(&field[2..]).unwrap();
        assert_eq!(decoded, at_limit);

        let over_limit = "a".repeat(65_536);
        assert_eq!(
            encode_utf8_field(&over_limit),
            Err(MqttError::StringTooLong(65_536))
        );
    }

    #[test]
    fn test_utf8_ceiling_counts_bytes_not_chars() {
        // 21846 three-byte characters = 65538 bytes
        let wide = "温".repeat(21_846);
        assert_eq!(
            encode_utf8_field(&wide),
            Err(MqttError::StringTooLong(65_538))
        );
    }

    #[test]
    fn test_encode_binary() {
        let mut buf = BytesMut::new();
        encode_binary(&mut buf, &[1, 2, 3]).unwrap();
        assert_eq!(&buf[..], &[0x00, 0x03, 1, 2, 3]);

        let too_big = vec![0u8; 65_536];
        assert_eq!(
            encode_binary(&mut buf, &too_big),
            Err(MqttError::BinaryTooLong(65_536))
        );
    }

    proptest! {
        #[test]
        fn prop_variable_int_round_trip(value in 0u32..=268_435_455u32) {
            let mut buf = BytesMut::new();
            encode_variable_int(&mut buf, value).unwrap();

            prop_assert_eq!(buf.len(), variable_int_len(value));
            prop_assert!(buf.len() <= 4);
            if buf.len() > 1 {
                // A trailing zero byte would be a superfluous continuation
                prop_assert_ne!(buf[buf.len() - 1], 0x00);
            }

            let mut slice = &buf[..];
            let decoded = decode_variable_int(&mut slice).unwrap();
            prop_assert_eq!(decoded, value);
            prop_assert!(slice.is_empty());
        }

        #[test]
        fn prop_remaining_length_matches_variable_int(len in 0usize..=268_435_455usize) {
            let encoded = encode_remaining_length(len).unwrap();
            let mut buf = BytesMut::new();
            #[allow(clippy::cast_possible_truncation)]
            encode_variable_int(&mut buf, len as u32).unwrap();
            prop_assert_eq!(&encoded[..], &buf[..]);
        }

        #[test]
        fn prop_utf8_field_round_trip(s in "\\PC{0,64}") {
            let field = encode_utf8_field(&s).unwrap();
            let len = u16::from_be_bytes([field[0], field[1]]) as usize;
            prop_assert_eq!(len, s.len());
            prop_assert_eq!(std::str::from_utf8(&field[2..]).unwrap(), s.as_str());
        }
    }
}
