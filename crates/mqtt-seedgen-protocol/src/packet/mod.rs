//! Server-to-client control packet builders.
//!
//! Every builder implements [`MqttPacket`]: it writes its variable header and
//! payload with [`MqttPacket::encode_body`], and the provided
//! [`MqttPacket::encode`] prefixes the fixed header with the exact Remaining
//! Length of that body. Builders never mutate a frame once produced.

pub mod ack;
pub mod connack;
pub mod pingresp;
pub mod publish;
pub mod suback;

use crate::encoding::{encode_remaining_length, encode_variable_int, remaining_length};
use crate::error::{MqttError, Result};
use crate::types::ProtocolVersion;
use bytes::{BufMut, Bytes, BytesMut};

pub use ack::{AckForm, AckKind, AckPacket};
pub use connack::{ConnAckPacket, ConnectReturnCode};
pub use pingresp::PingRespPacket;
pub use publish::PublishPacket;
pub use suback::SubAckPacket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum PacketType {
    ConnAck = 2,
    Publish = 3,
    PubAck = 4,
    PubRec = 5,
    PubRel = 6,
    PubComp = 7,
    SubAck = 9,
    PingResp = 13,
}

impl PacketType {
    #[must_use]
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            2 => Some(Self::ConnAck),
            3 => Some(Self::Publish),
            4 => Some(Self::PubAck),
            5 => Some(Self::PubRec),
            6 => Some(Self::PubRel),
            7 => Some(Self::PubComp),
            9 => Some(Self::SubAck),
            13 => Some(Self::PingResp),
            _ => None,
        }
    }

    /// Flags every packet of this type must carry, `None` for PUBLISH whose
    /// flags vary per message.
    #[must_use]
    pub fn required_flags(self) -> Option<u8> {
        match self {
            Self::Publish => None,
            Self::PubRel => Some(0x02),
            _ => Some(0x00),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedHeader {
    pub packet_type: PacketType,
    pub flags: u8,
    pub remaining_length: u32,
}

impl FixedHeader {
    #[must_use]
    pub fn new(packet_type: PacketType, flags: u8, remaining_length: u32) -> Self {
        Self {
            packet_type,
            flags,
            remaining_length,
        }
    }

    #[must_use]
    pub fn first_byte(&self) -> u8 {
        ((self.packet_type as u8) << 4) | (self.flags & 0x0F)
    }

    /// # Errors
    /// Returns [`MqttError::InvalidLength`] if the remaining length exceeds
    /// the variable byte integer range.
    pub fn encode<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        buf.put_u8(self.first_byte());
        encode_variable_int(buf, self.remaining_length)
    }
}

/// `[control_byte] ++ encode_remaining_length(remaining_len)`.
///
/// # Errors
/// Returns [`MqttError::InvalidLength`] if `remaining_len` exceeds 268,435,455.
pub fn build_fixed_header(control_byte: u8, remaining_len: usize) -> Result<Vec<u8>> {
    let encoded = encode_remaining_length(remaining_len)?;
    let mut header = Vec::with_capacity(1 + encoded.len());
    header.push(control_byte);
    header.extend_from_slice(&encoded);
    Ok(header)
}

pub trait MqttPacket {
    fn packet_type(&self) -> PacketType;

    fn flags(&self) -> u8 {
        self.packet_type().required_flags().unwrap_or(0)
    }

    /// Writes the variable header and payload.
    ///
    /// # Errors
    /// Returns an error if a field cannot be represented on the wire.
    fn encode_body<B: BufMut>(&self, buf: &mut B) -> Result<()>;

    /// Writes the complete frame.
    ///
    /// # Errors
    /// Returns an error if the body cannot be encoded or its length exceeds
    /// the Remaining Length ceiling.
    fn encode<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        let mut body = BytesMut::new();
        self.encode_body(&mut body)?;
        FixedHeader::new(self.packet_type(), self.flags(), remaining_length(body.len())?)
            .encode(buf)?;
        buf.put_slice(&body);
        Ok(())
    }

    /// # Errors
    /// Same as [`MqttPacket::encode`].
    fn to_bytes(&self) -> Result<Bytes> {
        let mut buf = BytesMut::new();
        self.encode(&mut buf)?;
        Ok(buf.freeze())
    }
}

/// Writes an MQTT v5 property block (length + bytes). Under v3.1.1 the
/// block is absent from the wire, so non-empty properties are an error.
pub(crate) fn encode_property_block<B: BufMut>(
    buf: &mut B,
    version: ProtocolVersion,
    properties: &[u8],
    packet: &str,
) -> Result<()> {
    match version {
        ProtocolVersion::V5 => {
            encode_variable_int(buf, remaining_length(properties.len())?)?;
            buf.put_slice(properties);
            Ok(())
        }
        ProtocolVersion::V311 if properties.is_empty() => Ok(()),
        ProtocolVersion::V311 => Err(MqttError::ProtocolError(format!(
            "{packet} properties require MQTT v5"
        ))),
    }
}
