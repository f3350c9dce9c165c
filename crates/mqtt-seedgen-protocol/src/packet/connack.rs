use super::{encode_property_block, MqttPacket, PacketType};
use crate::error::{MqttError, Result};
use crate::flags::ConnAckFlags;
use crate::protocol::v5::properties::Properties;
use crate::protocol::v5::reason_codes::{is_valid_connack_reason_code, ReasonCode};
use crate::types::ProtocolVersion;
use bytes::{BufMut, Bytes};

/// MQTT v3.1.1 CONNACK return code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ConnectReturnCode {
    Accepted = 0,
    UnacceptableProtocolVersion = 1,
    IdentifierRejected = 2,
    ServerUnavailable = 3,
    BadUsernameOrPassword = 4,
    NotAuthorized = 5,
}

impl ConnectReturnCode {
    pub const REFUSALS: [Self; 5] = [
        Self::UnacceptableProtocolVersion,
        Self::IdentifierRejected,
        Self::ServerUnavailable,
        Self::BadUsernameOrPassword,
        Self::NotAuthorized,
    ];

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::Accepted => "accepted",
            Self::UnacceptableProtocolVersion => "unacceptable_protocol",
            Self::IdentifierRejected => "identifier_rejected",
            Self::ServerUnavailable => "server_unavailable",
            Self::BadUsernameOrPassword => "bad_username_password",
            Self::NotAuthorized => "not_authorized",
        }
    }
}

impl TryFrom<u8> for ConnectReturnCode {
    type Error = MqttError;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(Self::Accepted),
            1 => Ok(Self::UnacceptableProtocolVersion),
            2 => Ok(Self::IdentifierRejected),
            3 => Ok(Self::ServerUnavailable),
            4 => Ok(Self::BadUsernameOrPassword),
            5 => Ok(Self::NotAuthorized),
            other => Err(MqttError::ProtocolError(format!(
                "Invalid CONNACK return code: {other}"
            ))),
        }
    }
}

impl From<ConnectReturnCode> for u8 {
    fn from(code: ConnectReturnCode) -> Self {
        code as u8
    }
}

/// CONNACK as sent by a broker.
///
/// The code byte is kept raw so that out-of-range return codes can be
/// produced on purpose; [`ConnAckPacket::new`] and [`ConnAckPacket::v5`]
/// cover the well-formed cases.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnAckPacket {
    pub session_present: bool,
    pub code: u8,
    pub protocol_version: ProtocolVersion,
    pub properties: Bytes,
}

impl ConnAckPacket {
    #[must_use]
    pub fn new(session_present: bool, code: ConnectReturnCode) -> Self {
        Self::with_raw_code(session_present, code.into())
    }

    /// v3.1.1 CONNACK carrying any return code byte.
    #[must_use]
    pub fn with_raw_code(session_present: bool, code: u8) -> Self {
        Self {
            session_present,
            code,
            protocol_version: ProtocolVersion::V311,
            properties: Bytes::new(),
        }
    }

    #[must_use]
    pub fn v5(session_present: bool, reason_code: ReasonCode) -> Self {
        Self::v5_with_raw_code(session_present, reason_code.into())
    }

    /// v5 CONNACK carrying any reason code byte, defined or not.
    #[must_use]
    pub fn v5_with_raw_code(session_present: bool, code: u8) -> Self {
        Self {
            session_present,
            code,
            protocol_version: ProtocolVersion::V5,
            properties: Bytes::new(),
        }
    }

    /// # Errors
    /// Returns an error if a property value cannot be encoded.
    pub fn with_properties(mut self, properties: &Properties) -> Result<Self> {
        self.properties = properties.encode_body()?;
        Ok(self)
    }

    /// Pre-encoded property bytes, written verbatim after the length prefix.
    #[must_use]
    pub fn with_raw_properties(mut self, properties: impl Into<Bytes>) -> Self {
        self.properties = properties.into();
        self
    }

    #[must_use]
    pub fn reason_code(&self) -> Option<ReasonCode> {
        ReasonCode::from_u8(self.code)
    }
}

impl MqttPacket for ConnAckPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::ConnAck
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        if self.protocol_version == ProtocolVersion::V5
            && self
                .reason_code()
                .is_some_and(|reason| !is_valid_connack_reason_code(reason))
        {
            crate::prelude::warn_log!(
                "CONNACK reason code {:#04x} is not defined for CONNACK",
                self.code
            );
        }

        buf.put_u8(
            ConnAckFlags {
                session_present: self.session_present,
            }
            .to_byte(),
        );
        buf.put_u8(self.code);
        encode_property_block(buf, self.protocol_version, &self.properties, "CONNACK")
    }
}
