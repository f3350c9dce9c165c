use thiserror::Error;

pub type Result<T> = std::result::Result<T, MqttError>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MqttError {
    #[error("Invalid length: {0} exceeds the variable byte integer maximum of 268435455")]
    InvalidLength(usize),

    #[error("String too long: {0} bytes exceeds maximum of 65535")]
    StringTooLong(usize),

    #[error("Binary data too long: {0} bytes exceeds maximum of 65535")]
    BinaryTooLong(usize),

    #[error("Invalid QoS: {0}")]
    InvalidQoS(u8),

    #[error("Packet identifier required for QoS {0}")]
    MissingPacketId(u8),

    #[error("Invalid packet type: {0:#04x}")]
    InvalidPacketType(u8),

    #[error("Duplicate property ID: {0:#04x}")]
    DuplicatePropertyId(u8),

    #[error("Protocol error: {0}")]
    ProtocolError(String),

    #[error("Malformed packet: {0}")]
    MalformedPacket(String),
}
