use super::{encode_property_block, MqttPacket, PacketType};
use crate::error::{MqttError, Result};
use crate::protocol::v5::properties::Properties;
use crate::protocol::v5::reason_codes::{is_valid_suback_reason_code, ReasonCode};
use crate::types::ProtocolVersion;
use bytes::{BufMut, Bytes};

/// v3.1.1 SUBACK failure return code.
pub const SUBACK_FAILURE: u8 = 0x80;

/// SUBACK carrying one return code (v3.1.1) or reason code (v5) per
/// requested subscription. Codes are written verbatim; under v5 a code that
/// SUBACK does not define is logged but still encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubAckPacket {
    pub packet_id: u16,
    pub reason_codes: Vec<u8>,
    pub protocol_version: ProtocolVersion,
    pub properties: Bytes,
}

impl SubAckPacket {
    #[must_use]
    pub fn new(packet_id: u16, grants: impl IntoIterator<Item = u8>) -> Self {
        Self {
            packet_id,
            reason_codes: grants.into_iter().collect(),
            protocol_version: ProtocolVersion::V311,
            properties: Bytes::new(),
        }
    }

    #[must_use]
    pub fn v5(packet_id: u16, reason_codes: impl IntoIterator<Item = u8>) -> Self {
        Self {
            protocol_version: ProtocolVersion::V5,
            ..Self::new(packet_id, reason_codes)
        }
    }

    /// # Errors
    /// Returns an error if a property value cannot be encoded.
    pub fn with_properties(mut self, properties: &Properties) -> Result<Self> {
        self.properties = properties.encode_body()?;
        Ok(self)
    }

    /// v5 reason codes in this packet that are not defined for SUBACK.
    #[must_use]
    pub fn undefined_reason_codes(&self) -> Vec<u8> {
        if self.protocol_version != ProtocolVersion::V5 {
            return Vec::new();
        }
        self.reason_codes
            .iter()
            .copied()
            .filter(|&code| !ReasonCode::from_u8(code).is_some_and(is_valid_suback_reason_code))
            .collect()
    }
}

impl MqttPacket for SubAckPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::SubAck
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        if self.reason_codes.is_empty() {
            return Err(MqttError::ProtocolError(
                "SUBACK must carry at least one reason code".to_string(),
            ));
        }

        let undefined = self.undefined_reason_codes();
        if !undefined.is_empty() {
            crate::prelude::warn_log!(
                "SUBACK reason codes {:02x?} are not defined for SUBACK",
                undefined
            );
        }

        buf.put_u16(self.packet_id);
        encode_property_block(buf, self.protocol_version, &self.properties, "SUBACK")?;
        buf.put_slice(&self.reason_codes);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::v5::properties::{PropertyId, PropertyValue};

    #[test]
    fn test_suback_single_grants() {
        for grant in [0x00, 0x01, 0x02, SUBACK_FAILURE] {
            let bytes = SubAckPacket::new(4, [grant]).to_bytes().unwrap();
            assert_eq!(&bytes[..], &[0x90, 0x03, 0x00, 0x04, grant]);
        }
    }

    #[test]
    fn test_suback_multiple_grants() {
        let bytes = SubAckPacket::new(5, [0, 1, 2, SUBACK_FAILURE])
            .to_bytes()
            .unwrap();
        assert_eq!(
            &bytes[..],
            &[0x90, 0x06, 0x00, 0x05, 0x00, 0x01, 0x02, 0x80]
        );
    }

    #[test]
    fn test_suback_v5_empty_properties() {
        let bytes = SubAckPacket::v5(11, [u8::from(ReasonCode::GrantedQoS1)])
            .to_bytes()
            .unwrap();
        assert_eq!(&bytes[..], &[0x90, 0x04, 0x00, 0x0B, 0x00, 0x01]);
    }

    #[test]
    fn test_suback_v5_with_reason_string() {
        let props = Properties::new()
            .with(
                PropertyId::ReasonString,
                PropertyValue::Utf8String("no".into()),
            )
            .unwrap();
        let bytes = SubAckPacket::v5(1, [u8::from(ReasonCode::NotAuthorized)])
            .with_properties(&props)
            .unwrap()
            .to_bytes()
            .unwrap();
        assert_eq!(
            &bytes[..],
            &[0x90, 0x09, 0x00, 0x01, 0x05, 0x1F, 0x00, 0x02, b'n', b'o', 0x87]
        );
    }

    #[test]
    fn test_suback_v5_undefined_reason_codes() {
        let packet = SubAckPacket::v5(3, [0x00, 0x02, 0x8A, 0x87, 0x03, 0xA2]);
        assert_eq!(packet.undefined_reason_codes(), vec![0x8A, 0x03]);

        let bytes = packet.to_bytes().unwrap();
        assert_eq!(
            &bytes[..],
            &[0x90, 0x09, 0x00, 0x03, 0x00, 0x00, 0x02, 0x8A, 0x87, 0x03, 0xA2]
        );
    }

    #[test]
    fn test_suback_v311_codes_are_not_checked() {
        let packet = SubAckPacket::new(3, [0x8A, SUBACK_FAILURE]);
        assert!(packet.undefined_reason_codes().is_empty());
        assert!(packet.to_bytes().is_ok());
    }

    #[test]
    fn test_suback_requires_reason_codes() {
        let result = SubAckPacket::new(1, Vec::new()).to_bytes();
        assert!(matches!(result, Err(MqttError::ProtocolError(_))));
    }

    #[test]
    fn test_suback_v311_rejects_properties() {
        let props = Properties::new()
            .with(
                PropertyId::ReasonString,
                PropertyValue::Utf8String("no".into()),
            )
            .unwrap();
        let packet = SubAckPacket::new(1, [0]).with_properties(&props).unwrap();
        assert!(packet.to_bytes().is_err());
    }
}
