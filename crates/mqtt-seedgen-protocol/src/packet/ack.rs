//! PUBACK, PUBREC, PUBREL and PUBCOMP.
//!
//! The four acknowledgements share one layout and differ only in their
//! control byte, so a single [`AckPacket`] parameterised by [`AckKind`]
//! builds all of them. Under MQTT v5 an acknowledgement has three wire
//! shapes, selected with [`AckForm`]:
//!
//! | form         | variable header                         | RL  |
//! |--------------|-----------------------------------------|-----|
//! | `Minimal`    | packet id                               | 2   |
//! | `ReasonOnly` | packet id, reason code                  | 3   |
//! | `Full`       | packet id, reason code, property block  | 4+  |

use super::{encode_property_block, MqttPacket, PacketType};
use crate::constants::fixed_header;
use crate::error::{MqttError, Result};
use crate::protocol::v5::properties::Properties;
use crate::protocol::v5::reason_codes::{
    is_valid_publish_ack_reason_code, is_valid_pubrel_reason_code, ReasonCode,
};
use crate::types::ProtocolVersion;
use bytes::{BufMut, Bytes};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AckKind {
    PubAck,
    PubRec,
    PubRel,
    PubComp,
}

impl AckKind {
    pub const ALL: [Self; 4] = [Self::PubAck, Self::PubRec, Self::PubRel, Self::PubComp];

    #[must_use]
    pub fn packet_type(self) -> PacketType {
        match self {
            Self::PubAck => PacketType::PubAck,
            Self::PubRec => PacketType::PubRec,
            Self::PubRel => PacketType::PubRel,
            Self::PubComp => PacketType::PubComp,
        }
    }

    #[must_use]
    pub fn control_byte(self) -> u8 {
        match self {
            Self::PubAck => fixed_header::PUBACK,
            Self::PubRec => fixed_header::PUBREC,
            Self::PubRel => fixed_header::PUBREL,
            Self::PubComp => fixed_header::PUBCOMP,
        }
    }

    /// # Errors
    /// Returns [`MqttError::InvalidPacketType`] for anything other than
    /// 0x40, 0x50, 0x62 or 0x70.
    pub fn from_control_byte(byte: u8) -> Result<Self> {
        match byte {
            fixed_header::PUBACK => Ok(Self::PubAck),
            fixed_header::PUBREC => Ok(Self::PubRec),
            fixed_header::PUBREL => Ok(Self::PubRel),
            fixed_header::PUBCOMP => Ok(Self::PubComp),
            other => Err(MqttError::InvalidPacketType(other)),
        }
    }

    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PubAck => "puback",
            Self::PubRec => "pubrec",
            Self::PubRel => "pubrel",
            Self::PubComp => "pubcomp",
        }
    }

    fn accepts(self, reason: ReasonCode) -> bool {
        match self {
            Self::PubAck | Self::PubRec => is_valid_publish_ack_reason_code(reason),
            Self::PubRel | Self::PubComp => is_valid_pubrel_reason_code(reason),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AckForm {
    #[default]
    Minimal,
    ReasonOnly(ReasonCode),
    Full {
        reason_code: ReasonCode,
        properties: Bytes,
    },
}

impl AckForm {
    /// Success reason followed by an empty property block: `pkt_id 00 00`.
    #[must_use]
    pub fn full_success() -> Self {
        Self::Full {
            reason_code: ReasonCode::Success,
            properties: Bytes::new(),
        }
    }

    /// # Errors
    /// Returns an error if a property value cannot be encoded.
    pub fn full(reason_code: ReasonCode, properties: &Properties) -> Result<Self> {
        Ok(Self::Full {
            reason_code,
            properties: properties.encode_body()?,
        })
    }

    #[must_use]
    pub fn reason_code(&self) -> Option<ReasonCode> {
        match self {
            Self::Minimal => None,
            Self::ReasonOnly(reason_code) | Self::Full { reason_code, .. } => Some(*reason_code),
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Self::Minimal => "min",
            Self::ReasonOnly(_) => "reason",
            Self::Full { .. } => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AckPacket {
    pub kind: AckKind,
    pub packet_id: u16,
    pub form: AckForm,
    pub protocol_version: ProtocolVersion,
}

impl AckPacket {
    /// v3.1.1 acknowledgement: control byte, `0x02`, packet id.
    #[must_use]
    pub fn new(kind: AckKind, packet_id: u16) -> Self {
        Self {
            kind,
            packet_id,
            form: AckForm::Minimal,
            protocol_version: ProtocolVersion::V311,
        }
    }

    #[must_use]
    pub fn puback(packet_id: u16) -> Self {
        Self::new(AckKind::PubAck, packet_id)
    }

    #[must_use]
    pub fn pubrec(packet_id: u16) -> Self {
        Self::new(AckKind::PubRec, packet_id)
    }

    #[must_use]
    pub fn pubrel(packet_id: u16) -> Self {
        Self::new(AckKind::PubRel, packet_id)
    }

    #[must_use]
    pub fn pubcomp(packet_id: u16) -> Self {
        Self::new(AckKind::PubComp, packet_id)
    }

    #[must_use]
    pub fn v5(kind: AckKind, packet_id: u16, form: AckForm) -> Self {
        Self {
            kind,
            packet_id,
            form,
            protocol_version: ProtocolVersion::V5,
        }
    }

    /// # Errors
    /// Returns [`MqttError::InvalidPacketType`] if `control_byte` is not an
    /// acknowledgement control byte.
    pub fn v5_from_control_byte(control_byte: u8, packet_id: u16, form: AckForm) -> Result<Self> {
        Ok(Self::v5(
            AckKind::from_control_byte(control_byte)?,
            packet_id,
            form,
        ))
    }
}

impl MqttPacket for AckPacket {
    fn packet_type(&self) -> PacketType {
        self.kind.packet_type()
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        if let Some(reason) = self.form.reason_code() {
            if self.protocol_version != ProtocolVersion::V5 {
                return Err(MqttError::ProtocolError(format!(
                    "{} reason code requires MQTT v5",
                    self.kind.label().to_uppercase()
                )));
            }
            if !self.kind.accepts(reason) {
                return Err(MqttError::ProtocolError(format!(
                    "Invalid {} reason code: {reason:?}",
                    self.kind.label().to_uppercase()
                )));
            }
        }

        buf.put_u16(self.packet_id);
        match &self.form {
            AckForm::Minimal => {}
            AckForm::ReasonOnly(reason_code) => buf.put_u8(u8::from(*reason_code)),
            AckForm::Full {
                reason_code,
                properties,
            } => {
                buf.put_u8(u8::from(*reason_code));
                encode_property_block(buf, self.protocol_version, properties, self.kind.label())?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::v5::properties::{PropertyId, PropertyValue};
    use proptest::prelude::*;

    #[test]
    fn test_v311_acks() {
        assert_eq!(
            &AckPacket::puback(1).to_bytes().unwrap()[..],
            &[0x40, 0x02, 0x00, 0x01]
        );
        assert_eq!(
            &AckPacket::pubrec(1).to_bytes().unwrap()[..],
            &[0x50, 0x02, 0x00, 0x01]
        );
        assert_eq!(
            &AckPacket::pubrel(1).to_bytes().unwrap()[..],
            &[0x62, 0x02, 0x00, 0x01]
        );
        assert_eq!(
            &AckPacket::pubcomp(0xCAFE).to_bytes().unwrap()[..],
            &[0x70, 0x02, 0xCA, 0xFE]
        );
    }

    #[test]
    fn test_v5_minimal_matches_v311() {
        for kind in AckKind::ALL {
            let v311 = AckPacket::new(kind, 0xBEEF).to_bytes().unwrap();
            let v5 = AckPacket::v5(kind, 0xBEEF, AckForm::Minimal)
                .to_bytes()
                .unwrap();
            assert_eq!(v311, v5);
        }
    }

    #[test]
    fn test_v5_reason_only() {
        let bytes = AckPacket::v5(
            AckKind::PubAck,
            5,
            AckForm::ReasonOnly(ReasonCode::NoMatchingSubscribers),
        )
        .to_bytes()
        .unwrap();
        assert_eq!(&bytes[..], &[0x40, 0x03, 0x00, 0x05, 0x10]);
    }

    #[test]
    fn test_v5_full_success() {
        let bytes = AckPacket::v5(AckKind::PubRec, 2, AckForm::full_success())
            .to_bytes()
            .unwrap();
        assert_eq!(&bytes[..], &[0x50, 0x04, 0x00, 0x02, 0x00, 0x00]);
    }

    #[test]
    fn test_v5_full_with_reason_string() {
        let props = Properties::new()
            .with(
                PropertyId::ReasonString,
                PropertyValue::Utf8String("q".into()),
            )
            .unwrap();
        let form = AckForm::full(ReasonCode::QuotaExceeded, &props).unwrap();
        let bytes = AckPacket::v5(AckKind::PubAck, 9, form).to_bytes().unwrap();
        assert_eq!(
            &bytes[..],
            &[0x40, 0x08, 0x00, 0x09, 0x97, 0x04, 0x1F, 0x00, 0x01, b'q']
        );
    }

    #[test]
    fn test_reason_code_rejected_for_kind() {
        let packet = AckPacket::v5(
            AckKind::PubRel,
            1,
            AckForm::ReasonOnly(ReasonCode::QuotaExceeded),
        );
        assert!(matches!(
            packet.to_bytes(),
            Err(MqttError::ProtocolError(_))
        ));

        let packet = AckPacket::v5(
            AckKind::PubComp,
            1,
            AckForm::ReasonOnly(ReasonCode::PacketIdentifierNotFound),
        );
        assert!(packet.to_bytes().is_ok());
    }

    #[test]
    fn test_v311_rejects_reason_code() {
        let mut packet = AckPacket::puback(1);
        packet.form = AckForm::ReasonOnly(ReasonCode::Success);
        assert!(matches!(
            packet.to_bytes(),
            Err(MqttError::ProtocolError(_))
        ));
    }

    #[test]
    fn test_from_control_byte() {
        for kind in AckKind::ALL {
            assert_eq!(AckKind::from_control_byte(kind.control_byte()), Ok(kind));
        }
        assert_eq!(
            AckKind::from_control_byte(0x60),
            Err(MqttError::InvalidPacketType(0x60))
        );
        assert!(AckPacket::v5_from_control_byte(0x90, 1, AckForm::Minimal).is_err());
    }

    #[test]
    fn test_first_byte_is_control_byte() {
        for kind in AckKind::ALL {
            let bytes = AckPacket::new(kind, 1).to_bytes().unwrap();
            assert_eq!(bytes[0], kind.control_byte());
        }
    }

    proptest! {
        #[test]
        fn prop_packet_id_big_endian(packet_id in any::<u16>(), kind_idx in 0usize..4) {
            let kind = AckKind::ALL[kind_idx];
            let bytes = AckPacket::new(kind, packet_id).to_bytes().unwrap();
            prop_assert_eq!(bytes.len(), 4);
            prop_assert_eq!(bytes[1], 0x02);
            prop_assert_eq!(u16::from_be_bytes([bytes[2], bytes[3]]), packet_id);
        }
    }
}
