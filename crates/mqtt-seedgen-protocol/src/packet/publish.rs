use super::{encode_property_block, MqttPacket, PacketType};
use crate::encoding::{encode_string, string_len, variable_int_len};
use crate::error::{MqttError, Result};
use crate::flags::PublishFlags;
use crate::protocol::v5::properties::Properties;
use crate::types::{ProtocolVersion, QoS};
use bytes::{BufMut, Bytes};

/// PUBLISH delivered from the broker to a subscriber.
///
/// Layout: topic name, packet identifier when QoS > 0, then (v5 only) the
/// property block, then the payload verbatim. A packet identifier supplied
/// with QoS 0 is not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishPacket {
    pub topic_name: String,
    pub payload: Bytes,
    pub flags: PublishFlags,
    pub packet_id: Option<u16>,
    pub protocol_version: ProtocolVersion,
    pub properties: Bytes,
}

impl PublishPacket {
    #[must_use]
    pub fn new(topic_name: impl Into<String>, payload: impl Into<Bytes>) -> Self {
        Self {
            topic_name: topic_name.into(),
            payload: payload.into(),
            flags: PublishFlags::default(),
            packet_id: None,
            protocol_version: ProtocolVersion::V311,
            properties: Bytes::new(),
        }
    }

    #[must_use]
    pub fn with_qos(mut self, qos: QoS) -> Self {
        self.flags.qos = qos;
        self
    }

    #[must_use]
    pub fn with_dup(mut self, dup: bool) -> Self {
        self.flags.dup = dup;
        self
    }

    #[must_use]
    pub fn with_retain(mut self, retain: bool) -> Self {
        self.flags.retain = retain;
        self
    }

    #[must_use]
    pub fn with_packet_id(mut self, packet_id: u16) -> Self {
        self.packet_id = Some(packet_id);
        self
    }

    #[must_use]
    pub fn with_protocol_version(mut self, version: ProtocolVersion) -> Self {
        self.protocol_version = version;
        self
    }

    #[must_use]
    pub fn v5(self) -> Self {
        self.with_protocol_version(ProtocolVersion::V5)
    }

    /// # Errors
    /// Returns an error if a property value cannot be encoded.
    pub fn with_properties(mut self, properties: &Properties) -> Result<Self> {
        self.properties = properties.encode_body()?;
        Ok(self)
    }

    #[must_use]
    pub fn with_raw_properties(mut self, properties: impl Into<Bytes>) -> Self {
        self.properties = properties.into();
        self
    }

    #[must_use]
    pub fn qos(&self) -> QoS {
        self.flags.qos
    }

    /// Bytes between the fixed header and the payload.
    #[must_use]
    pub fn variable_header_len(&self) -> usize {
        let mut len = string_len(&self.topic_name);
        if self.flags.qos.requires_packet_id() {
            len += 2;
        }
        if self.protocol_version.has_properties() {
            let props_len = self.properties.len();
            len += variable_int_len(u32::try_from(props_len).unwrap_or(u32::MAX)) + props_len;
        }
        len
    }
}

impl MqttPacket for PublishPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::Publish
    }

    fn flags(&self) -> u8 {
        self.flags.to_nibble()
    }

    fn encode_body<B: BufMut>(&self, buf: &mut B) -> Result<()> {
        encode_string(buf, &self.topic_name)?;

        if self.flags.qos.requires_packet_id() {
            let packet_id = self
                .packet_id
                .ok_or(MqttError::MissingPacketId(self.flags.qos.into()))?;
            buf.put_u16(packet_id);
        } else if self.packet_id.is_some() {
            crate::prelude::warn_log!("Packet identifier ignored for QoS 0 PUBLISH");
        }

        encode_property_block(buf, self.protocol_version, &self.properties, "PUBLISH")?;
        buf.put_slice(&self.payload);
        Ok(())
    }
}
