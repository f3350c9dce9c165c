use super::{MqttPacket, PacketType};
use crate::error::Result;
use bytes::BufMut;

/// PINGRESP has no variable header or payload: always `D0 00`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PingRespPacket;

impl MqttPacket for PingRespPacket {
    fn packet_type(&self) -> PacketType {
        PacketType::PingResp
    }

    fn encode_body<B: BufMut>(&self, _buf: &mut B) -> Result<()> {
        Ok(())
    }
}
