use crate::constants::publish_flags::{DUP, QOS_MASK, QOS_SHIFT, RETAIN};
use crate::error::Result;
use crate::types::QoS;

/// Low nibble of a PUBLISH fixed header: `DUP | QoS(2) | RETAIN`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct PublishFlags {
    pub dup: bool,
    pub qos: QoS,
    pub retain: bool,
}

impl PublishFlags {
    #[must_use]
    pub fn new(qos: QoS, dup: bool, retain: bool) -> Self {
        Self { dup, qos, retain }
    }

    #[must_use]
    pub fn to_nibble(self) -> u8 {
        let mut flags = (u8::from(self.qos) << QOS_SHIFT) & QOS_MASK;
        if self.dup {
            flags |= DUP;
        }
        if self.retain {
            flags |= RETAIN;
        }
        flags
    }

    /// # Errors
    /// Returns [`crate::MqttError::InvalidQoS`] when both QoS bits are set.
    pub fn from_nibble(nibble: u8) -> Result<Self> {
        let qos = QoS::try_from((nibble & QOS_MASK) >> QOS_SHIFT)?;
        Ok(Self {
            dup: nibble & DUP != 0,
            qos,
            retain: nibble & RETAIN != 0,
        })
    }
}

/// Session Present byte of a CONNACK variable header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnAckFlags {
    pub session_present: bool,
}

impl ConnAckFlags {
    #[must_use]
    pub fn to_byte(self) -> u8 {
        u8::from(self.session_present)
    }
}
