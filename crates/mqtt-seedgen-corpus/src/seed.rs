//! Corpus entries and the mode selector that routes them inside the harness.

use crate::error::{CorpusError, Result};
use bytes::{BufMut, Bytes, BytesMut};
use serde::{Deserialize, Serialize};
use std::fmt;

/// First byte of a dynamic seed. The consuming harness reads its low nibble
/// to decide which connection phase to fast-forward to before feeding the
/// remaining bytes to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ModeSelector(u8);

impl ModeSelector {
    pub const HANDSHAKE: Self = Self(0x00);
    pub const CONNECTED: Self = Self(0x01);
    pub const SUBSCRIBE: Self = Self(0x02);
    pub const QOS: Self = Self(0x03);
    pub const MQTT5: Self = Self(0x04);

    pub const MAX: u8 = 0x0F;

    /// # Errors
    /// Returns [`CorpusError::InvalidSelector`] for values above 0x0F.
    pub fn new(value: u8) -> Result<Self> {
        if value > Self::MAX {
            return Err(CorpusError::InvalidSelector(value));
        }
        Ok(Self(value))
    }

    #[must_use]
    pub fn value(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn phase_name(self) -> &'static str {
        match self.0 {
            0x00 => "handshake",
            0x01 => "connected",
            0x02 => "subscribe",
            0x03 => "qos",
            0x04 => "mqtt5",
            _ => "reserved",
        }
    }
}

impl TryFrom<u8> for ModeSelector {
    type Error = CorpusError;

    fn try_from(value: u8) -> Result<Self> {
        Self::new(value)
    }
}

impl From<ModeSelector> for u8 {
    fn from(selector: ModeSelector) -> Self {
        selector.0
    }
}

impl fmt::Display for ModeSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#04x} ({})", self.0, self.phase_name())
    }
}

/// A named byte sequence ready to be persisted. `selector` is set on
/// dynamic twins, whose first byte is the selector itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedEntry {
    pub name: String,
    pub bytes: Bytes,
    pub selector: Option<ModeSelector>,
}

impl SeedEntry {
    #[must_use]
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            selector: None,
        }
    }

    /// Builds the dynamic twin: `dyn_` + name, `[selector] ++ bytes`.
    #[must_use]
    pub fn twin(&self, selector: ModeSelector) -> Self {
        let mut bytes = BytesMut::with_capacity(1 + self.bytes.len());
        bytes.put_u8(selector.value());
        bytes.put_slice(&self.bytes);
        Self {
            name: format!("dyn_{}", self.name),
            bytes: bytes.freeze(),
            selector: Some(selector),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[must_use]
    pub fn is_twin(&self) -> bool {
        self.selector.is_some()
    }
}

/// A generated entry plus the harness phase it targets, if any.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seed {
    pub entry: SeedEntry,
    pub phase: Option<ModeSelector>,
}

impl Seed {
    #[must_use]
    pub fn new(entry: SeedEntry, phase: Option<ModeSelector>) -> Self {
        Self { entry, phase }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.entry.name
    }
}
