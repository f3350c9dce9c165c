#![allow(dead_code)]

use mqtt_seedgen_protocol::decode_variable_int;

/// One MQTT control packet as found on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub first_byte: u8,
    pub body: Vec<u8>,
}

impl Frame {
    pub fn packet_type(&self) -> u8 {
        self.first_byte >> 4
    }

    pub fn flags(&self) -> u8 {
        self.first_byte & 0x0F
    }
}

/// Splits a TCP read into frames. Returns `None` if the last frame is
/// truncated or a Remaining Length is malformed.
pub fn split_frames(data: &[u8]) -> Option<Vec<Frame>> {
    let mut rest = data;
    let mut frames = Vec::new();
    while let Some((&first_byte, tail)) = rest.split_first() {
        let mut cursor = tail;
        let len = decode_variable_int(&mut cursor).ok()? as usize;
        if cursor.len() < len {
            return None;
        }
        frames.push(Frame {
            first_byte,
            body: cursor[..len].to_vec(),
        });
        rest = &cursor[len..];
    }
    Some(frames)
}
