//! Byte-exact encoders for the MQTT control packets a broker sends to a
//! client, for both MQTT v3.1.1 and MQTT v5.0.
//!
//! The crate only builds frames. Each builder validates its inputs and
//! returns the complete packet (fixed header, variable header, payload), so
//! the output can be written straight to a socket or a fuzzing corpus.
//!
//! ```
//! use mqtt_seedgen_protocol::{AckPacket, MqttPacket, PublishPacket, QoS};
//!
//! let publish = PublishPacket::new("sensors/temperature", &b"hello"[..])
//!     .with_qos(QoS::AtLeastOnce)
//!     .with_packet_id(1)
//!     .to_bytes()?;
//! assert_eq!(publish[0], 0x32);
//!
//! let puback = AckPacket::puback(1).to_bytes()?;
//! assert_eq!(&puback[..], &[0x40, 0x02, 0x00, 0x01]);
//! # Ok::<(), mqtt_seedgen_protocol::MqttError>(())
//! ```

#![warn(clippy::pedantic)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_lossless)]

pub mod constants;
pub mod encoding;
pub mod error;
pub mod flags;
pub mod packet;
mod prelude;
pub mod protocol;
pub mod types;

pub use encoding::{
    decode_variable_int, encode_remaining_length, encode_utf8_field, encode_variable_int,
    variable_int_len,
};
pub use error::{MqttError, Result};
pub use flags::{ConnAckFlags, PublishFlags};
pub use packet::{
    build_fixed_header, AckForm, AckKind, AckPacket, ConnAckPacket, ConnectReturnCode,
    FixedHeader, MqttPacket, PacketType, PingRespPacket, PublishPacket, SubAckPacket,
};
pub use protocol::v5::properties::{Properties, PropertyId, PropertyValue, PropertyValueType};
pub use protocol::v5::reason_codes::ReasonCode;
pub use types::{ProtocolVersion, QoS};
