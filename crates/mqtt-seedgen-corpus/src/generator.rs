//! Deterministic enumeration of broker-to-client seed frames.
//!
//! Seeds fall into five groups, emitted in this order: CONNACK, PUBLISH,
//! acknowledgements, SUBACK, and multi-packet reads. Within each group the
//! canonical cases come first, followed by the edge cases that push a
//! client decoder to its limits:
//!
//! - every v3.1.1 refusal code and every v5 CONNACK error reason
//! - every QoS x DUP x RETAIN combination of the PUBLISH fixed header
//! - Remaining Length values on both sides of the one-to-two byte varint
//!   rollover (127, 128, 129)
//! - a topic made of multi-byte UTF-8 characters
//! - all three v5 acknowledgement shapes
//! - several packets coalesced into one TCP read
//!
//! Each seed records the harness phase it targets; the twin stage in
//! [`crate::emit`] turns that into a selector-prefixed copy.

use crate::error::{CorpusError, Result};
use crate::seed::{ModeSelector, Seed, SeedEntry};
use bytes::{Bytes, BytesMut};
use mqtt_seedgen_protocol::packet::suback::SUBACK_FAILURE;
use mqtt_seedgen_protocol::protocol::v5::reason_codes::CONNACK_ERROR_CODES;
use mqtt_seedgen_protocol::{
    AckForm, AckKind, AckPacket, ConnAckPacket, ConnectReturnCode, MqttPacket, PingRespPacket,
    Properties, PropertyId, PropertyValue, PublishPacket, QoS, ReasonCode, SubAckPacket,
};
use std::collections::HashSet;
use tracing::debug;

pub const PUBLISH_TOPIC: &str = "sensors/temperature";
pub const UTF8_TOPIC: &str = "s/温度/°C";
pub const V5_TOPIC: &str = "v5/t";
pub const COALESCED_TOPIC: &str = "coalesced/topic";

/// Remaining Length values straddling the first varint rollover.
pub const REMAINING_LENGTH_TARGETS: [usize; 3] = [127, 128, 129];

const SMALL_PAYLOADS: [&[u8]; 4] = [b"", b"x", b"hello", br#"json:{"t":25.3}"#];

const SUBACKS: [(&str, u16, &[u8]); 5] = [
    ("suback_single_q0", 1, &[0x00]),
    ("suback_single_q1", 2, &[0x01]),
    ("suback_single_q2", 3, &[0x02]),
    ("suback_single_fail", 4, &[SUBACK_FAILURE]),
    ("suback_multi_mixed", 5, &[0x00, 0x01, 0x02, SUBACK_FAILURE]),
];

const V5_SUBACKS: [(&str, u16, &[u8]); 5] = [
    ("v5_suback_q0", 11, &[0x00]),
    ("v5_suback_q1", 12, &[0x01]),
    ("v5_suback_q2", 13, &[0x02]),
    ("v5_suback_fail", 14, &[0x80]),
    ("v5_suback_multi_mixed", 15, &[0x00, 0x01, 0x02, 0x80]),
];

/// Ordered seed collection that refuses duplicate file names.
#[derive(Debug, Default)]
struct SeedSet {
    seeds: Vec<Seed>,
    names: HashSet<String>,
}

impl SeedSet {
    fn push(
        &mut self,
        stem: &str,
        phase: Option<ModeSelector>,
        packet: &impl MqttPacket,
    ) -> Result<()> {
        self.push_bytes(stem, phase, packet.to_bytes()?)
    }

    fn push_bytes(&mut self, stem: &str, phase: Option<ModeSelector>, bytes: Bytes) -> Result<()> {
        let name = format!("{stem}.bin");
        if !self.names.insert(name.clone()) {
            return Err(CorpusError::DuplicateSeedName(name));
        }
        self.seeds.push(Seed::new(SeedEntry::new(name, bytes), phase));
        Ok(())
    }
}

/// Produces the full seed list. The output is identical on every call.
///
/// # Errors
/// Returns an error if a frame cannot be encoded or two seeds share a name.
pub fn generate() -> Result<Vec<Seed>> {
    let mut set = SeedSet::default();
    connack_seeds(&mut set)?;
    publish_seeds(&mut set)?;
    ack_seeds(&mut set)?;
    suback_seeds(&mut set)?;
    coalesced_seeds(&mut set)?;
    debug!(count = set.seeds.len(), "Generated seed frames");
    Ok(set.seeds)
}

/// Resizes `packet`'s payload so its Remaining Length is exactly `target`,
/// filling with `filler`.
///
/// # Errors
/// Returns [`CorpusError::UnreachableRemainingLength`] when the variable
/// header alone already exceeds `target`.
pub fn publish_with_remaining_length(
    packet: PublishPacket,
    target: usize,
    filler: u8,
) -> Result<PublishPacket> {
    let overhead = packet.variable_header_len();
    let payload_len = target
        .checked_sub(overhead)
        .ok_or(CorpusError::UnreachableRemainingLength { target, overhead })?;
    Ok(PublishPacket {
        payload: Bytes::from(vec![filler; payload_len]),
        ..packet
    })
}

fn connack_seeds(set: &mut SeedSet) -> Result<()> {
    let handshake = Some(ModeSelector::HANDSHAKE);
    set.push(
        "connack_ok",
        handshake,
        &ConnAckPacket::new(false, ConnectReturnCode::Accepted),
    )?;
    set.push(
        "connack_session_present",
        handshake,
        &ConnAckPacket::new(true, ConnectReturnCode::Accepted),
    )?;
    for code in ConnectReturnCode::REFUSALS {
        set.push(
            &format!("connack_refused_{}", code.label()),
            handshake,
            &ConnAckPacket::new(false, code),
        )?;
    }

    let mqtt5 = Some(ModeSelector::MQTT5);
    set.push(
        "v5_connack_ok",
        mqtt5,
        &ConnAckPacket::v5(false, ReasonCode::Success),
    )?;
    set.push(
        "v5_connack_session_present",
        mqtt5,
        &ConnAckPacket::v5(true, ReasonCode::Success),
    )?;
    for code in CONNACK_ERROR_CODES {
        set.push(
            &format!("v5_connack_refused_{}", code.label()),
            mqtt5,
            &ConnAckPacket::v5(false, code),
        )?;
    }

    let properties = Properties::new()
        .with(
            PropertyId::SessionExpiryInterval,
            PropertyValue::FourByteInteger(300),
        )?
        .with(PropertyId::ReceiveMaximum, PropertyValue::TwoByteInteger(20))?
        .with(PropertyId::MaximumQoS, PropertyValue::Byte(1))?
        .with(PropertyId::RetainAvailable, PropertyValue::Byte(1))?
        .with(
            PropertyId::AssignedClientIdentifier,
            PropertyValue::Utf8String("seed-client".into()),
        )?
        .with(PropertyId::TopicAliasMaximum, PropertyValue::TwoByteInteger(10))?
        .with(PropertyId::ServerKeepAlive, PropertyValue::TwoByteInteger(60))?;
    set.push(
        "v5_connack_properties",
        mqtt5,
        &ConnAckPacket::v5(false, ReasonCode::Success).with_properties(&properties)?,
    )
}

fn publish_seeds(set: &mut SeedSet) -> Result<()> {
    let connected = Some(ModeSelector::CONNECTED);

    for (i, payload) in SMALL_PAYLOADS.into_iter().enumerate() {
        set.push(
            &format!("publish_qos0_small_{i}"),
            connected,
            &PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(payload)),
        )?;
    }
    set.push(
        "publish_qos0_retain",
        connected,
        &PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(b"retain")).with_retain(true),
    )?;
    set.push(
        "publish_qos0_dup",
        connected,
        &PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(b"dup")).with_dup(true),
    )?;

    let named: [(&str, QoS, &'static [u8], u16, bool, bool); 6] = [
        ("publish_qos1_basic", QoS::AtLeastOnce, b"ack-me", 1, false, false),
        ("publish_qos1_dup", QoS::AtLeastOnce, b"dup1", 0x1234, true, false),
        ("publish_qos1_retain", QoS::AtLeastOnce, b"keep", 2, false, true),
        ("publish_qos2_basic", QoS::ExactlyOnce, b"two-phase", 10, false, false),
        ("publish_qos2_dup", QoS::ExactlyOnce, b"dup2", 0xBEEF, true, false),
        ("publish_qos2_retain", QoS::ExactlyOnce, b"store", 11, false, true),
    ];
    for (stem, qos, payload, packet_id, dup, retain) in named {
        set.push(
            stem,
            connected,
            &PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(payload))
                .with_qos(qos)
                .with_packet_id(packet_id)
                .with_dup(dup)
                .with_retain(retain),
        )?;
    }

    for qos in QoS::ALL {
        for dup in [false, true] {
            for retain in [false, true] {
                let mut packet = PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(b"flags"))
                    .with_qos(qos)
                    .with_dup(dup)
                    .with_retain(retain);
                if qos.requires_packet_id() {
                    packet = packet.with_packet_id(0x0042);
                }
                let stem = format!(
                    "publish_matrix_qos{}{}{}",
                    u8::from(qos),
                    if dup { "_dup" } else { "" },
                    if retain { "_retain" } else { "" }
                );
                set.push(&stem, connected, &packet)?;
            }
        }
    }

    for target in REMAINING_LENGTH_TARGETS {
        let packet =
            publish_with_remaining_length(PublishPacket::new("t", Bytes::new()), target, 0xAA)?;
        set.push(&format!("publish_qos0_rl{target}"), connected, &packet)?;
    }
    for target in REMAINING_LENGTH_TARGETS {
        let base = PublishPacket::new("t", Bytes::new())
            .with_qos(QoS::AtLeastOnce)
            .with_packet_id(0x2222);
        let packet = publish_with_remaining_length(base, target, 0x55)?;
        set.push(&format!("publish_qos1_rl{target}"), connected, &packet)?;
    }

    set.push(
        "publish_utf8_topic_qos0",
        connected,
        &PublishPacket::new(UTF8_TOPIC, Bytes::from_static(b"bytes")),
    )?;
    set.push(
        "publish_utf8_topic_qos1",
        connected,
        &PublishPacket::new(UTF8_TOPIC, Bytes::from_static(b"ack"))
            .with_qos(QoS::AtLeastOnce)
            .with_packet_id(3),
    )?;

    v5_publish_seeds(set)
}

fn v5_publish_seeds(set: &mut SeedSet) -> Result<()> {
    let mqtt5 = Some(ModeSelector::MQTT5);

    set.push(
        "v5_publish_qos0",
        mqtt5,
        &PublishPacket::new(V5_TOPIC, Bytes::from_static(b"p0")).v5(),
    )?;
    set.push(
        "v5_publish_qos1",
        mqtt5,
        &PublishPacket::new(V5_TOPIC, Bytes::from_static(b"p1"))
            .v5()
            .with_qos(QoS::AtLeastOnce)
            .with_packet_id(1),
    )?;
    set.push(
        "v5_publish_qos2",
        mqtt5,
        &PublishPacket::new(V5_TOPIC, Bytes::from_static(b"p2"))
            .v5()
            .with_qos(QoS::ExactlyOnce)
            .with_packet_id(2),
    )?;

    for target in REMAINING_LENGTH_TARGETS {
        let packet =
            publish_with_remaining_length(PublishPacket::new("v", Bytes::new()).v5(), target, 0xCC)?;
        set.push(&format!("v5_publish_qos0_rl{target}"), mqtt5, &packet)?;
    }

    let properties = Properties::new()
        .with(PropertyId::PayloadFormatIndicator, PropertyValue::Byte(1))?
        .with(
            PropertyId::MessageExpiryInterval,
            PropertyValue::FourByteInteger(60),
        )?
        .with(PropertyId::TopicAlias, PropertyValue::TwoByteInteger(1))?
        .with(
            PropertyId::ContentType,
            PropertyValue::Utf8String("application/json".into()),
        )?
        .with(
            PropertyId::ResponseTopic,
            PropertyValue::Utf8String("v5/reply".into()),
        )?
        .with(
            PropertyId::CorrelationData,
            PropertyValue::BinaryData(Bytes::from_static(&[0xC0, 0xFF, 0xEE])),
        )?
        .with(
            PropertyId::UserProperty,
            PropertyValue::Utf8StringPair("origin".into(), "seed".into()),
        )?
        .with(
            PropertyId::SubscriptionIdentifier,
            PropertyValue::VariableByteInteger(7),
        )?;
    set.push(
        "v5_publish_qos1_properties",
        mqtt5,
        &PublishPacket::new(V5_TOPIC, Bytes::from_static(br#"{"t":25.3}"#))
            .v5()
            .with_qos(QoS::AtLeastOnce)
            .with_packet_id(3)
            .with_properties(&properties)?,
    )
}

fn ack_seeds(set: &mut SeedSet) -> Result<()> {
    let connected = Some(ModeSelector::CONNECTED);
    for kind in AckKind::ALL {
        set.push(
            &format!("{}_1", kind.label()),
            connected,
            &AckPacket::new(kind, 1),
        )?;
    }
    set.push("puback_beef", connected, &AckPacket::puback(0xBEEF))?;
    set.push("pubcomp_cafe", connected, &AckPacket::pubcomp(0xCAFE))?;

    let mqtt5 = Some(ModeSelector::MQTT5);
    for (kind, packet_id) in AckKind::ALL.into_iter().zip(1u16..) {
        for form in [
            AckForm::Minimal,
            AckForm::ReasonOnly(ReasonCode::Success),
            AckForm::full_success(),
        ] {
            set.push(
                &format!("v5_{}_{}", kind.label(), form.label()),
                mqtt5,
                &AckPacket::v5(kind, packet_id, form),
            )?;
        }
    }

    let reason_string = Properties::new().with(
        PropertyId::ReasonString,
        PropertyValue::Utf8String("quota exceeded".into()),
    )?;
    let failures = [
        (
            AckKind::PubAck,
            5,
            AckForm::ReasonOnly(ReasonCode::NoMatchingSubscribers),
        ),
        (
            AckKind::PubRec,
            6,
            AckForm::full(ReasonCode::QuotaExceeded, &reason_string)?,
        ),
        (
            AckKind::PubRel,
            7,
            AckForm::ReasonOnly(ReasonCode::PacketIdentifierNotFound),
        ),
        (
            AckKind::PubComp,
            8,
            AckForm::ReasonOnly(ReasonCode::PacketIdentifierNotFound),
        ),
    ];
    for (kind, packet_id, form) in failures {
        let reason = form.reason_code().unwrap_or(ReasonCode::Success);
        set.push(
            &format!("v5_{}_{}", kind.label(), reason.label()),
            mqtt5,
            &AckPacket::v5(kind, packet_id, form),
        )?;
    }
    Ok(())
}

fn suback_seeds(set: &mut SeedSet) -> Result<()> {
    let subscribe = Some(ModeSelector::SUBSCRIBE);
    for (stem, packet_id, grants) in SUBACKS {
        set.push(
            stem,
            subscribe,
            &SubAckPacket::new(packet_id, grants.iter().copied()),
        )?;
    }

    let mqtt5 = Some(ModeSelector::MQTT5);
    for (stem, packet_id, reason_codes) in V5_SUBACKS {
        set.push(
            stem,
            mqtt5,
            &SubAckPacket::v5(packet_id, reason_codes.iter().copied()),
        )?;
    }

    let properties = Properties::new()
        .with(
            PropertyId::ReasonString,
            PropertyValue::Utf8String("denied".into()),
        )?
        .with(
            PropertyId::UserProperty,
            PropertyValue::Utf8StringPair("acl".into(), "deny".into()),
        )?;
    set.push(
        "v5_suback_not_authorized_reason_string",
        mqtt5,
        &SubAckPacket::v5(16, [u8::from(ReasonCode::NotAuthorized)])
            .with_properties(&properties)?,
    )
}

fn coalesced_seeds(set: &mut SeedSet) -> Result<()> {
    set.push("pingresp", None, &PingRespPacket)?;

    let mut buf = BytesMut::new();
    ConnAckPacket::new(false, ConnectReturnCode::Accepted).encode(&mut buf)?;
    PublishPacket::new(COALESCED_TOPIC, Bytes::from_static(b"data")).encode(&mut buf)?;
    PingRespPacket.encode(&mut buf)?;
    set.push_bytes(
        "coalesced_connack_publish_pingresp",
        Some(ModeSelector::CONNECTED),
        buf.freeze(),
    )?;

    let mut buf = BytesMut::new();
    ConnAckPacket::v5(false, ReasonCode::Success).encode(&mut buf)?;
    PublishPacket::new(COALESCED_TOPIC, Bytes::from_static(b"data"))
        .v5()
        .encode(&mut buf)?;
    PingRespPacket.encode(&mut buf)?;
    set.push_bytes(
        "v5_coalesced_connack_publish_pingresp",
        Some(ModeSelector::MQTT5),
        buf.freeze(),
    )?;

    let qos = Some(ModeSelector::QOS);

    let mut buf = BytesMut::new();
    AckPacket::pubrec(0x0101).encode(&mut buf)?;
    AckPacket::pubcomp(0x0101).encode(&mut buf)?;
    set.push_bytes("qos_flow_pubrec_pubcomp", qos, buf.freeze())?;

    let mut buf = BytesMut::new();
    PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(b"two-phase"))
        .with_qos(QoS::ExactlyOnce)
        .with_packet_id(0x0202)
        .encode(&mut buf)?;
    AckPacket::pubrel(0x0202).encode(&mut buf)?;
    set.push_bytes("qos_flow_publish_qos2_pubrel", qos, buf.freeze())?;

    let redelivered = PublishPacket::new(PUBLISH_TOPIC, Bytes::from_static(b"again"))
        .with_qos(QoS::AtLeastOnce)
        .with_packet_id(0x0303);
    let mut buf = BytesMut::new();
    redelivered.encode(&mut buf)?;
    redelivered.with_dup(true).encode(&mut buf)?;
    set.push_bytes("qos_flow_publish_qos1_redelivery", qos, buf.freeze())
}
