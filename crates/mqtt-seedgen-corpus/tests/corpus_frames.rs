mod common;

use common::split_frames;
use mqtt_seedgen_corpus::generator::generate;
use mqtt_seedgen_corpus::{expand_twins, ModeSelector, Seed, SeedEntry};
use proptest::prelude::*;
use std::collections::HashMap;

fn seeds() -> Vec<Seed> {
    generate().unwrap()
}

fn by_name(entries: &[SeedEntry]) -> HashMap<&str, &SeedEntry> {
    entries.iter().map(|e| (e.name.as_str(), e)).collect()
}

/// Canonical and boundary seeds, one or more per packet type and version.
const CANONICAL_SEED_NAMES: &[&str] = &[
    "connack_ok.bin",
    "connack_session_present.bin",
    "connack_refused_unacceptable_protocol.bin",
    "connack_refused_identifier_rejected.bin",
    "connack_refused_server_unavailable.bin",
    "connack_refused_bad_username_password.bin",
    "connack_refused_not_authorized.bin",
    "v5_connack_ok.bin",
    "v5_connack_session_present.bin",
    "v5_connack_refused_malformed_packet.bin",
    "v5_connack_refused_not_authorized.bin",
    "publish_qos0_small_0.bin",
    "publish_qos0_small_1.bin",
    "publish_qos0_small_2.bin",
    "publish_qos0_small_3.bin",
    "publish_qos0_retain.bin",
    "publish_qos0_dup.bin",
    "publish_qos1_basic.bin",
    "publish_qos1_dup.bin",
    "publish_qos1_retain.bin",
    "publish_qos2_basic.bin",
    "publish_qos2_dup.bin",
    "publish_qos2_retain.bin",
    "publish_qos0_rl127.bin",
    "publish_qos0_rl128.bin",
    "publish_qos0_rl129.bin",
    "publish_qos1_rl127.bin",
    "publish_qos1_rl128.bin",
    "publish_qos1_rl129.bin",
    "publish_utf8_topic_qos0.bin",
    "publish_utf8_topic_qos1.bin",
    "v5_publish_qos0.bin",
    "v5_publish_qos1.bin",
    "v5_publish_qos2.bin",
    "v5_publish_qos0_rl127.bin",
    "v5_publish_qos0_rl128.bin",
    "v5_publish_qos0_rl129.bin",
    "puback_1.bin",
    "pubrec_1.bin",
    "pubrel_1.bin",
    "pubcomp_1.bin",
    "puback_beef.bin",
    "pubcomp_cafe.bin",
    "v5_puback_min.bin",
    "v5_puback_full.bin",
    "v5_pubrec_min.bin",
    "v5_pubrec_full.bin",
    "v5_pubrel_min.bin",
    "v5_pubcomp_min.bin",
    "suback_single_q0.bin",
    "suback_single_q1.bin",
    "suback_single_q2.bin",
    "suback_single_fail.bin",
    "suback_multi_mixed.bin",
    "v5_suback_q0.bin",
    "v5_suback_q1.bin",
    "v5_suback_q2.bin",
    "v5_suback_fail.bin",
    "pingresp.bin",
    "coalesced_connack_publish_pingresp.bin",
];

#[test]
fn canonical_seed_names_are_generated() {
    let seeds = seeds();
    for name in CANONICAL_SEED_NAMES {
        assert!(
            seeds.iter().any(|s| s.name() == *name),
            "missing seed {name}"
        );
    }
}

#[test]
fn every_seed_is_a_sequence_of_complete_frames() {
    for seed in seeds() {
        let frames = split_frames(&seed.entry.bytes)
            .unwrap_or_else(|| panic!("{} does not split into frames", seed.name()));
        assert!(!frames.is_empty(), "{} is empty", seed.name());
        for frame in &frames {
            assert!(
                matches!(frame.packet_type(), 2..=7 | 9 | 13),
                "{} contains non broker-to-client packet type {}",
                seed.name(),
                frame.packet_type()
            );
        }
    }
}

#[test]
fn pubrel_control_byte_is_always_0x62() {
    for seed in seeds() {
        for frame in split_frames(&seed.entry.bytes).unwrap() {
            if frame.packet_type() == 6 {
                assert_eq!(frame.first_byte, 0x62, "{}", seed.name());
            } else if frame.packet_type() != 3 {
                assert_eq!(frame.flags(), 0, "{}", seed.name());
            }
        }
    }
}

#[test]
fn coalesced_buffers_split_into_connack_publish_pingresp() {
    let seeds = seeds();
    for name in [
        "coalesced_connack_publish_pingresp.bin",
        "v5_coalesced_connack_publish_pingresp.bin",
    ] {
        let seed = seeds.iter().find(|s| s.name() == name).unwrap();
        let frames = split_frames(&seed.entry.bytes).unwrap();
        let types: Vec<u8> = frames.iter().map(|f| f.packet_type()).collect();
        assert_eq!(types, vec![2, 3, 13], "{name}");
        assert!(frames[1].body.ends_with(b"data"));
        assert!(frames[2].body.is_empty());
    }
}

#[test]
fn v3_coalesced_buffer_is_byte_exact() {
    let seeds = seeds();
    let seed = seeds
        .iter()
        .find(|s| s.name() == "coalesced_connack_publish_pingresp.bin")
        .unwrap();
    let mut expected = vec![0x20, 0x02, 0x00, 0x00, 0x30, 0x15, 0x00, 0x0F];
    expected.extend_from_slice(b"coalesced/topic");
    expected.extend_from_slice(b"data");
    expected.extend_from_slice(&[0xD0, 0x00]);
    assert_eq!(&seed.entry.bytes[..], &expected[..]);
}

#[test]
fn utf8_topic_length_prefix_counts_bytes() {
    let seeds = seeds();
    let seed = seeds
        .iter()
        .find(|s| s.name() == "publish_utf8_topic_qos1.bin")
        .unwrap();
    let frame = &split_frames(&seed.entry.bytes).unwrap()[0];
    let topic = "s/温度/°C".as_bytes();
    assert_eq!(frame.first_byte, 0x32);
    assert_eq!(&frame.body[..2], &[0x00, 0x0C]);
    assert_eq!(&frame.body[2..14], topic);
    assert_eq!(&frame.body[14..16], &[0x00, 0x03]);
    assert_eq!(&frame.body[16..], b"ack");
}

#[test]
fn twins_carry_the_phase_selector() {
    let entries: Vec<SeedEntry> = expand_twins(seeds()).collect();
    let entries = by_name(&entries);

    let expectations = [
        ("connack_ok.bin", 0x00),
        ("publish_qos1_basic.bin", 0x01),
        ("suback_single_q2.bin", 0x02),
        ("qos_flow_publish_qos2_pubrel.bin", 0x03),
        ("v5_connack_ok.bin", 0x04),
        ("v5_suback_fail.bin", 0x04),
        ("coalesced_connack_publish_pingresp.bin", 0x01),
    ];
    for (name, selector) in expectations {
        let base = entries[name];
        let twin = entries[format!("dyn_{name}").as_str()];
        assert_eq!(twin.bytes[0], selector, "{name}");
        assert_eq!(&twin.bytes[1..], &base.bytes[..], "{name}");
        assert_eq!(twin.selector.map(u8::from), Some(selector));
    }
    assert!(!entries.contains_key("dyn_pingresp.bin"));
}

#[test]
fn twin_count_matches_phase_targeted_seeds() {
    let seeds = seeds();
    let targeted = seeds.iter().filter(|s| s.phase.is_some()).count();
    let entries: Vec<SeedEntry> = expand_twins(seeds.clone()).collect();
    assert_eq!(entries.len(), seeds.len() + targeted);
    assert_eq!(
        entries.iter().filter(|e| e.name.starts_with("dyn_")).count(),
        targeted
    );
}

proptest! {
    #[test]
    fn any_selector_twin_preserves_frame(index in 0usize..1000, selector in 0u8..=0x0F) {
        let seeds = seeds();
        let seed = &seeds[index % seeds.len()];
        let twin = seed.entry.twin(ModeSelector::new(selector).unwrap());

        prop_assert_eq!(twin.bytes[0] & 0x0F, selector);
        prop_assert_eq!(&twin.bytes[1..], &seed.entry.bytes[..]);
        prop_assert_eq!(twin.name, format!("dyn_{}", seed.name()));
    }
}
