//! End-to-end checks of the public API against bench captures

use std::path::PathBuf;

use imu_prot::config::Config;
use imu_prot::error::ImuProtError;
use imu_prot::imu::crc::{crc32, crc32_bitwise};
use imu_prot::imu::identity::IdentityAssembler;
use imu_prot::imu::protocol::{CRC_OFFSET, SEQUENCER_COMPLEMENT_OFFSET};
use imu_prot::imu::{decode, validate, validate_bytes, ImuPacket, Verdict, PACKET_SIZE};
use imu_prot::input::{parse_hex_line, HexPacketReader};

const GOOD: &str =
    "74951EE10000000000008179CAF6FFFF85FCFFFFC801000079ECFFFFDCE3FFFFF9C30900BA11DF0F";

fn good_bytes() -> Vec<u8> {
    parse_hex_line(GOOD).unwrap().unwrap()
}

fn manifest_path(relative: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join(relative)
}

#[test]
fn test_reference_packet_is_ok() {
    assert_eq!(validate_bytes(&good_bytes()).unwrap(), Verdict::Ok);
}

#[test]
fn test_sequencer_complement_bit_flip() {
    for bit in 0..8 {
        let mut bytes = good_bytes();
        bytes[SEQUENCER_COMPLEMENT_OFFSET] ^= 1 << bit;
        assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadSequencer);
    }
}

#[test]
fn test_payload_bit_flip() {
    let mut bytes = good_bytes();
    bytes[17] ^= 0x04;
    assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadCrc);
}

#[test]
fn test_altered_header() {
    for header in [[0x75, 0x95], [0x95, 0x74], [0x00, 0x00], [0x74, 0x94]] {
        let mut bytes = good_bytes();
        bytes[..2].copy_from_slice(&header);
        assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadHeader);
    }
}

#[test]
fn test_validate_then_decode_same_buffer() {
    let bytes = good_bytes();
    let packet = ImuPacket::new(&bytes).unwrap();

    assert_eq!(validate(&packet), Verdict::Ok);
    let record = decode(&packet);

    assert_eq!(record.sequencer, bytes[2]);
    assert_eq!(record.sequencer_complement, bytes[3]);
    assert_eq!(record.temperature_raw, u16::from_le_bytes([bytes[10], bytes[11]]));
    assert_eq!(
        record.crc,
        u32::from_le_bytes([bytes[36], bytes[37], bytes[38], bytes[39]])
    );
    assert_eq!(record.crc, crc32(&bytes[..CRC_OFFSET]));
}

#[test]
fn test_crc_strategies_agree_on_packets() {
    let bytes = good_bytes();
    for end in 0..=PACKET_SIZE {
        assert_eq!(crc32(&bytes[..end]), crc32_bitwise(&bytes[..end]));
    }
}

#[test]
fn test_short_buffer_is_error_not_verdict() {
    let bytes = good_bytes();
    let result = validate_bytes(&bytes[..PACKET_SIZE - 4]);
    assert!(matches!(result, Err(ImuProtError::PacketTooShort { .. })));
}

#[test]
fn test_shipped_config_loads() {
    let config = Config::load(manifest_path("config/default.toml")).unwrap();
    assert_eq!(config.input.path, "captures/bench.hex");
    assert!(!config.telemetry.enabled);
}

#[tokio::test]
async fn test_bench_capture_verdicts() {
    let file = tokio::fs::File::open(manifest_path("captures/bench.hex"))
        .await
        .unwrap();
    let mut reader = HexPacketReader::new(tokio::io::BufReader::new(file));
    let mut identity = IdentityAssembler::new();
    let mut verdicts = Vec::new();

    while let Some(packet) = reader.next_packet().await.unwrap() {
        let view = ImuPacket::new(&packet.bytes).unwrap();
        let verdict = validate(&view);
        if verdict.is_ok() {
            let record = decode(&view);
            identity.ingest(record.sequencer, record.identity_word);
        }
        verdicts.push(verdict);
    }

    assert_eq!(
        verdicts,
        vec![
            Verdict::Ok,
            Verdict::Ok,
            Verdict::Ok,
            Verdict::Ok,
            Verdict::BadHeader,
            Verdict::BadSequencer,
            Verdict::BadCrc,
        ]
    );

    // Sequencer 0x20 carries the serial-number-high slot
    assert_eq!(identity.block().serial_number_high(), 0x33F);
    assert_eq!(identity.slots_seen(), 4);
    assert!(!identity.is_complete());
}
