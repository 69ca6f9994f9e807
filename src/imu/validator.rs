//! # IMU Packet Validator
//!
//! Runs the header, sequencer and CRC checks in that fixed order and stops
//! at the first failure.

use tracing::{debug, trace};

use super::crc::crc32;
use super::protocol::{ImuPacket, Verdict, IMU_PROT_HEADER};
use crate::error::Result;

/// Validate one packet
///
/// # Arguments
///
/// * `packet` - Packet view to inspect
///
/// # Returns
///
/// * `Verdict` - [`Verdict::Ok`] or the first failing check
///
/// # Examples
///
/// ```
/// use imu_prot::imu::protocol::{ImuPacket, Verdict};
/// use imu_prot::imu::validator::validate;
///
/// let bytes = hex::decode(
///     "74951EE10000000000008179CAF6FFFF85FCFFFFC801000079ECFFFFDCE3FFFFF9C30900BA11DF0F",
/// )?;
/// let packet = ImuPacket::new(&bytes)?;
/// assert_eq!(validate(&packet), Verdict::Ok);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn validate(packet: &ImuPacket<'_>) -> Verdict {
    let header = packet.header();
    if header != IMU_PROT_HEADER {
        debug!("Invalid header: expected 0x{:04X}, got 0x{:04X}", IMU_PROT_HEADER, header);
        return Verdict::BadHeader;
    }

    let sequencer = packet.sequencer();
    let complement = packet.sequencer_complement();
    if sequencer != !complement {
        debug!(
            "Sequencer mismatch: 0x{:02X} is not the complement of 0x{:02X}",
            sequencer, complement
        );
        return Verdict::BadSequencer;
    }

    let calculated_crc = crc32(packet.crc_covered());
    let stored_crc = packet.stored_crc();
    if calculated_crc != stored_crc {
        debug!(
            "CRC mismatch: calculated 0x{:08X}, stored 0x{:08X}",
            calculated_crc, stored_crc
        );
        return Verdict::BadCrc;
    }

    trace!("Packet 0x{:02X} valid", sequencer);
    Verdict::Ok
}

/// Validate a raw byte buffer
///
/// # Errors
///
/// Returns [`ImuProtError::PacketTooShort`](crate::error::ImuProtError::PacketTooShort)
/// if the buffer cannot hold a packet. Content failures are reported through
/// the returned [`Verdict`], never as errors.
pub fn validate_bytes(buffer: &[u8]) -> Result<Verdict> {
    Ok(validate(&ImuPacket::new(buffer)?))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ImuProtError;
    use crate::imu::crc::crc32;
    use crate::imu::protocol::{CRC_OFFSET, PACKET_SIZE, SEQUENCER_COMPLEMENT_OFFSET};
    use crate::imu::test_vectors::{packet_bytes, BROKEN_PACKETS, VALID_PACKETS};

    /// Rewrite the trailing CRC so the packet content is self-consistent
    fn reseal(bytes: &mut [u8]) {
        let crc = crc32(&bytes[..CRC_OFFSET]);
        bytes[CRC_OFFSET..PACKET_SIZE].copy_from_slice(&crc.to_le_bytes());
    }

    #[test]
    fn test_valid_captures() {
        for hex in VALID_PACKETS {
            let bytes = packet_bytes(hex);
            assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::Ok, "packet {}", hex);
        }
    }

    #[test]
    fn test_broken_captures() {
        let verdicts: Vec<Verdict> = BROKEN_PACKETS
            .iter()
            .map(|hex| validate_bytes(&packet_bytes(hex)).unwrap())
            .collect();

        assert_eq!(
            verdicts,
            vec![Verdict::BadHeader, Verdict::BadSequencer, Verdict::BadCrc]
        );
    }

    #[test]
    fn test_bad_header_even_with_valid_crc() {
        let mut bytes = packet_bytes(VALID_PACKETS[0]);
        bytes[0] = 0x75;
        reseal(&mut bytes);

        assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadHeader);
    }

    #[test]
    fn test_bad_header_masks_other_failures() {
        let mut bytes = packet_bytes(VALID_PACKETS[0]);
        bytes[1] = 0x00;
        bytes[SEQUENCER_COMPLEMENT_OFFSET] = 0x00;
        bytes[CRC_OFFSET] ^= 0xFF;

        assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadHeader);
    }

    #[test]
    fn test_bad_sequencer_even_with_valid_crc() {
        let mut bytes = packet_bytes(VALID_PACKETS[0]);
        bytes[SEQUENCER_COMPLEMENT_OFFSET] ^= 0x10;
        reseal(&mut bytes);

        assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadSequencer);
    }

    #[test]
    fn test_every_sequencer_complement_pair() {
        let mut bytes = packet_bytes(VALID_PACKETS[0]);

        for sequencer in 0..=255u8 {
            bytes[2] = sequencer;
            bytes[SEQUENCER_COMPLEMENT_OFFSET] = !sequencer;
            reseal(&mut bytes);
            assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::Ok);

            bytes[SEQUENCER_COMPLEMENT_OFFSET] = sequencer;
            reseal(&mut bytes);
            assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::BadSequencer);
        }
    }

    #[test]
    fn test_any_payload_bit_flip_is_bad_crc() {
        let original = packet_bytes(VALID_PACKETS[1]);

        for byte in 4..PACKET_SIZE {
            for bit in 0..8 {
                let mut bytes = original.clone();
                bytes[byte] ^= 1 << bit;
                assert_eq!(
                    validate_bytes(&bytes).unwrap(),
                    Verdict::BadCrc,
                    "flip of bit {} in byte {}",
                    bit,
                    byte
                );
            }
        }
    }

    #[test]
    fn test_status_flags_do_not_reject() {
        let mut bytes = packet_bytes(VALID_PACKETS[0]);
        bytes[8] = 0xFF;
        bytes[9] = 0xFF;
        reseal(&mut bytes);

        assert_eq!(validate_bytes(&bytes).unwrap(), Verdict::Ok);
    }

    #[test]
    fn test_validation_does_not_mutate_buffer() {
        let bytes = packet_bytes(BROKEN_PACKETS[2]);
        let before = bytes.clone();
        let _ = validate_bytes(&bytes).unwrap();
        assert_eq!(bytes, before);
    }

    #[test]
    fn test_short_buffer() {
        let result = validate_bytes(&[0x74, 0x95, 0x1E, 0xE1]);
        assert!(matches!(
            result,
            Err(ImuProtError::PacketTooShort { expected: PACKET_SIZE, actual: 4 })
        ));
    }

    #[test]
    fn test_all_zero_buffer() {
        assert_eq!(validate_bytes(&[0u8; PACKET_SIZE]).unwrap(), Verdict::BadHeader);
    }
}
