//! # IMU Packet Layout
//!
//! Byte-exact layout of the IMU telemetry packet and a borrowed view that
//! reads each field at its wire offset.
//!
//! ```text
//! offset  size  field
//!      0     2  header (0x9574)
//!      2     1  sequencer
//!      3     1  sequencer complement (!sequencer)
//!      4     4  identity mux word
//!      8     2  status flags
//!     10     2  temperature (centi-Kelvin)
//!     12    12  gyro X/Y/Z (i32, Q15.16)
//!     24    12  accel X/Y/Z (i32, Q15.16)
//!     36     4  CRC32 over bytes 0..36
//! ```
//!
//! All multi-byte fields are little-endian. The packet has no padding.

use std::fmt;

use bytes::Buf;
use serde::Serialize;

use crate::error::{ImuProtError, Result};

/// Packet header tag (bytes `74 95` on the wire)
pub const IMU_PROT_HEADER: u16 = 0x9574;

/// Total packet size in bytes
pub const PACKET_SIZE: usize = 40;

/// Serial line rate of the sensor link in baud
pub const IMU_PROT_BAUDRATE: u32 = 1_000_000;

/// Field offsets
pub const HEADER_OFFSET: usize = 0;
pub const SEQUENCER_OFFSET: usize = 2;
pub const SEQUENCER_COMPLEMENT_OFFSET: usize = 3;
pub const IDENTITY_OFFSET: usize = 4;
pub const STATUS_OFFSET: usize = 8;
pub const TEMPERATURE_OFFSET: usize = 10;
pub const GYRO_OFFSET: usize = 12;
pub const ACCEL_OFFSET: usize = 24;
pub const CRC_OFFSET: usize = 36;

/// Width of a single gyro/accel sample
pub const SAMPLE_SIZE: usize = 4;

/// Number of sensing axes per instrument
pub const AXIS_COUNT: usize = 3;

/// Sensor axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    /// All axes in wire order
    pub const ALL: [Axis; AXIS_COUNT] = [Axis::X, Axis::Y, Axis::Z];

    /// Position of this axis in the wire sample arrays
    pub fn index(self) -> usize {
        match self {
            Axis::X => 0,
            Axis::Y => 1,
            Axis::Z => 2,
        }
    }
}

/// Outcome of validating one packet.
///
/// Variants are ordered by check precedence; only the first failing check
/// is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Verdict {
    /// Header, sequencer and CRC all check out
    Ok = 0,
    /// Header tag is not `0x9574`
    BadHeader = 1,
    /// Sequencer does not match the complement of its redundant copy
    BadSequencer = 2,
    /// Stored CRC32 does not match the computed one
    BadCrc = 3,
}

impl Verdict {
    /// Numeric code as carried by the device firmware tooling
    pub fn code(self) -> u8 {
        self as u8
    }

    pub fn is_ok(self) -> bool {
        self == Verdict::Ok
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = match self {
            Verdict::Ok => "OK",
            Verdict::BadHeader => "invalid header",
            Verdict::BadSequencer => "invalid sequencer",
            Verdict::BadCrc => "CRC validation failed",
        };
        f.write_str(text)
    }
}

/// Borrowed view over exactly one packet's worth of bytes.
///
/// Accessors extract fields at fixed offsets in wire byte order. The view
/// performs no validation of the content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImuPacket<'a> {
    bytes: &'a [u8; PACKET_SIZE],
}

impl<'a> ImuPacket<'a> {
    /// Wrap a caller-owned buffer
    ///
    /// Only the first [`PACKET_SIZE`] bytes are used; trailing bytes are
    /// ignored so callers may over-allocate.
    ///
    /// # Arguments
    ///
    /// * `buffer` - Candidate packet bytes
    ///
    /// # Errors
    ///
    /// Returns [`ImuProtError::PacketTooShort`] if `buffer` holds fewer than
    /// [`PACKET_SIZE`] bytes.
    ///
    /// # Examples
    ///
    /// ```
    /// use imu_prot::imu::protocol::{ImuPacket, PACKET_SIZE};
    ///
    /// let buffer = [0u8; PACKET_SIZE + 8];
    /// let packet = ImuPacket::new(&buffer)?;
    /// assert_eq!(packet.as_bytes().len(), PACKET_SIZE);
    /// # Ok::<(), imu_prot::error::ImuProtError>(())
    /// ```
    pub fn new(buffer: &'a [u8]) -> Result<Self> {
        let bytes = buffer
            .get(..PACKET_SIZE)
            .and_then(|prefix| <&[u8; PACKET_SIZE]>::try_from(prefix).ok())
            .ok_or(ImuProtError::PacketTooShort {
                expected: PACKET_SIZE,
                actual: buffer.len(),
            })?;

        Ok(Self { bytes })
    }

    /// Wrap a buffer that is already exactly one packet long
    pub fn from_array(bytes: &'a [u8; PACKET_SIZE]) -> Self {
        Self { bytes }
    }

    pub fn as_bytes(&self) -> &'a [u8; PACKET_SIZE] {
        self.bytes
    }

    /// Bytes covered by the trailing CRC (everything before the CRC field)
    pub fn crc_covered(&self) -> &'a [u8] {
        &self.bytes[..CRC_OFFSET]
    }

    pub fn header(&self) -> u16 {
        self.field(HEADER_OFFSET).get_u16_le()
    }

    pub fn sequencer(&self) -> u8 {
        self.bytes[SEQUENCER_OFFSET]
    }

    pub fn sequencer_complement(&self) -> u8 {
        self.bytes[SEQUENCER_COMPLEMENT_OFFSET]
    }

    /// Multiplexed identity word carried by this packet
    pub fn identity_word(&self) -> u32 {
        self.field(IDENTITY_OFFSET).get_u32_le()
    }

    /// Raw status flag bitmap
    pub fn status_bits(&self) -> u16 {
        self.field(STATUS_OFFSET).get_u16_le()
    }

    /// Temperature in centi-Kelvin
    pub fn temperature_raw(&self) -> u16 {
        self.field(TEMPERATURE_OFFSET).get_u16_le()
    }

    /// Raw Q15.16 gyro sample for one axis
    pub fn gyro_raw(&self, axis: Axis) -> i32 {
        self.field(GYRO_OFFSET + axis.index() * SAMPLE_SIZE).get_i32_le()
    }

    /// Raw Q15.16 accelerometer sample for one axis
    pub fn accel_raw(&self, axis: Axis) -> i32 {
        self.field(ACCEL_OFFSET + axis.index() * SAMPLE_SIZE).get_i32_le()
    }

    /// CRC32 as stored in the trailing field
    pub fn stored_crc(&self) -> u32 {
        self.field(CRC_OFFSET).get_u32_le()
    }

    fn field(&self, offset: usize) -> &'a [u8] {
        &self.bytes[offset..]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::imu::test_vectors::{packet_bytes, VALID_PACKETS};

    #[test]
    fn test_layout_is_tightly_packed() {
        assert_eq!(SEQUENCER_OFFSET, HEADER_OFFSET + 2);
        assert_eq!(SEQUENCER_COMPLEMENT_OFFSET, SEQUENCER_OFFSET + 1);
        assert_eq!(IDENTITY_OFFSET, SEQUENCER_COMPLEMENT_OFFSET + 1);
        assert_eq!(STATUS_OFFSET, IDENTITY_OFFSET + 4);
        assert_eq!(TEMPERATURE_OFFSET, STATUS_OFFSET + 2);
        assert_eq!(GYRO_OFFSET, TEMPERATURE_OFFSET + 2);
        assert_eq!(ACCEL_OFFSET, GYRO_OFFSET + AXIS_COUNT * SAMPLE_SIZE);
        assert_eq!(CRC_OFFSET, ACCEL_OFFSET + AXIS_COUNT * SAMPLE_SIZE);
        assert_eq!(PACKET_SIZE, CRC_OFFSET + 4);
    }

    #[test]
    fn test_header_wire_bytes() {
        assert_eq!(IMU_PROT_HEADER.to_le_bytes(), [0x74, 0x95]);
    }

    #[test]
    fn test_baudrate() {
        assert_eq!(IMU_PROT_BAUDRATE, 1_000_000);
    }

    #[test]
    fn test_from_array_matches_slice_view() {
        let buffer = packet_bytes(VALID_PACKETS[2]);
        let mut array = [0u8; PACKET_SIZE];
        array.copy_from_slice(&buffer);

        let from_array = ImuPacket::from_array(&array);
        let from_slice = ImuPacket::new(&buffer).unwrap();

        assert_eq!(from_array.as_bytes(), from_slice.as_bytes());
        assert_eq!(from_array.sequencer(), 0x20);
        assert_eq!(from_array.identity_word(), 0x33F);
        assert_eq!(from_array.stored_crc(), from_slice.stored_crc());
    }

    #[test]
    fn test_packet_too_short() {
        let buffer = [0u8; PACKET_SIZE - 1];
        match ImuPacket::new(&buffer) {
            Err(ImuProtError::PacketTooShort { expected, actual }) => {
                assert_eq!(expected, PACKET_SIZE);
                assert_eq!(actual, PACKET_SIZE - 1);
            }
            other => panic!("Expected PacketTooShort, got: {:?}", other),
        }
    }

    #[test]
    fn test_packet_ignores_trailing_bytes() {
        let mut buffer = packet_bytes(VALID_PACKETS[0]);
        buffer.extend_from_slice(&[0xAA; 16]);

        let packet = ImuPacket::new(&buffer).unwrap();
        assert_eq!(packet.as_bytes().len(), PACKET_SIZE);
        assert_eq!(packet.stored_crc(), 0x0FDF_11BA);
    }

    #[test]
    fn test_field_accessors_first_capture() {
        let buffer = packet_bytes(VALID_PACKETS[0]);
        let packet = ImuPacket::new(&buffer).unwrap();

        assert_eq!(packet.header(), IMU_PROT_HEADER);
        assert_eq!(packet.sequencer(), 0x1E);
        assert_eq!(packet.sequencer_complement(), 0xE1);
        assert_eq!(packet.identity_word(), 0);
        assert_eq!(packet.status_bits(), 0);
        assert_eq!(packet.temperature_raw(), 31105);
        assert_eq!(packet.gyro_raw(Axis::X), -2358);
        assert_eq!(packet.gyro_raw(Axis::Y), -891);
        assert_eq!(packet.gyro_raw(Axis::Z), 456);
        assert_eq!(packet.accel_raw(Axis::X), -4999);
        assert_eq!(packet.accel_raw(Axis::Y), -7204);
        assert_eq!(packet.accel_raw(Axis::Z), 639993);
        assert_eq!(packet.stored_crc(), 0x0FDF_11BA);
        assert_eq!(packet.crc_covered().len(), CRC_OFFSET);
    }

    #[test]
    fn test_identity_word_little_endian() {
        // Third capture carries 0x0000033F in the mux slot
        let buffer = packet_bytes(VALID_PACKETS[2]);
        let packet = ImuPacket::new(&buffer).unwrap();
        assert_eq!(packet.identity_word(), 0x0000_033F);
    }

    #[test]
    fn test_verdict_codes() {
        assert_eq!(Verdict::Ok.code(), 0);
        assert_eq!(Verdict::BadHeader.code(), 1);
        assert_eq!(Verdict::BadSequencer.code(), 2);
        assert_eq!(Verdict::BadCrc.code(), 3);
        assert!(Verdict::Ok.is_ok());
        assert!(!Verdict::BadCrc.is_ok());
    }

    #[test]
    fn test_verdict_display() {
        assert_eq!(Verdict::Ok.to_string(), "OK");
        assert_eq!(Verdict::BadHeader.to_string(), "invalid header");
        assert_eq!(Verdict::BadSequencer.to_string(), "invalid sequencer");
        assert_eq!(Verdict::BadCrc.to_string(), "CRC validation failed");
    }

    #[test]
    fn test_axis_indices() {
        let indices: Vec<usize> = Axis::ALL.iter().map(|a| a.index()).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }
}
