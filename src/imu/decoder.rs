//! # IMU Packet Decoder
//!
//! Extracts every packet field and converts the fixed-point readings into
//! engineering units. Decoding never validates; run the
//! [validator](super::validator) first when the content matters, or decode a
//! corrupt packet on purpose for diagnostics.

use serde::Serialize;

use super::convert::{sample_to_engineering, temperature_to_engineering};
use super::protocol::{Axis, ImuPacket, AXIS_COUNT};
use super::status::StatusFlags;
use crate::error::Result;

/// Three-axis reading in engineering units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// Convert three Q15.16 samples
    pub fn from_samples(raw: [i32; AXIS_COUNT]) -> Self {
        Self {
            x: sample_to_engineering(raw[0]),
            y: sample_to_engineering(raw[1]),
            z: sample_to_engineering(raw[2]),
        }
    }

    pub fn get(&self, axis: Axis) -> f32 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
            Axis::Z => self.z,
        }
    }

    /// Euclidean norm
    pub fn magnitude(&self) -> f32 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }
}

/// Decoded packet content
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PacketRecord {
    /// Header tag as received
    pub header: u16,

    /// Rolling sequence value
    pub sequencer: u8,

    /// Redundant copy of the sequencer (complemented)
    pub sequencer_complement: u8,

    /// Multiplexed identity word
    pub identity_word: u32,

    /// Sensor health flags
    pub status: StatusFlags,

    /// Temperature in centi-Kelvin
    pub temperature_raw: u16,

    /// Temperature in °C
    pub temperature: f32,

    /// Raw Q15.16 gyro samples
    pub gyro_raw: [i32; AXIS_COUNT],

    /// Angular rate per axis
    pub gyro: Vector3,

    /// Raw Q15.16 accelerometer samples
    pub accel_raw: [i32; AXIS_COUNT],

    /// Acceleration per axis
    pub accel: Vector3,

    /// CRC32 as stored in the packet
    pub crc: u32,
}

/// Decode a packet into engineering units
///
/// # Arguments
///
/// * `packet` - Packet view, validated or not
///
/// # Returns
///
/// * `PacketRecord` - Every field, raw and converted
pub fn decode(packet: &ImuPacket<'_>) -> PacketRecord {
    let gyro_raw = Axis::ALL.map(|axis| packet.gyro_raw(axis));
    let accel_raw = Axis::ALL.map(|axis| packet.accel_raw(axis));
    let temperature_raw = packet.temperature_raw();

    PacketRecord {
        header: packet.header(),
        sequencer: packet.sequencer(),
        sequencer_complement: packet.sequencer_complement(),
        identity_word: packet.identity_word(),
        status: StatusFlags::from_raw(packet.status_bits()),
        temperature_raw,
        temperature: temperature_to_engineering(temperature_raw),
        gyro_raw,
        gyro: Vector3::from_samples(gyro_raw),
        accel_raw,
        accel: Vector3::from_samples(accel_raw),
        crc: packet.stored_crc(),
    }
}

/// Decode a raw byte buffer
///
/// # Errors
///
/// Returns error if the buffer is shorter than one packet
pub fn decode_bytes(buffer: &[u8]) -> Result<PacketRecord> {
    Ok(decode(&ImuPacket::new(buffer)?))
}
