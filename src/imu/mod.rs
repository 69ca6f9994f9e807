//! # IMU Protocol Module
//!
//! Validation and decoding of fixed-layout IMU telemetry packets.
//!
//! This module handles:
//! - Packet layout and little-endian field extraction
//! - Header, sequencer redundancy and CRC32 checks
//! - Centi-Kelvin and Q15.16 conversion to engineering units
//! - Status flags and the multiplexed identity block
//!
//! Every function here is a pure transform of its input; nothing keeps
//! state between packets.

pub mod protocol;
pub mod crc;
pub mod convert;
pub mod status;
pub mod identity;
pub mod validator;
pub mod decoder;

pub use decoder::{decode, decode_bytes, PacketRecord, Vector3};
pub use protocol::{Axis, ImuPacket, Verdict, IMU_PROT_HEADER, PACKET_SIZE};
pub use status::StatusFlags;
pub use validator::{validate, validate_bytes};
