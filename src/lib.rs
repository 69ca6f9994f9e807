//! # IMU Protocol Library
//!
//! Validation and decoding of fixed-layout binary telemetry packets from an
//! inertial measurement unit.
//!
//! The [`imu`] module is the core: a pure, stateless pipeline that checks
//! the header, the sequencer redundancy byte and the CRC32 of a packet, and
//! independently decodes its readings into engineering units. The remaining
//! modules are the tooling around it: hex capture input, JSONL telemetry
//! logging and configuration.

pub mod config;
pub mod error;
pub mod imu;
pub mod input;
pub mod telemetry;
