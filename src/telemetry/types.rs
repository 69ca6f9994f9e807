//! Telemetry record types

use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::imu::decoder::PacketRecord;
use crate::imu::protocol::Verdict;

/// One JSONL line: a decoded packet and the verdict it received
#[derive(Debug, Clone, Serialize)]
pub struct TelemetryEntry {
    /// Host receive time, RFC 3339 UTC with microseconds
    pub timestamp: String,

    /// Line of the capture the packet came from
    pub line: usize,

    pub verdict: Verdict,

    pub packet: PacketRecord,
}

impl TelemetryEntry {
    /// Stamp a packet with the current UTC time
    pub fn new(line: usize, verdict: Verdict, packet: PacketRecord) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
            line,
            verdict,
            packet,
        }
    }
}
