//! # Error Types
//!
//! Custom error types for the IMU protocol crate using `thiserror`.
//!
//! Packet validation failures are not errors: they are reported as
//! [`Verdict`](crate::imu::protocol::Verdict) values. This type covers
//! broken preconditions and the I/O around the decoding core.

use thiserror::Error;

/// Main error type for the IMU protocol crate
#[derive(Debug, Error)]
pub enum ImuProtError {
    /// Buffer shorter than one full packet
    #[error("Packet too short: expected {expected} bytes, got {actual}")]
    PacketTooShort { expected: usize, actual: usize },

    /// Hex input could not be converted to bytes
    #[error("Hex decode error: {0}")]
    Hex(#[from] hex::FromHexError),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Telemetry serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Telemetry log management errors
    #[error("Telemetry error: {0}")]
    Telemetry(String),
}

/// Result type alias for the IMU protocol crate
pub type Result<T> = std::result::Result<T, ImuProtError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packet_too_short_message() {
        let err = ImuProtError::PacketTooShort { expected: 40, actual: 12 };
        assert_eq!(err.to_string(), "Packet too short: expected 40 bytes, got 12");
    }

    #[test]
    fn test_hex_error_conversion() {
        let err: ImuProtError = hex::decode("0G").unwrap_err().into();
        assert!(matches!(err, ImuProtError::Hex(_)));
    }
}
