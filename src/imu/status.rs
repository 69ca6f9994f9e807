//! Status flag register carried in every IMU packet

use bitflags::bitflags;
use serde::{Serialize, Serializer};

use super::protocol::Axis;

bitflags! {
    /// Sensor health bitmap (16 bits)
    ///
    /// Flags are informational: none of them causes a packet to be rejected.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StatusFlags: u16 {
        /// General error condition
        const ERROR = 1 << 0;
        /// Thermostat not ready
        const THERMOSTAT_NOT_READY = 1 << 1;
        /// Gyroscope not ready
        const GYRO_NOT_READY = 1 << 2;
        /// Supply over-voltage
        const OVER_VOLTAGE = 1 << 3;
        /// Supply under-voltage
        const UNDER_VOLTAGE = 1 << 4;
        /// Over-temperature condition
        const OVER_TEMPERATURE = 1 << 5;
        /// Under-temperature condition
        const UNDER_TEMPERATURE = 1 << 6;
        /// PPS signal not locked
        const PPS_NOT_LOCKED = 1 << 7;
        /// Gyroscope X axis out of range
        const GYRO_X_OUT_OF_RANGE = 1 << 8;
        /// Gyroscope Y axis out of range
        const GYRO_Y_OUT_OF_RANGE = 1 << 9;
        /// Gyroscope Z axis out of range
        const GYRO_Z_OUT_OF_RANGE = 1 << 10;
        /// Accelerometer X axis out of range
        const ACCEL_X_OUT_OF_RANGE = 1 << 11;
        /// Accelerometer Y axis out of range
        const ACCEL_Y_OUT_OF_RANGE = 1 << 12;
        /// Accelerometer Z axis out of range
        const ACCEL_Z_OUT_OF_RANGE = 1 << 13;
        // Bits 14-15 reserved

        /// All gyroscope range flags
        const GYRO_OUT_OF_RANGE = Self::GYRO_X_OUT_OF_RANGE.bits()
            | Self::GYRO_Y_OUT_OF_RANGE.bits() | Self::GYRO_Z_OUT_OF_RANGE.bits();
        /// All accelerometer range flags
        const ACCEL_OUT_OF_RANGE = Self::ACCEL_X_OUT_OF_RANGE.bits()
            | Self::ACCEL_Y_OUT_OF_RANGE.bits() | Self::ACCEL_Z_OUT_OF_RANGE.bits();
    }
}

/// Mask of the two reserved high bits
const RESERVED_MASK: u16 = 0xC000;

impl StatusFlags {
    /// Build from the wire value, keeping reserved bits intact
    pub fn from_raw(raw: u16) -> Self {
        Self::from_bits_retain(raw)
    }

    pub fn is_error(&self) -> bool {
        self.contains(Self::ERROR)
    }

    pub fn is_thermostat_not_ready(&self) -> bool {
        self.contains(Self::THERMOSTAT_NOT_READY)
    }

    pub fn is_gyro_not_ready(&self) -> bool {
        self.contains(Self::GYRO_NOT_READY)
    }

    pub fn is_over_voltage(&self) -> bool {
        self.contains(Self::OVER_VOLTAGE)
    }

    pub fn is_under_voltage(&self) -> bool {
        self.contains(Self::UNDER_VOLTAGE)
    }

    pub fn is_over_temperature(&self) -> bool {
        self.contains(Self::OVER_TEMPERATURE)
    }

    pub fn is_under_temperature(&self) -> bool {
        self.contains(Self::UNDER_TEMPERATURE)
    }

    pub fn is_pps_not_locked(&self) -> bool {
        self.contains(Self::PPS_NOT_LOCKED)
    }

    /// Returns true if the PPS input is locked
    pub fn is_pps_locked(&self) -> bool {
        !self.contains(Self::PPS_NOT_LOCKED)
    }

    /// Returns true if the gyroscope reports the given axis out of range
    pub fn gyro_out_of_range(&self, axis: Axis) -> bool {
        let flag = match axis {
            Axis::X => Self::GYRO_X_OUT_OF_RANGE,
            Axis::Y => Self::GYRO_Y_OUT_OF_RANGE,
            Axis::Z => Self::GYRO_Z_OUT_OF_RANGE,
        };
        self.contains(flag)
    }

    /// Returns true if the accelerometer reports the given axis out of range
    pub fn accel_out_of_range(&self, axis: Axis) -> bool {
        let flag = match axis {
            Axis::X => Self::ACCEL_X_OUT_OF_RANGE,
            Axis::Y => Self::ACCEL_Y_OUT_OF_RANGE,
            Axis::Z => Self::ACCEL_Z_OUT_OF_RANGE,
        };
        self.contains(flag)
    }

    /// Returns true if any gyro or accel axis is out of range
    pub fn any_out_of_range(&self) -> bool {
        self.intersects(Self::GYRO_OUT_OF_RANGE | Self::ACCEL_OUT_OF_RANGE)
    }

    /// Value of the reserved bits 14-15, shifted down
    pub fn reserved(&self) -> u8 {
        ((self.bits() & RESERVED_MASK) >> 14) as u8
    }
}

impl Serialize for StatusFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}
