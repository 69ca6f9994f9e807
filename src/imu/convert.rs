//! # Fixed-Point Conversions
//!
//! Wire representations to engineering units and back.
//!
//! - Temperature travels as unsigned centi-Kelvin.
//! - Gyro and accelerometer samples travel as signed Q15.16 (1 sign bit,
//!   15 integer bits, 16 fractional bits).

/// Offset between Kelvin and Celsius
pub const KELVIN_OFFSET: f32 = 273.15;

/// Weight of one least significant bit of a Q15.16 sample
pub const SAMPLE_SCALE: f32 = 1.0 / 65536.0;

/// Convert centi-Kelvin to degrees Celsius
///
/// # Arguments
///
/// * `raw` - Temperature in hundredths of a Kelvin
///
/// # Returns
///
/// * `f32` - Temperature in °C (negative below freezing)
///
/// # Examples
///
/// ```
/// use imu_prot::imu::convert::temperature_to_engineering;
///
/// let celsius = temperature_to_engineering(29815);
/// assert!((celsius - 25.0).abs() < 0.001);
/// ```
pub fn temperature_to_engineering(raw: u16) -> f32 {
    0.01 * raw as f32 - KELVIN_OFFSET
}

/// Convert degrees Celsius to centi-Kelvin
///
/// Rounds to the nearest hundredth of a Kelvin. Values below absolute zero
/// clamp to 0 and values beyond the u16 range clamp to `u16::MAX`; NaN
/// maps to 0.
pub fn engineering_to_temperature(celsius: f32) -> u16 {
    // `as` saturates and maps NaN to zero
    ((celsius + KELVIN_OFFSET) * 100.0).round() as u16
}

/// Convert a Q15.16 sample to engineering units
pub fn sample_to_engineering(raw: i32) -> f32 {
    raw as f32 * SAMPLE_SCALE
}

/// Convert an engineering value to the nearest Q15.16 sample, saturating at
/// the i32 range.
pub fn engineering_to_sample(value: f32) -> i32 {
    (value * 65536.0).round() as i32
}
