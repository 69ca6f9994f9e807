//! # CRC32 Implementation
//!
//! Reflected CRC32 (IEEE 802.3 / zlib) used for packet integrity.
//!
//! **Polynomial**: 0xEDB88320 (reflected 0x04C11DB7)
//! **Initial Value**: 0xFFFFFFFF
//! **Final XOR**: 0xFFFFFFFF

/// Reflected CRC32 polynomial
pub const CRC32_POLY: u32 = 0xEDB8_8320;

/// Initial register value, also used as the final XOR mask
pub const CRC32_INITIAL: u32 = 0xFFFF_FFFF;

/// CRC32 of any intact message followed by its own little-endian CRC
pub const CRC32_RESIDUE: u32 = 0x2144_DF1C;

/// Precomputed CRC32 lookup table for fast calculation
const CRC32_TABLE: [u32; 256] = generate_crc32_table();

/// Generate CRC32 lookup table at compile time
const fn generate_crc32_table() -> [u32; 256] {
    let mut table = [0u32; 256];
    let mut i = 0;

    while i < 256 {
        let mut crc = i as u32;
        let mut j = 0;

        while j < 8 {
            if (crc & 1) != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
            j += 1;
        }

        table[i] = crc;
        i += 1;
    }

    table
}

/// Calculate CRC32 checksum using lookup table (fast)
///
/// # Arguments
///
/// * `data` - Byte slice to calculate CRC for
///
/// # Returns
///
/// * `u32` - Calculated CRC32 checksum
///
/// # Examples
///
/// ```
/// use imu_prot::imu::crc::crc32;
///
/// assert_eq!(crc32(b"123456789"), 0xCBF4_3926);
/// ```
pub fn crc32(data: &[u8]) -> u32 {
    let mut crc = CRC32_INITIAL;

    for &byte in data {
        crc = CRC32_TABLE[((crc ^ byte as u32) & 0xFF) as usize] ^ (crc >> 8);
    }

    crc ^ CRC32_INITIAL
}

/// Calculate CRC32 checksum using direct polynomial division (slow)
///
/// Produces the same result as [`crc32`] for every input; kept as the
/// reference the table is checked against.
pub fn crc32_bitwise(data: &[u8]) -> u32 {
    let mut crc = CRC32_INITIAL;

    for &byte in data {
        crc ^= byte as u32;

        for _ in 0..8 {
            if (crc & 1) != 0 {
                crc = (crc >> 1) ^ CRC32_POLY;
            } else {
                crc >>= 1;
            }
        }
    }

    crc ^ CRC32_INITIAL
}

/// Check a message that ends with its own little-endian CRC32.
///
/// Running the CRC over the message and its appended checksum yields
/// [`CRC32_RESIDUE`] exactly when the checksum matches.
pub fn crc32_residue_ok(data_with_crc: &[u8]) -> bool {
    crc32(data_with_crc) == CRC32_RESIDUE
}
