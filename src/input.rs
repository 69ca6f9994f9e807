//! # Hex Packet Input
//!
//! Reads captured packets written as hex text, one packet per line.
//!
//! Blank lines are skipped, `#` starts a comment that runs to the end of the
//! line and whitespace inside the hex digits is ignored, so both
//! `74951EE1...` and `74 95 1E E1 ...` are accepted.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::trace;

use crate::error::Result;

/// One packet read from hex input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HexPacket {
    /// 1-based line number in the input
    pub line: usize,

    /// Decoded bytes
    pub bytes: Vec<u8>,
}

/// Convert one line of input to bytes
///
/// # Returns
///
/// * `Ok(None)` - The line holds no packet (blank or comment only)
/// * `Ok(Some(bytes))` - Decoded packet bytes
///
/// # Errors
///
/// Returns error if the line contains non-hex characters or an odd number
/// of digits
///
/// # Examples
///
/// ```
/// use imu_prot::input::parse_hex_line;
///
/// assert_eq!(parse_hex_line("74 95 # header").unwrap(), Some(vec![0x74, 0x95]));
/// assert_eq!(parse_hex_line("   # comment").unwrap(), None);
/// ```
pub fn parse_hex_line(line: &str) -> Result<Option<Vec<u8>>> {
    let content = line.split('#').next().unwrap_or_default();
    let digits: String = content.chars().filter(|c| !c.is_whitespace()).collect();

    if digits.is_empty() {
        return Ok(None);
    }

    Ok(Some(hex::decode(digits)?))
}

/// Streams [`HexPacket`]s from an async reader
pub struct HexPacketReader<R> {
    lines: Lines<R>,
    line: usize,
}

impl<R: AsyncBufRead + Unpin> HexPacketReader<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line: 0,
        }
    }

    /// Line number of the most recently read line
    pub fn line(&self) -> usize {
        self.line
    }

    /// Read the next packet, skipping lines that hold none
    ///
    /// # Returns
    ///
    /// * `Ok(None)` at end of input
    ///
    /// # Errors
    ///
    /// Returns error on I/O failure or malformed hex. The reader stays usable
    /// after a hex error; the next call continues with the following line.
    pub async fn next_packet(&mut self) -> Result<Option<HexPacket>> {
        while let Some(text) = self.lines.next_line().await? {
            self.line += 1;

            if let Some(bytes) = parse_hex_line(&text)? {
                trace!("Read {} bytes from line {}", bytes.len(), self.line);
                return Ok(Some(HexPacket {
                    line: self.line,
                    bytes,
                }));
            }
        }

        Ok(None)
    }
}
