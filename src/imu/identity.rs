//! # Identity Block
//!
//! Each packet carries one 32-bit word of a 32-word identity structure
//! (serial numbers, firmware version, build date, hardware type, packet
//! rate). The word's slot is selected by the low five bits of the packet
//! sequencer, so a full block is rebuilt after 32 consecutive packets.
//!
//! Word layout:
//!
//! | Word | Content |
//! |------|---------|
//! | 0 | serial number, high part |
//! | 1 | hardware revision |
//! | 2 | external temperature |
//! | 3 | internal temperature |
//! | 4 | external pressure |
//! | 5 | power |
//! | 6 | serial id |
//! | 7 | human-readable serial |
//! | 8 | current |
//! | 9 | short git hash |
//! | 10 | firmware version (low half), software revision (high half) |
//! | 11 | build date (low half), hardware type (high half) |
//! | 12 | packet rate (low half), reserved (high half) |
//! | 13-31 | unused |

use std::fmt;

/// Number of 32-bit words in the identity block
pub const IDENTITY_WORDS: usize = 32;

/// Mask applied to the sequencer to select the identity slot
pub const IDENTITY_SLOT_MASK: u8 = 0x1F;

/// Number of leading words that carry data
pub const IDENTITY_USED_WORDS: usize = 13;

const USED_SLOTS: u32 = (1 << IDENTITY_USED_WORDS) - 1;

/// Identity slot carried by a packet with the given sequencer
pub fn identity_slot(sequencer: u8) -> usize {
    (sequencer & IDENTITY_SLOT_MASK) as usize
}

/// Firmware version packed as `major(3).minor(5).build(8)`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct FirmwareVersion {
    raw: u16,
}

impl FirmwareVersion {
    pub fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Bits 13-15
    pub fn major(&self) -> u8 {
        (self.raw >> 13) as u8
    }

    /// Bits 8-12
    pub fn minor(&self) -> u8 {
        ((self.raw >> 8) & 0x1F) as u8
    }

    /// Bits 0-7
    pub fn build(&self) -> u8 {
        (self.raw & 0xFF) as u8
    }
}

impl fmt::Display for FirmwareVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major(), self.minor(), self.build())
    }
}

/// Firmware build date packed as `year(7).month(4).day(5)`
///
/// The year is an offset from the vendor's epoch and is reported as-is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct BuildDate {
    raw: u16,
}

impl BuildDate {
    pub fn from_raw(raw: u16) -> Self {
        Self { raw }
    }

    pub fn raw(&self) -> u16 {
        self.raw
    }

    /// Bits 9-15
    pub fn year(&self) -> u8 {
        (self.raw >> 9) as u8
    }

    /// Bits 5-8
    pub fn month(&self) -> u8 {
        ((self.raw >> 5) & 0x0F) as u8
    }

    /// Bits 0-4
    pub fn day(&self) -> u8 {
        (self.raw & 0x1F) as u8
    }
}

impl fmt::Display for BuildDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.year(), self.month(), self.day())
    }
}

/// Complete 32-word identity structure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityBlock {
    words: [u32; IDENTITY_WORDS],
}

impl IdentityBlock {
    pub fn from_words(words: [u32; IDENTITY_WORDS]) -> Self {
        Self { words }
    }

    pub fn words(&self) -> &[u32; IDENTITY_WORDS] {
        &self.words
    }

    pub fn serial_number_high(&self) -> u32 {
        self.words[0]
    }

    pub fn hardware_revision(&self) -> i32 {
        self.words[1] as i32
    }

    pub fn external_temperature(&self) -> i32 {
        self.words[2] as i32
    }

    pub fn internal_temperature(&self) -> i32 {
        self.words[3] as i32
    }

    pub fn external_pressure(&self) -> i32 {
        self.words[4] as i32
    }

    pub fn power(&self) -> i32 {
        self.words[5] as i32
    }

    pub fn serial_id(&self) -> u32 {
        self.words[6]
    }

    pub fn human_serial(&self) -> u32 {
        self.words[7]
    }

    pub fn current(&self) -> i32 {
        self.words[8] as i32
    }

    pub fn git_short(&self) -> u32 {
        self.words[9]
    }

    pub fn firmware_version(&self) -> FirmwareVersion {
        FirmwareVersion::from_raw(low_half(self.words[10]))
    }

    pub fn software_revision(&self) -> i16 {
        high_half(self.words[10]) as i16
    }

    pub fn build_date(&self) -> BuildDate {
        BuildDate::from_raw(low_half(self.words[11]))
    }

    pub fn hardware_type(&self) -> u16 {
        high_half(self.words[11])
    }

    /// Packet rate in Hz
    pub fn packet_rate(&self) -> u16 {
        low_half(self.words[12])
    }
}

fn low_half(word: u32) -> u16 {
    (word & 0xFFFF) as u16
}

fn high_half(word: u32) -> u16 {
    (word >> 16) as u16
}

/// Collects mux words from successive packets into an [`IdentityBlock`].
///
/// Owned by the caller; the validator and decoder never touch it. Feed it
/// only packets that passed validation.
#[derive(Debug, Clone, Default)]
pub struct IdentityAssembler {
    words: [u32; IDENTITY_WORDS],
    seen: u32,
}

impl IdentityAssembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the mux word carried by a packet with the given sequencer
    pub fn ingest(&mut self, sequencer: u8, word: u32) {
        let slot = identity_slot(sequencer);
        self.words[slot] = word;
        self.seen |= 1 << slot;
    }

    /// Number of distinct slots received so far
    pub fn slots_seen(&self) -> u32 {
        self.seen.count_ones()
    }

    /// True once every data-carrying slot has been received
    pub fn is_complete(&self) -> bool {
        self.seen & USED_SLOTS == USED_SLOTS
    }

    /// Snapshot of the block; slots not yet received read as zero
    pub fn block(&self) -> IdentityBlock {
        IdentityBlock::from_words(self.words)
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }
}
