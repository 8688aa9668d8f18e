//! Card-side constants and types for MIFARE Classic / ISO 14443-A.

/// REQuest command, type A. Sent as a 7-bit short frame, invites idle cards.
pub const REQA: u8 = 0x26;
/// Wake-up command, type A. Also addresses halted cards.
pub const WUPA: u8 = 0x52;
/// Anticollision, cascade level 1.
pub const ANTICOLL_CL1: [u8; 2] = [0x93, 0x20];
/// Select, cascade level 1.
pub const SELECT_CL1: [u8; 2] = [0x93, 0x70];
/// Anticollision, cascade level 2. 7-byte UIDs are not driven by this crate.
pub const ANTICOLL_CL2: [u8; 2] = [0x95, 0x20];
/// Select, cascade level 2.
pub const SELECT_CL2: [u8; 2] = [0x95, 0x70];
/// Halt command, type A.
pub const HALT: [u8; 2] = [0x50, 0x00];
/// Reads one block of the authenticated sector.
pub const READ: u8 = 0x30;
/// Writes one block of the authenticated sector.
pub const WRITE: u8 = 0xA0;
/// The 4-bit acknowledge pattern MIFARE cards answer with.
pub const ACK: u8 = 0x0A;

/// One MIFARE Classic block.
pub const BLOCK_SIZE: usize = 16;

/// A MIFARE Classic sector key.
pub type MifareKey = [u8; 6];

/// Transport key of factory-fresh cards.
pub const DEFAULT_KEY: MifareKey = [0xFF; 6];

/// Selects which of the two sector keys authenticates a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySlot {
    A = 0x60,
    B = 0x61,
}

/// 4-byte card serial number plus the check byte, as sent by the card during
/// cascade-1 anticollision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialNumber(pub [u8; 5]);

impl SerialNumber {
    /// The UID proper, without the check byte.
    pub fn uid(&self) -> [u8; 4] {
        [self.0[0], self.0[1], self.0[2], self.0[3]]
    }

    /// The check byte transmitted by the card.
    pub fn checksum(&self) -> u8 {
        self.0[4]
    }

    /// A serial number is valid when the check byte equals the XOR of the
    /// four UID bytes.
    pub fn is_valid(&self) -> bool {
        let [a, b, c, d, bcc] = self.0;
        a ^ b ^ c ^ d == bcc
    }
}

impl TryFrom<&[u8]> for SerialNumber {
    type Error = core::array::TryFromSliceError;

    fn try_from(data: &[u8]) -> Result<Self, Self::Error> {
        Ok(SerialNumber(data.try_into()?))
    }
}
