//! Register-level MFRC522 simulator with a modeled MIFARE Classic card.
//!
//! The simulator speaks the same register protocol as the real chip: frames
//! are staged in the FIFO, commands are started through the command register
//! and transmission through the StartSend bit, and completion shows up in the
//! interrupt request register. Commands execute synchronously inside the
//! register write that starts them, so the driver's first poll already sees
//! the outcome.

use core::convert::Infallible;

use mifare_rc522::commands::Command;
use mifare_rc522::registers::*;
use mifare_rc522::RegisterBus;

const CHIP_VERSION: u8 = 0x92;

/// ISO 14443-A CRC_A, preset 0x6363, returned as [lsb, msb].
pub fn crc_a(data: &[u8]) -> [u8; 2] {
    let mut crc: u16 = 0x6363;
    for &byte in data {
        let mut ch = byte ^ (crc as u8);
        ch ^= ch << 4;
        crc = (crc >> 8) ^ ((ch as u16) << 8) ^ ((ch as u16) << 3) ^ ((ch as u16) >> 4);
    }
    [crc as u8, (crc >> 8) as u8]
}

/// One MIFARE Classic 1K card sitting in the field.
pub struct SimCard {
    pub serial: [u8; 5],
    pub key_a: [u8; 6],
    pub key_b: [u8; 6],
    pub blocks: [[u8; 16]; 64],
    /// Truncates the ATQA to a single byte, like a clipped reply would.
    pub short_atqa: bool,
    /// Makes the card NAK every write request.
    pub write_protected: bool,
}

impl SimCard {
    pub fn new(uid: [u8; 4]) -> Self {
        let bcc = uid[0] ^ uid[1] ^ uid[2] ^ uid[3];
        SimCard {
            serial: [uid[0], uid[1], uid[2], uid[3], bcc],
            key_a: [0xFF; 6],
            key_b: [0xFF; 6],
            blocks: [[0u8; 16]; 64],
            short_atqa: false,
            write_protected: false,
        }
    }
}

/// What the card (or the empty field) sends back for one frame.
enum Reply {
    /// Response bytes plus the number of valid bits in the last byte
    /// (0 meaning all eight).
    Data(Vec<u8>, u8),
    /// The receiver flags an error; the bits land in the error register.
    Fault(u8),
    /// Nothing answers; the chip timer expires.
    Silence,
}

enum AuthReply {
    Granted(u8),
    Denied,
    Silence,
}

pub struct SimChip {
    regs: [u8; 0x40],
    fifo_in: Vec<u8>,
    fifo_out: Vec<u8>,
    pub card: Option<SimCard>,
    authed_block: Option<u8>,
    pending_write: Option<u8>,
}

impl SimChip {
    pub fn new(card: SimCard) -> Self {
        let mut chip = SimChip::without_card();
        chip.card = Some(card);
        chip
    }

    pub fn without_card() -> Self {
        let mut regs = [0u8; 0x40];
        regs[VERSION_REG as usize] = CHIP_VERSION;
        SimChip {
            regs,
            fifo_in: Vec::new(),
            fifo_out: Vec::new(),
            card: None,
            authed_block: None,
            pending_write: None,
        }
    }

    fn execute(&mut self, command: u8) {
        if command == Command::CalcCrc as u8 {
            let data = core::mem::take(&mut self.fifo_in);
            let crc = crc_a(&data);
            self.regs[CRC_RESULT_REG_L as usize] = crc[0];
            self.regs[CRC_RESULT_REG_H as usize] = crc[1];
            self.regs[DIV_IRQ_REG as usize] |= CRC_IRQ;
        } else if command == Command::MfAuthent as u8 {
            let frame = core::mem::take(&mut self.fifo_in);
            match self.authenticate(&frame) {
                AuthReply::Granted(block) => {
                    self.regs[STATUS2_REG as usize] |= MF_CRYPTO1_ON;
                    self.authed_block = Some(block);
                    self.regs[ERROR_REG as usize] = 0;
                    self.regs[COM_IRQ_REG as usize] = IDLE_IRQ;
                }
                AuthReply::Denied => self.apply(Reply::Fault(PROTOCOL_ERR)),
                AuthReply::Silence => self.apply(Reply::Silence),
            }
        } else if command == Command::SoftReset as u8 {
            self.regs = [0u8; 0x40];
            self.regs[VERSION_REG as usize] = CHIP_VERSION;
            self.fifo_in.clear();
            self.fifo_out.clear();
            self.authed_block = None;
            self.pending_write = None;
        }
    }

    fn transceive(&mut self) {
        let frame = core::mem::take(&mut self.fifo_in);
        let reply = self.card_reply(&frame);
        self.apply(reply);
    }

    fn apply(&mut self, reply: Reply) {
        self.fifo_out.clear();
        self.regs[ERROR_REG as usize] = 0;
        match reply {
            Reply::Data(bytes, last_bits) => {
                self.fifo_out = bytes;
                self.regs[CONTROL_REG as usize] = last_bits;
                self.regs[COM_IRQ_REG as usize] = RX_IRQ;
            }
            Reply::Fault(bits) => {
                self.regs[ERROR_REG as usize] = bits;
                self.regs[COM_IRQ_REG as usize] = IDLE_IRQ | ERR_IRQ;
            }
            Reply::Silence => {
                self.regs[COM_IRQ_REG as usize] = TIMER_IRQ | ERR_IRQ;
            }
        }
    }

    fn authenticate(&mut self, frame: &[u8]) -> AuthReply {
        let card = match &self.card {
            Some(card) => card,
            None => return AuthReply::Silence,
        };
        if frame.len() != 12 {
            return AuthReply::Denied;
        }
        let key = match frame[0] {
            0x60 => &card.key_a,
            0x61 => &card.key_b,
            _ => return AuthReply::Denied,
        };
        if frame[2..8] == key[..] && frame[8..] == card.serial[..4] {
            AuthReply::Granted(frame[1])
        } else {
            AuthReply::Denied
        }
    }

    fn card_reply(&mut self, frame: &[u8]) -> Reply {
        let crypto_on = self.regs[STATUS2_REG as usize] & MF_CRYPTO1_ON != 0;
        let card = match &mut self.card {
            Some(card) => card,
            None => return Reply::Silence,
        };

        // Second phase of a write: 16 data bytes plus CRC_A
        if let Some(block) = self.pending_write.take() {
            if frame.len() != 18 || crc_a(&frame[..16]) != frame[16..] {
                return Reply::Fault(PARITY_ERR);
            }
            card.blocks[block as usize].copy_from_slice(&frame[..16]);
            return Reply::Data(vec![0x0A], 4);
        }

        match frame {
            [0x26] | [0x52] => {
                // REQA/WUPA are short frames; anything else goes unheard
                if self.regs[BIT_FRAMING_REG as usize] & RX_LAST_BITS != 7 {
                    return Reply::Silence;
                }
                if card.short_atqa {
                    Reply::Data(vec![0x04], 0)
                } else {
                    Reply::Data(vec![0x04, 0x00], 0)
                }
            }
            [0x93, 0x20] => Reply::Data(card.serial.to_vec(), 0),
            [0x93, 0x70, rest @ ..] if rest.len() == 7 => {
                if crc_a(&frame[..7]) != frame[7..] {
                    return Reply::Fault(PARITY_ERR);
                }
                if frame[2..7] != card.serial[..] {
                    return Reply::Silence;
                }
                // A fresh selection drops any earlier encrypted session
                self.authed_block = None;
                self.regs[STATUS2_REG as usize] &= !MF_CRYPTO1_ON;
                let mut sak = vec![0x08];
                sak.extend_from_slice(&crc_a(&[0x08]));
                Reply::Data(sak, 0)
            }
            [0x30, block, ..] if frame.len() == 4 => {
                if crc_a(&frame[..2]) != frame[2..] {
                    return Reply::Fault(PARITY_ERR);
                }
                if !crypto_on || self.authed_block != Some(*block) {
                    return Reply::Fault(PROTOCOL_ERR);
                }
                let mut data = card.blocks[*block as usize].to_vec();
                let crc = crc_a(&data);
                data.extend_from_slice(&crc);
                Reply::Data(data, 0)
            }
            [0xA0, block, ..] if frame.len() == 4 => {
                if crc_a(&frame[..2]) != frame[2..] {
                    return Reply::Fault(PARITY_ERR);
                }
                if !crypto_on || self.authed_block != Some(*block) {
                    return Reply::Fault(PROTOCOL_ERR);
                }
                if card.write_protected {
                    // NAK: the card refuses the write request
                    return Reply::Data(vec![0x05], 4);
                }
                self.pending_write = Some(*block);
                Reply::Data(vec![0x0A], 4)
            }
            _ => Reply::Silence,
        }
    }
}

impl RegisterBus for SimChip {
    type Error = Infallible;

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        Ok(match addr {
            FIFO_DATA_REG => {
                if self.fifo_out.is_empty() {
                    0
                } else {
                    self.fifo_out.remove(0)
                }
            }
            FIFO_LEVEL_REG => self.fifo_out.len() as u8,
            _ => self.regs[addr as usize],
        })
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        match addr {
            FIFO_DATA_REG => self.fifo_in.push(value),
            FIFO_LEVEL_REG => {
                if value & FLUSH_BUFFER != 0 {
                    self.fifo_in.clear();
                    self.fifo_out.clear();
                }
            }
            COMMAND_REG => {
                self.regs[COMMAND_REG as usize] = value;
                self.execute(value);
            }
            BIT_FRAMING_REG => {
                self.regs[BIT_FRAMING_REG as usize] = value;
                if value & START_SEND != 0
                    && self.regs[COMMAND_REG as usize] == Command::Transceive as u8
                {
                    self.transceive();
                }
            }
            _ => self.regs[addr as usize] = value,
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::crc_a;

    #[test]
    fn crc_a_matches_known_vectors() {
        // CRC_A over a select frame header, cross-checked against ISO 14443-3
        assert_eq!(crc_a(&[0x30, 0x04]), [0x26, 0xEE]);
        assert_eq!(crc_a(&[]), [0x63, 0x63]);
    }
}
