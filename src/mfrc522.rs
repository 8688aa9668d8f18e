use log::{debug, warn};

use crate::bus::RegisterBus;
use crate::commands::Command;
use crate::errors::{Status, TransceiveResult};
use crate::picc::{self, KeySlot, MifareKey, SerialNumber, BLOCK_SIZE};
use crate::registers::*;

/// Iteration ceiling for the transceive/authenticate completion poll.
const IRQ_WATCHDOG: u16 = 2000;
/// Iteration ceiling for the CRC coprocessor poll.
const CRC_WATCHDOG: u16 = 255;
/// Error bits that fail a command cycle.
const ERROR_CHECK_MASK: u8 = BUFFER_OVFL | COLL_ERR | PARITY_ERR | PROTOCOL_ERR;

/// MIFARE Classic protocol engine on top of any [`RegisterBus`].
///
/// All calls are blocking and the driver assumes exclusive access to the
/// chip; wrap the whole reader in a mutex if several callers share it. The
/// completion waits are bounded busy-polls paced only by the bus itself, so
/// the watchdog ceilings count register reads, not wall-clock time.
pub struct Mfrc522<B> {
    bus: B,
}

impl<B: RegisterBus> Mfrc522<B> {
    pub fn new(bus: B) -> Self {
        Mfrc522 { bus }
    }

    /// Soft-resets the chip, then programs the communication timeout timer,
    /// forces 100% ASK modulation and presets the CRC coprocessor.
    pub fn init(&mut self) -> Result<(), B::Error> {
        self.reset()?;

        // TAuto=1: the timer starts at the end of every transmission
        self.bus.write_register(T_MODE_REG, 0x8D)?;
        self.bus.write_register(T_PRESCALER_REG, 0x3E)?;
        self.bus.write_register(T_RELOAD_REG_L, 30)?;
        self.bus.write_register(T_RELOAD_REG_H, 0)?;

        self.bus.write_register(TX_ASK_REG, 0x40)?; // 100% ASK
        self.bus.write_register(MODE_REG, 0x3D)?; // CRC preset 0x6363

        self.antenna_on()
    }

    /// Issues a soft reset. Configuration registers fall back to their
    /// power-on defaults, so [`init`](Self::init) must run afterwards.
    pub fn reset(&mut self) -> Result<(), B::Error> {
        self.command(Command::SoftReset)
    }

    /// Raw content of the version register; 0x91 is a v1.0 chip, 0x92 v2.0.
    pub fn version(&mut self) -> Result<u8, B::Error> {
        self.bus.read_register(VERSION_REG)
    }

    /// Switches the antenna drivers on if they are not already.
    pub fn antenna_on(&mut self) -> Result<(), B::Error> {
        let value = self.bus.read_register(TX_CONTROL_REG)?;
        if value & 0x03 != 0x03 {
            self.set_bit_mask(TX_CONTROL_REG, 0x03)?;
        }
        Ok(())
    }

    /// Switches the antenna drivers off.
    pub fn antenna_off(&mut self) -> Result<(), B::Error> {
        self.clear_bit_mask(TX_CONTROL_REG, 0x03)
    }

    fn command(&mut self, command: Command) -> Result<(), B::Error> {
        self.bus.write_register(COMMAND_REG, command as u8)
    }

    fn set_bit_mask(&mut self, addr: u8, mask: u8) -> Result<(), B::Error> {
        let value = self.bus.read_register(addr)?;
        self.bus.write_register(addr, value | mask)
    }

    fn clear_bit_mask(&mut self, addr: u8, mask: u8) -> Result<(), B::Error> {
        let value = self.bus.read_register(addr)?;
        self.bus.write_register(addr, value & !mask)
    }

    fn flush_fifo(&mut self) -> Result<(), B::Error> {
        self.set_bit_mask(FIFO_LEVEL_REG, FLUSH_BUFFER)
    }

    /// Feeds a frame into the FIFO one byte at a time. The FIFO holds 64
    /// bytes; loading more than that overwrites data and is not guarded here.
    fn load_fifo(&mut self, data: &[u8]) -> Result<(), B::Error> {
        for &byte in data {
            self.bus.write_register(FIFO_DATA_REG, byte)?;
        }
        Ok(())
    }

    /// Takes the raw FIFO level and drains at most one block; the clamp to
    /// [1, 16] lives here so the buffer capacity can never be exceeded.
    fn drain_fifo(&mut self, raw_level: u8) -> Result<heapless::Vec<u8, BLOCK_SIZE>, B::Error> {
        let mut data = heapless::Vec::new();
        for _ in 0..clamp_fifo_level(raw_level) {
            data.push(self.bus.read_register(FIFO_DATA_REG)?).ok();
        }
        Ok(data)
    }

    /// Busy-polls the interrupt request register until one of `flags` shows
    /// up or the watchdog runs out; returns the final register value and
    /// whether it expired. Deliberately no sleep between polls: each
    /// iteration is paced by the bus transaction itself.
    fn wait_for_irq(&mut self, flags: u8) -> Result<(u8, bool), B::Error> {
        let mut irq = 0;
        for _ in 0..IRQ_WATCHDOG {
            irq = self.bus.read_register(COM_IRQ_REG)?;
            if irq & flags != 0 {
                return Ok((irq, false));
            }
        }
        Ok((irq, true))
    }

    /// Runs `data` through the chip's CRC coprocessor and returns the 16-bit
    /// result as [lsb, msb].
    ///
    /// If the coprocessor never raises its done flag the result registers
    /// are read anyway and may hold a stale value from an earlier
    /// calculation.
    pub fn calculate_crc(&mut self, data: &[u8]) -> Result<[u8; 2], B::Error> {
        self.clear_bit_mask(DIV_IRQ_REG, CRC_IRQ)?;
        self.flush_fifo()?;
        self.load_fifo(data)?;
        self.command(Command::CalcCrc)?;

        let mut done = false;
        for _ in 0..CRC_WATCHDOG {
            if self.bus.read_register(DIV_IRQ_REG)? & CRC_IRQ != 0 {
                done = true;
                break;
            }
        }
        if !done {
            warn!("CRC coprocessor watchdog expired, result may be stale");
        }

        Ok([
            self.bus.read_register(CRC_RESULT_REG_L)?,
            self.bus.read_register(CRC_RESULT_REG_H)?,
        ])
    }

    /// Clears pending interrupts, cancels in-flight work and stages `frame`
    /// in the FIFO.
    fn stage_frame(&mut self, frame: &[u8]) -> Result<(), B::Error> {
        self.clear_bit_mask(COM_IRQ_REG, SET1)?;
        self.flush_fifo()?;
        self.command(Command::Idle)?;
        self.load_fifo(frame)
    }

    /// Classifies a completed cycle from the error register and the
    /// interrupt snapshot taken by the wait loop.
    fn cycle_status(&mut self, irq: u8) -> Result<Status, B::Error> {
        let error = self.bus.read_register(ERROR_REG)?;
        if error & ERROR_CHECK_MASK != 0 {
            debug!("command cycle failed, ErrorReg {:#04x}", error);
            return Ok(Status::Error);
        }
        // Timer ran out and the error irq fired: nothing in the field answered
        if irq & TIMER_IRQ != 0 && irq & ERR_IRQ != 0 {
            return Ok(Status::NoTag);
        }
        Ok(Status::Ok)
    }

    /// One full RF command/response cycle.
    fn transceive(&mut self, frame: &[u8]) -> Result<TransceiveResult, B::Error> {
        self.bus.write_register(
            COM_IEN_REG,
            IRQ_INV | TX_IEN | RX_IEN | IDLE_IEN | LO_ALERT_IEN | ERR_IEN | TIMER_IEN,
        )?;
        self.stage_frame(frame)?;

        self.command(Command::Transceive)?;
        self.set_bit_mask(BIT_FRAMING_REG, START_SEND)?;

        let (irq, expired) = self.wait_for_irq(TIMER_IRQ | RX_IRQ | IDLE_IRQ)?;
        self.clear_bit_mask(BIT_FRAMING_REG, START_SEND)?;

        if expired {
            debug!("transceive watchdog expired");
            return Ok(TransceiveResult::empty(Status::Error));
        }
        let status = self.cycle_status(irq)?;
        if status == Status::Error {
            return Ok(TransceiveResult::empty(Status::Error));
        }

        let level = self.bus.read_register(FIFO_LEVEL_REG)?;
        let last_bits = self.bus.read_register(CONTROL_REG)? & RX_LAST_BITS;
        let mut result = TransceiveResult::empty(status);
        result.data = self.drain_fifo(level)?;
        result.back_bits = back_bits(result.data.len() as u8, last_bits);
        Ok(result)
    }

    /// Command cycle for MFAuthent. A successful authentication produces no
    /// response bytes; the chip latches its Crypto1 flag internally instead.
    fn authenticate_card(&mut self, frame: &[u8]) -> Result<TransceiveResult, B::Error> {
        self.bus
            .write_register(COM_IEN_REG, IRQ_INV | IDLE_IEN | ERR_IEN)?;
        self.stage_frame(frame)?;
        self.command(Command::MfAuthent)?;

        let (irq, expired) = self.wait_for_irq(TIMER_IRQ | RX_IRQ | IDLE_IRQ)?;
        if expired {
            debug!("authenticate watchdog expired");
            return Ok(TransceiveResult::empty(Status::Error));
        }
        Ok(TransceiveResult::empty(self.cycle_status(irq)?))
    }

    /// Probes the field for a card with REQA. An answering card replies with
    /// a 16-bit ATQA; anything else is reported as [`Status::Error`].
    pub fn scan(&mut self) -> Result<TransceiveResult, B::Error> {
        // Short frame: only 7 bits of the last byte go out
        self.bus.write_register(BIT_FRAMING_REG, 0x07)?;

        let mut result = self.transceive(&[picc::REQA])?;
        if result.status != Status::Ok || result.back_bits != 16 {
            result.status = Status::Error;
        }
        Ok(result)
    }

    /// Cascade-1 anticollision: asks the card for its serial number and
    /// verifies the XOR check byte. A checksum mismatch downgrades an
    /// otherwise successful cycle to [`Status::Error`].
    pub fn identify(&mut self) -> Result<TransceiveResult, B::Error> {
        // Whole bytes again
        self.bus.write_register(BIT_FRAMING_REG, 0x00)?;

        let mut result = self.transceive(&picc::ANTICOLL_CL1)?;
        if result.status == Status::Ok {
            let valid = SerialNumber::try_from(result.data.as_slice())
                .map(|serial| serial.is_valid())
                .unwrap_or(false);
            if !valid {
                debug!("serial number failed checksum");
                result.status = Status::Error;
            }
        }
        Ok(result)
    }

    /// Selects the card with the given serial number for the following
    /// authenticate/read/write exchange.
    pub fn select(&mut self, serial: &SerialNumber) -> Result<TransceiveResult, B::Error> {
        let mut frame = [0u8; 9];
        frame[..2].copy_from_slice(&picc::SELECT_CL1);
        frame[2..7].copy_from_slice(&serial.0);
        let crc = self.calculate_crc(&frame[..7])?;
        frame[7..].copy_from_slice(&crc);
        self.transceive(&frame)
    }

    /// Authenticates one block with a sector key. On success the chip keeps
    /// an encrypted session open until [`deauthenticate`](Self::deauthenticate)
    /// or a new selection. Authenticating another block replaces the session.
    pub fn authenticate(
        &mut self,
        slot: KeySlot,
        block_addr: u8,
        key: &MifareKey,
        serial: &SerialNumber,
    ) -> Result<TransceiveResult, B::Error> {
        let mut frame = [0u8; 12];
        frame[0] = slot as u8;
        frame[1] = block_addr;
        frame[2..8].copy_from_slice(key);
        frame[8..].copy_from_slice(&serial.uid());
        self.authenticate_card(&frame)
    }

    /// Drops the encrypted session by clearing the chip's Crypto1 flag.
    /// Safe to call at any time, also when no session is active.
    pub fn deauthenticate(&mut self) -> Result<(), B::Error> {
        self.clear_bit_mask(STATUS2_REG, MF_CRYPTO1_ON)
    }

    /// Reads one block of the authenticated sector. The trailing CRC_A sent
    /// by the card is clipped by the block-size clamp and not verified at
    /// this layer.
    pub fn read(&mut self, block_addr: u8) -> Result<TransceiveResult, B::Error> {
        let mut frame = [0u8; 4];
        frame[0] = picc::READ;
        frame[1] = block_addr;
        let crc = self.calculate_crc(&frame[..2])?;
        frame[2..].copy_from_slice(&crc);
        self.transceive(&frame)
    }

    /// Writes one block of the authenticated sector.
    ///
    /// The card runs this as a two-phase exchange: it acknowledges the write
    /// request with the 4-bit ACK pattern, and only then accepts the data.
    /// The payload goes out only on that exact acknowledge; any other reply
    /// aborts with the first phase's result.
    pub fn write(
        &mut self,
        block_addr: u8,
        data: &[u8; BLOCK_SIZE],
    ) -> Result<TransceiveResult, B::Error> {
        let mut request = [0u8; 4];
        request[0] = picc::WRITE;
        request[1] = block_addr;
        let crc = self.calculate_crc(&request[..2])?;
        request[2..].copy_from_slice(&crc);

        let mut ack = self.transceive(&request)?;
        if ack.status != Status::Ok {
            return Ok(ack);
        }
        if !(ack.back_bits == 4 && ack.data.len() == 1 && ack.data[0] == picc::ACK) {
            debug!("write request not acknowledged");
            ack.status = Status::Error;
            return Ok(ack);
        }

        let mut payload = [0u8; BLOCK_SIZE + 2];
        payload[..BLOCK_SIZE].copy_from_slice(data);
        let crc = self.calculate_crc(&payload[..BLOCK_SIZE])?;
        payload[BLOCK_SIZE..].copy_from_slice(&crc);
        self.transceive(&payload)
    }
}

/// The raw FIFO level is folded into [1, 16]: a read of 0 still drains one
/// byte and anything beyond one MIFARE block is cut off.
fn clamp_fifo_level(raw: u8) -> u8 {
    if raw == 0 {
        1
    } else if raw as usize > BLOCK_SIZE {
        BLOCK_SIZE as u8
    } else {
        raw
    }
}

fn back_bits(fifo_level: u8, last_bits: u8) -> u8 {
    if last_bits != 0 {
        (fifo_level - 1) * 8 + last_bits
    } else {
        fifo_level * 8
    }
}
