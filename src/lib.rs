//! MIFARE Classic driver for the MFRC522 contactless reader IC.
//!
//! The chip is driven entirely through its 8-bit register file: card frames
//! pass through the 64 byte FIFO, completion is detected by busy-polling the
//! interrupt request register, and CRC_A framing comes from the chip's
//! coprocessor. Any [`bus::RegisterBus`] implementation can carry the
//! register traffic; I2C and SPI transports are provided.

#![cfg_attr(not(test), no_std)]

pub mod bus;
pub mod commands;
pub mod errors;
pub mod mfrc522;
pub mod picc;
pub mod registers;

pub use bus::{I2cInterface, RegisterBus, SpiInterface};
pub use errors::{Status, TransceiveResult};
pub use mfrc522::Mfrc522;
pub use picc::{KeySlot, MifareKey, SerialNumber, DEFAULT_KEY};
