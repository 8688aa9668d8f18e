//! Register-level transport between the host and the MFRC522.
//!
//! The chip exposes the same register file over I2C, SPI and UART, and the
//! protocol engine only ever needs single-register reads and writes, so that
//! is the whole contract.

use core::convert::Infallible;

use embedded_hal::digital::OutputPin;
use embedded_hal::i2c::I2c;
use embedded_hal::spi::SpiBus;

/// I2C address the MFRC522 responds to in the reference wiring.
pub const DEFAULT_I2C_ADDRESS: u8 = 0x28;

/// Byte-level access to a single chip register.
///
/// Implementations block until the bus transaction finished and report bus
/// faults through their own error type; no retry happens at this level.
pub trait RegisterBus {
    type Error;

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error>;
    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error>;
}

/// MFRC522 behind an I2C bus.
pub struct I2cInterface<I2C> {
    i2c: I2C,
    addr: u8,
}

impl<I2C> I2cInterface<I2C> {
    pub fn new(i2c: I2C, addr: u8) -> Self {
        I2cInterface { i2c, addr }
    }
}

impl<I2C: I2c> RegisterBus for I2cInterface<I2C> {
    type Error = I2C::Error;

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        let mut value = [0];
        self.i2c.write_read(self.addr, &[addr], &mut value)?;
        Ok(value[0])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        self.i2c.write(self.addr, &[addr, value])
    }
}

/// MFRC522 behind an SPI bus with a dedicated chip-select pin.
///
/// The register address moves to bits 6..1 of the first transferred byte;
/// bit 7 selects read (1) or write (0).
pub struct SpiInterface<SPI, CS> {
    spi: SPI,
    cs: CS,
}

impl<SPI, CS> SpiInterface<SPI, CS> {
    pub fn new(spi: SPI, cs: CS) -> Self {
        SpiInterface { spi, cs }
    }
}

impl<SPI, CS> RegisterBus for SpiInterface<SPI, CS>
where
    SPI: SpiBus<u8>,
    CS: OutputPin<Error = Infallible>,
{
    type Error = SPI::Error;

    fn read_register(&mut self, addr: u8) -> Result<u8, Self::Error> {
        let frame = [(addr << 1) | 0x80, 0x00];
        let mut reply = [0u8; 2];
        self.cs.set_low().ok();
        let result = self.spi.transfer(&mut reply, &frame);
        self.cs.set_high().ok();
        result?;
        Ok(reply[1])
    }

    fn write_register(&mut self, addr: u8, value: u8) -> Result<(), Self::Error> {
        let frame = [(addr << 1) & 0x7E, value];
        self.cs.set_low().ok();
        let result = self.spi.write(&frame);
        self.cs.set_high().ok();
        result
    }
}
