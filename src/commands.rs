/// Commands understood by the MFRC522 command register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    /// No action, cancels current command execution.
    Idle = 0x00,
    /// Activates the CRC coprocessor.
    CalcCrc = 0x03,
    /// Transmits the FIFO to the antenna and activates the receiver afterwards.
    Transceive = 0x0C,
    /// Performs the MIFARE standard authentication as a reader.
    MfAuthent = 0x0E,
    /// Resets the MFRC522.
    SoftReset = 0x0F,
}
