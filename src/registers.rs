// Page 0: Command and status registers
pub const COMMAND_REG: u8 = 0x01;        // Starts and stops command execution
pub const COM_IEN_REG: u8 = 0x02;        // Enable and disable interrupt request control bits
pub const COM_IRQ_REG: u8 = 0x04;        // Interrupt request bits
pub const DIV_IRQ_REG: u8 = 0x05;        // Interrupt request bits (CRC, self test)
pub const ERROR_REG: u8 = 0x06;          // Error bits showing the error status of the last command
pub const STATUS2_REG: u8 = 0x08;        // Receiver and transmitter status bits
pub const FIFO_DATA_REG: u8 = 0x09;      // Input and output of the 64 byte FIFO buffer
pub const FIFO_LEVEL_REG: u8 = 0x0A;     // Number of bytes stored in the FIFO buffer
pub const CONTROL_REG: u8 = 0x0C;        // Miscellaneous control bits
pub const BIT_FRAMING_REG: u8 = 0x0D;    // Adjustments for bit-oriented frames

// Page 1: Command registers
pub const MODE_REG: u8 = 0x11;           // General modes for transmitting and receiving
pub const TX_CONTROL_REG: u8 = 0x14;     // Logical behavior of the antenna driver pins
pub const TX_ASK_REG: u8 = 0x15;         // Transmission modulation setting

// Page 2: Configuration registers
pub const CRC_RESULT_REG_H: u8 = 0x21;   // CRC calculation result, MSB
pub const CRC_RESULT_REG_L: u8 = 0x22;   // CRC calculation result, LSB
pub const T_MODE_REG: u8 = 0x2A;         // Internal timer settings
pub const T_PRESCALER_REG: u8 = 0x2B;    // Internal timer prescaler
pub const T_RELOAD_REG_H: u8 = 0x2C;     // 16-bit timer reload value, high byte
pub const T_RELOAD_REG_L: u8 = 0x2D;     // 16-bit timer reload value, low byte

// Page 3: Test registers
pub const VERSION_REG: u8 = 0x37;        // Shows the software version

// ComIEnReg bits
pub const IRQ_INV: u8 = 0x80;            // Signal on pin IRQ is inverted
pub const TX_IEN: u8 = 0x40;             // Allow the transmitter interrupt request
pub const RX_IEN: u8 = 0x20;             // Allow the receiver interrupt request
pub const IDLE_IEN: u8 = 0x10;           // Allow the idle interrupt request
pub const LO_ALERT_IEN: u8 = 0x04;       // Allow the low alert interrupt request
pub const ERR_IEN: u8 = 0x02;            // Allow the error interrupt request
pub const TIMER_IEN: u8 = 0x01;          // Allow the timer interrupt request

// ComIrqReg bits
pub const SET1: u8 = 0x80;               // Controls how the other ComIrqReg bits are latched
pub const RX_IRQ: u8 = 0x20;             // Receiver detected the end of a valid data stream
pub const IDLE_IRQ: u8 = 0x10;           // A command terminated or an unknown command started
pub const ERR_IRQ: u8 = 0x02;            // Any error bit in ErrorReg is set
pub const TIMER_IRQ: u8 = 0x01;          // Timer decremented TCounterValReg to zero

// DivIrqReg bits
pub const CRC_IRQ: u8 = 0x04;            // CalcCRC command is done and all data is processed

// ErrorReg bits
pub const BUFFER_OVFL: u8 = 0x10;        // FIFO buffer written to even though it is full
pub const COLL_ERR: u8 = 0x08;           // A bit collision was detected
pub const PARITY_ERR: u8 = 0x02;         // Parity check failed
pub const PROTOCOL_ERR: u8 = 0x01;       // SOF is incorrect

// FIFOLevelReg bits
pub const FLUSH_BUFFER: u8 = 0x80;       // Resets the FIFO read/write pointers and BufferOvfl

// ControlReg bits
pub const RX_LAST_BITS: u8 = 0x07;       // Number of valid bits in the last received byte

// BitFramingReg bits
pub const START_SEND: u8 = 0x80;         // Starts transmission, only valid with Transceive

// Status2Reg bits
pub const MF_CRYPTO1_ON: u8 = 0x08;      // MIFARE Crypto1 unit is on, traffic is encrypted
