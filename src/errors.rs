use core::fmt::{Debug, Formatter, Result};

use ufmt::{uDebug, uWrite};

use crate::picc::BLOCK_SIZE;

/// Outcome of a single command/response cycle with a card.
///
/// An empty field is an expected condition while polling, so "no tag" is a
/// status value and not an error path.
#[derive(Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// The card answered and no error bit was raised.
    Ok,
    /// The chip timer expired together with the error interrupt: nothing in
    /// the field answered.
    NoTag,
    /// A framing/parity/collision/overflow bit was set, the watchdog ran
    /// out, or the reply failed validation. Retryable by the caller.
    Error,
}

impl Debug for Status {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        match self {
            Status::Ok => write!(f, "Ok"),
            Status::NoTag => write!(f, "NoTag"),
            Status::Error => write!(f, "Error"),
        }
    }
}

impl uDebug for Status {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        match self {
            Status::Ok => f.write_str("Ok"),
            Status::NoTag => f.write_str("NoTag"),
            Status::Error => f.write_str("Error"),
        }
    }
}

/// Response to one RF command cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransceiveResult {
    pub status: Status,
    /// Response bytes drained from the FIFO, at most one MIFARE block.
    pub data: heapless::Vec<u8, BLOCK_SIZE>,
    /// Number of valid bits in the reply; a whole-byte reply counts len * 8.
    pub back_bits: u8,
}

impl TransceiveResult {
    pub fn empty(status: Status) -> Self {
        TransceiveResult {
            status,
            data: heapless::Vec::new(),
            back_bits: 0,
        }
    }

    pub fn is_ok(&self) -> bool {
        self.status == Status::Ok
    }
}

impl uDebug for TransceiveResult {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<W>) -> core::result::Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.debug_struct("TransceiveResult")?
            .field("status", &self.status)?
            .field("data", &self.data.as_slice())?
            .field("back_bits", &self.back_bits)?
            .finish()
    }
}
