use core::fmt;
use std::error::Error;

mod primitives;
mod varint;

pub use varint::VarUint32;

/// Error that can be returned when writing bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteError {
    /// Not enough space in the buffer.
    NotEnoughSpace,
    /// A length did not fit the wire representation.
    TryFromIntError,
}

impl fmt::Display for WriteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WriteError::NotEnoughSpace => write!(f, "not enough space in buffer"),
            WriteError::TryFromIntError => write!(f, "length out of range"),
        }
    }
}

impl Error for WriteError {}

/// Error that can be returned when reading bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadError {
    NotEnoughBytes,
    Overflow,
    ParseError,
}

impl fmt::Display for ReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReadError::NotEnoughBytes => write!(f, "not enough bytes"),
            ReadError::Overflow => write!(f, "varint overflow"),
            ReadError::ParseError => write!(f, "parse error"),
        }
    }
}

impl Error for ReadError {}

/// Number of bytes a value occupies once written.
pub trait NumBytes {
    fn num_bytes(&self) -> usize;
}

pub trait Read: Sized {
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError>;

    /// Reads a value from the start of `bytes`.
    #[inline]
    fn unpack(bytes: &[u8]) -> Result<Self, ReadError> {
        let mut pos = 0usize;
        Self::read(bytes, &mut pos)
    }
}

pub trait Write {
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError>;

    /// Writes the value into a buffer sized by `num_bytes`.
    #[inline]
    fn pack(&self) -> Result<Vec<u8>, WriteError>
    where
        Self: NumBytes,
    {
        let mut bytes = vec![0u8; self.num_bytes()];
        let mut pos = 0usize;
        self.write(&mut bytes, &mut pos)?;
        Ok(bytes)
    }
}
