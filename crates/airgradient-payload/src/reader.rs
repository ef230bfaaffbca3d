use crate::registry::WireType;
use crate::{PayloadError, Result};

/// Cursor over a payload buffer.
///
/// Every read checks the remaining length first and leaves the cursor
/// untouched on failure.
#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    pub fn at(data: &'a [u8], offset: usize) -> Self {
        Self { data, pos: offset }
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.pos)
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N]> {
        let remaining = self.remaining();
        if N > remaining {
            return Err(PayloadError::TruncatedBuffer {
                offset: self.pos,
                needed: N,
                remaining,
            });
        }
        let mut bytes = [0u8; N];
        bytes.copy_from_slice(&self.data[self.pos..self.pos + N]);
        self.pos += N;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8> {
        self.take::<1>().map(|[b]| b)
    }

    pub fn read_i8(&mut self) -> Result<i8> {
        self.take::<1>().map(i8::from_le_bytes)
    }

    pub fn read_u16_le(&mut self) -> Result<u16> {
        self.take::<2>().map(u16::from_le_bytes)
    }

    pub fn read_i16_le(&mut self) -> Result<i16> {
        self.take::<2>().map(i16::from_le_bytes)
    }

    pub fn read_u32_le(&mut self) -> Result<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    /// Read one value of `wire_type`, widened to `i64`.
    pub fn read(&mut self, wire_type: WireType) -> Result<i64> {
        match wire_type {
            WireType::I8 => self.read_i8().map(i64::from),
            WireType::U16 => self.read_u16_le().map(i64::from),
            WireType::I16 => self.read_i16_le().map(i64::from),
            WireType::U32 => self.read_u32_le().map(i64::from),
        }
    }
}
