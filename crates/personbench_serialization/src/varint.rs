use crate::{NumBytes, Read, ReadError, Write, WriteError};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct VarUint32(pub u32);

impl From<u32> for VarUint32 {
    #[inline]
    fn from(value: u32) -> Self {
        VarUint32(value)
    }
}

impl TryFrom<usize> for VarUint32 {
    type Error = WriteError;

    #[inline]
    fn try_from(value: usize) -> Result<Self, Self::Error> {
        u32::try_from(value)
            .map(VarUint32)
            .map_err(|_| WriteError::TryFromIntError)
    }
}

impl NumBytes for VarUint32 {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        let v = self.0;
        if v == 0 {
            return 1;
        }
        let bits = 32 - v.leading_zeros();
        core::cmp::min((bits as usize + 6) / 7, 5)
    }
}

impl Read for VarUint32 {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let mut result: u32 = 0;
        let mut shift = 0u32;

        // at most 5 groups of 7 bits; the 5th may only carry 4
        for i in 0..5 {
            if *pos >= bytes.len() {
                return Err(ReadError::NotEnoughBytes);
            }
            let byte = bytes[*pos];
            *pos += 1;

            let low7 = (byte & 0x7F) as u32;
            if i == 4 && (low7 & 0xF0) != 0 {
                return Err(ReadError::Overflow);
            }
            result |= low7 << shift;

            if (byte & 0x80) == 0 {
                return Ok(VarUint32(result));
            }
            shift += 7;
        }

        Err(ReadError::ParseError)
    }
}

impl Write for VarUint32 {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        // Preflight so we either write everything or nothing.
        let need = self.num_bytes();
        if bytes.len() < *pos + need {
            return Err(WriteError::NotEnoughSpace);
        }

        let mut v = self.0;
        loop {
            let mut b = (v & 0x7F) as u8;
            v >>= 7;
            if v != 0 {
                b |= 0x80;
            }
            bytes[*pos] = b;
            *pos += 1;
            if v == 0 {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boundaries() {
        for (value, len) in [(0u32, 1usize), (127, 1), (128, 2), (16_383, 2), (16_384, 3), (u32::MAX, 5)] {
            let v = VarUint32(value);
            assert_eq!(v.num_bytes(), len);
            let packed = v.pack().unwrap();
            assert_eq!(packed.len(), len);
            assert_eq!(VarUint32::unpack(&packed).unwrap(), v);
        }
    }

    #[test]
    fn rejects_overlong_encoding() {
        let bytes = [0xFF, 0xFF, 0xFF, 0xFF, 0x1F];
        assert_eq!(VarUint32::unpack(&bytes), Err(ReadError::Overflow));
    }

    #[test]
    fn truncated_input() {
        assert_eq!(VarUint32::unpack(&[0x80]), Err(ReadError::NotEnoughBytes));
    }
}
