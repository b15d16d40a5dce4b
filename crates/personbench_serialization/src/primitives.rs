use crate::{NumBytes, Read, ReadError, VarUint32, Write, WriteError};

impl NumBytes for usize {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        // Lengths past u32::MAX are rejected by `write`; size them as the
        // widest varint instead of wrapping.
        VarUint32(u32::try_from(*self).unwrap_or(u32::MAX)).num_bytes()
    }
}

impl NumBytes for u8 {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        core::mem::size_of::<u8>()
    }
}

impl NumBytes for u32 {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        core::mem::size_of::<u32>()
    }
}

impl NumBytes for u64 {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        core::mem::size_of::<u64>()
    }
}

impl NumBytes for bool {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        core::mem::size_of::<u8>()
    }
}

impl NumBytes for String {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.len().num_bytes() + self.len()
    }
}

impl<T: NumBytes> NumBytes for Option<T> {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        match self {
            Some(value) => 1 + value.num_bytes(),
            None => 1,
        }
    }
}

impl<T: NumBytes> NumBytes for Vec<T> {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        let mut count = self.len().num_bytes();
        for item in self {
            count += item.num_bytes();
        }
        count
    }
}

impl<T1: NumBytes, T2: NumBytes> NumBytes for (T1, T2) {
    #[inline(always)]
    fn num_bytes(&self) -> usize {
        self.0.num_bytes() + self.1.num_bytes()
    }
}

impl Read for usize {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        VarUint32::read(bytes, pos).map(|v| v.0 as usize)
    }
}

impl Read for u8 {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        if bytes.len() < *pos + core::mem::size_of::<u8>() {
            return Err(ReadError::NotEnoughBytes);
        }
        let value = bytes[*pos];
        *pos += core::mem::size_of::<u8>();
        Ok(value)
    }
}

impl Read for u32 {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        if bytes.len() < *pos + core::mem::size_of::<u32>() {
            return Err(ReadError::NotEnoughBytes);
        }
        let value = u32::from_le_bytes([
            bytes[*pos],
            bytes[*pos + 1],
            bytes[*pos + 2],
            bytes[*pos + 3],
        ]);
        *pos += core::mem::size_of::<u32>();
        Ok(value)
    }
}

impl Read for u64 {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        if bytes.len() < *pos + core::mem::size_of::<u64>() {
            return Err(ReadError::NotEnoughBytes);
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&bytes[*pos..*pos + 8]);
        *pos += core::mem::size_of::<u64>();
        Ok(u64::from_le_bytes(raw))
    }
}

impl Read for bool {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        match u8::read(bytes, pos)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ReadError::ParseError),
        }
    }
}

impl Read for String {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let len = usize::read(bytes, pos)?;

        if *pos + len > bytes.len() {
            return Err(ReadError::NotEnoughBytes);
        }

        let str_bytes = &bytes[*pos..*pos + len];
        *pos += len;

        match core::str::from_utf8(str_bytes) {
            Ok(s) => Ok(s.to_string()),
            Err(_) => Err(ReadError::ParseError),
        }
    }
}

impl<T: Read> Read for Option<T> {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        if bool::read(bytes, pos)? {
            Ok(Some(T::read(bytes, pos)?))
        } else {
            Ok(None)
        }
    }
}

impl<T> Read for Vec<T>
where
    T: Read,
{
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let len = usize::read(bytes, pos)?;

        if *pos + len > bytes.len() {
            return Err(ReadError::NotEnoughBytes);
        }

        let mut vec = Vec::with_capacity(len);
        for _ in 0..len {
            vec.push(T::read(bytes, pos)?);
        }
        Ok(vec)
    }
}

impl<T1: Read, T2: Read> Read for (T1, T2) {
    #[inline(always)]
    fn read(bytes: &[u8], pos: &mut usize) -> Result<Self, ReadError> {
        let first = T1::read(bytes, pos)?;
        let second = T2::read(bytes, pos)?;
        Ok((first, second))
    }
}

impl Write for usize {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        VarUint32::try_from(*self)?.write(bytes, pos)
    }
}

impl Write for u8 {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        if bytes.len() < *pos + core::mem::size_of::<u8>() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos] = *self;
        *pos += core::mem::size_of::<u8>();
        Ok(())
    }
}

impl Write for u32 {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        if bytes.len() < *pos + core::mem::size_of::<u32>() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + 4].copy_from_slice(&self.to_le_bytes());
        *pos += core::mem::size_of::<u32>();
        Ok(())
    }
}

impl Write for u64 {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        if bytes.len() < *pos + core::mem::size_of::<u64>() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + 8].copy_from_slice(&self.to_le_bytes());
        *pos += core::mem::size_of::<u64>();
        Ok(())
    }
}

impl Write for bool {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        (*self as u8).write(bytes, pos)
    }
}

impl Write for String {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.len().write(bytes, pos)?;
        if bytes.len() < *pos + self.len() {
            return Err(WriteError::NotEnoughSpace);
        }
        bytes[*pos..*pos + self.len()].copy_from_slice(self.as_bytes());
        *pos += self.len();
        Ok(())
    }
}

impl<T: Write> Write for Option<T> {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        match self {
            Some(value) => {
                true.write(bytes, pos)?;
                value.write(bytes, pos)
            }
            None => false.write(bytes, pos),
        }
    }
}

impl<T: Write> Write for Vec<T> {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.len().write(bytes, pos)?;
        for item in self.iter() {
            item.write(bytes, pos)?;
        }
        Ok(())
    }
}

impl<T1: Write, T2: Write> Write for (T1, T2) {
    #[inline(always)]
    fn write(&self, bytes: &mut [u8], pos: &mut usize) -> Result<(), WriteError> {
        self.0.write(bytes, pos)?;
        self.1.write(bytes, pos)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_num_bytes() {
        assert_eq!("".to_string().num_bytes(), 1);
        assert_eq!("hello".to_string().num_bytes(), 6);
    }

    #[test]
    fn option_tag() {
        let some = Some("ab".to_string());
        let packed = some.pack().unwrap();
        assert_eq!(packed, vec![1, 2, b'a', b'b']);
        assert_eq!(Option::<String>::unpack(&packed).unwrap(), some);
        assert_eq!(None::<String>.pack().unwrap(), vec![0]);
    }

    #[test]
    fn bad_bool_tag() {
        assert_eq!(bool::unpack(&[2]), Err(ReadError::ParseError));
    }

    #[test]
    fn short_buffer() {
        let mut buf = [0u8; 3];
        let mut pos = 0;
        assert_eq!(7u32.write(&mut buf, &mut pos), Err(WriteError::NotEnoughSpace));
        assert_eq!(u64::unpack(&[1, 2, 3]), Err(ReadError::NotEnoughBytes));
    }

    #[test]
    fn invalid_utf8() {
        assert_eq!(String::unpack(&[2, 0xC3, 0x28]), Err(ReadError::ParseError));
    }

    #[test]
    #[cfg(target_pointer_width = "64")]
    fn oversized_length_is_not_truncated() {
        let len = u32::MAX as usize + 1;
        assert_eq!(len.num_bytes(), VarUint32(u32::MAX).num_bytes());
        assert_eq!(len.num_bytes(), 5);

        let mut buf = [0u8; 8];
        let mut pos = 0;
        assert_eq!(len.write(&mut buf, &mut pos), Err(WriteError::TryFromIntError));
    }

    #[test]
    fn nested_vec() {
        let value = vec![Some(1u64), None, Some(u64::MAX)];
        let packed = value.pack().unwrap();
        assert_eq!(packed.len(), value.num_bytes());
        assert_eq!(Vec::<Option<u64>>::unpack(&packed).unwrap(), value);
    }
}
