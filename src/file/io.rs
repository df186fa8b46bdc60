//! Little-endian primitive reads over byte slices.
//!
//! Every structure in a PE image and in ECMA-335 metadata is stored little-endian. The helpers
//! here are bounds-checked and advance a caller-owned offset, so parsers can walk a record field
//! by field without slicing. Heap and table indexes whose width depends on the heap-size flags or
//! on row counts go through [`read_le_at_dyn`].

use crate::{Error::OutOfBounds, Result};

/// Fixed-width integers that can be decoded from a little-endian byte array.
pub trait CilIO: Sized {
    /// The byte array type backing this integer.
    type Bytes: Sized + for<'a> TryFrom<&'a [u8]>;

    /// Decodes the integer from little-endian bytes.
    fn from_le_bytes(bytes: Self::Bytes) -> Self;
}

macro_rules! impl_cil_io {
    ($($ty:ty),*) => {
        $(
            impl CilIO for $ty {
                type Bytes = [u8; std::mem::size_of::<$ty>()];

                fn from_le_bytes(bytes: Self::Bytes) -> Self {
                    <$ty>::from_le_bytes(bytes)
                }
            }
        )*
    };
}

impl_cil_io!(u8, u16, u32, u64);

/// Reads a value at the start of `data`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if `data` is too short.
pub fn read_le<T: CilIO>(data: &[u8]) -> Result<T> {
    let mut offset = 0_usize;
    read_le_at(data, &mut offset)
}

/// Reads a value at `offset` and advances it by the size of `T`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would pass the end of `data`.
pub fn read_le_at<T: CilIO>(data: &[u8], offset: &mut usize) -> Result<T> {
    let type_len = std::mem::size_of::<T>();
    let Some(end) = offset.checked_add(type_len) else {
        return Err(OutOfBounds);
    };

    if end > data.len() {
        return Err(OutOfBounds);
    }

    let Ok(read) = data[*offset..end].try_into() else {
        return Err(OutOfBounds);
    };

    *offset = end;

    Ok(T::from_le_bytes(read))
}

/// Reads a 4-byte index if `is_large`, else a 2-byte one, widening to `u32`.
///
/// # Errors
/// Returns [`crate::Error::OutOfBounds`] if the read would pass the end of `data`.
pub fn read_le_at_dyn(data: &[u8], offset: &mut usize, is_large: bool) -> Result<u32> {
    let res = if is_large {
        read_le_at::<u32>(data, offset)?
    } else {
        u32::from(read_le_at::<u16>(data, offset)?)
    };

    Ok(res)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TEST_BUFFER: [u8; 8] = [0x01, 0x02, 0x03, 0x04, 0x05, 0x06, 0x07, 0x08];

    #[test]
    fn read_le_u8() {
        let result = read_le::<u8>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x01);
    }

    #[test]
    fn read_le_u16() {
        let result = read_le::<u16>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0201);
    }

    #[test]
    fn read_le_u32() {
        let result = read_le::<u32>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0403_0201);
    }

    #[test]
    fn read_le_u64() {
        let result = read_le::<u64>(&TEST_BUFFER).unwrap();
        assert_eq!(result, 0x0807_0605_0403_0201);
    }

    #[test]
    fn read_le_at_advances() {
        let mut offset = 2_usize;
        assert_eq!(read_le_at::<u16>(&TEST_BUFFER, &mut offset).unwrap(), 0x0403);
        assert_eq!(offset, 4);
        assert_eq!(read_le_at::<u32>(&TEST_BUFFER, &mut offset).unwrap(), 0x0807_0605);
        assert_eq!(offset, 8);
    }

    #[test]
    fn read_dyn() {
        let mut offset = 0_usize;
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, false).unwrap(), 0x0201);
        assert_eq!(read_le_at_dyn(&TEST_BUFFER, &mut offset, true).unwrap(), 0x0605_0403);
        assert_eq!(offset, 6);
    }

    #[test]
    fn errors() {
        let buffer = [0xFF, 0xFF, 0xFF];

        assert!(matches!(read_le::<u32>(&buffer), Err(OutOfBounds)));

        let mut offset = 2_usize;
        assert!(matches!(
            read_le_at::<u16>(&buffer, &mut offset),
            Err(OutOfBounds)
        ));
        assert_eq!(offset, 2);

        let mut offset = usize::MAX;
        assert!(matches!(
            read_le_at::<u8>(&buffer, &mut offset),
            Err(OutOfBounds)
        ));
    }
}
