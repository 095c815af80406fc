use core::mem::MaybeUninit;

use crate::{
    error::{
        EncodingError,
        EncodingResult,
    },
    state::U64_SIZE,
};

pub const UNINIT_BYTE: MaybeUninit<u8> = MaybeUninit::uninit();

/// # Safety
///
/// Implementor must guarantee `pack_into_slice` writes all `LEN` bytes.
pub unsafe trait Pack<const LEN: usize>: Sized {
    /// Pack into a buffer of size LEN without zero initializing the buffer, then return the buffer.
    fn pack(&self) -> [u8; LEN] {
        let mut dst = [UNINIT_BYTE; LEN];
        self.pack_into_slice(&mut dst);

        // Safety: All LEN bytes were initialized in `pack_into_slice`.
        unsafe { *(dst.as_ptr() as *const [u8; LEN]) }
    }

    #[doc(hidden)]
    /// Pack into a destination slice of maybe uninitialized bytes of LEN length.
    fn pack_into_slice(&self, dst: &mut [MaybeUninit<u8>; LEN]);
}

/// Writes bytes from a source slice into an uninitialized destination buffer.
///
/// `src` and `dst` must have the same length; a short write leaves the tail of `dst`
/// uninitialized.
///
/// From pinocchio's `[no_std]` library:
/// <https://github.com/anza-xyz/pinocchio/blob/3044aaf5ea7eac01adc754d4bdf93c21c6e54d42/programs/token/src/lib.rs#L13>
#[inline(always)]
pub fn write_bytes(dst: &mut [MaybeUninit<u8>], src: &[u8]) {
    debug_assert_eq!(
        src.len(),
        dst.len(),
        "tried to `write_bytes` with mismatched src/dst lengths"
    );
    for (d, s) in dst.iter_mut().zip(src.iter()) {
        d.write(*s);
    }
}

/// Reads the little-endian `u64` at `offset`.
pub fn read_le_u64(src: &[u8], offset: usize) -> EncodingResult<u64> {
    src.get(offset..offset + U64_SIZE)
        .and_then(|bytes| bytes.try_into().ok())
        .map(u64::from_le_bytes)
        .ok_or(EncodingError::InvalidDataLength)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn read_le_u64_at_offsets() {
        let bytes = [0xff, 1, 0, 0, 0, 0, 0, 0, 0x80, 7];
        assert_eq!(read_le_u64(&bytes, 1), Ok(0x8000_0000_0000_0001));
        assert_eq!(read_le_u64(&bytes, 2), Ok(0x0780_0000_0000_0000));
        assert_eq!(
            read_le_u64(&bytes, 3),
            Err(EncodingError::InvalidDataLength)
        );
    }
}
