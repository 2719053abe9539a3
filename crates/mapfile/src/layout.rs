//! Bounds-checked, zero-copy views over the raw file bytes.
//!
//! These helpers know nothing about tiles or features. They only turn
//! `(offset, count)` pairs into typed borrows of the underlying buffer.
//!
//! Every record type is `#[repr(C, packed)]` (alignment 1), so any offset
//! is suitably aligned and only the length needs checking.

use std::mem::{align_of, size_of};

use bytemuck::Pod;

use crate::error::{MapFileError, Result};

#[inline(always)]
fn span(buf: &[u8], offset: u64, len: u64) -> Result<&[u8]> {
    let size = buf.len() as u64;
    let out_of_bounds = || MapFileError::OutOfBounds { offset, len, size };

    let end = offset.checked_add(len).ok_or_else(out_of_bounds)?;
    if end > size {
        return Err(out_of_bounds());
    }

    Ok(&buf[offset as usize..end as usize])
}

/// View one `T` at `offset`. `T` must have alignment 1.
#[inline]
pub fn record<T: Pod>(buf: &[u8], offset: u64) -> Result<&T> {
    debug_assert_eq!(align_of::<T>(), 1);
    let bytes = span(buf, offset, size_of::<T>() as u64)?;
    Ok(bytemuck::from_bytes(bytes))
}

/// View `count` consecutive `T`s starting at `offset`. `T` must have
/// alignment 1.
#[inline]
pub fn records<T: Pod>(buf: &[u8], offset: u64, count: usize) -> Result<&[T]> {
    let size = buf.len() as u64;
    let len = (count as u64)
        .checked_mul(size_of::<T>() as u64)
        .ok_or(MapFileError::OutOfBounds {
            offset,
            len: u64::MAX,
            size,
        })?;

    debug_assert_eq!(align_of::<T>(), 1);
    let bytes = span(buf, offset, len)?;
    Ok(bytemuck::cast_slice(bytes))
}

/// Byte offset of element `index` in an array of `T` starting at `base`
/// within `buf`. Overflow is reported against the real buffer size.
#[inline]
pub fn element_offset<T>(buf: &[u8], base: u64, index: u64) -> Result<u64> {
    let elem = size_of::<T>() as u64;
    index
        .checked_mul(elem)
        .and_then(|rel| base.checked_add(rel))
        .ok_or(MapFileError::OutOfBounds {
            offset: base,
            len: index.saturating_mul(elem),
            size: buf.len() as u64,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::records::{Coordinate, StringEntry};

    #[test]
    fn record_views_in_place() {
        let mut buf = vec![0xAAu8; 3];
        buf.extend_from_slice(&7u32.to_le_bytes());
        buf.extend_from_slice(&5u32.to_le_bytes());

        let entry: &StringEntry = record(&buf, 3).unwrap();
        assert_eq!(entry.offset(), 7);
        assert_eq!(entry.length(), 5);

        // Same memory, no copy.
        let entry_ptr = entry as *const StringEntry as *const u8;
        assert_eq!(entry_ptr, buf[3..].as_ptr());
    }

    #[test]
    fn records_slice_in_place() {
        let mut buf = vec![0u8; 1];
        for (lat, lon) in [(1.0f64, 2.0f64), (3.0, 4.0)] {
            buf.extend_from_slice(&lat.to_le_bytes());
            buf.extend_from_slice(&lon.to_le_bytes());
        }

        let coords: &[Coordinate] = records(&buf, 1, 2).unwrap();
        assert_eq!(coords.len(), 2);
        assert_eq!(coords[1].latitude(), 3.0);
        assert_eq!(coords[1].longitude(), 4.0);
    }

    #[test]
    fn reads_past_the_end_fail() {
        let buf = [0u8; 10];
        let err = record::<StringEntry>(&buf, 4).unwrap_err();
        assert!(matches!(
            err,
            MapFileError::OutOfBounds {
                offset: 4,
                len: 8,
                size: 10
            }
        ));

        assert!(records::<Coordinate>(&buf, 0, 1).is_err());
        assert!(records::<Coordinate>(&buf, u64::MAX, 1).is_err());
        assert!(records::<Coordinate>(&buf, 0, usize::MAX).is_err());
    }

    #[test]
    fn every_record_type_has_alignment_one() {
        use crate::records::{FileHeader, MapFeature, TileBlockHeader, TileHeaderEntry};

        assert_eq!(align_of::<FileHeader>(), 1);
        assert_eq!(align_of::<TileHeaderEntry>(), 1);
        assert_eq!(align_of::<TileBlockHeader>(), 1);
        assert_eq!(align_of::<MapFeature>(), 1);
        assert_eq!(align_of::<Coordinate>(), 1);
        assert_eq!(align_of::<StringEntry>(), 1);
        assert_eq!(align_of::<[u8; 2]>(), 1);

        // Any offset works, odd ones included.
        let buf = [0u8; 64];
        for offset in 0..=(64 - size_of::<MapFeature>() as u64) {
            assert!(record::<MapFeature>(&buf, offset).is_ok());
        }
    }

    #[test]
    fn element_offset_overflow_reports_buffer_size() {
        let buf = [0u8; 24];
        assert_eq!(element_offset::<StringEntry>(&buf, 8, 2).unwrap(), 24);

        let err = element_offset::<StringEntry>(&buf, 8, u64::MAX).unwrap_err();
        assert!(matches!(
            err,
            MapFileError::OutOfBounds {
                offset: 8,
                len: u64::MAX,
                size: 24
            }
        ));
    }

    #[test]
    fn empty_slice_at_end_is_fine() {
        let buf = [0u8; 10];
        let none: &[StringEntry] = records(&buf, 10, 0).unwrap();
        assert!(none.is_empty());
    }
}
