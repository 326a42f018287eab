//! Pixel codec: moves single samples between band buffers and a canonical
//! `(real, imag)` double-precision pair.

use super::{with_band_slice, BandBuffer, BandBufferMut, Component, WorkingType};
use crate::error::WarpError;

/// Decode the sample at pixel `offset` of `buffer`.
///
/// Non-complex types yield `imag = 0.0`. Complex samples are read from
/// component offsets `2 * offset` and `2 * offset + 1`.
pub fn read_sample(
    working_type: WorkingType,
    buffer: &BandBuffer<'_>,
    offset: usize,
) -> Result<(f64, f64), WarpError> {
    check_type(working_type, buffer.working_type())?;
    let complex = working_type.is_complex();
    with_band_slice!(*buffer, BandBuffer, |data| decode(data, offset, complex))
}

/// Encode `(real, imag)` into pixel `offset` of `buffer`.
///
/// Integer targets clamp each component to their representable range before
/// truncating; float targets are only narrowed. `imag` is ignored for
/// non-complex types.
pub fn write_sample(
    working_type: WorkingType,
    buffer: &mut BandBufferMut<'_>,
    offset: usize,
    real: f64,
    imag: f64,
) -> Result<(), WarpError> {
    check_type(working_type, buffer.working_type())?;
    let complex = working_type.is_complex();
    with_band_slice!(buffer, BandBufferMut, |data| encode(
        &mut data[..],
        offset,
        complex,
        real,
        imag
    ))
}

fn check_type(expected: WorkingType, found: WorkingType) -> Result<(), WarpError> {
    if expected == WorkingType::Unknown {
        return Err(WarpError::UnsupportedType(expected));
    }
    if expected != found {
        return Err(WarpError::TypeMismatch { expected, found });
    }
    Ok(())
}

#[inline]
fn decode<T: Component>(data: &[T], offset: usize, complex: bool) -> Result<(f64, f64), WarpError> {
    if complex {
        let i = offset * 2;
        match data.get(i..i + 2) {
            Some(&[re, im]) => Ok((re.widen(), im.widen())),
            _ => Err(WarpError::OutOfBounds {
                offset: i,
                len: data.len(),
            }),
        }
    } else {
        data.get(offset)
            .map(|v| (v.widen(), 0.0))
            .ok_or(WarpError::OutOfBounds {
                offset,
                len: data.len(),
            })
    }
}

#[inline]
fn encode<T: Component>(
    data: &mut [T],
    offset: usize,
    complex: bool,
    real: f64,
    imag: f64,
) -> Result<(), WarpError> {
    let len = data.len();
    if complex {
        let i = offset * 2;
        match data.get_mut(i..i + 2) {
            Some([re, im]) => {
                *re = T::narrow(real);
                *im = T::narrow(imag);
                Ok(())
            }
            _ => Err(WarpError::OutOfBounds { offset: i, len }),
        }
    } else {
        match data.get_mut(offset) {
            Some(slot) => {
                *slot = T::narrow(real);
                Ok(())
            }
            None => Err(WarpError::OutOfBounds { offset, len }),
        }
    }
}
