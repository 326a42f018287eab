//! Pixel encodings and borrowed band buffers.
//!
//! A band is a flat row-major block of `width * height` samples. Complex
//! working types store each sample as an interleaved `(real, imag)` pair, so
//! their buffers hold twice as many components as there are pixels.

pub mod codec;
pub mod mask;

use ndarray::{ArrayView2, ArrayViewMut2};
use num_traits::{Bounded, NumCast, Zero};

use crate::error::WarpError;

/// Canonical in-memory encoding of pixel samples for the duration of a warp.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum WorkingType {
    Unknown,
    UInt8,
    Int16,
    UInt16,
    Int32,
    UInt32,
    Float32,
    Float64,
    CInt16,
    CInt32,
    CFloat32,
    CFloat64,
}

impl WorkingType {
    /// Every supported encoding, `Unknown` excluded.
    pub const ALL: [WorkingType; 11] = [
        Self::UInt8,
        Self::Int16,
        Self::UInt16,
        Self::Int32,
        Self::UInt32,
        Self::Float32,
        Self::Float64,
        Self::CInt16,
        Self::CInt32,
        Self::CFloat32,
        Self::CFloat64,
    ];

    /// Parse from a GDAL-style data type name (case-insensitive).
    pub fn from_name(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "byte" | "uint8" => Some(Self::UInt8),
            "int16" => Some(Self::Int16),
            "uint16" => Some(Self::UInt16),
            "int32" => Some(Self::Int32),
            "uint32" => Some(Self::UInt32),
            "float32" => Some(Self::Float32),
            "float64" => Some(Self::Float64),
            "cint16" | "complexint16" => Some(Self::CInt16),
            "cint32" | "complexint32" => Some(Self::CInt32),
            "cfloat32" | "complexfloat32" => Some(Self::CFloat32),
            "cfloat64" | "complexfloat64" => Some(Self::CFloat64),
            _ => None,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(
            self,
            Self::CInt16 | Self::CInt32 | Self::CFloat32 | Self::CFloat64
        )
    }

    /// Number of stored components per pixel (2 for complex types).
    pub fn components(&self) -> usize {
        if self.is_complex() {
            2
        } else {
            1
        }
    }
}

/// A scalar component type a band buffer can be made of.
pub trait Component: Copy + NumCast + Send + Sync + 'static {
    /// Working type of a band holding one component per pixel.
    const REAL: WorkingType;

    /// Widen to double precision without loss.
    fn widen(self) -> f64;

    /// Narrow from double precision. Integer types saturate at their bounds.
    fn narrow(value: f64) -> Self;

    fn band(data: &[Self]) -> BandBuffer<'_>;

    fn band_mut(data: &mut [Self]) -> BandBufferMut<'_>;
}

/// Clamp to the representable range of `T` and truncate toward zero.
/// NaN has no integer counterpart and encodes as zero.
fn saturate<T>(value: f64) -> T
where
    T: Bounded + NumCast + Zero,
{
    if value.is_nan() {
        return T::zero();
    }
    let lo = T::min_value().to_f64().unwrap_or(f64::MIN);
    let hi = T::max_value().to_f64().unwrap_or(f64::MAX);
    NumCast::from(num_traits::clamp(value, lo, hi)).unwrap_or_else(T::zero)
}

macro_rules! integer_component {
    ($($t:ty => $variant:ident),* $(,)?) => {
        $(
            impl Component for $t {
                const REAL: WorkingType = WorkingType::$variant;

                #[inline]
                fn widen(self) -> f64 {
                    self.into()
                }

                #[inline]
                fn narrow(value: f64) -> Self {
                    saturate(value)
                }

                fn band(data: &[Self]) -> BandBuffer<'_> {
                    BandBuffer::$variant(data)
                }

                fn band_mut(data: &mut [Self]) -> BandBufferMut<'_> {
                    BandBufferMut::$variant(data)
                }
            }
        )*
    };
}

integer_component! {
    u8 => UInt8,
    i16 => Int16,
    u16 => UInt16,
    i32 => Int32,
    u32 => UInt32,
}

impl Component for f32 {
    const REAL: WorkingType = WorkingType::Float32;

    #[inline]
    fn widen(self) -> f64 {
        self.into()
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value as f32
    }

    fn band(data: &[Self]) -> BandBuffer<'_> {
        BandBuffer::Float32(data)
    }

    fn band_mut(data: &mut [Self]) -> BandBufferMut<'_> {
        BandBufferMut::Float32(data)
    }
}

impl Component for f64 {
    const REAL: WorkingType = WorkingType::Float64;

    #[inline]
    fn widen(self) -> f64 {
        self
    }

    #[inline]
    fn narrow(value: f64) -> Self {
        value
    }

    fn band(data: &[Self]) -> BandBuffer<'_> {
        BandBuffer::Float64(data)
    }

    fn band_mut(data: &mut [Self]) -> BandBufferMut<'_> {
        BandBufferMut::Float64(data)
    }
}

/// Run `$body` with `$data` bound to the typed slice inside a band buffer.
macro_rules! with_band_slice {
    ($buf:expr, $enum:ident, |$data:ident| $body:expr) => {
        match $buf {
            $enum::UInt8($data) => $body,
            $enum::Int16($data) => $body,
            $enum::UInt16($data) => $body,
            $enum::Int32($data) => $body,
            $enum::UInt32($data) => $body,
            $enum::Float32($data) => $body,
            $enum::Float64($data) => $body,
            $enum::CInt16($data) => $body,
            $enum::CInt32($data) => $body,
            $enum::CFloat32($data) => $body,
            $enum::CFloat64($data) => $body,
        }
    };
}
pub(crate) use with_band_slice;

macro_rules! band_buffers {
    ($($variant:ident($t:ty)),* $(,)?) => {
        /// Read-only view of one band, tagged with its encoding.
        #[derive(Clone, Copy, Debug)]
        pub enum BandBuffer<'a> {
            $($variant(&'a [$t]),)*
        }

        /// Mutable view of one destination band, tagged with its encoding.
        #[derive(Debug)]
        pub enum BandBufferMut<'a> {
            $($variant(&'a mut [$t]),)*
        }

        impl BandBuffer<'_> {
            pub fn working_type(&self) -> WorkingType {
                match self {
                    $(Self::$variant(_) => WorkingType::$variant,)*
                }
            }
        }

        impl BandBufferMut<'_> {
            pub fn working_type(&self) -> WorkingType {
                match self {
                    $(Self::$variant(_) => WorkingType::$variant,)*
                }
            }

            /// Reborrow as a read-only view.
            pub fn as_buffer(&self) -> BandBuffer<'_> {
                match self {
                    $(Self::$variant(data) => BandBuffer::$variant(&data[..]),)*
                }
            }
        }
    };
}

band_buffers! {
    UInt8(u8),
    Int16(i16),
    UInt16(u16),
    Int32(i32),
    UInt32(u32),
    Float32(f32),
    Float64(f64),
    CInt16(i16),
    CInt32(i32),
    CFloat32(f32),
    CFloat64(f64),
}

impl<'a> BandBuffer<'a> {
    /// Number of stored components (twice the pixel count for complex types).
    pub fn len(&self) -> usize {
        with_band_slice!(*self, BandBuffer, |data| data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow a standard-layout 2-D array as a real-valued band.
    pub fn from_view<T: Component>(view: ArrayView2<'a, T>) -> Result<Self, WarpError> {
        view.to_slice().map(T::band).ok_or_else(|| {
            WarpError::Config("band array must be contiguous in row-major order".into())
        })
    }
}

impl<'a> BandBufferMut<'a> {
    pub fn len(&self) -> usize {
        with_band_slice!(self, BandBufferMut, |data| data.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Borrow a standard-layout 2-D array as a mutable real-valued band.
    pub fn from_view_mut<T: Component>(view: ArrayViewMut2<'a, T>) -> Result<Self, WarpError> {
        view.into_slice().map(T::band_mut).ok_or_else(|| {
            WarpError::Config("band array must be contiguous in row-major order".into())
        })
    }
}

/// Placement of a chunk buffer inside the larger logical image.
///
/// `x_off`/`y_off` translate chunk-local pixel/line coordinates into the outer
/// image space the transformer works in.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Window {
    pub x_off: usize,
    pub y_off: usize,
    pub width: usize,
    pub height: usize,
}

impl Window {
    pub fn new(x_off: usize, y_off: usize, width: usize, height: usize) -> Self {
        Self {
            x_off,
            y_off,
            width,
            height,
        }
    }

    /// A window at the origin of its own image.
    pub fn sized(width: usize, height: usize) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn pixel_count(&self) -> usize {
        self.width * self.height
    }

    /// Flat pixel offset of chunk-local `(x, y)`.
    #[inline]
    pub fn offset(&self, x: usize, y: usize) -> usize {
        x + y * self.width
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, Array2};

    #[test]
    fn test_from_name() {
        assert_eq!(WorkingType::from_name("Byte"), Some(WorkingType::UInt8));
        assert_eq!(WorkingType::from_name("cfloat32"), Some(WorkingType::CFloat32));
        assert_eq!(
            WorkingType::from_name("ComplexInt16"),
            Some(WorkingType::CInt16)
        );
        assert_eq!(WorkingType::from_name("Unknown"), None);
        assert_eq!(WorkingType::from_name("int64"), None);
    }

    #[test]
    fn test_components() {
        for wt in WorkingType::ALL {
            assert_eq!(wt.components(), if wt.is_complex() { 2 } else { 1 });
        }
    }

    #[test]
    fn test_widen_is_lossless() {
        assert_eq!(255u8.widen(), 255.0);
        assert_eq!((-32768i16).widen(), -32768.0);
        assert_eq!(65535u16.widen(), 65535.0);
        assert_eq!(i32::MIN.widen(), -2147483648.0);
        assert_eq!(u32::MAX.widen(), 4294967295.0);
        assert_eq!(0.1f32.widen(), 0.1f32 as f64);
        assert_eq!(1e300f64.widen(), 1e300);
    }

    #[test]
    fn test_saturate_bounds() {
        assert_eq!(u8::narrow(300.0), 255);
        assert_eq!(u8::narrow(-5.0), 0);
        assert_eq!(u8::narrow(12.9), 12);
        assert_eq!(i16::narrow(-3.7), -3);
        assert_eq!(u32::narrow(1e12), u32::MAX);
        assert_eq!(i32::narrow(-1e12), i32::MIN);
        assert_eq!(u16::narrow(f64::NAN), 0);
    }

    #[test]
    fn test_float_narrow_is_unclamped() {
        assert_eq!(f32::narrow(1e40), f32::INFINITY);
        assert_eq!(f64::narrow(-1e300), -1e300);
    }

    #[test]
    fn test_band_from_view() {
        let arr = array![[1u16, 2], [3, 4]];
        let band = BandBuffer::from_view(arr.view()).unwrap();
        assert_eq!(band.working_type(), WorkingType::UInt16);
        assert_eq!(band.len(), 4);

        // A transposed view is not row-major contiguous.
        assert!(BandBuffer::from_view(arr.t()).is_err());
    }

    #[test]
    fn test_band_mut_from_view() {
        let mut arr = Array2::<f32>::zeros((3, 2));
        let band = BandBufferMut::from_view_mut(arr.view_mut()).unwrap();
        assert_eq!(band.working_type(), WorkingType::Float32);
        assert_eq!(band.as_buffer().len(), 6);
    }

    #[test]
    fn test_window_offset() {
        let w = Window::new(10, 20, 4, 3);
        assert_eq!(w.pixel_count(), 12);
        assert_eq!(w.offset(0, 0), 0);
        assert_eq!(w.offset(3, 2), 11);
    }
}
