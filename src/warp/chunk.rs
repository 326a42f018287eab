//! Borrowed source and destination chunk views.
//!
//! The kernel never allocates or frees band buffers: both chunks only borrow
//! caller memory for the duration of a run.

use crate::error::WarpError;
use crate::raster::mask::{self, ValidityMask};
use crate::raster::{codec, BandBuffer, BandBufferMut, Window, WorkingType};
use crate::resample::SampleValue;

/// Read-only source imagery plus its validity and density layers.
#[derive(Clone, Debug)]
pub struct SourceChunk<'a> {
    pub window: Window,
    pub bands: Vec<BandBuffer<'a>>,
    /// Per-band validity masks. `None` entries leave that band fully valid.
    pub band_validity: Option<Vec<Option<&'a ValidityMask>>>,
    /// Validity mask shared by all bands, combined with the band masks by AND.
    pub unified_validity: Option<&'a ValidityMask>,
    /// Per-pixel contribution weights in `[0, 1]`.
    pub unified_density: Option<&'a [f32]>,
}

impl<'a> SourceChunk<'a> {
    pub fn new(window: Window, bands: Vec<BandBuffer<'a>>) -> Self {
        Self {
            window,
            bands,
            band_validity: None,
            unified_validity: None,
            unified_density: None,
        }
    }

    pub fn with_band_validity(mut self, masks: Vec<Option<&'a ValidityMask>>) -> Self {
        self.band_validity = Some(masks);
        self
    }

    pub fn with_unified_validity(mut self, mask: &'a ValidityMask) -> Self {
        self.unified_validity = Some(mask);
        self
    }

    pub fn with_unified_density(mut self, density: &'a [f32]) -> Self {
        self.unified_density = Some(density);
        self
    }

    /// True unless the unified mask or this band's mask marks the pixel invalid.
    #[inline]
    pub fn is_valid(&self, band: usize, offset: usize) -> bool {
        let band_mask = self
            .band_validity
            .as_ref()
            .and_then(|masks| masks.get(band).copied().flatten());
        mask::is_valid(self.unified_validity, offset) && mask::is_valid(band_mask, offset)
    }

    #[inline]
    pub fn density(&self, offset: usize) -> f64 {
        mask::density_at(self.unified_density, offset)
    }

    /// Fetch one source pixel with its density. Masked pixels come back
    /// empty without touching the band data.
    #[inline]
    pub fn fetch(
        &self,
        working_type: WorkingType,
        band: usize,
        offset: usize,
    ) -> Result<SampleValue, WarpError> {
        if !self.is_valid(band, offset) {
            return Ok(SampleValue::EMPTY);
        }
        let buffer = self
            .bands
            .get(band)
            .ok_or_else(|| WarpError::Config(format!("no source band {band}")))?;
        let (real, imag) = codec::read_sample(working_type, buffer, offset)?;
        Ok(SampleValue {
            density: self.density(offset),
            real,
            imag,
        })
    }
}

/// Destination imagery, mutated in place, plus optional bookkeeping layers.
#[derive(Debug)]
pub struct DestChunk<'a> {
    pub window: Window,
    pub bands: Vec<BandBufferMut<'a>>,
    /// Pixels already marked valid here are never rewritten. Pixels the
    /// kernel writes get their bit set.
    pub validity: Option<&'a mut ValidityMask>,
    /// Accumulated density of written pixels.
    pub density: Option<&'a mut [f32]>,
}

impl<'a> DestChunk<'a> {
    pub fn new(window: Window, bands: Vec<BandBufferMut<'a>>) -> Self {
        Self {
            window,
            bands,
            validity: None,
            density: None,
        }
    }

    pub fn with_validity(mut self, mask: &'a mut ValidityMask) -> Self {
        self.validity = Some(mask);
        self
    }

    pub fn with_density(mut self, density: &'a mut [f32]) -> Self {
        self.density = Some(density);
        self
    }

    /// Whether the pixel was committed by an earlier run.
    #[inline]
    pub fn is_committed(&self, offset: usize) -> bool {
        self.validity
            .as_deref()
            .is_some_and(|m| m.is_valid(offset))
    }

    #[inline]
    pub fn write(
        &mut self,
        working_type: WorkingType,
        band: usize,
        offset: usize,
        value: SampleValue,
    ) -> Result<(), WarpError> {
        let buffer = self
            .bands
            .get_mut(band)
            .ok_or_else(|| WarpError::Config(format!("no destination band {band}")))?;
        codec::write_sample(working_type, buffer, offset, value.real, value.imag)
    }

    /// Record that at least one band of the pixel was written with `density`.
    #[inline]
    pub fn commit(&mut self, offset: usize, density: f64) {
        if let Some(mask) = self.validity.as_deref_mut() {
            mask.set_valid(offset);
        }
        if let Some(dst_density) = self.density.as_deref_mut() {
            mask::overlay_density(dst_density, offset, density);
        }
    }
}
