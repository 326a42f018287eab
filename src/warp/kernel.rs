//! Warp kernel configuration.
//!
//! A [`WarpKernel`] describes one chunk warp: source and destination buffers
//! with their masks, the working pixel type, the resampling method and the
//! transformer and progress collaborators. It borrows everything from the
//! caller and keeps no state between runs.

use tracing::debug;

use super::chunk::{DestChunk, SourceChunk};
use super::engine;
use super::progress::{NoProgress, Progress, ProgressRange};
use crate::error::WarpError;
use crate::raster::{Window, WorkingType};
use crate::resample::ResamplingMethod;
use crate::transform::Transformer;

pub struct WarpKernel<'a> {
    pub resample: ResamplingMethod,
    pub working_type: WorkingType,
    pub band_count: usize,
    pub src: SourceChunk<'a>,
    pub dst: DestChunk<'a>,
    /// Called once per destination scanline, always destination to source.
    pub transformer: &'a dyn Transformer,
    /// `None` reports nowhere and never cancels.
    pub progress: Option<&'a mut dyn Progress>,
    pub progress_range: ProgressRange,
}

impl<'a> WarpKernel<'a> {
    /// Kernel with `band_count` taken from the source bands and no progress
    /// reporting.
    pub fn new(
        resample: ResamplingMethod,
        working_type: WorkingType,
        src: SourceChunk<'a>,
        dst: DestChunk<'a>,
        transformer: &'a dyn Transformer,
    ) -> Self {
        Self {
            resample,
            working_type,
            band_count: src.bands.len(),
            src,
            dst,
            transformer,
            progress: None,
            progress_range: ProgressRange::default(),
        }
    }

    pub fn with_progress(mut self, progress: &'a mut dyn Progress) -> Self {
        self.progress = Some(progress);
        self
    }

    pub fn with_progress_range(mut self, base: f64, scale: f64) -> Self {
        self.progress_range = ProgressRange::new(base, scale);
        self
    }

    /// Check the configuration before any pixel is touched.
    pub fn validate(&self) -> Result<(), WarpError> {
        if self.working_type == WorkingType::Unknown {
            return Err(WarpError::Config("working type may not be Unknown".into()));
        }
        if self.band_count == 0 {
            return Err(WarpError::Config("band count must be > 0".into()));
        }
        if self.src.bands.len() != self.band_count {
            return Err(WarpError::Config(format!(
                "expected {} source bands, got {}",
                self.band_count,
                self.src.bands.len()
            )));
        }
        if self.dst.bands.len() != self.band_count {
            return Err(WarpError::Config(format!(
                "expected {} destination bands, got {}",
                self.band_count,
                self.dst.bands.len()
            )));
        }

        let src_buffers = self
            .src
            .bands
            .iter()
            .map(|b| (b.working_type(), b.len()));
        check_bands("source", self.working_type, &self.src.window, src_buffers)?;
        let dst_buffers = self
            .dst
            .bands
            .iter()
            .map(|b| (b.working_type(), b.len()));
        check_bands("destination", self.working_type, &self.dst.window, dst_buffers)?;

        let src_pixels = self.src.window.pixel_count();
        if let Some(masks) = &self.src.band_validity {
            if masks.len() != self.band_count {
                return Err(WarpError::Config(format!(
                    "expected {} per-band source masks, got {}",
                    self.band_count,
                    masks.len()
                )));
            }
            for mask in masks.iter().flatten() {
                check_len("per-band source mask", mask.len(), src_pixels)?;
            }
        }
        if let Some(mask) = self.src.unified_validity {
            check_len("unified source mask", mask.len(), src_pixels)?;
        }
        if let Some(density) = self.src.unified_density {
            check_len("unified source density", density.len(), src_pixels)?;
        }

        let dst_pixels = self.dst.window.pixel_count();
        if let Some(mask) = self.dst.validity.as_deref() {
            check_len("destination mask", mask.len(), dst_pixels)?;
        }
        if let Some(density) = self.dst.density.as_deref() {
            check_len("destination density", density.len(), dst_pixels)?;
        }

        if !(self.progress_range.base.is_finite() && self.progress_range.scale.is_finite()) {
            return Err(WarpError::Config("progress range must be finite".into()));
        }
        Ok(())
    }

    /// Validate, then warp the whole destination chunk.
    ///
    /// On cancellation the pixels already written stay written.
    pub fn perform_warp(&mut self) -> Result<(), WarpError> {
        self.validate()?;

        debug!(
            method = ?self.resample,
            working_type = ?self.working_type,
            bands = self.band_count,
            src = ?self.src.window,
            dst = ?self.dst.window,
            "warping chunk"
        );

        let scan = engine::Scan {
            method: self.resample,
            working_type: self.working_type,
            band_count: self.band_count,
            progress_range: self.progress_range,
        };
        match self.progress.as_deref_mut() {
            Some(progress) => scan.run(&self.src, &mut self.dst, self.transformer, progress),
            None => scan.run(&self.src, &mut self.dst, self.transformer, &mut NoProgress),
        }
    }
}

fn check_bands(
    role: &str,
    working_type: WorkingType,
    window: &Window,
    buffers: impl Iterator<Item = (WorkingType, usize)>,
) -> Result<(), WarpError> {
    let expected = window.pixel_count() * working_type.components();
    for (band, (found, len)) in buffers.enumerate() {
        if found != working_type {
            return Err(WarpError::Config(format!(
                "{role} band {band} holds {found:?} samples, working type is {working_type:?}"
            )));
        }
        if len != expected {
            return Err(WarpError::Config(format!(
                "{role} band {band} has {len} components, expected {expected}"
            )));
        }
    }
    Ok(())
}

fn check_len(what: &str, len: usize, expected: usize) -> Result<(), WarpError> {
    if len != expected {
        return Err(WarpError::Config(format!(
            "{what} covers {len} pixels, expected {expected}"
        )));
    }
    Ok(())
}
