//! Scanline scan driver.
//!
//! For each destination row, maps every pixel centre back into the source
//! chunk with one batch call to the transformer, samples each band and writes
//! the result in place.

use tracing::{debug, trace, warn};

use super::chunk::{DestChunk, SourceChunk};
use super::progress::{Progress, ProgressRange};
use crate::error::WarpError;
use crate::raster::WorkingType;
use crate::resample::{self, ResamplingMethod};
use crate::transform::{Direction, Transformer};

/// Per-run settings for the general case.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scan {
    pub method: ResamplingMethod,
    pub working_type: WorkingType,
    pub band_count: usize,
    pub progress_range: ProgressRange,
}

/// Per-row coordinate buffers reused across scanlines.
struct RowPoints {
    x: Vec<f64>,
    y: Vec<f64>,
    z: Vec<f64>,
    success: Vec<bool>,
}

impl RowPoints {
    fn new(width: usize) -> Self {
        Self {
            x: vec![0.0; width],
            y: vec![0.0; width],
            z: vec![0.0; width],
            success: vec![false; width],
        }
    }

    /// Destination pixel centres of row `row`, in outer image coordinates.
    fn setup(&mut self, row: usize, x_off: usize, y_off: usize) {
        let y = row as f64 + 0.5 + y_off as f64;
        for (col, ((px, py), pz)) in self
            .x
            .iter_mut()
            .zip(self.y.iter_mut())
            .zip(self.z.iter_mut())
            .enumerate()
        {
            *px = col as f64 + 0.5 + x_off as f64;
            *py = y;
            *pz = 0.0;
        }
        self.success.fill(false);
    }
}

impl Scan {
    /// Run the scan over every destination row.
    ///
    /// Progress is reported once before the first row and after every row.
    /// A `false` answer stops the scan with [`WarpError::Cancelled`]; rows
    /// already done keep their output.
    pub(crate) fn run<P: Progress + ?Sized>(
        &self,
        src: &SourceChunk<'_>,
        dst: &mut DestChunk<'_>,
        transformer: &dyn Transformer,
        progress: &mut P,
    ) -> Result<(), WarpError> {
        let dst_window = dst.window;
        let rows = dst_window.height;
        let mut points = RowPoints::new(dst_window.width);

        if !progress.report(self.progress_range.fraction(0, rows), "") {
            warn!("warp cancelled before the first scanline");
            return Err(WarpError::Cancelled { rows_done: 0 });
        }

        let mut written_total = 0usize;
        for row in 0..rows {
            points.setup(row, dst_window.x_off, dst_window.y_off);
            transformer.transform(
                Direction::DstToSrc,
                &mut points.x,
                &mut points.y,
                &mut points.z,
                &mut points.success,
            );

            let written = self.scan_row(src, dst, &points, row)?;
            written_total += written;
            trace!(row, written, "scanline done");

            let rows_done = row + 1;
            if !progress.report(self.progress_range.fraction(rows_done, rows), "") {
                warn!(rows_done, rows, "warp cancelled");
                return Err(WarpError::Cancelled { rows_done });
            }
        }

        debug!(rows, pixels = written_total, "warp complete");
        Ok(())
    }

    /// Resample one transformed row. Returns the number of pixels committed.
    fn scan_row(
        &self,
        src: &SourceChunk<'_>,
        dst: &mut DestChunk<'_>,
        points: &RowPoints,
        row: usize,
    ) -> Result<usize, WarpError> {
        let src_window = src.window;
        let margin = self.method.window_radius() as f64;
        let mut written = 0;

        for (col, ((&x, &y), &ok)) in points
            .x
            .iter()
            .zip(points.y.iter())
            .zip(points.success.iter())
            .enumerate()
        {
            if !ok {
                continue;
            }

            // Compare before truncating so small negatives are not pulled to 0.
            // For s >= 0, trunc(s) + r >= size holds exactly when s >= size - r.
            let sx = x - src_window.x_off as f64;
            let sy = y - src_window.y_off as f64;
            if !(sx >= margin && sy >= margin) {
                continue;
            }
            if sx >= src_window.width as f64 - margin
                || sy >= src_window.height as f64 - margin
            {
                continue;
            }

            let dst_offset = dst.window.offset(col, row);
            if dst.is_committed(dst_offset) {
                continue;
            }

            let mut density: Option<f64> = None;
            for band in 0..self.band_count {
                let value = resample::sample(self.method, src, self.working_type, band, sx, sy)?;
                if value.is_empty() {
                    continue;
                }
                dst.write(self.working_type, band, dst_offset, value)?;
                density = Some(density.map_or(value.density, |d| d.max(value.density)));
            }

            if let Some(density) = density {
                dst.commit(dst_offset, density);
                written += 1;
            }
        }
        Ok(written)
    }
}
