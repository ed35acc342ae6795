use core::ops::Range;

use anyhow::{anyhow, bail, Context, Result};
use bytemuck::Zeroable;
use rayon::prelude::*;
use raymarch_units::Point;

use crate::{DevicePoint, RayKernel};

/// Compute backend owning its own worker pool. Created once at startup and handed by reference to
/// whatever needs it.
pub struct ComputeContext {
    pool: rayon::ThreadPool,
}

impl ComputeContext {
    /// Creates a context with `threads` workers, or the rayon default when `threads` is zero.
    pub fn new(threads: usize) -> Result<Self> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .thread_name(|i| format!("raymarch-compute-{}", i))
            .build()
            .context("Failed to create compute thread pool")?;

        log::info!(
            "Compute context ready with {} workers",
            pool.current_num_threads()
        );

        Ok(Self { pool })
    }

    /// Runs `kernel` for every pixel of `columns` in row `row` and reads the samples back, pixel by
    /// pixel in column order.
    pub fn dispatch(
        &self,
        kernel: &RayKernel,
        row: i32,
        columns: Range<i32>,
    ) -> Result<Vec<Point>> {
        raymarch_profiling::profile_function!();

        if !(0..kernel.height()).contains(&row) {
            bail!("Row {} is outside of the sensor (height {})", row, kernel.height());
        }
        if columns.start < 0 || columns.end > kernel.width() || columns.is_empty() {
            bail!(
                "Columns {:?} are outside of the sensor (width {})",
                columns,
                kernel.width()
            );
        }

        let points_per_ray = kernel.points_per_ray();

        let width = columns.len();
        let len = width
            .checked_mul(points_per_ray)
            .ok_or_else(|| anyhow!("Device buffer of {} rays is too large", width))?;

        let mut device_buffer = Vec::new();
        device_buffer
            .try_reserve_exact(len)
            .with_context(|| format!("Failed to allocate device buffer of {} points", len))?;
        device_buffer.resize(len, DevicePoint::zeroed());

        let written = self.pool.install(|| {
            device_buffer
                .par_chunks_mut(points_per_ray)
                .zip(columns.into_par_iter())
                .map(|(out, u)| kernel.trace(u, row, out))
                .sum::<usize>()
        });

        Self::read_back(&device_buffer, written)
    }

    /// Only a buffer the kernel filled completely is handed out.
    fn read_back(device_buffer: &[DevicePoint], written: usize) -> Result<Vec<Point>> {
        if written != device_buffer.len() {
            bail!("Kernel wrote {} of {} points", written, device_buffer.len());
        }

        Ok(device_buffer.iter().copied().map(Point::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partially_written_buffer_is_rejected() {
        let buffer = vec![DevicePoint::zeroed(); 6];

        assert!(ComputeContext::read_back(&buffer, 4).is_err());
        assert_eq!(ComputeContext::read_back(&buffer, 6).unwrap().len(), 6);
    }
}
