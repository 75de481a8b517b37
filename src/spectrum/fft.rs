//! Square 2D inverse FFT built on a single planned 1D transform.

use rustfft::{num_complex::Complex, Fft, FftPlanner};
use std::sync::Arc;

/// Unnormalized in-place inverse 2D FFT over an `n` x `n` row-major buffer
pub struct InverseFft2d {
    size: usize,
    fft: Arc<dyn Fft<f32>>,
    scratch: Vec<Complex<f32>>,
    column: Vec<Complex<f32>>,
}

impl InverseFft2d {
    /// Plan the transform for `size` samples per side
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let fft = planner.plan_fft_inverse(size);
        let scratch = vec![Complex::new(0.0, 0.0); fft.get_inplace_scratch_len()];

        Self {
            size,
            fft,
            scratch,
            column: vec![Complex::new(0.0, 0.0); size],
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Transform `data` in place: rows first, then columns.
    ///
    /// Output is `sum_k X[k] * exp(+2*pi*i*k*j/n)` with no `1/n²` scaling.
    pub fn process(&mut self, data: &mut [Complex<f32>]) {
        let n = self.size;
        assert_eq!(data.len(), n * n, "buffer does not match planned size");

        // Every row is a contiguous chunk of length n
        self.fft.process_with_scratch(data, &mut self.scratch);

        for x in 0..n {
            for z in 0..n {
                self.column[z] = data[z * n + x];
            }
            self.fft
                .process_with_scratch(&mut self.column, &mut self.scratch);
            for z in 0..n {
                data[z * n + x] = self.column[z];
            }
        }
    }
}
