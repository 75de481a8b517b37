//! Statistical ocean spectrum synthesis.
//!
//! A Phillips base spectrum is drawn once per parameter set; every frame it is
//! rotated by the dispersion phase and brought back to the spatial domain with
//! an inverse 2D FFT.

mod fft;
mod field;
mod phillips;

// Re-export public types
pub use fft::InverseFft2d;
pub use field::{SpectrumField, SurfaceView};
pub use phillips::{dispersion, phillips, signed_index, wavevector, BaseSpectrum};
