use ndarray::parallel::prelude::*;
use ndarray::{Array2, Axis};
use num_complex::Complex32;
use rustfft::num_traits::Zero;

use crate::math::fft::FftHelper;

/// Frequency-domain bandpass applied per trace.
///
/// Each column is transformed, every bin whose frequency `j * df`
/// (with `df = sampling_rate / rows`) falls outside `[low_cut, high_cut]`
/// is zeroed, and the real part of the inverse transform is kept. The
/// bin sweep covers all `rows` bins, mirror half included.
pub fn bandpass_filter(
    scan: Array2<f32>,
    low_cut: f64,
    high_cut: f64,
    sampling_rate: f64,
) -> Array2<f32> {
    let (rows, cols) = scan.dim();
    if rows == 0 || cols == 0 {
        return scan;
    }
    let df = sampling_rate / rows as f64;
    let fft = FftHelper::new(rows);

    let source = scan.view();
    let mut output = Array2::zeros((rows, cols));
    output
        .axis_iter_mut(Axis(1))
        .into_par_iter()
        .enumerate()
        .for_each(|(i, mut out_col)| {
            let column: Vec<f32> = source.column(i).to_vec();
            let mut spectrum = fft.forward(&column);
            for (j, bin) in spectrum.iter_mut().enumerate() {
                let freq = j as f64 * df;
                if freq < low_cut || freq > high_cut {
                    *bin = Complex32::zero();
                }
            }
            let filtered = fft.inverse_real(spectrum);
            for (dst, value) in out_col.iter_mut().zip(filtered) {
                *dst = value;
            }
        });
    output
}
