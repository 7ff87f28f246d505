use num_complex::Complex32;
use rustfft::{num_traits::Zero, Fft, FftPlanner};

/// Helper that wraps the `rustfft` planner for reuse.
///
/// Both directions are planned up front; the helper is safe to share
/// across rayon workers since processing allocates per call.
pub struct FftHelper {
    forward: std::sync::Arc<dyn Fft<f32>>,
    inverse: std::sync::Arc<dyn Fft<f32>>,
    size: usize,
}

impl FftHelper {
    pub fn new(size: usize) -> Self {
        let mut planner = FftPlanner::new();
        let forward = planner.plan_fft_forward(size);
        let inverse = planner.plan_fft_inverse(size);
        Self {
            forward,
            inverse,
            size,
        }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn forward(&self, input: &[f32]) -> Vec<Complex32> {
        let mut buffer: Vec<Complex32> = input
            .iter()
            .map(|&value| Complex32::new(value, 0.0))
            .collect();
        buffer.resize(self.size, Complex32::zero());
        self.forward.process(&mut buffer);
        buffer
    }

    /// Inverse transform normalized by 1/N, keeping the real part.
    pub fn inverse_real(&self, mut spectrum: Vec<Complex32>) -> Vec<f32> {
        spectrum.resize(self.size, Complex32::zero());
        self.inverse.process(&mut spectrum);
        let scale = 1.0 / self.size as f32;
        spectrum.into_iter().map(|c| c.re * scale).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_returns_planned_length() {
        let helper = FftHelper::new(4);
        let output = helper.forward(&[1.0, 0.0, -1.0, 0.0]);
        assert_eq!(output.len(), 4);
    }

    #[test]
    fn forward_then_inverse_recovers_signal() {
        let helper = FftHelper::new(8);
        let signal = [1.0, 0.5, -0.25, 0.0, 0.75, -1.0, 0.0, 0.25];
        let spectrum = helper.forward(&signal);
        let recovered = helper.inverse_real(spectrum);
        for (a, b) in signal.iter().zip(recovered.iter()) {
            assert!((a - b).abs() < 1e-5);
        }
    }
}
