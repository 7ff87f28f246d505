use ndarray::{Array2, Array3, Axis, ShapeBuilder};
use serde_json::Value;

use crate::container::metadata::RadarInstrument;
use crate::prelude::{DecodeError, DecodeResult, ProcessError, ProcessResult};

const DIGITAL_MIN: f32 = -32768.0;
const DIGITAL_MAX: f32 = 32767.0;

/// Fixed digital-to-voltage transform. The deltas are calibration hooks
/// that stay zero for current instruments.
#[inline]
pub fn digital_to_voltage_calibrated(value: i16, delta_a: f32, delta_b: f32) -> f32 {
    let a = (DIGITAL_MAX - DIGITAL_MIN) / 40.0;
    let b = DIGITAL_MIN + 20.0 * a;
    (value as f32 - (b + delta_b)) / (a + delta_a)
}

#[inline]
pub fn digital_to_voltage(value: i16) -> f32 {
    digital_to_voltage_calibrated(value, 0.0, 0.0)
}

/// Calibrated 3-D sample volume with axis order (sample, channel, slice).
///
/// Immutable once decoded; the slice accessors hand out fresh copies so
/// concurrent extractions can share the volume read-only.
#[derive(Debug, Clone)]
pub struct RadarVolume {
    pub name: String,
    pub metadata: Value,
    pub instrument: RadarInstrument,
    data: Array3<f32>,
}

impl RadarVolume {
    /// Builds the volume from the raw block bytes: little-endian `i16`
    /// samples with the sample axis varying fastest, then channel, then
    /// slice, mapped through the voltage transform.
    pub fn from_block(
        name: String,
        instrument: RadarInstrument,
        metadata: Value,
        bytes: &[u8],
        samples: usize,
        channels: usize,
        slices: usize,
    ) -> DecodeResult<Self> {
        let sample_total = samples
            .checked_mul(channels)
            .and_then(|v| v.checked_mul(slices))
            .ok_or_else(|| DecodeError::Format("volume dimensions overflow".into()))?;
        let byte_total = sample_total
            .checked_mul(2)
            .ok_or_else(|| DecodeError::Format("volume byte size overflows".into()))?;
        if bytes.len() < byte_total {
            return Err(DecodeError::Block {
                name,
                reason: format!(
                    "expected {} bytes of samples, found {}",
                    byte_total,
                    bytes.len()
                ),
            });
        }

        let mut voltages = Vec::with_capacity(sample_total);
        for pair in bytes[..byte_total].chunks_exact(2) {
            let raw = i16::from_le_bytes([pair[0], pair[1]]);
            voltages.push(digital_to_voltage(raw));
        }

        // Column-major shape keeps the on-disk ordering without a shuffle.
        let data = Array3::from_shape_vec((samples, channels, slices).f(), voltages).map_err(
            |err| DecodeError::Block {
                name: name.clone(),
                reason: err.to_string(),
            },
        )?;

        Ok(Self {
            name,
            metadata,
            instrument,
            data,
        })
    }

    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn sample_count(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn channel_count(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    pub fn slice_count(&self) -> usize {
        self.data.len_of(Axis(2))
    }

    /// B-scan: fix the channel axis; rows = samples, columns = slices.
    pub fn channel_view(&self, channel: usize) -> ProcessResult<Array2<f32>> {
        let extent = self.channel_count();
        if channel >= extent {
            return Err(ProcessError::IndexOutOfRange {
                axis: "channel",
                index: channel,
                extent,
            });
        }
        Ok(self.data.index_axis(Axis(1), channel).to_owned())
    }

    /// C-scan: fix the sample (depth) axis; rows = channels, columns = slices.
    pub fn depth_view(&self, depth: usize) -> ProcessResult<Array2<f32>> {
        let extent = self.sample_count();
        if depth >= extent {
            return Err(ProcessError::IndexOutOfRange {
                axis: "sample",
                index: depth,
                extent,
            });
        }
        Ok(self.data.index_axis(Axis(0), depth).to_owned())
    }

    /// T-scan: fix the slice axis; rows = samples, columns = channels.
    pub fn along_track_view(&self, slice: usize) -> ProcessResult<Array2<f32>> {
        let extent = self.slice_count();
        if slice >= extent {
            return Err(ProcessError::IndexOutOfRange {
                axis: "slice",
                index: slice,
                extent,
            });
        }
        Ok(self.data.index_axis(Axis(2), slice).to_owned())
    }

    /// Along-track extent of the survey in meters.
    pub fn max_position_m(&self) -> f32 {
        self.slice_count() as f32 * self.instrument.sampling_step_m
    }

    /// Two-way depth extent in centimeters.
    pub fn max_depth_cm(&self) -> f32 {
        self.sample_count() as f32
            * self.instrument.sampling_time_ns
            * self.instrument.propagation_velocity_m_per_sec
            * 1e-9
            * 100.0
            / 2.0
    }
}
