use serde_json::Value;

use crate::prelude::{DecodeError, DecodeResult};

const SLICE_ID_BYTES: usize = 8;
const COORD_BYTES: usize = 8;
const COORDS_PER_TUPLE: usize = 4;
const TUPLES_PER_SWEEP: usize = 2;

/// One geolocated trace position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeoPoint {
    pub longitude: f64,
    pub latitude: f64,
}

/// Per-(slice, channel) antenna positions in slice-major order.
///
/// Invariant: `points.len() == slices * channels`.
#[derive(Debug, Clone)]
pub struct GeolocationTable {
    pub name: String,
    pub srs: Value,
    points: Vec<GeoPoint>,
}

impl GeolocationTable {
    /// Parses the geolocation block: per slice an 8-byte identifier, then
    /// per channel two (x, y, depth, elevation) float64 tuples of which
    /// only the first tuple's x/y are kept.
    pub fn from_block(
        name: String,
        srs: Value,
        bytes: &[u8],
        slices: usize,
        channels: usize,
    ) -> DecodeResult<Self> {
        let sweep_bytes = channels
            .checked_mul(TUPLES_PER_SWEEP * COORDS_PER_TUPLE * COORD_BYTES)
            .and_then(|v| v.checked_add(SLICE_ID_BYTES))
            .and_then(|v| v.checked_mul(slices))
            .ok_or_else(|| DecodeError::Format("geolocation block size overflows".into()))?;
        if bytes.len() < sweep_bytes {
            return Err(DecodeError::Block {
                name,
                reason: format!("expected {} bytes, found {}", sweep_bytes, bytes.len()),
            });
        }

        let mut points = Vec::with_capacity(slices * channels);
        let mut cursor = 0usize;
        for _ in 0..slices {
            cursor += SLICE_ID_BYTES; // slice identifier, unused
            for _ in 0..channels {
                let longitude = read_f64(bytes, cursor);
                let latitude = read_f64(bytes, cursor + COORD_BYTES);
                // depth/elevation of the shallow tuple, then the whole deep
                // tuple, are advanced over and discarded
                cursor += 2 * COORDS_PER_TUPLE * COORD_BYTES;
                points.push(GeoPoint {
                    longitude,
                    latitude,
                });
            }
        }

        Ok(Self { name, srs, points })
    }

    pub fn points(&self) -> &[GeoPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

fn read_f64(bytes: &[u8], at: usize) -> f64 {
    let mut raw = [0u8; COORD_BYTES];
    raw.copy_from_slice(&bytes[at..at + COORD_BYTES]);
    f64::from_le_bytes(raw)
}
