use anyhow::Context;
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::f32::consts::PI;
use std::fs;
use std::path::Path;

const MAGIC: &[u8; 5] = b"ogpr\n";
const PREAMBLE_LEN: usize = 47;
// Metadata is padded to a fixed capacity so block offsets don't depend on
// the serialized length of the descriptor list.
const METADATA_CAPACITY: usize = 2048;

/// Configuration for generating synthetic containers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    pub samples: usize,
    pub channels: usize,
    pub slices: usize,
    pub frequency: f32,
    pub noise: f32,
    pub seed: u64,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            samples: 256,
            channels: 4,
            slices: 32,
            frequency: 6.0,
            noise: 0.03,
            seed: 0,
        }
    }
}

fn checksum_text(seed: u64) -> String {
    format!("{:032x}", u128::from(seed).wrapping_mul(0x9e37_79b9_7f4a_7c15))
}

fn build_sample_block(config: &GeneratorConfig) -> anyhow::Result<Vec<u8>> {
    let count = config
        .samples
        .checked_mul(config.channels)
        .and_then(|v| v.checked_mul(config.slices))
        .context("overflow computing sample count for generator")?;

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut bytes = Vec::with_capacity(count * 2);

    for _slice in 0..config.slices {
        for channel in 0..config.channels {
            let phase_offset = channel as f32 * 0.25;
            for sample in 0..config.samples {
                let depth = sample as f32 / config.samples as f32;
                let base_phase = depth * 2.0 * PI * config.frequency + phase_offset;
                let envelope = 0.2 + 0.8 * (1.0 - depth);
                let jitter = if config.noise > 0.0 {
                    rng.gen_range(-(config.noise)..config.noise)
                } else {
                    0.0
                };
                let value = base_phase.sin() * envelope + jitter;
                bytes.extend_from_slice(&((value * 12_000.0) as i16).to_le_bytes());
            }
        }
    }

    Ok(bytes)
}

fn build_geolocation_block(config: &GeneratorConfig) -> Vec<u8> {
    let mut bytes = Vec::new();
    for slice in 0..config.slices {
        bytes.extend_from_slice(&(slice as i64).to_le_bytes());
        for channel in 0..config.channels {
            let longitude = 13.40 + slice as f64 * 5e-7;
            let latitude = 52.52 + channel as f64 * 5e-7;
            // shallow tuple, then the deep tuple the parser skips
            for coord in [longitude, latitude, 0.0, 34.0] {
                bytes.extend_from_slice(&coord.to_le_bytes());
            }
            for coord in [longitude, latitude, 2.5, 31.5] {
                bytes.extend_from_slice(&coord.to_le_bytes());
            }
        }
    }
    bytes
}

/// Builds a complete, well-formed container byte image.
pub fn build_container_bytes(config: &GeneratorConfig) -> anyhow::Result<Vec<u8>> {
    let volume = build_sample_block(config)?;
    let geolocations = build_geolocation_block(config);

    let volume_offset = PREAMBLE_LEN + METADATA_CAPACITY;
    let geo_offset = volume_offset + volume.len();

    let document = serde_json::json!({
        "version": {"major": 1, "minor": 0},
        "mainDescriptor": {
            "samplesCount": config.samples,
            "channelsCount": config.channels,
            "slicesCount": config.slices,
            "metadata": {"generator": "workbench", "seed": config.seed}
        },
        "dataBlockDescriptors": [
            {
                "type": "Radar Volume",
                "name": "synthetic volume",
                "byteOffset": volume_offset,
                "byteSize": volume.len(),
                "radar": {
                    "samplingStep_m": 0.05,
                    "samplingTime_ns": 0.1953,
                    "propagationVelocity_mPerSec": 1.2e8,
                    "fequency_MHz": 400,
                    "polarization": "HH"
                }
            },
            {
                "type": "Sample Geolocations",
                "name": "synthetic geolocations",
                "byteOffset": geo_offset,
                "byteSize": geolocations.len(),
                "srs": {"epsg": 4326}
            }
        ]
    });
    let mut metadata = serde_json::to_vec(&document).context("encoding container metadata")?;
    anyhow::ensure!(
        metadata.len() <= METADATA_CAPACITY,
        "metadata exceeds the reserved {} bytes",
        METADATA_CAPACITY
    );
    metadata.resize(METADATA_CAPACITY, b' ');

    let checksum = checksum_text(config.seed);
    let mut bytes = Vec::new();
    bytes.extend_from_slice(MAGIC);
    bytes.extend_from_slice(checksum.as_bytes());
    bytes.push(b'\n');
    bytes.extend_from_slice(format!("{:08}", METADATA_CAPACITY).as_bytes());
    bytes.push(b'\n');
    bytes.extend_from_slice(&metadata);
    bytes.extend_from_slice(&volume);
    bytes.extend_from_slice(&geolocations);
    bytes.push(b'\n');
    bytes.extend_from_slice(checksum.as_bytes());

    Ok(bytes)
}

pub fn write_container<P: AsRef<Path>>(path: P, config: &GeneratorConfig) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    let bytes = build_container_bytes(config)?;
    fs::write(path_ref, bytes)
        .with_context(|| format!("writing synthetic container {}", path_ref.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn generated_container_decodes() {
        let config = GeneratorConfig {
            samples: 16,
            channels: 2,
            slices: 4,
            ..Default::default()
        };
        let bytes = build_container_bytes(&config).unwrap();
        let container = ogprcore::decode(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(container.volume.data().dim(), (16, 2, 4));
        assert_eq!(container.geolocations.unwrap().len(), 8);
    }

    #[test]
    fn generation_is_deterministic_per_seed() {
        let config = GeneratorConfig {
            samples: 8,
            channels: 1,
            slices: 2,
            seed: 7,
            ..Default::default()
        };
        assert_eq!(
            build_container_bytes(&config).unwrap(),
            build_container_bytes(&config).unwrap()
        );
    }
}
