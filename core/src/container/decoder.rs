use std::fs::File;
use std::io::{BufReader, Read, Seek, SeekFrom};
use std::path::Path;

use serde_json::Value;

use crate::container::geolocation::GeolocationTable;
use crate::container::metadata::{BlockDescriptor, BlockKind, FormatVersion, MetadataDocument};
use crate::container::volume::RadarVolume;
use crate::prelude::{DecodeError, DecodeResult};
use crate::telemetry::log::LogManager;

const MAGIC: &[u8; 5] = b"ogpr\n";
const PREAMBLE_LEN: usize = 47;
const CHECKSUM_START: usize = 5;
const CHECKSUM_LEN: usize = 32;
const LENGTH_START: usize = 38;
const LENGTH_LEN: usize = 8;
const EPILOGUE_LEN: usize = 33;

/// Fully decoded container: framing metadata plus the calibrated volume
/// and optional geolocation side-data.
#[derive(Debug, Clone)]
pub struct OgprContainer {
    pub version: FormatVersion,
    pub samples_count: usize,
    pub channels_count: usize,
    pub slices_count: usize,
    pub metadata: Value,
    pub checksum: String,
    pub volume: RadarVolume,
    pub geolocations: Option<GeolocationTable>,
}

pub fn decode_path<P: AsRef<Path>>(path: P) -> DecodeResult<OgprContainer> {
    let file = File::open(path.as_ref())?;
    decode(&mut BufReader::new(file))
}

/// Decodes a container from any seekable byte source.
///
/// Strictly sequential and fail-closed: framing, metadata or checksum
/// violations abort with no partial result. Optional data blocks that
/// cannot be read are logged and skipped.
pub fn decode<R: Read + Seek>(source: &mut R) -> DecodeResult<OgprContainer> {
    let logger = LogManager::new();

    let (checksum, metadata_len) = read_preamble(source)?;
    let document = read_metadata(source, metadata_len)?;

    let main = &document.main_descriptor;
    let (samples, channels, slices) = (
        main.samples_count,
        main.channels_count,
        main.slices_count,
    );

    let mut volume = None;
    let mut geolocations = None;
    for descriptor in &document.data_block_descriptors {
        match &descriptor.kind {
            BlockKind::RadarVolume { radar, metadata } => {
                // The volume block is required; a short read here is fatal.
                let bytes = read_block(source, descriptor)?;
                volume = Some(RadarVolume::from_block(
                    descriptor.name.clone(),
                    radar.clone(),
                    metadata.clone(),
                    &bytes,
                    samples,
                    channels,
                    slices,
                )?);
            }
            BlockKind::SampleGeolocations { srs } => {
                let parsed = read_block(source, descriptor).and_then(|bytes| {
                    GeolocationTable::from_block(
                        descriptor.name.clone(),
                        srs.clone(),
                        &bytes,
                        slices,
                        channels,
                    )
                });
                match parsed {
                    Ok(table) => geolocations = Some(table),
                    Err(err) => logger.warn(&format!(
                        "skipping geolocation block '{}': {}",
                        descriptor.name, err
                    )),
                }
            }
            BlockKind::Unknown => {
                logger.record(&format!(
                    "ignoring data block '{}' of unknown type",
                    descriptor.name
                ));
            }
        }
    }

    let volume = volume
        .ok_or_else(|| DecodeError::Format("container holds no radar volume block".into()))?;

    let epilogue_checksum = read_epilogue(source)?;
    if epilogue_checksum != checksum {
        return Err(DecodeError::ChecksumMismatch {
            expected: checksum,
            actual: epilogue_checksum,
        });
    }

    Ok(OgprContainer {
        version: document.version,
        samples_count: samples,
        channels_count: channels,
        slices_count: slices,
        metadata: main.metadata.clone(),
        checksum,
        volume,
        geolocations,
    })
}

fn read_preamble<R: Read>(source: &mut R) -> DecodeResult<(String, u64)> {
    let mut preamble = [0u8; PREAMBLE_LEN];
    source
        .read_exact(&mut preamble)
        .map_err(|_| DecodeError::Format("preamble too short".into()))?;

    if &preamble[..MAGIC.len()] != MAGIC {
        return Err(DecodeError::Format("magic number mismatch".into()));
    }

    let checksum = std::str::from_utf8(&preamble[CHECKSUM_START..CHECKSUM_START + CHECKSUM_LEN])
        .map_err(|_| DecodeError::Format("checksum field is not valid text".into()))?
        .to_string();

    let length_text = std::str::from_utf8(&preamble[LENGTH_START..LENGTH_START + LENGTH_LEN])
        .map_err(|_| DecodeError::Format("metadata length field is not valid text".into()))?;
    let metadata_len: u64 = length_text.trim().parse().map_err(|_| {
        DecodeError::Format(format!("invalid metadata length '{}'", length_text.trim()))
    })?;
    if metadata_len == 0 {
        return Err(DecodeError::Format("metadata length must be positive".into()));
    }

    Ok((checksum, metadata_len))
}

fn read_metadata<R: Read>(source: &mut R, length: u64) -> DecodeResult<MetadataDocument> {
    let mut buffer = vec![0u8; length as usize];
    source
        .read_exact(&mut buffer)
        .map_err(|_| DecodeError::Format("metadata block shorter than declared".into()))?;
    Ok(serde_json::from_slice(&buffer)?)
}

fn read_block<R: Read + Seek>(
    source: &mut R,
    descriptor: &BlockDescriptor,
) -> DecodeResult<Vec<u8>> {
    source.seek(SeekFrom::Start(descriptor.byte_offset))?;
    let mut bytes = vec![0u8; descriptor.byte_size as usize];
    source
        .read_exact(&mut bytes)
        .map_err(|err| DecodeError::Block {
            name: descriptor.name.clone(),
            reason: err.to_string(),
        })?;
    Ok(bytes)
}

fn read_epilogue<R: Read + Seek>(source: &mut R) -> DecodeResult<String> {
    source
        .seek(SeekFrom::End(-(EPILOGUE_LEN as i64)))
        .map_err(|_| DecodeError::Format("epilogue too short".into()))?;
    let mut epilogue = [0u8; EPILOGUE_LEN];
    source
        .read_exact(&mut epilogue)
        .map_err(|_| DecodeError::Format("epilogue too short".into()))?;
    let text = std::str::from_utf8(&epilogue[1..])
        .map_err(|_| DecodeError::Format("epilogue checksum is not valid text".into()))?;
    Ok(text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const METADATA_CAPACITY: usize = 768;
    const CHECKSUM: &str = "0123456789abcdef0123456789abcdef";

    struct BuildOptions {
        include_volume: bool,
        geo_size_delta: i64,
    }

    impl Default for BuildOptions {
        fn default() -> Self {
            Self {
                include_volume: true,
                geo_size_delta: 0,
            }
        }
    }

    fn build_container(
        samples: usize,
        channels: usize,
        slices: usize,
        options: BuildOptions,
    ) -> Vec<u8> {
        let volume_len = samples * channels * slices * 2;
        let geo_len = slices * (8 + channels * 2 * 4 * 8);
        let volume_offset = PREAMBLE_LEN + METADATA_CAPACITY;
        let geo_offset = volume_offset + volume_len;
        let declared_geo_len = (geo_len as i64 + options.geo_size_delta) as u64;

        let mut descriptors = Vec::new();
        if options.include_volume {
            descriptors.push(serde_json::json!({
                "type": "Radar Volume",
                "name": "volume",
                "byteOffset": volume_offset,
                "byteSize": volume_len,
                "radar": {
                    "samplingStep_m": 0.05,
                    "samplingTime_ns": 0.2,
                    "propagationVelocity_mPerSec": 1.0e8,
                    "fequency_MHz": 400,
                    "polarization": "HH"
                }
            }));
        }
        descriptors.push(serde_json::json!({
            "type": "Sample Geolocations",
            "name": "geo",
            "byteOffset": geo_offset,
            "byteSize": declared_geo_len,
            "srs": {"epsg": 4326}
        }));
        descriptors.push(serde_json::json!({
            "type": "Operator Notes",
            "name": "notes",
            "byteOffset": geo_offset + geo_len,
            "byteSize": 0
        }));

        let document = serde_json::json!({
            "version": {"major": 1, "minor": 0},
            "mainDescriptor": {
                "samplesCount": samples,
                "channelsCount": channels,
                "slicesCount": slices,
                "metadata": {}
            },
            "dataBlockDescriptors": descriptors
        });
        let mut metadata = serde_json::to_vec(&document).unwrap();
        assert!(metadata.len() <= METADATA_CAPACITY);
        metadata.resize(METADATA_CAPACITY, b' ');

        let mut bytes = Vec::new();
        bytes.extend_from_slice(MAGIC);
        bytes.extend_from_slice(CHECKSUM.as_bytes());
        bytes.push(b'\n');
        bytes.extend_from_slice(format!("{:08}", METADATA_CAPACITY).as_bytes());
        bytes.push(b'\n');
        bytes.extend_from_slice(&metadata);
        for i in 0..(samples * channels * slices) {
            bytes.extend_from_slice(&(i as i16).to_le_bytes());
        }
        for slice in 0..slices {
            bytes.extend_from_slice(&(slice as i64).to_le_bytes());
            for channel in 0..channels {
                for coord in [channel as f64, slice as f64, 0.0, 0.0, 9.0, 9.0, 9.0, 9.0] {
                    bytes.extend_from_slice(&coord.to_le_bytes());
                }
            }
        }
        bytes.push(b'\n');
        bytes.extend_from_slice(CHECKSUM.as_bytes());
        bytes
    }

    #[test]
    fn well_formed_container_decodes() {
        let bytes = build_container(4, 2, 3, BuildOptions::default());
        let container = decode(&mut Cursor::new(bytes)).unwrap();
        assert_eq!(container.samples_count, 4);
        assert_eq!(container.channels_count, 2);
        assert_eq!(container.slices_count, 3);
        assert_eq!(container.checksum, CHECKSUM);
        assert_eq!(container.volume.data().dim(), (4, 2, 3));
        assert_eq!(container.geolocations.as_ref().unwrap().len(), 6);
        assert_eq!(container.version.major, 1);
    }

    #[test]
    fn magic_mismatch_is_fatal() {
        let mut bytes = build_container(2, 1, 1, BuildOptions::default());
        bytes[0] = b'x';
        let result = decode(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DecodeError::Format(_))));
    }

    #[test]
    fn truncated_metadata_is_fatal() {
        let mut bytes = build_container(2, 1, 1, BuildOptions::default());
        bytes.truncate(PREAMBLE_LEN + 10);
        let result = decode(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DecodeError::Format(_))));
    }

    #[test]
    fn flipped_epilogue_checksum_is_fatal() {
        let mut bytes = build_container(2, 1, 1, BuildOptions::default());
        let last = bytes.len() - 1;
        bytes[last] = bytes[last].wrapping_add(1);
        let result = decode(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DecodeError::ChecksumMismatch { .. })));
    }

    #[test]
    fn missing_volume_block_is_fatal() {
        let bytes = build_container(
            2,
            1,
            1,
            BuildOptions {
                include_volume: false,
                ..Default::default()
            },
        );
        let result = decode(&mut Cursor::new(bytes));
        assert!(matches!(result, Err(DecodeError::Format(_))));
    }

    #[test]
    fn unreadable_geolocation_block_is_skipped() {
        let bytes = build_container(
            2,
            1,
            1,
            BuildOptions {
                geo_size_delta: 10_000,
                ..Default::default()
            },
        );
        let container = decode(&mut Cursor::new(bytes)).unwrap();
        assert!(container.geolocations.is_none());
        assert_eq!(container.volume.data().dim(), (2, 1, 1));
    }

    #[test]
    fn decoded_volume_preserves_sample_order() {
        let bytes = build_container(2, 2, 1, BuildOptions::default());
        let container = decode(&mut Cursor::new(bytes)).unwrap();
        let scan = container.volume.along_track_view(0).unwrap();
        // raw samples were 0,1,2,3 with the sample axis fastest
        assert!(scan[[1, 0]] > scan[[0, 0]]);
        assert!(scan[[0, 1]] > scan[[1, 0]]);
    }
}
