use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Format version carried in the container's metadata block.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct FormatVersion {
    pub major: u32,
    pub minor: u32,
}

/// Volume dimensions and free-form acquisition metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainDescriptor {
    pub samples_count: usize,
    pub channels_count: usize,
    pub slices_count: usize,
    #[serde(default)]
    pub metadata: Value,
}

/// Instrument parameters attached to the radar-volume block.
///
/// Field names keep the wire spellings, `fequency_MHz` included.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RadarInstrument {
    #[serde(rename = "samplingStep_m")]
    pub sampling_step_m: f32,
    #[serde(rename = "samplingTime_ns")]
    pub sampling_time_ns: f32,
    #[serde(rename = "propagationVelocity_mPerSec")]
    pub propagation_velocity_m_per_sec: f32,
    #[serde(rename = "fequency_MHz")]
    pub frequency_mhz: i32,
    #[serde(default)]
    pub polarization: String,
}

/// One entry of the `dataBlockDescriptors` list.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockDescriptor {
    #[serde(default)]
    pub name: String,
    pub byte_offset: u64,
    pub byte_size: u64,
    #[serde(flatten)]
    pub kind: BlockKind,
}

/// Type-specific payload of a block descriptor, keyed by its `type` string.
///
/// Unrecognized type strings fall into `Unknown` and are skipped by the
/// decoder, so newer writers don't break older readers.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "type")]
pub enum BlockKind {
    #[serde(rename = "Radar Volume")]
    RadarVolume {
        radar: RadarInstrument,
        #[serde(default)]
        metadata: Value,
    },
    #[serde(rename = "Sample Geolocations")]
    SampleGeolocations {
        #[serde(default)]
        srs: Value,
    },
    #[serde(other)]
    Unknown,
}

/// The whole JSON metadata block.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetadataDocument {
    pub version: FormatVersion,
    pub main_descriptor: MainDescriptor,
    #[serde(default)]
    pub data_block_descriptors: Vec<BlockDescriptor>,
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "version": {"major": 1, "minor": 0},
        "mainDescriptor": {
            "samplesCount": 512,
            "channelsCount": 8,
            "slicesCount": 100,
            "metadata": {"site": "test range"}
        },
        "dataBlockDescriptors": [
            {
                "type": "Radar Volume",
                "name": "volume-0",
                "byteOffset": 1024,
                "byteSize": 819200,
                "radar": {
                    "samplingStep_m": 0.05,
                    "samplingTime_ns": 0.1953,
                    "propagationVelocity_mPerSec": 120000000.0,
                    "fequency_MHz": 400,
                    "polarization": "VV"
                }
            },
            {
                "type": "Sample Geolocations",
                "name": "geo-0",
                "byteOffset": 820224,
                "byteSize": 103200,
                "srs": {"epsg": 4326}
            },
            {
                "type": "Operator Notes",
                "name": "notes",
                "byteOffset": 923424,
                "byteSize": 64
            }
        ]
    }"#;

    #[test]
    fn metadata_document_parses_known_and_unknown_blocks() {
        let doc: MetadataDocument = serde_json::from_str(SAMPLE).unwrap();
        assert_eq!(doc.version, FormatVersion { major: 1, minor: 0 });
        assert_eq!(doc.main_descriptor.samples_count, 512);
        assert_eq!(doc.data_block_descriptors.len(), 3);

        match &doc.data_block_descriptors[0].kind {
            BlockKind::RadarVolume { radar, .. } => {
                assert_eq!(radar.frequency_mhz, 400);
                assert_eq!(radar.polarization, "VV");
            }
            other => panic!("expected radar volume, got {:?}", other),
        }
        assert!(matches!(
            doc.data_block_descriptors[1].kind,
            BlockKind::SampleGeolocations { .. }
        ));
        assert!(matches!(
            doc.data_block_descriptors[2].kind,
            BlockKind::Unknown
        ));
        assert_eq!(doc.data_block_descriptors[2].byte_size, 64);
    }

    #[test]
    fn missing_optional_fields_default() {
        let doc: MetadataDocument = serde_json::from_str(
            r#"{
                "version": {"major": 1, "minor": 2},
                "mainDescriptor": {"samplesCount": 4, "channelsCount": 2, "slicesCount": 1}
            }"#,
        )
        .unwrap();
        assert!(doc.data_block_descriptors.is_empty());
        assert!(doc.main_descriptor.metadata.is_null());
    }
}
