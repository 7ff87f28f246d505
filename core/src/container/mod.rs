pub mod decoder;
pub mod geolocation;
pub mod metadata;
pub mod volume;

pub use decoder::{decode, decode_path, OgprContainer};
pub use geolocation::{GeoPoint, GeolocationTable};
pub use metadata::{BlockDescriptor, BlockKind, FormatVersion, MainDescriptor, RadarInstrument};
pub use volume::RadarVolume;
