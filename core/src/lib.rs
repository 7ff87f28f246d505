//! Core container decoding and scan processing for the OpenGPR toolkit.
//!
//! The modules split the work the way the on-disk format does: `container`
//! decodes the binary/JSON hybrid into a calibrated radar volume, and
//! `processing` turns 2-D slices of that volume through a macro-driven
//! filter chain.

pub mod container;
pub mod math;
pub mod prelude;
pub mod processing;
pub mod telemetry;

pub use container::{decode, decode_path, OgprContainer};
pub use prelude::{DecodeError, ProcessError};
pub use processing::{Scan, ScanKind};
