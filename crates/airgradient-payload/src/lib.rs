//! Decoder for the AirGradient cellular telemetry payload.
//!
//! # Payload Format
//!
//! All integers are little-endian.
//!
//! | Offset | Size | Content |
//! |--------|------|---------|
//! | 0 | 1 | Metadata: bits 0-2 version, bit 3 dual mode, bit 4 dedicated temp/hum sensor |
//! | 1 | 1 | Measurement interval in minutes |
//! | 2.. | - | Readings, back to back until the end of the buffer |
//!
//! Each reading is a 4-byte presence mask followed by the value(s) of every
//! field whose bit is set, in ascending bit order. In dual mode expandable
//! fields carry two values (channel 0, channel 1). See [`registry`] for the
//! field catalog.
//!
//! ```
//! use airgradient_payload::{decode, Scaling, SensorField, SensorValue};
//!
//! let payload = [0x01, 0x05, 0x05, 0x00, 0x00, 0x00, 0xC4, 0x09, 0x90, 0x01];
//! let decoded = decode(&payload, Scaling::Scaled).unwrap();
//!
//! assert_eq!(decoded.reading_count, 1);
//! assert_eq!(
//!     decoded.readings[0].get(SensorField::Temperature),
//!     Some(&SensorValue::Scalar(25.0))
//! );
//! ```

pub mod decoder;
mod error;
pub mod header;
pub mod input;
pub mod reader;
pub mod reading;
pub mod registry;

pub use decoder::{decode, decode_raw, to_json, AirGradientDecoder, DecodedPayload};
pub use error::{PayloadError, Result};
pub use header::PayloadHeader;
pub use input::{decode_base64, decode_hex, PayloadFormat};
pub use reader::ByteReader;
pub use reading::{decode_reading, reading_size, Reading, Scaling, SensorValue};
pub use registry::{is_expandable, value_count, FieldDescriptor, SensorField, WireType};

/// Trait for decoding binary payload formats to JSON
#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
pub trait PayloadDecoder {
    /// Decode binary payload to JSON value
    fn decode(&self, bytes: &[u8]) -> Result<serde_json::Value>;
}
