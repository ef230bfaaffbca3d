use serde::Serialize;

use crate::{PayloadError, Result};

/// Size of the fixed payload header (metadata + interval).
pub const HEADER_SIZE: usize = 2;

const VERSION_MASK: u8 = 0x07;
const DUAL_MODE_BIT: u8 = 1 << 3;
const DEDICATED_TEMP_HUM_BIT: u8 = 1 << 4;

/// Payload header.
///
/// Byte 0 packs the metadata (bits 0-2 version, bit 3 dual mode, bit 4
/// dedicated temp/hum sensor, bits 5-7 reserved). Byte 1 is the
/// measurement interval in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadHeader {
    pub version: u8,
    pub dual_mode: bool,
    pub dedicated_temp_hum_sensor: bool,
    pub interval_minutes: u8,
}

impl PayloadHeader {
    pub fn from_bytes(metadata: u8, interval_minutes: u8) -> Self {
        Self {
            version: metadata & VERSION_MASK,
            dual_mode: metadata & DUAL_MODE_BIT != 0,
            dedicated_temp_hum_sensor: metadata & DEDICATED_TEMP_HUM_BIT != 0,
            interval_minutes,
        }
    }

    /// Parse the header from the start of a payload buffer.
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        match bytes {
            [metadata, interval, ..] => Ok(Self::from_bytes(*metadata, *interval)),
            _ => Err(PayloadError::BufferTooSmall {
                actual: bytes.len(),
            }),
        }
    }
}
