use serde::Serialize;
use serde_json::Value;
use tracing::{debug, instrument, warn};

use crate::header::{PayloadHeader, HEADER_SIZE};
use crate::reader::ByteReader;
use crate::reading::{decode_reading, Reading, Scaling};
use crate::{PayloadDecoder, Result};

/// Readings the device batches into one transmission at most.
pub const MAX_BATCH_SIZE: usize = 20;

/// A fully decoded payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DecodedPayload {
    pub header: PayloadHeader,
    pub readings: Vec<Reading>,
    pub reading_count: usize,
}

/// Decode a complete payload buffer.
///
/// Readings are decoded back to back from the end of the header until the
/// buffer is consumed exactly. Any read past the end fails the whole decode.
pub fn decode(bytes: &[u8], scaling: Scaling) -> Result<DecodedPayload> {
    let header = PayloadHeader::parse(bytes)?;
    debug!(
        version = header.version,
        dual_mode = header.dual_mode,
        dedicated_temp_hum_sensor = header.dedicated_temp_hum_sensor,
        interval_minutes = header.interval_minutes,
        payload_size = bytes.len(),
        "decoding payload"
    );

    let mut reader = ByteReader::at(bytes, HEADER_SIZE);
    let mut readings = Vec::new();
    while !reader.is_empty() {
        readings.push(decode_reading(&mut reader, &header, scaling)?);
    }

    if readings.len() > MAX_BATCH_SIZE {
        warn!(
            readings = readings.len(),
            max = MAX_BATCH_SIZE,
            "payload carries more readings than the device batch limit"
        );
    }

    let reading_count = readings.len();
    Ok(DecodedPayload {
        header,
        readings,
        reading_count,
    })
}

/// Decode without converting values to physical units.
pub fn decode_raw(bytes: &[u8]) -> Result<DecodedPayload> {
    decode(bytes, Scaling::Raw)
}

/// Decode with scaling and render the result as JSON text.
pub fn to_json(bytes: &[u8], pretty: bool) -> Result<String> {
    let decoded = decode(bytes, Scaling::Scaled)?;
    let json = if pretty {
        serde_json::to_string_pretty(&decoded)?
    } else {
        serde_json::to_string(&decoded)?
    };
    Ok(json)
}

/// [`PayloadDecoder`] for AirGradient cellular payloads.
#[derive(Debug, Clone, Copy, Default)]
pub struct AirGradientDecoder {
    scaling: Scaling,
}

impl AirGradientDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raw() -> Self {
        Self {
            scaling: Scaling::Raw,
        }
    }

    pub fn with_scaling(scaling: Scaling) -> Self {
        Self { scaling }
    }

    pub fn scaling(&self) -> Scaling {
        self.scaling
    }
}

impl PayloadDecoder for AirGradientDecoder {
    #[instrument(
        name = "airgradient_decode",
        skip(self, bytes),
        fields(payload_size = bytes.len(), scaling = ?self.scaling)
    )]
    fn decode(&self, bytes: &[u8]) -> Result<Value> {
        let decoded = decode(bytes, self.scaling)?;
        Ok(serde_json::to_value(decoded)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PayloadError;
    use serde_json::json;

    #[test]
    fn test_single_reading() {
        let payload = vec![0x01, 0x05, 0x05, 0x00, 0x00, 0x00, 0xC4, 0x09, 0x90, 0x01];
        let decoded = decode(&payload, Scaling::Scaled).unwrap();
        assert_eq!(decoded.header.version, 1);
        assert!(!decoded.header.dual_mode);
        assert_eq!(decoded.header.interval_minutes, 5);
        assert_eq!(decoded.reading_count, 1);
        assert_eq!(decoded.readings.len(), 1);
    }

    #[test]
    fn test_header_only_has_no_readings() {
        let decoded = decode(&[0x01, 0x05], Scaling::Scaled).unwrap();
        assert_eq!(decoded.reading_count, 0);
        assert!(decoded.readings.is_empty());
    }

    #[test]
    fn test_multiple_readings_keep_order() {
        let payload = vec![
            0x01, 0x05, // header
            0x05, 0x00, 0x00, 0x00, 0xC4, 0x09, 0x90, 0x01, // 25.00 °C, 400 ppm
            0x05, 0x00, 0x00, 0x00, 0x28, 0x0A, 0x9A, 0x01, // 26.00 °C, 410 ppm
        ];
        let value = AirGradientDecoder::new().decode(&payload).unwrap();
        assert_eq!(
            value,
            json!({
                "header": {
                    "version": 1,
                    "dualMode": false,
                    "dedicatedTempHumSensor": false,
                    "intervalMinutes": 5
                },
                "readings": [
                    {"presenceMask": 5, "temperature": 25, "co2": 400},
                    {"presenceMask": 5, "temperature": 26, "co2": 410}
                ],
                "readingCount": 2
            })
        );
    }

    #[test]
    fn test_trait_output_keeps_wire_key_order() {
        let payload = vec![
            0x09, 0x05, 0x05, 0x00, 0x00, 0x00, 0xC4, 0x09, 0x28, 0x0A, 0x90, 0x01,
        ];
        let value = AirGradientDecoder::new().decode(&payload).unwrap();
        let text = serde_json::to_string(&value).unwrap();
        assert_eq!(text, to_json(&payload, false).unwrap());
        assert_eq!(
            text,
            r#"{"header":{"version":1,"dualMode":true,"dedicatedTempHumSensor":false,"intervalMinutes":5},"readings":[{"presenceMask":5,"temperature":[25,26],"co2":400}],"readingCount":1}"#
        );
    }

    #[test]
    fn test_buffer_too_small() {
        assert!(matches!(
            decode(&[], Scaling::Scaled),
            Err(PayloadError::BufferTooSmall { actual: 0 })
        ));
        assert!(matches!(
            decode(&[0x01], Scaling::Scaled),
            Err(PayloadError::BufferTooSmall { actual: 1 })
        ));
    }

    #[test]
    fn test_trailing_partial_reading_fails() {
        let payload = vec![0x01, 0x05, 0x00, 0x00, 0x00, 0x00, 0x04];
        assert!(matches!(
            decode(&payload, Scaling::Scaled),
            Err(PayloadError::TruncatedBuffer {
                offset: 6,
                needed: 4,
                remaining: 1
            })
        ));
    }

    #[test]
    fn test_truncated_field_fails() {
        let payload = vec![0x01, 0x05, 0x05, 0x00, 0x00, 0x00, 0xC4, 0x09, 0x90];
        assert!(matches!(
            decode(&payload, Scaling::Scaled),
            Err(PayloadError::TruncatedBuffer { offset: 8, .. })
        ));
    }

    #[test]
    fn test_decode_raw() {
        let payload = vec![0x01, 0x0A, 0x02, 0x00, 0x00, 0x00, 0x96, 0x19];
        let value = AirGradientDecoder::raw().decode(&payload).unwrap();
        assert_eq!(value["readings"][0]["humidity"], json!(6550));
        let decoded = decode_raw(&payload).unwrap();
        assert_eq!(decoded.readings[0].get_by_name("humidity").unwrap().as_scalar(), Some(6550.0));
    }

    #[test]
    fn test_to_json_compact_and_pretty() {
        let payload = vec![0x01, 0x0A, 0x02, 0x00, 0x00, 0x00, 0x96, 0x19];
        let compact = to_json(&payload, false).unwrap();
        assert!(!compact.contains('\n'));
        assert!(compact.contains("\"humidity\":65.5"));

        let pretty = to_json(&payload, true).unwrap();
        assert!(pretty.contains('\n'));
        let parsed: Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(parsed["readingCount"], json!(1));
    }

    #[test]
    fn test_to_json_propagates_decode_errors() {
        assert!(matches!(
            to_json(&[0x01], false),
            Err(PayloadError::BufferTooSmall { .. })
        ));
    }

    #[test]
    fn test_oversized_batch_still_decodes() {
        let mut payload = vec![0x01, 0x05];
        for _ in 0..(MAX_BATCH_SIZE + 1) {
            payload.extend_from_slice(&[0x04, 0x00, 0x00, 0x00, 0x90, 0x01]);
        }
        let decoded = decode(&payload, Scaling::Scaled).unwrap();
        assert_eq!(decoded.reading_count, MAX_BATCH_SIZE + 1);
    }
}
