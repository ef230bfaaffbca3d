//! Text encodings a payload arrives in before it reaches the decoder.
//!
//! Transports hand over payloads as hex (device logs, test vectors) or
//! base64 (JSON envelopes). Anything that cannot be turned into bytes is
//! rejected as [`PayloadError::InvalidInput`] before decoding starts.

use std::fmt;
use std::str::FromStr;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::decoder::{decode, DecodedPayload};
use crate::reading::Scaling;
use crate::{PayloadError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayloadFormat {
    #[default]
    Hex,
    Base64,
}

impl PayloadFormat {
    /// Convert payload text into raw bytes.
    pub fn parse_bytes(self, text: &str) -> Result<Vec<u8>> {
        let compact: String = text.split_whitespace().collect();
        if compact.is_empty() {
            return Err(PayloadError::InvalidInput("no payload data".to_string()));
        }

        match self {
            PayloadFormat::Hex => {
                let digits = compact
                    .strip_prefix("0x")
                    .or_else(|| compact.strip_prefix("0X"))
                    .unwrap_or(&compact);
                hex::decode(digits)
                    .map_err(|e| PayloadError::InvalidInput(format!("invalid hex payload: {}", e)))
            }
            PayloadFormat::Base64 => base64::engine::general_purpose::STANDARD
                .decode(compact.as_bytes())
                .map_err(|e| PayloadError::InvalidInput(format!("invalid base64 payload: {}", e))),
        }
    }
}

impl fmt::Display for PayloadFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PayloadFormat::Hex => f.write_str("hex"),
            PayloadFormat::Base64 => f.write_str("base64"),
        }
    }
}

impl FromStr for PayloadFormat {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "hex" => Ok(PayloadFormat::Hex),
            "base64" => Ok(PayloadFormat::Base64),
            other => Err(PayloadError::InvalidInput(format!(
                "unsupported payload format: {}",
                other
            ))),
        }
    }
}

pub fn decode_hex(text: &str, scaling: Scaling) -> Result<DecodedPayload> {
    decode(&PayloadFormat::Hex.parse_bytes(text)?, scaling)
}

pub fn decode_base64(text: &str, scaling: Scaling) -> Result<DecodedPayload> {
    decode(&PayloadFormat::Base64.parse_bytes(text)?, scaling)
}
