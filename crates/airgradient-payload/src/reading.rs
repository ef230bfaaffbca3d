use std::collections::BTreeMap;

use serde::ser::{SerializeMap, SerializeTuple};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::header::PayloadHeader;
use crate::reader::ByteReader;
use crate::registry::{value_count, SensorField, KNOWN_FIELDS_MASK};
use crate::Result;

/// Size of the presence mask that opens every reading.
pub const PRESENCE_MASK_SIZE: usize = 4;

/// Whether decoded values are converted to physical units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Scaling {
    /// Divide raw integers by the field scale.
    #[default]
    Scaled,
    /// Keep the raw wire integers.
    Raw,
}

/// A decoded field value: one channel, or two in dual mode.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SensorValue {
    Scalar(f64),
    Pair(f64, f64),
}

impl SensorValue {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            SensorValue::Scalar(v) => Some(*v),
            SensorValue::Pair(..) => None,
        }
    }

    pub fn as_pair(&self) -> Option<(f64, f64)> {
        match self {
            SensorValue::Scalar(_) => None,
            SensorValue::Pair(a, b) => Some((*a, *b)),
        }
    }

    /// Value of channel `index` (a scalar only has channel 0).
    pub fn channel(&self, index: usize) -> Option<f64> {
        match (self, index) {
            (SensorValue::Scalar(v), 0) => Some(*v),
            (SensorValue::Pair(a, _), 0) => Some(*a),
            (SensorValue::Pair(_, b), 1) => Some(*b),
            _ => None,
        }
    }

    pub fn channel_count(&self) -> usize {
        match self {
            SensorValue::Scalar(_) => 1,
            SensorValue::Pair(..) => 2,
        }
    }
}

// Integral values render as JSON integers, matching how raw wire values read.
struct JsonNumber(f64);

impl Serialize for JsonNumber {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
        if self.0.fract() == 0.0 && self.0.abs() < MAX_EXACT {
            serializer.serialize_i64(self.0 as i64)
        } else {
            serializer.serialize_f64(self.0)
        }
    }
}

impl Serialize for SensorValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match *self {
            SensorValue::Scalar(v) => JsonNumber(v).serialize(serializer),
            SensorValue::Pair(a, b) => {
                let mut tuple = serializer.serialize_tuple(2)?;
                tuple.serialize_element(&JsonNumber(a))?;
                tuple.serialize_element(&JsonNumber(b))?;
                tuple.end()
            }
        }
    }
}

/// One decoded reading: its presence mask and the fields it carried.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    presence_mask: u32,
    values: BTreeMap<SensorField, SensorValue>,
    encoded_len: usize,
}

impl Reading {
    pub fn presence_mask(&self) -> u32 {
        self.presence_mask
    }

    /// Mask bits above the field catalog. They are never decoded.
    pub fn unknown_bits(&self) -> u32 {
        self.presence_mask & !KNOWN_FIELDS_MASK
    }

    /// Bytes this reading occupied in the payload, mask included.
    pub fn encoded_len(&self) -> usize {
        self.encoded_len
    }

    pub fn get(&self, field: SensorField) -> Option<&SensorValue> {
        self.values.get(&field)
    }

    pub fn get_by_name(&self, name: &str) -> Option<&SensorValue> {
        name.parse::<SensorField>()
            .ok()
            .and_then(|field| self.values.get(&field))
    }

    pub fn contains(&self, field: SensorField) -> bool {
        self.values.contains_key(&field)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Fields in wire order.
    pub fn iter(&self) -> impl Iterator<Item = (SensorField, &SensorValue)> {
        self.values.iter().map(|(field, value)| (*field, value))
    }
}

impl Serialize for Reading {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.values.len() + 1))?;
        map.serialize_entry("presenceMask", &self.presence_mask)?;
        for (field, value) in &self.values {
            map.serialize_entry(field.name(), value)?;
        }
        map.end()
    }
}

/// Encoded size of a reading with `presence_mask` under `header`.
pub fn reading_size(presence_mask: u32, header: &PayloadHeader) -> usize {
    PRESENCE_MASK_SIZE
        + SensorField::ALL
            .iter()
            .filter(|field| field.is_set(presence_mask))
            .map(|field| field.descriptor().wire_type.width() * value_count(*field, header))
            .sum::<usize>()
}

fn scale_value(raw: i64, scale: u32, scaling: Scaling) -> f64 {
    match scaling {
        Scaling::Scaled => raw as f64 / f64::from(scale),
        Scaling::Raw => raw as f64,
    }
}

/// Decode one reading starting at the reader's cursor.
///
/// Fields are read in ascending bit order. On success the cursor sits on
/// the first byte after the reading.
pub fn decode_reading(
    reader: &mut ByteReader<'_>,
    header: &PayloadHeader,
    scaling: Scaling,
) -> Result<Reading> {
    let start = reader.position();
    let presence_mask = reader.read_u32_le()?;

    if presence_mask & !KNOWN_FIELDS_MASK != 0 {
        debug!(
            offset = start,
            unknown_bits = %format!("{:#010x}", presence_mask & !KNOWN_FIELDS_MASK),
            "ignoring presence mask bits without a field definition"
        );
    }

    let mut values = BTreeMap::new();
    for field in SensorField::ALL {
        if !field.is_set(presence_mask) {
            continue;
        }

        let descriptor = field.descriptor();
        let value = match value_count(field, header) {
            1 => {
                let raw = reader.read(descriptor.wire_type)?;
                SensorValue::Scalar(scale_value(raw, descriptor.scale, scaling))
            }
            _ => {
                let first = reader.read(descriptor.wire_type)?;
                let second = reader.read(descriptor.wire_type)?;
                SensorValue::Pair(
                    scale_value(first, descriptor.scale, scaling),
                    scale_value(second, descriptor.scale, scaling),
                )
            }
        };
        values.insert(field, value);
    }

    let encoded_len = reader.position() - start;
    debug!(
        offset = start,
        presence_mask = %format!("{:#010x}", presence_mask),
        fields = values.len(),
        bytes = encoded_len,
        "decoded reading"
    );

    Ok(Reading {
        presence_mask,
        values,
        encoded_len,
    })
}
