//! Field registry for the AirGradient cellular payload.
//!
//! Every sensor field has a fixed bit position in the presence mask. Fields
//! are serialized strictly in ascending bit order, so this table is the wire
//! layout: adding or removing an entry is what changes the format version.
//!
//! # Field Catalog
//!
//! | Bit | Name | Type | Scale | Dual | Unit |
//! |-----|------|------|-------|------|------|
//! | 0 | temperature | i16 | 100 | yes | °C |
//! | 1 | humidity | u16 | 100 | yes | % |
//! | 2-6 | co2, tvoc, tvoc_raw, nox, nox_raw | u16 | 1 | no | ppm / index / raw |
//! | 7-12 | pm01, pm25, pm10 (+ `_sp` variants) | u16 | 10 | yes | µg/m³ |
//! | 13-18 | pm03_pc .. pm10_pc | u16 | 1 | yes | count |
//! | 19-20 | vbat, vpanel | u16 | 100 | no | mV |
//! | 21-24 | o3_we, o3_ae, no2_we, no2_ae | u32 | 1000 | no | mV |
//! | 25 | afe_temp | u16 | 10 | no | °C |
//! | 26 | signal | i8 | 1 | no | dBm |

use std::fmt;
use std::str::FromStr;

use crate::header::PayloadHeader;
use crate::PayloadError;

/// Number of defined fields (bits 0-26).
pub const FIELD_COUNT: usize = 27;

/// Presence mask bits that carry a field definition.
pub const KNOWN_FIELDS_MASK: u32 = (1u32 << FIELD_COUNT) - 1;

/// Integer encoding of a field value on the wire (always little-endian).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireType {
    I8,
    U16,
    I16,
    U32,
}

impl WireType {
    /// Width of one value in bytes.
    pub const fn width(self) -> usize {
        match self {
            WireType::I8 => 1,
            WireType::U16 | WireType::I16 => 2,
            WireType::U32 => 4,
        }
    }
}

/// Sensor fields, keyed by their presence mask bit.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SensorField {
    Temperature = 0,
    Humidity = 1,
    Co2 = 2,
    Tvoc = 3,
    TvocRaw = 4,
    Nox = 5,
    NoxRaw = 6,
    Pm01 = 7,
    Pm25 = 8,
    Pm10 = 9,
    Pm01Sp = 10,
    Pm25Sp = 11,
    Pm10Sp = 12,
    Pm03Count = 13,
    Pm05Count = 14,
    Pm01Count = 15,
    Pm25Count = 16,
    Pm5Count = 17,
    Pm10Count = 18,
    Vbat = 19,
    Vpanel = 20,
    O3We = 21,
    O3Ae = 22,
    No2We = 23,
    No2Ae = 24,
    AfeTemp = 25,
    Signal = 26,
}

impl SensorField {
    /// All fields in wire order.
    pub const ALL: [SensorField; FIELD_COUNT] = [
        SensorField::Temperature,
        SensorField::Humidity,
        SensorField::Co2,
        SensorField::Tvoc,
        SensorField::TvocRaw,
        SensorField::Nox,
        SensorField::NoxRaw,
        SensorField::Pm01,
        SensorField::Pm25,
        SensorField::Pm10,
        SensorField::Pm01Sp,
        SensorField::Pm25Sp,
        SensorField::Pm10Sp,
        SensorField::Pm03Count,
        SensorField::Pm05Count,
        SensorField::Pm01Count,
        SensorField::Pm25Count,
        SensorField::Pm5Count,
        SensorField::Pm10Count,
        SensorField::Vbat,
        SensorField::Vpanel,
        SensorField::O3We,
        SensorField::O3Ae,
        SensorField::No2We,
        SensorField::No2Ae,
        SensorField::AfeTemp,
        SensorField::Signal,
    ];

    pub fn from_bit(bit: u8) -> Option<Self> {
        Self::ALL.get(usize::from(bit)).copied()
    }

    pub const fn bit(self) -> u8 {
        self as u8
    }

    pub const fn mask(self) -> u32 {
        1 << self as u32
    }

    pub fn is_set(self, presence_mask: u32) -> bool {
        presence_mask & self.mask() != 0
    }

    pub fn descriptor(self) -> &'static FieldDescriptor {
        &FIELDS[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for SensorField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SensorField {
    type Err = PayloadError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FIELDS
            .iter()
            .find(|d| d.name == s)
            .map(|d| d.field)
            .ok_or_else(|| PayloadError::InvalidInput(format!("unknown sensor field: {}", s)))
    }
}

/// Static wire layout of one sensor field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub field: SensorField,
    pub name: &'static str,
    pub wire_type: WireType,
    /// Divisor from raw wire integer to physical unit. Never zero.
    pub scale: u32,
    /// Reports two channels when the device runs in dual mode.
    pub expandable: bool,
    pub unit: &'static str,
}

const fn field(
    field: SensorField,
    name: &'static str,
    wire_type: WireType,
    scale: u32,
    expandable: bool,
    unit: &'static str,
) -> FieldDescriptor {
    FieldDescriptor {
        field,
        name,
        wire_type,
        scale,
        expandable,
        unit,
    }
}

// Indexed by bit position
pub static FIELDS: [FieldDescriptor; FIELD_COUNT] = [
    field(SensorField::Temperature, "temperature", WireType::I16, 100, true, "°C"),
    field(SensorField::Humidity, "humidity", WireType::U16, 100, true, "%"),
    field(SensorField::Co2, "co2", WireType::U16, 1, false, "ppm"),
    field(SensorField::Tvoc, "tvoc", WireType::U16, 1, false, "index"),
    field(SensorField::TvocRaw, "tvoc_raw", WireType::U16, 1, false, "raw"),
    field(SensorField::Nox, "nox", WireType::U16, 1, false, "index"),
    field(SensorField::NoxRaw, "nox_raw", WireType::U16, 1, false, "raw"),
    field(SensorField::Pm01, "pm01", WireType::U16, 10, true, "µg/m³"),
    field(SensorField::Pm25, "pm25", WireType::U16, 10, true, "µg/m³"),
    field(SensorField::Pm10, "pm10", WireType::U16, 10, true, "µg/m³"),
    field(SensorField::Pm01Sp, "pm01_sp", WireType::U16, 10, true, "µg/m³"),
    field(SensorField::Pm25Sp, "pm25_sp", WireType::U16, 10, true, "µg/m³"),
    field(SensorField::Pm10Sp, "pm10_sp", WireType::U16, 10, true, "µg/m³"),
    field(SensorField::Pm03Count, "pm03_pc", WireType::U16, 1, true, "count"),
    field(SensorField::Pm05Count, "pm05_pc", WireType::U16, 1, true, "count"),
    field(SensorField::Pm01Count, "pm01_pc", WireType::U16, 1, true, "count"),
    field(SensorField::Pm25Count, "pm25_pc", WireType::U16, 1, true, "count"),
    field(SensorField::Pm5Count, "pm5_pc", WireType::U16, 1, true, "count"),
    field(SensorField::Pm10Count, "pm10_pc", WireType::U16, 1, true, "count"),
    field(SensorField::Vbat, "vbat", WireType::U16, 100, false, "mV"),
    field(SensorField::Vpanel, "vpanel", WireType::U16, 100, false, "mV"),
    field(SensorField::O3We, "o3_we", WireType::U32, 1000, false, "mV"),
    field(SensorField::O3Ae, "o3_ae", WireType::U32, 1000, false, "mV"),
    field(SensorField::No2We, "no2_we", WireType::U32, 1000, false, "mV"),
    field(SensorField::No2Ae, "no2_ae", WireType::U32, 1000, false, "mV"),
    field(SensorField::AfeTemp, "afe_temp", WireType::U16, 10, false, "°C"),
    field(SensorField::Signal, "signal", WireType::I8, 1, false, "dBm"),
];

/// Whether a field reports two channels in dual mode.
///
/// A dedicated temp/hum module reports a single physical reading, so
/// temperature and humidity lose their expandability when it is fitted.
pub fn is_expandable(field: SensorField, dedicated_temp_hum_sensor: bool) -> bool {
    if dedicated_temp_hum_sensor
        && matches!(field, SensorField::Temperature | SensorField::Humidity)
    {
        return false;
    }
    field.descriptor().expandable
}

/// Number of values serialized for a present field under `header`.
pub fn value_count(field: SensorField, header: &PayloadHeader) -> usize {
    if header.dual_mode && is_expandable(field, header.dedicated_temp_hum_sensor) {
        2
    } else {
        1
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn header(dual_mode: bool, dedicated: bool) -> PayloadHeader {
        PayloadHeader {
            version: 1,
            dual_mode,
            dedicated_temp_hum_sensor: dedicated,
            interval_minutes: 5,
        }
    }

    #[test]
    fn test_table_indexed_by_bit() {
        for (i, descriptor) in FIELDS.iter().enumerate() {
            assert_eq!(usize::from(descriptor.field.bit()), i);
            assert_eq!(SensorField::ALL[i], descriptor.field);
        }
    }

    #[test]
    fn test_scales_non_zero() {
        assert!(FIELDS.iter().all(|d| d.scale > 0));
    }

    #[test]
    fn test_names_unique() {
        for (i, a) in FIELDS.iter().enumerate() {
            for b in &FIELDS[i + 1..] {
                assert_ne!(a.name, b.name);
            }
        }
    }

    #[test]
    fn test_from_bit() {
        assert_eq!(SensorField::from_bit(0), Some(SensorField::Temperature));
        assert_eq!(SensorField::from_bit(21), Some(SensorField::O3We));
        assert_eq!(SensorField::from_bit(26), Some(SensorField::Signal));
        assert_eq!(SensorField::from_bit(27), None);
        assert_eq!(SensorField::from_bit(31), None);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("pm25_sp".parse::<SensorField>().unwrap(), SensorField::Pm25Sp);
        assert_eq!("pm5_pc".parse::<SensorField>().unwrap(), SensorField::Pm5Count);
        assert!(matches!(
            "pm2.5".parse::<SensorField>(),
            Err(PayloadError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_known_fields_mask() {
        assert_eq!(KNOWN_FIELDS_MASK, 0x07FF_FFFF);
        assert_eq!(SensorField::Signal.mask(), 1 << 26);
    }

    #[test]
    fn test_wire_widths() {
        assert_eq!(SensorField::Signal.descriptor().wire_type.width(), 1);
        assert_eq!(SensorField::Temperature.descriptor().wire_type.width(), 2);
        assert_eq!(SensorField::No2Ae.descriptor().wire_type.width(), 4);
    }

    #[test]
    fn test_expandable_set() {
        let expandable: Vec<u8> = SensorField::ALL
            .iter()
            .filter(|f| f.descriptor().expandable)
            .map(|f| f.bit())
            .collect();
        assert_eq!(
            expandable,
            vec![0, 1, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18]
        );
    }

    #[test]
    fn test_dedicated_sensor_override() {
        assert!(is_expandable(SensorField::Temperature, false));
        assert!(!is_expandable(SensorField::Temperature, true));
        assert!(!is_expandable(SensorField::Humidity, true));
        assert!(is_expandable(SensorField::Pm25, true));
        assert!(!is_expandable(SensorField::Co2, false));
    }

    #[test]
    fn test_value_count() {
        assert_eq!(value_count(SensorField::Temperature, &header(false, false)), 1);
        assert_eq!(value_count(SensorField::Temperature, &header(true, false)), 2);
        assert_eq!(value_count(SensorField::Temperature, &header(true, true)), 1);
        assert_eq!(value_count(SensorField::Pm10Count, &header(true, true)), 2);
        assert_eq!(value_count(SensorField::O3We, &header(true, false)), 1);
        assert_eq!(value_count(SensorField::Signal, &header(true, false)), 1);
    }
}
