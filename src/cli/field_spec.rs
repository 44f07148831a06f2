use crate::pickle_engine::{Pickle, PickleIterator};
use std::fmt;
use std::os::raw::c_long;
use std::str::FromStr;

/// One typed field given on the command line as `kind:value`.
///
/// `data` and `bytes` take hex; `string16` takes ordinary text and is
/// stored as UTF-16 code units.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i32),
    Long(c_long),
    U16(u16),
    U32(u32),
    I64(i64),
    U64(u64),
    F32(f32),
    F64(f64),
    String(String),
    String16(Vec<u16>),
    Data(Vec<u8>),
    Bytes(Vec<u8>),
}

/// A field kind to decode, given on the command line.
///
/// `bytes` carries no length in the pickle, so it is spelled `bytes:N`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Bool,
    Int,
    Long,
    U16,
    U32,
    I64,
    U64,
    F32,
    F64,
    String,
    String16,
    Data,
    Bytes(usize),
}

fn parse_number<T: FromStr>(kind: &str, value: &str) -> Result<T, String> {
    value
        .parse::<T>()
        .map_err(|_| format!("Invalid {} value: '{}'", kind, value))
}

fn parse_hex(kind: &str, value: &str) -> Result<Vec<u8>, String> {
    hex::decode(value).map_err(|err| format!("Invalid hex for {}: {}", kind, err))
}

impl FromStr for FieldValue {
    type Err = String;

    fn from_str(field: &str) -> Result<Self, Self::Err> {
        let (kind, value) = field
            .split_once(':')
            .ok_or_else(|| format!("Expected `kind:value`, got '{}'", field))?;

        let parsed = match kind {
            "bool" => match value {
                "true" | "1" => Self::Bool(true),
                "false" | "0" => Self::Bool(false),
                _ => return Err(format!("Invalid bool value: '{}'", value)),
            },
            "int" => Self::Int(parse_number(kind, value)?),
            "long" => Self::Long(parse_number(kind, value)?),
            "u16" => Self::U16(parse_number(kind, value)?),
            "u32" => Self::U32(parse_number(kind, value)?),
            "i64" => Self::I64(parse_number(kind, value)?),
            "u64" => Self::U64(parse_number(kind, value)?),
            "f32" => Self::F32(parse_number(kind, value)?),
            "f64" => Self::F64(parse_number(kind, value)?),
            "string" => Self::String(value.to_owned()),
            "string16" => Self::String16(value.encode_utf16().collect()),
            "data" => Self::Data(parse_hex(kind, value)?),
            "bytes" => Self::Bytes(parse_hex(kind, value)?),
            _ => return Err(format!("Unknown field kind: '{}'", kind)),
        };

        Ok(parsed)
    }
}

impl FieldValue {
    /// Appends this field to `pickle` with the matching typed writer.
    pub fn write_into(&self, pickle: &mut Pickle<'_>) {
        match self {
            Self::Bool(value) => pickle.write_bool(*value),
            Self::Int(value) => pickle.write_int(*value),
            Self::Long(value) => pickle.write_long(*value),
            Self::U16(value) => pickle.write_u16(*value),
            Self::U32(value) => pickle.write_u32(*value),
            Self::I64(value) => pickle.write_i64(*value),
            Self::U64(value) => pickle.write_u64(*value),
            Self::F32(value) => pickle.write_f32(*value),
            Self::F64(value) => pickle.write_f64(*value),
            Self::String(value) => pickle.write_string(value),
            Self::String16(value) => pickle.write_string16(value),
            Self::Data(value) => pickle.write_data(value),
            Self::Bytes(value) => pickle.write_bytes(value),
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bool(value) => write!(f, "bool:{}", value),
            Self::Int(value) => write!(f, "int:{}", value),
            Self::Long(value) => write!(f, "long:{}", value),
            Self::U16(value) => write!(f, "u16:{}", value),
            Self::U32(value) => write!(f, "u32:{}", value),
            Self::I64(value) => write!(f, "i64:{}", value),
            Self::U64(value) => write!(f, "u64:{}", value),
            Self::F32(value) => write!(f, "f32:{}", value),
            Self::F64(value) => write!(f, "f64:{}", value),
            Self::String(value) => write!(f, "string:{}", value),
            Self::String16(value) => write!(f, "string16:{}", String::from_utf16_lossy(value)),
            Self::Data(value) => write!(f, "data:{}", hex::encode(value)),
            Self::Bytes(value) => write!(f, "bytes:{}", hex::encode(value)),
        }
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(kind: &str) -> Result<Self, Self::Err> {
        if let Some(len) = kind.strip_prefix("bytes:") {
            return parse_number("bytes length", len).map(Self::Bytes);
        }

        match kind {
            "bool" => Ok(Self::Bool),
            "int" => Ok(Self::Int),
            "long" => Ok(Self::Long),
            "u16" => Ok(Self::U16),
            "u32" => Ok(Self::U32),
            "i64" => Ok(Self::I64),
            "u64" => Ok(Self::U64),
            "f32" => Ok(Self::F32),
            "f64" => Ok(Self::F64),
            "string" => Ok(Self::String),
            "string16" => Ok(Self::String16),
            "data" => Ok(Self::Data),
            "bytes" => Err("`bytes` needs a length, e.g. `bytes:4`".to_owned()),
            _ => Err(format!("Unknown field kind: '{}'", kind)),
        }
    }
}

impl FieldKind {
    /// Reads one field of this kind, or `None` if the pickle does not hold
    /// one at the cursor.
    pub fn read_from(&self, iter: &mut PickleIterator<'_>) -> Option<FieldValue> {
        let value = match self {
            Self::Bool => FieldValue::Bool(iter.read_bool()?),
            Self::Int => FieldValue::Int(iter.read_int()?),
            Self::Long => FieldValue::Long(iter.read_long()?),
            Self::U16 => FieldValue::U16(iter.read_u16()?),
            Self::U32 => FieldValue::U32(iter.read_u32()?),
            Self::I64 => FieldValue::I64(iter.read_i64()?),
            Self::U64 => FieldValue::U64(iter.read_u64()?),
            Self::F32 => FieldValue::F32(iter.read_f32()?),
            Self::F64 => FieldValue::F64(iter.read_f64()?),
            Self::String => FieldValue::String(iter.read_string()?),
            Self::String16 => FieldValue::String16(iter.read_string16()?),
            Self::Data => FieldValue::Data(iter.read_data()?.to_vec()),
            Self::Bytes(len) => FieldValue::Bytes(iter.read_bytes(*len)?.to_vec()),
        };

        Some(value)
    }
}
