//! Enum-like value tables of IoTDB time series: data types, encodings and
//! compressors, with the encodings each data type accepts.
use std::str::FromStr;

use crate::Error;

macro_rules! value_table {
    ($name:ident, $kind:literal, [$($variant:ident => $text:literal),+ $(,)?]) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, derive_more::Display)]
        pub enum $name {
            $(#[display($text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];
            pub const NAMES: &'static [&'static str] = &[$($text),+];
        }

        impl FromStr for $name {
            type Err = Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let s = s.trim_matches(|c| c == '\'' || c == '"');
                Self::ALL
                    .iter()
                    .copied()
                    .find(|v| v.to_string().eq_ignore_ascii_case(s))
                    .ok_or_else(|| Error::UnknownValue {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

value_table!(DataType, "data type", [
    Boolean => "BOOLEAN",
    Int32 => "INT32",
    Int64 => "INT64",
    Float => "FLOAT",
    Double => "DOUBLE",
    Text => "TEXT",
    String => "STRING",
    Blob => "BLOB",
    Timestamp => "TIMESTAMP",
    Date => "DATE",
]);

value_table!(Encoding, "encoding", [
    Plain => "PLAIN",
    Rle => "RLE",
    Ts2Diff => "TS_2DIFF",
    Gorilla => "GORILLA",
    Dictionary => "DICTIONARY",
    Zigzag => "ZIGZAG",
    Chimp => "CHIMP",
    Sprintz => "SPRINTZ",
    Rlbe => "RLBE",
]);

value_table!(Compressor, "compressor", [
    Uncompressed => "UNCOMPRESSED",
    Snappy => "SNAPPY",
    Lz4 => "LZ4",
    Gzip => "GZIP",
    Zstd => "ZSTD",
    Lzma2 => "LZMA2",
]);

impl DataType {
    /// Encodings IoTDB accepts for this data type.
    pub fn encodings(self) -> &'static [Encoding] {
        use Encoding::*;
        match self {
            DataType::Boolean => &[Plain, Rle],
            DataType::Int32 | DataType::Int64 | DataType::Timestamp | DataType::Date => {
                &[Plain, Rle, Ts2Diff, Gorilla, Zigzag, Chimp, Sprintz, Rlbe]
            }
            DataType::Float | DataType::Double => {
                &[Plain, Rle, Ts2Diff, Gorilla, Chimp, Sprintz, Rlbe]
            }
            DataType::Text | DataType::String => &[Plain, Dictionary],
            DataType::Blob => &[Plain],
        }
    }

    pub fn supports(self, encoding: Encoding) -> bool {
        self.encodings().contains(&encoding)
    }
}
