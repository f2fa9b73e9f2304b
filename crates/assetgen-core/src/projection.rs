//! Native type projection
//!
//! Maps a tag's native [`IotType`] onto the small scalar type set the
//! asset model understands. Kinds with no faithful representation project
//! to `None` and the tag is excluded from the document.

use serde::{Deserialize, Serialize};

use crate::iot::IotType;

/// Scalar type of an asset model property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OutputDataType {
    Integer,
    Double,
    Boolean,
    String,
}

impl std::fmt::Display for OutputDataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Integer => write!(f, "INTEGER"),
            Self::Double => write!(f, "DOUBLE"),
            Self::Boolean => write!(f, "BOOLEAN"),
            Self::String => write!(f, "STRING"),
        }
    }
}

/// Project a native tag type onto an output type.
///
/// `UINT64` is unsupported because it overflows the signed integer type.
/// `CHAR`, every sequence kind and unknown kinds are unsupported too.
pub fn project(native: IotType) -> Option<OutputDataType> {
    match native {
        IotType::Uint8
        | IotType::Uint16
        | IotType::Uint32
        | IotType::Int8
        | IotType::Int16
        | IotType::Int32
        | IotType::Int64 => Some(OutputDataType::Integer),
        IotType::Float32 | IotType::Float64 => Some(OutputDataType::Double),
        IotType::Boolean => Some(OutputDataType::Boolean),
        IotType::String => Some(OutputDataType::String),
        IotType::Uint64 | IotType::Char => None,
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_table() {
        let expected = [
            (IotType::Uint8, Some(OutputDataType::Integer)),
            (IotType::Uint16, Some(OutputDataType::Integer)),
            (IotType::Uint32, Some(OutputDataType::Integer)),
            (IotType::Uint64, None),
            (IotType::Int8, Some(OutputDataType::Integer)),
            (IotType::Int16, Some(OutputDataType::Integer)),
            (IotType::Int32, Some(OutputDataType::Integer)),
            (IotType::Int64, Some(OutputDataType::Integer)),
            (IotType::Float32, Some(OutputDataType::Double)),
            (IotType::Float64, Some(OutputDataType::Double)),
            (IotType::Boolean, Some(OutputDataType::Boolean)),
            (IotType::String, Some(OutputDataType::String)),
            (IotType::Char, None),
        ];
        for (native, output) in expected {
            assert_eq!(project(native), output, "{}", native);
        }
    }

    #[test]
    fn test_sequences_are_unsupported() {
        for native in IotType::ALL.iter().filter(|t| t.is_sequence()) {
            assert_eq!(project(*native), None, "{}", native);
        }
    }

    #[test]
    fn test_unknown_is_unsupported() {
        assert_eq!(project(IotType::Unknown), None);
        assert_eq!(project(IotType::from_name("NVP")), None);
    }

    #[test]
    fn test_output_type_serialization() {
        assert_eq!(
            serde_json::to_string(&OutputDataType::Double).unwrap(),
            "\"DOUBLE\""
        );
        assert_eq!(OutputDataType::Integer.to_string(), "INTEGER");
    }
}
