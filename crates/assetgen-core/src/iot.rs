//! IoT metadata model - thing classes and tag groups
//!
//! These are the definitions published by the metadata registry. A thing
//! class declares the tag groups it writes; each tag group carries an
//! ordered list of tags with a native type and unit.
//!
//! ## Tag group JSON
//! ```json
//! {
//!   "name": "Temperature",
//!   "context": "com.example.sensors",
//!   "version": "v1.0",
//!   "description": "Temperature reading",
//!   "qosProfile": "telemetry",
//!   "tags": [
//!     {"name": "value", "description": "Degrees", "kind": "FLOAT32", "unit": "C"}
//!   ]
//! }
//! ```
//!
//! ## Thing class JSON
//! ```json
//! {
//!   "name": "Pump1",
//!   "context": "plant/pumps",
//!   "version": "v1.0",
//!   "description": "A pump",
//!   "outputs": [
//!     {"name": "temperature", "tagGroupId": "Temperature:com.example.sensors:v1.0"}
//!   ]
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Native telemetry type of a tag.
///
/// Kind names are matched case-insensitively. Kinds this crate does not
/// know about (nested tag groups, name/value pairs, future additions)
/// deserialize to [`IotType::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IotType {
    Uint8,
    Uint16,
    Uint32,
    Uint64,
    Int8,
    Int16,
    Int32,
    Int64,
    Float32,
    Float64,
    Boolean,
    String,
    Char,
    Uint8Seq,
    Uint16Seq,
    Uint32Seq,
    Uint64Seq,
    Int8Seq,
    Int16Seq,
    Int32Seq,
    Int64Seq,
    Float32Seq,
    Float64Seq,
    BooleanSeq,
    StringSeq,
    CharSeq,
    Unknown,
}

impl IotType {
    /// Every known kind, scalars first.
    pub const ALL: [IotType; 26] = [
        Self::Uint8,
        Self::Uint16,
        Self::Uint32,
        Self::Uint64,
        Self::Int8,
        Self::Int16,
        Self::Int32,
        Self::Int64,
        Self::Float32,
        Self::Float64,
        Self::Boolean,
        Self::String,
        Self::Char,
        Self::Uint8Seq,
        Self::Uint16Seq,
        Self::Uint32Seq,
        Self::Uint64Seq,
        Self::Int8Seq,
        Self::Int16Seq,
        Self::Int32Seq,
        Self::Int64Seq,
        Self::Float32Seq,
        Self::Float64Seq,
        Self::BooleanSeq,
        Self::StringSeq,
        Self::CharSeq,
    ];

    /// Whether this is a sequence (array) kind.
    pub fn is_sequence(&self) -> bool {
        matches!(
            self,
            Self::Uint8Seq
                | Self::Uint16Seq
                | Self::Uint32Seq
                | Self::Uint64Seq
                | Self::Int8Seq
                | Self::Int16Seq
                | Self::Int32Seq
                | Self::Int64Seq
                | Self::Float32Seq
                | Self::Float64Seq
                | Self::BooleanSeq
                | Self::StringSeq
                | Self::CharSeq
        )
    }

    /// Kind name as written in tag group files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Uint8 => "UINT8",
            Self::Uint16 => "UINT16",
            Self::Uint32 => "UINT32",
            Self::Uint64 => "UINT64",
            Self::Int8 => "INT8",
            Self::Int16 => "INT16",
            Self::Int32 => "INT32",
            Self::Int64 => "INT64",
            Self::Float32 => "FLOAT32",
            Self::Float64 => "FLOAT64",
            Self::Boolean => "BOOLEAN",
            Self::String => "STRING",
            Self::Char => "CHAR",
            Self::Uint8Seq => "UINT8_SEQ",
            Self::Uint16Seq => "UINT16_SEQ",
            Self::Uint32Seq => "UINT32_SEQ",
            Self::Uint64Seq => "UINT64_SEQ",
            Self::Int8Seq => "INT8_SEQ",
            Self::Int16Seq => "INT16_SEQ",
            Self::Int32Seq => "INT32_SEQ",
            Self::Int64Seq => "INT64_SEQ",
            Self::Float32Seq => "FLOAT32_SEQ",
            Self::Float64Seq => "FLOAT64_SEQ",
            Self::BooleanSeq => "BOOLEAN_SEQ",
            Self::StringSeq => "STRING_SEQ",
            Self::CharSeq => "CHAR_SEQ",
            Self::Unknown => "UNKNOWN",
        }
    }

    /// Parse a kind name as it appears in tag group files (`"FLOAT32"`, `"byte"`).
    pub fn from_name(name: &str) -> Self {
        let upper = name.trim().to_ascii_uppercase();
        match upper.as_str() {
            "BYTE" => Self::Uint8,
            "BYTE_SEQ" => Self::Uint8Seq,
            other => Self::ALL
                .iter()
                .copied()
                .find(|t| t.as_str() == other)
                .unwrap_or(Self::Unknown),
        }
    }
}

impl std::fmt::Display for IotType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl Serialize for IotType {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for IotType {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let name = String::deserialize(deserializer)?;
        Ok(Self::from_name(&name))
    }
}

/// A single telemetry tag inside a tag group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tag {
    /// Tag name, unique within its tag group
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Native type
    pub kind: IotType,

    /// Unit of measurement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl Tag {
    pub fn new(name: impl Into<String>, kind: IotType) -> Self {
        Self {
            name: name.into(),
            description: None,
            kind,
            unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Top-level type of a tag group: its ordered tags.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TypeDefinition {
    #[serde(default)]
    pub tags: Vec<Tag>,
}

/// A named bundle of telemetry tags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagGroup {
    pub name: String,

    pub context: String,

    pub version: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// QoS profile name (e.g. "telemetry", "state")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub qos_profile: Option<String>,

    #[serde(flatten)]
    pub top_level_type: TypeDefinition,
}

impl TagGroup {
    pub fn new(
        name: impl Into<String>,
        context: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            version: version.into(),
            description: None,
            qos_profile: None,
            top_level_type: TypeDefinition::default(),
        }
    }

    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.top_level_type.tags.push(tag);
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Registry identifier: `name:context:version`.
    pub fn id(&self) -> String {
        format!("{}:{}:{}", self.name, self.context, self.version)
    }

    pub fn tags(&self) -> &[Tag] {
        &self.top_level_type.tags
    }
}

/// Reference from a thing class to one of its output tag groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputTagGroup {
    /// Local name; becomes the property name prefix
    pub name: String,

    /// Registry identifier of the tag group
    pub tag_group_id: String,
}

impl OutputTagGroup {
    pub fn new(name: impl Into<String>, tag_group_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tag_group_id: tag_group_id.into(),
        }
    }
}

/// Device/thing type definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThingClass {
    pub name: String,

    /// Namespace path, also used as the output directory
    pub context: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,

    #[serde(default)]
    pub description: String,

    /// Declared output tag groups, in declaration order
    #[serde(default)]
    pub outputs: Vec<OutputTagGroup>,

    /// Declared input tag groups (not mapped)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub inputs: Vec<OutputTagGroup>,
}

impl ThingClass {
    pub fn new(name: impl Into<String>, context: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            context: context.into(),
            version: None,
            description: String::new(),
            outputs: Vec::new(),
            inputs: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_output(mut self, name: impl Into<String>, tag_group_id: impl Into<String>) -> Self {
        self.outputs.push(OutputTagGroup::new(name, tag_group_id));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_iot_type_names() {
        assert_eq!(IotType::from_name("FLOAT32"), IotType::Float32);
        assert_eq!(IotType::from_name("byte"), IotType::Uint8);
        assert_eq!(IotType::from_name("UINT64_SEQ"), IotType::Uint64Seq);
        assert_eq!(IotType::from_name("NVP_SEQ"), IotType::Unknown);
        assert_eq!(IotType::Int16Seq.to_string(), "INT16_SEQ");
        assert_eq!(IotType::Boolean.to_string(), "BOOLEAN");
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in IotType::ALL {
            assert_eq!(IotType::from_name(kind.as_str()), kind);
            let json = serde_json::to_string(&kind).unwrap();
            assert_eq!(serde_json::from_str::<IotType>(&json).unwrap(), kind);
        }
    }

    #[test]
    fn test_file_kind_is_case_insensitive() {
        let tag: Tag = serde_json::from_str(r#"{"name": "value", "kind": "float32"}"#).unwrap();
        assert_eq!(tag.kind, IotType::Float32);
        assert_eq!(tag.kind, IotType::from_name("float32"));

        let tag: Tag = serde_json::from_str(r#"{"name": "raw", "kind": "Byte_Seq"}"#).unwrap();
        assert_eq!(tag.kind, IotType::Uint8Seq);
    }

    #[test]
    fn test_sequence_kinds() {
        let sequences = IotType::ALL.iter().filter(|t| t.is_sequence()).count();
        assert_eq!(sequences, 13);
        assert!(!IotType::Unknown.is_sequence());
    }

    #[test]
    fn test_tag_group_deserialize() {
        let json = r#"{
            "name": "Temperature",
            "context": "com.example",
            "version": "v1.0",
            "qosProfile": "telemetry",
            "tags": [
                {"name": "value", "kind": "FLOAT32", "unit": "C"},
                {"name": "raw", "kind": "TAG_GROUP"}
            ]
        }"#;
        let group: TagGroup = serde_json::from_str(json).unwrap();
        assert_eq!(group.id(), "Temperature:com.example:v1.0");
        assert_eq!(group.qos_profile.as_deref(), Some("telemetry"));
        assert_eq!(group.tags().len(), 2);
        assert_eq!(group.tags()[0].unit.as_deref(), Some("C"));
        assert_eq!(group.tags()[1].kind, IotType::Unknown);
        assert_eq!(group.tags()[1].unit, None);
    }

    #[test]
    fn test_thing_class_deserialize() {
        let json = r#"{
            "name": "Pump1",
            "context": "plant/pumps",
            "description": "A pump",
            "outputs": [
                {"name": "temperature", "tagGroupId": "Temperature:com.example:v1.0"},
                {"name": "pressure", "tagGroupId": "Pressure:com.example:v1.0"}
            ]
        }"#;
        let thing: ThingClass = serde_json::from_str(json).unwrap();
        assert_eq!(thing.name, "Pump1");
        assert_eq!(thing.outputs.len(), 2);
        assert_eq!(thing.outputs[1].name, "pressure");
        assert!(thing.inputs.is_empty());
    }
}
