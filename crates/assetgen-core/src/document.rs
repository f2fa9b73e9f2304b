//! Asset model document
//!
//! In-memory form of the document consumed by the asset-modeling service,
//! and its JSON encoding.
//!
//! ```json
//! {
//!   "assetModelName": "Pump1",
//!   "assetModelDescription": "A pump",
//!   "assetModelProperties": [
//!     {"name": "contextId", "dataType": "STRING", "type": {"attribute": {"defaultValue": ""}}, "unit": ""},
//!     {"name": "temperature_value", "dataType": "DOUBLE", "type": {"measurement": {}}, "unit": "C"}
//!   ],
//!   "assetModelHiearchies": []
//! }
//! ```
//!
//! `assetModelHiearchies` is spelled the way the service spells it.

use serde::{Deserialize, Serialize};

use crate::projection::OutputDataType;

/// Root document: one per thing class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssetModel {
    #[serde(rename = "assetModelName")]
    pub name: String,

    #[serde(rename = "assetModelDescription")]
    pub description: String,

    #[serde(rename = "assetModelProperties", default)]
    pub properties: Vec<ModelProperty>,

    #[serde(rename = "assetModelHiearchies", default)]
    pub hierarchies: Vec<ModelHierarchy>,
}

impl AssetModel {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            properties: Vec::new(),
            hierarchies: Vec::new(),
        }
    }

    pub fn with_property(mut self, property: ModelProperty) -> Self {
        self.properties.push(property);
        self
    }

    pub fn with_hierarchy(mut self, hierarchy: ModelHierarchy) -> Self {
        self.hierarchies.push(hierarchy);
        self
    }

    /// Look up a property by name.
    pub fn property(&self, name: &str) -> Option<&ModelProperty> {
        self.properties.iter().find(|p| p.name == name)
    }

    /// Check structural invariants: every property and hierarchy is named.
    pub fn validate(&self) -> Result<(), DocumentError> {
        if let Some(index) = self.properties.iter().position(|p| p.name.is_empty()) {
            return Err(DocumentError::EmptyPropertyName(index));
        }
        if let Some(index) = self.hierarchies.iter().position(|h| h.name.is_empty()) {
            return Err(DocumentError::EmptyHierarchyName(index));
        }
        Ok(())
    }

    /// Encode into a JSON object ready to be written out.
    pub fn to_document(&self) -> Result<serde_json::Value, DocumentError> {
        self.validate()?;
        Ok(serde_json::to_value(self)?)
    }

    /// Encode as a JSON string.
    pub fn to_json(&self, pretty: bool) -> Result<String, DocumentError> {
        self.validate()?;
        let json = if pretty {
            serde_json::to_string_pretty(self)?
        } else {
            serde_json::to_string(self)?
        };
        Ok(json)
    }
}

/// A named, typed element of an asset model.
///
/// The fields every variant shares live here; the variant-specific
/// payload is [`PropertyType`], encoded as a single-key `type` object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelProperty {
    pub name: String,

    /// `None` marks a tag whose native type has no output representation
    pub data_type: Option<OutputDataType>,

    #[serde(rename = "type")]
    pub kind: PropertyType,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
}

impl ModelProperty {
    /// Static field with a default value.
    pub fn attribute(
        name: impl Into<String>,
        data_type: OutputDataType,
        unit: Option<String>,
        default_value: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type),
            kind: PropertyType::Attribute {
                default_value: default_value.into(),
            },
            unit,
        }
    }

    /// Raw sensor reading.
    pub fn measurement(
        name: impl Into<String>,
        data_type: Option<OutputDataType>,
        unit: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type,
            kind: PropertyType::Measurement {},
            unit,
        }
    }

    /// Expression computed over other properties.
    pub fn transform(
        name: impl Into<String>,
        data_type: OutputDataType,
        unit: Option<String>,
        expression: impl Into<String>,
        variables: Vec<ModelVariable>,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type),
            kind: PropertyType::Transform {
                expression: expression.into(),
                variables,
            },
            unit,
        }
    }

    /// Expression aggregated over a time window.
    pub fn metric(
        name: impl Into<String>,
        data_type: OutputDataType,
        unit: Option<String>,
        expression: impl Into<String>,
        variables: Vec<ModelVariable>,
        window: MetricWindow,
    ) -> Self {
        Self {
            name: name.into(),
            data_type: Some(data_type),
            kind: PropertyType::Metric {
                expression: expression.into(),
                variables,
                window,
            },
            unit,
        }
    }

    /// Whether the data type projected to something representable.
    pub fn is_supported(&self) -> bool {
        self.data_type.is_some()
    }

    pub fn variant(&self) -> &'static str {
        self.kind.tag()
    }
}

/// Variant payload of a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    #[serde(rename_all = "camelCase")]
    Attribute { default_value: String },
    Measurement {},
    Transform {
        expression: String,
        variables: Vec<ModelVariable>,
    },
    Metric {
        expression: String,
        variables: Vec<ModelVariable>,
        window: MetricWindow,
    },
}

impl PropertyType {
    /// Key used for this variant in the `type` object.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Attribute { .. } => "attribute",
            Self::Measurement {} => "measurement",
            Self::Transform { .. } => "transform",
            Self::Metric { .. } => "metric",
        }
    }

    /// Variables bound by the expression, empty for attributes and measurements.
    pub fn variables(&self) -> &[ModelVariable] {
        match self {
            Self::Transform { variables, .. } | Self::Metric { variables, .. } => variables.as_slice(),
            Self::Attribute { .. } | Self::Measurement {} => &[],
        }
    }
}

/// Aggregation window of a metric.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MetricWindow {
    Tumbling { interval: String },
}

impl MetricWindow {
    pub fn tumbling(interval: impl Into<String>) -> Self {
        Self::Tumbling {
            interval: interval.into(),
        }
    }
}

/// Named binding used inside a transform or metric expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelVariable {
    pub name: String,
    pub value: VariableValue,
}

impl ModelVariable {
    /// Variable bound to a property of the same model.
    pub fn property(name: impl Into<String>, property_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: VariableValue {
                property_id: Some(property_id.into()),
                hierarchy_id: None,
            },
        }
    }

    /// Variable bound to a property reached through a child hierarchy.
    pub fn hierarchy(
        name: impl Into<String>,
        property_id: impl Into<String>,
        hierarchy_id: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: VariableValue {
                property_id: Some(property_id.into()),
                hierarchy_id: Some(hierarchy_id.into()),
            },
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableValue {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hierarchy_id: Option<String>,
}

/// Reference to a child asset model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelHierarchy {
    pub name: String,

    #[serde(rename = "childAssetModelId")]
    pub child_id: String,
}

impl ModelHierarchy {
    pub fn new(name: impl Into<String>, child_id: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            child_id: child_id.into(),
        }
    }
}

/// Errors raised while encoding a document.
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
    #[error("Property at index {0} has an empty name")]
    EmptyPropertyName(usize),

    #[error("Hierarchy at index {0} has an empty name")]
    EmptyHierarchyName(usize),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attribute_serialization() {
        let attr = ModelProperty::attribute("contextId", OutputDataType::String, Some(String::new()), "");
        assert_eq!(
            serde_json::to_value(&attr).unwrap(),
            json!({
                "name": "contextId",
                "dataType": "STRING",
                "type": {"attribute": {"defaultValue": ""}},
                "unit": ""
            })
        );
    }

    #[test]
    fn test_absent_unit_is_omitted() {
        let attr = ModelProperty::attribute("serial", OutputDataType::String, None, "n/a");
        let value = serde_json::to_value(&attr).unwrap();
        assert!(value.get("unit").is_none());
        assert_eq!(value["type"]["attribute"]["defaultValue"], "n/a");
    }

    #[test]
    fn test_measurement_serialization() {
        let m = ModelProperty::measurement(
            "temperature_value",
            Some(OutputDataType::Double),
            Some("C".to_string()),
        );
        assert_eq!(
            serde_json::to_string(&m).unwrap(),
            r#"{"name":"temperature_value","dataType":"DOUBLE","type":{"measurement":{}},"unit":"C"}"#
        );
    }

    #[test]
    fn test_unsupported_measurement_has_null_type() {
        let m = ModelProperty::measurement("counter_total", None, None);
        let value = serde_json::to_value(&m).unwrap();
        assert_eq!(value["dataType"], serde_json::Value::Null);
        assert!(!m.is_supported());
    }

    #[test]
    fn test_variable_with_property_only() {
        let v = ModelVariable::property("t", "temperature_value");
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"name": "t", "value": {"propertyId": "temperature_value"}})
        );

        let v = ModelVariable::hierarchy("t", "temperature_value", "pumps");
        assert_eq!(
            serde_json::to_value(&v).unwrap(),
            json!({"name": "t", "value": {"propertyId": "temperature_value", "hierarchyId": "pumps"}})
        );
    }

    #[test]
    fn test_transform_and_metric_serialization() {
        let vars = vec![ModelVariable::property("c", "temperature_value")];
        let transform = ModelProperty::transform(
            "temperature_f",
            OutputDataType::Double,
            Some("F".to_string()),
            "c * 9 / 5 + 32",
            vars.clone(),
        );
        assert_eq!(
            serde_json::to_value(&transform).unwrap()["type"],
            json!({"transform": {
                "expression": "c * 9 / 5 + 32",
                "variables": [{"name": "c", "value": {"propertyId": "temperature_value"}}]
            }})
        );

        let metric = ModelProperty::metric(
            "temperature_avg",
            OutputDataType::Double,
            None,
            "avg(c)",
            vars,
            MetricWindow::tumbling("5m"),
        );
        let value = serde_json::to_value(&metric).unwrap();
        assert_eq!(value["type"]["metric"]["window"], json!({"tumbling": {"interval": "5m"}}));
        assert_eq!(value["type"]["metric"]["expression"], "avg(c)");
        assert_eq!(metric.variant(), "metric");
        assert_eq!(metric.kind.variables().len(), 1);
    }

    #[test]
    fn test_document_shape() {
        let model = AssetModel::new("Pump1", "A pump")
            .with_property(ModelProperty::measurement("x", Some(OutputDataType::Integer), None))
            .with_hierarchy(ModelHierarchy::new("motor", "motor-model-id"));
        let doc = model.to_document().unwrap();
        assert_eq!(doc["assetModelName"], "Pump1");
        assert_eq!(doc["assetModelDescription"], "A pump");
        assert_eq!(doc["assetModelProperties"].as_array().unwrap().len(), 1);
        assert_eq!(
            doc["assetModelHiearchies"],
            json!([{"name": "motor", "childAssetModelId": "motor-model-id"}])
        );

        let decoded: AssetModel = serde_json::from_value(doc).unwrap();
        assert_eq!(decoded, model);
    }

    #[test]
    fn test_property_lookup() {
        let model = AssetModel::new("Pump1", "")
            .with_property(ModelProperty::measurement("a", Some(OutputDataType::Integer), None))
            .with_property(ModelProperty::measurement("b", Some(OutputDataType::Boolean), None));
        assert_eq!(model.property("b").unwrap().data_type, Some(OutputDataType::Boolean));
        assert!(model.property("c").is_none());
    }

    #[test]
    fn test_empty_name_rejected() {
        let model = AssetModel::new("Pump1", "")
            .with_property(ModelProperty::measurement("", Some(OutputDataType::Integer), None));
        assert!(matches!(
            model.to_document(),
            Err(DocumentError::EmptyPropertyName(0))
        ));
    }
}
