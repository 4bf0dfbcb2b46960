use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct NewModel<'request> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<&'request str>>,

    /// Id of the field to predict. Defaults to the last column.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub objective_field: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub input_fields: Option<Vec<&'request str>>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}
