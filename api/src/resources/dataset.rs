use serde::Serialize;
use serde_json::{Map, Value};

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct NewDataset<'request> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<&'request str>>,

    /// Number of bytes of the source to use.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}
