pub mod dataset;
pub mod fields;
pub mod id;
pub mod model;
pub mod prediction;
pub mod source;
pub mod status;

use log::warn;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    error::{Error, Result},
    resources::{
        fields::Fields,
        id::{ResourceId, ResourceKind, ResourceRef},
        status::{ResourceStatus, Status},
    },
};

/// The decoded body of a single resource.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Resource {
    pub resource: ResourceId,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ResourceStatus>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

impl Resource {
    pub fn kind(&self) -> ResourceKind {
        self.resource.kind()
    }

    pub fn name(&self) -> Option<&str> {
        self.properties.get("name").and_then(Value::as_str)
    }

    /// Status of the resource; a body without one counts as `Unknown`.
    pub fn status(&self) -> Status {
        self.status
            .as_ref()
            .map_or(Status::Unknown, ResourceStatus::status)
    }

    pub fn is_finished(&self) -> bool {
        self.status() == Status::Finished
    }

    /// Field definitions, found under `model.fields` for models and `fields` otherwise.
    pub fn fields(&self) -> Option<Fields> {
        let fields = match self.kind() {
            ResourceKind::Model => self.properties.get("model")?.get("fields")?,
            _ => self.properties.get("fields")?,
        };
        match serde_json::from_value(fields.clone()) {
            Ok(fields) => Some(fields),
            Err(error) => {
                warn!("Could not decode the fields of `{}`: {}", self.resource, error);
                None
            }
        }
    }
}

impl ResourceRef for Resource {
    fn resource_ref(&self) -> Option<&str> {
        Some(self.resource.as_str())
    }
}

#[derive(Debug, Clone, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct ListMeta {
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
    #[serde(default)]
    pub total_count: Option<u64>,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
}

/// One page of a collection.
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Listing {
    pub meta: ListMeta,
    pub objects: Vec<Resource>,
}

/// Common changes accepted by every kind of resource.
#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct UpdateResource<'request> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<&'request str>>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Serialise creation options and add the properties that tie the new resource to its parent.
///
/// The added properties win over same named keys in `options`.
pub(crate) fn request_body(
    options: &impl Serialize,
    overrides: impl IntoIterator<Item = (&'static str, Value)>,
) -> Result<Map<String, Value>> {
    let mut body = match serde_json::to_value(options).map_err(Error::SerializeRequest)? {
        Value::Object(body) => body,
        Value::Null => Map::new(),
        other => {
            return Err(Error::SerializeRequest(serde::ser::Error::custom(format!(
                "expected an object, got `{other}`"
            ))))
        }
    };
    for (key, value) in overrides {
        body.insert(key.to_owned(), value);
    }
    Ok(body)
}
