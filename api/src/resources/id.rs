use once_cell::sync::Lazy;
use regex::Regex;
use serde_with::{DeserializeFromStr, SerializeDisplay};
use std::{
    fmt::{Display, Formatter, Result as FmtResult},
    str::FromStr,
};

use crate::error::{Error, Result};

static SOURCE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^source/[0-9a-f]{24}$").expect("Source id pattern is valid"));
static DATASET_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^dataset/[0-9a-f]{24}$").expect("Dataset id pattern is valid"));
static MODEL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^model/[0-9a-f]{24}$").expect("Model id pattern is valid"));
static PREDICTION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^prediction/[0-9a-f]{24}$").expect("Prediction id pattern is valid")
});

/// The four resource collections exposed by the API.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub enum ResourceKind {
    Source,
    Dataset,
    Model,
    Prediction,
}

impl ResourceKind {
    /// All kinds, in the order used when detecting the kind of an untyped id.
    pub const ALL: [ResourceKind; 4] = [
        ResourceKind::Source,
        ResourceKind::Dataset,
        ResourceKind::Model,
        ResourceKind::Prediction,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Source => "source",
            ResourceKind::Dataset => "dataset",
            ResourceKind::Model => "model",
            ResourceKind::Prediction => "prediction",
        }
    }

    /// The kind a resource of this kind is created from, if any.
    pub fn parent(&self) -> Option<ResourceKind> {
        match self {
            ResourceKind::Source => None,
            ResourceKind::Dataset => Some(ResourceKind::Source),
            ResourceKind::Model => Some(ResourceKind::Dataset),
            ResourceKind::Prediction => Some(ResourceKind::Model),
        }
    }

    fn pattern(&self) -> &'static Regex {
        match self {
            ResourceKind::Source => &SOURCE_RE,
            ResourceKind::Dataset => &DATASET_RE,
            ResourceKind::Model => &MODEL_RE,
            ResourceKind::Prediction => &PREDICTION_RE,
        }
    }

    pub fn matches(&self, identifier: &str) -> bool {
        self.pattern().is_match(identifier)
    }
}

impl FromStr for ResourceKind {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        Ok(match string {
            "source" | "sources" => ResourceKind::Source,
            "dataset" | "datasets" => ResourceKind::Dataset,
            "model" | "models" => ResourceKind::Model,
            "prediction" | "predictions" => ResourceKind::Prediction,
            _ => {
                return Err(Error::BadResourceKind {
                    kind: string.into(),
                })
            }
        })
    }
}

impl Display for ResourceKind {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.as_str())
    }
}

/// A server assigned identifier of the form `<kind>/<24 lowercase hex chars>`.
///
/// The only way to obtain one is through validation, so any `ResourceId` is safe to interpolate
/// into a URL.
#[derive(Debug, Clone, PartialEq, Eq, Hash, SerializeDisplay, DeserializeFromStr)]
pub struct ResourceId {
    kind: ResourceKind,
    id: String,
}

impl ResourceId {
    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    pub fn as_str(&self) -> &str {
        &self.id
    }

    /// The hex suffix, without the `<kind>/` prefix.
    pub fn hex(&self) -> &str {
        &self.id[self.kind.as_str().len() + 1..]
    }
}

impl FromStr for ResourceId {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        check_resource_id(string, None)
    }
}

impl Display for ResourceId {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        write!(formatter, "{}", self.id)
    }
}

/// Anything an identifier can be read from: a raw string, a validated id or the result of a
/// previous call.
pub trait ResourceRef {
    /// The candidate identifier, or `None` if the value does not carry one.
    fn resource_ref(&self) -> Option<&str>;
}

impl ResourceRef for str {
    fn resource_ref(&self) -> Option<&str> {
        Some(self)
    }
}

impl ResourceRef for String {
    fn resource_ref(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl ResourceRef for ResourceId {
    fn resource_ref(&self) -> Option<&str> {
        Some(self.as_str())
    }
}

impl<T: ResourceRef + ?Sized> ResourceRef for &T {
    fn resource_ref(&self) -> Option<&str> {
        (**self).resource_ref()
    }
}

/// Validate a candidate identifier against the pattern of `expected`.
///
/// Without an expected kind, every kind is tried in the order of [`ResourceKind::ALL`] and the
/// first match is adopted. Never touches the network.
pub fn check_resource_id<R>(candidate: &R, expected: Option<ResourceKind>) -> Result<ResourceId>
where
    R: ResourceRef + ?Sized,
{
    let expected_name = expected.map_or("resource", |kind| kind.as_str());
    let identifier = candidate.resource_ref().ok_or(Error::MissingIdentifier {
        expected: expected_name,
    })?;

    let kind = match expected {
        Some(kind) if kind.matches(identifier) => Some(kind),
        Some(_) => None,
        None => ResourceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.matches(identifier)),
    };

    match kind {
        Some(kind) => Ok(ResourceId {
            kind,
            id: identifier.to_owned(),
        }),
        None => Err(Error::InvalidIdentifier {
            identifier: identifier.to_owned(),
            expected: expected_name,
        }),
    }
}
