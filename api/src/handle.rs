use serde::Serialize;
use serde_json::{Map, Value};
use std::{path::Path, time::Duration};

use crate::{
    envelope::{Envelope, Failure},
    error::{Error, Result},
    resources::{
        dataset::NewDataset,
        fields::Fields,
        id::{check_resource_id, ResourceId, ResourceKind, ResourceRef},
        model::NewModel,
        prediction::NewPrediction,
        source::NewSource,
        status::Status,
        Resource,
    },
    wait::WaitConfig,
    Client,
};

/// A created resource bound to the client that manages it.
///
/// Creation methods chain from parent to child: a source creates datasets, a dataset creates
/// models and a model creates predictions.
#[derive(Debug, Clone)]
pub struct Handle<'client> {
    client: &'client Client,
    resource_id: ResourceId,
}

impl<'client> Handle<'client> {
    pub fn new<ResourceT>(client: &'client Client, resource: &ResourceT) -> Result<Self>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        Ok(Self {
            client,
            resource_id: check_resource_id(resource, None)?,
        })
    }

    /// Take the identifier out of a creation envelope, turning a failed creation into an error.
    pub fn from_envelope(client: &'client Client, envelope: Envelope<Resource>) -> Result<Self> {
        match envelope {
            Envelope::Success(success) => Ok(Self {
                client,
                resource_id: success.object.resource,
            }),
            Envelope::Failure(failure) => Err(not_created(&failure)),
        }
    }

    pub fn create_source(
        client: &'client Client,
        path: impl AsRef<Path>,
        options: &NewSource<'_>,
    ) -> Result<Self> {
        Self::from_envelope(client, client.create_source(path, options)?)
    }

    pub fn id(&self) -> &ResourceId {
        &self.resource_id
    }

    pub fn kind(&self) -> ResourceKind {
        self.resource_id.kind()
    }

    pub fn create_dataset(&self, options: &NewDataset<'_>, wait: Duration) -> Result<Self> {
        Self::from_envelope(
            self.client,
            self.client.create_dataset(&self.resource_id, options, wait)?,
        )
    }

    pub fn create_model(&self, options: &NewModel<'_>, wait: Duration) -> Result<Self> {
        Self::from_envelope(
            self.client,
            self.client.create_model(&self.resource_id, options, wait)?,
        )
    }

    pub fn create_prediction(
        &self,
        input_data: &Map<String, Value>,
        options: &NewPrediction<'_>,
        wait: Duration,
    ) -> Result<Self> {
        Self::from_envelope(
            self.client,
            self.client
                .create_prediction(&self.resource_id, input_data, options, wait)?,
        )
    }

    pub fn get(&self) -> Result<Envelope<Resource>> {
        self.client.get(&self.resource_id)
    }

    pub fn update<ChangesT>(&self, changes: &ChangesT) -> Result<Envelope<Resource>>
    where
        ChangesT: Serialize + ?Sized,
    {
        self.client.update(&self.resource_id, changes)
    }

    pub fn delete(self) -> Result<Envelope<()>> {
        self.client.delete(&self.resource_id)
    }

    pub fn get_fields(&self) -> Result<Option<Fields>> {
        self.client
            .lifecycle(self.kind())
            .get_fields(&self.resource_id)
    }

    pub fn status(&self) -> Result<Envelope<Status>> {
        self.client.status(&self.resource_id)
    }

    pub fn is_ready(&self) -> Result<bool> {
        self.client.is_ready(&self.resource_id)
    }

    pub fn wait_until_ready(&self, config: &WaitConfig) -> Result<Envelope<Resource>> {
        self.client.wait_until_ready(&self.resource_id, config)
    }
}

impl<'client> ResourceRef for Handle<'client> {
    fn resource_ref(&self) -> Option<&str> {
        Some(self.resource_id.as_str())
    }
}

fn not_created(failure: &Failure) -> Error {
    Error::NotCreated {
        status_code: failure.status_code(),
        message: failure.message(),
    }
}
