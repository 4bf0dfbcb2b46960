use serde::Serialize;

use crate::{
    envelope::Envelope,
    error::{Error, Result},
    resources::{
        fields::Fields,
        id::{check_resource_id, ResourceId, ResourceKind, ResourceRef},
        status::Status,
        Listing, Resource,
    },
    wait::WaitConfig,
    Client,
};

/// Operations shared by every kind of resource, restricted to a single kind.
///
/// Identifiers of any other kind are rejected before a request is made. Creation takes different
/// inputs for every kind and lives on the client: [`Client::create_source`],
/// [`Client::create_dataset`], [`Client::create_model`] and [`Client::create_prediction`].
#[derive(Debug, Clone, Copy)]
pub struct Lifecycle<'client> {
    client: &'client Client,
    kind: ResourceKind,
}

impl<'client> Lifecycle<'client> {
    pub(crate) fn new(client: &'client Client, kind: ResourceKind) -> Self {
        Self { client, kind }
    }

    pub fn kind(&self) -> ResourceKind {
        self.kind
    }

    fn check<ResourceT>(&self, resource: &ResourceT) -> Result<ResourceId>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        check_resource_id(resource, Some(self.kind))
    }

    pub fn get<ResourceT>(&self, resource: &ResourceT) -> Result<Envelope<Resource>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        self.client.get(&self.check(resource)?)
    }

    pub fn list(&self, query: &str) -> Envelope<Listing> {
        self.client.list(self.kind, query)
    }

    pub fn update<ResourceT, ChangesT>(
        &self,
        resource: &ResourceT,
        changes: &ChangesT,
    ) -> Result<Envelope<Resource>>
    where
        ResourceT: ResourceRef + ?Sized,
        ChangesT: Serialize + ?Sized,
    {
        self.client.update(&self.check(resource)?, changes)
    }

    pub fn delete<ResourceT>(&self, resource: &ResourceT) -> Result<Envelope<()>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        self.client.delete(&self.check(resource)?)
    }

    /// Field definitions of a source, dataset or model. Predictions have none.
    pub fn get_fields<ResourceT>(&self, resource: &ResourceT) -> Result<Option<Fields>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        if self.kind == ResourceKind::Prediction {
            return Err(Error::FieldsUnsupported { kind: self.kind });
        }
        self.client.get_fields(&self.check(resource)?)
    }

    pub fn status<ResourceT>(&self, resource: &ResourceT) -> Result<Envelope<Status>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        self.client.status(&self.check(resource)?)
    }

    pub fn is_ready<ResourceT>(&self, resource: &ResourceT) -> Result<bool>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        self.client.is_ready(&self.check(resource)?)
    }

    pub fn wait_until_ready<ResourceT>(
        &self,
        resource: &ResourceT,
        config: &WaitConfig,
    ) -> Result<Envelope<Resource>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        self.client.wait_until_ready(&self.check(resource)?, config)
    }
}
