use anyhow::{Context, Result};
use bigml_client::{Client, ResourceKind};
use log::info;
use structopt::StructOpt;

use crate::{
    printer::Printer,
    utils::{into_object, object_from},
};

#[derive(Debug, StructOpt)]
pub struct GetResourcesArgs {
    #[structopt(name = "id")]
    /// If specified, only show this resource
    id: Option<String>,

    #[structopt(long = "query", default_value = "")]
    /// Filtering, ordering or paging parameters appended to the list request, e.g.
    /// `limit=5;order_by=-created`. Must already be URL encoded
    query: String,
}

pub fn get(
    client: &Client,
    kind: ResourceKind,
    args: &GetResourcesArgs,
    printer: &Printer,
) -> Result<()> {
    let GetResourcesArgs { id, query } = args;
    let lifecycle = client.lifecycle(kind);

    if let Some(id) = id {
        let resource = object_from(lifecycle.get(id))
            .with_context(|| format!("Operation to get `{id}` has failed."))?;
        return printer.print_resources(&[resource]);
    }

    let listing = into_object(lifecycle.list(query))
        .with_context(|| format!("Operation to list {kind}s has failed."))?;
    if let Some(total_count) = listing.meta.total_count {
        if total_count > listing.objects.len() as u64 {
            info!(
                "Showing {} of {} {}s; page with `--query offset=<n>`.",
                listing.objects.len(),
                total_count,
                kind
            );
        }
    }
    printer.print_resources(&listing.objects)
}
