use anyhow::{bail, Context, Result};
use bigml_client::{Client, UpdateResource};
use log::info;
use serde_json::{Map, Value};
use structopt::StructOpt;

use crate::{
    printer::Printer,
    utils::{object_from, parse_json_object},
};

#[derive(Debug, StructOpt)]
pub struct UpdateArgs {
    #[structopt(name = "id")]
    /// Id of the resource to update
    id: String,

    #[structopt(long = "name")]
    /// Set the name of the resource
    name: Option<String>,

    #[structopt(long = "description")]
    /// Set the description of the resource
    description: Option<String>,

    #[structopt(long = "changes", parse(try_from_str = parse_json_object))]
    /// Any other changes, as a JSON object
    changes: Option<Map<String, Value>>,
}

pub fn run(args: &UpdateArgs, client: &Client, printer: &Printer) -> Result<()> {
    let UpdateArgs {
        id,
        name,
        description,
        changes,
    } = args;

    let changes = UpdateResource {
        name: name.as_deref(),
        description: description.as_deref(),
        properties: changes.clone().unwrap_or_default(),
        ..Default::default()
    };
    if changes == UpdateResource::default() {
        bail!("Nothing to update, use `--name`, `--description` or `--changes`.");
    }

    let resource = object_from(client.update(id, &changes))
        .with_context(|| format!("Operation to update `{id}` has failed."))?;
    info!("Update of `{}` accepted.", resource.resource);
    printer.print_resources(&[resource])
}
