use anyhow::{Context, Result};
use bigml_client::{Client, NewDataset};
use log::info;
use serde_json::Value;
use structopt::StructOpt;

use crate::{
    commands::seconds,
    printer::Printer,
    utils::{object_from, parse_property},
};

#[derive(Debug, StructOpt)]
pub struct CreateDatasetArgs {
    #[structopt(name = "source-id")]
    /// Id of the source to build the dataset from, e.g. `source/4f603fe203ce89bb2d000000`
    source: String,

    #[structopt(long = "name")]
    /// Set the name of the new dataset
    name: Option<String>,

    #[structopt(long = "description")]
    /// Set the description of the new dataset
    description: Option<String>,

    #[structopt(long = "size")]
    /// Number of bytes of the source to use
    size: Option<u64>,

    #[structopt(long = "property", parse(try_from_str = parse_property))]
    /// Extra creation property as `key=value`; may be repeated
    properties: Vec<(String, Value)>,

    #[structopt(long = "wait", default_value = "0")]
    /// Poll the source every this many seconds until it is finished (0 to not wait)
    wait: u64,
}

pub fn create(client: &Client, args: &CreateDatasetArgs, printer: &Printer) -> Result<()> {
    let CreateDatasetArgs {
        source,
        name,
        description,
        size,
        properties,
        wait,
    } = args;

    let options = NewDataset {
        name: name.as_deref(),
        description: description.as_deref(),
        size: *size,
        properties: properties.iter().cloned().collect(),
        ..Default::default()
    };

    let dataset = object_from(client.create_dataset(source, &options, seconds(*wait)))
        .context("Operation to create a dataset has failed.")?;
    info!("New dataset `{}` created from `{}`.", dataset.resource, source);
    printer.print_resources(&[dataset])
}
