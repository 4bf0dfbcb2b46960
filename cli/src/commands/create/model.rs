use anyhow::{Context, Result};
use bigml_client::{Client, NewModel};
use log::info;
use serde_json::Value;
use structopt::StructOpt;

use crate::{
    commands::seconds,
    printer::Printer,
    utils::{object_from, parse_property},
};

#[derive(Debug, StructOpt)]
pub struct CreateModelArgs {
    #[structopt(name = "dataset-id")]
    /// Id of the dataset to train the model on
    dataset: String,

    #[structopt(long = "name")]
    /// Set the name of the new model
    name: Option<String>,

    #[structopt(long = "description")]
    /// Set the description of the new model
    description: Option<String>,

    #[structopt(long = "objective-field")]
    /// Id of the field to predict. Defaults to the last column
    objective_field: Option<String>,

    #[structopt(long = "input-field")]
    /// Id of a field to train on; may be repeated. Defaults to every other field
    input_fields: Vec<String>,

    #[structopt(long = "property", parse(try_from_str = parse_property))]
    /// Extra creation property as `key=value`; may be repeated
    properties: Vec<(String, Value)>,

    #[structopt(long = "wait", default_value = "0")]
    /// Poll the dataset every this many seconds until it is finished (0 to not wait)
    wait: u64,
}

pub fn create(client: &Client, args: &CreateModelArgs, printer: &Printer) -> Result<()> {
    let CreateModelArgs {
        dataset,
        name,
        description,
        objective_field,
        input_fields,
        properties,
        wait,
    } = args;

    let options = NewModel {
        name: name.as_deref(),
        description: description.as_deref(),
        objective_field: objective_field.as_deref(),
        input_fields: (!input_fields.is_empty())
            .then(|| input_fields.iter().map(String::as_str).collect()),
        properties: properties.iter().cloned().collect(),
        ..Default::default()
    };

    let model = object_from(client.create_model(dataset, &options, seconds(*wait)))
        .context("Operation to create a model has failed.")?;
    info!("New model `{}` created from `{}`.", model.resource, dataset);
    printer.print_resources(&[model])
}
