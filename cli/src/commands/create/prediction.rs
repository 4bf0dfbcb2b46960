use anyhow::{Context, Result};
use bigml_client::{Client, NewPrediction};
use log::info;
use serde_json::{Map, Value};
use structopt::StructOpt;

use crate::{
    commands::seconds,
    printer::Printer,
    utils::{object_from, parse_json_object, parse_property},
};

#[derive(Debug, StructOpt)]
pub struct CreatePredictionArgs {
    #[structopt(name = "model-id")]
    /// Id of the model to predict with
    model: String,

    #[structopt(long = "input", parse(try_from_str = parse_json_object))]
    /// Input values keyed by field name, as a JSON object, e.g. '{"sepal length": 5}'
    input: Option<Map<String, Value>>,

    #[structopt(long = "name")]
    /// Set the name of the new prediction
    name: Option<String>,

    #[structopt(long = "property", parse(try_from_str = parse_property))]
    /// Extra creation property as `key=value`; may be repeated
    properties: Vec<(String, Value)>,

    #[structopt(long = "wait", default_value = "0")]
    /// Poll the model every this many seconds until it is finished (0 to not wait)
    wait: u64,
}

pub fn create(client: &Client, args: &CreatePredictionArgs, printer: &Printer) -> Result<()> {
    let CreatePredictionArgs {
        model,
        input,
        name,
        properties,
        wait,
    } = args;

    let options = NewPrediction {
        name: name.as_deref(),
        properties: properties.iter().cloned().collect(),
        ..Default::default()
    };

    let prediction = object_from(client.create_prediction(
        model,
        &input.clone().unwrap_or_default(),
        &options,
        seconds(*wait),
    ))
    .context("Operation to create a prediction has failed.")?;

    match prediction.properties.get("prediction") {
        Some(outcome) => info!(
            "New prediction `{}` from `{}`: {}",
            prediction.resource, model, outcome
        ),
        None => info!("New prediction `{}` created from `{}`.", prediction.resource, model),
    }
    printer.print_resources(&[prediction])
}
