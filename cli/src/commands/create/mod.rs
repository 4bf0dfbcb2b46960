//! Create sources from local files, then datasets, models and predictions from their parents.
//!
//! Every command except `source` can wait for its parent to finish first with `--wait <secs>`.

mod dataset;
mod model;
mod prediction;
mod source;

use anyhow::Result;
use bigml_client::Client;
use structopt::StructOpt;

use self::{
    dataset::CreateDatasetArgs, model::CreateModelArgs, prediction::CreatePredictionArgs,
    source::CreateSourceArgs,
};
use crate::printer::Printer;

#[derive(Debug, StructOpt)]
pub enum CreateArgs {
    #[structopt(name = "source")]
    /// Upload a local file as a new source
    Source(CreateSourceArgs),

    #[structopt(name = "dataset")]
    /// Create a new dataset from a source
    Dataset(CreateDatasetArgs),

    #[structopt(name = "model")]
    /// Create a new model from a dataset
    Model(CreateModelArgs),

    #[structopt(name = "prediction")]
    /// Create a new prediction from a model
    Prediction(CreatePredictionArgs),
}

pub fn run(create_args: &CreateArgs, client: &Client, printer: &Printer) -> Result<()> {
    match create_args {
        CreateArgs::Source(source_args) => source::create(client, source_args, printer),
        CreateArgs::Dataset(dataset_args) => dataset::create(client, dataset_args, printer),
        CreateArgs::Model(model_args) => model::create(client, model_args, printer),
        CreateArgs::Prediction(prediction_args) => {
            prediction::create(client, prediction_args, printer)
        }
    }
}
