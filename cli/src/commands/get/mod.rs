mod fields;
mod resources;
mod status;

use anyhow::Result;
use bigml_client::{Client, ResourceKind};
use structopt::StructOpt;

use self::resources::GetResourcesArgs;
use crate::printer::Printer;

#[derive(Debug, StructOpt)]
pub enum GetArgs {
    #[structopt(name = "sources")]
    /// List the available sources
    Sources(GetResourcesArgs),

    #[structopt(name = "datasets")]
    /// List the available datasets
    Datasets(GetResourcesArgs),

    #[structopt(name = "models")]
    /// List the available models
    Models(GetResourcesArgs),

    #[structopt(name = "predictions")]
    /// List the available predictions
    Predictions(GetResourcesArgs),

    #[structopt(name = "fields")]
    /// List the fields of a source, dataset or model
    Fields {
        #[structopt(name = "id")]
        /// Id of the source, dataset or model
        id: String,
    },

    #[structopt(name = "status")]
    /// Display the processing status of a resource
    Status {
        #[structopt(name = "id")]
        /// Id of the resource
        id: String,
    },
}

pub fn run(args: &GetArgs, client: &Client, printer: &Printer) -> Result<()> {
    match args {
        GetArgs::Sources(args) => resources::get(client, ResourceKind::Source, args, printer),
        GetArgs::Datasets(args) => resources::get(client, ResourceKind::Dataset, args, printer),
        GetArgs::Models(args) => resources::get(client, ResourceKind::Model, args, printer),
        GetArgs::Predictions(args) => {
            resources::get(client, ResourceKind::Prediction, args, printer)
        }
        GetArgs::Fields { id } => fields::get(client, id, printer),
        GetArgs::Status { id } => status::get(client, id, printer),
    }
}
