use anyhow::{Context, Result};
use bigml_client::Client;
use log::info;
use structopt::StructOpt;

use crate::utils::object_from;

#[derive(Debug, StructOpt)]
pub struct DeleteArgs {
    #[structopt(name = "id", required = true)]
    /// Ids of the resources to delete
    ids: Vec<String>,
}

pub fn run(args: &DeleteArgs, client: &Client) -> Result<()> {
    for id in &args.ids {
        object_from(client.delete(id))
            .with_context(|| format!("Operation to delete `{id}` has failed."))?;
        info!("Deleted `{}`.", id);
    }
    Ok(())
}
