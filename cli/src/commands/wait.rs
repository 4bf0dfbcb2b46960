use anyhow::{bail, Context, Result};
use bigml_client::{Client, Status, WaitConfig};
use log::info;
use structopt::StructOpt;

use crate::{commands::seconds, printer::Printer, utils::object_from};

fn validate_interval(interval: String) -> std::result::Result<(), String> {
    match interval.parse::<u64>() {
        Ok(0) => Err("the interval must be at least one second".to_owned()),
        Ok(_) => Ok(()),
        Err(error) => Err(error.to_string()),
    }
}

#[derive(Debug, StructOpt)]
pub struct WaitArgs {
    #[structopt(name = "id")]
    /// Id of the resource to wait for
    id: String,

    #[structopt(long = "interval", validator = validate_interval)]
    /// Seconds to sleep between two polls [default: 3]
    interval: Option<u64>,

    #[structopt(long = "timeout")]
    /// Give up after this many seconds [default: 600]
    timeout: Option<u64>,
}

pub fn run(args: &WaitArgs, client: &Client, printer: &Printer) -> Result<()> {
    let WaitArgs {
        id,
        interval,
        timeout,
    } = args;

    let defaults = client.wait_config();
    let config = WaitConfig {
        interval: interval.map_or(defaults.interval, seconds),
        timeout: timeout.map_or(defaults.timeout, seconds),
    };

    info!("Waiting for `{}` to finish.", id);
    let resource = object_from(client.wait_until_ready(id, &config))
        .with_context(|| format!("Operation to wait for `{id}` has failed."))?;

    match resource.status() {
        Status::Finished => printer.print_resources(&[resource]),
        Status::Faulty => bail!(
            "`{}` is FAULTY: {}",
            resource.resource,
            resource
                .status
                .as_ref()
                .and_then(|status| status.message.as_deref())
                .unwrap_or("no message")
        ),
        status => bail!(
            "`{}` is still {} after {}s.",
            resource.resource,
            status,
            config.timeout.as_secs()
        ),
    }
}
