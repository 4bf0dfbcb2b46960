use anyhow::{Context, Result};
use bigml_client::Client;

use crate::{
    printer::{PrintableStatus, Printer},
    utils::object_from,
};

pub fn get(client: &Client, id: &str, printer: &Printer) -> Result<()> {
    let resource = object_from(client.get(id))
        .with_context(|| format!("Operation to get the status of `{id}` has failed."))?;
    printer.print_resources(&[PrintableStatus::new(&resource)])
}
