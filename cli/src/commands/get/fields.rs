use anyhow::{anyhow, Context, Result};
use bigml_client::{check_resource_id, Client};

use crate::printer::{PrintableField, Printer};

pub fn get(client: &Client, id: &str, printer: &Printer) -> Result<()> {
    let resource_id = check_resource_id(id, None)?;
    let fields = client
        .lifecycle(resource_id.kind())
        .get_fields(&resource_id)
        .with_context(|| format!("Operation to get the fields of `{resource_id}` has failed."))?
        .ok_or_else(|| anyhow!("Could not retrieve the fields of `{}`.", resource_id))?;

    let fields: Vec<_> = fields
        .iter()
        .map(|(id, field)| PrintableField { id, field })
        .collect();
    printer.print_resources(&fields)
}
