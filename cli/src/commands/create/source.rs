use anyhow::{Context, Result};
use bigml_client::{Client, NewSource, SourceParser};
use log::info;
use serde_json::Value;
use std::path::PathBuf;
use structopt::StructOpt;

use crate::{
    printer::Printer,
    utils::{object_from, parse_property},
};

#[derive(Debug, StructOpt)]
pub struct CreateSourceArgs {
    #[structopt(name = "path", parse(from_os_str))]
    /// Path to the local file to upload
    path: PathBuf,

    #[structopt(long = "name")]
    /// Set the name of the new source
    name: Option<String>,

    #[structopt(long = "description")]
    /// Set the description of the new source
    description: Option<String>,

    #[structopt(long = "locale")]
    /// Locale used to parse numbers and dates, e.g. `es-ES`
    locale: Option<String>,

    #[structopt(long = "separator")]
    /// Column separator of the file
    separator: Option<String>,

    #[structopt(long = "no-header")]
    /// The first row of the file holds data rather than column names
    no_header: bool,

    #[structopt(long = "property", parse(try_from_str = parse_property))]
    /// Extra creation property as `key=value`; may be repeated
    properties: Vec<(String, Value)>,
}

pub fn create(client: &Client, args: &CreateSourceArgs, printer: &Printer) -> Result<()> {
    let CreateSourceArgs {
        path,
        name,
        description,
        locale,
        separator,
        no_header,
        properties,
    } = args;

    let source_parser = SourceParser {
        locale: locale.as_deref(),
        separator: separator.as_deref(),
        header: no_header.then_some(false),
        ..Default::default()
    };

    let options = NewSource {
        name: name.as_deref(),
        description: description.as_deref(),
        source_parser: (source_parser != SourceParser::default()).then_some(source_parser),
        properties: properties.iter().cloned().collect(),
        ..Default::default()
    };

    let source = object_from(client.create_source(path, &options))
        .context("Operation to create a source has failed.")?;
    info!(
        "New source `{}` created from `{}`.",
        source.resource,
        path.display()
    );
    printer.print_resources(&[source])
}
