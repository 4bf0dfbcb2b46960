use bigml_client::{Field, Resource, ResourceId, Status};
use colored::{ColoredString, Colorize};
use prettytable::{cell, format, row, Row, Table};
use serde::Serialize;
use serde_json::Value;

use anyhow::{anyhow, Context, Error, Result};
use std::{
    io::{self, Write},
    str::FromStr,
};

pub fn print_resources_as_json<ItemT>(
    resources: impl IntoIterator<Item = ItemT>,
    mut writer: impl Write,
) -> Result<()>
where
    ItemT: Serialize,
{
    for resource in resources {
        serde_json::to_writer(&mut writer, &resource)
            .context("Could not serialise resource.")
            .and_then(|_| writeln!(writer).context("Failed to write JSON resource to writer."))?;
    }
    Ok(())
}

#[derive(Copy, Clone, Debug, Default)]
pub enum OutputFormat {
    Json,
    #[default]
    Table,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(string: &str) -> Result<Self> {
        if string == "table" {
            Ok(OutputFormat::Table)
        } else if string == "json" {
            Ok(OutputFormat::Json)
        } else {
            Err(anyhow!("{}", string))
        }
    }
}

/// Represents a resource that is able to be displayed as a table.
///
/// The implementation must implement `to_table_headers` to return headers for the resource type,
/// and `to_table_row`, which should return a data row for the given resource instance.
pub trait DisplayTable {
    fn to_table_headers() -> Row;

    fn to_table_row(&self) -> Row;
}

fn status_cell(status: Status) -> ColoredString {
    match status {
        Status::Finished => status.name().green(),
        Status::Faulty => status.name().red().bold(),
        Status::Unknown => status.name().dimmed(),
        _ => status.name().yellow(),
    }
}

impl DisplayTable for Resource {
    fn to_table_headers() -> Row {
        row![bFg => "ID", "Name", "Status", "Created (UTC)"]
    }

    fn to_table_row(&self) -> Row {
        row![
            self.resource,
            match self.name() {
                Some(name) => name.into(),
                None => "none".dimmed(),
            },
            status_cell(self.status()),
            self.properties
                .get("created")
                .and_then(Value::as_str)
                .unwrap_or_default()
        ]
    }
}

/// A field definition along with the id it is keyed by.
#[derive(Debug, Serialize)]
pub struct PrintableField<'a> {
    pub id: &'a str,
    #[serde(flatten)]
    pub field: &'a Field,
}

impl<'a> DisplayTable for PrintableField<'a> {
    fn to_table_headers() -> Row {
        row![bFg => "ID", "Name", "Optype", "Column"]
    }

    fn to_table_row(&self) -> Row {
        row![
            self.id,
            self.field.name,
            match &self.field.optype {
                Some(optype) => optype.as_str().into(),
                None => "unknown".dimmed(),
            },
            self.field
                .column_number
                .map(|column| column.to_string())
                .unwrap_or_default()
        ]
    }
}

#[derive(Debug, Serialize)]
pub struct PrintableStatus {
    pub resource: ResourceId,
    pub code: i64,
    pub status: &'static str,
    pub message: Option<String>,
}

impl PrintableStatus {
    pub fn new(resource: &Resource) -> Self {
        let status = resource.status();
        PrintableStatus {
            resource: resource.resource.clone(),
            code: status.code(),
            status: status.name(),
            message: resource
                .status
                .as_ref()
                .and_then(|status| status.message.clone()),
        }
    }
}

impl DisplayTable for PrintableStatus {
    fn to_table_headers() -> Row {
        row![bFg => "ID", "Code", "Status", "Message"]
    }

    fn to_table_row(&self) -> Row {
        row![
            self.resource,
            self.code,
            match Status::from_code(self.code) {
                Some(status) => status_cell(status),
                None => self.status.dimmed(),
            },
            self.message.as_deref().unwrap_or_default()
        ]
    }
}

/// Helper trait to allow collection of resources to be converted into a table.
pub trait IntoTable {
    fn into_table(self) -> Table;
}

/// All iterators of resources can be converted into a table.
impl<'a, Iterable, Item: 'a> IntoTable for Iterable
where
    Iterable: IntoIterator<Item = &'a Item>,
    Item: DisplayTable,
{
    fn into_table(self) -> Table {
        let mut table = new_table();
        table.set_titles(Item::to_table_headers());
        for resource in self.into_iter() {
            table.add_row(resource.to_table_row());
        }
        table
    }
}

pub fn new_table() -> Table {
    let mut table = Table::new();
    let format = format::FormatBuilder::new()
        .column_separator(' ')
        .borders(' ')
        .separators(&[], format::LineSeparator::new('-', '+', '+', '+'))
        .padding(0, 1)
        .build();
    table.set_format(format);
    table
}

fn print_table<T: IntoTable>(resources: T) {
    let table = resources.into_table();
    table.printstd();
}

/// Print resources using the selected output format.
///
/// Resources passed to the printer must be able to be formatted using all supported
/// `OutputFormat`s.
#[derive(Default, Debug)]
pub struct Printer {
    output: OutputFormat,
}

impl Printer {
    pub fn new(output: OutputFormat) -> Self {
        Self { output }
    }

    pub fn print_resources<T, ItemT>(&self, resources: T) -> Result<()>
    where
        T: IntoIterator<Item = ItemT> + IntoTable,
        ItemT: Serialize,
    {
        match self.output {
            OutputFormat::Table => print_table(resources),
            OutputFormat::Json => print_resources_as_json(resources, io::stdout().lock())?,
        };
        Ok(())
    }
}
