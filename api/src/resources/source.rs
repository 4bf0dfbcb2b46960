use reqwest::blocking::multipart::Form;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::Path;

use crate::error::{Error, Result};

/// How the uploaded file should be parsed.
#[derive(Debug, Clone, Serialize, PartialEq, Eq, Default)]
pub struct SourceParser<'request> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locale: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub quote: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub header: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub missing_tokens: Option<Vec<&'request str>>,
}

#[derive(Debug, Clone, Serialize, PartialEq, Default)]
pub struct NewSource<'request> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'request str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<&'request str>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_parser: Option<SourceParser<'request>>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

/// Build the multipart upload: the file itself plus one text part per option.
///
/// Non-string options are sent JSON encoded.
pub(crate) fn upload_form(path: &Path, options: &NewSource<'_>) -> Result<Form> {
    let mut form = Form::new()
        .file("file", path)
        .map_err(|source| Error::ReadSourceFile {
            path: path.to_owned(),
            source,
        })?;
    for (key, value) in option_parts(options)? {
        form = form.text(key, value);
    }
    Ok(form)
}

fn option_parts(options: &NewSource<'_>) -> Result<Vec<(String, String)>> {
    let options = super::request_body(options, std::iter::empty())?;
    Ok(options
        .into_iter()
        .map(|(key, value)| match value {
            Value::String(value) => (key, value),
            value => (key, value.to_string()),
        })
        .collect())
}
