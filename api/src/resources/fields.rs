use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, HashMap};

use crate::error::{Error, Result};

/// A column definition, keyed by its field id (e.g. `"000001"`) in [`Fields`].
#[derive(Debug, Clone, Deserialize, Serialize, PartialEq)]
pub struct Field {
    pub name: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub optype: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_number: Option<u64>,

    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

pub type Fields = BTreeMap<String, Field>;

/// Index from human readable field name to field id.
///
/// If two fields share a name, the one with the lowest id wins.
pub fn field_ids_by_name(fields: &Fields) -> HashMap<&str, &str> {
    let mut index = HashMap::with_capacity(fields.len());
    for (id, field) in fields {
        index.entry(field.name.as_str()).or_insert(id.as_str());
    }
    index
}

/// Rewrite the keys of `input_data` from field names to field ids.
///
/// Every name must resolve; the first one that does not fails the whole translation.
pub fn translate_input_data(
    fields: &Fields,
    input_data: &Map<String, Value>,
) -> Result<Map<String, Value>> {
    let index = field_ids_by_name(fields);
    input_data
        .iter()
        .map(|(name, value)| match index.get(name.as_str()) {
            Some(id) => Ok(((*id).to_owned(), value.clone())),
            None => Err(Error::FieldTranslationMiss { name: name.clone() }),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn iris_fields() -> Fields {
        serde_json::from_value(json!({
            "000000": {"name": "sepal length", "optype": "numeric", "column_number": 0},
            "000001": {"name": "sepal width", "optype": "numeric", "column_number": 1},
            "000002": {"name": "petal length", "optype": "numeric", "column_number": 2},
            "000003": {"name": "petal width", "optype": "numeric", "column_number": 3},
            "000004": {"name": "species", "optype": "categorical", "column_number": 4}
        }))
        .unwrap()
    }

    fn object(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => panic!("not an object"),
        }
    }

    #[test]
    fn test_translate_input_data() {
        let translated = translate_input_data(
            &iris_fields(),
            &object(json!({"sepal length": 5, "sepal width": 2.5})),
        )
        .unwrap();

        assert_eq!(
            Value::Object(translated),
            json!({"000000": 5, "000001": 2.5})
        );
    }

    #[test]
    fn test_translate_minimal_fields() {
        let fields: Fields = serde_json::from_value(json!({
            "000000": {"name": "sepal length"},
            "000001": {"name": "sepal width"}
        }))
        .unwrap();
        let translated = translate_input_data(
            &fields,
            &object(json!({"sepal length": 5, "sepal width": 2.5})),
        )
        .unwrap();

        assert_eq!(
            Value::Object(translated),
            json!({"000000": 5, "000001": 2.5})
        );
    }

    #[test]
    fn test_translate_unknown_name() {
        match translate_input_data(
            &iris_fields(),
            &object(json!({"sepal length": 5, "colour": "blue"})),
        ) {
            Err(Error::FieldTranslationMiss { name }) => assert_eq!(name, "colour"),
            other => panic!("Expected FieldTranslationMiss, got {other:?}"),
        }
    }

    #[test]
    fn test_translate_empty_input() {
        let translated = translate_input_data(&iris_fields(), &Map::new()).unwrap();
        assert!(translated.is_empty());
    }

    #[test]
    fn test_duplicate_names_resolve_to_lowest_id() {
        let fields: Fields = serde_json::from_value(json!({
            "000007": {"name": "age"},
            "000002": {"name": "age"}
        }))
        .unwrap();
        assert_eq!(field_ids_by_name(&fields)["age"], "000002");
    }

    #[test]
    fn test_field_keeps_summary() {
        let fields: Fields = serde_json::from_value(json!({
            "000000": {
                "name": "sepal length",
                "optype": "numeric",
                "column_number": 0,
                "datatype": "double",
                "summary": {"minimum": 4.3, "maximum": 7.9}
            }
        }))
        .unwrap();
        let field = &fields["000000"];
        assert_eq!(field.optype.as_deref(), Some("numeric"));
        assert_eq!(field.column_number, Some(0));
        assert_eq!(field.properties["summary"]["maximum"], 7.9);
    }
}
