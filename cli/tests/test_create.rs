use crate::common::TestCli;
use mockito::{mock, Matcher};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use std::{env, fs};
use uuid::Uuid;

fn created(output: &str) -> Value {
    serde_json::from_str(output.trim()).unwrap()
}

#[test]
fn test_create_source() {
    let cli = TestCli::get();
    let path = env::temp_dir().join(format!("iris-{}.csv", Uuid::new_v4()));
    fs::write(&path, "sepal length,species\n5.1,Iris-setosa\n").unwrap();

    let create = mock("POST", "/andromeda/source")
        .match_query(Matcher::Any)
        .match_body(Matcher::AllOf(vec![
            Matcher::Regex("name=\"file\"".to_owned()),
            Matcher::Regex("5.1,Iris-setosa".to_owned()),
            Matcher::Regex(r#"\{"header":false,"locale":"es-ES"\}"#.to_owned()),
            Matcher::Regex("name=\"name\"".to_owned()),
        ]))
        .with_status(201)
        .with_body(
            json!({"resource": "source/6f603fe203ce89bb2d000001", "name": "iris", "status": {"code": 1}})
                .to_string(),
        )
        .expect(1)
        .create();

    let output = cli.run([
        "--output",
        "json",
        "create",
        "source",
        path.to_str().unwrap(),
        "--name",
        "iris",
        "--locale",
        "es-ES",
        "--no-header",
    ]);
    create.assert();
    assert_eq!(
        created(&output)["resource"],
        "source/6f603fe203ce89bb2d000001"
    );

    fs::remove_file(&path).unwrap();
}

#[test]
fn test_create_source_missing_file() {
    let cli = TestCli::get();
    let error = cli.run_and_error(["create", "source", "/definitely/not/here/iris.csv"]);
    assert!(error.contains("Could not read source file"), "{}", error);
}

#[test]
fn test_create_dataset_waits_for_source() {
    let cli = TestCli::get();
    let poll = mock("GET", "/andromeda/source/6f603fe203ce89bb2d000002")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(r#"{"resource": "source/6f603fe203ce89bb2d000002", "status": {"code": 5}}"#)
        .expect(1)
        .create();
    let create = mock("POST", "/andromeda/dataset")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({
            "name": "iris dataset",
            "size": 1024,
            "source": "source/6f603fe203ce89bb2d000002"
        })))
        .with_status(201)
        .with_body(r#"{"resource": "dataset/6f603fe203ce89bb2d000002", "status": {"code": 1}}"#)
        .expect(1)
        .create();

    let output = cli.run([
        "--output",
        "json",
        "create",
        "dataset",
        "source/6f603fe203ce89bb2d000002",
        "--name",
        "iris dataset",
        "--property",
        "size=1024",
        "--wait",
        "1",
    ]);
    poll.assert();
    create.assert();
    assert_eq!(
        created(&output)["resource"],
        "dataset/6f603fe203ce89bb2d000002"
    );
}

#[test]
fn test_create_model_rejected() {
    let cli = TestCli::get();
    let _create = mock("POST", "/andromeda/model")
        .match_query(Matcher::Any)
        .match_body(Matcher::PartialJson(
            json!({"dataset": "dataset/6f603fe203ce89bb2d000003"}),
        ))
        .with_status(402)
        .with_body(r#"{"code": 402, "status": {"code": -1100, "message": "Payment required"}}"#)
        .create();

    let error = cli.run_and_error(["create", "model", "dataset/6f603fe203ce89bb2d000003"]);
    assert!(error.contains("402"), "{}", error);
    assert!(error.contains("Payment required"), "{}", error);

    let error = cli.run_and_error(["create", "model", "source/6f603fe203ce89bb2d000003"]);
    assert!(error.contains("Expected a dataset id"), "{}", error);
}

#[test]
fn test_create_prediction_by_field_name() {
    let cli = TestCli::get();
    let _model = mock("GET", "/andromeda/model/6f603fe203ce89bb2d000004")
        .match_query(Matcher::Any)
        .with_status(200)
        .with_body(
            json!({
                "resource": "model/6f603fe203ce89bb2d000004",
                "status": {"code": 5},
                "model": {"fields": {
                    "000000": {"name": "sepal length"},
                    "000001": {"name": "sepal width"},
                    "000004": {"name": "species"}
                }}
            })
            .to_string(),
        )
        .create();
    let create = mock("POST", "/andromeda/prediction")
        .match_query(Matcher::Any)
        .match_body(Matcher::Json(json!({
            "model": "model/6f603fe203ce89bb2d000004",
            "input_data": {"000000": 5, "000001": 2.5}
        })))
        .with_status(201)
        .with_body(
            json!({
                "resource": "prediction/6f603fe203ce89bb2d000004",
                "status": {"code": 5},
                "prediction": {"000004": "Iris-versicolor"}
            })
            .to_string(),
        )
        .expect(1)
        .create();

    let output = cli.run([
        "--output",
        "json",
        "create",
        "prediction",
        "model/6f603fe203ce89bb2d000004",
        "--input",
        r#"{"sepal length": 5, "sepal width": 2.5}"#,
    ]);
    create.assert();
    assert_eq!(
        created(&output)["prediction"],
        json!({"000004": "Iris-versicolor"})
    );

    let error = cli.run_and_error([
        "create",
        "prediction",
        "model/6f603fe203ce89bb2d000004",
        "--input",
        r#"{"petal colour": "blue"}"#,
    ]);
    assert!(error.contains("petal colour"), "{}", error);
}
