#![deny(clippy::all)]
mod envelope;
mod error;
mod handle;
mod lifecycle;
pub mod resources;
pub mod wait;

use http::Method;
use log::{debug, error, warn};
use once_cell::sync::Lazy;
use reqwest::{
    blocking::{Client as HttpClient, RequestBuilder, Response as HttpResponse},
    header, Proxy, Result as ReqwestResult,
};
use serde::Serialize;
use serde_json::{Map, Value};
use std::{
    env,
    fmt::{Debug, Formatter, Result as FmtResult},
    path::Path,
    time::Duration,
};
use url::Url;

use crate::{
    resources::{
        fields::translate_input_data,
        request_body,
        source::upload_form,
    },
    wait::Waiter,
};

pub use crate::{
    envelope::{Envelope, Failure, Fault, Success},
    error::{Error, Result},
    handle::Handle,
    lifecycle::Lifecycle,
    resources::{
        dataset::NewDataset,
        fields::{Field, Fields},
        id::{check_resource_id, ResourceId, ResourceKind, ResourceRef},
        model::NewModel,
        prediction::NewPrediction,
        source::{NewSource, SourceParser},
        status::{status_name, ResourceStatus, Status},
        ListMeta, Listing, Resource, UpdateResource,
    },
    wait::WaitConfig,
};
pub use reqwest::StatusCode;

const SEND_JSON: &str = "application/json;charset=utf-8";
const ACCEPT_JSON: &str = "application/json;charset=utf-8";

pub const USERNAME_ENV_VARIABLE_NAME: &str = "BIGML_USERNAME";
pub const API_KEY_ENV_VARIABLE_NAME: &str = "BIGML_API_KEY";

#[derive(Clone, PartialEq, Eq, Default)]
pub struct Credentials {
    pub username: String,
    pub api_key: String,
}

impl Credentials {
    /// Read credentials from `BIGML_USERNAME` and `BIGML_API_KEY`.
    pub fn from_env() -> Option<Self> {
        Some(Credentials {
            username: env::var(USERNAME_ENV_VARIABLE_NAME).ok()?,
            api_key: env::var(API_KEY_ENV_VARIABLE_NAME).ok()?,
        })
    }

    /// The query string prefix sent with every request. The API expects `;` separators.
    fn query(&self) -> String {
        format!("username={};api_key={};", self.username, self.api_key)
    }
}

impl Debug for Credentials {
    fn fmt(&self, formatter: &mut Formatter<'_>) -> FmtResult {
        formatter
            .debug_struct("Credentials")
            .field("username", &self.username)
            .field("api_key", &"<hidden>")
            .finish()
    }
}

pub struct Config {
    pub endpoint: Url,
    pub api_version: String,
    pub credentials: Credentials,
    pub accept_invalid_certificates: bool,
    pub proxy: Option<Url>,
    /// Timeout for a single HTTP request.
    pub timeout: Duration,
    /// Default polling settings used by [`Client::wait_until_ready`] callers and as the budget
    /// when creation waits for a parent resource.
    pub wait: WaitConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            endpoint: DEFAULT_ENDPOINT.clone(),
            api_version: DEFAULT_API_VERSION.to_owned(),
            credentials: Credentials::default(),
            accept_invalid_certificates: false,
            proxy: None,
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECONDS),
            wait: WaitConfig::default(),
        }
    }
}

#[derive(Debug)]
pub struct Client {
    endpoints: Endpoints,
    http_client: HttpClient,
    credentials: Credentials,
    wait: WaitConfig,
}

impl Client {
    /// Create a new API client.
    pub fn new(config: Config) -> Result<Client> {
        let http_client = build_http_client(&config)?;
        let endpoints = Endpoints::new(config.endpoint, &config.api_version)?;
        Ok(Client {
            endpoints,
            http_client,
            credentials: config.credentials,
            wait: config.wait,
        })
    }

    /// Replace the credentials used by every subsequent request.
    pub fn authenticate(&mut self, credentials: Credentials) {
        self.credentials = credentials;
    }

    /// Get the base url for the client, including the API version.
    pub fn base_url(&self) -> &Url {
        &self.endpoints.api
    }

    pub fn wait_config(&self) -> &WaitConfig {
        &self.wait
    }

    pub fn lifecycle(&self, kind: ResourceKind) -> Lifecycle<'_> {
        Lifecycle::new(self, kind)
    }

    pub fn sources(&self) -> Lifecycle<'_> {
        self.lifecycle(ResourceKind::Source)
    }

    pub fn datasets(&self) -> Lifecycle<'_> {
        self.lifecycle(ResourceKind::Dataset)
    }

    pub fn models(&self) -> Lifecycle<'_> {
        self.lifecycle(ResourceKind::Model)
    }

    pub fn predictions(&self) -> Lifecycle<'_> {
        self.lifecycle(ResourceKind::Prediction)
    }

    /// Create a source by uploading a local file.
    pub fn create_source(
        &self,
        path: impl AsRef<Path>,
        options: &NewSource<'_>,
    ) -> Result<Envelope<Resource>> {
        let form = upload_form(path.as_ref(), options)?;
        let url = self.endpoints.collection(ResourceKind::Source);
        let request = self
            .http_client
            .post(self.authenticated(url, ""))
            .multipart(form);
        Ok(self.execute(Operation::Create, url, request, HttpResponse::json))
    }

    /// Create a dataset from a source.
    ///
    /// With a non-zero `wait`, the source is polled every `wait` until it is finished (or the
    /// configured budget runs out) before the dataset is requested.
    pub fn create_dataset<SourceT>(
        &self,
        source: &SourceT,
        options: &NewDataset<'_>,
        wait: Duration,
    ) -> Result<Envelope<Resource>>
    where
        SourceT: ResourceRef + ?Sized,
    {
        let source_id = check_resource_id(source, ResourceKind::Dataset.parent())?;
        self.wait_for_parent(&source_id, wait)?;
        let body = request_body(options, [("source", Value::String(source_id.to_string()))])?;
        self.create(ResourceKind::Dataset, &body)
    }

    /// Create a model from a dataset, optionally waiting for the dataset first.
    pub fn create_model<DatasetT>(
        &self,
        dataset: &DatasetT,
        options: &NewModel<'_>,
        wait: Duration,
    ) -> Result<Envelope<Resource>>
    where
        DatasetT: ResourceRef + ?Sized,
    {
        let dataset_id = check_resource_id(dataset, ResourceKind::Model.parent())?;
        self.wait_for_parent(&dataset_id, wait)?;
        let body = request_body(
            options,
            [("dataset", Value::String(dataset_id.to_string()))],
        )?;
        self.create(ResourceKind::Model, &body)
    }

    /// Create a prediction from a model.
    ///
    /// `input_data` is keyed by field name; names are translated to field ids using the model's
    /// fields and an unknown name fails with [`Error::FieldTranslationMiss`].
    pub fn create_prediction<ModelT>(
        &self,
        model: &ModelT,
        input_data: &Map<String, Value>,
        options: &NewPrediction<'_>,
        wait: Duration,
    ) -> Result<Envelope<Resource>>
    where
        ModelT: ResourceRef + ?Sized,
    {
        let model_id = check_resource_id(model, ResourceKind::Prediction.parent())?;
        self.wait_for_parent(&model_id, wait)?;

        let input_data = if input_data.is_empty() {
            Map::new()
        } else {
            let fields = self
                .get_fields(&model_id)?
                .ok_or_else(|| Error::FieldsUnavailable {
                    resource: model_id.clone(),
                })?;
            translate_input_data(&fields, input_data)?
        };

        let body = request_body(
            options,
            [
                ("model", Value::String(model_id.to_string())),
                ("input_data", Value::Object(input_data)),
            ],
        )?;
        self.create(ResourceKind::Prediction, &body)
    }

    /// Retrieve any resource; its kind is detected from the id.
    pub fn get<ResourceT>(&self, resource: &ResourceT) -> Result<Envelope<Resource>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        let resource_id = check_resource_id(resource, None)?;
        Ok(self.fetch(&self.endpoints.resource(&resource_id)?))
    }

    /// List a collection. `query` is appended verbatim and must already be percent-encoded.
    pub fn list(&self, kind: ResourceKind, query: &str) -> Envelope<Listing> {
        let url = self.endpoints.collection(kind);
        let request = self
            .http_client
            .get(self.authenticated(url, query))
            .header(header::ACCEPT, ACCEPT_JSON);
        self.execute(Operation::List, url, request, HttpResponse::json)
    }

    /// Update any resource with a JSON serialisable set of changes.
    ///
    /// The API accepts updates asynchronously (202); the returned object may not yet reflect
    /// every change.
    pub fn update<ResourceT, ChangesT>(
        &self,
        resource: &ResourceT,
        changes: &ChangesT,
    ) -> Result<Envelope<Resource>>
    where
        ResourceT: ResourceRef + ?Sized,
        ChangesT: Serialize + ?Sized,
    {
        let resource_id = check_resource_id(resource, None)?;
        let url = self.endpoints.resource(&resource_id)?;
        let body = serde_json::to_vec(changes).map_err(Error::SerializeRequest)?;
        let request = self
            .http_client
            .put(self.authenticated(&url, ""))
            .header(header::CONTENT_TYPE, SEND_JSON)
            .body(body);
        Ok(self.execute(Operation::Update, &url, request, HttpResponse::json))
    }

    /// Delete any resource.
    pub fn delete<ResourceT>(&self, resource: &ResourceT) -> Result<Envelope<()>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        let resource_id = check_resource_id(resource, None)?;
        let url = self.endpoints.resource(&resource_id)?;
        let request = self.http_client.delete(self.authenticated(&url, ""));
        Ok(self.execute(Operation::Delete, &url, request, |_| Ok(())))
    }

    /// Fetch the field definitions of a source, dataset or model.
    ///
    /// Returns `None` if the resource could not be retrieved or has no fields.
    pub fn get_fields<ResourceT>(&self, resource: &ResourceT) -> Result<Option<Fields>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        Ok(self
            .get(resource)?
            .into_result()
            .ok()
            .and_then(|resource| resource.fields()))
    }

    /// Fetch a resource and report its status.
    pub fn status<ResourceT>(&self, resource: &ResourceT) -> Result<Envelope<Status>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        Ok(self.get(resource)?.map(|resource| resource.status()))
    }

    /// Whether the resource can be fetched and is finished.
    pub fn is_ready<ResourceT>(&self, resource: &ResourceT) -> Result<bool>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        Ok(self
            .get(resource)?
            .object()
            .map_or(false, Resource::is_finished))
    }

    /// Block until the resource is finished or faulty, or `config.timeout` has elapsed.
    ///
    /// Returns the last fetched envelope; inspect its status to tell the outcomes apart.
    pub fn wait_until_ready<ResourceT>(
        &self,
        resource: &ResourceT,
        config: &WaitConfig,
    ) -> Result<Envelope<Resource>>
    where
        ResourceT: ResourceRef + ?Sized,
    {
        let resource_id = check_resource_id(resource, None)?;
        let url = self.endpoints.resource(&resource_id)?;
        Ok(Waiter::new(config).wait(|| self.fetch(&url)))
    }

    fn wait_for_parent(&self, parent: &ResourceId, interval: Duration) -> Result<()> {
        if interval.is_zero() {
            return Ok(());
        }
        let config = WaitConfig {
            interval,
            timeout: self.wait.timeout,
        };
        let envelope = self.wait_until_ready(parent, &config)?;
        match envelope.object() {
            Some(resource) if resource.is_finished() => {}
            Some(resource) => warn!(
                "`{}` is {} rather than FINISHED, creating its child anyway.",
                parent,
                resource.status()
            ),
            None => warn!(
                "Could not confirm that `{}` is ready, creating its child anyway.",
                parent
            ),
        }
        Ok(())
    }

    fn create(&self, kind: ResourceKind, body: &Map<String, Value>) -> Result<Envelope<Resource>> {
        let url = self.endpoints.collection(kind);
        let body = serde_json::to_vec(body).map_err(Error::SerializeRequest)?;
        let request = self
            .http_client
            .post(self.authenticated(url, ""))
            .header(header::CONTENT_TYPE, SEND_JSON)
            .body(body);
        Ok(self.execute(Operation::Create, url, request, HttpResponse::json))
    }

    fn fetch(&self, url: &Url) -> Envelope<Resource> {
        let request = self
            .http_client
            .get(self.authenticated(url, ""))
            .header(header::ACCEPT, ACCEPT_JSON);
        self.execute(Operation::Get, url, request, HttpResponse::json)
    }

    fn authenticated(&self, url: &Url, query: &str) -> Url {
        let mut url = url.clone();
        url.set_query(Some(&format!("{}{}", self.credentials.query(), query)));
        url
    }

    fn execute<SuccessT>(
        &self,
        operation: Operation,
        url: &Url,
        request: RequestBuilder,
        decode: impl FnOnce(HttpResponse) -> ReqwestResult<SuccessT>,
    ) -> Envelope<SuccessT> {
        debug!("Attempting {} `{}`", operation.method(), url);
        let http_response = match request.send() {
            Ok(http_response) => http_response,
            Err(error) => {
                return internal_failure(operation, url, Fault::from_reqwest(&error), Some(error))
            }
        };

        let status_code = http_response.status();
        let location = if let Operation::Get = operation {
            Some(url.to_string())
        } else {
            http_response
                .headers()
                .get(header::LOCATION)
                .and_then(|location| location.to_str().ok())
                .map(str::to_owned)
        };

        if status_code == operation.success_status() {
            match decode(http_response) {
                Ok(object) => Envelope::Success(Success {
                    status_code,
                    location,
                    object,
                }),
                Err(error) => {
                    internal_failure(operation, url, Fault::from_reqwest(&error), Some(error))
                }
            }
        } else if operation.documented_errors().contains(&status_code) {
            match http_response.json::<Value>() {
                Ok(error) => Envelope::Failure(Failure::Api { status_code, error }),
                Err(error) => {
                    internal_failure(operation, url, Fault::from_reqwest(&error), Some(error))
                }
            }
        } else {
            internal_failure(operation, url, Fault::UnexpectedStatus(status_code), None)
        }
    }
}

fn internal_failure<SuccessT>(
    operation: Operation,
    url: &Url,
    fault: Fault,
    source: Option<reqwest::Error>,
) -> Envelope<SuccessT> {
    match source {
        Some(source) => error!(
            "{} `{}` failed [fault={}]: {}: {}",
            operation.method(),
            url,
            fault.as_str(),
            fault,
            source.without_url()
        ),
        None => error!(
            "{} `{}` failed [fault={}]: {}",
            operation.method(),
            url,
            fault.as_str(),
            fault
        ),
    }
    Envelope::Failure(Failure::Internal {
        fault,
        message: operation.failure_message(),
    })
}

/// The five calls of the API and the status codes each of them may answer with.
#[derive(Copy, Clone, Debug)]
enum Operation {
    Create,
    Get,
    List,
    Update,
    Delete,
}

impl Operation {
    fn method(&self) -> Method {
        match self {
            Operation::Create => Method::POST,
            Operation::Get | Operation::List => Method::GET,
            Operation::Update => Method::PUT,
            Operation::Delete => Method::DELETE,
        }
    }

    fn success_status(&self) -> StatusCode {
        match self {
            Operation::Create => StatusCode::CREATED,
            Operation::Get | Operation::List => StatusCode::OK,
            Operation::Update => StatusCode::ACCEPTED,
            Operation::Delete => StatusCode::NO_CONTENT,
        }
    }

    /// Statuses whose body is a documented JSON error.
    fn documented_errors(&self) -> &'static [StatusCode] {
        match self {
            Operation::Create => &[
                StatusCode::BAD_REQUEST,
                StatusCode::UNAUTHORIZED,
                StatusCode::PAYMENT_REQUIRED,
                StatusCode::NOT_FOUND,
            ],
            Operation::Get | Operation::List | Operation::Delete => &[
                StatusCode::BAD_REQUEST,
                StatusCode::UNAUTHORIZED,
                StatusCode::NOT_FOUND,
            ],
            Operation::Update => &[
                StatusCode::UNAUTHORIZED,
                StatusCode::PAYMENT_REQUIRED,
                StatusCode::METHOD_NOT_ALLOWED,
            ],
        }
    }

    fn failure_message(&self) -> &'static str {
        match self {
            Operation::Create => "The resource couldn't be created",
            Operation::Get => "The resource couldn't be retrieved",
            Operation::List => "The resource couldn't be listed",
            Operation::Update => "The resource couldn't be updated",
            Operation::Delete => "The resource couldn't be deleted",
        }
    }
}

#[derive(Debug)]
struct Endpoints {
    api: Url,
    sources: Url,
    datasets: Url,
    models: Url,
    predictions: Url,
}

fn construct_endpoint(base: &Url, segments: &[&str]) -> Result<Url> {
    let mut endpoint = base.clone();

    let mut endpoint_segments = endpoint
        .path_segments_mut()
        .map_err(|_| Error::BadEndpoint {
            endpoint: base.clone(),
        })?;

    endpoint_segments.pop_if_empty();
    for segment in segments {
        endpoint_segments.push(segment);
    }

    drop(endpoint_segments);

    Ok(endpoint)
}

impl Endpoints {
    pub fn new(base: Url, api_version: &str) -> Result<Self> {
        let api = construct_endpoint(&base, &[api_version])?;
        let sources = construct_endpoint(&api, &[ResourceKind::Source.as_str()])?;
        let datasets = construct_endpoint(&api, &[ResourceKind::Dataset.as_str()])?;
        let models = construct_endpoint(&api, &[ResourceKind::Model.as_str()])?;
        let predictions = construct_endpoint(&api, &[ResourceKind::Prediction.as_str()])?;

        Ok(Endpoints {
            api,
            sources,
            datasets,
            models,
            predictions,
        })
    }

    fn collection(&self, kind: ResourceKind) -> &Url {
        match kind {
            ResourceKind::Source => &self.sources,
            ResourceKind::Dataset => &self.datasets,
            ResourceKind::Model => &self.models,
            ResourceKind::Prediction => &self.predictions,
        }
    }

    fn resource(&self, resource_id: &ResourceId) -> Result<Url> {
        construct_endpoint(self.collection(resource_id.kind()), &[resource_id.hex()])
    }
}

const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 120;

fn build_http_client(config: &Config) -> Result<HttpClient> {
    let mut builder = HttpClient::builder()
        .danger_accept_invalid_certs(config.accept_invalid_certificates)
        .timeout(Some(config.timeout));

    if let Some(proxy) = config.proxy.clone() {
        builder = builder.proxy(Proxy::all(proxy).map_err(Error::BuildHttpClient)?);
    }
    builder.build().map_err(Error::BuildHttpClient)
}

pub const DEFAULT_API_VERSION: &str = "andromeda";

pub static DEFAULT_ENDPOINT: Lazy<Url> =
    Lazy::new(|| Url::parse("https://bigml.io").expect("Default URL is well-formed"));

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{mock, server_url, Matcher};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::{fs, thread::sleep};

    const API_KEY: &str = "79138a622755a2383660347f895444b1eb927730";

    pub(crate) fn test_client() -> Client {
        Client::new(Config {
            endpoint: Url::parse(&server_url()).unwrap(),
            credentials: Credentials {
                username: "alfred".to_owned(),
                api_key: API_KEY.to_owned(),
            },
            wait: WaitConfig {
                interval: Duration::from_millis(10),
                timeout: Duration::from_secs(5),
            },
            ..Default::default()
        })
        .unwrap()
    }

    fn resource_body(id: &str, status: i64) -> String {
        json!({"resource": id, "name": "iris", "status": {"code": status}}).to_string()
    }

    #[test]
    fn test_construct_endpoint() {
        let url = construct_endpoint(
            &Url::parse("https://bigml.io/").unwrap(),
            &["andromeda", "source", "4f603fe203ce89bb2d000000"],
        )
        .unwrap();

        assert_eq!(
            url.to_string(),
            "https://bigml.io/andromeda/source/4f603fe203ce89bb2d000000"
        )
    }

    #[test]
    fn test_endpoints() {
        let endpoints =
            Endpoints::new(Url::parse("https://bigml.io").unwrap(), "andromeda").unwrap();
        assert_eq!(endpoints.api.as_str(), "https://bigml.io/andromeda");
        assert_eq!(
            endpoints.collection(ResourceKind::Prediction).as_str(),
            "https://bigml.io/andromeda/prediction"
        );
        let model_id: ResourceId = "model/4f603fe203ce89bb2d000002".parse().unwrap();
        assert_eq!(
            endpoints.resource(&model_id).unwrap().as_str(),
            "https://bigml.io/andromeda/model/4f603fe203ce89bb2d000002"
        );

        assert!(matches!(
            Endpoints::new(Url::parse("mailto:alfred@bigml.com").unwrap(), "andromeda"),
            Err(Error::BadEndpoint { .. })
        ));
    }

    #[test]
    fn test_auth_suffix() {
        let mut client = test_client();
        let url = Url::parse("https://bigml.io/andromeda/source").unwrap();
        assert_eq!(
            client.authenticated(&url, "").as_str(),
            format!("https://bigml.io/andromeda/source?username=alfred;api_key={API_KEY};")
        );
        assert_eq!(
            client.authenticated(&url, "name=iris").as_str(),
            format!(
                "https://bigml.io/andromeda/source?username=alfred;api_key={API_KEY};name=iris"
            )
        );

        client.authenticate(Credentials {
            username: "batman".to_owned(),
            api_key: "robin".to_owned(),
        });
        assert_eq!(
            client.authenticated(&url, "").as_str(),
            "https://bigml.io/andromeda/source?username=batman;api_key=robin;"
        );
    }

    #[test]
    fn test_credentials_from_env() {
        env::remove_var(API_KEY_ENV_VARIABLE_NAME);
        env::set_var(USERNAME_ENV_VARIABLE_NAME, "alfred");
        assert_eq!(Credentials::from_env(), None);

        env::set_var(API_KEY_ENV_VARIABLE_NAME, API_KEY);
        assert_eq!(
            Credentials::from_env(),
            Some(Credentials {
                username: "alfred".to_owned(),
                api_key: API_KEY.to_owned(),
            })
        );

        env::remove_var(USERNAME_ENV_VARIABLE_NAME);
        env::remove_var(API_KEY_ENV_VARIABLE_NAME);
    }

    #[test]
    fn test_credentials_are_hidden() {
        let debug = format!("{:?}", test_client());
        assert!(!debug.contains(API_KEY));
    }

    #[test]
    fn test_get_sends_credentials() {
        let id = "source/4f603fe203ce89bb2d000010";
        let get = mock("GET", "/andromeda/source/4f603fe203ce89bb2d000010")
            .match_query(Matcher::Exact(format!("username=alfred;api_key={API_KEY};")))
            .match_header("accept", ACCEPT_JSON)
            .with_status(200)
            .with_body(resource_body(id, 5))
            .expect(1)
            .create();

        let envelope = test_client().get(id).unwrap();
        get.assert();

        assert_eq!(envelope.status_code(), StatusCode::OK);
        assert_eq!(envelope.resource_id().unwrap().as_str(), id);
        assert_eq!(
            envelope.location(),
            Some(format!("{}/andromeda/source/4f603fe203ce89bb2d000010", server_url()).as_str())
        );
    }

    #[test]
    fn test_get_classified_error() {
        let _get = mock("GET", "/andromeda/dataset/4f603fe203ce89bb2d000011")
            .match_query(Matcher::Any)
            .with_status(404)
            .with_body(r#"{"code": 404, "status": {"code": -1201, "message": "Not found"}}"#)
            .create();

        let envelope = test_client()
            .get("dataset/4f603fe203ce89bb2d000011")
            .unwrap();
        assert_eq!(envelope.status_code(), StatusCode::NOT_FOUND);
        assert_eq!(envelope.resource_id(), None);
        let failure = envelope.failure().unwrap();
        assert_eq!(failure.fault(), None);
        assert_eq!(failure.message(), "Not found");
        assert_eq!(failure.error()["status"]["code"], -1201);
    }

    #[test]
    fn test_get_unexpected_status() {
        let _get = mock("GET", "/andromeda/model/4f603fe203ce89bb2d000012")
            .match_query(Matcher::Any)
            .with_status(503)
            .with_body("<html>Service Unavailable</html>")
            .create();

        let envelope = test_client().get("model/4f603fe203ce89bb2d000012").unwrap();
        assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        let failure = envelope.failure().unwrap();
        assert_eq!(
            failure.fault(),
            Some(Fault::UnexpectedStatus(StatusCode::SERVICE_UNAVAILABLE))
        );
        assert_eq!(
            failure.error(),
            json!({"status": {"code": 500, "message": "The resource couldn't be retrieved"}})
        );
    }

    #[test]
    fn test_get_malformed_body() {
        let _get = mock("GET", "/andromeda/model/4f603fe203ce89bb2d000013")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("{\"resource\": ")
            .create();

        let envelope = test_client().get("model/4f603fe203ce89bb2d000013").unwrap();
        assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            envelope.failure().unwrap().fault(),
            Some(Fault::MalformedResponse)
        );
    }

    #[test]
    fn test_connection_failure() {
        let client = Client::new(Config {
            endpoint: Url::parse("http://127.0.0.1:1").unwrap(),
            ..Default::default()
        })
        .unwrap();

        let envelope = client.get("source/4f603fe203ce89bb2d000014").unwrap();
        assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(envelope.failure().unwrap().fault(), Some(Fault::Connection));
    }

    #[test]
    fn test_timeout_failure() {
        let _get = mock("GET", "/andromeda/source/4f603fe203ce89bb2d000015")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body_from_fn(|_| {
                sleep(Duration::from_secs_f64(0.5));
                Ok(())
            })
            .create();
        let client = Client::new(Config {
            endpoint: Url::parse(&server_url()).unwrap(),
            timeout: Duration::from_secs_f64(0.1),
            ..Default::default()
        })
        .unwrap();

        let envelope = client.get("source/4f603fe203ce89bb2d000015").unwrap();
        assert_eq!(envelope.failure().unwrap().fault(), Some(Fault::Timeout));
    }

    #[test]
    fn test_invalid_identifier_never_reaches_the_network() {
        let client = test_client();
        assert!(matches!(
            client.get("source/NOT-AN-ID"),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            client.delete("bucket/4f603fe203ce89bb2d000000"),
            Err(Error::InvalidIdentifier { .. })
        ));
        assert!(matches!(
            client.create_dataset(
                "model/4f603fe203ce89bb2d000000",
                &NewDataset::default(),
                Duration::ZERO
            ),
            Err(Error::InvalidIdentifier {
                expected: "source",
                ..
            })
        ));
    }

    #[test]
    fn test_create_source_uploads_file() {
        let id = "source/4f603fe203ce89bb2d000020";
        let path = env::temp_dir().join("bigml-client-test-iris.csv");
        fs::write(&path, "sepal length,sepal width,species\n5.1,3.5,Iris-setosa\n").unwrap();

        let create = mock("POST", "/andromeda/source")
            .match_query(Matcher::Exact(format!("username=alfred;api_key={API_KEY};")))
            .match_header("content-type", Matcher::Regex("^multipart/form-data".to_owned()))
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex("name=\"file\"".to_owned()),
                Matcher::Regex("5.1,3.5,Iris-setosa".to_owned()),
                Matcher::Regex(r#"\{"locale":"es-ES"\}"#.to_owned()),
            ]))
            .with_status(201)
            .with_header("location", &format!("https://bigml.io/andromeda/{id}"))
            .with_body(resource_body(id, 1))
            .expect(1)
            .create();

        let envelope = test_client()
            .create_source(
                &path,
                &NewSource {
                    source_parser: Some(SourceParser {
                        locale: Some("es-ES"),
                        ..Default::default()
                    }),
                    ..Default::default()
                },
            )
            .unwrap();
        create.assert();

        assert_eq!(envelope.status_code(), StatusCode::CREATED);
        assert_eq!(envelope.resource_id().unwrap().as_str(), id);
        assert_eq!(
            envelope.location(),
            Some("https://bigml.io/andromeda/source/4f603fe203ce89bb2d000020")
        );
    }

    #[test]
    fn test_create_dataset_without_waiting() {
        let source = "source/4f603fe203ce89bb2d000021";
        let dataset = "dataset/4f603fe203ce89bb2d000021";
        let poll = mock("GET", "/andromeda/source/4f603fe203ce89bb2d000021")
            .match_query(Matcher::Any)
            .expect(0)
            .create();
        let create = mock("POST", "/andromeda/dataset")
            .match_query(Matcher::Any)
            .match_header("content-type", SEND_JSON)
            .match_body(Matcher::Json(json!({"name": "iris", "source": source})))
            .with_status(201)
            .with_body(resource_body(dataset, 1))
            .expect(1)
            .create();

        let envelope = test_client()
            .create_dataset(
                source,
                &NewDataset {
                    name: Some("iris"),
                    ..Default::default()
                },
                Duration::ZERO,
            )
            .unwrap();
        create.assert();
        poll.assert();
        assert_eq!(envelope.resource_id().unwrap().as_str(), dataset);
    }

    #[test]
    fn test_create_model_waits_for_dataset() {
        let dataset = "dataset/4f603fe203ce89bb2d000022";
        let model = "model/4f603fe203ce89bb2d000022";
        let poll = mock("GET", "/andromeda/dataset/4f603fe203ce89bb2d000022")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(resource_body(dataset, 5))
            .expect(1)
            .create();
        let create = mock("POST", "/andromeda/model")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({"dataset": dataset})))
            .with_status(201)
            .with_body(resource_body(model, 0))
            .expect(1)
            .create();

        let envelope = test_client()
            .create_model(dataset, &NewModel::default(), Duration::from_millis(10))
            .unwrap();
        poll.assert();
        create.assert();
        assert_eq!(envelope.status_code(), StatusCode::CREATED);
    }

    #[test]
    fn test_create_then_get() {
        let path = env::temp_dir().join("bigml-client-test-round-trip.csv");
        fs::write(&path, "round,trip\n6,0\n").unwrap();

        let client = test_client();
        for (index, kind) in ResourceKind::ALL.into_iter().enumerate() {
            let hex = format!("4f603fe203ce89bb2d00006{index}");
            let id = format!("{kind}/{hex}");
            let parent = kind
                .parent()
                .map(|parent| format!("{parent}/{hex}"))
                .unwrap_or_default();

            let body = match kind.parent() {
                None => Matcher::Regex("round,trip".to_owned()),
                Some(parent_kind) => {
                    let mut reference = Map::new();
                    reference.insert(parent_kind.to_string(), Value::String(parent.clone()));
                    Matcher::PartialJson(Value::Object(reference))
                }
            };
            let _create = mock("POST", format!("/andromeda/{kind}").as_str())
                .match_query(Matcher::Any)
                .match_body(body)
                .with_status(201)
                .with_header("location", &format!("https://bigml.io/andromeda/{id}"))
                .with_body(resource_body(&id, 1))
                .create();
            let _get = mock("GET", format!("/andromeda/{id}").as_str())
                .match_query(Matcher::Any)
                .with_status(200)
                .with_body(resource_body(&id, 5))
                .create();

            let created = match kind {
                ResourceKind::Source => client.create_source(&path, &NewSource::default()),
                ResourceKind::Dataset => {
                    client.create_dataset(&parent, &NewDataset::default(), Duration::ZERO)
                }
                ResourceKind::Model => {
                    client.create_model(&parent, &NewModel::default(), Duration::ZERO)
                }
                ResourceKind::Prediction => client.create_prediction(
                    &parent,
                    &Map::new(),
                    &NewPrediction::default(),
                    Duration::ZERO,
                ),
            }
            .unwrap();
            assert_eq!(created.status_code(), StatusCode::CREATED, "{kind}");

            let fetched = client.get(&created).unwrap();
            assert_eq!(fetched.resource_id(), created.resource_id(), "{kind}");
            assert_eq!(fetched.resource_id().unwrap().as_str(), id);
        }
    }

    #[test]
    fn test_status_classification() {
        // Columns: create, get, list, update, delete.
        let table: [(u16, [u16; 5]); 11] = [
            (200, [500, 200, 200, 500, 500]),
            (201, [201, 500, 500, 500, 500]),
            (202, [500, 500, 500, 202, 500]),
            (204, [500, 500, 500, 500, 204]),
            (400, [400, 400, 400, 500, 400]),
            (401, [401, 401, 401, 401, 401]),
            (402, [402, 500, 500, 402, 500]),
            (403, [500, 500, 500, 500, 500]),
            (404, [404, 404, 404, 500, 404]),
            (405, [500, 500, 500, 405, 500]),
            (500, [500, 500, 500, 500, 500]),
        ];

        fn outcome<T>(envelope: Envelope<T>) -> (StatusCode, Option<Fault>) {
            (
                envelope.status_code(),
                envelope.failure().and_then(Failure::fault),
            )
        }

        let client = test_client();
        for (code, expected) in table {
            let status = StatusCode::from_u16(code).unwrap();
            let hex = format!("4f603fe203ce89bb2d000{code}");
            let source = format!("source/{hex}");
            let model = format!("model/{hex}");
            let body = |success: &str| match code {
                204 => String::new(),
                _ if code < 300 => success.to_owned(),
                _ => json!({"code": code, "status": {"code": -1, "message": "Rejected"}})
                    .to_string(),
            };
            let resource = resource_body(&model, 5);
            let listing = r#"{"meta": {"total_count": 0}, "objects": []}"#;

            let _create = mock("POST", "/andromeda/dataset")
                .match_query(Matcher::Any)
                .match_body(Matcher::PartialJson(json!({ "source": &source })))
                .with_status(code.into())
                .with_body(body(resource.as_str()))
                .create();
            let _get = mock("GET", format!("/andromeda/{model}").as_str())
                .match_query(Matcher::Any)
                .with_status(code.into())
                .with_body(body(resource.as_str()))
                .create();
            let _list = mock("GET", "/andromeda/dataset")
                .match_query(Matcher::Exact(format!(
                    "username=alfred;api_key={API_KEY};status_code={code}"
                )))
                .with_status(code.into())
                .with_body(body(listing))
                .create();
            let _update = mock("PUT", format!("/andromeda/{model}").as_str())
                .match_query(Matcher::Any)
                .with_status(code.into())
                .with_body(body(resource.as_str()))
                .create();
            let _delete = mock("DELETE", format!("/andromeda/{model}").as_str())
                .match_query(Matcher::Any)
                .with_status(code.into())
                .with_body(body(""))
                .create();

            let outcomes = [
                outcome(
                    client
                        .create_dataset(&source, &NewDataset::default(), Duration::ZERO)
                        .unwrap(),
                ),
                outcome(client.get(&model).unwrap()),
                outcome(client.list(ResourceKind::Dataset, &format!("status_code={code}"))),
                outcome(client.update(&model, &json!({"name": "iris"})).unwrap()),
                outcome(client.delete(&model).unwrap()),
            ];
            let expected = expected.map(|reported| {
                let fault = if reported == code && code != 500 {
                    None
                } else {
                    Some(Fault::UnexpectedStatus(status))
                };
                (StatusCode::from_u16(reported).unwrap(), fault)
            });
            assert_eq!(outcomes, expected, "status {code}");
        }
    }

    #[test]
    fn test_create_rejected_parent() {
        let source = "source/4f603fe203ce89bb2d000023";
        let _create = mock("POST", "/andromeda/dataset")
            .match_query(Matcher::Any)
            .match_body(Matcher::PartialJson(json!({"source": source})))
            .with_status(400)
            .with_body(
                r#"{"code": 400, "status": {"code": -1200, "message": "The source is not ready"}}"#,
            )
            .create();

        let envelope = test_client()
            .create_dataset(source, &NewDataset::default(), Duration::ZERO)
            .unwrap();
        assert_eq!(envelope.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(envelope.failure().unwrap().message(), "The source is not ready");
        assert!(matches!(
            test_client().create_model(&envelope, &NewModel::default(), Duration::ZERO),
            Err(Error::MissingIdentifier { expected: "dataset" })
        ));
    }

    #[test]
    fn test_create_prediction_translates_input() {
        let model = "model/4f603fe203ce89bb2d000024";
        let prediction = "prediction/4f603fe203ce89bb2d000024";
        let _fields = mock("GET", "/andromeda/model/4f603fe203ce89bb2d000024")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(
                json!({
                    "resource": model,
                    "status": {"code": 5},
                    "model": {"fields": {
                        "000000": {"name": "sepal length", "optype": "numeric"},
                        "000001": {"name": "sepal width", "optype": "numeric"},
                        "000004": {"name": "species", "optype": "categorical"}
                    }}
                })
                .to_string(),
            )
            .create();
        let create = mock("POST", "/andromeda/prediction")
            .match_query(Matcher::Any)
            .match_body(Matcher::Json(json!({
                "name": "Prediction for species",
                "model": model,
                "input_data": {"000000": 5, "000001": 2.5}
            })))
            .with_status(201)
            .with_body(resource_body(prediction, 5))
            .expect(1)
            .create();

        let input_data = match json!({"sepal length": 5, "sepal width": 2.5}) {
            Value::Object(input_data) => input_data,
            _ => unreachable!(),
        };
        let envelope = test_client()
            .create_prediction(
                model,
                &input_data,
                &NewPrediction {
                    name: Some("Prediction for species"),
                    ..Default::default()
                },
                Duration::ZERO,
            )
            .unwrap();
        create.assert();
        assert_eq!(envelope.resource_id().unwrap().as_str(), prediction);

        let input_data = match json!({"petal colour": "blue"}) {
            Value::Object(input_data) => input_data,
            _ => unreachable!(),
        };
        assert!(matches!(
            test_client().create_prediction(
                model,
                &input_data,
                &NewPrediction::default(),
                Duration::ZERO
            ),
            Err(Error::FieldTranslationMiss { name }) if name == "petal colour"
        ));
    }

    #[test]
    fn test_list_appends_query() {
        let list = mock("GET", "/andromeda/source")
            .match_query(Matcher::Exact(format!(
                "username=alfred;api_key={API_KEY};name=iris.csv"
            )))
            .with_status(200)
            .with_body(
                json!({
                    "meta": {"limit": 20, "offset": 0, "total_count": 1, "next": null},
                    "objects": [{"resource": "source/4f603fe203ce89bb2d000030", "name": "iris.csv"}]
                })
                .to_string(),
            )
            .expect(1)
            .create();

        let listing = test_client()
            .list(ResourceKind::Source, "name=iris.csv")
            .into_result()
            .unwrap();
        list.assert();
        assert_eq!(listing.meta.total_count, Some(1));
        assert_eq!(listing.objects.len(), 1);
        assert_eq!(listing.objects[0].name(), Some("iris.csv"));
    }

    #[test]
    fn test_update_expects_accepted() {
        let id = "model/4f603fe203ce89bb2d000031";
        let update = mock("PUT", "/andromeda/model/4f603fe203ce89bb2d000031")
            .match_query(Matcher::Any)
            .match_header("content-type", SEND_JSON)
            .match_body(Matcher::Json(json!({"name": "new name"})))
            .with_status(202)
            .with_body(
                json!({"resource": id, "name": "new name", "status": {"code": 5}}).to_string(),
            )
            .expect(1)
            .create();

        let envelope = test_client()
            .update(
                id,
                &UpdateResource {
                    name: Some("new name"),
                    ..Default::default()
                },
            )
            .unwrap();
        update.assert();
        assert_eq!(envelope.status_code(), StatusCode::ACCEPTED);
        assert_eq!(envelope.object().unwrap().name(), Some("new name"));
    }

    #[test]
    fn test_update_classification() {
        let _forbidden = mock("PUT", "/andromeda/model/4f603fe203ce89bb2d000032")
            .match_query(Matcher::Any)
            .with_status(405)
            .with_body(r#"{"status": {"code": -1, "message": "Method not allowed"}}"#)
            .create();
        let _ok = mock("PUT", "/andromeda/model/4f603fe203ce89bb2d000033")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(resource_body("model/4f603fe203ce89bb2d000033", 5))
            .create();

        let client = test_client();
        let changes = json!({"name": "new name"});
        let envelope = client
            .update("model/4f603fe203ce89bb2d000032", &changes)
            .unwrap();
        assert_eq!(envelope.status_code(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(envelope.failure().unwrap().fault(), None);

        // Only 202 means success for an update.
        let envelope = client
            .update("model/4f603fe203ce89bb2d000033", &changes)
            .unwrap();
        assert_eq!(envelope.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            envelope.failure().unwrap().fault(),
            Some(Fault::UnexpectedStatus(StatusCode::OK))
        );
    }

    #[test]
    fn test_delete_then_get() {
        let client = test_client();
        for (index, kind) in ResourceKind::ALL.into_iter().enumerate() {
            let id = format!("{kind}/4f603fe203ce89bb2d00007{index}");
            let delete = mock("DELETE", format!("/andromeda/{id}").as_str())
                .match_query(Matcher::Any)
                .with_status(204)
                .expect(1)
                .create();
            let _get = mock("GET", format!("/andromeda/{id}").as_str())
                .match_query(Matcher::Any)
                .with_status(404)
                .with_body(r#"{"status": {"code": -1201, "message": "Not found"}}"#)
                .create();

            let envelope = client.delete(&id).unwrap();
            delete.assert();
            assert_eq!(envelope.status_code(), StatusCode::NO_CONTENT, "{kind}");
            assert!(envelope.is_success());

            let envelope = client.get(&id).unwrap();
            assert_eq!(envelope.status_code(), StatusCode::NOT_FOUND, "{kind}");
            assert_eq!(envelope.resource_id(), None);
        }
    }

    #[test]
    fn test_status_and_readiness() {
        let _get = mock("GET", "/andromeda/dataset/4f603fe203ce89bb2d000035")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(resource_body("dataset/4f603fe203ce89bb2d000035", 4))
            .create();

        let client = test_client();
        let status = client
            .status("dataset/4f603fe203ce89bb2d000035")
            .unwrap()
            .into_result()
            .unwrap();
        assert_eq!(status.name(), "SUMMARIZED");
        assert!(!client.is_ready("dataset/4f603fe203ce89bb2d000035").unwrap());
    }

    #[test]
    fn test_wait_until_ready() {
        let id = "source/4f603fe203ce89bb2d000036";
        let finished = mock("GET", "/andromeda/source/4f603fe203ce89bb2d000036")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body(resource_body(id, 5))
            .expect(1)
            .create();

        let client = test_client();
        let envelope = client.wait_until_ready(id, client.wait_config()).unwrap();
        finished.assert();
        assert!(envelope.object().unwrap().is_finished());
    }
}
