#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::{Json, Router};
use candidatures::config::ApiConfig;
use candidatures::http::{ApiClient, FailureSink};
use serde_json::{json, Map, Value};

/// Request as seen by the stub server.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: String,
}

/// In-process imitation of the candidature API, listening on an ephemeral port.
///
/// `/candidatures` behaves like a small JSON collection: `id` and other plain
/// parameters filter by equality, `_sort` orders by a field, `delay_ms` postpones the
/// answer. A few extra paths expose raw transport behaviors.
#[derive(Clone)]
pub struct StubApi {
    pub base_url: String,
    records: Arc<Mutex<Vec<Value>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    forced_failure: Arc<Mutex<Option<(StatusCode, String)>>>,
}

impl StubApi {
    pub async fn spawn(records: Vec<Value>) -> Self {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind stub listener");
        let addr = listener.local_addr().expect("stub address");

        let stub = Self {
            base_url: format!("http://{addr}"),
            records: Arc::new(Mutex::new(records)),
            requests: Arc::new(Mutex::new(Vec::new())),
            forced_failure: Arc::new(Mutex::new(None)),
        };

        let app = Router::new().fallback(handle).with_state(stub.clone());
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("stub server runs");
        });

        stub
    }

    pub fn client(&self, sink: Arc<dyn FailureSink>) -> ApiClient {
        let config =
            ApiConfig::new(self.base_url.clone(), Duration::from_secs(5)).expect("valid base url");
        ApiClient::new(&config, sink).expect("client builds")
    }

    /// Every following request answers with `status` and `body`.
    pub fn fail_with(&self, status: StatusCode, body: &str) {
        *self.forced_failure.lock().expect("failure mutex") = Some((status, body.to_string()));
    }

    pub fn recover(&self) {
        *self.forced_failure.lock().expect("failure mutex") = None;
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("request mutex").clone()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .last()
            .cloned()
            .expect("at least one request recorded")
    }

    pub fn records(&self) -> Vec<Value> {
        self.records.lock().expect("record mutex").clone()
    }
}

/// Sink that keeps every reported message.
#[derive(Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<String>>,
}

impl RecordingSink {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().expect("sink mutex").clone()
    }
}

impl FailureSink for RecordingSink {
    fn on_request_failure(&self, message: &str) {
        self.messages
            .lock()
            .expect("sink mutex")
            .push(message.to_string());
    }
}

pub fn candidature(id: u64, nom: &str, competences: &[&str]) -> Value {
    json!({
        "id": id,
        "nom": nom,
        "poste": "Développeur",
        "statut": "En attente",
        "competences": competences,
        "experience": "2 ans",
        "dateCandidature": "2026-02-09T10:30:00.000Z",
        "email": format!("{}@example.dz", nom.to_lowercase().replace(' ', ".")),
        "telephone": "+213 555 12 34 56",
        "cv": format!("https://cv.example.dz/{id}.pdf"),
        "lettreMotivation": "Disponible rapidement.",
        "salaireSouhaite": 110000,
        "disponibilite": "Immédiate",
        "localisation": "Alger",
        "commentaires": []
    })
}

/// Three records in non-alphabetical order, two of them listing Python.
pub fn roster() -> Vec<Value> {
    vec![
        candidature(3, "Sara Meziane", &["Data science", "python"]),
        candidature(2, "Karim Haddad", &["Rust", "Go"]),
        candidature(1, "Amel Benali", &["Python", "Django"]),
    ]
}

pub fn filters(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), value.to_string()))
        .collect()
}

async fn handle(
    State(stub): State<StubApi>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let path = uri.path().to_string();
    let params: Vec<(String, String)> = uri
        .query()
        .map(|query| {
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect()
        })
        .unwrap_or_default();

    stub.requests.lock().expect("request mutex").push(RecordedRequest {
        method: method.clone(),
        path: path.clone(),
        query: uri.query().map(str::to_string),
        headers: headers.clone(),
        body: body.clone(),
    });

    if let Some((_, delay)) = params.iter().find(|(key, _)| key == "delay_ms") {
        let millis = delay.parse().expect("numeric delay");
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    let forced = stub.forced_failure.lock().expect("failure mutex").clone();
    if let Some((status, text)) = forced {
        return (status, text).into_response();
    }

    match (method, path.as_str()) {
        (Method::GET, "/candidatures") => Json(list(&stub, &params)).into_response(),
        (_, "/no-content") => StatusCode::NO_CONTENT.into_response(),
        (_, "/broken") => (StatusCode::INTERNAL_SERVER_ERROR, "database offline").into_response(),
        (_, "/not-json") => (StatusCode::OK, "<html>oops</html>").into_response(),
        (_, "/echo") => Json(json!({
            "contentType": header_text(&headers, "content-type"),
            "accept": header_text(&headers, "accept"),
            "body": body,
        }))
        .into_response(),
        (method, path) => match path
            .strip_prefix("/candidatures/")
            .and_then(|id| id.parse::<u64>().ok())
        {
            Some(id) if method == Method::PATCH => patch(&stub, id, &body),
            Some(id) if method == Method::DELETE => delete(&stub, id),
            _ => not_found(),
        },
    }
}

fn list(stub: &StubApi, params: &[(String, String)]) -> Vec<Value> {
    let mut records: Vec<Value> = stub
        .records()
        .into_iter()
        .filter(|record| {
            params
                .iter()
                .filter(|(key, _)| key != "_sort" && key != "delay_ms")
                .all(|(key, expected)| {
                    field_text(record, key).as_deref() == Some(expected.as_str())
                })
        })
        .collect();

    if let Some((_, field)) = params.iter().find(|(key, _)| key == "_sort") {
        records.sort_by_key(|record| field_text(record, field).unwrap_or_default());
    }

    records
}

fn patch(stub: &StubApi, id: u64, body: &str) -> Response {
    let changes: Map<String, Value> = serde_json::from_str(body).expect("patch body is an object");
    let mut records = stub.records.lock().expect("record mutex");
    match records.iter_mut().find(|record| record["id"] == id) {
        Some(record) => {
            if let Value::Object(fields) = record {
                fields.extend(changes);
            }
            Json(record.clone()).into_response()
        }
        None => not_found(),
    }
}

fn delete(stub: &StubApi, id: u64) -> Response {
    let mut records = stub.records.lock().expect("record mutex");
    let before = records.len();
    records.retain(|record| record["id"] != id);
    if records.len() == before {
        not_found()
    } else {
        Json(json!({})).into_response()
    }
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Body::from("{}")).into_response()
}

fn field_text(record: &Value, key: &str) -> Option<String> {
    match record.get(key)? {
        Value::String(text) => Some(text.clone()),
        other => Some(other.to_string()),
    }
}

fn header_text(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string)
}
