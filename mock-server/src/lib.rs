use std::{collections::BTreeMap, sync::Arc, time::Duration};

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::AppendHeaders,
    routing::{any, get},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::debug;

/// One request as the server saw it. Header names are lowercase.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

pub type Log = Arc<RwLock<Vec<RecordedRequest>>>;

pub fn app() -> Router {
    let log: Log = Arc::new(RwLock::new(Vec::new()));
    Router::new()
        .route("/echo", any(echo))
        .route("/delay/{ms}", get(delay))
        .route("/status/{code}", any(status))
        .route("/bytes/{n}", get(bytes))
        .route("/cookies", get(cookies))
        .route("/requests", get(list_requests))
        .with_state(log)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

async fn record(log: &Log, method: Method, uri: &Uri, headers: &HeaderMap, body: &[u8]) -> RecordedRequest {
    let entry = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        headers: headers
            .iter()
            .map(|(name, value)| {
                (
                    name.as_str().to_string(),
                    String::from_utf8_lossy(value.as_bytes()).into_owned(),
                )
            })
            .collect(),
        body: String::from_utf8_lossy(body).into_owned(),
    };
    debug!(method = %entry.method, path = %entry.path, "request recorded");
    log.write().await.push(entry.clone());
    entry
}

async fn echo(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Json<RecordedRequest> {
    Json(record(&log, method, &uri, &headers, &body).await)
}

async fn delay(
    State(log): State<Log>,
    Path(ms): Path<u64>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> &'static str {
    record(&log, method, &uri, &headers, &[]).await;
    tokio::time::sleep(Duration::from_millis(ms)).await;
    "done"
}

async fn status(
    State(log): State<Log>,
    Path(code): Path<u16>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Result<(StatusCode, String), StatusCode> {
    let code = StatusCode::from_u16(code).map_err(|_| StatusCode::BAD_REQUEST)?;
    record(&log, method, &uri, &headers, &[]).await;
    Ok((code, code.canonical_reason().unwrap_or_default().to_string()))
}

async fn bytes(
    State(log): State<Log>,
    Path(n): Path<usize>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> Vec<u8> {
    record(&log, method, &uri, &headers, &[]).await;
    vec![b'x'; n]
}

async fn cookies(
    State(log): State<Log>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
) -> (AppendHeaders<[(header::HeaderName, &'static str); 2]>, &'static str) {
    record(&log, method, &uri, &headers, &[]).await;
    (
        AppendHeaders([(header::SET_COOKIE, "a=1"), (header::SET_COOKIE, "b=2")]),
        "ok",
    )
}

async fn list_requests(State(log): State<Log>) -> Json<Vec<RecordedRequest>> {
    Json(log.read().await.clone())
}
