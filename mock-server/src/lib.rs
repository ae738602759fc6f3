use std::{collections::HashMap, net::SocketAddr};

use axum::{
    body::Bytes,
    extract::{Multipart, Path, Query},
    http::{header, HeaderMap, StatusCode},
    routing::{any, get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tracing::{debug, error};

/// One part of a multipart upload as the server received it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PartReport {
    pub name: String,
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadReport {
    pub parts: Vec<PartReport>,
}

/// A request body exactly as it arrived.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BodyReport {
    pub content_type: Option<String>,
    pub len: usize,
    pub body: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderReport {
    pub user_agent: Option<String>,
    pub content_type: Option<String>,
}

pub fn app() -> Router {
    Router::new()
        .route("/echo", post(echo))
        .route("/query", get(query))
        .route("/upload", post(upload))
        .route("/inspect", post(inspect))
        .route("/status/{code}", any(status))
        .route("/headers", any(headers))
        .route("/text", any(text))
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Serve `app()` on a random loopback port from a background thread with its
/// own runtime. Returns the bound address.
pub fn spawn() -> std::io::Result<SocketAddr> {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0")?;
    let addr = std_listener.local_addr()?;
    std_listener.set_nonblocking(true)?;

    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
            Ok(rt) => rt,
            Err(e) => {
                error!(error = %e, "mock server runtime failed to start");
                return;
            }
        };
        let served = rt.block_on(async {
            match TcpListener::from_std(std_listener) {
                Ok(listener) => run(listener).await,
                Err(e) => Err(e),
            }
        });
        if let Err(e) = served {
            error!(error = %e, "mock server stopped");
        }
    });

    Ok(addr)
}

async fn echo(Json(body): Json<Value>) -> Json<Value> {
    debug!("echo");
    Json(body)
}

async fn query(Query(params): Query<HashMap<String, String>>) -> Json<HashMap<String, String>> {
    Json(params)
}

async fn upload(mut multipart: Multipart) -> Result<Json<UploadReport>, (StatusCode, String)> {
    let mut parts = Vec::new();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let filename = field.file_name().map(str::to_string);
        let content_type = field.content_type().map(str::to_string);
        let data = field
            .bytes()
            .await
            .map_err(|e| (StatusCode::BAD_REQUEST, e.body_text()))?;
        debug!(%name, size = data.len(), "upload part");
        parts.push(PartReport {
            name,
            filename,
            content_type,
            size: data.len(),
        });
    }
    Ok(Json(UploadReport { parts }))
}

async fn inspect(headers: HeaderMap, body: Bytes) -> Json<BodyReport> {
    Json(BodyReport {
        content_type: header_string(&headers, header::CONTENT_TYPE),
        len: body.len(),
        body: String::from_utf8_lossy(&body).into_owned(),
    })
}

// The body is read so hyper can keep the connection alive.
async fn status(Path(code): Path<u16>, _body: Bytes) -> (StatusCode, Json<Value>) {
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, Json(json!({ "status": status.as_u16() })))
}

async fn headers(headers: HeaderMap) -> Json<HeaderReport> {
    Json(HeaderReport {
        user_agent: header_string(&headers, header::USER_AGENT),
        content_type: header_string(&headers, header::CONTENT_TYPE),
    })
}

async fn text() -> &'static str {
    "plain text, not json"
}

fn header_string(headers: &HeaderMap, name: header::HeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}
